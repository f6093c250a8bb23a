//! Post data before and after a parse pass.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::styled::{Color, StyledText};

/// Identifies the archive a post was fetched from, and with it the tag rules
/// that apply to its markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchiveDescriptor(String);

impl ArchiveDescriptor {
  #[must_use]
  pub fn new(domain: impl Into<String>) -> Self {
    Self(domain.into())
  }

  #[must_use]
  pub fn domain(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ArchiveDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// An image referenced from a post comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImage {
  pub url:       String,
  pub filename:  String,
  pub extension: String,
}

/// A post being parsed.
///
/// The plain-text fields are filled in by whoever decoded the post (usually
/// from JSON). The styled outputs are written by [`crate::PostParser`], once
/// per pass, and the raw comment is consumed along the way.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostBuilder {
  pub board:             String,
  pub no:                u64,
  pub name:              String,
  pub subject:           String,
  pub tripcode:          String,
  pub poster_id:         String,
  pub moderator_capcode: String,
  /// Raw comment HTML.
  pub comment:           String,
  /// Archive the post came from; `None` for posts fetched from the site.
  pub archive:           Option<ArchiveDescriptor>,
  /// Post is collapsed by a filter and drawn with secondary text colour.
  pub filter_stub:       bool,
  /// `id_color` is light and needs a dark highlight behind it.
  pub is_light_color:    bool,
  pub id_color:          Color,

  #[serde(skip)]
  pub(crate) subject_span: Option<StyledText>,
  #[serde(skip)]
  pub(crate) author_line:  Option<StyledText>,
  #[serde(skip)]
  pub(crate) comment_span: Option<StyledText>,
  /// URLs found while walking the comment.
  #[serde(skip)]
  pub links:               Vec<String>,
  #[serde(skip)]
  pub images:              Vec<PostImage>,
}

impl PostBuilder {
  #[must_use]
  pub fn new(board: impl Into<String>, no: u64) -> Self {
    Self {
      board: board.into(),
      no,
      ..Self::default()
    }
  }

  #[must_use]
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  #[must_use]
  pub fn subject(mut self, subject: impl Into<String>) -> Self {
    self.subject = subject.into();
    self
  }

  #[must_use]
  pub fn tripcode(mut self, tripcode: impl Into<String>) -> Self {
    self.tripcode = tripcode.into();
    self
  }

  #[must_use]
  pub fn poster_id(mut self, poster_id: impl Into<String>) -> Self {
    self.poster_id = poster_id.into();
    self
  }

  #[must_use]
  pub fn moderator_capcode(mut self, capcode: impl Into<String>) -> Self {
    self.moderator_capcode = capcode.into();
    self
  }

  #[must_use]
  pub fn comment(mut self, comment: impl Into<String>) -> Self {
    self.comment = comment.into();
    self
  }

  #[must_use]
  pub fn archive(mut self, archive: ArchiveDescriptor) -> Self {
    self.archive = Some(archive);
    self
  }

  #[must_use]
  pub const fn filter_stub(mut self, filter_stub: bool) -> Self {
    self.filter_stub = filter_stub;
    self
  }

  #[must_use]
  pub const fn id_color(mut self, color: Color, is_light: bool) -> Self {
    self.id_color = color;
    self.is_light_color = is_light;
    self
  }

  #[must_use]
  pub const fn has_comment(&self) -> bool {
    !self.comment.is_empty()
  }

  /// Take the raw comment, leaving the field empty.
  pub fn take_comment(&mut self) -> String {
    std::mem::take(&mut self.comment)
  }

  #[must_use]
  pub const fn subject_span(&self) -> Option<&StyledText> {
    self.subject_span.as_ref()
  }

  #[must_use]
  pub const fn author_line(&self) -> Option<&StyledText> {
    self.author_line.as_ref()
  }

  #[must_use]
  pub const fn comment_span(&self) -> Option<&StyledText> {
    self.comment_span.as_ref()
  }

  /// Record a link found in the comment. Repeated URLs are kept once.
  pub fn add_link(&mut self, url: &str) {
    if !self.links.iter().any(|known| known == url) {
      self.links.push(url.to_string());
    }
  }

  /// Freeze the builder. Output slots that were never written become empty.
  #[must_use]
  pub fn build(self) -> Post {
    Post {
      board:       self.board,
      no:          self.no,
      name:        self.name,
      subject:     self.subject_span.unwrap_or_default(),
      author_line: self.author_line.unwrap_or_default(),
      comment:     self.comment_span.unwrap_or_default(),
      archive:     self.archive,
      filter_stub: self.filter_stub,
      links:       self.links,
      images:      self.images,
    }
  }
}

/// A fully parsed post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
  pub board:       String,
  pub no:          u64,
  /// Name after entity decoding and anonymization.
  pub name:        String,
  pub subject:     StyledText,
  /// Name, tripcode, poster ID and capcode as one line.
  pub author_line: StyledText,
  pub comment:     StyledText,
  pub archive:     Option<ArchiveDescriptor>,
  pub filter_stub: bool,
  pub links:       Vec<String>,
  pub images:      Vec<PostImage>,
}
