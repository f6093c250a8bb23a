//! Post assembly: the entry point tying the pieces together.
use std::{
  borrow::Cow,
  panic::{self, AssertUnwindSafe},
  sync::Arc,
};

use log::{debug, error};

use crate::{
  author,
  error::RegistryError,
  fragment,
  images::{ImageExtractor, LinkedImageExtractor},
  links::{LinkDetector, UrlLinkDetector},
  post::{ArchiveDescriptor, Post, PostBuilder},
  registry::RuleRegistry,
  rules::RuleSet,
  settings::ParserSettings,
  styled::StyledText,
  theme::Theme,
  walker::{self, RenderContext},
};

/// Parses posts into styled text.
///
/// A single parser is meant to be shared by every worker; parsing only needs
/// `&self`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use chanspan_markup::{ParserSettings, PostBuilder, PostParser, StandardRules};
///
/// let parser = PostParser::new(Arc::new(StandardRules), ParserSettings::default());
/// let post = PostBuilder::new("g", 1)
///   .name("Anonymous")
///   .comment(r#"<span class="quote">&gt;be me</span><br>write rust"#);
///
/// let post = parser.parse(None, post)?;
/// assert_eq!(post.comment.text(), ">be me\nwrite rust");
/// # Ok::<(), chanspan_markup::RegistryError>(())
/// ```
pub struct PostParser {
  registry:        RuleRegistry,
  settings:        ParserSettings,
  link_detector:   Box<dyn LinkDetector>,
  image_extractor: Box<dyn ImageExtractor>,
}

impl PostParser {
  /// Create a parser with `default_rules` for posts without an archive, URL
  /// link detection and linked-image extraction.
  #[must_use]
  pub fn new(default_rules: Arc<dyn RuleSet>, settings: ParserSettings) -> Self {
    let image_extractor = LinkedImageExtractor::new(settings.parse_post_images);

    Self {
      registry: RuleRegistry::new(default_rules),
      settings,
      link_detector: Box::new(UrlLinkDetector),
      image_extractor: Box::new(image_extractor),
    }
  }

  #[must_use]
  pub fn with_link_detector(mut self, detector: impl LinkDetector + 'static) -> Self {
    self.link_detector = Box::new(detector);
    self
  }

  #[must_use]
  pub fn with_image_extractor(
    mut self,
    extractor: impl ImageExtractor + 'static,
  ) -> Self {
    self.image_extractor = Box::new(extractor);
    self
  }

  #[must_use]
  pub const fn settings(&self) -> &ParserSettings {
    &self.settings
  }

  #[must_use]
  pub const fn registry(&self) -> &RuleRegistry {
    &self.registry
  }

  /// Register the rules for posts coming from `archive`.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::Duplicate`] if the archive already has rules.
  pub fn add_archive_rules(
    &self,
    archive: ArchiveDescriptor,
    rules: Arc<dyn RuleSet>,
  ) -> Result<(), RegistryError> {
    self.registry.register(archive, rules)
  }

  /// Parse a post.
  ///
  /// Name and subject are entity-decoded, the subject and author line styled,
  /// and the comment walked. A comment that fails to render is logged and
  /// left empty; the rest of the post is still produced. Linked images are
  /// collected last.
  ///
  /// Recovering from a panicking [`RuleSet`] relies on unwinding. Under
  /// `panic = "abort"` such a panic ends the process instead.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::Unregistered`] if the post names an archive
  /// without registered rules.
  pub fn parse(
    &self,
    theme: Option<&Theme>,
    mut builder: PostBuilder,
  ) -> Result<Post, RegistryError> {
    let theme = theme.map_or_else(|| Cow::Owned(Theme::default()), Cow::Borrowed);

    if !builder.name.is_empty() {
      builder.name = html_escape::decode_html_entities(&builder.name).into_owned();
    }
    if !builder.subject.is_empty() {
      builder.subject =
        html_escape::decode_html_entities(&builder.subject).into_owned();
    }

    let rules = self.registry.resolve(builder.archive.as_ref())?;

    author::anonymize(&self.settings, &mut builder);
    builder.subject_span = author::compose_subject(&theme, &builder);
    builder.author_line =
      Some(author::compose_author_line(&theme, &self.settings, &builder));

    let ctx = RenderContext {
      theme:    &theme,
      settings: &self.settings,
      links:    &*self.link_detector,
    };

    let comment = if builder.has_comment() {
      let raw = builder.take_comment();
      parse_comment(&ctx, rules.as_ref(), &mut builder, &raw)
    } else {
      StyledText::new()
    };
    builder.comment_span = Some(comment);

    self.image_extractor.add_post_images(&mut builder);
    Ok(builder.build())
  }
}

impl std::fmt::Debug for PostParser {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PostParser")
      .field("registry", &self.registry)
      .field("settings", &self.settings)
      .finish_non_exhaustive()
  }
}

/// Walk the comment HTML. Any panic while parsing or walking is contained here
/// and yields an empty comment.
fn parse_comment(
  ctx: &RenderContext<'_>,
  rules: &dyn RuleSet,
  post: &mut PostBuilder,
  html: &str,
) -> StyledText {
  let known_links = post.links.len();

  let result = panic::catch_unwind(AssertUnwindSafe(|| {
    let body = fragment::parse_fragment(html);
    walker::render_children(ctx, rules, post, &body)
  }));

  match result {
    Ok(comment) => {
      debug!(
        "Parsed comment of post /{}/{} into {} spans",
        post.board,
        post.no,
        comment.spans().len()
      );
      comment
    },
    Err(e) => {
      if let Some(error_msg) = e.downcast_ref::<String>() {
        error!(
          "Error parsing comment html of post /{}/{}: {error_msg}",
          post.board, post.no
        );
      } else if let Some(error_msg) = e.downcast_ref::<&str>() {
        error!(
          "Error parsing comment html of post /{}/{}: {error_msg}",
          post.board, post.no
        );
      } else {
        error!(
          "Unknown error while parsing comment html of post /{}/{}",
          post.board, post.no
        );
      }

      // Links from a half-walked comment point into text that was dropped.
      post.links.truncate(known_links);
      StyledText::new()
    },
  }
}
