//! Subject and author line spans.
use crate::{
  post::PostBuilder,
  settings::ParserSettings,
  styled::{Style, StyledText},
  theme::Theme,
};

/// Name shown for anonymized posters.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Apply the anonymization settings to the builder's plain-text fields.
pub fn anonymize(settings: &ParserSettings, post: &mut PostBuilder) {
  if settings.anonymize {
    post.name = ANONYMOUS_NAME.to_string();
    post.tripcode.clear();
  }

  if settings.anonymize_ids {
    post.poster_id.clear();
  }
}

/// The subject as a styled run, or `None` when there is no subject.
///
/// Filtered stubs get no colour so the presentation layer can fall back to its
/// secondary text colour.
#[must_use]
pub fn compose_subject(theme: &Theme, post: &PostBuilder) -> Option<StyledText> {
  if post.subject.is_empty() {
    return None;
  }

  let mut subject = StyledText::plain(post.subject.as_str());
  if !post.filter_stub {
    subject.apply_all(Style::Foreground(theme.subject_color));
  }
  Some(subject)
}

/// Name, tripcode, poster ID and capcode, in that order, separated by single
/// spaces. Empty fields are left out entirely.
///
/// Anonymization must already have been applied, see [`anonymize`].
#[must_use]
pub fn compose_author_line(
  theme: &Theme,
  settings: &ParserSettings,
  post: &PostBuilder,
) -> StyledText {
  let details = Style::AbsoluteSize(settings.details_size());
  let mut segments = Vec::with_capacity(4);

  if !post.name.is_empty()
    && (post.name != ANONYMOUS_NAME || settings.show_anonymous_name)
  {
    segments.push(StyledText::styled(
      post.name.as_str(),
      Style::Foreground(theme.name_color),
    ));
  }

  if !post.tripcode.is_empty() {
    let mut tripcode = StyledText::styled(
      post.tripcode.as_str(),
      Style::Foreground(theme.name_color),
    );
    tripcode.apply_all(details.clone());
    segments.push(tripcode);
  }

  if !post.poster_id.is_empty() {
    let background = if post.is_light_color {
      theme.id_background_light
    } else {
      theme.id_background_dark
    };

    let mut id = StyledText::styled(
      format!("  ID: {}  ", post.poster_id),
      Style::Foreground(post.id_color),
    );
    id.apply_all(Style::Background(background));
    id.apply_all(details.clone());
    segments.push(id);
  }

  if !post.moderator_capcode.is_empty() {
    let mut capcode = StyledText::styled(
      format!("Capcode: {}", post.moderator_capcode),
      Style::Foreground(theme.capcode_color),
    );
    capcode.apply_all(details);
    segments.push(capcode);
  }

  StyledText::join(segments, " ")
}
