//! Read-only flags that steer a parse pass.
use serde::{Deserialize, Serialize};

/// How far below the body text size metadata (tripcode, ID, capcode) is drawn.
const DETAILS_SIZE_OFFSET: u32 = 4;

/// Settings consulted by [`crate::PostParser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Settings struct with independent boolean flags"
)]
pub struct ParserSettings {
  /// Replace every name with the anonymous placeholder and drop tripcodes.
  pub anonymize:           bool,
  /// Drop poster IDs.
  pub anonymize_ids:       bool,
  /// Show the placeholder name instead of hiding it.
  pub show_anonymous_name: bool,
  /// Replace `:shortcode:` emoji outside of code and math blocks.
  pub enable_emoji:        bool,
  /// Body text size, in scale-independent pixels.
  pub font_size:           u32,
  /// Collect linked images into the post's image list.
  pub parse_post_images:   bool,
}

impl ParserSettings {
  /// Size used for the author line details, a fixed step below the body size.
  #[must_use]
  pub const fn details_size(&self) -> u32 {
    self.font_size.saturating_sub(DETAILS_SIZE_OFFSET)
  }
}

impl Default for ParserSettings {
  fn default() -> Self {
    Self {
      anonymize:           false,
      anonymize_ids:       false,
      show_anonymous_name: false,
      enable_emoji:        false,
      font_size:           16,
      parse_post_images:   true,
    }
  }
}
