//! Emoji shortcode substitution that leaves `[math]` blocks alone.
//!
//! Text is split on the `[math]` and `[/math]` delimiters. The resulting
//! segments alternate between plain text and math, and only the plain ones
//! have `:shortcode:` sequences replaced. Math segments are written back
//! byte-for-byte, wrapped in their delimiters again.
//!
//! ```
//! use chanspan_markup::emoji::substitute;
//!
//! assert_eq!(substitute("nice :+1:"), "nice 👍");
//! assert_eq!(substitute("[math]a:b:c[/math]"), "[math]a:b:c[/math]");
//! ```
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::never_matching_regex;

pub const MATH_OPEN: &str = "[math]";
pub const MATH_CLOSE: &str = "[/math]";

/// Openers of blocks whose text nodes are never emoji-substituted.
pub const PROTECTED_OPENERS: [&str; 2] = [MATH_OPEN, "[eqn]"];

static MATH_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\[/?math\]").unwrap_or_else(|e| {
    log::error!("Failed to compile MATH_DELIMITER regex: {e}");
    never_matching_regex()
  })
});

static SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r":([a-zA-Z0-9_+\-]+):").unwrap_or_else(|e| {
    log::error!("Failed to compile SHORTCODE regex: {e}");
    never_matching_regex()
  })
});

/// Whether `text` opens a block that must not be emoji-substituted.
#[must_use]
pub fn starts_protected(text: &str) -> bool {
  PROTECTED_OPENERS
    .iter()
    .any(|opener| text.starts_with(opener))
}

/// Replace emoji shortcodes outside of `[math]` blocks.
#[must_use]
pub fn substitute(text: &str) -> String {
  let opens_with_math = text.starts_with(MATH_OPEN);
  let mut segments: Vec<&str> = MATH_DELIMITER.split(text).collect();

  // A leading `[math]` produces an empty first segment that must survive so
  // the block itself is still emitted.
  let keep = if opens_with_math { 2 } else { 1 };
  while segments.len() > keep && segments.last().is_some_and(|s| s.is_empty())
  {
    segments.pop();
  }

  let skip = usize::from(opens_with_math);
  let mut out = String::with_capacity(text.len());
  for (i, segment) in segments.into_iter().skip(skip).enumerate() {
    let in_math = (i % 2 == 0) == opens_with_math;
    if in_math {
      out.push_str(MATH_OPEN);
      out.push_str(segment);
      out.push_str(MATH_CLOSE);
    } else {
      out.push_str(&emojify(segment));
    }
  }
  out
}

/// Replace every known `:shortcode:` with its emoji. Unknown codes are kept.
#[must_use]
pub fn emojify(text: &str) -> String {
  SHORTCODE
    .replace_all(text, |caps: &Captures| {
      emojis::get_by_shortcode(&caps[1])
        .map_or_else(|| caps[0].to_string(), |emoji| emoji.as_str().to_string())
    })
    .into_owned()
}
