//! Colour scheme consumed while building spans.
use serde::{Deserialize, Serialize};

use crate::styled::Color;

/// Colours used for post metadata and comment markup.
///
/// The defaults follow the classic light imageboard palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
  /// Subject line.
  pub subject_color:       Color,
  /// Poster name and tripcode.
  pub name_color:          Color,
  /// Moderator capcode.
  pub capcode_color:       Color,
  /// Poster ID highlight when the ID colour is light.
  pub id_background_light: Color,
  /// Poster ID highlight when the ID colour is dark.
  pub id_background_dark:  Color,
  /// Detected and explicit links.
  pub link_color:          Color,
  /// Greentext quotes.
  pub quote_color:         Color,
  /// Spoiler highlight.
  pub spoiler_color:       Color,
}

impl Default for Theme {
  fn default() -> Self {
    Self {
      subject_color:       Color::rgb(0x0f, 0x0c, 0x5d),
      name_color:          Color::rgb(0x11, 0x77, 0x43),
      capcode_color:       Color::rgb(0xff, 0x00, 0x00),
      id_background_light: Color::rgb(0x33, 0x33, 0x33),
      id_background_dark:  Color::rgb(0xdd, 0xdd, 0xdd),
      link_color:          Color::rgb(0x34, 0x34, 0xc6),
      quote_color:         Color::rgb(0x78, 0x99, 0x22),
      spoiler_color:       Color::BLACK,
    }
  }
}
