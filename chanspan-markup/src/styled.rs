//! Styled text runs.
//!
//! A [`StyledText`] is an owned string plus an ordered list of [`Span`]s, each
//! applying one [`Style`] to a half-open byte range of that string. Spans may
//! overlap, e.g. a colour and a size over the same range.
//!
//! Runs compose by concatenation. Every span of an appended run is shifted by
//! the byte length of everything before it, so a child's styling survives
//! being folded into its parent's text.
//!
//! # Examples
//!
//! ```
//! use chanspan_markup::{Color, Style, StyledText};
//!
//! let red = StyledText::styled("red", Style::Foreground(Color::rgb(255, 0, 0)));
//! let text: StyledText = [StyledText::plain("a "), red].into_iter().collect();
//!
//! assert_eq!(text.text(), "a red");
//! assert_eq!(text.spans()[0].range(), 2..5);
//! ```
use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

/// An ARGB colour packed as `0xAARRGGBB`.
///
/// Serialized as a `#rrggbb` (opaque) or `#aarrggbb` string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
  pub const BLACK: Self = Self(0xff00_0000);
  pub const WHITE: Self = Self(0xffff_ffff);

  /// An opaque colour from its channels.
  #[must_use]
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self(0xff00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
  }

  /// Parse `#rgb`, `#rrggbb` or `#aarrggbb`. The leading `#` is optional.
  #[must_use]
  pub fn parse(value: &str) -> Option<Self> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
      return None;
    }

    match hex.len() {
      3 => {
        let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
        u32::from_str_radix(&expanded, 16)
          .ok()
          .map(|v| Self(0xff00_0000 | v))
      },
      6 => u32::from_str_radix(hex, 16).ok().map(|v| Self(0xff00_0000 | v)),
      8 => u32::from_str_radix(hex, 16).ok().map(Self),
      _ => None,
    }
  }

  #[must_use]
  pub const fn alpha(self) -> u8 {
    (self.0 >> 24) as u8
  }
}

impl Default for Color {
  fn default() -> Self {
    Self::BLACK
  }
}

impl fmt::Debug for Color {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Color({self})")
  }
}

impl fmt::Display for Color {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.alpha() == 0xff {
      write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    } else {
      write!(f, "#{:08x}", self.0)
    }
  }
}

impl TryFrom<String> for Color {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value).ok_or_else(|| format!("invalid colour `{value}`"))
  }
}

impl From<Color> for String {
  fn from(color: Color) -> Self {
    color.to_string()
  }
}

/// A single visual attribute that can be applied to a range of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Style {
  /// Text colour.
  Foreground(Color),
  /// Highlight behind the text.
  Background(Color),
  /// Absolute text size, in scale-independent pixels.
  AbsoluteSize(u32),
  /// The range links to the given URL.
  Link(String),
}

/// A [`Style`] over the byte range `start..end` of its owning text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
  pub start: usize,
  pub end:   usize,
  pub style: Style,
}

impl Span {
  #[must_use]
  pub const fn range(&self) -> Range<usize> {
    self.start..self.end
  }

  const fn shifted(mut self, offset: usize) -> Self {
    self.start += offset;
    self.end += offset;
    self
  }
}

/// Text with zero or more possibly overlapping styled ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledText {
  text:  String,
  spans: Vec<Span>,
}

impl StyledText {
  /// An empty run.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      text:  String::new(),
      spans: Vec::new(),
    }
  }

  /// A run without any styling.
  #[must_use]
  pub fn plain(text: impl Into<String>) -> Self {
    Self {
      text:  text.into(),
      spans: Vec::new(),
    }
  }

  /// A run with `style` applied over the whole text.
  #[must_use]
  pub fn styled(text: impl Into<String>, style: Style) -> Self {
    let mut run = Self::plain(text);
    run.apply_all(style);
    run
  }

  #[must_use]
  pub fn text(&self) -> &str {
    &self.text
  }

  #[must_use]
  pub fn spans(&self) -> &[Span] {
    &self.spans
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.text.len()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  /// Apply `style` to `range`, clamped to the text. Empty ranges are ignored.
  pub fn apply(&mut self, style: Style, range: Range<usize>) {
    let end = range.end.min(self.text.len());
    if range.start >= end {
      return;
    }
    self.spans.push(Span {
      start: range.start,
      end,
      style,
    });
  }

  /// Apply `style` over the whole text.
  pub fn apply_all(&mut self, style: Style) {
    self.apply(style, 0..self.text.len());
  }

  /// Styles covering the byte at `offset`, in application order.
  pub fn styles_at(&self, offset: usize) -> impl Iterator<Item = &Style> {
    self
      .spans
      .iter()
      .filter(move |span| span.range().contains(&offset))
      .map(|span| &span.style)
  }

  /// Append unstyled text.
  pub fn push_str(&mut self, text: &str) {
    self.text.push_str(text);
  }

  /// Append another run, shifting its spans past the current end.
  pub fn push(&mut self, other: &Self) {
    let offset = self.text.len();
    self.text.push_str(&other.text);
    self
      .spans
      .extend(other.spans.iter().cloned().map(|span| span.shifted(offset)));
  }

  /// Append another run by value, reusing its span allocation.
  pub fn append(&mut self, other: Self) {
    if self.is_empty() && self.spans.is_empty() {
      *self = other;
      return;
    }
    let offset = self.text.len();
    self.text.push_str(&other.text);
    self
      .spans
      .extend(other.spans.into_iter().map(|span| span.shifted(offset)));
  }

  /// Join runs with `separator` between each pair.
  #[must_use]
  pub fn join<I>(parts: I, separator: &str) -> Self
  where
    I: IntoIterator<Item = Self>,
  {
    let mut joined = Self::new();
    for (i, part) in parts.into_iter().enumerate() {
      if i > 0 {
        joined.push_str(separator);
      }
      joined.append(part);
    }
    joined
  }

  #[must_use]
  pub fn into_parts(self) -> (String, Vec<Span>) {
    (self.text, self.spans)
  }
}

impl FromIterator<Self> for StyledText {
  fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
    let mut text = Self::new();
    text.extend(iter);
    text
  }
}

impl Extend<Self> for StyledText {
  fn extend<I: IntoIterator<Item = Self>>(&mut self, iter: I) {
    for run in iter {
      self.append(run);
    }
  }
}

impl From<&str> for StyledText {
  fn from(text: &str) -> Self {
    Self::plain(text)
  }
}

impl From<String> for StyledText {
  fn from(text: String) -> Self {
    Self::plain(text)
  }
}

impl fmt::Display for StyledText {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}
