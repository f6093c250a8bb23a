//! Link detection inside text runs.
use std::sync::LazyLock;

use regex::Regex;

use crate::{
  post::PostBuilder,
  styled::{Style, StyledText},
  theme::Theme,
  utils::never_matching_regex,
};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?i)\bhttps?://[^\s<>"]+"#).unwrap_or_else(|e| {
    log::error!("Failed to compile URL_PATTERN regex: {e}");
    never_matching_regex()
  })
});

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] =
  &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

/// Marks sub-ranges of a text run as links.
pub trait LinkDetector: Send + Sync {
  /// Annotate links in `target` in place. The text itself must not change.
  fn detect_links(
    &self,
    theme: &Theme,
    post: &mut PostBuilder,
    target: &mut StyledText,
  );
}

/// Detects bare `http://` and `https://` URLs.
///
/// Each URL gets a [`Style::Link`] and the theme's link colour, and is
/// recorded on the post.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlLinkDetector;

impl LinkDetector for UrlLinkDetector {
  fn detect_links(
    &self,
    theme: &Theme,
    post: &mut PostBuilder,
    target: &mut StyledText,
  ) {
    let found: Vec<(usize, usize)> = URL_PATTERN
      .find_iter(target.text())
      .filter_map(|m| {
        let url = trim_trailing_punctuation(m.as_str());
        url
          .contains("://")
          .then(|| (m.start(), m.start() + url.len()))
          .filter(|(start, end)| {
            target.text()[*start..*end]
              .split_once("://")
              .is_some_and(|(_, host)| !host.is_empty())
          })
      })
      .collect();

    for (start, end) in found {
      let url = target.text()[start..end].to_string();
      log::trace!("Detected link {url} in post /{}/{}", post.board, post.no);
      post.add_link(&url);
      target.apply(Style::Foreground(theme.link_color), start..end);
      target.apply(Style::Link(url), start..end);
    }
  }
}

/// Strip sentence punctuation from the end of a URL, keeping a closing
/// parenthesis that balances one inside it.
fn trim_trailing_punctuation(url: &str) -> &str {
  let mut url = url;
  while let Some(last) = url.chars().last() {
    if !TRAILING_PUNCTUATION.contains(&last) {
      break;
    }
    if last == ')' && url.matches('(').count() >= url.matches(')').count() {
      break;
    }
    url = &url[..url.len() - last.len_utf8()];
  }
  url
}
