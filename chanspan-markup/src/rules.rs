//! Per-tag transformation rules.
//!
//! A [`RuleSet`] is asked, for every element, to turn the already rendered
//! children of that element into the element's own contribution. Rule sets are
//! selected per post through the [`crate::RuleRegistry`], so an archive with
//! its own markup dialect can bring its own rules.
use kuchikikiki::{ElementData, NodeRef};

use crate::{
  fragment,
  post::PostBuilder,
  styled::{Color, Style, StyledText},
  walker::RenderContext,
};

/// Tag handling for one markup dialect.
pub trait RuleSet: Send + Sync {
  /// Transform the rendered children of `element`.
  ///
  /// `tag` is the element's tag name, possibly extended with an inline style
  /// value (see [`fragment::effective_tag`]). Returning `None` means no
  /// opinion: the children are used unchanged.
  fn handle_tag(
    &self,
    ctx: &RenderContext<'_>,
    tag: &str,
    text: &StyledText,
    post: &mut PostBuilder,
    element: &NodeRef,
  ) -> Option<StyledText>;
}

/// Rules that never have an opinion; comments render as their plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRules;

impl RuleSet for PassthroughRules {
  fn handle_tag(
    &self,
    _ctx: &RenderContext<'_>,
    _tag: &str,
    _text: &StyledText,
    _post: &mut PostBuilder,
    _element: &NodeRef,
  ) -> Option<StyledText> {
    None
  }
}

/// Rules for the common imageboard comment markup.
///
/// | Markup                         | Result                         |
/// | ------------------------------ | ------------------------------ |
/// | `br`                           | newline                        |
/// | `p`, `pre`                     | children followed by a newline |
/// | `a href`                       | link + link colour             |
/// | `a.quotelink`, `a href="#p.."` | link + quote colour            |
/// | `span.quote`                   | quote colour (greentext)       |
/// | `span style="color:#..."`      | that colour                    |
/// | `s`                            | spoiler highlight              |
/// | `<tag>-#rrggbb` (styled tags)  | that colour                    |
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl RuleSet for StandardRules {
  fn handle_tag(
    &self,
    ctx: &RenderContext<'_>,
    tag: &str,
    text: &StyledText,
    post: &mut PostBuilder,
    element: &NodeRef,
  ) -> Option<StyledText> {
    let element = element.as_element()?;

    match tag {
      "br" => Some(StyledText::plain("\n")),
      "p" | "pre" => {
        let mut block = text.clone();
        block.push_str("\n");
        Some(block)
      },
      "a" => {
        let href = fragment::attribute(element, "href")?;
        if is_absolute_url(&href) {
          post.add_link(&href);
        }
        let color = if is_quote_link(element, &href, text) {
          ctx.theme.quote_color
        } else {
          ctx.theme.link_color
        };
        let mut link = colored(text, color);
        link.apply_all(Style::Link(href));
        Some(link)
      },
      "span" => {
        let color = if fragment::has_class(element, "quote") {
          Some(ctx.theme.quote_color)
        } else {
          fragment::attribute(element, "style")
            .as_deref()
            .and_then(inline_color)
        };
        color.map(|color| colored(text, color))
      },
      "s" => {
        let mut spoiler = text.clone();
        spoiler.apply_all(Style::Background(ctx.theme.spoiler_color));
        Some(spoiler)
      },
      _ => {
        let (_, value) = tag.split_once('-')?;
        value
          .starts_with('#')
          .then(|| Color::parse(value))
          .flatten()
          .map(|color| colored(text, color))
      },
    }
  }
}

fn colored(text: &StyledText, color: Color) -> StyledText {
  let mut colored = text.clone();
  colored.apply_all(Style::Foreground(color));
  colored
}

/// Post references: `>>123` style anchors and in-thread `#p123` fragments.
fn is_quote_link(element: &ElementData, href: &str, text: &StyledText) -> bool {
  fragment::has_class(element, "quotelink")
    || href.starts_with("#p")
    || text.text().starts_with(">>")
}

fn is_absolute_url(href: &str) -> bool {
  href.starts_with("http://") || href.starts_with("https://")
}

/// The `color` declaration of an inline style, if it is a hex colour.
fn inline_color(style: &str) -> Option<Color> {
  style.split(';').find_map(|declaration| {
    let (name, value) = declaration.split_once(':')?;
    name
      .trim()
      .eq_ignore_ascii_case("color")
      .then(|| Color::parse(value))
      .flatten()
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    links::UrlLinkDetector,
    settings::ParserSettings,
    theme::Theme,
    walker,
  };

  #[test]
  fn test_inline_color() {
    assert_eq!(
      inline_color("font-weight: bold; color: #ff0000"),
      Some(Color::rgb(255, 0, 0))
    );
    assert_eq!(inline_color("color: red"), None);
    assert_eq!(inline_color("background:#fff"), None);
  }

  #[test]
  fn test_quote_links_use_quote_colour() {
    let theme = Theme::default();
    let settings = ParserSettings::default();
    let ctx = RenderContext {
      theme:    &theme,
      settings: &settings,
      links:    &UrlLinkDetector,
    };
    let mut post = PostBuilder::new("g", 1);
    let body =
      fragment::parse_fragment(r#"<a href="/g/thread/5#p6">&gt;&gt;6</a>"#);
    let text = walker::render_children(&ctx, &StandardRules, &mut post, &body);

    assert_eq!(text.text(), ">>6");
    assert_eq!(text.spans()[0].style, Style::Foreground(theme.quote_color));
    assert_eq!(text.spans()[1].style, Style::Link("/g/thread/5#p6".into()));
    assert!(post.links.is_empty());
  }

  #[test]
  fn test_absolute_url() {
    assert!(is_absolute_url("https://example.com/a.png"));
    assert!(!is_absolute_url("#p12345"));
    assert!(!is_absolute_url("/g/thread/1"));
  }
}
