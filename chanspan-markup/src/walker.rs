//! Depth-first rendering of a fragment tree into styled text.
//!
//! Every call returns an owned [`StyledText`]; a parent concatenates the runs
//! of its children (re-offsetting their spans) before its rule set sees them.
//! There is no accumulator shared across the recursion.
use kuchikikiki::NodeRef;
use log::{error, trace};

use crate::{
  emoji,
  fragment::{self, FragmentNode, PREFORMATTED_CLASS},
  links::LinkDetector,
  post::PostBuilder,
  rules::RuleSet,
  settings::ParserSettings,
  styled::StyledText,
  theme::Theme,
};

/// Everything a render pass reads but never changes.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
  pub theme:    &'a Theme,
  pub settings: &'a ParserSettings,
  pub links:    &'a dyn LinkDetector,
}

/// Render `node` and its subtree.
///
/// Returns `None` for nodes without display content, which callers skip.
pub fn render_node(
  ctx: &RenderContext<'_>,
  rules: &dyn RuleSet,
  post: &mut PostBuilder,
  node: &NodeRef,
) -> Option<StyledText> {
  match fragment::classify(node) {
    FragmentNode::Text(text) => Some(render_text(ctx, post, node, text)),
    FragmentNode::Element(element) => {
      let tag = fragment::effective_tag(element);
      let children = render_children(ctx, rules, post, node);

      trace!("Dispatching <{tag}> with {} bytes of text", children.len());
      Some(
        rules
          .handle_tag(ctx, &tag, &children, post, node)
          .unwrap_or(children),
      )
    },
    FragmentNode::Other(kind) => {
      error!(
        "Unknown node kind `{kind}` in post /{}/{}, skipping it",
        post.board, post.no
      );
      None
    },
  }
}

/// Render the children of `node` in document order and concatenate them.
pub fn render_children(
  ctx: &RenderContext<'_>,
  rules: &dyn RuleSet,
  post: &mut PostBuilder,
  node: &NodeRef,
) -> StyledText {
  node
    .children()
    .filter_map(|child| render_node(ctx, rules, post, &child))
    .collect()
}

fn render_text(
  ctx: &RenderContext<'_>,
  post: &mut PostBuilder,
  node: &NodeRef,
  text: String,
) -> StyledText {
  let text = if ctx.settings.enable_emoji
    && !fragment::parent_has_class(node, PREFORMATTED_CLASS)
    && !emoji::starts_protected(&text)
  {
    emoji::substitute(&text)
  } else {
    text
  };

  let mut styled = StyledText::plain(text);
  // Anchors style their own text as a link.
  if !fragment::inside_anchor(node) {
    ctx.links.detect_links(ctx.theme, post, &mut styled);
  }
  styled
}
