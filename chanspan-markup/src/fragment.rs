//! Comment HTML as a tree of text and element nodes.
//!
//! Parsing goes through html5ever (via `kuchikikiki`), which never fails: any
//! input produces some tree, in the worst case a single text node. Nodes keep
//! weak links to their parents, which the walker only reads.
use kuchikikiki::{ElementData, NodeData, NodeRef};
use markup5ever::local_name;
use tendril::TendrilSink;

/// Class marking a code block; text directly inside it is never
/// emoji-substituted.
pub const PREFORMATTED_CLASS: &str = "prettyprint";

/// Word-break hints carry no content and split words across text nodes.
const WORD_BREAK: &str = "<wbr>";

/// The node kinds the walker distinguishes.
#[derive(Debug)]
pub enum FragmentNode<'a> {
  Text(String),
  Element(&'a ElementData),
  /// Comments, doctypes and anything else without display content.
  Other(&'static str),
}

/// Parse a comment body and return the node whose children are its content.
#[must_use]
pub fn parse_fragment(html: &str) -> NodeRef {
  let html = html.replace(WORD_BREAK, "");
  let document = kuchikikiki::parse_html().one(html);

  match document.select_first("body") {
    Ok(body) => body.as_node().clone(),
    Err(()) => {
      log::debug!("Parsed fragment has no body, walking the document root");
      document
    },
  }
}

/// Classify a node for the walker.
#[must_use]
pub fn classify(node: &NodeRef) -> FragmentNode<'_> {
  match node.data() {
    NodeData::Text(text) => FragmentNode::Text(text.borrow().clone()),
    NodeData::Element(element) => FragmentNode::Element(element),
    NodeData::Comment(_) => FragmentNode::Other("comment"),
    NodeData::ProcessingInstruction(_) => {
      FragmentNode::Other("processing instruction")
    },
    NodeData::Doctype(_) => FragmentNode::Other("doctype"),
    NodeData::Document(_) => FragmentNode::Other("document"),
    NodeData::DocumentFragment => FragmentNode::Other("document fragment"),
  }
}

/// Look up an attribute. Names are matched case-insensitively.
#[must_use]
pub fn attribute(element: &ElementData, name: &str) -> Option<String> {
  element
    .attributes
    .borrow()
    .get(name.to_ascii_lowercase().as_str())
    .map(str::to_string)
}

#[must_use]
pub fn has_class(element: &ElementData, class: &str) -> bool {
  attribute(element, "class")
    .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
}

/// Whether the node's parent is an element carrying `class`.
#[must_use]
pub fn parent_has_class(node: &NodeRef, class: &str) -> bool {
  node
    .parent()
    .is_some_and(|parent| parent.as_element().is_some_and(|e| has_class(e, class)))
}

/// Whether the node sits inside an `<a>` element.
#[must_use]
pub fn inside_anchor(node: &NodeRef) -> bool {
  node.ancestors().any(|ancestor| {
    ancestor
      .as_element()
      .is_some_and(|e| e.name.local == local_name!("a"))
  })
}

/// Value of the first declaration of an inline `style` attribute.
///
/// `color:red;font-size:12px` yields `red`. Declarations without a value yield
/// `None`.
#[must_use]
pub fn style_suffix(style: &str) -> Option<&str> {
  let (_, rest) = style.split_once(':')?;
  let value = rest.split([';', ':']).next()?.trim();
  (!value.is_empty()).then_some(value)
}

/// The key rule sets dispatch on.
///
/// This is the tag name, except that an element other than `span` with an
/// inline style gets its first style value appended: `<div style="color:red">`
/// becomes `div-red`.
#[must_use]
pub fn effective_tag(element: &ElementData) -> String {
  let tag: &str = element.name.local.as_ref();

  if element.name.local != local_name!("span") {
    if let Some(style) = attribute(element, "style") {
      if let Some(value) = style_suffix(&style) {
        return format!("{tag}-{value}");
      }
    }
  }

  tag.to_string()
}
