//! # chanspan-markup
//!
//! Turns imageboard comment HTML into styled text runs, ready to be handed to
//! whatever draws them.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use chanspan_markup::{ParserSettings, PostBuilder, PostParser, StandardRules, Style};
//!
//! let parser = PostParser::new(Arc::new(StandardRules), ParserSettings::default());
//! let post = PostBuilder::new("g", 42)
//!   .name("Anonymous")
//!   .tripcode("!Ep8pui8Vw2")
//!   .comment("see https://example.com/cat.png<br>neat");
//!
//! let post = parser.parse(None, post)?;
//!
//! assert_eq!(post.comment.text(), "see https://example.com/cat.png\nneat");
//! assert!(post.comment.spans().iter().any(|s| matches!(s.style, Style::Link(_))));
//! assert_eq!(post.author_line.text(), "!Ep8pui8Vw2");
//! assert_eq!(post.images.len(), 1);
//! # Ok::<(), chanspan_markup::RegistryError>(())
//! ```
//!
//! ## Pieces
//!
//! - [`fragment`]: HTML fragment parsing and node helpers
//! - [`walker`]: the recursive node walker
//! - [`rules`]: the [`RuleSet`] trait and the bundled rule sets
//! - [`registry`]: per-archive rule set lookup
//! - [`emoji`]: shortcode substitution that skips `[math]` blocks
//! - [`author`]: subject and author line
//! - [`parser`]: [`PostParser`], the entry point
//!
//! ## Archives
//!
//! Posts fetched from an archive may use a different markup dialect. Register
//! a [`RuleSet`] for the archive and set [`PostBuilder::archive()`]:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use chanspan_markup::{
//!   ArchiveDescriptor, ParserSettings, PassthroughRules, PostBuilder, PostParser,
//!   StandardRules,
//! };
//!
//! let parser = PostParser::new(Arc::new(StandardRules), ParserSettings::default());
//! let archive = ArchiveDescriptor::new("archive.example.org");
//! parser.add_archive_rules(archive.clone(), Arc::new(PassthroughRules))?;
//!
//! let post = PostBuilder::new("g", 1).comment("a<br>b").archive(archive);
//! assert_eq!(parser.parse(None, post)?.comment.text(), "ab");
//! # Ok::<(), chanspan_markup::RegistryError>(())
//! ```

pub mod author;
pub mod emoji;
mod error;
pub mod fragment;
pub mod images;
pub mod links;
pub mod parser;
pub mod post;
pub mod registry;
pub mod rules;
mod settings;
pub mod styled;
mod theme;
pub mod utils;
pub mod walker;

pub use crate::{
  error::RegistryError,
  images::{ImageExtractor, LinkedImageExtractor},
  links::{LinkDetector, UrlLinkDetector},
  parser::PostParser,
  post::{ArchiveDescriptor, Post, PostBuilder, PostImage},
  registry::RuleRegistry,
  rules::{PassthroughRules, RuleSet, StandardRules},
  settings::ParserSettings,
  styled::{Color, Span, Style, StyledText},
  theme::Theme,
  walker::RenderContext,
};
