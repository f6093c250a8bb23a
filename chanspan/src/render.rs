//! The `render` subcommand: JSON posts in, parsed posts out.
use std::{
  fs,
  io::{self, Read, Write},
  path::{Path, PathBuf},
  sync::Arc,
};

use chanspan_config::Config;
use chanspan_markup::{
  ArchiveDescriptor,
  Post,
  PostBuilder,
  PostParser,
  RuleSet,
  StandardRules,
};
use color_eyre::eyre::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;
use serde::Deserialize;

/// Options of a single `render` run.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
  /// Input JSON file, `-` for stdin.
  pub input:    PathBuf,
  /// Output file; stdout when unset.
  pub output:   Option<PathBuf>,
  /// Worker threads; the CPU count when unset.
  pub jobs:     Option<usize>,
  /// Archive domains to register with [`StandardRules`].
  pub archives: Vec<String>,
}

/// Posts are accepted either one at a time or as an array.
#[derive(Deserialize)]
#[serde(untagged)]
enum PostInput {
  Many(Vec<PostBuilder>),
  One(Box<PostBuilder>),
}

impl From<PostInput> for Vec<PostBuilder> {
  fn from(input: PostInput) -> Self {
    match input {
      PostInput::Many(posts) => posts,
      PostInput::One(post) => vec![*post],
    }
  }
}

/// Read and decode the posts in `input`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a post or an array
/// of posts.
pub fn read_posts(input: &Path) -> Result<Vec<PostBuilder>> {
  let content = if input == Path::new("-") {
    let mut buf = String::new();
    io::stdin()
      .read_to_string(&mut buf)
      .wrap_err("Failed to read posts from stdin")?;
    buf
  } else {
    fs::read_to_string(input)
      .wrap_err_with(|| format!("Failed to read {}", input.display()))?
  };

  let posts: PostInput = serde_json::from_str(&content)
    .wrap_err_with(|| format!("Invalid post JSON in {}", input.display()))?;
  Ok(posts.into())
}

/// Build a parser using [`StandardRules`] for site posts and for every archive
/// in `archives`.
///
/// # Errors
///
/// Returns an error if an archive is listed twice.
pub fn build_parser(config: &Config, archives: &[String]) -> Result<PostParser> {
  let rules: Arc<dyn RuleSet> = Arc::new(StandardRules);
  let parser = PostParser::new(Arc::clone(&rules), config.parser.clone());

  for archive in archives {
    parser
      .add_archive_rules(ArchiveDescriptor::new(archive.as_str()), Arc::clone(&rules))
      .wrap_err("Failed to register archive rules")?;
    debug!("Registered standard rules for archive {archive}");
  }

  Ok(parser)
}

/// Parse `posts` in parallel, keeping their order.
///
/// # Errors
///
/// Returns the first post that names an archive without registered rules.
pub fn parse_posts(
  parser: &PostParser,
  config: &Config,
  posts: Vec<PostBuilder>,
) -> Result<Vec<Post>> {
  let parsed = posts
    .into_par_iter()
    .map(|post| {
      let id = format!("/{}/{}", post.board, post.no);
      parser
        .parse(Some(&config.theme), post)
        .wrap_err_with(|| format!("Failed to parse post {id}"))
    })
    .collect::<Result<Vec<_>>>()?;

  Ok(parsed)
}

/// Run the `render` subcommand.
///
/// # Errors
///
/// Returns an error if reading, parsing or writing fails, or the thread pool
/// cannot be created.
pub fn run(config: &Config, options: &RenderOptions) -> Result<()> {
  let posts = read_posts(&options.input)?;
  let parser = build_parser(config, &options.archives)?;

  let thread_count = options.jobs.unwrap_or_else(num_cpus::get);
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build()
    .wrap_err("Failed to build thread pool")?;

  let total = posts.len();
  let parsed = pool.install(|| parse_posts(&parser, config, posts))?;
  info!("Parsed {total} posts on {thread_count} threads");

  let mut json = serde_json::to_string_pretty(&parsed)?;
  json.push('\n');

  match &options.output {
    Some(path) => {
      fs::write(path, json)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
      info!("Wrote parsed posts to {}", path.display());
    },
    None => {
      io::stdout()
        .lock()
        .write_all(json.as_bytes())
        .wrap_err("Failed to write to stdout")?;
    },
  }

  Ok(())
}
