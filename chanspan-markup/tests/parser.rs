#![allow(clippy::expect_used, reason = "Expect is acceptable in tests")]
#![allow(clippy::panic, reason = "Rules under test panic on purpose")]

use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use chanspan_markup::{
  ArchiveDescriptor,
  Color,
  ParserSettings,
  PassthroughRules,
  PostBuilder,
  PostParser,
  RegistryError,
  RenderContext,
  RuleSet,
  StandardRules,
  Style,
  StyledText,
  Theme,
};
use kuchikikiki::NodeRef;

fn parser() -> PostParser {
  PostParser::new(Arc::new(StandardRules), ParserSettings::default())
}

/// Upper-cases `b` and panics on `marquee`.
struct ShoutingRules;

impl RuleSet for ShoutingRules {
  fn handle_tag(
    &self,
    _ctx: &RenderContext<'_>,
    tag: &str,
    text: &StyledText,
    _post: &mut PostBuilder,
    _element: &NodeRef,
  ) -> Option<StyledText> {
    match tag {
      "b" => Some(StyledText::plain(text.text().to_uppercase())),
      "marquee" => panic!("marquee is not supported"),
      _ => None,
    }
  }
}

#[test]
fn test_empty_comment_keeps_author_line() {
  let post = PostBuilder::new("g", 1).name("op").tripcode("!trip");

  let parsed = parser().parse(None, post).expect("parse");

  assert!(parsed.comment.is_empty());
  assert!(parsed.comment.spans().is_empty());
  assert_eq!(parsed.author_line.text(), "op !trip");
}

#[test]
fn test_entities_decoded_in_name_and_subject() {
  let post = PostBuilder::new("g", 1)
    .name("Tom &amp; Jerry")
    .subject("&quot;Rust&quot; &gt; C");

  let parsed = parser().parse(None, post).expect("parse");

  assert_eq!(parsed.name, "Tom & Jerry");
  assert_eq!(parsed.subject.text(), "\"Rust\" > C");
  assert_eq!(parsed.author_line.text(), "Tom & Jerry");
}

#[test]
fn test_anonymized_author_line() {
  let settings = ParserSettings {
    anonymize: true,
    show_anonymous_name: true,
    ..ParserSettings::default()
  };
  let parser = PostParser::new(Arc::new(StandardRules), settings);
  let post = PostBuilder::new("g", 1)
    .name("John")
    .tripcode("!abc")
    .moderator_capcode("Mod");

  let parsed = parser.parse(None, post).expect("parse");

  assert_eq!(parsed.author_line.text(), "Anonymous Capcode: Mod");
  assert_eq!(parsed.name, "Anonymous");
}

#[test]
fn test_comment_markup() {
  let theme = Theme {
    quote_color: Color::rgb(1, 2, 3),
    ..Theme::default()
  };
  let post = PostBuilder::new("g", 1).comment(concat!(
    r##"<a href="#p123" class="quotelink">&gt;&gt;123</a><br>"##,
    r#"<span class="quote">&gt;tfw</span><br>"#,
    "<s>secret</s> ok"
  ));

  let parsed = parser().parse(Some(&theme), post).expect("parse");
  let comment = parsed.comment;

  assert_eq!(comment.text(), ">>123\n>tfw\nsecret ok");
  assert!(comment.styles_at(0).any(|s| *s == Style::Link("#p123".into())));
  assert!(comment.styles_at(0).any(|s| *s == Style::Foreground(theme.quote_color)));
  assert!(comment.styles_at(6).any(|s| *s == Style::Foreground(theme.quote_color)));
  assert!(
    comment
      .styles_at(11)
      .any(|s| *s == Style::Background(theme.spoiler_color))
  );
  // Fragment links are not collected as post links.
  assert!(parsed.links.is_empty());
}

#[test]
fn test_styled_div_dispatches_with_suffix() {
  let post = PostBuilder::new("g", 1)
    .comment(r#"<div style="color:#ff0000;font-size:12px">red</div>"#);

  let parsed = parser().parse(None, post).expect("parse");

  assert_eq!(parsed.comment.text(), "red");
  assert_eq!(
    parsed.comment.spans()[0].style,
    Style::Foreground(Color::rgb(255, 0, 0))
  );
}

#[test]
fn test_archive_rules_selected_per_post() {
  let parser = parser();
  let archive = ArchiveDescriptor::new("archive.example.org");
  parser
    .add_archive_rules(archive.clone(), Arc::new(ShoutingRules))
    .expect("register");

  let site = PostBuilder::new("g", 1).comment("<b>hi</b><br>there");
  let archived = site.clone().archive(archive);

  let site = parser.parse(None, site).expect("parse site post");
  let archived = parser.parse(None, archived).expect("parse archived post");

  assert_eq!(site.comment.text(), "hi\nthere");
  assert_eq!(archived.comment.text(), "HIthere");
}

#[test]
fn test_unregistered_archive_fails() {
  let archive = ArchiveDescriptor::new("unknown.example.org");
  let post = PostBuilder::new("g", 1).comment("x").archive(archive.clone());

  let result = parser().parse(None, post);

  assert_eq!(result.err(), Some(RegistryError::Unregistered(archive)));
}

#[test]
fn test_duplicate_archive_registration_fails() {
  let parser = parser();
  let archive = ArchiveDescriptor::new("archive.example.org");

  assert!(
    parser
      .add_archive_rules(archive.clone(), Arc::new(PassthroughRules))
      .is_ok()
  );
  assert_eq!(
    parser.add_archive_rules(archive.clone(), Arc::new(StandardRules)),
    Err(RegistryError::Duplicate(archive))
  );
}

#[test]
fn test_failing_rules_degrade_to_empty_comment() {
  let parser =
    PostParser::new(Arc::new(ShoutingRules), ParserSettings::default());
  let post = PostBuilder::new("g", 9)
    .name("still here")
    .subject("topic")
    .comment("https://example.com/a.png <marquee>boom</marquee>");

  let parsed = parser.parse(None, post).expect("parse");

  assert!(parsed.comment.is_empty());
  assert!(parsed.links.is_empty());
  assert!(parsed.images.is_empty());
  assert_eq!(parsed.author_line.text(), "still here");
  assert_eq!(parsed.subject.text(), "topic");
}

#[test]
fn test_linked_images_collected() {
  let post = PostBuilder::new("g", 1).comment(concat!(
    "https://example.com/a.jpg https://example.com/a.jpg ",
    r#"<a href="https://example.com/b.png">pic</a> https://example.com/page"#
  ));

  let parsed = parser().parse(None, post).expect("parse");

  let names: Vec<&str> =
    parsed.images.iter().map(|i| i.filename.as_str()).collect();
  assert_eq!(names, vec!["a", "b"]);
  assert_eq!(parsed.links.len(), 3);
}

#[test]
fn test_images_disabled() {
  let settings = ParserSettings {
    parse_post_images: false,
    ..ParserSettings::default()
  };
  let parser = PostParser::new(Arc::new(StandardRules), settings);
  let post = PostBuilder::new("g", 1).comment("https://example.com/a.jpg");

  let parsed = parser.parse(None, post).expect("parse");
  assert!(parsed.images.is_empty());
  assert_eq!(parsed.links.len(), 1);
}

#[test]
fn test_emoji_in_comment() {
  let settings = ParserSettings {
    enable_emoji: true,
    ..ParserSettings::default()
  };
  let parser = PostParser::new(Arc::new(StandardRules), settings);
  let post = PostBuilder::new("sci", 1)
    .comment("proof :+1:<br>[math]:+1:[/math] and [eqn]:+1:[/eqn]");

  let parsed = parser.parse(None, post).expect("parse");

  assert_eq!(
    parsed.comment.text(),
    "proof 👍\n[math]:+1:[/math] and [eqn]:+1:[/eqn]"
  );
}

#[test]
fn test_concurrent_parsing_and_registration() {
  use rayon::prelude::*;

  struct CountingRules(AtomicUsize);

  impl RuleSet for CountingRules {
    fn handle_tag(
      &self,
      _ctx: &RenderContext<'_>,
      _tag: &str,
      _text: &StyledText,
      _post: &mut PostBuilder,
      _element: &NodeRef,
    ) -> Option<StyledText> {
      self.0.fetch_add(1, Ordering::Relaxed);
      None
    }
  }

  let parser = parser();
  let counting = Arc::new(CountingRules(AtomicUsize::new(0)));
  let archives: Vec<ArchiveDescriptor> = (0..8)
    .map(|i| ArchiveDescriptor::new(format!("archive{i}.example.org")))
    .collect();

  archives.par_iter().for_each(|archive| {
    parser
      .add_archive_rules(archive.clone(), Arc::clone(&counting) as Arc<dyn RuleSet>)
      .expect("register");
  });

  let posts: Vec<PostBuilder> = (0..64)
    .map(|no| {
      PostBuilder::new("g", no)
        .comment(format!("<i>post {no}</i>"))
        .archive(archives[no as usize % archives.len()].clone())
    })
    .collect();

  let parsed: Vec<String> = posts
    .into_par_iter()
    .map(|post| {
      parser
        .parse(None, post)
        .expect("parse")
        .comment
        .text()
        .to_string()
    })
    .collect();

  assert_eq!(parser.registry().len(), 8);
  assert_eq!(counting.0.load(Ordering::Relaxed), 64);
  assert_eq!(parsed[5], "post 5");
}

#[test]
fn test_json_post_in_json_spans_out() {
  let post: PostBuilder = serde_json::from_str(
    r##"{
      "board": "g",
      "no": 7,
      "name": "op",
      "poster_id": "deadbeef",
      "id_color": "#ffffff",
      "is_light_color": true,
      "comment": "<s>secret</s>"
    }"##,
  )
  .expect("post decodes");

  let parsed = parser().parse(None, post).expect("parse");
  let json = serde_json::to_value(&parsed).expect("post encodes");

  assert_eq!(json["comment"]["text"], "secret");
  assert_eq!(json["comment"]["spans"][0]["start"], 0);
  assert_eq!(json["comment"]["spans"][0]["end"], 6);
  assert_eq!(json["comment"]["spans"][0]["style"]["kind"], "background");
  assert_eq!(
    json["comment"]["spans"][0]["style"]["value"],
    Theme::default().spoiler_color.to_string()
  );
  assert_eq!(json["author_line"]["text"], "op   ID: deadbeef  ");
  assert!(json["archive"].is_null());
}
