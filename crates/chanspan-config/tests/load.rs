#![allow(clippy::expect_used, reason = "Expect is acceptable in tests")]

use std::fs;

use chanspan_config::{Config, ConfigFormat};
use chanspan_markup::Color;
use tempfile::tempdir;

#[test]
fn test_load_without_files_is_default() {
  let config = Config::load(&[], &[]).expect("load");
  assert_eq!(config, Config::default());
}

#[test]
fn test_later_files_override_earlier_ones() {
  let temp_dir = tempdir().expect("tempdir");
  let base = temp_dir.path().join("base.toml");
  let extra = temp_dir.path().join("extra.json");

  fs::write(
    &base,
    "[parser]\nanonymize = true\nfont_size = 12\n\n[theme]\nname_color = \
     \"#010203\"\n",
  )
  .expect("write base");
  fs::write(&extra, r#"{"parser": {"font_size": 18}}"#).expect("write extra");

  let config = Config::load(&[base, extra], &[]).expect("load");

  assert!(config.parser.anonymize);
  assert_eq!(config.parser.font_size, 18);
  assert_eq!(config.parser.details_size(), 14);
  assert_eq!(config.theme.name_color, Color::rgb(1, 2, 3));
  assert!(!config.parser.enable_emoji);
}

#[test]
fn test_overrides_apply_last() {
  let temp_dir = tempdir().expect("tempdir");
  let path = temp_dir.path().join("chanspan.toml");
  fs::write(&path, "[parser]\nenable_emoji = false\n").expect("write");

  let config = Config::load(&[path], &[
    "parser.enable_emoji=true".to_string(),
    "theme.spoiler_color=#222222".to_string(),
  ])
  .expect("load");

  assert!(config.parser.enable_emoji);
  assert_eq!(config.theme.spoiler_color, Color::rgb(0x22, 0x22, 0x22));
}

#[test]
fn test_invalid_values_are_errors() {
  let temp_dir = tempdir().expect("tempdir");
  let path = temp_dir.path().join("bad.toml");
  fs::write(&path, "[theme]\nquote_color = \"green\"\n").expect("write");

  assert!(Config::load(&[path], &[]).is_err());
  assert!(Config::load(&[], &["parser.font_size=big".to_string()]).is_err());
  assert!(Config::load(&[], &["nonsense=1".to_string()]).is_err());
}

#[test]
fn test_unsupported_extension() {
  let temp_dir = tempdir().expect("tempdir");
  let path = temp_dir.path().join("config.yaml");
  fs::write(&path, "parser: {}").expect("write");

  assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_write_default_round_trips() {
  let temp_dir = tempdir().expect("tempdir");

  for format in [ConfigFormat::Toml, ConfigFormat::Json] {
    let path = temp_dir.path().join(format!("chanspan.{format}"));
    Config::write_default(format, &path, false).expect("write default");

    assert!(Config::write_default(format, &path, false).is_err());
    Config::write_default(format, &path, true).expect("force overwrite");

    let loaded = Config::from_file(&path).expect("load default");
    assert_eq!(loaded, Config::default());
  }
}
