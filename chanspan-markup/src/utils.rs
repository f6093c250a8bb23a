/// A regex that never matches, used when a built-in pattern fails to compile.
#[must_use]
pub fn never_matching_regex() -> regex::Regex {
  // Asserts something impossible, so it can never match.
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  regex::Regex::new(r"[^\s\S]")
    .expect("regex pattern [^\\s\\S] should always compile")
}
