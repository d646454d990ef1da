// src/utils/authoring.rs

use std::sync::LazyLock;

use regex::Regex;

/// Assumed reading speed used for `read_time`.
pub const WORDS_PER_MINUTE: usize = 200;

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("static slug pattern"));

/// Lowercases `title` and collapses every non-alphanumeric run into one `-`,
/// trimming separators at both ends.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_ALPHANUMERIC_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Slug with a uniqueness token appended, e.g. `hello-world-1718000000000`.
pub fn unique_slug(title: &str, token: i64) -> String {
    let base = generate_slug(title);
    if base.is_empty() {
        format!("post-{}", token)
    } else {
        format!("{}-{}", base, token)
    }
}

/// Minutes to read `content`: whitespace-separated words over
/// `WORDS_PER_MINUTE`, rounded up, never below one.
pub fn estimate_read_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}
