use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ammonia::Builder;
use regex::Regex;

/// Tags an article body may keep.
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "strong", "em", "a", "ul", "ol", "li",
    "blockquote", "code", "pre", "br", "span", "div", "img",
];

/// Attributes any retained tag may keep. `data-*` is never allowed.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "target", "rel", "src", "alt", "class", "id"];

/// URL schemes accepted in `href` and `src`. Relative URLs pass through.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Elements removed together with everything inside them.
const STRIPPED_WITH_CONTENT: &[&str] = &["script", "style"];

/// Open-element depth above which markup is dropped and only text is kept.
/// Parse time grows with nesting much faster than with length.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Elements that never hold children and so never add depth.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("static tag pattern"));

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b.*?</(?:script|style)\s*>").expect("static script pattern")
});

/// Allow-list sanitizer for author-submitted article HTML.
///
/// Runs on every render; the output is never stored, so the policy above can
/// change without touching existing rows.
///
/// Note:
/// 1. Disallowed tags are unwrapped (their text survives), except `script`
///    and `style` which are dropped with their content.
/// 2. Event handlers, `data-*` attributes and non-allow-listed URL schemes
///    (`javascript:` included) are removed.
/// 3. Input above `max_input_bytes` is cut at a char boundary before parsing.
/// 4. Input nested deeper than [`MAX_NESTING_DEPTH`] loses its markup; the
///    text is still cleaned and returned.
/// 5. The cleaner runs until its output stops changing, so a second pass is a
///    no-op (the parser eats one leading newline of `<pre>` per pass).
#[derive(Debug, Clone, Copy)]
pub struct ContentSanitizer {
    max_input_bytes: usize,
}

impl ContentSanitizer {
    pub fn new(max_input_bytes: usize) -> Self {
        Self { max_input_bytes }
    }

    /// Cleans `raw_html`. Never fails; fully disallowed input yields `""`.
    pub fn sanitize(&self, raw_html: &str) -> String {
        let input = truncate_to_char_boundary(raw_html, self.max_input_bytes);
        if input.len() < raw_html.len() {
            tracing::warn!(
                original_len = raw_html.len(),
                kept_len = input.len(),
                "Article body truncated before sanitizing"
            );
        }

        if exceeds_nesting(input, MAX_NESTING_DEPTH) {
            tracing::warn!(
                len = input.len(),
                "Article body nested too deeply, rendering text only"
            );
            let without_code = SCRIPT_OR_STYLE.replace_all(input, "");
            let text = TAG.replace_all(&without_code, " ");
            return clean_until_stable(&text);
        }

        clean_until_stable(input)
    }

    pub fn max_input_bytes(&self) -> usize {
        self.max_input_bytes
    }
}

impl Default for ContentSanitizer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SANITIZE_MAX_INPUT_BYTES)
    }
}

fn policy() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .clean_content_tags(STRIPPED_WITH_CONTENT.iter().copied().collect())
        .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect())
        .tag_attributes(HashMap::new())
        .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect::<HashSet<_>>())
        // Authors may set `rel` themselves; ammonia refuses both at once.
        .link_rel(None)
        .strip_comments(true);
    builder
}

fn clean_until_stable(input: &str) -> String {
    let policy = policy();
    let mut current = policy.clean(input).to_string();
    loop {
        let next = policy.clean(&current).to_string();
        // Each pass only removes characters; one that does not shrink ends the loop.
        if next == current || next.len() >= current.len() {
            return current;
        }
        current = next;
    }
}

/// Linear scan over start and end tags. Stops as soon as `limit` is passed.
fn exceeds_nesting(html: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    for caps in TAG.captures_iter(html) {
        let name = caps[2].to_ascii_lowercase();
        if VOID_ELEMENTS.contains(&name.as_str()) {
            continue;
        }
        if caps[1].is_empty() {
            depth += 1;
            if depth > limit {
                return true;
            }
        } else {
            depth = depth.saturating_sub(1);
        }
    }
    false
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }
    let mut end = max_bytes;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}
