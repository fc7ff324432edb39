//! Minimal HTML scraping for the identity provider's login widgets

use once_cell::sync::Lazy;
use regex::Regex;

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute pattern is valid")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Attributes of a single start tag, names lowercased
fn attributes(tag: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(tag)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}

/// Find the first `<element>` whose `match_attr` equals `match_value` and
/// return its `want_attr`.
pub fn find_attribute(
    html: &str,
    element: &str,
    match_attr: &str,
    match_value: &str,
    want_attr: &str,
) -> Option<String> {
    let pattern = format!(r"(?is)<{}\b[^>]*>", regex::escape(element));
    let start_tag = Regex::new(&pattern).ok()?;

    start_tag.find_iter(html).find_map(|tag| {
        let attrs = attributes(tag.as_str());
        let matches = attrs
            .iter()
            .any(|(name, value)| name == match_attr && value == match_value);
        if !matches {
            return None;
        }
        attrs
            .into_iter()
            .find(|(name, _)| name == want_attr)
            .map(|(_, value)| value)
    })
}

/// Text content of the first element carrying `class_name` among its classes
pub fn find_text_by_class(html: &str, class_name: &str) -> Option<String> {
    let start_tag = Regex::new(r"(?is)<([a-z][a-z0-9]*)\b[^>]*>").ok()?;

    for caps in start_tag.captures_iter(html) {
        let whole = caps.get(0)?;
        let has_class = attributes(whole.as_str())
            .iter()
            .any(|(name, value)| name == "class" && value.split_whitespace().any(|c| c == class_name));
        if !has_class {
            continue;
        }

        let element = caps[1].to_ascii_lowercase();
        let rest = &html[whole.end()..];
        let closing = format!("</{}", element);
        let inner = match rest.to_ascii_lowercase().find(&closing) {
            Some(end) => &rest[..end],
            None => rest,
        };
        return Some(text_content(inner));
    }
    None
}

/// Strip tags, decode entities and collapse whitespace
pub fn text_content(fragment: &str) -> String {
    let stripped = TAG.replace_all(fragment, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&#43;", "+")
        .replace("&#x2B;", "+")
        .replace("&#x2b;", "+")
        .replace("&#x2F;", "/")
        .replace("&#x2f;", "/")
        .replace("&#61;", "=")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html><head>
  <meta charset="utf-8">
  <meta content="tok&#x2B;en==" name="csrf-token">
</head><body>
  <form method="post">
    <input type='hidden' name='p_psid' value='psid-123'>
    <input name="p_confirmation_code" type="text">
  </form>
</body></html>"#;

    #[test]
    fn test_find_meta_content_any_attribute_order() {
        assert_eq!(
            find_attribute(LOGIN_PAGE, "meta", "name", "csrf-token", "content").as_deref(),
            Some("tok+en==")
        );
    }

    #[test]
    fn test_find_input_value_single_quotes() {
        assert_eq!(
            find_attribute(LOGIN_PAGE, "input", "name", "p_psid", "value").as_deref(),
            Some("psid-123")
        );
    }

    #[test]
    fn test_find_attribute_missing() {
        assert!(find_attribute(LOGIN_PAGE, "input", "name", "p_other", "value").is_none());
        assert!(find_attribute("<p>nothing</p>", "meta", "name", "csrf-token", "content").is_none());
    }

    #[test]
    fn test_find_text_by_class() {
        let html = r#"<div class="field">
            <p class="kinde-control-associated-text kinde-control-associated-text-variant-invalid">
              Too many <b>attempts</b>, try again &amp; wait.
            </p></div>"#;
        assert_eq!(
            find_text_by_class(html, "kinde-control-associated-text-variant-invalid").as_deref(),
            Some("Too many attempts , try again & wait.")
        );
    }

    #[test]
    fn test_find_text_by_class_requires_whole_class() {
        let html = r#"<p class="variant-invalid-ish">nope</p>"#;
        assert!(find_text_by_class(html, "variant-invalid").is_none());
    }
}
