use once_cell::sync::Lazy;
use regex::Regex;

static USER_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)name="ajs-tempo-user-key" content="(\w+)""#).unwrap());

/// Pull the Tempo user key out of a Jira page.
///
/// Jira renders it as `<meta name="ajs-tempo-user-key" content="...">`. The first
/// match wins. A page without the tag (for example the login form shown again after
/// bad credentials) yields an empty string rather than an error.
pub fn extract_user_key(html: &str) -> String {
    USER_KEY_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
