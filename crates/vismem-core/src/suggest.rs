//! Query suggestions from a fixed keyword table. Pure and synchronous:
//! recomputed on every keystroke, no network involved.

pub const MAX_SUGGESTIONS: usize = 5;

/// Keyword → related query phrases. A key matches on case-insensitive
/// substring containment within the user's query.
pub const SUGGESTION_TABLE: &[(&str, &[&str])] = &[
    (
        "error",
        &["error message", "bug report", "issue details", "problem description"],
    ),
    (
        "login",
        &["login form", "authentication", "sign in", "user credentials"],
    ),
    (
        "dashboard",
        &["main page", "overview", "home screen", "status page"],
    ),
    (
        "upload",
        &["file upload", "add file", "import data", "create new"],
    ),
    (
        "settings",
        &["configuration", "preferences", "options", "setup"],
    ),
    (
        "button",
        &["click button", "press button", "action button", "submit button"],
    ),
    (
        "form",
        &["input form", "data entry", "submit form", "validation"],
    ),
    (
        "table",
        &["data table", "grid view", "list view", "information display"],
    ),
];

/// Produce up to [`MAX_SUGGESTIONS`] alternate queries for `query`.
///
/// Phrases are gathered from every table key the query contains, then
/// narrowed to those that still contain the query substring, so picking
/// one never loses what the user already typed.
pub fn suggestions_for(query: &str) -> Vec<String> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }

    SUGGESTION_TABLE
        .iter()
        .filter(|(key, _)| query_lower.contains(key))
        .flat_map(|(_, phrases)| phrases.iter())
        .filter(|phrase| phrase.to_lowercase().contains(&query_lower))
        .take(MAX_SUGGESTIONS)
        .map(|phrase| phrase.to_string())
        .collect()
}
