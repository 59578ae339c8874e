use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Scope identifier.
///
/// Scopes are opaque permission strings (e.g. `"active"`). An endpoint lists the
/// scopes it requires; a token carries the scopes it was issued with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Cow<'static, str>);

impl Scope {
    /// Granted to every principal allowed to use the catalog.
    pub const ACTIVE: Scope = Scope::from_static("active");

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse an OAuth2 `scope` parameter (space separated, duplicates dropped,
/// first-seen order kept).
pub fn parse_scope_list(raw: &str) -> Vec<Scope> {
    let mut out: Vec<Scope> = Vec::new();
    for name in raw.split_whitespace() {
        if !out.iter().any(|s| s.as_str() == name) {
            out.push(Scope::new(name.to_string()));
        }
    }
    out
}

/// Render scopes in OAuth2 form (`"a b c"`).
pub fn join_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(Scope::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_whitespace_and_dedupes() {
        let scopes = parse_scope_list("  active  admin\tactive ");
        assert_eq!(scopes, vec![Scope::ACTIVE, Scope::new("admin")]);
    }

    #[test]
    fn parse_of_blank_is_empty() {
        assert!(parse_scope_list("   ").is_empty());
    }

    #[test]
    fn join_is_space_separated() {
        assert_eq!(join_scopes(&[Scope::ACTIVE, Scope::new("admin")]), "active admin");
        assert_eq!(join_scopes(&[]), "");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![Scope::ACTIVE]).unwrap();
        assert_eq!(json, r#"["active"]"#);
        let back: Vec<Scope> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Scope::ACTIVE]);
    }
}
