use serde::{Deserialize, Serialize};

/// A bundle (product family) or application facet.
///
/// Bundles carry their applications in `children`. Facets are read-only
/// reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facet {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Facet>,
}

impl Facet {
    /// Returns true if `key` names this facet by name or display name.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.name.eq_ignore_ascii_case(key) || self.display_name.eq_ignore_ascii_case(key)
    }

    /// Looks up a child application by name or display name.
    pub fn application(&self, key: &str) -> Option<&Facet> {
        self.children.iter().find(|app| app.matches(key))
    }
}

/// Finds a bundle by name or display name.
pub fn find_bundle<'a>(bundles: &'a [Facet], key: &str) -> Option<&'a Facet> {
    bundles.iter().find(|bundle| bundle.matches(key))
}
