//! Route table and fragment resolution

use std::collections::BTreeMap;
use std::fmt;

use color_eyre::eyre::{bail, Result};
use serde::{Deserialize, Serialize};

/// Every routable fragment starts with this prefix
pub const ROUTE_PREFIX: &str = "#/";

/// Canonical key of the home route
pub const HOME_ROUTE: &str = "#/";

/// Identifier of a top-level view element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Result of resolving a raw fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    /// Canonical route key (always present in the route table)
    pub route: String,
    /// In-page anchor inside the home route
    pub section: Option<String>,
}

impl NavigationTarget {
    pub fn home() -> Self {
        Self {
            route: HOME_ROUTE.to_string(),
            section: None,
        }
    }

    fn home_section(section: &str) -> Self {
        Self {
            route: HOME_ROUTE.to_string(),
            section: Some(section.to_string()),
        }
    }

    pub fn is_home(&self) -> bool {
        self.route == HOME_ROUTE
    }

    pub fn has_section(&self) -> bool {
        self.section.is_some()
    }
}

/// Fixed mapping from canonical fragment keys to view identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<String, ViewId>,
    gallery: Option<String>,
}

impl RouteTable {
    /// Build a table. The home key must be present and every key must carry
    /// the route prefix; the gallery route, if any, must be one of the keys.
    pub fn new<I, K, V>(routes: I, gallery: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ViewId>,
    {
        let routes: BTreeMap<String, ViewId> = routes
            .into_iter()
            .map(|(key, view)| (key.into(), view.into()))
            .collect();

        if let Some(bad) = routes.keys().find(|key| !key.starts_with(ROUTE_PREFIX)) {
            bail!("route key {bad:?} does not start with {ROUTE_PREFIX:?}");
        }
        if !routes.contains_key(HOME_ROUTE) {
            bail!("route table has no home route {HOME_ROUTE:?}");
        }
        if let Some(gallery) = gallery {
            if !routes.contains_key(gallery) {
                bail!("gallery route {gallery:?} is not in the route table");
            }
        }

        Ok(Self {
            routes,
            gallery: gallery.map(str::to_string),
        })
    }

    /// Map a raw fragment to its `(route, section)` pair. Never fails.
    pub fn resolve(&self, raw: &str) -> NavigationTarget {
        if !raw.starts_with(ROUTE_PREFIX) {
            return NavigationTarget::home();
        }

        if self.routes.contains_key(raw) {
            return NavigationTarget {
                route: raw.to_string(),
                section: None,
            };
        }

        match &raw[ROUTE_PREFIX.len()..] {
            "" => NavigationTarget::home(),
            section => NavigationTarget::home_section(section),
        }
    }

    pub fn view_for(&self, route: &str) -> Option<&ViewId> {
        self.routes.get(route)
    }

    pub fn views(&self) -> impl Iterator<Item = &ViewId> {
        self.routes.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ViewId)> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn gallery_route(&self) -> Option<&str> {
        self.gallery.as_deref()
    }

    pub fn gallery_view(&self) -> Option<&ViewId> {
        self.gallery.as_deref().and_then(|route| self.view_for(route))
    }

    pub fn is_gallery(&self, route: &str) -> bool {
        self.gallery.as_deref() == Some(route)
    }
}

impl Default for RouteTable {
    /// The site's shipped table: home and the project gallery
    fn default() -> Self {
        let routes = BTreeMap::from([
            (HOME_ROUTE.to_string(), ViewId::new("view-home")),
            ("#/projects".to_string(), ViewId::new("view-projects")),
        ]);
        Self {
            routes,
            gallery: Some("#/projects".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn table() -> RouteTable {
        RouteTable::default()
    }

    fn target(route: &str, section: Option<&str>) -> NavigationTarget {
        NavigationTarget {
            route: route.to_string(),
            section: section.map(str::to_string),
        }
    }

    #[rstest]
    #[case("#/", target("#/", None))]
    #[case("#/projects", target("#/projects", None))]
    #[case("#/work", target("#/", Some("work")))]
    #[case("#/about", target("#/", Some("about")))]
    #[case("#/projects/extra", target("#/", Some("projects/extra")))]
    #[case("", target("#/", None))]
    #[case("#", target("#/", None))]
    #[case("#work", target("#/", None))]
    #[case("/projects", target("#/", None))]
    fn test_resolve(table: RouteTable, #[case] raw: &str, #[case] expected: NavigationTarget) {
        assert_eq!(table.resolve(raw), expected);
    }

    #[rstest]
    fn test_resolve_is_idempotent(table: RouteTable) {
        for raw in ["#/", "#/projects", "#/work", "", "garbage"] {
            let first = table.resolve(raw);
            let second = table.resolve(raw);
            assert_eq!(first, second);
            // Resolved routes are always keys of the table
            assert!(table.view_for(&first.route).is_some());
        }
    }

    #[test]
    fn test_new_requires_home_route() {
        let result = RouteTable::new([("#/projects", "view-projects")], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_unprefixed_keys() {
        let result = RouteTable::new([("#/", "view-home"), ("projects", "view-projects")], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_unknown_gallery() {
        let result = RouteTable::new([("#/", "view-home")], Some("#/projects"));
        assert!(result.is_err());
    }

    #[rstest]
    fn test_gallery_lookup(table: RouteTable) {
        assert_eq!(table.gallery_route(), Some("#/projects"));
        assert_eq!(table.gallery_view(), Some(&ViewId::new("view-projects")));
        assert!(table.is_gallery("#/projects"));
        assert!(!table.is_gallery("#/"));
    }

    #[test]
    fn test_extra_route_key_is_not_a_section() {
        let table = RouteTable::new(
            [
                ("#/", "view-home"),
                ("#/projects", "view-projects"),
                ("#/work", "view-work"),
            ],
            Some("#/projects"),
        )
        .unwrap();
        assert_eq!(table.resolve("#/work"), target("#/work", None));
        assert_eq!(table.len(), 3);
    }
}
