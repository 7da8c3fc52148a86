//! Resource kinds managed on a search service.
//!
//! Every remote resource lives in a named collection of the management API.
//! This module also declares which kinds a resource may reference, so that
//! callers can order creation and teardown without relying on remote rejections.

use serde::{Deserialize, Serialize};

/// A kind of resource owned by the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    DataSource,
    SynonymMap,
    Index,
    Skillset,
    Indexer,
}

impl ResourceKind {
    /// Kinds in the order they must be created.
    pub const CREATION_ORDER: [ResourceKind; 5] = [
        ResourceKind::DataSource,
        ResourceKind::SynonymMap,
        ResourceKind::Index,
        ResourceKind::Skillset,
        ResourceKind::Indexer,
    ];

    /// Returns the collection segment used in management API paths.
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::DataSource => "datasources",
            ResourceKind::SynonymMap => "synonymmaps",
            ResourceKind::Index => "indexes",
            ResourceKind::Skillset => "skillsets",
            ResourceKind::Indexer => "indexers",
        }
    }

    /// Returns the human readable name used in progress lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::DataSource => "data source",
            ResourceKind::SynonymMap => "synonym map",
            ResourceKind::Index => "index",
            ResourceKind::Skillset => "skillset",
            ResourceKind::Indexer => "indexer",
        }
    }

    /// Kinds a resource of this kind may reference.
    ///
    /// An index may reference synonym maps; an indexer references exactly one
    /// data source and one index, and optionally a skillset.
    pub fn dependencies(&self) -> &'static [ResourceKind] {
        match self {
            ResourceKind::Index => &[ResourceKind::SynonymMap],
            ResourceKind::Indexer => &[
                ResourceKind::DataSource,
                ResourceKind::Index,
                ResourceKind::Skillset,
            ],
            ResourceKind::DataSource | ResourceKind::SynonymMap | ResourceKind::Skillset => &[],
        }
    }

    /// Kinds in the order they must be deleted (dependents first).
    pub fn teardown_order() -> impl Iterator<Item = ResourceKind> {
        Self::CREATION_ORDER.into_iter().rev()
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(kind: ResourceKind) -> usize {
        ResourceKind::CREATION_ORDER
            .iter()
            .position(|k| *k == kind)
            .unwrap()
    }

    #[test]
    fn test_collections() {
        assert_eq!(ResourceKind::DataSource.collection(), "datasources");
        assert_eq!(ResourceKind::SynonymMap.collection(), "synonymmaps");
        assert_eq!(ResourceKind::Index.collection(), "indexes");
        assert_eq!(ResourceKind::Skillset.collection(), "skillsets");
        assert_eq!(ResourceKind::Indexer.collection(), "indexers");
    }

    #[test]
    fn test_dependencies_are_created_first() {
        for kind in ResourceKind::CREATION_ORDER {
            for dependency in kind.dependencies() {
                assert!(
                    position(*dependency) < position(kind),
                    "{} must be created before {}",
                    dependency,
                    kind
                );
            }
        }
    }

    #[test]
    fn test_teardown_order_starts_with_indexer() {
        let order: Vec<_> = ResourceKind::teardown_order().collect();
        assert_eq!(order.first(), Some(&ResourceKind::Indexer));
        assert_eq!(order.last(), Some(&ResourceKind::DataSource));
        assert_eq!(order.len(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceKind::SynonymMap.to_string(), "synonym map");
    }
}
