//! Action catalog
//!
//! Named categories of candidate product changes, each with a rationale
//! and an expected scorecard impact. Loaded from YAML; a default catalog
//! is embedded in the binary.

use scenario_model::{ProposedAction, ScorecardDelta};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const BUILTIN_CATALOG: &str = include_str!("../catalog/default.yaml");

/// Catalog loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// YAML did not parse
    #[error("invalid catalog yaml: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// File could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// No categories or no actions
    #[error("catalog has no actions")]
    Empty,

    /// Category name empty or repeated
    #[error("invalid or duplicate category name: {0:?}")]
    DuplicateCategory(String),

    /// Action with empty description or rationale
    #[error("action in category {category} is missing a description or rationale")]
    IncompleteAction {
        /// Category name
        category: String,
    },

    /// Impact component outside [-1, 1]
    #[error("impact {value} of action {action:?} is outside [-1, 1]")]
    ImpactOutOfRange {
        /// Action description
        action: String,
        /// Offending value
        value: f64,
    },

    /// Proposal names a category the catalog does not have
    #[error("unknown action category: {0}")]
    UnknownCategory(String),
}

/// One catalog action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogAction {
    /// What to change
    pub description: String,
    /// Why it should help
    pub rationale: String,
    /// Expected scorecard shift
    #[serde(default)]
    pub impact: ScorecardDelta,
}

/// Named group of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCategory {
    /// Category name
    pub name: String,
    /// Human description
    #[serde(default)]
    pub description: String,
    /// Actions in this category
    pub actions: Vec<CatalogAction>,
}

/// Versioned action catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCatalog {
    /// Catalog version
    pub version: String,
    /// Categories in declaration order
    pub categories: Vec<CatalogCategory>,
}

impl ActionCatalog {
    /// Catalog embedded at build time
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Parse and validate a YAML catalog
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a YAML catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Serialise back to YAML
    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check names, completeness and impact ranges
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.action_count() == 0 {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() || !seen.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }
            for action in &category.actions {
                if action.description.trim().is_empty() || action.rationale.trim().is_empty() {
                    return Err(CatalogError::IncompleteAction {
                        category: category.name.clone(),
                    });
                }
                for value in action.impact.components().into_iter().flatten() {
                    if !(-1.0..=1.0).contains(&value) {
                        return Err(CatalogError::ImpactOutOfRange {
                            action: action.description.clone(),
                            value,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a category by name
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CatalogCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Reject proposals whose category is not in the catalog
    pub fn validate_proposal(&self, proposal: &ProposedAction) -> Result<(), CatalogError> {
        self.category(&proposal.action_category)
            .map(|_| ())
            .ok_or_else(|| CatalogError::UnknownCategory(proposal.action_category.clone()))
    }

    /// Every (category, action) pair in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (&CatalogCategory, &CatalogAction)> {
        self.categories
            .iter()
            .flat_map(|c| c.actions.iter().map(move |a| (c, a)))
    }

    /// Total number of actions
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.categories.iter().map(|c| c.actions.len()).sum()
    }
}

impl CatalogAction {
    /// Turn a catalog entry into a proposal under `category`
    #[must_use]
    pub fn to_proposal(&self, category: &str) -> ProposedAction {
        ProposedAction::new(&self.description, category, &self.rationale, self.impact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = ActionCatalog::builtin().unwrap();
        assert_eq!(catalog.version, "1.0");
        assert!(catalog.category("onboarding").is_some());
        assert!(catalog.action_count() >= 8);
    }

    #[test]
    fn rejects_duplicate_category() {
        let yaml = r#"
version: "1"
categories:
  - name: a
    actions:
      - { description: x, rationale: y, impact: { complexity: -0.1 } }
  - name: a
    actions:
      - { description: z, rationale: w }
"#;
        assert!(matches!(
            ActionCatalog::from_yaml(yaml),
            Err(CatalogError::DuplicateCategory(name)) if name == "a"
        ));
    }

    #[test]
    fn rejects_out_of_range_impact() {
        let yaml = r#"
version: "1"
categories:
  - name: a
    actions:
      - { description: x, rationale: y, impact: { complexity: -1.5 } }
"#;
        assert!(matches!(
            ActionCatalog::from_yaml(yaml),
            Err(CatalogError::ImpactOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_empty_catalog() {
        let yaml = "version: \"1\"\ncategories: []\n";
        assert!(matches!(ActionCatalog::from_yaml(yaml), Err(CatalogError::Empty)));
    }

    #[test]
    fn proposal_category_must_exist() {
        let catalog = ActionCatalog::builtin().unwrap();
        let known = ProposedAction::new("d", "trust", "r", ScorecardDelta::new());
        let unknown = ProposedAction::new("d", "pricing", "r", ScorecardDelta::new());
        assert!(catalog.validate_proposal(&known).is_ok());
        assert!(matches!(
            catalog.validate_proposal(&unknown),
            Err(CatalogError::UnknownCategory(c)) if c == "pricing"
        ));
    }

    #[test]
    fn yaml_round_trip_preserves_catalog() {
        let catalog = ActionCatalog::builtin().unwrap();
        let again = ActionCatalog::from_yaml(&catalog.to_yaml().unwrap()).unwrap();
        assert_eq!(catalog, again);
    }
}
