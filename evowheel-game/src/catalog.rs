//! Static reference data: trait categories, trait options, and hazard
//! environments. Loaded once, validated, never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the four independent axes of creature variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitCategory {
    Eyes,
    Limbs,
    Body,
    Diet,
}

impl TraitCategory {
    /// Display order for the four categories.
    pub const ALL: [Self; 4] = [Self::Eyes, Self::Limbs, Self::Body, Self::Diet];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eyes => "eyes",
            Self::Limbs => "limbs",
            Self::Body => "body",
            Self::Diet => "diet",
        }
    }

    /// Position of this category in the display order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Eyes => 0,
            Self::Limbs => 1,
            Self::Body => 2,
            Self::Diet => 3,
        }
    }
}

impl fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraitCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eyes" => Ok(Self::Eyes),
            "limbs" => Ok(Self::Limbs),
            "body" => Ok(Self::Body),
            "diet" => Ok(Self::Diet),
            _ => Err(()),
        }
    }
}

/// Stable single-letter id of a trait option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitOptionId(pub char);

impl fmt::Display for TraitOptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selectable option within one trait category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitOption {
    pub id: TraitOptionId,
    pub category: TraitCategory,
    pub name: String,
    /// Visual variant number, presentation metadata only.
    #[serde(default = "default_variant")]
    pub variant: u8,
}

const fn default_variant() -> u8 {
    1
}

/// A hazard event drawn from the wheel. Penalizes one trait option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub desc: String,
    pub affects: TraitOptionId,
    /// Background color hint, presentation metadata only.
    #[serde(default)]
    pub background: String,
}

/// Errors raised when catalog data violates its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("environment '{environment}' affects unknown trait option {id}")]
    DanglingAffects {
        environment: String,
        id: TraitOptionId,
    },
    #[error("duplicate trait option id {id}")]
    DuplicateOption { id: TraitOptionId },
    #[error("category {category} has no trait options")]
    EmptyCategory { category: TraitCategory },
    #[error("catalog defines no environments")]
    NoEnvironments,
}

/// Immutable container for all trait and environment data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    options: Vec<TraitOption>,
    environments: Vec<Environment>,
}

impl Catalog {
    /// Build a catalog from raw parts without validating.
    #[must_use]
    pub const fn from_parts(options: Vec<TraitOption>, environments: Vec<Environment>) -> Self {
        Self {
            options,
            environments,
        }
    }

    /// Load a catalog from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the parsed data
    /// violates a catalog invariant.
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The four categories in display order.
    #[must_use]
    pub const fn categories() -> [TraitCategory; 4] {
        TraitCategory::ALL
    }

    /// All options defined for the given category, in catalog order.
    pub fn options(&self, category: TraitCategory) -> impl Iterator<Item = &TraitOption> {
        self.options.iter().filter(move |o| o.category == category)
    }

    /// Look up an option by id.
    #[must_use]
    pub fn option(&self, id: TraitOptionId) -> Option<&TraitOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// All environments, in wheel order.
    #[must_use]
    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    /// Check catalog well-formedness.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found: duplicate option ids,
    /// categories without options, an empty environment list, or an
    /// environment whose `affects` id does not exist.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].iter().any(|o| o.id == option.id) {
                return Err(CatalogError::DuplicateOption { id: option.id });
            }
        }
        for category in TraitCategory::ALL {
            if self.options(category).next().is_none() {
                return Err(CatalogError::EmptyCategory { category });
            }
        }
        if self.environments.is_empty() {
            return Err(CatalogError::NoEnvironments);
        }
        for env in &self.environments {
            if self.option(env.affects).is_none() {
                return Err(CatalogError::DanglingAffects {
                    environment: env.name.clone(),
                    id: env.affects,
                });
            }
        }
        Ok(())
    }

    /// The built-in catalog: two options per category, eight environments.
    #[must_use]
    pub fn default_catalog() -> Self {
        let option = |id: char, category: TraitCategory, name: &str, variant: u8| TraitOption {
            id: TraitOptionId(id),
            category,
            name: name.to_string(),
            variant,
        };
        let environment = |name: &str, desc: &str, affects: char, background: &str| Environment {
            name: name.to_string(),
            desc: desc.to_string(),
            affects: TraitOptionId(affects),
            background: background.to_string(),
        };
        Self {
            options: vec![
                option('A', TraitCategory::Eyes, "Sees by day", 1),
                option('B', TraitCategory::Eyes, "Sees by night", 2),
                option('C', TraitCategory::Limbs, "Flying", 1),
                option('D', TraitCategory::Limbs, "Swimming", 2),
                option('E', TraitCategory::Body, "Hard shell", 1),
                option('F', TraitCategory::Body, "Soft fur", 2),
                option('G', TraitCategory::Diet, "Meat and insects", 1),
                option('H', TraitCategory::Diet, "Plants", 2),
            ],
            environments: vec![
                environment(
                    "Volcanic eruption",
                    "Heavy smog darkens the days; food can be found longer at night",
                    'A',
                    "#8B4513",
                ),
                environment(
                    "Days grow longer",
                    "The sun stays up longer and less food can be found at night",
                    'B',
                    "#FFD700",
                ),
                environment(
                    "Flood",
                    "The valley you live in fills with water and no land is in sight",
                    'C',
                    "#4682B4",
                ),
                environment(
                    "Earthquake",
                    "A great chasm opens between the species and its food",
                    'D',
                    "#8B4513",
                ),
                environment(
                    "Blizzard",
                    "The temperature suddenly drops very fast",
                    'E',
                    "#E0FFFF",
                ),
                environment(
                    "Landslide",
                    "An avalanche of rocks comes thundering toward you!",
                    'F',
                    "#696969",
                ),
                environment(
                    "Valley of plants",
                    "A paradise for plant eaters",
                    'G',
                    "#228B22",
                ),
                environment(
                    "Locust plague",
                    "A huge swarm of insects devours every plant",
                    'H',
                    "#8B7355",
                ),
            ],
        }
    }
}
