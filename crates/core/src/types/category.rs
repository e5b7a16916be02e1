//! Product categories and the filter applied to catalog listings.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a category or filter tag is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

/// The fixed set of tags products are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Espresso,
    ColdBrew,
    Pastry,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Self; 3] = [Self::Espresso, Self::ColdBrew, Self::Pastry];

    /// The tag used in URLs and stored data.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Espresso => "espresso",
            Self::ColdBrew => "coldbrew",
            Self::Pastry => "pastry",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CategoryParseError(s.to_owned()))
    }
}

/// Selection applied to the catalog listing.
///
/// ```
/// use coffeecraft_core::{Category, CategoryFilter};
///
/// let filter: CategoryFilter = "coldbrew".parse().unwrap();
/// assert!(filter.matches(Category::ColdBrew));
/// assert!(!filter.matches(Category::Pastry));
/// assert!(CategoryFilter::All.matches(Category::Pastry));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Returns true if a product in `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => category.fmt(f),
        }
    }
}
