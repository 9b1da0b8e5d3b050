use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataAccessError;

/// The fixed dish taxonomy. The serialized form is the id stored in the
/// `dishes.category` column, which is what every filter matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "burger")]
    Burger,
    #[serde(rename = "pizza")]
    Pizza,
    #[serde(rename = "sushi")]
    Sushi,
    #[serde(rename = "taco")]
    Taco,
    #[serde(rename = "wings")]
    Wings,
    #[serde(rename = "lobster roll")]
    LobsterRoll,
    #[serde(rename = "fish")]
    Fish,
    #[serde(rename = "chowder")]
    Chowder,
    #[serde(rename = "apps")]
    Apps,
    #[serde(rename = "fried chicken")]
    FriedChicken,
    #[serde(rename = "entree")]
    Entree,
}

impl Category {
    /// Every category, in the order the chip bar shows them.
    pub const ALL: [Category; 11] = [
        Category::Burger,
        Category::Pizza,
        Category::Sushi,
        Category::Taco,
        Category::Wings,
        Category::LobsterRoll,
        Category::Fish,
        Category::Chowder,
        Category::Apps,
        Category::FriedChicken,
        Category::Entree,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::Burger => "burger",
            Category::Pizza => "pizza",
            Category::Sushi => "sushi",
            Category::Taco => "taco",
            Category::Wings => "wings",
            Category::LobsterRoll => "lobster roll",
            Category::Fish => "fish",
            Category::Chowder => "chowder",
            Category::Apps => "apps",
            Category::FriedChicken => "fried chicken",
            Category::Entree => "entree",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Burger => "Burgers",
            Category::Pizza => "Pizza",
            Category::Sushi => "Sushi",
            Category::Taco => "Tacos",
            Category::Wings => "Wings",
            Category::LobsterRoll => "Lobster Rolls",
            Category::Fish => "Fish",
            Category::Chowder => "Chowder",
            Category::Apps => "Apps",
            Category::FriedChicken => "Fried Chicken",
            Category::Entree => "Entrees",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = DataAccessError;

    /// Exact, case-sensitive match on the id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| DataAccessError::invalid(format!("Unknown dish category: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataAccessKind;

    #[test]
    fn ids_parse_back_to_their_category() {
        for category in Category::ALL {
            assert_eq!(category.id().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn multi_word_ids_keep_their_space() {
        assert_eq!(Category::LobsterRoll.id(), "lobster roll");
        assert_eq!(
            serde_json::to_string(&Category::FriedChicken).unwrap(),
            "\"fried chicken\""
        );
    }

    #[test]
    fn parsing_is_case_sensitive() {
        let err = "Burger".parse::<Category>().unwrap_err();
        assert_eq!(err.kind(), DataAccessKind::InvalidRequest);
        assert!("burgers".parse::<Category>().is_err());
    }

    #[test]
    fn labels_are_plural_display_names() {
        assert_eq!(Category::Taco.label(), "Tacos");
        assert_eq!(Category::Entree.label(), "Entrees");
    }
}
