//! Catalog enums: clothing categories and sizes.

use serde::{Deserialize, Serialize};

/// Product category for clothing items.
///
/// Maps to the `clothing_category` `PostgreSQL` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "clothing_category"))]
pub enum ClothingCategory {
    #[serde(rename = "t-shirt")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "t-shirt"))]
    TShirt,
    #[serde(rename = "hoodie")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "hoodie"))]
    Hoodie,
    #[serde(rename = "pants")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "pants"))]
    Pants,
    #[serde(rename = "trousers")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "trousers"))]
    Trousers,
    #[serde(rename = "sweatshirt")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "sweatshirt"))]
    Sweatshirt,
}

impl ClothingCategory {
    /// The wire/database representation of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TShirt => "t-shirt",
            Self::Hoodie => "hoodie",
            Self::Pants => "pants",
            Self::Trousers => "trousers",
            Self::Sweatshirt => "sweatshirt",
        }
    }
}

impl std::fmt::Display for ClothingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClothingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t-shirt" => Ok(Self::TShirt),
            "hoodie" => Ok(Self::Hoodie),
            "pants" => Ok(Self::Pants),
            "trousers" => Ok(Self::Trousers),
            "sweatshirt" => Ok(Self::Sweatshirt),
            _ => Err(format!("invalid clothing category: {s}")),
        }
    }
}

/// Garment size for product variants.
///
/// Maps to the `clothing_size` `PostgreSQL` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "clothing_size", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClothingSize {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl ClothingSize {
    /// The wire/database representation of this size.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xs => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
        }
    }
}

impl std::fmt::Display for ClothingSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClothingSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XS" => Ok(Self::Xs),
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            "XL" => Ok(Self::Xl),
            "XXL" => Ok(Self::Xxl),
            _ => Err(format!("invalid clothing size: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_uses_hyphenated_name() {
        let json = serde_json::to_string(&ClothingCategory::TShirt).expect("serialize");
        assert_eq!(json, r#""t-shirt""#);
        let back: ClothingCategory = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ClothingCategory::TShirt);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "sweatshirt".parse::<ClothingCategory>(),
            Ok(ClothingCategory::Sweatshirt)
        );
        assert!("jacket".parse::<ClothingCategory>().is_err());
    }

    #[test]
    fn test_size_serde_uppercase() {
        let json = serde_json::to_string(&ClothingSize::Xxl).expect("serialize");
        assert_eq!(json, r#""XXL""#);
        let back: ClothingSize = serde_json::from_str(r#""XS""#).expect("deserialize");
        assert_eq!(back, ClothingSize::Xs);
    }

    #[test]
    fn test_size_ordering() {
        assert!(ClothingSize::Xs < ClothingSize::S);
        assert!(ClothingSize::Xl < ClothingSize::Xxl);
    }

    #[test]
    fn test_display_round_trips_from_str() {
        for size in [
            ClothingSize::Xs,
            ClothingSize::S,
            ClothingSize::M,
            ClothingSize::L,
            ClothingSize::Xl,
            ClothingSize::Xxl,
        ] {
            assert_eq!(size.to_string().parse::<ClothingSize>(), Ok(size));
        }
    }
}
