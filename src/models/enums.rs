use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceRange {
    Cheap,
    Medium,
    Expensive,
}

impl PriceRange {
    pub const ALL: [PriceRange; 3] = [PriceRange::Cheap, PriceRange::Medium, PriceRange::Expensive];

    pub fn symbol(&self) -> &'static str {
        match self {
            PriceRange::Cheap => "€",
            PriceRange::Medium => "€€",
            PriceRange::Expensive => "€€€",
        }
    }

    /// Classifies a single price. Both bounds of the medium band are inclusive.
    pub fn from_price(price: f64) -> Self {
        if price < 5.0 {
            PriceRange::Cheap
        } else if price <= 8.0 {
            PriceRange::Medium
        } else {
            PriceRange::Expensive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceRange::Cheap => "CHEAP",
            PriceRange::Medium => "MEDIUM",
            PriceRange::Expensive => "EXPENSIVE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sauce {
    Garlic,
    HotSauce,
    YogurtHerb,
}

impl Sauce {
    pub const ALL: [Sauce; 3] = [Sauce::Garlic, Sauce::HotSauce, Sauce::YogurtHerb];

    pub fn display_name(&self) -> &'static str {
        match self {
            Sauce::Garlic => "Knoblauchsauce",
            Sauce::HotSauce => "Scharfe Sauce",
            Sauce::YogurtHerb => "Joghurt-Kräutersauce",
        }
    }

    pub fn display_name_en(&self) -> &'static str {
        match self {
            Sauce::Garlic => "Garlic Sauce",
            Sauce::HotSauce => "Hot Sauce",
            Sauce::YogurtHerb => "Yogurt Herb Sauce",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sauce::Garlic => "GARLIC",
            Sauce::HotSauce => "HOT_SAUCE",
            Sauce::YogurtHerb => "YOGURT_HERB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ingredient {
    Salad,
    Tomato,
    Onion,
    Cucumber,
    Cheese,
    Corn,
    Carrots,
}

impl Ingredient {
    pub const ALL: [Ingredient; 7] = [
        Ingredient::Salad,
        Ingredient::Tomato,
        Ingredient::Onion,
        Ingredient::Cucumber,
        Ingredient::Cheese,
        Ingredient::Corn,
        Ingredient::Carrots,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Ingredient::Salad => "Salat",
            Ingredient::Tomato => "Tomate",
            Ingredient::Onion => "Zwiebel",
            Ingredient::Cucumber => "Gurke",
            Ingredient::Cheese => "Käse",
            Ingredient::Corn => "Mais",
            Ingredient::Carrots => "Karotten",
        }
    }

    pub fn display_name_en(&self) -> &'static str {
        match self {
            Ingredient::Salad => "Salad",
            Ingredient::Tomato => "Tomato",
            Ingredient::Onion => "Onion",
            Ingredient::Cucumber => "Cucumber",
            Ingredient::Cheese => "Cheese",
            Ingredient::Corn => "Corn",
            Ingredient::Carrots => "Carrots",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ingredient::Salad => "SALAD",
            Ingredient::Tomato => "TOMATO",
            Ingredient::Onion => "ONION",
            Ingredient::Cucumber => "CUCUMBER",
            Ingredient::Cheese => "CHEESE",
            Ingredient::Corn => "CORN",
            Ingredient::Carrots => "CARROTS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! impl_from_str {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_from_str!(PriceRange, "price range");
impl_from_str!(Sauce, "sauce");
impl_from_str!(Ingredient, "ingredient");
