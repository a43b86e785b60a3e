pub mod catalog;
pub mod enums;
pub mod kebab_variant;
pub mod place;
pub mod review;
pub mod user;
pub mod validate;

pub use catalog::{BreadType, MeatType};
pub use enums::{Ingredient, PriceRange, Sauce};
pub use kebab_variant::KebabVariant;
pub use place::Place;
pub use review::Review;
pub use user::User;
