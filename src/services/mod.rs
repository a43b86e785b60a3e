pub mod catalog;
pub mod kebab;
pub mod place;
pub mod rating;
pub mod review;
pub mod user;
pub mod views;
