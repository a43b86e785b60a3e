//! Persistence boundary.
//!
//! A [`Store`] hands out [`UnitOfWork`]s. Everything done through a unit of work is
//! invisible to other callers until [`UnitOfWork::commit`]; dropping it rolls back.
//! The `lock_*` lookups additionally hold the row until the unit of work ends, so
//! writers touching the same user, kebab variant or place run one after another.
//! Locks are taken user first, then kebab variants in id order, then places.

pub mod catalog;
pub mod kebab;
pub mod memory;
pub mod place;
pub mod postgres;
pub mod review;
pub mod seed;
pub mod user;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        BreadType, KebabVariant, MeatType, Place, Review, User, kebab_variant::KebabQuery,
        place::PlaceQuery, review::ReviewQuery,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError>;
}

#[async_trait]
pub trait UnitOfWork: Send {
    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    // users
    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn lock_user(&mut self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&mut self) -> Result<Vec<User>, AppError>;
    async fn insert_user(&mut self, user: &User) -> Result<(), AppError>;
    async fn update_user(&mut self, user: &User) -> Result<(), AppError>;
    async fn delete_user(&mut self, id: Uuid) -> Result<(), AppError>;

    // places
    async fn find_place(&mut self, id: Uuid) -> Result<Option<Place>, AppError>;
    async fn lock_place(&mut self, id: Uuid) -> Result<Option<Place>, AppError>;
    async fn list_places(&mut self, query: &PlaceQuery) -> Result<Vec<Place>, AppError>;
    async fn insert_place(&mut self, place: &Place) -> Result<(), AppError>;
    /// Writes the descriptive fields only.
    async fn update_place(&mut self, place: &Place) -> Result<(), AppError>;
    async fn save_place_rating(
        &mut self,
        id: Uuid,
        average_rating: f32,
        review_count: i32,
    ) -> Result<(), AppError>;
    async fn delete_place(&mut self, id: Uuid) -> Result<(), AppError>;

    // kebab variants
    async fn find_kebab(&mut self, id: Uuid) -> Result<Option<KebabVariant>, AppError>;
    async fn lock_kebab(&mut self, id: Uuid) -> Result<Option<KebabVariant>, AppError>;
    async fn list_kebabs(&mut self, query: &KebabQuery) -> Result<Vec<KebabVariant>, AppError>;
    async fn insert_kebab(&mut self, kebab: &KebabVariant) -> Result<(), AppError>;
    /// Writes the descriptive fields only.
    async fn update_kebab(&mut self, kebab: &KebabVariant) -> Result<(), AppError>;
    async fn save_kebab_rating(&mut self, id: Uuid, average_rating: f32) -> Result<(), AppError>;
    async fn delete_kebab(&mut self, id: Uuid) -> Result<(), AppError>;

    // reviews
    async fn find_review(&mut self, id: Uuid) -> Result<Option<Review>, AppError>;
    async fn review_exists(&mut self, user_id: Uuid, kebab_id: Uuid) -> Result<bool, AppError>;
    async fn list_reviews(&mut self, query: &ReviewQuery) -> Result<Vec<Review>, AppError>;
    async fn ratings_for_kebab(&mut self, kebab_id: Uuid) -> Result<Vec<i16>, AppError>;
    async fn count_reviews_for_kebab(&mut self, kebab_id: Uuid) -> Result<i64, AppError>;
    async fn insert_review(&mut self, review: &Review) -> Result<(), AppError>;
    async fn update_review(&mut self, review: &Review) -> Result<(), AppError>;
    async fn delete_review(&mut self, id: Uuid) -> Result<(), AppError>;
    async fn delete_reviews_for_kebab(&mut self, kebab_id: Uuid) -> Result<u64, AppError>;
    async fn delete_reviews_for_user(&mut self, user_id: Uuid) -> Result<u64, AppError>;

    // catalog
    async fn find_bread_type(&mut self, id: Uuid) -> Result<Option<BreadType>, AppError>;
    async fn find_meat_type(&mut self, id: Uuid) -> Result<Option<MeatType>, AppError>;
    async fn list_bread_types(&mut self) -> Result<Vec<BreadType>, AppError>;
    async fn list_meat_types(&mut self) -> Result<Vec<MeatType>, AppError>;
    async fn insert_bread_type(&mut self, bread_type: &BreadType) -> Result<(), AppError>;
    async fn insert_meat_type(&mut self, meat_type: &MeatType) -> Result<(), AppError>;
}
