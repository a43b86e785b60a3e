use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction, postgres::PgPoolOptions};
use uuid::Uuid;

use crate::{
    db::{
        Store, UnitOfWork, catalog, kebab, place,
        review::{self, ReviewOwner},
        user::{self, UniqueUserColumn},
    },
    errors::AppError,
    models::{
        BreadType, KebabVariant, MeatType, Place, Review, User, kebab_variant::KebabQuery,
        place::PlaceQuery, review::ReviewQuery,
    },
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to postgres: {e}")))?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {e}")))?;

        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_sqlx("Failed to begin transaction", e))?;

        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// One postgres transaction. Dropping it without commit rolls back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::from_sqlx("Failed to commit transaction", e))
    }

    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        user::get_user(id, false, &mut self.tx).await
    }

    async fn lock_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        user::get_user(id, true, &mut self.tx).await
    }

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, AppError> {
        user::get_user_by(UniqueUserColumn::Username, username, &mut self.tx).await
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        user::get_user_by(UniqueUserColumn::Email, email, &mut self.tx).await
    }

    async fn list_users(&mut self) -> Result<Vec<User>, AppError> {
        user::get_all_users(&mut self.tx).await
    }

    async fn insert_user(&mut self, user: &User) -> Result<(), AppError> {
        user::insert_user(user, &mut self.tx).await
    }

    async fn update_user(&mut self, user: &User) -> Result<(), AppError> {
        user::update_user(user, &mut self.tx).await
    }

    async fn delete_user(&mut self, id: Uuid) -> Result<(), AppError> {
        user::delete_user(id, &mut self.tx).await
    }

    async fn find_place(&mut self, id: Uuid) -> Result<Option<Place>, AppError> {
        place::get_place(id, false, &mut self.tx).await
    }

    async fn lock_place(&mut self, id: Uuid) -> Result<Option<Place>, AppError> {
        place::get_place(id, true, &mut self.tx).await
    }

    async fn list_places(&mut self, query: &PlaceQuery) -> Result<Vec<Place>, AppError> {
        place::get_places(query, &mut self.tx).await
    }

    async fn insert_place(&mut self, place: &Place) -> Result<(), AppError> {
        place::insert_place(place, &mut self.tx).await
    }

    async fn update_place(&mut self, place: &Place) -> Result<(), AppError> {
        place::update_place(place, &mut self.tx).await
    }

    async fn save_place_rating(
        &mut self,
        id: Uuid,
        average_rating: f32,
        review_count: i32,
    ) -> Result<(), AppError> {
        place::update_place_rating(id, average_rating, review_count, &mut self.tx).await
    }

    async fn delete_place(&mut self, id: Uuid) -> Result<(), AppError> {
        place::delete_place(id, &mut self.tx).await
    }

    async fn find_kebab(&mut self, id: Uuid) -> Result<Option<KebabVariant>, AppError> {
        kebab::get_kebab(id, false, &mut self.tx).await
    }

    async fn lock_kebab(&mut self, id: Uuid) -> Result<Option<KebabVariant>, AppError> {
        kebab::get_kebab(id, true, &mut self.tx).await
    }

    async fn list_kebabs(&mut self, query: &KebabQuery) -> Result<Vec<KebabVariant>, AppError> {
        kebab::get_kebabs(query, &mut self.tx).await
    }

    async fn insert_kebab(&mut self, kebab: &KebabVariant) -> Result<(), AppError> {
        kebab::insert_kebab(kebab, &mut self.tx).await
    }

    async fn update_kebab(&mut self, kebab: &KebabVariant) -> Result<(), AppError> {
        kebab::update_kebab(kebab, &mut self.tx).await
    }

    async fn save_kebab_rating(&mut self, id: Uuid, average_rating: f32) -> Result<(), AppError> {
        kebab::update_kebab_rating(id, average_rating, &mut self.tx).await
    }

    async fn delete_kebab(&mut self, id: Uuid) -> Result<(), AppError> {
        kebab::delete_kebab(id, &mut self.tx).await
    }

    async fn find_review(&mut self, id: Uuid) -> Result<Option<Review>, AppError> {
        review::get_review(id, &mut self.tx).await
    }

    async fn review_exists(&mut self, user_id: Uuid, kebab_id: Uuid) -> Result<bool, AppError> {
        review::review_exists(user_id, kebab_id, &mut self.tx).await
    }

    async fn list_reviews(&mut self, query: &ReviewQuery) -> Result<Vec<Review>, AppError> {
        review::get_reviews(query, &mut self.tx).await
    }

    async fn ratings_for_kebab(&mut self, kebab_id: Uuid) -> Result<Vec<i16>, AppError> {
        review::get_ratings_for_kebab(kebab_id, &mut self.tx).await
    }

    async fn count_reviews_for_kebab(&mut self, kebab_id: Uuid) -> Result<i64, AppError> {
        review::count_reviews_for_kebab(kebab_id, &mut self.tx).await
    }

    async fn insert_review(&mut self, review: &Review) -> Result<(), AppError> {
        review::insert_review(review, &mut self.tx).await
    }

    async fn update_review(&mut self, review: &Review) -> Result<(), AppError> {
        review::update_review(review, &mut self.tx).await
    }

    async fn delete_review(&mut self, id: Uuid) -> Result<(), AppError> {
        review::delete_review(id, &mut self.tx).await
    }

    async fn delete_reviews_for_kebab(&mut self, kebab_id: Uuid) -> Result<u64, AppError> {
        review::delete_reviews_where(ReviewOwner::KebabVariant, kebab_id, &mut self.tx).await
    }

    async fn delete_reviews_for_user(&mut self, user_id: Uuid) -> Result<u64, AppError> {
        review::delete_reviews_where(ReviewOwner::User, user_id, &mut self.tx).await
    }

    async fn find_bread_type(&mut self, id: Uuid) -> Result<Option<BreadType>, AppError> {
        catalog::get_bread_type(id, &mut self.tx).await
    }

    async fn find_meat_type(&mut self, id: Uuid) -> Result<Option<MeatType>, AppError> {
        catalog::get_meat_type(id, &mut self.tx).await
    }

    async fn list_bread_types(&mut self) -> Result<Vec<BreadType>, AppError> {
        catalog::get_bread_types(&mut self.tx).await
    }

    async fn list_meat_types(&mut self) -> Result<Vec<MeatType>, AppError> {
        catalog::get_meat_types(&mut self.tx).await
    }

    async fn insert_bread_type(&mut self, bread_type: &BreadType) -> Result<(), AppError> {
        catalog::insert_bread_type(bread_type, &mut self.tx).await
    }

    async fn insert_meat_type(&mut self, meat_type: &MeatType) -> Result<(), AppError> {
        catalog::insert_meat_type(meat_type, &mut self.tx).await
    }
}
