use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Review, review::ReviewQuery},
};

const REVIEW_COLUMNS: &str = "id, user_id, kebab_variant_id, rating, title, comment, created_at";

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    user_id: Uuid,
    kebab_variant_id: Uuid,
    rating: i16,
    title: String,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            user_id: row.user_id,
            kebab_variant_id: row.kebab_variant_id,
            rating: row.rating,
            title: row.title,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

pub async fn get_review(id: Uuid, conn: &mut PgConnection) -> Result<Option<Review>, AppError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to fetch review", e))?;

    Ok(row.map(Review::from))
}

pub async fn review_exists(
    user_id: Uuid,
    kebab_id: Uuid,
    conn: &mut PgConnection,
) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM reviews WHERE user_id = $1 AND kebab_variant_id = $2)",
    )
    .bind(user_id)
    .bind(kebab_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to check for existing review", e))
}

/// Newest first.
pub async fn get_reviews(
    query: &ReviewQuery,
    conn: &mut PgConnection,
) -> Result<Vec<Review>, AppError> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE TRUE"));

    if let Some(user_id) = query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(kebab_id) = query.kebab_variant_id {
        builder.push(" AND kebab_variant_id = ").push_bind(kebab_id);
    }
    builder.push(" ORDER BY created_at DESC, id");

    let rows = builder
        .build_query_as::<ReviewRow>()
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to fetch reviews", e))?;

    Ok(rows.into_iter().map(Review::from).collect())
}

pub async fn get_ratings_for_kebab(
    kebab_id: Uuid,
    conn: &mut PgConnection,
) -> Result<Vec<i16>, AppError> {
    sqlx::query_scalar::<_, i16>("SELECT rating FROM reviews WHERE kebab_variant_id = $1")
        .bind(kebab_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to fetch ratings", e))
}

pub async fn count_reviews_for_kebab(
    kebab_id: Uuid,
    conn: &mut PgConnection,
) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE kebab_variant_id = $1")
        .bind(kebab_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to count reviews", e))
}

pub async fn insert_review(review: &Review, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO reviews (id, user_id, kebab_variant_id, rating, title, comment, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(review.id)
    .bind(review.user_id)
    .bind(review.kebab_variant_id)
    .bind(review.rating)
    .bind(&review.title)
    .bind(&review.comment)
    .bind(review.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to create review", e))?;

    Ok(())
}

pub async fn update_review(review: &Review, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query("UPDATE reviews SET rating = $2, title = $3, comment = $4 WHERE id = $1")
        .bind(review.id)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.comment)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to update review", e))?;

    Ok(())
}

pub async fn delete_review(id: Uuid, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to delete review", e))?;

    Ok(())
}

pub async fn delete_reviews_where(
    column: ReviewOwner,
    id: Uuid,
    conn: &mut PgConnection,
) -> Result<u64, AppError> {
    let result = sqlx::query(&format!("DELETE FROM reviews WHERE {} = $1", column.as_str()))
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to delete reviews", e))?;

    Ok(result.rows_affected())
}

#[derive(Debug, Clone, Copy)]
pub enum ReviewOwner {
    User,
    KebabVariant,
}

impl ReviewOwner {
    fn as_str(&self) -> &'static str {
        match self {
            ReviewOwner::User => "user_id",
            ReviewOwner::KebabVariant => "kebab_variant_id",
        }
    }
}
