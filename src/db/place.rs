use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Place, place::PlaceQuery},
};

const PLACE_COLUMNS: &str =
    "id, name, address, city, price_range, average_rating, review_count, created_at";

#[derive(sqlx::FromRow)]
struct PlaceRow {
    id: Uuid,
    name: String,
    address: String,
    city: String,
    price_range: String,
    average_rating: f32,
    review_count: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<PlaceRow> for Place {
    type Error = AppError;

    fn try_from(row: PlaceRow) -> Result<Self, Self::Error> {
        Ok(Place {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
            price_range: row
                .price_range
                .parse()
                .map_err(|e| AppError::DatabaseError(format!("Place {}: {e}", row.id)))?,
            average_rating: row.average_rating,
            review_count: row.review_count,
            created_at: row.created_at,
        })
    }
}

pub async fn get_place(
    id: Uuid,
    for_update: bool,
    conn: &mut PgConnection,
) -> Result<Option<Place>, AppError> {
    let lock = if for_update { " FOR UPDATE" } else { "" };
    let row = sqlx::query_as::<_, PlaceRow>(&format!(
        "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1{lock}"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to fetch place", e))?;

    row.map(Place::try_from).transpose()
}

pub async fn get_places(
    query: &PlaceQuery,
    conn: &mut PgConnection,
) -> Result<Vec<Place>, AppError> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {PLACE_COLUMNS} FROM places WHERE TRUE"));

    if let Some(city) = &query.city {
        builder.push(" AND city = ").push_bind(city.clone());
    }
    if let Some(min) = query.min_rating {
        builder.push(" AND average_rating >= ").push_bind(min);
    }
    if query.order_by_rating {
        builder.push(" ORDER BY average_rating DESC, created_at, id");
    } else {
        builder.push(" ORDER BY created_at, id");
    }

    let rows = builder
        .build_query_as::<PlaceRow>()
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to fetch places", e))?;

    rows.into_iter().map(Place::try_from).collect()
}

pub async fn insert_place(place: &Place, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO places (id, name, address, city, price_range, average_rating, review_count, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(place.id)
    .bind(&place.name)
    .bind(&place.address)
    .bind(&place.city)
    .bind(place.price_range.as_str())
    .bind(place.average_rating)
    .bind(place.review_count)
    .bind(place.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to create place", e))?;

    Ok(())
}

pub async fn update_place(place: &Place, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE places SET name = $2, address = $3, city = $4, price_range = $5 WHERE id = $1",
    )
    .bind(place.id)
    .bind(&place.name)
    .bind(&place.address)
    .bind(&place.city)
    .bind(place.price_range.as_str())
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to update place", e))?;

    Ok(())
}

pub async fn update_place_rating(
    id: Uuid,
    average_rating: f32,
    review_count: i32,
    conn: &mut PgConnection,
) -> Result<(), AppError> {
    sqlx::query("UPDATE places SET average_rating = $2, review_count = $3 WHERE id = $1")
        .bind(id)
        .bind(average_rating)
        .bind(review_count)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to update place rating", e))?;

    Ok(())
}

pub async fn delete_place(id: Uuid, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query("DELETE FROM places WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to delete place", e))?;

    Ok(())
}
