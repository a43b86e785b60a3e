use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use std::collections::BTreeSet;
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{KebabVariant, kebab_variant::KebabQuery},
};

// price is NUMERIC(10,2) in the table and read back as float8
const KEBAB_COLUMNS: &str = "k.id, k.place_id, k.name, k.description, k.price::float8 AS price, \
    k.bread_type_id, k.meat_type_id, k.is_vegetarian, k.spicy, k.sauces, k.ingredients, \
    k.average_rating, k.created_at";

#[derive(sqlx::FromRow)]
struct KebabRow {
    id: Uuid,
    place_id: Uuid,
    name: String,
    description: Option<String>,
    price: f64,
    bread_type_id: Uuid,
    meat_type_id: Uuid,
    is_vegetarian: bool,
    spicy: bool,
    sauces: Vec<String>,
    ingredients: Vec<String>,
    average_rating: f32,
    created_at: DateTime<Utc>,
}

fn parse_set<T>(id: Uuid, values: Vec<String>) -> Result<BTreeSet<T>, AppError>
where
    T: FromStr + Ord,
    T::Err: std::fmt::Display,
{
    values
        .iter()
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| AppError::DatabaseError(format!("Kebab variant {id}: {e}")))
        })
        .collect()
}

impl TryFrom<KebabRow> for KebabVariant {
    type Error = AppError;

    fn try_from(row: KebabRow) -> Result<Self, Self::Error> {
        Ok(KebabVariant {
            sauces: parse_set(row.id, row.sauces)?,
            ingredients: parse_set(row.id, row.ingredients)?,
            id: row.id,
            place_id: row.place_id,
            name: row.name,
            description: row.description,
            price: row.price,
            bread_type_id: row.bread_type_id,
            meat_type_id: row.meat_type_id,
            is_vegetarian: row.is_vegetarian,
            spicy: row.spicy,
            average_rating: row.average_rating,
            created_at: row.created_at,
        })
    }
}

fn sauce_names(kebab: &KebabVariant) -> Vec<String> {
    kebab.sauces.iter().map(|s| s.as_str().to_string()).collect()
}

fn ingredient_names(kebab: &KebabVariant) -> Vec<String> {
    kebab
        .ingredients
        .iter()
        .map(|i| i.as_str().to_string())
        .collect()
}

pub async fn get_kebab(
    id: Uuid,
    for_update: bool,
    conn: &mut PgConnection,
) -> Result<Option<KebabVariant>, AppError> {
    let lock = if for_update { " FOR UPDATE" } else { "" };
    let row = sqlx::query_as::<_, KebabRow>(&format!(
        "SELECT {KEBAB_COLUMNS} FROM kebab_variants k WHERE k.id = $1{lock}"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to fetch kebab variant", e))?;

    row.map(KebabVariant::try_from).transpose()
}

pub async fn get_kebabs(
    query: &KebabQuery,
    conn: &mut PgConnection,
) -> Result<Vec<KebabVariant>, AppError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {KEBAB_COLUMNS} FROM kebab_variants k JOIN places p ON p.id = k.place_id WHERE TRUE"
    ));

    if let Some(place_id) = query.place_id {
        builder.push(" AND k.place_id = ").push_bind(place_id);
    }
    if let Some(city) = &query.city {
        builder.push(" AND p.city = ").push_bind(city.clone());
    }
    if let Some(vegetarian) = query.vegetarian {
        builder.push(" AND k.is_vegetarian = ").push_bind(vegetarian);
    }
    if let Some(spicy) = query.spicy {
        builder.push(" AND k.spicy = ").push_bind(spicy);
    }
    if let Some(min) = query.min_rating {
        builder.push(" AND k.average_rating >= ").push_bind(min);
    }
    if query.rated_only {
        builder.push(" AND k.average_rating > 0");
    }
    if query.order_by_rating {
        builder.push(" ORDER BY k.average_rating DESC, k.created_at, k.id");
    } else {
        builder.push(" ORDER BY k.created_at, k.id");
    }
    if let Some(limit) = query.limit {
        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }

    let rows = builder
        .build_query_as::<KebabRow>()
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to fetch kebab variants", e))?;

    rows.into_iter().map(KebabVariant::try_from).collect()
}

pub async fn insert_kebab(kebab: &KebabVariant, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO kebab_variants (id, place_id, name, description, price, bread_type_id,
            meat_type_id, is_vegetarian, spicy, sauces, ingredients, average_rating, created_at)
        VALUES ($1, $2, $3, $4, $5::numeric, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(kebab.id)
    .bind(kebab.place_id)
    .bind(&kebab.name)
    .bind(&kebab.description)
    .bind(kebab.price)
    .bind(kebab.bread_type_id)
    .bind(kebab.meat_type_id)
    .bind(kebab.is_vegetarian)
    .bind(kebab.spicy)
    .bind(sauce_names(kebab))
    .bind(ingredient_names(kebab))
    .bind(kebab.average_rating)
    .bind(kebab.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to create kebab variant", e))?;

    Ok(())
}

pub async fn update_kebab(kebab: &KebabVariant, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE kebab_variants SET name = $2, description = $3, price = $4::numeric,
            bread_type_id = $5, meat_type_id = $6, is_vegetarian = $7, spicy = $8,
            sauces = $9, ingredients = $10
        WHERE id = $1",
    )
    .bind(kebab.id)
    .bind(&kebab.name)
    .bind(&kebab.description)
    .bind(kebab.price)
    .bind(kebab.bread_type_id)
    .bind(kebab.meat_type_id)
    .bind(kebab.is_vegetarian)
    .bind(kebab.spicy)
    .bind(sauce_names(kebab))
    .bind(ingredient_names(kebab))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to update kebab variant", e))?;

    Ok(())
}

pub async fn update_kebab_rating(
    id: Uuid,
    average_rating: f32,
    conn: &mut PgConnection,
) -> Result<(), AppError> {
    sqlx::query("UPDATE kebab_variants SET average_rating = $2 WHERE id = $1")
        .bind(id)
        .bind(average_rating)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to update kebab rating", e))?;

    Ok(())
}

pub async fn delete_kebab(id: Uuid, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query("DELETE FROM kebab_variants WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to delete kebab variant", e))?;

    Ok(())
}
