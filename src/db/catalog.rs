use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{BreadType, MeatType},
};

#[derive(sqlx::FromRow)]
struct BreadTypeRow {
    id: Uuid,
    name: String,
}

#[derive(sqlx::FromRow)]
struct MeatTypeRow {
    id: Uuid,
    name: String,
    is_halal: bool,
}

impl From<BreadTypeRow> for BreadType {
    fn from(row: BreadTypeRow) -> Self {
        BreadType {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<MeatTypeRow> for MeatType {
    fn from(row: MeatTypeRow) -> Self {
        MeatType {
            id: row.id,
            name: row.name,
            is_halal: row.is_halal,
        }
    }
}

pub async fn get_bread_type(
    id: Uuid,
    conn: &mut PgConnection,
) -> Result<Option<BreadType>, AppError> {
    let row = sqlx::query_as::<_, BreadTypeRow>("SELECT id, name FROM bread_types WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to fetch bread type", e))?;

    Ok(row.map(BreadType::from))
}

pub async fn get_meat_type(id: Uuid, conn: &mut PgConnection) -> Result<Option<MeatType>, AppError> {
    let row = sqlx::query_as::<_, MeatTypeRow>(
        "SELECT id, name, is_halal FROM meat_types WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to fetch meat type", e))?;

    Ok(row.map(MeatType::from))
}

pub async fn get_bread_types(conn: &mut PgConnection) -> Result<Vec<BreadType>, AppError> {
    let rows = sqlx::query_as::<_, BreadTypeRow>("SELECT id, name FROM bread_types ORDER BY name")
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to fetch bread types", e))?;

    Ok(rows.into_iter().map(BreadType::from).collect())
}

pub async fn get_meat_types(conn: &mut PgConnection) -> Result<Vec<MeatType>, AppError> {
    let rows = sqlx::query_as::<_, MeatTypeRow>(
        "SELECT id, name, is_halal FROM meat_types ORDER BY name",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to fetch meat types", e))?;

    Ok(rows.into_iter().map(MeatType::from).collect())
}

pub async fn insert_bread_type(
    bread_type: &BreadType,
    conn: &mut PgConnection,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO bread_types (id, name) VALUES ($1, $2)")
        .bind(bread_type.id)
        .bind(&bread_type.name)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to create bread type", e))?;

    Ok(())
}

pub async fn insert_meat_type(
    meat_type: &MeatType,
    conn: &mut PgConnection,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO meat_types (id, name, is_halal) VALUES ($1, $2, $3)")
        .bind(meat_type.id)
        .bind(&meat_type.name)
        .bind(meat_type.is_halal)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to create meat type", e))?;

    Ok(())
}
