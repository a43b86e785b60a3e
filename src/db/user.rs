use sqlx::PgConnection;
use uuid::Uuid;

use crate::{errors::AppError, models::User};

const USER_COLUMNS: &str = "id, username, email, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

pub async fn get_user(
    id: Uuid,
    for_update: bool,
    conn: &mut PgConnection,
) -> Result<Option<User>, AppError> {
    let lock = if for_update { " FOR UPDATE" } else { "" };
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1{lock}"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to fetch user", e))?;

    Ok(row.map(User::from))
}

/// Looks a user up by one of its unique text columns.
pub async fn get_user_by(
    column: UniqueUserColumn,
    value: &str,
    conn: &mut PgConnection,
) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE {} = $1",
        column.as_str()
    ))
    .bind(value)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to fetch user", e))?;

    Ok(row.map(User::from))
}

#[derive(Debug, Clone, Copy)]
pub enum UniqueUserColumn {
    Username,
    Email,
}

impl UniqueUserColumn {
    fn as_str(&self) -> &'static str {
        match self {
            UniqueUserColumn::Username => "username",
            UniqueUserColumn::Email => "email",
        }
    }
}

pub async fn get_all_users(conn: &mut PgConnection) -> Result<Vec<User>, AppError> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
    ))
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::from_sqlx("Failed to fetch users", e))?;

    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn insert_user(user: &User, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query("INSERT INTO users (id, username, email, created_at) VALUES ($1, $2, $3, $4)")
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to create user", e))?;

    Ok(())
}

pub async fn update_user(user: &User, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET username = $2, email = $3 WHERE id = $1")
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to update user", e))?;

    Ok(())
}

pub async fn delete_user(id: Uuid, conn: &mut PgConnection) -> Result<(), AppError> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to delete user", e))?;

    Ok(())
}
