use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{Store, UnitOfWork},
    errors::AppError,
    models::{
        User,
        review::ReviewQuery,
        user::{CreateUserPayload, UpdateUserPayload},
    },
    services::rating,
};

async fn ensure_username_free(
    uow: &mut dyn UnitOfWork,
    username: &str,
    owner: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(existing) = uow.find_user_by_username(username).await? {
        if Some(existing.id) != owner {
            return Err(AppError::Conflict(format!(
                "Username {username} is already taken."
            )));
        }
    }
    Ok(())
}

async fn ensure_email_free(
    uow: &mut dyn UnitOfWork,
    email: &str,
    owner: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(existing) = uow.find_user_by_email(email).await? {
        if Some(existing.id) != owner {
            return Err(AppError::Conflict(format!(
                "Email {email} is already registered."
            )));
        }
    }
    Ok(())
}

pub async fn create_user(store: &dyn Store, payload: CreateUserPayload) -> Result<User, AppError> {
    payload.validate()?;

    let mut uow = store.begin().await?;

    ensure_username_free(uow.as_mut(), &payload.username, None).await?;
    ensure_email_free(uow.as_mut(), &payload.email, None).await?;

    let user = User {
        id: Uuid::new_v4(),
        username: payload.username,
        email: payload.email,
        created_at: Utc::now(),
    };
    uow.insert_user(&user).await?;
    uow.commit().await?;

    tracing::info!("User created: {} (ID: {})", user.username, user.id);
    Ok(user)
}

pub async fn get_user(store: &dyn Store, id: Uuid) -> Result<User, AppError> {
    let mut uow = store.begin().await?;
    uow.find_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {id} not found.")))
}

pub async fn get_user_by_username(store: &dyn Store, username: &str) -> Result<User, AppError> {
    let mut uow = store.begin().await?;
    uow.find_user_by_username(username).await?.ok_or_else(|| {
        AppError::NotFound(format!("User with username {username} not found."))
    })
}

pub async fn list_users(store: &dyn Store) -> Result<Vec<User>, AppError> {
    let mut uow = store.begin().await?;
    uow.list_users().await
}

pub async fn update_user(
    store: &dyn Store,
    id: Uuid,
    payload: UpdateUserPayload,
) -> Result<User, AppError> {
    payload.validate()?;

    let mut uow = store.begin().await?;

    let mut user = uow
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {id} not found.")))?;

    if let Some(username) = payload.username {
        ensure_username_free(uow.as_mut(), &username, Some(id)).await?;
        user.username = username;
    }
    if let Some(email) = payload.email {
        ensure_email_free(uow.as_mut(), &email, Some(id)).await?;
        user.email = email;
    }

    uow.update_user(&user).await?;
    uow.commit().await?;

    tracing::info!("User {} updated", id);
    Ok(user)
}

/// Deletes the user's reviews and the user, then refreshes every variant and place
/// those reviews contributed to.
pub async fn delete_user(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    let mut uow = store.begin().await?;

    // holding the user row keeps new reviews by this user out until commit
    uow.lock_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {id} not found.")))?;

    let reviews = uow
        .list_reviews(&ReviewQuery {
            user_id: Some(id),
            ..Default::default()
        })
        .await?;

    let kebab_ids: BTreeSet<Uuid> = reviews.iter().map(|r| r.kebab_variant_id).collect();
    let mut place_ids = BTreeSet::new();
    for &kebab_id in &kebab_ids {
        if let Some(kebab) = uow.lock_kebab(kebab_id).await? {
            place_ids.insert(kebab.place_id);
        }
    }

    let removed = uow.delete_reviews_for_user(id).await?;
    uow.delete_user(id).await?;
    rating::refresh_aggregates(uow.as_mut(), &kebab_ids, &place_ids).await?;

    uow.commit().await?;

    tracing::info!("User {} deleted along with {} reviews", id, removed);
    Ok(())
}
