use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::Store,
    errors::AppError,
    models::{
        Review,
        review::{CreateReviewPayload, ReviewQuery, ReviewView, UpdateReviewPayload},
        validate,
    },
    services::{rating, views::ViewResolver},
};

/// Creates a review and refreshes the variant and place aggregates in the same unit of work.
pub async fn create_review(
    store: &dyn Store,
    user_id: Uuid,
    payload: CreateReviewPayload,
) -> Result<ReviewView, AppError> {
    payload.validate()?;

    let mut uow = store.begin().await?;

    // user before kebab variant, matching delete_user
    uow.lock_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found with id {user_id}")))?;

    let kebab = uow
        .lock_kebab(payload.kebab_variant_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Kebab variant not found with id {}",
                payload.kebab_variant_id
            ))
        })?;

    if uow.review_exists(user_id, kebab.id).await? {
        return Err(AppError::Conflict(
            "User has already reviewed this kebab variant.".into(),
        ));
    }

    let review = Review {
        id: Uuid::new_v4(),
        user_id,
        kebab_variant_id: kebab.id,
        rating: validate::rating(payload.rating)?,
        title: payload.title,
        comment: payload.comment,
        created_at: Utc::now(),
    };
    uow.insert_review(&review).await?;

    rating::recompute_kebab_rating(uow.as_mut(), kebab.id).await?;
    rating::recompute_place_rating(uow.as_mut(), kebab.place_id).await?;

    let view = ViewResolver::new().review_view(uow.as_mut(), review).await?;
    uow.commit().await?;

    tracing::info!(
        "Review {} created by user {} for kebab {} (rating {})",
        view.id,
        user_id,
        view.kebab_variant_id,
        view.rating
    );

    Ok(view)
}

pub async fn update_review(
    store: &dyn Store,
    review_id: Uuid,
    payload: UpdateReviewPayload,
) -> Result<ReviewView, AppError> {
    payload.validate()?;

    let mut uow = store.begin().await?;

    let mut review = uow
        .find_review(review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review not found with id {review_id}")))?;

    let kebab = uow
        .lock_kebab(review.kebab_variant_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Kebab variant not found with id {}",
                review.kebab_variant_id
            ))
        })?;

    payload.apply(&mut review)?;
    uow.update_review(&review).await?;

    rating::recompute_kebab_rating(uow.as_mut(), kebab.id).await?;
    rating::recompute_place_rating(uow.as_mut(), kebab.place_id).await?;

    let view = ViewResolver::new().review_view(uow.as_mut(), review).await?;
    uow.commit().await?;

    tracing::info!("Review {} updated", review_id);
    Ok(view)
}

/// Removes a review and refreshes the aggregates it contributed to.
pub async fn delete_review(store: &dyn Store, review_id: Uuid) -> Result<(), AppError> {
    let mut uow = store.begin().await?;

    let review = uow
        .find_review(review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review not found with id {review_id}")))?;

    let kebab = uow
        .lock_kebab(review.kebab_variant_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Kebab variant not found with id {}",
                review.kebab_variant_id
            ))
        })?;

    uow.delete_review(review.id).await?;
    rating::refresh_aggregates(
        uow.as_mut(),
        &BTreeSet::from([kebab.id]),
        &BTreeSet::from([kebab.place_id]),
    )
    .await?;

    uow.commit().await?;

    tracing::info!("Review {} deleted", review_id);
    Ok(())
}

pub async fn get_review(store: &dyn Store, review_id: Uuid) -> Result<ReviewView, AppError> {
    let mut uow = store.begin().await?;

    let review = uow
        .find_review(review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review not found with id {review_id}")))?;

    ViewResolver::new().review_view(uow.as_mut(), review).await
}

pub async fn list_reviews(store: &dyn Store) -> Result<Vec<ReviewView>, AppError> {
    let mut uow = store.begin().await?;
    let reviews = uow.list_reviews(&ReviewQuery::default()).await?;
    ViewResolver::new().review_views(uow.as_mut(), reviews).await
}

pub async fn reviews_by_user(
    store: &dyn Store,
    user_id: Uuid,
) -> Result<Vec<ReviewView>, AppError> {
    let mut uow = store.begin().await?;

    uow.find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found with id {user_id}")))?;

    let reviews = uow
        .list_reviews(&ReviewQuery {
            user_id: Some(user_id),
            ..Default::default()
        })
        .await?;

    ViewResolver::new().review_views(uow.as_mut(), reviews).await
}

pub async fn reviews_by_kebab(
    store: &dyn Store,
    kebab_id: Uuid,
) -> Result<Vec<ReviewView>, AppError> {
    let mut uow = store.begin().await?;

    uow.find_kebab(kebab_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Kebab variant not found with id {kebab_id}"))
    })?;

    let reviews = uow
        .list_reviews(&ReviewQuery {
            kebab_variant_id: Some(kebab_id),
            ..Default::default()
        })
        .await?;

    ViewResolver::new().review_views(uow.as_mut(), reviews).await
}
