use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::Store,
    errors::AppError,
    models::{
        Place,
        kebab_variant::KebabQuery,
        place::{PlacePayload, PlaceQuery},
    },
};

pub const DEFAULT_TOP_MIN_RATING: f32 = 4.0;

pub async fn create_place(store: &dyn Store, payload: PlacePayload) -> Result<Place, AppError> {
    payload.validate()?;

    let place = Place {
        id: Uuid::new_v4(),
        name: payload.name,
        address: payload.address,
        city: payload.city,
        price_range: payload.price_range,
        average_rating: 0.0,
        review_count: 0,
        created_at: Utc::now(),
    };

    let mut uow = store.begin().await?;
    uow.insert_place(&place).await?;
    uow.commit().await?;

    tracing::info!("Place created: {} (ID: {})", place.name, place.id);
    Ok(place)
}

pub async fn get_place(store: &dyn Store, id: Uuid) -> Result<Place, AppError> {
    let mut uow = store.begin().await?;
    uow.find_place(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place with id {id} does not exist")))
}

pub async fn list_places(store: &dyn Store, city: Option<String>) -> Result<Vec<Place>, AppError> {
    let mut uow = store.begin().await?;
    uow.list_places(&PlaceQuery {
        city,
        ..Default::default()
    })
    .await
}

pub async fn top_rated_places(store: &dyn Store, min_rating: f32) -> Result<Vec<Place>, AppError> {
    let mut uow = store.begin().await?;
    uow.list_places(&PlaceQuery {
        min_rating: Some(min_rating),
        order_by_rating: true,
        ..Default::default()
    })
    .await
}

/// Replaces the descriptive fields. Ratings and `created_at` are kept.
pub async fn update_place(
    store: &dyn Store,
    id: Uuid,
    payload: PlacePayload,
) -> Result<Place, AppError> {
    payload.validate()?;

    let mut uow = store.begin().await?;

    let mut place = uow
        .lock_place(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place with id {id} does not exist")))?;

    place.name = payload.name;
    place.address = payload.address;
    place.city = payload.city;
    place.price_range = payload.price_range;

    uow.update_place(&place).await?;
    uow.commit().await?;

    tracing::info!("Place {} updated", id);
    Ok(place)
}

/// Deletes every review of every variant, then the variants, then the place.
pub async fn delete_place(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    let mut uow = store.begin().await?;

    uow.find_place(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place with id {id} does not exist")))?;

    let kebabs = uow.list_kebabs(&KebabQuery::for_place(id)).await?;
    let kebab_ids: BTreeSet<Uuid> = kebabs.iter().map(|k| k.id).collect();

    // variants in id order before the place, same order as delete_user
    for &kebab_id in &kebab_ids {
        uow.lock_kebab(kebab_id).await?;
    }
    uow.lock_place(id).await?;

    let mut removed_reviews = 0;
    for kebab in &kebabs {
        removed_reviews += uow.delete_reviews_for_kebab(kebab.id).await?;
        uow.delete_kebab(kebab.id).await?;
    }
    uow.delete_place(id).await?;

    uow.commit().await?;

    tracing::info!(
        "Place {} deleted along with {} kebab variants and {} reviews",
        id,
        kebabs.len(),
        removed_reviews
    );
    Ok(())
}
