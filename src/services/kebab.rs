use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{Store, UnitOfWork},
    errors::AppError,
    models::{
        KebabVariant,
        kebab_variant::{CreateKebabPayload, KebabQuery, KebabVariantView, UpdateKebabPayload},
        validate,
    },
    services::{rating, views::ViewResolver},
};

pub const DEFAULT_TOP_LIMIT: usize = 10;

async fn ensure_catalog_refs(
    uow: &mut dyn UnitOfWork,
    bread_type_id: Uuid,
    meat_type_id: Uuid,
) -> Result<(), AppError> {
    uow.find_bread_type(bread_type_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Bread type not found with id {bread_type_id}"))
    })?;
    uow.find_meat_type(meat_type_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Meat type not found with id {meat_type_id}"))
    })?;
    Ok(())
}

pub async fn create_kebab(
    store: &dyn Store,
    payload: CreateKebabPayload,
) -> Result<KebabVariantView, AppError> {
    payload.validate()?;

    let mut uow = store.begin().await?;

    uow.find_place(payload.place_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Place not found with id {}", payload.place_id))
    })?;
    ensure_catalog_refs(uow.as_mut(), payload.bread_type_id, payload.meat_type_id).await?;

    let kebab = KebabVariant {
        id: Uuid::new_v4(),
        place_id: payload.place_id,
        name: payload.name,
        description: payload.description,
        price: validate::round_to_cents(payload.price),
        bread_type_id: payload.bread_type_id,
        meat_type_id: payload.meat_type_id,
        is_vegetarian: payload.is_vegetarian,
        spicy: payload.spicy,
        sauces: payload.sauces,
        ingredients: payload.ingredients,
        average_rating: 0.0,
        created_at: Utc::now(),
    };
    uow.insert_kebab(&kebab).await?;

    let view = ViewResolver::new().kebab_view(uow.as_mut(), kebab).await?;
    uow.commit().await?;

    tracing::info!("Kebab variant {} created at place {}", view.id, view.place_id);
    Ok(view)
}

pub async fn get_kebab(store: &dyn Store, id: Uuid) -> Result<KebabVariantView, AppError> {
    let mut uow = store.begin().await?;

    let kebab = uow
        .find_kebab(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Kebab variant with id {id} not found.")))?;

    ViewResolver::new().kebab_view(uow.as_mut(), kebab).await
}

/// All variants, optionally narrowed to vegetarian and/or spicy ones.
pub async fn list_kebabs(
    store: &dyn Store,
    vegetarian: Option<bool>,
    spicy: Option<bool>,
) -> Result<Vec<KebabVariantView>, AppError> {
    query_kebabs(
        store,
        KebabQuery {
            vegetarian,
            spicy,
            ..Default::default()
        },
    )
    .await
}

pub async fn kebabs_by_place(
    store: &dyn Store,
    place_id: Uuid,
) -> Result<Vec<KebabVariantView>, AppError> {
    let mut uow = store.begin().await?;

    uow.find_place(place_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place with id {place_id} not found.")))?;

    let kebabs = uow.list_kebabs(&KebabQuery::for_place(place_id)).await?;
    ViewResolver::new().kebab_views(uow.as_mut(), kebabs).await
}

/// Highest rated first. A city restricts the result to rated variants of places in it.
pub async fn top_rated_kebabs(
    store: &dyn Store,
    city: Option<String>,
    min_rating: Option<f32>,
    limit: usize,
) -> Result<Vec<KebabVariantView>, AppError> {
    query_kebabs(
        store,
        KebabQuery {
            rated_only: city.is_some(),
            city,
            min_rating,
            order_by_rating: true,
            limit: Some(limit),
            ..Default::default()
        },
    )
    .await
}

async fn query_kebabs(
    store: &dyn Store,
    query: KebabQuery,
) -> Result<Vec<KebabVariantView>, AppError> {
    let mut uow = store.begin().await?;
    let kebabs = uow.list_kebabs(&query).await?;
    ViewResolver::new().kebab_views(uow.as_mut(), kebabs).await
}

pub async fn update_kebab(
    store: &dyn Store,
    id: Uuid,
    payload: UpdateKebabPayload,
) -> Result<KebabVariantView, AppError> {
    payload.validate()?;

    let mut uow = store.begin().await?;

    let mut kebab = uow
        .lock_kebab(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Kebab variant with id {id} not found.")))?;

    payload.apply(&mut kebab);
    ensure_catalog_refs(uow.as_mut(), kebab.bread_type_id, kebab.meat_type_id).await?;
    uow.update_kebab(&kebab).await?;

    let view = ViewResolver::new().kebab_view(uow.as_mut(), kebab).await?;
    uow.commit().await?;

    tracing::info!("Kebab variant {} updated", id);
    Ok(view)
}

/// Deletes the variant with its reviews and refreshes the owning place.
pub async fn delete_kebab(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    let mut uow = store.begin().await?;

    let kebab = uow
        .lock_kebab(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Kebab variant with id {id} not found.")))?;

    let removed = uow.delete_reviews_for_kebab(kebab.id).await?;
    uow.delete_kebab(kebab.id).await?;
    rating::recompute_place_rating(uow.as_mut(), kebab.place_id).await?;

    uow.commit().await?;

    tracing::info!("Kebab variant {} deleted along with {} reviews", id, removed);
    Ok(())
}
