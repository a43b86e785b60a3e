//! Derived rating fields.
//!
//! `KebabVariant::average_rating` is the mean of its review ratings, `0.0` without
//! reviews. `Place::average_rating` is the mean over its *rated* variants only
//! (`average_rating > 0.0`) and `Place::review_count` counts reviews of all its
//! variants. Both are stored and must be recomputed, kebab first, after every write
//! that adds, changes or removes reviews, inside the same unit of work.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{db::UnitOfWork, errors::AppError, models::kebab_variant::KebabQuery};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSummary {
    pub average_rating: f32,
    pub review_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceAggregate {
    pub average_rating: f32,
    pub review_count: i32,
}

impl PlaceAggregate {
    pub const EMPTY: PlaceAggregate = PlaceAggregate {
        average_rating: 0.0,
        review_count: 0,
    };
}

pub fn average_rating(ratings: &[i16]) -> f32 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.iter().map(|&r| f64::from(r)).sum();
    (sum / ratings.len() as f64) as f32
}

pub fn place_aggregate(variants: &[VariantSummary]) -> PlaceAggregate {
    if variants.is_empty() {
        return PlaceAggregate::EMPTY;
    }

    let rated: Vec<f64> = variants
        .iter()
        .filter(|v| v.average_rating > 0.0)
        .map(|v| f64::from(v.average_rating))
        .collect();

    let average_rating = if rated.is_empty() {
        0.0
    } else {
        (rated.iter().sum::<f64>() / rated.len() as f64) as f32
    };

    let total: i64 = variants.iter().map(|v| v.review_count).sum();

    PlaceAggregate {
        average_rating,
        review_count: i32::try_from(total).unwrap_or(i32::MAX),
    }
}

/// Recomputes and stores the variant's average from its current reviews.
pub async fn recompute_kebab_rating(
    uow: &mut dyn UnitOfWork,
    kebab_id: Uuid,
) -> Result<f32, AppError> {
    let kebab = uow.lock_kebab(kebab_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Kebab variant not found for id {kebab_id}"))
    })?;

    let ratings = uow.ratings_for_kebab(kebab.id).await?;
    let average = average_rating(&ratings);
    uow.save_kebab_rating(kebab.id, average).await?;

    tracing::debug!(
        "Kebab {} rating recomputed from {} reviews: {}",
        kebab.id,
        ratings.len(),
        average
    );

    Ok(average)
}

/// Recomputes and stores the place aggregate from its variants' stored averages.
/// Run [`recompute_kebab_rating`] first for any variant whose reviews changed.
pub async fn recompute_place_rating(
    uow: &mut dyn UnitOfWork,
    place_id: Uuid,
) -> Result<PlaceAggregate, AppError> {
    let place = uow
        .lock_place(place_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place not found for id {place_id}")))?;

    let kebabs = uow.list_kebabs(&KebabQuery::for_place(place.id)).await?;

    let mut summaries = Vec::with_capacity(kebabs.len());
    for kebab in &kebabs {
        summaries.push(VariantSummary {
            average_rating: kebab.average_rating,
            review_count: uow.count_reviews_for_kebab(kebab.id).await?,
        });
    }

    let aggregate = place_aggregate(&summaries);
    uow.save_place_rating(place.id, aggregate.average_rating, aggregate.review_count)
        .await?;

    tracing::debug!(
        "Place {} rating recomputed over {} variants: {} ({} reviews)",
        place.id,
        kebabs.len(),
        aggregate.average_rating,
        aggregate.review_count
    );

    Ok(aggregate)
}

/// Refreshes a set of variants and then each of their places, in that order.
pub async fn refresh_aggregates(
    uow: &mut dyn UnitOfWork,
    kebab_ids: &BTreeSet<Uuid>,
    place_ids: &BTreeSet<Uuid>,
) -> Result<(), AppError> {
    for &kebab_id in kebab_ids {
        recompute_kebab_rating(uow, kebab_id).await?;
    }
    for &place_id in place_ids {
        recompute_place_rating(uow, place_id).await?;
    }
    Ok(())
}
