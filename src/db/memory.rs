use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    db::{Store, UnitOfWork},
    errors::AppError,
    models::{
        BreadType, KebabVariant, MeatType, Place, Review, User, kebab_variant::KebabQuery,
        place::PlaceQuery, review::ReviewQuery,
    },
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    places: HashMap<Uuid, Place>,
    kebabs: HashMap<Uuid, KebabVariant>,
    reviews: HashMap<Uuid, Review>,
    bread_types: HashMap<Uuid, BreadType>,
    meat_types: HashMap<Uuid, MeatType>,
}

/// Process-local store for development and tests.
///
/// A unit of work holds the store mutex from `begin` until it is committed or
/// dropped and edits a private copy of the tables, so writers are serialized and
/// an uncommitted unit of work leaves no trace.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, working }))
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

fn missing(kind: &str, id: Uuid) -> AppError {
    AppError::DatabaseError(format!("{kind} {id} does not exist"))
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn lock_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        self.find_user(id).await
    }

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .working
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.working.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&mut self) -> Result<Vec<User>, AppError> {
        let users = self.working.users.values().cloned().collect();
        Ok(sorted_by(users, |u: &User| (u.created_at, u.id)))
    }

    async fn insert_user(&mut self, user: &User) -> Result<(), AppError> {
        let taken = self
            .working
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(AppError::Conflict("Failed to create user: duplicate entry".into()));
        }
        self.working.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), AppError> {
        let stored = self
            .working
            .users
            .get_mut(&user.id)
            .ok_or_else(|| missing("User", user.id))?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        Ok(())
    }

    async fn delete_user(&mut self, id: Uuid) -> Result<(), AppError> {
        if self.working.reviews.values().any(|r| r.user_id == id) {
            return Err(AppError::DatabaseError(format!(
                "User {id} is still referenced by reviews"
            )));
        }
        self.working.users.remove(&id);
        Ok(())
    }

    async fn find_place(&mut self, id: Uuid) -> Result<Option<Place>, AppError> {
        Ok(self.working.places.get(&id).cloned())
    }

    async fn lock_place(&mut self, id: Uuid) -> Result<Option<Place>, AppError> {
        // the whole store is already held by this unit of work
        self.find_place(id).await
    }

    async fn list_places(&mut self, query: &PlaceQuery) -> Result<Vec<Place>, AppError> {
        let mut places: Vec<Place> = self
            .working
            .places
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        places.sort_by_key(|p| (p.created_at, p.id));
        if query.order_by_rating {
            places.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
        }
        Ok(places)
    }

    async fn insert_place(&mut self, place: &Place) -> Result<(), AppError> {
        self.working.places.insert(place.id, place.clone());
        Ok(())
    }

    async fn update_place(&mut self, place: &Place) -> Result<(), AppError> {
        let stored = self
            .working
            .places
            .get_mut(&place.id)
            .ok_or_else(|| missing("Place", place.id))?;
        stored.name = place.name.clone();
        stored.address = place.address.clone();
        stored.city = place.city.clone();
        stored.price_range = place.price_range;
        Ok(())
    }

    async fn save_place_rating(
        &mut self,
        id: Uuid,
        average_rating: f32,
        review_count: i32,
    ) -> Result<(), AppError> {
        let stored = self
            .working
            .places
            .get_mut(&id)
            .ok_or_else(|| missing("Place", id))?;
        stored.average_rating = average_rating;
        stored.review_count = review_count;
        Ok(())
    }

    async fn delete_place(&mut self, id: Uuid) -> Result<(), AppError> {
        if self.working.kebabs.values().any(|k| k.place_id == id) {
            return Err(AppError::DatabaseError(format!(
                "Place {id} is still referenced by kebab variants"
            )));
        }
        self.working.places.remove(&id);
        Ok(())
    }

    async fn find_kebab(&mut self, id: Uuid) -> Result<Option<KebabVariant>, AppError> {
        Ok(self.working.kebabs.get(&id).cloned())
    }

    async fn lock_kebab(&mut self, id: Uuid) -> Result<Option<KebabVariant>, AppError> {
        self.find_kebab(id).await
    }

    async fn list_kebabs(&mut self, query: &KebabQuery) -> Result<Vec<KebabVariant>, AppError> {
        let places = &self.working.places;
        let mut kebabs: Vec<KebabVariant> = self
            .working
            .kebabs
            .values()
            .filter(|k| query.matches(k))
            .filter(|k| match &query.city {
                Some(city) => places.get(&k.place_id).is_some_and(|p| &p.city == city),
                None => true,
            })
            .cloned()
            .collect();

        kebabs.sort_by_key(|k| (k.created_at, k.id));
        if query.order_by_rating {
            kebabs.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
        }
        if let Some(limit) = query.limit {
            kebabs.truncate(limit);
        }
        Ok(kebabs)
    }

    async fn insert_kebab(&mut self, kebab: &KebabVariant) -> Result<(), AppError> {
        if !self.working.places.contains_key(&kebab.place_id) {
            return Err(missing("Place", kebab.place_id));
        }
        self.working.kebabs.insert(kebab.id, kebab.clone());
        Ok(())
    }

    async fn update_kebab(&mut self, kebab: &KebabVariant) -> Result<(), AppError> {
        let stored = self
            .working
            .kebabs
            .get_mut(&kebab.id)
            .ok_or_else(|| missing("Kebab variant", kebab.id))?;
        stored.name = kebab.name.clone();
        stored.description = kebab.description.clone();
        stored.price = kebab.price;
        stored.bread_type_id = kebab.bread_type_id;
        stored.meat_type_id = kebab.meat_type_id;
        stored.is_vegetarian = kebab.is_vegetarian;
        stored.spicy = kebab.spicy;
        stored.sauces = kebab.sauces.clone();
        stored.ingredients = kebab.ingredients.clone();
        Ok(())
    }

    async fn save_kebab_rating(&mut self, id: Uuid, average_rating: f32) -> Result<(), AppError> {
        let stored = self
            .working
            .kebabs
            .get_mut(&id)
            .ok_or_else(|| missing("Kebab variant", id))?;
        stored.average_rating = average_rating;
        Ok(())
    }

    async fn delete_kebab(&mut self, id: Uuid) -> Result<(), AppError> {
        if self.working.reviews.values().any(|r| r.kebab_variant_id == id) {
            return Err(AppError::DatabaseError(format!(
                "Kebab variant {id} is still referenced by reviews"
            )));
        }
        self.working.kebabs.remove(&id);
        Ok(())
    }

    async fn find_review(&mut self, id: Uuid) -> Result<Option<Review>, AppError> {
        Ok(self.working.reviews.get(&id).cloned())
    }

    async fn review_exists(&mut self, user_id: Uuid, kebab_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .working
            .reviews
            .values()
            .any(|r| r.user_id == user_id && r.kebab_variant_id == kebab_id))
    }

    async fn list_reviews(&mut self, query: &ReviewQuery) -> Result<Vec<Review>, AppError> {
        let mut reviews: Vec<Review> = self
            .working
            .reviews
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(reviews)
    }

    async fn ratings_for_kebab(&mut self, kebab_id: Uuid) -> Result<Vec<i16>, AppError> {
        Ok(self
            .working
            .reviews
            .values()
            .filter(|r| r.kebab_variant_id == kebab_id)
            .map(|r| r.rating)
            .collect())
    }

    async fn count_reviews_for_kebab(&mut self, kebab_id: Uuid) -> Result<i64, AppError> {
        let count = self
            .working
            .reviews
            .values()
            .filter(|r| r.kebab_variant_id == kebab_id)
            .count();
        Ok(count as i64)
    }

    async fn insert_review(&mut self, review: &Review) -> Result<(), AppError> {
        if !self.working.users.contains_key(&review.user_id) {
            return Err(missing("User", review.user_id));
        }
        if !self.working.kebabs.contains_key(&review.kebab_variant_id) {
            return Err(missing("Kebab variant", review.kebab_variant_id));
        }
        let duplicate = self.working.reviews.values().any(|r| {
            r.user_id == review.user_id && r.kebab_variant_id == review.kebab_variant_id
        });
        if duplicate {
            return Err(AppError::Conflict("Failed to create review: duplicate entry".into()));
        }
        self.working.reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn update_review(&mut self, review: &Review) -> Result<(), AppError> {
        let stored = self
            .working
            .reviews
            .get_mut(&review.id)
            .ok_or_else(|| missing("Review", review.id))?;
        stored.rating = review.rating;
        stored.title = review.title.clone();
        stored.comment = review.comment.clone();
        Ok(())
    }

    async fn delete_review(&mut self, id: Uuid) -> Result<(), AppError> {
        self.working.reviews.remove(&id);
        Ok(())
    }

    async fn delete_reviews_for_kebab(&mut self, kebab_id: Uuid) -> Result<u64, AppError> {
        let before = self.working.reviews.len();
        self.working
            .reviews
            .retain(|_, r| r.kebab_variant_id != kebab_id);
        Ok((before - self.working.reviews.len()) as u64)
    }

    async fn delete_reviews_for_user(&mut self, user_id: Uuid) -> Result<u64, AppError> {
        let before = self.working.reviews.len();
        self.working.reviews.retain(|_, r| r.user_id != user_id);
        Ok((before - self.working.reviews.len()) as u64)
    }

    async fn find_bread_type(&mut self, id: Uuid) -> Result<Option<BreadType>, AppError> {
        Ok(self.working.bread_types.get(&id).cloned())
    }

    async fn find_meat_type(&mut self, id: Uuid) -> Result<Option<MeatType>, AppError> {
        Ok(self.working.meat_types.get(&id).cloned())
    }

    async fn list_bread_types(&mut self) -> Result<Vec<BreadType>, AppError> {
        let types = self.working.bread_types.values().cloned().collect();
        Ok(sorted_by(types, |b: &BreadType| b.name.clone()))
    }

    async fn list_meat_types(&mut self) -> Result<Vec<MeatType>, AppError> {
        let types = self.working.meat_types.values().cloned().collect();
        Ok(sorted_by(types, |m: &MeatType| m.name.clone()))
    }

    async fn insert_bread_type(&mut self, bread_type: &BreadType) -> Result<(), AppError> {
        self.working
            .bread_types
            .insert(bread_type.id, bread_type.clone());
        Ok(())
    }

    async fn insert_meat_type(&mut self, meat_type: &MeatType) -> Result<(), AppError> {
        self.working.meat_types.insert(meat_type.id, meat_type.clone());
        Ok(())
    }
}
