use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::UnitOfWork,
    errors::AppError,
    models::{
        KebabVariant, Place, Review, User, enums::PriceRange, kebab_variant::KebabVariantView,
        review::ReviewView,
    },
};

/// Resolves referenced names for API views, loading each referenced row once.
#[derive(Default)]
pub struct ViewResolver {
    places: HashMap<Uuid, Place>,
    kebabs: HashMap<Uuid, KebabVariant>,
    users: HashMap<Uuid, User>,
    bread_names: HashMap<Uuid, String>,
    meat_names: HashMap<Uuid, String>,
}

impl ViewResolver {
    pub fn new() -> Self {
        Self::default()
    }

    async fn place(&mut self, uow: &mut dyn UnitOfWork, id: Uuid) -> Result<&Place, AppError> {
        if !self.places.contains_key(&id) {
            let place = uow
                .find_place(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Place with id {id} does not exist")))?;
            self.places.insert(id, place);
        }
        self.places.get(&id).ok_or(AppError::InternalError)
    }

    async fn kebab(
        &mut self,
        uow: &mut dyn UnitOfWork,
        id: Uuid,
    ) -> Result<KebabVariant, AppError> {
        if let Some(kebab) = self.kebabs.get(&id) {
            return Ok(kebab.clone());
        }
        let kebab = uow.find_kebab(id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Kebab variant with id {id} not found."))
        })?;
        self.kebabs.insert(id, kebab.clone());
        Ok(kebab)
    }

    async fn username(&mut self, uow: &mut dyn UnitOfWork, id: Uuid) -> Result<String, AppError> {
        if let Some(user) = self.users.get(&id) {
            return Ok(user.username.clone());
        }
        let user = uow
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {id} not found.")))?;
        let username = user.username.clone();
        self.users.insert(id, user);
        Ok(username)
    }

    async fn bread_name(&mut self, uow: &mut dyn UnitOfWork, id: Uuid) -> Result<String, AppError> {
        if let Some(name) = self.bread_names.get(&id) {
            return Ok(name.clone());
        }
        let bread = uow
            .find_bread_type(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bread type not found with id {id}")))?;
        self.bread_names.insert(id, bread.name.clone());
        Ok(bread.name)
    }

    async fn meat_name(&mut self, uow: &mut dyn UnitOfWork, id: Uuid) -> Result<String, AppError> {
        if let Some(name) = self.meat_names.get(&id) {
            return Ok(name.clone());
        }
        let meat = uow
            .find_meat_type(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Meat type not found with id {id}")))?;
        self.meat_names.insert(id, meat.name.clone());
        Ok(meat.name)
    }

    pub async fn kebab_view(
        &mut self,
        uow: &mut dyn UnitOfWork,
        kebab: KebabVariant,
    ) -> Result<KebabVariantView, AppError> {
        let price_range = PriceRange::from_price(kebab.price);
        let place = self.place(uow, kebab.place_id).await?;
        let (place_name, place_city) = (place.name.clone(), place.city.clone());
        let bread_type_name = self.bread_name(uow, kebab.bread_type_id).await?;
        let meat_type_name = self.meat_name(uow, kebab.meat_type_id).await?;

        Ok(KebabVariantView {
            id: kebab.id,
            place_id: kebab.place_id,
            place_name,
            place_city,
            price_range,
            price_symbol: price_range.symbol().to_string(),
            bread_type_name,
            meat_type_name,
            sauces: kebab
                .sauces
                .iter()
                .map(|s| s.display_name().to_string())
                .collect(),
            ingredients: kebab
                .ingredients
                .iter()
                .map(|i| i.display_name().to_string())
                .collect(),
            name: kebab.name,
            description: kebab.description,
            price: kebab.price,
            is_vegetarian: kebab.is_vegetarian,
            spicy: kebab.spicy,
            average_rating: kebab.average_rating,
            created_at: kebab.created_at,
        })
    }

    pub async fn kebab_views(
        &mut self,
        uow: &mut dyn UnitOfWork,
        kebabs: Vec<KebabVariant>,
    ) -> Result<Vec<KebabVariantView>, AppError> {
        let mut views = Vec::with_capacity(kebabs.len());
        for kebab in kebabs {
            views.push(self.kebab_view(uow, kebab).await?);
        }
        Ok(views)
    }

    pub async fn review_view(
        &mut self,
        uow: &mut dyn UnitOfWork,
        review: Review,
    ) -> Result<ReviewView, AppError> {
        let username = self.username(uow, review.user_id).await?;
        let kebab = self.kebab(uow, review.kebab_variant_id).await?;
        let place_name = self.place(uow, kebab.place_id).await?.name.clone();

        Ok(ReviewView {
            id: review.id,
            user_id: review.user_id,
            username,
            kebab_variant_id: kebab.id,
            kebab_variant_name: kebab.name,
            place_name,
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            created_at: review.created_at,
        })
    }

    pub async fn review_views(
        &mut self,
        uow: &mut dyn UnitOfWork,
        reviews: Vec<Review>,
    ) -> Result<Vec<ReviewView>, AppError> {
        let mut views = Vec::with_capacity(reviews.len());
        for review in reviews {
            views.push(self.review_view(uow, review).await?);
        }
        Ok(views)
    }
}
