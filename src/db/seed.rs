use uuid::Uuid;

use crate::{
    db::Store,
    errors::AppError,
    models::{BreadType, MeatType},
};

const BREAD_TYPES: [&str; 3] = ["Sesam", "Dürüm", "Dreieckig"];

const MEAT_TYPES: [(&str, bool); 4] = [
    ("Hähnchen", true),
    ("Rind", false),
    ("Kalb", true),
    ("Vegetarisch", true),
];

/// Fills the bread and meat type tables when they are empty. Safe to run on every start.
pub async fn seed_catalog(store: &dyn Store) -> Result<(), AppError> {
    let mut uow = store.begin().await?;

    if uow.list_bread_types().await?.is_empty() {
        for name in BREAD_TYPES {
            uow.insert_bread_type(&BreadType {
                id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .await?;
        }
        tracing::info!("{} bread types seeded.", BREAD_TYPES.len());
    }

    if uow.list_meat_types().await?.is_empty() {
        for (name, is_halal) in MEAT_TYPES {
            uow.insert_meat_type(&MeatType {
                id: Uuid::new_v4(),
                name: name.to_string(),
                is_halal,
            })
            .await?;
        }
        tracing::info!("{} meat types seeded.", MEAT_TYPES.len());
    }

    uow.commit().await
}
