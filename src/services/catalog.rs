use crate::{
    db::Store,
    errors::AppError,
    models::{BreadType, Ingredient, MeatType, Sauce, catalog::EnumOption},
};

pub async fn list_bread_types(store: &dyn Store) -> Result<Vec<BreadType>, AppError> {
    let mut uow = store.begin().await?;
    uow.list_bread_types().await
}

pub async fn list_meat_types(store: &dyn Store) -> Result<Vec<MeatType>, AppError> {
    let mut uow = store.begin().await?;
    uow.list_meat_types().await
}

pub fn list_sauces() -> Vec<EnumOption> {
    Sauce::ALL
        .iter()
        .map(|s| EnumOption {
            code: s.as_str(),
            name: s.display_name(),
            name_en: s.display_name_en(),
        })
        .collect()
}

pub fn list_ingredients() -> Vec<EnumOption> {
    Ingredient::ALL
        .iter()
        .map(|i| EnumOption {
            code: i.as_str(),
            name: i.display_name(),
            name_en: i.display_name_en(),
        })
        .collect()
}
