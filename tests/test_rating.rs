use std::collections::BTreeSet;

use kebab_rating_be::{
    db::{MemoryStore, Store, seed::seed_catalog},
    errors::AppError,
    models::{
        Place, PriceRange, User,
        kebab_variant::{CreateKebabPayload, KebabVariantView},
        place::PlacePayload,
        review::{CreateReviewPayload, ReviewView, UpdateReviewPayload},
        user::CreateUserPayload,
    },
    services::{kebab, place, rating, review, user},
};
use uuid::Uuid;

const EPSILON: f32 = 1e-5;

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    seed_catalog(&store).await.expect("seed catalog");
    store
}

async fn create_place(store: &MemoryStore, name: &str, city: &str) -> Place {
    place::create_place(
        store,
        PlacePayload {
            name: name.to_string(),
            address: "Oranienstraße 1".to_string(),
            city: city.to_string(),
            price_range: PriceRange::Cheap,
        },
    )
    .await
    .expect("create place")
}

async fn create_kebab(store: &MemoryStore, place_id: Uuid, name: &str) -> KebabVariantView {
    let bread_types = kebab_rating_be::services::catalog::list_bread_types(store)
        .await
        .expect("bread types");
    let meat_types = kebab_rating_be::services::catalog::list_meat_types(store)
        .await
        .expect("meat types");

    kebab::create_kebab(
        store,
        CreateKebabPayload {
            place_id,
            name: name.to_string(),
            description: None,
            price: 6.5,
            bread_type_id: bread_types[0].id,
            meat_type_id: meat_types[0].id,
            is_vegetarian: false,
            spicy: false,
            sauces: BTreeSet::new(),
            ingredients: BTreeSet::new(),
        },
    )
    .await
    .expect("create kebab")
}

async fn create_user(store: &MemoryStore, username: &str) -> User {
    user::create_user(
        store,
        CreateUserPayload {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        },
    )
    .await
    .expect("create user")
}

async fn rate(
    store: &MemoryStore,
    user_id: Uuid,
    kebab_id: Uuid,
    rating: i64,
) -> Result<ReviewView, AppError> {
    review::create_review(
        store,
        user_id,
        CreateReviewPayload {
            kebab_variant_id: kebab_id,
            rating,
            title: "Lecker".to_string(),
            comment: "Würde ich wieder essen".to_string(),
        },
    )
    .await
}

#[tokio::test]
async fn new_variant_and_place_start_unrated() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Gemüse Kebap").await;

    assert_eq!(k.average_rating, 0.0);
    let p = place::get_place(&store, p.id).await.unwrap();
    assert_eq!(p.average_rating, 0.0);
    assert_eq!(p.review_count, 0);
}

#[tokio::test]
async fn variant_average_is_mean_of_ratings() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    rate(&store, alice.id, k.id, 4).await.unwrap();
    rate(&store, bob.id, k.id, 2).await.unwrap();

    let k = kebab::get_kebab(&store, k.id).await.unwrap();
    assert!((k.average_rating - 3.0).abs() < EPSILON);

    let p = place::get_place(&store, p.id).await.unwrap();
    assert!((p.average_rating - 3.0).abs() < EPSILON);
    assert_eq!(p.review_count, 2);
}

#[tokio::test]
async fn place_review_count_includes_every_variant() {
    let store = seeded_store().await;
    let p = create_place(&store, "Imren", "Berlin").await;
    let a = create_kebab(&store, p.id, "Döner").await;
    let b = create_kebab(&store, p.id, "Dürüm").await;
    let _unrated = create_kebab(&store, p.id, "Lahmacun").await;

    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;
    let carol = create_user(&store, "carol").await;

    rate(&store, alice.id, a.id, 5).await.unwrap();
    rate(&store, bob.id, a.id, 3).await.unwrap();
    rate(&store, carol.id, b.id, 2).await.unwrap();

    let p = place::get_place(&store, p.id).await.unwrap();
    // mean of variant averages 4.0 and 2.0; the unrated variant is left out
    assert!((p.average_rating - 3.0).abs() < EPSILON);
    assert_eq!(p.review_count, 3);
}

#[tokio::test]
async fn place_with_only_unreviewed_variants_stays_at_zero() {
    let store = seeded_store().await;
    let p = create_place(&store, "Leer", "Hamburg").await;
    create_kebab(&store, p.id, "Döner").await;
    create_kebab(&store, p.id, "Dürüm").await;

    let mut uow = store.begin().await.unwrap();
    let aggregate = rating::recompute_place_rating(uow.as_mut(), p.id)
        .await
        .unwrap();
    uow.commit().await.unwrap();

    assert_eq!(aggregate, rating::PlaceAggregate::EMPTY);
    let p = place::get_place(&store, p.id).await.unwrap();
    assert_eq!(p.average_rating, 0.0);
    assert_eq!(p.review_count, 0);
}

#[tokio::test]
async fn duplicate_review_is_a_conflict_and_keeps_aggregates() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;
    let alice = create_user(&store, "alice").await;

    rate(&store, alice.id, k.id, 4).await.unwrap();
    let err = rate(&store, alice.id, k.id, 1).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let k = kebab::get_kebab(&store, k.id).await.unwrap();
    assert!((k.average_rating - 4.0).abs() < EPSILON);
    let p = place::get_place(&store, p.id).await.unwrap();
    assert_eq!(p.review_count, 1);
    assert_eq!(review::reviews_by_kebab(&store, k.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected_before_any_write() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;
    let alice = create_user(&store, "alice").await;

    let err = rate(&store, alice.id, k.id, 6).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let err = rate(&store, alice.id, k.id, 0).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(review::list_reviews(&store).await.unwrap().is_empty());
    let k = kebab::get_kebab(&store, k.id).await.unwrap();
    assert_eq!(k.average_rating, 0.0);
}

#[tokio::test]
async fn review_for_unknown_user_or_variant_is_not_found() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;
    let alice = create_user(&store, "alice").await;

    let err = rate(&store, Uuid::new_v4(), k.id, 3).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = rate(&store, alice.id, Uuid::new_v4(), 3).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn updating_a_rating_reaggregates() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    let r = rate(&store, alice.id, k.id, 2).await.unwrap();
    rate(&store, bob.id, k.id, 4).await.unwrap();

    review::update_review(
        &store,
        r.id,
        UpdateReviewPayload {
            rating: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let k = kebab::get_kebab(&store, k.id).await.unwrap();
    assert!((k.average_rating - 4.5).abs() < EPSILON);
    let p = place::get_place(&store, p.id).await.unwrap();
    assert!((p.average_rating - 4.5).abs() < EPSILON);
}

#[tokio::test]
async fn deleting_last_review_resets_variant_and_place() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;
    let alice = create_user(&store, "alice").await;

    let r = rate(&store, alice.id, k.id, 5).await.unwrap();
    review::delete_review(&store, r.id).await.unwrap();

    let k = kebab::get_kebab(&store, k.id).await.unwrap();
    assert_eq!(k.average_rating, 0.0);
    let p = place::get_place(&store, p.id).await.unwrap();
    assert_eq!(p.average_rating, 0.0);
    assert_eq!(p.review_count, 0);

    let err = review::get_review(&store, r.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_variant_reaggregates_its_place() {
    let store = seeded_store().await;
    let p = create_place(&store, "Imren", "Berlin").await;
    let good = create_kebab(&store, p.id, "Döner").await;
    let bad = create_kebab(&store, p.id, "Dürüm").await;
    let alice = create_user(&store, "alice").await;

    rate(&store, alice.id, good.id, 5).await.unwrap();
    rate(&store, alice.id, bad.id, 1).await.unwrap();

    kebab::delete_kebab(&store, bad.id).await.unwrap();

    let p = place::get_place(&store, p.id).await.unwrap();
    assert!((p.average_rating - 5.0).abs() < EPSILON);
    assert_eq!(p.review_count, 1);
    assert_eq!(review::reviews_by_user(&store, alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_user_reaggregates_everything_they_rated() {
    let store = seeded_store().await;
    let berlin = create_place(&store, "Imren", "Berlin").await;
    let hamburg = create_place(&store, "Kebab Haus", "Hamburg").await;
    let a = create_kebab(&store, berlin.id, "Döner").await;
    let b = create_kebab(&store, hamburg.id, "Dürüm").await;
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    rate(&store, alice.id, a.id, 1).await.unwrap();
    rate(&store, alice.id, b.id, 1).await.unwrap();
    rate(&store, bob.id, a.id, 5).await.unwrap();

    user::delete_user(&store, alice.id).await.unwrap();

    let a = kebab::get_kebab(&store, a.id).await.unwrap();
    assert!((a.average_rating - 5.0).abs() < EPSILON);
    let b = kebab::get_kebab(&store, b.id).await.unwrap();
    assert_eq!(b.average_rating, 0.0);

    let berlin = place::get_place(&store, berlin.id).await.unwrap();
    assert_eq!(berlin.review_count, 1);
    let hamburg = place::get_place(&store, hamburg.id).await.unwrap();
    assert_eq!(hamburg.review_count, 0);
    assert_eq!(hamburg.average_rating, 0.0);

    let err = user::get_user(&store, alice.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_place_removes_its_variants_and_reviews() {
    let store = seeded_store().await;
    let p = create_place(&store, "Imren", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;
    let alice = create_user(&store, "alice").await;
    rate(&store, alice.id, k.id, 4).await.unwrap();

    place::delete_place(&store, p.id).await.unwrap();

    assert!(matches!(
        kebab::get_kebab(&store, k.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(review::reviews_by_user(&store, alice.id).await.unwrap().is_empty());
    assert!(matches!(
        place::delete_place(&store, p.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;
    rate(&store, alice.id, k.id, 5).await.unwrap();
    rate(&store, bob.id, k.id, 2).await.unwrap();

    let mut uow = store.begin().await.unwrap();
    let first_kebab = rating::recompute_kebab_rating(uow.as_mut(), k.id).await.unwrap();
    let first_place = rating::recompute_place_rating(uow.as_mut(), p.id).await.unwrap();
    let second_kebab = rating::recompute_kebab_rating(uow.as_mut(), k.id).await.unwrap();
    let second_place = rating::recompute_place_rating(uow.as_mut(), p.id).await.unwrap();
    uow.commit().await.unwrap();

    assert_eq!(first_kebab, second_kebab);
    assert_eq!(first_place, second_place);
    assert!((second_kebab - 3.5).abs() < EPSILON);
}

#[tokio::test]
async fn recompute_of_unknown_rows_is_not_found() {
    let store = seeded_store().await;
    let mut uow = store.begin().await.unwrap();

    let err = rating::recompute_kebab_rating(uow.as_mut(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = rating::recompute_place_rating(uow.as_mut(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn dropped_unit_of_work_leaves_store_untouched() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;

    {
        let mut uow = store.begin().await.unwrap();
        uow.save_kebab_rating(k.id, 4.2).await.unwrap();
        uow.save_place_rating(p.id, 4.2, 7).await.unwrap();
    }

    let k = kebab::get_kebab(&store, k.id).await.unwrap();
    assert_eq!(k.average_rating, 0.0);
    let p = place::get_place(&store, p.id).await.unwrap();
    assert_eq!(p.review_count, 0);
}

#[tokio::test]
async fn concurrent_reviews_all_count() {
    let store = seeded_store().await;
    let p = create_place(&store, "Mustafa's", "Berlin").await;
    let k = create_kebab(&store, p.id, "Döner").await;

    let mut users = Vec::new();
    for i in 0..8 {
        users.push(create_user(&store, &format!("user{i}")).await);
    }

    let kebab_id = k.id;
    let mut handles = Vec::new();
    for (i, u) in users.iter().enumerate() {
        let store = store.clone();
        let user_id = u.id;
        let rating = (i % 5 + 1) as i64;
        handles.push(tokio::spawn(async move {
            rate(&store, user_id, kebab_id, rating).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // ratings 1,2,3,4,5,1,2,3
    let k = kebab::get_kebab(&store, kebab_id).await.unwrap();
    assert!((k.average_rating - 21.0 / 8.0).abs() < EPSILON);
    let p = place::get_place(&store, p.id).await.unwrap();
    assert_eq!(p.review_count, 8);
}

#[tokio::test]
async fn top_rated_kebabs_filters_by_city_and_limit() {
    let store = seeded_store().await;
    let berlin = create_place(&store, "Imren", "Berlin").await;
    let hamburg = create_place(&store, "Kebab Haus", "Hamburg").await;
    let a = create_kebab(&store, berlin.id, "Döner").await;
    let b = create_kebab(&store, berlin.id, "Dürüm").await;
    let _unrated = create_kebab(&store, berlin.id, "Lahmacun").await;
    let c = create_kebab(&store, hamburg.id, "Döner").await;
    let alice = create_user(&store, "alice").await;

    rate(&store, alice.id, a.id, 3).await.unwrap();
    rate(&store, alice.id, b.id, 5).await.unwrap();
    rate(&store, alice.id, c.id, 4).await.unwrap();

    let top = kebab::top_rated_kebabs(&store, Some("Berlin".into()), None, 10)
        .await
        .unwrap();
    let ids: Vec<Uuid> = top.iter().map(|k| k.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);

    let top = kebab::top_rated_kebabs(&store, None, Some(4.0), 1)
        .await
        .unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, b.id);
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let store = seeded_store().await;
    create_user(&store, "alice").await;

    let err = user::create_user(
        &store,
        CreateUserPayload {
            username: "alice".into(),
            email: "other@example.com".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn deleted_user_cannot_review_and_every_rated_variant_refreshes() {
    let store = seeded_store().await;
    let berlin = create_place(&store, "Imren", "Berlin").await;
    let hamburg = create_place(&store, "Kebab Haus", "Hamburg").await;
    let a = create_kebab(&store, berlin.id, "Döner").await;
    let b = create_kebab(&store, berlin.id, "Dürüm").await;
    let c = create_kebab(&store, hamburg.id, "Lahmacun").await;
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    rate(&store, alice.id, a.id, 1).await.unwrap();
    rate(&store, alice.id, b.id, 2).await.unwrap();
    rate(&store, alice.id, c.id, 3).await.unwrap();
    rate(&store, bob.id, a.id, 5).await.unwrap();
    rate(&store, bob.id, c.id, 4).await.unwrap();

    {
        let mut uow = store.begin().await.unwrap();
        let locked = uow.lock_user(alice.id).await.unwrap();
        assert_eq!(locked.map(|u| u.id), Some(alice.id));
        assert!(uow.lock_user(Uuid::new_v4()).await.unwrap().is_none());
    }

    user::delete_user(&store, alice.id).await.unwrap();

    let a = kebab::get_kebab(&store, a.id).await.unwrap();
    assert!((a.average_rating - 5.0).abs() < EPSILON);
    let b = kebab::get_kebab(&store, b.id).await.unwrap();
    assert_eq!(b.average_rating, 0.0);
    let c = kebab::get_kebab(&store, c.id).await.unwrap();
    assert!((c.average_rating - 4.0).abs() < EPSILON);

    let berlin = place::get_place(&store, berlin.id).await.unwrap();
    assert!((berlin.average_rating - 5.0).abs() < EPSILON);
    assert_eq!(berlin.review_count, 1);
    let hamburg = place::get_place(&store, hamburg.id).await.unwrap();
    assert!((hamburg.average_rating - 4.0).abs() < EPSILON);
    assert_eq!(hamburg.review_count, 1);

    let err = rate(&store, alice.id, b.id, 5).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let b = kebab::get_kebab(&store, b.id).await.unwrap();
    assert_eq!(b.average_rating, 0.0);
}

#[tokio::test]
async fn deleting_a_place_with_many_rated_variants_leaves_other_places_alone() {
    let store = seeded_store().await;
    let imren = create_place(&store, "Imren", "Berlin").await;
    let other = create_place(&store, "Mustafa's", "Berlin").await;
    let variants = [
        create_kebab(&store, imren.id, "Döner").await,
        create_kebab(&store, imren.id, "Dürüm").await,
        create_kebab(&store, imren.id, "Lahmacun").await,
    ];
    let kept = create_kebab(&store, other.id, "Gemüse Kebap").await;
    let alice = create_user(&store, "alice").await;

    for k in &variants {
        rate(&store, alice.id, k.id, 4).await.unwrap();
    }
    rate(&store, alice.id, kept.id, 2).await.unwrap();

    place::delete_place(&store, imren.id).await.unwrap();

    for k in &variants {
        assert!(matches!(
            kebab::get_kebab(&store, k.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
    let remaining = review::reviews_by_user(&store, alice.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].kebab_variant_id, kept.id);

    let other = place::get_place(&store, other.id).await.unwrap();
    assert!((other.average_rating - 2.0).abs() < EPSILON);
    assert_eq!(other.review_count, 1);
}
