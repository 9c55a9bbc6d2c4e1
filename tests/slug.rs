use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng};
use sea_orm::DbErr;
use storefront_api::{
    error::AppError,
    slug::{
        MAX_SLUG_ATTEMPTS, PRODUCT_CATEGORY_SUFFIX_LEN, PRODUCT_SUFFIX_LEN, ensure_product_slug,
        next_free_slug, product_category_slug, product_slug, slugify, with_slug_retry,
    },
};

#[test]
fn slugify_normalizes_names() {
    assert_eq!(slugify("Shoes"), "shoes");
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("  Multiple   spaces -- here "), "multiple-spaces-here");
    assert_eq!(slugify("iPhone 15 Pro"), "iphone-15-pro");
    assert_eq!(slugify("__init__"), "init");
    assert_eq!(slugify("!!!"), "");
}

#[test]
fn slugify_folds_accents() {
    assert_eq!(slugify("Café Crème"), "cafe-creme");
    assert_eq!(slugify("Über Größe"), "uber-groe");
    assert_eq!(slugify("Ｆｕｌｌｗｉｄｔｈ ① São Paulo"), "fullwidth-1-sao-paulo");
}

#[test]
fn category_slugs_take_first_free_numbered_candidate() {
    let mut taken = HashSet::new();

    let first = next_free_slug("Shoes", &taken);
    assert_eq!(first, "shoes");
    taken.insert(first);

    let second = next_free_slug("Shoes", &taken);
    assert_eq!(second, "shoes-1");
    taken.insert(second);

    assert_eq!(next_free_slug("shoes", &taken), "shoes-2");
    assert_eq!(next_free_slug("Boots", &taken), "boots");
}

#[test]
fn category_slug_falls_back_when_name_has_no_ascii() {
    assert_eq!(next_free_slug("???", &HashSet::new()), "category");
}

#[test]
fn product_category_slug_has_random_suffix_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let slug = product_category_slug("Phones", &mut rng);
        let suffix = slug.strip_prefix("phones-").expect("base prefix");
        assert!(PRODUCT_CATEGORY_SUFFIX_LEN.contains(&suffix.len()), "{slug}");
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

#[test]
fn product_slug_has_random_suffix_in_range() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = HashSet::new();
    for _ in 0..200 {
        let slug = product_slug("iPhone 15", &mut rng);
        let suffix = slug.strip_prefix("iphone-15-").expect("base prefix");
        assert!(PRODUCT_SUFFIX_LEN.contains(&suffix.len()), "{slug}");
        seen.insert(slug);
    }
    assert!(seen.len() > 190);
}

#[test]
fn blank_titles_still_produce_a_non_empty_slug() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(product_slug("", &mut rng).starts_with("product-"));
    assert!(product_category_slug("  ", &mut rng).starts_with("subcategory-"));
}

#[test]
fn existing_product_slug_is_kept() {
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(ensure_product_slug(Some("iphone-15-abc12"), "Renamed", &mut rng), None);

    let fresh = ensure_product_slug(Some("  "), "Pixel 8", &mut rng).expect("new slug");
    assert!(fresh.starts_with("pixel-8-"));

    let fresh = ensure_product_slug(None, "Pixel 8", &mut rng).expect("new slug");
    assert!(fresh.starts_with("pixel-8-"));
}

#[tokio::test]
async fn slug_retry_returns_first_success() {
    let mut calls = 0;
    let value = with_slug_retry("product", |n| {
        calls += 1;
        async move { Ok::<_, DbErr>(n) }
    })
    .await
    .expect("success");
    assert_eq!(value, 0);
    assert_eq!(calls, 1);
}

#[tokio::test]
async fn slug_retry_does_not_retry_other_errors() {
    let mut calls = 0;
    let result: Result<(), AppError> = with_slug_retry("product", |_| {
        calls += 1;
        async { Err(DbErr::Custom("connection reset".into())) }
    })
    .await;
    assert!(matches!(result, Err(AppError::OrmError(_))));
    assert_eq!(calls, 1);
    assert!(MAX_SLUG_ATTEMPTS > 1);
}
