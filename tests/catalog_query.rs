use rust_decimal::Decimal;
use sea_orm::{DbBackend, QueryTrait};
use storefront_api::{
    response::Meta,
    routes::params::{CatalogParams, PageRequest},
    services::catalog_query::{
        CountryFilter, ExtendedFilter, LARGE_PAGE_SIZE, ListingVariant, ProductFilter, ProductSort,
        ProductSortField, STANDARD_PAGE_SIZE, category_products, escape_like, related_products,
    },
};
use uuid::Uuid;

fn params() -> CatalogParams {
    CatalogParams::default()
}

fn sql(filter: &ProductFilter) -> String {
    filter.select().build(DbBackend::Postgres).to_string()
}

#[test]
fn invalid_prices_are_ignored() {
    let filter = ProductFilter::from_params(
        &CatalogParams {
            min_price: Some("abc".into()),
            max_price: Some("1500.50".into()),
            ..params()
        },
        ListingVariant::Standard,
    );
    assert_eq!(filter.base.min_price, None);
    assert_eq!(filter.base.max_price, Some(Decimal::new(150050, 2)));
}

#[test]
fn verified_only_activates_on_literal_true() {
    for (raw, expected) in [("true", true), ("True", false), ("1", false), ("false", false)] {
        let filter = ProductFilter::from_params(
            &CatalogParams {
                verified: Some(raw.into()),
                ..params()
            },
            ListingVariant::Standard,
        );
        assert_eq!(filter.base.verified, expected, "verified={raw}");
    }
}

#[test]
fn blank_values_are_treated_as_absent() {
    let filter = ProductFilter::from_params(
        &CatalogParams {
            category: Some("  ".into()),
            condition: Some(String::new()),
            search: Some(" ".into()),
            ..params()
        },
        ListingVariant::Standard,
    );
    assert_eq!(filter, ProductFilter::default());
}

#[test]
fn country_filter_keeps_unparseable_ids() {
    let id = Uuid::new_v4();
    let filter = ProductFilter::from_params(
        &CatalogParams {
            country: Some(id.to_string()),
            ..params()
        },
        ListingVariant::Standard,
    );
    assert_eq!(filter.base.country, Some(CountryFilter::Id(id)));

    let filter = ProductFilter::from_params(
        &CatalogParams {
            country: Some("narnia".into()),
            ..params()
        },
        ListingVariant::Standard,
    );
    assert_eq!(filter.base.country, Some(CountryFilter::Unknown));
    assert!(sql(&filter).contains("1 = 0"));
}

#[test]
fn sort_parsing_handles_direction_and_unknown_fields() {
    assert_eq!(ProductSort::parse(None), ProductSort::default());
    assert_eq!(
        ProductSort::parse(Some("price")),
        ProductSort {
            field: ProductSortField::Price,
            descending: false
        }
    );
    assert_eq!(
        ProductSort::parse(Some("-star")),
        ProductSort {
            field: ProductSortField::Star,
            descending: true
        }
    );
    assert_eq!(ProductSort::parse(Some("password_hash")), ProductSort::default());
    assert_eq!(ProductSort::default().field, ProductSortField::CreatedAt);
    assert!(ProductSort::default().descending);
}

#[test]
fn only_large_listing_reads_company_and_size() {
    let raw = CatalogParams {
        company: Some("Apple".into()),
        size: Some("XL".into()),
        ..params()
    };

    let standard = ProductFilter::from_params(&raw, ListingVariant::Standard);
    assert!(standard.extended.is_none());

    let large = ProductFilter::from_params(&raw, ListingVariant::Large);
    assert_eq!(
        large.extended,
        Some(ExtendedFilter {
            company: Some("Apple".into()),
            size: Some("XL".into()),
        })
    );
    let rendered = sql(&large);
    assert!(rendered.contains(r#""company" = 'Apple'"#), "{rendered}");
    assert!(rendered.contains(r#""size" = 'XL'"#), "{rendered}");
}

#[test]
fn search_ignores_listing_filters() {
    let filter = ProductFilter::from_params(
        &CatalogParams {
            q: Some("iphone".into()),
            category: Some("phones".into()),
            verified: Some("true".into()),
            sort: Some("price".into()),
            ..params()
        },
        ListingVariant::Search,
    );
    assert_eq!(filter.base.search.as_deref(), Some("iphone"));
    assert_eq!(filter.base.category, None);
    assert!(!filter.base.verified);
    assert_eq!(filter.sort, ProductSort::default());

    let rendered = sql(&filter);
    assert!(rendered.contains("ILIKE '%iphone%'"), "{rendered}");
    assert!(rendered.contains(r#""brand""#), "{rendered}");
}

#[test]
fn listing_sql_is_scoped_to_active_products() {
    let filter = ProductFilter::from_params(
        &CatalogParams {
            category: Some("phones-a1b2c".into()),
            min_price: Some("100".into()),
            verified: Some("true".into()),
            ..params()
        },
        ListingVariant::Standard,
    );
    let rendered = sql(&filter);
    assert!(rendered.contains(r#""is_active" = TRUE"#), "{rendered}");
    assert!(rendered.contains(r#""verified" = TRUE"#), "{rendered}");
    assert!(rendered.contains("IN (SELECT"), "{rendered}");
    assert!(rendered.contains("'phones-a1b2c'"), "{rendered}");
    assert!(rendered.contains(r#""price" >= "#), "{rendered}");
    assert!(rendered.contains(r#"ORDER BY "products"."created_at" DESC"#), "{rendered}");
}

#[test]
fn category_and_related_selects_exclude_inactive_rows() {
    let category_id = Uuid::new_v4();
    let rendered = category_products(category_id)
        .build(DbBackend::Postgres)
        .to_string();
    assert!(rendered.contains(r#""is_active" = TRUE"#));
    assert!(rendered.contains(&category_id.to_string()));

    let product_id = Uuid::new_v4();
    let rendered = related_products(product_id, Uuid::new_v4())
        .build(DbBackend::Postgres)
        .to_string();
    assert!(rendered.contains(r#""is_active" = TRUE"#));
    assert!(rendered.contains("<>"), "{rendered}");
}

#[test]
fn like_wildcards_are_escaped() {
    assert_eq!(escape_like("50%_off"), r"50\%\_off");
    assert_eq!(escape_like("plain"), "plain");
}

#[test]
fn page_request_defaults_and_offsets() {
    assert_eq!(PageRequest::new(None, STANDARD_PAGE_SIZE).page, 1);
    assert_eq!(PageRequest::new(Some("abc"), STANDARD_PAGE_SIZE).page, 1);
    assert_eq!(PageRequest::new(Some("0"), STANDARD_PAGE_SIZE).page, 1);
    assert_eq!(PageRequest::new(Some("-3"), STANDARD_PAGE_SIZE).page, 1);

    let page = PageRequest::new(Some("99"), LARGE_PAGE_SIZE);
    assert_eq!(page.page, 99);
    assert_eq!(page.offset(), 980);
}

#[test]
fn huge_page_numbers_keep_offset_within_sql_range() {
    for raw in ["999999999999999999", "18446744073709551615"] {
        for per_page in [1, LARGE_PAGE_SIZE, STANDARD_PAGE_SIZE] {
            let page = PageRequest::new(Some(raw), per_page);
            assert!(page.offset() <= i64::MAX as u64, "page={raw} per_page={per_page}");
            assert!(page.page > 1);
        }
    }

    let meta = Meta::for_page(PageRequest::new(Some("18446744073709551615"), 1), 3);
    assert!(meta.page.expect("page") > 0);
    assert_eq!(meta.per_page, Some(1));
    assert_eq!(meta.total, Some(3));
}

#[test]
fn page_sizes_per_variant() {
    assert_eq!(ListingVariant::Standard.page_size(), 12);
    assert_eq!(ListingVariant::Large.page_size(), 10);
    assert_eq!(ListingVariant::Search.page_size(), 12);
}
