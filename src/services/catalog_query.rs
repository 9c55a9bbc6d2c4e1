//! Typed product filters built from the raw catalog query string.
//!
//! The standard listing and the search page share [`BaseFilter`]; the large
//! listing adds [`ExtendedFilter`] on top of it. Every condition produced
//! here is anded with `is_active = true`.

use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use crate::entity::{
    product_categories,
    products::{Column, Entity as Products},
};
use crate::routes::params::CatalogParams;

pub const STANDARD_PAGE_SIZE: u64 = 12;
pub const LARGE_PAGE_SIZE: u64 = 10;
pub const SEARCH_PAGE_SIZE: u64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingVariant {
    Standard,
    Large,
    Search,
}

impl ListingVariant {
    pub fn page_size(self) -> u64 {
        match self {
            ListingVariant::Standard => STANDARD_PAGE_SIZE,
            ListingVariant::Large => LARGE_PAGE_SIZE,
            ListingVariant::Search => SEARCH_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortField {
    CreatedAt,
    UpdatedAt,
    Price,
    Title,
    Star,
    Review,
    Discount,
    Year,
    Quantity,
}

impl ProductSortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            "price" => Some(Self::Price),
            "title" => Some(Self::Title),
            "star" => Some(Self::Star),
            "review" => Some(Self::Review),
            "discount" => Some(Self::Discount),
            "year" => Some(Self::Year),
            "quantity" => Some(Self::Quantity),
            _ => None,
        }
    }

    fn column(self) -> Column {
        match self {
            Self::CreatedAt => Column::CreatedAt,
            Self::UpdatedAt => Column::UpdatedAt,
            Self::Price => Column::Price,
            Self::Title => Column::Title,
            Self::Star => Column::Star,
            Self::Review => Column::Review,
            Self::Discount => Column::Discount,
            Self::Year => Column::Year,
            Self::Quantity => Column::Quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    pub field: ProductSortField,
    pub descending: bool,
}

impl Default for ProductSort {
    fn default() -> Self {
        Self {
            field: ProductSortField::CreatedAt,
            descending: true,
        }
    }
}

impl ProductSort {
    /// `price`, `-price`, ... Unknown fields fall back to newest first.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = non_blank(raw) else {
            return Self::default();
        };
        let (descending, name) = match raw.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, raw),
        };
        match ProductSortField::parse(name) {
            Some(field) => Self { field, descending },
            None => Self::default(),
        }
    }

    pub fn apply(&self, select: Select<Products>) -> Select<Products> {
        let select = if self.descending {
            select.order_by_desc(self.field.column())
        } else {
            select.order_by_asc(self.field.column())
        };
        // stable pages when the sort key ties
        select.order_by_asc(Column::Id)
    }
}

/// A foreign-key filter value. Values that cannot name any row still filter,
/// they just match nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryFilter {
    Id(Uuid),
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseFilter {
    pub category: Option<String>,
    pub country: Option<CountryFilter>,
    pub condition: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub verified: bool,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedFilter {
    pub company: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub base: BaseFilter,
    pub extended: Option<ExtendedFilter>,
    pub sort: ProductSort,
}

impl BaseFilter {
    pub fn from_params(params: &CatalogParams) -> Self {
        Self {
            category: non_blank(params.category.as_deref()).map(str::to_string),
            country: non_blank(params.country.as_deref()).map(|raw| {
                Uuid::parse_str(raw)
                    .map(CountryFilter::Id)
                    .unwrap_or(CountryFilter::Unknown)
            }),
            condition: non_blank(params.condition.as_deref()).map(str::to_string),
            min_price: parse_price(params.min_price.as_deref()),
            max_price: parse_price(params.max_price.as_deref()),
            verified: params.verified.as_deref() == Some("true"),
            search: non_blank(params.search.as_deref()).map(str::to_string),
        }
    }

    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(slug) = &self.category {
            condition = condition.add(
                Column::ProductCategoryId.in_subquery(
                    Query::select()
                        .column(product_categories::Column::Id)
                        .from(product_categories::Entity)
                        .and_where(product_categories::Column::Slug.eq(slug.as_str()))
                        .to_owned(),
                ),
            );
        }

        match &self.country {
            Some(CountryFilter::Id(id)) => condition = condition.add(Column::CountryId.eq(*id)),
            Some(CountryFilter::Unknown) => condition = condition.add(Expr::val(1).eq(0)),
            None => {}
        }

        if let Some(value) = &self.condition {
            condition = condition.add(Column::Condition.eq(value.as_str()));
        }

        if let Some(min_price) = self.min_price {
            condition = condition.add(Column::Price.gte(min_price));
        }

        if let Some(max_price) = self.max_price {
            condition = condition.add(Column::Price.lte(max_price));
        }

        if self.verified {
            condition = condition.add(Column::Verified.eq(true));
        }

        if let Some(term) = &self.search {
            condition = condition.add(search_condition(term));
        }

        condition
    }
}

impl ExtendedFilter {
    pub fn from_params(params: &CatalogParams) -> Self {
        Self {
            company: non_blank(params.company.as_deref()).map(str::to_string),
            size: non_blank(params.size.as_deref()).map(str::to_string),
        }
    }

    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(company) = &self.company {
            condition = condition.add(Column::Company.eq(company.as_str()));
        }
        if let Some(size) = &self.size {
            condition = condition.add(Column::Size.eq(size.as_str()));
        }
        condition
    }
}

impl ProductFilter {
    pub fn from_params(params: &CatalogParams, variant: ListingVariant) -> Self {
        match variant {
            ListingVariant::Standard => Self {
                base: BaseFilter::from_params(params),
                extended: None,
                sort: ProductSort::parse(params.sort.as_deref()),
            },
            ListingVariant::Large => Self {
                base: BaseFilter::from_params(params),
                extended: Some(ExtendedFilter::from_params(params)),
                sort: ProductSort::parse(params.sort.as_deref()),
            },
            ListingVariant::Search => Self::search(params.q.as_deref()),
        }
    }

    /// The search page: the free-text predicate alone.
    pub fn search(query: Option<&str>) -> Self {
        Self {
            base: BaseFilter {
                search: non_blank(query).map(str::to_string),
                ..BaseFilter::default()
            },
            extended: None,
            sort: ProductSort::default(),
        }
    }

    pub fn condition(&self) -> Condition {
        let mut condition = active_only().add(self.base.condition());
        if let Some(extended) = &self.extended {
            condition = condition.add(extended.condition());
        }
        condition
    }

    pub fn select(&self) -> Select<Products> {
        self.sort.apply(Products::find().filter(self.condition()))
    }
}

pub fn active_only() -> Condition {
    Condition::all().add(Column::IsActive.eq(true))
}

/// Active products whose product category belongs to `category_id`.
pub fn category_products(category_id: Uuid) -> Select<Products> {
    let condition = active_only().add(
        Column::ProductCategoryId.in_subquery(
            Query::select()
                .column(product_categories::Column::Id)
                .from(product_categories::Entity)
                .and_where(product_categories::Column::CategoryId.eq(category_id))
                .to_owned(),
        ),
    );
    ProductSort::default().apply(Products::find().filter(condition))
}

/// Active products sharing a product category with `product_id`, excluding it.
pub fn related_products(product_id: Uuid, product_category_id: Uuid) -> Select<Products> {
    let condition = active_only()
        .add(Column::ProductCategoryId.eq(product_category_id))
        .add(Column::Id.ne(product_id));
    ProductSort::default().apply(Products::find().filter(condition))
}

fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(term));
    Condition::any()
        .add(Expr::col(Column::Title).ilike(pattern.clone()))
        .add(Expr::col(Column::Description).ilike(pattern.clone()))
        .add(Expr::col(Column::Brand).ilike(pattern.clone()))
        .add(Expr::col(Column::Company).ilike(pattern))
}

/// Escapes LIKE wildcards so user input matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(raw: Option<&str>) -> Option<Decimal> {
    non_blank(raw).and_then(|v| Decimal::from_str(v).ok())
}
