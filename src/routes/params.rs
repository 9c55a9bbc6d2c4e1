use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Raw catalog query string. Every field is optional and string-typed;
/// coercion into typed filters happens in `services::catalog_query`.
#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// Product category slug.
    pub category: Option<String>,
    /// Country id.
    pub country: Option<String>,
    pub condition: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Only the literal `true` enables the filter.
    pub verified: Option<String>,
    /// Case-insensitive match on title, description, brand or company.
    pub search: Option<String>,
    /// Large listing only.
    pub company: Option<String>,
    /// Large listing only.
    pub size: Option<String>,
    /// Field name, `-` prefix for descending. Defaults to `-created_at`.
    pub sort: Option<String>,
    /// Search page query.
    pub q: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<String>,
}

/// Fixed-size page request. Unparseable or non-positive page numbers fall
/// back to the first page; page numbers are capped so the row offset still
/// fits a signed 64-bit SQL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(raw_page: Option<&str>, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        let last_addressable = MAX_SQL_OFFSET / per_page + 1;
        let page = raw_page
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
            .min(last_addressable);
        Self { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page).min(MAX_SQL_OFFSET)
    }
}

const MAX_SQL_OFFSET: u64 = i64::MAX as u64;
