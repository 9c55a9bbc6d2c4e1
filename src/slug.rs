//! URL handles for categories, product categories and products.
//!
//! Three collision policies are in use:
//! - categories take the first free candidate of `name`, `name-1`, `name-2`, ...
//! - product categories append a random alphanumeric suffix of 5..=20 chars
//! - products append a random suffix of 5..=15 chars, once, at creation
//!
//! None of the pre-checks are atomic with the insert, so every write goes
//! through [`with_slug_retry`], which regenerates the candidate when the
//! storage layer rejects it with a unique violation.

use std::collections::HashSet;
use std::future::Future;
use std::ops::RangeInclusive;

use rand::{Rng, distributions::Alphanumeric};
use sea_orm::{DbErr, SqlErr};
use unicode_normalization::UnicodeNormalization;

use crate::error::{AppError, AppResult};

pub const PRODUCT_CATEGORY_SUFFIX_LEN: RangeInclusive<usize> = 5..=20;
pub const PRODUCT_SUFFIX_LEN: RangeInclusive<usize> = 5..=15;
pub const MAX_SLUG_ATTEMPTS: usize = 5;

/// Lowercase ASCII token. Input is NFKD-decomposed first so accented letters
/// fold to their base letter; alphanumerics and `_` are kept, runs of
/// whitespace and `-` collapse into a single `-`, everything else is dropped.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.nfkd() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }
    out.trim_matches(|c| c == '-' || c == '_').to_string()
}

fn slug_base(name: &str, fallback: &str) -> String {
    let base = slugify(name);
    if base.is_empty() {
        fallback.to_string()
    } else {
        base
    }
}

/// Candidates in the order the category policy tries them.
pub fn deterministic_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((1..).map(move |n| format!("{base}-{n}")))
}

pub fn category_slug_base(name: &str) -> String {
    slug_base(name, "category")
}

/// First candidate for `name` that is absent from `existing`.
pub fn next_free_slug(name: &str, existing: &HashSet<String>) -> String {
    let base = category_slug_base(name);
    let free = deterministic_candidates(&base).find(|candidate| !existing.contains(candidate));
    free.unwrap_or(base)
}

pub fn random_suffix<R: Rng>(rng: &mut R, len: RangeInclusive<usize>) -> String {
    let len = rng.gen_range(len);
    rng.sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn product_category_slug<R: Rng>(name: &str, rng: &mut R) -> String {
    let base = slug_base(name, "subcategory");
    format!("{base}-{}", random_suffix(rng, PRODUCT_CATEGORY_SUFFIX_LEN))
}

pub fn product_slug<R: Rng>(title: &str, rng: &mut R) -> String {
    let base = slug_base(title, "product");
    format!("{base}-{}", random_suffix(rng, PRODUCT_SUFFIX_LEN))
}

/// Returns a new slug only when `current` is blank; a product keeps the
/// slug it was created with.
pub fn ensure_product_slug<R: Rng>(
    current: Option<&str>,
    title: &str,
    rng: &mut R,
) -> Option<String> {
    match current.map(str::trim) {
        Some(slug) if !slug.is_empty() => None,
        _ => Some(product_slug(title, rng)),
    }
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Runs `attempt` until it stops failing with a unique violation, at most
/// [`MAX_SLUG_ATTEMPTS`] times. Each call is expected to build a fresh
/// candidate.
pub async fn with_slug_retry<T, F, Fut>(entity: &str, mut attempt: F) -> AppResult<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    for n in 0..MAX_SLUG_ATTEMPTS {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(err) if is_unique_violation(&err) => {
                tracing::warn!(entity, attempt = n + 1, error = %err, "slug collision, retrying");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(AppError::Conflict(format!(
        "could not allocate a unique slug for {entity}"
    )))
}
