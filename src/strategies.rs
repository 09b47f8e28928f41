//! The competing fetch strategies, as one table. Adding or removing a
//! comparison is an edit to [`STRATEGIES`], not a new code path.

use crate::error::BenchError;
use crate::model::{FlatRow, ProductRecord};
use crate::store::{Statement, StoreDriver};

/// What the executor does with a strategy's fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// Result is returned as fetched.
    AsIs,
    /// Flat rows must pass through the aggregation engine inside the
    /// measured region.
    HostGrouped,
}

/// Raw fetch result before the executor applies `ReturnKind`.
pub enum Fetched {
    Nested {
        records: Vec<ProductRecord>,
        /// Row count the store actually produced, when the strategy knows
        /// it (feeds the duplication multiplier in the report).
        raw_rows: Option<usize>,
    },
    Flat(Vec<FlatRow>),
}

/// One benchmark strategy: a label, how its result is to be treated, and
/// the fetch itself.
pub struct Strategy {
    pub label: &'static str,
    pub return_kind: ReturnKind,
    pub fetch: fn(&dyn StoreDriver, usize) -> Result<Fetched, BenchError>,
}

/// Declared execution order. The runner never reorders or parallelizes
/// these; instrumentation resets are paired with this sequence.
pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        label: "lazy entities",
        return_kind: ReturnKind::AsIs,
        fetch: lazy_entities,
    },
    Strategy {
        label: "fetch-join entities",
        return_kind: ReturnKind::AsIs,
        fetch: fetch_join_entities,
    },
    Strategy {
        label: "naive flat join",
        return_kind: ReturnKind::AsIs,
        fetch: flat_join,
    },
    Strategy {
        label: "flat join + grouping",
        return_kind: ReturnKind::HostGrouped,
        fetch: flat_join,
    },
    Strategy {
        label: "db-side aggregation",
        return_kind: ReturnKind::AsIs,
        fetch: db_side_aggregation,
    },
];

/// Classic lazy loading: one base page query, then per-product selects for
/// brand, category, images and reviews, plus two grouped COUNT queries.
///
/// The COUNT results are merged into the records; the two extra statements
/// still cost their round trips.
fn lazy_entities(driver: &dyn StoreDriver, limit: usize) -> Result<Fetched, BenchError> {
    let base = driver
        .query(Statement::SelectProducts { limit })?
        .into_products()?;
    let ids: Vec<u32> = base.iter().map(|p| p.id).collect();

    let mut records = Vec::with_capacity(base.len());
    for row in base {
        let brand = match row.brand_id {
            Some(id) => Some(driver.query(Statement::SelectBrand { id })?.into_brand()?),
            None => None,
        };
        let category = match row.category_id {
            Some(id) => Some(
                driver
                    .query(Statement::SelectCategory { id })?
                    .into_category()?,
            ),
            None => None,
        };
        let images = driver
            .query(Statement::SelectImages { product_id: row.id })?
            .into_images()?;
        let reviews = driver
            .query(Statement::SelectReviews { product_id: row.id })?
            .into_reviews()?;

        records.push(ProductRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
            brand,
            category,
            images,
            reviews,
            images_count: 0,
            reviews_count: 0,
        });
    }

    let image_counts = driver
        .query(Statement::CountImages { product_ids: ids.clone() })?
        .into_counts()?;
    let review_counts = driver
        .query(Statement::CountReviews { product_ids: ids })?
        .into_counts()?;
    for rec in &mut records {
        rec.images_count = *image_counts
            .get(&rec.id)
            .ok_or(BenchError::UnknownProduct(rec.id))?;
        rec.reviews_count = *review_counts
            .get(&rec.id)
            .ok_or(BenchError::UnknownProduct(rec.id))?;
    }

    Ok(Fetched::Nested { records, raw_rows: None })
}

/// One joined query, hydrated the way an entity mapper would: dedup by
/// scanning what has been built so far instead of hashing.
fn fetch_join_entities(driver: &dyn StoreDriver, limit: usize) -> Result<Fetched, BenchError> {
    let rows = driver
        .query(Statement::SelectProductsJoined { limit })?
        .into_flat_rows()?;
    let raw = rows.len();
    Ok(Fetched::Nested {
        records: hydrate(rows),
        raw_rows: Some(raw),
    })
}

/// One joined query, duplicated rows as the store produced them. Shared by
/// the naive entry (rows returned untouched) and the grouped entry (the
/// executor runs the aggregation engine over them, per `return_kind`).
fn flat_join(driver: &dyn StoreDriver, limit: usize) -> Result<Fetched, BenchError> {
    let rows = driver
        .query(Statement::SelectProductsJoined { limit })?
        .into_flat_rows()?;
    Ok(Fetched::Flat(rows))
}

/// The store aggregates internally and returns nested records directly.
fn db_side_aggregation(driver: &dyn StoreDriver, limit: usize) -> Result<Fetched, BenchError> {
    let records = driver
        .query(Statement::SelectProductsAggregated { limit })?
        .into_aggregated()?;
    let raw = records.len();
    Ok(Fetched::Nested { records, raw_rows: Some(raw) })
}

/// Identity-map style hydration: same output as the aggregation engine,
/// but membership tests are linear scans over the entities built so far,
/// which is the cost profile of hydrating mapped entities row by row.
fn hydrate(rows: Vec<FlatRow>) -> Vec<ProductRecord> {
    let mut records: Vec<ProductRecord> = Vec::new();

    for row in rows {
        let slot = match records.iter().position(|r| r.id == row.product_id) {
            Some(slot) => slot,
            None => {
                records.push(ProductRecord {
                    id: row.product_id,
                    name: row.name,
                    description: row.description,
                    price: row.price,
                    stock: row.stock,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                    brand: row.brand,
                    category: row.category,
                    ..Default::default()
                });
                records.len() - 1
            }
        };

        let rec = &mut records[slot];
        if let Some(image) = row.image {
            if !rec.images.iter().any(|i| i.id == image.id) {
                rec.images.push(image);
                rec.images_count += 1;
            }
        }
        if let Some(review) = row.review {
            if !rec.reviews.iter().any(|r| r.id == review.id) {
                rec.reviews.push(review);
                rec.reviews_count += 1;
            }
        }
    }

    records
}
