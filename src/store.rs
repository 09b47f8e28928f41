//! Store-access layer: a typed statement interface, a round-trip counter,
//! and an in-memory driver that stands in for the relational store.
//!
//! The benchmark core only ever talks to [`StoreDriver`]; counting happens
//! in a wrapper that increments before delegating, so no strategy can
//! issue a statement without it being attributed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::BenchError;
use crate::model::{BrandRef, CategoryRef, FlatRow, ImageRef, ProductRecord, ReviewRef};

/// Shared round-trip counter, passed explicitly to whoever needs it.
///
/// The instrumented executor resets and reads it; the counting driver
/// wrapper increments it. Cloning yields another handle to the same count.
#[derive(Debug, Clone, Default)]
pub struct RoundTripCounter {
    count: Rc<Cell<u64>>,
}

impl RoundTripCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        self.count.set(0);
    }

    pub fn increment(&self) {
        self.count.set(self.count.get() + 1);
    }

    pub fn get(&self) -> u64 {
        self.count.get()
    }
}

/// Base product row as the product table alone returns it: scalar columns
/// plus raw foreign keys, no joined data.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
    pub created_at: String,
    pub updated_at: String,
    pub brand_id: Option<u32>,
    pub category_id: Option<u32>,
}

/// Every statement the strategies issue, one variant per query shape.
#[derive(Debug, Clone)]
pub enum Statement {
    /// Seed the store with a catalog (DML stand-in, issued once at setup).
    LoadCatalog(Vec<ProductRecord>),
    /// First `limit` products, base columns only.
    SelectProducts { limit: usize },
    SelectBrand { id: u32 },
    SelectCategory { id: u32 },
    SelectImages { product_id: u32 },
    SelectReviews { product_id: u32 },
    /// `COUNT(*) ... GROUP BY product_id` over the image table.
    CountImages { product_ids: Vec<u32> },
    /// Same, over the review table.
    CountReviews { product_ids: Vec<u32> },
    /// The flat two-way LEFT JOIN over the first `limit` products.
    SelectProductsJoined { limit: usize },
    /// Store-side aggregation: nested records come back ready-made.
    SelectProductsAggregated { limit: usize },
}

/// Result set of a [`Statement`], mirrored variant by variant.
#[derive(Debug, Clone)]
pub enum QueryResult {
    Products(Vec<ProductRow>),
    Brand(BrandRef),
    Category(CategoryRef),
    Images(Vec<ImageRef>),
    Reviews(Vec<ReviewRef>),
    /// product id -> child count
    Counts(AHashMap<u32, u32>),
    FlatRows(Vec<FlatRow>),
    Aggregated(Vec<ProductRecord>),
}

impl QueryResult {
    pub fn into_products(self) -> Result<Vec<ProductRow>, BenchError> {
        match self {
            QueryResult::Products(rows) => Ok(rows),
            _ => Err(BenchError::UnexpectedResult("expected product rows")),
        }
    }

    pub fn into_brand(self) -> Result<BrandRef, BenchError> {
        match self {
            QueryResult::Brand(b) => Ok(b),
            _ => Err(BenchError::UnexpectedResult("expected a brand row")),
        }
    }

    pub fn into_category(self) -> Result<CategoryRef, BenchError> {
        match self {
            QueryResult::Category(c) => Ok(c),
            _ => Err(BenchError::UnexpectedResult("expected a category row")),
        }
    }

    pub fn into_images(self) -> Result<Vec<ImageRef>, BenchError> {
        match self {
            QueryResult::Images(i) => Ok(i),
            _ => Err(BenchError::UnexpectedResult("expected image rows")),
        }
    }

    pub fn into_reviews(self) -> Result<Vec<ReviewRef>, BenchError> {
        match self {
            QueryResult::Reviews(r) => Ok(r),
            _ => Err(BenchError::UnexpectedResult("expected review rows")),
        }
    }

    pub fn into_counts(self) -> Result<AHashMap<u32, u32>, BenchError> {
        match self {
            QueryResult::Counts(c) => Ok(c),
            _ => Err(BenchError::UnexpectedResult("expected grouped counts")),
        }
    }

    pub fn into_flat_rows(self) -> Result<Vec<FlatRow>, BenchError> {
        match self {
            QueryResult::FlatRows(rows) => Ok(rows),
            _ => Err(BenchError::UnexpectedResult("expected flat joined rows")),
        }
    }

    pub fn into_aggregated(self) -> Result<Vec<ProductRecord>, BenchError> {
        match self {
            QueryResult::Aggregated(recs) => Ok(recs),
            _ => Err(BenchError::UnexpectedResult("expected aggregated records")),
        }
    }
}

/// The store-access interface: one method per operation, no inheritance.
///
/// `reset_session` drops whatever cross-run state the driver keeps (caches,
/// identity maps); the instrumented executor calls it before and after
/// every measured region.
pub trait StoreDriver {
    fn query(&self, stmt: Statement) -> Result<QueryResult, BenchError>;
    fn execute(&self, stmt: Statement) -> Result<u64, BenchError>;
    fn reset_session(&self);
}

/// Wrapper that counts one round trip per statement, then delegates.
pub struct CountingDriver<D: StoreDriver> {
    inner: D,
    counter: RoundTripCounter,
}

impl<D: StoreDriver> CountingDriver<D> {
    pub fn new(inner: D, counter: RoundTripCounter) -> Self {
        Self { inner, counter }
    }
}

impl<D: StoreDriver> StoreDriver for CountingDriver<D> {
    fn query(&self, stmt: Statement) -> Result<QueryResult, BenchError> {
        self.counter.increment();
        self.inner.query(stmt)
    }

    fn execute(&self, stmt: Statement) -> Result<u64, BenchError> {
        self.counter.increment();
        self.inner.execute(stmt)
    }

    fn reset_session(&self) {
        // Session maintenance, not a statement: never counted.
        self.inner.reset_session();
    }
}

/// In-memory simulated store over a seeded catalog.
///
/// Lookup rows are memoized per session so repeated brand/category selects
/// within one strategy run hit the cache; `reset_session` clears it so one
/// strategy's residue never warms the next one.
#[derive(Default)]
pub struct MemoryDriver {
    catalog: RefCell<Vec<ProductRecord>>,
    brand_cache: RefCell<AHashMap<u32, BrandRef>>,
    category_cache: RefCell<AHashMap<u32, CategoryRef>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized lookup rows currently held by the session cache.
    #[cfg(test)]
    fn cached_lookups(&self) -> usize {
        self.brand_cache.borrow().len() + self.category_cache.borrow().len()
    }

    fn find_product<T>(
        &self,
        id: u32,
        pick: impl FnOnce(&ProductRecord) -> T,
    ) -> Result<T, BenchError> {
        self.catalog
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .map(pick)
            .ok_or(BenchError::UnknownProduct(id))
    }
}

impl StoreDriver for MemoryDriver {
    fn query(&self, stmt: Statement) -> Result<QueryResult, BenchError> {
        match stmt {
            Statement::SelectProducts { limit } => {
                let rows = self
                    .catalog
                    .borrow()
                    .iter()
                    .take(limit)
                    .map(|p| ProductRow {
                        id: p.id,
                        name: p.name.clone(),
                        description: p.description.clone(),
                        price: p.price,
                        stock: p.stock,
                        created_at: p.created_at.clone(),
                        updated_at: p.updated_at.clone(),
                        brand_id: p.brand.as_ref().map(|b| b.id),
                        category_id: p.category.as_ref().map(|c| c.id),
                    })
                    .collect();
                Ok(QueryResult::Products(rows))
            }
            Statement::SelectBrand { id } => {
                if let Some(b) = self.brand_cache.borrow().get(&id) {
                    return Ok(QueryResult::Brand(b.clone()));
                }
                let brand = self
                    .catalog
                    .borrow()
                    .iter()
                    .filter_map(|p| p.brand.as_ref())
                    .find(|b| b.id == id)
                    .cloned()
                    .ok_or(BenchError::UnknownBrand(id))?;
                self.brand_cache.borrow_mut().insert(id, brand.clone());
                Ok(QueryResult::Brand(brand))
            }
            Statement::SelectCategory { id } => {
                if let Some(c) = self.category_cache.borrow().get(&id) {
                    return Ok(QueryResult::Category(c.clone()));
                }
                let category = self
                    .catalog
                    .borrow()
                    .iter()
                    .filter_map(|p| p.category.as_ref())
                    .find(|c| c.id == id)
                    .cloned()
                    .ok_or(BenchError::UnknownCategory(id))?;
                self.category_cache.borrow_mut().insert(id, category.clone());
                Ok(QueryResult::Category(category))
            }
            Statement::SelectImages { product_id } => self
                .find_product(product_id, |p| p.images.clone())
                .map(QueryResult::Images),
            Statement::SelectReviews { product_id } => self
                .find_product(product_id, |p| p.reviews.clone())
                .map(QueryResult::Reviews),
            Statement::CountImages { product_ids } => {
                let mut counts = AHashMap::with_capacity(product_ids.len());
                for id in product_ids {
                    let n = self.find_product(id, |p| p.images.len() as u32)?;
                    counts.insert(id, n);
                }
                Ok(QueryResult::Counts(counts))
            }
            Statement::CountReviews { product_ids } => {
                let mut counts = AHashMap::with_capacity(product_ids.len());
                for id in product_ids {
                    let n = self.find_product(id, |p| p.reviews.len() as u32)?;
                    counts.insert(id, n);
                }
                Ok(QueryResult::Counts(counts))
            }
            Statement::SelectProductsJoined { limit } => {
                let rows = self
                    .catalog
                    .borrow()
                    .iter()
                    .take(limit)
                    .flat_map(|p| p.flatten())
                    .collect();
                Ok(QueryResult::FlatRows(rows))
            }
            Statement::SelectProductsAggregated { limit } => {
                let recs = self.catalog.borrow().iter().take(limit).cloned().collect();
                Ok(QueryResult::Aggregated(recs))
            }
            Statement::LoadCatalog(_) => {
                Err(BenchError::UnexpectedResult("LoadCatalog is execute-only"))
            }
        }
    }

    fn execute(&self, stmt: Statement) -> Result<u64, BenchError> {
        match stmt {
            Statement::LoadCatalog(products) => {
                let n = products.len() as u64;
                *self.catalog.borrow_mut() = products;
                Ok(n)
            }
            _ => Err(BenchError::UnexpectedResult("only LoadCatalog is execute-able")),
        }
    }

    fn reset_session(&self) {
        self.brand_cache.borrow_mut().clear();
        self.category_cache.borrow_mut().clear();
    }
}
