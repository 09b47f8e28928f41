//! The row-set aggregation engine: undoes the join multiplication of a
//! flat product × image × review result set and rebuilds the nested,
//! deduplicated, counted product records.

use ahash::{AHashMap, AHashSet};

use crate::model::{FlatRow, ProductRecord};

/// Rebuild nested product records from a flat joined row sequence.
///
/// One pass over the rows. The first row for a product id materializes its
/// record from the product/lookup columns; every later row for that id can
/// only contribute child rows. Two per-product seen-sets make the child
/// membership test O(1), so the whole transform is O(rows) in time and
/// O(products + images + reviews) in memory rather than O(rows) — the raw
/// row count is `images × reviews` per product, the output is not.
///
/// Ordering is taken from the input: products come out in first-occurrence
/// order of their id, children in first-occurrence order of theirs. The
/// input is assumed pre-sorted by the producing query; nothing is re-sorted
/// here.
pub fn aggregate<I>(rows: I) -> Vec<ProductRecord>
where
    I: IntoIterator<Item = FlatRow>,
{
    // Output list in emission order, plus an index from product id to its
    // slot. The seen-sets live in parallel vectors and are dropped at the
    // end; they are bookkeeping, not part of the result.
    let mut records: Vec<ProductRecord> = Vec::new();
    let mut index: AHashMap<u32, usize> = AHashMap::new();
    let mut seen_images: Vec<AHashSet<u32>> = Vec::new();
    let mut seen_reviews: Vec<AHashSet<u32>> = Vec::new();

    for row in rows {
        let slot = match index.get(&row.product_id) {
            Some(&slot) => slot,
            None => {
                // First row for this product: take the scalar and lookup
                // columns as-is. A null foreign key stays a None lookup.
                let slot = records.len();
                index.insert(row.product_id, slot);
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
                seen_images.push(AHashSet::new());
                seen_reviews.push(AHashSet::new());
                slot
            }
        };

        let record = &mut records[slot];

        if let Some(image) = row.image {
            if seen_images[slot].insert(image.id) {
                record.images.push(image);
                record.images_count += 1;
            }
        }

        if let Some(review) = row.review {
            if seen_reviews[slot].insert(review.id) {
                record.reviews.push(review);
                record.reviews_count += 1;
            }
        }
    }

    records
}
