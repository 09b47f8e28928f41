//! Data model for the benchmark: the nested product record and the flat
//! joined row the store produces when the product table is joined to both
//! child tables at once.

/// Brand lookup columns (many-to-one).
#[derive(Debug, Clone, PartialEq)]
pub struct BrandRef {
    pub id: u32,
    pub name: String,
    pub country: String,
}

/// Category lookup columns (many-to-one).
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRef {
    pub id: u32,
    pub name: String,
    pub slug: String,
}

/// One product image (one-to-many child).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub id: u32,
    pub url: String,
    pub position: i32,
}

/// One product review (one-to-many child).
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRef {
    pub id: u32,
    pub author: String,
    pub rating: i32,
    pub comment: Option<String>,
}

/// One record of the Cartesian product that a two-way one-to-many join
/// produces: product scalars repeated on every row, each lookup and each
/// child present as a whole column group or not at all.
///
/// Grouping the child columns under a single `Option` means a child id can
/// never arrive without its companion columns — the shape is checked where
/// the row is built, not inside the aggregation loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    pub product_id: u32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
    pub created_at: String,
    pub updated_at: String,

    pub brand: Option<BrandRef>,
    pub category: Option<CategoryRef>,
    pub image: Option<ImageRef>,
    pub review: Option<ReviewRef>,
}

/// The reconstructed unit: one product with its lookups embedded, its two
/// child collections deduplicated and in first-occurrence order, and the
/// two aggregate counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
    pub created_at: String,
    pub updated_at: String,

    pub brand: Option<BrandRef>,
    pub category: Option<CategoryRef>,

    pub images: Vec<ImageRef>,
    pub reviews: Vec<ReviewRef>,
    pub images_count: u32,
    pub reviews_count: u32,
}

impl ProductRecord {
    /// Row with only the product/lookup columns filled in, children empty.
    fn base_row(&self) -> FlatRow {
        FlatRow {
            product_id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock: self.stock,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            brand: self.brand.clone(),
            category: self.category.clone(),
            ..Default::default()
        }
    }

    /// Flatten this record back into the rows the joined query would have
    /// returned for it: one row per image × review combination.
    ///
    /// This is the inverse of aggregation and mirrors what the store does
    /// when both one-to-many tables are joined in a single statement.
    pub fn flatten(&self) -> Vec<FlatRow> {
        let mut out = Vec::new();

        // ─────────────────────────────────────────────────────
        // CASE 1: No children at all
        // ─────────────────────────────────────────────────────
        // A product without images and without reviews still appears in
        // the join result: exactly one row, both child groups null.
        if self.images.is_empty() && self.reviews.is_empty() {
            out.push(self.base_row());
            return out;
        }

        // ─────────────────────────────────────────────────────
        // CASE 2: One child list empty, the other not
        // ─────────────────────────────────────────────────────
        // A LEFT JOIN keeps the populated side and leaves the other group
        // null, so we substitute a single "null slot" for the empty list
        // and take the product of the two sides.
        let image_slots: Vec<Option<&ImageRef>> = if self.images.is_empty() {
            vec![None]
        } else {
            self.images.iter().map(Some).collect()
        };
        let review_slots: Vec<Option<&ReviewRef>> = if self.reviews.is_empty() {
            vec![None]
        } else {
            self.reviews.iter().map(Some).collect()
        };

        // ─────────────────────────────────────────────────────
        // CASE 3: Full Cartesian product
        // ─────────────────────────────────────────────────────
        // One row per image × review combination, each row repeating the
        // product and lookup columns. This is the duplication the
        // aggregation engine exists to undo.
        for image in &image_slots {
            for review in &review_slots {
                let mut row = self.base_row();
                row.image = image.cloned();
                row.review = review.cloned();
                out.push(row);
            }
        }

        out
    }
}
