//! Synthetic catalog generation. Seeded so every strategy in a run (and
//! every run with the same seed) sees identical data.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::model::{BrandRef, CategoryRef, ImageRef, ProductRecord, ReviewRef};

const BRANDS: &[(&str, &str)] = &[
    ("Acme", "US"),
    ("Globex", "DE"),
    ("Initech", "US"),
    ("Umbrella", "JP"),
    ("Hooli", "IE"),
    ("Soylent", "FR"),
];

const CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "electronics"),
    ("Outdoors", "outdoors"),
    ("Kitchen", "kitchen"),
    ("Toys", "toys"),
    ("Office", "office"),
];

const AUTHORS: &[&str] = &[
    "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi",
];

/// Generate `count` products with realistic skew: 0..=6 images, 0..=8
/// reviews, roughly one product in ten with no brand and one in eight with
/// no category, counts kept consistent with the generated collections.
pub fn seed_catalog(count: usize, seed: u64) -> Vec<ProductRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut next_image_id: u32 = 1;
    let mut next_review_id: u32 = 1;

    (0..count)
        .map(|i| {
            let id = i as u32 + 1;

            let brand = if rng.random_bool(0.9) {
                let idx = rng.random_range(0..BRANDS.len());
                let (name, country) = BRANDS[idx];
                Some(BrandRef {
                    id: idx as u32 + 1,
                    name: name.to_string(),
                    country: country.to_string(),
                })
            } else {
                None
            };

            let category = if rng.random_bool(0.875) {
                let idx = rng.random_range(0..CATEGORIES.len());
                let (name, slug) = CATEGORIES[idx];
                Some(CategoryRef {
                    id: idx as u32 + 1,
                    name: name.to_string(),
                    slug: slug.to_string(),
                })
            } else {
                None
            };

            let image_count = rng.random_range(0..=6);
            let images: Vec<ImageRef> = (0..image_count)
                .map(|pos| {
                    let image_id = next_image_id;
                    next_image_id += 1;
                    ImageRef {
                        id: image_id,
                        url: format!("https://cdn.example/p{id}/img{pos}.jpg"),
                        position: pos,
                    }
                })
                .collect();

            let review_count = rng.random_range(0..=8);
            let reviews: Vec<ReviewRef> = (0..review_count)
                .map(|_| {
                    let review_id = next_review_id;
                    next_review_id += 1;
                    ReviewRef {
                        id: review_id,
                        author: AUTHORS.choose(&mut rng).copied().unwrap_or("anon").to_string(),
                        rating: rng.random_range(1..=5),
                        comment: if rng.random_bool(0.6) {
                            Some(format!("review {review_id} text"))
                        } else {
                            None
                        },
                    }
                })
                .collect();

            ProductRecord {
                id,
                name: format!("Product {id}"),
                description: if rng.random_bool(0.8) {
                    Some(format!("Description of product {id}"))
                } else {
                    None
                },
                price: 5.0 + (i as f64) * 0.25,
                stock: rng.random_range(0..500),
                created_at: "2025-10-23T00:00Z".to_string(),
                updated_at: "2025-10-24T12:00Z".to_string(),
                images_count: images.len() as u32,
                reviews_count: reviews.len() as u32,
                images,
                reviews,
                brand,
                category,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_catalog() {
        assert_eq!(seed_catalog(50, 7), seed_catalog(50, 7));
    }

    #[test]
    fn counts_match_collections() {
        for p in seed_catalog(100, 1) {
            assert_eq!(p.images_count as usize, p.images.len());
            assert_eq!(p.reviews_count as usize, p.reviews.len());
        }
    }
}
