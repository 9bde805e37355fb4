//! Content-based recommendations over catalog row order.

use crate::catalog::{Catalog, ProductId};
use crate::similarity::ContentMatrix;

/// Ranks neighbours of a product by precomputed attribute similarity.
#[derive(Debug, Clone, Copy)]
pub struct ContentRecommender<'a> {
    catalog: &'a Catalog,
    matrix: &'a ContentMatrix,
}

impl<'a> ContentRecommender<'a> {
    pub fn new(catalog: &'a Catalog, matrix: &'a ContentMatrix) -> Self {
        Self { catalog, matrix }
    }

    /// Up to `k` product ids, most similar first.
    ///
    /// The top-ranked entry of the row is the product itself and is skipped.
    /// An unknown id returns an empty list.
    pub fn recommend(&self, product_id: &ProductId, k: usize) -> Vec<ProductId> {
        let Some(product) = self.catalog.find_by_id(product_id) else {
            tracing::debug!("content: unknown product {}", product_id);
            return Vec::new();
        };

        // Similarity rows follow the first catalog row carrying this name.
        let Some((row, _)) = self.catalog.find_first_by_name(&product.name) else {
            return Vec::new();
        };

        let ranked = self.matrix.ranked(row);
        if ranked.is_empty() {
            tracing::debug!("content: no similarity row {} for {}", row.0, product_id);
            return Vec::new();
        }

        let mut result = Vec::with_capacity(k.min(ranked.len().saturating_sub(1)));
        for (neighbour, _) in ranked.into_iter().skip(1).take(k) {
            match self.catalog.product_at(neighbour) {
                Some(p) => result.push(p.id.clone()),
                None => {
                    tracing::warn!(
                        "content: row {} outside catalog of {} products",
                        neighbour.0,
                        self.catalog.len()
                    );
                    return Vec::new();
                }
            }
        }
        result
    }
}
