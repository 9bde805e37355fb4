//! Collaborative-filtering recommendations over the pivot index.
//!
//! The collaborative matrix is built over a deduplicated name space with no
//! category information, so candidates are re-ranked through the catalog and
//! filtered to the source product's category prefix. A wider window of raw
//! neighbours is scanned before filtering to keep the result near full size.

use crate::catalog::{Catalog, PivotTable, ProductId};
use crate::config::DEFAULT_SCAN_WINDOW;
use crate::similarity::CollaborativeMatrix;

#[derive(Debug, Clone, Copy)]
pub struct CollaborativeRecommender<'a> {
    catalog: &'a Catalog,
    pivot: &'a PivotTable,
    matrix: &'a CollaborativeMatrix,
    scan_window: usize,
}

impl<'a> CollaborativeRecommender<'a> {
    pub fn new(catalog: &'a Catalog, pivot: &'a PivotTable, matrix: &'a CollaborativeMatrix) -> Self {
        Self {
            catalog,
            pivot,
            matrix,
            scan_window: DEFAULT_SCAN_WINDOW,
        }
    }

    pub fn with_scan_window(mut self, scan_window: usize) -> Self {
        self.scan_window = scan_window;
        self
    }

    /// Up to `k` product ids sharing the source's category prefix, most
    /// similar first. Returns fewer than `k` when the scan window runs out;
    /// any unresolvable step returns an empty list.
    pub fn recommend(&self, product_id: &ProductId, k: usize) -> Vec<ProductId> {
        self.try_recommend(product_id, k).unwrap_or_default()
    }

    fn try_recommend(&self, product_id: &ProductId, k: usize) -> Option<Vec<ProductId>> {
        let Some(product) = self.catalog.find_by_id(product_id) else {
            tracing::debug!("collaborative: unknown product {}", product_id);
            return None;
        };

        // Category comes from the first row carrying the name, like the
        // candidates below.
        let (_, source) = self.catalog.find_first_by_name(&product.name)?;
        let source_key = source.category_key();

        let Some(anchor) = self.pivot.position(&product.name) else {
            tracing::debug!(
                "collaborative: '{}' ({}) not in pivot index",
                product.name,
                product_id
            );
            return None;
        };

        let ranked = self.matrix.ranked(anchor);
        let mut result = Vec::new();

        for (candidate, _) in ranked.into_iter().skip(1).take(self.scan_window) {
            let name = self.pivot.name_at(candidate)?;
            let Some((_, neighbour)) = self.catalog.find_first_by_name(name) else {
                tracing::warn!("collaborative: pivot name '{}' missing from catalog", name);
                return None;
            };
            if neighbour.category_key() == source_key {
                result.push(neighbour.id.clone());
            }
        }

        tracing::debug!(
            "collaborative: {} of {} scanned candidates match '{}'",
            result.len(),
            self.scan_window.min(self.pivot.len().saturating_sub(1)),
            source_key
        );

        result.truncate(k);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{category_prefix, Product};
    use ndarray::{array, Array2};

    fn ids(list: &[&str]) -> Vec<ProductId> {
        list.iter().map(|&s| ProductId::from(s)).collect()
    }

    fn pivot(names: &[&str]) -> PivotTable {
        PivotTable::new(names.iter().map(|s| s.to_string()).collect())
    }

    fn fixture() -> (Catalog, PivotTable, CollaborativeMatrix) {
        let catalog = Catalog::new(vec![
            Product::new("1", "Widget", "Tools Hand Small"),
            Product::new("2", "Gadget", "Tools Hand Large"),
            Product::new("3", "Sprocket", "Electronics Mobile"),
            Product::new("4", "Hammer", "Tools Hand Heavy Duty"),
            Product::new("5", "Wrench", "Tools Power"),
        ])
        .unwrap();
        // Pivot order differs from catalog order.
        let pivot = pivot(&["Sprocket", "Widget", "Gadget", "Hammer", "Wrench"]);
        let matrix = CollaborativeMatrix::new(array![
            [1.0, 0.2, 0.1, 0.0, 0.0],
            [0.2, 1.0, 0.4, 0.3, 0.9],
            [0.1, 0.4, 1.0, 0.6, 0.1],
            [0.0, 0.3, 0.6, 1.0, 0.2],
            [0.0, 0.9, 0.1, 0.2, 1.0],
        ])
        .unwrap();
        (catalog, pivot, matrix)
    }

    #[test]
    fn test_filters_by_category_prefix() {
        let (catalog, pivot, matrix) = fixture();
        let rec = CollaborativeRecommender::new(&catalog, &pivot, &matrix);
        // Widget row ranks Wrench (Tools Power) first, which is filtered out.
        assert_eq!(rec.recommend(&"1".into(), 20), ids(&["2", "4"]));
    }

    #[test]
    fn test_results_share_source_prefix() {
        let (catalog, pivot, matrix) = fixture();
        let rec = CollaborativeRecommender::new(&catalog, &pivot, &matrix);
        for (_, product) in catalog.iter() {
            let key = category_prefix(&product.category);
            for id in rec.recommend(&product.id, 20) {
                let found = catalog.find_by_id(&id).unwrap();
                assert_eq!(found.category_key(), key);
            }
        }
    }

    #[test]
    fn test_truncates_after_filtering() {
        let (catalog, pivot, matrix) = fixture();
        let rec = CollaborativeRecommender::new(&catalog, &pivot, &matrix);
        assert_eq!(rec.recommend(&"1".into(), 1), ids(&["2"]));
    }

    #[test]
    fn test_scan_window_limits_candidates() {
        let (catalog, pivot, matrix) = fixture();
        // Widget ranks [Widget, Wrench, Gadget, Hammer, Sprocket]; a window of
        // two only reaches Wrench and Gadget.
        let rec = CollaborativeRecommender::new(&catalog, &pivot, &matrix).with_scan_window(2);
        assert_eq!(rec.recommend(&"1".into(), 20), ids(&["2"]));

        let rec = rec.with_scan_window(1);
        assert!(rec.recommend(&"1".into(), 20).is_empty());
    }

    #[test]
    fn test_default_window_is_99() {
        let n = 150;
        let names: Vec<String> = (0..n).map(|i| format!("item-{}", i)).collect();
        let products: Vec<Product> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Product::new(i.to_string(), name.clone(), "Same Category"))
            .collect();
        let catalog = Catalog::new(products).unwrap();
        let pivot = PivotTable::new(names);
        // Row 0 scores fall with distance, so the ranking is 0, 1, 2, ...
        let matrix = CollaborativeMatrix::new(Array2::from_shape_fn((n, n), |(r, c)| {
            1.0 - (r as f32 - c as f32).abs() / n as f32
        }))
        .unwrap();

        let rec = CollaborativeRecommender::new(&catalog, &pivot, &matrix);
        let result = rec.recommend(&"0".into(), 500);
        assert_eq!(result.len(), 99);
        assert_eq!(result.first(), Some(&ProductId::from("1")));
        assert_eq!(result.last(), Some(&ProductId::from("99")));
    }

    #[test]
    fn test_unknown_id_or_missing_pivot_is_empty() {
        let (catalog, _, matrix) = fixture();
        let short_pivot = pivot(&["Sprocket", "Gadget", "Gadget", "Hammer", "Wrench"]);
        let rec = CollaborativeRecommender::new(&catalog, &short_pivot, &matrix);
        assert!(rec.recommend(&"missing".into(), 20).is_empty());
        // Widget has no pivot position.
        assert!(rec.recommend(&"1".into(), 20).is_empty());
    }

    #[test]
    fn test_pivot_name_missing_from_catalog_is_empty() {
        let (catalog, _, matrix) = fixture();
        let stale = pivot(&["Sprocket", "Widget", "Discontinued", "Hammer", "Wrench"]);
        let rec = CollaborativeRecommender::new(&catalog, &stale, &matrix);
        assert!(rec.recommend(&"1".into(), 20).is_empty());
    }

    #[test]
    fn test_source_category_from_first_name_row() {
        let catalog = Catalog::new(vec![
            Product::new("1", "Widget", "Tools Hand"),
            Product::new("2", "Gadget", "Garden Outdoor"),
            Product::new("3", "Widget", "Garden Outdoor"),
            Product::new("4", "Hammer", "Tools Hand"),
        ])
        .unwrap();
        let pivot = pivot(&["Widget", "Gadget", "Hammer"]);
        let matrix = CollaborativeMatrix::new(array![
            [1.0, 0.9, 0.8],
            [0.9, 1.0, 0.1],
            [0.8, 0.1, 1.0],
        ])
        .unwrap();
        let rec = CollaborativeRecommender::new(&catalog, &pivot, &matrix);
        // Product 3 is filed under Garden, but its name resolves to row 0.
        assert_eq!(rec.recommend(&"3".into(), 20), ids(&["4"]));
    }
}
