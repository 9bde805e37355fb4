//! Ecorec Core - related-product recommendations
//!
//! Combines precomputed content similarity and collaborative-filtering
//! similarity into two ranked lists per product.

pub mod catalog;
pub mod collaborative;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod similarity;
pub mod snapshot;

pub use catalog::{category_prefix, Catalog, CategoryKey, PivotTable, Product, ProductId};
pub use collaborative::CollaborativeRecommender;
pub use config::{EngineConfig, DEFAULT_LIMIT, DEFAULT_SCAN_WINDOW};
pub use content::ContentRecommender;
pub use engine::{RecommendationEngine, Recommendations};
pub use error::{RecError, Result};
pub use similarity::{
    CollaborativeMatrix, ContentMatrix, IndexSpace, PivotIndex, RowIndex, SimilarityMatrix,
};
pub use snapshot::{Snapshot, SnapshotStats, SNAPSHOT_VERSION};
