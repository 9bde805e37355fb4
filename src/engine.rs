//! Recommendation engine - runs both strategies for a product
//!
//! The two lists are returned side by side, never merged, so callers can
//! tell which strategy produced what. An empty list from one strategy does
//! not affect the other.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::ProductId;
use crate::config::EngineConfig;
use crate::snapshot::Snapshot;

/// Ranked results of both strategies for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub content: Vec<ProductId>,
    pub collaborative: Vec<ProductId>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.collaborative.is_empty()
    }

    /// `[content, collaborative]`, the nested-list shape of the HTTP response.
    pub fn into_pair(self) -> [Vec<ProductId>; 2] {
        [self.content, self.collaborative]
    }
}

/// Shares one immutable [`Snapshot`] across any number of queries.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    snapshot: Arc<Snapshot>,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        Self::with_config(snapshot, EngineConfig::default())
    }

    pub fn with_config(snapshot: Arc<Snapshot>, config: EngineConfig) -> Self {
        Self { snapshot, config }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get_recommendations(&self, product_id: &ProductId) -> Recommendations {
        let content = || {
            self.snapshot
                .content()
                .recommend(product_id, self.config.content_limit)
        };
        let collaborative = || {
            self.snapshot
                .collaborative()
                .with_scan_window(self.config.scan_window)
                .recommend(product_id, self.config.collaborative_limit)
        };

        let (content, collaborative) = if self.config.parallel {
            rayon::join(content, collaborative)
        } else {
            (content(), collaborative())
        };

        tracing::debug!(
            "{}: {} content, {} collaborative",
            product_id,
            content.len(),
            collaborative.len()
        );

        Recommendations {
            content,
            collaborative,
        }
    }

    /// Independent queries for several products, in input order.
    pub fn get_recommendations_batch(&self, product_ids: &[ProductId]) -> Vec<Recommendations> {
        product_ids
            .par_iter()
            .map(|id| self.get_recommendations(id))
            .collect()
    }
}
