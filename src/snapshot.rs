//! Loaded recommendation state and its on-disk form.
//!
//! A [`Snapshot`] bundles the catalog, the pivot index and both similarity
//! matrices. It is validated once at construction and never mutated, so a
//! single instance can back any number of concurrent queries.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::catalog::{Catalog, PivotTable, Product};
use crate::collaborative::CollaborativeRecommender;
use crate::content::ContentRecommender;
use crate::error::{RecError, Result};
use crate::similarity::{CollaborativeMatrix, ContentMatrix};

/// Version byte written ahead of binary snapshots.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Persisted state
#[derive(Serialize, Deserialize)]
struct PersistedSnapshot {
    products: Vec<Product>,
    content: Vec<Vec<f32>>,
    pivot: Vec<String>,
    collaborative: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    catalog: Catalog,
    content: ContentMatrix,
    pivot: PivotTable,
    collaborative: CollaborativeMatrix,
}

/// Summary figures for a loaded snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStats {
    pub products: usize,
    pub content_dim: usize,
    pub pivot_names: usize,
    pub collaborative_dim: usize,
}

impl Snapshot {
    /// Bundle loaded data, checking that each matrix covers its index space.
    pub fn new(
        catalog: Catalog,
        content: ContentMatrix,
        pivot: PivotTable,
        collaborative: CollaborativeMatrix,
    ) -> Result<Self> {
        if content.dim() != catalog.len() {
            return Err(RecError::DimensionMismatch {
                what: "content",
                matrix: content.dim(),
                index: catalog.len(),
            });
        }
        if collaborative.dim() != pivot.len() {
            return Err(RecError::DimensionMismatch {
                what: "collaborative",
                matrix: collaborative.dim(),
                index: pivot.len(),
            });
        }

        Ok(Self {
            catalog,
            content,
            pivot,
            collaborative,
        })
    }

    /// Load a snapshot file. `.json` files are read as JSON, anything else as
    /// the versioned binary format.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecError::FileNotFound(path.to_path_buf()));
        }

        let state: PersistedSnapshot = if is_json(path) {
            let reader = BufReader::new(File::open(path)?);
            serde_json::from_reader(reader)?
        } else {
            let bytes = fs::read(path)?;
            match bytes.split_first() {
                Some((&SNAPSHOT_VERSION, body)) => {
                    let (state, _): (PersistedSnapshot, usize) =
                        bincode::serde::decode_from_slice(body, bincode::config::standard())?;
                    state
                }
                Some((&version, _)) => return Err(RecError::UnsupportedVersion(version)),
                None => return Err(RecError::UnsupportedVersion(0)),
            }
        };

        let snapshot = Self::from_persisted(state)?;
        tracing::info!(
            "Loaded snapshot from {:?}: {} products, {} pivot names",
            path,
            snapshot.catalog.len(),
            snapshot.pivot.len()
        );
        Ok(snapshot)
    }

    /// Save to disk, choosing the format from the extension like [`Snapshot::load`].
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let state = self.to_persisted();
        if is_json(path) {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(writer, &state)?;
        } else {
            let mut bytes = vec![SNAPSHOT_VERSION];
            bytes.extend(bincode::serde::encode_to_vec(
                &state,
                bincode::config::standard(),
            )?);
            fs::write(path, bytes)?;
        }
        Ok(())
    }

    fn from_persisted(state: PersistedSnapshot) -> Result<Self> {
        Self::new(
            Catalog::new(state.products)?,
            ContentMatrix::from_rows(state.content)?,
            PivotTable::new(state.pivot),
            CollaborativeMatrix::from_rows(state.collaborative)?,
        )
    }

    fn to_persisted(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            products: self.catalog.products().to_vec(),
            content: self.content.to_rows(),
            pivot: self.pivot.names().to_vec(),
            collaborative: self.collaborative.to_rows(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pivot(&self) -> &PivotTable {
        &self.pivot
    }

    pub fn content_matrix(&self) -> &ContentMatrix {
        &self.content
    }

    pub fn collaborative_matrix(&self) -> &CollaborativeMatrix {
        &self.collaborative
    }

    pub fn content(&self) -> ContentRecommender<'_> {
        ContentRecommender::new(&self.catalog, &self.content)
    }

    pub fn collaborative(&self) -> CollaborativeRecommender<'_> {
        CollaborativeRecommender::new(&self.catalog, &self.pivot, &self.collaborative)
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            products: self.catalog.len(),
            content_dim: self.content.dim(),
            pivot_names: self.pivot.len(),
            collaborative_dim: self.collaborative.dim(),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
