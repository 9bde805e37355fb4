//! Frozen product catalog and the collaborative pivot index.
//!
//! Both tables are built once and only read afterwards. Names are not
//! unique, so every name lookup resolves to the first occurrence in stored
//! order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{RecError, Result};
use crate::similarity::{PivotIndex, RowIndex};

/// External identifier of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            category: category.into(),
        }
    }

    pub fn category_key(&self) -> CategoryKey<'_> {
        category_prefix(&self.category)
    }
}

/// Coarse category match key: the first two whitespace-separated tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryKey<'a> {
    first: Option<&'a str>,
    second: Option<&'a str>,
}

impl fmt::Display for CategoryKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first, self.second) {
            (Some(a), Some(b)) => write!(f, "{} {}", a, b),
            (Some(a), None) => f.write_str(a),
            _ => Ok(()),
        }
    }
}

/// "Electronics Mobile Accessories Cases" -> "Electronics Mobile".
/// Categories with fewer than two tokens keep what they have.
pub fn category_prefix(category: &str) -> CategoryKey<'_> {
    let mut tokens = category.split_whitespace();
    CategoryKey {
        first: tokens.next(),
        second: tokens.next(),
    }
}

/// Product table in stored row order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, RowIndex>,
    first_by_name: HashMap<String, RowIndex>,
}

impl Catalog {
    /// Build the table. Product ids must be unique.
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut first_by_name = HashMap::new();

        for (row, product) in products.iter().enumerate() {
            if by_id.insert(product.id.clone(), RowIndex(row)).is_some() {
                return Err(RecError::DuplicateProduct(product.id.0.clone()));
            }
            first_by_name
                .entry(product.name.clone())
                .or_insert(RowIndex(row));
        }

        Ok(Self {
            products,
            by_id,
            first_by_name,
        })
    }

    pub fn find_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.by_id.get(id).map(|row| &self.products[row.0])
    }

    /// First row (in stored order) whose name equals `name`.
    pub fn find_first_by_name(&self, name: &str) -> Option<(RowIndex, &Product)> {
        self.first_by_name
            .get(name)
            .map(|&row| (row, &self.products[row.0]))
    }

    pub fn product_at(&self, row: RowIndex) -> Option<&Product> {
        self.products.get(row.0)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowIndex, &Product)> {
        self.products
            .iter()
            .enumerate()
            .map(|(row, p)| (RowIndex(row), p))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Ordered, deduplicated product names addressing the collaborative matrix.
#[derive(Debug, Clone, Default)]
pub struct PivotTable {
    names: Vec<String>,
    first_position: HashMap<String, PivotIndex>,
}

impl PivotTable {
    pub fn new(names: Vec<String>) -> Self {
        let mut first_position = HashMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            first_position
                .entry(name.clone())
                .or_insert(PivotIndex(pos));
        }
        Self {
            names,
            first_position,
        }
    }

    /// First occurrence of `name` in the pivot sequence.
    pub fn position(&self, name: &str) -> Option<PivotIndex> {
        self.first_position.get(name).copied()
    }

    pub fn name_at(&self, index: PivotIndex) -> Option<&str> {
        self.names.get(index.0).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
