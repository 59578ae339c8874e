use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, Entity, ProductId};

pub const MAX_NAME_LEN: usize = 200;

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: i64,
    #[serde(rename = "instock")]
    pub in_stock: bool,
}

/// Payload for creating a product; every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    #[serde(rename = "instock")]
    pub in_stock: bool,
}

/// Partial update; only the fields present are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, rename = "instock", skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

fn normalize_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn check_price(price: i64) -> DomainResult<i64> {
    if price < 0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(price)
}

impl Product {
    /// Validate `new` and materialize it under `id`.
    pub fn create(id: ProductId, new: NewProduct) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: normalize_name(&new.name)?,
            price: check_price(new.price)?,
            in_stock: new.in_stock,
        })
    }

    /// Apply `patch` in place. Validation runs first, so a rejected patch leaves
    /// the product untouched.
    pub fn apply_patch(&mut self, patch: &ProductPatch) -> DomainResult<()> {
        let patch = patch.validated()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.in_stock.is_none()
    }

    /// Checked copy with the name trimmed. Stores that apply patches in SQL
    /// bind the fields of this copy.
    pub fn validated(&self) -> DomainResult<Self> {
        Ok(Self {
            name: self.name.as_deref().map(normalize_name).transpose()?,
            price: self.price.map(check_price).transpose()?,
            in_stock: self.in_stock,
        })
    }
}
