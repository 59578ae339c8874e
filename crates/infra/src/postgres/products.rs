use catalog_core::{DomainError, DomainResult, ProductId};
use catalog_products::{NewProduct, Product, ProductPatch};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::block_on;
use crate::store::ProductStore;

const COLUMNS: &str = "id, name, price, in_stock";

/// Products table adapter.
///
/// Update and delete are single statements with `RETURNING`, so a concurrent
/// delete surfaces as `NotFound` rather than a stale write.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        in_stock: row.try_get("in_stock")?,
    })
}

impl ProductStore for PostgresProductStore {
    fn list(&self) -> DomainResult<Vec<Product>> {
        let pool = self.pool.clone();
        block_on("list_products", async move {
            let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
                .fetch_all(&pool)
                .await?;
            rows.iter().map(product_from_row).collect()
        })
    }

    fn insert(&self, new: NewProduct) -> DomainResult<Product> {
        let product = Product::create(ProductId::new(), new)?;
        let pool = self.pool.clone();
        let stored = product.clone();

        block_on("insert_product", async move {
            sqlx::query("INSERT INTO products (id, name, price, in_stock) VALUES ($1, $2, $3, $4)")
                .bind(Uuid::from(stored.id))
                .bind(&stored.name)
                .bind(stored.price)
                .bind(stored.in_stock)
                .execute(&pool)
                .await?;
            Ok(())
        })?;

        Ok(product)
    }

    fn update(&self, id: ProductId, patch: &ProductPatch) -> DomainResult<Product> {
        let patch = patch.validated()?;
        let pool = self.pool.clone();

        let row = block_on("update_product", async move {
            sqlx::query(&format!(
                r#"
                UPDATE products SET
                    name = COALESCE($2, name),
                    price = COALESCE($3, price),
                    in_stock = COALESCE($4, in_stock)
                WHERE id = $1
                RETURNING {COLUMNS}
                "#
            ))
            .bind(Uuid::from(id))
            .bind(patch.name)
            .bind(patch.price)
            .bind(patch.in_stock)
            .fetch_optional(&pool)
            .await?
            .as_ref()
            .map(product_from_row)
            .transpose()
        })?;

        row.ok_or(DomainError::NotFound)
    }

    fn delete(&self, id: ProductId) -> DomainResult<Product> {
        let pool = self.pool.clone();

        let row = block_on("delete_product", async move {
            sqlx::query(&format!("DELETE FROM products WHERE id = $1 RETURNING {COLUMNS}"))
                .bind(Uuid::from(id))
                .fetch_optional(&pool)
                .await?
                .as_ref()
                .map(product_from_row)
                .transpose()
        })?;

        row.ok_or(DomainError::NotFound)
    }
}
