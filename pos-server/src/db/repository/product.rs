//! Product Repository
//!
//! 注意：`stock` 字段不在这里修改。所有库存变动必须经过
//! `StockLedgerRepository`，保证台账与库存快照原子一致。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, optionally filtered by category
    pub async fn find_all(&self, category: Option<&str>) -> RepoResult<Vec<Product>> {
        match category {
            Some(cat) => {
                let cat_id: RecordId = cat.parse().map_err(|_| {
                    RepoError::Validation(format!("Invalid category ID format: {}", cat))
                })?;
                let products: Vec<Product> = self
                    .base
                    .db()
                    .query("SELECT * FROM product WHERE category = $cat ORDER BY name")
                    .bind(("cat", cat_id))
                    .await?
                    .take(0)?;
                Ok(products)
            }
            None => {
                let products: Vec<Product> = self
                    .base
                    .db()
                    .query("SELECT * FROM product ORDER BY name")
                    .await?
                    .take(0)?;
                Ok(products)
            }
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let Ok(record_id) = id.parse::<RecordId>() else {
            return Ok(None);
        };
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            cost_price: data.cost_price,
            category: data.category,
            image: data.image,
            stock: data.stock,
            min_stock: data.min_stock,
            unit: data.unit,
            sales_mode: data.sales_mode,
            is_on_shelf: data.is_on_shelf,
            supplier: data.supplier,
            description: data.description,
            barcode: data.barcode,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product (stock excluded, see module note)
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid product ID format: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id MERGE $data RETURN AFTER")
            .bind(("id", record_id))
            .bind(("data", data))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid product ID format: {}", id)))?;
        let deleted: Option<Product> = self.base.db().delete(record_id).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(true)
    }
}
