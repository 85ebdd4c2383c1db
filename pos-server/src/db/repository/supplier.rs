//! Supplier Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Supplier, SupplierCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "supplier";

#[derive(Clone)]
pub struct SupplierRepository {
    base: BaseRepository,
}

impl SupplierRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all suppliers ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Supplier>> {
        let suppliers: Vec<Supplier> = self
            .base
            .db()
            .query("SELECT * FROM supplier ORDER BY name")
            .await?
            .take(0)?;
        Ok(suppliers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Supplier>> {
        let Ok(record_id) = id.parse::<RecordId>() else {
            return Ok(None);
        };
        let supplier: Option<Supplier> = self.base.db().select(record_id).await?;
        Ok(supplier)
    }

    /// Find supplier by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Supplier>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM supplier WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let suppliers: Vec<Supplier> = result.take(0)?;
        Ok(suppliers.into_iter().next())
    }

    /// Create a new supplier
    pub async fn create(&self, data: SupplierCreate) -> RepoResult<Supplier> {
        // Check duplicate name
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Supplier '{}' already exists",
                data.name
            )));
        }

        let supplier = Supplier {
            id: None,
            name: data.name,
            contact_name: data.contact_name,
            phone: data.phone,
            email: data.email,
            address: data.address,
            notes: data.notes,
            is_active: true,
        };

        let created: Option<Supplier> = self.base.db().create(TABLE).content(supplier).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create supplier".to_string()))
    }
}
