//! Dining Table Repository
//!
//! 桌台状态 (空闲/占用/预订) 通过 update 的 MERGE 直接流转，
//! 没有独立的状态机接口。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::TableStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid table ID format: {id}")))
    }

    /// List all tables, sortOrder first and name as tie-breaker
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let rows: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY sortOrder, name")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let Ok(record_id) = id.parse::<RecordId>() else {
            return Ok(None);
        };
        Ok(self.base.db().select(record_id).await?)
    }

    /// Find table by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<DiningTable>> {
        let mut rows: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;
        Ok(rows.pop())
    }

    /// 新桌台总是从空闲状态开始
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists",
                data.name
            )));
        }

        let row = DiningTable {
            id: None,
            name: data.name,
            status: TableStatus::default(),
            capacity: data.capacity,
            area: data.area,
            current_order_id: None,
            qr_code: data.qr_code,
            sort_order: data.sort_order.unwrap_or(0),
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create table".to_string()))
    }

    pub async fn update(&self, id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let mut rows: Vec<DiningTable> = self
            .base
            .db()
            .query("UPDATE $id MERGE $data RETURN AFTER")
            .bind(("id", Self::parse_id(id)?))
            .bind(("data", data))
            .await?
            .take(0)?;
        rows.pop()
            .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
    }
}
