//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) connection and schema definition.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service holding the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("pos")
            .use_db("pos")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");

        let service = Self { db };
        service.define_schema().await?;
        tracing::info!("Database schema applied");

        Ok(service)
    }

    /// Idempotent schema definition.
    ///
    /// 唯一索引是并发下业务键约束的最终防线：重复的 orderNo / username /
    /// phone 在事务提交时由引擎拒绝。
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                "DEFINE INDEX IF NOT EXISTS uniq_order_no ON TABLE order COLUMNS orderNo UNIQUE;
                 DEFINE INDEX IF NOT EXISTS uniq_username ON TABLE system_user COLUMNS username UNIQUE;
                 DEFINE INDEX IF NOT EXISTS uniq_member_phone ON TABLE member COLUMNS phone UNIQUE;
                 DEFINE INDEX IF NOT EXISTS uniq_category_name ON TABLE category COLUMNS name UNIQUE;
                 DEFINE INDEX IF NOT EXISTS idx_order_timestamp ON TABLE order COLUMNS timestamp;
                 DEFINE INDEX IF NOT EXISTS idx_order_line_order ON TABLE order_line COLUMNS orderId;
                 DEFINE INDEX IF NOT EXISTS idx_movement_product ON TABLE stock_movement COLUMNS productId;",
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
