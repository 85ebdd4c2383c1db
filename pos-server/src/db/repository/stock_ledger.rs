//! Stock Ledger Repository
//!
//! 追加式库存台账。每条变动在同一个事务里写入台账记录并更新商品的
//! stock 快照；同一商品的并发写入通过 per-product 互斥锁串行化，
//! 保证 beforeStock → currentStock 链条无空洞。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, StockMovement, StockMovementCreate};
use crate::utils::time::now_secs;
use shared::MovementType;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "stock_movement";

/// Per-product serialization locks, shared by every writer that touches
/// `product.stock` (ledger posts and order auto deduction).
pub type StockLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Fetch (or lazily create) the lock guarding one product's stock.
///
/// Arc 克隆后立即释放 DashMap 分片锁，await 期间不持有。
pub fn product_lock(locks: &StockLocks, product_id: &str) -> Arc<Mutex<()>> {
    locks
        .entry(product_id.to_string())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

#[derive(Clone)]
pub struct StockLedgerRepository {
    base: BaseRepository,
    locks: StockLocks,
}

impl StockLedgerRepository {
    pub fn new(db: Surreal<Db>, locks: StockLocks) -> Self {
        Self {
            base: BaseRepository::new(db),
            locks,
        }
    }

    /// Append a movement to the ledger.
    ///
    /// beforeStock 和 currentStock 由服务端在商品锁内读取计算，客户端
    /// 提交的快照值一律忽略。台账记录和 stock 更新在同一事务提交。
    pub async fn record_movement(
        &self,
        data: StockMovementCreate,
        fallback_operator: &str,
    ) -> RepoResult<StockMovement> {
        // Sign must agree with the movement type
        if !data.movement_type.accepts_delta(data.delta) {
            return Err(RepoError::Validation(format!(
                "delta {} is not valid for movement type '{}'",
                data.delta,
                data.movement_type.as_str()
            )));
        }

        let product_id: RecordId = data.product_id.parse().map_err(|_| {
            RepoError::Validation(format!("Invalid product ID format: {}", data.product_id))
        })?;

        // Serialize all stock writers for this product
        let lock = product_lock(&self.locks, &data.product_id);
        let _guard = lock.lock().await;

        let product: Option<Product> = self.base.db().select(product_id.clone()).await?;
        let product = product
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", data.product_id)))?;

        let before_stock = product.stock;
        let current_stock = before_stock + data.delta;

        let movement_id = RecordId::from_table_key(
            TABLE,
            uuid::Uuid::new_v4().simple().to_string(),
        );
        let movement = StockMovement {
            id: None,
            product_id: data.product_id.clone(),
            product_name: product.name.clone(),
            movement_type: data.movement_type,
            delta: data.delta,
            before_stock,
            current_stock,
            cost_price: data.cost_price,
            operator: data
                .operator
                .unwrap_or_else(|| fallback_operator.to_string()),
            timestamp: data.timestamp.unwrap_or_else(now_secs),
            note: data.note,
            reference_no: data.reference_no,
        };

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 UPDATE $product SET stock = $stock;
                 CREATE ONLY $movement_id CONTENT $movement;
                 COMMIT TRANSACTION;",
            )
            .bind(("product", product_id))
            .bind(("stock", current_stock))
            .bind(("movement_id", movement_id.clone()))
            .bind(("movement", movement))
            .await?
            .check()?;

        let created: Option<StockMovement> = self.base.db().select(movement_id).await?;
        created.ok_or_else(|| RepoError::Database("Failed to record stock movement".to_string()))
    }

    /// List movements, oldest first, with optional filters
    pub async fn list(
        &self,
        product_id: Option<String>,
        movement_type: Option<MovementType>,
        start: Option<i64>,
        end: Option<i64>,
    ) -> RepoResult<Vec<StockMovement>> {
        let mut clauses: Vec<&str> = Vec::new();
        if product_id.is_some() {
            clauses.push("productId = $product");
        }
        if movement_type.is_some() {
            clauses.push("`type` = $type");
        }
        if start.is_some() {
            clauses.push("timestamp >= $start");
        }
        if end.is_some() {
            clauses.push("timestamp <= $end");
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let query_str =
            format!("SELECT * FROM stock_movement{} ORDER BY timestamp, id", where_clause);

        let mut query = self.base.db().query(query_str);
        if let Some(v) = product_id {
            query = query.bind(("product", v));
        }
        if let Some(v) = movement_type {
            query = query.bind(("type", v));
        }
        if let Some(v) = start {
            query = query.bind(("start", v));
        }
        if let Some(v) = end {
            query = query.bind(("end", v));
        }

        let movements: Vec<StockMovement> = query.await?.take(0)?;
        Ok(movements)
    }

    /// Movements for one product, oldest first
    pub async fn list_for_product(&self, product_id: &str) -> RepoResult<Vec<StockMovement>> {
        self.list(Some(product_id.to_string()), None, None, None)
            .await
    }
}
