//! Repository Module
//!
//! SurrealDB 表的 CRUD 访问层。handler 不直接写 SQL，统一经过这里。

// Catalog
pub mod category;
pub mod product;
pub mod supplier;

// Floor
pub mod dining_table;
pub mod reservation;

// People
pub mod member;
pub mod system_user;

// Sales
pub mod order;

// Inventory
pub mod stock_ledger;

// Re-exports
pub use category::CategoryRepository;
pub use dining_table::DiningTableRepository;
pub use member::MemberRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use reservation::ReservationRepository;
pub use stock_ledger::{StockLedgerRepository, StockLocks};
pub use supplier::SupplierRepository;
pub use system_user::SystemUserRepository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    /// 记录不存在，包括 id 格式非法的情况
    #[error("Not found: {0}")]
    NotFound(String),

    /// 唯一性冲突 (名称、单号、编号重复)
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// 业务校验失败 (数量、引用完整性)
    #[error("Validation error: {0}")]
    Validation(String),

    /// 引擎层错误
    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // 唯一索引冲突在引擎层表现为 IndexExists / RecordExists 错误。
        // 事务内竞争提交时索引是最后的防线，这里把它归类为 Duplicate
        // 以便上层返回 409 而不是 500。
        if msg.contains("already contains") || msg.contains("already exists") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Common repository trait for basic CRUD
#[allow(async_fn_in_trait)]
pub trait Repository<T, CreateDto, UpdateDto> {
    async fn find_all(&self) -> RepoResult<Vec<T>>;
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<T>>;
    async fn create(&self, data: CreateDto) -> RepoResult<T>;
    async fn update(&self, id: &str, data: UpdateDto) -> RepoResult<T>;
    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

// ID 约定：对外一律 "table:key" 文本，内部一律 surrealdb::RecordId。
// 解析走 str::parse::<RecordId>()，构造走 RecordId::from_table_key，
// select/delete 直接收 RecordId。JSON 序列化细节见 db/models/serde_helpers.rs。

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
