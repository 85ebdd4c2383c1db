use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::SystemUser;
use crate::db::repository::{RepoResult, StockLocks, SystemUserRepository};
use crate::services::{AiService, HttpService};

/// 服务器状态
///
/// 所有 handler 通过 axum 的 State 拿到它的浅拷贝。内部字段要么
/// 本身可 Clone (Surreal 连接、Config)，要么套 Arc，整体拷贝成本极低。
///
/// 库存写操作必须通过 [`StockLocks`] 串行化：
///
/// ```ignore
/// let repo = StockLedgerRepository::new(state.get_db(), state.stock_locks.clone());
/// ```
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置 (启动后不可变)
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// HTTP 服务
    pub http: HttpService,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 商品级库存写锁，保证单商品的流水写入串行执行
    pub stock_locks: StockLocks,
    /// AI 经营助手
    pub ai: AiService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 依次准备工作目录、数据库、各服务与默认管理员账户，最后把
    /// 完整的 state 交给 [`HttpService`] 组装路由。
    ///
    /// # Panics
    ///
    /// 工作目录、数据库或管理员账户初始化失败时 panic，
    /// 这些失败没有降级运行的余地。
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("pos.db");
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database")
            .db;

        let http = HttpService::new(config.clone());
        let state = Self {
            config: config.clone(),
            db,
            http: http.clone(),
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            stock_locks: Arc::new(DashMap::new()),
            ai: AiService::new(config.gemini_api_key.clone()),
        };

        state
            .seed_default_admin()
            .await
            .expect("Failed to seed default admin account");

        // 路由器需要完整的 state，放在最后初始化
        http.initialize(state.clone());

        state
    }

    /// 首次启动时写入默认管理员账户 (admin / admin123)
    ///
    /// 账户已存在时不做任何修改。
    async fn seed_default_admin(&self) -> RepoResult<()> {
        let repo = SystemUserRepository::new(self.get_db());
        if repo.find_by_username("admin").await?.is_some() {
            return Ok(());
        }

        let now = crate::utils::time::now_secs();
        let password_hash = SystemUser::hash_password("admin123")
            .map_err(|e| crate::db::repository::RepoError::Database(e.to_string()))?;

        repo.create(SystemUser {
            id: None,
            username: "admin".to_string(),
            password_hash,
            name: "系统管理员".to_string(),
            phone: None,
            role: "admin".to_string(),
            avatar: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

        tracing::info!("🔑 Seeded default admin account (username: admin)");
        Ok(())
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
