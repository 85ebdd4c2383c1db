//! 集成测试公共设施
//!
//! 在临时目录里打开一个空的嵌入式库，并提供最小的目录种子数据。
//! 目录随 `TestStore` 一起销毁。

#![allow(dead_code)]

use std::sync::Arc;

use pos_server::db::DbService;
use pos_server::db::models::{
    CategoryCreate, OrderCreate, OrderLineCreate, Product, ProductCreate,
};
use pos_server::db::repository::{
    CategoryRepository, OrderRepository, ProductRepository, Repository, StockLedgerRepository,
    StockLocks,
};
use shared::{OrderStatus, OrderType};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// 临时目录上的空库和一张空的库存锁表
pub struct TestStore {
    pub db: Surreal<Db>,
    pub locks: StockLocks,
    _tmp: tempfile::TempDir,
}

pub async fn open_store() -> TestStore {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let db_path = tmp.path().join("pos.db");
    let service = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("open test database");
    TestStore {
        db: service.db,
        locks: Arc::new(dashmap::DashMap::new()),
        _tmp: tmp,
    }
}

/// 订单仓库，自动扣减关闭 (默认策略)
pub fn order_repo(store: &TestStore) -> OrderRepository {
    OrderRepository::new(store.db.clone(), store.locks.clone(), false)
}

/// 订单仓库，自动扣减开启
pub fn order_repo_with_deduction(store: &TestStore) -> OrderRepository {
    OrderRepository::new(store.db.clone(), store.locks.clone(), true)
}

pub fn ledger_repo(store: &TestStore) -> StockLedgerRepository {
    StockLedgerRepository::new(store.db.clone(), store.locks.clone())
}

pub fn product_repo(store: &TestStore) -> ProductRepository {
    ProductRepository::new(store.db.clone())
}

/// 预置一个分类，返回其 RecordId
pub async fn seed_category(db: &Surreal<Db>, name: &str) -> RecordId {
    let repo = CategoryRepository::new(db.clone());
    let category = repo
        .create(CategoryCreate {
            name: name.to_string(),
            icon: None,
            sort_order: None,
        })
        .await
        .expect("seed category");
    category.id.expect("category id")
}

/// 预置一个上架商品
pub async fn seed_product(
    db: &Surreal<Db>,
    category: &RecordId,
    name: &str,
    price: f64,
    cost_price: Option<f64>,
    stock: i64,
) -> Product {
    let repo = ProductRepository::new(db.clone());
    repo.create(ProductCreate {
        name: name.to_string(),
        price,
        cost_price,
        category: category.clone(),
        image: None,
        stock,
        min_stock: None,
        unit: "份".to_string(),
        sales_mode: None,
        is_on_shelf: true,
        supplier: None,
        description: None,
        barcode: None,
    })
    .await
    .expect("seed product")
}

/// 按商品快照构造一个订单行
pub fn line(product: &Product, quantity: i64) -> OrderLineCreate {
    OrderLineCreate {
        product_id: product.id.as_ref().expect("product id").to_string(),
        name: product.name.clone(),
        price: product.price,
        cost_price: product.cost_price,
        image: None,
        unit: product.unit.clone(),
        quantity,
    }
}

/// 最小订单请求 (堂食、T01 桌)
pub fn order(
    order_no: &str,
    items: Vec<OrderLineCreate>,
    status: OrderStatus,
    timestamp: i64,
) -> OrderCreate {
    OrderCreate {
        order_no: order_no.to_string(),
        table_id: "T01".to_string(),
        member_id: None,
        items,
        status,
        payment_method: None,
        discount: None,
        paid_at: None,
        timestamp,
        order_type: OrderType::DineIn,
        notes: None,
        operator: Some("cashier".to_string()),
    }
}
