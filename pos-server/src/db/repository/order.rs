//! Order Repository
//!
//! 订单头和订单行永远在同一个事务里创建，orderNo 唯一索引兜底并发
//! 竞争。开启自动扣减后，已完成订单的 sale-out 台账也并入同一事务。

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use super::stock_ledger::{StockLocks, product_lock};
use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    DailySummary, Order, OrderCreate, OrderLine, OrderWithLines, Product, StockMovement,
};
use crate::utils::money;
use crate::utils::time::utc_date_label;
use shared::{MovementType, OrderStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

/// One product's stock deduction inside an order transaction
struct Deduction {
    product: RecordId,
    stock_after: i64,
    movement: StockMovement,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
    locks: StockLocks,
    /// 完成订单时自动写 sale-out 台账 (配置项 AUTO_STOCK_DEDUCTION)
    auto_deduct: bool,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>, locks: StockLocks, auto_deduct: bool) -> Self {
        Self {
            base: BaseRepository::new(db),
            locks,
            auto_deduct,
        }
    }

    /// Find order header by business number
    pub async fn find_by_order_no(&self, order_no: &str) -> RepoResult<Option<Order>> {
        let order_no_owned = order_no.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE orderNo = $no LIMIT 1")
            .bind(("no", order_no_owned))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Find one order with its lines in entry order
    pub async fn find_with_lines(&self, id: &str) -> RepoResult<Option<OrderWithLines>> {
        let Ok(record_id) = id.parse::<RecordId>() else {
            return Ok(None);
        };
        let order: Option<Order> = self.base.db().select(record_id.clone()).await?;
        let Some(order) = order else {
            return Ok(None);
        };

        let lines: Vec<OrderLine> = self
            .base
            .db()
            .query("SELECT * FROM order_line WHERE orderId = $order ORDER BY lineNo")
            .bind(("order", record_id))
            .await?
            .take(0)?;

        Ok(Some(OrderWithLines {
            order,
            items: lines,
        }))
    }

    /// List orders (newest first) with lines, optionally filtered by status
    pub async fn list_with_lines(
        &self,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<OrderWithLines>> {
        let orders: Vec<Order> = match status {
            Some(s) => {
                self.base
                    .db()
                    .query("SELECT * FROM order WHERE status = $status ORDER BY timestamp DESC")
                    .bind(("status", s))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM order ORDER BY timestamp DESC")
                    .await?
                    .take(0)?
            }
        };

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<RecordId> = orders.iter().filter_map(|o| o.id.clone()).collect();
        let lines: Vec<OrderLine> = self
            .base
            .db()
            .query("SELECT * FROM order_line WHERE orderId IN $ids ORDER BY lineNo")
            .bind(("ids", ids))
            .await?
            .take(0)?;

        let mut by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
        for line in lines {
            by_order
                .entry(line.order.to_string())
                .or_default()
                .push(line);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = order
                    .id
                    .as_ref()
                    .and_then(|id| by_order.remove(&id.to_string()))
                    .unwrap_or_default();
                OrderWithLines { order, items }
            })
            .collect())
    }

    /// Create an order with its lines in one transaction.
    ///
    /// total / totalCost 由行数据用定点数推导；所有被引用的商品必须存在。
    /// 自动扣减开启且订单已完成时，按商品顺序取锁后把库存更新和 sale-out
    /// 台账并入同一事务，要么全部提交要么全部回滚。
    pub async fn create(&self, data: OrderCreate) -> RepoResult<OrderWithLines> {
        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "order requires at least one line".to_string(),
            ));
        }

        // Duplicate pre-check; the unique index on orderNo is the race backstop
        if self.find_by_order_no(&data.order_no).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Order '{}' already exists",
                data.order_no
            )));
        }

        // Quantity per product, BTreeMap keeps lock acquisition order stable
        let mut qty_by_product: BTreeMap<String, i64> = BTreeMap::new();
        for line in &data.items {
            *qty_by_product.entry(line.product_id.clone()).or_insert(0) += line.quantity;
        }

        let mut product_records: BTreeMap<String, RecordId> = BTreeMap::new();
        for pid in qty_by_product.keys() {
            let record = pid.parse::<RecordId>().map_err(|_| {
                RepoError::Validation(format!("Invalid product ID format: {}", pid))
            })?;
            product_records.insert(pid.clone(), record);
        }

        // Every referenced product must exist
        let referenced: Vec<RecordId> = product_records.values().cloned().collect();
        let known: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id IN $ids")
            .bind(("ids", referenced))
            .await?
            .take(0)?;
        if known.len() != product_records.len() {
            let known_ids: Vec<String> = known
                .iter()
                .filter_map(|p| p.id.as_ref().map(|id| id.to_string()))
                .collect();
            let missing = product_records
                .keys()
                .find(|pid| !known_ids.contains(pid))
                .cloned()
                .unwrap_or_default();
            return Err(RepoError::Validation(format!(
                "Product {} not found",
                missing
            )));
        }

        // Derive money totals with fixed-point arithmetic
        let mut total = Decimal::ZERO;
        let mut cost_total = Decimal::ZERO;
        let mut has_cost = false;
        for line in &data.items {
            total += money::line_subtotal(line.price, line.quantity);
            if let Some(cost) = line.cost_price {
                cost_total += money::line_subtotal(cost, line.quantity);
                has_cost = true;
            }
        }

        let order_id = RecordId::from_table_key(
            TABLE,
            uuid::Uuid::new_v4().simple().to_string(),
        );

        let order = Order {
            id: None,
            order_no: data.order_no.clone(),
            table_id: data.table_id,
            member_id: data.member_id,
            total: money::to_f64(total),
            total_cost: has_cost.then(|| money::to_f64(cost_total)),
            discount: data.discount,
            status: data.status,
            payment_method: data.payment_method,
            paid_at: data.paid_at,
            timestamp: data.timestamp,
            order_type: data.order_type,
            notes: data.notes,
            operator: data.operator.clone(),
        };

        let lines: Vec<OrderLine> = data
            .items
            .iter()
            .enumerate()
            .map(|(i, line)| OrderLine {
                id: None,
                order: order_id.clone(),
                line_no: (i + 1) as i64,
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                price: line.price,
                cost_price: line.cost_price,
                image: line.image.clone(),
                unit: line.unit.clone(),
                quantity: line.quantity,
                subtotal: money::to_f64(money::line_subtotal(line.price, line.quantity)),
            })
            .collect();

        // Completed orders deduct stock when the policy is on. Locks are
        // taken in sorted product order, stock is re-read under the locks.
        let mut guards = Vec::new();
        let mut deductions: Vec<Deduction> = Vec::new();
        if self.auto_deduct && data.status == OrderStatus::Completed {
            for pid in qty_by_product.keys() {
                guards.push(product_lock(&self.locks, pid).lock_owned().await);
            }

            let snapshot: Vec<Product> = self
                .base
                .db()
                .query("SELECT * FROM product WHERE id IN $ids")
                .bind((
                    "ids",
                    product_records.values().cloned().collect::<Vec<_>>(),
                ))
                .await?
                .take(0)?;
            let stock_by_id: HashMap<String, (i64, String)> = snapshot
                .into_iter()
                .filter_map(|p| {
                    p.id.as_ref()
                        .map(|id| (id.to_string(), (p.stock, p.name.clone())))
                })
                .collect();

            let operator = data
                .operator
                .clone()
                .unwrap_or_else(|| "system".to_string());
            for (pid, qty) in &qty_by_product {
                let (before_stock, product_name) = stock_by_id
                    .get(pid)
                    .cloned()
                    .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", pid)))?;
                let current_stock = before_stock - qty;
                deductions.push(Deduction {
                    product: product_records[pid].clone(),
                    stock_after: current_stock,
                    movement: StockMovement {
                        id: None,
                        product_id: pid.clone(),
                        product_name,
                        movement_type: MovementType::SaleOut,
                        delta: -qty,
                        before_stock,
                        current_stock,
                        cost_price: None,
                        operator: operator.clone(),
                        timestamp: data.timestamp,
                        note: None,
                        reference_no: Some(data.order_no.clone()),
                    },
                });
            }
        }

        let mut statements = String::from(
            "BEGIN TRANSACTION;
             CREATE ONLY $order_id CONTENT $order;
             INSERT INTO order_line $lines;",
        );
        for i in 0..deductions.len() {
            statements.push_str(&format!(
                "\n UPDATE $p{i} SET stock = $s{i};\n CREATE stock_movement CONTENT $m{i};"
            ));
        }
        statements.push_str("\n COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(statements)
            .bind(("order_id", order_id.clone()))
            .bind(("order", order))
            .bind(("lines", lines));
        for (i, d) in deductions.into_iter().enumerate() {
            query = query
                .bind((format!("p{i}"), d.product))
                .bind((format!("s{i}"), d.stock_after))
                .bind((format!("m{i}"), d.movement));
        }
        query.await?.check()?;

        self.find_with_lines(&order_id.to_string())
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Per-day sales totals over an inclusive timestamp range.
    ///
    /// 按 UTC 自然日分桶；起止倒置返回空表；gross 用定点数累加后取整，
    /// 跳过没有订单的日期。
    pub async fn daily_summary(
        &self,
        start: i64,
        end: i64,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<DailySummary>> {
        // Inverted range yields an empty report, not an error
        if start > end {
            return Ok(Vec::new());
        }

        #[derive(serde::Deserialize)]
        struct Row {
            total: f64,
            timestamp: i64,
        }

        let rows: Vec<Row> = match status {
            Some(s) => {
                self.base
                    .db()
                    .query(
                        "SELECT total, timestamp FROM order \
                         WHERE timestamp >= $start AND timestamp <= $end AND status = $status",
                    )
                    .bind(("start", start))
                    .bind(("end", end))
                    .bind(("status", s))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query(
                        "SELECT total, timestamp FROM order \
                         WHERE timestamp >= $start AND timestamp <= $end",
                    )
                    .bind(("start", start))
                    .bind(("end", end))
                    .await?
                    .take(0)?
            }
        };

        let mut buckets: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
        for row in rows {
            let day = utc_date_label(row.timestamp);
            let entry = buckets.entry(day).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += money::to_decimal(row.total);
        }

        Ok(buckets
            .into_iter()
            .map(|(date, (order_count, gross))| DailySummary {
                date,
                order_count,
                gross: money::to_f64(gross),
            })
            .collect())
    }
}
