//! 库存台账集成测试
//!
//! 台账追加与库存快照同事务落库；beforeStock → currentStock 链条
//! 在并发写入下也不允许出现空洞。

mod common;

use std::collections::HashMap;

use common::*;
use pos_server::db::models::{StockMovement, StockMovementCreate};
use pos_server::db::repository::RepoError;
use shared::MovementType;

/// 2025-01-01 00:00:00 UTC
const TS: i64 = 1_735_689_600;

fn movement(product_id: &str, movement_type: MovementType, delta: i64) -> StockMovementCreate {
    StockMovementCreate {
        product_id: product_id.to_string(),
        movement_type,
        delta,
        cost_price: None,
        operator: None,
        timestamp: Some(TS),
        note: None,
        reference_no: None,
    }
}

#[tokio::test]
async fn movement_posts_ledger_entry_and_stock_snapshot_together() {
    let store = open_store().await;
    let fresh = seed_category(&store.db, "生鲜").await;
    let fish = seed_product(&store.db, &fresh, "鲈鱼", 39.0, Some(22.0), 10).await;
    let fish_id = fish.id.as_ref().expect("product id").to_string();

    let repo = ledger_repo(&store);
    let posted = repo
        .record_movement(movement(&fish_id, MovementType::PurchaseIn, 5), "alice")
        .await
        .expect("record movement");

    assert_eq!(posted.product_name, "鲈鱼");
    assert_eq!(posted.delta, 5);
    assert_eq!(posted.before_stock, 10);
    assert_eq!(posted.current_stock, 15);
    // 请求没带 operator 时回落到登录用户
    assert_eq!(posted.operator, "alice");

    let after = product_repo(&store)
        .find_by_id(&fish_id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(after.stock, 15);
}

#[tokio::test]
async fn sequential_movements_chain_before_to_current() {
    let store = open_store().await;
    let dry = seed_category(&store.db, "干货").await;
    let noodles = seed_product(&store.db, &dry, "挂面", 6.0, None, 0).await;
    let noodles_id = noodles.id.as_ref().expect("product id").to_string();

    let repo = ledger_repo(&store);
    let steps = [
        (MovementType::PurchaseIn, 10),
        (MovementType::SaleOut, -3),
        (MovementType::LossOut, -1),
        (MovementType::Adjustment, 2),
    ];

    let mut expected = 0;
    for (i, (movement_type, delta)) in steps.into_iter().enumerate() {
        let mut req = movement(&noodles_id, movement_type, delta);
        req.timestamp = Some(TS + i as i64);

        let posted = repo
            .record_movement(req, "alice")
            .await
            .expect("record movement");
        assert_eq!(posted.before_stock, expected);
        expected += delta;
        assert_eq!(posted.current_stock, expected);
    }

    // 旧单在前，链条连续
    let all = repo
        .list_for_product(&noodles_id)
        .await
        .expect("list movements");
    assert_eq!(all.len(), 4);
    for pair in all.windows(2) {
        assert_eq!(pair[1].before_stock, pair[0].current_stock);
    }
    assert_eq!(all.last().expect("last movement").current_stock, 8);

    let after = product_repo(&store)
        .find_by_id(&noodles_id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(after.stock, 8);
}

#[tokio::test]
async fn delta_sign_must_match_movement_type() {
    let store = open_store().await;
    let dry = seed_category(&store.db, "调料").await;
    let salt = seed_product(&store.db, &dry, "食盐", 3.0, None, 10).await;
    let salt_id = salt.id.as_ref().expect("product id").to_string();

    let repo = ledger_repo(&store);
    let cases = [
        (MovementType::PurchaseIn, -5),
        (MovementType::PurchaseIn, 0),
        (MovementType::ReturnIn, -1),
        (MovementType::SaleOut, 4),
        (MovementType::LossOut, 0),
        (MovementType::Adjustment, 0),
    ];
    for (movement_type, delta) in cases {
        let result = repo
            .record_movement(movement(&salt_id, movement_type, delta), "alice")
            .await;
        assert!(
            matches!(result, Err(RepoError::Validation(_))),
            "{:?} with delta {} must be rejected",
            movement_type,
            delta
        );
    }

    // 被拒的请求不产生任何台账或库存变化
    assert!(
        repo.list_for_product(&salt_id)
            .await
            .expect("list movements")
            .is_empty()
    );
    let after = product_repo(&store)
        .find_by_id(&salt_id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(after.stock, 10);
}

#[tokio::test]
async fn unknown_products_are_not_found_and_bad_ids_fail_validation() {
    let store = open_store().await;
    let repo = ledger_repo(&store);

    let missing = repo
        .record_movement(movement("product:ghost", MovementType::PurchaseIn, 5), "alice")
        .await;
    assert!(matches!(missing, Err(RepoError::NotFound(_))));

    let malformed = repo
        .record_movement(movement("not a record id", MovementType::PurchaseIn, 5), "alice")
        .await;
    assert!(matches!(malformed, Err(RepoError::Validation(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_posts_serialize_into_a_gapless_chain() {
    let store = open_store().await;
    let dry = seed_category(&store.db, "粮油").await;
    let rice = seed_product(&store.db, &dry, "大米", 5.0, None, 100).await;
    let rice_id = rice.id.as_ref().expect("product id").to_string();

    let repo = ledger_repo(&store);
    // 互不相同的增量，且任意子集之和不为零，链条重建时每步唯一
    let (r1, r2, r3, r4, r5) = tokio::join!(
        repo.record_movement(movement(&rice_id, MovementType::PurchaseIn, 1), "a"),
        repo.record_movement(movement(&rice_id, MovementType::PurchaseIn, 2), "b"),
        repo.record_movement(movement(&rice_id, MovementType::SaleOut, -4), "c"),
        repo.record_movement(movement(&rice_id, MovementType::PurchaseIn, 8), "d"),
        repo.record_movement(movement(&rice_id, MovementType::Adjustment, 16), "e"),
    );
    for result in [&r1, &r2, &r3, &r4, &r5] {
        assert!(result.is_ok(), "movement failed: {:?}", result);
    }

    let after = product_repo(&store)
        .find_by_id(&rice_id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(after.stock, 100 + 1 + 2 - 4 + 8 + 16);

    // 提交顺序不可知，但 before → current 必须形成一条无空洞的链
    let all = repo
        .list_for_product(&rice_id)
        .await
        .expect("list movements");
    assert_eq!(all.len(), 5);

    let mut by_before: HashMap<i64, &StockMovement> = HashMap::new();
    for entry in &all {
        assert!(
            by_before.insert(entry.before_stock, entry).is_none(),
            "two movements share beforeStock {}",
            entry.before_stock
        );
    }

    let mut stock = 100;
    for _ in 0..all.len() {
        let step = by_before
            .get(&stock)
            .unwrap_or_else(|| panic!("chain gap at stock {}", stock));
        assert_eq!(step.current_stock, stock + step.delta);
        stock = step.current_stock;
    }
    assert_eq!(stock, after.stock);
}

#[tokio::test]
async fn list_filters_by_product_type_and_time_window() {
    let store = open_store().await;
    let dry = seed_category(&store.db, "食材").await;
    let salt = seed_product(&store.db, &dry, "盐", 3.0, None, 0).await;
    let oil = seed_product(&store.db, &dry, "油", 12.0, None, 0).await;
    let salt_id = salt.id.as_ref().expect("product id").to_string();
    let oil_id = oil.id.as_ref().expect("product id").to_string();

    let repo = ledger_repo(&store);
    let mut m1 = movement(&salt_id, MovementType::PurchaseIn, 10);
    m1.timestamp = Some(TS);
    let mut m2 = movement(&salt_id, MovementType::SaleOut, -2);
    m2.timestamp = Some(TS + 100);
    let mut m3 = movement(&oil_id, MovementType::PurchaseIn, 7);
    m3.timestamp = Some(TS + 50);
    repo.record_movement(m1, "a").await.expect("record movement");
    repo.record_movement(m2, "a").await.expect("record movement");
    repo.record_movement(m3, "a").await.expect("record movement");

    // 按商品
    let salt_logs = repo
        .list(Some(salt_id.clone()), None, None, None)
        .await
        .expect("list movements");
    assert_eq!(salt_logs.len(), 2);
    assert!(salt_logs.iter().all(|m| m.product_id == salt_id));

    // 按类型
    let purchases = repo
        .list(None, Some(MovementType::PurchaseIn), None, None)
        .await
        .expect("list movements");
    assert_eq!(purchases.len(), 2);

    // 时间窗含两端
    let windowed = repo
        .list(None, None, Some(TS + 50), Some(TS + 100))
        .await
        .expect("list movements");
    assert_eq!(windowed.len(), 2);
    assert_eq!(windowed[0].timestamp, TS + 50);
    assert_eq!(windowed[1].timestamp, TS + 100);

    // 组合过滤
    let salt_sales = repo
        .list(Some(salt_id.clone()), Some(MovementType::SaleOut), None, None)
        .await
        .expect("list movements");
    assert_eq!(salt_sales.len(), 1);
    assert_eq!(salt_sales[0].delta, -2);
}
