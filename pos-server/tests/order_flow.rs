//! 订单创建集成测试
//!
//! 头行同事务落库、定点金额推导、totalCost 缺省语义、orderNo 唯一
//! 约束 (含并发竞争) 以及完成单的自动库存扣减。

mod common;

use common::*;
use pos_server::db::repository::RepoError;
use shared::{MovementType, OrderStatus};

/// 2025-01-01 00:00:00 UTC
const TS: i64 = 1_735_689_600;

#[tokio::test]
async fn create_persists_header_and_lines_in_entry_order() {
    let store = open_store().await;
    let drinks = seed_category(&store.db, "饮料").await;
    let tea = seed_product(&store.db, &drinks, "柠檬茶", 12.5, Some(4.0), 50).await;
    let cola = seed_product(&store.db, &drinks, "可乐", 8.0, None, 50).await;

    let repo = order_repo(&store);
    let created = repo
        .create(order(
            "SO-1001",
            vec![line(&tea, 2), line(&cola, 1)],
            OrderStatus::Completed,
            TS,
        ))
        .await
        .expect("create order");

    assert_eq!(created.order.order_no, "SO-1001");
    assert_eq!(created.order.status, OrderStatus::Completed);
    assert_eq!(created.order.total, 33.0);
    assert_eq!(created.order.operator.as_deref(), Some("cashier"));
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.items[0].name, "柠檬茶");
    assert_eq!(created.items[0].line_no, 1);
    assert_eq!(created.items[0].subtotal, 25.0);
    assert_eq!(created.items[1].name, "可乐");
    assert_eq!(created.items[1].line_no, 2);
    assert_eq!(created.items[1].subtotal, 8.0);

    // 重新读取，行顺序仍与下单顺序一致
    let id = created.order.id.as_ref().expect("order id").to_string();
    let reread = repo
        .find_with_lines(&id)
        .await
        .expect("query order")
        .expect("order exists");
    assert_eq!(reread.order.total, 33.0);
    assert_eq!(reread.items.len(), 2);
    assert_eq!(reread.items[0].name, "柠檬茶");
    assert_eq!(reread.items[1].name, "可乐");

    let by_no = repo
        .find_by_order_no("SO-1001")
        .await
        .expect("query by orderNo")
        .expect("order exists");
    assert_eq!(by_no.id, created.order.id);
}

#[tokio::test]
async fn totals_come_from_fixed_point_arithmetic() {
    let store = open_store().await;
    let snacks = seed_category(&store.db, "零食").await;
    let a = seed_product(&store.db, &snacks, "糖果A", 0.1, None, 100).await;
    let b = seed_product(&store.db, &snacks, "糖果B", 0.2, None, 100).await;

    let repo = order_repo(&store);

    // 0.1 + 0.2 在二进制浮点下是 0.30000000000000004
    let created = repo
        .create(order(
            "SO-FP-1",
            vec![line(&a, 1), line(&b, 1)],
            OrderStatus::Completed,
            TS,
        ))
        .await
        .expect("create order");
    assert_eq!(created.order.total, 0.3);

    // 0.1 * 3 同理
    let created = repo
        .create(order("SO-FP-2", vec![line(&a, 3)], OrderStatus::Completed, TS))
        .await
        .expect("create order");
    assert_eq!(created.order.total, 0.3);
    assert_eq!(created.items[0].subtotal, 0.3);
}

#[tokio::test]
async fn total_cost_is_absent_until_a_line_carries_cost() {
    let store = open_store().await;
    let snacks = seed_category(&store.db, "小吃").await;
    let fries = seed_product(&store.db, &snacks, "薯条", 9.0, None, 100).await;
    let wings = seed_product(&store.db, &snacks, "鸡翅", 16.0, Some(7.5), 100).await;

    let repo = order_repo(&store);

    // 没有任何行带成本价：totalCost 缺省，而不是 0
    let created = repo
        .create(order("SO-NC", vec![line(&fries, 2)], OrderStatus::Completed, TS))
        .await
        .expect("create order");
    assert_eq!(created.order.total_cost, None);

    // 只要有一行带成本价，totalCost 就是已知成本之和
    let created = repo
        .create(order(
            "SO-WC",
            vec![line(&fries, 1), line(&wings, 2)],
            OrderStatus::Completed,
            TS,
        ))
        .await
        .expect("create order");
    assert_eq!(created.order.total_cost, Some(15.0));
}

#[tokio::test]
async fn duplicate_order_no_is_a_conflict() {
    let store = open_store().await;
    let staples = seed_category(&store.db, "主食").await;
    let rice = seed_product(&store.db, &staples, "米饭", 3.0, None, 500).await;

    let repo = order_repo(&store);
    let first = repo
        .create(order("SO-DUP", vec![line(&rice, 1)], OrderStatus::Completed, TS))
        .await
        .expect("create order");

    let second = repo
        .create(order("SO-DUP", vec![line(&rice, 2)], OrderStatus::Completed, TS))
        .await;
    assert!(matches!(second, Err(RepoError::Duplicate(_))));

    // 第一单原样保留
    let kept = repo
        .find_by_order_no("SO-DUP")
        .await
        .expect("query by orderNo")
        .expect("order exists");
    assert_eq!(kept.id, first.order.id);
    assert_eq!(kept.total, 3.0);
}

#[tokio::test]
async fn rejects_empty_orders_and_unknown_products() {
    let store = open_store().await;
    let staples = seed_category(&store.db, "面点").await;
    let bun = seed_product(&store.db, &staples, "包子", 2.5, None, 100).await;

    let repo = order_repo(&store);

    let empty = repo
        .create(order("SO-EMPTY", vec![], OrderStatus::Completed, TS))
        .await;
    assert!(matches!(empty, Err(RepoError::Validation(_))));

    let mut ghost = line(&bun, 1);
    ghost.product_id = "product:doesnotexist".to_string();
    let missing = repo
        .create(order("SO-GHOST", vec![ghost], OrderStatus::Completed, TS))
        .await;
    match missing {
        Err(RepoError::Validation(msg)) => assert!(msg.contains("product:doesnotexist")),
        other => panic!("expected validation failure, got {:?}", other),
    }

    // 失败的请求不留半张订单
    assert!(
        repo.find_by_order_no("SO-GHOST")
            .await
            .expect("query by orderNo")
            .is_none()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_duplicates_commit_exactly_once() {
    let store = open_store().await;
    let staples = seed_category(&store.db, "盖饭").await;
    let dish = seed_product(&store.db, &staples, "咖喱饭", 22.0, None, 500).await;

    let repo = order_repo(&store);
    let a = repo.create(order(
        "SO-RACE",
        vec![line(&dish, 1)],
        OrderStatus::Completed,
        TS,
    ));
    let b = repo.create(order(
        "SO-RACE",
        vec![line(&dish, 2)],
        OrderStatus::Completed,
        TS,
    ));
    let (ra, rb) = tokio::join!(a, b);

    let wins = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one racing create may commit");
    for r in [ra, rb] {
        if let Err(e) = r {
            assert!(
                matches!(e, RepoError::Duplicate(_)),
                "loser must see a duplicate, got {:?}",
                e
            );
        }
    }

    assert!(
        repo.find_by_order_no("SO-RACE")
            .await
            .expect("query by orderNo")
            .is_some()
    );
}

#[tokio::test]
async fn completed_orders_deduct_stock_when_policy_is_on() {
    let store = open_store().await;
    let drinks = seed_category(&store.db, "酒水").await;
    let beer = seed_product(&store.db, &drinks, "啤酒", 12.0, Some(6.0), 10).await;
    let beer_id = beer.id.as_ref().expect("product id").to_string();

    let repo = order_repo_with_deduction(&store);
    repo.create(order("SO-DED-1", vec![line(&beer, 3)], OrderStatus::Completed, TS))
        .await
        .expect("create order");

    let after = product_repo(&store)
        .find_by_id(&beer_id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(after.stock, 7);

    let movements = ledger_repo(&store)
        .list_for_product(&beer_id)
        .await
        .expect("list movements");
    assert_eq!(movements.len(), 1);
    let posted = &movements[0];
    assert_eq!(posted.movement_type, MovementType::SaleOut);
    assert_eq!(posted.delta, -3);
    assert_eq!(posted.before_stock, 10);
    assert_eq!(posted.current_stock, 7);
    assert_eq!(posted.operator, "cashier");
    assert_eq!(posted.reference_no.as_deref(), Some("SO-DED-1"));

    // 未完成的订单不扣库存
    repo.create(order("SO-DED-2", vec![line(&beer, 2)], OrderStatus::Pending, TS))
        .await
        .expect("create order");
    let after = product_repo(&store)
        .find_by_id(&beer_id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(after.stock, 7);

    // 扣减关闭时完成单也不动库存
    order_repo(&store)
        .create(order("SO-DED-3", vec![line(&beer, 4)], OrderStatus::Completed, TS))
        .await
        .expect("create order");
    let after = product_repo(&store)
        .find_by_id(&beer_id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(after.stock, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn losing_duplicate_rolls_back_its_stock_deduction() {
    let store = open_store().await;
    let dishes = seed_category(&store.db, "热菜").await;
    let pork = seed_product(&store.db, &dishes, "回锅肉", 42.0, None, 20).await;
    let pork_id = pork.id.as_ref().expect("product id").to_string();

    let repo = order_repo_with_deduction(&store);
    let a = repo.create(order(
        "SO-RB",
        vec![line(&pork, 3)],
        OrderStatus::Completed,
        TS,
    ));
    let b = repo.create(order(
        "SO-RB",
        vec![line(&pork, 3)],
        OrderStatus::Completed,
        TS,
    ));
    let (ra, rb) = tokio::join!(a, b);
    assert_eq!([&ra, &rb].iter().filter(|r| r.is_ok()).count(), 1);

    // 赢家扣一次库存，输家的扣减随事务一起回滚
    let after = product_repo(&store)
        .find_by_id(&pork_id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(after.stock, 17);

    let movements = ledger_repo(&store)
        .list_for_product(&pork_id)
        .await
        .expect("list movements");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].delta, -3);
    assert_eq!(movements[0].current_stock, 17);
}

#[tokio::test]
async fn list_with_lines_filters_by_status_newest_first() {
    let store = open_store().await;
    let drinks = seed_category(&store.db, "茶饮").await;
    let tea = seed_product(&store.db, &drinks, "乌龙茶", 10.0, None, 100).await;

    let repo = order_repo(&store);
    repo.create(order("SO-L1", vec![line(&tea, 1)], OrderStatus::Completed, TS))
        .await
        .expect("create order");
    repo.create(order("SO-L2", vec![line(&tea, 2)], OrderStatus::Pending, TS + 60))
        .await
        .expect("create order");
    repo.create(order("SO-L3", vec![line(&tea, 3)], OrderStatus::Completed, TS + 120))
        .await
        .expect("create order");

    let all = repo.list_with_lines(None).await.expect("list orders");
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].order.order_no, "SO-L3");
    assert_eq!(all[2].order.order_no, "SO-L1");
    assert!(all.iter().all(|o| o.items.len() == 1));

    let completed = repo
        .list_with_lines(Some(OrderStatus::Completed))
        .await
        .expect("list orders");
    assert_eq!(completed.len(), 2);
    assert!(
        completed
            .iter()
            .all(|o| o.order.status == OrderStatus::Completed)
    );
}
