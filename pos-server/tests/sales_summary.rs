//! 销售日汇总集成测试
//!
//! UTC 自然日分桶、定点累加、闭区间边界与状态过滤。

mod common;

use common::*;
use shared::OrderStatus;

/// 2025-01-01 00:00:00 UTC
const D1: i64 = 1_735_689_600;
const DAY: i64 = 86_400;

#[tokio::test]
async fn buckets_follow_utc_calendar_days() {
    let store = open_store().await;
    let meals = seed_category(&store.db, "套餐").await;
    let combo = seed_product(&store.db, &meals, "商务套餐", 30.0, None, 1000).await;

    let repo = order_repo(&store);
    // 1 月 1 日两单 (其中一单踩在 23:59:59)，1 月 2 日一单 (00:00:00)，
    // 1 月 3 日没有订单，1 月 4 日一单
    for (order_no, quantity, ts) in [
        ("S-1", 1, D1),
        ("S-2", 2, D1 + DAY - 1),
        ("S-3", 1, D1 + DAY),
        ("S-4", 1, D1 + 3 * DAY),
    ] {
        repo.create(order(
            order_no,
            vec![line(&combo, quantity)],
            OrderStatus::Completed,
            ts,
        ))
        .await
        .expect("create order");
    }

    let summary = repo
        .daily_summary(D1, D1 + 4 * DAY, Some(OrderStatus::Completed))
        .await
        .expect("daily summary");

    // 升序日期桶，跳过没有订单的 1 月 3 日
    let dates: Vec<&str> = summary.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(dates, ["2025-01-01", "2025-01-02", "2025-01-04"]);
    assert_eq!(summary[0].order_count, 2);
    assert_eq!(summary[0].gross, 90.0);
    assert_eq!(summary[1].order_count, 1);
    assert_eq!(summary[1].gross, 30.0);
    assert_eq!(summary[2].order_count, 1);
    assert_eq!(summary[2].gross, 30.0);
}

#[tokio::test]
async fn gross_is_summed_with_fixed_point_arithmetic() {
    let store = open_store().await;
    let snacks = seed_category(&store.db, "糖果").await;
    let candy = seed_product(&store.db, &snacks, "水果糖", 0.1, None, 1000).await;

    let repo = order_repo(&store);
    // 十单 0.1：天真的浮点累加得 0.9999999999999999
    for i in 0..10 {
        repo.create(order(
            &format!("S-FP-{i}"),
            vec![line(&candy, 1)],
            OrderStatus::Completed,
            D1 + i,
        ))
        .await
        .expect("create order");
    }

    let summary = repo
        .daily_summary(D1, D1 + DAY, Some(OrderStatus::Completed))
        .await
        .expect("daily summary");
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].order_count, 10);
    assert_eq!(summary[0].gross, 1.0);
}

#[tokio::test]
async fn range_is_inclusive_and_inverted_ranges_are_empty() {
    let store = open_store().await;
    let meals = seed_category(&store.db, "简餐").await;
    let bowl = seed_product(&store.db, &meals, "牛肉面", 18.0, None, 1000).await;

    let repo = order_repo(&store);
    repo.create(order("S-LO", vec![line(&bowl, 1)], OrderStatus::Completed, D1))
        .await
        .expect("create order");
    repo.create(order(
        "S-HI",
        vec![line(&bowl, 1)],
        OrderStatus::Completed,
        D1 + 1000,
    ))
    .await
    .expect("create order");

    // 两端的订单都落在闭区间内
    let summary = repo
        .daily_summary(D1, D1 + 1000, Some(OrderStatus::Completed))
        .await
        .expect("daily summary");
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].order_count, 2);

    // 窗口夹在两单之间则一单都不剩
    let summary = repo
        .daily_summary(D1 + 1, D1 + 999, Some(OrderStatus::Completed))
        .await
        .expect("daily summary");
    assert!(summary.is_empty());

    // 起止倒置返回空表，不报错
    let summary = repo
        .daily_summary(D1 + 1000, D1, Some(OrderStatus::Completed))
        .await
        .expect("daily summary");
    assert!(summary.is_empty());
}

#[tokio::test]
async fn status_filter_selects_matching_orders() {
    let store = open_store().await;
    let meals = seed_category(&store.db, "烧烤").await;
    let skewer = seed_product(&store.db, &meals, "羊肉串", 5.0, None, 1000).await;

    let repo = order_repo(&store);
    for (order_no, status) in [
        ("S-C", OrderStatus::Completed),
        ("S-P", OrderStatus::Pending),
        ("S-X", OrderStatus::Cancelled),
    ] {
        repo.create(order(order_no, vec![line(&skewer, 2)], status, D1))
            .await
            .expect("create order");
    }

    let completed_only = repo
        .daily_summary(D1, D1 + DAY, Some(OrderStatus::Completed))
        .await
        .expect("daily summary");
    assert_eq!(completed_only.len(), 1);
    assert_eq!(completed_only[0].order_count, 1);
    assert_eq!(completed_only[0].gross, 10.0);

    // 不过滤时统计所有状态
    let everything = repo
        .daily_summary(D1, D1 + DAY, None)
        .await
        .expect("daily summary");
    assert_eq!(everything[0].order_count, 3);
    assert_eq!(everything[0].gross, 30.0);

    // 没有匹配订单的状态得到空表
    let refunded = repo
        .daily_summary(D1, D1 + DAY, Some(OrderStatus::Refunded))
        .await
        .expect("daily summary");
    assert!(refunded.is_empty());
}
