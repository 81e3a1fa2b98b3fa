use cubist::cube::{CubeRow, MonthKey};
use cubist::rollup;

fn row(month: &str, region: &str, category: &str, payment: &str, total: f64, count: i64) -> CubeRow {
    CubeRow {
        month: month.parse().unwrap(),
        region: region.to_string(),
        product_category: category.to_string(),
        payment_type: payment.to_string(),
        total_sales: total,
        transaction_count: count,
    }
}

#[test]
fn test_recency_filter_keeps_strict_trailing_year() {
    // Months 2023-01 .. 2024-06; latest is 2024-06, so the window is
    // strictly after 2023-06.
    let mut rows = Vec::new();
    for year in [2023, 2024] {
        for month in 1..=12 {
            if year == 2024 && month > 6 {
                continue;
            }
            rows.push(row(
                &format!("{:04}-{:02}", year, month),
                "East",
                "Home",
                "Credit",
                100.0,
                1,
            ));
        }
    }

    let recent = rollup::recency_filter(&rows);
    let months: Vec<MonthKey> = recent.iter().map(|r| r.month).collect();

    assert_eq!(recent.len(), 12);
    assert!(months.contains(&"2023-07".parse().unwrap()));
    assert!(months.contains(&"2024-06".parse().unwrap()));
    assert!(!months.contains(&"2023-06".parse().unwrap()), "boundary month excluded");
    assert!(!months.contains(&"2023-01".parse().unwrap()));
}

#[test]
fn test_recency_filter_on_empty_input() {
    assert!(rollup::recency_filter(&[]).is_empty());
}

#[test]
fn test_top_category_per_region() {
    let rows = vec![
        row("2024-01", "RegionA", "Cat1", "Credit", 100.0, 1),
        row("2024-01", "RegionA", "Cat2", "Credit", 150.0, 1),
        row("2024-01", "RegionB", "Cat1", "Credit", 80.0, 1),
    ];

    let top = rollup::top_category_per_region(&rows);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].region, "RegionA");
    assert_eq!(top[0].product_category, "Cat2");
    assert_eq!(top[0].total_sales, 150.0);
    assert_eq!(top[1].region, "RegionB");
    assert_eq!(top[1].product_category, "Cat1");
    assert_eq!(top[1].total_sales, 80.0);
}

#[test]
fn test_top_category_sums_across_months_before_ranking() {
    let rows = vec![
        row("2024-01", "East", "Home", "Credit", 60.0, 1),
        row("2024-02", "East", "Home", "Cash", 60.0, 1),
        row("2024-01", "East", "Office", "Credit", 100.0, 1),
    ];

    let top = rollup::top_category_per_region(&rows);
    assert_eq!(top[0].product_category, "Home", "summed 120 beats 100");
    assert_eq!(top[0].total_sales, 120.0);
}

#[test]
fn test_top_category_tie_keeps_first_encountered() {
    let rows = vec![
        row("2024-01", "East", "Office", "Credit", 100.0, 1),
        row("2024-01", "East", "Home", "Credit", 100.0, 1),
    ];

    let top = rollup::top_category_per_region(&rows);
    assert_eq!(top[0].product_category, "Office");
}

#[test]
fn test_total_sales_by_year() {
    let rows = vec![
        row("2023-11", "East", "Home", "Credit", 10.0, 1),
        row("2024-01", "East", "Home", "Credit", 20.0, 1),
        row("2024-03", "West", "Office", "Cash", 30.0, 1),
    ];

    let years = rollup::total_sales_by_year(&rows);
    assert_eq!(years.len(), 2);
    assert_eq!(years[0].year, 2023);
    assert_eq!(years[0].total_sales, 10.0);
    assert_eq!(years[1].year, 2024);
    assert_eq!(years[1].total_sales, 50.0);
}

#[test]
fn test_total_sales_by_month_in_calendar_order() {
    let rows = vec![
        row("2024-02", "East", "Home", "Credit", 20.0, 1),
        row("2023-12", "East", "Home", "Credit", 10.0, 1),
        row("2024-10", "West", "Office", "Cash", 30.0, 1),
        row("2024-02", "West", "Office", "Cash", 5.0, 1),
    ];

    let months = rollup::total_sales_by_month(&rows);
    let keys: Vec<String> = months.iter().map(|m| m.month.to_string()).collect();
    assert_eq!(keys, vec!["2023-12", "2024-02", "2024-10"]);
    assert_eq!(months[1].total_sales, 25.0);
}

#[test]
fn test_sales_by_payment_type_sums_both_metrics() {
    let rows = vec![
        row("2024-01", "East", "Home", "Credit", 100.0, 4),
        row("2024-02", "West", "Office", "Credit", 50.0, 2),
        row("2024-02", "West", "Office", "Cash", 25.0, 1),
    ];

    let by_payment = rollup::sales_by_payment_type(&rows);
    assert_eq!(by_payment.len(), 2);

    let credit = by_payment
        .iter()
        .find(|p| p.payment_type == "Credit")
        .unwrap();
    assert_eq!(credit.total_sales, 150.0);
    assert_eq!(credit.transaction_count, 6);
}

#[test]
fn test_sales_by_category_and_region() {
    let rows = vec![
        row("2024-01", "East", "Home", "Credit", 100.0, 1),
        row("2024-02", "East", "Home", "Cash", 50.0, 1),
        row("2024-01", "West", "Home", "Credit", 30.0, 1),
    ];

    let breakdown = rollup::sales_by_category_and_region(&rows);
    assert_eq!(breakdown.len(), 2);

    let east_home = breakdown
        .iter()
        .find(|b| b.region == "East" && b.product_category == "Home")
        .unwrap();
    assert_eq!(east_home.total_sales, 150.0);
}

#[test]
fn test_monthly_sales_by_category_in_calendar_order() {
    let rows = vec![
        row("2024-02", "East", "Home", "Credit", 20.0, 1),
        row("2024-01", "West", "Home", "Cash", 10.0, 1),
        row("2024-01", "East", "Office", "Credit", 5.0, 1),
    ];

    let trend = rollup::monthly_sales_by_category(&rows);
    assert_eq!(trend.len(), 3);
    assert_eq!(trend[0].month.to_string(), "2024-01");
    assert_eq!(trend.last().unwrap().month.to_string(), "2024-02");
    assert_eq!(trend.last().unwrap().product_category, "Home");
}

#[test]
fn test_rollups_have_no_side_effects_on_input() {
    let rows = vec![
        row("2024-01", "East", "Home", "Credit", 100.0, 1),
        row("2024-02", "West", "Office", "Cash", 50.0, 1),
    ];
    let snapshot = rows.clone();

    rollup::total_sales_by_year(&rows);
    rollup::recency_filter(&rows);
    rollup::top_category_per_region(&rows);

    assert_eq!(rows, snapshot);
}
