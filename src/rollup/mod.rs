//! Rollup and drill-down queries over the materialized cube.
//!
//! Each function re-aggregates cube rows along a subset of their dimensions
//! and returns an owned tabular result; none touches the warehouse or has
//! any side effect. Multi-row results come back sorted on their stated key
//! (calendar order for months), so output is deterministic apart from the
//! documented top-category tie-break.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::cube::{CubeRow, MonthKey};

/// Total sales for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSales {
    pub year: i32,
    pub total_sales: f64,
}

/// Total sales for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSales {
    pub month: MonthKey,
    pub total_sales: f64,
}

/// Sales and transaction volume for one payment type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentTypeSales {
    pub payment_type: String,
    pub total_sales: f64,
    pub transaction_count: i64,
}

/// Total sales for one (product category, region) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRegionSales {
    pub product_category: String,
    pub region: String,
    pub total_sales: f64,
}

/// Total sales for one product category in one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMonthSales {
    pub month: MonthKey,
    pub product_category: String,
    pub total_sales: f64,
}

/// The best-selling product category of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTopCategory {
    pub region: String,
    pub product_category: String,
    pub total_sales: f64,
}

/// Total sales grouped by year, ascending.
pub fn total_sales_by_year(rows: &[CubeRow]) -> Vec<YearSales> {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.month.year).or_insert(0.0) += row.total_sales;
    }
    totals
        .into_iter()
        .map(|(year, total_sales)| YearSales { year, total_sales })
        .collect()
}

/// Total sales grouped by month, in calendar order.
pub fn total_sales_by_month(rows: &[CubeRow]) -> Vec<MonthSales> {
    let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.month).or_insert(0.0) += row.total_sales;
    }
    totals
        .into_iter()
        .map(|(month, total_sales)| MonthSales { month, total_sales })
        .collect()
}

/// Restrict cube rows to the trailing 12-month window.
///
/// Keeps rows whose month is strictly after (latest month present − 12
/// months); the boundary month itself is excluded. Empty input stays empty.
pub fn recency_filter(rows: &[CubeRow]) -> Vec<CubeRow> {
    let Some(latest) = rows.iter().map(|r| r.month).max() else {
        return Vec::new();
    };
    let boundary = latest.minus_years(1);
    rows.iter()
        .filter(|r| r.month > boundary)
        .cloned()
        .collect()
}

/// Total sales and transaction count grouped by payment type.
pub fn sales_by_payment_type(rows: &[CubeRow]) -> Vec<PaymentTypeSales> {
    let mut totals: BTreeMap<&str, (f64, i64)> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(row.payment_type.as_str()).or_insert((0.0, 0));
        entry.0 += row.total_sales;
        entry.1 += row.transaction_count;
    }
    totals
        .into_iter()
        .map(|(payment_type, (total_sales, transaction_count))| PaymentTypeSales {
            payment_type: payment_type.to_string(),
            total_sales,
            transaction_count,
        })
        .collect()
}

/// Total sales grouped by (product category, region).
pub fn sales_by_category_and_region(rows: &[CubeRow]) -> Vec<CategoryRegionSales> {
    let mut totals: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for row in rows {
        *totals
            .entry((row.product_category.as_str(), row.region.as_str()))
            .or_insert(0.0) += row.total_sales;
    }
    totals
        .into_iter()
        .map(|((product_category, region), total_sales)| CategoryRegionSales {
            product_category: product_category.to_string(),
            region: region.to_string(),
            total_sales,
        })
        .collect()
}

/// Monthly sales time series per product category, in calendar order.
pub fn monthly_sales_by_category(rows: &[CubeRow]) -> Vec<CategoryMonthSales> {
    let mut totals: BTreeMap<(MonthKey, &str), f64> = BTreeMap::new();
    for row in rows {
        *totals
            .entry((row.month, row.product_category.as_str()))
            .or_insert(0.0) += row.total_sales;
    }
    totals
        .into_iter()
        .map(|((month, product_category), total_sales)| CategoryMonthSales {
            month,
            product_category: product_category.to_string(),
            total_sales,
        })
        .collect()
}

/// The single best-selling product category per region.
///
/// Sums sales per (region, category) and keeps the region's maximum. On an
/// exact tie the category whose (region, category) group was encountered
/// first in cube-row order wins; no secondary sort key is imposed.
pub fn top_category_per_region(rows: &[CubeRow]) -> Vec<RegionTopCategory> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut totals: HashMap<(String, String), f64> = HashMap::new();
    for row in rows {
        let key = (row.region.clone(), row.product_category.clone());
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        *totals.entry(key).or_insert(0.0) += row.total_sales;
    }

    let mut best: Vec<RegionTopCategory> = Vec::new();
    for key in &order {
        let total_sales = totals[key];
        let (region, product_category) = key;
        match best.iter_mut().find(|b| b.region == *region) {
            Some(current) => {
                if total_sales > current.total_sales {
                    current.product_category = product_category.clone();
                    current.total_sales = total_sales;
                }
            }
            None => best.push(RegionTopCategory {
                region: region.clone(),
                product_category: product_category.clone(),
                total_sales,
            }),
        }
    }

    best.sort_by(|a, b| a.region.cmp(&b.region));
    best
}
