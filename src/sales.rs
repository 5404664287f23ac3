//! Sales aggregation: totals by item, day and state

use anyhow::anyhow;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

use crate::data::{date_from_days, SalesTable};

/// Aggregates computed from one sales table
///
/// Every mapping is an ordered `Vec` so output order is explicit:
/// `sales_by_item` descending by total (ties in first-seen order),
/// `daily_sales` chronological, the per-state mappings by state name.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub total_sales: f64,
    pub sales_by_item: Vec<(String, f64)>,
    pub daily_sales: Vec<(NaiveDate, f64)>,
    pub customers_by_state: Vec<(String, u64)>,
    pub sales_by_state: Vec<(String, f64)>,
}

impl SalesSummary {
    pub fn item_total(&self, item: &str) -> Option<f64> {
        lookup(&self.sales_by_item, item)
    }

    pub fn day_total(&self, date: NaiveDate) -> Option<f64> {
        self.daily_sales
            .iter()
            .find(|(day, _)| *day == date)
            .map(|(_, total)| *total)
    }

    pub fn customers_in(&self, state: &str) -> Option<u64> {
        lookup(&self.customers_by_state, state)
    }

    pub fn state_total(&self, state: &str) -> Option<f64> {
        lookup(&self.sales_by_state, state)
    }
}

/// Compute every aggregate of [`SalesSummary`] for `sales`
pub fn summarize(sales: &SalesTable) -> crate::Result<SalesSummary> {
    let summary = SalesSummary {
        total_sales: total_sales(sales)?,
        sales_by_item: sales_by_item(sales)?,
        daily_sales: daily_sales(sales)?,
        customers_by_state: customers_by_state(sales)?,
        sales_by_state: sales_by_state(sales)?,
    };

    debug!(
        "Summarized {} rows: {} items, {} days, {} states",
        sales.len(),
        summary.sales_by_item.len(),
        summary.daily_sales.len(),
        summary.sales_by_state.len()
    );
    Ok(summary)
}

/// Sum of price over all rows; null prices are skipped
pub fn total_sales(sales: &SalesTable) -> crate::Result<f64> {
    let out = sales
        .frame()
        .clone()
        .lazy()
        .select([col("price").sum().alias("total")])
        .collect()?;

    Ok(out
        .column("total")?
        .as_materialized_series()
        .f64()?
        .get(0)
        .unwrap_or(0.0))
}

/// Item totals, largest first; equal totals keep the order items first appear in
pub fn sales_by_item(sales: &SalesTable) -> crate::Result<Vec<(String, f64)>> {
    let out = sales
        .frame()
        .clone()
        .lazy()
        .filter(col("item").is_not_null())
        .group_by_stable([col("item")])
        .agg([col("price").sum().alias("total")])
        .sort(
            ["total"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?;

    keyed_totals(&out, "item")
}

/// Totals per calendar day in chronological order
pub fn daily_sales(sales: &SalesTable) -> crate::Result<Vec<(NaiveDate, f64)>> {
    let out = sales
        .frame()
        .clone()
        .lazy()
        .filter(col("date").is_not_null())
        .group_by([col("date")])
        .agg([col("price").sum().alias("total")])
        .sort(["date"], SortMultipleOptions::default())
        .select([col("date").cast(DataType::Int32), col("total")])
        .collect()?;

    let days = out.column("date")?.as_materialized_series().i32()?;
    let totals = out.column("total")?.as_materialized_series().f64()?;

    days.into_iter()
        .zip(totals.into_iter())
        .filter_map(|(day, total)| day.map(|day| (day, total.unwrap_or(0.0))))
        .map(|(day, total)| {
            let date = date_from_days(day).ok_or_else(|| anyhow!("date out of range: {}", day))?;
            Ok((date, total))
        })
        .collect()
}

/// Distinct non-null customer ids per state
pub fn customers_by_state(sales: &SalesTable) -> crate::Result<Vec<(String, u64)>> {
    let out = sales
        .frame()
        .clone()
        .lazy()
        .filter(col("state").is_not_null())
        .group_by([col("state")])
        .agg([col("customer_id")
            .drop_nulls()
            .n_unique()
            .cast(DataType::UInt64)
            .alias("customers")])
        .sort(["state"], SortMultipleOptions::default())
        .collect()?;

    let states = out.column("state")?.as_materialized_series().str()?;
    let counts = out.column("customers")?.as_materialized_series().u64()?;

    Ok(states
        .into_iter()
        .zip(counts.into_iter())
        .filter_map(|(state, count)| Some((state?.to_string(), count.unwrap_or(0))))
        .collect())
}

/// Price totals per state, ordered by state name
pub fn sales_by_state(sales: &SalesTable) -> crate::Result<Vec<(String, f64)>> {
    let out = sales
        .frame()
        .clone()
        .lazy()
        .filter(col("state").is_not_null())
        .group_by([col("state")])
        .agg([col("price").sum().alias("total")])
        .sort(["state"], SortMultipleOptions::default())
        .collect()?;

    keyed_totals(&out, "state")
}

fn keyed_totals(frame: &DataFrame, key: &str) -> crate::Result<Vec<(String, f64)>> {
    let keys = frame.column(key)?.as_materialized_series().str()?;
    let totals = frame.column("total")?.as_materialized_series().f64()?;

    Ok(keys
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(key, total)| Some((key?.to_string(), total.unwrap_or(0.0))))
        .collect())
}

fn lookup<V: Copy>(pairs: &[(String, V)], key: &str) -> Option<V> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
}
