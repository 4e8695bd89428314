//! # Reports
//!
//! Read-only summaries assembled from repository aggregates: the reports
//! screen, the dashboard, and the expense overview.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use semai_core::{Expense, ExpenseCategory, Product, Sale};
use semai_db::Database;

use crate::error::PosError;

// =============================================================================
// Sales Report
// =============================================================================

/// All-time income figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub total_income_rp: i64,
    pub transaction_count: i64,
    /// Integer division; the rupiah has no useful fraction here.
    pub average_order_rp: i64,
    pub recent: Vec<Sale>,
}

/// Builds the reports-screen summary.
pub async fn sales_report(db: &Database, recent_limit: u32) -> Result<SalesReport, PosError> {
    let totals = db.sales().totals().await?;
    let recent = db.sales().list_recent(recent_limit).await?;

    let average_order_rp = if totals.transaction_count > 0 {
        totals.total_income_rp / totals.transaction_count
    } else {
        0
    };

    Ok(SalesReport {
        total_income_rp: totals.total_income_rp,
        transaction_count: totals.transaction_count,
        average_order_rp,
        recent,
    })
}

// =============================================================================
// Dashboard
// =============================================================================

/// The landing-screen snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub today_income_rp: i64,
    pub today_transactions: i64,
    pub total_stock: i64,
    pub low_stock: Vec<Product>,
    pub recent_sales: Vec<Sale>,
}

/// Builds the dashboard. `now` is passed in so "today" is the caller's
/// day boundary, not the database's.
pub async fn dashboard(db: &Database, now: DateTime<Utc>) -> Result<DashboardSnapshot, PosError> {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();

    let today = db.sales().totals_since(midnight).await?;
    let total_stock = db.products().total_stock().await?;
    let low_stock = db.products().low_stock().await?;
    let recent_sales = db.sales().list_recent(5).await?;

    Ok(DashboardSnapshot {
        today_income_rp: today.total_income_rp,
        today_transactions: today.transaction_count,
        total_stock,
        low_stock,
        recent_sales,
    })
}

// =============================================================================
// Expense Report
// =============================================================================

/// The expense-screen overview for one month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseReport {
    pub month_total_rp: i64,
    /// Category with the highest all-time spend, if any expenses exist.
    pub largest_category: Option<(ExpenseCategory, i64)>,
    /// monthly_budget − month total; negative when over budget.
    pub remaining_budget_rp: i64,
    pub entries: Vec<Expense>,
}

/// Builds the expense overview for the month containing `today`.
///
/// The monthly budget is the caller's number; it is not stored here.
pub async fn expense_report(
    db: &Database,
    today: NaiveDate,
    monthly_budget_rp: i64,
) -> Result<ExpenseReport, PosError> {
    let from = today.with_day(1).expect("day 1 always exists");
    let to = next_month(from);

    let month_total_rp = db.expenses().total_between(from, to).await?;
    let by_category = db.expenses().totals_by_category().await?;
    let entries = db.expenses().list().await?;

    Ok(ExpenseReport {
        month_total_rp,
        largest_category: by_category.into_iter().next(),
        remaining_budget_rp: monthly_budget_rp - month_total_rp,
        entries,
    })
}

/// First day of the following month.
fn next_month(first_of_month: NaiveDate) -> NaiveDate {
    let (year, month) = if first_of_month.month() == 12 {
        (first_of_month.year() + 1, 1)
    } else {
        (first_of_month.year(), first_of_month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is valid")
}

// =============================================================================
// Unit Tests
// =============================================================================
