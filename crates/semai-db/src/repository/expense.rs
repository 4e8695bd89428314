//! # Expense Repository
//!
//! The outgoing-money ledger: purchases, wages, utilities.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use semai_core::{Expense, ExpenseCategory};

/// Fields for an expense being recorded.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub description: String,
    pub category: ExpenseCategory,
    pub amount_rp: i64,
    pub recorded_by: Option<String>,
}

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records an expense.
    pub async fn insert(&self, new: &NewExpense) -> DbResult<Expense> {
        debug!(description = %new.description, amount = new.amount_rp, "Recording expense");

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            date: new.date,
            description: new.description.clone(),
            category: new.category,
            amount_rp: new.amount_rp,
            recorded_by: new.recorded_by.clone(),
        };

        sqlx::query(
            r#"
            INSERT INTO expenses (id, date, description, category, amount_rp, recorded_by)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&expense.id)
        .bind(expense.date)
        .bind(&expense.description)
        .bind(expense.category)
        .bind(expense.amount_rp)
        .bind(&expense.recorded_by)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    /// All expenses, newest date first.
    pub async fn list(&self) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT id, date, description, category, amount_rp, recorded_by \
             FROM expenses ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Sum of expenses within [from, to). ISO dates compare correctly as
    /// text, so this is a plain range scan over the date index.
    pub async fn total_between(&self, from: NaiveDate, to: NaiveDate) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_rp), 0) FROM expenses WHERE date >= ?1 AND date < ?2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Total spent per category, biggest first.
    pub async fn totals_by_category(&self) -> DbResult<Vec<(ExpenseCategory, i64)>> {
        let rows: Vec<(ExpenseCategory, i64)> = sqlx::query_as(
            "SELECT category, COALESCE(SUM(amount_rp), 0) AS total \
             FROM expenses GROUP BY category ORDER BY total DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
