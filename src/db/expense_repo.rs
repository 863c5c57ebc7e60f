// src/db/expense_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::expense::VariableExpense};

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_month(
        &self,
        store_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<Vec<VariableExpense>, AppError> {
        let items = sqlx::query_as::<_, VariableExpense>(
            r#"
            SELECT id, store_id, year, month, description, amount, created_at
            FROM variable_expenses
            WHERE store_id = $1 AND year = $2 AND month = $3
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(store_id)
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn delete_month<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM variable_expenses WHERE store_id = $1 AND year = $2 AND month = $3",
        )
        .bind(store_id)
        .bind(year)
        .bind(month)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        year: i32,
        month: i32,
        description: &str,
        amount: i64,
    ) -> Result<VariableExpense, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, VariableExpense>(
            r#"
            INSERT INTO variable_expenses (store_id, year, month, description, amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, store_id, year, month, description, amount, created_at
            "#,
        )
        .bind(store_id)
        .bind(year)
        .bind(month)
        .bind(description)
        .bind(amount)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }
}
