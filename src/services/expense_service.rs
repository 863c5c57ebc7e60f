// src/services/expense_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ExpenseRepository,
    models::expense::{ExpenseItemPayload, MonthlyExpenses, VariableExpense},
    services::period::check_month,
};

#[derive(Clone)]
pub struct ExpenseService {
    repo: ExpenseRepository,
    pool: PgPool,
}

impl ExpenseService {
    pub fn new(repo: ExpenseRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn month_items(&self, store_id: Uuid, year: i32, month: u32) -> Result<Vec<VariableExpense>, AppError> {
        check_month(year, month)?;
        self.repo.list_by_month(store_id, year, month as i32).await
    }

    pub async fn get_month(&self, store_id: Uuid, year: i32, month: u32) -> Result<MonthlyExpenses, AppError> {
        let items = self.month_items(store_id, year, month).await?;
        Ok(MonthlyExpenses::new(year, month as i32, items))
    }

    /// Substitui todas as despesas do mês em uma única transação.
    pub async fn replace_month(
        &self,
        store_id: Uuid,
        year: i32,
        month: u32,
        expenses: &[ExpenseItemPayload],
    ) -> Result<MonthlyExpenses, AppError> {
        check_month(year, month)?;
        let month = month as i32;

        let mut tx = self.pool.begin().await?;

        let removed = self.repo.delete_month(&mut *tx, store_id, year, month).await?;

        let mut items = Vec::with_capacity(expenses.len());
        for expense in expenses {
            let item = self
                .repo
                .insert(&mut *tx, store_id, year, month, expense.description.trim(), expense.amount)
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            %store_id, year, month, removed, inserted = items.len(),
            "Despesas variáveis do mês substituídas"
        );
        Ok(MonthlyExpenses::new(year, month, items))
    }
}
