// src/db/sales_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{NewSalesRecord, SalesRecord, SalesTotals},
};

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Serializa uploads concorrentes da mesma loja até o fim da transação
    pub async fn lock_store<'e, E>(&self, executor: E, store_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT id FROM stores WHERE id = $1 FOR UPDATE")
            .bind(store_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Dentre as datas informadas, devolve as que já possuem vendas na loja.
    pub async fn dates_already_recorded<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<Vec<NaiveDate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let recorded = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT DISTINCT sale_date
            FROM sales_records
            WHERE store_id = $1 AND sale_date = ANY($2)
            ORDER BY sale_date
            "#,
        )
        .bind(store_id)
        .bind(dates)
        .fetch_all(executor)
        .await?;
        Ok(recorded)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        record: &NewSalesRecord,
    ) -> Result<SalesRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, SalesRecord>(
            r#"
            INSERT INTO sales_records (
                store_id, sale_date, product_name, quantity,
                total_price, cost_price, profit_price, barcode
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, store_id, sale_date, product_name, quantity,
                      total_price, cost_price, profit_price, barcode, created_at
            "#,
        )
        .bind(store_id)
        .bind(record.sale_date)
        .bind(&record.product_name)
        .bind(record.quantity)
        .bind(record.total_price)
        .bind(record.cost_price)
        .bind(record.profit_price)
        .bind(record.barcode.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(inserted)
    }

    // Intervalo fechado [start, end]
    pub async fn list_by_range(
        &self,
        store_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SalesRecord>, AppError> {
        let records = sqlx::query_as::<_, SalesRecord>(
            r#"
            SELECT id, store_id, sale_date, product_name, quantity,
                   total_price, cost_price, profit_price, barcode, created_at
            FROM sales_records
            WHERE store_id = $1 AND sale_date BETWEEN $2 AND $3
            ORDER BY sale_date ASC, created_at ASC
            "#,
        )
        .bind(store_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn sum_by_range(
        &self,
        store_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SalesTotals, AppError> {
        let totals = sqlx::query_as::<_, SalesTotals>(
            r#"
            SELECT
                COALESCE(SUM(total_price), 0)::BIGINT AS total_sales,
                COALESCE(SUM(profit_price), 0)::BIGINT AS total_profit
            FROM sales_records
            WHERE store_id = $1 AND sale_date BETWEEN $2 AND $3
            "#,
        )
        .bind(store_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }
}
