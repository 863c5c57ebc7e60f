// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{NewProduct, Product, ProductUpdate},
};

const PRODUCT_COLUMNS: &str =
    "id, store_id, name, quantity, sale_price, cost_price, storage_type, created_at, updated_at";

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, store_id: Uuid) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE store_id = $1 ORDER BY name ASC");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Insere ou atualiza pelo par (loja, nome).
    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        product: &NewProduct,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO products (store_id, name, quantity, sale_price, cost_price, storage_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (store_id, name) DO UPDATE SET
                quantity = EXCLUDED.quantity,
                sale_price = EXCLUDED.sale_price,
                cost_price = EXCLUDED.cost_price,
                storage_type = EXCLUDED.storage_type,
                updated_at = NOW()
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let saved = sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .bind(&product.name)
            .bind(product.quantity)
            .bind(product.sale_price)
            .bind(product.cost_price)
            .bind(&product.storage_type)
            .fetch_one(executor)
            .await?;
        Ok(saved)
    }

    pub async fn update_by_id<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE products SET
                quantity = $3,
                sale_price = COALESCE($4, sale_price),
                cost_price = COALESCE($5, cost_price),
                storage_type = COALESCE($6, storage_type),
                updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(update.id)
            .bind(store_id)
            .bind(update.quantity)
            .bind(update.sale_price)
            .bind(update.cost_price)
            .bind(update.storage_type.as_deref())
            .fetch_optional(executor)
            .await?;
        Ok(updated)
    }

    // Trava a linha até o fim da transação (baixa de estoque concorrente)
    pub async fn find_by_name_for_update<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        name: &str,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE store_id = $1 AND name = $2 FOR UPDATE"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .bind(name)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn decrement<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE products
            SET quantity = quantity - $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .bind(quantity)
            .fetch_one(executor)
            .await?;
        Ok(product)
    }
}
