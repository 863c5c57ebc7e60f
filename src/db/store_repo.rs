// src/db/store_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::store::{CreateStorePayload, Store, UpdateStorePayload},
};

const STORE_COLUMNS: &str = r#"
    id, owner_id, store_name, address, phone_number, category,
    deposit, premium, monthly_rent, maintenance_fee, initial_investment,
    created_at, updated_at
"#;

#[derive(Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &CreateStorePayload,
    ) -> Result<Store, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO stores (
                owner_id, store_name, address, phone_number, category,
                deposit, premium, monthly_rent, maintenance_fee, initial_investment
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {STORE_COLUMNS}
            "#
        );
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(owner_id)
            .bind(&payload.store_name)
            .bind(&payload.address)
            .bind(&payload.phone_number)
            .bind(payload.category.as_deref())
            .bind(payload.deposit)
            .bind(payload.premium)
            .bind(payload.monthly_rent)
            .bind(payload.maintenance_fee)
            .bind(payload.initial_investment)
            .fetch_one(executor)
            .await?;
        Ok(store)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Store>, AppError> {
        let sql = format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE owner_id = $1 ORDER BY created_at ASC"
        );
        let stores = sqlx::query_as::<_, Store>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(stores)
    }

    /// Busca a loja apenas se ela pertencer ao usuário.
    pub async fn find_owned(&self, store_id: Uuid, owner_id: Uuid) -> Result<Option<Store>, AppError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1 AND owner_id = $2");
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(store_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(store)
    }

    // Campos ausentes no patch mantêm o valor atual (COALESCE)
    pub async fn update<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        owner_id: Uuid,
        patch: &UpdateStorePayload,
    ) -> Result<Option<Store>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE stores SET
                store_name = COALESCE($3, store_name),
                address = COALESCE($4, address),
                phone_number = COALESCE($5, phone_number),
                category = COALESCE($6, category),
                deposit = COALESCE($7, deposit),
                premium = COALESCE($8, premium),
                monthly_rent = COALESCE($9, monthly_rent),
                maintenance_fee = COALESCE($10, maintenance_fee),
                initial_investment = COALESCE($11, initial_investment),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {STORE_COLUMNS}
            "#
        );
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(store_id)
            .bind(owner_id)
            .bind(patch.store_name.as_deref())
            .bind(patch.address.as_deref())
            .bind(patch.phone_number.as_deref())
            .bind(patch.category.as_deref())
            .bind(patch.deposit)
            .bind(patch.premium)
            .bind(patch.monthly_rent)
            .bind(patch.maintenance_fee)
            .bind(patch.initial_investment)
            .fetch_optional(executor)
            .await?;
        Ok(store)
    }

    // Despesas, vendas e produtos saem junto via ON DELETE CASCADE
    pub async fn delete<'e, E>(&self, executor: E, store_id: Uuid, owner_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1 AND owner_id = $2")
            .bind(store_id)
            .bind(owner_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
