// src/services/store_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StoreRepository,
    models::store::{CreateStorePayload, Store, UpdateStorePayload},
};

#[derive(Clone)]
pub struct StoreService {
    repo: StoreRepository,
    pool: PgPool,
}

impl StoreService {
    pub fn new(repo: StoreRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_store(&self, owner_id: Uuid, payload: &CreateStorePayload) -> Result<Store, AppError> {
        let store = self.repo.create(&self.pool, owner_id, payload).await?;
        tracing::info!(store_id = %store.id, "Loja cadastrada: {}", store.store_name);
        Ok(store)
    }

    pub async fn list_stores(&self, owner_id: Uuid) -> Result<Vec<Store>, AppError> {
        self.repo.list_by_owner(owner_id).await
    }

    /// Loja do usuário ou StoreNotFound (lojas de outros donos também dão 404).
    pub async fn get_owned(&self, store_id: Uuid, owner_id: Uuid) -> Result<Store, AppError> {
        self.repo
            .find_owned(store_id, owner_id)
            .await?
            .ok_or(AppError::StoreNotFound)
    }

    pub async fn update_store(
        &self,
        store_id: Uuid,
        owner_id: Uuid,
        patch: &UpdateStorePayload,
    ) -> Result<Store, AppError> {
        self.repo
            .update(&self.pool, store_id, owner_id, patch)
            .await?
            .ok_or(AppError::StoreNotFound)
    }

    pub async fn delete_store(&self, store_id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, store_id, owner_id).await? {
            return Err(AppError::StoreNotFound);
        }
        tracing::info!(%store_id, "Loja removida");
        Ok(())
    }
}
