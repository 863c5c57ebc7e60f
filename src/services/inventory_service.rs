// src/services/inventory_service.rs

use sqlx::PgPool;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{
        ImportProductsResponse, NewProduct, Product, ProductUpdate, ProductView, SortOrder,
    },
    services::spreadsheet::map_product_rows,
};

/// Filtra pelo trecho do nome (sem diferenciar maiúsculas) e ordena pela margem.
/// Produtos sem margem (preço de venda zero) ficam sempre no fim.
pub fn filter_and_sort(products: Vec<Product>, search: Option<&str>, order: SortOrder) -> Vec<ProductView> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut views: Vec<ProductView> = products
        .into_iter()
        .filter(|p| match &needle {
            Some(needle) => p.name.to_lowercase().contains(needle),
            None => true,
        })
        .map(ProductView::from)
        .collect();

    views.sort_by(|a, b| match (a.margin_rate, b.margin_rate) {
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => x.cmp(&y),
            SortOrder::Desc => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    views
}

#[derive(Clone)]
pub struct InventoryService {
    repo: ProductRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(repo: ProductRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_products(
        &self,
        store_id: Uuid,
        search: Option<&str>,
        order: SortOrder,
    ) -> Result<Vec<ProductView>, AppError> {
        let products = self.repo.list(store_id).await?;
        Ok(filter_and_sort(products, search, order))
    }

    /// Cadastro em lote; nomes já existentes na loja são atualizados.
    pub async fn save_products(&self, store_id: Uuid, products: &[NewProduct]) -> Result<Vec<ProductView>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(products.len());
        for product in products {
            let stored = self.repo.upsert(&mut *tx, store_id, product).await?;
            saved.push(ProductView::from(stored));
        }
        tx.commit().await?;

        tracing::info!(%store_id, saved = saved.len(), "Produtos cadastrados");
        Ok(saved)
    }

    /// Atualização em lote. Um id desconhecido aborta tudo.
    pub async fn update_products(&self, store_id: Uuid, updates: &[ProductUpdate]) -> Result<Vec<ProductView>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            let product = self
                .repo
                .update_by_id(&mut *tx, store_id, update)
                .await?
                .ok_or(AppError::ProductNotFound(update.id))?;
            updated.push(ProductView::from(product));
        }
        tx.commit().await?;

        tracing::info!(%store_id, updated = updated.len(), "Estoque atualizado");
        Ok(updated)
    }

    pub async fn import_products(
        &self,
        store_id: Uuid,
        rows: &[Vec<serde_json::Value>],
    ) -> Result<ImportProductsResponse, AppError> {
        let (products, skipped_rows) = map_product_rows(rows);
        if !skipped_rows.is_empty() {
            tracing::warn!(%store_id, skipped = skipped_rows.len(), "Linhas da planilha de estoque ignoradas");
        }

        let products = if products.is_empty() {
            Vec::new()
        } else {
            self.save_products(store_id, &products).await?
        };

        Ok(ImportProductsResponse {
            imported: products.len(),
            skipped_rows,
            products,
        })
    }
}
