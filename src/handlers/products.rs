// src/handlers/products.rs

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::ownership::OwnedStore,
    models::product::{
        CreateProductsPayload, ImportProductsPayload, ImportProductsResponse, ProductQuery,
        ProductView, UpdateProductsPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/stores/{storeId}/products",
    tag = "Inventory",
    params(("storeId" = Uuid, Path, description = "ID da loja"), ProductQuery),
    responses(
        (status = 200, description = "Estoque com margem e lucro por produto", body = Vec<ProductView>),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let products = app_state
        .inventory_service
        .list_products(store.id, query.search.as_deref(), query.sort.unwrap_or_default())
        .await?;
    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/stores/{storeId}/products",
    tag = "Inventory",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    request_body = CreateProductsPayload,
    responses(
        (status = 200, description = "Produtos gravados (nome repetido atualiza)", body = Vec<ProductView>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_products(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Json(payload): Json<CreateProductsPayload>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    payload.validate()?;
    let saved = app_state
        .inventory_service
        .save_products(store.id, &payload.products)
        .await?;
    Ok(Json(saved))
}

#[utoipa::path(
    put,
    path = "/api/stores/{storeId}/products",
    tag = "Inventory",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    request_body = UpdateProductsPayload,
    responses(
        (status = 200, description = "Produtos atualizados", body = Vec<ProductView>),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto não encontrado; nada foi aplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_products(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Json(payload): Json<UpdateProductsPayload>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    payload.validate()?;
    let updated = app_state
        .inventory_service
        .update_products(store.id, &payload.products)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    post,
    path = "/api/stores/{storeId}/products/import",
    tag = "Inventory",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    request_body = ImportProductsPayload,
    responses(
        (status = 200, description = "Planilha de estoque importada", body = ImportProductsResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn import_products(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Json(payload): Json<ImportProductsPayload>,
) -> Result<Json<ImportProductsResponse>, AppError> {
    let imported = app_state
        .inventory_service
        .import_products(store.id, &payload.rows)
        .await?;
    Ok(Json(imported))
}
