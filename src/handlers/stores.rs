// src/handlers/stores.rs

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, ownership::OwnedStore},
    models::store::{CreateStorePayload, Store, UpdateStorePayload},
};

#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "Stores",
    request_body = CreateStorePayload,
    responses(
        (status = 201, description = "Loja cadastrada", body = Store),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateStorePayload>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    payload.validate()?;
    let store = app_state.store_service.create_store(user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "Stores",
    responses((status = 200, description = "Lojas do usuário", body = Vec<Store>)),
    security(("api_jwt" = []))
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Store>>, AppError> {
    Ok(Json(app_state.store_service.list_stores(user.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/stores/{storeId}",
    tag = "Stores",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Detalhe da loja", body = Store),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_store(OwnedStore(store): OwnedStore) -> Json<Store> {
    Json(store)
}

#[utoipa::path(
    patch,
    path = "/api/stores/{storeId}",
    tag = "Stores",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    request_body = UpdateStorePayload,
    responses(
        (status = 200, description = "Loja atualizada", body = Store),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_store(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Json(payload): Json<UpdateStorePayload>,
) -> Result<Json<Store>, AppError> {
    payload.validate()?;
    let updated = app_state
        .store_service
        .update_store(store.id, store.owner_id, &payload)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/stores/{storeId}",
    tag = "Stores",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    responses(
        (status = 204, description = "Loja removida com despesas, vendas e estoque"),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_store(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
) -> Result<StatusCode, AppError> {
    app_state.store_service.delete_store(store.id, store.owner_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
