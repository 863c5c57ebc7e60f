// src/handlers/sales.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::ownership::OwnedStore,
    models::sales::{
        AutoDeductPayload, DeductionReport, ImportSalesPayload, ImportSalesResponse,
        SalesQueryResponse, SalesRangeQuery, UploadSalesPayload, UploadSalesResponse,
    },
};

#[utoipa::path(
    get,
    path = "/api/stores/{storeId}/sales",
    tag = "Sales",
    params(("storeId" = Uuid, Path, description = "ID da loja"), SalesRangeQuery),
    responses(
        (status = 200, description = "Vendas do período, em ordem de data", body = SalesQueryResponse),
        (status = 400, description = "Período inválido"),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Query(range): Query<SalesRangeQuery>,
) -> Result<Json<SalesQueryResponse>, AppError> {
    let sales = app_state
        .sales_service
        .query(store.id, range.start_date, range.end_date)
        .await?;
    Ok(Json(sales))
}

#[utoipa::path(
    post,
    path = "/api/stores/{storeId}/sales/upload",
    tag = "Sales",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    request_body = UploadSalesPayload,
    responses(
        (status = 201, description = "Vendas registradas", body = UploadSalesResponse),
        (status = 400, description = "Registros inválidos"),
        (status = 409, description = "Já existem vendas registradas nessa data")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_sales(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Json(payload): Json<UploadSalesPayload>,
) -> Result<(StatusCode, Json<UploadSalesResponse>), AppError> {
    payload.validate()?;
    let uploaded = app_state.sales_service.upload(store.id, &payload.data).await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

#[utoipa::path(
    post,
    path = "/api/stores/{storeId}/sales/auto-deduct",
    tag = "Sales",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    request_body = AutoDeductPayload,
    responses(
        (status = 200, description = "Baixa aplicada; itens pulados vêm em `errors`", body = DeductionReport),
        (status = 400, description = "Itens inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn auto_deduct(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Json(payload): Json<AutoDeductPayload>,
) -> Result<Json<DeductionReport>, AppError> {
    payload.validate()?;
    let report = app_state
        .sales_service
        .auto_deduct(store.id, &payload.sales_data)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/api/stores/{storeId}/sales/import",
    tag = "Sales",
    params(("storeId" = Uuid, Path, description = "ID da loja")),
    request_body = ImportSalesPayload,
    responses(
        (status = 200, description = "Planilha importada; linhas rejeitadas listadas", body = ImportSalesResponse),
        (status = 409, description = "Já existem vendas registradas nessa data")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_sales(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Json(payload): Json<ImportSalesPayload>,
) -> Result<Json<ImportSalesResponse>, AppError> {
    let imported = app_state.sales_service.import(store.id, &payload).await?;
    Ok(Json(imported))
}
