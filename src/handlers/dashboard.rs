// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::ownership::OwnedStore,
    models::dashboard::{MonthQuery, MonthlySalesSummary},
};

#[utoipa::path(
    get,
    path = "/api/stores/{storeId}/dashboard/sales-summary",
    tag = "Dashboard",
    params(("storeId" = Uuid, Path, description = "ID da loja"), MonthQuery),
    responses(
        (status = 200, description = "Vendas do mês por produto e por dia", body = MonthlySalesSummary),
        (status = 400, description = "Período inválido"),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn sales_summary(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySalesSummary>, AppError> {
    let summary = app_state
        .dashboard_service
        .sales_summary(store.id, query.year, query.month)
        .await?;
    Ok(Json(summary))
}
