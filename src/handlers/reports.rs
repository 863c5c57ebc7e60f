// src/handlers/reports.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::report::{BreakEvenQuery, BreakEvenReport},
};

// Sem OwnedStore: loja ausente aqui é "não foi possível calcular" (422), não 404
#[utoipa::path(
    get,
    path = "/api/stores/{storeId}/reports/breakeven",
    tag = "Reports",
    params(("storeId" = Uuid, Path, description = "ID da loja"), BreakEvenQuery),
    responses(
        (status = 200, description = "Ponto de equilíbrio e desempenho do mês", body = BreakEvenReport),
        (status = 400, description = "Período inválido"),
        (status = 422, description = "Não foi possível calcular; verifique os dados da loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn breakeven_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(store_id): Path<Uuid>,
    Query(query): Query<BreakEvenQuery>,
) -> Result<Json<BreakEvenReport>, AppError> {
    let report = app_state
        .report_service
        .breakeven(user.id, store_id, &query)
        .await?;
    Ok(Json(report))
}
