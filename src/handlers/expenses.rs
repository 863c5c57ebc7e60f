// src/handlers/expenses.rs

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::ownership::OwnedStore,
    models::expense::{MonthlyExpenses, ReplaceExpensesPayload},
};

// O path também traz storeId; o serde ignora a chave desconhecida
#[derive(Debug, Deserialize)]
pub struct ExpenseMonthPath {
    pub year: i32,
    pub month: u32,
}

#[utoipa::path(
    get,
    path = "/api/stores/{storeId}/expenses/{year}/{month}",
    tag = "Expenses",
    params(
        ("storeId" = Uuid, Path, description = "ID da loja"),
        ("year" = i32, Path, description = "Ano (2000-2100)"),
        ("month" = u32, Path, description = "Mês (1-12)")
    ),
    responses(
        (status = 200, description = "Despesas variáveis do mês", body = MonthlyExpenses),
        (status = 400, description = "Período inválido"),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_month_expenses(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Path(period): Path<ExpenseMonthPath>,
) -> Result<Json<MonthlyExpenses>, AppError> {
    let expenses = app_state
        .expense_service
        .get_month(store.id, period.year, period.month)
        .await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    put,
    path = "/api/stores/{storeId}/expenses/{year}/{month}",
    tag = "Expenses",
    params(
        ("storeId" = Uuid, Path, description = "ID da loja"),
        ("year" = i32, Path, description = "Ano (2000-2100)"),
        ("month" = u32, Path, description = "Mês (1-12)")
    ),
    request_body = ReplaceExpensesPayload,
    responses(
        (status = 200, description = "Conjunto do mês substituído", body = MonthlyExpenses),
        (status = 400, description = "Dados ou período inválidos"),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn replace_month_expenses(
    State(app_state): State<AppState>,
    OwnedStore(store): OwnedStore,
    Path(period): Path<ExpenseMonthPath>,
    Json(payload): Json<ReplaceExpensesPayload>,
) -> Result<Json<MonthlyExpenses>, AppError> {
    payload.validate()?;
    let expenses = app_state
        .expense_service
        .replace_month(store.id, period.year, period.month, &payload.expenses)
        .await?;
    Ok(Json(expenses))
}
