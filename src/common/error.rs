// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::services::breakeven::CalcError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Loja não encontrada")]
    StoreNotFound,

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(uuid::Uuid),

    // Upload duplicado: o dia já tem vendas registradas para a loja
    #[error("Vendas já registradas em {0}")]
    SalesAlreadyRecorded(NaiveDate),

    #[error("Período inválido: {0}")]
    InvalidPeriod(String),

    // Entradas do ponto de equilíbrio inválidas ou ausentes
    #[error("Não foi possível calcular: {0}")]
    CalculationError(#[from] CalcError),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound | AppError::StoreNotFound | AppError::ProductNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::EmailAlreadyExists | AppError::SalesAlreadyRecorded(_) => StatusCode::CONFLICT,
            AppError::CalculationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Achata erros aninhados em chaves como "expenses[0].amount"
fn collect_details(prefix: &str, errors: &ValidationErrors, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.entry(path).or_default().extend(field_errors.iter().map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => e.code.to_string(),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_details(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                collect_details("", &errors, &mut details);
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".to_string(),
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::UserNotFound => "Usuário não encontrado.".to_string(),
            AppError::StoreNotFound => "Loja não encontrada.".to_string(),
            AppError::ProductNotFound(id) => format!("Produto {} não encontrado.", id),
            AppError::SalesAlreadyRecorded(date) => {
                format!("Já existem vendas registradas para o dia {}.", date)
            }
            AppError::InvalidPeriod(reason) => format!("Período inválido: {}.", reason),
            AppError::CalculationError(err) => {
                tracing::warn!("Cálculo do ponto de equilíbrio recusado: {}", err);
                format!("Não é possível calcular. Verifique as informações da loja. ({})", err)
            }

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_sales_upload_is_a_conflict() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let response = AppError::SalesAlreadyRecorded(date).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn calculation_errors_are_unprocessable() {
        let response = AppError::from(CalcError::StoreUnavailable).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = AppError::from(CalcError::InvalidTargetYears(0)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn ownership_failures_are_not_found() {
        assert_eq!(AppError::StoreNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ProductNotFound(uuid::Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let mut errors = ValidationErrors::new();
        errors.add("month", validator::ValidationError::new("range"));
        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_errors_are_internal() {
        let err = AppError::from(anyhow::anyhow!("pool fechado"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn nested_validation_errors_keep_their_path() {
        use crate::models::expense::{ExpenseItemPayload, ReplaceExpensesPayload};
        use validator::Validate;

        let payload = ReplaceExpensesPayload {
            expenses: vec![
                ExpenseItemPayload { description: "전기요금".into(), amount: 1000 },
                ExpenseItemPayload { description: "".into(), amount: -5 },
            ],
        };
        let errors = payload.validate().unwrap_err();
        let mut details = BTreeMap::new();
        collect_details("", &errors, &mut details);

        assert!(details.contains_key("expenses[1].amount"));
        assert!(details.contains_key("expenses[1].description"));
        assert!(!details.keys().any(|k| k.starts_with("expenses[0]")));
    }
}
