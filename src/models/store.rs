// src/models/store.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Texto só com espaços conta como vazio
pub(crate) fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("O campo não pode ficar em branco.".into());
        return Err(err);
    }
    Ok(())
}

// Valores em moeda são sempre inteiros (won, menor unidade)
pub(crate) fn validate_not_negative(val: i64) -> Result<(), ValidationError> {
    if val < 0 {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,

    #[schema(ignore)]
    #[serde(skip_serializing)]
    pub owner_id: Uuid,

    #[schema(example = "제로스토어 강남점")]
    pub store_name: String,

    #[schema(example = "서울특별시 강남구 테헤란로 123")]
    pub address: String,

    #[schema(example = "010-1234-5678")]
    pub phone_number: String,

    #[schema(example = "편의점")]
    pub category: Option<String>,

    // Custos de abertura
    #[schema(example = 10000000)]
    pub deposit: i64,
    #[schema(example = 5000000)]
    pub premium: i64,

    // Custos fixos mensais
    #[schema(example = 1000000)]
    pub monthly_rent: i64,
    #[schema(example = 200000)]
    pub maintenance_fee: i64,

    #[schema(example = 36000000)]
    pub initial_investment: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStorePayload {
    #[validate(custom(function = "validate_not_blank", message = "O nome da loja é obrigatório."))]
    pub store_name: String,

    #[validate(custom(function = "validate_not_blank", message = "O endereço é obrigatório."))]
    pub address: String,

    #[validate(custom(function = "validate_not_blank", message = "O telefone é obrigatório."))]
    pub phone_number: String,

    pub category: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub deposit: i64,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub premium: i64,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub monthly_rent: i64,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub maintenance_fee: i64,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub initial_investment: i64,
}

// PATCH: apenas os campos enviados são alterados
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStorePayload {
    #[validate(custom(function = "validate_not_blank", message = "O nome da loja não pode ser vazio."))]
    pub store_name: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "O endereço não pode ser vazio."))]
    pub address: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "O telefone não pode ser vazio."))]
    pub phone_number: Option<String>,

    pub category: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub deposit: Option<i64>,

    #[validate(custom(function = "validate_not_negative"))]
    pub premium: Option<i64>,

    #[validate(custom(function = "validate_not_negative"))]
    pub monthly_rent: Option<i64>,

    #[validate(custom(function = "validate_not_negative"))]
    pub maintenance_fee: Option<i64>,

    #[validate(custom(function = "validate_not_negative"))]
    pub initial_investment: Option<i64>,
}
