// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::store::validate_not_negative;

fn validate_positive_quantity(val: i32) -> Result<(), ValidationError> {
    if val <= 0 {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &1);
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// --- Registro de venda (uma linha da planilha) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub id: Uuid,
    pub store_id: Uuid,

    #[serde(rename = "date")]
    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub sale_date: NaiveDate,

    #[schema(example = "삼각김밥")]
    pub product_name: String,

    #[schema(example = 3)]
    pub quantity: i32,

    #[schema(example = 4500)]
    pub total_price: i64,
    #[schema(example = 3150)]
    pub cost_price: i64,
    #[schema(example = 1350)]
    pub profit_price: i64,

    #[schema(example = "8801234567890")]
    pub barcode: Option<String>,

    pub created_at: DateTime<Utc>,
}

// Linha já mapeada, ainda não persistida
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSalesRecord {
    #[serde(rename = "date")]
    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub sale_date: NaiveDate,

    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub product_name: String,

    #[validate(custom(function = "validate_positive_quantity"))]
    pub quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub total_price: i64,

    #[validate(custom(function = "validate_not_negative"))]
    pub cost_price: i64,

    pub profit_price: i64,

    pub barcode: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSalesPayload {
    #[validate(nested)]
    pub data: Vec<NewSalesRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSalesResponse {
    pub inserted: usize,
    #[schema(value_type = Vec<String>)]
    pub dates: Vec<NaiveDate>,
    pub total_sales: i64,
    pub total_profit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesQueryResponse {
    pub total_sales: i64,
    pub total_profit: i64,
    pub records: Vec<SalesRecord>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SalesRangeQuery {
    #[param(value_type = String, format = Date, example = "2025-03-01")]
    pub start_date: NaiveDate,
    #[param(value_type = String, format = Date, example = "2025-03-31")]
    pub end_date: NaiveDate,
}

// Soma de um período (usada pelo relatório)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct SalesTotals {
    pub total_sales: i64,
    pub total_profit: i64,
}

// --- Baixa automática de estoque ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductionItem {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub product_name: String,

    #[validate(custom(function = "validate_positive_quantity"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoDeductPayload {
    #[validate(nested)]
    pub sales_data: Vec<DeductionItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionFailure {
    ProductNotFound,
    InsufficientStock,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductionError {
    pub product_name: String,
    pub kind: DeductionFailure,
    pub reason: String,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductionReport {
    pub deducted: usize,
    pub errors: Vec<DeductionError>,
}

// --- Importação de planilha ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSalesPayload {
    // Data usada quando a planilha não tem coluna de data
    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub date: NaiveDate,

    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,

    #[serde(default = "default_true")]
    pub auto_deduct: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    // Índice da linha na planilha (1 = primeira linha de dados)
    pub row: usize,
    pub product_name: Option<String>,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSalesResponse {
    pub inserted: usize,
    pub total_profit: i64,
    pub rejected: Vec<RejectedRow>,
    pub deduction: Option<DeductionReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_date_uses_the_date_key() {
        let json = r#"{
            "date": "2025-03-14",
            "productName": "바나나우유",
            "quantity": 2,
            "totalPrice": 3400,
            "costPrice": 2400,
            "profitPrice": 1000,
            "barcode": null
        }"#;
        let record: NewSalesRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sale_date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let item = DeductionItem { product_name: "콜라".into(), quantity: 0 };
        assert!(item.validate().is_err());
    }

    #[test]
    fn import_defaults_to_auto_deduction() {
        let json = r#"{ "date": "2025-03-14", "rows": [] }"#;
        let payload: ImportSalesPayload = serde_json::from_str(json).unwrap();
        assert!(payload.auto_deduct);
    }
}
