// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::store::validate_not_negative;

fn validate_stock(val: i32) -> Result<(), ValidationError> {
    if val < 0 {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0);
        err.message = Some("O estoque não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// --- Produto (tabela 'products') ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub store_id: Uuid,

    #[schema(example = "신라면")]
    pub name: String,

    #[schema(example = 24)]
    pub quantity: i32,

    #[schema(example = 1500)]
    pub sale_price: i64,
    #[schema(example = 1000)]
    pub cost_price: i64,

    #[schema(example = "상온")]
    pub storage_type: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn profit(&self) -> i64 {
        self.sale_price - self.cost_price
    }

    /// Margem sobre o preço de venda, em percentual com duas casas.
    /// `None` quando o produto não tem preço de venda.
    pub fn margin_rate(&self) -> Option<Decimal> {
        if self.sale_price <= 0 {
            return None;
        }
        let rate = Decimal::from(self.profit()) / Decimal::from(self.sale_price) * Decimal::ONE_HUNDRED;
        Some(rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

// Visão do estoque com os campos derivados
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,

    pub profit: i64,

    #[schema(example = "33.33")]
    pub margin_rate: Option<Decimal>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let profit = product.profit();
        let margin_rate = product.margin_rate();
        Self { product, profit, margin_rate }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Filtro por nome (sem diferenciar maiúsculas)
    pub search: Option<String>,
    /// Ordenação pela margem
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_stock"))]
    pub quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub sale_price: i64,

    #[validate(custom(function = "validate_not_negative"))]
    pub cost_price: i64,

    #[serde(default)]
    pub storage_type: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub id: Uuid,

    #[validate(custom(function = "validate_stock"))]
    pub quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub sale_price: Option<i64>,

    #[validate(custom(function = "validate_not_negative"))]
    pub cost_price: Option<i64>,

    pub storage_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductsPayload {
    #[validate(nested)]
    pub products: Vec<NewProduct>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductsPayload {
    #[validate(nested)]
    pub products: Vec<ProductUpdate>,
}

// Planilha de estoque por posição de coluna (primeira linha é o cabeçalho)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportProductsPayload {
    #[schema(value_type = Vec<Vec<Object>>)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportProductsResponse {
    pub imported: usize,
    pub skipped_rows: Vec<usize>,
    pub products: Vec<ProductView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(sale_price: i64, cost_price: i64) -> Product {
        Product {
            id: Uuid::nil(),
            store_id: Uuid::nil(),
            name: "새우깡".into(),
            quantity: 10,
            sale_price,
            cost_price,
            storage_type: "상온".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn margin_rate_is_a_percentage_of_sale_price() {
        let p = product(1500, 1000);
        assert_eq!(p.profit(), 500);
        assert_eq!(p.margin_rate(), Some(Decimal::new(3333, 2)));
    }

    #[test]
    fn free_products_have_no_margin() {
        assert_eq!(product(0, 300).margin_rate(), None);
    }

    #[test]
    fn selling_below_cost_gives_negative_margin() {
        let rate = product(1000, 1200).margin_rate().unwrap();
        assert_eq!(rate, Decimal::new(-2000, 2));
    }

    #[test]
    fn view_flattens_the_product() {
        let view = ProductView::from(product(2000, 1400));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "새우깡");
        assert_eq!(json["profit"], 600);
        assert!(json.get("marginRate").is_some());
    }
}
