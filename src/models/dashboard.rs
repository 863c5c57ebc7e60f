// src/models/dashboard.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    #[param(example = 2025)]
    pub year: i32,
    #[param(example = 3)]
    pub month: u32,
}

// Fatia do gráfico de pizza (vendas por produto)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesEntry {
    pub name: String,
    pub total: i64,
}

// Barra do gráfico diário
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesEntry {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesSummary {
    pub year: i32,
    pub month: u32,
    pub total_sales: i64,
    pub total_profit: i64,
    pub by_product: Vec<ProductSalesEntry>,
    pub by_day: Vec<DailySalesEntry>,
    pub best_day: Option<DailySalesEntry>,
    pub worst_day: Option<DailySalesEntry>,
}
