// src/models/report.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

/// Qual meta mensal o relatório persegue.
///
/// `Revenue`: o ponto de equilíbrio é dividido pela margem e vira uma meta de faturamento.
/// `Profit`: o próprio ponto de equilíbrio é a meta de lucro do mês.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetPolicy {
    #[default]
    Revenue,
    Profit,
}

impl FromStr for TargetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" => Ok(TargetPolicy::Revenue),
            "profit" => Ok(TargetPolicy::Profit),
            other => Err(format!("política de meta desconhecida: '{}'", other)),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BreakEvenQuery {
    #[param(example = 2025)]
    pub year: i32,
    #[param(example = 3)]
    pub month: u32,
    /// Prazo de retorno do investimento, em anos (padrão 1)
    pub target_years: Option<i32>,
    pub policy: Option<TargetPolicy>,
    #[param(value_type = Option<f64>, example = 0.3)]
    pub margin_rate: Option<Decimal>,
    #[param(value_type = Option<f64>, example = 0.023)]
    pub card_fee_rate: Option<Decimal>,
}

/// Desempenho real do período comparado à meta.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPerformance {
    pub current_sales: i64,
    pub current_profit: i64,
    pub card_fee_rate: Decimal,
    pub fee_adjusted_sales: i64,
    pub fee_adjusted_profit: i64,
    // Lucro estimado aplicando a margem sobre as vendas líquidas de taxa
    pub estimated_profit: i64,
    // Percentual inteiro
    pub achieved_rate: i64,
    pub remaining_to_target: i64,
}

/// Resultado do ponto de equilíbrio. Derivado, nunca persistido.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenReport {
    pub policy: TargetPolicy,
    pub target_years: i32,
    pub margin_rate: Decimal,

    pub monthly_fixed_cost: i64,
    pub investment_per_month: i64,
    pub breakeven_monthly: i64,
    pub breakeven_total: i64,

    // Apenas um dos dois é preenchido, conforme a política
    pub required_revenue: Option<i64>,
    pub required_profit: Option<i64>,

    pub daily_target: i64,
    pub net_profit_per_month: Option<i64>,

    pub performance: Option<PeriodPerformance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Revenue".parse::<TargetPolicy>(), Ok(TargetPolicy::Revenue));
        assert_eq!(" profit ".parse::<TargetPolicy>(), Ok(TargetPolicy::Profit));
        assert!("margin".parse::<TargetPolicy>().is_err());
    }

    #[test]
    fn policy_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TargetPolicy::Profit).unwrap(), "\"profit\"");
    }
}
