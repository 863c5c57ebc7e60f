// src/services/breakeven.rs

//! Cálculo do ponto de equilíbrio de uma loja.
//!
//! Funções puras: recebem um retrato das entradas (custos da loja, despesas variáveis do
//! mês, vendas do período e premissas) e devolvem um `BreakEvenReport` novo. Nada aqui
//! faz I/O nem guarda estado entre chamadas.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{
    expense::VariableExpense,
    report::{BreakEvenReport, PeriodPerformance, TargetPolicy},
    sales::SalesTotals,
    store::Store,
};

const MONTHS_PER_YEAR: i64 = 12;
const DAYS_PER_MONTH: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("o prazo de retorno deve ser positivo (recebido {0})")]
    InvalidTargetYears(i32),

    #[error("a margem deve estar entre 0 (exclusivo) e 1 (recebido {0})")]
    InvalidMarginRate(Decimal),

    #[error("a taxa do cartão deve estar entre 0 e 1 (recebido {0})")]
    InvalidCardFeeRate(Decimal),

    #[error("o campo '{field}' não pode ser negativo (recebido {value})")]
    NegativeAmount { field: &'static str, value: i64 },

    #[error("informações da loja indisponíveis")]
    StoreUnavailable,

    #[error("valor fora do intervalo suportado")]
    AmountOutOfRange,
}

/// Custos fixos da loja para um mês.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakEvenInputs {
    pub monthly_rent: i64,
    pub maintenance_fee: i64,
    pub variable_expense_total: i64,
    pub initial_investment: i64,
    pub target_years: i32,
}

impl BreakEvenInputs {
    /// Monta as entradas a partir dos registros da loja e das despesas do mês.
    /// Sem loja não há como calcular; mês sem despesas soma zero.
    pub fn from_records(
        store: Option<&Store>,
        expenses: &[VariableExpense],
        target_years: i32,
    ) -> Result<Self, CalcError> {
        let store = store.ok_or(CalcError::StoreUnavailable)?;

        let variable_expense_total = expenses
            .iter()
            .try_fold(0i64, |acc, e| acc.checked_add(e.amount))
            .ok_or(CalcError::AmountOutOfRange)?;

        Ok(Self {
            monthly_rent: store.monthly_rent,
            maintenance_fee: store.maintenance_fee,
            variable_expense_total,
            initial_investment: store.initial_investment,
            target_years,
        })
    }

    fn validate(&self) -> Result<(), CalcError> {
        if self.target_years <= 0 {
            return Err(CalcError::InvalidTargetYears(self.target_years));
        }
        not_negative("monthlyRent", self.monthly_rent)?;
        not_negative("maintenanceFee", self.maintenance_fee)?;
        not_negative("variableExpenseTotal", self.variable_expense_total)?;
        not_negative("initialInvestment", self.initial_investment)?;
        Ok(())
    }
}

/// Premissas do relatório: margem assumida, taxa da maquininha e política de meta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assumptions {
    pub margin_rate: Decimal,
    pub card_fee_rate: Decimal,
    pub policy: TargetPolicy,
}

impl Assumptions {
    pub fn validate(&self) -> Result<(), CalcError> {
        if self.margin_rate <= Decimal::ZERO || self.margin_rate > Decimal::ONE {
            return Err(CalcError::InvalidMarginRate(self.margin_rate));
        }
        if self.card_fee_rate < Decimal::ZERO || self.card_fee_rate >= Decimal::ONE {
            return Err(CalcError::InvalidCardFeeRate(self.card_fee_rate));
        }
        Ok(())
    }
}

/// Vendas e lucro brutos de um período (soma dos registros de venda).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodActuals {
    pub current_sales: i64,
    pub current_profit: i64,
}

impl From<SalesTotals> for PeriodActuals {
    fn from(totals: SalesTotals) -> Self {
        Self {
            current_sales: totals.total_sales,
            current_profit: totals.total_profit,
        }
    }
}

fn not_negative(field: &'static str, value: i64) -> Result<(), CalcError> {
    if value < 0 {
        return Err(CalcError::NegativeAmount { field, value });
    }
    Ok(())
}

fn checked(value: Option<Decimal>) -> Result<Decimal, CalcError> {
    value.ok_or(CalcError::AmountOutOfRange)
}

/// Arredonda para a unidade inteira mais próxima (meio para longe do zero).
fn round_amount(value: Decimal) -> Result<i64, CalcError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(CalcError::AmountOutOfRange)
}

/// `actual / target * 100`, inteiro. Meta zero conta como atingida.
fn achievement_rate(actual: Decimal, target: Decimal) -> Result<i64, CalcError> {
    if target <= Decimal::ZERO {
        return Ok(100);
    }
    let ratio = checked(actual.checked_div(target))?;
    round_amount(checked(ratio.checked_mul(Decimal::ONE_HUNDRED))?)
}

/// Calcula o relatório completo. `actuals` ausente gera um relatório só com as metas.
pub fn calculate(
    inputs: &BreakEvenInputs,
    assumptions: &Assumptions,
    actuals: Option<PeriodActuals>,
) -> Result<BreakEvenReport, CalcError> {
    inputs.validate()?;
    assumptions.validate()?;
    if let Some(a) = &actuals {
        not_negative("currentSales", a.current_sales)?;
        not_negative("currentProfit", a.current_profit)?;
    }

    let months = Decimal::from(i64::from(inputs.target_years) * MONTHS_PER_YEAR);
    let margin = assumptions.margin_rate;

    // 1. Custos fixos do mês
    let monthly_fixed_cost = checked(
        Decimal::from(inputs.monthly_rent)
            .checked_add(Decimal::from(inputs.maintenance_fee))
            .and_then(|v| v.checked_add(Decimal::from(inputs.variable_expense_total))),
    )?;

    // 2. Investimento amortizado
    let investment_per_month = checked(Decimal::from(inputs.initial_investment).checked_div(months))?;

    // 3. Ponto de equilíbrio mensal e total
    let breakeven_monthly = checked(monthly_fixed_cost.checked_add(investment_per_month))?;
    let breakeven_total = checked(breakeven_monthly.checked_mul(months))?;

    // 4/5. Meta mensal conforme a política
    let monthly_target = match assumptions.policy {
        TargetPolicy::Revenue => checked(breakeven_monthly.checked_div(margin))?,
        TargetPolicy::Profit => breakeven_monthly,
    };
    let daily_target = checked(monthly_target.checked_div(Decimal::from(DAYS_PER_MONTH)))?;

    // 6. Desempenho real, líquido da taxa do cartão
    let fee_factor = Decimal::ONE - assumptions.card_fee_rate;
    let mut fee_adjusted_profit = None;

    let performance = match actuals {
        Some(a) => {
            let adjusted_sales = checked(Decimal::from(a.current_sales).checked_mul(fee_factor))?;
            let adjusted_profit = checked(Decimal::from(a.current_profit).checked_mul(fee_factor))?;
            fee_adjusted_profit = Some(adjusted_profit);

            let actual = match assumptions.policy {
                TargetPolicy::Revenue => adjusted_sales,
                TargetPolicy::Profit => adjusted_profit,
            };
            let remaining = (monthly_target - actual).max(Decimal::ZERO);
            let estimated_profit = checked(adjusted_sales.checked_mul(margin))?;

            Some(PeriodPerformance {
                current_sales: a.current_sales,
                current_profit: a.current_profit,
                card_fee_rate: assumptions.card_fee_rate,
                fee_adjusted_sales: round_amount(adjusted_sales)?,
                fee_adjusted_profit: round_amount(adjusted_profit)?,
                estimated_profit: round_amount(estimated_profit)?,
                achieved_rate: achievement_rate(actual, monthly_target)?,
                remaining_to_target: round_amount(remaining)?,
            })
        }
        None => None,
    };

    let net_profit_per_month = match assumptions.policy {
        TargetPolicy::Revenue => {
            let covered = checked(monthly_target.checked_mul(margin))?;
            Some(round_amount(covered - breakeven_monthly)?)
        }
        TargetPolicy::Profit => match fee_adjusted_profit {
            Some(profit) => Some(round_amount(profit - breakeven_monthly)?),
            None => None,
        },
    };

    // 7. Tudo que sai daqui é arredondado para a unidade
    let rounded_target = round_amount(monthly_target)?;
    let (required_revenue, required_profit) = match assumptions.policy {
        TargetPolicy::Revenue => (Some(rounded_target), None),
        TargetPolicy::Profit => (None, Some(rounded_target)),
    };

    Ok(BreakEvenReport {
        policy: assumptions.policy,
        target_years: inputs.target_years,
        margin_rate: margin,
        monthly_fixed_cost: round_amount(monthly_fixed_cost)?,
        investment_per_month: round_amount(investment_per_month)?,
        breakeven_monthly: round_amount(breakeven_monthly)?,
        breakeven_total: round_amount(breakeven_total)?,
        required_revenue,
        required_profit,
        daily_target: round_amount(daily_target)?,
        net_profit_per_month,
        performance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn margin_30() -> Decimal {
        Decimal::new(30, 2)
    }

    fn revenue(card_fee_rate: Decimal) -> Assumptions {
        Assumptions {
            margin_rate: margin_30(),
            card_fee_rate,
            policy: TargetPolicy::Revenue,
        }
    }

    fn profit(card_fee_rate: Decimal) -> Assumptions {
        Assumptions { policy: TargetPolicy::Profit, ..revenue(card_fee_rate) }
    }

    // Loja de referência: aluguel 1.000.000, manutenção 200.000, variáveis 300.000,
    // investimento 36.000.000 em 1 ano
    fn reference_inputs() -> BreakEvenInputs {
        BreakEvenInputs {
            monthly_rent: 1_000_000,
            maintenance_fee: 200_000,
            variable_expense_total: 300_000,
            initial_investment: 36_000_000,
            target_years: 1,
        }
    }

    fn store() -> Store {
        Store {
            id: Uuid::nil(),
            owner_id: Uuid::nil(),
            store_name: "제로스토어 강남점".into(),
            address: "서울특별시 강남구 테헤란로 123".into(),
            phone_number: "010-1234-5678".into(),
            category: None,
            deposit: 10_000_000,
            premium: 0,
            monthly_rent: 1_000_000,
            maintenance_fee: 200_000,
            initial_investment: 36_000_000,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn expense(amount: i64) -> VariableExpense {
        VariableExpense {
            id: Uuid::nil(),
            store_id: Uuid::nil(),
            year: 2025,
            month: 3,
            description: "전기요금".into(),
            amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reference_store_revenue_targets() {
        let report = calculate(&reference_inputs(), &revenue(Decimal::ZERO), None).unwrap();

        assert_eq!(report.monthly_fixed_cost, 1_500_000);
        assert_eq!(report.investment_per_month, 3_000_000);
        assert_eq!(report.breakeven_monthly, 4_500_000);
        assert_eq!(report.breakeven_total, 54_000_000);
        assert_eq!(report.required_revenue, Some(15_000_000));
        assert_eq!(report.required_profit, None);
        assert_eq!(report.daily_target, 500_000);
        assert_eq!(report.net_profit_per_month, Some(0));
        assert!(report.performance.is_none());
    }

    #[test]
    fn reference_store_achievement_without_card_fee() {
        let actuals = PeriodActuals { current_sales: 10_000_000, current_profit: 3_000_000 };
        let report = calculate(&reference_inputs(), &revenue(Decimal::ZERO), Some(actuals)).unwrap();

        let perf = report.performance.unwrap();
        assert_eq!(perf.achieved_rate, 67);
        assert_eq!(perf.remaining_to_target, 5_000_000);
        assert_eq!(perf.estimated_profit, 3_000_000);
    }

    #[test]
    fn card_fee_is_netted_out_of_sales() {
        let actuals = PeriodActuals { current_sales: 10_000_000, current_profit: 3_000_000 };
        let report = calculate(&reference_inputs(), &revenue(Decimal::new(23, 3)), Some(actuals)).unwrap();

        let perf = report.performance.unwrap();
        assert_eq!(perf.fee_adjusted_sales, 9_770_000);
        assert_eq!(perf.fee_adjusted_profit, 2_931_000);
        assert_eq!(perf.achieved_rate, 65);
        assert_eq!(perf.remaining_to_target, 5_230_000);
    }

    #[test]
    fn profit_policy_compares_profit_with_breakeven() {
        let actuals = PeriodActuals { current_sales: 20_000_000, current_profit: 5_000_000 };
        let report = calculate(&reference_inputs(), &profit(Decimal::ZERO), Some(actuals)).unwrap();

        assert_eq!(report.required_revenue, None);
        assert_eq!(report.required_profit, Some(4_500_000));
        assert_eq!(report.daily_target, 150_000);
        assert_eq!(report.net_profit_per_month, Some(500_000));

        let perf = report.performance.unwrap();
        assert_eq!(perf.achieved_rate, 111);
        assert_eq!(perf.remaining_to_target, 0);
    }

    #[test]
    fn profit_policy_without_actuals_has_no_net_profit() {
        let report = calculate(&reference_inputs(), &profit(Decimal::ZERO), None).unwrap();
        assert_eq!(report.net_profit_per_month, None);
    }

    #[test]
    fn breakeven_total_spans_the_whole_payback_period() {
        for years in 1..=3 {
            for investment in [0, 1, 999_999, 36_000_000, 50_000_001] {
                let inputs = BreakEvenInputs {
                    initial_investment: investment,
                    target_years: years,
                    ..reference_inputs()
                };
                let report = calculate(&inputs, &revenue(Decimal::ZERO), None).unwrap();
                let months = i64::from(years) * 12;
                let diff = (report.breakeven_total - report.breakeven_monthly * months).abs();
                // Só o arredondamento do valor mensal pode separar os dois
                assert!(diff <= months / 2 + 1, "years={years} investment={investment}");
            }
        }
    }

    #[test]
    fn required_revenue_times_margin_matches_breakeven_plus_net() {
        for rent in [0, 1, 333_333, 1_000_001, 7_777_777] {
            for margin in [Decimal::new(30, 2), Decimal::new(7, 2), Decimal::new(1, 0), Decimal::new(45, 2)] {
                let inputs = BreakEvenInputs { monthly_rent: rent, ..reference_inputs() };
                let assumptions = Assumptions { margin_rate: margin, ..revenue(Decimal::ZERO) };
                let report = calculate(&inputs, &assumptions, None).unwrap();

                let required = Decimal::from(report.required_revenue.unwrap());
                let covered = (required * margin)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_i64()
                    .unwrap();
                let expected = report.breakeven_monthly + report.net_profit_per_month.unwrap();
                assert!((covered - expected).abs() <= 1, "rent={rent} margin={margin}");
            }
        }
    }

    #[test]
    fn remaining_never_goes_below_zero() {
        for sales in [0, 1, 14_999_999, 15_000_000, 15_000_001, 90_000_000] {
            let actuals = PeriodActuals { current_sales: sales, current_profit: 0 };
            let report = calculate(&reference_inputs(), &revenue(Decimal::ZERO), Some(actuals)).unwrap();
            let perf = report.performance.unwrap();
            assert_eq!(perf.remaining_to_target, (15_000_000 - sales).max(0));
        }
    }

    #[test]
    fn achieved_rate_grows_with_sales() {
        let mut previous = -1;
        for sales in (0..=30_000_000).step_by(1_250_000) {
            let actuals = PeriodActuals { current_sales: sales, current_profit: 0 };
            let report = calculate(&reference_inputs(), &revenue(Decimal::new(23, 3)), Some(actuals)).unwrap();
            let rate = report.performance.unwrap().achieved_rate;
            assert!(rate >= previous);
            previous = rate;
        }
        assert!(previous > 100);
    }

    #[test]
    fn zero_costs_count_as_target_met() {
        let inputs = BreakEvenInputs {
            monthly_rent: 0,
            maintenance_fee: 0,
            variable_expense_total: 0,
            initial_investment: 0,
            target_years: 1,
        };
        let actuals = PeriodActuals::default();
        let report = calculate(&inputs, &revenue(Decimal::ZERO), Some(actuals)).unwrap();
        let perf = report.performance.unwrap();
        assert_eq!(perf.achieved_rate, 100);
        assert_eq!(perf.remaining_to_target, 0);
    }

    #[test]
    fn non_positive_target_years_are_rejected() {
        for years in [0, -1] {
            let inputs = BreakEvenInputs { target_years: years, ..reference_inputs() };
            assert_eq!(
                calculate(&inputs, &revenue(Decimal::ZERO), None),
                Err(CalcError::InvalidTargetYears(years))
            );
        }
    }

    #[test]
    fn margin_outside_unit_interval_is_rejected() {
        for margin in [Decimal::ZERO, Decimal::new(-3, 1), Decimal::new(101, 2)] {
            let assumptions = Assumptions { margin_rate: margin, ..revenue(Decimal::ZERO) };
            assert_eq!(
                calculate(&reference_inputs(), &assumptions, None),
                Err(CalcError::InvalidMarginRate(margin))
            );
        }
        let full_margin = Assumptions { margin_rate: Decimal::ONE, ..revenue(Decimal::ZERO) };
        assert!(calculate(&reference_inputs(), &full_margin, None).is_ok());
    }

    #[test]
    fn card_fee_must_be_below_one() {
        let assumptions = revenue(Decimal::ONE);
        assert!(matches!(
            calculate(&reference_inputs(), &assumptions, None),
            Err(CalcError::InvalidCardFeeRate(_))
        ));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let inputs = BreakEvenInputs { maintenance_fee: -10, ..reference_inputs() };
        assert_eq!(
            calculate(&inputs, &revenue(Decimal::ZERO), None),
            Err(CalcError::NegativeAmount { field: "maintenanceFee", value: -10 })
        );

        let actuals = PeriodActuals { current_sales: -1, current_profit: 0 };
        assert!(matches!(
            calculate(&reference_inputs(), &revenue(Decimal::ZERO), Some(actuals)),
            Err(CalcError::NegativeAmount { field: "currentSales", .. })
        ));
    }

    #[test]
    fn huge_amounts_fail_instead_of_panicking() {
        let inputs = BreakEvenInputs {
            monthly_rent: i64::MAX,
            maintenance_fee: i64::MAX,
            variable_expense_total: i64::MAX,
            initial_investment: i64::MAX,
            target_years: 1,
        };
        assert_eq!(
            calculate(&inputs, &revenue(Decimal::ZERO), None),
            Err(CalcError::AmountOutOfRange)
        );
    }

    #[test]
    fn inputs_come_from_store_and_month_expenses() {
        let expenses = vec![expense(120_000), expense(180_000)];
        let inputs = BreakEvenInputs::from_records(Some(&store()), &expenses, 1).unwrap();
        assert_eq!(inputs, reference_inputs());
    }

    #[test]
    fn missing_store_cannot_be_computed() {
        let expenses = vec![expense(120_000)];
        assert_eq!(
            BreakEvenInputs::from_records(None, &expenses, 1),
            Err(CalcError::StoreUnavailable)
        );
    }

    #[test]
    fn empty_expense_month_contributes_zero() {
        let inputs = BreakEvenInputs::from_records(Some(&store()), &[], 2).unwrap();
        assert_eq!(inputs.variable_expense_total, 0);
        assert_eq!(inputs.target_years, 2);
    }
}
