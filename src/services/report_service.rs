// src/services/report_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ExpenseRepository, SalesRepository, StoreRepository},
    models::report::{BreakEvenQuery, BreakEvenReport},
    services::{
        breakeven::{calculate, Assumptions, BreakEvenInputs, PeriodActuals},
        period::month_bounds,
    },
};

const DEFAULT_TARGET_YEARS: i32 = 1;

/// Premissas da requisição com fallback para as configuradas.
pub fn resolve_assumptions(defaults: &Assumptions, query: &BreakEvenQuery) -> Assumptions {
    Assumptions {
        margin_rate: query.margin_rate.unwrap_or(defaults.margin_rate),
        card_fee_rate: query.card_fee_rate.unwrap_or(defaults.card_fee_rate),
        policy: query.policy.unwrap_or(defaults.policy),
    }
}

#[derive(Clone)]
pub struct ReportService {
    store_repo: StoreRepository,
    expense_repo: ExpenseRepository,
    sales_repo: SalesRepository,
    defaults: Assumptions,
}

impl ReportService {
    pub fn new(
        store_repo: StoreRepository,
        expense_repo: ExpenseRepository,
        sales_repo: SalesRepository,
        defaults: Assumptions,
    ) -> Self {
        Self { store_repo, expense_repo, sales_repo, defaults }
    }

    /// Recalculado a cada chamada a partir do estado atual do banco.
    pub async fn breakeven(
        &self,
        owner_id: Uuid,
        store_id: Uuid,
        query: &BreakEvenQuery,
    ) -> Result<BreakEvenReport, AppError> {
        let (start, end) = month_bounds(query.year, query.month)?;
        let assumptions = resolve_assumptions(&self.defaults, query);
        let target_years = query.target_years.unwrap_or(DEFAULT_TARGET_YEARS);

        let store = self.store_repo.find_owned(store_id, owner_id).await?;
        let expenses = self
            .expense_repo
            .list_by_month(store_id, query.year, query.month as i32)
            .await?;

        let inputs = BreakEvenInputs::from_records(store.as_ref(), &expenses, target_years)?;
        let totals = self.sales_repo.sum_by_range(store_id, start, end).await?;

        let report = calculate(&inputs, &assumptions, Some(PeriodActuals::from(totals)))?;
        tracing::debug!(
            %store_id, year = query.year, month = query.month,
            breakeven = report.breakeven_monthly, "Relatório de ponto de equilíbrio calculado"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::TargetPolicy;
    use rust_decimal::Decimal;

    fn defaults() -> Assumptions {
        Assumptions {
            margin_rate: Decimal::new(30, 2),
            card_fee_rate: Decimal::new(23, 3),
            policy: TargetPolicy::Revenue,
        }
    }

    fn query() -> BreakEvenQuery {
        BreakEvenQuery {
            year: 2025,
            month: 3,
            target_years: None,
            policy: None,
            margin_rate: None,
            card_fee_rate: None,
        }
    }

    #[test]
    fn missing_parameters_take_configured_defaults() {
        assert_eq!(resolve_assumptions(&defaults(), &query()), defaults());
    }

    #[test]
    fn request_parameters_override_defaults() {
        let q = BreakEvenQuery {
            policy: Some(TargetPolicy::Profit),
            margin_rate: Some(Decimal::new(25, 2)),
            card_fee_rate: Some(Decimal::ZERO),
            ..query()
        };
        let resolved = resolve_assumptions(&defaults(), &q);
        assert_eq!(resolved.policy, TargetPolicy::Profit);
        assert_eq!(resolved.margin_rate, Decimal::new(25, 2));
        assert_eq!(resolved.card_fee_rate, Decimal::ZERO);
    }
}
