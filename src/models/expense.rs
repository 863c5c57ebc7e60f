// src/models/expense.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::store::{validate_not_blank, validate_not_negative};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariableExpense {
    pub id: Uuid,
    pub store_id: Uuid,

    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: i32,

    #[schema(example = "전기요금")]
    pub description: String,

    #[schema(example = 150000)]
    pub amount: i64,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItemPayload {
    #[validate(custom(function = "validate_not_blank", message = "A descrição da despesa é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: i64,
}

// PUT substitui o conjunto inteiro do mês
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceExpensesPayload {
    #[validate(nested)]
    pub expenses: Vec<ExpenseItemPayload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenses {
    pub year: i32,
    pub month: i32,
    pub total: i64,
    pub items: Vec<VariableExpense>,
}

impl MonthlyExpenses {
    pub fn new(year: i32, month: i32, items: Vec<VariableExpense>) -> Self {
        let total = items.iter().map(|e| e.amount).sum();
        Self { year, month, total, items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_items_are_validated() {
        let payload = ReplaceExpensesPayload {
            expenses: vec![
                ExpenseItemPayload { description: "가스요금".into(), amount: 80_000 },
                ExpenseItemPayload { description: String::new(), amount: -1 },
            ],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn empty_month_is_a_valid_replacement() {
        let payload = ReplaceExpensesPayload { expenses: vec![] };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn whitespace_description_is_rejected() {
        let payload = ReplaceExpensesPayload {
            expenses: vec![ExpenseItemPayload { description: "   ".into(), amount: 10_000 }],
        };
        assert!(payload.validate().is_err());

        let item = ExpenseItemPayload { description: " \n ".into(), amount: 0 };
        assert!(item.validate().unwrap_err().field_errors().contains_key("description"));
    }
}
