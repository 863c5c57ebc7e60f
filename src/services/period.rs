// src/services/period.rs

use chrono::NaiveDate;

use crate::common::error::AppError;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

pub fn check_month(year: i32, month: u32) -> Result<(), AppError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::InvalidPeriod(format!(
            "ano {} fora do intervalo {}-{}",
            year, MIN_YEAR, MAX_YEAR
        )));
    }
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidPeriod(format!("mês {} inválido", month)));
    }
    Ok(())
}

/// Primeiro e último dia do mês (intervalo fechado).
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    check_month(year, month)?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidPeriod(format!("{}-{:02}", year, month)))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::InvalidPeriod(format!("{}-{:02}", year, month)))?;

    Ok((first, last))
}

pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::InvalidPeriod(format!(
            "startDate {} é posterior a endDate {}",
            start, end
        )));
    }
    Ok(())
}
