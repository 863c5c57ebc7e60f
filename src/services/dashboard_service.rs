// src/services/dashboard_service.rs

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SalesRepository,
    models::{
        dashboard::{DailySalesEntry, MonthlySalesSummary, ProductSalesEntry},
        sales::SalesRecord,
    },
    services::period::month_bounds,
};

/// Agrega as vendas de um mês para os gráficos do painel.
pub fn summarize_sales(year: i32, month: u32, records: &[SalesRecord]) -> MonthlySalesSummary {
    let mut per_product: HashMap<&str, i64> = HashMap::new();
    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    let mut total_sales = 0i64;
    let mut total_profit = 0i64;

    for record in records {
        total_sales = total_sales.saturating_add(record.total_price);
        total_profit = total_profit.saturating_add(record.profit_price);
        *per_product.entry(record.product_name.as_str()).or_default() += record.total_price;
        *per_day.entry(record.sale_date).or_default() += record.total_price;
    }

    let mut by_product: Vec<ProductSalesEntry> = per_product
        .into_iter()
        .map(|(name, total)| ProductSalesEntry { name: name.to_string(), total })
        .collect();
    by_product.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    let by_day: Vec<DailySalesEntry> = per_day
        .into_iter()
        .map(|(date, total)| DailySalesEntry { date, total })
        .collect();

    // Em empate, vale o dia mais antigo
    let best_day = by_day
        .iter()
        .fold(None::<&DailySalesEntry>, |best, day| match best {
            Some(b) if b.total >= day.total => Some(b),
            _ => Some(day),
        })
        .cloned();
    let worst_day = by_day
        .iter()
        .fold(None::<&DailySalesEntry>, |worst, day| match worst {
            Some(w) if w.total <= day.total => Some(w),
            _ => Some(day),
        })
        .cloned();

    MonthlySalesSummary {
        year,
        month,
        total_sales,
        total_profit,
        by_product,
        by_day,
        best_day,
        worst_day,
    }
}

#[derive(Clone)]
pub struct DashboardService {
    sales_repo: SalesRepository,
}

impl DashboardService {
    pub fn new(sales_repo: SalesRepository) -> Self {
        Self { sales_repo }
    }

    pub async fn sales_summary(&self, store_id: Uuid, year: i32, month: u32) -> Result<MonthlySalesSummary, AppError> {
        let (start, end) = month_bounds(year, month)?;
        let records = self.sales_repo.list_by_range(store_id, start, end).await?;
        Ok(summarize_sales(year, month, &records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sale(day: u32, name: &str, total: i64, profit: i64) -> SalesRecord {
        SalesRecord {
            id: Uuid::new_v4(),
            store_id: Uuid::nil(),
            sale_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            product_name: name.to_string(),
            quantity: 1,
            total_price: total,
            cost_price: total - profit,
            profit_price: profit,
            barcode: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn groups_by_product_and_day() {
        let records = vec![
            sale(2, "우유", 3000, 900),
            sale(1, "라면", 5000, 1500),
            sale(2, "라면", 2000, 600),
            sale(3, "우유", 1000, 300),
        ];
        let summary = summarize_sales(2025, 3, &records);

        assert_eq!(summary.total_sales, 11000);
        assert_eq!(summary.total_profit, 3300);
        assert_eq!(
            summary.by_product,
            vec![
                ProductSalesEntry { name: "라면".into(), total: 7000 },
                ProductSalesEntry { name: "우유".into(), total: 4000 },
            ]
        );
        let days: Vec<(u32, i64)> = summary
            .by_day
            .iter()
            .map(|d| (chrono::Datelike::day(&d.date), d.total))
            .collect();
        assert_eq!(days, vec![(1, 5000), (2, 5000), (3, 1000)]);
    }

    #[test]
    fn best_and_worst_day_break_ties_by_earliest_date() {
        let records = vec![
            sale(1, "라면", 5000, 0),
            sale(2, "라면", 5000, 0),
            sale(3, "라면", 1000, 0),
            sale(4, "라면", 1000, 0),
        ];
        let summary = summarize_sales(2025, 3, &records);
        let best = summary.best_day.unwrap();
        let worst = summary.worst_day.unwrap();
        assert_eq!(chrono::Datelike::day(&best.date), 1);
        assert_eq!(chrono::Datelike::day(&worst.date), 3);
        assert!(best.total >= worst.total);
    }

    #[test]
    fn empty_month_has_no_best_or_worst_day() {
        let summary = summarize_sales(2025, 3, &[]);
        assert_eq!(summary.total_sales, 0);
        assert!(summary.by_day.is_empty());
        assert!(summary.best_day.is_none());
        assert!(summary.worst_day.is_none());
    }
}
