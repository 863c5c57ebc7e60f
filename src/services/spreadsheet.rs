// src/services/spreadsheet.rs

//! Mapeamento das linhas de planilha (já convertidas para JSON pelo cliente).
//!
//! Cada linha vira um resultado marcado: ou um registro mapeado, ou uma rejeição com o
//! motivo. Campos ausentes nunca são convertidos em zero.

use chrono::{Duration, NaiveDate};
use serde_json::{Map, Value};
use std::fmt;

use crate::models::{
    product::NewProduct,
    sales::{NewSalesRecord, RejectedRow},
};

// Sinônimos de cabeçalho (coreano / inglês)
const PRODUCT_NAME: &[&str] = &["상품명", "productName"];
const QUANTITY: &[&str] = &["판매수량", "수량", "quantity"];
const TOTAL_PRICE: &[&str] = &["판매금액", "합계", "totalPrice"];
const COST_PRICE: &[&str] = &["매입금액", "costPrice"];
const PROFIT_PRICE: &[&str] = &["수익금액", "profitPrice"];
const BARCODE: &[&str] = &["바코드", "barcode"];

// Trechos que identificam uma coluna de data
const DATE_MARKERS: &[&str] = &["date", "날짜", "일자"];

// Planilha de estoque: posição das colunas
const COL_STORAGE_TYPE: usize = 1;
const COL_NAME: usize = 2;
const COL_QUANTITY: usize = 3;
const COL_COST_PRICE: usize = 4;
const COL_SALE_PRICE: usize = 6;

static EMPTY_CELL: Value = Value::Null;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowProblem {
    MissingProductName,
    MissingField(&'static str),
    InvalidNumber(&'static str),
    InvalidDate(String),
}

impl fmt::Display for RowProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowProblem::MissingProductName => write!(f, "nome do produto ausente"),
            RowProblem::MissingField(field) => write!(f, "campo '{}' ausente", field),
            RowProblem::InvalidNumber(field) => write!(f, "valor inválido no campo '{}'", field),
            RowProblem::InvalidDate(raw) => write!(f, "data inválida: '{}'", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Mapped(NewSalesRecord),
    Rejected(RejectedRow),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SalesSheet {
    pub records: Vec<NewSalesRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl SalesSheet {
    pub fn total_profit(&self) -> i64 {
        self.records.iter().map(|r| r.profit_price).sum()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn lookup<'a>(row: &'a Map<String, Value>, synonyms: &[&str]) -> Option<&'a Value> {
    synonyms.iter().find_map(|name| {
        row.iter()
            .find(|(key, value)| key.trim() == *name && !is_blank(value))
            .map(|(_, value)| value)
    })
}

fn find_date_cell(row: &Map<String, Value>) -> Option<&Value> {
    row.iter()
        .find(|(key, _)| {
            let header = key.trim().to_lowercase();
            DATE_MARKERS.iter().any(|marker| header.contains(marker))
        })
        .map(|(_, value)| value)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Lê um valor inteiro de uma célula. Aceita números JSON e textos com separador de
/// milhar ou símbolo de moeda ("12,000", "₩3,500", "4500원").
pub fn parse_amount(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.round() as i64)
        }),
        Value::String(s) => {
            let cleaned = strip_number_marks(s);
            cleaned.parse::<i64>().ok().or_else(|| {
                cleaned
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.round() as i64)
            })
        }
        _ => None,
    }
}

/// Quantidades são contagens: frações ("1.5") não são arredondadas, são recusadas.
pub fn parse_count(value: &Value) -> Option<i64> {
    let whole = |f: f64| (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64);
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let cleaned = strip_number_marks(s);
            cleaned
                .parse::<i64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

fn strip_number_marks(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '₩' | '원' | ' '))
        .collect()
}

/// Datas aceitas: 2025-03-14, 20250314, 2025/03/14, 2025.03.14 (com ou sem hora)
/// e o número de série de data do Excel.
pub fn parse_sale_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let serial = n.as_f64()?.floor();
            if !(1.0..=2_958_465.0).contains(&serial) {
                return None;
            }
            let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
            epoch.checked_add_signed(Duration::days(serial as i64))
        }
        Value::String(s) => {
            let date_part = s.trim().split(['T', ' ']).next().unwrap_or_default();
            ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d", "%Y.%m.%d"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        }
        _ => None,
    }
}

fn required_amount(row: &Map<String, Value>, synonyms: &[&str], field: &'static str) -> Result<i64, RowProblem> {
    let cell = lookup(row, synonyms).ok_or(RowProblem::MissingField(field))?;
    parse_amount(cell).ok_or(RowProblem::InvalidNumber(field))
}

fn optional_amount(row: &Map<String, Value>, synonyms: &[&str], field: &'static str) -> Result<Option<i64>, RowProblem> {
    match lookup(row, synonyms) {
        Some(cell) => parse_amount(cell).map(Some).ok_or(RowProblem::InvalidNumber(field)),
        None => Ok(None),
    }
}

/// Mapeia uma linha de vendas. A coluna de data, se existir e estiver preenchida,
/// prevalece sobre a data do upload.
pub fn map_sales_row(row: &Map<String, Value>, fallback_date: NaiveDate) -> Result<NewSalesRecord, RowProblem> {
    let product_name = lookup(row, PRODUCT_NAME)
        .map(cell_text)
        .filter(|name| !name.is_empty())
        .ok_or(RowProblem::MissingProductName)?;

    let quantity = lookup(row, QUANTITY).ok_or(RowProblem::MissingField("quantity"))?;
    let quantity = parse_count(quantity)
        .and_then(|q| i32::try_from(q).ok())
        .filter(|q| *q > 0)
        .ok_or(RowProblem::InvalidNumber("quantity"))?;

    let total_price = required_amount(row, TOTAL_PRICE, "totalPrice")?;
    if total_price < 0 {
        return Err(RowProblem::InvalidNumber("totalPrice"));
    }

    // Custo e lucro: um deriva do outro, os dois ausentes invalidam a linha
    let cost = optional_amount(row, COST_PRICE, "costPrice")?;
    let profit = optional_amount(row, PROFIT_PRICE, "profitPrice")?;
    let (cost_price, profit_price) = match (cost, profit) {
        (Some(c), Some(p)) => (c, p),
        (Some(c), None) => (
            c,
            total_price.checked_sub(c).ok_or(RowProblem::InvalidNumber("costPrice"))?,
        ),
        (None, Some(p)) => (
            total_price.checked_sub(p).ok_or(RowProblem::InvalidNumber("profitPrice"))?,
            p,
        ),
        (None, None) => return Err(RowProblem::MissingField("costPrice")),
    };
    if cost_price < 0 {
        return Err(RowProblem::InvalidNumber("costPrice"));
    }

    let sale_date = match find_date_cell(row) {
        Some(cell) if !is_blank(cell) => {
            parse_sale_date(cell).ok_or_else(|| RowProblem::InvalidDate(cell_text(cell)))?
        }
        _ => fallback_date,
    };

    let barcode = lookup(row, BARCODE).map(cell_text).filter(|b| !b.is_empty());

    Ok(NewSalesRecord {
        sale_date,
        product_name,
        quantity,
        total_price,
        cost_price,
        profit_price,
        barcode,
    })
}

pub fn classify_sales_row(index: usize, row: &Map<String, Value>, fallback_date: NaiveDate) -> RowOutcome {
    match map_sales_row(row, fallback_date) {
        Ok(record) => RowOutcome::Mapped(record),
        Err(problem) => RowOutcome::Rejected(RejectedRow {
            row: index + 1,
            product_name: lookup(row, PRODUCT_NAME).map(cell_text).filter(|n| !n.is_empty()),
            reason: problem.to_string(),
        }),
    }
}

pub fn map_sales_rows(rows: &[Map<String, Value>], fallback_date: NaiveDate) -> SalesSheet {
    let mut sheet = SalesSheet::default();
    for (index, row) in rows.iter().enumerate() {
        match classify_sales_row(index, row, fallback_date) {
            RowOutcome::Mapped(record) => sheet.records.push(record),
            RowOutcome::Rejected(rejected) => {
                tracing::warn!("Linha {} da planilha ignorada: {}", rejected.row, rejected.reason);
                sheet.rejected.push(rejected);
            }
        }
    }
    sheet
}

// Preços da planilha de estoque vêm formatados ("1,500원"): mantém só os dígitos
fn digits_only(value: &Value) -> Option<i64> {
    let digits: String = cell_text(value).chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Mapeia uma linha posicional da planilha de estoque. `None` quando faltam nome,
/// quantidade ou preços.
pub fn map_product_row(cells: &[Value]) -> Option<NewProduct> {
    let cell = |i: usize| cells.get(i).unwrap_or(&EMPTY_CELL);

    let name = cell_text(cell(COL_NAME));
    if name.is_empty() {
        return None;
    }
    let quantity = parse_count(cell(COL_QUANTITY)).and_then(|q| i32::try_from(q).ok())?;
    if quantity < 0 {
        return None;
    }

    Some(NewProduct {
        name,
        quantity,
        cost_price: digits_only(cell(COL_COST_PRICE))?,
        sale_price: digits_only(cell(COL_SALE_PRICE))?,
        storage_type: cell_text(cell(COL_STORAGE_TYPE)),
    })
}

/// Ignora a linha de cabeçalho. Devolve os produtos e os números das linhas puladas.
pub fn map_product_rows(rows: &[Vec<Value>]) -> (Vec<NewProduct>, Vec<usize>) {
    let mut products = Vec::new();
    let mut skipped = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(1) {
        match map_product_row(row) {
            Some(product) => products.push(product),
            None => skipped.push(index),
        }
    }
    (products, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upload_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn korean_headers_are_mapped() {
        let r = row(json!({
            "상품명": "삼각김밥",
            "판매수량": 3,
            "판매금액": "4,500",
            "매입금액": 3150,
            "수익금액": 1350,
            "바코드": "8801234567890"
        }));
        let record = map_sales_row(&r, upload_date()).unwrap();
        assert_eq!(record.product_name, "삼각김밥");
        assert_eq!(record.quantity, 3);
        assert_eq!(record.total_price, 4500);
        assert_eq!(record.cost_price, 3150);
        assert_eq!(record.profit_price, 1350);
        assert_eq!(record.barcode.as_deref(), Some("8801234567890"));
        assert_eq!(record.sale_date, upload_date());
    }

    #[test]
    fn english_headers_and_alternate_synonyms() {
        let r = row(json!({
            "productName": "Cola",
            "수량": "2",
            "합계": 3000,
            "costPrice": 2000
        }));
        let record = map_sales_row(&r, upload_date()).unwrap();
        assert_eq!(record.quantity, 2);
        assert_eq!(record.total_price, 3000);
        assert_eq!(record.profit_price, 1000);
        assert_eq!(record.barcode, None);
    }

    #[test]
    fn cost_is_derived_from_profit() {
        let r = row(json!({ "상품명": "우유", "수량": 1, "합계": 1800, "수익금액": 500 }));
        let record = map_sales_row(&r, upload_date()).unwrap();
        assert_eq!(record.cost_price, 1300);
    }

    #[test]
    fn missing_fields_are_rejected_not_zeroed() {
        let no_name = row(json!({ "수량": 1, "합계": 1000, "매입금액": 700 }));
        assert_eq!(map_sales_row(&no_name, upload_date()), Err(RowProblem::MissingProductName));

        let no_total = row(json!({ "상품명": "빵", "수량": 1, "매입금액": 700 }));
        assert_eq!(map_sales_row(&no_total, upload_date()), Err(RowProblem::MissingField("totalPrice")));

        let no_cost = row(json!({ "상품명": "빵", "수량": 1, "합계": 1000 }));
        assert_eq!(map_sales_row(&no_cost, upload_date()), Err(RowProblem::MissingField("costPrice")));

        let blank_qty = row(json!({ "상품명": "빵", "수량": " ", "합계": 1000, "매입금액": 700 }));
        assert_eq!(map_sales_row(&blank_qty, upload_date()), Err(RowProblem::MissingField("quantity")));
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        let r = row(json!({ "상품명": "빵", "수량": "두개", "합계": 1000, "매입금액": 700 }));
        assert_eq!(map_sales_row(&r, upload_date()), Err(RowProblem::InvalidNumber("quantity")));

        let zero_qty = row(json!({ "상품명": "빵", "수량": 0, "합계": 1000, "매입금액": 700 }));
        assert_eq!(map_sales_row(&zero_qty, upload_date()), Err(RowProblem::InvalidNumber("quantity")));
    }

    #[test]
    fn fractional_quantity_is_not_rounded() {
        let text = row(json!({ "상품명": "빵", "수량": "1.5", "합계": 1000, "매입금액": 700 }));
        assert_eq!(map_sales_row(&text, upload_date()), Err(RowProblem::InvalidNumber("quantity")));

        let number = row(json!({ "상품명": "빵", "수량": 2.5, "합계": 1000, "매입금액": 700 }));
        assert_eq!(map_sales_row(&number, upload_date()), Err(RowProblem::InvalidNumber("quantity")));

        let whole_float = row(json!({ "상품명": "빵", "수량": 2.0, "합계": 1000, "매입금액": 700 }));
        assert_eq!(map_sales_row(&whole_float, upload_date()).unwrap().quantity, 2);

        let whole_text = row(json!({ "상품명": "빵", "수량": "1,200", "합계": 1000, "매입금액": 700 }));
        assert_eq!(map_sales_row(&whole_text, upload_date()).unwrap().quantity, 1200);

        assert_eq!(parse_count(&json!("3.0")), Some(3));
        assert_eq!(parse_count(&json!("0.5")), None);
    }

    #[test]
    fn date_column_overrides_upload_date() {
        let r = row(json!({
            "판매일자": "2025-03-02",
            "상품명": "라면",
            "수량": 1,
            "합계": 1200,
            "매입금액": 800
        }));
        let record = map_sales_row(&r, upload_date()).unwrap();
        assert_eq!(record.sale_date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());

        let english = row(json!({
            "Sale Date": "20250305",
            "productName": "Ramen",
            "quantity": 1,
            "totalPrice": 1200,
            "profitPrice": 400
        }));
        let record = map_sales_row(&english, upload_date()).unwrap();
        assert_eq!(record.sale_date, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
    }

    #[test]
    fn blank_date_cell_falls_back_and_bad_date_rejects() {
        let blank = row(json!({ "날짜": "", "상품명": "라면", "수량": 1, "합계": 1200, "매입금액": 800 }));
        assert_eq!(map_sales_row(&blank, upload_date()).unwrap().sale_date, upload_date());

        let bad = row(json!({ "날짜": "어제", "상품명": "라면", "수량": 1, "합계": 1200, "매입금액": 800 }));
        assert_eq!(
            map_sales_row(&bad, upload_date()),
            Err(RowProblem::InvalidDate("어제".into()))
        );
    }

    #[test]
    fn excel_serial_dates_are_understood() {
        // 45730 = 2025-03-14 no Excel
        assert_eq!(parse_sale_date(&json!(45730)), Some(upload_date()));
        assert_eq!(parse_sale_date(&json!("2025.03.14")), Some(upload_date()));
        assert_eq!(parse_sale_date(&json!("2025-03-14 09:30:00")), Some(upload_date()));
        assert_eq!(parse_sale_date(&json!(true)), None);
    }

    #[test]
    fn amounts_accept_currency_formatting() {
        assert_eq!(parse_amount(&json!("₩12,000")), Some(12_000));
        assert_eq!(parse_amount(&json!("4500원")), Some(4_500));
        assert_eq!(parse_amount(&json!(1200.0)), Some(1_200));
        assert_eq!(parse_amount(&json!("-300")), Some(-300));
        assert_eq!(parse_amount(&json!("abc")), None);
        assert_eq!(parse_amount(&Value::Null), None);
    }

    #[test]
    fn rejected_rows_are_skipped_from_aggregation() {
        let rows = vec![
            row(json!({ "상품명": "김밥", "수량": 2, "합계": 5000, "수익금액": 1500 })),
            row(json!({ "상품명": "", "수량": 1, "합계": 1000, "수익금액": 300 })),
            row(json!({ "상품명": "콜라", "수량": 1, "합계": 2000 })),
            row(json!({ "상품명": "물", "수량": 3, "합계": 2400, "수익금액": 900 })),
        ];
        let sheet = map_sales_rows(&rows, upload_date());

        assert_eq!(sheet.records.len(), 2);
        assert_eq!(sheet.total_profit(), 2400);
        assert_eq!(sheet.rejected.len(), 2);
        assert_eq!(sheet.rejected[0].row, 2);
        assert_eq!(sheet.rejected[0].product_name, None);
        assert_eq!(sheet.rejected[1].row, 3);
        assert_eq!(sheet.rejected[1].product_name.as_deref(), Some("콜라"));
        assert!(sheet.records.iter().all(|r| r.product_name != "콜라"));
    }

    #[test]
    fn product_rows_are_positional() {
        let rows = vec![
            vec![json!("No"), json!("보관"), json!("상품명"), json!("수량"), json!("매입가"), json!("-"), json!("판매가")],
            vec![json!(1), json!("냉장"), json!("바나나우유"), json!(12), json!("1,100원"), json!(""), json!("1,700원")],
            vec![json!(2), json!("상온"), json!(""), json!(5), json!("500"), json!(""), json!("900")],
            vec![json!(3), json!("상온"), json!("새우깡"), json!("많음"), json!("900"), json!(""), json!("1500")],
            vec![json!(4), json!("냉동")],
        ];
        let (products, skipped) = map_product_rows(&rows);

        assert_eq!(products.len(), 1);
        let milk = &products[0];
        assert_eq!(milk.name, "바나나우유");
        assert_eq!(milk.storage_type, "냉장");
        assert_eq!(milk.quantity, 12);
        assert_eq!(milk.cost_price, 1_100);
        assert_eq!(milk.sale_price, 1_700);
        assert_eq!(skipped, vec![2, 3, 4]);
    }
}
