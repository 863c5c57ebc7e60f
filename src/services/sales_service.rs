// src/services/sales_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{ProductRepository, SalesRepository},
    models::{
        product::Product,
        sales::{
            DeductionError, DeductionFailure, DeductionItem, DeductionReport, ImportSalesPayload,
            ImportSalesResponse, NewSalesRecord, SalesQueryResponse, SalesTotals,
            UploadSalesResponse,
        },
    },
    services::{period::check_range, spreadsheet::map_sales_rows},
};

fn empty_upload() -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(
        "data",
        ValidationError::new("empty").with_message(Cow::Borrowed("Nenhuma venda para registrar.")),
    );
    AppError::ValidationError(errors)
}

/// Datas distintas presentes no lote, em ordem.
pub fn distinct_dates(records: &[NewSalesRecord]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.sale_date).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Qualquer data do lote já gravada recusa o upload inteiro, citando a mais antiga.
pub fn ensure_dates_free(recorded: &[NaiveDate]) -> Result<(), AppError> {
    match recorded.iter().min() {
        Some(first) => Err(AppError::SalesAlreadyRecorded(*first)),
        None => Ok(()),
    }
}

pub fn sum_records(records: impl IntoIterator<Item = (i64, i64)>) -> SalesTotals {
    records
        .into_iter()
        .fold(SalesTotals::default(), |acc, (sales, profit)| SalesTotals {
            total_sales: acc.total_sales.saturating_add(sales),
            total_profit: acc.total_profit.saturating_add(profit),
        })
}

/// Decide se a baixa de um item pode ser aplicada ao produto encontrado.
pub fn check_deduction(product: Option<&Product>, item: &DeductionItem) -> Result<(), DeductionError> {
    match product {
        None => Err(DeductionError {
            product_name: item.product_name.clone(),
            kind: DeductionFailure::ProductNotFound,
            reason: "produto não cadastrado no estoque".to_string(),
        }),
        Some(p) if p.quantity < item.quantity => Err(DeductionError {
            product_name: item.product_name.clone(),
            kind: DeductionFailure::InsufficientStock,
            reason: format!(
                "estoque insuficiente (disponível {}, vendido {})",
                p.quantity, item.quantity
            ),
        }),
        Some(_) => Ok(()),
    }
}

#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl SalesService {
    pub fn new(sales_repo: SalesRepository, product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { sales_repo, product_repo, pool }
    }

    /// Grava o lote inteiro ou nada. Se algum dia do lote já tiver vendas, devolve 409.
    pub async fn upload(&self, store_id: Uuid, records: &[NewSalesRecord]) -> Result<UploadSalesResponse, AppError> {
        if records.is_empty() {
            return Err(empty_upload());
        }
        let dates = distinct_dates(records);

        let mut tx = self.pool.begin().await?;
        self.sales_repo.lock_store(&mut *tx, store_id).await?;

        let recorded = self
            .sales_repo
            .dates_already_recorded(&mut *tx, store_id, &dates)
            .await?;
        if let Err(err) = ensure_dates_free(&recorded) {
            tracing::warn!(%store_id, error = %err, "Upload recusado: vendas já registradas");
            return Err(err);
        }

        for record in records {
            self.sales_repo.insert(&mut *tx, store_id, record).await?;
        }
        tx.commit().await?;

        let totals = sum_records(records.iter().map(|r| (r.total_price, r.profit_price)));
        tracing::info!(%store_id, inserted = records.len(), "Vendas registradas");

        Ok(UploadSalesResponse {
            inserted: records.len(),
            dates,
            total_sales: totals.total_sales,
            total_profit: totals.total_profit,
        })
    }

    pub async fn query(&self, store_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<SalesQueryResponse, AppError> {
        check_range(start, end)?;
        let records = self.sales_repo.list_by_range(store_id, start, end).await?;
        let totals = sum_records(records.iter().map(|r| (r.total_price, r.profit_price)));
        Ok(SalesQueryResponse {
            total_sales: totals.total_sales,
            total_profit: totals.total_profit,
            records,
        })
    }

    /// Baixa de estoque por nome do produto, numa única transação. Itens sem produto ou
    /// sem saldo são pulados e relatados.
    pub async fn auto_deduct(&self, store_id: Uuid, items: &[DeductionItem]) -> Result<DeductionReport, AppError> {
        let mut report = DeductionReport::default();
        let mut tx = self.pool.begin().await?;

        for item in items {
            let product = self
                .product_repo
                .find_by_name_for_update(&mut *tx, store_id, item.product_name.trim())
                .await?;

            match check_deduction(product.as_ref(), item) {
                Ok(()) => {
                    if let Some(product) = product {
                        self.product_repo.decrement(&mut *tx, product.id, item.quantity).await?;
                        report.deducted += 1;
                    }
                }
                Err(failure) => {
                    tracing::warn!(
                        %store_id, product = %failure.product_name,
                        "Baixa de estoque pulada: {}", failure.reason
                    );
                    report.errors.push(failure);
                }
            }
        }

        tx.commit().await?;
        tracing::info!(
            %store_id, deducted = report.deducted, failed = report.errors.len(),
            "Baixa automática de estoque concluída"
        );
        Ok(report)
    }

    pub async fn import(&self, store_id: Uuid, payload: &ImportSalesPayload) -> Result<ImportSalesResponse, AppError> {
        let sheet = map_sales_rows(&payload.rows, payload.date);
        tracing::info!(
            %store_id, mapped = sheet.records.len(), rejected = sheet.rejected.len(),
            "Planilha de vendas mapeada"
        );

        if sheet.records.is_empty() {
            return Ok(ImportSalesResponse {
                inserted: 0,
                total_profit: 0,
                rejected: sheet.rejected,
                deduction: None,
            });
        }

        let uploaded = self.upload(store_id, &sheet.records).await?;

        let deduction = if payload.auto_deduct {
            let items: Vec<DeductionItem> = sheet
                .records
                .iter()
                .map(|r| DeductionItem {
                    product_name: r.product_name.clone(),
                    quantity: r.quantity,
                })
                .collect();
            Some(self.auto_deduct(store_id, &items).await?)
        } else {
            None
        };

        Ok(ImportSalesResponse {
            inserted: uploaded.inserted,
            total_profit: sheet.total_profit(),
            rejected: sheet.rejected,
            deduction,
        })
    }
}
