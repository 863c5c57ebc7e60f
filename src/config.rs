// src/config.rs

use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{str::FromStr, time::Duration};

use crate::{
    db::{ExpenseRepository, ProductRepository, SalesRepository, StoreRepository, UserRepository},
    models::report::TargetPolicy,
    services::{
        auth::AuthService,
        breakeven::Assumptions,
        dashboard_service::DashboardService,
        expense_service::ExpenseService,
        inventory_service::InventoryService,
        report_service::ReportService,
        sales_service::SalesService,
        store_service::StoreService,
    },
};

/// Configuração da aplicação, lida uma única vez na inicialização.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub max_db_connections: u32,
    // Premissas padrão do relatório de ponto de equilíbrio
    pub report_defaults: Assumptions,
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} inválido ('{}'): {}", key, raw, e)),
        _ => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let report_defaults = Assumptions {
            margin_rate: parse_or(&lookup, "REPORT_MARGIN_RATE", Decimal::new(30, 2))?,
            card_fee_rate: parse_or(&lookup, "REPORT_CARD_FEE_RATE", Decimal::new(23, 3))?,
            policy: parse_or(&lookup, "REPORT_TARGET_POLICY", TargetPolicy::Revenue)?,
        };
        // Premissas inválidas derrubam a inicialização, não a primeira requisição
        report_defaults.validate()?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: parse_or(&lookup, "APP_BIND_ADDR", "0.0.0.0:3000".to_string())?,
            max_db_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            report_defaults,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub store_service: StoreService,
    pub expense_service: ExpenseService,
    pub sales_service: SalesService,
    pub inventory_service: InventoryService,
    pub report_service: ReportService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_db_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let store_repo = StoreRepository::new(db_pool.clone());
        let expense_repo = ExpenseRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, config.jwt_secret.clone(), db_pool.clone());
        let store_service = StoreService::new(store_repo.clone(), db_pool.clone());
        let expense_service = ExpenseService::new(expense_repo.clone(), db_pool.clone());
        let sales_service = SalesService::new(sales_repo.clone(), product_repo.clone(), db_pool.clone());
        let inventory_service = InventoryService::new(product_repo, db_pool.clone());
        let report_service = ReportService::new(
            store_repo,
            expense_repo,
            sales_repo.clone(),
            config.report_defaults,
        );
        let dashboard_service = DashboardService::new(sales_repo);

        Ok(Self {
            db_pool,
            auth_service,
            store_service,
            expense_service,
            sales_service,
            inventory_service,
            report_service,
            dashboard_service,
        })
    }
}
