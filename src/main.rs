// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Configuração inválida impede a aplicação de subir
    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();
    tracing::info!(
        margin_rate = %config.report_defaults.margin_rate,
        card_fee_rate = %config.report_defaults.card_fee_rate,
        policy = ?config.report_defaults.policy,
        "Premissas padrão do relatório carregadas"
    );

    let app_state = AppState::new(config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let store_routes = Router::new()
        .route(
            "/",
            post(handlers::stores::create_store).get(handlers::stores::list_stores),
        )
        .route(
            "/{storeId}",
            get(handlers::stores::get_store)
                .patch(handlers::stores::update_store)
                .delete(handlers::stores::delete_store),
        )
        .route(
            "/{storeId}/expenses/{year}/{month}",
            get(handlers::expenses::get_month_expenses)
                .put(handlers::expenses::replace_month_expenses),
        )
        .route("/{storeId}/sales", get(handlers::sales::list_sales))
        .route("/{storeId}/sales/upload", post(handlers::sales::upload_sales))
        .route("/{storeId}/sales/auto-deduct", post(handlers::sales::auto_deduct))
        .route("/{storeId}/sales/import", post(handlers::sales::import_sales))
        .route(
            "/{storeId}/products",
            get(handlers::products::list_products)
                .post(handlers::products::create_products)
                .put(handlers::products::update_products),
        )
        .route("/{storeId}/products/import", post(handlers::products::import_products))
        .route(
            "/{storeId}/dashboard/sales-summary",
            get(handlers::dashboard::sales_summary),
        )
        .route(
            "/{storeId}/reports/breakeven",
            get(handlers::reports::breakeven_report),
        );

    // Tudo abaixo de /api/users e /api/stores exige token
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/stores", store_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
