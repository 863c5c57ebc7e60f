// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Stores ---
        handlers::stores::create_store,
        handlers::stores::list_stores,
        handlers::stores::get_store,
        handlers::stores::update_store,
        handlers::stores::delete_store,

        // --- Expenses ---
        handlers::expenses::get_month_expenses,
        handlers::expenses::replace_month_expenses,

        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::upload_sales,
        handlers::sales::auto_deduct,
        handlers::sales::import_sales,

        // --- Inventory ---
        handlers::products::list_products,
        handlers::products::create_products,
        handlers::products::update_products,
        handlers::products::import_products,

        // --- Dashboard ---
        handlers::dashboard::sales_summary,

        // --- Reports ---
        handlers::reports::breakeven_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Stores ---
            models::store::Store,
            models::store::CreateStorePayload,
            models::store::UpdateStorePayload,

            // --- Expenses ---
            models::expense::VariableExpense,
            models::expense::ExpenseItemPayload,
            models::expense::ReplaceExpensesPayload,
            models::expense::MonthlyExpenses,

            // --- Sales ---
            models::sales::SalesRecord,
            models::sales::NewSalesRecord,
            models::sales::UploadSalesPayload,
            models::sales::UploadSalesResponse,
            models::sales::SalesQueryResponse,
            models::sales::DeductionItem,
            models::sales::AutoDeductPayload,
            models::sales::DeductionFailure,
            models::sales::DeductionError,
            models::sales::DeductionReport,
            models::sales::ImportSalesPayload,
            models::sales::RejectedRow,
            models::sales::ImportSalesResponse,

            // --- Inventory ---
            models::product::Product,
            models::product::ProductView,
            models::product::SortOrder,
            models::product::NewProduct,
            models::product::ProductUpdate,
            models::product::CreateProductsPayload,
            models::product::UpdateProductsPayload,
            models::product::ImportProductsPayload,
            models::product::ImportProductsResponse,

            // --- Dashboard ---
            models::dashboard::ProductSalesEntry,
            models::dashboard::DailySalesEntry,
            models::dashboard::MonthlySalesSummary,

            // --- Reports ---
            models::report::TargetPolicy,
            models::report::PeriodPerformance,
            models::report::BreakEvenReport,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Stores", description = "Cadastro de Lojas e Custos Fixos"),
        (name = "Expenses", description = "Despesas Variáveis Mensais"),
        (name = "Sales", description = "Registro e Importação de Vendas"),
        (name = "Inventory", description = "Estoque e Margens"),
        (name = "Dashboard", description = "Gráficos de Vendas do Mês"),
        (name = "Reports", description = "Ponto de Equilíbrio e Metas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
