// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- CHARGES ---
        handlers::charges::list_charges,
        handlers::charges::create_charge,
        handlers::charges::update_charge,
        handlers::charges::delete_charge,
        handlers::charges::get_charge_summary,

        // --- BILLING ---
        handlers::billing::preview_bill,
        handlers::billing::bill_order,

        // --- MENU ---
        handlers::menu::list_categories,
        handlers::menu::create_category,
        handlers::menu::delete_category,
        handlers::menu::get_category_tree,
        handlers::menu::get_category_options,
        handlers::menu::list_items,
        handlers::menu::create_item,
        handlers::menu::get_statistics,
    ),
    components(
        schemas(
            // --- Charges ---
            models::charges::ChargeKind,
            models::charges::CalculationType,
            models::charges::ChargeDefinition,
            models::charges::AppliedCharge,
            models::charges::ChargeSummary,
            models::charges::BillResult,
            models::orders::OrderLineItem,

            // --- Menu ---
            models::menu::MenuCategory,
            models::menu::CategoryTreeNode,
            models::menu::IndentedCategory,
            models::menu::MenuItem,
            models::menu::MenuStatistics,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::Permission,

            // --- Payloads ---
            handlers::charges::ChargePayload,
            handlers::billing::BillPreviewPayload,
            handlers::billing::OrderBillPayload,
            handlers::menu::CreateCategoryPayload,
            handlers::menu::CreateMenuItemPayload,
        )
    ),
    tags(
        (name = "Charges", description = "Cobranças de sistema e opcionais"),
        (name = "Billing", description = "Cálculo da conta"),
        (name = "Menu", description = "Cardápio: categorias, itens e estatísticas")
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
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
