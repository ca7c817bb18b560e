// src/handlers/billing.rs

use std::collections::HashSet;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_rls_connection,
        error::{ApiError, AppError},
        validation::validate_money_amount,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermComputeBill, RequirePermission},
    },
    models::{charges::BillResult, orders::OrderLineItem},
};

// ---
// Payload: prévia da conta a partir de um subtotal já conhecido
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillPreviewPayload {
    #[validate(custom(function = "validate_money_amount"))]
    #[schema(example = "200.00")]
    pub total_bill: Decimal,

    // Cobranças opcionais marcadas pelo caixa
    #[serde(default)]
    #[schema(example = json!([]))]
    pub selected_optional_ids: Vec<Uuid>,
}

// ---
// Payload: conta a partir das linhas do pedido (o subtotal é recalculado aqui)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderBillPayload {
    #[validate(length(min = 1, message = "validation.items_required"), nested)]
    pub items: Vec<OrderLineItem>,

    #[serde(default)]
    pub selected_optional_ids: Vec<Uuid>,
}

// POST /api/billing/preview
#[utoipa::path(
    post,
    path = "/api/billing/preview",
    tag = "Billing",
    request_body = BillPreviewPayload,
    responses(
        (status = 200, description = "Conta com cobranças aplicadas", body = BillResult),
        (status = 400, description = "Subtotal ou cobrança inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn preview_bill(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermComputeBill>,
    Json(payload): Json<BillPreviewPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let selected: HashSet<Uuid> = payload.selected_optional_ids.into_iter().collect();

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let bill = app_state
        .billing_service
        .preview_bill(&mut *rls_conn, user.0.merchant_id, payload.total_bill, &selected)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(bill)))
}

// POST /api/orders/bill
#[utoipa::path(
    post,
    path = "/api/orders/bill",
    tag = "Billing",
    request_body = OrderBillPayload,
    responses(
        (status = 200, description = "Conta do pedido com cobranças aplicadas", body = BillResult),
        (status = 400, description = "Linha do pedido ou cobrança inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn bill_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermComputeBill>,
    Json(payload): Json<OrderBillPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let selected: HashSet<Uuid> = payload.selected_optional_ids.into_iter().collect();

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let bill = app_state
        .billing_service
        .bill_order(&mut *rls_conn, user.0.merchant_id, &payload.items, &selected)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(bill)))
}
