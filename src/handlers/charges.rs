// src/handlers/charges.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_rls_connection,
        error::{ApiError, AppError},
        validation::{validate_money_amount, validate_rate},
    },
    config::AppState,
    db::ChargeInput,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermManageCharges, PermViewMenu, PermViewReports, RequirePermission},
    },
    models::charges::{CalculationType, ChargeDefinition, ChargeKind, ChargeSummary},
};

fn default_true() -> bool {
    true
}

// ---
// Payload: criação e edição de cobrança (mesmo formato)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargePayload {
    #[validate(length(min = 1, message = "validation.name_required"))]
    #[schema(example = "Taxa de Serviço")]
    pub name: String,

    pub kind: ChargeKind,
    pub calculation_type: CalculationType,

    // Usado quando calculationType = PERCENTAGE
    #[validate(custom(function = "validate_rate"))]
    #[serde(default)]
    #[schema(example = "5.00")]
    pub rate: Decimal,

    // Usado quando calculationType = FIXED
    #[validate(custom(function = "validate_money_amount"))]
    #[serde(default)]
    #[schema(example = "0.00")]
    pub amount: Decimal,

    #[serde(default = "default_true")]
    pub active: bool,
}

impl ChargePayload {
    fn as_input(&self) -> ChargeInput<'_> {
        ChargeInput {
            name: &self.name,
            kind: self.kind,
            calculation_type: self.calculation_type,
            rate: self.rate,
            amount: self.amount,
            active: self.active,
        }
    }
}

// GET /api/charges
#[utoipa::path(
    get,
    path = "/api/charges",
    tag = "Charges",
    responses(
        (status = 200, description = "Cobranças do restaurante (ativas e inativas)", body = Vec<ChargeDefinition>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_charges(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermViewMenu>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let charges = app_state
        .billing_service
        .list_charges(&mut *rls_conn, user.0.merchant_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(charges)))
}

// POST /api/charges
#[utoipa::path(
    post,
    path = "/api/charges",
    tag = "Charges",
    request_body = ChargePayload,
    responses(
        (status = 201, description = "Cobrança criada", body = ChargeDefinition),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Cargo sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_charge(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermManageCharges>,
    Json(payload): Json<ChargePayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let charge = app_state
        .billing_service
        .create_charge(&mut *rls_conn, user.0.merchant_id, &payload.as_input())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(charge)))
}

// PUT /api/charges/{id}
#[utoipa::path(
    put,
    path = "/api/charges/{id}",
    tag = "Charges",
    request_body = ChargePayload,
    responses(
        (status = 200, description = "Cobrança atualizada", body = ChargeDefinition),
        (status = 404, description = "Cobrança não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da cobrança")),
    security(("api_jwt" = []))
)]
pub async fn update_charge(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermManageCharges>,
    Path(charge_id): Path<Uuid>,
    Json(payload): Json<ChargePayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let charge = app_state
        .billing_service
        .update_charge(&mut *rls_conn, user.0.merchant_id, charge_id, &payload.as_input())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(charge)))
}

// DELETE /api/charges/{id}
#[utoipa::path(
    delete,
    path = "/api/charges/{id}",
    tag = "Charges",
    responses(
        (status = 204, description = "Cobrança removida"),
        (status = 404, description = "Cobrança não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da cobrança")),
    security(("api_jwt" = []))
)]
pub async fn delete_charge(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermManageCharges>,
    Path(charge_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .billing_service
        .delete_charge(&mut *rls_conn, user.0.merchant_id, charge_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/charges/summary
#[utoipa::path(
    get,
    path = "/api/charges/summary",
    tag = "Charges",
    responses(
        (status = 200, description = "Taxas e valores somados das cobranças de sistema ativas", body = ChargeSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_charge_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermViewReports>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let summary = app_state
        .billing_service
        .get_summary(&mut *rls_conn, user.0.merchant_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}
