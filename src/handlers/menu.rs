// src/handlers/menu.rs

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
        validation::validate_money_amount,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermManageMenu, PermViewMenu, PermViewReports, RequirePermission},
    },
    models::menu::{CategoryTreeNode, IndentedCategory, MenuCategory, MenuItem, MenuStatistics},
};

fn default_true() -> bool {
    true
}

// =============================================================================
//  1. CATEGORIAS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "validation.name_required"))]
    #[schema(example = "Sobremesas")]
    pub name: String,
    pub description: Option<String>,
    // Sem pai = categoria raiz
    pub parent_id: Option<Uuid>,
}

// GET /api/menu/categories
#[utoipa::path(
    get,
    path = "/api/menu/categories",
    tag = "Menu",
    responses(
        (status = 200, description = "Lista plana de categorias", body = Vec<MenuCategory>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermViewMenu>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let categories = app_state
        .menu_service
        .list_categories(&mut *rls_conn, user.0.merchant_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}

// POST /api/menu/categories
#[utoipa::path(
    post,
    path = "/api/menu/categories",
    tag = "Menu",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = MenuCategory),
        (status = 404, description = "Categoria pai não encontrada"),
        (status = 409, description = "Nome já utilizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermManageMenu>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .menu_service
        .create_category(
            &mut *rls_conn,
            user.0.merchant_id,
            &payload.name,
            payload.description.as_deref(),
            payload.parent_id,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}

// DELETE /api/menu/categories/{id}
#[utoipa::path(
    delete,
    path = "/api/menu/categories/{id}",
    tag = "Menu",
    responses(
        (status = 204, description = "Categoria removida; subcategorias viram raiz"),
        (status = 404, description = "Categoria não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da categoria")),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermManageMenu>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .menu_service
        .delete_category(&mut *rls_conn, user.0.merchant_id, category_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/menu/categories/tree
#[utoipa::path(
    get,
    path = "/api/menu/categories/tree",
    tag = "Menu",
    responses(
        (status = 200, description = "Categorias em árvore", body = Vec<CategoryTreeNode>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_category_tree(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermViewMenu>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tree = app_state
        .menu_service
        .get_category_tree(&mut *rls_conn, user.0.merchant_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tree)))
}

// GET /api/menu/categories/options
#[utoipa::path(
    get,
    path = "/api/menu/categories/options",
    tag = "Menu",
    responses(
        (status = 200, description = "Categorias achatadas com profundidade (para selects)", body = Vec<IndentedCategory>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_category_options(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermViewMenu>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let options = app_state
        .menu_service
        .get_category_options(&mut *rls_conn, user.0.merchant_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(options)))
}

// =============================================================================
//  2. ITENS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemPayload {
    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, message = "validation.name_required"))]
    #[schema(example = "Gulab Jamun")]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_money_amount"))]
    #[schema(example = "90.00")]
    pub price: Decimal,

    #[serde(default = "default_true")]
    pub available: bool,
}

// GET /api/menu/items
#[utoipa::path(
    get,
    path = "/api/menu/items",
    tag = "Menu",
    responses(
        (status = 200, description = "Itens do cardápio", body = Vec<MenuItem>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermViewMenu>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let items = app_state
        .menu_service
        .list_items(&mut *rls_conn, user.0.merchant_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// POST /api/menu/items
#[utoipa::path(
    post,
    path = "/api/menu/items",
    tag = "Menu",
    request_body = CreateMenuItemPayload,
    responses(
        (status = 201, description = "Item criado", body = MenuItem),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermManageMenu>,
    Json(payload): Json<CreateMenuItemPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .menu_service
        .create_item(
            &mut *rls_conn,
            user.0.merchant_id,
            payload.category_id,
            &payload.name,
            payload.description.as_deref(),
            payload.price,
            payload.available,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

// GET /api/menu/statistics
#[utoipa::path(
    get,
    path = "/api/menu/statistics",
    tag = "Menu",
    responses(
        (status = 200, description = "Quantidade, preço médio e faixa de preço do cardápio", body = MenuStatistics)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_statistics(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermViewReports>,
) -> Result<impl IntoResponse, ApiError> {

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let stats = app_state
        .menu_service
        .get_statistics(&mut *rls_conn, user.0.merchant_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}
