// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::rbac::Permission,
    services::rbac_service::role_allows,
};

/// 1. O Trait que define o que é uma Permissão (em nível de tipo)
pub trait PermissionDef: Send + Sync + 'static {
    const PERMISSION: Permission;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        if !role_allows(user.0.role, T::PERMISSION) {
            tracing::warn!(
                user_id = %user.0.id,
                role = ?user.0.role,
                permission = T::PERMISSION.slug(),
                "Acesso negado"
            );
            return Err(AppError::Forbidden);
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermManageCharges;
impl PermissionDef for PermManageCharges {
    const PERMISSION: Permission = Permission::ManageCharges;
}

pub struct PermManageMenu;
impl PermissionDef for PermManageMenu {
    const PERMISSION: Permission = Permission::ManageMenu;
}

pub struct PermViewMenu;
impl PermissionDef for PermViewMenu {
    const PERMISSION: Permission = Permission::ViewMenu;
}

pub struct PermComputeBill;
impl PermissionDef for PermComputeBill {
    const PERMISSION: Permission = Permission::ComputeBill;
}

pub struct PermViewReports;
impl PermissionDef for PermViewReports {
    const PERMISSION: Permission = Permission::ViewReports;
}
