// src/services/rbac_service.rs

use crate::models::rbac::{Permission, Role};

/// Matriz de acesso. O cargo sempre chega como parâmetro, nunca de estado global.
pub fn role_allows(role: Role, permission: Permission) -> bool {
    match permission {
        Permission::ViewMenu | Permission::ComputeBill => true,
        Permission::ManageMenu | Permission::ViewReports => {
            matches!(role, Role::Merchant | Role::Manager | Role::Supervisor)
        }
        Permission::ManageCharges => matches!(role, Role::Merchant | Role::Manager),
    }
}
