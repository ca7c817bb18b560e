// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Os cargos fixos do restaurante, do mais amplo ao mais restrito.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Merchant,   // Dono
    Manager,    // Gerente
    Supervisor,
    Staff,      // Garçom / Caixa
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ManageCharges,
    ManageMenu,
    ViewMenu,
    ComputeBill,
    ViewReports,
}

impl Permission {
    pub fn slug(&self) -> &'static str {
        match self {
            Permission::ManageCharges => "charges:write",
            Permission::ManageMenu => "menu:write",
            Permission::ViewMenu => "menu:read",
            Permission::ComputeBill => "billing:compute",
            Permission::ViewReports => "reports:read",
        }
    }
}
