// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::rbac::Role;

// Estrutura de dados ("claims") dentro do JWT.
// O token é emitido pelo serviço de login; aqui só validamos e lemos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,          // Subject (ID do usuário)
    pub merchant_id: Uuid,  // Restaurante ao qual o usuário pertence
    pub role: Role,
    pub exp: usize,         // Expiration time
    pub iat: usize,         // Issued At
}

// O usuário já autenticado, como os handlers o enxergam.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub role: Role,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            merchant_id: claims.merchant_id,
            role: claims.role,
        }
    }
}
