pub mod billing_service;
pub mod menu_service;
pub mod rbac_service;

// Regras puras, sem banco
pub mod category_tree;
pub mod charge_engine;
