pub mod auth;
pub mod charges;
pub mod menu;
pub mod orders;
pub mod rbac;
