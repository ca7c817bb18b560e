pub mod charge_repo;
pub use charge_repo::{ChargeInput, ChargeRepository};
pub mod menu_repo;
pub use menu_repo::MenuRepository;
