pub mod billing;
pub mod charges;
pub mod menu;
