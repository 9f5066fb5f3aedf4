pub mod admin;
pub mod me;
pub mod plans;
pub mod reports;
pub mod system;
