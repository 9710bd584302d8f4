pub mod comparison;
pub mod not_found;
pub mod simulator;
