pub mod common;
pub mod drill;
pub mod fixture;
pub mod preferences;
