//! SeaORM entities for application users and their system logs.
//!
//! Field validation lives next to each entity so the service layer never
//! sends an over-long value to the store.

pub mod errors;
pub mod db;
pub mod app_user;
pub mod system_log;

#[cfg(test)]
mod tests;
