//! Command implementations

pub mod config;
pub mod create;
pub mod purge;
pub mod version;
