//! CLI commands

pub mod account;
pub mod auth;
pub mod search;
