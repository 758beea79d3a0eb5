//! Command-line client for the GymDesk super-admin API.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod utils;
