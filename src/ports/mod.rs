//! Port traits the CLI drives; adapters implement them.

pub mod config_port;
pub mod data_port;
