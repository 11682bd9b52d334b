//! Core domain types and logic: containers, indicator engine, dispatch.

pub mod series;
pub mod frame;
pub mod table;
pub mod params;
pub mod resolver;
pub mod filter;
pub mod aggregate;
pub mod partition;
pub mod regression;
pub mod indicator;
pub mod registry;
pub mod dispatcher;
pub mod time_utils;
pub mod config_validation;
pub mod error;
