//! # Campus Common Library
//!
//! Shared code for the campus services including:
//! - Database models and schema initialization
//! - Error taxonomy
//! - Configuration loading
//! - Weekday and time-of-day utilities

pub mod config;
pub mod db;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use time::Weekday;
