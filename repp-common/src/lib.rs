//! # REPP Common Library
//!
//! Shared code for the Real Estate Price Predictor client including:
//! - Property attribute record (28 named fields)
//! - Prediction service request/response contracts
//! - Locale/theme preferences
//! - Display label lookup
//! - Configuration loading

pub mod attributes;
pub mod config;
pub mod error;
pub mod labels;
pub mod prediction;
pub mod preferences;

pub use attributes::{AttributeField, AttributeRecord};
pub use error::{Error, Result};
pub use prediction::Prediction;
pub use preferences::{Locale, Preferences, Theme};
