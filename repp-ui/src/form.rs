//! Input form state
//!
//! Holds both input modes side by side. Only one mode is active at a time,
//! but switching never touches the other mode's data.

use repp_common::{AttributeField, AttributeRecord};
use std::fmt;

/// Which input the next submission uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Manual,
    Link,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Manual => f.write_str("manual"),
            InputMode::Link => f.write_str("link"),
        }
    }
}

/// Everything the user has entered so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputForm {
    mode: InputMode,
    record: AttributeRecord,
    link: String,
}

impl InputForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn record(&self) -> &AttributeRecord {
        &self.record
    }

    pub fn set_attribute(&mut self, field: AttributeField, value: impl Into<String>) {
        self.record.set(field, value);
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn set_link(&mut self, url: impl Into<String>) {
        self.link = url.into();
    }
}
