//! Utility functions for code generation and input validation.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_validator`] - Destination URL checks

pub mod code_generator;
pub mod url_validator;
