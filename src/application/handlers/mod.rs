//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod quiz;

pub use quiz::{
    EndSessionCommand, EndSessionError, EndSessionHandler, TakeTurnCommand, TakeTurnError,
    TakeTurnHandler, TakeTurnResult,
};
