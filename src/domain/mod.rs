//! Domain layer - quiz rules with no I/O of their own.

pub mod foundation;
pub mod quiz;
