//! Trivia Quiz - Turn-by-turn dialog policy for a multi-round trivia quiz.
//!
//! The policy welcomes the user, collects the quiz configuration one slot at
//! a time, then asks questions fetched from a question bank, judges answers,
//! keeps score and ends the game by length or by the first wrong answer.
//!
//! Layout follows hexagonal architecture:
//! - `domain` - quiz rules and the dialog policy
//! - `ports` - question source and session store contracts
//! - `adapters` - Open Trivia Database, mock source, in-memory store
//! - `application` - turn handlers for a hosting dialog system
//! - `config`, `telemetry` - environment configuration and tracing setup

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
