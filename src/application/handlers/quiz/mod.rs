//! Quiz command handlers.
//!
//! Drive quiz sessions one turn at a time and end them on request.

mod end_session;
mod take_turn;

pub use end_session::{EndSessionCommand, EndSessionError, EndSessionHandler};
pub use take_turn::{TakeTurnCommand, TakeTurnError, TakeTurnHandler, TakeTurnResult};
