//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O or external
//! dependencies.

mod account;
mod session;
pub mod result;

pub use account::{AccountId, Provider};
pub use session::SessionId;
