//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the BackendApi port
//! - a session file in the data directory for SessionStorage
//! - the system browser plus a loopback relay for the authorization window
//!   and completion message ports

pub mod browser;
pub mod file_store;
pub mod http;

#[cfg(test)]
pub mod mock;
