//! Credentials and bearer-token models used by the authentication flows.

pub mod credentials;
pub mod token;

pub use credentials::*;
pub use token::*;
