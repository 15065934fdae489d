//! Frontier core library
//!
//! Deploys edge functions to a CDN management API and answers which
//! distributions a function is associated with.

pub mod association;
pub mod cancel;
pub mod cdn;
pub mod deploy;
pub mod error;
pub mod fnarn;
pub mod function;
pub mod import;
pub mod listdist;
pub mod presenter;
pub mod render;

pub use error::{FrontierError, Result};
