//! `bss-auth` — console sign-in and role guard.
//!
//! This crate is intentionally decoupled from storage: persisting the session
//! is the job of `bss-infra`.

pub mod authorize;
pub mod roles;
pub mod session;

pub use authorize::{authorize, AuthzError};
pub use roles::Role;
pub use session::{login, Session};
