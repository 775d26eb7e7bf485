//! `bss-console` — composition root of the BSS/OSS console.
//!
//! [`Console`] wires storage, fixture seeds, repositories and services into
//! one object and exposes the cross-cutting flows (order placement with
//! wizard generation, dashboard, billing preview).

pub mod config;
pub mod console;

pub use config::{ConsoleConfig, StoreConfig};
pub use console::{Console, ConsoleError, CustomerOverview};
