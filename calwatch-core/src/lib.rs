//! Core types for calwatch.
//!
//! This crate holds the diff-and-notify core: the `Event` value type, weekly
//! snapshots, the week window resolver, the diff engine, the notification
//! ledger/policy, and the persistent snapshot store. Everything that talks to
//! the network lives in the `calwatch` binary instead.

pub mod config;
pub mod diff;
pub mod error;
pub mod event;
pub mod ics;
pub mod ledger;
pub mod policy;
pub mod snapshot;
pub mod store;
pub mod week;

pub use error::{CalWatchError, CalWatchResult};
pub use event::Event;
