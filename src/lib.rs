//! Ledger and rankings for a recurring hold'em meetup.
//!
//! Sessions and point adjustments live in a [`ledger::Store`]; the
//! [`scoring`] functions turn them into point and score rankings without
//! holding any state of their own.

pub mod auth;
pub mod config;
pub mod error;
pub mod ledger;
pub mod output;
pub mod scoring;

pub use error::{LedgerError, Result};
