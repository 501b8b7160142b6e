//! Core library: reconciliation, daily throttle, add attempts, batch driver,
//! and the request-set builder.

pub mod attempt;
pub mod builder;
pub mod client;
pub mod clock;
pub mod config;
pub mod driver;
pub mod reconcile;
pub mod selection;
pub mod throttle;
