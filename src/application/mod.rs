//! Application layer containing the order and payment engines.
//!
//! Engines receive their store handles explicitly and own no global state.
//! `FulfillmentService` bundles them behind a single `Command` entry point
//! for front doors such as the CSV replay in the binary.

pub mod command;
pub mod fulfillment;
pub mod order_engine;
pub mod payment_engine;
