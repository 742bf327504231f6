//! Domain model: records, status lifecycles and the storage ports the engines depend on.

pub mod lifecycle;
pub mod order;
pub mod pagination;
pub mod payment;
pub mod ports;
pub mod product;
