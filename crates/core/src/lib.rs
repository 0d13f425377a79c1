//! Open-Launch domain types and pure logic.
//!
//! This crate has no internal dependencies so it can be shared by the
//! scheduler, the repository layer, the API server and the promotion worker.

pub mod availability;
pub mod capacity;
pub mod category;
pub mod error;
pub mod launch;
pub mod ranking;
pub mod roles;
pub mod types;
