//! # Shield Synthetic — believable substitute data
//!
//! When real access is denied or withheld, the engine answers with generated
//! records instead so the requesting app keeps functioning without seeing
//! real user data. This crate owns those record pools and the generator.

pub mod generator;
pub mod pools;

pub use generator::SyntheticDataGenerator;
