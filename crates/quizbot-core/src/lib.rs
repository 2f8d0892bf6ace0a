//! Quiz Bot Core: shared abstractions.
//!
//! This crate defines the traits and types that the conversation engine,
//! the store backends, and the platform adapters all depend on. It contains
//! no infrastructure code.

pub mod clock;
pub mod error;
pub mod rng;
pub mod store;
