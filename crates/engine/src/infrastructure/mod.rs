//! Infrastructure implementations.
//!
//! Contains port trait implementations for the filesystem and the clock,
//! plus the importers and exporters that move records in and out.

pub mod clock;
pub mod export;
pub mod importers;
pub mod ports;
pub mod storage;
