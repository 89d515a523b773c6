//! Core driver components for the SRNG engine.
//!
//! This module contains the building blocks for setting up and servicing
//! descriptor rings:
//!
//! - [`config`] - Ring parameters, flags and the builder
//! - [`error`] - Error types and result aliases
//! - [`srng`] - Per-ring state and pointer arithmetic
//! - [`access`] - The locked begin/end access session
//! - [`hal`] - The device context: init, ring setup, queries
//! - [`idle_list`] - Idle-link scatter list programming
//!
//! # Example
//!
//! ```ignore
//! use srng_hal::driver::{Hal, SrngParams, RingFlags};
//!
//! let params = SrngParams::new(1024)
//!     .with_intr_batch_threshold(1)
//!     .with_msi(msi_addr, msi_data)
//!     .with_flags(RingFlags::DATA_TLV_SWAP);
//! let ring = hal.setup(RingType::ReoDst, 0, 0, params)?;
//! ```

// Submodules
pub mod access;
pub mod config;
pub mod error;
pub mod hal;
pub mod idle_list;
pub mod srng;

// Re-exports for convenience
pub use access::AccessSession;
pub use config::{RingFlags, SrngInfo, SrngParams};
pub use error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, Result};
pub use hal::{Hal, Srng};
pub use srng::SrngState;
