//! Internal Implementation Details
//!
//! Register maps and device-wide bookkeeping shared by the ring engine.
//!
//! # Contents
//!
//! - [`register`]: Raw register offsets and field masks
//! - [`ring_config`]: Static ring type table and ring id space
//! - [`pointer_store`]: Shared read/write pointer blocks
//!
//! # Stability
//!
//! **WARNING:** Only the items re-exported from the crate root are public
//! API. Register offsets in particular may change without notice.

pub(crate) mod pointer_store;
pub(crate) mod register;
pub mod ring_config;
