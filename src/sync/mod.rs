//! Synchronization and Concurrency Support
//!
//! Ring access is already safe across threads: each ring has its own
//! `spin::Mutex`, and [`Hal::access`](crate::Hal::access) takes `&self`.
//! This module adds an ISR-safe wrapper for sharing a whole device between
//! normal code and interrupt handlers:
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedHal`] - critical-section protected [`Hal`](crate::Hal)
//!
//! # Feature Flags
//!
//! - `critical-section`: enables this module
//!
//! # Example
//!
//! ```ignore
//! use srng_hal::sync::SharedHal;
//!
//! static HAL: SharedHal<MmioRegisters, PoolAllocator> = SharedHal::new(regs, pool);
//!
//! fn main() {
//!     HAL.with(|hal| {
//!         hal.init().unwrap();
//!         hal.setup(RingType::CeDstStatus, 0, 0, SrngParams::new(512)).unwrap();
//!     });
//! }
//! ```

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedHal;
