//! SRNG Descriptor Ring Engine
//!
//! A `no_std`, `no_alloc` Rust implementation of the host side of a Wi-Fi
//! offload engine's SRNG (shared ring) interface: fixed-size descriptor rings
//! in coherent memory, exchanged with the engine through head/tail pointers.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! 1. **Device Layer** ([`driver`]): [`Hal`] sets rings up, [`AccessSession`]
//!    produces and consumes descriptors, the idle-link scatter list feeds
//!    the buffer manager
//! 2. **Descriptor Layer** ([`descriptor`]): wire layouts of copy engine and
//!    buffer manager descriptors
//! 3. **HAL Layer** ([`hal`]): register transport and coherent allocator
//!    traits the platform implements
//!
//! The static ring type table lives in [`ring_config`].
//!
//! ## Ring model
//!
//! - **Source rings**: the host produces, the engine consumes. The host owns
//!   the head; the engine publishes its tail into a shared pointer slot.
//! - **Destination rings**: the engine produces, the host consumes. The host
//!   owns the tail; the engine publishes its head.
//! - **Per-radio rings**: firmware-owned rings whose host pointer is
//!   published into memory instead of a register.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for error and config types
//! - `log`: Emit `log` records on ring setup and rejected requests
//! - `critical-section`: Enable ISR-safe `SharedHal` wrapper
//!
//! # Example
//!
//! ```ignore
//! use srng_hal::{Hal, RingType, SrngParams};
//! use srng_hal::descriptor::{CeSrcDesc, DescriptorLayout};
//! use srng_hal::hal::MmioRegisters;
//!
//! // SAFETY: BAR0 stays mapped for the device lifetime.
//! let regs = unsafe { MmioRegisters::new(bar0) };
//! let mut hal = Hal::new(regs, platform_allocator);
//! hal.init()?;
//!
//! let ce = hal.setup(RingType::CeSrc, 1, 0, SrngParams::new(256))?;
//!
//! let mut session = hal.access(ce)?;
//! if let Some(slot) = session.next_free() {
//!     CeSrcDesc::new(buf_paddr, len, transfer_id, false).write(slot)?;
//! }
//! session.end();
//! ```
//!
//! # Memory Requirements
//!
//! Coherent memory comes from the caller's [`CoherentAllocator`](hal::CoherentAllocator):
//! - Pointer blocks: 704 + 192 bytes at [`Hal::init`]
//! - One descriptor arena per ring: `entry size * entries`

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in clippy.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod descriptor;
pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::access::AccessSession;
pub use driver::config::{RingFlags, SrngInfo, SrngParams};
pub use driver::error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, Result};
pub use driver::hal::{Hal, Srng};
pub use driver::srng::SrngState;
pub use internal::pointer_store::PointerStore;
pub use internal::ring_config;
pub use internal::ring_config::{RingDirection, RingId, RingType, RingTypeConfig};

// Re-export descriptor types
pub use descriptor::{
    BufferAddrInfo, CeDescKind, CeDstDesc, CeDstStatusDesc, CeSrcDesc, DescriptorLayout,
    WbmReleaseDesc,
};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedHal;
