//! Centralized Constants
//!
//! A single place for the numbers callers size their allocations and ring
//! plans around.
//!
//! # Organization
//!
//! - **Ring id space**: how ring ids are numbered and how many there are
//! - **Pointer store**: sizes of the shared pointer blocks
//! - **Idle-link scatter list**: scatter buffer geometry
//!
//! # Note
//!
//! Register offsets and bit fields stay private to the crate; ring ids of
//! individual ring types are in [`ring_config::id`](crate::ring_config::id).

pub use crate::internal::register::wbm::{
    IDLE_SCATTER_BUF_SIZE, IDLE_SCATTER_BUF_SIZE_MAX, IDLE_SCATTER_NEXT_PTR_SIZE,
};
pub use crate::internal::ring_config::{
    NUM_LMAC_RINGS, NUM_LMACS, RING_ID_MAX, RING_SIZE_MAX, RINGS_PER_LMAC,
};

// =============================================================================
// Ring Id Space
// =============================================================================

/// First per-radio ring id
pub const LMAC_RING_ID_START: u32 = crate::internal::ring_config::id::LMAC1_ID_START;

/// Last ring id of the shared (non per-radio) blocks
pub const UMAC_RING_ID_END: u32 = crate::internal::ring_config::id::UMAC_ID_END;

// =============================================================================
// Pointer Store
// =============================================================================

/// Bytes per pointer slot
pub const POINTER_SLOT_SIZE: usize = core::mem::size_of::<u32>();

/// Size of the read-pointer block, one slot per ring id
pub const READ_POINTER_BLOCK_SIZE: usize = RING_ID_MAX as usize * POINTER_SLOT_SIZE;

/// Size of the write-pointer block, one slot per per-radio ring
pub const WRITE_POINTER_BLOCK_SIZE: usize = NUM_LMAC_RINGS as usize * POINTER_SLOT_SIZE;

// =============================================================================
// Idle-Link Scatter List
// =============================================================================

/// Link descriptor size in bytes
pub const LINK_DESC_SIZE: usize = 8;

/// Link descriptors that fit in one scatter buffer
pub const LINK_DESCS_PER_SCATTER_BUF: usize = IDLE_SCATTER_BUF_SIZE / LINK_DESC_SIZE;
