//! Descriptor bit field constants.
//!
//! Masks are positioned within their 32-bit word; use
//! [`field_prep`](crate::internal::register::field_prep) /
//! [`field_get`](crate::internal::register::field_get) to move values in
//! and out.

use crate::internal::register::genmask;

// =============================================================================
// Copy Engine Source Descriptor
// =============================================================================

/// CE source descriptor word 1: buffer address info
pub mod ce_src_addr_info {
    use super::genmask;

    /// Buffer address bits 39:32
    pub const ADDR_HI: u32 = genmask(7, 0);
    /// Byte swap the payload
    pub const BYTE_SWAP: u32 = 1 << 8;
    /// More fragments of this transfer follow
    pub const GATHER: u32 = 1 << 11;
    /// Transfer length in bytes
    pub const LEN: u32 = genmask(31, 16);
}

/// CE source descriptor word 2: meta info
pub mod ce_src_meta_info {
    use super::genmask;

    /// Caller-defined transfer id
    pub const DATA: u32 = genmask(15, 0);
}

// =============================================================================
// Copy Engine Destination Descriptor
// =============================================================================

/// CE destination descriptor word 1: buffer address info
pub mod ce_dest_addr_info {
    use super::genmask;

    /// Buffer address bits 39:32
    pub const ADDR_HI: u32 = genmask(7, 0);
}

// =============================================================================
// Copy Engine Destination Status Descriptor
// =============================================================================

/// CE destination status word 0: flags
pub mod ce_dst_status_flags {
    use super::genmask;

    /// Toeplitz hash computed
    pub const HASH_EN: u32 = 1 << 8;
    /// Payload was byte swapped
    pub const BYTE_SWAP: u32 = 1 << 9;
    /// Destination byte swap
    pub const DEST_SWAP: u32 = 1 << 10;
    /// More fragments of this transfer follow
    pub const GATHER: u32 = 1 << 11;
    /// Received length in bytes
    pub const LEN: u32 = genmask(31, 16);
}

/// CE destination status word 3: meta info
pub mod ce_dst_status_meta_info {
    use super::genmask;

    /// Transfer id echoed from the source descriptor
    pub const DATA: u32 = genmask(7, 0);
}

/// Ring id / loop count word shared by all CE layouts (last word)
pub mod ce_loop {
    use super::genmask;

    /// Ring id the engine stamps
    pub const RING_ID: u32 = genmask(27, 20);
    /// Pass counter the engine stamps
    pub const LOOP_CNT: u32 = genmask(31, 28);
}

// =============================================================================
// Buffer Address Info
// =============================================================================

/// Buffer address info word 0
pub mod buffer_addr_info0 {
    use super::genmask;

    /// Buffer address bits 31:0
    pub const ADDR: u32 = genmask(31, 0);
}

/// Buffer address info word 1
pub mod buffer_addr_info1 {
    use super::genmask;

    /// Buffer address bits 39:32
    pub const ADDR: u32 = genmask(7, 0);
    /// Return buffer manager
    pub const RET_BUF_MGR: u32 = genmask(10, 8);
    /// Host cookie
    pub const SW_COOKIE: u32 = genmask(31, 11);
}

// =============================================================================
// WBM Release Descriptor
// =============================================================================

/// WBM release descriptor word 2
pub mod wbm_release_info0 {
    use super::genmask;

    /// Module that released the buffer
    pub const REL_SRC_MODULE: u32 = genmask(2, 0);
    /// Buffer manager action
    pub const BM_ACTION: u32 = genmask(5, 3);
    /// Buffer or link descriptor
    pub const DESC_TYPE: u32 = genmask(8, 6);
}

/// Return buffer manager of link descriptors (WBM idle list)
pub const RBM_WBM_IDLE_DESC_LIST: u8 = 1;
