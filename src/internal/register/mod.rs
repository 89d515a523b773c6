//! Register map of the offload engine's ring control blocks
//!
//! All offsets are byte offsets relative to the device register window and
//! are handed to [`RegisterIo`](crate::hal::RegisterIo) unchanged.
//!
//! Each ring owns two register groups:
//! - **R0**: configuration (base address, size, id, interrupts, misc)
//! - **R2**: the head/tail pointer registers
//!
//! The per-block modules carry the group start offsets and the field masks:
//! - [`reo`]: receive reorder rings; destination-ring field layout
//! - [`tcl`]: transmit classifier rings; source-ring field layout
//! - [`ce`]: copy engine rings
//! - [`wbm`]: buffer manager release and idle-link rings, scatter list

pub mod ce;
pub mod reo;
pub mod tcl;
pub mod wbm;

// =============================================================================
// Block Base Offsets
// =============================================================================

/// REO (receive reorder) block base
pub const SEQ_WCSS_UMAC_REO_REG: u32 = 0x00a3_8000;
/// TCL (transmit classifier) block base
pub const SEQ_WCSS_UMAC_TCL_REG: u32 = 0x00a4_4000;
/// Copy engine 0 source ring block
pub const SEQ_WCSS_UMAC_CE0_SRC_REG: u32 = 0x00a0_0000;
/// Copy engine 0 destination ring block
pub const SEQ_WCSS_UMAC_CE0_DST_REG: u32 = 0x00a0_1000;
/// Copy engine 1 source ring block
pub const SEQ_WCSS_UMAC_CE1_SRC_REG: u32 = 0x00a0_2000;
/// Copy engine 1 destination ring block
pub const SEQ_WCSS_UMAC_CE1_DST_REG: u32 = 0x00a0_3000;
/// WBM (buffer manager) block base
pub const SEQ_WCSS_UMAC_WBM_REG: u32 = 0x00a3_4000;

// =============================================================================
// Address Split
// =============================================================================

/// Mask of the low address register half
pub const ADDR_LSB_REG_MASK: u64 = 0xffff_ffff;
/// Shift of the high address register half
pub const ADDR_MSB_REG_SHIFT: u32 = 32;

/// Low 32 bits of a bus address
#[inline(always)]
pub const fn addr_lo(paddr: u64) -> u32 {
    (paddr & ADDR_LSB_REG_MASK) as u32
}

/// Bits above 32 of a bus address, before field masking
#[inline(always)]
pub const fn addr_hi(paddr: u64) -> u32 {
    (paddr >> ADDR_MSB_REG_SHIFT) as u32
}

// =============================================================================
// Field Helpers
// =============================================================================

/// Place `value` into the contiguous bit field described by `mask`.
///
/// Bits of `value` that do not fit the field are dropped.
#[inline(always)]
pub const fn field_prep(mask: u32, value: u32) -> u32 {
    value.wrapping_shl(mask.trailing_zeros()) & mask
}

/// Extract the contiguous bit field described by `mask` from `reg`.
#[inline(always)]
pub const fn field_get(mask: u32, reg: u32) -> u32 {
    (reg & mask) >> mask.trailing_zeros()
}

/// Contiguous bit mask covering bits `low..=high`.
#[inline(always)]
pub const fn genmask(high: u32, low: u32) -> u32 {
    (u32::MAX >> (31 - high)) & (u32::MAX << low)
}
