//! Copy engine ring registers.
//!
//! Each copy engine has a source block and a destination block; the
//! destination block also hosts the destination-status ring.

use super::{
    SEQ_WCSS_UMAC_CE0_DST_REG, SEQ_WCSS_UMAC_CE0_SRC_REG, SEQ_WCSS_UMAC_CE1_DST_REG,
    SEQ_WCSS_UMAC_CE1_SRC_REG, genmask,
};

/// Ring base LSB inside a CE block (source and destination rings)
pub const DST_RING_BASE_LSB: u32 = 0x0000_0000;
/// Destination-status ring base LSB inside a CE destination block
pub const DST_STATUS_RING_BASE_LSB: u32 = 0x0000_0058;
/// Destination control register, relative to the destination ring's R0
pub const DST_RING_CTRL: u32 = 0x0000_00b0;
/// Ring head pointer inside a CE block
pub const DST_RING_HP: u32 = 0x0000_0400;
/// Destination-status ring head pointer inside a CE destination block
pub const DST_STATUS_RING_HP: u32 = 0x0000_0408;

/// Distance between consecutive copy engine destination blocks
pub const CE_BLOCK_STRIDE: u32 = SEQ_WCSS_UMAC_CE1_DST_REG - SEQ_WCSS_UMAC_CE0_DST_REG;
/// Distance between consecutive copy engine source blocks
pub const CE_SRC_BLOCK_STRIDE: u32 = SEQ_WCSS_UMAC_CE1_SRC_REG - SEQ_WCSS_UMAC_CE0_SRC_REG;

/// Max receive buffer length in the destination control register
pub const DST_R0_DEST_CTRL_MAX_LEN: u32 = genmask(15, 0);
