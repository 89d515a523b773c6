//! WBM (buffer manager) registers: release rings, idle-link ring and the
//! idle-link scatter list.

use super::genmask;

// =============================================================================
// Ring Groups (relative to SEQ_WCSS_UMAC_WBM_REG)
// =============================================================================

/// SW2WBM release ring base LSB
pub const RELEASE_RING_BASE_LSB: u32 = 0x0000_01d8;
/// Idle-link ring base LSB
pub const IDLE_LINK_RING_BASE_LSB: u32 = 0x0000_0860;
/// WBM2SW0 release ring base LSB
pub const WBM0_RELEASE_RING_BASE_LSB: u32 = 0x0000_0910;
/// WBM2SW1 release ring base LSB
pub const WBM1_RELEASE_RING_BASE_LSB: u32 = 0x0000_0968;

/// SW2WBM release ring head pointer
pub const RELEASE_RING_HP: u32 = 0x0000_3018;
/// Idle-link ring head pointer
pub const IDLE_LINK_RING_HP: u32 = 0x0000_30b0;
/// WBM2SW0 release ring head pointer
pub const WBM0_RELEASE_RING_HP: u32 = 0x0000_30c0;
/// WBM2SW1 release ring head pointer
pub const WBM1_RELEASE_RING_HP: u32 = 0x0000_30c8;

// =============================================================================
// Idle-Link Scatter List Registers (relative to SEQ_WCSS_UMAC_WBM_REG)
// =============================================================================

/// Idle list control (scatter buffer size, list mode)
pub const R0_IDLE_LIST_CONTROL_ADDR: u32 = 0x0000_0048;
/// Idle list size
pub const R0_IDLE_LIST_SIZE_ADDR: u32 = 0x0000_004c;
/// Scattered ring base LSB
pub const SCATTERED_RING_BASE_LSB: u32 = 0x0000_0058;
/// Scattered ring base MSB / match tag
pub const SCATTERED_RING_BASE_MSB: u32 = 0x0000_005c;
/// Head pointer info, address LSB
pub const SCATTERED_DESC_PTR_HEAD_INFO_IX0: u32 = 0x0000_0068;
/// Head pointer info, address MSB / offset
pub const SCATTERED_DESC_PTR_HEAD_INFO_IX1: u32 = 0x0000_006c;
/// Tail pointer info, address LSB
pub const SCATTERED_DESC_PTR_TAIL_INFO_IX0: u32 = 0x0000_0078;
/// Tail pointer info, address MSB / offset
pub const SCATTERED_DESC_PTR_TAIL_INFO_IX1: u32 = 0x0000_007c;
/// Head pointer (in link-descriptor units)
pub const SCATTERED_DESC_PTR_HP_ADDR: u32 = 0x0000_0084;
/// Idle-link ring misc register
pub const IDLE_LINK_RING_MISC_ADDR: u32 = 0x0000_0870;

// =============================================================================
// Idle-Link Scatter List Fields
// =============================================================================

/// Scatter buffer size in 64-byte units
pub const SCATTER_BUFFER_SIZE: u32 = genmask(10, 2);
/// Idle list mode: link descriptors come from a scatter list
pub const LINK_DESC_IDLE_LIST_MODE: u32 = 1 << 1;
/// Total scatter list size in 64-byte units
pub const SCATTER_RING_SIZE_OF_IDLE_LINK_DESC_LIST: u32 = genmask(31, 16);
/// Address bits 39:32
pub const SCATTERED_DESC_MSB_BASE_ADDR_39_32: u32 = genmask(7, 0);
/// Address match tag
pub const SCATTERED_DESC_MSB_BASE_ADDR_MATCH_TAG: u32 = genmask(31, 8);
/// Head pointer word offset within its buffer
pub const SCATTERED_DESC_HEAD_P_OFFSET_IX1: u32 = genmask(20, 8);
/// Tail pointer word offset within its buffer
pub const SCATTERED_DESC_TAIL_P_OFFSET_IX1: u32 = genmask(20, 8);

/// Match tag the engine expects in every scatter link word
pub const BASE_ADDR_MATCH_TAG_VAL: u32 = 0x5;

/// Idle-link misc register value enabling the ring
pub const IDLE_LINK_RING_ENABLE: u32 = 0x40;

/// Largest scatter buffer the engine accepts, in bytes
pub const IDLE_SCATTER_BUF_SIZE_MAX: usize = 32704;
/// Bytes reserved at the end of each scatter buffer for the next-buffer link
pub const IDLE_SCATTER_NEXT_PTR_SIZE: usize = 8;
/// Usable bytes of each scatter buffer
pub const IDLE_SCATTER_BUF_SIZE: usize = IDLE_SCATTER_BUF_SIZE_MAX - IDLE_SCATTER_NEXT_PTR_SIZE;
