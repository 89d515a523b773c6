//! REO (receive reorder) ring registers.
//!
//! The REO1 ring layout is the template every destination ring follows:
//! destination rings program their R0 group at the `RING_*_OFFSET`s below
//! regardless of which block they live in.

use super::genmask;

// =============================================================================
// R0 Group Start Offsets (relative to SEQ_WCSS_UMAC_REO_REG)
// =============================================================================

/// SW2REO (reinject) ring base LSB
pub const SW2REO_RING_BASE_LSB: u32 = 0x0000_01ec;
/// REO command ring base LSB
pub const REO_CMD_RING_BASE_LSB: u32 = 0x0000_0194;
/// REO1 (REO2SW1) ring base LSB
pub const REO1_RING_BASE_LSB: u32 = 0x0000_029c;
/// REO2 (REO2SW2) ring base LSB
pub const REO2_RING_BASE_LSB: u32 = 0x0000_02f4;
/// REO2TCL (exception) ring base LSB
pub const REO_TCL_RING_BASE_LSB: u32 = 0x0000_03fc;
/// REO status ring base LSB
pub const REO_STATUS_RING_BASE_LSB: u32 = 0x0000_0504;

// =============================================================================
// R2 Group Start Offsets (relative to SEQ_WCSS_UMAC_REO_REG)
// =============================================================================

/// REO command ring head pointer
pub const REO_CMD_HP: u32 = 0x0000_3020;
/// SW2REO ring head pointer
pub const SW2REO_RING_HP: u32 = 0x0000_3028;
/// REO1 ring head pointer
pub const REO1_RING_HP: u32 = 0x0000_3038;
/// REO1 ring tail pointer
pub const REO1_RING_TP: u32 = 0x0000_303c;
/// REO2 ring head pointer
pub const REO2_RING_HP: u32 = 0x0000_3040;
/// REO2TCL ring head pointer
pub const REO_TCL_RING_HP: u32 = 0x0000_3058;
/// REO status ring head pointer
pub const REO_STATUS_HP: u32 = 0x0000_3070;

// =============================================================================
// Destination Ring R0 Offsets (relative to the ring's R0 base)
// =============================================================================

/// Base address MSB / ring size
pub const RING_BASE_MSB_OFFSET: u32 = 0x04;
/// Ring id / entry size
pub const RING_ID_OFFSET: u32 = 0x08;
/// Misc control (swap bits, enable)
pub const RING_MISC_OFFSET: u32 = 0x10;
/// Head pointer shadow address LSB
pub const RING_HP_ADDR_LSB_OFFSET: u32 = 0x14;
/// Head pointer shadow address MSB
pub const RING_HP_ADDR_MSB_OFFSET: u32 = 0x18;
/// Producer interrupt setup
pub const RING_PRODUCER_INT_SETUP_OFFSET: u32 = 0x24;
/// MSI1 base address LSB
pub const RING_MSI1_BASE_LSB_OFFSET: u32 = 0x48;
/// MSI1 base address MSB
pub const RING_MSI1_BASE_MSB_OFFSET: u32 = 0x4c;
/// MSI1 data
pub const RING_MSI1_DATA_OFFSET: u32 = 0x50;

/// Tail pointer register, relative to the head pointer register (R2)
pub const RING_TP_OFFSET: u32 = REO1_RING_TP - REO1_RING_HP;

// =============================================================================
// Destination Ring Field Masks
// =============================================================================

/// Base address MSB register fields
pub mod base_msb {
    use super::genmask;

    /// Address bits 39:32
    pub const RING_BASE_ADDR_MSB: u32 = genmask(7, 0);
    /// Ring size in words
    pub const RING_SIZE: u32 = genmask(27, 8);
}

/// Ring id register fields
pub mod ring_id {
    use super::genmask;

    /// Entry size in words
    pub const ENTRY_SIZE: u32 = genmask(7, 0);
    /// Ring id
    pub const RING_ID: u32 = genmask(15, 8);
}

/// Producer interrupt setup fields
pub mod prdr_int_setup {
    use super::genmask;

    /// Batch counter threshold in words
    pub const BATCH_COUNTER_THOLD: u32 = genmask(14, 0);
    /// Interrupt timer threshold in units of 8 us
    pub const INTR_TMR_THOLD: u32 = genmask(31, 16);
}

/// MSI1 base MSB fields
pub mod msi1_base_msb {
    use super::genmask;

    /// MSI address bits 39:32
    pub const ADDR: u32 = genmask(7, 0);
    /// MSI enable
    pub const MSI1_ENABLE: u32 = 1 << 8;
}

/// Misc register bits
pub mod misc {
    /// Swap TLV payload bytes
    pub const DATA_TLV_SWAP: u32 = 1 << 3;
    /// Swap host/firmware pointer words
    pub const HOST_FW_SWAP: u32 = 1 << 4;
    /// Swap MSI data
    pub const MSI_SWAP: u32 = 1 << 5;
    /// Ring enable
    pub const SRNG_ENABLE: u32 = 1 << 6;
}
