//! TCL (transmit classifier) ring registers.
//!
//! The TCL1 ring layout is the template every source ring follows.

use super::genmask;

// =============================================================================
// R0 Group Start Offsets (relative to SEQ_WCSS_UMAC_TCL_REG)
// =============================================================================

/// TCL1 (SW2TCL1) ring base LSB
pub const TCL1_RING_BASE_LSB: u32 = 0x0000_0510;
/// TCL2 (SW2TCL2) ring base LSB
pub const TCL2_RING_BASE_LSB: u32 = 0x0000_0568;
/// TCL command ring base LSB
pub const TCL_RING_BASE_LSB: u32 = 0x0000_0618;
/// TCL status ring base LSB
pub const TCL_STATUS_RING_BASE_LSB: u32 = 0x0000_0720;

// =============================================================================
// R2 Group Start Offsets (relative to SEQ_WCSS_UMAC_TCL_REG)
// =============================================================================

/// TCL1 ring head pointer
pub const TCL1_RING_HP: u32 = 0x0000_2000;
/// TCL1 ring tail pointer
pub const TCL1_RING_TP: u32 = 0x0000_2004;
/// TCL2 ring head pointer
pub const TCL2_RING_HP: u32 = 0x0000_2008;
/// TCL command ring head pointer
pub const TCL_RING_HP: u32 = 0x0000_2018;
/// TCL status ring head pointer
pub const TCL_STATUS_RING_HP: u32 = 0x0000_2030;

// =============================================================================
// Source Ring R0 Offsets (relative to the ring's R0 base)
// =============================================================================

/// Base address MSB / ring size
pub const RING_BASE_MSB_OFFSET: u32 = 0x04;
/// Ring id / entry size
pub const RING_ID_OFFSET: u32 = 0x08;
/// Misc control (swap bits, loop count, enable)
pub const RING_MISC_OFFSET: u32 = 0x10;
/// Tail pointer shadow address LSB
pub const RING_TP_ADDR_LSB_OFFSET: u32 = 0x1c;
/// Tail pointer shadow address MSB
pub const RING_TP_ADDR_MSB_OFFSET: u32 = 0x20;
/// Consumer interrupt setup 0 (timer, batch)
pub const RING_CONSR_INT_SETUP_IX0_OFFSET: u32 = 0x30;
/// Consumer interrupt setup 1 (low threshold)
pub const RING_CONSR_INT_SETUP_IX1_OFFSET: u32 = 0x34;
/// MSI1 base address LSB
pub const RING_MSI1_BASE_LSB_OFFSET: u32 = 0x48;
/// MSI1 base address MSB
pub const RING_MSI1_BASE_MSB_OFFSET: u32 = 0x4c;
/// MSI1 data
pub const RING_MSI1_DATA_OFFSET: u32 = 0x50;

/// Tail pointer register, relative to the head pointer register (R2)
pub const RING_TP_OFFSET: u32 = TCL1_RING_TP - TCL1_RING_HP;

// =============================================================================
// Source Ring Field Masks
// =============================================================================

/// Base address MSB register fields
pub mod base_msb {
    use super::genmask;

    /// Address bits 39:32
    pub const RING_BASE_ADDR_MSB: u32 = genmask(7, 0);
    /// Ring size in words
    pub const RING_SIZE: u32 = genmask(27, 8);
}

/// Consumer interrupt setup fields
pub mod consr_int_setup {
    use super::genmask;

    /// IX0: batch counter threshold in words
    pub const IX0_BATCH_COUNTER_THOLD: u32 = genmask(14, 0);
    /// IX0: interrupt timer threshold in microseconds
    pub const IX0_INTR_TMR_THOLD: u32 = genmask(31, 16);
    /// IX1: low threshold in words
    pub const IX1_LOW_THOLD: u32 = genmask(15, 0);
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
    /// Loop count is not maintained for source rings
    pub const MSI_LOOPCNT_DISABLE: u32 = 1 << 1;
    /// Swap MSI data
    pub const MSI_SWAP: u32 = 1 << 3;
    /// Swap host/firmware pointer words
    pub const HOST_FW_SWAP: u32 = 1 << 4;
    /// Swap TLV payload bytes
    pub const DATA_TLV_SWAP: u32 = 1 << 5;
    /// Ring enable
    pub const SRNG_ENABLE: u32 = 1 << 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tcl_ring_stride_is_uniform() {
        assert_eq!(TCL2_RING_BASE_LSB - TCL1_RING_BASE_LSB, 0x58);
        assert_eq!(TCL2_RING_HP - TCL1_RING_HP, 8);
        assert_eq!(RING_TP_OFFSET, 4);
    }

    #[test]
    fn misc_bits_are_distinct() {
        let bits = [
            misc::MSI_LOOPCNT_DISABLE,
            misc::MSI_SWAP,
            misc::HOST_FW_SWAP,
            misc::DATA_TLV_SWAP,
            misc::SRNG_ENABLE,
        ];
        let combined = bits.iter().fold(0, |acc, b| acc | b);
        assert_eq!(combined.count_ones() as usize, bits.len());
    }
}
