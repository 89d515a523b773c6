//! Ring configuration types

use core::ops::{BitOr, BitOrAssign};

use crate::hal::DmaRegion;

// =============================================================================
// Ring Flags
// =============================================================================

/// Per-ring behavior flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingFlags(u32);

impl RingFlags {
    /// No flags
    pub const NONE: Self = Self(0);
    /// Byte swap MSI data
    pub const MSI_SWAP: Self = Self(1 << 3);
    /// Byte swap descriptor payload
    pub const DATA_TLV_SWAP: Self = Self(1 << 4);
    /// Byte swap the shared ring pointers
    pub const RING_PTR_SWAP: Self = Self(1 << 5);
    /// Raise an MSI on threshold crossings
    pub const MSI_INTR: Self = Self(1 << 17);
    /// Per-radio ring; set by setup, pointers go through the write block
    pub const LMAC_RING: Self = Self(1 << 30);
    /// Interrupt when free entries drop below the low threshold
    pub const LOW_THRESH_INTR_EN: Self = Self(1 << 31);

    /// Swap flags forced on big-endian hosts
    pub const HOST_SWAP: Self =
        Self(Self::MSI_SWAP.0 | Self::DATA_TLV_SWAP.0 | Self::RING_PTR_SWAP.0);

    /// Build from raw bits
    #[inline(always)]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits
    #[inline(always)]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every flag in `other` is set
    #[inline(always)]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of both flag sets
    #[inline(always)]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for RingFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for RingFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// =============================================================================
// Setup Parameters
// =============================================================================

/// Ring setup parameters
///
/// ```ignore
/// let params = SrngParams::new(512)
///     .with_intr_batch_threshold(16)
///     .with_intr_timer_threshold_us(256)
///     .with_msi(msi_addr, msi_data);
/// ```
#[derive(Debug, Default)]
pub struct SrngParams {
    /// Number of descriptors in the ring
    pub num_entries: u32,
    /// Caller-owned descriptor memory; allocated by setup when `None`
    pub ring_base: Option<DmaRegion>,
    /// Interrupt after this many entries
    pub intr_batch_cntr_thres_entries: u32,
    /// Interrupt after this many microseconds
    pub intr_timer_thres_us: u32,
    /// Source rings: low-watermark in entries
    pub low_threshold: u32,
    /// MSI target address
    pub msi_addr: u64,
    /// MSI payload
    pub msi_data: u32,
    /// Copy engine destination rings: receive buffer length
    pub max_buffer_len: u32,
    /// Behavior flags
    pub flags: RingFlags,
}

impl SrngParams {
    /// Parameters for a ring of `num_entries` descriptors
    #[must_use]
    pub const fn new(num_entries: u32) -> Self {
        Self {
            num_entries,
            ring_base: None,
            intr_batch_cntr_thres_entries: 0,
            intr_timer_thres_us: 0,
            low_threshold: 0,
            msi_addr: 0,
            msi_data: 0,
            max_buffer_len: 0,
            flags: RingFlags::NONE,
        }
    }

    /// Use caller-owned descriptor memory.
    ///
    /// The ring owns the region from setup on and frees it through the
    /// device allocator on deinit.
    #[must_use]
    pub fn with_ring_base(mut self, region: DmaRegion) -> Self {
        self.ring_base = Some(region);
        self
    }

    /// Set the interrupt batch threshold in entries
    #[must_use]
    pub const fn with_intr_batch_threshold(mut self, entries: u32) -> Self {
        self.intr_batch_cntr_thres_entries = entries;
        self
    }

    /// Set the interrupt timer threshold in microseconds
    #[must_use]
    pub const fn with_intr_timer_threshold_us(mut self, us: u32) -> Self {
        self.intr_timer_thres_us = us;
        self
    }

    /// Set the low threshold and enable its interrupt
    #[must_use]
    pub const fn with_low_threshold(mut self, entries: u32) -> Self {
        self.low_threshold = entries;
        self.flags = self.flags.union(RingFlags::LOW_THRESH_INTR_EN);
        self
    }

    /// Deliver interrupts as MSI writes of `data` to `addr`
    #[must_use]
    pub const fn with_msi(mut self, addr: u64, data: u32) -> Self {
        self.msi_addr = addr;
        self.msi_data = data;
        self.flags = self.flags.union(RingFlags::MSI_INTR);
        self
    }

    /// Set the copy engine receive buffer length
    #[must_use]
    pub const fn with_max_buffer_len(mut self, len: u32) -> Self {
        self.max_buffer_len = len;
        self
    }

    /// Add behavior flags
    #[must_use]
    pub const fn with_flags(mut self, flags: RingFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }
}

// =============================================================================
// Ring Info
// =============================================================================

/// Snapshot of a configured ring, as handed to firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SrngInfo {
    /// Bus address of the descriptor memory
    pub ring_base_paddr: u64,
    /// Number of descriptors
    pub num_entries: u32,
    /// Descriptor size in words
    pub entry_size: u32,
    /// Interrupt timer threshold in microseconds
    pub intr_timer_thres_us: u32,
    /// Interrupt batch threshold in entries
    pub intr_batch_cntr_thres_entries: u32,
    /// Source rings: low threshold in words
    pub low_threshold: u32,
    /// Effective flags after setup
    pub flags: RingFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine() {
        let flags = RingFlags::MSI_SWAP | RingFlags::DATA_TLV_SWAP;
        assert!(flags.contains(RingFlags::MSI_SWAP));
        assert!(!flags.contains(RingFlags::HOST_SWAP));

        let mut all = flags;
        all |= RingFlags::RING_PTR_SWAP;
        assert!(all.contains(RingFlags::HOST_SWAP));
        assert_eq!(RingFlags::from_bits(all.bits()), all);
    }

    #[test]
    fn params_builder_sets_interrupt_flags() {
        let params = SrngParams::new(64)
            .with_intr_batch_threshold(8)
            .with_intr_timer_threshold_us(100)
            .with_low_threshold(4)
            .with_msi(0x1_0000_0040, 0xAB);

        assert_eq!(params.num_entries, 64);
        assert_eq!(params.intr_batch_cntr_thres_entries, 8);
        assert_eq!(params.intr_timer_thres_us, 100);
        assert_eq!(params.low_threshold, 4);
        assert_eq!(params.msi_addr, 0x1_0000_0040);
        assert!(params.flags.contains(RingFlags::MSI_INTR));
        assert!(params.flags.contains(RingFlags::LOW_THRESH_INTR_EN));
        assert!(params.ring_base.is_none());
    }

    #[test]
    fn params_default_is_empty() {
        let params = SrngParams::default();
        assert_eq!(params.num_entries, 0);
        assert_eq!(params.flags, RingFlags::NONE);
    }
}
