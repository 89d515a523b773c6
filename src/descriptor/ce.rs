//! Copy engine descriptors.

use super::bits::{
    ce_dest_addr_info, ce_dst_status_flags, ce_dst_status_meta_info, ce_loop, ce_src_addr_info,
    ce_src_meta_info,
};
use super::{DescriptorLayout, words, words_mut};
use crate::driver::error::DmaResult;
use crate::internal::register::{addr_hi, addr_lo, field_get, field_prep};

/// Copy engine descriptor kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CeDescKind {
    /// Source ring descriptor
    Src,
    /// Destination ring (receive buffer) descriptor
    Dst,
    /// Destination status ring descriptor
    DstStatus,
}

/// Size in bytes of a copy engine descriptor
#[must_use]
pub fn ce_desc_size(kind: CeDescKind) -> usize {
    match kind {
        CeDescKind::Src => CeSrcDesc::size_bytes(),
        CeDescKind::Dst => CeDstDesc::size_bytes(),
        CeDescKind::DstStatus => CeDstStatusDesc::size_bytes(),
    }
}

#[inline(always)]
fn join_addr(lo: u32, hi: u32) -> u64 {
    u64::from(lo) | (u64::from(hi) << 32)
}

// =============================================================================
// Source
// =============================================================================

/// Copy engine source descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CeSrcDesc {
    /// Buffer bus address (40 bits)
    pub paddr: u64,
    /// Transfer length in bytes
    pub len: u16,
    /// Caller-defined transfer id
    pub meta: u16,
    /// Byte swap the payload
    pub byte_swap: bool,
    /// More fragments follow
    pub gather: bool,
    /// Engine-stamped ring id, decoded only
    pub ring_id: u8,
    /// Engine-stamped loop count, decoded only
    pub loop_cnt: u8,
}

impl CeSrcDesc {
    /// Single-fragment transfer of `len` bytes at `paddr`
    #[must_use]
    pub const fn new(paddr: u64, len: u16, id: u16, byte_swap: bool) -> Self {
        Self {
            paddr,
            len,
            meta: id,
            byte_swap,
            gather: false,
            ring_id: 0,
            loop_cnt: 0,
        }
    }
}

/// Encoding fills words 0-2; word 3 belongs to the engine and is left as is.
impl DescriptorLayout for CeSrcDesc {
    const WORDS: usize = 4;

    fn write(&self, desc: &mut [u32]) -> DmaResult<()> {
        let w = words_mut::<4>(desc)?;
        w[0] = addr_lo(self.paddr);
        w[1] = field_prep(ce_src_addr_info::ADDR_HI, addr_hi(self.paddr))
            | field_prep(ce_src_addr_info::BYTE_SWAP, u32::from(self.byte_swap))
            | field_prep(ce_src_addr_info::GATHER, u32::from(self.gather))
            | field_prep(ce_src_addr_info::LEN, u32::from(self.len));
        w[2] = field_prep(ce_src_meta_info::DATA, u32::from(self.meta));
        Ok(())
    }

    fn read(desc: &[u32]) -> DmaResult<Self> {
        let w = words::<4>(desc)?;
        Ok(Self {
            paddr: join_addr(w[0], field_get(ce_src_addr_info::ADDR_HI, w[1])),
            len: field_get(ce_src_addr_info::LEN, w[1]) as u16,
            meta: field_get(ce_src_meta_info::DATA, w[2]) as u16,
            byte_swap: w[1] & ce_src_addr_info::BYTE_SWAP != 0,
            gather: w[1] & ce_src_addr_info::GATHER != 0,
            ring_id: field_get(ce_loop::RING_ID, w[3]) as u8,
            loop_cnt: field_get(ce_loop::LOOP_CNT, w[3]) as u8,
        })
    }
}

// =============================================================================
// Destination
// =============================================================================

/// Copy engine destination (receive buffer) descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CeDstDesc {
    /// Buffer bus address (40 bits)
    pub paddr: u64,
    /// Engine-stamped ring id
    pub ring_id: u8,
    /// Engine-stamped loop count
    pub loop_cnt: u8,
}

impl CeDstDesc {
    /// Receive buffer at `paddr`
    #[must_use]
    pub const fn new(paddr: u64) -> Self {
        Self {
            paddr,
            ring_id: 0,
            loop_cnt: 0,
        }
    }
}

impl DescriptorLayout for CeDstDesc {
    const WORDS: usize = 2;

    fn write(&self, desc: &mut [u32]) -> DmaResult<()> {
        let w = words_mut::<2>(desc)?;
        w[0] = addr_lo(self.paddr);
        w[1] = field_prep(ce_dest_addr_info::ADDR_HI, addr_hi(self.paddr))
            | field_prep(ce_loop::RING_ID, u32::from(self.ring_id))
            | field_prep(ce_loop::LOOP_CNT, u32::from(self.loop_cnt));
        Ok(())
    }

    fn read(desc: &[u32]) -> DmaResult<Self> {
        let w = words::<2>(desc)?;
        Ok(Self {
            paddr: join_addr(w[0], field_get(ce_dest_addr_info::ADDR_HI, w[1])),
            ring_id: field_get(ce_loop::RING_ID, w[1]) as u8,
            loop_cnt: field_get(ce_loop::LOOP_CNT, w[1]) as u8,
        })
    }
}

// =============================================================================
// Destination Status
// =============================================================================

/// Copy engine destination status descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CeDstStatusDesc {
    /// Received length in bytes
    pub len: u16,
    /// Toeplitz hash computed
    pub hash_en: bool,
    /// Payload was byte swapped
    pub byte_swap: bool,
    /// Destination byte swap
    pub dest_swap: bool,
    /// More fragments follow
    pub gather: bool,
    /// Transfer id echoed from the source descriptor
    pub meta: u8,
    /// Engine-stamped ring id
    pub ring_id: u8,
    /// Engine-stamped loop count
    pub loop_cnt: u8,
}

impl CeDstStatusDesc {
    /// Read the received length and clear it, so a slot the engine has not
    /// rewritten yet reads as empty on the next pass.
    pub fn take_length(desc: &mut [u32]) -> DmaResult<u32> {
        let flags: *mut u32 = &mut words_mut::<4>(desc)?[0];
        // SAFETY: `flags` comes from a live, aligned, exclusive borrow of the slot.
        let val = unsafe {
            let val = core::ptr::read_volatile(flags);
            core::ptr::write_volatile(flags, val & !ce_dst_status_flags::LEN);
            val
        };
        Ok(field_get(ce_dst_status_flags::LEN, val))
    }
}

impl DescriptorLayout for CeDstStatusDesc {
    const WORDS: usize = 4;

    fn write(&self, desc: &mut [u32]) -> DmaResult<()> {
        let w = words_mut::<4>(desc)?;
        w[0] = field_prep(ce_dst_status_flags::HASH_EN, u32::from(self.hash_en))
            | field_prep(ce_dst_status_flags::BYTE_SWAP, u32::from(self.byte_swap))
            | field_prep(ce_dst_status_flags::DEST_SWAP, u32::from(self.dest_swap))
            | field_prep(ce_dst_status_flags::GATHER, u32::from(self.gather))
            | field_prep(ce_dst_status_flags::LEN, u32::from(self.len));
        w[1] = 0;
        w[2] = 0;
        w[3] = field_prep(ce_dst_status_meta_info::DATA, u32::from(self.meta))
            | field_prep(ce_loop::RING_ID, u32::from(self.ring_id))
            | field_prep(ce_loop::LOOP_CNT, u32::from(self.loop_cnt));
        Ok(())
    }

    fn read(desc: &[u32]) -> DmaResult<Self> {
        let w = words::<4>(desc)?;
        Ok(Self {
            len: field_get(ce_dst_status_flags::LEN, w[0]) as u16,
            hash_en: w[0] & ce_dst_status_flags::HASH_EN != 0,
            byte_swap: w[0] & ce_dst_status_flags::BYTE_SWAP != 0,
            dest_swap: w[0] & ce_dst_status_flags::DEST_SWAP != 0,
            gather: w[0] & ce_dst_status_flags::GATHER != 0,
            meta: field_get(ce_dst_status_meta_info::DATA, w[3]) as u8,
            ring_id: field_get(ce_loop::RING_ID, w[3]) as u8,
            loop_cnt: field_get(ce_loop::LOOP_CNT, w[3]) as u8,
        })
    }
}
