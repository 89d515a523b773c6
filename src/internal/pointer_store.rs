//! Shared pointer blocks
//!
//! Two coherent arrays of 32-bit slots exchange ring pointers with the
//! offload engine through memory instead of registers:
//!
//! - the **read-pointer block** has one slot per ring id; the engine writes
//!   its head (destination rings) or tail (source rings) there
//! - the **write-pointer block** has one slot per per-radio ring; the host
//!   publishes its own head/tail there for the firmware to pick up
//!
//! Each slot has exactly one writer. Loads are `Acquire` and stores are
//! `Release`, so descriptor contents written before a pointer store are
//! visible to whoever observes the new pointer.

use core::sync::atomic::Ordering;

use crate::driver::error::{DmaError, DmaResult};
use crate::hal::{CoherentAllocator, DmaRegion};

/// Read-pointer and write-pointer blocks of one device
#[derive(Debug)]
pub struct PointerStore {
    rdp: DmaRegion,
    wrp: DmaRegion,
}

// SAFETY: after `allocate` the blocks are only reached through
// `atomic_word` loads and stores (or plain bus address arithmetic), so
// shared references never produce a data race.
unsafe impl Sync for PointerStore {}

impl PointerStore {
    /// Allocate and zero both blocks.
    ///
    /// If the second allocation fails the first is returned to `alloc`
    /// before the error is reported.
    pub fn allocate<A: CoherentAllocator>(
        alloc: &mut A,
        num_ring_ids: u32,
        num_lmac_slots: u32,
    ) -> DmaResult<Self> {
        let mut rdp = alloc
            .alloc_coherent(slot_bytes(num_ring_ids))
            .ok_or(DmaError::OutOfMemory)?;

        let Some(mut wrp) = alloc.alloc_coherent(slot_bytes(num_lmac_slots)) else {
            alloc.free_coherent(rdp);
            return Err(DmaError::OutOfMemory);
        };

        rdp.zero();
        wrp.zero();
        Ok(Self { rdp, wrp })
    }

    /// Return both blocks to the allocator
    pub fn release<A: CoherentAllocator>(self, alloc: &mut A) {
        alloc.free_coherent(self.rdp);
        alloc.free_coherent(self.wrp);
    }

    /// Number of read-pointer slots
    #[inline(always)]
    #[must_use]
    pub fn read_slots(&self) -> usize {
        self.rdp.words()
    }

    /// Number of write-pointer slots
    #[inline(always)]
    #[must_use]
    pub fn write_slots(&self) -> usize {
        self.wrp.words()
    }

    /// Engine-written pointer of ring `index` (0 when out of range)
    #[inline]
    #[must_use]
    pub fn read_ptr(&self, index: usize) -> u32 {
        self.rdp
            .atomic_word(index)
            .map_or(0, |slot| slot.load(Ordering::Acquire))
    }

    /// Store into a read-pointer slot.
    ///
    /// The engine owns these slots once a ring is live; the host only
    /// clears them during setup. Exposed so loopback and test peers can
    /// play the engine's part.
    #[inline]
    pub fn set_read_ptr(&self, index: usize, value: u32) {
        if let Some(slot) = self.rdp.atomic_word(index) {
            slot.store(value, Ordering::Release);
        }
    }

    /// Host-published pointer of per-radio slot `index` (0 when out of range)
    #[inline]
    #[must_use]
    pub fn write_ptr(&self, index: usize) -> u32 {
        self.wrp
            .atomic_word(index)
            .map_or(0, |slot| slot.load(Ordering::Acquire))
    }

    /// Publish into a write-pointer slot
    #[inline]
    pub fn set_write_ptr(&self, index: usize, value: u32) {
        if let Some(slot) = self.wrp.atomic_word(index) {
            slot.store(value, Ordering::Release);
        }
    }

    /// Bus address of read-pointer slot `index`
    #[inline(always)]
    #[must_use]
    pub fn read_ptr_paddr(&self, index: usize) -> u64 {
        self.rdp.paddr_of_word(index)
    }

    /// Bus address of write-pointer slot `index`
    #[inline(always)]
    #[must_use]
    pub fn write_ptr_paddr(&self, index: usize) -> u64 {
        self.wrp.paddr_of_word(index)
    }
}

#[inline(always)]
const fn slot_bytes(slots: u32) -> usize {
    slots as usize * core::mem::size_of::<u32>()
}
