//! Coherent memory region shared with the offload engine.

use core::ptr::NonNull;
use core::sync::atomic::AtomicU32;

/// One coherent allocation: CPU pointer, bus (physical) address and length.
///
/// The region is an owned arena. Everything inside the crate reaches it
/// through bounds-checked word indices; raw pointer arithmetic stays here.
#[derive(Debug)]
pub struct DmaRegion {
    /// CPU-visible start of the region
    vaddr: NonNull<u32>,
    /// Address the offload engine uses for the same memory
    paddr: u64,
    /// Length in bytes
    len: usize,
}

// SAFETY: a DmaRegion is the unique CPU-side owner of its memory
// (`from_raw_parts` contract), so moving it across threads is sound.
unsafe impl Send for DmaRegion {}

impl DmaRegion {
    /// Wrap a coherent allocation.
    ///
    /// # Safety
    ///
    /// - `vaddr` must be 4-byte aligned and valid for reads and writes of
    ///   `len` bytes until the region is handed back to its allocator.
    /// - No other CPU-side path may access the memory while this value
    ///   exists. The device may, which is the point.
    #[must_use]
    pub const unsafe fn from_raw_parts(vaddr: NonNull<u32>, paddr: u64, len: usize) -> Self {
        Self { vaddr, paddr, len }
    }

    /// CPU pointer to the first word
    #[inline(always)]
    #[must_use]
    pub const fn vaddr(&self) -> NonNull<u32> {
        self.vaddr
    }

    /// Bus address of the first word
    #[inline(always)]
    #[must_use]
    pub const fn paddr(&self) -> u64 {
        self.paddr
    }

    /// Length in bytes
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the region is zero-sized
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of whole 32-bit words in the region
    #[inline(always)]
    #[must_use]
    pub const fn words(&self) -> usize {
        self.len / 4
    }

    /// Bus address of the word at `index`
    #[inline(always)]
    #[must_use]
    pub const fn paddr_of_word(&self, index: usize) -> u64 {
        self.paddr + (index as u64) * 4
    }

    /// The region as a word slice
    #[inline]
    pub fn as_words(&self) -> &[u32] {
        // SAFETY: `from_raw_parts` guarantees alignment, validity and
        // exclusive CPU-side ownership for `len` bytes.
        unsafe { core::slice::from_raw_parts(self.vaddr.as_ptr(), self.words()) }
    }

    /// The region as a mutable word slice
    #[inline]
    pub fn as_words_mut(&mut self) -> &mut [u32] {
        // SAFETY: as in `as_words`; `&mut self` makes the borrow unique.
        unsafe { core::slice::from_raw_parts_mut(self.vaddr.as_ptr(), self.words()) }
    }

    /// Zero every word
    pub fn zero(&mut self) {
        self.as_words_mut().fill(0);
    }

    /// View the word at `index` as an atomic, for slots the device also
    /// reads or writes.
    #[inline]
    pub(crate) fn atomic_word(&self, index: usize) -> Option<&AtomicU32> {
        if index >= self.words() {
            return None;
        }
        // SAFETY: index is in bounds, the pointer is 4-byte aligned and
        // AtomicU32 has the same layout as u32.
        Some(unsafe { &*self.vaddr.as_ptr().add(index).cast::<AtomicU32>() })
    }
}
