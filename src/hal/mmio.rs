//! Volatile register transport over a memory-mapped window.

use super::RegisterIo;

/// [`RegisterIo`] backed by a memory-mapped register window.
///
/// Every access is a single volatile 32-bit load or store at
/// `base + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioRegisters {
    base: usize,
}

impl MmioRegisters {
    /// Create a transport for the window starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be 4-byte aligned and the whole register window must stay
    /// mapped for as long as this value (or any copy) is used. Every offset
    /// later passed to [`RegisterIo`] methods must fall inside the window.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the register window
    #[inline(always)]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterIo for MmioRegisters {
    #[inline(always)]
    fn read32(&self, offset: u32) -> u32 {
        // SAFETY: `new` guarantees the window is mapped and aligned.
        unsafe { core::ptr::read_volatile((self.base + offset as usize) as *const u32) }
    }

    #[inline(always)]
    fn write32(&self, offset: u32, value: u32) {
        // SAFETY: `new` guarantees the window is mapped and aligned.
        unsafe { core::ptr::write_volatile((self.base + offset as usize) as *mut u32, value) }
    }
}
