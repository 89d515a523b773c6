//! Hardware Abstraction Layer
//!
//! The SRNG engine never touches the bus or the platform allocator directly.
//! Both are external collaborators expressed as traits:
//!
//! - [`RegisterIo`]: 32-bit register reads/writes at device-relative offsets
//! - [`CoherentAllocator`]: DMA-visible memory shared with the offload engine
//!
//! # Modules
//!
//! - [`mmio`]: Volatile [`RegisterIo`] over a memory-mapped register window
//! - [`region`]: [`DmaRegion`], one coherent allocation
//!
//! # Example
//!
//! ```ignore
//! use srng_hal::hal::{MmioRegisters, RegisterIo};
//!
//! // SAFETY: the window is mapped for the device lifetime.
//! let regs = unsafe { MmioRegisters::new(bar0_base) };
//! let misc = regs.read32(0x00a4_4520);
//! ```

pub mod mmio;
pub mod region;

pub use mmio::MmioRegisters;
pub use region::DmaRegion;

// =============================================================================
// Register Transport Trait
// =============================================================================

/// Trait for device register access
///
/// Offsets are byte addresses relative to the device's register window.
/// Methods take `&self` because the transport owns whatever interior
/// mutability the bus requires; rings on different cores share one
/// transport.
pub trait RegisterIo {
    /// Read a 32-bit register
    fn read32(&self, offset: u32) -> u32;

    /// Write a 32-bit register
    fn write32(&self, offset: u32, value: u32);

    /// Read-modify-write a 32-bit register
    #[inline]
    fn modify32<F>(&self, offset: u32, f: F)
    where
        F: FnOnce(u32) -> u32,
        Self: Sized,
    {
        let value = self.read32(offset);
        self.write32(offset, f(value));
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    #[inline]
    fn read32(&self, offset: u32) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write32(&self, offset: u32, value: u32) {
        (**self).write32(offset, value);
    }
}

// =============================================================================
// Coherent Allocator Trait
// =============================================================================

/// Trait for coherent (DMA-visible) memory allocation
///
/// Returned regions must be visible to the offload engine at
/// [`DmaRegion::paddr`] without cache maintenance.
pub trait CoherentAllocator {
    /// Allocate `size` bytes of coherent memory, `None` when exhausted
    fn alloc_coherent(&mut self, size: usize) -> Option<DmaRegion>;

    /// Return a region obtained from [`alloc_coherent`](Self::alloc_coherent)
    fn free_coherent(&mut self, region: DmaRegion);
}

impl<T: CoherentAllocator + ?Sized> CoherentAllocator for &mut T {
    #[inline]
    fn alloc_coherent(&mut self, size: usize) -> Option<DmaRegion> {
        (**self).alloc_coherent(size)
    }

    #[inline]
    fn free_coherent(&mut self, region: DmaRegion) {
        (**self).free_coherent(region);
    }
}
