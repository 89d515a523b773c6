//! ISR-safe device wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::driver::hal::Hal;
use crate::hal::{CoherentAllocator, RegisterIo};

/// ISR-safe [`Hal`] wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, disabling interrupts
/// for the duration of the closure. Keep the closures short: an access
/// session opened inside one is ended before interrupts come back on.
///
/// # Example
///
/// ```ignore
/// static HAL: SharedHal<MmioRegisters, PoolAllocator> =
///     SharedHal::new(unsafe { MmioRegisters::new(WCSS_BASE) }, PoolAllocator::new());
///
/// HAL.with(|hal| hal.init())?;
///
/// #[interrupt]
/// fn CE_IRQ() {
///     HAL.with(|hal| {
///         if let Ok(mut session) = hal.access(ce_status) {
///             while let Some(desc) = session.pop_next_mut() {
///                 handle(desc);
///             }
///         }
///     });
/// }
/// ```
pub struct SharedHal<R: RegisterIo, A: CoherentAllocator> {
    inner: CriticalSectionCell<Hal<R, A>>,
}

impl<R: RegisterIo, A: CoherentAllocator> SharedHal<R, A> {
    /// Create a new shared instance (const, suitable for static initialization).
    pub const fn new(regs: R, alloc: A) -> Self {
        Self {
            inner: CriticalSectionCell::new(Hal::new(regs, alloc)),
        }
    }

    /// Execute a closure with exclusive access to the device.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut Hal<R, A>) -> T,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Hal<R, A>) -> T,
    {
        self.inner.try_with(f)
    }

    /// Unwrap the device
    pub fn into_inner(self) -> Hal<R, A> {
        self.inner.into_inner()
    }
}
