//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for exercising the SRNG engine
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::ptr::NonNull;
use std::boxed::Box;
use std::collections::HashMap;
use std::vec;
use std::vec::Vec;

use spin::Mutex;

use crate::hal::{CoherentAllocator, DmaRegion, RegisterIo};

// =============================================================================
// Mock Register Window
// =============================================================================

/// Mock register window for testing ring programming without hardware
///
/// Unwritten registers read as zero. Every write is logged in order.
/// Lock-backed so a device over it can be shared between test threads.
///
/// # Example
///
/// ```ignore
/// let regs = MockRegisters::new();
/// regs.set(0x00a3_8000, 0x1234);
/// assert_eq!(regs.read32(0x00a3_8000), 0x1234);
/// ```
#[derive(Debug, Default)]
pub struct MockRegisters {
    /// Register values: offset -> value
    registers: Mutex<HashMap<u32, u32>>,
    /// Record of writes: (offset, value)
    write_log: Mutex<Vec<(u32, u32)>>,
}

impl MockRegisters {
    /// Create a new mock register window
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a register value without logging a write
    pub fn set(&self, offset: u32, value: u32) {
        self.registers.lock().insert(offset, value);
    }

    /// Current value of a register, `None` if never written
    pub fn get(&self, offset: u32) -> Option<u32> {
        self.registers.lock().get(&offset).copied()
    }

    /// Get all writes that have been made
    pub fn get_writes(&self) -> Vec<(u32, u32)> {
        self.write_log.lock().clone()
    }

    /// Writes made to one register, oldest first
    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        self.write_log
            .lock()
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Clear the write log
    pub fn clear_writes(&self) {
        self.write_log.lock().clear();
    }
}

impl RegisterIo for MockRegisters {
    fn read32(&self, offset: u32) -> u32 {
        self.get(offset).unwrap_or(0)
    }

    fn write32(&self, offset: u32, value: u32) {
        self.registers.lock().insert(offset, value);
        self.write_log.lock().push((offset, value));
    }
}

// =============================================================================
// Mock Coherent Allocator
// =============================================================================

/// Physical address handed out for the first allocation. Above 4 GiB so the
/// high address fields are always exercised.
pub const MOCK_PADDR_BASE: u64 = 0x1_2000_0000;

/// Heap-backed coherent allocator
///
/// Each region is a leaked boxed word slice; `free_coherent` reclaims it.
/// Physical addresses are synthetic and never overlap.
#[derive(Debug)]
pub struct MockAllocator {
    next_paddr: u64,
    /// Live allocations: paddr -> byte length
    live: HashMap<u64, usize>,
    /// Fail every allocation once this many have succeeded
    fail_after: Option<usize>,
    allocations: usize,
    frees: usize,
}

impl Default for MockAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAllocator {
    /// Create an allocator that never fails
    pub fn new() -> Self {
        Self {
            next_paddr: MOCK_PADDR_BASE,
            live: HashMap::new(),
            fail_after: None,
            allocations: 0,
            frees: 0,
        }
    }

    /// Fail every allocation after `count` successful ones
    pub fn fail_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Number of regions not yet freed
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of successful allocations so far
    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// Number of frees so far
    pub fn free_count(&self) -> usize {
        self.frees
    }

    /// Allocate a region directly, for buffers the engine is handed by the
    /// caller (scatter buffers, caller-owned ring arenas).
    pub fn region(&mut self, size: usize) -> DmaRegion {
        self.alloc_coherent(size)
            .expect("mock allocator exhausted")
    }
}

impl CoherentAllocator for MockAllocator {
    fn alloc_coherent(&mut self, size: usize) -> Option<DmaRegion> {
        if self.fail_after.is_some_and(|limit| self.allocations >= limit) {
            return None;
        }

        let words = size.div_ceil(4).max(1);
        let backing: Box<[u32]> = vec![0u32; words].into_boxed_slice();
        let ptr = NonNull::new(Box::into_raw(backing).cast::<u32>())?;

        let paddr = self.next_paddr;
        // 4 KiB aligned, one guard page between regions
        self.next_paddr += ((words as u64 * 4).div_ceil(0x1000) + 1) * 0x1000;
        self.live.insert(paddr, size);
        self.allocations += 1;

        // SAFETY: the boxed slice is 4-byte aligned, `words * 4 >= size`
        // bytes long and only reachable through this region until freed.
        Some(unsafe { DmaRegion::from_raw_parts(ptr, paddr, size) })
    }

    fn free_coherent(&mut self, region: DmaRegion) {
        let Some(size) = self.live.remove(&region.paddr()) else {
            panic!("free of unknown region at {:#x}", region.paddr());
        };
        assert_eq!(size, region.len(), "free with mismatched length");

        let words = size.div_ceil(4).max(1);
        let raw = core::ptr::slice_from_raw_parts_mut(region.vaddr().as_ptr(), words);
        // SAFETY: `raw` is exactly the boxed slice leaked in `alloc_coherent`.
        drop(unsafe { Box::from_raw(raw) });
        self.frees += 1;
    }
}

impl Drop for MockAllocator {
    fn drop(&mut self) {
        // Leaks are test failures, but a panicking test must not double panic
        if !std::thread::panicking() && !self.live.is_empty() {
            panic!("{} coherent regions leaked", self.live.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_registers_log_writes() {
        let regs = MockRegisters::new();
        regs.set(0x10, 5);
        regs.write32(0x20, 7);
        regs.modify32(0x10, |v| v | 0x100);

        assert_eq!(regs.read32(0x10), 0x105);
        assert_eq!(regs.read32(0x30), 0);
        assert_eq!(regs.get_writes(), vec![(0x20, 7), (0x10, 0x105)]);
        assert_eq!(regs.writes_to(0x20), vec![7]);
    }

    #[test]
    fn mock_allocator_hands_out_distinct_high_regions() {
        let mut alloc = MockAllocator::new();
        let a = alloc.region(64);
        let b = alloc.region(16);

        assert!(a.paddr() > u64::from(u32::MAX));
        assert_ne!(a.paddr(), b.paddr());
        assert_eq!(a.words(), 16);
        assert!(a.as_words().iter().all(|&w| w == 0));

        alloc.free_coherent(a);
        alloc.free_coherent(b);
        assert_eq!(alloc.live_count(), 0);
        assert_eq!(alloc.free_count(), 2);
    }

    #[test]
    fn mock_allocator_fails_on_demand() {
        let mut alloc = MockAllocator::new().fail_after(1);
        let a = alloc.alloc_coherent(8).unwrap();
        assert!(alloc.alloc_coherent(8).is_none());
        alloc.free_coherent(a);
    }
}
