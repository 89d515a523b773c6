//! Ring access session
//!
//! Every descriptor operation happens inside a begin/end bracket with the
//! ring lock held. [`AccessSession`] is that bracket:
//!
//! - creating it (see [`Hal::access`](super::hal::Hal::access)) takes the
//!   ring lock and loads the engine's pointer once
//! - the operations work against that cached copy, so a batch of calls
//!   costs one shared-memory read
//! - [`end`](AccessSession::end), or dropping the session, publishes the
//!   host pointer and releases the lock
//!
//! # Ordering
//!
//! The peer load is `Acquire`, so descriptor words the engine wrote before
//! moving its pointer are visible. The publish is a `Release` store (memory
//! slot) or a `Release` fence followed by the register write, so every
//! descriptor the host filled is visible before the engine sees the new
//! pointer.

use core::sync::atomic::{Ordering, fence};

use spin::MutexGuard;

use crate::driver::srng::{PublishTarget, SrngState};
use crate::hal::RegisterIo;
use crate::internal::pointer_store::PointerStore;
use crate::internal::ring_config::{RingDirection, RingId};

/// Locked access bracket over one ring
///
/// Source operations on a destination ring (and the reverse) return `None`
/// or 0.
pub struct AccessSession<'a, R: RegisterIo> {
    guard: MutexGuard<'a, SrngState>,
    store: &'a PointerStore,
    regs: &'a R,
    ended: bool,
}

impl<'a, R: RegisterIo> AccessSession<'a, R> {
    /// Start a session: refresh the cached peer pointer
    pub(crate) fn begin(
        mut guard: MutexGuard<'a, SrngState>,
        store: &'a PointerStore,
        regs: &'a R,
    ) -> Self {
        let peer = store.read_ptr(guard.peer_slot);
        guard.refresh(peer);
        Self {
            guard,
            store,
            regs,
            ended: false,
        }
    }

    /// Ring id
    #[inline]
    #[must_use]
    pub fn ring_id(&self) -> RingId {
        self.guard.ring_id()
    }

    /// Producer side of the ring
    #[inline]
    #[must_use]
    pub fn direction(&self) -> RingDirection {
        self.guard.direction()
    }

    /// Read-only view of the ring state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &SrngState {
        &self.guard
    }

    // =========================================================================
    // Destination operations
    // =========================================================================

    /// Next entry to consume, without consuming it
    #[inline]
    pub fn peek(&self) -> Option<&[u32]> {
        self.guard.dst_peek()
    }

    /// Consume the next entry
    #[inline]
    pub fn pop_next(&mut self) -> Option<&[u32]> {
        self.guard.dst_next()
    }

    /// Consume the next entry, allowing in-place updates (e.g. clearing a
    /// status field before the slot is recycled)
    #[inline]
    pub fn pop_next_mut(&mut self) -> Option<&mut [u32]> {
        self.guard.dst_next_mut()
    }

    /// Loop count the engine stamps on descriptors of the current pass
    #[inline]
    #[must_use]
    pub fn expected_loop_count(&self) -> Option<u32> {
        self.guard.dst_loop_cnt()
    }

    // =========================================================================
    // Source operations
    // =========================================================================

    /// Claim the next free slot for filling
    #[inline]
    pub fn next_free(&mut self) -> Option<&mut [u32]> {
        self.guard.src_next()
    }

    /// Next free slot, without claiming it
    #[inline]
    pub fn peek_free(&self) -> Option<&[u32]> {
        self.guard.src_peek()
    }

    /// Advance the reap cursor over the next slot the engine has consumed
    #[inline]
    pub fn reap_next(&mut self) -> Option<&mut [u32]> {
        self.guard.src_reap_next()
    }

    /// Hand the oldest reaped slot back to the producer
    #[inline]
    pub fn take_reaped(&mut self) -> Option<&[u32]> {
        self.guard.src_next_reaped()
    }

    // =========================================================================
    // Either direction
    // =========================================================================

    /// Free slots (source) or pending entries (destination).
    ///
    /// With `sync` the engine pointer is reloaded first and the cache
    /// updated; otherwise the value loaded at session start is used.
    pub fn free_slots(&mut self, sync: bool) -> u32 {
        let live = sync.then(|| self.store.read_ptr(self.guard.peer_slot));
        match self.guard.direction() {
            RingDirection::Source => self.guard.src_num_free(live),
            RingDirection::Destination => self.guard.dst_num_valid(live),
        }
    }

    /// Publish the host pointer and release the ring
    pub fn end(mut self) {
        self.publish();
    }

    fn publish(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;

        let local = self.guard.local_ptr();
        match self.guard.publish {
            PublishTarget::Memory(slot) => self.store.set_write_ptr(slot, local),
            PublishTarget::Register(offset) => {
                fence(Ordering::Release);
                self.regs.write32(offset, local);
            }
        }
    }
}

impl<R: RegisterIo> Drop for AccessSession<'_, R> {
    fn drop(&mut self) {
        self.publish();
    }
}

impl<R: RegisterIo> core::fmt::Debug for AccessSession<'_, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessSession")
            .field("ring_id", &self.guard.ring_id())
            .field("local_ptr", &self.guard.local_ptr())
            .field("cached_peer_ptr", &self.guard.cached_peer_ptr())
            .finish()
    }
}
