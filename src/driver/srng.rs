//! Ring instance state and pointer arithmetic
//!
//! A ring is a contiguous arena of `num_entries` descriptors of
//! `entry_size` words each. Both sides track positions as word offsets
//! into the arena, always a multiple of `entry_size` and below
//! `ring_size = entry_size * num_entries`. Ring sizes are not powers of two,
//! so every advance wraps with `%`.
//!
//! Source rings reserve one slot: `hp + entry_size == tp` means full, so at
//! most `num_entries - 1` entries are outstanding and `hp == tp` always
//! means empty.
//!
//! Nothing here touches shared memory or registers. The peer pointer is
//! passed in by [`AccessSession`](super::access::AccessSession), which owns
//! the refresh/publish bracket.

use crate::driver::config::{RingFlags, SrngParams};
use crate::hal::DmaRegion;
use crate::internal::ring_config::{RingDirection, RingId, RingType};

/// Where the host's own pointer is published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PublishTarget {
    /// Write-pointer block slot, read by firmware (per-radio rings)
    Memory(usize),
    /// Engine register at this offset
    Register(u32),
}

/// Source ring cursors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SrcRing {
    /// Next slot the host fills
    pub(crate) hp: u32,
    /// Engine tail as of the last refresh
    pub(crate) cached_tp: u32,
    /// Last slot handed out for reaping
    pub(crate) reap_hp: u32,
    /// Low watermark in words
    pub(crate) low_threshold: u32,
}

/// Destination ring cursors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DstRing {
    /// Next slot the host consumes
    pub(crate) tp: u32,
    /// Engine head as of the last refresh
    pub(crate) cached_hp: u32,
    /// Loop count the engine stamps on descriptors of the current pass
    pub(crate) loop_cnt: u32,
}

/// Direction-specific cursors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cursors {
    Src(SrcRing),
    Dst(DstRing),
}

/// One configured ring
#[derive(Debug)]
pub struct SrngState {
    pub(crate) ring_id: RingId,
    pub(crate) ring_type: RingType,
    pub(crate) arena: DmaRegion,
    pub(crate) entry_size: u32,
    pub(crate) num_entries: u32,
    pub(crate) ring_size: u32,
    pub(crate) flags: RingFlags,
    pub(crate) intr_batch_cntr_thres_entries: u32,
    pub(crate) intr_timer_thres_us: u32,
    pub(crate) msi_addr: u64,
    pub(crate) msi_data: u32,
    pub(crate) max_buffer_length: u32,
    /// R0 and R2 register group bases
    pub(crate) hwreg_base: [u32; 2],
    /// Read-pointer block slot the engine updates
    pub(crate) peer_slot: usize,
    pub(crate) publish: PublishTarget,
    pub(crate) cursors: Cursors,
}

impl SrngState {
    /// Fresh, empty ring over `arena`.
    ///
    /// The arena is zeroed. `arena` must hold at least
    /// `entry_size * params.num_entries` words; setup checks this.
    pub(crate) fn new(
        ring_id: RingId,
        ring_type: RingType,
        mut arena: DmaRegion,
        params: &SrngParams,
        hwreg_base: [u32; 2],
        publish: PublishTarget,
    ) -> Self {
        let config = ring_type.config();
        let entry_size = config.entry_size;
        let ring_size = entry_size * params.num_entries;

        arena.zero();

        let mut flags = params.flags;
        if cfg!(target_endian = "big") {
            flags |= RingFlags::HOST_SWAP;
        }
        if config.lmac_ring {
            flags |= RingFlags::LMAC_RING;
        }

        let cursors = match config.direction {
            RingDirection::Source => Cursors::Src(SrcRing {
                hp: 0,
                cached_tp: 0,
                reap_hp: ring_size - entry_size,
                low_threshold: params.low_threshold * entry_size,
            }),
            // The engine stamps 1 on the first pass; descriptors start at 0
            RingDirection::Destination => Cursors::Dst(DstRing {
                tp: 0,
                cached_hp: 0,
                loop_cnt: 1,
            }),
        };

        Self {
            ring_id,
            ring_type,
            arena,
            entry_size,
            num_entries: params.num_entries,
            ring_size,
            flags,
            intr_batch_cntr_thres_entries: params.intr_batch_cntr_thres_entries,
            intr_timer_thres_us: params.intr_timer_thres_us,
            msi_addr: params.msi_addr,
            msi_data: params.msi_data,
            max_buffer_length: params.max_buffer_len,
            hwreg_base,
            peer_slot: ring_id.index(),
            publish,
            cursors,
        }
    }

    /// Ring id
    #[inline(always)]
    #[must_use]
    pub fn ring_id(&self) -> RingId {
        self.ring_id
    }

    /// Ring type
    #[inline(always)]
    #[must_use]
    pub fn ring_type(&self) -> RingType {
        self.ring_type
    }

    /// Producer side
    #[inline(always)]
    #[must_use]
    pub fn direction(&self) -> RingDirection {
        match self.cursors {
            Cursors::Src(_) => RingDirection::Source,
            Cursors::Dst(_) => RingDirection::Destination,
        }
    }

    /// Descriptor size in words
    #[inline(always)]
    #[must_use]
    pub fn entry_size(&self) -> u32 {
        self.entry_size
    }

    /// Number of descriptors
    #[inline(always)]
    #[must_use]
    pub fn num_entries(&self) -> u32 {
        self.num_entries
    }

    /// Ring size in words
    #[inline(always)]
    #[must_use]
    pub fn ring_size(&self) -> u32 {
        self.ring_size
    }

    /// Effective flags
    #[inline(always)]
    #[must_use]
    pub fn flags(&self) -> RingFlags {
        self.flags
    }

    /// Host-owned pointer: head for source rings, tail for destination rings
    #[inline]
    #[must_use]
    pub fn local_ptr(&self) -> u32 {
        match self.cursors {
            Cursors::Src(src) => src.hp,
            Cursors::Dst(dst) => dst.tp,
        }
    }

    /// Engine-owned pointer as of the last refresh
    #[inline]
    #[must_use]
    pub fn cached_peer_ptr(&self) -> u32 {
        match self.cursors {
            Cursors::Src(src) => src.cached_tp,
            Cursors::Dst(dst) => dst.cached_hp,
        }
    }

    /// Store a freshly loaded peer pointer
    #[inline]
    pub(crate) fn refresh(&mut self, peer: u32) {
        match &mut self.cursors {
            Cursors::Src(src) => src.cached_tp = peer,
            Cursors::Dst(dst) => dst.cached_hp = peer,
        }
    }

    #[inline(always)]
    fn advance(&self, offset: u32) -> u32 {
        (offset + self.entry_size) % self.ring_size
    }

    fn entry(&self, offset: u32) -> Option<&[u32]> {
        let start = offset as usize;
        self.arena
            .as_words()
            .get(start..start + self.entry_size as usize)
    }

    fn entry_mut(&mut self, offset: u32) -> Option<&mut [u32]> {
        let start = offset as usize;
        let end = start + self.entry_size as usize;
        self.arena.as_words_mut().get_mut(start..end)
    }

    // =========================================================================
    // Destination ring
    // =========================================================================

    /// Entry at the tail without consuming it
    pub(crate) fn dst_peek(&self) -> Option<&[u32]> {
        let Cursors::Dst(dst) = self.cursors else {
            return None;
        };
        if dst.tp == dst.cached_hp {
            return None;
        }
        self.entry(dst.tp)
    }

    /// Tail offset of the next entry to consume, advancing the tail
    fn dst_take(&mut self) -> Option<u32> {
        let Cursors::Dst(dst) = self.cursors else {
            return None;
        };
        if dst.tp == dst.cached_hp {
            return None;
        }
        let next = self.advance(dst.tp);
        if let Cursors::Dst(dst) = &mut self.cursors {
            dst.tp = next;
        }
        Some(dst.tp)
    }

    /// Consume the entry at the tail
    pub(crate) fn dst_next(&mut self) -> Option<&[u32]> {
        let offset = self.dst_take()?;
        self.entry(offset)
    }

    /// Consume the entry at the tail, mutably
    pub(crate) fn dst_next_mut(&mut self) -> Option<&mut [u32]> {
        let offset = self.dst_take()?;
        self.entry_mut(offset)
    }

    /// Entries the engine has produced and the host has not consumed.
    ///
    /// `live_hp` replaces the cached head when present.
    pub(crate) fn dst_num_valid(&mut self, live_hp: Option<u32>) -> u32 {
        let ring_size = self.ring_size;
        let entry_size = self.entry_size;
        let Cursors::Dst(dst) = &mut self.cursors else {
            return 0;
        };
        if let Some(hp) = live_hp {
            dst.cached_hp = hp;
        }

        let (hp, tp) = (dst.cached_hp, dst.tp);
        let words = if hp >= tp {
            hp - tp
        } else {
            ring_size - tp + hp
        };
        words / entry_size
    }

    // =========================================================================
    // Source ring
    // =========================================================================

    /// Claim the slot at the head for filling
    pub(crate) fn src_next(&mut self) -> Option<&mut [u32]> {
        let Cursors::Src(src) = self.cursors else {
            return None;
        };
        let next = self.advance(src.hp);
        if next == src.cached_tp {
            return None;
        }
        if let Cursors::Src(src) = &mut self.cursors {
            src.hp = next;
            src.reap_hp = next;
        }
        self.entry_mut(src.hp)
    }

    /// Slot at the head if one is free, without claiming it
    pub(crate) fn src_peek(&self) -> Option<&[u32]> {
        let Cursors::Src(src) = self.cursors else {
            return None;
        };
        if self.advance(src.hp) == src.cached_tp {
            return None;
        }
        self.entry(src.hp)
    }

    /// Advance the reap cursor over a slot the engine has finished with
    pub(crate) fn src_reap_next(&mut self) -> Option<&mut [u32]> {
        let Cursors::Src(src) = self.cursors else {
            return None;
        };
        let next = self.advance(src.reap_hp);
        if next == src.cached_tp {
            return None;
        }
        if let Cursors::Src(src) = &mut self.cursors {
            src.reap_hp = next;
        }
        self.entry_mut(next)
    }

    /// Hand a reaped slot back to the producer, advancing the head
    pub(crate) fn src_next_reaped(&mut self) -> Option<&[u32]> {
        let Cursors::Src(src) = self.cursors else {
            return None;
        };
        if src.hp == src.reap_hp {
            return None;
        }
        let next = self.advance(src.hp);
        if let Cursors::Src(src) = &mut self.cursors {
            src.hp = next;
        }
        self.entry(src.hp)
    }

    /// Slots the host may still fill.
    ///
    /// `live_tp` replaces the cached tail when present.
    pub(crate) fn src_num_free(&mut self, live_tp: Option<u32>) -> u32 {
        let ring_size = self.ring_size;
        let entry_size = self.entry_size;
        let Cursors::Src(src) = &mut self.cursors else {
            return 0;
        };
        if let Some(tp) = live_tp {
            src.cached_tp = tp;
        }

        let (hp, tp) = (src.hp, src.cached_tp);
        let words = if tp > hp {
            tp - hp
        } else {
            ring_size - hp + tp
        };
        (words / entry_size).saturating_sub(1)
    }

    /// Expected loop count of destination descriptors
    pub(crate) fn dst_loop_cnt(&self) -> Option<u32> {
        match self.cursors {
            Cursors::Dst(dst) => Some(dst.loop_cnt),
            Cursors::Src(_) => None,
        }
    }

    /// Source low threshold in words
    pub(crate) fn low_threshold(&self) -> u32 {
        match self.cursors {
            Cursors::Src(src) => src.low_threshold,
            Cursors::Dst(_) => 0,
        }
    }

    /// Give the descriptor memory back, consuming the ring
    pub(crate) fn into_arena(self) -> DmaRegion {
        self.arena
    }
}
