//! Device context and ring setup.
//!
//! [`Hal`] owns everything one offload engine instance needs:
//!
//! - the register transport and the coherent allocator
//! - the [`PointerStore`] shared with the engine
//! - the ring table, one lock-protected [`SrngState`] slot per ring id
//!
//! Lifecycle: [`new`](Hal::new) → [`init`](Hal::init) →
//! [`setup`](Hal::setup) per ring → [`access`](Hal::access) in steady state
//! → [`deinit`](Hal::deinit) (also run on drop).
//!
//! Setup and teardown take `&mut self`. Access takes `&self` and locks only
//! the ring it touches, so independent rings can be serviced concurrently.
//! For the idle-link scatter list see [`idle_list`](super::idle_list).

use spin::Mutex;

use super::access::AccessSession;
use super::config::{RingFlags, SrngInfo, SrngParams};
use super::error::{ConfigError, DmaError, Error, Result};
use super::srng::{PublishTarget, SrngState};
use crate::hal::{CoherentAllocator, DmaRegion, RegisterIo};
use crate::internal::pointer_store::PointerStore;
use crate::internal::register::{addr_hi, addr_lo, ce, field_prep, reo, tcl};
use crate::internal::ring_config::{
    self, NUM_LMAC_RINGS, REG_GRP_R0, REG_GRP_R2, RING_ID_MAX, RingDirection, RingId, RingType,
    id,
};

/// Lock-protected ring
pub type Srng = Mutex<SrngState>;

const RING_SLOTS: usize = RING_ID_MAX as usize;

// =============================================================================
// Device Context
// =============================================================================

/// SRNG device context
///
/// # Type Parameters
/// * `R` - Register transport
/// * `A` - Coherent allocator for the pointer blocks and ring memory
///
/// # Example
/// ```ignore
/// let mut hal = Hal::new(regs, alloc);
/// hal.init()?;
///
/// let tx = hal.setup(RingType::TclData, 0, 0, SrngParams::new(512))?;
///
/// let mut session = hal.access(tx)?;
/// if let Some(slot) = session.next_free() {
///     slot.copy_from_slice(&tcl_cmd);
/// }
/// session.end();
/// ```
pub struct Hal<R: RegisterIo, A: CoherentAllocator> {
    regs: R,
    alloc: A,
    store: Option<PointerStore>,
    rings: [Option<Srng>; RING_SLOTS],
}

impl<R: RegisterIo, A: CoherentAllocator> Hal<R, A> {
    /// Create an uninitialized context
    pub const fn new(regs: R, alloc: A) -> Self {
        Self {
            regs,
            alloc,
            store: None,
            rings: [const { None }; RING_SLOTS],
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Allocate the shared pointer blocks
    pub fn init(&mut self) -> Result<()> {
        if self.store.is_some() {
            return Err(ConfigError::AlreadyInitialized.into());
        }

        let store = PointerStore::allocate(&mut self.alloc, RING_ID_MAX, NUM_LMAC_RINGS)?;
        self.store = Some(store);
        Ok(())
    }

    /// Whether [`init`](Self::init) has run
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    /// Free every ring and the pointer blocks.
    ///
    /// Rings are not disabled in hardware; quiesce the engine first. A
    /// no-op when not initialized.
    pub fn deinit(&mut self) {
        for slot in &mut self.rings {
            if let Some(srng) = slot.take() {
                self.alloc.free_coherent(srng.into_inner().into_arena());
            }
        }

        if let Some(store) = self.store.take() {
            store.release(&mut self.alloc);
        }
    }

    // =========================================================================
    // Ring Setup
    // =========================================================================

    /// Set up instance `ring_num` of `ring_type` (on radio `mac_id` for
    /// per-radio types) and program the engine.
    ///
    /// Every check runs before anything is allocated or written: on error
    /// the device is unchanged. A caller-supplied ring base is returned to
    /// the allocator if setup fails.
    pub fn setup(
        &mut self,
        ring_type: RingType,
        ring_num: u32,
        mac_id: u32,
        mut params: SrngParams,
    ) -> Result<RingId> {
        let supplied = params.ring_base.take();
        match self.prepare(ring_type, ring_num, mac_id, &params, supplied) {
            Ok((ring_id, arena)) => Ok(self.install(ring_type, ring_num, ring_id, arena, &params)),
            Err((err, supplied)) => {
                if let Some(region) = supplied {
                    self.alloc.free_coherent(region);
                }
                Err(err)
            }
        }
    }

    /// Validate a setup request and obtain the descriptor arena
    fn prepare(
        &mut self,
        ring_type: RingType,
        ring_num: u32,
        mac_id: u32,
        params: &SrngParams,
        supplied: Option<DmaRegion>,
    ) -> core::result::Result<(RingId, DmaRegion), (Error, Option<DmaRegion>)> {
        let ring_id = match ring_config::ring_id(ring_type, ring_num, mac_id) {
            Ok(ring_id) => ring_id,
            Err(err) => return Err((err.into(), supplied)),
        };

        if self.store.is_none() {
            return Err((ConfigError::NotInitialized.into(), supplied));
        }
        if self.rings[ring_id.index()].is_some() {
            return Err((ConfigError::AlreadyInitialized.into(), supplied));
        }

        let config = ring_type.config();
        if params.num_entries == 0 || params.num_entries > config.max_entries() {
            #[cfg(feature = "log")]
            log::warn!(
                "{ring_id}: {} entries out of range 1..={}",
                params.num_entries,
                config.max_entries()
            );
            return Err((ConfigError::InvalidArgument.into(), supplied));
        }

        // Both thresholds are programmed in words
        if params.low_threshold > params.num_entries
            || params
                .intr_batch_cntr_thres_entries
                .checked_mul(config.entry_size)
                .is_none()
        {
            #[cfg(feature = "log")]
            log::warn!(
                "{ring_id}: thresholds out of range (low {}, batch {})",
                params.low_threshold,
                params.intr_batch_cntr_thres_entries
            );
            return Err((ConfigError::InvalidArgument.into(), supplied));
        }

        let ring_bytes = config.entry_bytes() * params.num_entries as usize;
        let arena = match supplied {
            Some(region) if region.len() >= ring_bytes => region,
            Some(region) => return Err((ConfigError::InvalidArgument.into(), Some(region))),
            None => match self.alloc.alloc_coherent(ring_bytes) {
                Some(region) => region,
                None => return Err((DmaError::OutOfMemory.into(), None)),
            },
        };

        Ok((ring_id, arena))
    }

    /// Build the ring state, program the engine and publish the ring
    fn install(
        &mut self,
        ring_type: RingType,
        ring_num: u32,
        ring_id: RingId,
        arena: DmaRegion,
        params: &SrngParams,
    ) -> RingId {
        let config = ring_type.config();

        let hwreg_base = [
            config.reg_start[REG_GRP_R0] + ring_num * config.reg_size[REG_GRP_R0],
            config.reg_start[REG_GRP_R2] + ring_num * config.reg_size[REG_GRP_R2],
        ];

        let publish = if config.lmac_ring {
            PublishTarget::Memory((ring_id.get() - id::LMAC1_ID_START) as usize)
        } else {
            match config.direction {
                RingDirection::Source => PublishTarget::Register(hwreg_base[REG_GRP_R2]),
                RingDirection::Destination => {
                    PublishTarget::Register(hwreg_base[REG_GRP_R2] + reo::RING_TP_OFFSET)
                }
            }
        };

        let srng = SrngState::new(ring_id, ring_type, arena, params, hwreg_base, publish);

        #[cfg(feature = "log")]
        log::debug!(
            "{ring_id}: {ring_type:?} {} x {} words at {:#x}",
            srng.num_entries,
            srng.entry_size,
            srng.arena.paddr()
        );

        // Per-radio rings are programmed by firmware
        if !config.lmac_ring {
            match config.direction {
                RingDirection::Source => self.src_hw_init(&srng),
                RingDirection::Destination => self.dst_hw_init(&srng),
            }

            if ring_type == RingType::CeDst {
                self.ce_dst_setup(&srng);
            }
        }

        self.rings[ring_id.index()] = Some(Mutex::new(srng));
        ring_id
    }

    fn write_msi(&self, srng: &SrngState, lsb: u32, msb: u32, data: u32, enable: u32) {
        let r0 = srng.hwreg_base[REG_GRP_R0];
        self.regs.write32(r0 + lsb, addr_lo(srng.msi_addr));
        self.regs.write32(
            r0 + msb,
            field_prep(reo::msi1_base_msb::ADDR, addr_hi(srng.msi_addr)) | enable,
        );
        self.regs.write32(r0 + data, srng.msi_data);
    }

    fn src_hw_init(&self, srng: &SrngState) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let r0 = srng.hwreg_base[REG_GRP_R0];

        if srng.flags.contains(RingFlags::MSI_INTR) {
            self.write_msi(
                srng,
                tcl::RING_MSI1_BASE_LSB_OFFSET,
                tcl::RING_MSI1_BASE_MSB_OFFSET,
                tcl::RING_MSI1_DATA_OFFSET,
                tcl::msi1_base_msb::MSI1_ENABLE,
            );
        }

        let paddr = srng.arena.paddr();
        self.regs.write32(r0, addr_lo(paddr));
        self.regs.write32(
            r0 + tcl::RING_BASE_MSB_OFFSET,
            field_prep(tcl::base_msb::RING_BASE_ADDR_MSB, addr_hi(paddr))
                | field_prep(tcl::base_msb::RING_SIZE, srng.ring_size),
        );
        self.regs.write32(
            r0 + tcl::RING_ID_OFFSET,
            field_prep(reo::ring_id::ENTRY_SIZE, srng.entry_size),
        );

        // Timer threshold is in microseconds for source rings
        self.regs.write32(
            r0 + tcl::RING_CONSR_INT_SETUP_IX0_OFFSET,
            field_prep(
                tcl::consr_int_setup::IX0_INTR_TMR_THOLD,
                srng.intr_timer_thres_us,
            ) | field_prep(
                tcl::consr_int_setup::IX0_BATCH_COUNTER_THOLD,
                srng.intr_batch_cntr_thres_entries * srng.entry_size,
            ),
        );

        let low = if srng.flags.contains(RingFlags::LOW_THRESH_INTR_EN) {
            field_prep(tcl::consr_int_setup::IX1_LOW_THOLD, srng.low_threshold())
        } else {
            0
        };
        self.regs
            .write32(r0 + tcl::RING_CONSR_INT_SETUP_IX1_OFFSET, low);

        // The idle-link ring tail lives in the scatter list registers
        if srng.ring_id.get() != id::WBM_IDLE_LINK {
            let tp_addr = store.read_ptr_paddr(srng.peer_slot);
            self.regs
                .write32(r0 + tcl::RING_TP_ADDR_LSB_OFFSET, addr_lo(tp_addr));
            self.regs
                .write32(r0 + tcl::RING_TP_ADDR_MSB_OFFSET, addr_hi(tp_addr));
        }

        let r2 = srng.hwreg_base[REG_GRP_R2];
        self.regs.write32(r2, 0);
        self.regs.write32(r2 + tcl::RING_TP_OFFSET, 0);
        store.set_read_ptr(srng.peer_slot, 0);

        let mut misc = tcl::misc::MSI_LOOPCNT_DISABLE | tcl::misc::SRNG_ENABLE;
        if srng.flags.contains(RingFlags::DATA_TLV_SWAP) {
            misc |= tcl::misc::DATA_TLV_SWAP;
        }
        if srng.flags.contains(RingFlags::RING_PTR_SWAP) {
            misc |= tcl::misc::HOST_FW_SWAP;
        }
        if srng.flags.contains(RingFlags::MSI_SWAP) {
            misc |= tcl::misc::MSI_SWAP;
        }
        self.regs.write32(r0 + tcl::RING_MISC_OFFSET, misc);
    }

    fn dst_hw_init(&self, srng: &SrngState) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let r0 = srng.hwreg_base[REG_GRP_R0];

        if srng.flags.contains(RingFlags::MSI_INTR) {
            self.write_msi(
                srng,
                reo::RING_MSI1_BASE_LSB_OFFSET,
                reo::RING_MSI1_BASE_MSB_OFFSET,
                reo::RING_MSI1_DATA_OFFSET,
                reo::msi1_base_msb::MSI1_ENABLE,
            );
        }

        let paddr = srng.arena.paddr();
        self.regs.write32(r0, addr_lo(paddr));
        self.regs.write32(
            r0 + reo::RING_BASE_MSB_OFFSET,
            field_prep(reo::base_msb::RING_BASE_ADDR_MSB, addr_hi(paddr))
                | field_prep(reo::base_msb::RING_SIZE, srng.ring_size),
        );
        self.regs.write32(
            r0 + reo::RING_ID_OFFSET,
            field_prep(reo::ring_id::RING_ID, srng.ring_id.get())
                | field_prep(reo::ring_id::ENTRY_SIZE, srng.entry_size),
        );

        // Timer threshold is in units of 8 us for destination rings
        self.regs.write32(
            r0 + reo::RING_PRODUCER_INT_SETUP_OFFSET,
            field_prep(
                reo::prdr_int_setup::INTR_TMR_THOLD,
                srng.intr_timer_thres_us >> 3,
            ) | field_prep(
                reo::prdr_int_setup::BATCH_COUNTER_THOLD,
                srng.intr_batch_cntr_thres_entries * srng.entry_size,
            ),
        );

        let hp_addr = store.read_ptr_paddr(srng.peer_slot);
        self.regs
            .write32(r0 + reo::RING_HP_ADDR_LSB_OFFSET, addr_lo(hp_addr));
        self.regs
            .write32(r0 + reo::RING_HP_ADDR_MSB_OFFSET, addr_hi(hp_addr));

        let r2 = srng.hwreg_base[REG_GRP_R2];
        self.regs.write32(r2, 0);
        self.regs.write32(r2 + reo::RING_TP_OFFSET, 0);
        store.set_read_ptr(srng.peer_slot, 0);

        let mut misc = reo::misc::SRNG_ENABLE;
        if srng.flags.contains(RingFlags::DATA_TLV_SWAP) {
            misc |= reo::misc::DATA_TLV_SWAP;
        }
        if srng.flags.contains(RingFlags::RING_PTR_SWAP) {
            misc |= reo::misc::HOST_FW_SWAP;
        }
        if srng.flags.contains(RingFlags::MSI_SWAP) {
            misc |= reo::misc::MSI_SWAP;
        }
        self.regs.write32(r0 + reo::RING_MISC_OFFSET, misc);
    }

    /// Program the receive buffer length of a copy engine destination ring
    fn ce_dst_setup(&self, srng: &SrngState) {
        let addr = srng.hwreg_base[REG_GRP_R0] + ce::DST_RING_CTRL;
        let len = srng.max_buffer_length;
        self.regs.modify32(addr, |val| {
            (val & !ce::DST_R0_DEST_CTRL_MAX_LEN) | field_prep(ce::DST_R0_DEST_CTRL_MAX_LEN, len)
        });
    }

    // =========================================================================
    // Ring Access
    // =========================================================================

    /// Ring slot for `ring_id`, `None` when not set up
    #[must_use]
    pub fn srng(&self, ring_id: RingId) -> Option<&Srng> {
        self.rings.get(ring_id.index())?.as_ref()
    }

    fn configured(&self, ring_id: RingId) -> Result<&Srng> {
        if ring_id.get() >= RING_ID_MAX {
            return Err(ConfigError::InvalidRingId.into());
        }
        self.srng(ring_id)
            .ok_or_else(|| ConfigError::NotInitialized.into())
    }

    /// Lock a ring and open an access session.
    ///
    /// Spins while another session on the same ring is open.
    pub fn access(&self, ring_id: RingId) -> Result<AccessSession<'_, R>> {
        let srng = self.configured(ring_id)?;
        let store = self.store.as_ref().ok_or(ConfigError::NotInitialized)?;
        Ok(AccessSession::begin(srng.lock(), store, &self.regs))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Parameters of a configured ring
    pub fn params(&self, ring_id: RingId) -> Result<SrngInfo> {
        let srng = self.configured(ring_id)?.lock();
        Ok(SrngInfo {
            ring_base_paddr: srng.arena.paddr(),
            num_entries: srng.num_entries,
            entry_size: srng.entry_size,
            intr_timer_thres_us: srng.intr_timer_thres_us,
            intr_batch_cntr_thres_entries: srng.intr_batch_cntr_thres_entries,
            low_threshold: srng.low_threshold(),
            flags: srng.flags,
        })
    }

    /// Bus address of a per-radio ring's head pointer slot (0 otherwise)
    pub fn hp_addr(&self, ring_id: RingId) -> Result<u64> {
        self.pointer_addr(ring_id, RingDirection::Source)
    }

    /// Bus address of a per-radio ring's tail pointer slot (0 otherwise)
    pub fn tp_addr(&self, ring_id: RingId) -> Result<u64> {
        self.pointer_addr(ring_id, RingDirection::Destination)
    }

    /// The host-owned pointer sits in the write block, the engine-owned one
    /// in the read block. `host_side` names the direction whose host owns
    /// the requested pointer.
    fn pointer_addr(&self, ring_id: RingId, host_side: RingDirection) -> Result<u64> {
        let srng = self.configured(ring_id)?.lock();
        let store = self.store.as_ref().ok_or(ConfigError::NotInitialized)?;

        if !srng.flags.contains(RingFlags::LMAC_RING) {
            return Ok(0);
        }

        let host_owned = srng.direction() == host_side;
        Ok(match (host_owned, srng.publish) {
            (true, PublishTarget::Memory(slot)) => store.write_ptr_paddr(slot),
            (true, PublishTarget::Register(_)) => 0,
            (false, _) => store.read_ptr_paddr(srng.peer_slot),
        })
    }

    /// Register transport
    #[inline]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// Coherent allocator, for buffers the caller hands to the engine
    #[inline]
    pub fn allocator(&mut self) -> &mut A {
        &mut self.alloc
    }

    /// Shared pointer blocks, `None` before [`init`](Self::init)
    #[inline]
    pub fn pointer_store(&self) -> Option<&PointerStore> {
        self.store.as_ref()
    }

    /// Run `f` on a ring's state with the lock held and no access bracket
    #[cfg(test)]
    pub(crate) fn with_state<T>(&self, ring_id: RingId, f: impl FnOnce(&mut SrngState) -> T) -> T {
        let srng = self.srng(ring_id).expect("ring not set up");
        f(&mut srng.lock())
    }
}

impl<R: RegisterIo, A: CoherentAllocator> Drop for Hal<R, A> {
    fn drop(&mut self) {
        self.deinit();
    }
}

impl<R: RegisterIo, A: CoherentAllocator> core::fmt::Debug for Hal<R, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let configured = self.rings.iter().filter(|r| r.is_some()).count();
        f.debug_struct("Hal")
            .field("initialized", &self.store.is_some())
            .field("rings", &configured)
            .finish()
    }
}

/// Source cursors of a ring, for assertions
#[cfg(test)]
pub(crate) fn src_cursors(state: &SrngState) -> Option<super::srng::SrcRing> {
    use super::srng::Cursors;
    match state.cursors {
        Cursors::Src(src) => Some(src),
        Cursors::Dst(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]
mod tests {
    extern crate std;

    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::descriptor::{BufferAddrInfo, CeDstStatusDesc, DescriptorLayout};
    use crate::internal::register::{
        SEQ_WCSS_UMAC_CE0_DST_REG, SEQ_WCSS_UMAC_REO_REG, SEQ_WCSS_UMAC_TCL_REG,
        SEQ_WCSS_UMAC_WBM_REG, wbm,
    };
    use crate::testing::{MockAllocator, MockRegisters};

    type TestHal<'a> = Hal<&'a MockRegisters, &'a mut MockAllocator>;

    fn hal<'a>(regs: &'a MockRegisters, alloc: &'a mut MockAllocator) -> TestHal<'a> {
        let mut hal = Hal::new(regs, alloc);
        hal.init().unwrap();
        hal
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    #[test]
    fn init_allocates_pointer_blocks_once() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        {
            let mut hal = hal(&regs, &mut alloc);
            assert!(hal.is_initialized());
            assert_eq!(
                hal.init(),
                Err(Error::Config(ConfigError::AlreadyInitialized))
            );
            let store = hal.pointer_store().unwrap();
            assert_eq!(store.read_slots(), RING_ID_MAX as usize);
            assert_eq!(store.write_slots(), NUM_LMAC_RINGS as usize);
        }
        assert_eq!(alloc.allocation_count(), 2);
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn init_reports_out_of_memory() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new().fail_after(1);
        let mut hal = Hal::new(&regs, &mut alloc);
        assert_eq!(hal.init(), Err(Error::Dma(DmaError::OutOfMemory)));
        assert!(!hal.is_initialized());
    }

    #[test]
    fn deinit_without_init_is_noop() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = Hal::new(&regs, &mut alloc);
        hal.deinit();
        hal.deinit();
        assert!(!hal.is_initialized());
    }

    #[test]
    fn deinit_frees_rings_and_blocks() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        {
            let mut hal = hal(&regs, &mut alloc);
            hal.setup(RingType::TclData, 0, 0, SrngParams::new(16)).unwrap();
            hal.setup(RingType::RxdmaBuf, 0, 1, SrngParams::new(16)).unwrap();
            hal.deinit();
            assert!(!hal.is_initialized());
            assert!(hal.srng(RingId(16)).is_none());
        }
        assert_eq!(alloc.allocation_count(), 4);
        assert_eq!(alloc.live_count(), 0);
    }

    // =========================================================================
    // Setup validation
    // =========================================================================

    #[test]
    fn setup_requires_init() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = Hal::new(&regs, &mut alloc);
        assert_eq!(
            hal.setup(RingType::ReoDst, 0, 0, SrngParams::new(8)),
            Err(Error::Config(ConfigError::NotInitialized))
        );
    }

    #[test]
    fn setup_with_bad_instance_allocates_nothing() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        {
            let mut hal = hal(&regs, &mut alloc);
            regs.clear_writes();

            assert_eq!(
                hal.setup(RingType::ReoDst, 4, 0, SrngParams::new(8)),
                Err(Error::Config(ConfigError::InvalidRingNumber))
            );
            assert_eq!(
                hal.setup(RingType::RxdmaBuf, 0, 3, SrngParams::new(8)),
                Err(Error::Config(ConfigError::InvalidRingId))
            );
            assert!(regs.get_writes().is_empty());
        }
        // only the pointer blocks
        assert_eq!(alloc.allocation_count(), 2);
    }

    #[test]
    fn setup_rejects_bad_entry_counts() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);

        let too_many = RingType::CeSrc.config().max_entries() + 1;
        for entries in [0, too_many] {
            assert_eq!(
                hal.setup(RingType::CeSrc, 0, 0, SrngParams::new(entries)),
                Err(Error::Config(ConfigError::InvalidArgument))
            );
        }
        assert!(hal.srng(RingId(24)).is_none());
    }

    #[test]
    fn setup_rejects_oversized_thresholds() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        {
            let mut hal = hal(&regs, &mut alloc);

            let low = SrngParams::new(8).with_low_threshold(0x2000_0000);
            let batch = SrngParams::new(8).with_intr_batch_threshold(u32::MAX);
            assert_eq!(
                hal.setup(RingType::TclData, 0, 0, low),
                Err(Error::Config(ConfigError::InvalidArgument))
            );
            assert_eq!(
                hal.setup(RingType::ReoDst, 0, 0, batch),
                Err(Error::Config(ConfigError::InvalidArgument))
            );

            // a supplied arena goes back to the allocator
            let base = hal.allocator().region(8 * 9 * 4);
            let low = SrngParams::new(8).with_low_threshold(9).with_ring_base(base);
            assert!(hal.setup(RingType::TclData, 0, 0, low).is_err());

            assert!(hal.srng(RingId(16)).is_none());
            assert!(regs.get_writes().is_empty());

            // the whole ring as low watermark is still accepted
            let id = hal
                .setup(RingType::TclData, 0, 0, SrngParams::new(8).with_low_threshold(8))
                .unwrap();
            assert_eq!(id, RingId(16));
        }
        // pointer blocks, the returned arena and the accepted ring
        assert_eq!(alloc.allocation_count(), 4);
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn setup_twice_is_rejected() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);

        hal.setup(RingType::ReoCmd, 0, 0, SrngParams::new(32)).unwrap();
        assert_eq!(
            hal.setup(RingType::ReoCmd, 0, 0, SrngParams::new(32)),
            Err(Error::Config(ConfigError::AlreadyInitialized))
        );
    }

    #[test]
    fn setup_reports_arena_allocation_failure() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new().fail_after(2);
        let mut hal = hal(&regs, &mut alloc);

        assert_eq!(
            hal.setup(RingType::TclCmd, 0, 0, SrngParams::new(32)),
            Err(Error::Dma(DmaError::OutOfMemory))
        );
        assert!(hal.srng(RingId(20)).is_none());
    }

    #[test]
    fn caller_supplied_ring_base_is_used_or_returned() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        {
            let mut hal = hal(&regs, &mut alloc);

            // Too small for 8 x 8 words
            let small = hal.allocator().region(32);
            assert_eq!(
                hal.setup(
                    RingType::ReoDst,
                    0,
                    0,
                    SrngParams::new(8).with_ring_base(small)
                ),
                Err(Error::Config(ConfigError::InvalidArgument))
            );

            let base = hal.allocator().region(8 * 8 * 4);
            let paddr = base.paddr();
            let id = hal
                .setup(RingType::ReoDst, 0, 0, SrngParams::new(8).with_ring_base(base))
                .unwrap();
            assert_eq!(hal.params(id).unwrap().ring_base_paddr, paddr);
        }
        assert_eq!(alloc.live_count(), 0);
    }

    // =========================================================================
    // Hardware programming
    // =========================================================================

    #[test]
    fn source_ring_programs_tcl_layout() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);

        let params = SrngParams::new(100)
            .with_intr_batch_threshold(4)
            .with_intr_timer_threshold_us(200)
            .with_low_threshold(10);
        let id = hal.setup(RingType::TclData, 1, 0, params).unwrap();
        assert_eq!(id, RingId(17));

        let r0 = SEQ_WCSS_UMAC_TCL_REG + tcl::TCL2_RING_BASE_LSB;
        let r2 = SEQ_WCSS_UMAC_TCL_REG + tcl::TCL2_RING_HP;
        let info = hal.params(id).unwrap();
        let store = hal.pointer_store().unwrap();

        assert_eq!(regs.get(r0), Some(addr_lo(info.ring_base_paddr)));
        assert_eq!(
            regs.get(r0 + tcl::RING_BASE_MSB_OFFSET),
            Some(addr_hi(info.ring_base_paddr) | (900 << 8))
        );
        assert_eq!(regs.get(r0 + tcl::RING_ID_OFFSET), Some(9));
        assert_eq!(
            regs.get(r0 + tcl::RING_CONSR_INT_SETUP_IX0_OFFSET),
            Some((200 << 16) | 36)
        );
        assert_eq!(regs.get(r0 + tcl::RING_CONSR_INT_SETUP_IX1_OFFSET), Some(90));

        let tp_addr = store.read_ptr_paddr(17);
        assert_eq!(regs.get(r0 + tcl::RING_TP_ADDR_LSB_OFFSET), Some(addr_lo(tp_addr)));
        assert_eq!(regs.get(r0 + tcl::RING_TP_ADDR_MSB_OFFSET), Some(addr_hi(tp_addr)));

        assert_eq!(regs.get(r2), Some(0));
        assert_eq!(regs.get(r2 + 4), Some(0));
        assert_eq!(
            regs.get(r0 + tcl::RING_MISC_OFFSET),
            Some(tcl::misc::MSI_LOOPCNT_DISABLE | tcl::misc::SRNG_ENABLE)
        );

        // Enable is the last write
        assert_eq!(
            regs.get_writes().last(),
            Some(&(r0 + tcl::RING_MISC_OFFSET, tcl::misc::MSI_LOOPCNT_DISABLE | tcl::misc::SRNG_ENABLE))
        );
    }

    #[test]
    fn destination_ring_programs_reo_layout() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);

        let params = SrngParams::new(64)
            .with_intr_batch_threshold(2)
            .with_intr_timer_threshold_us(80)
            .with_msi(0x2_FEE0_1000, 0x33)
            .with_flags(RingFlags::DATA_TLV_SWAP);
        let id = hal.setup(RingType::ReoDst, 1, 0, params).unwrap();
        assert_eq!(id, RingId(1));

        let r0 = SEQ_WCSS_UMAC_REO_REG + reo::REO2_RING_BASE_LSB;
        let store = hal.pointer_store().unwrap();

        assert_eq!(regs.get(r0 + reo::RING_MSI1_BASE_LSB_OFFSET), Some(0xFEE0_1000));
        assert_eq!(
            regs.get(r0 + reo::RING_MSI1_BASE_MSB_OFFSET),
            Some(0x2 | reo::msi1_base_msb::MSI1_ENABLE)
        );
        assert_eq!(regs.get(r0 + reo::RING_MSI1_DATA_OFFSET), Some(0x33));
        assert_eq!(regs.get(r0 + reo::RING_ID_OFFSET), Some((1 << 8) | 8));
        assert_eq!(
            regs.get(r0 + reo::RING_PRODUCER_INT_SETUP_OFFSET),
            Some((10 << 16) | 16)
        );

        let hp_addr = store.read_ptr_paddr(1);
        assert_eq!(regs.get(r0 + reo::RING_HP_ADDR_LSB_OFFSET), Some(addr_lo(hp_addr)));
        assert_eq!(regs.get(r0 + reo::RING_HP_ADDR_MSB_OFFSET), Some(addr_hi(hp_addr)));
        assert_eq!(
            regs.get(r0 + reo::RING_MISC_OFFSET),
            Some(reo::misc::SRNG_ENABLE | reo::misc::DATA_TLV_SWAP)
        );
    }

    #[test]
    fn idle_link_ring_skips_tail_address() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);

        hal.setup(RingType::WbmIdleLink, 0, 0, SrngParams::new(64)).unwrap();
        let r0 = RingType::WbmIdleLink.config().reg_start[REG_GRP_R0];
        assert!(regs.writes_to(r0 + tcl::RING_TP_ADDR_LSB_OFFSET).is_empty());
        assert!(regs.writes_to(r0 + tcl::RING_TP_ADDR_MSB_OFFSET).is_empty());
    }

    #[test]
    fn copy_engine_destination_programs_buffer_length() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);

        let ctrl = SEQ_WCSS_UMAC_CE0_DST_REG + 2 * ce::CE_BLOCK_STRIDE + ce::DST_RING_CTRL;
        regs.set(ctrl, 0xABCD_0000 | 0x1234);

        let params = SrngParams::new(32).with_max_buffer_len(2048);
        hal.setup(RingType::CeDst, 2, 0, params).unwrap();
        assert_eq!(regs.get(ctrl), Some(0xABCD_0000 | 2048));
    }

    #[test]
    fn per_radio_rings_skip_hardware() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);
        regs.clear_writes();

        let buf = hal.setup(RingType::RxdmaBuf, 1, 1, SrngParams::new(64)).unwrap();
        let dst = hal.setup(RingType::RxdmaDst, 0, 2, SrngParams::new(64)).unwrap();
        assert_eq!(buf, RingId(145));
        assert_eq!(dst, RingId(165));
        assert!(regs.get_writes().is_empty());

        let store = hal.pointer_store().unwrap();
        assert!(hal.params(buf).unwrap().flags.contains(RingFlags::LMAC_RING));

        // Source: host head in the write block, engine tail in the read block
        assert_eq!(hal.hp_addr(buf), Ok(store.write_ptr_paddr(17)));
        assert_eq!(hal.tp_addr(buf), Ok(store.read_ptr_paddr(145)));
        // Destination: engine head in the read block, host tail in the write block
        assert_eq!(hal.hp_addr(dst), Ok(store.read_ptr_paddr(165)));
        assert_eq!(hal.tp_addr(dst), Ok(store.write_ptr_paddr(37)));
    }

    #[test]
    fn pointer_addresses_are_zero_for_register_rings() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);

        let id = hal.setup(RingType::TclData, 0, 0, SrngParams::new(8)).unwrap();
        assert_eq!(hal.hp_addr(id), Ok(0));
        assert_eq!(hal.tp_addr(id), Ok(0));
        assert_eq!(
            hal.hp_addr(RingId(0)),
            Err(Error::Config(ConfigError::NotInitialized))
        );
        assert_eq!(
            hal.params(RingId(RING_ID_MAX)),
            Err(Error::Config(ConfigError::InvalidRingId))
        );
    }

    // =========================================================================
    // Access sessions
    // =========================================================================

    #[test]
    fn access_requires_configured_ring() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let hal = hal(&regs, &mut alloc);
        assert!(matches!(
            hal.access(RingId(5)),
            Err(Error::Config(ConfigError::NotInitialized))
        ));
        assert!(matches!(
            hal.access(RingId(500)),
            Err(Error::Config(ConfigError::InvalidRingId))
        ));
    }

    #[test]
    fn source_session_publishes_head_register() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);
        let id = hal.setup(RingType::TclData, 0, 0, SrngParams::new(4)).unwrap();
        let hp_reg = SEQ_WCSS_UMAC_TCL_REG + tcl::TCL1_RING_HP;
        regs.clear_writes();

        let mut session = hal.access(id).unwrap();
        assert_eq!(session.free_slots(false), 3);
        session.next_free().unwrap().fill(0xA5);
        session.next_free().unwrap().fill(0x5A);
        session.end();

        assert_eq!(regs.writes_to(hp_reg), vec![18]);
        hal.with_state(id, |s| assert_eq!(s.arena.as_words()[9], 0x5A));
    }

    #[test]
    fn begin_end_without_mutation_republishes_same_pointer() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);
        let id = hal.setup(RingType::Wbm2SwRelease, 0, 0, SrngParams::new(8)).unwrap();
        let tp_reg = SEQ_WCSS_UMAC_WBM_REG + wbm::WBM0_RELEASE_RING_HP + reo::RING_TP_OFFSET;
        regs.clear_writes();

        hal.access(id).unwrap().end();
        hal.access(id).unwrap().end();
        assert_eq!(regs.writes_to(tp_reg), vec![0, 0]);
    }

    #[test]
    fn dropping_session_still_publishes() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);
        let id = hal.setup(RingType::RxdmaBuf, 0, 0, SrngParams::new(8)).unwrap();

        {
            let mut session = hal.access(id).unwrap();
            session.next_free().unwrap();
        }
        // per-radio source ring: head lands in write slot 0
        assert_eq!(hal.pointer_store().unwrap().write_ptr(0), 2);
        // and the lock was released
        assert!(hal.srng(id).unwrap().try_lock().is_some());
    }

    #[test]
    fn fifo_through_mirrored_rings() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);

        // 4 entries of 8 bytes: 3 usable
        let src = hal.setup(RingType::WbmIdleLink, 0, 0, SrngParams::new(4)).unwrap();
        let dst = hal.setup(RingType::CeDstStatus, 0, 0, SrngParams::new(4)).unwrap();
        assert_eq!(hal.params(src).unwrap().entry_size, 2);

        let mut session = hal.access(src).unwrap();
        for cookie in 1..=3 {
            let slot = session.next_free().unwrap();
            BufferAddrInfo::link(0x1_0000_0000 + u64::from(cookie) * 0x80, cookie)
                .write(slot)
                .unwrap();
        }
        assert!(session.next_free().is_none());
        session.end();

        // Engine: consume the source ring in order, report on the destination
        let produced: Vec<BufferAddrInfo> = hal.with_state(src, |s| {
            (0..3)
                .map(|i| BufferAddrInfo::read(&s.arena.as_words()[i * 2..]).unwrap())
                .collect()
        });
        hal.with_state(dst, |s| {
            for (i, info) in produced.iter().enumerate() {
                let status = CeDstStatusDesc {
                    len: 64,
                    meta: info.sw_cookie as u8,
                    ..Default::default()
                };
                status.write(&mut s.arena.as_words_mut()[i * 4..]).unwrap();
            }
        });
        let store = hal.pointer_store().unwrap();
        store.set_read_ptr(src.index(), 6);
        store.set_read_ptr(dst.index(), 12);

        let mut session = hal.access(dst).unwrap();
        assert_eq!(session.free_slots(false), 3);
        let mut order = Vec::new();
        while let Some(desc) = session.pop_next_mut() {
            assert_eq!(CeDstStatusDesc::take_length(desc), Ok(64));
            order.push(CeDstStatusDesc::read_volatile(desc).unwrap().meta);
        }
        session.end();
        assert_eq!(order, vec![1, 2, 3]);

        // Producer sees the whole ring free again after the engine's tail
        let mut session = hal.access(src).unwrap();
        assert_eq!(session.free_slots(false), 3);
        session.end();
    }

    #[test]
    fn wraparound_fill_drain_refill() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);
        let id = hal.setup(RingType::TclData, 2, 0, SrngParams::new(5)).unwrap();
        let ring_size = 5 * 9;

        for pass in 0..3u32 {
            let mut session = hal.access(id).unwrap();
            for n in 0..4u32 {
                let slot = session.next_free().unwrap();
                slot[0] = pass * 10 + n;
            }
            assert!(session.next_free().is_none());
            let hp = session.state().local_ptr();
            assert!(hp < ring_size && hp % 9 == 0);
            session.end();

            // engine drains everything
            let hp = hal.with_state(id, |s| s.local_ptr());
            hal.pointer_store().unwrap().set_read_ptr(id.index(), hp);
        }

        // Last pass wrote slots 3, 4, 0, 1 (head advanced 12 entries mod 5)
        hal.with_state(id, |s| {
            let words = s.arena.as_words();
            assert_eq!(words[3 * 9], 20);
            assert_eq!(words[4 * 9], 21);
            assert_eq!(words[0], 22);
            assert_eq!(words[9], 23);
            assert_eq!(src_cursors(s).unwrap().hp, 2 * 9);
        });
    }

    #[test]
    fn stale_and_synced_free_slots() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);
        let id = hal.setup(RingType::ReoStatus, 0, 0, SrngParams::new(8)).unwrap();
        let store = hal.pointer_store().unwrap();

        store.set_read_ptr(id.index(), 26);
        let mut session = hal.access(id).unwrap();
        assert_eq!(session.free_slots(false), 1);

        // engine produces two more while the session is open
        store.set_read_ptr(id.index(), 3 * 26);
        assert_eq!(session.free_slots(false), 1);
        assert_eq!(session.free_slots(true), 3);
        assert_eq!(session.free_slots(false), 3);
        assert!(session.pop_next().is_some());
        assert_eq!(session.free_slots(false), 2);
        session.end();
    }

    #[test]
    fn device_is_shareable_across_threads() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<TestHal<'static>>();
        assert_sync::<Hal<crate::hal::MmioRegisters, MockAllocator>>();
    }

    #[test]
    fn independent_rings_serviced_concurrently() {
        const ROUNDS: u32 = 200;

        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);
        let tx = hal.setup(RingType::TclData, 0, 0, SrngParams::new(64)).unwrap();
        let cmd = hal.setup(RingType::ReoCmd, 0, 0, SrngParams::new(64)).unwrap();
        regs.clear_writes();

        let hal = &hal;
        std::thread::scope(|s| {
            for id in [tx, cmd] {
                s.spawn(move || {
                    for n in 0..ROUNDS {
                        let mut session = hal.access(id).unwrap();
                        session.next_free().unwrap()[0] = n;
                        session.end();

                        // engine consumes the entry right away
                        let hp = hal.with_state(id, |st| st.local_ptr());
                        hal.pointer_store().unwrap().set_read_ptr(id.index(), hp);
                    }
                });
            }
        });

        for id in [tx, cmd] {
            let entry = hal.params(id).unwrap().entry_size;
            let hp = hal.with_state(id, |st| st.local_ptr());
            assert_eq!(hp, (ROUNDS % 64) * entry);
        }
        let tx_hp = SEQ_WCSS_UMAC_TCL_REG + tcl::TCL1_RING_HP;
        let cmd_hp = SEQ_WCSS_UMAC_REO_REG + reo::REO_CMD_HP;
        assert_eq!(regs.writes_to(tx_hp).len(), ROUNDS as usize);
        assert_eq!(regs.writes_to(cmd_hp).len(), ROUNDS as usize);
    }

    #[test]
    fn cross_direction_calls_on_session_are_inert() {
        let regs = MockRegisters::new();
        let mut alloc = MockAllocator::new();
        let mut hal = hal(&regs, &mut alloc);
        let src = hal.setup(RingType::CeSrc, 0, 0, SrngParams::new(8)).unwrap();
        let dst = hal.setup(RingType::CeDstStatus, 0, 0, SrngParams::new(8)).unwrap();

        let mut session = hal.access(src).unwrap();
        assert!(session.peek().is_none());
        assert!(session.pop_next().is_none());
        assert!(session.expected_loop_count().is_none());
        session.end();

        let mut session = hal.access(dst).unwrap();
        assert!(session.next_free().is_none());
        assert!(session.peek_free().is_none());
        assert!(session.reap_next().is_none());
        assert!(session.take_reaped().is_none());
        assert_eq!(session.expected_loop_count(), Some(1));
        session.end();
    }
}
