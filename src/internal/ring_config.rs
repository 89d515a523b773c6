//! Ring type registry
//!
//! Build-time table describing every ring type the engine supports: where
//! its ring ids start, how many instances exist, the descriptor size, the
//! direction and where its register groups live.
//!
//! Ring ids form one flat space shared by all types. UMAC rings occupy
//! `0..LMAC1_ID_START`; per-radio (LMAC) rings repeat in blocks of
//! [`RINGS_PER_LMAC`] for each radio.

use crate::driver::error::{ConfigError, ConfigResult};
use crate::internal::register::{
    SEQ_WCSS_UMAC_CE0_DST_REG, SEQ_WCSS_UMAC_CE0_SRC_REG, SEQ_WCSS_UMAC_REO_REG,
    SEQ_WCSS_UMAC_TCL_REG, SEQ_WCSS_UMAC_WBM_REG, ce, reo, tcl, wbm,
};

// =============================================================================
// Ring Id Space
// =============================================================================

/// Well-known ring ids
pub mod id {
    /// First REO destination ring (REO2SW1)
    pub const REO2SW1: u32 = 0;
    /// REO exception ring (REO2TCL)
    pub const REO2TCL: u32 = 4;
    /// REO reinject ring (SW2REO)
    pub const SW2REO: u32 = 5;
    /// REO command ring
    pub const REO_CMD: u32 = 8;
    /// REO status ring
    pub const REO_STATUS: u32 = 9;
    /// First TCL data ring (SW2TCL1)
    pub const SW2TCL1: u32 = 16;
    /// TCL command ring
    pub const SW2TCL_CMD: u32 = 20;
    /// TCL status ring
    pub const TCL_STATUS: u32 = 21;
    /// First copy engine source ring
    pub const CE0_SRC: u32 = 24;
    /// First copy engine destination ring
    pub const CE0_DST: u32 = 56;
    /// First copy engine destination-status ring
    pub const CE0_DST_STATUS: u32 = 88;
    /// WBM idle-link ring
    pub const WBM_IDLE_LINK: u32 = 120;
    /// SW2WBM release ring
    pub const WBM_SW_RELEASE: u32 = 121;
    /// First WBM2SW release ring
    pub const WBM2SW0_RELEASE: u32 = 122;
    /// Last UMAC ring id
    pub const UMAC_ID_END: u32 = 127;

    /// First per-radio ring id
    pub const LMAC1_ID_START: u32 = 128;
    /// RXDMA buffer ring (SW2RXDMA0_BUF)
    pub const WMAC1_SW2RXDMA0_BUF: u32 = LMAC1_ID_START;
    /// RXDMA monitor buffer ring
    pub const WMAC1_SW2RXDMA2_BUF: u32 = LMAC1_ID_START + 2;
    /// RXDMA monitor status ring
    pub const WMAC1_SW2RXDMA1_STATBUF: u32 = LMAC1_ID_START + 4;
    /// RXDMA destination ring
    pub const WMAC1_RXDMA2SW0: u32 = LMAC1_ID_START + 5;
    /// RXDMA monitor destination ring
    pub const WMAC1_RXDMA2SW1: u32 = LMAC1_ID_START + 6;
    /// RXDMA monitor descriptor ring
    pub const WMAC1_SW2RXDMA1_DESC: u32 = LMAC1_ID_START + 7;
    /// RXDMA direct buffer ring
    pub const RXDMA_DIR_BUF: u32 = LMAC1_ID_START + 8;
}

/// Ring ids reserved per radio
pub const RINGS_PER_LMAC: u32 = 16;
/// Number of radios
pub const NUM_LMACS: u32 = 3;
/// Number of per-radio ring ids (one write-pointer slot each)
pub const NUM_LMAC_RINGS: u32 = RINGS_PER_LMAC * NUM_LMACS;
/// Size of the ring id space (one read-pointer slot each)
pub const RING_ID_MAX: u32 = id::LMAC1_ID_START + NUM_LMAC_RINGS;

/// Ring size register limit shared by every ring type, in words
pub const RING_SIZE_MAX: u32 = 0xffff;

// =============================================================================
// Types
// =============================================================================

/// Ring id, an index into the flat ring id space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingId(pub u32);

impl RingId {
    /// Raw id value
    #[inline(always)]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Id as a table index
    #[inline(always)]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether the id falls in the per-radio range
    #[inline(always)]
    #[must_use]
    pub const fn is_lmac(self) -> bool {
        self.0 >= id::LMAC1_ID_START
    }
}

impl core::fmt::Display for RingId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ring {}", self.0)
    }
}

/// Which side produces descriptors on a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingDirection {
    /// Host produces, engine consumes
    Source,
    /// Engine produces, host consumes
    Destination,
}

/// Ring kinds
///
/// Discriminants are the raw type selectors accepted by [`lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum RingType {
    /// REO to host receive rings
    ReoDst = 0,
    /// REO exception ring
    ReoException,
    /// Host to REO reinject ring
    ReoReinject,
    /// REO command ring
    ReoCmd,
    /// REO command status ring
    ReoStatus,
    /// Host to TCL transmit data rings
    TclData,
    /// TCL command ring
    TclCmd,
    /// TCL status ring
    TclStatus,
    /// Copy engine source rings
    CeSrc,
    /// Copy engine destination (receive buffer) rings
    CeDst,
    /// Copy engine destination status rings
    CeDstStatus,
    /// WBM idle-link ring
    WbmIdleLink,
    /// Host to WBM release ring
    Sw2WbmRelease,
    /// WBM to host release rings
    Wbm2SwRelease,
    /// RXDMA buffer rings
    RxdmaBuf,
    /// RXDMA destination ring
    RxdmaDst,
    /// RXDMA monitor buffer ring
    RxdmaMonitorBuf,
    /// RXDMA monitor status ring
    RxdmaMonitorStatus,
    /// RXDMA monitor destination ring
    RxdmaMonitorDst,
    /// RXDMA monitor descriptor ring
    RxdmaMonitorDesc,
    /// RXDMA direct buffer ring
    RxdmaDirBuf,
}

impl RingType {
    /// Number of ring types
    pub const COUNT: usize = 21;

    /// All ring types in selector order
    pub const ALL: [RingType; Self::COUNT] = [
        RingType::ReoDst,
        RingType::ReoException,
        RingType::ReoReinject,
        RingType::ReoCmd,
        RingType::ReoStatus,
        RingType::TclData,
        RingType::TclCmd,
        RingType::TclStatus,
        RingType::CeSrc,
        RingType::CeDst,
        RingType::CeDstStatus,
        RingType::WbmIdleLink,
        RingType::Sw2WbmRelease,
        RingType::Wbm2SwRelease,
        RingType::RxdmaBuf,
        RingType::RxdmaDst,
        RingType::RxdmaMonitorBuf,
        RingType::RxdmaMonitorStatus,
        RingType::RxdmaMonitorDst,
        RingType::RxdmaMonitorDesc,
        RingType::RxdmaDirBuf,
    ];

    /// Static configuration of this ring type
    #[inline(always)]
    #[must_use]
    pub fn config(self) -> &'static RingTypeConfig {
        &RING_CONFIGS[self as usize]
    }
}

impl TryFrom<u32> for RingType {
    type Error = ConfigError;

    fn try_from(raw: u32) -> ConfigResult<Self> {
        RingType::ALL
            .get(raw as usize)
            .copied()
            .ok_or(ConfigError::InvalidType)
    }
}

/// Static per-type ring description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingTypeConfig {
    /// First ring id of this type
    pub start_id: u32,
    /// Number of instances
    pub max_rings: u32,
    /// Descriptor size in 32-bit words
    pub entry_size: u32,
    /// Per-radio ring (pointers exchanged through memory, not registers)
    pub lmac_ring: bool,
    /// Producer side
    pub direction: RingDirection,
    /// Start of the R0 (config) and R2 (pointer) register groups
    pub reg_start: [u32; 2],
    /// Stride between instances for each register group
    pub reg_size: [u32; 2],
    /// Largest ring size the size register field holds, in words
    pub max_size: u32,
}

impl RingTypeConfig {
    /// Largest entry count a ring of this type may have
    #[inline(always)]
    #[must_use]
    pub const fn max_entries(&self) -> u32 {
        self.max_size / self.entry_size
    }

    /// Descriptor size in bytes
    #[inline(always)]
    #[must_use]
    pub const fn entry_bytes(&self) -> usize {
        (self.entry_size as usize) << 2
    }
}

/// Register group index of the configuration block
pub const REG_GRP_R0: usize = 0;
/// Register group index of the pointer block
pub const REG_GRP_R2: usize = 1;

const fn umac(
    start_id: u32,
    max_rings: u32,
    entry_size: u32,
    direction: RingDirection,
    reg_start: [u32; 2],
    reg_size: [u32; 2],
) -> RingTypeConfig {
    RingTypeConfig {
        start_id,
        max_rings,
        entry_size,
        lmac_ring: false,
        direction,
        reg_start,
        reg_size,
        max_size: RING_SIZE_MAX,
    }
}

const fn lmac(
    start_id: u32,
    max_rings: u32,
    entry_size: u32,
    direction: RingDirection,
) -> RingTypeConfig {
    RingTypeConfig {
        start_id,
        max_rings,
        entry_size,
        lmac_ring: true,
        direction,
        reg_start: [0, 0],
        reg_size: [0, 0],
        max_size: RING_SIZE_MAX,
    }
}

use RingDirection::{Destination as DST, Source as SRC};

const REO: u32 = SEQ_WCSS_UMAC_REO_REG;
const TCL: u32 = SEQ_WCSS_UMAC_TCL_REG;
const WBM: u32 = SEQ_WCSS_UMAC_WBM_REG;

/// Descriptor sizes in words
mod entry_words {
    pub const REO_DEST: u32 = 8;
    pub const REO_ENTRANCE: u32 = 8;
    pub const REO_CMD: u32 = 10;
    pub const REO_STATUS: u32 = 26;
    pub const TCL_DATA: u32 = 9;
    pub const TCL_CMD: u32 = 9;
    pub const TCL_STATUS: u32 = 6;
    pub const CE_SRC: u32 = 4;
    pub const CE_DST: u32 = 2;
    pub const CE_DST_STATUS: u32 = 4;
    pub const WBM_LINK: u32 = 2;
    pub const WBM_RELEASE: u32 = 8;
    pub const WBM_BUFFER: u32 = 2;
    pub const DIR_BUF: u32 = 2;
}

/// Configuration table indexed by `RingType as usize`
static RING_CONFIGS: [RingTypeConfig; RingType::COUNT] = [
    // ReoDst
    umac(
        id::REO2SW1,
        4,
        entry_words::REO_DEST,
        DST,
        [REO + reo::REO1_RING_BASE_LSB, REO + reo::REO1_RING_HP],
        [
            reo::REO2_RING_BASE_LSB - reo::REO1_RING_BASE_LSB,
            reo::REO2_RING_HP - reo::REO1_RING_HP,
        ],
    ),
    // ReoException: REO2TCL is repurposed to deliver exceptions to the host
    umac(
        id::REO2TCL,
        1,
        entry_words::REO_DEST,
        DST,
        [REO + reo::REO_TCL_RING_BASE_LSB, REO + reo::REO_TCL_RING_HP],
        [0, 0],
    ),
    // ReoReinject
    umac(
        id::SW2REO,
        1,
        entry_words::REO_ENTRANCE,
        SRC,
        [REO + reo::SW2REO_RING_BASE_LSB, REO + reo::SW2REO_RING_HP],
        [0, 0],
    ),
    // ReoCmd
    umac(
        id::REO_CMD,
        1,
        entry_words::REO_CMD,
        SRC,
        [REO + reo::REO_CMD_RING_BASE_LSB, REO + reo::REO_CMD_HP],
        [0, 0],
    ),
    // ReoStatus
    umac(
        id::REO_STATUS,
        1,
        entry_words::REO_STATUS,
        DST,
        [REO + reo::REO_STATUS_RING_BASE_LSB, REO + reo::REO_STATUS_HP],
        [0, 0],
    ),
    // TclData
    umac(
        id::SW2TCL1,
        3,
        entry_words::TCL_DATA,
        SRC,
        [TCL + tcl::TCL1_RING_BASE_LSB, TCL + tcl::TCL1_RING_HP],
        [
            tcl::TCL2_RING_BASE_LSB - tcl::TCL1_RING_BASE_LSB,
            tcl::TCL2_RING_HP - tcl::TCL1_RING_HP,
        ],
    ),
    // TclCmd
    umac(
        id::SW2TCL_CMD,
        1,
        entry_words::TCL_CMD,
        SRC,
        [TCL + tcl::TCL_RING_BASE_LSB, TCL + tcl::TCL_RING_HP],
        [0, 0],
    ),
    // TclStatus
    umac(
        id::TCL_STATUS,
        1,
        entry_words::TCL_STATUS,
        DST,
        [TCL + tcl::TCL_STATUS_RING_BASE_LSB, TCL + tcl::TCL_STATUS_RING_HP],
        [0, 0],
    ),
    // CeSrc
    umac(
        id::CE0_SRC,
        12,
        entry_words::CE_SRC,
        SRC,
        [
            SEQ_WCSS_UMAC_CE0_SRC_REG + ce::DST_RING_BASE_LSB,
            SEQ_WCSS_UMAC_CE0_SRC_REG + ce::DST_RING_HP,
        ],
        [ce::CE_SRC_BLOCK_STRIDE, ce::CE_SRC_BLOCK_STRIDE],
    ),
    // CeDst: the host posts receive buffers, so this is a source ring
    umac(
        id::CE0_DST,
        12,
        entry_words::CE_DST,
        SRC,
        [
            SEQ_WCSS_UMAC_CE0_DST_REG + ce::DST_RING_BASE_LSB,
            SEQ_WCSS_UMAC_CE0_DST_REG + ce::DST_RING_HP,
        ],
        [ce::CE_BLOCK_STRIDE, ce::CE_BLOCK_STRIDE],
    ),
    // CeDstStatus
    umac(
        id::CE0_DST_STATUS,
        12,
        entry_words::CE_DST_STATUS,
        DST,
        [
            SEQ_WCSS_UMAC_CE0_DST_REG + ce::DST_STATUS_RING_BASE_LSB,
            SEQ_WCSS_UMAC_CE0_DST_REG + ce::DST_STATUS_RING_HP,
        ],
        [ce::CE_BLOCK_STRIDE, ce::CE_BLOCK_STRIDE],
    ),
    // WbmIdleLink
    umac(
        id::WBM_IDLE_LINK,
        1,
        entry_words::WBM_LINK,
        SRC,
        [WBM + wbm::IDLE_LINK_RING_BASE_LSB, WBM + wbm::IDLE_LINK_RING_HP],
        [0, 0],
    ),
    // Sw2WbmRelease
    umac(
        id::WBM_SW_RELEASE,
        1,
        entry_words::WBM_RELEASE,
        SRC,
        [WBM + wbm::RELEASE_RING_BASE_LSB, WBM + wbm::RELEASE_RING_HP],
        [0, 0],
    ),
    // Wbm2SwRelease
    umac(
        id::WBM2SW0_RELEASE,
        4,
        entry_words::WBM_RELEASE,
        DST,
        [
            WBM + wbm::WBM0_RELEASE_RING_BASE_LSB,
            WBM + wbm::WBM0_RELEASE_RING_HP,
        ],
        [
            wbm::WBM1_RELEASE_RING_BASE_LSB - wbm::WBM0_RELEASE_RING_BASE_LSB,
            wbm::WBM1_RELEASE_RING_HP - wbm::WBM0_RELEASE_RING_HP,
        ],
    ),
    // RxdmaBuf
    lmac(id::WMAC1_SW2RXDMA0_BUF, 2, entry_words::WBM_BUFFER, SRC),
    // RxdmaDst
    lmac(id::WMAC1_RXDMA2SW0, 1, entry_words::REO_ENTRANCE, DST),
    // RxdmaMonitorBuf
    lmac(id::WMAC1_SW2RXDMA2_BUF, 1, entry_words::WBM_BUFFER, SRC),
    // RxdmaMonitorStatus
    lmac(id::WMAC1_SW2RXDMA1_STATBUF, 1, entry_words::WBM_BUFFER, SRC),
    // RxdmaMonitorDst
    lmac(id::WMAC1_RXDMA2SW1, 1, entry_words::REO_ENTRANCE, DST),
    // RxdmaMonitorDesc
    lmac(id::WMAC1_SW2RXDMA1_DESC, 1, entry_words::WBM_BUFFER, SRC),
    // RxdmaDirBuf
    lmac(id::RXDMA_DIR_BUF, 1, entry_words::DIR_BUF, SRC),
];

// =============================================================================
// Registry Queries
// =============================================================================

/// Look up the configuration for a raw ring type selector.
pub fn lookup(raw_type: u32) -> ConfigResult<&'static RingTypeConfig> {
    RingType::try_from(raw_type).map(RingType::config)
}

/// Descriptor size in bytes for a raw ring type selector.
pub fn entry_size(raw_type: u32) -> ConfigResult<usize> {
    lookup(raw_type).map(RingTypeConfig::entry_bytes)
}

/// Largest entry count for a raw ring type selector.
pub fn max_entries(raw_type: u32) -> ConfigResult<u32> {
    lookup(raw_type).map(RingTypeConfig::max_entries)
}

/// Resolve the ring id of instance `ring_num` of `ring_type`.
///
/// `mac_id` selects the radio for per-radio types and is ignored otherwise.
pub fn ring_id(ring_type: RingType, ring_num: u32, mac_id: u32) -> ConfigResult<RingId> {
    let config = ring_type.config();

    if ring_num >= config.max_rings {
        #[cfg(feature = "log")]
        log::warn!("invalid ring number {ring_num} for {ring_type:?}");
        return Err(ConfigError::InvalidRingNumber);
    }

    let mut id = config.start_id + ring_num;
    if config.lmac_ring {
        id = mac_id
            .checked_mul(RINGS_PER_LMAC)
            .and_then(|offset| id.checked_add(offset))
            .ok_or(ConfigError::InvalidRingId)?;
    }

    if id >= RING_ID_MAX {
        #[cfg(feature = "log")]
        log::warn!("ring id {id} out of range for {ring_type:?} mac {mac_id}");
        return Err(ConfigError::InvalidRingId);
    }

    Ok(RingId(id))
}
