//! Buffer address info, link and release descriptors.

use super::bits::{RBM_WBM_IDLE_DESC_LIST, buffer_addr_info0, buffer_addr_info1, wbm_release_info0};
use super::{DescriptorLayout, words, words_mut};
use crate::driver::error::DmaResult;
use crate::internal::register::{addr_hi, addr_lo, field_get, field_prep};

/// Buffer address info: a 40-bit buffer address, the buffer manager it
/// returns to and a host cookie. Also the whole of a WBM link descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferAddrInfo {
    /// Buffer bus address (40 bits)
    pub paddr: u64,
    /// Return buffer manager (3 bits)
    pub rbm: u8,
    /// Host cookie (21 bits)
    pub sw_cookie: u32,
}

impl BufferAddrInfo {
    /// Link descriptor entry returned to the idle list
    #[must_use]
    pub const fn link(paddr: u64, cookie: u32) -> Self {
        Self {
            paddr,
            rbm: RBM_WBM_IDLE_DESC_LIST,
            sw_cookie: cookie,
        }
    }
}

impl DescriptorLayout for BufferAddrInfo {
    const WORDS: usize = 2;

    fn write(&self, desc: &mut [u32]) -> DmaResult<()> {
        let w = words_mut::<2>(desc)?;
        w[0] = field_prep(buffer_addr_info0::ADDR, addr_lo(self.paddr));
        w[1] = field_prep(buffer_addr_info1::ADDR, addr_hi(self.paddr))
            | field_prep(buffer_addr_info1::RET_BUF_MGR, u32::from(self.rbm))
            | field_prep(buffer_addr_info1::SW_COOKIE, self.sw_cookie);
        Ok(())
    }

    fn read(desc: &[u32]) -> DmaResult<Self> {
        let w = words::<2>(desc)?;
        let hi = field_get(buffer_addr_info1::ADDR, w[1]);
        Ok(Self {
            paddr: u64::from(field_get(buffer_addr_info0::ADDR, w[0])) | (u64::from(hi) << 32),
            rbm: field_get(buffer_addr_info1::RET_BUF_MGR, w[1]) as u8,
            sw_cookie: field_get(buffer_addr_info1::SW_COOKIE, w[1]),
        })
    }
}

/// Point the link descriptor in `desc` at `paddr`, tagged with `cookie`
pub fn set_link_desc_addr(desc: &mut [u32], cookie: u32, paddr: u64) -> DmaResult<()> {
    BufferAddrInfo::link(paddr, cookie).write(desc)
}

/// Buffer manager release descriptor
///
/// Only the buffer address and the release routing fields are modeled; the
/// remaining words are written as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WbmReleaseDesc {
    /// Released buffer
    pub buf_addr_info: BufferAddrInfo,
    /// Module that released the buffer
    pub release_source: u8,
    /// Buffer manager action
    pub bm_action: u8,
    /// Buffer or link descriptor
    pub desc_type: u8,
}

impl DescriptorLayout for WbmReleaseDesc {
    const WORDS: usize = 8;

    fn write(&self, desc: &mut [u32]) -> DmaResult<()> {
        let w = words_mut::<8>(desc)?;
        w.fill(0);
        self.buf_addr_info.write(&mut w[..2])?;
        w[2] = field_prep(wbm_release_info0::REL_SRC_MODULE, u32::from(self.release_source))
            | field_prep(wbm_release_info0::BM_ACTION, u32::from(self.bm_action))
            | field_prep(wbm_release_info0::DESC_TYPE, u32::from(self.desc_type));
        Ok(())
    }

    fn read(desc: &[u32]) -> DmaResult<Self> {
        let w = words::<8>(desc)?;
        Ok(Self {
            buf_addr_info: BufferAddrInfo::read(&w[..2])?,
            release_source: field_get(wbm_release_info0::REL_SRC_MODULE, w[2]) as u8,
            bm_action: field_get(wbm_release_info0::BM_ACTION, w[2]) as u8,
            desc_type: field_get(wbm_release_info0::DESC_TYPE, w[2]) as u8,
        })
    }
}
