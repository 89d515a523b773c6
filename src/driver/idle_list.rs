//! Idle-link descriptor scatter list.
//!
//! The buffer manager keeps its pool of free link descriptors in a chain of
//! coherent scatter buffers. The last 8 bytes of every buffer hold a link
//! word pair pointing at the next buffer, tagged the way the scattered ring
//! base register is; the rest is link descriptor storage filled by the
//! caller.

use super::error::{ConfigError, Result};
use super::hal::Hal;
use crate::hal::{CoherentAllocator, DmaRegion, RegisterIo};
use crate::internal::register::wbm::{
    self, BASE_ADDR_MATCH_TAG_VAL, IDLE_LINK_RING_ENABLE, IDLE_SCATTER_BUF_SIZE,
    IDLE_SCATTER_BUF_SIZE_MAX,
};
use crate::internal::register::{SEQ_WCSS_UMAC_WBM_REG, addr_hi, addr_lo, field_prep};

/// Scatter buffer size in the 64-byte units the control register takes
const SCATTER_BUF_UNITS: u32 = (IDLE_SCATTER_BUF_SIZE / 64) as u32;

#[inline(always)]
const fn msb(paddr: u64) -> u32 {
    field_prep(wbm::SCATTERED_DESC_MSB_BASE_ADDR_39_32, addr_hi(paddr))
}

/// Address bits 39:32 plus the match tag
#[inline(always)]
const fn tagged_msb(paddr: u64) -> u32 {
    msb(paddr) | field_prep(wbm::SCATTERED_DESC_MSB_BASE_ADDR_MATCH_TAG, BASE_ADDR_MATCH_TAG_VAL)
}

impl<R: RegisterIo, A: CoherentAllocator> Hal<R, A> {
    /// Chain `buffers` into the idle-link scatter list and enable it.
    ///
    /// `total_link_desc` is the number of link descriptors stored across all
    /// buffers; `end_offset` is the byte offset just past the last one in
    /// the final buffer.
    ///
    /// Every buffer must be at least [`IDLE_SCATTER_BUF_SIZE_MAX`] bytes.
    /// Nothing is written when validation fails.
    pub fn setup_link_idle_list(
        &self,
        buffers: &mut [DmaRegion],
        total_link_desc: u32,
        end_offset: u32,
    ) -> Result<()> {
        if buffers.is_empty()
            || buffers
                .iter()
                .any(|buf| buf.len() < IDLE_SCATTER_BUF_SIZE_MAX)
        {
            return Err(ConfigError::InvalidArgument.into());
        }

        // Chain each buffer to the next through its trailing link slot
        let link_word = IDLE_SCATTER_BUF_SIZE / 4;
        for i in 1..buffers.len() {
            let next = buffers[i].paddr();
            let link = buffers[i - 1]
                .as_words_mut()
                .get_mut(link_word..link_word + 2)
                .ok_or(ConfigError::InvalidArgument)?;
            link[0] = addr_lo(next);
            link[1] = tagged_msb(next);
        }

        let first = buffers[0].paddr();
        let last = buffers[buffers.len() - 1].paddr();
        let count = buffers.len() as u32;
        let regs = self.regs();
        let reg = |offset: u32| SEQ_WCSS_UMAC_WBM_REG + offset;

        regs.write32(
            reg(wbm::R0_IDLE_LIST_CONTROL_ADDR),
            field_prep(wbm::SCATTER_BUFFER_SIZE, SCATTER_BUF_UNITS)
                | wbm::LINK_DESC_IDLE_LIST_MODE,
        );
        regs.write32(
            reg(wbm::R0_IDLE_LIST_SIZE_ADDR),
            field_prep(
                wbm::SCATTER_RING_SIZE_OF_IDLE_LINK_DESC_LIST,
                SCATTER_BUF_UNITS * count,
            ),
        );

        regs.write32(reg(wbm::SCATTERED_RING_BASE_LSB), addr_lo(first));
        regs.write32(reg(wbm::SCATTERED_RING_BASE_MSB), tagged_msb(first));

        // Head: end of the last buffer, then IX0 is rewound to the first
        // buffer. Tail: start of the first.
        regs.write32(reg(wbm::SCATTERED_DESC_PTR_HEAD_INFO_IX0), addr_lo(last));
        regs.write32(
            reg(wbm::SCATTERED_DESC_PTR_HEAD_INFO_IX1),
            msb(last) | field_prep(wbm::SCATTERED_DESC_HEAD_P_OFFSET_IX1, end_offset >> 2),
        );
        regs.write32(reg(wbm::SCATTERED_DESC_PTR_HEAD_INFO_IX0), addr_lo(first));
        regs.write32(reg(wbm::SCATTERED_DESC_PTR_TAIL_INFO_IX0), addr_lo(first));
        regs.write32(
            reg(wbm::SCATTERED_DESC_PTR_TAIL_INFO_IX1),
            msb(first) | field_prep(wbm::SCATTERED_DESC_TAIL_P_OFFSET_IX1, 0),
        );
        regs.write32(
            reg(wbm::SCATTERED_DESC_PTR_HP_ADDR),
            total_link_desc.wrapping_mul(2),
        );

        regs.write32(reg(wbm::IDLE_LINK_RING_MISC_ADDR), IDLE_LINK_RING_ENABLE);

        #[cfg(feature = "log")]
        log::debug!(
            "idle list: {count} scatter buffers, {total_link_desc} link descs, head at {:#x}+{end_offset}",
            last
        );

        Ok(())
    }
}
