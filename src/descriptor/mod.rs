//! Descriptor codecs
//!
//! Descriptors are fixed-width records of 32-bit words living in a ring
//! slot. Each layout here is a plain value type that encodes into, and
//! decodes from, a word slice (as handed out by an
//! [`AccessSession`](crate::AccessSession)):
//!
//! - [`CeSrcDesc`], [`CeDstDesc`], [`CeDstStatusDesc`]: copy engine rings
//! - [`BufferAddrInfo`]: buffer/link descriptor address words
//! - [`WbmReleaseDesc`]: buffer manager release rings
//!
//! Encoding ORs independently masked sub-fields; values wider than their
//! field are truncated. Addresses carry 40 bits: the low 32 in one word and
//! bits 39:32 in an 8-bit field of the next.
//!
//! Slots the engine fills (destination and status rings) should be decoded
//! with [`DescriptorLayout::read_volatile`], which loads every word exactly
//! once.
//!
//! ```ignore
//! let mut session = hal.access(ce_src)?;
//! if let Some(slot) = session.next_free() {
//!     CeSrcDesc::new(buf_paddr, len, transfer_id, false).write(slot)?;
//! }
//! session.end();
//! ```

pub mod bits;
mod ce;
mod wbm;

pub use ce::{CeDescKind, CeDstDesc, CeDstStatusDesc, CeSrcDesc, ce_desc_size};
pub use wbm::{BufferAddrInfo, WbmReleaseDesc, set_link_desc_addr};

use crate::driver::error::{DmaError, DmaResult};

/// Widest layout, in words
const MAX_WORDS: usize = 8;

/// A fixed descriptor layout
pub trait DescriptorLayout: Sized {
    /// Layout size in 32-bit words
    const WORDS: usize;

    /// Encode into the first [`WORDS`](Self::WORDS) words of `desc`
    fn write(&self, desc: &mut [u32]) -> DmaResult<()>;

    /// Decode from the first [`WORDS`](Self::WORDS) words of `desc`
    fn read(desc: &[u32]) -> DmaResult<Self>;

    /// Decode an engine-written slot from a volatile snapshot of its words
    fn read_volatile(desc: &[u32]) -> DmaResult<Self> {
        let src = desc.get(..Self::WORDS).ok_or(DmaError::InvalidLength)?;
        let mut snapshot = [0u32; MAX_WORDS];
        let dst = snapshot
            .get_mut(..Self::WORDS)
            .ok_or(DmaError::InvalidLength)?;
        for (out, word) in dst.iter_mut().zip(src) {
            // SAFETY: `word` is a live, aligned reference into the slot.
            *out = unsafe { core::ptr::read_volatile(word) };
        }
        Self::read(dst)
    }

    /// Layout size in bytes
    #[must_use]
    fn size_bytes() -> usize {
        Self::WORDS * 4
    }
}

/// Borrow exactly `N` words, or fail with `InvalidLength`
#[inline]
pub(crate) fn words<const N: usize>(desc: &[u32]) -> DmaResult<&[u32; N]> {
    desc.get(..N)
        .and_then(|w| w.try_into().ok())
        .ok_or(DmaError::InvalidLength)
}

/// Mutably borrow exactly `N` words, or fail with `InvalidLength`
#[inline]
pub(crate) fn words_mut<const N: usize>(desc: &mut [u32]) -> DmaResult<&mut [u32; N]> {
    desc.get_mut(..N)
        .and_then(|w| w.try_into().ok())
        .ok_or(DmaError::InvalidLength)
}
