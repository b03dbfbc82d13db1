//! src/crypto/kdf/accumulator.rs
//!
//! PBKDF2 inner loop for the builtin backend:
//! `T = U_1 ^ U_2 ^ ... ^ U_rounds` with `U_{j+1} = prf(U_j)`.
//!
//! The digest is viewed as native-width lanes (u64 on 64-bit targets, plus one
//! u32 tail lane when the size is 4 mod 8) and XORed lane by lane, so no
//! per-round byte-wise work or allocation beyond the PRF output itself. Common
//! digest sizes get a const-generic monomorph; any other multiple of four uses
//! the slice-backed variant.

use std::ops::BitXorAssign;

use crate::error::KdfError;

/// Keyed pseudorandom function driving the loop (the compiled HMAC).
pub type Prf<'a> = &'a dyn Fn(&[u8]) -> Vec<u8>;

/// `accumulate(prf, u1, rounds) -> T`; `u1` must be exactly one digest long.
pub type Accumulator = for<'a> fn(Prf<'a>, Vec<u8>, u32) -> Vec<u8>;

trait Lane: Copy + Default + BitXorAssign {
    const WIDTH: usize;

    fn read(bytes: &[u8]) -> Self;

    fn write(self, out: &mut [u8]);
}

impl Lane for u64 {
    const WIDTH: usize = 8;

    #[inline(always)]
    fn read(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        u64::from_ne_bytes(buf)
    }

    #[inline(always)]
    fn write(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_ne_bytes());
    }
}

impl Lane for u32 {
    const WIDTH: usize = 4;

    #[inline(always)]
    fn read(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        u32::from_ne_bytes(buf)
    }

    #[inline(always)]
    fn write(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_ne_bytes());
    }
}

#[cfg(target_pointer_width = "64")]
type Word = u64;
#[cfg(not(target_pointer_width = "64"))]
type Word = u32;

/// How a digest is split into accumulator lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LaneLayout {
    /// Width in bytes of the main lanes.
    pub(crate) word_width: usize,
    /// Number of main lanes.
    pub(crate) words: usize,
    /// Number of trailing u32 lanes (0 or 1).
    pub(crate) tail: usize,
}

impl LaneLayout {
    /// Layout for `digest_size`, widest native word first.
    pub(crate) fn for_digest_size(digest_size: usize) -> Result<Self, KdfError> {
        if digest_size == 0 || digest_size % 4 != 0 {
            return Err(KdfError::UnsupportedDigestSize(digest_size));
        }
        Ok(Self::split(digest_size))
    }

    // caller guarantees a non-zero multiple of 4
    const fn split(digest_size: usize) -> Self {
        let word_width = <Word as Lane>::WIDTH;
        Self {
            word_width,
            words: digest_size / word_width,
            tail: (digest_size % word_width) / 4,
        }
    }
}

#[inline(always)]
fn xor_lanes<W: Lane>(words: &mut [W], tail: &mut [u32], digest: &[u8]) {
    let (head, rest) = digest.split_at(words.len() * W::WIDTH);
    for (acc, chunk) in words.iter_mut().zip(head.chunks_exact(W::WIDTH)) {
        *acc ^= W::read(chunk);
    }
    for (acc, chunk) in tail.iter_mut().zip(rest.chunks_exact(4)) {
        *acc ^= u32::read(chunk);
    }
}

#[inline(always)]
fn store_lanes<W: Lane>(words: &[W], tail: &[u32], out: &mut [u8]) {
    let (head, rest) = out.split_at_mut(words.len() * W::WIDTH);
    for (lane, chunk) in words.iter().zip(head.chunks_exact_mut(W::WIDTH)) {
        lane.write(chunk);
    }
    for (lane, chunk) in tail.iter().zip(rest.chunks_exact_mut(4)) {
        lane.write(chunk);
    }
}

/// Accumulator with the lane count fixed at compile time.
fn accumulate_fixed<W: Lane, const WORDS: usize, const TAIL: usize>(
    prf: Prf<'_>,
    first: Vec<u8>,
    rounds: u32,
) -> Vec<u8> {
    debug_assert_eq!(first.len(), WORDS * W::WIDTH + TAIL * 4);
    let mut words = [W::default(); WORDS];
    let mut tail = [0u32; TAIL];
    xor_lanes(&mut words, &mut tail, &first);

    let mut digest = first;
    for _ in 1..rounds {
        digest = prf(&digest);
        xor_lanes(&mut words, &mut tail, &digest);
    }

    store_lanes(&words, &tail, &mut digest);
    digest
}

/// Accumulator for digest sizes without a dedicated monomorph.
fn accumulate_dynamic(prf: Prf<'_>, first: Vec<u8>, rounds: u32) -> Vec<u8> {
    let layout = LaneLayout::split(first.len());
    let mut words = vec![Word::default(); layout.words];
    let mut tail = vec![0u32; layout.tail];
    xor_lanes(&mut words, &mut tail, &first);

    let mut digest = first;
    for _ in 1..rounds {
        digest = prf(&digest);
        xor_lanes(&mut words, &mut tail, &digest);
    }

    store_lanes(&words, &tail, &mut digest);
    digest
}

#[cfg(target_pointer_width = "64")]
fn specialized(digest_size: usize) -> Option<Accumulator> {
    let accumulate: Accumulator = match digest_size {
        16 => accumulate_fixed::<u64, 2, 0>,
        20 => accumulate_fixed::<u64, 2, 1>,
        28 => accumulate_fixed::<u64, 3, 1>,
        32 => accumulate_fixed::<u64, 4, 0>,
        48 => accumulate_fixed::<u64, 6, 0>,
        64 => accumulate_fixed::<u64, 8, 0>,
        _ => return None,
    };
    Some(accumulate)
}

#[cfg(not(target_pointer_width = "64"))]
fn specialized(digest_size: usize) -> Option<Accumulator> {
    let accumulate: Accumulator = match digest_size {
        16 => accumulate_fixed::<u32, 4, 0>,
        20 => accumulate_fixed::<u32, 5, 0>,
        28 => accumulate_fixed::<u32, 7, 0>,
        32 => accumulate_fixed::<u32, 8, 0>,
        48 => accumulate_fixed::<u32, 12, 0>,
        64 => accumulate_fixed::<u32, 16, 0>,
        _ => return None,
    };
    Some(accumulate)
}

/// Returns the accumulator for `digest_size`: a fixed-lane monomorph from
/// the static table, else the slice-backed variant.
///
/// # Errors
///
/// [`KdfError::UnsupportedDigestSize`] unless `digest_size` is a non-zero multiple of 4.
pub fn accumulator_for(digest_size: usize) -> Result<Accumulator, KdfError> {
    LaneLayout::for_digest_size(digest_size)?;
    Ok(specialized(digest_size).unwrap_or(accumulate_dynamic))
}
