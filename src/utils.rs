//! Utility functions used across the library.

use crate::consts::{HMAC_IPAD, HMAC_OPAD};

/// Builds a 256-entry translation table mapping every byte `b` to `b ^ mask`.
pub const fn xor_table(mask: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8) ^ mask;
        i += 1;
    }
    table
}

/// HMAC inner-pad translation table.
pub static TRANS_36: [u8; 256] = xor_table(HMAC_IPAD);

/// HMAC outer-pad translation table.
pub static TRANS_5C: [u8; 256] = xor_table(HMAC_OPAD);

/// Maps every byte of `input` through `table`.
#[inline(always)]
pub fn translate(input: &[u8], table: &[u8; 256]) -> Vec<u8> {
    input.iter().map(|&b| table[b as usize]).collect()
}

/// Overwrites secret material before the buffer is released.
#[inline(always)]
pub fn wipe(buf: &mut Vec<u8>) {
    #[cfg(feature = "zeroize")]
    {
        use zeroize::Zeroize;
        buf.zeroize();
    }
    #[cfg(not(feature = "zeroize"))]
    buf.clear();
}
