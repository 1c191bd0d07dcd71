// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/blake2b.rs
// Version: 1.1.0
//
// This file implements the streaming keyed BLAKE2b-256 primitive used by the
// Lykos miner, located in the core subdirectory. Both the prehash table build
// and the per-nonce candidate derivation go through this implementation, so
// it must match the standard BLAKE2b compression function bit-for-bit: the
// node re-derives the same digests to validate submissions.
//
// Tree Location:
// - src/core/blake2b.rs (BLAKE2b-256 primitive)
// - Depends on: std

/// Digest length in bytes. The puzzle works in a 256-bit domain throughout.
pub const DIGEST_LEN: usize = 32;

/// Input block size in bytes.
pub const BLOCK_LEN: usize = 128;

// BLAKE2b initialization vector.
const IV: [u64; 8] = [
    0x6A09E667F3BCC908,
    0xBB67AE8584CAA73B,
    0x3C6EF372FE94F82B,
    0xA54FF53A5F1D36F1,
    0x510E527FADE682D1,
    0x9B05688C2B3E6C1F,
    0x1F83D9ABFB41BD6B,
    0x5BE0CD19137E2179,
];

// Message word schedule for the 12 mixing rounds. Rounds 10 and 11 repeat
// rows 0 and 1.
const SIGMA: [[usize; 16]; 12] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

#[inline(always)]
fn rotr64(x: u64, n: u32) -> u64 {
    (x >> n) | (x << (64 - n))
}

/// Streaming BLAKE2b-256 hash context.
///
/// The context is owned by whichever call site created it and is never shared
/// across threads. `finalize` takes the context by value, so it can be called
/// exactly once per instance.
pub struct Blake2b256 {
    // input buffer
    b: [u8; BLOCK_LEN],
    // chained state
    h: [u64; 8],
    // total number of bytes, two words with manual carry
    t: [u64; 2],
    // fill counter for b
    c: usize,
}

impl Blake2b256 {
    /// Create an unkeyed hashing context.
    pub fn new() -> Self {
        Self::init(&[])
    }

    /// Create a keyed hashing context. The key must be at most 32 bytes.
    pub fn keyed(key: &[u8]) -> Self {
        debug_assert!(key.len() <= DIGEST_LEN, "key longer than 32 bytes");
        Self::init(key)
    }

    fn init(key: &[u8]) -> Self {
        let mut h = IV;
        // parameter block word 0: digest length, fanout = depth = 1, key length
        h[0] ^= 0x0101_0000 ^ ((key.len() as u64) << 8) ^ (DIGEST_LEN as u64);

        let mut ctx = Self {
            b: [0u8; BLOCK_LEN],
            h,
            t: [0, 0],
            c: 0,
        };

        if !key.is_empty() {
            // keyed variant absorbs the key as a zero-padded first block
            ctx.b[..key.len()].copy_from_slice(key);
            ctx.c = BLOCK_LEN;
        }

        ctx
    }

    // Fold `n` freshly absorbed bytes into the 128-bit byte counter.
    // Two-word addition with explicit carry detection keeps this portable
    // across host and device execution models.
    #[inline(always)]
    fn bump_counter(&mut self, n: u64) {
        let sum = self.t[0].wrapping_add(n);
        if sum < n {
            self.t[1] = self.t[1].wrapping_add(1);
        }
        self.t[0] = sum;
    }

    fn compress(&mut self, last: bool) {
        let mut m = [0u64; 16];
        for (i, word) in m.iter_mut().enumerate() {
            let off = i * 8;
            *word = u64::from_le_bytes(
                self.b[off..off + 8].try_into().expect("block slice is 8 bytes"),
            );
        }

        let mut v = [0u64; 16];
        v[..8].copy_from_slice(&self.h);
        v[8..].copy_from_slice(&IV);
        v[12] ^= self.t[0];
        v[13] ^= self.t[1];
        if last {
            v[14] = !v[14];
        }

        macro_rules! g {
            ($a:expr, $b:expr, $c:expr, $d:expr, $x:expr, $y:expr) => {
                v[$a] = v[$a].wrapping_add(v[$b]).wrapping_add($x);
                v[$d] = rotr64(v[$d] ^ v[$a], 32);
                v[$c] = v[$c].wrapping_add(v[$d]);
                v[$b] = rotr64(v[$b] ^ v[$c], 24);
                v[$a] = v[$a].wrapping_add(v[$b]).wrapping_add($y);
                v[$d] = rotr64(v[$d] ^ v[$a], 16);
                v[$c] = v[$c].wrapping_add(v[$d]);
                v[$b] = rotr64(v[$b] ^ v[$c], 63);
            };
        }

        for s in &SIGMA {
            g!(0, 4, 8, 12, m[s[0]], m[s[1]]);
            g!(1, 5, 9, 13, m[s[2]], m[s[3]]);
            g!(2, 6, 10, 14, m[s[4]], m[s[5]]);
            g!(3, 7, 11, 15, m[s[6]], m[s[7]]);
            g!(0, 5, 10, 15, m[s[8]], m[s[9]]);
            g!(1, 6, 11, 12, m[s[10]], m[s[11]]);
            g!(2, 7, 8, 13, m[s[12]], m[s[13]]);
            g!(3, 4, 9, 14, m[s[14]], m[s[15]]);
        }

        for i in 0..8 {
            self.h[i] ^= v[i] ^ v[i + 8];
        }
    }

    /// Absorb message bytes. May be called repeatedly; the buffer is only
    /// compressed once it is full and more input follows, so the last block
    /// is always available for the final mixing.
    pub fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            if self.c == BLOCK_LEN {
                self.bump_counter(BLOCK_LEN as u64);
                self.compress(false);
                self.c = 0;
            }
            let take = (BLOCK_LEN - self.c).min(data.len());
            self.b[self.c..self.c + take].copy_from_slice(&data[..take]);
            self.c += take;
            data = &data[take..];
        }
    }

    /// Finish the hash and produce the 32-byte digest. Consumes the context.
    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        self.bump_counter(self.c as u64);
        // zero-pad the remaining buffer, mark last block
        self.b[self.c..].fill(0);
        self.compress(true);

        let mut out = [0u8; DIGEST_LEN];
        for i in 0..4 {
            out[i * 8..(i + 1) * 8].copy_from_slice(&self.h[i].to_le_bytes());
        }
        out
    }
}

impl Default for Blake2b256 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot unkeyed BLAKE2b-256.
pub fn blake2b256(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut ctx = Blake2b256::new();
    ctx.update(data);
    ctx.finalize()
}

/// One-shot keyed BLAKE2b-256 (key at most 32 bytes).
pub fn blake2b256_keyed(key: &[u8], data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut ctx = Blake2b256::keyed(key);
    ctx.update(data);
    ctx.finalize()
}

// Changelog:
// - v1.1.0: Counter bump rewritten as explicit two-word add with `sum < n`
//   carry test (was a u128 widening add, not portable to device backends).
// - v1.0.0: Initial streaming keyed BLAKE2b-256 implementation.
