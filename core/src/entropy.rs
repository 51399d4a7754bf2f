//! # High-Entropy Address Filter
//!
//! Addresses whose interface identifier looks close to uniformly random were
//! most likely autoconfigured (SLAAC privacy addresses). They carry no
//! structure worth modelling, so the intake drops them before anything is
//! written.
//!
//! The score itself comes from an [`EntropyScorer`]; [`NybbleEntropy`] is the
//! scorer used in production.

use rayon::prelude::*;

use sieve_common::address::{AddressList, AddressRecord};
use sieve_common::info;

/// Scores how unpredictable the low-order bits of an address are.
///
/// Implementations must be pure: the score may depend on nothing but the
/// address and the bit length, since scoring runs in parallel.
pub trait EntropyScorer: Send + Sync {
    fn score(&self, addr: &AddressRecord, bit_length: u8) -> f64;
}

/// Normalised Shannon entropy over the 4-bit nybbles of the rightmost
/// `bit_length` bits.
///
/// The result lies in `[0, 1)`: the entropy is divided by `log2(n + 1)`
/// where `n` is the number of distinct symbols the nybbles could take, so
/// even a maximally mixed address stays strictly below a threshold of `1.0`.
/// When `bit_length` is not a multiple of four, the partial leading nybble
/// has its excess bits masked to zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct NybbleEntropy;

impl EntropyScorer for NybbleEntropy {
    fn score(&self, addr: &AddressRecord, bit_length: u8) -> f64 {
        let bits: u32 = u32::from(bit_length.min(128));
        if bits == 0 {
            return 0.0;
        }

        let value: u128 = addr.to_u128();
        let masked: u128 = if bits == 128 {
            value
        } else {
            value & ((1u128 << bits) - 1)
        };

        let nybbles: u32 = bits.div_ceil(4);
        let mut counts = [0u32; 16];
        for i in 0..nybbles {
            counts[((masked >> (4 * i)) & 0xf) as usize] += 1;
        }

        let total = f64::from(nybbles);
        let entropy: f64 = counts
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| {
                let p = f64::from(count) / total;
                -p * p.log2()
            })
            .sum();

        // Strictly above the highest reachable entropy for this many symbols
        // out of a 16-letter alphabet.
        let bound: f64 = f64::from(nybbles.min(16) + 1).log2();
        entropy / bound
    }
}

/// Keeps the addresses scoring strictly below `threshold`, in their original order.
///
/// Work is done in chunks of `emit_freq` addresses: each chunk is scored in
/// parallel, then a progress line is logged.
pub fn filter(
    addrs: &[AddressRecord],
    bit_length: u8,
    threshold: f64,
    emit_freq: usize,
    scorer: &dyn EntropyScorer,
) -> AddressList {
    let emit_freq: usize = emit_freq.max(1);
    let mut kept: AddressList = Vec::with_capacity(addrs.len());

    for (chunk_idx, chunk) in addrs.chunks(emit_freq).enumerate() {
        info!(
            "Processing {} out of {} for high entropy addresses.",
            chunk_idx * emit_freq,
            addrs.len()
        );

        let keep: Vec<bool> = chunk
            .par_iter()
            .map(|addr| scorer.score(addr, bit_length) < threshold)
            .collect();

        kept.extend(
            chunk
                .iter()
                .zip(keep)
                .filter_map(|(addr, keep)| keep.then_some(*addr)),
        );
    }

    kept
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
