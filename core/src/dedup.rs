use std::collections::HashSet;

use sieve_common::address::{AddressList, AddressRecord};
use sieve_common::info;

/// Removes repeated addresses, keeping the first occurrence of each.
///
/// Progress is logged every `emit_freq` addresses so multi-million entry
/// inputs show signs of life.
pub fn dedup(addrs: &[AddressRecord], emit_freq: usize) -> AddressList {
    let emit_freq: usize = emit_freq.max(1);
    let mut seen: HashSet<AddressRecord> = HashSet::with_capacity(addrs.len());
    let mut unique: AddressList = Vec::with_capacity(addrs.len());

    for (idx, addr) in addrs.iter().enumerate() {
        if idx % emit_freq == 0 {
            info!("Processing {idx} out of {} for duplicate addresses.", addrs.len());
        }
        if seen.insert(*addr) {
            unique.push(*addr);
        }
    }

    unique
}
