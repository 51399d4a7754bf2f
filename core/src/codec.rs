//! # Address File Codec
//!
//! Reads and writes address lists in the two on-disk encodings:
//!
//! * **Binary**: records of [`AddressRecord::LEN`] bytes back to back. A file
//!   whose length is not a multiple of the record size is truncated and is
//!   rejected as a whole.
//! * **Text**: one address per line, standard IPv6 notation or 32 bare hex
//!   digits. Blank lines are skipped, any other unparseable line is rejected.
//!
//! Binary encoding round-trips exactly. Text encoding preserves every address
//! but not the original formatting, since it always writes canonical notation.

use std::io::{self, Write};
use std::path::Path;

use sieve_common::address::{AddressList, AddressRecord};
use sieve_common::config::AddressEncoding;
use sieve_common::error::{IntakeError, IntakeResult};

/// Reads and decodes an entire address file.
pub fn decode(path: &Path, encoding: AddressEncoding) -> IntakeResult<AddressList> {
    let bytes: Vec<u8> = std::fs::read(path).map_err(|e| IntakeError::io("read", path, e))?;
    decode_bytes(&bytes, encoding).map_err(|reason| IntakeError::format(path, reason))
}

pub fn decode_bytes(bytes: &[u8], encoding: AddressEncoding) -> Result<AddressList, String> {
    match encoding {
        AddressEncoding::Binary => decode_binary(bytes),
        AddressEncoding::Text => {
            let text: &str = std::str::from_utf8(bytes)
                .map_err(|e| format!("text address file is not valid UTF-8: {e}"))?;
            decode_text(text)
        }
    }
}

fn decode_binary(bytes: &[u8]) -> Result<AddressList, String> {
    let trailing: usize = bytes.len() % AddressRecord::LEN;
    if trailing != 0 {
        return Err(format!(
            "binary address file is truncated: {} bytes is not a multiple of {} ({} trailing bytes)",
            bytes.len(),
            AddressRecord::LEN,
            trailing
        ));
    }

    Ok(bytes
        .chunks_exact(AddressRecord::LEN)
        .filter_map(AddressRecord::from_slice)
        .collect())
}

fn decode_text(text: &str) -> Result<AddressList, String> {
    let mut addrs: AddressList = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: AddressRecord = line
            .parse()
            .map_err(|e| format!("line {}: {e}", idx + 1))?;
        addrs.push(record);
    }

    Ok(addrs)
}

pub fn encode(addrs: &[AddressRecord], encoding: AddressEncoding) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::with_capacity(addrs.len() * AddressRecord::LEN);
    // Writing into a Vec cannot fail.
    let _ = encode_into(&mut buffer, addrs, encoding);
    buffer
}

/// Streams `addrs` into `writer` without building the whole encoding in memory.
pub fn encode_into<W: Write>(
    writer: &mut W,
    addrs: &[AddressRecord],
    encoding: AddressEncoding,
) -> io::Result<()> {
    match encoding {
        AddressEncoding::Binary => {
            for addr in addrs {
                writer.write_all(addr.as_bytes())?;
            }
        }
        AddressEncoding::Text => {
            for addr in addrs {
                writeln!(writer, "{addr}")?;
            }
        }
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
