//! DFU suffix layout and checksum.
//!
//! A suffixed image is the original firmware followed by a 12 byte
//! little-endian record (device identifiers, DFU revision and signature)
//! and the little-endian CRC32/IEEE of everything before it. DFU loaders
//! read the suffix backwards from the end of the file to validate that an
//! image is meant for their device.
use byteorder::{LittleEndian, WriteBytesExt};
use crc::crc32::{self, Hasher32};
use std::io::{self, Write};

/// bcdDFU revision advertised by every suffix this tool writes.
pub const DFU_REVISION: u16 = 0x0100;
/// Signature tail of the record: "UFD" reversed on the wire, then the
/// total suffix length (16).
pub const SIGNATURE: [u8; 4] = [0x55, 0x46, 0x44, 0x10];

pub const RECORD_LENGTH: usize = 12;
pub const SUFFIX_LENGTH: usize = 16;

/// Device identifiers encoded in the suffix record. A field left at
/// `0xFFFF` tells the loader not to match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suffix {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bcd_version: u16,
}

impl Suffix {
    /// Serializes the 12 byte record, fields little-endian in wire order.
    pub fn record(&self) -> [u8; RECORD_LENGTH] {
        let mut record = [0u8; RECORD_LENGTH];
        record[0..2].copy_from_slice(&self.bcd_version.to_le_bytes());
        record[2..4].copy_from_slice(&self.product_id.to_le_bytes());
        record[4..6].copy_from_slice(&self.vendor_id.to_le_bytes());
        record[6..8].copy_from_slice(&DFU_REVISION.to_le_bytes());
        record[8..].copy_from_slice(&SIGNATURE);
        record
    }

    /// Reads a suffix back from the tail of a suffixed image, checking the
    /// signature bytes and re-deriving the CRC against the stored one.
    /// Returns `None` for images that do not end in a valid suffix.
    pub fn parse(image: &[u8]) -> Option<Suffix> {
        if image.len() < SUFFIX_LENGTH {
            return None;
        }
        let (covered, stored) = image.split_at(image.len() - 4);
        let stored_crc = u32::from_le_bytes(stored.try_into().ok()?);

        let mut digest = crc32::Digest::new(crc32::IEEE);
        digest.write(covered);
        if digest.sum32() != stored_crc {
            return None;
        }

        let record = &covered[covered.len() - RECORD_LENGTH..];
        if record[8..] != SIGNATURE {
            return None;
        }

        Some(Suffix {
            bcd_version: u16::from_le_bytes([record[0], record[1]]),
            product_id: u16::from_le_bytes([record[2], record[3]]),
            vendor_id: u16::from_le_bytes([record[4], record[5]]),
        })
    }
}

/// Writes `image` unchanged, then the suffix record, then the CRC32/IEEE
/// of (image ++ record). Returns the CRC that was appended.
pub fn append<W: Write>(suffix: &Suffix, image: &[u8], output: &mut W) -> io::Result<u32> {
    let record = suffix.record();

    let mut digest = crc32::Digest::new(crc32::IEEE);
    digest.write(image);
    digest.write(&record);
    let crc = digest.sum32();

    output.write_all(image)?;
    output.write_all(&record)?;
    output.write_u32::<LittleEndian>(crc)?;
    output.flush()?;
    Ok(crc)
}
