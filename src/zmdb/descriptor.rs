//! The 96-entry descriptor table and the atom-id index it points to

use super::bytes::{read_u16_le, read_u32_le};
use super::error::ZmdbError;

type Result<T> = std::result::Result<T, ZmdbError>;

pub const DESCRIPTOR_COUNT: usize = 96;
pub const DESCRIPTOR_SIZE: usize = 20;

const ENTRY_SIZE_OFFSET: usize = 6;
const ENTRY_COUNT_OFFSET: usize = 8;
const DATA_OFFSET_OFFSET: usize = 16;

/// One slot of the descriptor table: a homogeneous array of `entry_count`
/// entries, each `entry_size` bytes, starting at `data_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub entry_size: u16,
    pub entry_count: u32,
    pub data_offset: u32,
}

impl Descriptor {
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

/// Read all 96 descriptor slots starting at `table_offset` (spec §3.3).
pub fn read_descriptor_table(buf: &[u8], table_offset: usize) -> Result<Vec<Descriptor>> {
    (0..DESCRIPTOR_COUNT)
        .map(|i| read_descriptor(buf, table_offset + i * DESCRIPTOR_SIZE))
        .collect()
}

fn read_descriptor(buf: &[u8], offset: usize) -> Result<Descriptor> {
    Ok(Descriptor {
        entry_size: read_u16_le(buf, offset + ENTRY_SIZE_OFFSET)?,
        entry_count: read_u32_le(buf, offset + ENTRY_COUNT_OFFSET)?,
        data_offset: read_u32_le(buf, offset + DATA_OFFSET_OFFSET)?,
    })
}

/// One row of the atom-id index held in descriptor 0: maps an atom-id to
/// the offset of its record's data (spec §3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub atom_id: u32,
    pub record_offset: u32,
}

const INDEX_ENTRY_SIZE: usize = 8;

/// Decode descriptor 0's entries into the atom-id index.
pub fn read_index_table(buf: &[u8], descriptor: &Descriptor) -> Result<Vec<IndexEntry>> {
    let mut out = Vec::with_capacity(descriptor.entry_count as usize);
    for i in 0..descriptor.entry_count as usize {
        let offset = descriptor.data_offset as usize + i * INDEX_ENTRY_SIZE;
        out.push(IndexEntry {
            atom_id: read_u32_le(buf, offset)?,
            record_offset: read_u32_le(buf, offset + 4)?,
        });
    }
    Ok(out)
}

/// Split an atom-id into its schema byte and 24-bit entry id (spec §3.5).
pub fn split_atom_id(atom_id: u32) -> (u8, u32) {
    ((atom_id >> 24) as u8, atom_id & 0x00ff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_descriptor(entry_size: u16, entry_count: u32, data_offset: u32) -> [u8; DESCRIPTOR_SIZE] {
        let mut out = [0u8; DESCRIPTOR_SIZE];
        out[ENTRY_SIZE_OFFSET..ENTRY_SIZE_OFFSET + 2].copy_from_slice(&entry_size.to_le_bytes());
        out[ENTRY_COUNT_OFFSET..ENTRY_COUNT_OFFSET + 4].copy_from_slice(&entry_count.to_le_bytes());
        out[DATA_OFFSET_OFFSET..DATA_OFFSET_OFFSET + 4].copy_from_slice(&data_offset.to_le_bytes());
        out
    }

    #[test]
    fn reads_all_96_descriptors() {
        let mut buf = Vec::new();
        for i in 0..DESCRIPTOR_COUNT {
            buf.extend_from_slice(&encode_descriptor(8, i as u32, 0x1000 + i as u32));
        }
        let table = read_descriptor_table(&buf, 0).unwrap();
        assert_eq!(table.len(), DESCRIPTOR_COUNT);
        assert_eq!(table[5].entry_count, 5);
        assert_eq!(table[5].data_offset, 0x1005);
    }

    #[test]
    fn reads_index_entries() {
        let descriptor = Descriptor {
            entry_size: 8,
            entry_count: 2,
            data_offset: 0,
        };
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x01000001u32.to_le_bytes());
        buf.extend_from_slice(&0x100u32.to_le_bytes());
        buf.extend_from_slice(&0x08000002u32.to_le_bytes());
        buf.extend_from_slice(&0x200u32.to_le_bytes());

        let entries = read_index_table(&buf, &descriptor).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].atom_id, 0x01000001);
        assert_eq!(entries[0].record_offset, 0x100);
        assert_eq!(entries[1].atom_id, 0x08000002);
    }

    #[test]
    fn splits_atom_id_into_schema_and_entry() {
        assert_eq!(split_atom_id(0x01_00ABCD), (0x01, 0x00ABCD));
        assert_eq!(split_atom_id(0x12_FFFFFF), (0x12, 0x00FFFFFF));
    }
}
