//! Debug directory: an array of `IMAGE_DEBUG_DIRECTORY` records, each
//! optionally carrying a CodeView PDB path.

use crate::header::Section;
use crate::limits::MAX_PATH;
use crate::safety::View;

pub const IMAGE_DEBUG_TYPE_CODEVIEW: u32 = 2;
const RSDS_SIGNATURE: u32 = 0x5344_5352; // "RSDS"
const NB10_SIGNATURE: u32 = 0x3031_424E; // "NB10"
const ENTRY_SIZE: u64 = 28;

#[derive(Debug, Clone)]
pub struct DebugDirectoryEntry {
    pub characteristics: u32,
    pub time_date_stamp: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub kind: u32,
    pub size_of_data: u32,
    pub address_of_raw_data: u32,
    pub pointer_to_raw_data: u32,
    pub pdb_path: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DebugTable {
    pub entries: Vec<DebugDirectoryEntry>,
}

/// Reads a CodeView record's PDB path, if the 24-byte raw header carries a
/// recognized signature. `"RSDS"` (PDB 7.0) puts the path at raw offset 24;
/// `"NB10"` (PDB 2.0) at raw offset 16; anything else has no path.
fn read_pdb_path(view: &View, raw_data_offset: u32) -> Option<String> {
    let base = raw_data_offset as u64;
    let signature = view.read_u32(base)?;
    let path_offset = match signature {
        RSDS_SIGNATURE => base + 24,
        NB10_SIGNATURE => base + 16,
        _ => return None,
    };
    view.read_cstring_ascii(path_offset, MAX_PATH)
}

/// Prefers the `.debug` section's `PointerToRawData` as the table's file
/// base when that section's `VirtualAddress` equals the directory RVA
/// (matches the source's preferred-location rule); otherwise resolves the
/// RVA through the section table as usual.
fn directory_table_offset(view: &View, sections: &[Section], dir_rva: u32) -> Option<u64> {
    if let Some(section) = sections
        .iter()
        .find(|s| s.name == ".debug" && s.header.virtual_address == dir_rva)
    {
        return Some(section.header.pointer_to_raw_data as u64);
    }
    view.rva_to_offset(sections, dir_rva)
}

pub fn parse(view: &View, sections: &[Section], dir_rva: u32, dir_size: u32) -> Option<DebugTable> {
    let table_offset = directory_table_offset(view, sections, dir_rva)?;
    let count = dir_size as u64 / ENTRY_SIZE;

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count {
        let Some(raw) = view.read_array::<28>(table_offset + i * ENTRY_SIZE) else {
            break;
        };
        let characteristics = u32::from_le_bytes(raw[0..4].try_into().unwrap());
        let time_date_stamp = u32::from_le_bytes(raw[4..8].try_into().unwrap());
        let major_version = u16::from_le_bytes(raw[8..10].try_into().unwrap());
        let minor_version = u16::from_le_bytes(raw[10..12].try_into().unwrap());
        let kind = u32::from_le_bytes(raw[12..16].try_into().unwrap());
        let size_of_data = u32::from_le_bytes(raw[16..20].try_into().unwrap());
        let address_of_raw_data = u32::from_le_bytes(raw[20..24].try_into().unwrap());
        let pointer_to_raw_data = u32::from_le_bytes(raw[24..28].try_into().unwrap());

        let pdb_path = if kind == IMAGE_DEBUG_TYPE_CODEVIEW {
            read_pdb_path(view, pointer_to_raw_data)
        } else {
            None
        };

        entries.push(DebugDirectoryEntry {
            characteristics,
            time_date_stamp,
            major_version,
            minor_version,
            kind,
            size_of_data,
            address_of_raw_data,
            pointer_to_raw_data,
            pdb_path,
        });
    }

    Some(DebugTable { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::section::SectionHeader;

    fn flat(len: usize) -> Vec<Section> {
        let header = SectionHeader {
            name: *b".rdata\0\0",
            virtual_size: len as u32,
            virtual_address: 0,
            size_of_raw_data: len as u32,
            pointer_to_raw_data: 0,
            pointer_to_relocations: 0,
            pointer_to_linenumbers: 0,
            number_of_relocations: 0,
            number_of_linenumbers: 0,
            characteristics: crate::header::SectionCharacteristics::empty(),
        };
        vec![Section {
            header,
            name: ".rdata".to_string(),
        }]
    }

    #[test]
    fn rsds_pdb_path_at_plus_24() {
        let mut data = vec![0u8; 128];
        data[12..16].copy_from_slice(&IMAGE_DEBUG_TYPE_CODEVIEW.to_le_bytes());
        data[24..28].copy_from_slice(&64u32.to_le_bytes()); // PointerToRawData
        data[64..68].copy_from_slice(&RSDS_SIGNATURE.to_le_bytes());
        data[88..91].copy_from_slice(b"a.p"); // path bytes start at 64+24=88
        data[91] = 0;

        let sections = flat(data.len());
        let view = View::new(&data);
        let table = parse(&view, &sections, 0, 28).unwrap();
        assert_eq!(table.entries[0].pdb_path.as_deref(), Some("a.p"));
    }
}
