//! Exception directory: a flat array of `RUNTIME_FUNCTION` records
//! describing unwind info for function ranges.

use crate::header::Section;
use crate::safety::View;

const ENTRY_SIZE: u64 = 12;

#[derive(Debug, Clone, Copy)]
pub struct RuntimeFunction {
    pub begin_address: u32,
    pub end_address: u32,
    pub unwind_info_address: u32,
}

/// Reads `dir_size / sizeof(RUNTIME_FUNCTION)` entries at the directory
/// RVA. The full extent is bounds-checked up front; a directory that
/// doesn't fit the buffer yields `None` rather than a truncated table,
/// since every entry here is fixed-width and equally trustworthy or not.
pub fn parse(view: &View, sections: &[Section], dir_rva: u32, dir_size: u32) -> Option<Vec<RuntimeFunction>> {
    let offset = view.rva_to_offset(sections, dir_rva)?;
    let count = dir_size as u64 / ENTRY_SIZE;
    view.read_bytes(offset, (count * ENTRY_SIZE) as usize)?;

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count {
        let raw = view.read_array::<12>(offset + i * ENTRY_SIZE)?;
        entries.push(RuntimeFunction {
            begin_address: u32::from_le_bytes(raw[0..4].try_into().unwrap()),
            end_address: u32::from_le_bytes(raw[4..8].try_into().unwrap()),
            unwind_info_address: u32::from_le_bytes(raw[8..12].try_into().unwrap()),
        });
    }
    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::section::SectionHeader;

    #[test]
    fn reads_two_entries() {
        let mut data = vec![0u8; 64];
        data[0..4].copy_from_slice(&0x1000u32.to_le_bytes());
        data[4..8].copy_from_slice(&0x1010u32.to_le_bytes());
        data[8..12].copy_from_slice(&0x2000u32.to_le_bytes());
        data[12..16].copy_from_slice(&0x1010u32.to_le_bytes());
        data[16..20].copy_from_slice(&0x1020u32.to_le_bytes());
        data[20..24].copy_from_slice(&0x2010u32.to_le_bytes());

        let header = SectionHeader {
            name: *b".pdata\0\0",
            virtual_size: 64,
            virtual_address: 0,
            size_of_raw_data: 64,
            pointer_to_raw_data: 0,
            pointer_to_relocations: 0,
            pointer_to_linenumbers: 0,
            number_of_relocations: 0,
            number_of_linenumbers: 0,
            characteristics: crate::header::SectionCharacteristics::empty(),
        };
        let sections = vec![Section {
            header,
            name: ".pdata".to_string(),
        }];
        let view = View::new(&data);
        let entries = parse(&view, &sections, 0, 24).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].begin_address, 0x1010);
    }
}
