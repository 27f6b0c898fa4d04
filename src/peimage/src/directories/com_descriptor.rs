//! COM Descriptor directory: a single `IMAGE_COR20_HEADER` record (the
//! CLR/.NET entry point into an otherwise ordinary PE image).

use crate::header::Section;
use crate::safety::View;

#[derive(Debug, Clone, Copy)]
pub struct DirectoryEntry {
    pub rva: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ComDescriptor {
    pub cb: u32,
    pub major_runtime_version: u16,
    pub minor_runtime_version: u16,
    pub metadata: DirectoryEntry,
    pub flags: u32,
    pub entry_point_token_or_rva: u32,
    pub resources: DirectoryEntry,
    pub strong_name_signature: DirectoryEntry,
    pub code_manager_table: DirectoryEntry,
    pub vtable_fixups: DirectoryEntry,
    pub export_address_table_jumps: DirectoryEntry,
    pub managed_native_header: DirectoryEntry,
}

pub fn parse(view: &View, sections: &[Section], dir_rva: u32) -> Option<ComDescriptor> {
    let offset = view.rva_to_offset(sections, dir_rva)?;
    let raw = view.read_array::<72>(offset)?;

    let u32_at = |o: usize| u32::from_le_bytes(raw[o..o + 4].try_into().unwrap());
    let dir_at = |o: usize| DirectoryEntry {
        rva: u32_at(o),
        size: u32_at(o + 4),
    };

    Some(ComDescriptor {
        cb: u32_at(0),
        major_runtime_version: u16::from_le_bytes(raw[4..6].try_into().unwrap()),
        minor_runtime_version: u16::from_le_bytes(raw[6..8].try_into().unwrap()),
        metadata: dir_at(8),
        flags: u32_at(16),
        entry_point_token_or_rva: u32_at(20),
        resources: dir_at(24),
        strong_name_signature: dir_at(32),
        code_manager_table: dir_at(40),
        vtable_fixups: dir_at(48),
        export_address_table_jumps: dir_at(56),
        managed_native_header: dir_at(64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::section::SectionHeader;

    #[test]
    fn reads_metadata_directory() {
        let mut data = vec![0u8; 128];
        data[0..4].copy_from_slice(&72u32.to_le_bytes());
        data[4..6].copy_from_slice(&2u16.to_le_bytes());
        data[8..12].copy_from_slice(&0x2000u32.to_le_bytes());
        data[12..16].copy_from_slice(&0x40u32.to_le_bytes());

        let header = SectionHeader {
            name: *b".text\0\0\0",
            virtual_size: data.len() as u32,
            virtual_address: 0,
            size_of_raw_data: data.len() as u32,
            pointer_to_raw_data: 0,
            pointer_to_relocations: 0,
            pointer_to_linenumbers: 0,
            number_of_relocations: 0,
            number_of_linenumbers: 0,
            characteristics: crate::header::SectionCharacteristics::empty(),
        };
        let sections = vec![Section {
            header,
            name: ".text".to_string(),
        }];
        let view = View::new(&data);
        let cor20 = parse(&view, &sections, 0).unwrap();
        assert_eq!(cor20.metadata.rva, 0x2000);
        assert_eq!(cor20.metadata.size, 0x40);
    }
}
