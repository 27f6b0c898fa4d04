//! Import directory: a null-terminated array of descriptors, each walking
//! two thunk arrays (original/name table and the IAT).

use crate::header::{MachineWidth, Section};
use crate::limits::{MAX_FUNCS_PER_MODULE, MAX_MODULES, MAX_PATH};
use crate::safety::View;

const ORDINAL_FLAG_32: u32 = 0x8000_0000;
const ORDINAL_FLAG_64: u64 = 0x8000_0000_0000_0000;

#[derive(Debug, Clone)]
pub struct ImportFunction {
    pub ordinal: Option<u16>,
    pub hint: Option<u16>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImportModule {
    pub name: Option<String>,
    pub original_first_thunk: u32,
    pub first_thunk: u32,
    pub time_date_stamp: u32,
    pub functions: Vec<ImportFunction>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    pub modules: Vec<ImportModule>,
}

struct Descriptor {
    original_first_thunk: u32,
    time_date_stamp: u32,
    name: u32,
    first_thunk: u32,
}

fn read_descriptor(view: &View, offset: u64) -> Option<Descriptor> {
    let raw = view.read_array::<20>(offset)?;
    let descriptor = Descriptor {
        original_first_thunk: u32::from_le_bytes(raw[0..4].try_into().unwrap()),
        time_date_stamp: u32::from_le_bytes(raw[4..8].try_into().unwrap()),
        name: u32::from_le_bytes(raw[12..16].try_into().unwrap()),
        first_thunk: u32::from_le_bytes(raw[16..20].try_into().unwrap()),
    };
    if descriptor.original_first_thunk == 0
        && descriptor.time_date_stamp == 0
        && descriptor.name == 0
        && descriptor.first_thunk == 0
    {
        None
    } else {
        Some(descriptor)
    }
}

fn walk_thunks(
    view: &View,
    sections: &[Section],
    thunk_rva: u32,
    width: MachineWidth,
) -> Vec<ImportFunction> {
    let mut functions = Vec::new();
    if thunk_rva == 0 {
        return functions;
    }
    let entry_size: u32 = if width.is_64bit() { 8 } else { 4 };
    let mut cursor_rva = thunk_rva;

    for _ in 0..MAX_FUNCS_PER_MODULE {
        let Some(offset) = view.rva_to_offset(sections, cursor_rva) else {
            break;
        };

        let (raw, ordinal_flag_set, ordinal, address_of_data) = if width.is_64bit() {
            let Some(value) = view.read_u64(offset) else {
                break;
            };
            (
                value,
                value & ORDINAL_FLAG_64 != 0,
                (value & 0xFFFF) as u16,
                (value & 0x7FFF_FFFF_FFFF_FFFF) as u32,
            )
        } else {
            let Some(value) = view.read_u32(offset) else {
                break;
            };
            (
                value as u64,
                value & ORDINAL_FLAG_32 != 0,
                (value & 0xFFFF) as u16,
                value & 0x7FFF_FFFF,
            )
        };

        if raw == 0 {
            break;
        }

        if ordinal_flag_set {
            functions.push(ImportFunction {
                ordinal: Some(ordinal),
                hint: None,
                name: None,
            });
        } else if let Some(hint_name_offset) = view.rva_to_offset(sections, address_of_data) {
            let hint = view.read_u16(hint_name_offset);
            let name = view.read_cstring_ascii(hint_name_offset + 2, MAX_PATH);
            functions.push(ImportFunction {
                ordinal: None,
                hint,
                name,
            });
        } else {
            functions.push(ImportFunction {
                ordinal: None,
                hint: None,
                name: None,
            });
        }

        cursor_rva = cursor_rva.saturating_add(entry_size);
    }

    functions
}

/// Walks the null-terminated descriptor array at `dir_rva`. Caps total
/// modules at [`MAX_MODULES`] and total functions per module at
/// [`MAX_FUNCS_PER_MODULE`] — exceeding the module cap halts parsing
/// entirely, matching the source's "bounds bogus loops" guard.
pub fn parse(
    view: &View,
    sections: &[Section],
    dir_rva: u32,
    width: MachineWidth,
) -> Option<ImportTable> {
    let mut modules = Vec::new();
    let mut cursor_rva = dir_rva;

    for _ in 0..MAX_MODULES {
        let Some(offset) = view.rva_to_offset(sections, cursor_rva) else {
            break;
        };
        let Some(descriptor) = read_descriptor(view, offset) else {
            break;
        };

        let thunk_rva = if descriptor.original_first_thunk != 0 {
            descriptor.original_first_thunk
        } else {
            descriptor.first_thunk
        };
        let functions = walk_thunks(view, sections, thunk_rva, width);

        let name = view
            .rva_to_offset(sections, descriptor.name)
            .and_then(|o| view.read_cstring_ascii(o, MAX_PATH));

        modules.push(ImportModule {
            name,
            original_first_thunk: descriptor.original_first_thunk,
            first_thunk: descriptor.first_thunk,
            time_date_stamp: descriptor.time_date_stamp,
            functions,
        });

        cursor_rva = cursor_rva.saturating_add(20);
    }

    Some(ImportTable { modules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::section::SectionHeader;

    fn flat_section(len: usize) -> Vec<Section> {
        let header = SectionHeader {
            name: *b".idata\0\0",
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
            name: ".idata".to_string(),
        }]
    }

    #[test]
    fn self_referential_descriptor_emits_empty_function_list() {
        let mut data = vec![0u8; 0x200];
        // One descriptor: OriginalFirstThunk=0, Name=0x100, FirstThunk=0.
        data[12..16].copy_from_slice(&0x100u32.to_le_bytes());
        data[0x100..0x100 + 6].copy_from_slice(b"A.DLL\0");
        // Next descriptor (at +20) is all zero -> terminator.

        let sections = flat_section(data.len());
        let view = View::new(&data);
        let table = parse(&view, &sections, 0, MachineWidth::Pe32).unwrap();
        assert_eq!(table.modules.len(), 1);
        assert_eq!(table.modules[0].name.as_deref(), Some("A.DLL"));
        assert!(table.modules[0].functions.is_empty());
    }

    #[test]
    fn ordinal_import_sets_ordinal_not_name() {
        let mut data = vec![0u8; 0x200];
        data[0..4].copy_from_slice(&0x40u32.to_le_bytes()); // OriginalFirstThunk
        data[12..16].copy_from_slice(&0x100u32.to_le_bytes()); // Name
        data[0x100..0x100 + 6].copy_from_slice(b"B.DLL\0");
        // Thunk array at RVA 0x40: one ordinal import, then terminator.
        let ordinal_thunk = ORDINAL_FLAG_32 | 0x8001u32;
        data[0x40..0x44].copy_from_slice(&ordinal_thunk.to_le_bytes());

        let sections = flat_section(data.len());
        let view = View::new(&data);
        let table = parse(&view, &sections, 0, MachineWidth::Pe32).unwrap();
        assert_eq!(table.modules[0].functions.len(), 1);
        assert_eq!(table.modules[0].functions[0].ordinal, Some(0x8001));
    }
}
