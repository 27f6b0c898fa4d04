//! Export directory: a descriptor plus three parallel arrays (function
//! RVAs, name RVAs, name-ordinal WORDs).

use crate::header::Section;
use crate::limits::MAX_PATH;
use crate::safety::View;

#[derive(Debug, Clone)]
pub struct ExportEntry {
    pub rva: u32,
    pub ordinal: u32,
    pub name: Option<String>,
    pub forwarder: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExportTable {
    pub characteristics: u32,
    pub time_date_stamp: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub name: Option<String>,
    pub base: u32,
    pub number_of_functions: u32,
    pub number_of_names: u32,
    pub entries: Vec<ExportEntry>,
}

/// Parses the export directory. `dir_rva`/`dir_size` delimit the directory
/// itself — a function RVA landing inside that range is a forwarder string
/// rather than a code address (spec.md "overlapping interpretations").
pub fn parse(view: &View, sections: &[Section], dir_rva: u32, dir_size: u32) -> Option<ExportTable> {
    let offset = view.rva_to_offset(sections, dir_rva)?;
    let raw = view.read_array::<40>(offset)?;

    let characteristics = u32::from_le_bytes(raw[0..4].try_into().unwrap());
    let time_date_stamp = u32::from_le_bytes(raw[4..8].try_into().unwrap());
    let major_version = u16::from_le_bytes(raw[8..10].try_into().unwrap());
    let minor_version = u16::from_le_bytes(raw[10..12].try_into().unwrap());
    let name_rva = u32::from_le_bytes(raw[12..16].try_into().unwrap());
    let base = u32::from_le_bytes(raw[16..20].try_into().unwrap());
    let number_of_functions = u32::from_le_bytes(raw[20..24].try_into().unwrap());
    let number_of_names = u32::from_le_bytes(raw[24..28].try_into().unwrap());
    let address_of_functions = u32::from_le_bytes(raw[28..32].try_into().unwrap());
    let address_of_names = u32::from_le_bytes(raw[32..36].try_into().unwrap());
    let address_of_name_ordinals = u32::from_le_bytes(raw[36..40].try_into().unwrap());

    let name = read_string_at_rva(view, sections, name_rva);

    let dir_start = dir_rva;
    let dir_end = dir_rva.saturating_add(dir_size);

    // Cap traversal to the same scale as import parsing guards against —
    // a crafted NumberOfFunctions shouldn't drive an unbounded loop.
    let func_count = number_of_functions.min(crate::limits::MAX_FUNCS_PER_MODULE as u32);

    let mut name_ordinals = Vec::with_capacity(number_of_names.min(func_count.max(1)) as usize);
    for i in 0..number_of_names.min(crate::limits::MAX_FUNCS_PER_MODULE as u32) {
        let Some(ord_offset) = view.rva_to_offset(
            sections,
            address_of_name_ordinals.saturating_add(i.saturating_mul(2)),
        ) else {
            break;
        };
        let Some(ord) = view.read_u16(ord_offset) else {
            break;
        };
        name_ordinals.push(ord);
    }

    let mut entries = Vec::with_capacity(func_count as usize);
    for i in 0..func_count {
        let Some(func_offset) =
            view.rva_to_offset(sections, address_of_functions.saturating_add(i.saturating_mul(4)))
        else {
            break;
        };
        let Some(function_rva) = view.read_u32(func_offset) else {
            break;
        };
        if function_rva == 0 {
            continue;
        }

        let forwarder = if function_rva >= dir_start && function_rva < dir_end {
            read_string_at_rva(view, sections, function_rva)
        } else {
            None
        };

        let name = name_ordinals
            .iter()
            .position(|&ord| ord as u32 == i)
            .and_then(|k| {
                let name_rva_offset =
                    view.rva_to_offset(sections, address_of_names.saturating_add((k as u32).saturating_mul(4)))?;
                let name_rva = view.read_u32(name_rva_offset)?;
                read_string_at_rva(view, sections, name_rva)
            });

        entries.push(ExportEntry {
            rva: function_rva,
            ordinal: base.saturating_add(i),
            name,
            forwarder,
        });
    }

    Some(ExportTable {
        characteristics,
        time_date_stamp,
        major_version,
        minor_version,
        name,
        base,
        number_of_functions,
        number_of_names,
        entries,
    })
}

fn read_string_at_rva(view: &View, sections: &[Section], rva: u32) -> Option<String> {
    let offset = view.rva_to_offset(sections, rva)?;
    view.read_cstring_ascii(offset, MAX_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::section::SectionHeader;

    fn text_section(view_data: &[u8]) -> Vec<Section> {
        let header = SectionHeader {
            name: *b".text\0\0\0",
            virtual_size: view_data.len() as u32,
            virtual_address: 0x1000,
            size_of_raw_data: view_data.len() as u32,
            pointer_to_raw_data: 0,
            pointer_to_relocations: 0,
            pointer_to_linenumbers: 0,
            number_of_relocations: 0,
            number_of_linenumbers: 0,
            characteristics: crate::header::SectionCharacteristics::empty(),
        };
        vec![Section {
            header,
            name: ".text".to_string(),
        }]
    }

    #[test]
    fn parses_single_named_export() {
        let mut data = vec![0u8; 0x100];
        // Export directory at file offset 0, RVA 0x1000.
        data[12..16].copy_from_slice(&0u32.to_le_bytes()); // Name RVA = 0 (unused)
        data[16..20].copy_from_slice(&1u32.to_le_bytes()); // Base = 1
        data[20..24].copy_from_slice(&1u32.to_le_bytes()); // NumberOfFunctions
        data[24..28].copy_from_slice(&1u32.to_le_bytes()); // NumberOfNames
        data[28..32].copy_from_slice(&0x1000_0028u32.to_le_bytes()); // AddressOfFunctions (RVA 0x1028)
        data[32..36].copy_from_slice(&0x1000_0030u32.to_le_bytes()); // AddressOfNames placeholder, fixed below
        data[36..40].copy_from_slice(&0x1000_0038u32.to_le_bytes()); // AddressOfNameOrdinals placeholder

        // Place function RVA array (1 entry) at RVA 0x1028 -> file offset 0x28.
        data[0x28..0x2C].copy_from_slice(&0x1050u32.to_le_bytes());
        // Name RVA array (1 entry) at RVA 0x1030 -> file offset 0x30.
        data[0x30..0x34].copy_from_slice(&0x1060u32.to_le_bytes());
        // Name ordinal array (1 entry) at RVA 0x1038 -> file offset 0x38.
        data[0x38..0x3A].copy_from_slice(&0u16.to_le_bytes());
        // Function body placeholder at RVA 0x1050 -> offset 0x50 (not read).
        // Name string "foo\0" at RVA 0x1060 -> offset 0x60.
        data[0x60..0x64].copy_from_slice(b"foo\0");

        data[32..36].copy_from_slice(&0x1030u32.to_le_bytes());
        data[36..40].copy_from_slice(&0x1038u32.to_le_bytes());
        data[28..32].copy_from_slice(&0x1028u32.to_le_bytes());

        let sections = text_section(&data);
        let view = View::new(&data);
        let table = parse(&view, &sections, 0x1000, 0x100).expect("export table");
        assert_eq!(table.entries.len(), 1);
        assert_eq!(table.entries[0].name.as_deref(), Some("foo"));
        assert_eq!(table.entries[0].rva, 0x1050);
        assert_eq!(table.entries[0].ordinal, 1);
    }
}
