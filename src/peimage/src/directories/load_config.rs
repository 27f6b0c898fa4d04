//! Load Config directory: a single architecture-discriminated record.
//! Only fields up to the declared `Size` are trusted; anything past it is
//! left absent rather than read from adjacent, unrelated bytes.

use crate::header::{MachineWidth, Section};
use crate::safety::View;

#[derive(Debug, Clone, Default)]
pub struct LoadConfig {
    pub size: u32,
    pub time_date_stamp: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub global_flags_clear: u32,
    pub global_flags_set: u32,
    pub critical_section_default_timeout: u32,
    pub security_cookie: Option<u64>,
    pub se_handler_table: Option<u64>,
    pub se_handler_count: Option<u32>,
    pub guard_cf_check_function_pointer: Option<u64>,
    pub guard_cf_function_table: Option<u64>,
    pub guard_cf_function_count: Option<u32>,
    pub guard_flags: Option<u32>,
}

fn pointer_at(view: &View, offset: u64, is_64bit: bool) -> Option<u64> {
    if is_64bit {
        view.read_u64(offset)
    } else {
        view.read_u32(offset).map(|v| v as u64)
    }
}

pub fn parse(view: &View, sections: &[Section], dir_rva: u32, width: MachineWidth) -> Option<LoadConfig> {
    let offset = view.rva_to_offset(sections, dir_rva)?;
    let is_64bit = width.is_64bit();

    let size = view.read_u32(offset)?;
    let time_date_stamp = view.read_u32(offset + 4)?;
    let major_version = view.read_u16(offset + 8)?;
    let minor_version = view.read_u16(offset + 10)?;
    let global_flags_clear = view.read_u32(offset + 12)?;
    let global_flags_set = view.read_u32(offset + 16)?;
    let critical_section_default_timeout = view.read_u32(offset + 20)?;

    let declared_end = offset + size as u64;
    let present = |field_offset: u64, field_len: u64| field_offset + field_len <= declared_end;

    let pointer_width = if is_64bit { 8 } else { 4 };
    // Offsets below match IMAGE_LOAD_CONFIG_DIRECTORY32/64 layout past the
    // common prefix read above (offset 44 is ProcessAffinityMask/
    // ProcessHeapFlags + CSDVersion/DependentLoadFlags + EditList, all
    // skipped here as not part of the crate's surface).
    let security_cookie_off = if is_64bit { offset + 96 } else { offset + 64 };
    let security_cookie = present(security_cookie_off, pointer_width)
        .then(|| pointer_at(view, security_cookie_off, is_64bit))
        .flatten();

    let se_handler_table_off = security_cookie_off + pointer_width;
    let se_handler_table = (!is_64bit && present(se_handler_table_off, pointer_width))
        .then(|| pointer_at(view, se_handler_table_off, is_64bit))
        .flatten();
    let se_handler_count_off = se_handler_table_off + pointer_width;
    let se_handler_count = (!is_64bit && present(se_handler_count_off, 4))
        .then(|| view.read_u32(se_handler_count_off))
        .flatten();

    let guard_base = if is_64bit {
        se_handler_table_off
    } else {
        se_handler_count_off + 4
    };
    let guard_cf_check_function_pointer = present(guard_base, pointer_width)
        .then(|| pointer_at(view, guard_base, is_64bit))
        .flatten();
    let guard_cf_dispatch_off = guard_base + pointer_width;
    let guard_cf_function_table_off = guard_cf_dispatch_off + pointer_width;
    let guard_cf_function_table = present(guard_cf_function_table_off, pointer_width)
        .then(|| pointer_at(view, guard_cf_function_table_off, is_64bit))
        .flatten();
    let guard_cf_function_count_off = guard_cf_function_table_off + pointer_width;
    let guard_cf_function_count = present(guard_cf_function_count_off, 4)
        .then(|| view.read_u32(guard_cf_function_count_off))
        .flatten();
    let guard_flags_off = guard_cf_function_count_off + 4;
    let guard_flags = present(guard_flags_off, 4)
        .then(|| view.read_u32(guard_flags_off))
        .flatten();

    Some(LoadConfig {
        size,
        time_date_stamp,
        major_version,
        minor_version,
        global_flags_clear,
        global_flags_set,
        critical_section_default_timeout,
        security_cookie,
        se_handler_table,
        se_handler_count,
        guard_cf_check_function_pointer,
        guard_cf_function_table,
        guard_cf_function_count,
        guard_flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::section::SectionHeader;

    #[test]
    fn reads_common_prefix_and_clamps_to_declared_size() {
        let mut data = vec![0u8; 256];
        data[0..4].copy_from_slice(&24u32.to_le_bytes()); // Size only covers the prefix
        data[20..24].copy_from_slice(&5000u32.to_le_bytes());

        let header = SectionHeader {
            name: *b".rdata\0\0",
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
            name: ".rdata".to_string(),
        }];
        let view = View::new(&data);
        let cfg = parse(&view, &sections, 0, MachineWidth::Pe32).unwrap();
        assert_eq!(cfg.critical_section_default_timeout, 5000);
        assert!(cfg.security_cookie.is_none());
    }
}
