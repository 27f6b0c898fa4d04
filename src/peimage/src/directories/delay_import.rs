//! Delay Import directory: a null-terminated sequence of
//! `IMAGE_DELAYLOAD_DESCRIPTOR`s, each walking its Import Name Table with
//! three parallel arrays (IAT, Bound IAT, Unload Info) sampled alongside.

use crate::header::{MachineWidth, Section};
use crate::limits::{MAX_FUNCS_PER_MODULE, MAX_MODULES, MAX_PATH};
use crate::safety::View;

const ORDINAL_FLAG_32: u32 = 0x8000_0000;
const ORDINAL_FLAG_64: u64 = 0x8000_0000_0000_0000;

#[derive(Debug, Clone)]
pub struct DelayImportFunction {
    pub ordinal: Option<u16>,
    pub name: Option<String>,
    pub iat_value: Option<u64>,
    pub bound_iat_value: Option<u64>,
    pub unload_info_value: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct DelayImportDescriptor {
    pub attributes: u32,
    pub dll_name: Option<String>,
    pub time_date_stamp: u32,
    pub functions: Vec<DelayImportFunction>,
}

#[derive(Debug, Clone, Default)]
pub struct DelayImportTable {
    pub descriptors: Vec<DelayImportDescriptor>,
}

fn read_thunk_width(view: &View, offset: u64, is_64bit: bool) -> Option<(u64, bool, u16, u32)> {
    if is_64bit {
        let v = view.read_u64(offset)?;
        Some((
            v,
            v & ORDINAL_FLAG_64 != 0,
            (v & 0xFFFF) as u16,
            (v & 0x7FFF_FFFF_FFFF_FFFF) as u32,
        ))
    } else {
        let v = view.read_u32(offset)?;
        Some((v as u64, v & ORDINAL_FLAG_32 != 0, (v & 0xFFFF) as u16, v & 0x7FFF_FFFF))
    }
}

fn read_parallel_slot(view: &View, sections: &[Section], array_rva: u32, index: u32, is_64bit: bool) -> Option<u64> {
    if array_rva == 0 {
        return None;
    }
    let entry_size = if is_64bit { 8 } else { 4 };
    let offset = view.rva_to_offset(sections, array_rva.saturating_add(index.saturating_mul(entry_size)))?;
    if is_64bit {
        view.read_u64(offset)
    } else {
        view.read_u32(offset).map(|v| v as u64)
    }
}

pub fn parse(view: &View, sections: &[Section], dir_rva: u32, width: MachineWidth) -> Option<DelayImportTable> {
    let is_64bit = width.is_64bit();
    let mut descriptors = Vec::new();
    let mut cursor_rva = dir_rva;

    for _ in 0..MAX_MODULES {
        let Some(offset) = view.rva_to_offset(sections, cursor_rva) else {
            break;
        };
        let Some(raw) = view.read_array::<32>(offset) else {
            break;
        };

        let attributes = u32::from_le_bytes(raw[0..4].try_into().unwrap());
        let dll_name_rva = u32::from_le_bytes(raw[4..8].try_into().unwrap());
        let import_address_table_rva = u32::from_le_bytes(raw[12..16].try_into().unwrap());
        let import_name_table_rva = u32::from_le_bytes(raw[16..20].try_into().unwrap());
        let bound_import_address_table_rva = u32::from_le_bytes(raw[20..24].try_into().unwrap());
        let unload_information_table_rva = u32::from_le_bytes(raw[24..28].try_into().unwrap());
        let time_date_stamp = u32::from_le_bytes(raw[28..32].try_into().unwrap());

        if attributes == 0 && dll_name_rva == 0 && import_name_table_rva == 0 && time_date_stamp == 0 {
            break;
        }

        let dll_name = view
            .rva_to_offset(sections, dll_name_rva)
            .and_then(|o| view.read_cstring_ascii(o, MAX_PATH));

        let mut functions = Vec::new();
        let entry_size: u32 = if is_64bit { 8 } else { 4 };
        let mut name_table_rva = import_name_table_rva;

        if name_table_rva != 0 {
            for i in 0..MAX_FUNCS_PER_MODULE as u32 {
                let Some(thunk_offset) = view.rva_to_offset(sections, name_table_rva) else {
                    break;
                };
                let Some((raw_value, ordinal_flag_set, ordinal, address_of_data)) =
                    read_thunk_width(view, thunk_offset, is_64bit)
                else {
                    break;
                };
                if raw_value == 0 {
                    break;
                }

                let name = if ordinal_flag_set {
                    None
                } else {
                    view.rva_to_offset(sections, address_of_data)
                        .and_then(|hint_name_offset| {
                            view.read_cstring_ascii(hint_name_offset + 2, MAX_PATH)
                        })
                };

                functions.push(DelayImportFunction {
                    ordinal: ordinal_flag_set.then_some(ordinal),
                    name,
                    iat_value: read_parallel_slot(view, sections, import_address_table_rva, i, is_64bit),
                    bound_iat_value: read_parallel_slot(
                        view,
                        sections,
                        bound_import_address_table_rva,
                        i,
                        is_64bit,
                    ),
                    unload_info_value: read_parallel_slot(
                        view,
                        sections,
                        unload_information_table_rva,
                        i,
                        is_64bit,
                    ),
                });

                name_table_rva = name_table_rva.saturating_add(entry_size);
            }
        }

        descriptors.push(DelayImportDescriptor {
            attributes,
            dll_name,
            time_date_stamp,
            functions,
        });

        cursor_rva = cursor_rva.saturating_add(32);
    }

    Some(DelayImportTable { descriptors })
}
