//! Resource tree: exactly three levels (Type -> Name -> Language), each a
//! directory header followed by entries pointing either to a sub-directory
//! or to a data leaf.

use crate::header::Section;
use crate::limits::{MAX_RESOURCE_DEPTH, MAX_RESOURCE_NAME};
use crate::safety::View;

const NAME_IS_STRING_FLAG: u32 = 0x8000_0000;
const DATA_IS_DIRECTORY_FLAG: u32 = 0x8000_0000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceId {
    Id(u32),
    Name(String),
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceDataEntry {
    pub rva: u32,
    pub size: u32,
    pub code_page: u32,
}

#[derive(Debug, Clone)]
pub enum ResourceNode {
    Directory(ResourceDirectory),
    Data(ResourceDataEntry),
}

#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub id: ResourceId,
    pub node: ResourceNode,
}

#[derive(Debug, Clone)]
pub struct ResourceDirectory {
    pub characteristics: u32,
    pub time_date_stamp: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub entries: Vec<ResourceEntry>,
}

fn read_name(view: &View, root_offset: u64, name_field: u32) -> ResourceId {
    if name_field & NAME_IS_STRING_FLAG != 0 {
        let string_offset = root_offset + (name_field & 0x7FFF_FFFF) as u64;
        let Some(len) = view.read_u16(string_offset) else {
            return ResourceId::Name(String::new());
        };
        let units = (len as usize).min(MAX_RESOURCE_NAME);
        let mut out = Vec::with_capacity(units);
        let mut cursor = string_offset + 2;
        for _ in 0..units {
            let Some(unit) = view.read_u16(cursor) else {
                break;
            };
            out.push(unit);
            cursor += 2;
        }
        ResourceId::Name(String::from_utf16_lossy(&out))
    } else {
        ResourceId::Id(name_field & 0xFFFF)
    }
}

/// Recursively parses the directory at `dir_offset`. `ancestors` holds the
/// file offsets of every directory on the path from the root to here —
/// the cycle guard spec.md §9 requires: a sub-directory offset equal to
/// the current directory or to any ancestor (in particular the root) is
/// emitted as an empty sub-directory rather than followed.
fn parse_directory(
    view: &View,
    root_offset: u64,
    dir_offset: u64,
    ancestors: &[u64],
    depth: usize,
) -> Option<ResourceDirectory> {
    let raw = view.read_array::<16>(dir_offset)?;
    let characteristics = u32::from_le_bytes(raw[0..4].try_into().unwrap());
    let time_date_stamp = u32::from_le_bytes(raw[4..8].try_into().unwrap());
    let major_version = u16::from_le_bytes(raw[8..10].try_into().unwrap());
    let minor_version = u16::from_le_bytes(raw[10..12].try_into().unwrap());
    let number_of_named_entries = u16::from_le_bytes(raw[12..14].try_into().unwrap());
    let number_of_id_entries = u16::from_le_bytes(raw[14..16].try_into().unwrap());
    let total = number_of_named_entries as u32 + number_of_id_entries as u32;

    let mut next_ancestors = ancestors.to_vec();
    next_ancestors.push(dir_offset);

    let mut entries = Vec::with_capacity(total as usize);
    let mut cursor = dir_offset + 16;
    for _ in 0..total {
        let Some(raw_entry) = view.read_array::<8>(cursor) else {
            break;
        };
        cursor += 8;

        let name_field = u32::from_le_bytes(raw_entry[0..4].try_into().unwrap());
        let offset_field = u32::from_le_bytes(raw_entry[4..8].try_into().unwrap());
        let id = read_name(view, root_offset, name_field);

        let node = if offset_field & DATA_IS_DIRECTORY_FLAG != 0 {
            let sub_offset = root_offset + (offset_field & 0x7FFF_FFFF) as u64;
            if sub_offset == dir_offset
                || next_ancestors.contains(&sub_offset)
                || depth >= MAX_RESOURCE_DEPTH
            {
                ResourceNode::Directory(ResourceDirectory {
                    characteristics: 0,
                    time_date_stamp: 0,
                    major_version: 0,
                    minor_version: 0,
                    entries: Vec::new(),
                })
            } else {
                match parse_directory(view, root_offset, sub_offset, &next_ancestors, depth + 1) {
                    Some(sub) => ResourceNode::Directory(sub),
                    None => continue,
                }
            }
        } else {
            let data_offset = root_offset + offset_field as u64;
            let Some(data_raw) = view.read_array::<16>(data_offset) else {
                continue;
            };
            ResourceNode::Data(ResourceDataEntry {
                rva: u32::from_le_bytes(data_raw[0..4].try_into().unwrap()),
                size: u32::from_le_bytes(data_raw[4..8].try_into().unwrap()),
                code_page: u32::from_le_bytes(data_raw[8..12].try_into().unwrap()),
            })
        };

        entries.push(ResourceEntry { id, node });
    }

    Some(ResourceDirectory {
        characteristics,
        time_date_stamp,
        major_version,
        minor_version,
        entries,
    })
}

pub fn parse(view: &View, sections: &[Section], dir_rva: u32) -> Option<ResourceDirectory> {
    let root_offset = view.rva_to_offset(sections, dir_rva)?;
    parse_directory(view, root_offset, root_offset, &[], 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::section::SectionHeader;

    fn flat_section(len: usize) -> Vec<Section> {
        let header = SectionHeader {
            name: *b".rsrc\0\0\0",
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
            name: ".rsrc".to_string(),
        }]
    }

    #[test]
    fn self_pointing_entry_is_empty_not_infinite() {
        let mut data = vec![0u8; 64];
        // Root directory: 1 id entry.
        data[14..16].copy_from_slice(&1u16.to_le_bytes());
        // Entry: id=1, DataIsDirectory pointing back at root (offset 0).
        data[16..20].copy_from_slice(&1u32.to_le_bytes());
        data[20..24].copy_from_slice(&DATA_IS_DIRECTORY_FLAG.to_le_bytes());

        let sections = flat_section(data.len());
        let view = View::new(&data);
        let root = parse(&view, &sections, 0).expect("resource root");
        assert_eq!(root.entries.len(), 1);
        match &root.entries[0].node {
            ResourceNode::Directory(sub) => assert!(sub.entries.is_empty()),
            ResourceNode::Data(_) => panic!("expected directory"),
        }
    }

    #[test]
    fn leaf_entry_reads_data_descriptor() {
        let mut data = vec![0u8; 64];
        data[14..16].copy_from_slice(&1u16.to_le_bytes());
        data[16..20].copy_from_slice(&24u32.to_le_bytes()); // RT_MANIFEST id
        data[20..24].copy_from_slice(&32u32.to_le_bytes()); // OffsetToData -> data entry at 32
        data[32..36].copy_from_slice(&0x2000u32.to_le_bytes()); // data rva
        data[36..40].copy_from_slice(&16u32.to_le_bytes()); // size
        data[40..44].copy_from_slice(&0u32.to_le_bytes()); // code page

        let sections = flat_section(data.len());
        let view = View::new(&data);
        let root = parse(&view, &sections, 0).unwrap();
        match &root.entries[0].node {
            ResourceNode::Data(d) => {
                assert_eq!(d.rva, 0x2000);
                assert_eq!(d.size, 16);
            }
            ResourceNode::Directory(_) => panic!("expected data leaf"),
        }
    }
}
