//! Bound Import directory: a sequence of descriptors, each immediately
//! followed by its own forwarder-reference records.

use crate::limits::MAX_PATH;
use crate::safety::View;

#[derive(Debug, Clone)]
pub struct BoundForwarderRef {
    pub time_date_stamp: u32,
    pub module_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BoundImportDescriptor {
    pub time_date_stamp: u32,
    pub module_name: Option<String>,
    pub forwarder_refs: Vec<BoundForwarderRef>,
}

#[derive(Debug, Clone, Default)]
pub struct BoundImportTable {
    pub descriptors: Vec<BoundImportDescriptor>,
}

fn read_module_name(view: &View, table_base: u64, offset_module_name: u16) -> Option<String> {
    view.read_cstring_ascii(table_base + offset_module_name as u64, MAX_PATH)
}

/// `dir_offset` is a file offset (the directory's RVA already resolved by
/// the caller — bound import, unlike most directories, is read relative
/// to its own table start, not re-derived per record).
pub fn parse(view: &View, dir_offset: u64) -> Option<BoundImportTable> {
    let mut descriptors = Vec::new();
    let mut cursor = dir_offset;

    while let Some(raw) = view.read_array::<8>(cursor) {
        let time_date_stamp = u32::from_le_bytes(raw[0..4].try_into().unwrap());
        if time_date_stamp == 0 {
            break;
        }
        let offset_module_name = u16::from_le_bytes(raw[4..6].try_into().unwrap());
        let number_of_forwarder_refs = u16::from_le_bytes(raw[6..8].try_into().unwrap());

        let module_name = read_module_name(view, dir_offset, offset_module_name);
        cursor += 8;

        let mut forwarder_refs = Vec::with_capacity(number_of_forwarder_refs as usize);
        for _ in 0..number_of_forwarder_refs {
            let Some(fwd_raw) = view.read_array::<8>(cursor) else {
                break;
            };
            let fwd_timestamp = u32::from_le_bytes(fwd_raw[0..4].try_into().unwrap());
            let fwd_offset_name = u16::from_le_bytes(fwd_raw[4..6].try_into().unwrap());
            forwarder_refs.push(BoundForwarderRef {
                time_date_stamp: fwd_timestamp,
                module_name: read_module_name(view, dir_offset, fwd_offset_name),
            });
            cursor += 8;
        }

        descriptors.push(BoundImportDescriptor {
            time_date_stamp,
            module_name,
            forwarder_refs,
        });
    }

    Some(BoundImportTable { descriptors })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminates_on_zero_timestamp() {
        let mut data = vec![0u8; 64];
        data[0..4].copy_from_slice(&1u32.to_le_bytes());
        data[4..6].copy_from_slice(&16u16.to_le_bytes()); // module name at +16
        data[6..8].copy_from_slice(&0u16.to_le_bytes()); // no forwarders
        data[16..21].copy_from_slice(b"A.DLL");

        let view = View::new(&data);
        let table = parse(&view, 0).unwrap();
        assert_eq!(table.descriptors.len(), 1);
        assert_eq!(table.descriptors[0].module_name.as_deref(), Some("A.DLL"));
    }
}
