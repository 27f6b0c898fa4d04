//! Resource-tree flattener: a thin derivation on top of the core parse
//! results (spec.md §1's "higher-level utilities... out of scope" for the
//! core parser itself, but carried in-crate per spec.md §6).

use crate::directories::{ResourceDirectory, ResourceId, ResourceNode};

/// One leaf record per Type/Name/Language combination in a resource tree.
#[derive(Debug, Clone)]
pub struct FlatResource {
    pub type_id: ResourceId,
    pub name_id: ResourceId,
    pub lang_id: ResourceId,
    pub data_rva: u32,
    pub data_size: u32,
    pub code_page: u32,
}

/// Walks `root` (Type -> Name -> Language) and emits one record per data
/// leaf, carrying the identifiers from each of the three levels above it.
pub fn flatten_resources(root: &ResourceDirectory) -> Vec<FlatResource> {
    let mut out = Vec::new();
    for type_entry in &root.entries {
        let ResourceNode::Directory(name_dir) = &type_entry.node else {
            continue;
        };
        for name_entry in &name_dir.entries {
            let ResourceNode::Directory(lang_dir) = &name_entry.node else {
                continue;
            };
            for lang_entry in &lang_dir.entries {
                let ResourceNode::Data(data) = &lang_entry.node else {
                    continue;
                };
                out.push(FlatResource {
                    type_id: type_entry.id.clone(),
                    name_id: name_entry.id.clone(),
                    lang_id: lang_entry.id.clone(),
                    data_rva: data.rva,
                    data_size: data.size,
                    code_page: data.code_page,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directories::{ResourceDataEntry, ResourceEntry};

    #[test]
    fn flattens_one_manifest_leaf() {
        let leaf = ResourceEntry {
            id: ResourceId::Id(0x0409),
            node: ResourceNode::Data(ResourceDataEntry {
                rva: 0x3000,
                size: 64,
                code_page: 0,
            }),
        };
        let lang_dir = ResourceDirectory {
            characteristics: 0,
            time_date_stamp: 0,
            major_version: 0,
            minor_version: 0,
            entries: vec![leaf],
        };
        let name_entry = ResourceEntry {
            id: ResourceId::Id(1),
            node: ResourceNode::Directory(lang_dir),
        };
        let name_dir = ResourceDirectory {
            characteristics: 0,
            time_date_stamp: 0,
            major_version: 0,
            minor_version: 0,
            entries: vec![name_entry],
        };
        let type_entry = ResourceEntry {
            id: ResourceId::Id(24),
            node: ResourceNode::Directory(name_dir),
        };
        let root = ResourceDirectory {
            characteristics: 0,
            time_date_stamp: 0,
            major_version: 0,
            minor_version: 0,
            entries: vec![type_entry],
        };

        let flat = flatten_resources(&root);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].type_id, ResourceId::Id(24));
        assert_eq!(flat[0].name_id, ResourceId::Id(1));
        assert_eq!(flat[0].lang_id, ResourceId::Id(0x0409));
        assert_eq!(flat[0].data_rva, 0x3000);
    }
}
