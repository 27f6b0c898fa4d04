use super::file_header::FileHeader;
use super::optional::{self, OptionalHeader};
use crate::safety::View;

pub const PE_SIGNATURE: u32 = 0x0000_4550; // "PE\0\0"

/// The NT header: the 4-byte `"PE\0\0"` signature, the 20-byte File
/// Header, and the variable-length Optional Header.
#[derive(Debug, Clone)]
pub struct NtHeader {
    pub signature: u32,
    pub file_header: FileHeader,
    pub optional_header: Option<OptionalHeader>,
}

/// Parses the NT header at `offset` (`e_lfanew`). Requires the signature
/// and File Header to fit the buffer; a missing or truncated Optional
/// Header still yields an `NtHeader` with `optional_header: None` rather
/// than failing the whole parse, since the File Header alone is useful to
/// a caller (e.g. `NumberOfSections`, `Characteristics`).
pub fn parse(view: &View, offset: u64) -> Option<NtHeader> {
    let signature = view.read_u32(offset)?;
    if signature != PE_SIGNATURE {
        return None;
    }
    let file_header_raw = view.read_array::<20>(offset + 4)?;
    let file_header = FileHeader::from(&file_header_raw);

    let optional_header = if file_header.size_of_optional_header > 0 {
        optional::parse(
            view,
            offset + 24,
            file_header.size_of_optional_header,
        )
    } else {
        None
    };

    Some(NtHeader {
        signature,
        file_header,
        optional_header,
    })
}
