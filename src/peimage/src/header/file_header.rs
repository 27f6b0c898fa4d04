use super::characteristics::FileCharacteristics;

/// The 20-byte COFF File Header, immediately following the 4-byte PE
/// signature. `machine` is left as a raw `u16` — naming the architecture
/// (x86, ARM64, ...) is a presentation concern outside the core.
#[derive(Debug, Clone, Copy)]
pub struct FileHeader {
    pub machine: u16,
    pub number_of_sections: u16,
    pub time_date_stamp: u32,
    pub pointer_to_symbol_table: u32,
    pub number_of_symbols: u32,
    pub size_of_optional_header: u16,
    pub characteristics: FileCharacteristics,
}

impl FileHeader {
    pub fn from(slice: &[u8; 20]) -> FileHeader {
        FileHeader {
            machine: u16::from_le_bytes(slice[0..2].try_into().unwrap()),
            number_of_sections: u16::from_le_bytes(slice[2..4].try_into().unwrap()),
            time_date_stamp: u32::from_le_bytes(slice[4..8].try_into().unwrap()),
            pointer_to_symbol_table: u32::from_le_bytes(slice[8..12].try_into().unwrap()),
            number_of_symbols: u32::from_le_bytes(slice[12..16].try_into().unwrap()),
            size_of_optional_header: u16::from_le_bytes(slice[16..18].try_into().unwrap()),
            characteristics: FileCharacteristics::from_bits_truncate(u16::from_le_bytes(
                slice[18..20].try_into().unwrap(),
            )),
        }
    }

    /// Best-effort UTC decoding of `time_date_stamp`. `None` if the raw
    /// epoch seconds value doesn't correspond to a representable instant
    /// (never itself a parse failure — the raw field is always available).
    pub fn timestamp(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.time_date_stamp as i64, 0)
    }
}
