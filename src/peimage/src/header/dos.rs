/// The first 64 bytes of every PE image.
///
/// Only `e_magic` (must be `"MZ"`) and `e_lfanew` (file offset of the NT
/// header) are load-bearing for this crate; the remaining MS-DOS stub
/// fields are kept for completeness since callers doing forensic
/// comparisons may want them.
#[derive(Debug, Clone, Copy)]
pub struct DosHeader {
    pub e_magic: u16,
    pub e_cblp: u16,
    pub e_cp: u16,
    pub e_crlc: u16,
    pub e_cparhdr: u16,
    pub e_minalloc: u16,
    pub e_maxalloc: u16,
    pub e_ss: u16,
    pub e_sp: u16,
    pub e_csum: u16,
    pub e_ip: u16,
    pub e_cs: u16,
    pub e_lfarlc: u16,
    pub e_ovno: u16,
    pub e_res: [u16; 4],
    pub e_oemid: u16,
    pub e_oeminfo: u16,
    pub e_res2: [u16; 10],
    pub e_lfanew: u32,
}

pub const DOS_MAGIC: u16 = 0x5A4D; // "MZ"

impl DosHeader {
    pub fn from(slice: &[u8; 64]) -> DosHeader {
        let u16_at = |o: usize| u16::from_le_bytes(slice[o..o + 2].try_into().unwrap());
        DosHeader {
            e_magic: u16_at(0),
            e_cblp: u16_at(2),
            e_cp: u16_at(4),
            e_crlc: u16_at(6),
            e_cparhdr: u16_at(8),
            e_minalloc: u16_at(10),
            e_maxalloc: u16_at(12),
            e_ss: u16_at(14),
            e_sp: u16_at(16),
            e_csum: u16_at(18),
            e_ip: u16_at(20),
            e_cs: u16_at(22),
            e_lfarlc: u16_at(24),
            e_ovno: u16_at(26),
            e_res: [u16_at(28), u16_at(30), u16_at(32), u16_at(34)],
            e_oemid: u16_at(36),
            e_oeminfo: u16_at(38),
            e_res2: [
                u16_at(40),
                u16_at(42),
                u16_at(44),
                u16_at(46),
                u16_at(48),
                u16_at(50),
                u16_at(52),
                u16_at(54),
                u16_at(56),
                u16_at(58),
            ],
            e_lfanew: u32::from_le_bytes(slice[60..64].try_into().unwrap()),
        }
    }
}
