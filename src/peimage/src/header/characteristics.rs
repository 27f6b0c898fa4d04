//! Bitmask fields of the COFF File Header, Optional Header, and Section
//! Table, expressed with [`bitflags`] rather than one-off boolean accessors.

use bitflags::bitflags;

bitflags! {
    /// `IMAGE_FILE_HEADER::Characteristics`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileCharacteristics: u16 {
        const RELOCS_STRIPPED         = 0x0001;
        const EXECUTABLE_IMAGE        = 0x0002;
        const LINE_NUMS_STRIPPED      = 0x0004;
        const LOCAL_SYMS_STRIPPED     = 0x0008;
        const AGGRESSIVE_WS_TRIM      = 0x0010;
        const LARGE_ADDRESS_AWARE     = 0x0020;
        const BYTES_REVERSED_LO       = 0x0080;
        const MACHINE_32BIT           = 0x0100;
        const DEBUG_STRIPPED          = 0x0200;
        const REMOVABLE_RUN_FROM_SWAP = 0x0400;
        const NET_RUN_FROM_SWAP       = 0x0800;
        const SYSTEM                  = 0x1000;
        const DLL                     = 0x2000;
        const UP_SYSTEM_ONLY          = 0x4000;
        const BYTES_REVERSED_HI       = 0x8000;
    }
}

bitflags! {
    /// `IMAGE_OPTIONAL_HEADER::DllCharacteristics`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DllCharacteristics: u16 {
        const HIGH_ENTROPY_VA       = 0x0020;
        const DYNAMIC_BASE          = 0x0040;
        const FORCE_INTEGRITY       = 0x0080;
        const NX_COMPAT             = 0x0100;
        const NO_ISOLATION          = 0x0200;
        const NO_SEH                = 0x0400;
        const NO_BIND               = 0x0800;
        const APPCONTAINER          = 0x1000;
        const WDM_DRIVER            = 0x2000;
        const GUARD_CF              = 0x4000;
        const TERMINAL_SERVER_AWARE = 0x8000;
    }
}

bitflags! {
    /// `IMAGE_SECTION_HEADER::Characteristics`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SectionCharacteristics: u32 {
        const TYPE_NO_PAD            = 0x0000_0008;
        const CNT_CODE               = 0x0000_0020;
        const CNT_INITIALIZED_DATA   = 0x0000_0040;
        const CNT_UNINITIALIZED_DATA = 0x0000_0080;
        const LNK_INFO               = 0x0000_0200;
        const LNK_REMOVE             = 0x0000_0800;
        const LNK_COMDAT             = 0x0000_1000;
        const GPREL                  = 0x0000_8000;
        const LNK_NRELOC_OVFL        = 0x0100_0000;
        const MEM_DISCARDABLE        = 0x0200_0000;
        const MEM_NOT_CACHED         = 0x0400_0000;
        const MEM_NOT_PAGED          = 0x0800_0000;
        const MEM_SHARED             = 0x1000_0000;
        const MEM_EXECUTE            = 0x2000_0000;
        const MEM_READ               = 0x4000_0000;
        const MEM_WRITE              = 0x8000_0000;
    }
}
