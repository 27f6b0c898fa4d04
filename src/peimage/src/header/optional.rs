use super::characteristics::DllCharacteristics;
use super::data_directories::{DataDirectories, DataDirectoryEntry};
use super::machine::MachineWidth;
use crate::safety::View;

/// Fields shared by PE32 and PE32+ Optional Headers up to the point where
/// their layouts diverge (`BaseOfData` exists only in PE32; `ImageBase`
/// widens to 64 bits in PE32+).
#[derive(Debug, Clone, Copy)]
pub struct StandardFields {
    pub magic: u16,
    pub major_linker_version: u8,
    pub minor_linker_version: u8,
    pub size_of_code: u32,
    pub size_of_initialized_data: u32,
    pub size_of_uninitialized_data: u32,
    pub address_of_entry_point: u32,
    pub base_of_code: u32,
}

/// Windows-specific fields whose width depends on PE32 vs PE32+.
#[derive(Debug, Clone, Copy)]
pub struct WindowsFields {
    pub image_base: u64,
    pub section_alignment: u32,
    pub file_alignment: u32,
    pub major_os_version: u16,
    pub minor_os_version: u16,
    pub major_image_version: u16,
    pub minor_image_version: u16,
    pub major_subsystem_version: u16,
    pub minor_subsystem_version: u16,
    pub win32_version_value: u32,
    pub size_of_image: u32,
    pub size_of_headers: u32,
    pub checksum: u32,
    pub subsystem: u16,
    pub dll_characteristics: DllCharacteristics,
    pub size_of_stack_reserve: u64,
    pub size_of_stack_commit: u64,
    pub size_of_heap_reserve: u64,
    pub size_of_heap_commit: u64,
    pub loader_flags: u32,
    pub number_of_rva_and_sizes: u32,
}

#[derive(Debug, Clone)]
pub struct OptionalHeader32 {
    pub standard: StandardFields,
    pub base_of_data: u32,
    pub windows: WindowsFields,
    pub data_directories: DataDirectories,
}

#[derive(Debug, Clone)]
pub struct OptionalHeader64 {
    pub standard: StandardFields,
    pub windows: WindowsFields,
    pub data_directories: DataDirectories,
}

#[derive(Debug, Clone)]
pub enum OptionalHeader {
    Pe32(OptionalHeader32),
    Pe32Plus(OptionalHeader64),
}

impl OptionalHeader {
    pub fn magic(&self) -> u16 {
        self.standard().magic
    }

    pub fn standard(&self) -> &StandardFields {
        match self {
            OptionalHeader::Pe32(h) => &h.standard,
            OptionalHeader::Pe32Plus(h) => &h.standard,
        }
    }

    pub fn windows(&self) -> &WindowsFields {
        match self {
            OptionalHeader::Pe32(h) => &h.windows,
            OptionalHeader::Pe32Plus(h) => &h.windows,
        }
    }

    pub fn data_directories(&self) -> &DataDirectories {
        match self {
            OptionalHeader::Pe32(h) => &h.data_directories,
            OptionalHeader::Pe32Plus(h) => &h.data_directories,
        }
    }

    pub fn data_directory(&self, index: usize) -> Option<DataDirectoryEntry> {
        self.data_directories().get(index)
    }

    pub fn image_base(&self) -> u64 {
        self.windows().image_base
    }

    pub fn entry_point(&self) -> u32 {
        self.standard().address_of_entry_point
    }

    pub fn width(&self) -> MachineWidth {
        MachineWidth::from_magic(self.magic())
    }
}

fn read_standard_fields(view: &View, cursor: &mut u64) -> Option<StandardFields> {
    let magic = view.read_u16(*cursor)?;
    let major_linker_version = view.read_u8(*cursor + 2)?;
    let minor_linker_version = view.read_u8(*cursor + 3)?;
    let size_of_code = view.read_u32(*cursor + 4)?;
    let size_of_initialized_data = view.read_u32(*cursor + 8)?;
    let size_of_uninitialized_data = view.read_u32(*cursor + 12)?;
    let address_of_entry_point = view.read_u32(*cursor + 16)?;
    let base_of_code = view.read_u32(*cursor + 20)?;
    *cursor += 24;
    Some(StandardFields {
        magic,
        major_linker_version,
        minor_linker_version,
        size_of_code,
        size_of_initialized_data,
        size_of_uninitialized_data,
        address_of_entry_point,
        base_of_code,
    })
}

fn read_windows_fields(view: &View, cursor: &mut u64, is_64bit: bool) -> Option<WindowsFields> {
    let image_base = if is_64bit {
        let v = view.read_u64(*cursor)?;
        *cursor += 8;
        v
    } else {
        let v = view.read_u32(*cursor)? as u64;
        *cursor += 4;
        v
    };
    let section_alignment = view.read_u32(*cursor)?;
    let file_alignment = view.read_u32(*cursor + 4)?;
    let major_os_version = view.read_u16(*cursor + 8)?;
    let minor_os_version = view.read_u16(*cursor + 10)?;
    let major_image_version = view.read_u16(*cursor + 12)?;
    let minor_image_version = view.read_u16(*cursor + 14)?;
    let major_subsystem_version = view.read_u16(*cursor + 16)?;
    let minor_subsystem_version = view.read_u16(*cursor + 18)?;
    let win32_version_value = view.read_u32(*cursor + 20)?;
    let size_of_image = view.read_u32(*cursor + 24)?;
    let size_of_headers = view.read_u32(*cursor + 28)?;
    let checksum = view.read_u32(*cursor + 32)?;
    let subsystem = view.read_u16(*cursor + 36)?;
    let dll_characteristics =
        DllCharacteristics::from_bits_truncate(view.read_u16(*cursor + 38)?);
    *cursor += 40;

    let (size_of_stack_reserve, size_of_stack_commit, size_of_heap_reserve, size_of_heap_commit) =
        if is_64bit {
            let a = view.read_u64(*cursor)?;
            let b = view.read_u64(*cursor + 8)?;
            let c = view.read_u64(*cursor + 16)?;
            let d = view.read_u64(*cursor + 24)?;
            *cursor += 32;
            (a, b, c, d)
        } else {
            let a = view.read_u32(*cursor)? as u64;
            let b = view.read_u32(*cursor + 4)? as u64;
            let c = view.read_u32(*cursor + 8)? as u64;
            let d = view.read_u32(*cursor + 12)? as u64;
            *cursor += 16;
            (a, b, c, d)
        };

    let loader_flags = view.read_u32(*cursor)?;
    let number_of_rva_and_sizes = view.read_u32(*cursor + 4)?;
    *cursor += 8;

    Some(WindowsFields {
        image_base,
        section_alignment,
        file_alignment,
        major_os_version,
        minor_os_version,
        major_image_version,
        minor_image_version,
        major_subsystem_version,
        minor_subsystem_version,
        win32_version_value,
        size_of_image,
        size_of_headers,
        checksum,
        subsystem,
        dll_characteristics,
        size_of_stack_reserve,
        size_of_stack_commit,
        size_of_heap_reserve,
        size_of_heap_commit,
        loader_flags,
        number_of_rva_and_sizes,
    })
}

/// Reads up to 16 `(RVA, Size)` pairs starting at `cursor`, stopping early
/// at `declared_end` (the end of the Optional Header as declared by
/// `SizeOfOptionalHeader`) or at the first pair that doesn't fit the
/// buffer. `NumberOfRvaAndSizes` is a hint, not a hard limit we trust
/// blindly — it's clamped to `[0, 16]` before use.
fn read_data_directories(
    view: &View,
    cursor: &mut u64,
    declared_end: u64,
    number_of_rva_and_sizes: u32,
) -> DataDirectories {
    let want = (number_of_rva_and_sizes as usize).min(16);
    let mut entries = Vec::with_capacity(want);
    for _ in 0..want {
        if *cursor + 8 > declared_end {
            break;
        }
        let Some(rva) = view.read_u32(*cursor) else {
            break;
        };
        let Some(size) = view.read_u32(*cursor + 4) else {
            break;
        };
        entries.push(DataDirectoryEntry { rva, size });
        *cursor += 8;
    }
    DataDirectories { entries }
}

/// Parses the Optional Header at `offset`, bounded by `declared_size`
/// (`IMAGE_FILE_HEADER::SizeOfOptionalHeader`). Returns `None` if the
/// magic is absent or any fixed-width field doesn't fit the buffer.
pub fn parse(view: &View, offset: u64, declared_size: u16) -> Option<OptionalHeader> {
    let magic = view.read_u16(offset)?;
    let width = MachineWidth::from_magic(magic);
    let declared_end = offset + declared_size as u64;
    let is_64bit = width.is_64bit();

    let mut cursor = offset;
    let standard = read_standard_fields(view, &mut cursor)?;

    let base_of_data = if is_64bit {
        None
    } else {
        let v = view.read_u32(cursor)?;
        cursor += 4;
        Some(v)
    };

    let windows = read_windows_fields(view, &mut cursor, is_64bit)?;
    let data_directories = read_data_directories(
        view,
        &mut cursor,
        declared_end,
        windows.number_of_rva_and_sizes,
    );

    Some(if is_64bit {
        OptionalHeader::Pe32Plus(OptionalHeader64 {
            standard,
            windows,
            data_directories,
        })
    } else {
        OptionalHeader::Pe32(OptionalHeader32 {
            standard,
            base_of_data: base_of_data.unwrap_or(0),
            windows,
            data_directories,
        })
    })
}
