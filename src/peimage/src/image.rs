//! Image Handle: owns the byte range's lifetime, memoizes the header
//! parse, and exposes the per-directory queries as independent, idempotent
//! lookups. No query mutates shared state and a failure in one directory
//! never affects another.

use std::fs::File;
use std::path::Path;

use crate::bytes::ByteSource;
use crate::directories::{self, *};
use crate::error::{OpenStatus, PeError, Result};
use crate::header::data_directories::DataDirectories;
use crate::header::{self, DosHeader, MachineWidth, NtHeader, RichHeader, Section};
use crate::safety::View;

const MIN_IMAGE_LEN: u64 = 64;

/// An opened PE image: the byte source plus every field the header parse
/// produces. Per-directory queries borrow `self` and re-derive their
/// result from `bytes`/`sections` on every call — nothing beyond the
/// header parse is cached, so a query that fails never poisons another.
pub struct Image<'a> {
    bytes: Option<ByteSource<'a>>,
    dos_header: DosHeader,
    rich_header: Option<RichHeader>,
    nt_header: Option<NtHeader>,
    sections: Vec<Section>,
    width: MachineWidth,
}

impl<'a> Image<'a> {
    /// Opens a file at `path`, memory-mapping it read-only. Mirrors
    /// spec.md §4.2's "Open (path)": query size, reject `< 64` bytes, map,
    /// then delegate to the buffer-based open.
    pub fn open_path<P: AsRef<Path>>(path: P) -> std::result::Result<Image<'static>, OpenStatus> {
        Image::open_path_inner(path.as_ref()).map_err(|e| OpenStatus::from(&e))
    }

    fn open_path_inner(path: &Path) -> Result<Image<'static>> {
        let file = File::open(path).map_err(PeError::Io)?;
        let len = file.metadata().map_err(PeError::Io)?.len();
        if len < MIN_IMAGE_LEN {
            return Err(PeError::TooSmall(len as usize));
        }
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(PeError::Mapping)?;
        Image::open_bytes_inner(ByteSource::Mapped(mmap))
    }

    /// Opens an already-resident buffer. Mirrors spec.md §4.2's "Open
    /// (buffer)": record the byte range, require `N ≥ 64` and a DOS
    /// signature, locate `e_lfanew`, and classify the Optional Header's
    /// machine width. A missing or unreachable NT header is non-fatal —
    /// the DOS header remains reportable and every NT-dependent query
    /// simply returns absent.
    pub fn open_bytes(bytes: ByteSource<'a>) -> std::result::Result<Image<'a>, OpenStatus> {
        Image::open_bytes_inner(bytes).map_err(|e| OpenStatus::from(&e))
    }

    fn open_bytes_inner(bytes: ByteSource<'a>) -> Result<Image<'a>> {
        if (bytes.len() as u64) < MIN_IMAGE_LEN {
            return Err(PeError::TooSmall(bytes.len()));
        }
        let view = View::new(&bytes);
        let dos_array = view.read_array::<64>(0).ok_or(PeError::TooSmall(bytes.len()))?;
        let dos_header = DosHeader::from(&dos_array);
        if dos_header.e_magic != header::dos::DOS_MAGIC {
            return Err(PeError::BadDosSignature);
        }

        let rich_header = header::rich::parse(&view, dos_header.e_lfanew as u64);
        let nt_header = header::nt::parse(&view, dos_header.e_lfanew as u64);

        let (sections, width) = match &nt_header {
            Some(nt) => {
                let width = nt
                    .optional_header
                    .as_ref()
                    .map(|o| o.width())
                    .unwrap_or(MachineWidth::Unknown);
                let section_table_offset =
                    dos_header.e_lfanew as u64 + 24 + nt.file_header.size_of_optional_header as u64;
                let sections = header::section::read_section_table(
                    &view,
                    section_table_offset,
                    nt.file_header.number_of_sections,
                    nt.file_header.pointer_to_symbol_table,
                    nt.file_header.number_of_symbols,
                );
                (sections, width)
            }
            None => {
                log::debug!("NT header absent or unreachable; NT-dependent queries will be empty");
                (Vec::new(), MachineWidth::Unknown)
            }
        };

        Ok(Image {
            bytes: Some(bytes),
            dos_header,
            rich_header,
            nt_header,
            sections,
            width,
        })
    }

    fn view(&self) -> Option<View<'_>> {
        self.bytes.as_ref().map(|b| View::new(b))
    }

    fn data_directory(&self, index: usize) -> Option<(u32, u32)> {
        let entry = self.nt_header.as_ref()?.optional_header.as_ref()?.data_directory(index)?;
        Some((entry.rva, entry.size))
    }

    /// Releases the owned byte source (if any) and resets cached pointers.
    /// Safe to call more than once.
    pub fn close(&mut self) {
        self.bytes = None;
        self.nt_header = None;
        self.rich_header = None;
        self.sections.clear();
    }

    pub fn is_open(&self) -> bool {
        self.bytes.is_some()
    }

    pub fn machine_width(&self) -> MachineWidth {
        self.width
    }

    pub fn dos_header(&self) -> Option<&DosHeader> {
        self.is_open().then_some(&self.dos_header)
    }

    pub fn rich_header(&self) -> Option<&RichHeader> {
        self.rich_header.as_ref().filter(|_| self.is_open())
    }

    pub fn nt_header(&self) -> Option<&NtHeader> {
        self.nt_header.as_ref().filter(|_| self.is_open())
    }

    pub fn data_directories(&self) -> Option<&DataDirectories> {
        Some(self.nt_header.as_ref()?.optional_header.as_ref()?.data_directories())
    }

    pub fn section_headers(&self) -> Option<&[Section]> {
        self.is_open().then_some(self.sections.as_slice())
    }

    pub fn export(&self) -> Option<ExportTable> {
        let view = self.view()?;
        let (rva, size) = self.data_directory(DataDirectories::EXPORT)?;
        directories::export::parse(&view, &self.sections, rva, size)
    }

    pub fn import(&self) -> Option<ImportTable> {
        let view = self.view()?;
        let (rva, _) = self.data_directory(DataDirectories::IMPORT)?;
        directories::import::parse(&view, &self.sections, rva, self.width)
    }

    pub fn resources(&self) -> Option<ResourceDirectory> {
        let view = self.view()?;
        let (rva, _) = self.data_directory(DataDirectories::RESOURCE)?;
        directories::resources::parse(&view, &self.sections, rva)
    }

    pub fn exceptions(&self) -> Option<Vec<RuntimeFunction>> {
        let view = self.view()?;
        let (rva, size) = self.data_directory(DataDirectories::EXCEPTION)?;
        directories::exception::parse(&view, &self.sections, rva, size)
    }

    /// The Security directory is the one exception to RVA semantics — its
    /// `rva` field is already a file offset (spec.md §3, §9).
    pub fn security(&self) -> Option<SecurityTable> {
        let view = self.view()?;
        let (offset, size) = self.data_directory(DataDirectories::SECURITY)?;
        directories::security::parse(&view, offset, size)
    }

    pub fn relocations(&self) -> Option<Vec<RelocationBlock>> {
        let view = self.view()?;
        let (rva, size) = self.data_directory(DataDirectories::BASERELOC)?;
        directories::basereloc::parse(&view, &self.sections, rva, size)
    }

    pub fn debug(&self) -> Option<DebugTable> {
        let view = self.view()?;
        let (rva, size) = self.data_directory(DataDirectories::DEBUG)?;
        directories::debug::parse(&view, &self.sections, rva, size)
    }

    pub fn tls(&self) -> Option<TlsDirectory> {
        let view = self.view()?;
        let (rva, _) = self.data_directory(DataDirectories::TLS)?;
        let image_base = self.nt_header.as_ref()?.optional_header.as_ref()?.image_base();
        directories::tls::parse(&view, &self.sections, rva, self.width, image_base)
    }

    pub fn load_config(&self) -> Option<LoadConfig> {
        let view = self.view()?;
        let (rva, _) = self.data_directory(DataDirectories::LOAD_CONFIG)?;
        directories::load_config::parse(&view, &self.sections, rva, self.width)
    }

    pub fn bound_import(&self) -> Option<BoundImportTable> {
        let view = self.view()?;
        let (rva, _) = self.data_directory(DataDirectories::BOUND_IMPORT)?;
        let offset = view.rva_to_offset(&self.sections, rva)?;
        directories::bound_import::parse(&view, offset)
    }

    pub fn delay_import(&self) -> Option<DelayImportTable> {
        let view = self.view()?;
        let (rva, _) = self.data_directory(DataDirectories::DELAY_IMPORT)?;
        directories::delay_import::parse(&view, &self.sections, rva, self.width)
    }

    pub fn com_descriptor(&self) -> Option<ComDescriptor> {
        let view = self.view()?;
        let (rva, _) = self.data_directory(DataDirectories::COM_DESCRIPTOR)?;
        directories::com_descriptor::parse(&view, &self.sections, rva)
    }
}

impl<'a> Drop for Image<'a> {
    fn drop(&mut self) {
        self.close();
    }
}
