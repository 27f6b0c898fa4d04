pub mod characteristics;
pub mod data_directories;
pub mod dos;
pub mod file_header;
pub mod machine;
pub mod nt;
pub mod optional;
pub mod rich;
pub mod section;

pub use characteristics::{DllCharacteristics, FileCharacteristics, SectionCharacteristics};
pub use data_directories::{DataDirectories, DataDirectoryEntry};
pub use dos::DosHeader;
pub use file_header::FileHeader;
pub use machine::MachineWidth;
pub use nt::NtHeader;
pub use optional::{OptionalHeader, OptionalHeader32, OptionalHeader64};
pub use rich::RichHeader;
pub use section::{Section, SectionHeader};
