pub mod basereloc;
pub mod bound_import;
pub mod com_descriptor;
pub mod debug;
pub mod delay_import;
pub mod exception;
pub mod export;
pub mod import;
pub mod load_config;
pub mod resources;
pub mod security;
pub mod tls;

pub use basereloc::{RelocationBlock, RelocationEntry};
pub use bound_import::{BoundImportDescriptor, BoundImportTable, BoundForwarderRef};
pub use com_descriptor::{ComDescriptor, DirectoryEntry};
pub use debug::{DebugDirectoryEntry, DebugTable};
pub use delay_import::{DelayImportDescriptor, DelayImportFunction, DelayImportTable};
pub use exception::RuntimeFunction;
pub use export::{ExportEntry, ExportTable};
pub use import::{ImportFunction, ImportModule, ImportTable};
pub use load_config::LoadConfig;
pub use resources::{ResourceDataEntry, ResourceDirectory, ResourceEntry, ResourceId, ResourceNode};
pub use security::{SecurityEntry, SecurityTable};
pub use tls::TlsDirectory;
