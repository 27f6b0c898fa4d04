//! Defensive parser for PE32/PE32+ images: the caller supplies a path or a
//! byte buffer; the library decomposes headers, directories, and tables
//! without trusting any offset it did not itself bounds-check.
//!
//! Every per-directory query returns `Option<T>` — a missing or malformed
//! directory is simply absent, never an error or a panic. `PeError`/
//! [`OpenStatus`] exist only at the [`Image::open_path`]/
//! [`Image::open_bytes`] boundary.

pub mod bytes;
pub mod directories;
pub mod error;
pub mod flatten;
pub mod header;
pub mod image;
pub mod limits;
pub mod safety;

pub use bytes::ByteSource;
pub use error::{OpenStatus, PeError};
pub use flatten::{flatten_resources, FlatResource};
pub use header::section::{offset_to_rva, rva_to_offset as rva_to_file_offset, Section};
pub use image::Image;
