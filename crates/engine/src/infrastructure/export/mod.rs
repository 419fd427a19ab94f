//! Export of characters into portable archive files.

mod archive;

pub use archive::{ArchiveExporter, ExportArchive, ExportError, FORMAT_VERSION};
