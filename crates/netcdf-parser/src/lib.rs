//! Granule structure reader for netCDF-4/HDF5 files.
//!
//! Produces the shared [`Granule`] read model: groups, variables, dimensions
//! and typed attributes. No data payload is read.
//!
//! # Implementation Notes
//!
//! By default this uses the `ncdump` command-line tool to extract the CDL
//! header, which is then parsed in-process. Saved headers (`.cdl` files) are
//! parsed directly without a subprocess. With the `native` feature (requires
//! libhdf5-dev and libnetcdf-dev) files are read through libnetcdf instead.

pub mod cdl;
pub mod error;
pub mod ncdump;

#[cfg(feature = "native")]
pub mod native;

use std::path::Path;

use tracing::info;
pub use ummvar_common::Granule;

pub use cdl::parse_cdl;
pub use error::{NetCdfError, NetCdfResult};

/// Source of granule structure.
pub trait GranuleReader: Send + Sync {
    /// Read the structure of the granule at `path`.
    fn read(&self, path: &Path) -> NetCdfResult<Granule>;

    /// Short reader name for logging.
    fn name(&self) -> &'static str;
}

/// Reads a saved CDL header from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct CdlFileReader;

impl GranuleReader for CdlFileReader {
    fn read(&self, path: &Path) -> NetCdfResult<Granule> {
        let text = std::fs::read_to_string(path)?;
        parse_cdl(&text, &path.display().to_string())
    }

    fn name(&self) -> &'static str {
        "cdl"
    }
}

/// Reads a binary granule through `ncdump -h`.
#[derive(Debug, Clone)]
pub struct NcdumpReader {
    program: String,
}

impl NcdumpReader {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NcdumpReader {
    fn default() -> Self {
        Self::new("ncdump")
    }
}

impl GranuleReader for NcdumpReader {
    fn read(&self, path: &Path) -> NetCdfResult<Granule> {
        let header = ncdump::dump_header(&self.program, path)?;
        parse_cdl(&header, &path.display().to_string())
    }

    fn name(&self) -> &'static str {
        "ncdump"
    }
}

/// Reads a binary granule through libnetcdf.
#[cfg(feature = "native")]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeReader;

#[cfg(feature = "native")]
impl GranuleReader for NativeReader {
    fn read(&self, path: &Path) -> NetCdfResult<Granule> {
        native::read_structure(path)
    }

    fn name(&self) -> &'static str {
        "native"
    }
}

/// Pick the reader for a path: `.cdl` files are parsed directly, anything
/// else goes through libnetcdf (with `native`) or `ncdump`.
pub fn reader_for(path: &Path) -> Box<dyn GranuleReader> {
    let is_cdl = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("cdl"))
        .unwrap_or(false);

    if is_cdl {
        return Box::new(CdlFileReader);
    }

    #[cfg(feature = "native")]
    {
        Box::new(NativeReader)
    }
    #[cfg(not(feature = "native"))]
    {
        Box::new(NcdumpReader::default())
    }
}

/// Read a granule's structure with the reader suited to its path.
pub fn read_granule<P: AsRef<Path>>(path: P) -> NetCdfResult<Granule> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(NetCdfError::NotFound(path.display().to_string()));
    }

    let reader = reader_for(path);
    let granule = reader.read(path)?;
    info!(
        path = %path.display(),
        reader = reader.name(),
        variables = granule.variable_count(),
        "Read granule structure"
    );
    Ok(granule)
}
