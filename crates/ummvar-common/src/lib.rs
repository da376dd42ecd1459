//! Shared types for the UMM-Var generator.
//!
//! Two families of types live here:
//!
//! - the granule read model ([`Granule`], [`Group`], [`Variable`],
//!   [`Dimension`], [`AttrValue`]) produced by file readers and consumed by
//!   the mapping engine, and
//! - the UMM-Var output record ([`UmmVarRecord`] and its parts) produced by
//!   the mapping engine and consumed by the CMR ingest client.
//!
//! The read model is a tree of plain values. Nothing in it borrows from an
//! open file handle, so a granule can be built in memory for tests.

pub mod granule;
pub mod umm;
pub mod value;

pub use granule::{Attribute, DataType, Dimension, Granule, Group, Variable};
pub use umm::{
    AdditionalIdentifier, DimensionSize, FillValue, IndexRanges, MetadataSpecification,
    UmmDimension, UmmVarRecord, ValidRange, VariableSet, UMM_VAR_SCHEMA_URL, UMM_VAR_VERSION,
};
pub use value::{AttrValue, Number};
