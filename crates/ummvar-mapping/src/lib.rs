//! UMM-Var mapping engine.
//!
//! Walks a granule's group tree, normalizes each variable's attributes
//! through a priority-ordered alias table, resolves standard names against
//! the CF vocabulary and assembles one UMM-Var record per variable.

pub mod aggregate;
pub mod alias;
pub mod builder;
pub mod coerce;
pub mod conventions;
pub mod error;
pub mod normalize;
pub mod outcome;
pub mod pipeline;
pub mod walker;

pub use aggregate::{RecordAggregator, RecordSet};
pub use alias::{AliasRule, AliasTable, CanonicalField};
pub use builder::RecordBuilder;
pub use error::{Diagnostic, MappingError, MappingResult, TraversalError, TypeCoercionError};
pub use normalize::{normalize, NormalizedAttributes};
pub use outcome::VariableOutcome;
pub use pipeline::generate;
pub use walker::{HierarchyWalker, VariableDescriptor};
