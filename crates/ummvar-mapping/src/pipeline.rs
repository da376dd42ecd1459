//! Walk → build → aggregate.

use cf_vocabulary::Vocabulary;
use tracing::info;
use ummvar_common::Granule;

use crate::aggregate::{RecordAggregator, RecordSet};
use crate::alias::AliasTable;
use crate::builder::RecordBuilder;
use crate::error::TraversalError;
use crate::walker::HierarchyWalker;

/// Build one record per variable of `granule`, in walk order.
///
/// Fails only when the granule cannot be traversed; per-variable problems
/// end up as diagnostics on the returned set.
pub fn generate(
    granule: &Granule,
    vocabulary: &Vocabulary,
    aliases: &AliasTable,
) -> Result<RecordSet, TraversalError> {
    let walker = HierarchyWalker::new(granule)?;
    let builder = RecordBuilder::new(vocabulary, aliases);

    let mut aggregator = RecordAggregator::with_capacity(granule.variable_count());
    aggregator.extend(walker.iter().map(|descriptor| builder.build(&descriptor)));
    let records = aggregator.finish();

    info!(
        source = %granule.source,
        records = records.len(),
        partial = records.partial_count(),
        diagnostics = records.diagnostics().len(),
        vocabulary_entries = vocabulary.len(),
        "Generated UMM-Var records"
    );

    Ok(records)
}
