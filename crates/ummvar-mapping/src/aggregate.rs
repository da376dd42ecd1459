//! Collection of per-variable outcomes into an ordered record set.

use ummvar_common::UmmVarRecord;

use crate::error::{Diagnostic, MappingResult};
use crate::outcome::VariableOutcome;

/// Accumulates outcomes in traversal order.
#[derive(Debug, Default)]
pub struct RecordAggregator {
    records: Vec<UmmVarRecord>,
    diagnostics: Vec<Diagnostic>,
    partial: usize,
}

impl RecordAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn push(&mut self, outcome: VariableOutcome) {
        if outcome.is_partial() {
            self.partial += 1;
        }
        let (record, diagnostics) = outcome.into_parts();
        self.records.push(record);
        self.diagnostics.extend(diagnostics);
    }

    pub fn finish(self) -> RecordSet {
        RecordSet {
            records: self.records,
            diagnostics: self.diagnostics,
            partial: self.partial,
        }
    }
}

impl Extend<VariableOutcome> for RecordAggregator {
    fn extend<I: IntoIterator<Item = VariableOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.push(outcome);
        }
    }
}

/// One record per variable, in traversal order, plus every diagnostic raised
/// while building them.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<UmmVarRecord>,
    diagnostics: Vec<Diagnostic>,
    partial: usize,
}

impl RecordSet {
    pub fn records(&self) -> &[UmmVarRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records built with at least one diagnostic.
    pub fn partial_count(&self) -> usize {
        self.partial
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    /// Keep only the record named `name` (record name or bare variable
    /// name) and its diagnostics. Returns `None` when nothing matches.
    pub fn select_variable(&self, name: &str) -> Option<RecordSet> {
        let records: Vec<UmmVarRecord> = self
            .records
            .iter()
            .filter(|r| r.name == name || r.sets.iter().any(|s| s.name == name))
            .cloned()
            .collect();
        if records.is_empty() {
            return None;
        }

        let diagnostics: Vec<Diagnostic> = self
            .diagnostics
            .iter()
            .filter(|d| records.iter().any(|r| r.name == d.name))
            .cloned()
            .collect();
        let partial = records
            .iter()
            .filter(|r| diagnostics.iter().any(|d| d.name == r.name))
            .count();

        Some(RecordSet {
            records,
            diagnostics,
            partial,
        })
    }

    /// The records as a JSON array.
    pub fn to_json(&self, pretty: bool) -> MappingResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(&self.records)?
        } else {
            serde_json::to_string(&self.records)?
        };
        Ok(json)
    }

    /// The diagnostics as a JSON array.
    pub fn diagnostics_json(&self) -> MappingResult<String> {
        Ok(serde_json::to_string_pretty(&self.diagnostics)?)
    }

    pub fn into_records(self) -> Vec<UmmVarRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ummvar_common::{MetadataSpecification, VariableSet};

    fn record(name: &str, short: &str) -> UmmVarRecord {
        UmmVarRecord {
            name: name.to_string(),
            long_name: name.to_string(),
            definition: short.to_string(),
            standard_name: None,
            units: None,
            data_type: "float".to_string(),
            dimensions: Vec::new(),
            fill_values: Vec::new(),
            scale: None,
            offset: None,
            valid_ranges: Vec::new(),
            variable_type: None,
            variable_sub_type: None,
            index_ranges: None,
            additional_identifiers: Vec::new(),
            sets: vec![VariableSet::general(short)],
            metadata_specification: MetadataSpecification::default(),
        }
    }

    fn sample() -> RecordSet {
        let mut aggregator = RecordAggregator::new();
        aggregator.push(VariableOutcome::new(
            record("/g/sst", "sst"),
            vec![Diagnostic::new("/g/sst", "/g/sst", "_FillValue", "bad")],
        ));
        aggregator.push(VariableOutcome::new(record("lat", "lat"), Vec::new()));
        aggregator.finish()
    }

    #[test]
    fn test_order_and_counts() {
        let set = sample();
        assert_eq!(set.names().collect::<Vec<_>>(), ["/g/sst", "lat"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.partial_count(), 1);
        assert_eq!(set.diagnostics().len(), 1);
    }

    #[test]
    fn test_select_by_record_or_short_name() {
        let set = sample();

        let selected = set.select_variable("sst").unwrap();
        assert_eq!(selected.names().collect::<Vec<_>>(), ["/g/sst"]);
        assert_eq!(selected.diagnostics().len(), 1);
        assert_eq!(selected.partial_count(), 1);

        let selected = set.select_variable("lat").unwrap();
        assert!(selected.diagnostics().is_empty());
        assert_eq!(selected.partial_count(), 0);

        assert!(set.select_variable("missing").is_none());
    }

    #[test]
    fn test_empty_set_serializes_to_empty_array() {
        let set = RecordAggregator::new().finish();
        assert!(set.is_empty());
        assert_eq!(set.to_json(false).unwrap(), "[]");
    }

    #[test]
    fn test_diagnostics_json() {
        let json = sample().diagnostics_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["attribute"], "_FillValue");
        assert_eq!(parsed[0]["path"], "/g/sst");
    }
}
