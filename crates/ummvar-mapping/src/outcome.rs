//! Per-variable build outcome.

use ummvar_common::UmmVarRecord;

use crate::error::Diagnostic;

/// Result of building one variable's record. A record is always produced;
/// `Partial` carries the problems that caused fields to be left out.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableOutcome {
    Built(UmmVarRecord),
    Partial {
        record: UmmVarRecord,
        diagnostics: Vec<Diagnostic>,
    },
}

impl VariableOutcome {
    pub fn new(record: UmmVarRecord, diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            VariableOutcome::Built(record)
        } else {
            VariableOutcome::Partial {
                record,
                diagnostics,
            }
        }
    }

    pub fn record(&self) -> &UmmVarRecord {
        match self {
            VariableOutcome::Built(record) | VariableOutcome::Partial { record, .. } => record,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            VariableOutcome::Built(_) => &[],
            VariableOutcome::Partial { diagnostics, .. } => diagnostics,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, VariableOutcome::Partial { .. })
    }

    pub fn into_parts(self) -> (UmmVarRecord, Vec<Diagnostic>) {
        match self {
            VariableOutcome::Built(record) => (record, Vec::new()),
            VariableOutcome::Partial {
                record,
                diagnostics,
            } => (record, diagnostics),
        }
    }
}
