//! Per-variable UMM-Var record construction.

use std::collections::HashSet;

use cf_vocabulary::Vocabulary;
use tracing::{debug, warn};
use ummvar_common::{
    AdditionalIdentifier, Attribute, DimensionSize, FillValue, MetadataSpecification,
    UmmDimension, UmmVarRecord, ValidRange, Variable, VariableSet,
};

use crate::alias::{AliasTable, CanonicalField};
use crate::coerce::{coerce_bound, coerce_own_scalar, coerce_pair, coerce_scalar};
use crate::conventions::{dimension_type, index_ranges, variable_type};
use crate::error::{Diagnostic, TypeCoercionError};
use crate::normalize::{normalize, NormalizedAttributes};
use crate::outcome::VariableOutcome;
use crate::walker::VariableDescriptor;

pub const CF_FLAG_VALUES: &str = "CF_Flag_Values";
pub const CF_FLAG_MEANINGS: &str = "CF_Flag_Meanings";
pub const CF_FLAG_MASKS: &str = "CF_Flag_Masks";
pub const CF_STANDARD_DESCRIPTION: &str = "CF_Standard_Description";
pub const CF_CANONICAL_UNITS: &str = "CF_Canonical_Units";

const SCIENCE_EVENTFLAG: &str = "SCIENCE_EVENTFLAG";

/// Builds one record per variable from its attributes, dimensions and the
/// standard-name vocabulary. Has no side effects besides logging.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    vocabulary: &'a Vocabulary,
    aliases: &'a AliasTable,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(vocabulary: &'a Vocabulary, aliases: &'a AliasTable) -> Self {
        Self {
            vocabulary,
            aliases,
        }
    }

    pub fn build(&self, descriptor: &VariableDescriptor<'_>) -> VariableOutcome {
        let variable = descriptor.variable;
        let name = descriptor.record_name();
        let normalized = normalize(&variable.attributes, self.aliases);
        let mut state = BuildState {
            path: &descriptor.path,
            name: &name,
            normalized: &normalized,
            used: HashSet::new(),
            diagnostics: Vec::new(),
        };

        let mut additional = Vec::new();

        // Flags
        for (field, identifier) in [
            (CanonicalField::FlagValues, CF_FLAG_VALUES),
            (CanonicalField::FlagMeanings, CF_FLAG_MEANINGS),
            (CanonicalField::FlagMasks, CF_FLAG_MASKS),
        ] {
            if let Some(attr) = state.take(field) {
                additional.push(AdditionalIdentifier::new(
                    identifier,
                    attr.value.to_display_string(),
                ));
            }
        }

        // Standard name and vocabulary
        // Unresolved names stay in the additional identifiers
        let resolved = state
            .normalized
            .text(CanonicalField::StandardName)
            .and_then(|n| self.vocabulary.lookup(n).map(|entry| (n, entry)));
        if resolved.is_some() {
            state.take(CanonicalField::StandardName);
        }
        let standard_name = resolved.map(|(n, _)| n);
        let entry = resolved.map(|(_, entry)| entry);
        if let Some(description) = entry.and_then(|e| e.description.as_deref()) {
            additional.push(AdditionalIdentifier::new(CF_STANDARD_DESCRIPTION, description));
        }

        let explicit_units = state.take_text(CanonicalField::Units);
        let canonical_units = entry.and_then(|e| e.canonical_units.as_deref());
        let units = match (explicit_units, canonical_units) {
            (Some(explicit), Some(canonical)) => {
                if explicit != canonical {
                    additional.push(AdditionalIdentifier::new(CF_CANONICAL_UNITS, canonical));
                }
                Some(explicit)
            }
            (Some(explicit), None) => Some(explicit),
            (None, canonical) => canonical,
        };

        let long_name = state
            .take_text(CanonicalField::LongName)
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());
        let definition = state
            .take_text(CanonicalField::Definition)
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());

        // Typed values
        let mut fill_values = Vec::new();
        if let Some(attr) = state.winner(CanonicalField::FillValue) {
            let coerced = coerce_scalar(&attr.name, &attr.value, &variable.dtype);
            if let Some(value) = state.accept(attr, coerced) {
                fill_values.push(FillValue::science(value));
            }
        }

        let scale = state
            .winner(CanonicalField::Scale)
            .and_then(|attr| state.accept(attr, coerce_own_scalar(&attr.name, &attr.value)));
        let offset = state
            .winner(CanonicalField::Offset)
            .and_then(|attr| state.accept(attr, coerce_own_scalar(&attr.name, &attr.value)));

        let valid_ranges = state.valid_ranges(variable);

        // Classification
        let variable_type = match state.normalized.text(CanonicalField::ContentType) {
            Some(content_type) => match variable_type(content_type) {
                Some(mapped) => {
                    state.take(CanonicalField::ContentType);
                    Some(mapped.to_string())
                }
                None => {
                    state.diagnose(
                        "coverage_content_type",
                        format!("unknown coverage_content_type '{}'", content_type),
                    );
                    None
                }
            },
            None => None,
        };

        let variable_sub_type = variable
            .attributes
            .iter()
            .any(|a| a.name.starts_with("flag"))
            .then(|| SCIENCE_EVENTFLAG.to_string());

        let index_ranges = match index_ranges(&descriptor.scopes) {
            Some(Ok(ranges)) => Some(ranges),
            Some(Err(attribute)) => {
                state.diagnose(attribute, "geospatial bound is not a number");
                None
            }
            None => None,
        };

        let dimensions = variable
            .dimensions
            .iter()
            .map(|d| UmmDimension {
                name: d.name.clone(),
                size: if d.is_unlimited() {
                    DimensionSize::Varies
                } else {
                    DimensionSize::Fixed(d.size)
                },
                kind: dimension_type(&d.name).to_string(),
            })
            .collect();

        // Everything not consumed above, verbatim and in declaration order
        additional.extend(
            variable
                .attributes
                .iter()
                .filter(|a| !state.used.contains(a.name.as_str()))
                .map(|a| AdditionalIdentifier::new(a.name.clone(), a.value.to_display_string())),
        );

        let record = UmmVarRecord {
            name: name.clone(),
            long_name,
            definition,
            standard_name: standard_name.map(str::to_string),
            units: units.map(str::to_string),
            data_type: variable.dtype.umm_name().to_string(),
            dimensions,
            fill_values,
            scale,
            offset,
            valid_ranges,
            variable_type,
            variable_sub_type,
            index_ranges,
            additional_identifiers: additional,
            sets: vec![VariableSet::general(variable.name.clone())],
            metadata_specification: MetadataSpecification::default(),
        };

        for diagnostic in &state.diagnostics {
            warn!(
                variable = %diagnostic.path,
                attribute = %diagnostic.attribute,
                "{}",
                diagnostic.message
            );
        }
        debug!(
            name = %record.name,
            diagnostics = state.diagnostics.len(),
            "Built UMM-Var record"
        );

        VariableOutcome::new(record, state.diagnostics)
    }
}

/// Bookkeeping for one build: which attributes were consumed into
/// first-class fields, and what went wrong.
struct BuildState<'b, 'v> {
    path: &'b str,
    name: &'b str,
    normalized: &'b NormalizedAttributes<'v>,
    used: HashSet<&'v str>,
    diagnostics: Vec<Diagnostic>,
}

impl<'b, 'v> BuildState<'b, 'v> {
    fn winner(&self, field: CanonicalField) -> Option<&'v Attribute> {
        self.normalized.winner(field)
    }

    /// Consume the winner of `field` regardless of its value.
    fn take(&mut self, field: CanonicalField) -> Option<&'v Attribute> {
        let attr = self.normalized.winner(field)?;
        self.used.insert(attr.name.as_str());
        Some(attr)
    }

    /// Consume the winner of `field` if it is non-empty text.
    fn take_text(&mut self, field: CanonicalField) -> Option<&'v str> {
        let text = self.normalized.text(field)?;
        self.take(field);
        Some(text)
    }

    /// Consume `attr` on success, record a diagnostic on failure.
    fn accept<T>(&mut self, attr: &'v Attribute, result: Result<T, TypeCoercionError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.used.insert(attr.name.as_str());
                Some(value)
            }
            Err(e) => {
                self.diagnostics
                    .push(Diagnostic::from_coercion(self.path, self.name, &e));
                None
            }
        }
    }

    fn diagnose(&mut self, attribute: &str, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(self.path, self.name, attribute, message));
    }

    /// `valid_min`/`valid_max` when both coerce, otherwise `valid_range`.
    fn valid_ranges(&mut self, variable: &Variable) -> Vec<ValidRange> {
        let dtype = &variable.dtype;

        if let (Some(min_attr), Some(max_attr)) = (
            self.winner(CanonicalField::ValidMin),
            self.winner(CanonicalField::ValidMax),
        ) {
            let min = coerce_bound(&min_attr.name, &min_attr.value, dtype);
            let max = coerce_bound(&max_attr.name, &max_attr.value, dtype);
            match (min, max) {
                (Ok(min), Ok(max)) => {
                    self.used.insert(min_attr.name.as_str());
                    self.used.insert(max_attr.name.as_str());
                    return vec![ValidRange { min, max }];
                }
                (min, max) => {
                    for err in [min.err(), max.err()].into_iter().flatten() {
                        self.diagnostics
                            .push(Diagnostic::from_coercion(self.path, self.name, &err));
                    }
                }
            }
        }

        if let Some(range_attr) = self.winner(CanonicalField::ValidRange) {
            let coerced = coerce_pair(&range_attr.name, &range_attr.value, dtype);
            if let Some((min, max)) = self.accept(range_attr, coerced) {
                return vec![ValidRange { min, max }];
            }
        }

        Vec::new()
    }
}
