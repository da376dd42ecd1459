//! Priority-ordered alias table mapping raw attribute names to canonical
//! UMM-Var fields.
//!
//! The table is an ordered list of `{attribute, target}` rules. For each
//! target the first rule whose attribute is present on a variable wins; rule
//! order is the priority order. The built-in table can be replaced from YAML:
//!
//! ```yaml
//! aliases:
//!   - attribute: units
//!     target: Units
//!   - attribute: unit
//!     target: Units
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, MappingResult};

/// Canonical attribute slots filled from raw attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    StandardName,
    LongName,
    Definition,
    Units,
    FillValue,
    Scale,
    Offset,
    ValidMin,
    ValidMax,
    ValidRange,
    ContentType,
    FlagValues,
    FlagMeanings,
    FlagMasks,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 14] = [
        CanonicalField::StandardName,
        CanonicalField::LongName,
        CanonicalField::Definition,
        CanonicalField::Units,
        CanonicalField::FillValue,
        CanonicalField::Scale,
        CanonicalField::Offset,
        CanonicalField::ValidMin,
        CanonicalField::ValidMax,
        CanonicalField::ValidRange,
        CanonicalField::ContentType,
        CanonicalField::FlagValues,
        CanonicalField::FlagMeanings,
        CanonicalField::FlagMasks,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    pub attribute: String,
    pub target: CanonicalField,
}

impl AliasRule {
    pub fn new(attribute: impl Into<String>, target: CanonicalField) -> Self {
        Self {
            attribute: attribute.into(),
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    aliases: Vec<AliasRule>,
}

impl AliasTable {
    pub fn new(aliases: Vec<AliasRule>) -> MappingResult<Self> {
        let table = Self { aliases };
        table.validate()?;
        Ok(table)
    }

    pub fn rules(&self) -> &[AliasRule] {
        &self.aliases
    }

    /// Attribute names for `target`, highest priority first.
    pub fn aliases_for(&self, target: CanonicalField) -> impl Iterator<Item = &str> {
        self.aliases
            .iter()
            .filter(move |rule| rule.target == target)
            .map(|rule| rule.attribute.as_str())
    }

    pub fn from_yaml_str(yaml: &str) -> MappingResult<Self> {
        let table: AliasTable = serde_yaml::from_str(yaml)
            .map_err(|e| MappingError::alias_table(format!("invalid YAML: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_yaml_file(path: &Path) -> MappingResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            MappingError::alias_table(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    fn validate(&self) -> MappingResult<()> {
        if self.aliases.is_empty() {
            return Err(MappingError::alias_table("table has no aliases"));
        }
        for (i, rule) in self.aliases.iter().enumerate() {
            if rule.attribute.trim().is_empty() {
                return Err(MappingError::alias_table(format!(
                    "rule {} has an empty attribute name",
                    i + 1
                )));
            }
            if self.aliases[..i].contains(rule) {
                return Err(MappingError::alias_table(format!(
                    "rule {} duplicates '{}' -> {:?}",
                    i + 1,
                    rule.attribute,
                    rule.target
                )));
            }
        }
        Ok(())
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        use crate::alias::CanonicalField::*;

        let rules = [
            ("standard_name", StandardName),
            ("long_name", LongName),
            ("description", Definition),
            ("comment", Definition),
            ("long_name", Definition),
            ("units", Units),
            ("unit", Units),
            ("_FillValue", FillValue),
            ("missing_value", FillValue),
            ("FillValue", FillValue),
            ("scale_factor", Scale),
            ("add_offset", Offset),
            ("valid_min", ValidMin),
            ("valid_max", ValidMax),
            ("valid_range", ValidRange),
            ("coverage_content_type", ContentType),
            ("flag_values", FlagValues),
            ("flag_meanings", FlagMeanings),
            ("flag_masks", FlagMasks),
        ];

        Self {
            aliases: rules
                .into_iter()
                .map(|(attribute, target)| AliasRule::new(attribute, target))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priorities() {
        let table = AliasTable::default();
        let definition: Vec<&str> = table.aliases_for(CanonicalField::Definition).collect();
        assert_eq!(definition, ["description", "comment", "long_name"]);
        let fill: Vec<&str> = table.aliases_for(CanonicalField::FillValue).collect();
        assert_eq!(fill, ["_FillValue", "missing_value", "FillValue"]);
    }

    #[test]
    fn test_default_covers_every_field() {
        let table = AliasTable::default();
        for field in CanonicalField::ALL {
            assert!(table.aliases_for(field).next().is_some(), "{:?}", field);
        }
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = serde_yaml::to_string(&AliasTable::default()).unwrap();
        assert_eq!(AliasTable::from_yaml_str(&yaml).unwrap(), AliasTable::default());
    }

    #[test]
    fn test_yaml_rejects_unknown_target() {
        let yaml = "aliases:\n  - attribute: units\n    target: Colour\n";
        assert!(AliasTable::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let rules = vec![
            AliasRule::new("units", CanonicalField::Units),
            AliasRule::new("units", CanonicalField::Units),
        ];
        assert!(AliasTable::new(rules).is_err());
    }
}
