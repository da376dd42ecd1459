//! Attribute normalization: raw attributes → canonical fields.

use std::collections::BTreeMap;

use ummvar_common::{AttrValue, Attribute};

use crate::alias::{AliasTable, CanonicalField};

/// The attribute chosen for each canonical field.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAttributes<'a> {
    winners: BTreeMap<CanonicalField, &'a Attribute>,
}

impl<'a> NormalizedAttributes<'a> {
    /// The attribute that won `field`, if any.
    pub fn winner(&self, field: CanonicalField) -> Option<&'a Attribute> {
        self.winners.get(&field).copied()
    }

    pub fn value(&self, field: CanonicalField) -> Option<&'a AttrValue> {
        self.winner(field).map(|a| &a.value)
    }

    /// Non-empty text of a field whose winner is textual.
    pub fn text(&self, field: CanonicalField) -> Option<&'a str> {
        self.value(field)
            .and_then(AttrValue::as_text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Map raw attributes onto canonical fields using `table`.
///
/// For each field the highest-priority alias present wins. Blank text
/// counts as absent, so the next alias is tried. Losing aliases and
/// unrecognized attributes are left to the caller.
pub fn normalize<'a>(attributes: &'a [Attribute], table: &AliasTable) -> NormalizedAttributes<'a> {
    let mut winners = BTreeMap::new();

    for field in CanonicalField::ALL {
        let winner = table.aliases_for(field).find_map(|alias| {
            attributes
                .iter()
                .find(|a| a.name == alias && !is_blank(&a.value))
        });
        if let Some(attribute) = winner {
            winners.insert(field, attribute);
        }
    }

    NormalizedAttributes { winners }
}

fn is_blank(value: &AttrValue) -> bool {
    value.as_text().is_some_and(|t| t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<Attribute> {
        pairs.iter().map(|(n, v)| Attribute::new(*n, *v)).collect()
    }

    #[test]
    fn test_first_alias_wins() {
        let attributes = attrs(&[("unit", "K"), ("units", "kelvin")]);
        let normalized = normalize(&attributes, &AliasTable::default());

        assert_eq!(normalized.text(CanonicalField::Units), Some("kelvin"));
        assert_eq!(normalized.winner(CanonicalField::Units).map(|a| a.name.as_str()), Some("units"));
    }

    #[test]
    fn test_one_attribute_can_win_two_fields() {
        let attributes = attrs(&[("long_name", "sea surface temperature")]);
        let normalized = normalize(&attributes, &AliasTable::default());

        assert_eq!(normalized.text(CanonicalField::LongName), Some("sea surface temperature"));
        assert_eq!(normalized.text(CanonicalField::Definition), Some("sea surface temperature"));
    }

    #[test]
    fn test_unrecognized_attributes_win_nothing() {
        let attributes = attrs(&[("source", "ECMWF"), ("units", "m"), ("platform", "Aqua")]);
        let normalized = normalize(&attributes, &AliasTable::default());

        let winners: Vec<&str> = CanonicalField::ALL
            .into_iter()
            .filter_map(|field| normalized.winner(field))
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(winners, ["units"]);
    }

    #[test]
    fn test_deterministic() {
        let attributes = attrs(&[("comment", "c"), ("description", "d"), ("missing_value", "x")]);
        let table = AliasTable::default();
        assert_eq!(normalize(&attributes, &table), normalize(&attributes, &table));
        assert_eq!(normalize(&attributes, &table).text(CanonicalField::Definition), Some("d"));
    }

    #[test]
    fn test_empty_text_is_not_a_value() {
        let attributes = attrs(&[("units", "  ")]);
        let normalized = normalize(&attributes, &AliasTable::default());
        assert!(normalized.winner(CanonicalField::Units).is_none());
        assert_eq!(normalized.text(CanonicalField::Units), None);
    }

    #[test]
    fn test_blank_alias_falls_through_to_next() {
        let attributes = attrs(&[("units", ""), ("unit", "K")]);
        let normalized = normalize(&attributes, &AliasTable::default());
        assert_eq!(normalized.winner(CanonicalField::Units).map(|a| a.name.as_str()), Some("unit"));
        assert_eq!(normalized.text(CanonicalField::Units), Some("K"));
    }
}
