//! End-to-end mapping of granules into UMM-Var records.

use std::collections::HashSet;

use cf_vocabulary::{parse_table, StandardNameEntry, Vocabulary};
use netcdf_parser::parse_cdl;
use serde_json::json;
use test_utils::{aliases, cdl, lat_sst_granule, layered_granule, vocabulary};
use ummvar_common::{DataType, DimensionSize, Granule, Group, UmmVarRecord, Variable};
use ummvar_mapping::{generate, AliasTable, RecordSet, TraversalError};

fn sample_records() -> RecordSet {
    let granule = parse_cdl(cdl::SAMPLE_L2P, "sample.cdl").unwrap();
    let vocab = parse_table(vocabulary::CF_TABLE_EXCERPT).unwrap();
    generate(&granule, &vocab, &AliasTable::default()).unwrap()
}

fn record<'a>(set: &'a RecordSet, name: &str) -> &'a UmmVarRecord {
    set.records()
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("no record named {}", name))
}

fn additional<'a>(record: &'a UmmVarRecord, identifier: &str) -> Option<&'a str> {
    record
        .additional(identifier)
        .and_then(|a| a.description.as_deref())
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_generation_is_idempotent() {
    let first = sample_records().to_json(true).unwrap();
    let second = sample_records().to_json(true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_one_record_per_variable() {
    let granule = layered_granule(3, 2, 4);
    let set = generate(&granule, &Vocabulary::empty(), &AliasTable::default()).unwrap();

    assert_eq!(set.len(), 11);
    let unique: HashSet<&str> = set.names().collect();
    assert_eq!(unique.len(), 11);
    assert!(unique.contains("/g1/v3"));
    assert!(unique.contains("v0"));
}

#[test]
fn test_output_follows_walk_order() {
    let set = sample_records();
    assert_eq!(set.names().collect::<Vec<_>>(), cdl::SAMPLE_L2P_NAMES);
}

#[test]
fn test_no_fabricated_vocabulary_fields() {
    let set = sample_records();

    let quality = record(&set, "/geophysical_data/quality_level");
    assert_eq!(quality.standard_name, None);
    assert_eq!(quality.units, None);
    assert!(quality.additional("CF_Standard_Description").is_none());
    assert!(quality.additional("CF_Canonical_Units").is_none());

    let raw = record(&set, "raw_obs");
    assert_eq!(raw.units, None);
    assert!(raw.fill_values.is_empty());
}

#[test]
fn test_unrepresentable_fill_values_are_kept_verbatim() {
    let set = sample_records();

    let wind = record(&set, "/geophysical_data/wind_speed");
    assert!(wind.fill_values.is_empty());
    assert_eq!(additional(wind, "_FillValue"), Some("NaN"));
    assert_eq!(wind.units.as_deref(), Some("m s-1"));

    let flags = record(&set, "/geophysical_data/ancillary_data/l2_flags");
    assert!(flags.fill_values.is_empty());
    assert_eq!(additional(flags, "_FillValue"), Some("3000000000"));

    let attributes: Vec<&str> = set.diagnostics().iter().map(|d| d.attribute.as_str()).collect();
    assert_eq!(attributes, ["_FillValue", "_FillValue"]);
    assert_eq!(set.partial_count(), 2);
    assert_eq!(set.len(), 8);
}

#[test]
fn test_malformed_attribute_does_not_affect_other_records() {
    let good = Variable::new("good", DataType::Short).with_attribute("_FillValue", -1_i16);
    let bad = Variable::new("bad", DataType::Short).with_attribute("_FillValue", "none");

    let alone = Granule::new("alone", Group::root().with_variable(good.clone()));
    let mixed = Granule::new(
        "mixed",
        Group::root().with_variable(bad).with_variable(good),
    );

    let aliases = AliasTable::default();
    let alone = generate(&alone, &Vocabulary::empty(), &aliases).unwrap();
    let mixed = generate(&mixed, &Vocabulary::empty(), &aliases).unwrap();

    assert_eq!(record(&alone, "good"), record(&mixed, "good"));
    assert_eq!(mixed.partial_count(), 1);
    assert_eq!(mixed.diagnostics()[0].name, "bad");
}

#[test]
fn test_duplicate_paths_emit_nothing() {
    let root = Group::root()
        .with_variable(Variable::new("sst", DataType::Float))
        .with_variable(Variable::new("sst", DataType::Float));
    let granule = Granule::new("dup", root);

    let err = generate(&granule, &Vocabulary::empty(), &AliasTable::default()).unwrap_err();
    assert_eq!(err, TraversalError::DuplicatePath("sst".to_string()));
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_lat_sst_scenario() {
    let vocab = Vocabulary::from_entries([
        StandardNameEntry::new("latitude").with_units("degrees_north"),
        StandardNameEntry::new("sea_surface_temperature").with_units("kelvin"),
    ]);
    let set = generate(&lat_sst_granule(), &vocab, &AliasTable::default()).unwrap();
    assert!(set.diagnostics().is_empty());

    let lat = record(&set, "lat");
    assert_eq!(lat.units.as_deref(), Some("degrees_north"));
    assert!(lat.fill_values.is_empty());
    assert!(lat.additional_identifiers.is_empty());

    let sst = record(&set, "sst");
    assert_eq!(sst.units.as_deref(), Some("kelvin"));
    assert_eq!(sst.standard_name.as_deref(), Some("sea_surface_temperature"));
    assert_eq!(sst.fill_values.len(), 1);
    assert_eq!(sst.fill_values[0].value, json!(-9999.0));

    let json = set.to_json(false).unwrap();
    assert!(json.contains(r#""Value":-9999.0"#));
}

#[test]
fn test_unmatched_standard_name_passes_through() {
    let vocab = Vocabulary::from_entries([StandardNameEntry::new("latitude").with_units("degrees_north")]);
    let variable = Variable::new("x", DataType::Float).with_attribute("standard_name", "not_a_cf_name");
    let granule = Granule::new("unmatched", Group::root().with_variable(variable));

    let set = generate(&granule, &vocab, &AliasTable::default()).unwrap();
    let x = record(&set, "x");
    assert_eq!(x.standard_name, None);
    assert_eq!(x.units, None);
    assert_eq!(additional(x, "standard_name"), Some("not_a_cf_name"));
}

#[test]
fn test_unreachable_vocabulary_degrades_uniformly() {
    let granule = parse_cdl(cdl::SAMPLE_L2P, "sample.cdl").unwrap();
    let set = generate(&granule, &Vocabulary::empty(), &AliasTable::default()).unwrap();

    assert_eq!(set.len(), 8);
    let sst = record(&set, "/geophysical_data/sst");
    assert_eq!(sst.standard_name, None);
    assert_eq!(additional(sst, "standard_name"), Some("sea_surface_temperature"));
    assert_eq!(sst.units, None);

    for r in set.records() {
        assert_eq!(r.standard_name, None, "{}", r.name);
        assert!(r.additional("CF_Standard_Description").is_none(), "{}", r.name);
        assert!(r.additional("CF_Canonical_Units").is_none(), "{}", r.name);
    }
}

// ============================================================================
// Record contents
// ============================================================================

#[test]
fn test_packed_sst_record() {
    let set = sample_records();
    let sst = record(&set, "/geophysical_data/sst");

    assert_eq!(sst.long_name, "sea surface temperature");
    assert_eq!(sst.definition, "sea surface skin temperature");
    assert_eq!(sst.units.as_deref(), Some("K"));
    assert_eq!(sst.data_type, "short");
    assert_eq!(sst.fill_values[0].value, json!(-32767));
    assert_eq!(sst.scale.as_ref().map(|n| n.to_string()).as_deref(), Some("0.01"));
    assert_eq!(sst.offset.as_ref().map(|n| n.to_string()).as_deref(), Some("273.15"));
    assert_eq!(sst.valid_ranges[0].min.to_string(), "-200");
    assert_eq!(sst.valid_ranges[0].max.to_string(), "5000");
    assert_eq!(sst.variable_type.as_deref(), Some("SCIENCE_VARIABLE"));
    assert_eq!(sst.variable_sub_type, None);
    assert!(additional(sst, "CF_Standard_Description").is_some());
    assert_eq!(sst.additional_identifiers.len(), 1);

    let sizes: Vec<DimensionSize> = sst.dimensions.iter().map(|d| d.size).collect();
    assert_eq!(
        sizes,
        [DimensionSize::Varies, DimensionSize::Fixed(180), DimensionSize::Fixed(360)]
    );

    let ranges = sst.index_ranges.as_ref().unwrap();
    assert_eq!(ranges.lat_range, vec![-10.0, 20.0]);
    assert_eq!(ranges.lon_range, vec![-30.0, 40.0]);
}

#[test]
fn test_flag_variables() {
    let set = sample_records();

    let quality = record(&set, "/geophysical_data/quality_level");
    assert_eq!(additional(quality, "CF_Flag_Values"), Some("0 1 2 3 4 5"));
    assert!(additional(quality, "CF_Flag_Meanings").is_some_and(|m| m.starts_with("no_data")));
    assert_eq!(quality.variable_type.as_deref(), Some("QUALITY_VARIABLE"));
    assert_eq!(quality.variable_sub_type.as_deref(), Some("SCIENCE_EVENTFLAG"));
    assert_eq!(quality.fill_values[0].value, json!(-128));

    let flags = record(&set, "/geophysical_data/ancillary_data/l2_flags");
    let identifiers: Vec<&str> = flags
        .additional_identifiers
        .iter()
        .map(|a| a.identifier.as_str())
        .collect();
    assert_eq!(identifiers, ["CF_Flag_Meanings", "CF_Flag_Masks", "_FillValue"]);
    assert_eq!(additional(flags, "CF_Flag_Masks"), Some("1 2 4"));
    let kinds: Vec<&str> = flags.dimensions.iter().map(|d| d.kind.as_str()).collect();
    assert_eq!(kinds, ["ALONG_TRACK_DIMENSION", "CROSS_TRACK_DIMENSION"]);
    assert_eq!(
        flags.index_ranges.as_ref().map(|r| r.lat_range.clone()),
        Some(vec![-10.0, 20.0])
    );
}

#[test]
fn test_root_records() {
    let set = sample_records();

    let time = record(&set, "time");
    assert_eq!(time.units.as_deref(), Some("seconds since 1981-01-01 00:00:00"));
    assert_eq!(additional(time, "CF_Canonical_Units"), Some("s"));
    assert_eq!(time.dimensions[0].kind, "TIME_DIMENSION");

    let lon = record(&set, "lon");
    assert_eq!(lon.valid_ranges[0].min.to_string(), "-180.0");
    assert_eq!(
        lon.index_ranges.as_ref().map(|r| r.lon_range.clone()),
        Some(vec![-180.0, 180.0])
    );

    let raw = record(&set, "raw_obs");
    assert_eq!(raw.data_type, "OTHER");
    assert_eq!(raw.long_name, "raw observation record");
    assert_eq!(raw.sets[0].name, "raw_obs");
}

#[test]
fn test_custom_alias_table() {
    let aliases = AliasTable::from_yaml_str(aliases::CUSTOM_UNITS_YAML).unwrap();
    let variable = Variable::new("sst", DataType::Float)
        .with_attribute("units", "kelvin")
        .with_attribute("unit_label", "K")
        .with_attribute("comment", "skin temperature");
    let granule = Granule::new("custom", Group::root().with_variable(variable));

    let set = generate(&granule, &Vocabulary::empty(), &aliases).unwrap();
    let sst = record(&set, "sst");

    assert_eq!(sst.units.as_deref(), Some("K"));
    assert_eq!(additional(sst, "units"), Some("kelvin"));
    // No Definition rule in the custom table: falls back to the name.
    assert_eq!(sst.definition, "sst");
    assert_eq!(additional(sst, "comment"), Some("skin temperature"));
}

#[test]
fn test_selected_variable_json() {
    let set = sample_records();
    let selected = set.select_variable("wind_speed").unwrap();

    let json: serde_json::Value = serde_json::from_str(&selected.to_json(false).unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert_eq!(json[0]["Name"], "/geophysical_data/wind_speed");
    assert_eq!(json[0]["MetadataSpecification"]["Version"], "1.8.1");
    assert!(json[0].get("FillValues").is_none());
    assert_eq!(selected.diagnostics().len(), 1);
}
