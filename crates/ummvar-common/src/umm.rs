//! UMM-Var record types (schema version 1.8.1).
//!
//! Optional fields are skipped when absent: a missing field in the JSON output
//! means the value could not be determined from the source attributes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// UMM-Var schema version the records conform to.
pub const UMM_VAR_VERSION: &str = "1.8.1";

/// Base URL of the UMM-Var schema version the records conform to.
pub const UMM_VAR_SCHEMA_URL: &str = "https://cdn.earthdata.nasa.gov/umm/variable/v1.8.1";

/// One UMM-Var record, describing a single variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UmmVarRecord {
    pub name: String,
    pub long_name: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<UmmDimension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fill_values: Vec<FillValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_ranges: Vec<ValidRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_sub_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_ranges: Option<IndexRanges>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_identifiers: Vec<AdditionalIdentifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<VariableSet>,
    pub metadata_specification: MetadataSpecification,
}

impl UmmVarRecord {
    /// Look up an additional identifier by name.
    pub fn additional(&self, identifier: &str) -> Option<&AdditionalIdentifier> {
        self.additional_identifiers
            .iter()
            .find(|a| a.identifier == identifier)
    }
}

/// Dimension entry of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UmmDimension {
    pub name: String,
    pub size: DimensionSize,
    #[serde(rename = "Type")]
    pub kind: String,
}

/// Size of a dimension: fixed, or `"Varies"` for unlimited dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionSize {
    Fixed(u64),
    Varies,
}

impl Serialize for DimensionSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DimensionSize::Fixed(n) => serializer.serialize_u64(*n),
            DimensionSize::Varies => serializer.serialize_str("Varies"),
        }
    }
}

impl<'de> Deserialize<'de> for DimensionSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Fixed(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Fixed(n) => Ok(DimensionSize::Fixed(n)),
            Raw::Text(s) if s == "Varies" => Ok(DimensionSize::Varies),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "invalid dimension size '{}'",
                s
            ))),
        }
    }
}

/// Typed fill value of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FillValue {
    pub value: serde_json::Value,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl FillValue {
    pub fn science(value: serde_json::Value) -> Self {
        Self {
            value,
            kind: "SCIENCE_FILLVALUE".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidRange {
    pub min: serde_json::Number,
    pub max: serde_json::Number,
}

/// Geographic extent of the enclosing group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexRanges {
    pub lat_range: Vec<f64>,
    pub lon_range: Vec<f64>,
}

/// Free-form identifier carrying attributes that have no first-class field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdditionalIdentifier {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AdditionalIdentifier {
    pub fn new(identifier: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            description: Some(description.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VariableSet {
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub size: u32,
    pub index: u32,
}

impl VariableSet {
    /// The single-member "General" set every variable belongs to.
    pub fn general(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "General".to_string(),
            size: 1,
            index: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSpecification {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: String,
}

impl Default for MetadataSpecification {
    fn default() -> Self {
        Self {
            url: UMM_VAR_SCHEMA_URL.to_string(),
            name: "UMM-Var".to_string(),
            version: UMM_VAR_VERSION.to_string(),
        }
    }
}
