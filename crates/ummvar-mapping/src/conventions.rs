//! Convention tables: dimension types, coverage content types and
//! geospatial bounds.

use ummvar_common::{AttrValue, Group, IndexRanges};

/// UMM-Var dimension type predicted from a dimension name.
pub fn dimension_type(name: &str) -> &'static str {
    let name = name.to_lowercase();
    if name == "time" {
        "TIME_DIMENSION"
    } else if name.starts_with("lat") {
        "LATITUDE_DIMENSION"
    } else if name.starts_with("lon") {
        "LONGITUDE_DIMENSION"
    } else if name == "nj" {
        "ALONG_TRACK_DIMENSION"
    } else if name == "ni" {
        "CROSS_TRACK_DIMENSION"
    } else {
        "OTHER"
    }
}

/// UMM-Var `VariableType` for an ACDD `coverage_content_type` value.
///
/// Includes the misspellings seen in published PO.DAAC collections.
pub fn variable_type(coverage_content_type: &str) -> Option<&'static str> {
    let mapped = match coverage_content_type.trim() {
        "image" | "thematicClassification" | "physicalMeasurement" | "modelResult" => {
            "SCIENCE_VARIABLE"
        }
        "auxiliaryInformation" | "auxillaryInformation" | "auxilliaryData" => "ANCILLARY_VARIABLE",
        "qualityInformation" | "qualityInformaion" => "QUALITY_VARIABLE",
        "referenceInformation" | "reference_information" => "OTHER",
        "coordinate" => "COORDINATE",
        _ => return None,
    };
    Some(mapped)
}

pub const LAT_MIN: &str = "geospatial_lat_min";
pub const LAT_MAX: &str = "geospatial_lat_max";
pub const LON_MIN: &str = "geospatial_lon_min";
pub const LON_MAX: &str = "geospatial_lon_max";

/// Numeric value of a geospatial bound. Text such as `"45.5N"` or `"30W"` is
/// stripped to its number; `S` and `W` hemispheres are negative.
pub fn sanitize_coordinate(value: &AttrValue) -> Option<f64> {
    if let Some(number) = value.scalar() {
        let v = number.as_f64();
        return v.is_finite().then_some(v);
    }

    let text = value.as_text()?.trim();
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let parsed = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;

    let southern_or_western = text
        .chars()
        .rev()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| matches!(c.to_ascii_uppercase(), 'S' | 'W'))
        .unwrap_or(false);

    if southern_or_western && parsed > 0.0 {
        Some(-parsed)
    } else {
        Some(parsed)
    }
}

/// Index ranges from the nearest group in `scopes` (outermost first) that
/// carries all four geospatial bounds.
///
/// Returns `Some(Err(attribute))` when the nearest such group has a bound
/// that cannot be read as a number.
pub fn index_ranges(scopes: &[&Group]) -> Option<Result<IndexRanges, &'static str>> {
    let group = scopes.iter().rev().find(|g| {
        [LAT_MIN, LAT_MAX, LON_MIN, LON_MAX]
            .iter()
            .all(|name| g.attribute(name).is_some())
    })?;

    Some(read_bounds(group))
}

fn read_bounds(group: &Group) -> Result<IndexRanges, &'static str> {
    let bound = |name: &'static str| {
        group
            .attribute(name)
            .and_then(sanitize_coordinate)
            .ok_or(name)
    };

    Ok(IndexRanges {
        lat_range: vec![bound(LAT_MIN)?, bound(LAT_MAX)?],
        lon_range: vec![bound(LON_MIN)?, bound(LON_MAX)?],
    })
}
