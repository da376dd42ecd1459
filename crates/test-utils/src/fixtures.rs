//! Common test fixtures for ummvar-gen tests.
//!
//! Text fixtures mirror what the tools see in production: `ncdump -h` output,
//! the CF standard-name table, alias table overrides and Launchpad token
//! files.

/// CDL headers as printed by `ncdump -h`.
pub mod cdl {
    /// An L2P-style granule with nested groups, an unlimited dimension, flag
    /// variables, a compound type and two malformed fill values.
    ///
    /// Walk order (nested groups first, then each group's own variables):
    /// `/geophysical_data/ancillary_data/l2_flags`, `/geophysical_data/sst`,
    /// `/geophysical_data/quality_level`, `/geophysical_data/wind_speed`,
    /// `time`, `lat`, `lon`, `raw_obs`.
    pub const SAMPLE_L2P: &str = r#"netcdf 20200101000000-JPL-L2P_GHRSST-SSTskin-MODIS_A-D-v02.0-fv01.0 {
types:
  compound obs_t {
    float value ;
    int flag ;
  }; // obs_t
dimensions:
	time = UNLIMITED ; // (1 currently)
	lat = 180 ;
	lon = 360 ;
variables:
	int time(time) ;
		time:long_name = "reference time of sst file" ;
		time:standard_name = "time" ;
		time:units = "seconds since 1981-01-01 00:00:00" ;
	float lat(lat) ;
		lat:standard_name = "latitude" ;
		lat:units = "degrees_north" ;
		lat:valid_min = -90.f ;
		lat:valid_max = 90.f ;
	float lon(lon) ;
		lon:standard_name = "longitude" ;
		lon:units = "degrees_east" ;
		lon:valid_range = -180.f, 180.f ;
	obs_t raw_obs(time) ;
		raw_obs:long_name = "raw observation record" ;

// global attributes:
		:Conventions = "CF-1.7, ACDD-1.3" ;
		:title = "MODIS Aqua L2P SST" ;
		:geospatial_lat_min = -90.f ;
		:geospatial_lat_max = 90.f ;
		:geospatial_lon_min = -180.f ;
		:geospatial_lon_max = 180.f ;

group: geophysical_data {
  variables:
  	short sst(time, lat, lon) ;
  		sst:long_name = "sea surface temperature" ;
  		sst:standard_name = "sea_surface_temperature" ;
  		sst:_FillValue = -32767s ;
  		sst:scale_factor = 0.01f ;
  		sst:add_offset = 273.15f ;
  		sst:valid_min = -200s ;
  		sst:valid_max = 5000s ;
  		sst:coverage_content_type = "physicalMeasurement" ;
  		sst:comment = "sea surface skin temperature" ;
  	byte quality_level(time, lat, lon) ;
  		quality_level:long_name = "quality level of SST pixel" ;
  		quality_level:_FillValue = -128b ;
  		quality_level:flag_values = 0b, 1b, 2b, 3b, 4b, 5b ;
  		quality_level:flag_meanings = "no_data bad_data worst_quality low_quality acceptable_quality best_quality" ;
  		quality_level:coverage_content_type = "qualityInformation" ;
  	float wind_speed(time, lat, lon) ;
  		wind_speed:long_name = "10m wind speed" ;
  		wind_speed:standard_name = "wind_speed" ;
  		wind_speed:units = "m s-1" ;
  		wind_speed:_FillValue = NaNf ;
  		wind_speed:source = "ECMWF" ;

  // group attributes:
  		:geospatial_lat_min = "10S" ;
  		:geospatial_lat_max = "20N" ;
  		:geospatial_lon_min = "30W" ;
  		:geospatial_lon_max = "40E" ;

  group: ancillary\ data {
    dimensions:
    	nj = 20 ;
    	ni = 10 ;
    variables:
    	int l2_flags(nj, ni) ;
    		l2_flags:long_name = "Level-2 processing flags" ;
    		l2_flags:flag_masks = 1, 2, 4 ;
    		l2_flags:flag_meanings = "ATMFAIL LAND HIGLINT" ;
    		l2_flags:_FillValue = 3000000000LL ;
    } // group ancillary data
  } // group geophysical_data
}
"#;

    /// Record names of [`SAMPLE_L2P`] in walk order.
    pub const SAMPLE_L2P_NAMES: [&str; 8] = [
        "/geophysical_data/ancillary_data/l2_flags",
        "/geophysical_data/sst",
        "/geophysical_data/quality_level",
        "/geophysical_data/wind_speed",
        "time",
        "lat",
        "lon",
        "raw_obs",
    ];

    /// Two root variables matching the lat/sst scenario.
    pub const LAT_SST: &str = r#"netcdf lat_sst {
dimensions:
	lat = 3 ;
variables:
	float lat(lat) ;
		lat:standard_name = "latitude" ;
		lat:units = "degrees_north" ;
	double sst(lat) ;
		sst:standard_name = "sea_surface_temperature" ;
		sst:_FillValue = -9999. ;
}
"#;

    /// A header that ends in the middle of a variable block.
    pub const TRUNCATED: &str = r#"netcdf truncated {
dimensions:
	lat = 3 ;
variables:
	float lat(lat) ;
		lat:units = "degrees_north" ;
"#;
}

/// CF standard-name table documents.
pub mod vocabulary {
    /// A small excerpt of the CF standard-name table.
    pub const CF_TABLE_EXCERPT: &str = r#"<?xml version="1.0"?>
<standard_name_table xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="cf-standard-name-table-1.1.xsd">
   <version_number>84</version_number>
   <last_modified>2024-01-19T15:55:10Z</last_modified>
   <institution>Centre for Environmental Data Analysis</institution>
   <contact>support@ceda.ac.uk</contact>

  <entry id="latitude">
    <canonical_units>degree_north</canonical_units>
    <grib>250</grib>
    <amip>lat</amip>
    <description>Latitude is positive northward; its units of degree_north (or equivalent) indicate this explicitly.</description>
  </entry>

  <entry id="longitude">
    <canonical_units>degree_east</canonical_units>
    <grib>251</grib>
    <amip>lon</amip>
    <description>Longitude is positive eastward; its units of degree_east (or equivalent) indicate this explicitly.</description>
  </entry>

  <entry id="sea_surface_temperature">
    <canonical_units>K</canonical_units>
    <grib>80</grib>
    <amip>tos</amip>
    <description>Sea surface temperature is usually abbreviated as &quot;SST&quot;. It is the temperature of sea water near the surface (including the part under sea-ice, if any).</description>
  </entry>

  <entry id="time">
    <canonical_units>s</canonical_units>
    <grib></grib>
    <amip></amip>
    <description>Variables representing time must always explicitly include the units of time.</description>
  </entry>

  <entry id="wind_speed">
    <canonical_units>m s-1</canonical_units>
    <grib>32</grib>
    <amip></amip>
    <description>Speed is the magnitude of velocity. Wind is defined as a two-dimensional (horizontal) air velocity vector, with no vertical component.</description>
  </entry>

  <alias id="surface_temperature_where_sea">
    <entry_id>sea_surface_temperature</entry_id>
  </alias>
</standard_name_table>
"#;

    /// Well-formed XML with the wrong root element.
    pub const WRONG_ROOT: &str = r#"<?xml version="1.0"?>
<catalog><entry id="latitude"><canonical_units>degree_north</canonical_units></entry></catalog>
"#;

    /// Not well-formed.
    pub const BROKEN: &str = r#"<standard_name_table><entry id="latitude"><canonical_units>degree_north</entry>"#;
}

/// Alias table overrides.
pub mod aliases {
    /// Overrides `Units` to prefer a custom `unit_label` attribute.
    pub const CUSTOM_UNITS_YAML: &str = r#"aliases:
  - attribute: unit_label
    target: Units
  - attribute: units
    target: Units
  - attribute: standard_name
    target: StandardName
  - attribute: long_name
    target: LongName
  - attribute: _FillValue
    target: FillValue
"#;
}

/// CMR and Launchpad fixtures.
pub mod cmr {
    pub const COLLECTION_ID: &str = "C1234567890-POCLOUD";
    pub const SHORT_NAME: &str = "MODIS_A-JPL-L2P-v2019.0";

    /// Launchpad token file as written by the credential rotation job.
    pub const TOKEN_JSON: &str = r#"{
    "sm_token": "sm-abc",
    "token": "lp-token-0123456789",
    "session_idle_timeout": 3600
}
"#;

    /// Token file with an empty value line that plain JSON parsing rejects.
    pub const TOKEN_JSON_WITH_EMPTY_VALUE: &str = r#"{
    "token": "lp-token-0123456789",
    "session_maxtimeout":,
    "cookie_name": "smsession"
}
"#;

    /// Body of `GET /search/concepts/{id}.umm_json` (trimmed).
    pub const COLLECTION_UMM_JSON: &str = r#"{"ShortName":"MODIS_A-JPL-L2P-v2019.0","Version":"2019.0","EntryTitle":"GHRSST Level 2P MODIS Aqua SST"}"#;

    /// Body of a successful variable ingest.
    pub const INGEST_ACCEPTED_JSON: &str = r#"{"concept-id":"V1200000001-POCLOUD","revision-id":3}"#;

    /// Body of a rejected variable ingest.
    pub const INGEST_REJECTED_JSON: &str =
        r##"{"errors":["#: required key [Name] not found","#/DataType: bad value"]}"##;
}
