//! In-memory granule builders.
//!
//! These build [`Granule`] trees directly, without going through CDL, for
//! tests that only care about mapping behaviour.

use ummvar_common::{DataType, Dimension, Granule, Group, Variable};

/// The two-variable lat/sst granule: `lat` with a standard name and explicit
/// units and no fill value; `sst` with a `-9999.0` fill value, a standard
/// name and no units.
pub fn lat_sst_granule() -> Granule {
    let lat_dim = Dimension {
        name: "lat".to_string(),
        size: 3,
        is_coordinate: true,
    };
    let root = Group::root()
        .with_dimension(lat_dim.clone())
        .with_variable(
            Variable::new("lat", DataType::Float)
                .with_dimension(lat_dim.clone())
                .with_attribute("standard_name", "latitude")
                .with_attribute("units", "degrees_north"),
        )
        .with_variable(
            Variable::new("sst", DataType::Double)
                .with_dimension(lat_dim)
                .with_attribute("standard_name", "sea_surface_temperature")
                .with_attribute("_FillValue", -9999.0_f64),
        );
    Granule::new("lat_sst", root)
}

/// A float variable with one dimension of the given size.
pub fn float_variable(name: &str, dim: &str, size: u64) -> Variable {
    Variable::new(name, DataType::Float).with_dimension(Dimension::new(dim, size))
}

/// A granule whose root holds `root_vars` variables and `groups` nested
/// groups of `per_group` variables each. Variable names are unique per
/// group (`v0`, `v1`, ...), groups are `g0`, `g1`, ...
pub fn layered_granule(root_vars: usize, groups: usize, per_group: usize) -> Granule {
    let mut root = Group::root();
    for i in 0..root_vars {
        root.variables.push(float_variable(&format!("v{}", i), "x", 4));
    }
    for g in 0..groups {
        let mut group = Group::new(format!("g{}", g));
        for i in 0..per_group {
            group
                .variables
                .push(float_variable(&format!("v{}", i), "x", 4));
        }
        root.groups.push(group);
    }
    Granule::new("layered", root)
}
