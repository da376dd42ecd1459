//! Direct granule reading through libnetcdf.
//!
//! Avoids the `ncdump` subprocess and the CDL round trip. Requires the
//! netCDF and HDF5 system libraries, so it is only built with the `native`
//! feature.

use std::path::Path;
use std::sync::Once;

use tracing::debug;
use ummvar_common::{AttrValue, Attribute, DataType, Dimension, Granule, Group, Variable};

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// HDF5 prints diagnostics for lookups that the caller handles, such as
/// probing for optional attributes. Safe to call more than once.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 accepts null handlers to disable printing.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read the full group/variable structure of a granule.
pub fn read_structure(path: &Path) -> NetCdfResult<Granule> {
    silence_hdf5_errors();

    let file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let root = match file.root() {
        Some(group) => convert_group(&group, "/".to_string(), &[])?,
        None => {
            // Classic formats have no group tree
            let mut root = Group::root();
            root.attributes = file.attributes().map(|a| convert_attribute(&a)).collect::<NetCdfResult<_>>()?;
            root.dimensions = file.dimensions().map(|d| convert_dimension(&d)).collect();
            for var in file.variables() {
                root.variables.push(convert_variable(&var)?);
            }
            mark_coordinates(&mut root, &[]);
            root
        }
    };

    debug!(path = %path.display(), variables = root.variable_count(), "Read granule natively");
    Ok(Granule::new(path.display().to_string(), root))
}

fn convert_group(group: &netcdf::Group, name: String, ancestors: &[Vec<String>]) -> NetCdfResult<Group> {
    let mut out = Group::new(name);
    out.attributes = group
        .attributes()
        .map(|a| convert_attribute(&a))
        .collect::<NetCdfResult<_>>()?;
    out.dimensions = group.dimensions().map(|d| convert_dimension(&d)).collect();
    for var in group.variables() {
        out.variables.push(convert_variable(&var)?);
    }

    let mut scopes = ancestors.to_vec();
    scopes.push(out.variables.iter().map(|v| v.name.clone()).collect());
    for child in group.groups() {
        out.groups.push(convert_group(&child, child.name(), &scopes)?);
    }
    mark_coordinates(&mut out, ancestors);
    Ok(out)
}

/// Flag dimensions that have a same-named variable in this group or above.
fn mark_coordinates(group: &mut Group, ancestors: &[Vec<String>]) {
    let local: Vec<String> = group.variables.iter().map(|v| v.name.clone()).collect();
    let is_coordinate = |name: &str| {
        local.iter().any(|n| n == name) || ancestors.iter().flatten().any(|n| n == name)
    };

    for dim in &mut group.dimensions {
        dim.is_coordinate = is_coordinate(&dim.name);
    }
    for var in &mut group.variables {
        for dim in &mut var.dimensions {
            dim.is_coordinate = is_coordinate(&dim.name);
        }
    }
}

fn convert_variable(var: &netcdf::Variable) -> NetCdfResult<Variable> {
    let mut out = Variable::new(var.name(), convert_type(&var.vartype()));
    out.dimensions = var.dimensions().iter().map(convert_dimension).collect();
    out.attributes = var
        .attributes()
        .map(|a| convert_attribute(&a))
        .collect::<NetCdfResult<_>>()?;
    Ok(out)
}

fn convert_dimension(dim: &netcdf::Dimension) -> Dimension {
    if dim.is_unlimited() {
        Dimension::unlimited(dim.name())
    } else {
        Dimension::new(dim.name(), dim.len() as u64)
    }
}

fn convert_type(vartype: &netcdf::types::NcVariableType) -> DataType {
    use netcdf::types::{FloatType, IntType, NcVariableType};

    match vartype {
        NcVariableType::Int(IntType::I8) => DataType::Byte,
        NcVariableType::Int(IntType::U8) => DataType::UByte,
        NcVariableType::Int(IntType::I16) => DataType::Short,
        NcVariableType::Int(IntType::U16) => DataType::UShort,
        NcVariableType::Int(IntType::I32) => DataType::Int,
        NcVariableType::Int(IntType::U32) => DataType::UInt,
        NcVariableType::Int(IntType::I64) => DataType::Int64,
        NcVariableType::Int(IntType::U64) => DataType::UInt64,
        NcVariableType::Float(FloatType::F32) => DataType::Float,
        NcVariableType::Float(FloatType::F64) => DataType::Double,
        NcVariableType::Char => DataType::Char,
        NcVariableType::String => DataType::String,
        NcVariableType::Compound(t) => DataType::UserDefined(t.name.clone()),
        NcVariableType::Enum(t) => DataType::UserDefined(t.name.clone()),
        NcVariableType::Opaque(t) => DataType::UserDefined(t.name.clone()),
        NcVariableType::Vlen(t) => DataType::UserDefined(t.name.clone()),
    }
}

fn convert_attribute(attr: &netcdf::Attribute) -> NetCdfResult<Attribute> {
    use netcdf::AttributeValue as V;

    let raw = attr.value().map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to read attribute '{}': {}", attr.name(), e))
    })?;

    let value = match raw {
        V::Schar(v) => AttrValue::Byte(vec![v]),
        V::Schars(v) => AttrValue::Byte(v),
        V::Uchar(v) => AttrValue::UByte(vec![v]),
        V::Uchars(v) => AttrValue::UByte(v),
        V::Short(v) => AttrValue::Short(vec![v]),
        V::Shorts(v) => AttrValue::Short(v),
        V::Ushort(v) => AttrValue::UShort(vec![v]),
        V::Ushorts(v) => AttrValue::UShort(v),
        V::Int(v) => AttrValue::Int(vec![v]),
        V::Ints(v) => AttrValue::Int(v),
        V::Uint(v) => AttrValue::UInt(vec![v]),
        V::Uints(v) => AttrValue::UInt(v),
        V::Longlong(v) => AttrValue::Int64(vec![v]),
        V::Longlongs(v) => AttrValue::Int64(v),
        V::Ulonglong(v) => AttrValue::UInt64(vec![v]),
        V::Ulonglongs(v) => AttrValue::UInt64(v),
        V::Float(v) => AttrValue::Float(vec![v]),
        V::Floats(v) => AttrValue::Float(v),
        V::Double(v) => AttrValue::Double(vec![v]),
        V::Doubles(v) => AttrValue::Double(v),
        V::Str(s) => AttrValue::Text(s),
        V::Strs(s) => AttrValue::Strings(s),
    };

    Ok(Attribute {
        name: attr.name().to_string(),
        value,
    })
}
