//! Granule read model.
//!
//! A [`Granule`] is an owned snapshot of a file's structure: its root
//! [`Group`], nested groups, variables, dimensions and attributes. Paths are
//! derived from the tree position (`/geophysical_data/sst`), never stored as
//! parent pointers.

use crate::value::AttrValue;

/// Named attribute attached to a group or variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A dimension as referenced by a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    /// Length of the dimension; `0` marks an unlimited (record) dimension.
    pub size: u64,
    /// Whether a coordinate variable with the same name exists in scope.
    pub is_coordinate: bool,
}

impl Dimension {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            is_coordinate: false,
        }
    }

    pub fn unlimited(name: impl Into<String>) -> Self {
        Self::new(name, 0)
    }

    pub fn is_unlimited(&self) -> bool {
        self.size == 0
    }
}

/// Semantic storage type of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Int64,
    UInt64,
    Float,
    Double,
    Char,
    String,
    /// Compound, enum, opaque or variable-length type, by declared name.
    UserDefined(String),
}

impl DataType {
    /// Parse a CDL type keyword. Unknown names are user-defined types.
    pub fn from_cdl(name: &str) -> Self {
        match name {
            "byte" => DataType::Byte,
            "ubyte" => DataType::UByte,
            "char" => DataType::Char,
            "short" => DataType::Short,
            "ushort" => DataType::UShort,
            "int" | "long" => DataType::Int,
            "uint" => DataType::UInt,
            "int64" => DataType::Int64,
            "uint64" => DataType::UInt64,
            "float" | "real" => DataType::Float,
            "double" => DataType::Double,
            "string" => DataType::String,
            other => DataType::UserDefined(other.to_string()),
        }
    }

    /// Whether `name` is a CDL primitive type keyword.
    pub fn is_cdl_primitive(name: &str) -> bool {
        !matches!(Self::from_cdl(name), DataType::UserDefined(_))
    }

    /// UMM-Var `DataType` spelling.
    ///
    /// `char` maps to `string`; user-defined types have no UMM-Var
    /// equivalent and map to `OTHER`.
    pub fn umm_name(&self) -> &'static str {
        match self {
            DataType::Byte => "byte",
            DataType::UByte => "ubyte",
            DataType::Short => "short",
            DataType::UShort => "ushort",
            DataType::Int => "int",
            DataType::UInt => "uint",
            DataType::Int64 => "int64",
            DataType::UInt64 => "uint64",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Char | DataType::String => "string",
            DataType::UserDefined(_) => "OTHER",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Byte
                | DataType::UByte
                | DataType::Short
                | DataType::UShort
                | DataType::Int
                | DataType::UInt
                | DataType::Int64
                | DataType::UInt64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, DataType::Char | DataType::String)
    }

    /// Inclusive integer range of an integer type.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        let range = match self {
            DataType::Byte => (i8::MIN as i128, i8::MAX as i128),
            DataType::UByte => (0, u8::MAX as i128),
            DataType::Short => (i16::MIN as i128, i16::MAX as i128),
            DataType::UShort => (0, u16::MAX as i128),
            DataType::Int => (i32::MIN as i128, i32::MAX as i128),
            DataType::UInt => (0, u32::MAX as i128),
            DataType::Int64 => (i64::MIN as i128, i64::MAX as i128),
            DataType::UInt64 => (0, u64::MAX as i128),
            _ => return None,
        };
        Some(range)
    }
}

/// A variable within a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub dtype: DataType,
    /// Dimensions in declaration order.
    pub dimensions: Vec<Dimension>,
    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
}

impl Variable {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
            dimensions: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        find_attribute(&self.attributes, name)
    }
}

/// A (possibly nested) group. The root group of a granule is named `/`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<Variable>,
    pub groups: Vec<Group>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn root() -> Self {
        Self::new("/")
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        find_attribute(&self.attributes, name)
    }

    /// Number of variables in this group and all nested groups.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
            + self
                .groups
                .iter()
                .map(Group::variable_count)
                .sum::<usize>()
    }
}

/// One granule: its source identifier and root group.
#[derive(Debug, Clone, PartialEq)]
pub struct Granule {
    /// Where the granule was read from (file path or fixture name).
    pub source: String,
    pub root: Group,
}

impl Granule {
    pub fn new(source: impl Into<String>, root: Group) -> Self {
        Self {
            source: source.into(),
            root,
        }
    }

    /// Global attributes.
    pub fn attributes(&self) -> &[Attribute] {
        &self.root.attributes
    }

    /// Top-level groups.
    pub fn groups(&self) -> &[Group] {
        &self.root.groups
    }

    /// Root-level variables.
    pub fn variables(&self) -> &[Variable] {
        &self.root.variables
    }

    /// Total number of variables, root and nested.
    pub fn variable_count(&self) -> usize {
        self.root.variable_count()
    }
}

fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a AttrValue> {
    attributes.iter().find(|a| a.name == name).map(|a| &a.value)
}
