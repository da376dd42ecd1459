//! Parser for CDL headers (`ncdump -h` output) into the granule read model.
//!
//! Handles netCDF-4 features: nested `group:` blocks, `types:` sections
//! (skipped, user types surface as [`DataType::UserDefined`]), typed `string`
//! attributes, unlimited dimensions and dimensions inherited from ancestor
//! groups. A `data:` section, if present, is skipped.

mod lexer;
mod literal;

use tracing::debug;
use ummvar_common::{AttrValue, Attribute, DataType, Dimension, Granule, Group, Variable};

use crate::error::{NetCdfError, NetCdfResult};
use lexer::{tokenize, Spanned, Token};
use literal::{build_numeric, parse_number};

/// Parse CDL text into a [`Granule`] tagged with `source`.
pub fn parse_cdl(text: &str, source: &str) -> NetCdfResult<Granule> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };

    parser.expect_word("netcdf")?;
    let dataset_name = parser.word()?;
    parser.expect(Token::LBrace)?;
    let raw_root = parser.group_body("/".to_string())?;
    if let Some(extra) = parser.peek() {
        return Err(NetCdfError::syntax(
            extra.line,
            "unexpected content after closing brace",
        ));
    }

    let root = resolve_group(&raw_root, &[], &raw_root)?;
    debug!(
        dataset = %dataset_name,
        variables = root.variable_count(),
        groups = root.groups.len(),
        "Parsed CDL header"
    );

    Ok(Granule::new(source, root))
}

// =============================================================================
// Raw syntax tree
// =============================================================================

#[derive(Debug, Default)]
struct RawGroup {
    name: String,
    dimensions: Vec<(String, u64)>,
    variables: Vec<RawVariable>,
    attributes: Vec<Attribute>,
    groups: Vec<RawGroup>,
}

#[derive(Debug)]
struct RawVariable {
    name: String,
    dtype: DataType,
    dimension_names: Vec<String>,
    attributes: Vec<Attribute>,
    line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    Types,
    Dimensions,
    Variables,
    Data,
}

const SECTIONS: [(&str, Section); 4] = [
    ("types", Section::Types),
    ("dimensions", Section::Dimensions),
    ("variables", Section::Variables),
    ("data", Section::Data),
];

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Spanned> {
        self.tokens.get(self.pos + offset)
    }

    fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn next(&mut self) -> NetCdfResult<Spanned> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| NetCdfError::syntax(self.line(), "unexpected end of input"))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> NetCdfResult<()> {
        let got = self.next()?;
        if got.token == expected {
            Ok(())
        } else {
            Err(NetCdfError::syntax(
                got.line,
                format!("expected {:?}, found {:?}", expected, got.token),
            ))
        }
    }

    fn expect_word(&mut self, expected: &str) -> NetCdfResult<()> {
        let line = self.line();
        let word = self.word()?;
        if word == expected {
            Ok(())
        } else {
            Err(NetCdfError::syntax(
                line,
                format!("expected '{}', found '{}'", expected, word),
            ))
        }
    }

    fn word(&mut self) -> NetCdfResult<String> {
        let got = self.next()?;
        match got.token {
            Token::Word(w) => Ok(w),
            other => Err(NetCdfError::syntax(
                got.line,
                format!("expected a name, found {:?}", other),
            )),
        }
    }

    fn is(&self, offset: usize, token: &Token) -> bool {
        self.peek_at(offset).map(|t| &t.token == token).unwrap_or(false)
    }

    fn word_at(&self, offset: usize) -> Option<&str> {
        match self.peek_at(offset).map(|t| &t.token) {
            Some(Token::Word(w)) => Some(w.as_str()),
            _ => None,
        }
    }

    /// `keyword:` followed by a line break opens a section. The line break
    /// distinguishes `dimensions:` from an attribute such as `dimensions:units`.
    fn section_header(&self) -> Option<Section> {
        let keyword = self.word_at(0)?;
        let section = SECTIONS
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, s)| *s)?;
        let colon = self.peek_at(1)?;
        if colon.token != Token::Colon {
            return None;
        }
        match self.peek_at(2) {
            Some(next) if next.line == colon.line => None,
            _ => Some(section),
        }
    }

    /// `group: name {`
    fn is_group_start(&self) -> bool {
        self.word_at(0) == Some("group")
            && self.is(1, &Token::Colon)
            && self.word_at(2).is_some()
            && self.is(3, &Token::LBrace)
    }

    /// Parse statements up to and including the closing brace of a group.
    fn group_body(&mut self, name: String) -> NetCdfResult<RawGroup> {
        let mut group = RawGroup {
            name,
            ..Default::default()
        };
        let mut section = Section::None;

        loop {
            let Some(current) = self.peek() else {
                return Err(NetCdfError::syntax(
                    self.line(),
                    format!("group '{}' is not closed", group.name),
                ));
            };

            if current.token == Token::RBrace {
                self.pos += 1;
                return Ok(group);
            }

            if self.is_group_start() {
                self.pos += 2;
                let child_name = self.word()?;
                self.expect(Token::LBrace)?;
                let child = self.group_body(child_name)?;
                group.groups.push(child);
                continue;
            }

            if let Some(next_section) = self.section_header() {
                self.pos += 2;
                section = next_section;
                continue;
            }

            match section {
                Section::Types | Section::Data => self.skip_statement()?,
                Section::Dimensions => self.dimension_statement(&mut group)?,
                Section::Variables | Section::None => self.variable_statement(&mut group)?,
            }
        }
    }

    /// Skip tokens up to the next `;` outside braces.
    fn skip_statement(&mut self) -> NetCdfResult<()> {
        let mut depth = 0usize;
        loop {
            let token = self.next()?;
            match token.token {
                Token::LBrace => depth += 1,
                Token::RBrace => depth = depth.saturating_sub(1),
                Token::Semi if depth == 0 => return Ok(()),
                _ => {}
            }
        }
    }

    /// `name = 180 ;`, `time = UNLIMITED ;`, or several separated by commas.
    fn dimension_statement(&mut self, group: &mut RawGroup) -> NetCdfResult<()> {
        loop {
            let line = self.line();
            let name = self.word()?;
            self.expect(Token::Equals)?;
            let size_word = self.word()?;
            let size = if size_word.eq_ignore_ascii_case("unlimited") {
                0
            } else {
                size_word.parse::<u64>().map_err(|_| {
                    NetCdfError::syntax(
                        line,
                        format!("invalid size '{}' for dimension '{}'", size_word, name),
                    )
                })?
            };
            group.dimensions.push((name, size));

            let separator = self.next()?;
            match separator.token {
                Token::Comma => continue,
                Token::Semi => return Ok(()),
                other => {
                    return Err(NetCdfError::syntax(
                        separator.line,
                        format!("expected ',' or ';' after dimension, found {:?}", other),
                    ))
                }
            }
        }
    }

    /// A variable declaration or an attribute definition.
    fn variable_statement(&mut self, group: &mut RawGroup) -> NetCdfResult<()> {
        let line = self.line();

        // `:title = ...` global attribute
        if self.is(0, &Token::Colon) {
            self.pos += 1;
            return self.attribute_definition(group, None, None);
        }

        let first = self.word()?;

        // `sst:units = ...`
        if self.is(0, &Token::Colon) && !self.peek().map(|t| t.spaced).unwrap_or(true) {
            self.pos += 1;
            return self.attribute_definition(group, Some(first), None);
        }

        let declared_type = DataType::from_cdl(&first);

        // `string :title = ...` typed global attribute
        if self.is(0, &Token::Colon) {
            self.pos += 1;
            return self.attribute_definition(group, None, Some(declared_type));
        }

        // `string sst:comment = ...` typed variable attribute
        if self.word_at(0).is_some() && self.is(1, &Token::Colon) {
            let variable = self.word()?;
            self.pos += 1;
            return self.attribute_definition(group, Some(variable), Some(declared_type));
        }

        // `float sst(time, lat, lon), sst_error(time, lat, lon) ;`
        loop {
            let name = self.word()?;
            let mut dimension_names = Vec::new();
            if self.is(0, &Token::LParen) {
                self.pos += 1;
                loop {
                    dimension_names.push(self.word()?);
                    let separator = self.next()?;
                    match separator.token {
                        Token::Comma => continue,
                        Token::RParen => break,
                        other => {
                            return Err(NetCdfError::syntax(
                                separator.line,
                                format!("expected ',' or ')' in dimension list, found {:?}", other),
                            ))
                        }
                    }
                }
            }
            group.variables.push(RawVariable {
                name,
                dtype: declared_type.clone(),
                dimension_names,
                attributes: Vec::new(),
                line,
            });

            let separator = self.next()?;
            match separator.token {
                Token::Comma => continue,
                Token::Semi => return Ok(()),
                other => {
                    return Err(NetCdfError::syntax(
                        separator.line,
                        format!("expected ',' or ';' after declaration, found {:?}", other),
                    ))
                }
            }
        }
    }

    /// Parse `name = value, value ;` after the colon and attach it.
    fn attribute_definition(
        &mut self,
        group: &mut RawGroup,
        variable: Option<String>,
        declared: Option<DataType>,
    ) -> NetCdfResult<()> {
        let line = self.line();
        let name = self.word()?;
        self.expect(Token::Equals)?;
        let value = self.attribute_values(line, &name, declared.as_ref())?;
        let attribute = Attribute { name, value };

        match variable {
            None => group.attributes.push(attribute),
            Some(var_name) => {
                let target = group
                    .variables
                    .iter_mut()
                    .find(|v| v.name == var_name)
                    .ok_or_else(|| {
                        NetCdfError::syntax(
                            line,
                            format!(
                                "attribute '{}' refers to undeclared variable '{}'",
                                attribute.name, var_name
                            ),
                        )
                    })?;
                target.attributes.push(attribute);
            }
        }
        Ok(())
    }

    fn attribute_values(
        &mut self,
        line: usize,
        name: &str,
        declared: Option<&DataType>,
    ) -> NetCdfResult<AttrValue> {
        let mut strings = Vec::new();
        let mut numbers = Vec::new();

        loop {
            let item = self.next()?;
            match item.token {
                Token::Str(s) => strings.push(s),
                Token::Word(w) => {
                    let number = parse_number(&w).ok_or_else(|| {
                        NetCdfError::syntax(
                            item.line,
                            format!("invalid value '{}' for attribute '{}'", w, name),
                        )
                    })?;
                    numbers.push(number);
                }
                other => {
                    return Err(NetCdfError::syntax(
                        item.line,
                        format!("expected a value for attribute '{}', found {:?}", name, other),
                    ))
                }
            }

            let separator = self.next()?;
            match separator.token {
                Token::Comma => continue,
                Token::Semi => break,
                other => {
                    return Err(NetCdfError::syntax(
                        separator.line,
                        format!("expected ',' or ';' after value, found {:?}", other),
                    ))
                }
            }
        }

        match (strings.is_empty(), numbers.is_empty()) {
            (false, true) => match declared {
                Some(DataType::String) => Ok(AttrValue::Strings(strings)),
                // ncdump splits long char attributes into adjacent pieces
                _ => Ok(AttrValue::Text(strings.concat())),
            },
            (true, false) => build_numeric(&numbers, declared).ok_or_else(|| {
                NetCdfError::syntax(line, format!("attribute '{}' has no values", name))
            }),
            _ => Err(NetCdfError::syntax(
                line,
                format!("attribute '{}' mixes text and numbers", name),
            )),
        }
    }
}

// =============================================================================
// Resolution into the read model
// =============================================================================

/// Convert a raw group, resolving each variable's dimension names against the
/// group and its ancestors (innermost first), or by absolute path.
fn resolve_group<'a>(
    raw: &'a RawGroup,
    ancestors: &[&'a RawGroup],
    root: &'a RawGroup,
) -> NetCdfResult<Group> {
    let mut scopes: Vec<&RawGroup> = ancestors.to_vec();
    scopes.push(raw);

    let mut variables = Vec::with_capacity(raw.variables.len());
    for raw_var in &raw.variables {
        let mut variable = Variable::new(raw_var.name.clone(), raw_var.dtype.clone());
        for dim_name in &raw_var.dimension_names {
            let dimension = lookup_dimension(dim_name, &scopes, root).ok_or_else(|| {
                NetCdfError::syntax(
                    raw_var.line,
                    format!(
                        "variable '{}' uses undefined dimension '{}'",
                        raw_var.name, dim_name
                    ),
                )
            })?;
            variable.dimensions.push(dimension);
        }
        variable.attributes = raw_var.attributes.clone();
        variables.push(variable);
    }

    let mut groups = Vec::with_capacity(raw.groups.len());
    for child in &raw.groups {
        groups.push(resolve_group(child, &scopes, root)?);
    }

    Ok(Group {
        name: raw.name.clone(),
        attributes: raw.attributes.clone(),
        dimensions: raw
            .dimensions
            .iter()
            .map(|(name, size)| dimension_in(raw, name, *size))
            .collect(),
        variables,
        groups,
    })
}

fn lookup_dimension(name: &str, scopes: &[&RawGroup], root: &RawGroup) -> Option<Dimension> {
    if let Some(path) = name.strip_prefix('/') {
        let mut parts: Vec<&str> = path.split('/').collect();
        let dim_name = parts.pop()?;
        let mut group = root;
        for part in parts {
            group = group.groups.iter().find(|g| g.name == part)?;
        }
        return find_dimension(group, dim_name);
    }

    scopes
        .iter()
        .rev()
        .find_map(|scope| find_dimension(scope, name))
}

fn find_dimension(group: &RawGroup, name: &str) -> Option<Dimension> {
    group
        .dimensions
        .iter()
        .find(|(n, _)| n == name)
        .map(|(n, size)| dimension_in(group, n, *size))
}

/// A dimension is a coordinate when its defining group also holds a variable
/// of the same name.
fn dimension_in(group: &RawGroup, name: &str, size: u64) -> Dimension {
    let mut dimension = Dimension::new(name, size);
    dimension.is_coordinate = group.variables.iter().any(|v| v.name == name);
    dimension
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_header() {
        let cdl = r#"netcdf tiny {
dimensions:
	lat = 3 ;
variables:
	float lat(lat) ;
		lat:standard_name = "latitude" ;
		lat:units = "degrees_north" ;
}
"#;
        let granule = parse_cdl(cdl, "tiny.cdl").unwrap();
        let lat = &granule.variables()[0];
        assert_eq!(lat.name, "lat");
        assert_eq!(lat.dtype, DataType::Float);
        assert_eq!(lat.dimensions, vec![Dimension { name: "lat".into(), size: 3, is_coordinate: true }]);
        assert_eq!(lat.attribute("units"), Some(&AttrValue::Text("degrees_north".into())));
    }

    #[test]
    fn test_attribute_named_like_section_keyword() {
        let cdl = "netcdf t {\ndimensions:\n\tx = 2 ;\nvariables:\n\tint data(x) ;\n\t\tdata:dimensions = \"x\" ;\n}\n";
        let granule = parse_cdl(cdl, "t").unwrap();
        assert_eq!(
            granule.variables()[0].attribute("dimensions"),
            Some(&AttrValue::Text("x".into()))
        );
    }

    #[test]
    fn test_types_section_is_skipped() {
        let cdl = r#"netcdf t {
types:
  compound wind_t {
    float u ;
    float v ;
  }; // wind_t
  byte enum flag_t {clear = 0, cloudy = 1} ;
dimensions:
	n = 4 ;
variables:
	wind_t wind(n) ;
	flag_t cloud(n) ;
}
"#;
        let granule = parse_cdl(cdl, "t").unwrap();
        assert_eq!(granule.variables().len(), 2);
        assert_eq!(
            granule.variables()[0].dtype,
            DataType::UserDefined("wind_t".into())
        );
    }

    #[test]
    fn test_multi_piece_text_attribute_is_concatenated() {
        let cdl = "netcdf t {\n// global attributes:\n\t\t:history = \"one\\n\",\n\t\t\t\"two\" ;\n}\n";
        let granule = parse_cdl(cdl, "t").unwrap();
        assert_eq!(
            granule.attributes()[0].value,
            AttrValue::Text("one\ntwo".into())
        );
    }

    #[test]
    fn test_undeclared_variable_attribute_is_error() {
        let cdl = "netcdf t {\nvariables:\n\t\tghost:units = \"m\" ;\n}\n";
        let err = parse_cdl(cdl, "t").unwrap_err();
        assert!(matches!(err, NetCdfError::Syntax { line: 3, .. }), "{:?}", err);
    }

    #[test]
    fn test_undefined_dimension_is_error() {
        let cdl = "netcdf t {\nvariables:\n\tfloat x(nope) ;\n}\n";
        assert!(parse_cdl(cdl, "t").is_err());
    }

    #[test]
    fn test_unclosed_group_is_error() {
        let cdl = "netcdf t {\ndimensions:\n\tx = 1 ;\n";
        assert!(parse_cdl(cdl, "t").is_err());
    }
}
