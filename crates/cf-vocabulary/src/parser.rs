//! CF standard-name table XML parsing.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::error::{VocabularyLoadError, VocabularyResult};
use crate::table::{StandardNameEntry, Vocabulary};

const ROOT: &str = "standard_name_table";

/// Parse a `cf-standard-name-table.xml` document.
pub fn parse_table(xml: &str) -> VocabularyResult<Vocabulary> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut text = String::new();

    let mut version = None;
    let mut entries = HashMap::new();
    let mut aliases = HashMap::new();
    let mut entry: Option<StandardNameEntry> = None;
    let mut alias: Option<(String, Option<String>)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if stack.is_empty() {
                    if name != ROOT {
                        return Err(VocabularyLoadError::malformed(format!(
                            "expected <{}> root element, found <{}>",
                            ROOT, name
                        )));
                    }
                    seen_root = true;
                } else if stack.len() == 1 {
                    match name.as_str() {
                        "entry" => entry = Some(StandardNameEntry::new(required_id(&e)?)),
                        "alias" => alias = Some((required_id(&e)?, None)),
                        _ => {}
                    }
                }
                stack.push(name);
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() {
                    let name = element_name(&e);
                    if name != ROOT {
                        return Err(VocabularyLoadError::malformed(format!(
                            "expected <{}> root element, found <{}>",
                            ROOT, name
                        )));
                    }
                    seen_root = true;
                }
            }
            Ok(Event::Text(t)) => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| VocabularyLoadError::malformed(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(c)) => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(_)) => {
                let Some(name) = stack.pop() else {
                    return Err(VocabularyLoadError::malformed("unbalanced end tag"));
                };
                let value = text.trim();
                match (name.as_str(), stack.len()) {
                    ("version_number", 1) => version = non_empty(value),
                    ("canonical_units", 2) => {
                        if let Some(e) = entry.as_mut() {
                            e.canonical_units = non_empty(value);
                        }
                    }
                    ("description", 2) => {
                        if let Some(e) = entry.as_mut() {
                            e.description = non_empty(value);
                        }
                    }
                    ("entry_id", 2) => {
                        if let Some((_, target)) = alias.as_mut() {
                            *target = non_empty(value);
                        }
                    }
                    ("entry", 1) => {
                        if let Some(e) = entry.take() {
                            entries.insert(e.name.clone(), e);
                        }
                    }
                    ("alias", 1) => {
                        if let Some((id, target)) = alias.take() {
                            match target {
                                Some(target) => {
                                    aliases.insert(id, target);
                                }
                                None => warn!(alias = %id, "Alias without entry_id ignored"),
                            }
                        }
                    }
                    _ => {}
                }
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(VocabularyLoadError::malformed(format!(
                    "XML parsing error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(VocabularyLoadError::malformed(format!(
            "missing <{}> root element",
            ROOT
        )));
    }
    if let Some(open) = stack.last() {
        return Err(VocabularyLoadError::malformed(format!(
            "unexpected end of document inside <{}>",
            open
        )));
    }

    aliases.retain(|id, target| {
        let known = entries.contains_key(target.as_str());
        if !known {
            warn!(alias = %id, target = %target, "Alias points to a missing entry, ignored");
        }
        known
    });

    debug!(
        version = ?version,
        entries = entries.len(),
        aliases = aliases.len(),
        "Parsed standard-name table"
    );

    Ok(Vocabulary::from_parts(version, entries, aliases))
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn required_id(e: &BytesStart) -> VocabularyResult<String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| VocabularyLoadError::malformed(err.to_string()))?;
        if attr.key.as_ref() == b"id" {
            let value = attr
                .unescape_value()
                .map_err(|err| VocabularyLoadError::malformed(err.to_string()))?;
            return Ok(value.into_owned());
        }
    }
    Err(VocabularyLoadError::malformed(format!(
        "<{}> element without id attribute",
        element_name(e)
    )))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
