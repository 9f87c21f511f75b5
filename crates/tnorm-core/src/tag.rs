// Structured tag model: parsing of tagger output strings.
//
// Tag strings look like
//   tokens { measure { cardinal { negative: "true" integer: "बारह" } units: "किलोग्राम" } }
// i.e. nested `name { ... }` groups holding `key: "text"` and `key: true`
// fields. Quoted text never contains a double quote.

use serde::Serialize;

/// Error raised when a tag string does not follow the tag grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("unexpected end of tag string")]
    UnexpectedEnd,
    #[error("unexpected character {found:?} at offset {pos}")]
    UnexpectedChar { pos: usize, found: char },
    #[error("unterminated quoted value starting at offset {0}")]
    UnterminatedString(usize),
    #[error("field {0:?} at top level; only groups may appear there")]
    TopLevelField(String),
}

/// Value of a tag field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Flag(bool),
    Group(TagNode),
}

/// One `key: value` entry or nested group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagField {
    pub key: String,
    pub value: TagValue,
}

/// A `name { ... }` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagNode {
    pub name: String,
    pub fields: Vec<TagField>,
}

impl TagNode {
    /// First field with the given key.
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    /// Text of the first quoted field with the given key.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(TagValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Whether the field is present and true (`negative: "true"` and
    /// `preserve_order: true` both count).
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(TagValue::Flag(b)) => *b,
            Some(TagValue::Text(t)) => t == "true",
            _ => false,
        }
    }

    /// Direct child group with the given name.
    pub fn child(&self, name: &str) -> Option<&TagNode> {
        match self.get(name) {
            Some(TagValue::Group(node)) => Some(node),
            _ => None,
        }
    }

    /// Depth-first search for a group with the given name, including `self`.
    pub fn find(&self, name: &str) -> Option<&TagNode> {
        if self.name == name {
            return Some(self);
        }
        self.fields.iter().find_map(|f| match &f.value {
            TagValue::Group(node) => node.find(name),
            _ => None,
        })
    }
}

/// Parse a tag string into its top-level groups.
pub fn parse_tags(input: &str) -> Result<Vec<TagNode>, TagError> {
    let mut parser = Parser {
        chars: input.char_indices().collect(),
        idx: 0,
        len: input.len(),
    };
    let fields = parser.items(false)?;
    fields
        .into_iter()
        .map(|f| match f.value {
            TagValue::Group(node) => Ok(node),
            _ => Err(TagError::TopLevelField(f.key)),
        })
        .collect()
}

struct Parser {
    chars: Vec<(usize, char)>,
    idx: usize,
    len: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.idx).map_or(self.len, |&(p, _)| p)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.idx += 1;
        }
    }

    fn ident(&mut self) -> Result<String, TagError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                out.push(c);
                self.idx += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            return match self.peek() {
                Some(found) => Err(TagError::UnexpectedChar {
                    pos: self.offset(),
                    found,
                }),
                None => Err(TagError::UnexpectedEnd),
            };
        }
        Ok(out)
    }

    /// Parse items until `}` (when nested) or end of input (top level).
    fn items(&mut self, nested: bool) -> Result<Vec<TagField>, TagError> {
        let mut fields = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None if nested => return Err(TagError::UnexpectedEnd),
                None => return Ok(fields),
                Some('}') if nested => {
                    self.idx += 1;
                    return Ok(fields);
                }
                Some(_) => fields.push(self.item()?),
            }
        }
    }

    fn item(&mut self) -> Result<TagField, TagError> {
        let key = self.ident()?;
        self.skip_ws();
        match self.peek() {
            Some('{') => {
                self.idx += 1;
                let fields = self.items(true)?;
                Ok(TagField {
                    key: key.clone(),
                    value: TagValue::Group(TagNode { name: key, fields }),
                })
            }
            Some(':') => {
                self.idx += 1;
                self.skip_ws();
                let value = self.value()?;
                Ok(TagField { key, value })
            }
            Some(found) => Err(TagError::UnexpectedChar {
                pos: self.offset(),
                found,
            }),
            None => Err(TagError::UnexpectedEnd),
        }
    }

    fn value(&mut self) -> Result<TagValue, TagError> {
        if self.peek() == Some('"') {
            let start = self.offset();
            self.idx += 1;
            let mut text = String::new();
            loop {
                match self.peek() {
                    Some('"') => {
                        self.idx += 1;
                        return Ok(TagValue::Text(text));
                    }
                    Some(c) => {
                        text.push(c);
                        self.idx += 1;
                    }
                    None => return Err(TagError::UnterminatedString(start)),
                }
            }
        }
        let pos = self.offset();
        match self.ident()?.as_str() {
            "true" => Ok(TagValue::Flag(true)),
            "false" => Ok(TagValue::Flag(false)),
            other => Err(TagError::UnexpectedChar {
                pos,
                found: other.chars().next().unwrap_or('?'),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_measure_with_negative() {
        let tags = parse_tags(
            r#"tokens { measure { cardinal { negative: "true" integer: "बारह" } units: "किलोग्राम" } }"#,
        )
        .unwrap();
        assert_eq!(tags.len(), 1);
        let measure = tags[0].child("measure").unwrap();
        let cardinal = measure.child("cardinal").unwrap();
        assert!(cardinal.flag("negative"));
        assert_eq!(cardinal.text("integer"), Some("बारह"));
        assert_eq!(measure.text("units"), Some("किलोग्राम"));
    }

    #[test]
    fn parse_two_groups_and_flags() {
        let tags = parse_tags(
            r#"tokens { measure { units: "address" cardinal { integer: "गोवा" } preserve_order: true } } tokens { cardinal { integer: "बीस" } }"#,
        )
        .unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags[0].find("measure").unwrap().flag("preserve_order"));
        assert_eq!(tags[1].find("cardinal").unwrap().text("integer"), Some("बीस"));
        assert!(tags[1].find("decimal").is_none());
    }

    #[test]
    fn reject_unterminated_value() {
        let err = parse_tags(r#"cardinal { integer: "बा"#).unwrap_err();
        assert!(matches!(err, TagError::UnterminatedString(_)));
    }

    #[test]
    fn reject_unclosed_group() {
        assert_eq!(
            parse_tags(r#"cardinal { integer: "x""#).unwrap_err(),
            TagError::UnexpectedEnd
        );
    }

    #[test]
    fn reject_top_level_field() {
        let err = parse_tags(r#"integer: "x""#).unwrap_err();
        assert_eq!(err, TagError::TopLevelField("integer".to_string()));
    }

    #[test]
    fn serializes_to_json() {
        let tags = parse_tags(r#"cardinal { integer: "दस" }"#).unwrap();
        let json = serde_json::to_string(&tags[0]).unwrap();
        assert!(json.contains("\"integer\""));
        assert!(json.contains("दस"));
    }
}
