//! Front-matter parsing

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::helpers::parse_date;

lazy_static! {
    /// `---` line, YAML, then a closing `---` or `...` line
    static ref FRONT_MATTER: Regex =
        Regex::new(r"(?s)\A\x{FEFF}?---[ \t]*\r?\n(.*?\r?\n)??(?:---|\.\.\.)[ \t]*(?:\r?\n|\z)")
            .unwrap();
    static ref OPENING: Regex = Regex::new(r"\A\x{FEFF}?---[ \t]*(?:\r?\n|\z)").unwrap();
}

/// Errors raised while splitting front-matter from a document
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter block is not closed with `---`")]
    Unterminated,
    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<serde_yaml::Value>()? {
                if let Some(text) = scalar_to_string(&item) {
                    vec.push(text);
                }
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// A front-matter value outside the known fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// A string that parses as a date; the raw text is kept for templates
    Date { raw: String, value: NaiveDateTime },
    List(Vec<String>),
}

impl FieldValue {
    /// Map a YAML value onto the closed set of variants.
    /// Nested mappings and nulls have no representation and yield `None`.
    fn from_yaml(value: &serde_yaml::Value) -> Option<Self> {
        match value {
            serde_yaml::Value::Sequence(items) => Some(FieldValue::List(
                items.iter().filter_map(scalar_to_string).collect(),
            )),
            serde_yaml::Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
            other => {
                let text = scalar_to_string(other)?;
                Some(match parse_date(&text) {
                    Some(value) => FieldValue::Date { raw: text, value },
                    None => FieldValue::Text(text),
                })
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Date { raw, .. } => serializer.serialize_str(raw),
            FieldValue::List(items) => items.serialize(serializer),
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// Front-matter data from a page or post
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,

    /// Additional custom fields, in document order
    #[serde(skip)]
    pub extra: IndexMap<String, FieldValue>,
}

const KNOWN_FIELDS: [&str; 4] = ["title", "date", "description", "tags"];

impl FrontMatter {
    /// Split front-matter from content.
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let Some(caps) = FRONT_MATTER.captures(content) else {
            if OPENING.is_match(content) {
                return Err(FrontMatterError::Unterminated);
            }
            return Ok((FrontMatter::default(), content));
        };

        let whole = caps.get(0).map_or(0, |m| m.end());
        let yaml = caps.get(1).map_or("", |m| m.as_str());
        let body = &content[whole..];

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        Ok((Self::from_yaml(yaml)?, body))
    }

    fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        let mapping: IndexMap<String, serde_yaml::Value> = serde_yaml::from_str(yaml)?;
        let known = serde_yaml::Mapping::from_iter(
            mapping
                .iter()
                .filter(|(k, _)| KNOWN_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone())),
        );

        let mut fm: FrontMatter = serde_yaml::from_value(serde_yaml::Value::Mapping(known))?;
        for (key, value) in &mapping {
            if KNOWN_FIELDS.contains(&key.as_str()) {
                continue;
            }
            match FieldValue::from_yaml(value) {
                Some(field) => {
                    fm.extra.insert(key.clone(), field);
                }
                None => tracing::debug!("Ignoring front-matter field {:?}", key),
            }
        }

        Ok(fm)
    }

    /// Parse the date string into a timestamp
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date)
    }
}
