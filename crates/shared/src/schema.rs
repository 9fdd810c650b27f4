use std::fmt;

use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::error::SchemaError;

/// How a single prop is edited in the playground.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub enum ControlDescriptor {
    /// Fixed set of string options; the first one is the default.
    Choice { options: Vec<String> },
    Boolean,
    Text,
}

impl ControlDescriptor {
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Choice { .. } => "choice",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }
}

/// Authoring form of a descriptor: an option list, or a kind keyword.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDescriptor {
    Options(Vec<String>),
    Keyword(String),
}

impl TryFrom<RawDescriptor> for ControlDescriptor {
    type Error = SchemaError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        match raw {
            RawDescriptor::Options(options) => Ok(Self::Choice { options }),
            RawDescriptor::Keyword(kind) => match kind.as_str() {
                "boolean" => Ok(Self::Boolean),
                "text" => Ok(Self::Text),
                _ => Err(SchemaError::UnknownKind {
                    prop: None,
                    kind,
                }),
            },
        }
    }
}

/// Ordered prop-name to descriptor mapping. Order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSchema {
    entries: Vec<(String, ControlDescriptor)>,
}

impl ControlSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema, rejecting duplicate keys and empty choice lists.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, ControlDescriptor)>,
        K: Into<String>,
    {
        let mut schema = Self::new();
        for (key, descriptor) in entries {
            schema.insert(key, descriptor)?;
        }
        Ok(schema)
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        descriptor: ControlDescriptor,
    ) -> Result<(), SchemaError> {
        let key = key.into();
        if self.get(&key).is_some() {
            return Err(SchemaError::DuplicateProp(key));
        }
        if let ControlDescriptor::Choice { options } = &descriptor {
            if options.is_empty() {
                return Err(SchemaError::EmptyChoice(key));
            }
        }
        self.entries.push((key, descriptor));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ControlDescriptor> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ControlDescriptor)> {
        self.entries
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }
}

impl<'de> Deserialize<'de> for ControlSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = ControlSchema;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of prop names to control descriptors")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut schema = ControlSchema::new();
                while let Some(key) = map.next_key::<String>()? {
                    let raw = map.next_value::<RawDescriptor>()?;
                    let descriptor = ControlDescriptor::try_from(raw)
                        .map_err(|err| de::Error::custom(err.for_prop(&key)))?;
                    schema.insert(key, descriptor).map_err(de::Error::custom)?;
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}
