//! Entity data models.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of an extracted entity.
///
/// Built-in kinds have fixed names; anything registered at runtime by the
/// host application lives under [`EntityKind::Custom`]. The string form is
/// what appears in serialized output and map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    /// Calendar date.
    Date,
    /// E-mail address.
    Email,
    /// Telephone number.
    Phone,
    /// Monetary amount.
    Currency,
    /// Person name.
    Person,
    /// Company or other organization.
    Organization,
    /// Kind registered by the host application (e.g. "project_id").
    Custom(String),
}

impl EntityKind {
    /// All built-in kinds, in default extraction order.
    pub const BUILT_IN: [EntityKind; 6] = [
        EntityKind::Date,
        EntityKind::Email,
        EntityKind::Phone,
        EntityKind::Currency,
        EntityKind::Person,
        EntityKind::Organization,
    ];

    /// Canonical name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Date => "date",
            EntityKind::Email => "email",
            EntityKind::Phone => "phone",
            EntityKind::Currency => "currency",
            EntityKind::Person => "person",
            EntityKind::Organization => "organization",
            EntityKind::Custom(name) => name,
        }
    }

    /// Whether this is one of the built-in kinds.
    pub fn is_built_in(&self) -> bool {
        !matches!(self, EntityKind::Custom(_))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown names parse as custom kinds, so parsing never fails.
impl FromStr for EntityKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_lowercase().as_str() {
            "date" => EntityKind::Date,
            "email" => EntityKind::Email,
            "phone" => EntityKind::Phone,
            "currency" => EntityKind::Currency,
            "person" => EntityKind::Person,
            "organization" => EntityKind::Organization,
            _ => EntityKind::Custom(s.trim().to_string()),
        };
        Ok(kind)
    }
}

impl From<String> for EntityKind {
    fn from(s: String) -> Self {
        EntityKind::from(s.as_str())
    }
}

impl From<&str> for EntityKind {
    fn from(s: &str) -> Self {
        let Ok(kind) = s.parse::<EntityKind>();
        kind
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A typed value found in document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    /// Entity kind.
    #[serde(rename = "type")]
    pub kind: EntityKind,

    /// Canonical value (post-processed where the pattern defines it).
    pub value: String,

    /// Heuristic confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// Text as matched, before post-processing.
    pub raw: String,

    /// Byte span of the match in the normalized text.
    pub start: usize,
    pub end: usize,
}

impl ExtractedEntity {
    pub fn new(kind: EntityKind, value: impl Into<String>, confidence: f32) -> Self {
        let value = value.into();
        Self {
            kind,
            raw: value.clone(),
            value,
            confidence,
            start: 0,
            end: 0,
        }
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Deduplication key: two entities are the same if kind and value match.
    pub fn key(&self) -> (&EntityKind, &str) {
        (&self.kind, &self.value)
    }
}
