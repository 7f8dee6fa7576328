use serde::{Deserialize, Serialize};

/// Metadata marker attached to an attribute.
///
/// Qualifiers describe how a field should be treated downstream. The
/// structural validator carries them along but never enforces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualifierInfo {
    /// Personally identifiable information.
    Pii,
    /// Value is stored encrypted.
    Encrypted,
    /// Value expires after `ttl_seconds`.
    ShortLived {
        #[serde(rename = "ttlSeconds", default)]
        ttl_seconds: u64,
    },
}

/// Discriminator of a [`QualifierInfo`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualifierType {
    Pii,
    Encrypted,
    ShortLived,
}

impl QualifierInfo {
    pub fn qualifier_type(&self) -> QualifierType {
        match self {
            QualifierInfo::Pii => QualifierType::Pii,
            QualifierInfo::Encrypted => QualifierType::Encrypted,
            QualifierInfo::ShortLived { .. } => QualifierType::ShortLived,
        }
    }

    /// Find the first qualifier of the given type.
    pub fn filter<'a, I>(qualifiers: I, qualifier_type: QualifierType) -> Option<&'a QualifierInfo>
    where
        I: IntoIterator<Item = &'a QualifierInfo>,
    {
        qualifiers
            .into_iter()
            .find(|qualifier| qualifier.qualifier_type() == qualifier_type)
    }
}
