//! # Core
//!
//! Serde helpers for the loosely-typed corners of DID documents.

use serde::{Deserialize, Serialize};

/// `Kind` allows serde to serialize/deserialize either a string reference or
/// an embedded object, as used by DID document verification relationships.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Kind<T> {
    /// Reference by identifier.
    String(String),

    /// Embedded object.
    Object(T),
}

impl<T> Default for Kind<T> {
    fn default() -> Self {
        Self::String(String::new())
    }
}

impl<T> Kind<T> {
    /// Returns the string reference, if this is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Object(_) => None,
        }
    }

    /// Returns the embedded object, if this is one.
    pub const fn as_object(&self) -> Option<&T> {
        match self {
            Self::String(_) => None,
            Self::Object(o) => Some(o),
        }
    }
}

impl<T> From<String> for Kind<T> {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T> From<&str> for Kind<T> {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// `OneMany` allows serde to serialize/deserialize a single object or a set of
/// objects.
///
/// `Many` is tried first so that a JSON array is never captured whole by a
/// `T` that accepts arbitrary values.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneMany<T> {
    /// Set of objects
    Many(Vec<T>),

    /// Single object
    One(T),
}

impl<T: Default> Default for OneMany<T> {
    fn default() -> Self {
        Self::One(T::default())
    }
}

impl<T> OneMany<T> {
    /// Adds an object. A single object is converted to a set.
    pub fn add(self, item: T) -> Self {
        match self {
            Self::One(one) => Self::Many(vec![one, item]),
            Self::Many(mut many) => {
                many.push(item);
                Self::Many(many)
            }
        }
    }

    /// Iterate over the contained object(s).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::One(one) => std::slice::from_ref(one).iter(),
            Self::Many(many) => many.iter(),
        }
    }

    /// Number of contained objects.
    pub const fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(many) => many.len(),
        }
    }

    /// Returns `true` for an empty `Many`.
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(many) => many.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_many_add() {
        let om = OneMany::One("a".to_string()).add("b".to_string());
        assert_eq!(om.len(), 2);
        assert_eq!(om.iter().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn kind_untagged() {
        let k: Kind<serde_json::Value> = serde_json::from_str(r#""did:web:example.com#0""#)
            .expect("should deserialize");
        assert_eq!(k.as_string(), Some("did:web:example.com#0"));

        let k: Kind<serde_json::Value> =
            serde_json::from_str(r#"{"id":"x"}"#).expect("should deserialize");
        assert!(k.as_object().is_some());
    }

    #[test]
    fn one_many_array_of_values() {
        let om: OneMany<Kind<serde_json::Value>> =
            serde_json::from_str(r#"["https://a.example", "https://b.example"]"#)
                .expect("should deserialize");
        assert_eq!(om.len(), 2);
        assert_eq!(om.iter().next().and_then(Kind::as_string), Some("https://a.example"));
    }
}
