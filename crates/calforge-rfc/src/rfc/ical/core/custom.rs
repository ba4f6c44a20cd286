//! Custom `X-` extension attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::{escape, quote_parameter};
use calforge_core::constants::CUSTOM_ATTRIBUTE_PREFIX;

/// A single extension attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// The accepted input shapes for extension attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CustomAttributesInput {
    Pairs(Vec<KeyValue>),
    Tuples(Vec<(String, String)>),
    Map(BTreeMap<String, String>),
}

/// Ordered list of extension attributes.
///
/// Keys are checked for the `X-` prefix when added; insertion order is
/// preserved on output. Map input yields keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CustomAttributesInput")]
pub struct CustomAttributes(Vec<KeyValue>);

impl CustomAttributes {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// ## Summary
    /// Appends an attribute.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if the key lacks the `X-` prefix.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> RfcResult<()> {
        let key = key.into();
        check_key(&key)?;
        self.0.push(KeyValue {
            key,
            value: value.into(),
        });
        Ok(())
    }

    /// ## Summary
    /// Builds a list from any iterator of key/value pairs.
    ///
    /// ## Errors
    /// Fails on the first key without the `X-` prefix; nothing is kept then.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> RfcResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut attributes = Self::new();
        for (key, value) in pairs {
            attributes.push(key, value)?;
        }
        Ok(attributes)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Renders one `KEY:value` content line per attribute.
    #[must_use]
    pub fn to_lines(&self) -> String {
        self.0
            .iter()
            .map(|kv| format!("{}:{}\r\n", kv.key, escape(&kv.value, false)))
            .collect()
    }

    /// Renders the attributes as `;KEY=value` property parameters.
    #[must_use]
    pub fn to_parameters(&self) -> String {
        self.0
            .iter()
            .map(|kv| format!(";{}={}", kv.key.to_ascii_uppercase(), quote_parameter(&kv.value)))
            .collect()
    }
}

fn check_key(key: &str) -> RfcResult<()> {
    if key.starts_with(CUSTOM_ATTRIBUTE_PREFIX) {
        Ok(())
    } else {
        Err(RfcError::invalid(
            "x",
            format!("key `{key}` has to start with `{CUSTOM_ATTRIBUTE_PREFIX}`"),
        ))
    }
}

impl TryFrom<CustomAttributesInput> for CustomAttributes {
    type Error = RfcError;

    fn try_from(input: CustomAttributesInput) -> Result<Self, Self::Error> {
        match input {
            CustomAttributesInput::Pairs(pairs) => {
                Self::try_from_pairs(pairs.into_iter().map(|kv| (kv.key, kv.value)))
            }
            CustomAttributesInput::Tuples(tuples) => Self::try_from_pairs(tuples),
            CustomAttributesInput::Map(map) => Self::try_from_pairs(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_input_shapes() {
        let pairs: CustomAttributes =
            serde_json::from_str(r#"[{"key":"X-FOO","value":"bar"}]"#).unwrap();
        let tuples: CustomAttributes = serde_json::from_str(r#"[["X-FOO","bar"]]"#).unwrap();
        let map: CustomAttributes = serde_json::from_str(r#"{"X-FOO":"bar"}"#).unwrap();

        assert_eq!(pairs, tuples);
        assert_eq!(tuples, map);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn rejects_keys_without_prefix() {
        let mut attributes = CustomAttributes::new();
        let err = attributes.push("FOO", "bar").unwrap_err();
        assert!(err.to_string().contains("X-"));
        assert!(attributes.is_empty());

        assert!(serde_json::from_str::<CustomAttributes>(r#"{"FOO":"bar"}"#).is_err());
    }

    #[test]
    fn renders_lines_and_parameters() {
        let attributes =
            CustomAttributes::try_from_pairs([("X-A", "one;two"), ("X-B", "mailto:x")]).unwrap();

        assert_eq!(attributes.to_lines(), "X-A:one\\;two\r\nX-B:mailto:x\r\n");
        assert_eq!(attributes.to_parameters(), ";X-A=\"one;two\";X-B=\"mailto:x\"");
    }

    #[test]
    fn serializes_as_pairs() {
        let attributes = CustomAttributes::try_from_pairs([("X-A", "1")]).unwrap();
        assert_eq!(
            serde_json::to_string(&attributes).unwrap(),
            r#"[{"key":"X-A","value":"1"}]"#
        );
    }
}
