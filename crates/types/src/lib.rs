//! # Clinic Types
//!
//! Small validated value types shared by the API client, the page controllers and the CLI.
//!
//! The backend addresses every filter criterion as a path segment, so a blank criterion cannot
//! simply be left out of the URL. [`FilterValue`] captures the "no constraint" case explicitly and
//! renders it as the literal [`NULL_SEGMENT`] the backend expects.

use std::fmt;

/// Path segment the backend interprets as "no constraint" for a filter criterion.
pub const NULL_SEGMENT: &str = "null";

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A single filter criterion read from a search box or drop-down.
///
/// Blank or whitespace-only input means "no constraint" and is represented by
/// [`FilterValue::Any`]. Anything else is kept trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterValue {
    #[default]
    Any,
    Value(NonEmptyText),
}

impl FilterValue {
    /// Normalises raw control input into a filter criterion.
    ///
    /// The literal [`NULL_SEGMENT`] is treated the same as blank input, so a value that already
    /// went through the sentinel round-trips to [`FilterValue::Any`].
    pub fn from_input(input: impl AsRef<str>) -> Self {
        match NonEmptyText::new(input) {
            Ok(text) if text.as_str() != NULL_SEGMENT => Self::Value(text),
            _ => Self::Any,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns the constrained value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Value(text) => Some(text.as_str()),
        }
    }

    /// Returns the raw path segment for this criterion (before percent-encoding).
    pub fn as_segment(&self) -> &str {
        self.value().unwrap_or(NULL_SEGMENT)
    }
}

impl From<&str> for FilterValue {
    fn from(input: &str) -> Self {
        Self::from_input(input)
    }
}

impl From<Option<&str>> for FilterValue {
    fn from(input: Option<&str>) -> Self {
        input.map(Self::from_input).unwrap_or_default()
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Dr. Grey  ").expect("valid text");
        assert_eq!(text.as_str(), "Dr. Grey");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn non_empty_text_deserialize_rejects_blank() {
        let err = serde_json::from_str::<NonEmptyText>("\"  \"");
        assert!(err.is_err());
    }

    #[test]
    fn blank_filter_input_becomes_null_segment() {
        let value = FilterValue::from_input("   ");
        assert!(value.is_any());
        assert_eq!(value.as_segment(), NULL_SEGMENT);
        assert_eq!(value.to_string(), "null");
    }

    #[test]
    fn null_literal_is_treated_as_any() {
        assert_eq!(FilterValue::from_input("null"), FilterValue::Any);
    }

    #[test]
    fn filter_value_keeps_trimmed_text() {
        let value = FilterValue::from(" cardio ");
        assert_eq!(value.value(), Some("cardio"));
        assert_eq!(value.as_segment(), "cardio");
    }

    #[test]
    fn missing_option_is_any() {
        assert_eq!(FilterValue::from(None), FilterValue::Any);
    }
}
