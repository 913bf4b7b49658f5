use serde::{Deserialize, Serialize};

use crate::owner::UniqueField;

/// Create payload as received from a client.
///
/// Every field is optional here so that a missing field is reported as a
/// validation failure instead of a decode failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerDraft {
    #[serde(rename = "HN", default, skip_serializing_if = "Option::is_none")]
    pub hn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl OwnerDraft {
    /// A draft with every field supplied.
    pub fn new(
        hn: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            hn: Some(hn.into()),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            phone: Some(phone.into()),
            email: Some(email.into()),
        }
    }
}

/// Partial update payload. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPatch {
    #[serde(rename = "HN", default, skip_serializing_if = "Option::is_none")]
    pub hn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl OwnerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hn(mut self, hn: impl Into<String>) -> Self {
        self.hn = Some(hn.into());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Returns `true` if no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.hn.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
    }

    /// The supplied value of a uniqueness-constrained field, if any.
    pub fn unique_value(&self, field: UniqueField) -> Option<&str> {
        match field {
            UniqueField::Hn => self.hn.as_deref(),
            UniqueField::Phone => self.phone.as_deref(),
            UniqueField::Email => self.email.as_deref(),
        }
    }

    /// Every supplied field as `(wire name, value)`.
    pub fn supplied(&self) -> Vec<(&'static str, &str)> {
        [
            ("HN", self.hn.as_deref()),
            ("first_name", self.first_name.as_deref()),
            ("last_name", self.last_name.as_deref()),
            ("phone", self.phone.as_deref()),
            ("email", self.email.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_decodes_with_missing_fields() {
        let draft: OwnerDraft =
            serde_json::from_str(r#"{"HN":"H1","first_name":"A"}"#).unwrap();
        assert_eq!(draft.hn.as_deref(), Some("H1"));
        assert_eq!(draft.first_name.as_deref(), Some("A"));
        assert!(draft.email.is_none());
    }

    #[test]
    fn draft_ignores_unknown_fields() {
        let draft: OwnerDraft =
            serde_json::from_str(r#"{"HN":"H1","_id":"whatever"}"#).unwrap();
        assert_eq!(draft.hn.as_deref(), Some("H1"));
    }

    #[test]
    fn patch_builder_and_supplied() {
        let patch = OwnerPatch::new().with_phone("222").with_first_name("Z");
        assert!(!patch.is_empty());
        assert_eq!(patch.unique_value(UniqueField::Phone), Some("222"));
        assert_eq!(patch.unique_value(UniqueField::Email), None);
        assert_eq!(patch.supplied(), vec![("first_name", "Z"), ("phone", "222")]);
    }

    #[test]
    fn empty_patch() {
        assert!(OwnerPatch::new().is_empty());
        let json = serde_json::to_string(&OwnerPatch::new()).unwrap();
        assert_eq!(json, "{}");
    }
}
