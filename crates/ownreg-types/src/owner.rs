use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::OwnerId;
use crate::payload::OwnerPatch;

/// A persisted owner record.
///
/// `hn`, `phone` and `email` are each unique across all records; the store
/// enforces this on every write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(rename = "_id")]
    pub id: OwnerId,
    #[serde(rename = "HN")]
    pub hn: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Owner {
    /// Materialize a new record from validated fields.
    pub fn from_new(id: OwnerId, fields: NewOwner, now: DateTime<Utc>) -> Self {
        Self {
            id,
            hn: fields.hn,
            first_name: fields.first_name,
            last_name: fields.last_name,
            phone: fields.phone,
            email: fields.email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch onto this record. Absent fields are left unchanged;
    /// `updated_at` is always bumped.
    pub fn apply_patch(&mut self, patch: &OwnerPatch, now: DateTime<Utc>) {
        if let Some(hn) = &patch.hn {
            self.hn = hn.clone();
        }
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        self.updated_at = now;
    }

    /// Value of one of the uniqueness-constrained fields.
    pub fn unique_value(&self, field: UniqueField) -> &str {
        match field {
            UniqueField::Hn => &self.hn,
            UniqueField::Phone => &self.phone,
            UniqueField::Email => &self.email,
        }
    }

    /// The public read shape of this record.
    pub fn projection(&self) -> OwnerProjection {
        OwnerProjection::from(self)
    }
}

/// A complete, validated field set ready for insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOwner {
    pub hn: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl NewOwner {
    pub fn unique_value(&self, field: UniqueField) -> &str {
        match field {
            UniqueField::Hn => &self.hn,
            UniqueField::Phone => &self.phone,
            UniqueField::Email => &self.email,
        }
    }
}

/// Fields exposed across the read boundary (timestamps excluded).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerProjection {
    #[serde(rename = "_id")]
    pub id: OwnerId,
    #[serde(rename = "HN")]
    pub hn: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl OwnerProjection {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&Owner> for OwnerProjection {
    fn from(owner: &Owner) -> Self {
        Self {
            id: owner.id,
            hn: owner.hn.clone(),
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
            phone: owner.phone.clone(),
            email: owner.email.clone(),
        }
    }
}

/// The fields that must be pairwise distinct across records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueField {
    Hn,
    Phone,
    Email,
}

impl UniqueField {
    pub const ALL: [UniqueField; 3] = [Self::Hn, Self::Phone, Self::Email];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hn => "HN",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
