use ownreg_types::{NewOwner, Owner, OwnerId, OwnerPatch, UniqueField};

/// Predicate over owner records.
///
/// Unique-field criteria are OR-ed together. `id` narrows the match to one
/// record and `exclude` removes one record from consideration. A filter with
/// neither `id` nor any unique-field criterion matches nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnerFilter {
    any_of: Vec<(UniqueField, String)>,
    id: Option<OwnerId>,
    exclude: Option<OwnerId>,
}

impl OwnerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match exactly the record with this id.
    pub fn by_id(id: OwnerId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Match any record sharing HN, phone or email with `fields`.
    pub fn any_unique_of(fields: &NewOwner) -> Self {
        let mut filter = Self::new();
        for field in UniqueField::ALL {
            filter = filter.or_eq(field, fields.unique_value(field));
        }
        filter
    }

    /// Match any *other* record sharing a unique value supplied in `patch`.
    pub fn conflicting_with_patch(id: OwnerId, patch: &OwnerPatch) -> Self {
        let mut filter = Self::new().excluding(id);
        for field in UniqueField::ALL {
            if let Some(value) = patch.unique_value(field) {
                filter = filter.or_eq(field, value);
            }
        }
        filter
    }

    /// Add an OR-ed equality criterion on a unique field.
    pub fn or_eq(mut self, field: UniqueField, value: impl Into<String>) -> Self {
        self.any_of.push((field, value.into()));
        self
    }

    /// Exclude the record with this id.
    pub fn excluding(mut self, id: OwnerId) -> Self {
        self.exclude = Some(id);
        self
    }

    /// Returns `true` if the filter can match at least one record.
    pub fn has_criteria(&self) -> bool {
        self.id.is_some() || !self.any_of.is_empty()
    }

    pub fn criteria(&self) -> &[(UniqueField, String)] {
        &self.any_of
    }

    pub fn id(&self) -> Option<OwnerId> {
        self.id
    }

    pub fn excluded(&self) -> Option<OwnerId> {
        self.exclude
    }

    pub fn matches(&self, owner: &Owner) -> bool {
        if self.exclude == Some(owner.id) {
            return false;
        }
        if let Some(id) = self.id {
            if id != owner.id {
                return false;
            }
            if self.any_of.is_empty() {
                return true;
            }
        }
        self.any_of
            .iter()
            .any(|(field, value)| owner.unique_value(*field) == value)
    }

    /// The unique fields on which `owner` satisfies this filter.
    pub fn matched_fields(&self, owner: &Owner) -> Vec<UniqueField> {
        if self.exclude == Some(owner.id) {
            return Vec::new();
        }
        let mut fields: Vec<UniqueField> = self
            .any_of
            .iter()
            .filter(|(field, value)| owner.unique_value(*field) == value)
            .map(|(field, _)| *field)
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }
}
