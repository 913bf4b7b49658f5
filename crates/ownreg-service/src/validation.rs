//! Required-field checks run before any store access.

use ownreg_types::{NewOwner, OwnerDraft, OwnerPatch};

use crate::error::{ServiceError, ServiceResult};

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Turn a create payload into a complete field set.
///
/// Absent, empty and whitespace-only values all count as missing. Values are
/// stored as supplied, without trimming.
pub fn validate_draft(draft: OwnerDraft) -> ServiceResult<NewOwner> {
    let missing: Vec<&'static str> = [
        ("HN", draft.hn.as_deref()),
        ("first_name", draft.first_name.as_deref()),
        ("last_name", draft.last_name.as_deref()),
        ("phone", draft.phone.as_deref()),
        ("email", draft.email.as_deref()),
    ]
    .into_iter()
    .filter(|(_, value)| is_blank(*value))
    .map(|(name, _)| name)
    .collect();

    match draft {
        OwnerDraft {
            hn: Some(hn),
            first_name: Some(first_name),
            last_name: Some(last_name),
            phone: Some(phone),
            email: Some(email),
        } if missing.is_empty() => Ok(NewOwner {
            hn,
            first_name,
            last_name,
            phone,
            email,
        }),
        _ => Err(ServiceError::Validation { fields: missing }),
    }
}

/// Reject patches that would blank out a required field.
pub fn validate_patch(patch: &OwnerPatch) -> ServiceResult<()> {
    let blank: Vec<&'static str> = patch
        .supplied()
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
    if blank.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation { fields: blank })
    }
}
