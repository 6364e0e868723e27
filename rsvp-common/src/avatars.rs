//! Avatar selection aggregation for the plaza view

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::matching::first_name;
use crate::models::{AvatarData, AvatarSelection, GuestAvatar};

/// Flatten stored avatar lists into one entry per first name
///
/// Rows are visited in the order given, and selections in list order. The
/// first selection seen for a first name wins; later ones are dropped.
/// Absent and empty lists contribute nothing.
pub fn aggregate_avatars(rows: &[AvatarData]) -> Vec<GuestAvatar> {
    let mut seen = HashSet::new();
    let mut avatars = Vec::new();

    for selection in rows.iter().flat_map(AvatarData::selections) {
        let name = first_name(&selection.guest_name);
        if seen.insert(name.to_string()) {
            avatars.push(GuestAvatar {
                name: name.to_string(),
                avatar: selection.avatar.clone(),
                message: selection.message.clone(),
            });
        }
    }

    avatars
}

/// Trim names and avatar ids so stored selections carry no stray whitespace
pub fn clean_selections(avatars: Vec<AvatarSelection>) -> Vec<AvatarSelection> {
    avatars
        .into_iter()
        .map(|selection| AvatarSelection {
            guest_name: selection.guest_name.trim().to_string(),
            avatar: selection.avatar.trim().to_string(),
            message: selection.message,
        })
        .collect()
}

/// Check an avatar-save request before touching the store
pub fn validate_selections(email: &str, avatars: &[AvatarSelection]) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::InvalidInput("Email is required".to_string()));
    }

    if avatars.is_empty() {
        return Err(Error::InvalidInput(
            "At least one avatar selection is required".to_string(),
        ));
    }

    for selection in avatars {
        if selection.guest_name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Guest name is required for all avatars".to_string(),
            ));
        }
        if selection.avatar.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Avatar is required for all guests".to_string(),
            ));
        }
    }

    Ok(())
}
