//! Guest, RSVP and avatar models
//!
//! Request types use the camelCase field names of the public JSON API.
//! Store rows use the snake_case column names of the `guests` and `rsvps`
//! tables.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Guest on the invite list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guest {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Row of the `guests` table as returned by the store
///
/// The store generates ids, which may come back as UUID strings or integers.
#[derive(Debug, Deserialize)]
pub struct GuestRow {
    #[serde(default)]
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<GuestRow> for Guest {
    fn from(row: GuestRow) -> Self {
        let id = match row.id {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Self {
            id,
            name: row.name,
            address: row.address.filter(|a| !a.is_empty()),
        }
    }
}

/// Guest staged for insertion by the import tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGuest {
    pub name: String,
    /// Always sent, empty when the file had none
    pub address: String,
}

/// Built-in guest list used when no store is configured
pub fn default_guest_list() -> Vec<Guest> {
    [
        ("1", "John Smith"),
        ("2", "Jane Smith"),
        ("3", "Bob Johnson"),
        ("4", "Alice Williams"),
        ("5", "Tom Williams"),
    ]
    .into_iter()
    .map(|(id, name)| Guest {
        id: id.to_string(),
        name: name.to_string(),
        address: None,
    })
    .collect()
}

/// RSVP form submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    pub name: String,
    pub email: String,
    pub is_attending: bool,
    #[serde(default)]
    pub attending_guests: Vec<String>,
    #[serde(default)]
    pub diet: String,
}

/// Row of the `rsvps` table
///
/// Used both for inserts and for reading a submission back before sending a
/// confirmation. `avatar_data` is written separately and read through
/// [`AvatarRow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub name: String,
    pub email: String,
    pub is_attending: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attending_guests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One guest's avatar pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarSelection {
    pub guest_name: String,
    pub avatar: String,
    #[serde(default)]
    pub message: String,
}

/// Avatar-save request body
#[derive(Debug, Clone, Deserialize)]
pub struct SaveAvatarsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatars: Vec<AvatarSelection>,
}

/// Avatar entry shown in the plaza
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestAvatar {
    pub name: String,
    pub avatar: String,
    pub message: String,
}

/// Avatar list embedded in an RSVP row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AvatarData {
    /// Column is null or missing
    #[default]
    Absent,
    /// Column holds `[]`
    Empty,
    Populated(Vec<AvatarSelection>),
}

impl AvatarData {
    /// Classify a raw column value
    ///
    /// Anything that is not null or a list of selections is logged and
    /// treated as absent.
    pub fn from_json(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Array(items)) if items.is_empty() => Self::Empty,
            Some(value @ Value::Array(_)) => {
                match serde_json::from_value::<Vec<AvatarSelection>>(value) {
                    Ok(selections) => Self::Populated(selections),
                    Err(e) => {
                        warn!("Ignoring malformed avatar_data: {}", e);
                        Self::Absent
                    }
                }
            }
            Some(other) => {
                warn!("Ignoring avatar_data that is not a list: {}", other);
                Self::Absent
            }
        }
    }

    /// Selections to display, empty for absent or empty data
    pub fn selections(&self) -> &[AvatarSelection] {
        match self {
            Self::Absent | Self::Empty => &[],
            Self::Populated(selections) => selections,
        }
    }
}

impl From<Vec<AvatarSelection>> for AvatarData {
    fn from(selections: Vec<AvatarSelection>) -> Self {
        if selections.is_empty() {
            Self::Empty
        } else {
            Self::Populated(selections)
        }
    }
}

impl<'de> Deserialize<'de> for AvatarData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_json(Option::<Value>::deserialize(deserializer)?))
    }
}

/// `avatar_data` projection of an `rsvps` row
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvatarRow {
    #[serde(default)]
    pub avatar_data: AvatarData,
}
