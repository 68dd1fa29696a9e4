use serde::{Deserialize, Deserializer, Serialize};

/// Analytics identity carried in an `amplitude_id*` cookie.
///
/// Fields missing from the decoded JSON keep their zero value. A record equal to
/// `IdentityRecord::default()` means "nothing decoded" and is never reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub device_id: String,
    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub opt_out: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub session_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub last_event_time: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub event_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub identify_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sequence_number: i64,
}

impl IdentityRecord {
    /// True when every field still holds its zero value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// A JSON `null` leaves the field at its zero value, like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
