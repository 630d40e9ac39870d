//! Maps the backend's current-user payload onto [`User`].
//!
//! The account API has answered with several shapes over time: local
//! accounts use camelCase (`firstName`, `avatarUrl`), OAuth logins pass the
//! provider attributes through (`sub`, `given_name`, `picture`), and older
//! builds wrapped everything in `{ "data": ... }`. Precedence, first present
//! and non-empty value wins:
//!
//! | field        | keys                                  |
//! |--------------|---------------------------------------|
//! | `id`         | `id`, `userId`, `sub`                 |
//! | `email`      | `email`                               |
//! | `first_name` | `firstName`, `given_name`, `name`     |
//! | `last_name`  | `lastName`, `family_name`             |
//! | `avatar_url` | `avatarUrl`, `avatar_url`, `picture`  |

use super::{errors::ClientError, types::User};
use serde_json::Value;

const ID_KEYS: &[&str] = &["id", "userId", "sub"];
const FIRST_NAME_KEYS: &[&str] = &["firstName", "given_name", "name"];
const LAST_NAME_KEYS: &[&str] = &["lastName", "family_name"];
const AVATAR_KEYS: &[&str] = &["avatarUrl", "avatar_url", "picture"];

/// Normalizes a current-user response body, unwrapping `data` when present.
///
/// # Errors
/// Returns [`ClientError::Parse`] when the payload is not an object or has no
/// email address.
pub fn normalize_user(payload: &Value) -> Result<User, ClientError> {
    let fields = match payload.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => payload,
    };

    if !fields.is_object() {
        return Err(ClientError::Parse(
            "Current user payload is not an object".to_string(),
        ));
    }

    let email = first_string(fields, &["email"])
        .ok_or_else(|| ClientError::Parse("Current user payload has no email".to_string()))?;

    Ok(User {
        id: first_id(fields).unwrap_or_default(),
        email,
        first_name: first_string(fields, FIRST_NAME_KEYS).unwrap_or_default(),
        last_name: first_string(fields, LAST_NAME_KEYS).unwrap_or_default(),
        avatar_url: first_string(fields, AVATAR_KEYS),
    })
}

fn first_string(fields: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToString::to_string)
}

fn first_id(fields: &Value) -> Option<u64> {
    ID_KEYS.iter().find_map(|key| match fields.get(*key)? {
        Value::Number(number) => number.as_u64().filter(|id| *id != 0),
        Value::String(text) => text.trim().parse::<u64>().ok().filter(|id| *id != 0),
        _ => None,
    })
}
