//! Firestore typed-value encoding for profile documents.
//!
//! Firestore's REST surface wraps every field in a single-key object naming
//! its type (`{"stringValue": "x"}`, `{"nullValue": null}`, ...). Decoding is
//! lenient: unknown types and wrong shapes read as absent.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use super::{ProfileDocument, ProfileUpdate, UserProfile};

/// Field names in the stored document.
pub mod field {
    pub const USERNAME: &str = "username";
    pub const AVATAR_URL: &str = "avatarUrl";
    pub const PREFERRED_MOOD: &str = "preferredMood";
    pub const CREATED_AT: &str = "createdAt";
    pub const ROLES: &str = "roles";

    /// Checked in order when looking for a registration time.
    pub const CREATED_ALIASES: [&str; 3] = [CREATED_AT, "created_at", "created"];
}

pub fn string(s: &str) -> Value {
    json!({ "stringValue": s })
}

pub fn null() -> Value {
    json!({ "nullValue": null })
}

pub fn timestamp(t: &DateTime<Utc>) -> Value {
    json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

pub fn string_array(items: &[String]) -> Value {
    let values: Vec<Value> = items.iter().map(|s| string(s)).collect();
    json!({ "arrayValue": { "values": values } })
}

/// Full document body for a create/overwrite.
pub fn encode_profile(p: &UserProfile) -> Value {
    let mut fields = Map::new();
    fields.insert(field::USERNAME.into(), string(&p.username));
    fields.insert(
        field::AVATAR_URL.into(),
        p.avatar_url.as_deref().map(string).unwrap_or_else(null),
    );
    fields.insert(field::PREFERRED_MOOD.into(), string(&p.preferred_mood));
    fields.insert(field::CREATED_AT.into(), timestamp(&p.created_at));
    fields.insert(field::ROLES.into(), string_array(&p.roles));
    json!({ "fields": fields })
}

/// Partial body plus the field paths to pass as the update mask.
pub fn encode_update(u: &ProfileUpdate) -> (Value, [&'static str; 2]) {
    let mut fields = Map::new();
    fields.insert(field::USERNAME.into(), string(&u.username));
    fields.insert(field::PREFERRED_MOOD.into(), string(&u.preferred_mood));
    (json!({ "fields": fields }), [field::USERNAME, field::PREFERRED_MOOD])
}

pub fn decode_document(doc: &Value) -> ProfileDocument {
    let Some(fields) = doc.get("fields").and_then(Value::as_object) else {
        return ProfileDocument::default();
    };

    ProfileDocument {
        username: fields.get(field::USERNAME).and_then(as_string).filter(|s| !s.is_empty()),
        avatar_url: fields.get(field::AVATAR_URL).and_then(as_string).filter(|s| !s.is_empty()),
        preferred_mood: fields
            .get(field::PREFERRED_MOOD)
            .and_then(as_string)
            .filter(|s| !s.is_empty()),
        created_at: field::CREATED_ALIASES
            .iter()
            .find_map(|name| fields.get(*name).and_then(as_timestamp)),
        roles: fields.get(field::ROLES).and_then(as_string_list),
    }
}

fn as_string(v: &Value) -> Option<String> {
    v.get("stringValue")?.as_str().map(String::from)
}

fn as_timestamp(v: &Value) -> Option<DateTime<Utc>> {
    if let Some(ts) = v.get("timestampValue").and_then(Value::as_str) {
        return DateTime::parse_from_rfc3339(ts).ok().map(|t| t.to_utc());
    }
    if let Some(s) = v.get("stringValue").and_then(Value::as_str) {
        if let Ok(t) = DateTime::parse_from_rfc3339(s) {
            return Some(t.to_utc());
        }
        return NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
    }
    // Epoch milliseconds; integerValue is a decimal string on the wire.
    let ms = match v.get("integerValue")? {
        Value::String(s) => s.parse::<i64>().ok()?,
        other => other.as_i64()?,
    };
    DateTime::from_timestamp_millis(ms)
}

/// Arrays of strings, or a lone string treated as a one-element list.
fn as_string_list(v: &Value) -> Option<Vec<String>> {
    if let Some(s) = as_string(v) {
        return Some(vec![s]);
    }
    let array = v.get("arrayValue")?;
    let values = match array.get("values").and_then(Value::as_array) {
        Some(values) => values.iter().filter_map(as_string).collect(),
        None => Vec::new(),
    };
    Some(values)
}
