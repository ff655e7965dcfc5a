//! Payload mapping between local contacts and remote profile documents
//!
//! Pure conversions only. Nothing in this module touches the network or the
//! store, and the two outbound builders are total: they never fail for any
//! well-formed [`LocalContact`].
//!
//! The two outbound variants are deliberately separate named functions:
//! [`contact_to_remote_payload`] performs no defaulting, while
//! [`contact_to_normalized_payload`] substitutes `"Unknown"` for blank
//! name/contact fields.

use chrono::NaiveDate;
use serde_json::{Map, Value, json};

use crate::contact::LocalContact;
use crate::error::{Error, Result};

/// Calendar-date wire format used by the remote profile API
const REMOTE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder emitted by the normalized payload for blank fields
const UNKNOWN_FIELD: &str = "Unknown";

/// Parse a remote profile document into a local contact
///
/// The document is a loosely-typed JSON object. A missing or null
/// `birthDate` leaves the field unset; a missing `address` sub-object leaves
/// every address field unset.
///
/// # Errors
///
/// `MalformedDocument` if the top-level value is not a JSON object, or if
/// `birthDate` is present, non-null, and not a parseable date string.
pub fn contact_from_remote_json(document: &Value) -> Result<LocalContact> {
    let fields = document
        .as_object()
        .ok_or_else(|| Error::malformed("top-level value is not a JSON object"))?;

    let mut contact = LocalContact::new();
    contact.email = string_field(fields, "email");
    contact.phone = string_field(fields, "phone");
    contact.birthdate = parse_birthdate(fields)?;

    if let Some(address) = fields.get("address").and_then(Value::as_object) {
        contact.mailing_street = string_field(address, "address");
        contact.mailing_city = string_field(address, "city");
        contact.mailing_state = string_field(address, "state");
        contact.mailing_country = string_field(address, "country");
        contact.mailing_postal_code = string_field(address, "postalCode");
    }

    Ok(contact)
}

/// Build the "push full profile" payload
///
/// Flat object with keys `id`, `firstName`, `lastName`, `email`, `phone`.
/// No defaulting: absent fields serialize as null.
pub fn contact_to_remote_payload(contact: &LocalContact) -> Value {
    json!({
        "id": contact.id,
        "firstName": contact.first_name,
        "lastName": contact.last_name,
        "email": contact.email,
        "phone": contact.phone,
    })
}

/// Build the defaulting payload variant
///
/// Keys `salesforceId`, `firstName`, `lastName`, `email`, `phone`. Any of
/// the four name/contact fields that is absent, empty, or whitespace-only is
/// replaced with the literal string `"Unknown"`.
pub fn contact_to_normalized_payload(contact: &LocalContact) -> Value {
    json!({
        "salesforceId": contact.id,
        "firstName": normalized(&contact.first_name),
        "lastName": normalized(&contact.last_name),
        "email": normalized(&contact.email),
        "phone": normalized(&contact.phone),
    })
}

fn parse_birthdate(fields: &Map<String, Value>) -> Result<Option<NaiveDate>> {
    let value = match fields.get("birthDate") {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let raw = value
        .as_str()
        .ok_or_else(|| Error::malformed("birthDate is not a string"))?;
    let date = NaiveDate::parse_from_str(raw, REMOTE_DATE_FORMAT)
        .map_err(|_| Error::malformed(format!("birthDate is not a parseable date: {}", raw)))?;
    Ok(Some(date))
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn normalized(field: &Option<String>) -> String {
    match field {
        Some(value) if !value.trim().is_empty() => value.clone(),
        _ => UNKNOWN_FIELD.to_string(),
    }
}
