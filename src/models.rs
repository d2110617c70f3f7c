//! Typed projections of VetData API responses.
//!
//! All records are read-only value types deserialized from the server's
//! PascalCase JSON. Nothing here is ever sent back to the server except the
//! fields of the token request, which live in [`crate::auth`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// A successful response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The bearer token value.
    pub access_token: String,
    /// The token type, normally `Bearer`.
    pub token_type: String,
    /// Token lifetime in seconds from the moment of issue.
    pub expires_in: u64,
}

/// One practice installation visible to the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallationSummary {
    /// Stable identifier for the installation.
    pub installation_id: Uuid,
    /// Source practice-management system tag.
    #[serde(rename = "PMS")]
    pub pms: String,
    /// Display name of the practice.
    pub practice_name: String,
}

/// A phone entry attached to a client record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhoneRecord {
    /// The phone number as stored upstream, unnormalized.
    pub phone_number: String,
    /// Free-form type label, e.g. `Mobile` or `Home`.
    pub phone_type: String,
}

/// A client (pet-owner) account record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientRecord {
    /// Upstream account identifier.
    pub account_id: String,
    /// Client's last name.
    pub last_name: String,
    /// Client's first name.
    pub first_name: String,
    /// Phone entries, present when the search expanded related data.
    #[serde(default)]
    pub phones: Vec<PhoneRecord>,
    /// When the record was created upstream.
    #[serde(rename = "APICreateDate")]
    pub api_create_date: Option<DateTime<Utc>>,
    /// When the record was last changed upstream.
    #[serde(rename = "APILastChangeDate")]
    pub api_last_change_date: Option<DateTime<Utc>>,
}

/// The OData collection envelope wrapping search results.
///
/// Search endpoints return `{"value": [...], "count": n}`; a missing `value`
/// deserializes as an empty list.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ODataEnvelope<T> {
    /// The result rows.
    #[serde(default)]
    pub value: Vec<T>,
    /// Total match count, when the server includes one.
    #[serde(default)]
    pub count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_record_parses_pascal_case_fields() {
        let json = r#"{
            "AccountId": "AC-1001",
            "LastName": "Smith",
            "FirstName": "Jordan",
            "Phones": [
                {"PhoneNumber": "555-0100", "PhoneType": "Mobile"}
            ],
            "APICreateDate": "2024-01-15T10:30:00Z",
            "APILastChangeDate": null
        }"#;

        let record: ClientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.account_id, "AC-1001");
        assert_eq!(record.phones.len(), 1);
        assert_eq!(record.phones[0].phone_type, "Mobile");
        assert!(record.api_create_date.is_some());
        assert!(record.api_last_change_date.is_none());
    }

    #[test]
    fn client_record_without_phones_defaults_to_empty() {
        let json = r#"{"AccountId": "AC-1", "LastName": "Doe", "FirstName": "Sam"}"#;

        let record: ClientRecord = serde_json::from_str(json).unwrap();
        assert!(record.phones.is_empty());
    }

    #[test]
    fn envelope_without_value_is_empty() {
        let envelope: ODataEnvelope<ClientRecord> = serde_json::from_str("{}").unwrap();
        assert!(envelope.value.is_empty());
        assert!(envelope.count.is_none());
    }

    #[test]
    fn installation_summary_parses_pms_tag() {
        let json = r#"{
            "InstallationId": "8f14e45f-ceea-467f-9538-af930d8e9f52",
            "PMS": "AVImark",
            "PracticeName": "Northside Veterinary"
        }"#;

        let summary: InstallationSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.pms, "AVImark");
        assert_eq!(summary.practice_name, "Northside Veterinary");
    }
}
