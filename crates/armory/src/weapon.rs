//! Core weapon record types for armory.
//!
//! This module defines the data structures stored in the registry and the
//! form payload the presentation layer submits for create and edit.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Whether a weapon is in inventory or checked out to its holder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponStatus {
    /// In inventory.
    #[default]
    Available,
    /// Checked out to the holder.
    Issued,
}

impl WeaponStatus {
    /// The opposite status.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Available => Self::Issued,
            Self::Issued => Self::Available,
        }
    }

    /// What toggling would do, as a button label.
    #[must_use]
    pub fn toggle_action(self) -> &'static str {
        match self {
            Self::Available => "issue",
            Self::Issued => "return",
        }
    }
}

impl std::fmt::Display for WeaponStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Issued => write!(f, "issued"),
        }
    }
}

impl FromStr for WeaponStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "issued" => Ok(Self::Issued),
            _ => Err(Error::UnknownStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// A single tracked weapon.
///
/// The text fields are optional so that older persisted data lacking one of
/// them still loads. Records created through the registry always have all
/// four set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponRecord {
    /// Unique identifier, immutable after creation.
    pub id: String,

    /// Serial number stamped on the weapon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// Model designation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Holder's first name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Holder's last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Current status.
    #[serde(default)]
    pub status: WeaponStatus,

    /// When the record was created. Never changes.
    pub date_added: DateTime<Utc>,
}

impl WeaponRecord {
    /// Create a record from form input with the given id, stamped with the
    /// current time.
    #[must_use]
    pub fn new(id: String, input: WeaponInput) -> Self {
        Self {
            id,
            serial_number: Some(input.serial_number),
            model: Some(input.model),
            first_name: Some(input.first_name),
            last_name: Some(input.last_name),
            status: input.status.unwrap_or_default(),
            date_added: Utc::now(),
        }
    }

    /// Replace every mutable field with the input's values.
    ///
    /// `id` and `date_added` are left untouched; `status` only changes when
    /// the input carries one.
    pub fn apply(&mut self, input: WeaponInput) {
        self.serial_number = Some(input.serial_number);
        self.model = Some(input.model);
        self.first_name = Some(input.first_name);
        self.last_name = Some(input.last_name);
        if let Some(status) = input.status {
            self.status = status;
        }
    }

    /// Whether any text field contains `needle`, which must already be
    /// lowercase. Absent fields never match.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        [
            &self.serial_number,
            &self.model,
            &self.first_name,
            &self.last_name,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }

    /// First and last name joined by a space, skipping absent parts.
    #[must_use]
    pub fn holder_name(&self) -> String {
        [&self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the weapon is currently checked out.
    #[must_use]
    pub fn is_issued(&self) -> bool {
        self.status == WeaponStatus::Issued
    }
}

/// Editable fields submitted by a create or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponInput {
    /// Serial number.
    pub serial_number: String,
    /// Model designation.
    pub model: String,
    /// Holder's first name.
    pub first_name: String,
    /// Holder's last name.
    pub last_name: String,
    /// Status to set; `None` keeps the current one (or `available` on create).
    pub status: Option<WeaponStatus>,
}

impl WeaponInput {
    /// Build input for the four text fields with no explicit status.
    #[must_use]
    pub fn new(
        serial_number: impl Into<String>,
        model: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            serial_number: serial_number.into(),
            model: model.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            status: None,
        }
    }

    /// Set an explicit status.
    #[must_use]
    pub fn with_status(mut self, status: WeaponStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Copy of the input with every text field trimmed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            serial_number: self.serial_number.trim().to_string(),
            model: self.model.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            status: self.status,
        }
    }

    /// Reject input with an empty (after trimming) required field.
    ///
    /// The registry accepts anything; forms call this before submitting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("serial number", &self.serial_number),
            ("model", &self.model),
            ("first name", &self.first_name),
            ("last name", &self.last_name),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::InvalidInput { field });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> WeaponInput {
        WeaponInput::new("AK47-001", "AK-47", "Ivan", "Petrenko")
    }

    #[test]
    fn test_status_display() {
        assert_eq!(WeaponStatus::Available.to_string(), "available");
        assert_eq!(WeaponStatus::Issued.to_string(), "issued");
    }

    #[test]
    fn test_status_default_is_available() {
        assert_eq!(WeaponStatus::default(), WeaponStatus::Available);
    }

    #[test]
    fn test_status_toggled() {
        assert_eq!(WeaponStatus::Available.toggled(), WeaponStatus::Issued);
        assert_eq!(WeaponStatus::Issued.toggled(), WeaponStatus::Available);
    }

    #[test]
    fn test_toggle_action() {
        assert_eq!(WeaponStatus::Available.toggle_action(), "issue");
        assert_eq!(WeaponStatus::Issued.toggle_action(), "return");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "Issued".parse::<WeaponStatus>().unwrap(),
            WeaponStatus::Issued
        );
        assert_eq!(
            " available ".parse::<WeaponStatus>().unwrap(),
            WeaponStatus::Available
        );
    }

    #[test]
    fn test_status_from_str_rejects_unknown_as_input_error() {
        let err = "lost".parse::<WeaponStatus>().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(err, Error::UnknownStatus { ref value } if value == "lost"));
    }

    #[test]
    fn test_record_new() {
        let record = WeaponRecord::new("id-1".to_string(), sample_input());

        assert_eq!(record.id, "id-1");
        assert_eq!(record.serial_number.as_deref(), Some("AK47-001"));
        assert_eq!(record.status, WeaponStatus::Available);
        assert!(!record.is_issued());
    }

    #[test]
    fn test_record_new_with_status() {
        let input = sample_input().with_status(WeaponStatus::Issued);
        let record = WeaponRecord::new("id-1".to_string(), input);
        assert!(record.is_issued());
    }

    #[test]
    fn test_apply_keeps_id_and_date() {
        let mut record = WeaponRecord::new("id-1".to_string(), sample_input());
        let date_added = record.date_added;

        record.apply(WeaponInput::new("SN2", "M2", "Olena", "Shevchenko"));

        assert_eq!(record.id, "id-1");
        assert_eq!(record.date_added, date_added);
        assert_eq!(record.serial_number.as_deref(), Some("SN2"));
        assert_eq!(record.last_name.as_deref(), Some("Shevchenko"));
        assert_eq!(record.status, WeaponStatus::Available);
    }

    #[test]
    fn test_apply_with_status() {
        let mut record = WeaponRecord::new("id-1".to_string(), sample_input());
        record.apply(sample_input().with_status(WeaponStatus::Issued));
        assert_eq!(record.status, WeaponStatus::Issued);
    }

    #[test]
    fn test_matches_any_field() {
        let record = WeaponRecord::new("id-1".to_string(), sample_input());
        assert!(record.matches("ak47"));
        assert!(record.matches("ak-47"));
        assert!(record.matches("ivan"));
        assert!(record.matches("petr"));
        assert!(!record.matches("glock"));
    }

    #[test]
    fn test_matches_skips_absent_fields() {
        let mut record = WeaponRecord::new("id-1".to_string(), sample_input());
        record.model = None;
        record.first_name = None;
        assert!(!record.matches("ivan"));
        assert!(record.matches("petrenko"));
    }

    #[test]
    fn test_holder_name() {
        let mut record = WeaponRecord::new("id-1".to_string(), sample_input());
        assert_eq!(record.holder_name(), "Ivan Petrenko");

        record.first_name = None;
        assert_eq!(record.holder_name(), "Petrenko");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let record = WeaponRecord::new("id-1".to_string(), sample_input());
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"serialNumber\":\"AK47-001\""));
        assert!(json.contains("\"firstName\""));
        assert!(json.contains("\"dateAdded\""));
        assert!(json.contains("\"status\":\"available\""));
    }

    #[test]
    fn test_legacy_record_without_optional_fields() {
        let json = r#"{"id":"1700000000000","serialNumber":"SN1","dateAdded":"2024-01-15T10:00:00.000Z"}"#;
        let record: WeaponRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "1700000000000");
        assert_eq!(record.serial_number.as_deref(), Some("SN1"));
        assert!(record.model.is_none());
        assert_eq!(record.status, WeaponStatus::Available);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("model"));
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        let json = r#"{"serialNumber":"SN1","dateAdded":"2024-01-15T10:00:00Z"}"#;
        assert!(serde_json::from_str::<WeaponRecord>(json).is_err());
    }

    #[test]
    fn test_input_normalized() {
        let input = WeaponInput::new("  SN1 ", "M1\t", " Ivan", "Petrenko  ");
        let normalized = input.normalized();
        assert_eq!(normalized, WeaponInput::new("SN1", "M1", "Ivan", "Petrenko"));
    }

    #[test]
    fn test_input_validate() {
        assert!(sample_input().validate().is_ok());

        let err = WeaponInput::new("SN1", "   ", "Ivan", "")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "model" }));

        let err = WeaponInput::default().validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput {
                field: "serial number"
            }
        ));
    }
}
