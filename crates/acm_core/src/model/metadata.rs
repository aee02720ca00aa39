//! Report metadata block.
//!
//! # Responsibility
//! - Hold the five header fields describing the organization under review.
//! - Map field keys to wire names, labels, input kinds and hints.
//! - Carry the guidance note shown on the configuration view.
//!
//! # Invariants
//! - Metadata is a singleton per `AppState`; it has no identity of its own.
//! - Wire names match the persisted/exported JSON schema exactly.
//! - Date fields are stored as entered (`YYYY-MM-DD` from date pickers);
//!   the input kind is a host hint, not a validation rule.

use serde::{Deserialize, Serialize};

/// Guidance shown below the configuration form.
pub const CONFIGURATION_NOTE: &str = "This section establishes the context for the CMMC audit. \
The Date for Next Review is crucial for demonstrating the \"maintenance\" aspect of maturity \
in CMMC (AC.L2-3.1.1). Ensure all physical locations processing CUI are listed.";

/// Header fields for the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportMetadata {
    pub organization_name: String,
    pub author: String,
    /// Physical facilities processing CUI, free-form list.
    pub facilities: String,
    pub date_completed: String,
    pub next_review_date: String,
}

impl ReportMetadata {
    /// Returns the current value for one field.
    pub fn get(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::OrganizationName => &self.organization_name,
            MetadataField::Author => &self.author,
            MetadataField::Facilities => &self.facilities,
            MetadataField::DateCompleted => &self.date_completed,
            MetadataField::NextReviewDate => &self.next_review_date,
        }
    }

    /// Returns a copy with exactly one field replaced.
    pub fn with_field(&self, field: MetadataField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            MetadataField::OrganizationName => next.organization_name = value,
            MetadataField::Author => next.author = value,
            MetadataField::Facilities => next.facilities = value,
            MetadataField::DateCompleted => next.date_completed = value,
            MetadataField::NextReviewDate => next.next_review_date = value,
        }
        next
    }
}

/// Key of one metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    OrganizationName,
    Author,
    Facilities,
    DateCompleted,
    NextReviewDate,
}

impl MetadataField {
    /// All fields in configuration-form order.
    pub const ALL: [MetadataField; 5] = [
        MetadataField::OrganizationName,
        MetadataField::Author,
        MetadataField::Facilities,
        MetadataField::DateCompleted,
        MetadataField::NextReviewDate,
    ];

    /// Stable key used in the persisted JSON blob.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::OrganizationName => "organizationName",
            Self::Author => "author",
            Self::Facilities => "facilities",
            Self::DateCompleted => "dateCompleted",
            Self::NextReviewDate => "nextReviewDate",
        }
    }

    /// Label shown on the configuration form.
    pub fn label(self) -> &'static str {
        match self {
            Self::OrganizationName => "Organization Name",
            Self::Author => "Author / Completed By",
            Self::Facilities => "List of Physical Facilities",
            Self::DateCompleted => "Date Completed",
            Self::NextReviewDate => "Date for Next Review",
        }
    }

    /// Input hint shown on the configuration form.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::OrganizationName => Some("e.g. Acme Cyber Defense"),
            Self::Author => Some("e.g. Jane Doe, CISO"),
            Self::Facilities => Some("e.g. HQ (New York), Data Center (Virginia)..."),
            Self::DateCompleted | Self::NextReviewDate => None,
        }
    }

    pub fn input(self) -> MetadataInput {
        match self {
            Self::DateCompleted | Self::NextReviewDate => MetadataInput::Date,
            Self::OrganizationName | Self::Author | Self::Facilities => MetadataInput::Text,
        }
    }
}

/// Kind of input a host should render for a metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataInput {
    Text,
    Date,
}

impl MetadataInput {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
        }
    }
}

/// Parses a metadata field from its wire name.
///
/// Accepts the exact wire name or a kebab/snake-case spelling of it, so CLI
/// callers can write `next-review-date`.
pub fn parse_metadata_field(value: &str) -> Option<MetadataField> {
    let compact = value
        .trim()
        .chars()
        .filter(|ch| *ch != '-' && *ch != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    MetadataField::ALL
        .into_iter()
        .find(|field| field.wire_name().to_ascii_lowercase() == compact)
}

#[cfg(test)]
mod tests {
    use super::{
        parse_metadata_field, MetadataField, MetadataInput, ReportMetadata, CONFIGURATION_NOTE,
    };

    #[test]
    fn with_field_replaces_only_target_field() {
        let base = ReportMetadata {
            organization_name: "Acme".to_string(),
            author: "Jane".to_string(),
            ..ReportMetadata::default()
        };

        let next = base.with_field(MetadataField::Author, "John");
        assert_eq!(next.author, "John");
        assert_eq!(next.organization_name, "Acme");
        assert_eq!(base.author, "Jane");
    }

    #[test]
    fn parse_accepts_wire_and_cli_spellings() {
        assert_eq!(
            parse_metadata_field("nextReviewDate"),
            Some(MetadataField::NextReviewDate)
        );
        assert_eq!(
            parse_metadata_field("organization-name"),
            Some(MetadataField::OrganizationName)
        );
        assert_eq!(
            parse_metadata_field("date_completed"),
            Some(MetadataField::DateCompleted)
        );
        assert_eq!(parse_metadata_field("owner"), None);
    }

    #[test]
    fn serialization_uses_camel_case_wire_names() {
        let json = serde_json::to_value(ReportMetadata::default()).unwrap();
        for field in MetadataField::ALL {
            assert_eq!(json[field.wire_name()], "");
        }
    }

    #[test]
    fn only_review_dates_use_date_inputs() {
        let dates = MetadataField::ALL
            .into_iter()
            .filter(|field| field.input() == MetadataInput::Date)
            .collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![MetadataField::DateCompleted, MetadataField::NextReviewDate]
        );
        assert_eq!(MetadataField::Facilities.input().as_str(), "text");
    }

    #[test]
    fn configuration_note_mentions_review_date_control() {
        assert!(CONFIGURATION_NOTE.contains("Date for Next Review"));
        assert!(CONFIGURATION_NOTE.contains("AC.L2-3.1.1"));
    }
}
