//! Data models for the case dashboard.
//!
//! This module contains the case records as served by the case API and
//! the category/count series built from them for the pie charts.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Label used wherever a value is missing or unknown.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One element of the `/year/<year>` response array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseEnvelope {
    /// The wrapped case.
    pub case: CaseRecord,
}

/// A single reported case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseRecord {
    /// Case number within the police records system.
    #[serde(deserialize_with = "text_or_number")]
    pub case_number: Option<String>,
    /// Whether the case was triggered by a call to 911.
    #[serde(rename = "isCallTo911")]
    pub is_call_to_911: Option<Flag>,
    /// Reported problem.
    pub problem: Option<String>,
    /// Primary offense for the case.
    pub primary_offense: Option<String>,
    /// Date of the case, as sent by the API.
    pub date: Option<String>,
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
    /// Hour of day, 0-23. Negative means unknown.
    pub hour: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<Place>,
    pub precinct: Option<Place>,
    pub neighborhood: Option<Place>,
    /// Present when police force was used.
    pub force: Option<Force>,
}

impl CaseRecord {
    /// Returns the coordinates when both are present and non-zero.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A city, precinct or neighborhood reference. The API sends `{}` when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Use-of-force details attached to a case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Force {
    #[serde(deserialize_with = "text_or_number")]
    pub force_number: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub force_report_number: Option<String>,
    pub force_category: Option<String>,
    pub force_action: Option<String>,
    pub subject: Option<Subject>,
}

/// The subject force was used against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subject {
    pub race: Option<String>,
    pub sex: Option<String>,
    /// Age in years. Negative means unknown.
    #[serde(deserialize_with = "whole_number")]
    pub age: Option<i64>,
    pub was_injured: Option<Flag>,
    pub role: Option<String>,
    #[serde(alias = "role_number", deserialize_with = "text_or_number")]
    pub role_number: Option<String>,
    pub resistance: Option<String>,
}

/// A loosely typed yes/no value. The API sends booleans or text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    /// Whether the flag carries a displayable value.
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Bool(b) => write!(f, "{}", b),
            Flag::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Response of the `/year` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableYears {
    /// Years with case data, normalized to strings.
    #[serde(default, deserialize_with = "years_as_strings")]
    pub available_years: Vec<String>,
}

fn years_as_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearValue {
        Number(i64),
        Text(String),
    }

    let values = Vec::<YearValue>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            YearValue::Number(n) => n.to_string(),
            YearValue::Text(s) => s,
        })
        .collect())
}

/// A scalar the API may send as text or as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Identifier fields come straight from database columns, so accept numbers too.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|v| match v {
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Text(s) => s,
    }))
}

/// Accepts integers and floats, truncating the latter. Text that does not
/// parse as a number is treated as absent.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.and_then(|v| match v {
        Scalar::Integer(n) => Some(n),
        Scalar::Float(n) => Some(n.trunc() as i64),
        Scalar::Text(s) => s.trim().parse::<f64>().ok().map(|n| n.trunc() as i64),
    }))
}

/// Demographic dimension a series is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Race,
    Sex,
    AgeGroup,
}

impl Dimension {
    /// All dimensions, in chart display order.
    pub const ALL: [Dimension; 3] = [Dimension::Race, Dimension::Sex, Dimension::AgeGroup];

    /// Field name the chart binds to the pie category.
    pub fn category_field(&self) -> &'static str {
        match self {
            Dimension::Race => "race",
            Dimension::Sex => "sex",
            Dimension::AgeGroup => "ageGroup",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Race => write!(f, "Race"),
            Dimension::Sex => write!(f, "Sex"),
            Dimension::AgeGroup => write!(f, "Age Group"),
        }
    }
}

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub category: String,
    /// Always at least 1.
    pub count: usize,
}

/// An ordered category/count series for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub category_field: String,
    pub value_field: String,
    pub data: Vec<SeriesEntry>,
}

impl Series {
    /// Creates a series bound to the dimension's category field and `count`.
    pub fn new(dimension: Dimension, data: Vec<SeriesEntry>) -> Self {
        Self {
            category_field: dimension.category_field().to_string(),
            value_field: "count".to_string(),
            data,
        }
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.data.iter().map(|e| e.count).sum()
    }
}

/// Result of aggregating one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SeriesOutcome {
    /// At least one record qualified.
    Series(Series),
    /// No record qualified; the chart should be suppressed.
    NoData,
}

impl SeriesOutcome {
    /// Wraps `entries`, yielding `NoData` when empty.
    pub fn from_entries(dimension: Dimension, entries: Vec<SeriesEntry>) -> Self {
        if entries.is_empty() {
            SeriesOutcome::NoData
        } else {
            SeriesOutcome::Series(Series::new(dimension, entries))
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, SeriesOutcome::NoData)
    }

    pub fn series(&self) -> Option<&Series> {
        match self {
            SeriesOutcome::Series(s) => Some(s),
            SeriesOutcome::NoData => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_envelope_decodes_camel_case() {
        let json = r#"{"case": {
            "caseNumber": "MP-2019-001",
            "isCallTo911": true,
            "hour": 13,
            "latitude": 44.97,
            "longitude": -93.26,
            "city": {"id": 1, "name": "Minneapolis"},
            "precinct": {},
            "force": {
                "forceAction": "Bodily Force",
                "subject": {"race": "White", "sex": "Male", "age": 31, "role_number": "1"}
            }
        }}"#;

        let envelope: CaseEnvelope = serde_json::from_str(json).unwrap();
        let case = envelope.case;
        assert_eq!(case.case_number.as_deref(), Some("MP-2019-001"));
        assert_eq!(case.is_call_to_911, Some(Flag::Bool(true)));
        assert_eq!(case.hour, Some(13));
        assert!(case.precinct.unwrap().name.is_none());

        let subject = case.force.as_ref().and_then(|f| f.subject.as_ref()).unwrap();
        assert_eq!(subject.race.as_deref(), Some("White"));
        assert_eq!(subject.age, Some(31));
        assert_eq!(subject.role_number.as_deref(), Some("1"));
    }

    #[test]
    fn test_numeric_identifiers_and_float_age_still_aggregate() {
        let json = r#"[
            {"case": {
                "caseNumber": 190012,
                "force": {
                    "forceNumber": 7,
                    "forceReportNumber": 1,
                    "subject": {"race": "Black", "sex": "Male", "age": 25.0, "role_number": 2}
                }
            }},
            {"case": {
                "caseNumber": "190013",
                "force": {"subject": {"race": "White", "sex": "Female", "age": "37"}}
            }}
        ]"#;

        let envelopes: Vec<CaseEnvelope> = serde_json::from_str(json).unwrap();
        let cases: Vec<CaseRecord> = envelopes.into_iter().map(|e| e.case).collect();

        assert_eq!(cases[0].case_number.as_deref(), Some("190012"));
        let force = cases[0].force.as_ref().unwrap();
        assert_eq!(force.force_number.as_deref(), Some("7"));
        assert_eq!(force.force_report_number.as_deref(), Some("1"));
        let subject = force.subject.as_ref().unwrap();
        assert_eq!(subject.age, Some(25));
        assert_eq!(subject.role_number.as_deref(), Some("2"));

        let ages = crate::analysis::aggregate_by_age_group(&cases);
        let categories: Vec<_> = ages
            .series()
            .unwrap()
            .data
            .iter()
            .map(|e| (e.category.as_str(), e.count))
            .collect();
        assert_eq!(categories, vec![("20-30", 1), ("30-40", 1)]);

        let races = crate::analysis::aggregate_by_race(&cases);
        assert_eq!(races.series().unwrap().total(), 2);
    }

    #[test]
    fn test_null_identifiers_decode_as_absent() {
        let force: Force =
            serde_json::from_str(r#"{"forceNumber": null, "subject": {"age": null}}"#).unwrap();
        assert!(force.force_number.is_none());
        assert!(force.subject.unwrap().age.is_none());
    }

    #[test]
    fn test_empty_force_has_no_subject() {
        let case: CaseRecord = serde_json::from_str(r#"{"force": {}}"#).unwrap();
        let force = case.force.unwrap();
        assert!(force.subject.is_none());
    }

    #[test]
    fn test_location_requires_both_coordinates() {
        let mut case = CaseRecord {
            latitude: Some(44.9),
            longitude: Some(-93.2),
            ..Default::default()
        };
        assert_eq!(case.location(), Some((44.9, -93.2)));

        case.longitude = Some(0.0);
        assert!(case.location().is_none());

        case.longitude = None;
        assert!(case.location().is_none());
    }

    #[test]
    fn test_available_years_accepts_numbers_and_strings() {
        let years: AvailableYears =
            serde_json::from_str(r#"{"availableYears": [2017, "2018", 2019]}"#).unwrap();
        assert_eq!(years.available_years, vec!["2017", "2018", "2019"]);
    }

    #[test]
    fn test_series_outcome_from_empty_entries() {
        let outcome = SeriesOutcome::from_entries(Dimension::Race, Vec::new());
        assert!(outcome.is_no_data());
        assert!(outcome.series().is_none());
    }

    #[test]
    fn test_series_binds_category_field() {
        let outcome = SeriesOutcome::from_entries(
            Dimension::AgeGroup,
            vec![SeriesEntry {
                category: "0-10".to_string(),
                count: 2,
            }],
        );
        let series = outcome.series().unwrap();
        assert_eq!(series.category_field, "ageGroup");
        assert_eq!(series.value_field, "count");
        assert_eq!(series.total(), 2);
    }
}
