//! Formatting helpers for case details.

use crate::models::{CaseRecord, Flag, UNKNOWN_LABEL};

/// Format an hour of day in 12-hour form, e.g. `0` -> `"12AM"`, `13` -> `"1PM"`.
///
/// Negative hours are unknown.
pub fn format_hour(hour: i64) -> String {
    if hour < 0 {
        return UNKNOWN_LABEL.to_string();
    }

    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };

    format!("{}{}", display, suffix)
}

/// Format a case date as `M/D/YYYY`, or `"Unknown"` unless all parts are positive.
pub fn format_date(year: Option<i64>, month: Option<i64>, day: Option<i64>) -> String {
    match (year, month, day) {
        (Some(y), Some(m), Some(d)) if y > 0 && m > 0 && d > 0 => format!("{}/{}/{}", m, d, y),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// Returns the text, or `"Unknown"` when missing or empty.
pub fn text_or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(UNKNOWN_LABEL)
}

fn flag_or_unknown(flag: Option<&Flag>) -> String {
    match flag {
        Some(f) if f.is_set() => f.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// Render the details of one case as `Label: value` lines.
///
/// Force and subject sections are included only when present.
pub fn case_details(case: &CaseRecord) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Case #{}",
        text_or_unknown(case.case_number.as_deref())
    ));
    lines.push(format!(
        "Date: {}",
        format_date(case.year, case.month, case.day)
    ));
    lines.push(format!(
        "Hour: {}",
        case.hour
            .map(format_hour)
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    ));
    lines.push(format!(
        "Reported Problem: {}",
        text_or_unknown(case.problem.as_deref())
    ));
    lines.push(format!(
        "911 Call: {}",
        flag_or_unknown(case.is_call_to_911.as_ref())
    ));

    let Some(force) = case.force.as_ref() else {
        return lines;
    };

    lines.push(format!(
        "Action: {}",
        text_or_unknown(force.force_action.as_deref())
    ));
    lines.push(format!(
        "Category: {}",
        text_or_unknown(force.force_category.as_deref())
    ));

    let Some(subject) = force.subject.as_ref() else {
        return lines;
    };

    // Zero is treated as unrecorded, like any other blank value.
    let age = match subject.age {
        Some(age) if age > 0 => age.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    };
    lines.push(format!("Age: {}", age));
    lines.push(format!("Sex: {}", text_or_unknown(subject.sex.as_deref())));
    lines.push(format!("Race: {}", text_or_unknown(subject.race.as_deref())));
    lines.push(format!(
        "Primary Offense: {}",
        text_or_unknown(case.primary_offense.as_deref())
    ));
    lines.push(format!(
        "Resistance: {}",
        text_or_unknown(subject.resistance.as_deref())
    ));
    lines.push(format!(
        "Injured: {}",
        flag_or_unknown(subject.was_injured.as_ref())
    ));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Force, Subject};

    #[test]
    fn test_format_hour() {
        assert_eq!(format_hour(0), "12AM");
        assert_eq!(format_hour(1), "1AM");
        assert_eq!(format_hour(11), "11AM");
        assert_eq!(format_hour(12), "12PM");
        assert_eq!(format_hour(13), "1PM");
        assert_eq!(format_hour(23), "11PM");
        assert_eq!(format_hour(-5), "Unknown");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some(2019), Some(7), Some(4)), "7/4/2019");
        assert_eq!(format_date(Some(2019), Some(0), Some(4)), "Unknown");
        assert_eq!(format_date(None, Some(7), Some(4)), "Unknown");
    }

    #[test]
    fn test_text_or_unknown() {
        assert_eq!(text_or_unknown(Some("Theft")), "Theft");
        assert_eq!(text_or_unknown(Some("")), "Unknown");
        assert_eq!(text_or_unknown(None), "Unknown");
    }

    #[test]
    fn test_case_details_without_force() {
        let case = CaseRecord {
            case_number: Some("19-100".to_string()),
            hour: Some(0),
            is_call_to_911: Some(Flag::Bool(false)),
            ..Default::default()
        };

        let lines = case_details(&case);

        assert_eq!(lines[0], "Case #19-100");
        assert!(lines.contains(&"Hour: 12AM".to_string()));
        assert!(lines.contains(&"911 Call: Unknown".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Action:")));
    }

    #[test]
    fn test_case_details_with_subject() {
        let case = CaseRecord {
            force: Some(Force {
                force_action: Some("Bodily Force".to_string()),
                subject: Some(Subject {
                    age: Some(-1),
                    race: Some("White".to_string()),
                    was_injured: Some(Flag::Text("Yes".to_string())),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let lines = case_details(&case);

        assert!(lines.contains(&"Action: Bodily Force".to_string()));
        assert!(lines.contains(&"Category: Unknown".to_string()));
        assert!(lines.contains(&"Age: Unknown".to_string()));
        assert!(lines.contains(&"Race: White".to_string()));
        assert!(lines.contains(&"Injured: Yes".to_string()));
    }

    #[test]
    fn test_case_details_zero_age_is_unknown() {
        let with_age = |age| CaseRecord {
            force: Some(Force {
                subject: Some(Subject {
                    age: Some(age),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(case_details(&with_age(0)).contains(&"Age: Unknown".to_string()));
        assert!(case_details(&with_age(1)).contains(&"Age: 1".to_string()));
    }
}
