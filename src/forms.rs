//! Validation of grade submissions.
//!
//! Forms arrive with every field as optional text. Problems are reported per field through
//! [`FieldErrors`] so that a client can redisplay the form next to its messages.

use crate::error::{FieldErrors, GradebookError, Result};
use crate::models::Student;
use chrono::NaiveDate;
use serde::Deserialize;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_A_NUMBER: &str = "Enter a whole number.";
pub const NOT_A_DATE: &str = "Enter a valid date.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Dates travel as `YYYY-MM-DD`, both in forms and in URLs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The editable part of a grade: used when editing and for single-cell entry.
#[derive(Debug, Default, Deserialize)]
pub struct GradeValueForm {
    pub value: Option<String>,
    pub comment: Option<String>,
}

/// Generic entry: the student and date are chosen in the form as well.
#[derive(Debug, Default, Deserialize)]
pub struct GradeEntryForm {
    pub student: Option<String>,
    pub date: Option<String>,
    pub value: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeValue {
    pub value: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeEntry {
    pub student_id: i32,
    pub date: NaiveDate,
    pub grade: GradeValue,
}

impl GradeValueForm {
    pub fn validate(&self) -> Result<GradeValue> {
        let value = parse_value(self.value.as_deref())
            .map_err(|msg| GradebookError::invalid("value", msg))?;

        Ok(GradeValue {
            value,
            comment: clean_comment(self.comment.as_deref()),
        })
    }
}

impl GradeEntryForm {
    /// Validates the submission, accepting only students from `choices`.
    pub fn validate(&self, choices: &[Student]) -> Result<GradeEntry> {
        let student_id = present(self.student.as_deref())
            .ok_or(REQUIRED)
            .and_then(|raw| match raw.parse::<i32>() {
                Ok(id) if choices.iter().any(|s| s.id == id) => Ok(id),
                _ => Err(INVALID_CHOICE),
            });
        let date = present(self.date.as_deref())
            .ok_or(REQUIRED)
            .and_then(|raw| parse_date(raw).ok_or(NOT_A_DATE));
        let value = parse_value(self.value.as_deref());

        match (student_id, date, value) {
            (Ok(student_id), Ok(date), Ok(value)) => Ok(GradeEntry {
                student_id,
                date,
                grade: GradeValue {
                    value,
                    comment: clean_comment(self.comment.as_deref()),
                },
            }),
            (student_id, date, value) => {
                let mut errors = FieldErrors::new();
                if let Err(msg) = student_id {
                    errors.add("student", msg);
                }
                if let Err(msg) = date {
                    errors.add("date", msg);
                }
                if let Err(msg) = value {
                    errors.add("value", msg);
                }
                Err(GradebookError::Validation(errors))
            }
        }
    }
}

/// Parses a `YYYY-MM-DD` date taken from a URL segment.
pub fn parse_path_date(raw: &str) -> Result<NaiveDate> {
    parse_date(raw.trim()).ok_or_else(|| GradebookError::invalid("date", NOT_A_DATE))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn parse_value(raw: Option<&str>) -> std::result::Result<i32, &'static str> {
    present(raw)
        .ok_or(REQUIRED)?
        .parse::<i32>()
        .map_err(|_| NOT_A_NUMBER)
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn clean_comment(raw: Option<&str>) -> Option<String> {
    present(raw).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Student> {
        vec![Student {
            id: 4,
            first_name: "Ann".to_string(),
            last_name: "Brown".to_string(),
            class_label: "5A".to_string(),
            date_of_birth: None,
        }]
    }

    fn field_errors(result: Result<impl std::fmt::Debug>) -> FieldErrors {
        match result {
            Err(GradebookError::Validation(errors)) => errors,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn value_form_accepts_negative_integers_and_drops_blank_comments() {
        let form = GradeValueForm {
            value: Some(" -3 ".to_string()),
            comment: Some("   ".to_string()),
        };
        assert_eq!(
            form.validate().unwrap(),
            GradeValue {
                value: -3,
                comment: None
            }
        );
    }

    #[test]
    fn value_form_rejects_missing_and_malformed_values() {
        let missing = field_errors(GradeValueForm::default().validate());
        assert_eq!(missing.get("value"), Some(&[REQUIRED.to_string()][..]));

        let malformed = field_errors(
            GradeValueForm {
                value: Some("4.5".to_string()),
                comment: None,
            }
            .validate(),
        );
        assert_eq!(malformed.get("value"), Some(&[NOT_A_NUMBER.to_string()][..]));
    }

    #[test]
    fn entry_form_reports_every_bad_field() {
        let form = GradeEntryForm {
            student: Some("99".to_string()),
            date: Some("01/09/2025".to_string()),
            value: None,
            comment: None,
        };
        let errors = field_errors(form.validate(&roster()));

        assert_eq!(errors.get("student"), Some(&[INVALID_CHOICE.to_string()][..]));
        assert_eq!(errors.get("date"), Some(&[NOT_A_DATE.to_string()][..]));
        assert_eq!(errors.get("value"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn entry_form_accepts_a_student_from_the_class() {
        let form = GradeEntryForm {
            student: Some("4".to_string()),
            date: Some("2025-09-01".to_string()),
            value: Some("5".to_string()),
            comment: Some("well done".to_string()),
        };
        let entry = form.validate(&roster()).unwrap();

        assert_eq!(entry.student_id, 4);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(entry.grade.value, 5);
        assert_eq!(entry.grade.comment.as_deref(), Some("well done"));
    }

    #[test]
    fn path_dates_must_be_iso() {
        assert!(parse_path_date("2025-09-01").is_ok());
        assert!(matches!(
            parse_path_date("yesterday"),
            Err(GradebookError::Validation(_))
        ));
    }
}
