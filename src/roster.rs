//! Reading student rosters from CSV files.
//!
//! A roster has the header `first_name,last_name,class_label,date_of_birth`. Dates of birth are
//! `YYYY-MM-DD` and may be left empty.

use crate::models::NewStudent;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Reads every student from the roster at `path`.
pub fn read_roster(path: &Path) -> Result<Vec<NewStudent>> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("could not open roster {}", path.display()))?;

    parse_roster(reader).with_context(|| format!("could not read roster {}", path.display()))
}

fn parse_roster<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<NewStudent>> {
    let mut students = Vec::new();

    for (line, record) in reader.deserialize::<NewStudent>().enumerate() {
        // Line 1 is the header.
        let student = record.with_context(|| format!("bad roster entry on line {}", line + 2))?;
        students.push(NewStudent {
            first_name: student.first_name.trim().to_string(),
            last_name: student.last_name.trim().to_string(),
            class_label: student.class_label.trim().to_string(),
            date_of_birth: student.date_of_birth,
        });
    }

    Ok(students)
}
