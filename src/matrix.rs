//! The student-by-date grade grid for one teacher, subject, and class.
//!
//! Columns are derived from the grades themselves: a date appears as soon as one grade exists on
//! it and never otherwise. Each row carries the student's average over the cells that hold a
//! grade.

use crate::error::Result;
use crate::manager::GradebookManager;
use crate::models::{Grade, Student, Subject, Teacher};
use crate::schema::{grades, students};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};

/// A student's mean grade, or [`Average::NoData`] when they have no grade in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
    Mean(f64),
    NoData,
}

impl Average {
    /// Mean of `values` rounded to two decimals, half away from zero.
    pub fn of(values: &[i32]) -> Self {
        if values.is_empty() {
            return Average::NoData;
        }

        let sum: i64 = values.iter().copied().map(i64::from).sum();
        let mean = sum as f64 / values.len() as f64;
        Average::Mean((mean * 100.0).round() / 100.0)
    }
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Average::Mean(mean) => serializer.serialize_f64(*mean),
            Average::NoData => serializer.serialize_str("-"),
        }
    }
}

/// One (student, date) position. An empty cell is where a new grade may be entered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub date: NaiveDate,
    pub grade: Option<Grade>,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.grade.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRow {
    pub student: Student,
    pub cells: Vec<Cell>,
    pub average: Average,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeMatrix {
    pub subject: Subject,
    pub class_label: String,
    pub columns: Vec<NaiveDate>,
    pub rows: Vec<MatrixRow>,
}

impl GradeMatrix {
    /// Lays out `grades` against `roster`.
    ///
    /// `roster` is taken in display order. When several grades share a (student, date) cell, the
    /// last one in `grades` is kept.
    pub fn assemble(
        subject: Subject,
        class_label: &str,
        roster: Vec<Student>,
        grades: Vec<Grade>,
    ) -> Self {
        let columns: Vec<NaiveDate> = grades
            .iter()
            .map(|grade| grade.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // Last write wins: a later grade for the same cell replaces the earlier one.
        let lookup = grades.into_iter().fold(HashMap::new(), |mut lookup, grade| {
            lookup.insert((grade.student_id, grade.date), grade);
            lookup
        });

        let rows = roster
            .into_iter()
            .map(|student| {
                let cells: Vec<Cell> = columns
                    .iter()
                    .map(|&date| Cell {
                        date,
                        grade: lookup.get(&(student.id, date)).cloned(),
                    })
                    .collect();

                let values: Vec<i32> = cells
                    .iter()
                    .filter_map(|cell| cell.grade.as_ref().map(|grade| grade.value))
                    .collect();

                MatrixRow {
                    student,
                    average: Average::of(&values),
                    cells,
                }
            })
            .collect();

        Self {
            subject,
            class_label: class_label.to_string(),
            columns,
            rows,
        }
    }
}

impl GradebookManager {
    /// Builds the grade grid of `teacher` for one subject and class.
    ///
    /// Fails with [`GradebookError::NotFound`](crate::GradebookError::NotFound) if the subject does
    /// not exist. An unknown class label is not an error and simply has no rows.
    pub fn build_matrix(
        &mut self,
        teacher: &Teacher,
        subject_id: i32,
        class_label: &str,
    ) -> Result<GradeMatrix> {
        let subject = self.get_subject(subject_id)?;
        let roster = self.get_class_roster(class_label)?;

        let class_grades = grades::table
            .inner_join(students::table)
            .filter(grades::teacher_id.eq(teacher.id))
            .filter(grades::subject_id.eq(subject.id))
            .filter(students::class_label.eq(class_label))
            .order(grades::id.asc())
            .select(Grade::as_select())
            .load(&mut self.db)?;

        tracing::debug!(
            teacher = %teacher.username,
            subject = subject.id,
            class_label,
            students = roster.len(),
            grades = class_grades.len(),
            "building grade matrix"
        );

        Ok(GradeMatrix::assemble(subject, class_label, roster, class_grades))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GradebookError;
    use crate::manager::tests::{date, memory_manager, student};

    fn pupil(id: i32, first: &str, last: &str) -> Student {
        Student {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            class_label: "5A".to_string(),
            date_of_birth: None,
        }
    }

    fn grade(id: i32, student_id: i32, day: NaiveDate, value: i32) -> Grade {
        Grade {
            id,
            student_id,
            teacher_id: 1,
            subject_id: 1,
            value,
            comment: None,
            date: day,
        }
    }

    fn math() -> Subject {
        Subject {
            id: 1,
            name: "Math".to_string(),
        }
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        assert_eq!(Average::of(&[80, 90]), Average::Mean(85.0));
        assert_eq!(Average::of(&[81, 82, 82]), Average::Mean(81.67));
        assert_eq!(Average::of(&[]), Average::NoData);
    }

    #[test]
    fn no_data_serializes_as_dash() {
        assert_eq!(serde_json::to_string(&Average::NoData).unwrap(), "\"-\"");
        assert_eq!(serde_json::to_string(&Average::Mean(4.5)).unwrap(), "4.5");
    }

    #[test]
    fn columns_are_sorted_regardless_of_grade_order() {
        let d1 = date(2025, 9, 1);
        let d2 = date(2025, 9, 8);
        let matrix = GradeMatrix::assemble(
            math(),
            "5A",
            vec![pupil(1, "Ann", "Brown")],
            vec![grade(1, 1, d2, 90), grade(2, 1, d1, 80)],
        );

        assert_eq!(matrix.columns, vec![d1, d2]);
        let row = &matrix.rows[0];
        assert_eq!(row.cells[0].grade.as_ref().map(|g| g.value), Some(80));
        assert_eq!(row.cells[1].grade.as_ref().map(|g| g.value), Some(90));
        assert_eq!(row.average, Average::Mean(85.0));
    }

    #[test]
    fn ungraded_students_get_empty_cells_and_no_average() {
        let d1 = date(2025, 9, 1);
        let matrix = GradeMatrix::assemble(
            math(),
            "5A",
            vec![pupil(1, "Ann", "Brown"), pupil(2, "Bob", "Carter")],
            vec![grade(1, 1, d1, 3)],
        );

        let empty = &matrix.rows[1];
        assert_eq!(empty.cells.len(), 1);
        assert!(empty.cells[0].is_empty());
        assert_eq!(empty.average, Average::NoData);
    }

    #[test]
    fn later_duplicate_grade_wins_the_cell() {
        let d1 = date(2025, 9, 1);
        let matrix = GradeMatrix::assemble(
            math(),
            "5A",
            vec![pupil(1, "Ann", "Brown")],
            vec![grade(1, 1, d1, 2), grade(2, 1, d1, 5)],
        );

        assert_eq!(matrix.columns, vec![d1]);
        let kept = matrix.rows[0].cells[0].grade.as_ref().unwrap();
        assert_eq!(kept.id, 2);
        assert_eq!(matrix.rows[0].average, Average::Mean(5.0));
    }

    #[test]
    fn unknown_class_has_no_rows_and_no_columns() {
        let mut manager = memory_manager();
        let teacher = manager.add_teacher("hopper").unwrap();
        let subject = manager.add_subject("Math").unwrap();

        let matrix = manager.build_matrix(&teacher, subject.id, "9Z").unwrap();
        assert!(matrix.rows.is_empty());
        assert!(matrix.columns.is_empty());
    }

    #[test]
    fn missing_subject_is_not_found() {
        let mut manager = memory_manager();
        let teacher = manager.add_teacher("hopper").unwrap();

        assert!(matches!(
            manager.build_matrix(&teacher, 99, "5A"),
            Err(GradebookError::NotFound { entity: "subject", id: 99 })
        ));
    }

    #[test]
    fn matrix_only_shows_this_teacher_subject_and_class() {
        let mut manager = memory_manager();
        let hopper = manager.add_teacher("hopper").unwrap();
        let lovelace = manager.add_teacher("lovelace").unwrap();
        let math = manager.add_subject("Math").unwrap();
        let physics = manager.add_subject("Physics").unwrap();
        let pupils = manager
            .insert_students(&[
                student("Bob", "Carter", "5A"),
                student("Ann", "Brown", "5A"),
                student("Cid", "Adams", "5B"),
            ])
            .unwrap();
        let (carter, brown, adams) = (&pupils[0], &pupils[1], &pupils[2]);

        let d1 = date(2025, 9, 1);
        let d2 = date(2025, 9, 8);
        manager.create_grade(&hopper, math.id, brown.id, d2, 81, None).unwrap();
        manager.create_grade(&hopper, math.id, brown.id, d1, 82, None).unwrap();
        manager.create_grade(&hopper, math.id, carter.id, d2, 82, None).unwrap();
        // None of these belong in hopper's Math 5A grid.
        manager.create_grade(&lovelace, math.id, brown.id, date(2025, 9, 2), 1, None).unwrap();
        manager.create_grade(&hopper, physics.id, brown.id, date(2025, 9, 3), 1, None).unwrap();
        manager.create_grade(&hopper, math.id, adams.id, date(2025, 9, 4), 1, None).unwrap();

        let matrix = manager.build_matrix(&hopper, math.id, "5A").unwrap();

        assert_eq!(matrix.subject, math);
        assert_eq!(matrix.class_label, "5A");
        assert_eq!(matrix.columns, vec![d1, d2]);

        let names: Vec<_> = matrix.rows.iter().map(|r| r.student.last_name.as_str()).collect();
        assert_eq!(names, ["Brown", "Carter"]);

        assert_eq!(matrix.rows[0].average, Average::Mean(81.5));
        assert!(matrix.rows[1].cells[0].is_empty());
        assert_eq!(matrix.rows[1].average, Average::Mean(82.0));
    }
}
