use crate::schema::{grades, students, subjects, teachers};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// An authenticated user who issues grades.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = teachers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Teacher {
    pub id: i32,
    pub username: String,
    /// Session token, never sent back to clients.
    #[serde(skip)]
    pub token: String,
}

#[derive(Insertable)]
#[diesel(table_name = teachers)]
pub struct NewTeacher<'a> {
    pub username: &'a str,
    pub token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Subject {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = subjects)]
pub struct NewSubject<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Free-text class grouping such as `5A`.
    pub class_label: String,
    pub date_of_birth: Option<NaiveDate>,
}

/// A student row as it arrives from a roster file or the command line.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, Deserialize)]
#[diesel(table_name = students)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub class_label: String,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = grades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Grade {
    pub id: i32,
    pub student_id: i32,
    pub teacher_id: i32,
    pub subject_id: i32,
    pub value: i32,
    pub comment: Option<String>,
    /// The day the grade was given.
    pub date: NaiveDate,
}

#[derive(Insertable)]
#[diesel(table_name = grades)]
pub struct NewGrade<'a> {
    pub student_id: i32,
    pub teacher_id: i32,
    pub subject_id: i32,
    pub value: i32,
    pub comment: Option<&'a str>,
    pub date: NaiveDate,
}

/// The only columns of a grade that may change after it is recorded.
#[derive(AsChangeset)]
#[diesel(table_name = grades)]
#[diesel(treat_none_as_null = true)]
pub struct GradeChanges<'a> {
    pub value: i32,
    pub comment: Option<&'a str>,
}
