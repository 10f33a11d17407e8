use crate::error::{GradebookError, Result};
use crate::models::{
    Grade, GradeChanges, NewGrade, NewStudent, NewSubject, NewTeacher, Student, Subject, Teacher,
};
use crate::schema;
use chrono::NaiveDate;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use uuid::Uuid;

/// The schema shipped with the crate, applied whenever a connection is opened.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// The manager for recording, modifying, and retrieving gradebook data.
pub struct GradebookManager {
    pub(crate) db: SqliteConnection,
}

impl GradebookManager {
    /// Opens the `sqlite3` database at `database_url` and brings its schema up to date.
    ///
    /// `":memory:"` gives a private throwaway database.
    pub fn open(database_url: &str) -> Result<Self> {
        let mut connection = SqliteConnection::establish(database_url)?;

        // SQLite only enforces the cascade/restrict rules on `grades` with this pragma set.
        connection.batch_execute("PRAGMA foreign_keys = ON")?;

        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| GradebookError::Migration(e.to_string()))?;
        if !applied.is_empty() {
            tracing::info!(count = applied.len(), "applied database migrations");
        }

        Ok(Self { db: connection })
    }

    /// Registers a teacher and issues them a fresh session token.
    pub fn add_teacher(&mut self, new_username: &str) -> Result<Teacher> {
        let issued = Uuid::new_v4().simple().to_string();

        let teacher = diesel::insert_into(schema::teachers::table)
            .values(NewTeacher {
                username: new_username,
                token: &issued,
            })
            .returning(Teacher::as_returning())
            .get_result(&mut self.db)?;

        tracing::info!(teacher = %teacher.username, "registered teacher");
        Ok(teacher)
    }

    /// Resolves a session token to the teacher it was issued to.
    pub fn find_teacher_by_token(&mut self, session_token: &str) -> Result<Option<Teacher>> {
        use schema::teachers::dsl::*;

        Ok(teachers
            .filter(token.eq(session_token))
            .select(Teacher::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    pub fn get_teacher_by_username(&mut self, name: &str) -> Result<Option<Teacher>> {
        use schema::teachers::dsl::*;

        Ok(teachers
            .filter(username.eq(name))
            .select(Teacher::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    pub fn add_subject(&mut self, subject_name: &str) -> Result<Subject> {
        Ok(diesel::insert_into(schema::subjects::table)
            .values(NewSubject { name: subject_name })
            .returning(Subject::as_returning())
            .get_result(&mut self.db)?)
    }

    /// Retrieves a subject, failing with [`GradebookError::NotFound`] if it does not exist.
    pub fn get_subject(&mut self, subject_id: i32) -> Result<Subject> {
        schema::subjects::table
            .find(subject_id)
            .select(Subject::as_select())
            .first(&mut self.db)
            .optional()?
            .ok_or_else(|| GradebookError::not_found("subject", subject_id))
    }

    pub fn list_subjects(&mut self) -> Result<Vec<Subject>> {
        use schema::subjects::dsl::*;

        Ok(subjects
            .order((name.asc(), id.asc()))
            .select(Subject::as_select())
            .load(&mut self.db)?)
    }

    /// Inserts students into the database, returning them with their new IDs.
    pub fn insert_students(&mut self, new_students: &[NewStudent]) -> Result<Vec<Student>> {
        let inserted = self.db.transaction(|conn| {
            new_students
                .iter()
                .map(|student| {
                    diesel::insert_into(schema::students::table)
                        .values(student)
                        .returning(Student::as_returning())
                        .get_result(conn)
                })
                .collect::<QueryResult<Vec<Student>>>()
        })?;

        tracing::info!(count = inserted.len(), "inserted students");
        Ok(inserted)
    }

    /// Retrieves a specific student based on their ID.
    pub fn get_student(&mut self, student_id: i32) -> Result<Student> {
        schema::students::table
            .find(student_id)
            .select(Student::as_select())
            .first(&mut self.db)
            .optional()?
            .ok_or_else(|| GradebookError::not_found("student", student_id))
    }

    /// Retrieves every student in a class, ordered by last name and then first name.
    ///
    /// Names compare by SQLite's binary collation, so ordering is case-sensitive.
    pub fn get_class_roster(&mut self, label: &str) -> Result<Vec<Student>> {
        use schema::students::dsl::*;

        Ok(students
            .filter(class_label.eq(label))
            .order((last_name.asc(), first_name.asc(), id.asc()))
            .select(Student::as_select())
            .load(&mut self.db)?)
    }

    /// Removes and returns a student. Their grades go with them.
    pub fn delete_student(&mut self, student_id: i32) -> Result<Student> {
        let deleted = diesel::delete(schema::students::table.find(student_id))
            .returning(Student::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| GradebookError::not_found("student", student_id))?;

        tracing::info!(student = deleted.id, "deleted student");
        Ok(deleted)
    }

    pub fn delete_subject(&mut self, subject_id: i32) -> Result<Subject> {
        diesel::delete(schema::subjects::table.find(subject_id))
            .returning(Subject::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| GradebookError::not_found("subject", subject_id))
    }

    /// Retrieves a single grade by its ID.
    pub fn get_grade(&mut self, grade_id: i32) -> Result<Grade> {
        schema::grades::table
            .find(grade_id)
            .select(Grade::as_select())
            .first(&mut self.db)
            .optional()?
            .ok_or_else(|| GradebookError::not_found("grade", grade_id))
    }

    /// Records a new grade issued by `teacher`.
    ///
    /// Both the subject and the student must exist; nothing is written otherwise. `date` is stored
    /// as given. Any integer `value` is accepted.
    pub fn create_grade(
        &mut self,
        teacher: &Teacher,
        subject_id: i32,
        student_id: i32,
        date: NaiveDate,
        value: i32,
        comment: Option<&str>,
    ) -> Result<Grade> {
        let subject = self.get_subject(subject_id)?;
        let student = self.get_student(student_id)?;

        let grade = diesel::insert_into(schema::grades::table)
            .values(NewGrade {
                student_id: student.id,
                teacher_id: teacher.id,
                subject_id: subject.id,
                value,
                comment: non_blank(comment),
                date,
            })
            .returning(Grade::as_returning())
            .get_result(&mut self.db)?;

        tracing::info!(
            grade = grade.id,
            teacher = %teacher.username,
            subject = subject.id,
            student = student.id,
            %date,
            "recorded grade"
        );
        Ok(grade)
    }

    /// Overwrites the value and comment of an existing grade.
    ///
    /// Student, subject, teacher and date never change here. Any logged-in teacher may edit any
    /// grade; the issuing teacher is not checked.
    pub fn update_grade(
        &mut self,
        grade_id: i32,
        value: i32,
        comment: Option<&str>,
    ) -> Result<Grade> {
        let grade = diesel::update(schema::grades::table.find(grade_id))
            .set(GradeChanges {
                value,
                comment: non_blank(comment),
            })
            .returning(Grade::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| GradebookError::not_found("grade", grade_id))?;

        tracing::info!(grade = grade.id, value, "updated grade");
        Ok(grade)
    }
}

/// Blank comments are stored as `NULL`.
fn non_blank(comment: Option<&str>) -> Option<&str> {
    comment.map(str::trim).filter(|c| !c.is_empty())
}
