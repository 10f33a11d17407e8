use axum::Json;
use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;
use std::sync::Arc;

use super::session::CurrentTeacher;
use super::{AppState, matrix_path};
use crate::error::GradebookError;
use crate::forms::{GradeEntryForm, GradeValueForm, parse_path_date};

type HandlerResult = Result<Response, GradebookError>;

/// Subject and class pairs the current teacher has graded.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    CurrentTeacher(teacher): CurrentTeacher,
) -> HandlerResult {
    let (teacher, combos) = state
        .with_manager(move |m| {
            let combos = m.list_taught_combinations(&teacher)?;
            Ok((teacher, combos))
        })
        .await?;

    Ok(Json(json!({
        "teacher": teacher.username,
        "combos": combos,
    }))
    .into_response())
}

/// The grade matrix of the current teacher for one subject and class.
pub async fn subject_class_detail(
    State(state): State<Arc<AppState>>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path((subject_id, class_label)): Path<(i32, String)>,
) -> HandlerResult {
    let matrix = state
        .with_manager(move |m| m.build_matrix(&teacher, subject_id, &class_label))
        .await?;

    Ok(Json(matrix).into_response())
}

pub async fn grade_edit_form(
    State(state): State<Arc<AppState>>,
    CurrentTeacher(_): CurrentTeacher,
    Path(grade_id): Path<i32>,
) -> HandlerResult {
    let grade = state.with_manager(move |m| m.get_grade(grade_id)).await?;

    Ok(Json(json!({ "grade": grade })).into_response())
}

/// Updates the value and comment of a grade, whoever issued it.
pub async fn grade_edit(
    State(state): State<Arc<AppState>>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(grade_id): Path<i32>,
    Form(form): Form<GradeValueForm>,
) -> HandlerResult {
    let (grade, class_label) = state
        .with_manager(move |m| {
            // An unknown grade is reported before anything about the submission.
            m.get_grade(grade_id)?;
            let submitted = form.validate()?;
            let grade = m.update_grade(grade_id, submitted.value, submitted.comment.as_deref())?;
            let student = m.get_student(grade.student_id)?;
            Ok((grade, student.class_label))
        })
        .await?;

    tracing::debug!(teacher = %teacher.username, grade = grade.id, "grade edited");
    Ok(Redirect::to(&matrix_path(grade.subject_id, &class_label)).into_response())
}

pub async fn grade_create_cell_form(
    State(state): State<Arc<AppState>>,
    CurrentTeacher(_): CurrentTeacher,
    Path((subject_id, class_label, student_id, grade_date)): Path<(i32, String, i32, String)>,
) -> HandlerResult {
    let date = parse_path_date(&grade_date)?;
    let subject = state.with_manager(move |m| m.get_subject(subject_id)).await?;

    Ok(Json(json!({
        "subject": subject,
        "class_label": class_label,
        "initial": { "student": student_id, "date": date },
    }))
    .into_response())
}

/// Records a grade in one empty cell of the matrix: the student and date come from the URL.
pub async fn grade_create_cell(
    State(state): State<Arc<AppState>>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path((subject_id, class_label, student_id, grade_date)): Path<(i32, String, i32, String)>,
    Form(form): Form<GradeValueForm>,
) -> HandlerResult {
    let date = parse_path_date(&grade_date)?;
    let submitted = form.validate()?;

    state
        .with_manager(move |m| {
            m.create_grade(
                &teacher,
                subject_id,
                student_id,
                date,
                submitted.value,
                submitted.comment.as_deref(),
            )
        })
        .await?;

    Ok(Redirect::to(&matrix_path(subject_id, &class_label)).into_response())
}

/// The generic entry form: students to choose from are those of the class.
pub async fn grade_create_generic_form(
    State(state): State<Arc<AppState>>,
    CurrentTeacher(_): CurrentTeacher,
    Path((subject_id, class_label)): Path<(i32, String)>,
) -> HandlerResult {
    let label = class_label.clone();
    let (subject, choices) = state
        .with_manager(move |m| Ok((m.get_subject(subject_id)?, m.get_class_roster(&label)?)))
        .await?;

    Ok(Json(json!({
        "subject": subject,
        "class_label": class_label,
        "students": choices,
    }))
    .into_response())
}

pub async fn grade_create_generic(
    State(state): State<Arc<AppState>>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path((subject_id, class_label)): Path<(i32, String)>,
    Form(form): Form<GradeEntryForm>,
) -> HandlerResult {
    let label = class_label.clone();
    state
        .with_manager(move |m| {
            let choices = m.get_class_roster(&label)?;
            let entry = form.validate(&choices)?;
            m.create_grade(
                &teacher,
                subject_id,
                entry.student_id,
                entry.date,
                entry.grade.value,
                entry.grade.comment.as_deref(),
            )
        })
        .await?;

    Ok(Redirect::to(&matrix_path(subject_id, &class_label)).into_response())
}
