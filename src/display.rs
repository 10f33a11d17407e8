use crate::dashboard::TaughtCombination;
use crate::matrix::{Average, GradeMatrix};
use crate::models::Student;
use tabled::builder::Builder;
use tabled::{Table, Tabled, settings::Style};

/// Renders a class roster as a table.
pub fn roster_table(roster: &[Student]) -> String {
    #[derive(Tabled)]
    struct RosterRow<'a> {
        id: i32,
        last_name: &'a str,
        first_name: &'a str,
        class: &'a str,
        date_of_birth: String,
    }

    let rows = roster.iter().map(|student| RosterRow {
        id: student.id,
        last_name: &student.last_name,
        first_name: &student.first_name,
        class: &student.class_label,
        date_of_birth: student
            .date_of_birth
            .map(|d| d.to_string())
            .unwrap_or_default(),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

/// Renders the subject and class pairs a teacher has graded.
pub fn dashboard_table(combos: &[TaughtCombination]) -> String {
    #[derive(Tabled)]
    struct ComboRow<'a> {
        subject_id: i32,
        subject: &'a str,
        class: &'a str,
    }

    let rows = combos.iter().map(|combo| ComboRow {
        subject_id: combo.subject_id,
        subject: &combo.subject_name,
        class: &combo.class_label,
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

/// Renders the grade grid: one row per student, one column per date, then the average.
pub fn matrix_table(matrix: &GradeMatrix) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["student".to_string()];
    header.extend(matrix.columns.iter().map(|date| date.to_string()));
    header.push("average".to_string());
    builder.push_record(header);

    for row in &matrix.rows {
        let mut record = vec![format!("{} {}", row.student.last_name, row.student.first_name)];
        record.extend(row.cells.iter().map(|cell| match &cell.grade {
            Some(grade) => grade.value.to_string(),
            None => String::new(),
        }));
        record.push(format_average(row.average));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    format!("{} {}:\n{table}", matrix.subject.name, matrix.class_label)
}

fn format_average(average: Average) -> String {
    match average {
        Average::Mean(mean) => format!("{mean:.2}"),
        Average::NoData => "-".to_string(),
    }
}
