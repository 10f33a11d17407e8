//! This module contains the command-line interface [`Cli`] parser for running and administering the
//! gradebook.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(version, about = "A school gradebook for teachers")]
pub struct Cli {
    /// The different commands available for managing the gradebook.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web server.
    Serve {
        /// Address to listen on, overriding `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Register a teacher and print their session token.
    AddTeacher { username: String },

    /// Add a subject.
    AddSubject { name: String },

    /// Add a single student.
    AddStudent {
        first_name: String,
        last_name: String,
        class_label: String,
        /// Date of birth as YYYY-MM-DD.
        #[arg(long)]
        date_of_birth: Option<NaiveDate>,
    },

    /// Add every student listed in a roster CSV file.
    ImportRoster { file_path: PathBuf },

    /// Show the students of a class.
    ShowRoster { class_label: String },

    /// List the subject and class pairs a teacher has graded.
    Dashboard {
        #[arg(long)]
        teacher: String,
    },

    /// Show a teacher's grade matrix for one subject and class.
    ShowMatrix {
        #[arg(long)]
        teacher: String,
        subject_id: i32,
        class_label: String,
    },

    /// Record a grade for a student.
    RecordGrade {
        #[arg(long)]
        teacher: String,
        subject_id: i32,
        student_id: i32,
        /// The day the grade was given, as YYYY-MM-DD.
        date: NaiveDate,
        #[arg(allow_negative_numbers = true)]
        value: i32,
        #[arg(long)]
        comment: Option<String>,
    },
}
