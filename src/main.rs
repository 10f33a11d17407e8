use anyhow::{Context, Result, bail};
use clap::Parser;
use gradebook::cli::{Cli, Command};
use gradebook::manager::GradebookManager;
use gradebook::models::{NewStudent, Teacher};
use gradebook::{display, roster, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gradebook=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let (settings, mut manager) = gradebook::create_default_manager()?;

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(settings.server.bind);
            let app = web::router(web::AppState::new(manager));

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("could not listen on {addr}"))?;
            tracing::info!("gradebook listening on http://{addr}");
            axum::serve(listener, app).await?;
        }
        Command::AddTeacher { username } => {
            let teacher = manager.add_teacher(&username)?;
            println!("Teacher '{}' registered. Session token: {}", teacher.username, teacher.token);
        }
        Command::AddSubject { name } => {
            let subject = manager.add_subject(&name)?;
            println!("Subject '{}' added with ID {}", subject.name, subject.id);
        }
        Command::AddStudent {
            first_name,
            last_name,
            class_label,
            date_of_birth,
        } => {
            let added = manager.insert_students(&[NewStudent {
                first_name,
                last_name,
                class_label,
                date_of_birth,
            }])?;
            println!("{}", display::roster_table(&added));
        }
        Command::ImportRoster { file_path } => {
            let students = roster::read_roster(&file_path)?;
            let added = manager.insert_students(&students)?;
            println!("Imported {} students", added.len());
        }
        Command::ShowRoster { class_label } => {
            let students = manager.get_class_roster(&class_label)?;
            println!("Class {class_label}:\n{}", display::roster_table(&students));
        }
        Command::Dashboard { teacher } => {
            let teacher = find_teacher(&mut manager, &teacher)?;
            let combos = manager.list_taught_combinations(&teacher)?;
            println!("{}", display::dashboard_table(&combos));
        }
        Command::ShowMatrix {
            teacher,
            subject_id,
            class_label,
        } => {
            let teacher = find_teacher(&mut manager, &teacher)?;
            let matrix = manager.build_matrix(&teacher, subject_id, &class_label)?;
            println!("{}", display::matrix_table(&matrix));
        }
        Command::RecordGrade {
            teacher,
            subject_id,
            student_id,
            date,
            value,
            comment,
        } => {
            let teacher = find_teacher(&mut manager, &teacher)?;
            let grade = manager.create_grade(
                &teacher,
                subject_id,
                student_id,
                date,
                value,
                comment.as_deref(),
            )?;
            println!("Recorded grade {} ({}) on {}", grade.id, grade.value, grade.date);
        }
    }

    Ok(())
}

fn find_teacher(manager: &mut GradebookManager, username: &str) -> Result<Teacher> {
    match manager.get_teacher_by_username(username)? {
        Some(teacher) => Ok(teacher),
        None => bail!("no teacher named '{username}'"),
    }
}
