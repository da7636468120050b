//! Command-line entry point for local inspection of a course database.

use clap::{Parser, Subcommand};
use coursedesk_core::model::course::CourseDraft;
use coursedesk_core::{AppContext, CoreConfig, Course, CourseFilter};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "coursedesk", version, about = "Course management core CLI")]
struct Cli {
    /// TOML config file.
    #[arg(long, env = "COURSEDESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core version and health check.
    Version,
    /// Print dashboard tiles.
    Stats,
    /// List courses, optionally matching a search text.
    Courses { search: Option<String> },
    /// Insert a few demo courses.
    Seed,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Command::Version = cli.command {
        println!("coursedesk_core ping={}", coursedesk_core::ping());
        println!("coursedesk_core version={}", coursedesk_core::core_version());
        return Ok(());
    }

    let config = CoreConfig::load(cli.config.as_deref())?;
    if let Some(log_dir) = &config.log_dir {
        coursedesk_core::init_logging(&config.log_level, log_dir)?;
    }
    let app = AppContext::open(config, false)?;

    match cli.command {
        Command::Version => {}
        Command::Stats => {
            for tile in app.dashboard().stats() {
                println!("{:<16} {:>6}  ({})", tile.title, tile.value, tile.icon);
            }
        }
        Command::Courses { search } => {
            let mut filter = CourseFilter::default();
            if let Some(search) = search {
                filter.search = search;
            }
            for course in app.service::<Course>().list(&filter)? {
                println!(
                    "{:<8} {:<40} {:<24} {} cr  {}",
                    course.course_id, course.name, course.department, course.credits, course.term
                );
            }
        }
        Command::Seed => {
            let courses = app.service::<Course>();
            for draft in demo_courses() {
                if courses.find_by_business_id(&draft.course_id)?.is_some() {
                    continue;
                }
                if let Some(course) = courses.create(&draft)? {
                    println!("created {} {}", course.course_id, course.name);
                }
            }
        }
    }

    for notice in app.notices().drain() {
        eprintln!("{:?}: {}", notice.level, notice.message);
    }
    Ok(())
}

fn demo_courses() -> Vec<CourseDraft> {
    [
        ("CS101", "Introduction to Computer Science", "Computer Science", 3, "Dr. Alan Turing"),
        ("CS201", "Data Structures and Algorithms", "Computer Science", 4, "Dr. Grace Hopper"),
        ("MATH201", "Linear Algebra", "Mathematics", 3, "Dr. Emmy Noether"),
        ("PHYS101", "Classical Mechanics", "Physics", 4, "Dr. Richard Feynman"),
    ]
    .into_iter()
    .map(|(course_id, name, department, credits, instructor)| CourseDraft {
        course_id: course_id.to_string(),
        name: name.to_string(),
        department: department.to_string(),
        credits,
        term: "Fall 2023".to_string(),
        instructor: instructor.to_string(),
        tags: String::new(),
    })
    .collect()
}
