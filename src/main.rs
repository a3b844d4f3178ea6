#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # csvgrades
//!
//! Records grades from grading issues into a CSV grade sheet.
//!
//! Most options of `record` can also be given through `CSVGRADES_*`
//! environment variables, or in a `.env` file in the working directory.

use std::path::PathBuf;

use anyhow::{Result, ensure};
use bpaf::*;
use colored::Colorize;
use csvgrades::{
    config::{EnvDefaults, RecordArgs},
    grades::GradeSpecCatalog,
    notify::TracingNotifier,
    record_grades,
    report::{catalog_table, summary_table},
};
use dotenvy::dotenv;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Record grades into the grades file
    Record(RecordArgs),
    /// Parse grade specs and print them
    Check(Vec<String>),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses grade specs
    fn specs() -> impl Parser<Vec<String>> {
        long("grade-specs")
            .short('g')
            .help("Grade spec on the form <PRIORITY>:<SYMBOL>:<REGEX>, e.g. 1:P:[Pp]ass")
            .argument::<String>("SPEC")
            .many()
    }

    let hook_results_file = long("hook-results-file")
        .long("hf")
        .help("Results file from listing issues with --all")
        .argument::<PathBuf>("FILE")
        .optional();
    let grades_file = long("grades-file")
        .long("gf")
        .help("The grades CSV file to update")
        .argument::<PathBuf>("FILE")
        .optional();
    let edit_msg_file = long("edit-msg-file")
        .long("ef")
        .help("Where to write the edit message [default: edit_msg.txt]")
        .argument::<PathBuf>("FILE")
        .optional();
    let grade_specs = specs();
    let teachers = long("teachers")
        .short('t')
        .help("Username allowed to open grading issues, may be comma separated")
        .argument::<String>("USERNAME")
        .many();
    let students = long("students")
        .short('s')
        .help("A student team, members separated by commas")
        .argument::<String>("TEAM")
        .many();
    let students_file = long("students-file")
        .long("sf")
        .help("File with one team per line, members separated by whitespace")
        .argument::<PathBuf>("FILE")
        .optional();
    let assignments = long("assignments")
        .short('a')
        .help("Name of an assignment to record grades for")
        .argument::<String>("ASSIGNMENT")
        .some("at least one assignment is required");
    let allow_other_states = long("allow-other-states")
        .help("Accept results from listing issues with a state other than `all`")
        .switch();

    let record = construct!(RecordArgs {
        hook_results_file,
        grades_file,
        edit_msg_file,
        grade_specs,
        teachers,
        students,
        students_file,
        assignments,
        allow_other_states,
    })
    .map(Cmd::Record)
    .to_options()
    .command("record")
    .help("Record grades from grading issues into the grades file");

    let check = construct!(Cmd::Check(specs()))
        .to_options()
        .command("check")
        .help("Parse grade specs and print them");

    let cmd = construct!([record, check]);

    cmd.to_options()
        .descr("Records grades from grading issues into a CSV grade sheet")
        .run()
}

fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();

    match cmd {
        Cmd::Record(args) => {
            let config = args.resolve(EnvDefaults::from_env())?;
            let new_grades = record_grades(&config, &mut TracingNotifier)?;
            let total: usize = new_grades.values().map(Vec::len).sum();
            if total > 0 {
                println!("{}", summary_table(&new_grades));
                println!(
                    "{} {total} new grade(s) in {}",
                    "Recorded".green().bold(),
                    config.grades_file.display()
                );
            } else {
                println!("{}", "Grades file left unchanged".yellow());
            }
        }
        Cmd::Check(formats) => {
            let formats = if formats.is_empty() {
                EnvDefaults::from_env().grade_specs().to_vec()
            } else {
                formats
            };
            ensure!(!formats.is_empty(), "No grade specs given");
            let catalog = GradeSpecCatalog::build(&formats)?;
            println!("{}", catalog_table(&catalog));
            println!("{} {} grade spec(s)", "Valid".green().bold(), catalog.len());
        }
    };

    Ok(())
}
