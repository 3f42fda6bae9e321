pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use command::*;

#[cfg(feature = "cli")]
mod command {
    use super::toml_config::TomlConfig;
    use crate::core::{Grade, Semester};
    use crate::utils::error::Result;
    use clap::{Args, Parser, Subcommand, ValueEnum};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "campus-records")]
    #[command(about = "Student and course records: enrollments, grades, transcripts and reports")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        /// Directory holding students.csv, courses.csv and enrollments.csv
        #[arg(long, global = true)]
        pub data_dir: Option<PathBuf>,

        /// Directory that receives backups (defaults to <data-dir>/backups)
        #[arg(long, global = true)]
        pub backup_dir: Option<PathBuf>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    impl CliConfig {
        /// Folds the optional config file and command-line overrides into one value.
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::with_data_directory("./data"),
            };

            if let Some(data_dir) = &self.data_dir {
                config.set_data_directory(data_dir);
            }
            if let Some(backup_dir) = &self.backup_dir {
                config.set_backup_directory(backup_dir);
            }
            config.logging.verbose |= self.verbose;
            config.logging.json |= self.log_json;
            Ok(config)
        }
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Manage students
        #[command(subcommand)]
        Student(StudentCommand),

        /// Manage courses
        #[command(subcommand)]
        Course(CourseCommand),

        /// Enroll a student in a course
        Enroll(EnrollmentArgs),

        /// Remove a student's enrollment
        Unenroll(EnrollmentArgs),

        /// Record or replace a grade
        Grade {
            #[command(flatten)]
            enrollment: EnrollmentArgs,
            /// Grade letter (S, A, B, C, D, E, F)
            #[arg(long, value_parser = parse_grade)]
            grade: Grade,
        },

        /// Print a student's transcript
        Transcript {
            #[arg(long)]
            student: String,
        },

        /// Print an aggregate report
        Report {
            #[arg(value_enum)]
            kind: ReportKind,
            #[arg(long)]
            json: bool,
        },

        /// Import rows from a CSV file
        Import {
            #[arg(value_enum)]
            kind: ImportKind,
            file: PathBuf,
        },

        /// Export all three CSV files into a directory
        Export { directory: PathBuf },

        /// Write a timestamped backup of the data
        Backup {
            /// Also pack the backup directory into a zip archive
            #[arg(long)]
            archive: bool,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum StudentCommand {
        Add {
            #[arg(long)]
            id: String,
            #[arg(long)]
            reg_no: String,
            #[arg(long)]
            name: String,
            #[arg(long)]
            email: String,
        },
        Update {
            #[arg(long)]
            id: String,
            #[arg(long)]
            name: Option<String>,
            #[arg(long)]
            email: Option<String>,
        },
        Deactivate {
            #[arg(long)]
            id: String,
        },
        Show {
            #[arg(long)]
            id: String,
        },
        List {
            #[arg(long)]
            active_only: bool,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum CourseCommand {
        Add {
            #[arg(long)]
            code: String,
            #[arg(long)]
            title: String,
            #[arg(long, default_value = "0")]
            credits: u32,
            #[arg(long, default_value = "")]
            instructor: String,
            #[arg(long, value_parser = parse_semester)]
            semester: Option<Semester>,
            #[arg(long, default_value = "")]
            department: String,
        },
        Update {
            #[arg(long)]
            code: String,
            #[arg(long)]
            title: Option<String>,
            #[arg(long)]
            credits: Option<u32>,
            #[arg(long)]
            instructor: Option<String>,
            #[arg(long, value_parser = parse_semester)]
            semester: Option<Semester>,
            #[arg(long)]
            department: Option<String>,
        },
        Deactivate {
            #[arg(long)]
            code: String,
        },
        List {
            #[arg(long)]
            instructor: Option<String>,
            #[arg(long)]
            department: Option<String>,
            #[arg(long, value_parser = parse_semester)]
            semester: Option<Semester>,
        },
    }

    #[derive(Debug, Clone, Args)]
    pub struct EnrollmentArgs {
        #[arg(long)]
        pub student: String,
        #[arg(long)]
        pub course: String,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum ReportKind {
        Top,
        Grades,
        Enrollments,
        Departments,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum ImportKind {
        Students,
        Courses,
        Enrollments,
    }

    fn parse_grade(value: &str) -> std::result::Result<Grade, String> {
        value.parse().map_err(|e: crate::utils::error::RecordsError| e.to_string())
    }

    fn parse_semester(value: &str) -> std::result::Result<Semester, String> {
        value.parse().map_err(|e: crate::utils::error::RecordsError| e.to_string())
    }

}
