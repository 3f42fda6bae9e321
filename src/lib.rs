pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::backup::BackupService;
pub use app::import_export::{ImportExportService, ImportSummary};
pub use app::store::{DataStore, Records};
pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{
    Course, CourseRegistry, CourseUpdate, Enrollment, Grade, Semester, Student, StudentRegistry,
};
pub use utils::error::{RecordsError, Result};
