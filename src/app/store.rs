use crate::app::import_export::{
    ImportExportService, ImportSummary, COURSES_FILE, ENROLLMENTS_FILE, STUDENTS_FILE,
};
use crate::core::{CourseRegistry, Storage, StudentRegistry};
use crate::utils::error::Result;

/// Both registries, loaded together so enrollments can resolve their courses.
#[derive(Debug, Default)]
pub struct Records {
    pub students: StudentRegistry,
    pub courses: CourseRegistry,
}

/// Persists [`Records`] as the three CSV files of a data directory.
pub struct DataStore<S: Storage> {
    io: ImportExportService<S>,
}

impl<S: Storage> DataStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            io: ImportExportService::new(storage),
        }
    }

    pub fn io(&self) -> &ImportExportService<S> {
        &self.io
    }

    /// Missing files load as empty collections.
    pub fn load(&self) -> Result<Records> {
        let mut records = Records::default();
        let storage = self.io.storage();

        let mut total = ImportSummary::default();
        if storage.exists(COURSES_FILE) {
            accumulate(&mut total, self.io.import_courses(&mut records.courses, COURSES_FILE)?);
        }
        if storage.exists(STUDENTS_FILE) {
            accumulate(&mut total, self.io.import_students(&mut records.students, STUDENTS_FILE)?);
        }
        if storage.exists(ENROLLMENTS_FILE) {
            accumulate(
                &mut total,
                self.io
                    .import_enrollments(&mut records.students, &records.courses, ENROLLMENTS_FILE)?,
            );
        }

        if total.skipped > 0 {
            tracing::warn!("{} rows could not be loaded from the data directory", total.skipped);
        }
        tracing::debug!(
            "Loaded {} students and {} courses",
            records.students.len(),
            records.courses.len()
        );
        Ok(records)
    }

    pub fn save(&self, records: &Records) -> Result<()> {
        self.io.export_all(&records.students, &records.courses)
    }
}

fn accumulate(total: &mut ImportSummary, summary: ImportSummary) {
    total.imported += summary.imported;
    total.skipped += summary.skipped;
}
