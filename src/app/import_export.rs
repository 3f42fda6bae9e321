use crate::core::{
    Course, CourseRegistry, Grade, Semester, Storage, Student, StudentRegistry,
};
use crate::utils::error::{RecordsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const STUDENTS_FILE: &str = "students.csv";
pub const COURSES_FILE: &str = "courses.csv";
pub const ENROLLMENTS_FILE: &str = "enrollments.csv";

const STUDENT_HEADER: [&str; 5] = ["ID", "RegistrationNo", "FullName", "Email", "Status"];
const COURSE_HEADER: [&str; 7] = [
    "Code",
    "Title",
    "Credits",
    "Instructor",
    "Semester",
    "Department",
    "Status",
];
const ENROLLMENT_HEADER: [&str; 5] = [
    "StudentID",
    "CourseCode",
    "EnrollmentDate",
    "Grade",
    "GradePoints",
];
const NOT_GRADED: &str = "Not graded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Status {
    Active,
    Inactive,
}

impl Status {
    fn of(active: bool) -> Self {
        if active {
            Status::Active
        } else {
            Status::Inactive
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StudentRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "RegistrationNo")]
    reg_no: String,
    #[serde(rename = "FullName")]
    full_name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Status", default = "default_status")]
    status: Status,
}

#[derive(Debug, Serialize, Deserialize)]
struct CourseRow {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Credits")]
    credits: u32,
    #[serde(rename = "Instructor")]
    instructor: String,
    #[serde(rename = "Semester")]
    semester: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Status", default = "default_status")]
    status: Status,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnrollmentRow {
    #[serde(rename = "StudentID")]
    student_id: String,
    #[serde(rename = "CourseCode")]
    course_code: String,
    #[serde(rename = "EnrollmentDate")]
    enrollment_date: NaiveDate,
    #[serde(rename = "Grade")]
    grade: String,
    #[serde(rename = "GradePoints")]
    grade_points: String,
}

fn default_status() -> Status {
    Status::Active
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// CSV codec between the registries and a [`Storage`].
pub struct ImportExportService<S: Storage> {
    storage: S,
}

impl<S: Storage> ImportExportService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn export_students(&self, students: &StudentRegistry, path: &str) -> Result<()> {
        let rows = students.iter().map(|s| StudentRow {
            id: s.id().to_string(),
            reg_no: s.reg_no().to_string(),
            full_name: s.full_name().to_string(),
            email: s.email().to_string(),
            status: Status::of(s.is_active()),
        });
        self.write_csv(path, &STUDENT_HEADER, rows)?;
        tracing::info!("Exported {} students to {}", students.len(), path);
        Ok(())
    }

    pub fn export_courses(&self, courses: &CourseRegistry, path: &str) -> Result<()> {
        let rows = courses.iter().map(|c| CourseRow {
            code: c.code().to_string(),
            title: c.title().to_string(),
            credits: c.credits(),
            instructor: c.instructor().to_string(),
            semester: c.semester().map(|s| s.to_string()).unwrap_or_default(),
            department: c.department().to_string(),
            status: Status::of(c.is_active()),
        });
        self.write_csv(path, &COURSE_HEADER, rows)?;
        tracing::info!("Exported {} courses to {}", courses.len(), path);
        Ok(())
    }

    pub fn export_enrollments(&self, students: &StudentRegistry, path: &str) -> Result<()> {
        let rows = students.iter().flat_map(|s| {
            s.enrollments().iter().map(|e| EnrollmentRow {
                student_id: e.student_id().to_string(),
                course_code: e.course_code().to_string(),
                enrollment_date: e.enrollment_date(),
                grade: e
                    .grade()
                    .map(|g| g.description().to_string())
                    .unwrap_or_else(|| NOT_GRADED.to_string()),
                grade_points: format!("{:.1}", e.grade().map(Grade::points).unwrap_or(0.0)),
            })
        });
        self.write_csv(path, &ENROLLMENT_HEADER, rows)?;
        tracing::info!("Exported enrollments to {}", path);
        Ok(())
    }

    /// Writes the three standard files side by side.
    pub fn export_all(&self, students: &StudentRegistry, courses: &CourseRegistry) -> Result<()> {
        self.export_students(students, STUDENTS_FILE)?;
        self.export_courses(courses, COURSES_FILE)?;
        self.export_enrollments(students, ENROLLMENTS_FILE)?;
        Ok(())
    }

    pub fn import_students(&self, students: &mut StudentRegistry, path: &str) -> Result<ImportSummary> {
        self.import_rows(path, |row: StudentRow| {
            let id = row.id.clone();
            students.add(Student::new(row.id, row.reg_no, row.full_name, row.email)?)?;
            if row.status == Status::Inactive {
                students.deactivate(&id)?;
            }
            Ok(())
        })
    }

    pub fn import_courses(&self, courses: &mut CourseRegistry, path: &str) -> Result<ImportSummary> {
        self.import_rows(path, |row: CourseRow| {
            let mut builder = Course::builder(row.code.as_str(), row.title)
                .credits(row.credits)
                .instructor(row.instructor)
                .department(row.department);
            if !row.semester.trim().is_empty() {
                builder = builder.semester(row.semester.parse::<Semester>()?);
            }
            courses.add(builder.build()?)?;
            if row.status == Status::Inactive {
                courses.deactivate(&row.code)?;
            }
            Ok(())
        })
    }

    /// Restores enrollments with their recorded dates and grades. Rows naming an
    /// unknown student or course, or repeating an enrollment, are skipped.
    pub fn import_enrollments(
        &self,
        students: &mut StudentRegistry,
        courses: &CourseRegistry,
        path: &str,
    ) -> Result<ImportSummary> {
        self.import_rows(path, |row: EnrollmentRow| {
            let grade = match row.grade.trim() {
                NOT_GRADED | "" => None,
                other => Some(other.parse::<Grade>()?),
            };
            students.restore_enrollment(
                &row.student_id,
                &row.course_code,
                row.enrollment_date,
                grade,
                courses,
            )
        })
    }

    fn write_csv<T, I>(&self, path: &str, header: &[&str], rows: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        let data = writer.into_inner().map_err(|e| e.into_error())?;
        self.storage.write_file(path, &data)
    }

    /// Applies `apply` to each row; bad or rejected rows are logged and skipped.
    fn import_rows<T, F>(&self, path: &str, mut apply: F) -> Result<ImportSummary>
    where
        T: for<'de> Deserialize<'de>,
        F: FnMut(T) -> Result<()>,
    {
        let data = self.storage.read_file(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());

        let mut summary = ImportSummary::default();
        for (line, result) in reader.deserialize::<T>().enumerate() {
            let outcome = result.map_err(RecordsError::from).and_then(&mut apply);
            match outcome {
                Ok(()) => summary.imported += 1,
                Err(e) => {
                    tracing::warn!("Skipping row {} of {}: {}", line + 2, path, e);
                    summary.skipped += 1;
                }
            }
        }

        tracing::info!(
            "Imported {} rows from {} ({} skipped)",
            summary.imported,
            path,
            summary.skipped
        );
        Ok(summary)
    }
}
