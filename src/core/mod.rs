pub mod course_registry;
pub mod reports;
pub mod student_registry;

pub use crate::domain::model::{Course, CourseBuilder, Enrollment, Grade, Semester, Student};
pub use crate::domain::ports::{ConfigProvider, CourseCatalog, Searchable, Storage};
pub use crate::utils::error::Result;
pub use course_registry::{CourseRegistry, CourseUpdate};
pub use student_registry::{StudentRegistry, MAX_CREDITS_PER_SEMESTER};
