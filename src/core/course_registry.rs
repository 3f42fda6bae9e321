use crate::core::{Course, CourseCatalog, Searchable, Semester};
use crate::utils::error::{RecordsError, Result};
use crate::utils::validation::non_blank;
use std::collections::HashMap;

const ENTITY: &str = "Course";

/// Partial update for a course; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub credits: Option<u32>,
    pub instructor: Option<String>,
    pub semester: Option<Semester>,
    pub department: Option<String>,
}

#[derive(Debug, Default)]
pub struct CourseRegistry {
    courses: Vec<Course>,
    index: HashMap<String, usize>,
}

impl CourseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn add(&mut self, course: Course) -> Result<()> {
        if self.index.contains_key(course.code()) {
            tracing::warn!("Rejected duplicate course code {}", course.code());
            return Err(RecordsError::duplicate(ENTITY, course.code()));
        }

        tracing::info!("Added course {} ({})", course.code(), course.title());
        self.index.insert(course.code().to_string(), self.courses.len());
        self.courses.push(course);
        Ok(())
    }

    pub fn update(&mut self, code: &str, update: CourseUpdate) -> Result<()> {
        let course = self.get_mut(code)?;

        if let Some(title) = non_blank(update.title.as_deref()) {
            course.set_title(title);
        }

        if let Some(credits) = update.credits.filter(|c| *c > 0) {
            course.set_credits(credits);
        }

        if let Some(instructor) = update.instructor.as_deref() {
            course.set_instructor(instructor);
        }

        if let Some(semester) = update.semester {
            course.set_semester(semester);
        }

        if let Some(department) = non_blank(update.department.as_deref()) {
            course.set_department(department);
        }

        tracing::debug!("Updated course {}", code);
        Ok(())
    }

    pub fn deactivate(&mut self, code: &str) -> Result<()> {
        self.get_mut(code)?.deactivate();
        tracing::info!("Deactivated course {}", code);
        Ok(())
    }

    pub fn find_by_instructor(&self, instructor: &str) -> Vec<Course> {
        self.search(|c| c.instructor().eq_ignore_ascii_case(instructor))
    }

    pub fn find_by_department(&self, department: &str) -> Vec<Course> {
        self.search(|c| c.department().eq_ignore_ascii_case(department))
    }

    pub fn find_by_semester(&self, semester: Semester) -> Vec<Course> {
        self.search(|c| c.semester() == Some(semester))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    fn get_mut(&mut self, code: &str) -> Result<&mut Course> {
        let index = *self
            .index
            .get(code)
            .ok_or_else(|| RecordsError::not_found(ENTITY, code))?;
        Ok(&mut self.courses[index])
    }
}

impl Searchable<Course> for CourseRegistry {
    fn search<P>(&self, predicate: P) -> Vec<Course>
    where
        P: Fn(&Course) -> bool,
    {
        self.courses.iter().filter(|c| predicate(c)).cloned().collect()
    }

    fn find_all(&self) -> Vec<Course> {
        self.courses.clone()
    }

    fn find_by_id(&self, code: &str) -> Option<&Course> {
        self.index.get(code).map(|&i| &self.courses[i])
    }
}

impl CourseCatalog for CourseRegistry {
    fn course(&self, code: &str) -> Option<&Course> {
        self.find_by_id(code)
    }
}
