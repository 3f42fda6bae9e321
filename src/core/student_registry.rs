use crate::core::{Course, CourseCatalog, Enrollment, Grade, Searchable, Student};
use crate::utils::error::{RecordsError, Result};
use crate::utils::validation::{non_blank, validate_email};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::fmt;

const ENTITY: &str = "Student";

pub const MAX_CREDITS_PER_SEMESTER: u32 = 18;

#[derive(Debug, Default)]
pub struct StudentRegistry {
    students: Vec<Student>,
    index: HashMap<String, usize>,
}

impl StudentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn add(&mut self, student: Student) -> Result<()> {
        if self.index.contains_key(student.id()) {
            tracing::warn!("Rejected duplicate student id {}", student.id());
            return Err(RecordsError::duplicate(ENTITY, student.id()));
        }

        tracing::info!("Added student {} ({})", student.id(), student.full_name());
        self.index.insert(student.id().to_string(), self.students.len());
        self.students.push(student);
        Ok(())
    }

    /// Applies the non-blank fields. An invalid email rejects the whole call.
    pub fn update(&mut self, id: &str, full_name: Option<&str>, email: Option<&str>) -> Result<()> {
        let full_name = non_blank(full_name);
        let email = non_blank(email);

        let student = self.get_mut(id)?;
        if let Some(email) = email {
            validate_email("email", email)?;
        }

        if let Some(full_name) = full_name {
            student.set_full_name(full_name);
        }
        if let Some(email) = email {
            student.set_email(email);
        }

        tracing::debug!("Updated student {}", id);
        Ok(())
    }

    pub fn deactivate(&mut self, id: &str) -> Result<()> {
        self.get_mut(id)?.deactivate();
        tracing::info!("Deactivated student {}", id);
        Ok(())
    }

    pub fn enroll<C: CourseCatalog>(
        &mut self,
        student_id: &str,
        course_code: &str,
        catalog: &C,
    ) -> Result<()> {
        self.enroll_on(student_id, course_code, Local::now().date_naive(), catalog)
    }

    /// Like [`enroll`](Self::enroll) with an explicit enrollment date.
    pub fn enroll_on<C: CourseCatalog>(
        &mut self,
        student_id: &str,
        course_code: &str,
        date: NaiveDate,
        catalog: &C,
    ) -> Result<()> {
        let (student, course) = self.enrollment_target(student_id, course_code, catalog)?;

        let attempted_credits = enrolled_credits(student, catalog).saturating_add(course.credits());
        if attempted_credits > MAX_CREDITS_PER_SEMESTER {
            tracing::warn!(
                "Student {} would carry {} credits with {}",
                student_id,
                attempted_credits,
                course_code
            );
            return Err(RecordsError::CreditLimitExceeded {
                max_credits: MAX_CREDITS_PER_SEMESTER,
                attempted_credits,
            });
        }

        let enrollment = Enrollment::with_date(student_id, course.code(), date)?;
        student.add_enrollment(enrollment);
        tracing::info!(
            "Enrolled student {} in {} ({} credits total)",
            student_id,
            course_code,
            attempted_credits
        );
        Ok(())
    }

    /// Re-attaches an enrollment accepted earlier, e.g. when loading saved data.
    /// Unknown keys and duplicates are rejected; the credit cap is not re-applied.
    pub fn restore_enrollment<C: CourseCatalog>(
        &mut self,
        student_id: &str,
        course_code: &str,
        date: NaiveDate,
        grade: Option<Grade>,
        catalog: &C,
    ) -> Result<()> {
        let (student, course) = self.enrollment_target(student_id, course_code, catalog)?;

        let mut enrollment = Enrollment::with_date(student_id, course.code(), date)?;
        if let Some(grade) = grade {
            enrollment.set_grade(grade);
        }
        student.add_enrollment(enrollment);
        tracing::debug!("Restored enrollment of {} in {}", student_id, course_code);
        Ok(())
    }

    /// Returns whether an enrollment was removed; absence is not an error.
    pub fn unenroll(&mut self, student_id: &str, course_code: &str) -> bool {
        let removed = self
            .get_mut(student_id)
            .map(|s| s.remove_enrollment(course_code))
            .unwrap_or(false);

        if removed {
            tracing::info!("Unenrolled student {} from {}", student_id, course_code);
        } else {
            tracing::debug!("No enrollment of {} in {} to remove", student_id, course_code);
        }
        removed
    }

    pub fn record_grade(&mut self, student_id: &str, course_code: &str, grade: Grade) -> Result<()> {
        let enrollment = self
            .get_mut(student_id)?
            .enrollment_for_mut(course_code)
            .ok_or_else(|| {
                RecordsError::not_found("Enrollment", format!("{}/{}", student_id, course_code))
            })?;

        enrollment.set_grade(grade);
        tracing::info!("Recorded grade {} for {} in {}", grade.letter(), student_id, course_code);
        Ok(())
    }

    /// Credit-weighted mean of grade points over graded enrollments.
    pub fn calculate_gpa<C: CourseCatalog>(student: &Student, catalog: &C) -> f64 {
        let (points, credits) = student
            .enrollments()
            .iter()
            .filter_map(|e| Some((e.grade()?, catalog.course(e.course_code())?.credits())))
            .fold((0.0, 0u64), |(points, credits), (grade, course_credits)| {
                (
                    points + grade.points() * f64::from(course_credits),
                    credits + u64::from(course_credits),
                )
            });

        if credits > 0 {
            points / credits as f64
        } else {
            0.0
        }
    }

    pub fn generate_transcript<C: CourseCatalog>(&self, student_id: &str, catalog: &C) -> Result<String> {
        let student = self
            .find_by_id(student_id)
            .ok_or_else(|| RecordsError::not_found(ENTITY, student_id))?;

        Ok(Transcript { student, catalog }.to_string())
    }

    pub fn find_by_reg_no(&self, reg_no: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.reg_no() == reg_no)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    /// Resolves both keys and rejects a second enrollment in the same course.
    fn enrollment_target<'s, 'c, C: CourseCatalog>(
        &'s mut self,
        student_id: &str,
        course_code: &str,
        catalog: &'c C,
    ) -> Result<(&'s mut Student, &'c Course)> {
        let student = self.get_mut(student_id)?;
        let course = catalog
            .course(course_code)
            .ok_or_else(|| RecordsError::not_found("Course", course_code))?;

        if student.is_enrolled_in(course.code()) {
            tracing::warn!("Student {} already enrolled in {}", student_id, course_code);
            return Err(RecordsError::AlreadyEnrolled {
                student_id: student_id.to_string(),
                course_code: course_code.to_string(),
            });
        }
        Ok((student, course))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Student> {
        let index = *self
            .index
            .get(id)
            .ok_or_else(|| RecordsError::not_found(ENTITY, id))?;
        Ok(&mut self.students[index])
    }
}

fn enrolled_credits<C: CourseCatalog>(student: &Student, catalog: &C) -> u32 {
    student
        .enrollments()
        .iter()
        .filter_map(|e| catalog.course(e.course_code()))
        .fold(0u32, |total, c| total.saturating_add(c.credits()))
}

struct Transcript<'a, C> {
    student: &'a Student,
    catalog: &'a C,
}

impl<C: CourseCatalog> fmt::Display for Transcript<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transcript for: {}", self.student.full_name())?;
        writeln!(f, "Registration No: {}", self.student.reg_no())?;
        writeln!(
            f,
            "GPA: {:.2}",
            StudentRegistry::calculate_gpa(self.student, self.catalog)
        )?;
        writeln!(f)?;
        writeln!(f, "Courses:")?;

        for enrollment in self.student.enrollments() {
            let (title, credits) = self
                .catalog
                .course(enrollment.course_code())
                .map(|c| (c.title(), c.credits()))
                .unwrap_or(("(unknown course)", 0));
            let grade = enrollment
                .grade()
                .map(Grade::description)
                .unwrap_or("Not graded");
            writeln!(
                f,
                "- {}: {} ({} credits) - {}",
                enrollment.course_code(),
                title,
                credits,
                grade
            )?;
        }
        Ok(())
    }
}

impl Searchable<Student> for StudentRegistry {
    fn search<P>(&self, predicate: P) -> Vec<Student>
    where
        P: Fn(&Student) -> bool,
    {
        self.students.iter().filter(|s| predicate(s)).cloned().collect()
    }

    fn find_all(&self) -> Vec<Student> {
        self.students.clone()
    }

    fn find_by_id(&self, id: &str) -> Option<&Student> {
        self.index.get(id).map(|&i| &self.students[i])
    }
}
