use crate::utils::error::{RecordsError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    /// Every grade, best first.
    pub const ALL: [Grade; 7] = [
        Grade::S,
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
    ];

    pub fn points(self) -> f64 {
        match self {
            Grade::S => 10.0,
            Grade::A => 9.0,
            Grade::B => 8.0,
            Grade::C => 7.0,
            Grade::D => 6.0,
            Grade::E => 5.0,
            Grade::F => 0.0,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Grade::S => "S - Outstanding",
            Grade::A => "A - Excellent",
            Grade::B => "B - Very Good",
            Grade::C => "C - Good",
            Grade::D => "D - Average",
            Grade::E => "E - Below Average",
            Grade::F => "F - Fail",
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }

    /// Classifies a raw score onto the grade scale.
    pub fn from_points(points: f64) -> Grade {
        if points >= 9.5 {
            Grade::S
        } else if points >= 8.5 {
            Grade::A
        } else if points >= 7.5 {
            Grade::B
        } else if points >= 6.5 {
            Grade::C
        } else if points >= 5.5 {
            Grade::D
        } else if points >= 4.5 {
            Grade::E
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for Grade {
    type Err = RecordsError;

    /// Accepts a letter (`a`, `B`) or a full description (`A - Excellent`).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Grade::ALL
            .into_iter()
            .find(|g| g.letter().eq_ignore_ascii_case(trimmed) || g.description() == trimmed)
            .ok_or_else(|| RecordsError::InvalidFormat {
                field: "grade".to_string(),
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Semester {
    Spring,
    Summer,
    Fall,
}

impl Semester {
    pub const ALL: [Semester; 3] = [Semester::Spring, Semester::Summer, Semester::Fall];

    pub fn as_str(self) -> &'static str {
        match self {
            Semester::Spring => "SPRING",
            Semester::Summer => "SUMMER",
            Semester::Fall => "FALL",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Semester {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Semester::ALL
            .into_iter()
            .find(|sem| sem.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RecordsError::InvalidFormat {
                field: "semester".to_string(),
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Course {
    code: String,
    title: String,
    credits: u32,
    instructor: String,
    semester: Option<Semester>,
    department: String,
    active: bool,
}

impl Course {
    pub fn builder(code: impl Into<String>, title: impl Into<String>) -> CourseBuilder {
        CourseBuilder {
            code: code.into(),
            title: title.into(),
            credits: 0,
            instructor: String::new(),
            semester: None,
            department: String::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    pub fn semester(&self) -> Option<Semester> {
        self.semester
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub(crate) fn set_credits(&mut self, credits: u32) {
        self.credits = credits;
    }

    pub(crate) fn set_instructor(&mut self, instructor: &str) {
        self.instructor = instructor.to_string();
    }

    pub(crate) fn set_semester(&mut self, semester: Semester) {
        self.semester = Some(semester);
    }

    pub(crate) fn set_department(&mut self, department: &str) {
        self.department = department.to_string();
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Course {}

impl std::hash::Hash for Course {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Course[Code: {}, Title: {}, Credits: {}, Instructor: {}, Semester: {}, Department: {}]",
            self.code,
            self.title,
            self.credits,
            self.instructor,
            self.semester.map(Semester::as_str).unwrap_or("-"),
            self.department
        )
    }
}

/// Staged builder: code and title are fixed up front, the rest is optional.
#[derive(Debug, Clone)]
pub struct CourseBuilder {
    code: String,
    title: String,
    credits: u32,
    instructor: String,
    semester: Option<Semester>,
    department: String,
}

impl CourseBuilder {
    pub fn credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    pub fn instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    pub fn semester(mut self, semester: Semester) -> Self {
        self.semester = Some(semester);
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn build(self) -> Result<Course> {
        validate_non_empty_string("code", &self.code)?;
        validate_non_empty_string("title", &self.title)?;

        Ok(Course {
            code: self.code,
            title: self.title,
            credits: self.credits,
            instructor: self.instructor,
            semester: self.semester,
            department: self.department,
            active: true,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    student_id: String,
    course_code: String,
    enrollment_date: NaiveDate,
    grade: Option<Grade>,
}

impl Enrollment {
    pub fn new(student_id: &str, course_code: &str) -> Result<Self> {
        Self::with_date(student_id, course_code, Local::now().date_naive())
    }

    pub fn with_date(student_id: &str, course_code: &str, enrollment_date: NaiveDate) -> Result<Self> {
        validate_non_empty_string("student_id", student_id)?;
        validate_non_empty_string("course_code", course_code)?;

        Ok(Self {
            student_id: student_id.to_string(),
            course_code: course_code.to_string(),
            enrollment_date,
            grade: None,
        })
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    pub fn enrollment_date(&self) -> NaiveDate {
        self.enrollment_date
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }

    pub(crate) fn set_grade(&mut self, grade: Grade) {
        self.grade = Some(grade);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Student {
    id: String,
    reg_no: String,
    full_name: String,
    email: String,
    date_created: NaiveDate,
    active: bool,
    enrollments: Vec<Enrollment>,
}

impl Student {
    pub fn new(
        id: impl Into<String>,
        reg_no: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let reg_no = reg_no.into();
        validate_non_empty_string("id", &id)?;
        validate_non_empty_string("reg_no", &reg_no)?;

        Ok(Self {
            id,
            reg_no,
            full_name: full_name.into(),
            email: email.into(),
            date_created: Local::now().date_naive(),
            active: true,
            enrollments: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn reg_no(&self) -> &str {
        &self.reg_no
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn date_created(&self) -> NaiveDate {
        self.date_created
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn enrollment_for(&self, course_code: &str) -> Option<&Enrollment> {
        self.enrollments.iter().find(|e| e.course_code == course_code)
    }

    pub fn is_enrolled_in(&self, course_code: &str) -> bool {
        self.enrollment_for(course_code).is_some()
    }

    pub(crate) fn set_full_name(&mut self, full_name: &str) {
        self.full_name = full_name.to_string();
    }

    pub(crate) fn set_email(&mut self, email: &str) {
        self.email = email.to_string();
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    pub(crate) fn add_enrollment(&mut self, enrollment: Enrollment) {
        self.enrollments.push(enrollment);
    }

    pub(crate) fn remove_enrollment(&mut self, course_code: &str) -> bool {
        match self.enrollments.iter().position(|e| e.course_code == course_code) {
            Some(index) => {
                self.enrollments.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn enrollment_for_mut(&mut self, course_code: &str) -> Option<&mut Enrollment> {
        self.enrollments
            .iter_mut()
            .find(|e| e.course_code == course_code)
    }
}

impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Student {}

impl std::hash::Hash for Student {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Student[ID: {}, Reg: {}, Name: {}, Email: {}, Active: {}]",
            self.id,
            self.reg_no,
            self.full_name,
            self.email,
            if self.active { "Yes" } else { "No" }
        )
    }
}
