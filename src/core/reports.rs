//! Read-only aggregations over registry contents.
//!
//! Every function here borrows the registries and builds a fresh report
//! value; nothing is mutated. Reports serialize to JSON and render as text.

use crate::core::{Course, CourseCatalog, Grade, Student, StudentRegistry};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub const TOP_STUDENTS_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaRanking {
    pub rank: usize,
    pub student_id: String,
    pub full_name: String,
    pub gpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeShare {
    pub grade: Grade,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeDistribution {
    pub total: usize,
    pub shares: Vec<GradeShare>,
}

impl GradeDistribution {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn count(&self, grade: Grade) -> usize {
        self.shares
            .iter()
            .find(|s| s.grade == grade)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseEnrollmentCount {
    pub title: String,
    pub students: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub department: String,
    pub courses: usize,
}

/// Active students with a positive GPA, best first. Equal GPAs keep
/// registry insertion order.
pub fn top_students_by_gpa<'a, I, C>(students: I, catalog: &C) -> Vec<GpaRanking>
where
    I: IntoIterator<Item = &'a Student>,
    C: CourseCatalog,
{
    let mut ranked: Vec<(&Student, f64)> = students
        .into_iter()
        .filter(|s| s.is_active())
        .map(|s| (s, StudentRegistry::calculate_gpa(s, catalog)))
        .filter(|(_, gpa)| *gpa > 0.0)
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(TOP_STUDENTS_LIMIT)
        .enumerate()
        .map(|(i, (student, gpa))| GpaRanking {
            rank: i + 1,
            student_id: student.id().to_string(),
            full_name: student.full_name().to_string(),
            gpa,
        })
        .collect()
}

pub fn grade_distribution<'a, I>(students: I) -> GradeDistribution
where
    I: IntoIterator<Item = &'a Student>,
{
    let mut counts: HashMap<Grade, usize> = HashMap::new();
    for grade in students
        .into_iter()
        .flat_map(|s| s.enrollments())
        .filter_map(|e| e.grade())
    {
        *counts.entry(grade).or_default() += 1;
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return GradeDistribution {
            total: 0,
            shares: Vec::new(),
        };
    }

    let shares = Grade::ALL
        .into_iter()
        .map(|grade| {
            let count = counts.get(&grade).copied().unwrap_or(0);
            GradeShare {
                grade,
                count,
                percentage: count as f64 / total as f64 * 100.0,
            }
        })
        .collect();

    GradeDistribution { total, shares }
}

/// Students per course title, most popular first; ties keep first-seen order.
pub fn enrollment_statistics<'a, I, C>(students: I, catalog: &C) -> Vec<CourseEnrollmentCount>
where
    I: IntoIterator<Item = &'a Student>,
    C: CourseCatalog,
{
    let mut stats: Vec<CourseEnrollmentCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for enrollment in students.into_iter().flat_map(|s| s.enrollments()) {
        let title = catalog
            .course(enrollment.course_code())
            .map(|c| c.title())
            .unwrap_or(enrollment.course_code());

        match positions.get(title) {
            Some(&i) => stats[i].students += 1,
            None => {
                positions.insert(title.to_string(), stats.len());
                stats.push(CourseEnrollmentCount {
                    title: title.to_string(),
                    students: 1,
                });
            }
        }
    }

    stats.sort_by(|a, b| b.students.cmp(&a.students));
    stats
}

/// Active courses per department, alphabetical by department.
pub fn department_statistics<'a, I>(courses: I) -> Vec<DepartmentCount>
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for course in courses.into_iter().filter(|c| c.is_active()) {
        *counts.entry(course.department()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(department, courses)| DepartmentCount {
            department: department.to_string(),
            courses,
        })
        .collect()
}

pub struct TopStudents<'a>(pub &'a [GpaRanking]);

impl fmt::Display for TopStudents<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No students with GPA data found.");
        }
        writeln!(f, "Top {} Students by GPA:", TOP_STUDENTS_LIMIT)?;
        for ranking in self.0 {
            writeln!(f, "{}. {} - GPA: {:.2}", ranking.rank, ranking.full_name, ranking.gpa)?;
        }
        Ok(())
    }
}

impl fmt::Display for GradeDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No grades recorded yet.");
        }
        writeln!(f, "Grade distribution:")?;
        for share in &self.shares {
            writeln!(f, "{}: {} ({:.1}%)", share.grade, share.count, share.percentage)?;
        }
        Ok(())
    }
}

pub struct EnrollmentStatistics<'a>(pub &'a [CourseEnrollmentCount]);

impl fmt::Display for EnrollmentStatistics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No enrollment data found.");
        }
        writeln!(f, "Course enrollments:")?;
        for entry in self.0 {
            writeln!(f, "{}: {} students", entry.title, entry.students)?;
        }
        Ok(())
    }
}

pub struct DepartmentStatistics<'a>(pub &'a [DepartmentCount]);

impl fmt::Display for DepartmentStatistics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No department data found.");
        }
        writeln!(f, "Courses by department:")?;
        for entry in self.0 {
            writeln!(f, "{}: {} courses", entry.department, entry.courses)?;
        }
        Ok(())
    }
}
