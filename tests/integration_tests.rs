use campus_records::core::reports;
use campus_records::core::Searchable;
use campus_records::{
    Course, CourseRegistry, Grade, RecordsError, Semester, Student, StudentRegistry,
};

fn seeded_courses() -> CourseRegistry {
    let mut courses = CourseRegistry::new();
    courses
        .add(
            Course::builder("CS101", "Introduction to Programming")
                .credits(3)
                .instructor("Dr. Alice Brown")
                .semester(Semester::Fall)
                .department("Computer Science")
                .build()
                .unwrap(),
        )
        .unwrap();
    courses
        .add(
            Course::builder("MATH201", "Calculus I")
                .credits(4)
                .instructor("Prof. Charlie Davis")
                .semester(Semester::Fall)
                .department("Mathematics")
                .build()
                .unwrap(),
        )
        .unwrap();
    courses
        .add(
            Course::builder("ENG101", "English Composition")
                .credits(3)
                .instructor("Dr. Eva Wilson")
                .semester(Semester::Spring)
                .department("English")
                .build()
                .unwrap(),
        )
        .unwrap();
    for code in ["LAB1", "LAB2", "LAB3", "LAB4"] {
        courses
            .add(
                Course::builder(code, format!("Laboratory {}", code))
                    .credits(6)
                    .department("Science")
                    .build()
                    .unwrap(),
            )
            .unwrap();
    }
    courses
}

fn seeded_students() -> StudentRegistry {
    let mut students = StudentRegistry::new();
    for (id, reg_no, name, email) in [
        ("S001", "2023001", "John Doe", "john.doe@university.edu"),
        ("S002", "2023002", "Jane Smith", "jane.smith@university.edu"),
        ("S003", "2023003", "Bob Johnson", "bob.johnson@university.edu"),
    ] {
        students
            .add(Student::new(id, reg_no, name, email).unwrap())
            .unwrap();
    }
    students
}

#[test]
fn test_added_entities_are_found_and_keys_stay_unique() {
    let mut courses = seeded_courses();
    let mut students = seeded_students();

    assert_eq!(students.find_by_id("S002").unwrap().full_name(), "Jane Smith");
    assert_eq!(courses.find_by_id("ENG101").unwrap().title(), "English Composition");

    let duplicate_student = Student::new("S002", "2099999", "Impostor", "x@y.z").unwrap();
    assert!(matches!(
        students.add(duplicate_student),
        Err(RecordsError::DuplicateKey { .. })
    ));

    let duplicate_course = Course::builder("ENG101", "Other").build().unwrap();
    assert!(matches!(
        courses.add(duplicate_course),
        Err(RecordsError::DuplicateKey { .. })
    ));

    assert_eq!(students.find_all().len(), 3);
    assert_eq!(courses.find_all().len(), 7);
}

#[test]
fn test_full_enrollment_and_grading_flow() {
    let courses = seeded_courses();
    let mut students = seeded_students();

    students.enroll("S001", "CS101", &courses).unwrap();
    students.enroll("S001", "MATH201", &courses).unwrap();
    students.enroll("S001", "ENG101", &courses).unwrap();

    assert_eq!(
        StudentRegistry::calculate_gpa(students.find_by_id("S001").unwrap(), &courses),
        0.0
    );

    students.record_grade("S001", "CS101", Grade::A).unwrap();
    students.record_grade("S001", "MATH201", Grade::B).unwrap();

    let gpa = StudentRegistry::calculate_gpa(students.find_by_id("S001").unwrap(), &courses);
    assert!((gpa - 59.0 / 7.0).abs() < 1e-9);
    assert_eq!(format!("{:.2}", gpa), "8.43");

    let transcript = students.generate_transcript("S001", &courses).unwrap();
    assert!(transcript.contains("GPA: 8.43"));
    assert!(transcript.contains("- CS101: Introduction to Programming (3 credits) - A - Excellent"));
    assert!(transcript.contains("- ENG101: English Composition (3 credits) - Not graded"));
}

#[test]
fn test_credit_cap_and_duplicate_enrollment_rules() {
    let courses = seeded_courses();
    let mut students = seeded_students();

    students.enroll("S002", "LAB1", &courses).unwrap();
    assert!(matches!(
        students.enroll("S002", "LAB1", &courses),
        Err(RecordsError::AlreadyEnrolled { .. })
    ));

    students.enroll("S002", "LAB2", &courses).unwrap();
    students.enroll("S002", "LAB3", &courses).unwrap();
    assert!(matches!(
        students.enroll("S002", "LAB4", &courses),
        Err(RecordsError::CreditLimitExceeded {
            max_credits: 18,
            attempted_credits: 24
        })
    ));

    // Dropping a course frees its credits again.
    assert!(students.unenroll("S002", "LAB3"));
    students.enroll("S002", "LAB4", &courses).unwrap();
    assert!(!students.unenroll("S002", "CS101"));
}

#[test]
fn test_course_credit_changes_flow_into_gpa() {
    let mut courses = seeded_courses();
    let mut students = seeded_students();
    students.enroll("S003", "CS101", &courses).unwrap();
    students.enroll("S003", "ENG101", &courses).unwrap();
    students.record_grade("S003", "CS101", Grade::S).unwrap();
    students.record_grade("S003", "ENG101", Grade::F).unwrap();

    let before = StudentRegistry::calculate_gpa(students.find_by_id("S003").unwrap(), &courses);
    assert_eq!(before, 5.0);

    courses
        .update(
            "CS101",
            campus_records::CourseUpdate {
                credits: Some(9),
                ..Default::default()
            },
        )
        .unwrap();
    let after = StudentRegistry::calculate_gpa(students.find_by_id("S003").unwrap(), &courses);
    assert_eq!(after, 90.0 / 12.0);
}

#[test]
fn test_deactivation_keeps_history_and_excludes_from_top_report() {
    let courses = seeded_courses();
    let mut students = seeded_students();
    students.enroll("S001", "CS101", &courses).unwrap();
    students.enroll("S002", "CS101", &courses).unwrap();
    students.record_grade("S001", "CS101", Grade::S).unwrap();
    students.record_grade("S002", "CS101", Grade::C).unwrap();

    students.deactivate("S001").unwrap();

    assert_eq!(students.find_all().len(), 3);
    let john = students.find_by_id("S001").unwrap();
    assert!(!john.is_active());
    assert_eq!(john.enrollments().len(), 1);
    assert!(students.generate_transcript("S001", &courses).is_ok());

    let top = reports::top_students_by_gpa(students.iter(), &courses);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].student_id, "S002");

    // Inactive students still count towards grade distribution.
    let distribution = reports::grade_distribution(students.iter());
    assert_eq!(distribution.total, 2);
    assert_eq!(distribution.count(Grade::S), 1);
}

#[test]
fn test_department_report_ignores_inactive_courses() {
    let mut courses = seeded_courses();
    courses.deactivate("ENG101").unwrap();

    let stats = reports::department_statistics(courses.iter());
    let departments: Vec<&str> = stats.iter().map(|d| d.department.as_str()).collect();
    assert_eq!(departments, vec!["Computer Science", "Mathematics", "Science"]);
    assert_eq!(stats[2].courses, 4);
}
