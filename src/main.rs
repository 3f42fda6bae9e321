use anyhow::Context;
use campus_records::config::{
    Command, CourseCommand, EnrollmentArgs, ImportKind, ReportKind, StudentCommand,
};
use campus_records::core::reports::{self, DepartmentStatistics, EnrollmentStatistics, TopStudents};
use campus_records::core::{ConfigProvider, Searchable};
use campus_records::utils::error::ErrorCategory;
use campus_records::utils::{logger, validation::Validate};
use campus_records::{
    BackupService, CliConfig, Course, CourseUpdate, DataStore, LocalStorage, Records,
    RecordsError, Student, StudentRegistry, TomlConfig,
};
use clap::Parser;
use serde::Serialize;

fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(exit_code(&e));
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }
    tracing::debug!("Resolved config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    if let Err(e) = run(cli.command, &config) {
        // 記錄詳細錯誤信息
        match e.downcast_ref::<RecordsError>() {
            Some(records_error) => {
                tracing::error!(
                    "❌ {} (Category: {:?})",
                    records_error,
                    records_error.category()
                );
                eprintln!("❌ {}", records_error.user_friendly_message());
                eprintln!("💡 {}", records_error.recovery_suggestion());
                std::process::exit(exit_code(records_error));
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn exit_code(error: &RecordsError) -> i32 {
    match error.category() {
        ErrorCategory::Validation => 2,
        ErrorCategory::NotFound => 3,
        ErrorCategory::Conflict => 4,
        ErrorCategory::Storage => 5,
        ErrorCategory::Configuration => 6,
    }
}

fn run(command: Command, config: &TomlConfig) -> anyhow::Result<()> {
    let store = DataStore::new(LocalStorage::new(config.data_directory()));
    let mut records = store.load().with_context(|| {
        format!(
            "loading records from {}",
            config.data_directory().display()
        )
    })?;

    let modified = execute(command, &mut records, config)?;

    if modified {
        store.save(&records)?;
        tracing::debug!("Saved records to {}", config.data_directory().display());
    }
    Ok(())
}

/// Runs one command; returns whether the records changed.
fn execute(command: Command, records: &mut Records, config: &TomlConfig) -> anyhow::Result<bool> {
    let Records { students, courses } = records;

    match command {
        Command::Student(cmd) => match cmd {
            StudentCommand::Add {
                id,
                reg_no,
                name,
                email,
            } => {
                students.add(Student::new(id, reg_no, name, email)?)?;
                println!("✅ Student added");
                Ok(true)
            }
            StudentCommand::Update { id, name, email } => {
                students.update(&id, name.as_deref(), email.as_deref())?;
                println!("✅ Student {} updated", id);
                Ok(true)
            }
            StudentCommand::Deactivate { id } => {
                students.deactivate(&id)?;
                println!("✅ Student {} deactivated", id);
                Ok(true)
            }
            StudentCommand::Show { id } => {
                let student = students
                    .find_by_id(&id)
                    .ok_or_else(|| RecordsError::not_found("Student", id.as_str()))?;
                println!("{}", student);
                println!(
                    "GPA: {:.2}",
                    StudentRegistry::calculate_gpa(student, &*courses)
                );
                Ok(false)
            }
            StudentCommand::List { active_only } => {
                let listed = students.search(|s| !active_only || s.is_active());
                if listed.is_empty() {
                    println!("No students found.");
                }
                for student in listed {
                    println!("{}", student);
                }
                Ok(false)
            }
        },
        Command::Course(cmd) => match cmd {
            CourseCommand::Add {
                code,
                title,
                credits,
                instructor,
                semester,
                department,
            } => {
                let mut builder = Course::builder(code, title)
                    .credits(credits)
                    .instructor(instructor)
                    .department(department);
                if let Some(semester) = semester {
                    builder = builder.semester(semester);
                }
                courses.add(builder.build()?)?;
                println!("✅ Course added");
                Ok(true)
            }
            CourseCommand::Update {
                code,
                title,
                credits,
                instructor,
                semester,
                department,
            } => {
                courses.update(
                    &code,
                    CourseUpdate {
                        title,
                        credits,
                        instructor,
                        semester,
                        department,
                    },
                )?;
                println!("✅ Course {} updated", code);
                Ok(true)
            }
            CourseCommand::Deactivate { code } => {
                courses.deactivate(&code)?;
                println!("✅ Course {} deactivated", code);
                Ok(true)
            }
            CourseCommand::List {
                instructor,
                department,
                semester,
            } => {
                let mut listed = match (&instructor, &department) {
                    (Some(instructor), _) => courses.find_by_instructor(instructor),
                    (None, Some(department)) => courses.find_by_department(department),
                    (None, None) => courses.find_all(),
                };
                if let (Some(_), Some(department)) = (&instructor, &department) {
                    listed.retain(|c| c.department().eq_ignore_ascii_case(department));
                }
                if let Some(semester) = semester {
                    listed.retain(|c| c.semester() == Some(semester));
                }
                if listed.is_empty() {
                    println!("No courses found.");
                }
                for course in listed {
                    println!("{}", course);
                }
                Ok(false)
            }
        },
        Command::Enroll(EnrollmentArgs { student, course }) => {
            students.enroll(&student, &course, &*courses)?;
            println!("✅ Enrolled {} in {}", student, course);
            Ok(true)
        }
        Command::Unenroll(EnrollmentArgs { student, course }) => {
            if students.unenroll(&student, &course) {
                println!("✅ Unenrolled {} from {}", student, course);
                Ok(true)
            } else {
                println!("Student {} is not enrolled in {}", student, course);
                Ok(false)
            }
        }
        Command::Grade { enrollment, grade } => {
            students.record_grade(&enrollment.student, &enrollment.course, grade)?;
            println!("✅ Recorded {} for {} in {}", grade, enrollment.student, enrollment.course);
            Ok(true)
        }
        Command::Transcript { student } => {
            print!("{}", students.generate_transcript(&student, &*courses)?);
            Ok(false)
        }
        Command::Report { kind, json } => {
            match kind {
                ReportKind::Top => {
                    let top = reports::top_students_by_gpa(students.iter(), &*courses);
                    emit(&top, json, || TopStudents(&top).to_string())?;
                }
                ReportKind::Grades => {
                    let distribution = reports::grade_distribution(students.iter());
                    emit(&distribution, json, || distribution.to_string())?;
                }
                ReportKind::Enrollments => {
                    let stats = reports::enrollment_statistics(students.iter(), &*courses);
                    emit(&stats, json, || EnrollmentStatistics(&stats).to_string())?;
                }
                ReportKind::Departments => {
                    let stats = reports::department_statistics(courses.iter());
                    emit(&stats, json, || DepartmentStatistics(&stats).to_string())?;
                }
            }
            Ok(false)
        }
        Command::Import { kind, file } => {
            let directory = file.parent().map(|p| p.to_path_buf()).unwrap_or_default();
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .context("import path has no file name")?;
            let io = campus_records::ImportExportService::new(LocalStorage::new(directory));
            let summary = match kind {
                ImportKind::Students => io.import_students(students, &name)?,
                ImportKind::Courses => io.import_courses(courses, &name)?,
                ImportKind::Enrollments => io.import_enrollments(students, courses, &name)?,
            };
            println!(
                "✅ Imported {} rows ({} skipped)",
                summary.imported, summary.skipped
            );
            Ok(summary.imported > 0)
        }
        Command::Export { directory } => {
            let io = campus_records::ImportExportService::new(LocalStorage::new(&directory));
            io.export_all(students, courses)?;
            println!("📁 Exported records to {}", directory.display());
            Ok(false)
        }
        Command::Backup { archive } => {
            let backup = BackupService::new(config);
            let backup_dir = backup.create_backup(students, courses)?;
            let size = backup.backup_size(&backup_dir)?;
            println!("📁 Backup saved to {} ({} bytes)", backup_dir.display(), size);
            for file in backup.list_files(&backup_dir, 1)? {
                println!("  {} - {} bytes", file.path.display(), file.size);
            }
            if archive {
                let archive_path = backup.archive_backup(&backup_dir)?;
                println!("📦 Archive written to {}", archive_path.display());
            }
            Ok(false)
        }
    }
}

fn emit<T, F>(report: &T, json: bool, render: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render());
    }
    Ok(())
}
