use crate::app::import_export::ImportExportService;
use crate::config::cli::LocalStorage;
use crate::core::{ConfigProvider, CourseRegistry, StudentRegistry};
use crate::utils::error::Result;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupFile {
    pub path: PathBuf,
    pub size: u64,
}

pub struct BackupService {
    backup_root: PathBuf,
}

impl BackupService {
    pub fn new<C: ConfigProvider>(config: &C) -> Self {
        Self {
            backup_root: config.backup_directory().to_path_buf(),
        }
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Exports all records into a fresh `backup_<timestamp>` directory.
    pub fn create_backup(&self, students: &StudentRegistry, courses: &CourseRegistry) -> Result<PathBuf> {
        let backup_dir = self.next_backup_dir();
        fs::create_dir_all(&backup_dir)?;

        let exporter = ImportExportService::new(LocalStorage::new(&backup_dir));
        exporter.export_all(students, courses)?;

        tracing::info!("Created backup at {}", backup_dir.display());
        Ok(backup_dir)
    }

    /// Total size in bytes of the regular files under `directory`.
    pub fn backup_size(&self, directory: &Path) -> Result<u64> {
        Ok(self.list_files(directory, usize::MAX)?.iter().map(|f| f.size).sum())
    }

    /// Regular files at most `depth` levels below `directory`, sorted by path.
    pub fn list_files(&self, directory: &Path, depth: usize) -> Result<Vec<BackupFile>> {
        let mut files = Vec::new();
        collect_files(directory, depth, &mut files)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Packs `directory` into a sibling `<name>.zip` and returns its path.
    pub fn archive_backup(&self, directory: &Path) -> Result<PathBuf> {
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "backup".to_string());
        let archive_path = directory.with_file_name(format!("{}.zip", name));

        let files = self.list_files(directory, usize::MAX)?;
        tracing::debug!("Creating ZIP file with {} files", files.len());

        let mut zip = ZipWriter::new(File::create(&archive_path)?);
        for file in &files {
            let entry_name = file
                .path
                .strip_prefix(directory)
                .unwrap_or(&file.path)
                .to_string_lossy()
                .replace('\\', "/");
            zip.start_file(entry_name, SimpleFileOptions::default())?;
            zip.write_all(&fs::read(&file.path)?)?;
        }
        zip.finish()?;

        tracing::info!("Archived backup to {}", archive_path.display());
        Ok(archive_path)
    }

    fn next_backup_dir(&self) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let base = self.backup_root.join(format!("backup_{}", timestamp));
        let mut candidate = base.clone();
        let mut suffix = 1;
        while candidate.exists() {
            candidate = base.with_file_name(format!("backup_{}_{}", timestamp, suffix));
            suffix += 1;
        }
        candidate
    }
}

fn collect_files(directory: &Path, depth: usize, files: &mut Vec<BackupFile>) -> Result<()> {
    if depth == 0 {
        return Ok(());
    }

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), depth - 1, files)?;
        } else if file_type.is_file() {
            files.push(BackupFile {
                path: entry.path(),
                size: entry.metadata()?.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::core::{Course, Student};
    use std::io::Read;
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> BackupService {
        BackupService::new(&TomlConfig::with_data_directory(temp_dir.path()))
    }

    fn records() -> (StudentRegistry, CourseRegistry) {
        let mut courses = CourseRegistry::new();
        courses
            .add(Course::builder("CS101", "Introduction to Programming").credits(3).build().unwrap())
            .unwrap();
        let mut students = StudentRegistry::new();
        students
            .add(Student::new("S001", "2023001", "John Doe", "john@u.edu").unwrap())
            .unwrap();
        students.enroll("S001", "CS101", &courses).unwrap();
        (students, courses)
    }

    #[test]
    fn test_create_backup_writes_three_files() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let (students, courses) = records();

        let backup_dir = service.create_backup(&students, &courses).unwrap();

        assert!(backup_dir.starts_with(temp_dir.path().join("backups")));
        let name = backup_dir.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("backup_"));

        let files = service.list_files(&backup_dir, 1).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["courses.csv", "enrollments.csv", "students.csv"]);
    }

    #[test]
    fn test_backups_in_same_second_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let (students, courses) = records();

        let first = service.create_backup(&students, &courses).unwrap();
        let second = service.create_backup(&students, &courses).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_backup_size_sums_file_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let (students, courses) = records();
        let backup_dir = service.create_backup(&students, &courses).unwrap();

        let expected: u64 = ["students.csv", "courses.csv", "enrollments.csv"]
            .iter()
            .map(|f| fs::metadata(backup_dir.join(f)).unwrap().len())
            .sum();
        assert_eq!(service.backup_size(&backup_dir).unwrap(), expected);
        assert!(expected > 0);
    }

    #[test]
    fn test_list_files_respects_depth() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        fs::create_dir_all(temp_dir.path().join("a/b")).unwrap();
        fs::write(temp_dir.path().join("top.txt"), "1").unwrap();
        fs::write(temp_dir.path().join("a/mid.txt"), "22").unwrap();
        fs::write(temp_dir.path().join("a/b/deep.txt"), "333").unwrap();

        assert_eq!(service.list_files(temp_dir.path(), 0).unwrap().len(), 0);
        assert_eq!(service.list_files(temp_dir.path(), 1).unwrap().len(), 1);
        assert_eq!(service.list_files(temp_dir.path(), 2).unwrap().len(), 2);
        assert_eq!(service.backup_size(temp_dir.path()).unwrap(), 6);
    }

    #[test]
    fn test_archive_backup_contains_csv_files() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        let (students, courses) = records();
        let backup_dir = service.create_backup(&students, &courses).unwrap();

        let archive_path = service.archive_backup(&backup_dir).unwrap();
        assert_eq!(archive_path.extension().unwrap(), "zip");

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
        let mut students_csv = String::new();
        archive
            .by_name("students.csv")
            .unwrap()
            .read_to_string(&mut students_csv)
            .unwrap();
        assert!(students_csv.starts_with("ID,RegistrationNo,FullName,Email,Status"));
        assert!(students_csv.contains("S001,2023001,John Doe"));
    }
}
