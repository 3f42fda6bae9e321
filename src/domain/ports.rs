use crate::domain::model::Course;
use crate::utils::error::Result;
use std::path::Path;

/// Query surface shared by the registries.
pub trait Searchable<T> {
    /// Clones of every item matching `predicate`, in insertion order.
    fn search<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool;

    /// Snapshot of the whole collection; later mutations do not show through.
    fn find_all(&self) -> Vec<T>;

    fn find_by_id(&self, id: &str) -> Option<&T>;
}

/// Resolves an enrollment's course code to the course it refers to.
pub trait CourseCatalog {
    fn course(&self, code: &str) -> Option<&Course>;
}

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    fn exists(&self, path: &str) -> bool;
}

pub trait ConfigProvider {
    fn data_directory(&self) -> &Path;
    fn backup_directory(&self) -> &Path;
}
