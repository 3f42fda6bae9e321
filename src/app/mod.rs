// Application layer: file-facing services built on the core registries.

pub mod backup;
pub mod import_export;
pub mod store;
