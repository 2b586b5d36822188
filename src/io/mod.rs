pub mod csv_import;
pub mod file;
pub mod svg;
