//! HTTP API handlers for mocklog-web

pub mod buildinfo;
pub mod classify;
pub mod export;
pub mod health;
pub mod import;
pub mod options;
pub mod records;
pub mod statistics;

pub use buildinfo::get_build_info;
pub use classify::classify_chapter;
pub use export::export_csv;
pub use health::health_routes;
pub use import::import_upload;
pub use options::get_options;
pub use records::{create_record, list_records};
pub use statistics::get_statistics;
