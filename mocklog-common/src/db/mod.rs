//! Record storage (SQLite)

pub mod init;
pub mod records;

pub use init::{init_database, init_memory_database};
pub use records::{
    append_record, append_records, count_records, load_all_records, load_records_for_test,
};
