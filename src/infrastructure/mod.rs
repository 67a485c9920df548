pub mod memory_source;
pub mod sqlite_source;
