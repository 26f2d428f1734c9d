//! Terminal subcommands that work directly on the local database.

pub mod doctor;
pub mod log;
pub mod query;
pub mod residents;
