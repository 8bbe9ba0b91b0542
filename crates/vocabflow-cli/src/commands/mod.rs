pub mod config;
pub mod data;
pub mod list;
pub mod stats;
pub mod study;
pub mod word;

use vocabflow_core::storage::Database;

/// Open the library, seeding the starter list on first use.
pub fn open_library() -> Result<Database, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    db.seed_defaults()?;
    Ok(db)
}
