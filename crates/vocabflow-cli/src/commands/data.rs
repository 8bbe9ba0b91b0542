//! Backup and restore commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;
use vocabflow_core::{LibraryBundle, WordList};

use super::{open_library, study};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export every list as a JSON backup
    Export {
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the library with a JSON backup
    Import {
        /// Backup file
        path: PathBuf,
    },
    /// Replace the library with the starter list
    Reset,
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_library()?;

    match action {
        DataAction::Export { output } => {
            let json = LibraryBundle::new(db.lists()?).to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        DataAction::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let bundle = LibraryBundle::from_json(&json)?;
            db.replace_all(&bundle.lists)?;
            study::discard(&db)?;
            println!("Imported {} lists", bundle.lists.len());
        }
        DataAction::Reset => {
            db.replace_all(&[WordList::starter()])?;
            study::discard(&db)?;
            println!("library reset to defaults");
        }
    }
    Ok(())
}
