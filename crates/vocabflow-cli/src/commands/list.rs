//! Word list management commands for CLI.

use clap::Subcommand;
use serde::Serialize;
use vocabflow_core::{Clock, Config, ListProgress, SystemClock, Word, WordList, WordStatus};

use super::{open_library, study};

#[derive(Subcommand)]
pub enum ListAction {
    /// Create a new list
    Create {
        /// List name
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Rename a list or change its description
    Edit {
        /// List ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a list and its daily counters
    Delete {
        /// List ID
        id: String,
    },
    /// List all lists with their progress
    List,
    /// Show every word of a list with its learning status
    Show {
        /// List ID
        id: String,
    },
}

#[derive(Serialize)]
struct ListSummary<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    #[serde(flatten)]
    progress: ListProgress,
}

#[derive(Serialize)]
struct WordView<'a> {
    #[serde(flatten)]
    word: &'a Word,
    #[serde(flatten)]
    status: WordStatus,
}

pub fn run(action: ListAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_library()?;

    match action {
        ListAction::Create { name, description } => {
            let list = WordList::new(name, description);
            db.save_list(&list)?;
            println!("List created: {}", list.id);
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        ListAction::Edit {
            id,
            name,
            description,
        } => {
            let mut list = db.load_list(&id)?;
            if let Some(name) = name {
                list.name = name;
            }
            if let Some(description) = description {
                list.description = description;
            }
            db.save_list(&list)?;
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        ListAction::Delete { id } => {
            if !db.delete_list(&id)? {
                return Err(format!("list '{id}' not found").into());
            }
            study::discard_for_list(&db, &id)?;
            println!("List deleted: {id}");
        }
        ListAction::List => {
            let review = Config::load()?.review_clock()?;
            let now = SystemClock.now_ms();
            let lists = db.lists()?;
            let summaries: Vec<ListSummary> = lists
                .iter()
                .map(|list| ListSummary {
                    id: &list.id,
                    name: &list.name,
                    description: &list.description,
                    progress: ListProgress::compute(list, &review, now),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        ListAction::Show { id } => {
            let review = Config::load()?.review_clock()?;
            let list = db.load_list(&id)?;
            let words: Vec<WordView> = list
                .words
                .iter()
                .map(|word| WordView {
                    word,
                    status: review.status(&list, word),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&words)?);
        }
    }
    Ok(())
}
