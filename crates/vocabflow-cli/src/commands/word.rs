//! Word management commands for CLI.

use clap::Subcommand;
use vocabflow_core::Word;

use super::open_library;

#[derive(Subcommand)]
pub enum WordAction {
    /// Add a word to a list
    Add {
        /// List ID
        list_id: String,
        /// English text
        english: String,
        /// Meaning shown on the back of the card
        #[arg(long)]
        definition: String,
        #[arg(long, default_value = "")]
        phonetic: String,
        #[arg(long, default_value = "")]
        part_of_speech: String,
    },
    /// Edit the display text of a word, keeping its learning history
    Edit {
        /// List ID
        list_id: String,
        /// Word ID
        word_id: String,
        #[arg(long)]
        english: Option<String>,
        #[arg(long)]
        phonetic: Option<String>,
        #[arg(long)]
        definition: Option<String>,
    },
    /// Delete a word (also drops it from the consolidation queue)
    Delete {
        /// List ID
        list_id: String,
        /// Word ID
        word_id: String,
    },
    /// Copy a word into another list with a clean history
    Copy {
        /// Source list ID
        from: String,
        /// Word ID
        word_id: String,
        /// Target list ID
        to: String,
    },
}

pub fn run(action: WordAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_library()?;

    match action {
        WordAction::Add {
            list_id,
            english,
            definition,
            phonetic,
            part_of_speech,
        } => {
            let mut list = db.load_list(&list_id)?;
            let mut word = Word::new(english, phonetic, definition);
            word.part_of_speech = part_of_speech;
            let added = list.add_word(word).clone();
            db.save_list(&list)?;
            println!("Word added: {}", added.id);
            println!("{}", serde_json::to_string_pretty(&added)?);
        }
        WordAction::Edit {
            list_id,
            word_id,
            english,
            phonetic,
            definition,
        } => {
            let mut list = db.load_list(&list_id)?;
            let current = list.require_word_mut(&word_id)?.clone();
            let edited = list
                .edit_word(
                    &word_id,
                    english.unwrap_or(current.english),
                    phonetic.unwrap_or(current.phonetic),
                    definition.unwrap_or(current.definition),
                )?
                .clone();
            db.save_list(&list)?;
            println!("{}", serde_json::to_string_pretty(&edited)?);
        }
        WordAction::Delete { list_id, word_id } => {
            let mut list = db.load_list(&list_id)?;
            let removed = list.remove_word(&word_id)?;
            db.save_list(&list)?;
            println!("Word deleted: {} ({})", removed.id, removed.english);
        }
        WordAction::Copy { from, word_id, to } => {
            let source = db.load_list(&from)?;
            let word = source
                .word(&word_id)
                .ok_or_else(|| vocabflow_core::CoreError::WordNotFound {
                    list_id: from.clone(),
                    word_id: word_id.clone(),
                })?;
            let mut target = db.load_list(&to)?;
            let copied = target.add_copy_of(word)?.clone();
            db.save_list(&target)?;
            println!("Word copied: {}", copied.id);
            println!("{}", serde_json::to_string_pretty(&copied)?);
        }
    }
    Ok(())
}
