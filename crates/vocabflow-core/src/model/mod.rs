mod list;
mod word;

pub use list::{ListId, WordList};
pub use word::{Timestamp, Word, WordId};
