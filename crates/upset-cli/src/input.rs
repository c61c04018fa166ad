use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use upset_signals::ConversationEntry;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One message per non-blank line, in file order
pub fn parse_messages(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a chat transcript and attribute every line to `role`.
pub fn read_conversation(path: &Path, role: &str) -> Result<Vec<ConversationEntry>, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_messages(&contents)
        .into_iter()
        .map(|text| ConversationEntry::new(text, role))
        .collect())
}
