use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use super::Target;

/// Splits a line-oriented source into targets, skipping blank lines.
#[must_use]
pub fn parse_targets(content: &str) -> Vec<Target> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Target::new)
        .collect()
}

/// Reads every target out of `reader`.
///
/// # Errors
///
/// Returns an error when the reader fails.
pub async fn read_targets<R>(reader: R) -> std::io::Result<Vec<Target>>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut targets = Vec::new();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() {
            targets.push(Target::new(line));
        }
    }
    Ok(targets)
}
