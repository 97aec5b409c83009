use common::Result;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Lazily yields the lines of a newline-delimited feed with their 1-based
/// line numbers. Whitespace-only lines are skipped but still numbered.
pub struct LineSource<R> {
    lines: Lines<R>,
    line_number: u64,
}

impl LineSource<BufReader<File>> {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    pub async fn next_line(&mut self) -> Result<Option<(u64, String)>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            if !line.trim().is_empty() {
                return Ok(Some((self.line_number, line)));
            }
        }
        Ok(None)
    }

    pub async fn collect_all(mut self) -> Result<Vec<(u64, String)>> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line().await? {
            lines.push(line);
        }
        Ok(lines)
    }
}

/// Materializes the whole feed, for batch mode.
pub async fn read_all(path: impl AsRef<Path>) -> Result<Vec<(u64, String)>> {
    LineSource::open(path).await?.collect_all().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_lines_are_skipped_but_numbered() {
        let input: &[u8] = b"{\"a\": 1}\n\n   \n{\"b\": 2}\r\n{\"c\": 3}";
        let lines = LineSource::new(input).collect_all().await.unwrap();
        assert_eq!(
            lines,
            vec![
                (1, "{\"a\": 1}".to_string()),
                (4, "{\"b\": 2}".to_string()),
                (5, "{\"c\": 3}".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_all(dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(common::Error::Io(_))));
    }
}
