//! Listing and reading files in the controller's storage.

use log::debug;
use thiserror::Error;

use crate::Connection;

use super::Command;

/// Where the firmware keeps its stored config.
pub const CONFIG_FILE: &str = "/config.bin";

/// Where the firmware writes its semantic version string.
pub const FIRMWARE_VERSION_FILE: &str = "/fw_version.txt";

/// `LIST_FILES`: names of every stored file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFiles;

/// Picks the names listed between `FILES:` and `END_FILES`.
pub fn parse_file_list(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .skip_while(|line| *line != "FILES:")
        .skip(1)
        .take_while(|line| *line != "END_FILES")
        .cloned()
        .collect()
}

impl Command for ListFiles {
    type Output = Vec<String>;

    async fn execute<C: Connection + ?Sized>(
        self,
        connection: &mut C,
    ) -> Result<Self::Output, C::Error> {
        let lines = connection.send_command("LIST_FILES").await?;
        Ok(parse_file_list(&lines))
    }
}

/// `READ_FILE <name>`: fetches a whole file as hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFile {
    pub name: String,
}

impl ReadFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The contents of a `FILE_DATA:<name>:<size>:<hex>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub name: String,
    /// Size as reported by the controller, if it was a number.
    pub size: Option<usize>,
    /// Hex contents. Absent when the line had only three fields.
    pub hex: Option<String>,
}

impl FileData {
    /// Parses a `FILE_DATA:` line. Needs at least name and size fields.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.strip_prefix("FILE_DATA:")?.splitn(3, ':');
        let name = fields.next()?.to_string();
        let size = fields.next()?;

        Some(Self {
            name,
            size: size.trim().parse().ok(),
            hex: fields.next().map(str::to_string),
        })
    }

    /// The decoded contents. A missing hex field decodes as empty.
    pub fn bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(self.hex.as_deref().unwrap_or_default())
    }

    /// The contents as text with NUL padding, line endings and spaces
    /// stripped from both ends.
    pub fn text(&self) -> Result<String, hex::FromHexError> {
        let bytes = self.bytes()?;
        Ok(String::from_utf8_lossy(&bytes)
            .trim_matches(['\0', '\r', '\n', ' '])
            .to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("{0}")]
    Device(String),
    #[error("No file data received for {0}")]
    MissingData(String),
}

impl Command for ReadFile {
    type Output = Result<FileData, FileError>;

    async fn execute<C: Connection + ?Sized>(
        self,
        connection: &mut C,
    ) -> Result<Self::Output, C::Error> {
        let lines = connection
            .send_command(&format!("READ_FILE {}", self.name))
            .await?;

        for line in &lines {
            if line.starts_with("ERROR:") {
                return Ok(Err(FileError::Device(line.clone())));
            }
            if let Some(data) = FileData::parse(line) {
                return Ok(Ok(data));
            }
        }

        debug!("READ_FILE {} got {} lines without file data", self.name, lines.len());
        Ok(Err(FileError::MissingData(self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_file_list, FileData};

    fn lines(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn file_list() {
        let files = parse_file_list(&lines(&[
            "STORAGE_READY",
            "FILES:",
            "/config.bin",
            "/fw_version.txt",
            "END_FILES",
        ]));
        assert_eq!(files, ["/config.bin", "/fw_version.txt"]);
    }

    #[test]
    fn empty_or_missing_list() {
        assert!(parse_file_list(&lines(&["FILES:", "END_FILES"])).is_empty());
        assert!(parse_file_list(&lines(&["/config.bin", "END_FILES"])).is_empty());
    }

    #[test]
    fn file_data_fields() {
        let data = FileData::parse("FILE_DATA:/fw_version.txt:7:312E342E320D0A").unwrap();

        assert_eq!(data.name, "/fw_version.txt");
        assert_eq!(data.size, Some(7));
        assert_eq!(data.text().unwrap(), "1.4.2");
    }

    #[test]
    fn file_data_without_hex() {
        let data = FileData::parse("FILE_DATA:/empty.bin:0").unwrap();

        assert_eq!(data.hex, None);
        assert!(data.bytes().unwrap().is_empty());
        assert!(FileData::parse("FILE_DATA:/x").is_none());
        assert!(FileData::parse("ERROR: nope").is_none());
    }

    #[test]
    fn hex_may_not_split() {
        let data = FileData::parse("FILE_DATA:/a:2:00:11").unwrap();
        assert_eq!(data.hex.as_deref(), Some("00:11"));
        assert!(data.bytes().is_err());
    }

    #[test]
    fn text_strips_padding() {
        let data = FileData::parse("FILE_DATA:/v:8:20312E300000").unwrap();
        assert_eq!(data.text().unwrap(), "1.0");
    }
}
