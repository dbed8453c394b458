//! The probe sequence run by `joycore-probe`: query the controller, read
//! every stored file and decode its config.

use std::io::Write;

use log::debug;

use crate::{
    commands::{
        device::{DebugStorage, Identify, Status, StorageInfo},
        file::{FileData, FileError, ListFiles, ReadFile, CONFIG_FILE, FIRMWARE_VERSION_FILE},
    },
    config::decode_config,
    report::{hex_dump, write_config, write_key_sections},
    Connection,
};

/// How many hex characters of an unrecognised file are shown.
const PREVIEW_HEX_CHARS: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeOptions {
    /// Also dump the whole config blob, not just its key sections.
    pub full_hex_dump: bool,
}

/// What a probe run found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    pub storage_initialized: bool,
    pub files: Vec<String>,
    /// Set when any file read got an `ERROR:` response.
    pub read_errors: bool,
    pub identify_version: Option<String>,
    pub file_version: Option<String>,
}

impl ProbeSummary {
    pub fn files_readable(&self) -> bool {
        !self.files.is_empty() && !self.read_errors
    }

    /// Whether both versions are known and differ.
    pub fn version_mismatch(&self) -> bool {
        matches!(
            (&self.identify_version, &self.file_version),
            (Some(identify), Some(file)) if identify != file
        )
    }

    /// Process exit code: 2 when there were no files, 3 on read errors, 0
    /// otherwise. No files takes precedence.
    pub fn exit_code(&self) -> u8 {
        if self.files.is_empty() {
            2
        } else if self.read_errors {
            3
        } else {
            0
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "YES"
    } else {
        "NO"
    }
}

/// Runs the probe over an already connected controller, writing progress to
/// `out`.
///
/// Device-side failures are reported in the output and the summary. Only
/// transport and output errors are returned.
pub async fn run<C: Connection, W: Write>(
    connection: &mut C,
    out: &mut W,
    options: ProbeOptions,
) -> Result<ProbeSummary, C::Error> {
    let mut summary = ProbeSummary::default();

    writeln!(out, "2. Testing basic communication & identifying firmware...")?;
    let status = connection.execute_command(Status).await?;
    writeln!(
        out,
        "   STATUS response: {}",
        status.as_deref().unwrap_or("No response")
    )?;

    let identity = connection.execute_command(Identify).await?;
    writeln!(
        out,
        "   IDENTIFY firmware version: {}",
        identity.firmware_version.as_deref().unwrap_or("<not received>")
    )?;
    summary.identify_version = identity.firmware_version;

    writeln!(out, "\n3. Debugging storage state...")?;
    writeln!(out, "   Storage debug output:")?;
    for line in connection.execute_command(DebugStorage).await? {
        writeln!(out, "     {line}")?;
    }

    writeln!(out, "\n4. Getting storage information...")?;
    let storage = connection.execute_command(StorageInfo).await?;
    for line in &storage.lines {
        writeln!(out, "   {line}")?;
    }
    summary.storage_initialized = storage.initialized;

    writeln!(out, "\n5. Listing files (from actual storage)...")?;
    summary.files = connection.execute_command(ListFiles).await?;
    if summary.files.is_empty() {
        writeln!(out, "   No files found in storage (will not auto-create).")?;
    } else {
        writeln!(out, "   Found files:")?;
        for file in &summary.files {
            writeln!(out, "     - {file}")?;
        }

        writeln!(out, "\n6. Reading files...")?;
        for name in summary.files.clone() {
            writeln!(out, "\n   Reading {name}:")?;

            match connection.execute_command(ReadFile::new(&name)).await? {
                Ok(data) => {
                    if let Some(version) = show_file(out, &name, &data, options)? {
                        summary.file_version = Some(version);
                    }
                }
                Err(FileError::Device(line)) => {
                    writeln!(out, "     {line}")?;
                    summary.read_errors = true;
                }
                Err(err @ FileError::MissingData(_)) => {
                    debug!("{err}");
                    writeln!(out, "     No file data received")?;
                }
            }
        }
    }

    writeln!(out, "\n7. Test complete!")?;
    writeln!(out, "\nSUMMARY:")?;
    writeln!(
        out,
        "  - Storage initialized: {}",
        yes_no(summary.storage_initialized)
    )?;
    writeln!(out, "  - Files found: {}", summary.files.len())?;
    writeln!(out, "  - Files readable: {}", yes_no(summary.files_readable()))?;
    if let Some(version) = &summary.identify_version {
        writeln!(out, "  - Firmware (IDENTIFY): {version}")?;
    }
    if let Some(version) = &summary.file_version {
        writeln!(out, "  - Firmware ({FIRMWARE_VERSION_FILE}): {version}")?;
    }
    if summary.version_mismatch() {
        writeln!(out, "  - NOTE: Version mismatch (IDENTIFY vs file)")?;
    }

    Ok(summary)
}

/// Prints one file's contents. Returns the firmware version if this was the
/// version file.
fn show_file<W: Write>(
    out: &mut W,
    name: &str,
    data: &FileData,
    options: ProbeOptions,
) -> std::io::Result<Option<String>> {
    writeln!(out, "     File: {}", data.name)?;
    match data.size {
        Some(size) => writeln!(out, "     Size: {size} bytes")?,
        None => writeln!(out, "     Size: unknown")?,
    }

    let Some(hex) = &data.hex else {
        return Ok(None);
    };
    let preview: String = hex.chars().take(PREVIEW_HEX_CHARS).collect();

    match name {
        FIRMWARE_VERSION_FILE => match data.text() {
            Ok(version) => {
                writeln!(out, "     Firmware Version (file): '{version}'")?;
                return Ok(Some(version));
            }
            Err(_) => writeln!(out, "     Raw hex: {preview}...")?,
        },
        CONFIG_FILE => match data.bytes() {
            Ok(blob) => {
                write_key_sections(out, &blob)?;
                if options.full_hex_dump {
                    writeln!(out, "\n=== FULL HEX DUMP ===\n{}", hex_dump(&blob, 0))?;
                }
                match decode_config(&blob) {
                    Ok(config) => write_config(out, &config)?,
                    Err(err) => writeln!(out, "\nERROR: {err}")?,
                }
            }
            Err(err) => writeln!(out, "\nERROR: Failed to decode config: {err}")?,
        },
        _ => writeln!(out, "     Data (hex): {preview}...")?,
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::ProbeSummary;

    fn summary(files: &[&str], read_errors: bool) -> ProbeSummary {
        ProbeSummary {
            files: files.iter().map(|file| file.to_string()).collect(),
            read_errors,
            ..Default::default()
        }
    }

    #[test]
    fn exit_codes() {
        assert_eq!(summary(&["/config.bin"], false).exit_code(), 0);
        assert_eq!(summary(&[], false).exit_code(), 2);
        assert_eq!(summary(&["/config.bin"], true).exit_code(), 3);
        // No files wins over read errors
        assert_eq!(summary(&[], true).exit_code(), 2);
    }

    #[test]
    fn version_mismatch() {
        let mut summary = summary(&["/fw_version.txt"], false);
        assert!(!summary.version_mismatch());

        summary.identify_version = Some("1.4.2".to_string());
        assert!(!summary.version_mismatch());

        summary.file_version = Some("1.4.2".to_string());
        assert!(!summary.version_mismatch());

        summary.file_version = Some("1.4.1".to_string());
        assert!(summary.version_mismatch());
        assert!(summary.files_readable());
    }
}
