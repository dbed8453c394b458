//! Status and storage queries.

use crate::Connection;

use super::Command;

/// `STATUS`: a liveness check. Outputs the first response line, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct Status;

impl Command for Status {
    type Output = Option<String>;

    async fn execute<C: Connection + ?Sized>(
        self,
        connection: &mut C,
    ) -> Result<Self::Output, C::Error> {
        Ok(connection.send_command("STATUS").await?.into_iter().next())
    }
}

/// `IDENTIFY`: asks the controller for its identity line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub lines: Vec<String>,
    /// Last field of the first `JOYCORE_ID:` line with at least four fields.
    pub firmware_version: Option<String>,
}

impl Identity {
    pub fn from_lines(lines: Vec<String>) -> Self {
        let firmware_version = lines
            .iter()
            .filter(|line| line.starts_with("JOYCORE_ID:"))
            .map(|line| line.split(':').collect::<Vec<_>>())
            .find(|fields| fields.len() >= 4)
            .and_then(|fields| fields.last().map(|version| version.to_string()));

        Self {
            lines,
            firmware_version,
        }
    }
}

impl Command for Identify {
    type Output = Identity;

    async fn execute<C: Connection + ?Sized>(
        self,
        connection: &mut C,
    ) -> Result<Self::Output, C::Error> {
        Ok(Identity::from_lines(
            connection.send_command("IDENTIFY").await?,
        ))
    }
}

/// `DEBUG_STORAGE`: free-form storage diagnostics, one line each.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugStorage;

impl Command for DebugStorage {
    type Output = Vec<String>;

    async fn execute<C: Connection + ?Sized>(
        self,
        connection: &mut C,
    ) -> Result<Self::Output, C::Error> {
        connection.send_command("DEBUG_STORAGE").await
    }
}

/// `STORAGE_INFO`: storage state as `KEY:VALUE` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageState {
    pub lines: Vec<String>,
    pub initialized: bool,
}

impl StorageState {
    pub fn from_lines(lines: Vec<String>) -> Self {
        let initialized = lines
            .iter()
            .any(|line| line.contains("STORAGE_INITIALIZED:YES"));

        Self { lines, initialized }
    }
}

impl Command for StorageInfo {
    type Output = StorageState;

    async fn execute<C: Connection + ?Sized>(
        self,
        connection: &mut C,
    ) -> Result<Self::Output, C::Error> {
        Ok(StorageState::from_lines(
            connection.send_command("STORAGE_INFO").await?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{Identity, StorageState};

    fn lines(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn identify_version() {
        let identity = Identity::from_lines(lines(&["JOYCORE_ID:RP2040:JoyCore:1.4.2"]));
        assert_eq!(identity.firmware_version.as_deref(), Some("1.4.2"));
    }

    #[test]
    fn identify_needs_four_fields() {
        let identity = Identity::from_lines(lines(&["JOYCORE_ID:RP2040:1.4.2", "READY"]));
        assert_eq!(identity.firmware_version, None);
        assert_eq!(identity.lines.len(), 2);

        assert_eq!(Identity::from_lines(Vec::new()).firmware_version, None);
    }

    #[test]
    fn storage_initialized() {
        let state = StorageState::from_lines(lines(&["STORAGE_USED:1024", "STORAGE_INITIALIZED:YES"]));
        assert!(state.initialized);

        let state = StorageState::from_lines(lines(&["STORAGE_INITIALIZED:NO"]));
        assert!(!state.initialized);
    }
}
