//! Resolution of the log directory and the per-run log file name.

use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::LoggerError;

/// `MM_DD_YYYY_HH_MM_SS`, the stem of every log file name.
const FILE_NAME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month]_[day]_[year]_[hour]_[minute]_[second]");

const FILE_EXTENSION: &str = "log";

/// The resolved location of the log file for the current run.
///
/// Two destinations resolved within the same wall-clock second for the same directory point at
/// the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDestination {
    logs_dir: PathBuf,
    file_name: String,
    file_path: PathBuf,
}

impl LogDestination {
    /// Resolves `log_dir` against the current working directory, creates it (and any missing
    /// parents) and names the log file after the current local time.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::CurrentDirectory`] if the working directory cannot be read, and
    /// [`LoggerError::LogDirectoryCreation`] if the directory cannot be created.
    pub fn create(log_dir: impl AsRef<Path>) -> Result<Self, LoggerError> {
        let cwd = std::env::current_dir().map_err(LoggerError::CurrentDirectory)?;
        // The local offset is unavailable in some multi-threaded environments.
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());

        Self::create_at(&cwd, log_dir.as_ref(), now)
    }

    pub(crate) fn create_at(
        cwd: &Path,
        log_dir: &Path,
        now: OffsetDateTime,
    ) -> Result<Self, LoggerError> {
        let logs_dir = cwd.join(log_dir);

        std::fs::create_dir_all(&logs_dir).map_err(|source| {
            LoggerError::LogDirectoryCreation {
                path: logs_dir.clone(),
                source,
            }
        })?;

        let file_name = file_name_for(now)?;
        let file_path = logs_dir.join(&file_name);

        Ok(Self {
            logs_dir,
            file_name,
            file_path,
        })
    }

    /// The directory holding the log file.
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// The log file name, without its directory.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The full path of the log file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn file_name_for(now: OffsetDateTime) -> Result<String, LoggerError> {
    Ok(format!("{}.{FILE_EXTENSION}", now.format(FILE_NAME_FORMAT)?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use time::macros::datetime;

    use super::*;

    #[test]
    fn file_name_is_zero_padded() {
        let name = file_name_for(datetime!(2024-01-05 09:03:07 UTC)).unwrap();
        assert_eq!(name, "01_05_2024_09_03_07.log");
    }

    #[test]
    fn creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = LogDestination::create_at(
            tmp.path(),
            Path::new("nested/logs"),
            datetime!(2024-01-15 10:30:00 UTC),
        )
        .unwrap();

        assert!(destination.logs_dir().is_dir());
        assert_eq!(destination.logs_dir(), tmp.path().join("nested/logs"));
        assert_eq!(
            destination.file_path(),
            tmp.path().join("nested/logs/01_15_2024_10_30_00.log")
        );
    }

    #[test]
    fn existing_directory_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let now = datetime!(2024-01-15 10:30:00 UTC);

        LogDestination::create_at(tmp.path(), Path::new("logs"), now).unwrap();
        LogDestination::create_at(tmp.path(), Path::new("logs"), now).unwrap();
    }

    #[test]
    fn same_second_collides() {
        let tmp = tempfile::tempdir().unwrap();
        let now = datetime!(2024-01-15 10:30:00.250 UTC);
        let later = datetime!(2024-01-15 10:30:00.900 UTC);

        let first = LogDestination::create_at(tmp.path(), Path::new("logs"), now).unwrap();
        let second = LogDestination::create_at(tmp.path(), Path::new("logs"), later).unwrap();
        let next_second = LogDestination::create_at(
            tmp.path(),
            Path::new("logs"),
            datetime!(2024-01-15 10:30:01 UTC),
        )
        .unwrap();

        assert_eq!(first.file_path(), second.file_path());
        assert_ne!(first.file_path(), next_second.file_path());
    }

    #[test]
    fn absolute_log_dir_ignores_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();

        let destination = LogDestination::create_at(
            other.path(),
            tmp.path(),
            datetime!(2024-01-15 10:30:00 UTC),
        )
        .unwrap();

        assert_eq!(destination.logs_dir(), tmp.path());
    }

    #[test]
    fn unwritable_location_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, b"").unwrap();

        let result = LogDestination::create_at(
            tmp.path(),
            Path::new("not_a_dir/logs"),
            datetime!(2024-01-15 10:30:00 UTC),
        );

        assert!(matches!(
            result,
            Err(LoggerError::LogDirectoryCreation { path, .. }) if path == blocker.join("logs")
        ));
    }
}
