//! Process exit codes

use ell_core::{Error, HttpErrorKind};

/// Exit status of the `ell` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    UsageError = 2,
    NetworkError = 3,
    NotFound = 4,
    ConfigError = 5,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Exit code describing a library error
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Config(_) => ExitCode::ConfigError,
            Error::Http(e) if e.kind == HttpErrorKind::Timeout => ExitCode::NetworkError,
            Error::Http(_) if error.status() == Some(404) => ExitCode::NotFound,
            Error::Http(_) | Error::Network(_) => ExitCode::NetworkError,
            Error::Mode(_) | Error::InvalidMode(_) | Error::Closed(_) => ExitCode::UsageError,
            _ => ExitCode::GeneralError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ell_core::HttpError;

    #[test]
    fn test_from_error() {
        assert_eq!(
            ExitCode::from_error(&HttpError::read(404, "http://priv/get/x").into()),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from_error(&HttpError::save(500, "http://priv/upload/x").into()),
            ExitCode::NetworkError
        );
        assert_eq!(
            ExitCode::from_error(&HttpError::timeout("slow").into()),
            ExitCode::NetworkError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Config("bad host".into())),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::from_error(&Error::InvalidMode("rw".into())),
            ExitCode::UsageError
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::NotFound.as_i32(), 4);
    }
}
