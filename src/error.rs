//! Error types for the dispatch pipeline.

use thiserror::Error;

use crate::driver::{DeviceClass, Status};

/// Status reported for failures that have no natural driver code
/// (no matching vendor, no device, inconsistent enumeration).
pub const SENTINEL_STATUS: Status = -1;

/// Pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Platform or device count/list queries.
    Enumeration,
    /// Vendor filtering and device selection.
    Selection,
    /// Execution context creation.
    Context,
    /// Program creation, build and entry point extraction.
    Compilation,
    /// Queue creation, submission and synchronization.
    Dispatch,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Enumeration => "enumeration",
            Stage::Selection => "selection",
            Stage::Context => "context",
            Stage::Compilation => "compilation",
            Stage::Dispatch => "dispatch",
        };
        f.write_str(name)
    }
}

/// Error type for the dispatch pipeline.
///
/// Every variant is fatal. Driver failures carry the raw driver status.
#[derive(Debug, Error)]
pub enum Error {
    #[error("platform query failed with error code {status}")]
    PlatformQuery { status: Status },

    #[error("platform vendor query failed with error code {status}")]
    PlatformInfoQuery { status: Status },

    #[error("{query} returned {actual} entries after negotiating {expected}")]
    CountMismatch {
        query: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("could not find a platform from vendor \"{vendor}\"")]
    VendorNotFound { vendor: String },

    #[error("device query failed with error code {status}")]
    DeviceQuery { status: Status },

    #[error("no {class} device found on the selected platform")]
    NoDeviceFound { class: DeviceClass },

    #[error("context creation failed with error code {status}")]
    ContextCreation { status: Status },

    #[error("program creation failed with error code {status}")]
    ProgramCreation { status: Status },

    #[error("program build failed with error code {status}")]
    ProgramBuild { status: Status, log: String },

    #[error("kernel `{name}` extraction failed with error code {status}")]
    KernelExtraction { name: String, status: Status },

    #[error("command queue creation failed with error code {status}")]
    QueueCreation { status: Status },

    #[error("kernel submission failed with error code {status}")]
    Submission { status: Status },

    #[error("queue synchronization failed with error code {status}")]
    Synchronization { status: Status },
}

impl Error {
    /// Returns the stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Error::PlatformQuery { .. }
            | Error::PlatformInfoQuery { .. }
            | Error::CountMismatch { .. }
            | Error::DeviceQuery { .. } => Stage::Enumeration,
            Error::VendorNotFound { .. } | Error::NoDeviceFound { .. } => Stage::Selection,
            Error::ContextCreation { .. } => Stage::Context,
            Error::ProgramCreation { .. }
            | Error::ProgramBuild { .. }
            | Error::KernelExtraction { .. } => Stage::Compilation,
            Error::QueueCreation { .. }
            | Error::Submission { .. }
            | Error::Synchronization { .. } => Stage::Dispatch,
        }
    }

    /// Returns the numeric status used as the process exit code.
    pub fn status(&self) -> Status {
        match self {
            Error::PlatformQuery { status }
            | Error::PlatformInfoQuery { status }
            | Error::DeviceQuery { status }
            | Error::ContextCreation { status }
            | Error::ProgramCreation { status }
            | Error::ProgramBuild { status, .. }
            | Error::KernelExtraction { status, .. }
            | Error::QueueCreation { status }
            | Error::Submission { status }
            | Error::Synchronization { status } => *status,
            Error::CountMismatch { .. }
            | Error::VendorNotFound { .. }
            | Error::NoDeviceFound { .. } => SENTINEL_STATUS,
        }
    }

    /// Returns the driver build log, if this is a build failure.
    pub fn build_log(&self) -> Option<&str> {
        match self {
            Error::ProgramBuild { log, .. } => Some(log),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
