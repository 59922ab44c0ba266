//! Harp Dispatch: accelerator discovery and single-kernel dispatch
//!
//! Finds a compute device through the native driver, compiles a kernel for
//! it and runs one unit of work, blocking until the device reports
//! completion.
//!
//! # Architecture
//!
//! - **driver**: the [`Driver`] boundary the pipeline is written against
//! - **platform** / **device**: two-phase enumeration, vendor and device selection
//! - **context** / **program** / **dispatch**: resource creation, build, submission
//! - **pipeline**: the ordered stages, first failure wins
//! - **runtime**: driver implementations (OpenCL behind the `opencl` feature,
//!   a scripted in-process driver behind the `mock` feature)
//!
//! # Feature Flags
//!
//! - `opencl`: Enable the OpenCL driver and the `harp-dispatch` binary
//! - `mock`: Expose the scripted driver in `runtime::mock` for downstream tests
//!
//! # Example
//!
//! ```ignore
//! use harp_dispatch::{DispatchConfig, OpenClDriver, pipeline};
//!
//! let report = pipeline::run(&OpenClDriver::new(), &DispatchConfig::default())?;
//! println!("ran {}", report.entry_point);
//! ```

// ============================================================================
// Core Modules
// ============================================================================

pub mod config;
pub mod context;
pub mod device;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod program;
mod query;
pub mod runtime;
pub mod source;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{AMD_VENDOR, DispatchConfig};
pub use driver::{BuildFailure, DeviceClass, Driver, Status, WorkSize};
pub use error::{Error, Result, SENTINEL_STATUS, Stage};
pub use pipeline::{PipelineReport, exit_code};
pub use platform::PlatformSummary;
pub use query::trim_padding;
pub use source::{ENTRY_POINT, KernelSource};

#[cfg(feature = "opencl")]
pub use runtime::OpenClDriver;
