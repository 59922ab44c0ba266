//! Driver implementations.

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(feature = "opencl")]
pub mod opencl;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockDriver;

#[cfg(feature = "opencl")]
pub use opencl::OpenClDriver;
