//! Kernel source compiled by the pipeline.

use std::borrow::Cow;

/// Name of the entry point declared by the embedded kernel.
pub const ENTRY_POINT: &str = "hello_world";

/// Embedded kernel source, declaring [`ENTRY_POINT`].
pub const HELLO_WORLD: &str = include_str!("../kernels/hello_world.cl");

/// One compilation unit together with the entry point to extract from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSource {
    text: Cow<'static, str>,
    entry_point: Cow<'static, str>,
}

impl KernelSource {
    /// Creates a source from arbitrary text.
    pub fn new(
        text: impl Into<Cow<'static, str>>,
        entry_point: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            text: text.into(),
            entry_point: entry_point.into(),
        }
    }

    /// The embedded `hello_world` kernel.
    pub const fn embedded() -> Self {
        Self {
            text: Cow::Borrowed(HELLO_WORLD),
            entry_point: Cow::Borrowed(ENTRY_POINT),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Source length in bytes, as passed to the driver.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Default for KernelSource {
    fn default() -> Self {
        Self::embedded()
    }
}
