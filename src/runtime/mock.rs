//! Scripted in-process driver.
//!
//! Simulates an accelerator driver without any native runtime. Platforms and
//! devices are declared up front, individual calls can be made to fail with a
//! chosen status, and every call and resource release is recorded so the
//! pipeline's ordering and cleanup can be inspected.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::driver::{BuildFailure, DeviceClass, Driver, Status, WorkSize};

/// Status reported when a program fails to build (`CL_BUILD_PROGRAM_FAILURE`).
pub const BUILD_PROGRAM_FAILURE: Status = -11;
/// Status reported for a kernel requested from an unbuilt program
/// (`CL_INVALID_PROGRAM_EXECUTABLE`).
pub const INVALID_PROGRAM_EXECUTABLE: Status = -45;
/// Status reported for an unknown entry point (`CL_INVALID_KERNEL_NAME`).
pub const INVALID_KERNEL_NAME: Status = -46;

/// A driver call, as recorded by [`MockDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    PlatformCount,
    PlatformList,
    /// Vendor size query for the platform at this index.
    VendorSize(usize),
    /// Vendor data query for the platform at this index.
    Vendor(usize),
    DeviceCount,
    DeviceList,
    CreateContext,
    CreateProgram,
    BuildProgram,
    CreateKernel,
    CreateQueue,
    EnqueueKernel,
    Finish,
}

/// Kind of owning resource released by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Context,
    Program,
    Kernel,
    Queue,
}

/// A simulated platform.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    vendor: Vec<u8>,
    devices: Vec<(DeviceClass, String)>,
}

impl MockPlatform {
    pub fn new(vendor: impl Into<String>) -> Self {
        Self::with_vendor_bytes(vendor.into().into_bytes())
    }

    /// A platform reporting `vendor` verbatim, which need not be UTF-8.
    pub fn with_vendor_bytes(vendor: impl Into<Vec<u8>>) -> Self {
        Self {
            vendor: vendor.into(),
            devices: Vec::new(),
        }
    }

    /// Adds a device of `class` named `name`.
    pub fn with_device(mut self, class: DeviceClass, name: impl Into<String>) -> Self {
        self.devices.push((class, name.into()));
        self
    }
}

/// Device handle: platform index and position in that platform's device table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockDeviceId {
    pub platform: usize,
    pub index: usize,
}

type ReleaseLog = Rc<RefCell<Vec<Resource>>>;

/// Owning handle that records its release.
#[derive(Debug)]
pub struct MockHandle {
    resource: Resource,
    log: ReleaseLog,
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.resource);
    }
}

#[derive(Debug)]
pub struct MockContext {
    _handle: MockHandle,
    device: MockDeviceId,
}

impl MockContext {
    pub fn device(&self) -> MockDeviceId {
        self.device
    }
}

#[derive(Debug)]
pub struct MockProgram {
    _handle: MockHandle,
    source: String,
    built: bool,
}

impl MockProgram {
    pub fn is_built(&self) -> bool {
        self.built
    }
}

#[derive(Debug)]
pub struct MockKernel {
    _handle: MockHandle,
    name: String,
}

impl MockKernel {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
pub struct MockQueue {
    _handle: MockHandle,
}

/// Scripted driver.
#[derive(Debug, Default)]
pub struct MockDriver {
    platforms: Vec<MockPlatform>,
    failures: HashMap<Call, Status>,
    unstable_platform_count: bool,
    calls: RefCell<Vec<Call>>,
    submitted: RefCell<Vec<WorkSize>>,
    released: ReleaseLog,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: MockPlatform) -> Self {
        self.platforms.push(platform);
        self
    }

    /// Makes `call` fail with `status`.
    pub fn fail_on(mut self, call: Call, status: Status) -> Self {
        self.failures.insert(call, status);
        self
    }

    /// Simulates a platform disappearing between the count and list queries.
    pub fn with_unstable_platform_count(mut self) -> Self {
        self.unstable_platform_count = true;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn was_called(&self, call: Call) -> bool {
        self.calls.borrow().contains(&call)
    }

    /// Work sizes of every successful submission.
    pub fn submitted(&self) -> Vec<WorkSize> {
        self.submitted.borrow().clone()
    }

    /// Resources released so far, in release order.
    pub fn released(&self) -> Vec<Resource> {
        self.released.borrow().clone()
    }

    fn record(&self, call: Call) -> Result<(), Status> {
        self.calls.borrow_mut().push(call);
        match self.failures.get(&call) {
            Some(&status) => Err(status),
            None => Ok(()),
        }
    }

    fn handle(&self, resource: Resource) -> MockHandle {
        MockHandle {
            resource,
            log: Rc::clone(&self.released),
        }
    }

    fn vendor_bytes(&self, platform: usize) -> Vec<u8> {
        // NUL terminated, as drivers report text attributes
        let mut bytes = self.platforms[platform].vendor.clone();
        bytes.push(0);
        bytes
    }

    fn matching_devices(&self, platform: usize, class: DeviceClass) -> Vec<MockDeviceId> {
        self.platforms[platform]
            .devices
            .iter()
            .enumerate()
            .filter(|(_, (c, _))| class == DeviceClass::All || *c == class)
            .map(|(index, _)| MockDeviceId { platform, index })
            .collect()
    }
}

/// Balanced brackets and at least one kernel declaration.
fn is_well_formed(source: &str) -> bool {
    let mut stack = Vec::new();
    for c in source.chars() {
        match c {
            '(' | '{' | '[' => stack.push(c),
            ')' | '}' | ']' => {
                let open = match c {
                    ')' => '(',
                    '}' => '{',
                    _ => '[',
                };
                if stack.pop() != Some(open) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty() && !declared_kernels(source).is_empty()
}

/// Names declared as `__kernel void <name>` or `kernel void <name>`.
fn declared_kernels(source: &str) -> Vec<&str> {
    let tokens: Vec<&str> = source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect();

    tokens
        .windows(3)
        .filter(|w| matches!(w[0], "__kernel" | "kernel") && w[1] == "void")
        .map(|w| w[2])
        .collect()
}

impl Driver for MockDriver {
    type Platform = usize;
    type Device = MockDeviceId;
    type Context = MockContext;
    type Program = MockProgram;
    type Kernel = MockKernel;
    type Queue = MockQueue;

    fn platform_count(&self) -> Result<usize, Status> {
        self.record(Call::PlatformCount)?;
        Ok(self.platforms.len())
    }

    fn platform_list(&self, count: usize) -> Result<Vec<usize>, Status> {
        self.record(Call::PlatformList)?;
        let available = if self.unstable_platform_count {
            self.platforms.len().saturating_sub(1)
        } else {
            self.platforms.len()
        };
        Ok((0..count.min(available)).collect())
    }

    fn platform_vendor_size(&self, platform: usize) -> Result<usize, Status> {
        self.record(Call::VendorSize(platform))?;
        Ok(self.vendor_bytes(platform).len())
    }

    fn platform_vendor(&self, platform: usize, size: usize) -> Result<Vec<u8>, Status> {
        self.record(Call::Vendor(platform))?;
        let mut bytes = self.vendor_bytes(platform);
        bytes.resize(size, 0);
        Ok(bytes)
    }

    fn device_count(&self, platform: usize, class: DeviceClass) -> Result<usize, Status> {
        self.record(Call::DeviceCount)?;
        Ok(self.matching_devices(platform, class).len())
    }

    fn device_list(
        &self,
        platform: usize,
        class: DeviceClass,
        count: usize,
    ) -> Result<Vec<MockDeviceId>, Status> {
        self.record(Call::DeviceList)?;
        let mut devices = self.matching_devices(platform, class);
        devices.truncate(count);
        Ok(devices)
    }

    fn device_name(&self, device: MockDeviceId) -> Option<String> {
        self.platforms
            .get(device.platform)
            .and_then(|p| p.devices.get(device.index))
            .map(|(_, name)| name.clone())
    }

    fn create_context(&self, device: MockDeviceId) -> Result<MockContext, Status> {
        self.record(Call::CreateContext)?;
        Ok(MockContext {
            _handle: self.handle(Resource::Context),
            device,
        })
    }

    fn create_program(&self, _context: &MockContext, source: &str) -> Result<MockProgram, Status> {
        self.record(Call::CreateProgram)?;
        Ok(MockProgram {
            _handle: self.handle(Resource::Program),
            source: source.to_string(),
            built: false,
        })
    }

    fn build_program(
        &self,
        program: &mut MockProgram,
        _device: MockDeviceId,
    ) -> Result<(), BuildFailure> {
        if let Err(status) = self.record(Call::BuildProgram) {
            return Err(BuildFailure {
                status,
                log: String::new(),
            });
        }
        if !is_well_formed(&program.source) {
            return Err(BuildFailure {
                status: BUILD_PROGRAM_FAILURE,
                log: "<source>: error: malformed kernel source".to_string(),
            });
        }
        program.built = true;
        Ok(())
    }

    fn create_kernel(&self, program: &MockProgram, name: &str) -> Result<MockKernel, Status> {
        self.record(Call::CreateKernel)?;
        if !program.built {
            return Err(INVALID_PROGRAM_EXECUTABLE);
        }
        if !declared_kernels(&program.source).contains(&name) {
            return Err(INVALID_KERNEL_NAME);
        }
        Ok(MockKernel {
            _handle: self.handle(Resource::Kernel),
            name: name.to_string(),
        })
    }

    fn create_queue(
        &self,
        _context: &MockContext,
        _device: MockDeviceId,
    ) -> Result<MockQueue, Status> {
        self.record(Call::CreateQueue)?;
        Ok(MockQueue {
            _handle: self.handle(Resource::Queue),
        })
    }

    fn enqueue_kernel(
        &self,
        _queue: &MockQueue,
        _kernel: &MockKernel,
        work: &WorkSize,
    ) -> Result<(), Status> {
        self.record(Call::EnqueueKernel)?;
        self.submitted.borrow_mut().push(*work);
        Ok(())
    }

    fn finish(&self, _queue: &MockQueue) -> Result<(), Status> {
        self.record(Call::Finish)
    }
}
