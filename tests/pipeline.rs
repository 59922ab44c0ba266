use harp_dispatch::runtime::mock::{self, Call, MockDriver, MockPlatform, Resource};
use harp_dispatch::{
    DeviceClass, DispatchConfig, Error, KernelSource, Stage, WorkSize, exit_code, pipeline,
};
use rstest::rstest;

mod common;

#[test]
fn test_hello_world_on_amd_gpu() {
    common::setup();
    let driver = common::amd_gpu_machine();

    let result = pipeline::run(&driver, &DispatchConfig::default());
    assert_eq!(exit_code(&result), 0);

    let report = result.unwrap();
    assert_eq!(report.vendor, "Advanced Micro Devices, Inc.");
    assert_eq!(report.device.as_deref(), Some("gfx1030"));
    assert_eq!(report.entry_point, "hello_world");
    assert_eq!(driver.submitted(), vec![WorkSize::UNIT]);
}

#[test]
fn test_stages_run_in_order() {
    common::setup();
    let driver = common::amd_gpu_machine();
    pipeline::run(&driver, &DispatchConfig::default()).unwrap();

    assert_eq!(
        driver.calls(),
        vec![
            Call::PlatformCount,
            Call::PlatformList,
            Call::VendorSize(0),
            Call::Vendor(0),
            Call::VendorSize(1),
            Call::Vendor(1),
            Call::DeviceCount,
            Call::DeviceList,
            Call::CreateContext,
            Call::CreateProgram,
            Call::BuildProgram,
            Call::CreateKernel,
            Call::CreateQueue,
            Call::EnqueueKernel,
            Call::Finish,
        ]
    );
}

#[test]
fn test_resources_released_in_reverse_order() {
    common::setup();
    let driver = common::amd_gpu_machine();
    pipeline::run(&driver, &DispatchConfig::default()).unwrap();

    assert_eq!(
        driver.released(),
        vec![
            Resource::Queue,
            Resource::Kernel,
            Resource::Program,
            Resource::Context
        ]
    );
}

#[test]
fn test_vendor_mismatch_returns_sentinel() {
    common::setup();
    let driver = common::amd_gpu_machine();
    let config = DispatchConfig::default().with_vendor("NVIDIA Corporation");

    let result = pipeline::run(&driver, &config);
    assert_eq!(exit_code(&result), -1);

    let err = result.unwrap_err();
    assert!(matches!(err, Error::VendorNotFound { .. }));
    assert!(!driver.was_called(Call::DeviceCount));
    assert!(!driver.was_called(Call::DeviceList));
    assert!(driver.released().is_empty());
}

#[test]
fn test_build_failure_stops_before_dispatch() {
    common::setup();
    let driver = common::amd_gpu_machine();
    let config = DispatchConfig::default()
        .with_source(KernelSource::new("__kernel void hello_world() {", "hello_world"));

    let result = pipeline::run(&driver, &config);
    assert_eq!(exit_code(&result), mock::BUILD_PROGRAM_FAILURE);

    let err = result.unwrap_err();
    assert_eq!(err.stage(), Stage::Compilation);
    assert!(err.build_log().is_some());
    assert!(!driver.was_called(Call::CreateQueue));
    assert!(!driver.was_called(Call::EnqueueKernel));
    assert!(!driver.was_called(Call::Finish));
    assert_eq!(driver.released(), vec![Resource::Program, Resource::Context]);
}

#[test]
fn test_platform_without_gpu() {
    common::setup();
    let driver = MockDriver::new().with_platform(
        MockPlatform::new("Advanced Micro Devices, Inc.").with_device(DeviceClass::Cpu, "cpu"),
    );

    let err = pipeline::run(&driver, &DispatchConfig::default()).unwrap_err();
    assert_eq!(err.stage(), Stage::Selection);
    assert!(!driver.was_called(Call::CreateContext));
}

#[test]
fn test_cpu_class_selects_cpu_device() {
    common::setup();
    let driver = common::amd_gpu_machine();
    let config = DispatchConfig::default().with_device_class(DeviceClass::Cpu);

    let report = pipeline::run(&driver, &config).unwrap();
    assert_eq!(report.device.as_deref(), Some("Ryzen 9 5950X"));
}

#[test]
fn test_no_platforms() {
    common::setup();
    let driver = MockDriver::new();
    let result = pipeline::run(&driver, &DispatchConfig::default());
    assert!(matches!(result, Err(Error::VendorNotFound { .. })));
    assert_eq!(exit_code(&result), -1);
}

#[rstest]
#[case(Call::PlatformCount, -1001, Stage::Enumeration)]
#[case(Call::PlatformList, -1001, Stage::Enumeration)]
#[case(Call::Vendor(1), -30, Stage::Enumeration)]
#[case(Call::DeviceList, -31, Stage::Enumeration)]
#[case(Call::CreateContext, -6, Stage::Context)]
#[case(Call::CreateProgram, -34, Stage::Compilation)]
#[case(Call::BuildProgram, -11, Stage::Compilation)]
#[case(Call::CreateKernel, -46, Stage::Compilation)]
#[case(Call::CreateQueue, -35, Stage::Dispatch)]
#[case(Call::EnqueueKernel, -54, Stage::Dispatch)]
#[case(Call::Finish, -36, Stage::Dispatch)]
fn test_first_failure_wins(#[case] call: Call, #[case] status: i32, #[case] stage: Stage) {
    common::setup();
    let driver = common::amd_gpu_machine().fail_on(call, status);

    let result = pipeline::run(&driver, &DispatchConfig::default());
    assert_eq!(exit_code(&result), status);

    let err = result.unwrap_err();
    assert_eq!(err.stage(), stage);

    // Nothing after the failing call is attempted
    let calls = driver.calls();
    assert_eq!(calls.last(), Some(&call));

    // Everything that was acquired has been released
    let acquired = calls
        .iter()
        .filter(|c| {
            matches!(
                c,
                Call::CreateContext | Call::CreateProgram | Call::CreateKernel | Call::CreateQueue
            ) && **c != call
        })
        .count();
    assert_eq!(driver.released().len(), acquired);
}
