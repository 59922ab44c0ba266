//! harp-dispatch: run one kernel on the first matching OpenCL device
//!
//! Usage:
//!   harp-dispatch [OPTIONS]
//!
//! Examples:
//!   harp-dispatch                                  # AMD GPU, embedded hello_world
//!   harp-dispatch --vendor "NVIDIA Corporation"
//!   harp-dispatch --kernel add.cl --entry add -t all
//!   harp-dispatch --list

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;

use harp_dispatch::platform::survey;
use harp_dispatch::{
    DeviceClass, DispatchConfig, ENTRY_POINT, KernelSource, OpenClDriver, Status, exit_code,
    pipeline,
};

/// Exit status when the command line itself cannot be honoured.
const USAGE_STATUS: Status = 2;

/// Harp kernel dispatcher
///
/// Selects an OpenCL platform by vendor, picks its first device, compiles a
/// kernel and runs it once on a single work item.
#[derive(Parser, Debug)]
#[command(name = "harp-dispatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Exact platform vendor name
    #[arg(long, value_name = "VENDOR", default_value = harp_dispatch::AMD_VENDOR)]
    vendor: String,

    /// Device class to select
    #[arg(short = 't', long = "device-type", default_value = "gpu")]
    device_type: DeviceType,

    /// Kernel source file (defaults to the embedded hello_world kernel)
    #[arg(short, long, value_name = "FILE")]
    kernel: Option<PathBuf>,

    /// Entry point to extract from the kernel source
    #[arg(short, long, value_name = "NAME", default_value = ENTRY_POINT)]
    entry: String,

    /// List platforms and their devices, then exit
    #[arg(long)]
    list: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DeviceType {
    /// GPU devices
    Gpu,
    /// CPU devices
    Cpu,
    /// Dedicated accelerators
    Accelerator,
    /// Any device
    All,
}

impl From<DeviceType> for DeviceClass {
    fn from(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Gpu => DeviceClass::Gpu,
            DeviceType::Cpu => DeviceClass::Cpu,
            DeviceType::Accelerator => DeviceClass::Accelerator,
            DeviceType::All => DeviceClass::All,
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    std::process::exit(run(&args));
}

fn run(args: &Args) -> Status {
    let driver = OpenClDriver::new();

    if args.list {
        return list(&driver, args.device_type.into());
    }

    let source = match &args.kernel {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => KernelSource::new(text, args.entry.clone()),
            Err(e) => {
                eprintln!("error: cannot read {}: {}", path.display(), e);
                return USAGE_STATUS;
            }
        },
        None => KernelSource::new(harp_dispatch::source::HELLO_WORLD, args.entry.clone()),
    };

    let config = DispatchConfig::new()
        .with_vendor(args.vendor.clone())
        .with_device_class(args.device_type.into())
        .with_source(source);

    let result = pipeline::run(&driver, &config);
    match &result {
        Ok(report) => info!(
            "Ran `{}` on {} ({:?} work items)",
            report.entry_point,
            report.device.as_deref().unwrap_or(&report.vendor),
            report.work_size.global
        ),
        Err(e) => eprintln!("error: {}", e),
    }
    exit_code(&result)
}

fn list(driver: &OpenClDriver, class: DeviceClass) -> Status {
    match survey(driver, class) {
        Ok(platforms) => {
            for (i, platform) in platforms.iter().enumerate() {
                println!("Platform {}: {}", i, platform.vendor);
                for (j, device) in platform.devices.iter().enumerate() {
                    println!("  Device {}: {}", j, device);
                }
            }
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            e.status()
        }
    }
}
