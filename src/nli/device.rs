use std::fmt;
use std::str::FromStr;

use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::NliError;

/// Where the classifier should run.
///
/// `Auto` tries every accelerator compiled into the binary and settles on the CPU when none
/// answers. An explicit accelerator that cannot be opened is an error rather than a silent
/// downgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevicePreference {
    #[default]
    Auto,
    Cpu,
    Metal,
    Cuda,
}

impl DevicePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            DevicePreference::Auto => "auto",
            DevicePreference::Cpu => "cpu",
            DevicePreference::Metal => "metal",
            DevicePreference::Cuda => "cuda",
        }
    }
}

impl fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cpu" => Ok(DevicePreference::Cpu),
            "metal" => Ok(DevicePreference::Metal),
            "cuda" | "gpu" => Ok(DevicePreference::Cuda),
            other => Err(format!("unknown device '{other}' (expected auto, cpu, metal or cuda)")),
        }
    }
}

/// Opens the device named by `preference`.
pub fn select_device(preference: DevicePreference) -> Result<Device, NliError> {
    let device = match preference {
        DevicePreference::Cpu => Device::Cpu,
        DevicePreference::Metal => open_metal()?,
        DevicePreference::Cuda => open_cuda()?,
        DevicePreference::Auto => auto_device(),
    };

    info!(%preference, ?device, "NLI compute device ready");
    Ok(device)
}

fn auto_device() -> Device {
    let mut skipped = Vec::new();
    for open in [open_metal, open_cuda] {
        match open() {
            Ok(device) => return device,
            Err(err) => skipped.push(err.to_string()),
        }
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!(skipped = %skipped.join("; "), "No accelerator answered, running NLI on CPU");
    } else {
        debug!("Built without accelerator features, running NLI on CPU");
    }
    Device::Cpu
}

fn unavailable(device: &'static str, reason: impl ToString) -> NliError {
    NliError::DeviceUnavailable {
        device,
        reason: reason.to_string(),
    }
}

#[cfg(feature = "metal")]
fn open_metal() -> Result<Device, NliError> {
    Device::new_metal(0).map_err(|e| unavailable("metal", e))
}

#[cfg(not(feature = "metal"))]
fn open_metal() -> Result<Device, NliError> {
    Err(unavailable("metal", "binary built without the `metal` feature"))
}

#[cfg(feature = "cuda")]
fn open_cuda() -> Result<Device, NliError> {
    Device::new_cuda(0).map_err(|e| unavailable("cuda", e))
}

#[cfg(not(feature = "cuda"))]
fn open_cuda() -> Result<Device, NliError> {
    Err(unavailable("cuda", "binary built without the `cuda` feature"))
}
