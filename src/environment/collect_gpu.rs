use std::process::Command;

use nvml_wrapper::{cuda_driver_version_major, cuda_driver_version_minor, Nvml};

use crate::environment::types::{GpuDevice, GpuReport};

/// Report GPU devices, driver, and CUDA toolkit status.
///
/// Prefers NVML; falls back to `nvidia-smi` for device enumeration when NVML
/// cannot initialize. Absence of either is a feature-absence signal, never an
/// error: the rest of the probes run regardless of what this reports.
pub fn collect_gpu_report() -> GpuReport {
    let mut report = GpuReport {
        cuda_available: false,
        nvml_available: false,
        nvidia_smi_available: false,
        driver_version: None,
        cuda_driver_version: None,
        toolkit_version: None,
        devices: Vec::new(),
        error: None,
    };

    match Nvml::init() {
        Ok(nvml) => {
            report.nvml_available = true;
            if let Ok(version) = nvml.sys_driver_version() {
                report.driver_version = Some(version);
            }
            if let Ok(version) = nvml.sys_cuda_driver_version() {
                report.cuda_driver_version = Some(format!(
                    "{}.{}",
                    cuda_driver_version_major(version),
                    cuda_driver_version_minor(version)
                ));
            }
            if let Ok(count) = nvml.device_count() {
                for i in 0..count {
                    if let Ok(device) = nvml.device_by_index(i) {
                        let name = device.name().unwrap_or_else(|_| format!("GPU {}", i));
                        let mut gpu = GpuDevice {
                            index: i,
                            name,
                            uuid: device.uuid().ok(),
                            memory_total_mb: None,
                            memory_used_mb: None,
                        };
                        if let Ok(memory) = device.memory_info() {
                            gpu.memory_total_mb = Some(memory.total / (1024 * 1024));
                            gpu.memory_used_mb = Some(memory.used / (1024 * 1024));
                        }
                        report.devices.push(gpu);
                    }
                }
            }
        }
        Err(e) => {
            report.error = Some(format!("NVML unavailable: {}", e));
        }
    }

    if let Ok(output) = Command::new("which").arg("nvidia-smi").output() {
        report.nvidia_smi_available = output.status.success();
    }

    // Fallback when NVML is absent but the driver CLI is installed
    if report.nvidia_smi_available && report.devices.is_empty() {
        if let Ok(output) = Command::new("nvidia-smi")
            .args([
                "--query-gpu=index,name,memory.total,memory.used,driver_version,uuid",
                "--format=csv,noheader,nounits",
            ])
            .output()
        {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                report.devices = parse_smi_devices(&stdout);
                if report.driver_version.is_none() {
                    report.driver_version = parse_smi_driver_version(&stdout);
                }
            }
        }
    }

    if let Ok(output) = Command::new("nvcc").arg("--version").output() {
        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            for line in stdout.lines() {
                if line.contains("release") {
                    if let Some(version) = extract_toolkit_version(line) {
                        report.toolkit_version = Some(version);
                        break;
                    }
                }
            }
        }
    }

    report.cuda_available = !report.devices.is_empty();
    report
}

/// Parse `nvidia-smi --query-gpu=index,name,memory.total,memory.used,driver_version,uuid`
/// CSV output into device entries.
fn parse_smi_devices(output: &str) -> Vec<GpuDevice> {
    let mut devices = Vec::new();
    for line in output.lines() {
        let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
        if parts.len() < 6 {
            continue;
        }
        let index = match parts[0].parse::<u32>() {
            Ok(index) => index,
            Err(_) => continue,
        };
        devices.push(GpuDevice {
            index,
            name: parts[1].to_string(),
            uuid: Some(parts[5].to_string()),
            memory_total_mb: parts[2].parse::<u64>().ok(),
            memory_used_mb: parts[3].parse::<u64>().ok(),
        });
    }
    devices
}

fn parse_smi_driver_version(output: &str) -> Option<String> {
    let line = output.lines().next()?;
    let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if parts.len() >= 5 {
        Some(parts[4].to_string())
    } else {
        None
    }
}

/// Extract the toolkit version from an nvcc release line,
/// e.g. "Cuda compilation tools, release 12.4, V12.4.131"
fn extract_toolkit_version(line: &str) -> Option<String> {
    let start = line.find("release")?;
    let version_part = &line[start + 7..];
    let end = version_part.find(',')?;
    Some(version_part[..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_toolkit_version() {
        let line = "Cuda compilation tools, release 12.4, V12.4.131";
        assert_eq!(extract_toolkit_version(line), Some("12.4".to_string()));
    }

    #[test]
    fn test_extract_toolkit_version_missing() {
        assert_eq!(extract_toolkit_version("nvcc: NVIDIA (R) Cuda compiler driver"), None);
    }

    #[test]
    fn test_parse_smi_devices() {
        let output = "0, NVIDIA GeForce RTX 5090, 32607, 1204, 570.86.10, GPU-abc123\n";
        let devices = parse_smi_devices(output);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].index, 0);
        assert_eq!(devices[0].name, "NVIDIA GeForce RTX 5090");
        assert_eq!(devices[0].memory_total_mb, Some(32607));
        assert_eq!(devices[0].memory_used_mb, Some(1204));
        assert_eq!(devices[0].uuid.as_deref(), Some("GPU-abc123"));
    }

    #[test]
    fn test_parse_smi_devices_skips_malformed_lines() {
        let output = "garbage line\n1, Tesla V100, 16160, 0, 535.104.05, GPU-def456\n";
        let devices = parse_smi_devices(output);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].index, 1);
    }

    #[test]
    fn test_parse_smi_driver_version() {
        let output = "0, NVIDIA GeForce RTX 5090, 32607, 1204, 570.86.10, GPU-abc123\n";
        assert_eq!(parse_smi_driver_version(output), Some("570.86.10".to_string()));
    }
}
