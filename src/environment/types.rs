use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EnvironmentReport {
    pub collected_at: String,
    pub host: HostReport,
    pub gpu: GpuReport,
}

#[derive(Debug, Serialize)]
pub struct HostReport {
    pub hostname: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub architecture: String,
    pub cpu_model: Option<String>,
    pub logical_cpus: usize,
    pub physical_cores: Option<usize>,
    pub total_memory_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct GpuReport {
    pub cuda_available: bool,
    pub nvml_available: bool,
    pub nvidia_smi_available: bool,
    pub driver_version: Option<String>,
    pub cuda_driver_version: Option<String>,
    pub toolkit_version: Option<String>,
    pub devices: Vec<GpuDevice>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GpuDevice {
    pub index: u32,
    pub name: String,
    pub uuid: Option<String>,
    pub memory_total_mb: Option<u64>,
    pub memory_used_mb: Option<u64>,
}
