use sysinfo::System;

use crate::environment::types::HostReport;

pub fn collect_host_report() -> HostReport {
    let mut sys = System::new_all();
    sys.refresh_all();

    HostReport {
        hostname: System::host_name(),
        os_name: System::name(),
        os_version: System::os_version(),
        kernel_version: System::kernel_version(),
        architecture: std::env::consts::ARCH.to_string(),
        cpu_model: sys.cpus().first().map(|cpu| cpu.brand().trim().to_string()),
        logical_cpus: sys.cpus().len(),
        physical_cores: sys.physical_core_count(),
        total_memory_bytes: sys.total_memory(),
    }
}
