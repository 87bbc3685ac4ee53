// Local environment collection modules
pub mod collect_gpu;
pub mod collect_host;
pub mod types;

pub use collect_gpu::collect_gpu_report;
pub use collect_host::collect_host_report;

use types::EnvironmentReport;

pub fn collect_environment() -> EnvironmentReport {
    EnvironmentReport {
        collected_at: chrono::Utc::now().to_rfc3339(),
        host: collect_host_report(),
        gpu: collect_gpu_report(),
    }
}
