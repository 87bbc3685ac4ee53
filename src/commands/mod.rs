pub mod env;
pub mod probe;
pub mod suite;
pub mod sweep;

pub use env::handle_env_command;
pub use probe::handle_probe_command;
pub use suite::handle_suite_command;
pub use sweep::handle_sweep_command;
