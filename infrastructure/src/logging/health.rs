//! Point-in-time process health probe.

use minivault_application::ports::telemetry::RequestGauge;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Process health at the moment a log record is built.
#[derive(Debug, Clone, Copy)]
pub struct HealthSnapshot {
    /// Requests currently in flight.
    pub active_requests: usize,
    /// Resident memory of this process in bytes (0 if unavailable).
    pub memory_bytes: u64,
}

impl HealthSnapshot {
    /// Capture the gauge reading and this process's resident memory.
    pub fn capture(gauge: &RequestGauge) -> Self {
        Self {
            active_requests: gauge.current(),
            memory_bytes: process_memory_bytes().unwrap_or(0),
        }
    }
}

fn process_memory_bytes() -> Option<u64> {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).map(|p| p.memory())
}
