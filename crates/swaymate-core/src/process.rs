//! Process liveness checks for the picker session lock.

use sysinfo::{Pid as SysinfoPid, ProcessesToUpdate, System};

/// Check if a process with the given PID is currently running.
pub fn is_process_alive(pid: u32) -> bool {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);
    system.process(pid_obj).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_process_is_alive() {
        assert!(is_process_alive(std::process::id()));
    }

    #[test]
    fn test_bogus_pid_is_dead() {
        assert!(!is_process_alive(999_999));
    }
}
