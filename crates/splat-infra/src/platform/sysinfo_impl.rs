// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! sysinfo-based CPU, memory and OS probing.

use anyhow::{anyhow, Result};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

/// Reads CPU count, memory size and OS identification through `sysinfo`.
pub struct SysinfoProbe {
    system: System,
}

impl SysinfoProbe {
    /// Creates a probe with CPU and RAM data loaded.
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::nothing())
                .with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        Self { system }
    }

    /// Number of logical CPUs.
    pub fn logical_cores(&self) -> Result<usize> {
        match self.system.cpus().len() {
            0 => Err(anyhow!("sysinfo reported no CPUs")),
            n => Ok(n),
        }
    }

    /// Total physical memory in bytes.
    pub fn total_memory_bytes(&self) -> Result<u64> {
        match self.system.total_memory() {
            0 => Err(anyhow!("sysinfo reported no memory")),
            bytes => Ok(bytes),
        }
    }

    /// A user-agent-like platform string, e.g. `"linux x86_64; Ubuntu 24.04"`.
    ///
    /// Always contains the compile-time OS name, so Android and iOS builds are
    /// recognised as mobile even when the OS reports nothing.
    pub fn platform_identifier(&self) -> String {
        let mut identifier = format!(
            "{} {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        );
        let details = System::long_os_version().or_else(System::name);
        if let Some(details) = details {
            identifier.push_str("; ");
            identifier.push_str(&details);
        }
        identifier
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}
