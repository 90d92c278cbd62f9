use std::path::Path;

use anyhow::{Context, Result};

const SELF_STATUS: &str = "/proc/self/status";

/// Rezidentní paměť procesu z /proc/self/status (v bajtech).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStatus {
    pub rss_bytes: u64,
    pub peak_rss_bytes: u64,
}

fn read_to_string(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?.trim().to_string())
}

pub fn read_memory_status() -> Result<MemoryStatus> {
    let content = read_to_string(Path::new(SELF_STATUS)).context("read /proc/self/status")?;
    Ok(parse_status(&content))
}

pub fn parse_status(content: &str) -> MemoryStatus {
    let mut rss_kb = 0u64;
    let mut hwm_kb = 0u64;

    for line in content.lines() {
        if line.starts_with("VmRSS:") {
            rss_kb = grab_kb(line);
        } else if line.starts_with("VmHWM:") {
            hwm_kb = grab_kb(line);
        }
    }

    MemoryStatus {
        rss_bytes: rss_kb.saturating_mul(1024),
        peak_rss_bytes: hwm_kb.saturating_mul(1024),
    }
}

fn grab_kb(line: &str) -> u64 {
    line.split_whitespace()
        .nth(1)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
}
