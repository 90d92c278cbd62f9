//! The linear allocate / sleep / free run.

use std::{io::Write, thread, time::Duration};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    block::HeldBlock,
    config::{Config, Invocation},
    log_anyhow_with_source, procfs,
};

/// Provede jeden běh: alokace, čekání, uvolnění.
///
/// Na `out` jdou přesně tři řádky protokolu, po každém flush, aby je
/// vnější pozorovatel viděl hned.
pub fn run<W: Write>(inv: &Invocation, cfg: &Config, out: &mut W) -> Result<()> {
    announce(out, format_args!("allocating {} bytes of memory", inv.byte_count))?;

    let block = HeldBlock::allocate(inv.byte_count, cfg.touch_pages);
    if block.is_null() && inv.byte_count != 0 {
        warn!(
            requested = inv.byte_count,
            "allocation returned null, holding nothing"
        );
    } else {
        debug!(bytes = block.len(), touched = cfg.touch_pages, "block allocated");
    }
    if cfg.report_rss {
        report_rss("allocated");
    }

    announce(
        out,
        format_args!("sleeping for {} seconds", format_seconds(inv.wait_seconds)),
    )?;
    let wait = wait_duration(inv.wait_seconds);
    debug!(?wait, "holding allocation");
    thread::sleep(wait);

    announce(out, format_args!("freeing memory"))?;
    drop(block);
    if cfg.report_rss {
        report_rss("freed");
    }

    Ok(())
}

fn announce<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> Result<()> {
    writeln!(out, "{line}").context("write to stdout")?;
    out.flush().context("flush stdout")?;
    Ok(())
}

/// Sekundy jako printf `%f`: šest desetinných míst, `nan` / `-nan` malými písmeny.
pub fn format_seconds(secs: f64) -> String {
    if secs.is_nan() {
        return if secs.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    format!("{secs:.6}")
}

/// Převod sekund na `Duration` se sub-sekundovou přesností.
///
/// Záporné hodnoty a NaN -> 0, přetečení (včetně +inf) -> `Duration::MAX`.
pub fn wait_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn report_rss(phase: &str) {
    match procfs::read_memory_status() {
        Ok(status) => info!(
            phase = %phase,
            rss_bytes = status.rss_bytes,
            peak_rss_bytes = status.peak_rss_bytes,
            "resident memory"
        ),
        Err(e) => log_anyhow_with_source!(e, phase = %phase, "could not read resident memory"),
    }
}
