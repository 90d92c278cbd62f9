use thiserror::Error;

pub const USAGE: &str = "resalloc - allocate resources for the purpose of benchmarking\n\
usage: resalloc <bytes_of_mem> [<secs_to_wait>]\n";

/// Špatný počet argumentů. Jediná chyba, kterou harness hlásí volajícímu.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected 1 or 2 arguments, got {given}")]
pub struct UsageError {
    pub given: usize,
}
