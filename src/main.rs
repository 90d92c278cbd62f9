mod block;
mod config;
mod error;
mod harness;
mod logging;
mod parse;
mod procfs;

use std::{
    env,
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Context;
use tracing::debug;

use crate::{
    config::{Config, Invocation},
    error::USAGE,
};

fn main() -> ExitCode {
    let cfg = Config::from_env();
    logging::init(&cfg.log_filter);

    let inv = match Invocation::from_args(env::args_os().skip(1)) {
        Ok(inv) => inv,
        Err(e) => {
            log_error_display!(e, "bad invocation");
            // usage jde na stdout, stejně jako u původního harnessu;
            // exit 1 platí i když stdout není k dispozici
            if let Err(e) = print_usage(&mut io::stdout().lock()) {
                log_anyhow_with_source!(e, "could not print usage");
            }
            return ExitCode::from(1);
        }
    };

    debug!(?inv, ?cfg, "starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = harness::run(&inv, &cfg, &mut out) {
        log_anyhow_with_source!(e, "harness run failed");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn print_usage<W: Write>(out: &mut W) -> anyhow::Result<()> {
    write!(out, "{USAGE}").context("write usage to stdout")?;
    out.flush().context("flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn usage_is_two_lines() {
        let mut out = Vec::new();
        print_usage(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "resalloc - allocate resources for the purpose of benchmarking\n\
             usage: resalloc <bytes_of_mem> [<secs_to_wait>]\n"
        );
    }

    #[test]
    fn usage_on_closed_stdout_is_an_error_not_a_panic() {
        let err = print_usage(&mut Closed).unwrap_err();
        assert_eq!(err.to_string(), "write usage to stdout");
        assert_eq!(err.root_cause().to_string(), "broken pipe");
    }
}
