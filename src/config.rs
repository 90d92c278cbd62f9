use std::{env, ffi::OsString};

use crate::{
    error::UsageError,
    parse::{parse_f64_prefix, parse_i64_prefix},
};

/// Default hold time when the second argument is omitted.
pub const DEFAULT_WAIT_SECS: f64 = 0.5;

/// Parametry jednoho běhu z příkazové řádky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invocation {
    /// Může být 0 i záporné, předává se do malloc tak jak je.
    pub byte_count: i64,
    pub wait_seconds: f64,
}

impl Invocation {
    /// `args` bez jména programu (tj. `env::args_os().skip(1)`).
    pub fn from_args<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.into().to_string_lossy().into_owned())
            .collect();

        match args.as_slice() {
            [bytes] => Ok(Self {
                byte_count: parse_i64_prefix(bytes),
                wait_seconds: DEFAULT_WAIT_SECS,
            }),
            [bytes, secs] => Ok(Self {
                byte_count: parse_i64_prefix(bytes),
                wait_seconds: parse_f64_prefix(secs),
            }),
            _ => Err(UsageError { given: args.len() }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// EnvFilter direktiva pro diagnostiku na stderr (RESALLOC_LOG).
    pub log_filter: String,

    /// Po alokaci zapsat jeden bajt na stránku, aby blok byl rezidentní.
    /// Default vypnuto, blok se jinak nikdy nečte ani nezapisuje.
    pub touch_pages: bool,

    /// Logovat VmRSS / VmHWM z /proc/self/status po alokaci a po uvolnění.
    pub report_rss: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            touch_pages: false,
            report_rss: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_filter = lookup("RESALLOC_LOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.log_filter);

        let touch_pages = lookup("RESALLOC_TOUCH_PAGES")
            .map(|s| parse_flag(&s))
            .unwrap_or(defaults.touch_pages);

        let report_rss = lookup("RESALLOC_REPORT_RSS")
            .map(|s| parse_flag(&s))
            .unwrap_or(defaults.report_rss);

        Self {
            log_filter,
            touch_pages,
            report_rss,
        }
    }
}

// cokoliv neznámého = vypnuto
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn one_argument_uses_default_wait() {
        let inv = Invocation::from_args(["1024"]).unwrap();
        assert_eq!(inv.byte_count, 1024);
        assert_eq!(inv.wait_seconds, DEFAULT_WAIT_SECS);
    }

    #[test]
    fn two_arguments_parse_both() {
        let inv = Invocation::from_args(["1024", "2"]).unwrap();
        assert_eq!(inv.byte_count, 1024);
        assert_eq!(inv.wait_seconds, 2.0);
    }

    #[test]
    fn garbage_degrades_to_zero() {
        let inv = Invocation::from_args(["abc", "soon"]).unwrap();
        assert_eq!(inv.byte_count, 0);
        assert_eq!(inv.wait_seconds, 0.0);
    }

    #[test]
    fn negative_size_is_passed_through() {
        let inv = Invocation::from_args(["-5"]).unwrap();
        assert_eq!(inv.byte_count, -5);
    }

    #[test]
    fn wrong_argument_count_is_usage_error() {
        let none: [&str; 0] = [];
        assert_eq!(Invocation::from_args(none), Err(UsageError { given: 0 }));
        assert_eq!(
            Invocation::from_args(["1", "2", "3"]),
            Err(UsageError { given: 3 })
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_argument_keeps_numeric_prefix() {
        use std::os::unix::ffi::OsStringExt;

        let arg = OsString::from_vec(vec![b'6', b'4', 0xff, 0xfe]);
        let inv = Invocation::from_args([arg]).unwrap();
        assert_eq!(inv.byte_count, 64);
    }

    #[test]
    fn empty_env_gives_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[]));
        assert_eq!(cfg.log_filter, "warn");
        assert!(!cfg.touch_pages);
        assert!(!cfg.report_rss);
    }

    #[test]
    fn env_flags_are_read() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("RESALLOC_LOG", " debug "),
            ("RESALLOC_TOUCH_PAGES", "Yes"),
            ("RESALLOC_REPORT_RSS", "1"),
        ]));
        assert_eq!(cfg.log_filter, "debug");
        assert!(cfg.touch_pages);
        assert!(cfg.report_rss);
    }

    #[test]
    fn unknown_flag_values_are_off() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("RESALLOC_LOG", "   "),
            ("RESALLOC_TOUCH_PAGES", "maybe"),
            ("RESALLOC_REPORT_RSS", "0"),
        ]));
        assert_eq!(cfg.log_filter, "warn");
        assert!(!cfg.touch_pages);
        assert!(!cfg.report_rss);
    }
}
