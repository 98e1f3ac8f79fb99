//! Command-line arguments and their validation.

use std::path::PathBuf;

use chrono::DateTime;
use clap::Parser;

use fiap_lib::api::query::validate;
use fiap_lib::model::Key;
use fiap_lib::model::Select;
use fiap_lib::model::Timestamp;

/// Fetch point values and point-set membership from a FIAP storage.
///
/// Every filter applies to all given IDs. Times are RFC 3339
/// (e.g. 2012-02-02T16:34:05+09:00).
#[derive(Debug, Parser)]
#[command(name = "fiap-fetch", version)]
pub struct Args {
    /// Point or point-set IDs to fetch
    pub ids: Vec<String>,

    /// FIAP storage endpoint
    #[arg(short, long, env = "FIAP_URL", default_value = "")]
    pub url: String,

    /// Only values at exactly this time
    #[arg(long, value_name = "TIME")]
    pub eq: Option<String>,

    /// Only values not at this time
    #[arg(long, value_name = "TIME")]
    pub neq: Option<String>,

    /// Only values before this time
    #[arg(long, value_name = "TIME")]
    pub lt: Option<String>,

    /// Only values after this time
    #[arg(long, value_name = "TIME")]
    pub gt: Option<String>,

    /// Only values at or before this time
    #[arg(long, value_name = "TIME")]
    pub lteq: Option<String>,

    /// Only values at or after this time
    #[arg(long, value_name = "TIME")]
    pub gteq: Option<String>,

    /// Only the minimum or maximum matching value (none, min, max)
    #[arg(long, default_value = "none")]
    pub select: String,

    /// Maximum values per page
    #[arg(short = 's', long, env = "FIAP_ACCEPTABLE_SIZE", default_value_t = 1000)]
    pub acceptable_size: u32,

    /// Resume from a cursor returned by an earlier run
    #[arg(long)]
    pub cursor: Option<String>,

    /// Fail instead of requesting more than this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Treat filters at 1970-01-01T00:00:00Z as unset
    #[arg(long)]
    pub omit_zero_time: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub debug: bool,

    /// Log request and response XML (implies --debug)
    #[arg(long)]
    pub trace_xml: bool,

    /// Write the log to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Builds the query keys and checks every input.
    ///
    /// Problems are collected rather than reported one at a time, so a single
    /// run names everything that needs fixing.
    pub fn keys(&self) -> Result<Vec<Key>, Vec<String>> {
        let mut problems = Vec::new();

        let mut time = |flag: &str, value: &Option<String>| -> Option<Timestamp> {
            let value = value.as_deref()?;
            match DateTime::parse_from_rfc3339(value) {
                Ok(t) => Some(t),
                Err(e) => {
                    problems.push(format!("--{}: '{}' is not an RFC 3339 time ({})", flag, value, e));
                    None
                }
            }
        };

        let eq = time("eq", &self.eq);
        let neq = time("neq", &self.neq);
        let lt = time("lt", &self.lt);
        let gt = time("gt", &self.gt);
        let lteq = time("lteq", &self.lteq);
        let gteq = time("gteq", &self.gteq);

        let select = match self.select.parse::<Select>() {
            Ok(select) => select,
            Err(e) => {
                problems.push(format!("--select: {}", e));
                Select::None
            }
        };

        let keys: Vec<Key> = self
            .ids
            .iter()
            .map(|id| Key {
                id: id.clone(),
                eq,
                neq,
                lt,
                gt,
                lteq,
                gteq,
                select,
            })
            .collect();

        if let Err(e) = validate(&self.url, &keys, self.cursor.as_deref(), self.acceptable_size) {
            problems.extend(e.errors().iter().map(ToString::to_string));
        }

        if problems.is_empty() {
            Ok(keys)
        } else {
            Err(problems)
        }
    }

    /// Returns the log level the flags ask for.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.trace_xml {
            log::LevelFilter::Trace
        } else if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("fiap-fetch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_keys_share_filters() {
        let args = parse(&[
            "--url",
            "http://example.org/fiap",
            "--gteq",
            "2012-02-01T00:00:00+09:00",
            "--select",
            "max",
            "A",
            "B",
        ]);
        let keys = args.keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1].id, "B");
        assert!(keys.iter().all(|k| k.gteq.is_some() && k.select == Select::Maximum));
        assert!(keys.iter().all(|k| k.eq.is_none()));
    }

    #[test]
    fn test_all_problems_reported() {
        let args = parse(&["--url", "", "--lt", "tomorrow", "--select", "latest", "--cursor", "xyz", ""]);
        let problems = args.keys().unwrap_err();

        assert_eq!(problems.len(), 5, "{problems:?}");
        assert!(problems[0].starts_with("--lt:"));
        assert!(problems[1].starts_with("--select:"));
        assert!(problems.iter().any(|p| p.starts_with("url:")));
        assert!(problems.iter().any(|p| p.starts_with("keys[0].id:")));
        assert!(problems.iter().any(|p| p.starts_with("cursor:")));
    }

    #[test]
    fn test_no_ids() {
        let args = parse(&["--url", "http://example.org/fiap"]);
        let problems = args.keys().unwrap_err();
        assert_eq!(problems, ["keys: at least one key is required"]);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&[]).log_level(), log::LevelFilter::Warn);
        assert_eq!(parse(&["-d"]).log_level(), log::LevelFilter::Debug);
        assert_eq!(parse(&["--trace-xml"]).log_level(), log::LevelFilter::Trace);
    }
}
