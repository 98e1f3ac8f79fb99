mod args;

use std::fs::File;
use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use fiap_lib::FetchResult;
use fiap_lib::FiapClient;
use fiap_lib::model::ZeroTime;

use crate::args::Args;

#[tokio::main]
async fn main() {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    let keys = match args.keys() {
        Ok(keys) => keys,
        Err(problems) => {
            for problem in &problems {
                eprintln!("Error: {}", problem);
            }
            std::process::exit(2);
        }
    };

    let result = match fetch(&args, keys).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = write_output(&args, &result) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let level = args.log_level();
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => {
            TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
        }
    }
    Ok(())
}

async fn fetch(args: &Args, keys: Vec<fiap_lib::model::Key>) -> anyhow::Result<FetchResult> {
    let mut builder = FiapClient::builder()
        .url(&args.url)
        .acceptable_size(args.acceptable_size)
        .trace_xml(args.trace_xml);
    if args.omit_zero_time {
        builder = builder.zero_time(ZeroTime::Omit);
    }
    if let Some(max) = args.max_pages {
        builder = builder.max_pages(max);
    }
    if let Some(secs) = args.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build().context("failed to create HTTP client")?;

    let mut query = client.query(keys);
    if let Some(cursor) = &args.cursor {
        query = query.cursor(cursor);
    }

    let result = query.fetch().await?;
    log::info!(
        "fetched {} points and {} point sets in {} pages",
        result.points.len(),
        result.point_sets.len(),
        result.pages()
    );
    Ok(result)
}

fn write_output(args: &Args, result: &FetchResult) -> anyhow::Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use fiap_lib::model::PointSetMembers;
    use fiap_lib::model::PointValue;

    fn sample() -> FetchResult {
        let mut result = FetchResult::default();
        result.points.insert(
            "A".to_string(),
            vec![PointValue::new(
                chrono::DateTime::parse_from_rfc3339("2012-02-02T16:34:05+09:00").unwrap(),
                "30",
            )],
        );
        result.point_sets.insert(
            "S".to_string(),
            PointSetMembers {
                point_set_ids: vec![],
                point_ids: vec!["A".to_string()],
            },
        );
        result
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let args = Args::try_parse_from(["fiap-fetch", "-o", path.to_str().unwrap(), "A"]).unwrap();

        write_output(&args, &sample()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["points"]["A"][0]["value"], "30");
        assert_eq!(json["points"]["A"][0]["time"], "2012-02-02T16:34:05+09:00");
        assert_eq!(json["point_sets"]["S"]["point_ids"][0], "A");
        assert!(json.get("pages").is_none());
    }
}
