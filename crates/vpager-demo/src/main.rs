//! VerticalPager demo driver - runs a command script against in-memory bindings

mod handler;
mod script;

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use verticalpager::PagerConfig;

use crate::handler::SessionHandler;
use crate::script::{parse_line, Arg, Command};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pager options as a JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured cache size
    #[arg(long)]
    cache_size: Option<usize>,

    /// Number of pages to start with
    #[arg(short, long, default_value_t = 0)]
    pages: usize,

    /// Script to run; reads stdin when absent
    #[arg(short, long)]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PagerConfig::default(),
    };
    if let Some(cache_size) = args.cache_size {
        config = config.with_cache_size(cache_size);
    }

    info!("Starting vpager-demo v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache size: {}", config.cache_size);

    let mut handler = SessionHandler::new(&config).context("failed to create pager")?;
    if args.pages > 0 {
        let pages = i64::try_from(args.pages).context("page count too large")?;
        run_command(
            &mut handler,
            &Command {
                name: "set".to_string(),
                args: vec![Arg::Int(pages)],
            },
        );
    }

    match &args.script {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            run_script(&mut handler, BufReader::new(file))?;
        }
        None => {
            run_script(&mut handler, io::stdin().lock())?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<PagerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = PagerConfig::from_json(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn run_script<R: BufRead>(handler: &mut SessionHandler, reader: R) -> Result<usize> {
    let mut executed = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line.context("failed to read script")?;
        match parse_line(&line) {
            Ok(Some(cmd)) => {
                run_command(handler, &cmd);
                executed += 1;
            }
            Ok(None) => {}
            Err(e) => warn!("line {}: {}", number + 1, e),
        }
    }

    info!("Executed {} commands", executed);
    Ok(executed)
}

fn run_command(handler: &mut SessionHandler, cmd: &Command) -> Vec<String> {
    let replies = handler.handle(cmd);
    for reply in &replies {
        println!("{}", reply);
    }
    replies
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "cacheSize": 5, "pageIndicator": {{ "type": "vertical" }} }}"#)
            .unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.cache_size, 5);
    }

    #[test]
    fn test_load_config_rejects_unknown_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "cacheSize": 2, "loop": true }}"#).unwrap();

        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_run_script_counts_commands() {
        let mut handler = SessionHandler::new(&PagerConfig::default()).unwrap();
        let script = "# setup\nset 3\n\nscroll 2\nbogus $\nstatus\n";

        let executed = run_script(&mut handler, script.as_bytes()).unwrap();

        assert_eq!(executed, 3);
    }

    #[test]
    fn test_run_command_uses_parsed_command() {
        let mut handler = SessionHandler::new(&PagerConfig::default()).unwrap();
        let cmd = Command {
            name: "set".to_string(),
            args: vec![Arg::Int(2)],
        };

        assert_eq!(run_command(&mut handler, &cmd), vec!["OK 2 pages"]);
    }
}
