use visualmind::config::{self, CliArgs};
use visualmind::{generate_mind_map, io as map_io, layout, parser, CellMetricsSurface};

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

const STDIN_TITLE: &str = "Mind Map";

fn main() -> Result<()> {
    let args = CliArgs::parse();

    init_logging(args.verbose);

    let config = config::load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    let mut surface = CellMetricsSurface::from_config(&config);

    let data = match args.filename {
        Some(ref path) => {
            // The file name doubles as the fallback title
            let mut data = parser::load_file(path, args.title.as_deref())
                .with_context(|| format!("Failed to read {}", path.display()))?;
            layout::layout_map(&mut data, &mut surface, &config);
            data
        }
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read outline from stdin")?;
            let title = args.title.as_deref().unwrap_or(STDIN_TITLE);
            generate_mind_map(&content, title, &mut surface, &config)
        }
    };

    tracing::info!(
        nodes = data.nodes.len(),
        connections = data.connections.len(),
        "layout complete"
    );

    let rendered = map_io::render(&data, config.format)?;

    match args.output {
        Some(ref path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
