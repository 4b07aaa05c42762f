use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use easel::export::{render_records, OutputFormat};
use easel::{select_first_n, ArticClient, SelectError, Session};

pub struct BatchConfig {
    pub count: String,
    pub output: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub base_url: String,
    pub page_size: u64,
    pub verbose: bool,
}

/// Headless "select first N": walk the pages, then write what got selected.
pub async fn run_batch_mode(config: BatchConfig) -> Result<()> {
    if config.verbose {
        eprintln!("Easel Batch Mode");
        eprintln!("================");
        eprintln!("Endpoint: {}", config.base_url);
        eprintln!("Rows requested: {}", config.count);
        eprintln!("Output Format: {}", config.output_format.extension());
    }

    let client = ArticClient::new(config.base_url.clone(), config.page_size);
    let mut session = Session::new(config.page_size);
    let started = Instant::now();

    let walk = select_first_n(&mut session, &client, &config.count).await;

    let failure = match walk {
        Ok(outcome) => {
            if config.verbose {
                eprintln!(
                    "Selected {} rows, fetched pages {:?} in {:?}",
                    outcome.selected, outcome.fetched_pages, started.elapsed()
                );
            }
            None
        }
        Err(err @ SelectError::InvalidCount(_)) => return Err(err.into()),
        // Keep what was selected before the failing page.
        Err(err) => {
            eprintln!("Warning: {err}");
            Some(err)
        }
    };

    let records = session.selected_records();
    let rendered = render_records(&records, config.output_format)?;
    match &config.output {
        Some(path) => {
            fs::write(path, rendered)?;
            if config.verbose {
                eprintln!("Wrote {} rows to {}", records.len(), path.display());
            }
        }
        None => println!("{rendered}"),
    }

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
