use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::processors::BatchOrchestrator;
use crate::store::{create_tables, Store};
use anyhow::{Context, Result};
use tracing::{debug, info};
use validator::Validate;

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(path) = cli.database {
        settings.database.path = path;
    }
    if let Some(namespace) = cli.namespace {
        settings.database.namespace = namespace;
    }

    let store = Store::open(&settings.database.path, &settings.database.namespace)
        .with_context(|| {
            format!(
                "Failed to open database {}",
                settings.database.path.display()
            )
        })?;

    match cli.command {
        Commands::CreateTables { drop } => {
            create_tables(&store, drop).context("Failed to create tables")?;
            println!(
                "Tables ready in {} ({})",
                settings.database.path.display(),
                settings.database.namespace
            );
        }

        Commands::Populate {
            data_dir,
            pattern,
            truncate,
            batch_size,
        } => {
            if let Some(dir) = data_dir {
                settings.data_path = dir;
            }
            if let Some(pattern) = pattern {
                settings.pattern = pattern;
            }
            if let Some(size) = batch_size {
                settings.batch_size = size;
            }
            settings.truncate |= truncate;
            settings.validate().context("Invalid settings")?;

            let mut options = settings.ingest_options();
            options.show_progress = !cli.quiet;

            info!(
                "Ingesting {} from {} (batch size {}{})",
                options.pattern,
                options.data_dir.display(),
                options.batch_size,
                if options.truncate { ", truncating first" } else { "" }
            );

            let orchestrator = BatchOrchestrator::new(&store, options);
            let report = orchestrator.run().context("Ingestion aborted")?;

            println!("\n{}", report.generate_summary());
        }

        Commands::Stats { json } => {
            let counts = store.table_counts().context("Failed to count rows")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                println!("Database: {}", settings.database.path.display());
                print!("{}", counts.summary());
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber; `RUST_LOG` takes precedence over `--verbose`
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("inmet_ingest={}", log_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    const FILE: &str = "REGIAO:;NE\nUF:;SE\nESTACAO:;ARACAJU\nCODIGO (WMO):;A409\nLATITUDE:;-10,95\nLONGITUDE:;-37,05\nALTITUDE:;4,72\nDATA DE FUNDACAO:;2003-02-05\nData;Hora UTC;PRECIPITAÇÃO TOTAL, HORÁRIO (mm);\n2020/01/01;0000 UTC;0,2;\n";

    #[test]
    fn test_zero_batch_size_flag_is_rejected() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let data_dir = temp_dir.path().join("data");
        fs::create_dir(&data_dir)?;
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(FILE);
        fs::write(data_dir.join("A409.CSV"), bytes)?;

        let config = temp_dir.path().join("inmet.toml");
        fs::write(&config, "")?;
        let database = temp_dir.path().join("inmet.db");
        create_tables(&Store::open(&database, "inmet")?, false)?;

        let cli = Cli::parse_from([
            "inmet-ingest",
            "--quiet",
            "--config",
            config.to_str().unwrap(),
            "--database",
            database.to_str().unwrap(),
            "populate",
            "--data-dir",
            data_dir.to_str().unwrap(),
            "--batch-size",
            "0",
        ]);

        assert!(run(cli).is_err());
        assert_eq!(Store::open(&database, "inmet")?.table_counts()?.total(), 0);
        Ok(())
    }
}
