use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inmet-ingest")]
#[command(about = "Load INMET hourly weather-station CSV exports into a relational store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress the progress bar")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Settings file [default: inmet.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "SQLite database file")]
    pub database: Option<PathBuf>,

    #[arg(long, global = true, help = "Namespace the tables are attached under")]
    pub namespace: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the region, state, city, station and observation tables
    CreateTables {
        #[arg(long, help = "Drop existing tables first")]
        drop: bool,
    },

    /// Ingest every matching CSV file from a directory
    Populate {
        #[arg(short, long, help = "Directory containing the CSV exports")]
        data_dir: Option<PathBuf>,

        #[arg(short, long, help = "File-name glob, case-insensitive [default: *.CSV]")]
        pattern: Option<String>,

        #[arg(long, help = "Empty all tables before loading")]
        truncate: bool,

        #[arg(short, long, help = "Observation rows per transaction [default: 500]")]
        batch_size: Option<usize>,
    },

    /// Show row counts of the stored tables
    Stats {
        #[arg(long, help = "Print the counts as JSON")]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_populate() {
        let cli = Cli::parse_from([
            "inmet-ingest",
            "--database",
            "/tmp/x.db",
            "populate",
            "--data-dir",
            "data/2020",
            "--truncate",
            "-b",
            "100",
        ]);

        assert_eq!(cli.database, Some(PathBuf::from("/tmp/x.db")));
        match cli.command {
            Commands::Populate {
                data_dir,
                pattern,
                truncate,
                batch_size,
            } => {
                assert_eq!(data_dir, Some(PathBuf::from("data/2020")));
                assert_eq!(pattern, None);
                assert!(truncate);
                assert_eq!(batch_size, Some(100));
            }
            _ => panic!("expected populate"),
        }
    }

    #[test]
    fn test_parse_create_tables() {
        let cli = Cli::parse_from(["inmet-ingest", "create-tables", "--drop", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::CreateTables { drop: true }));
    }
}
