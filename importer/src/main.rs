use clap::Parser;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

mod db;
mod errors;
mod import;
mod schema;
mod slug;

use import::{ImportStats, Importer, RecordKind};

#[derive(Parser)]
#[command(name = "importer")]
#[command(about = "Import scraped leagues, events or teams into the directory")]
struct Args {
    /// JSON file holding an array of records
    #[arg(long)]
    file: PathBuf,

    /// Kind of records in the file
    #[arg(long = "type", value_enum)]
    kind: RecordKind,

    /// Validate and log the records without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn print_summary(stats: &ImportStats, dry_run: bool) {
    tracing::info!("{}", "=".repeat(50));
    tracing::info!("IMPORT SUMMARY");
    tracing::info!("Success: {}", stats.success);
    tracing::info!("Failed: {}", stats.failed);
    tracing::info!("Skipped: {}", stats.skipped);
    tracing::info!("{}", "=".repeat(50));
    if dry_run {
        tracing::info!("This was a dry run; run without --dry-run to import.");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .pretty()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("Loading data from {}", args.file.display());
    let records = import::load_records(&args.file)?;
    tracing::info!("Loaded {} records", records.len());

    let stats = if args.dry_run {
        Importer::<db::DbClient>::dry_run()
            .import(args.kind, records)
            .await
    } else {
        let database_url = env::var("DATABASE_URL")?;
        let db_client = db::DbClient::new(&database_url)?;
        Importer::new(db_client).import(args.kind, records).await
    };

    print_summary(&stats, args.dry_run);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "importer",
            "--file",
            "scraped_leagues.json",
            "--type",
            "leagues",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.kind, RecordKind::Leagues);
        assert_eq!(args.file, PathBuf::from("scraped_leagues.json"));
        assert!(args.dry_run);
    }

    #[test]
    fn test_args_reject_unknown_type() {
        assert!(Args::try_parse_from(["importer", "--file", "x.json", "--type", "clinics"]).is_err());
    }
}
