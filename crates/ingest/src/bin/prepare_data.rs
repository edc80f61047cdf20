use clap::Parser;
use ingest::{DataLayout, init_tracing, prepare_dataset};
use std::process::ExitCode;
use tracing::error;

/// Merge Fake.csv and True.csv into a single labeled all_news.csv.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the source and output CSV files
    #[arg(short, long, env = "DATA_DIR", default_value = "data")]
    data_dir: String,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    println!("=== Data Preparation ===\n");

    let layout = DataLayout::new(&args.data_dir);
    match prepare_dataset(&layout) {
        Ok(summary) => {
            println!("Total articles: {}", summary.total());
            println!("Fake articles: {}", summary.fake_rows);
            println!("Real articles: {}", summary.real_rows);
            println!("\n✅ Saved to {}", layout.all_news().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Data preparation failed");
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
