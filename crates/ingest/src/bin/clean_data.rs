use clap::Parser;
use ingest::{CleaningPipeline, CleaningReport, DataLayout, PipelineConfig, init_tracing};
use std::process::ExitCode;
use tracing::error;

/// Normalize all_news.csv into cleaned_news.csv plus a fixed-size random sample.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the input and output CSV files
    #[arg(short, long, env = "DATA_DIR", default_value = "data")]
    data_dir: String,

    /// Rows in sample_news.csv
    #[arg(long, env = "SAMPLE_SIZE", default_value_t = 1000)]
    sample_size: usize,

    /// Seed for the sample draw
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    println!("=== Data Cleaning ===\n");

    let layout = DataLayout::new(&args.data_dir);
    let pipeline = CleaningPipeline::new(PipelineConfig {
        sample_size: args.sample_size,
        seed: args.seed,
    });

    match pipeline.run(&layout) {
        Ok(report) => {
            print_report(&report);
            println!("\n✅ Saved {}", layout.cleaned_news().display());
            println!("✅ Saved {}", layout.sample_news().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Data cleaning failed");
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &CleaningReport) {
    println!("Articles: {}", report.rows);
    println!("Missing values before: {}", report.missing_before);
    println!("Missing values after: {}", report.missing_after);
    println!("Very short articles (<50 chars): {}", report.short_articles);
    println!("Average article length: {:.0} characters", report.mean_length);
    println!("Shortest article: {} characters", report.min_length);
    println!("Longest article: {} characters", report.max_length);
    println!("FAKE: {}  REAL: {}", report.fake_rows, report.real_rows);
    println!("Sample rows: {}", report.sample_rows);
}
