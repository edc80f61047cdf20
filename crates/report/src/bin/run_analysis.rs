use anyhow::Result;
use clap::Parser;
use ingest::{DataLayout, Label, init_tracing, load_cleaned};
use report::{DatasetStats, generate_report};

/// Summarize cleaned_news.csv and draw data_analysis.png.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding cleaned_news.csv
    #[arg(short, long, env = "DATA_DIR", default_value = "data")]
    data_dir: String,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!("=== Data Analysis ===\n");

    let layout = DataLayout::new(&args.data_dir);
    let articles = load_cleaned(&layout)?;
    let stats = DatasetStats::from_articles(&articles);

    println!("Total Articles: {}", stats.total);
    println!("Fake News: {}", stats.count(Label::Fake));
    println!("Real News: {}", stats.count(Label::Real));

    generate_report(&stats, &layout.analysis_png())?;
    println!("\n✅ Visualization saved as: {}", layout.analysis_png().display());

    print_title_words(&stats);

    println!("\n✅ Analysis complete!");
    Ok(())
}

fn print_title_words(stats: &DatasetStats) {
    println!("\n=== TEXT ANALYSIS ===");
    for label_stats in &stats.labels {
        println!("\nMost common words in {} news titles:", label_stats.label);
        for (word, count) in &label_stats.top_title_words {
            println!("  {:<20} {}", word, count);
        }
    }
}
