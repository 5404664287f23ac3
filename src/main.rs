//! Salescope: sales, review sentiment and state map analysis CLI
//!
//! This is the main entrypoint that runs loading, aggregation, sentiment
//! labeling, the geo join and chart rendering in order.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::debug;
use salescope::viz::{self, ReportInputs};
use salescope::{data, geomap, sentiment, Args, ReviewTable, SalesTable};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    run_pipeline(&args)
}

/// Run the full analysis pipeline
fn run_pipeline(args: &Args) -> Result<()> {
    println!("=== Sales Analysis Pipeline ===\n");

    let start_time = Instant::now();
    let options = args.load_options()?;

    // Step 1: Load and normalize tables
    if args.verbose {
        println!("Step 1: Loading data");
        println!("  Sales file: {}", args.sales.display());
        println!("  Reviews file: {}", args.reviews.display());
    }

    let step_start = Instant::now();
    let sales = SalesTable::load(&args.sales, &options)?;
    let mut reviews = ReviewTable::load(&args.reviews, &options)?;

    println!(
        "✓ Data loaded: {} sales rows, {} reviews",
        sales.len(),
        reviews.len()
    );
    debug!("Load time: {:.2}s", step_start.elapsed().as_secs_f64());

    data::print_overview("Sales", sales.frame());
    data::print_overview("Reviews", reviews.frame());

    // Step 2: Aggregate sales
    if args.verbose {
        println!("\nStep 2: Aggregating sales");
    }

    let step_start = Instant::now();
    let summary = salescope::summarize(&sales)?;
    debug!("Aggregation time: {:.2}s", step_start.elapsed().as_secs_f64());

    viz::print_sales_summary(&summary, &args.currency);

    // Step 3: Label review sentiment
    if args.verbose {
        println!("\nStep 3: Labeling review sentiment");
    }

    let step_start = Instant::now();
    let records = sentiment::label_reviews(&mut reviews)?;
    let sentiment_counts = sentiment::count_sentiments(&records);
    debug!("Labeling time: {:.2}s", step_start.elapsed().as_secs_f64());

    println!("\n{}", reviews.frame().head(Some(5)));
    viz::print_sentiment_summary(&sentiment_counts);

    // Step 4: Join state totals onto regions
    if args.verbose {
        println!("\nStep 4: Joining sales onto regions");
        println!("  Boundary file: {}", args.geo.display());
    }

    let regions = geomap::load_regions(&args.geo)?;
    geomap::print_regions(&regions);

    let merged = geomap::merge_sales(&regions, &summary.sales_by_state);
    let colored = merged.iter().filter(|region| region.is_colored()).count();
    println!(
        "\n✓ {} of {} regions matched a state with sales",
        colored,
        merged.len()
    );

    // Step 5: Render charts
    if args.no_charts {
        println!("\nChart rendering skipped (--no-charts)");
    } else {
        if args.verbose {
            println!("\nStep 5: Generating charts");
            println!("  Output directory: {}", args.output_dir.display());
        }

        let step_start = Instant::now();
        let inputs = ReportInputs {
            summary: &summary,
            sentiments: &sentiment_counts,
            regions: &merged,
            map_title: &args.map_title,
            currency: &args.currency,
        };
        let written = viz::generate_report(&inputs, &args.output_dir)?;
        debug!("Rendering time: {:.2}s", step_start.elapsed().as_secs_f64());

        println!("\n✓ {} charts generated", written.len());
        for path in &written {
            println!("  {}", path.display());
        }
    }

    println!("\n=== Pipeline Complete ===");
    println!(
        "Total processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
