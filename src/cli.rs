//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::data::LoadOptions;
use crate::error::AnalysisError;

/// Sales, review sentiment and state map analysis from CSV and GeoJSON files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the weekly sales CSV file
    #[arg(long, env = "SALESCOPE_SALES", default_value = "data/weekly_sales.csv")]
    pub sales: PathBuf,

    /// Path to the customer reviews CSV file
    #[arg(long, env = "SALESCOPE_REVIEWS", default_value = "data/reviews.csv")]
    pub reviews: PathBuf,

    /// Path to the GeoJSON file with one named feature per state
    #[arg(long, env = "SALESCOPE_GEO", default_value = "data/geo_ng.json")]
    pub geo: PathBuf,

    /// Directory the chart images are written to
    #[arg(short, long, env = "SALESCOPE_OUTPUT_DIR", default_value = "charts")]
    pub output_dir: PathBuf,

    /// Field delimiter of the CSV files
    #[arg(long, default_value = ",")]
    pub delimiter: String,

    /// strftime format of the sales date column (inferred when omitted)
    /// Example: --date-format "%d/%m/%Y"
    #[arg(long)]
    pub date_format: Option<String>,

    /// Currency symbol used in printed totals and axis labels
    #[arg(long, default_value = "₦")]
    pub currency: String,

    /// Title of the choropleth map
    #[arg(long, default_value = "Juice Sales by State")]
    pub map_title: String,

    /// Print summaries only, without rendering charts
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the file loading options from the delimiter and date format flags
    pub fn load_options(&self) -> crate::Result<LoadOptions> {
        let delimiter = match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => return Err(AnalysisError::InvalidDelimiter(self.delimiter.clone()).into()),
        };

        Ok(LoadOptions {
            delimiter,
            date_format: self.date_format.clone(),
        })
    }
}
