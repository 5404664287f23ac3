//! Data loading and column normalization using Polars

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

use crate::error::AnalysisError;

/// Columns every sales table must provide after normalization
pub const SALES_COLUMNS: [&str; 5] = ["date", "item", "price", "state", "customer_id"];

/// Free-text column of the reviews table
pub const REVIEW_TEXT: &str = "review_text";

/// `NaiveDate::num_days_from_ce` of 1970-01-01, the origin of Polars `Date` values
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Options controlling how delimited files are read
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field separator byte
    pub delimiter: u8,
    /// strftime pattern for the sales `date` column; inferred when `None`
    pub date_format: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            date_format: None,
        }
    }
}

/// A single sales row, used to build a [`SalesTable`] in memory
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub item: String,
    pub price: f64,
    pub state: String,
    pub customer_id: String,
}

impl SalesRecord {
    pub fn new(
        date: NaiveDate,
        item: impl Into<String>,
        price: f64,
        state: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Self {
        Self {
            date,
            item: item.into(),
            price,
            state: state.into(),
            customer_id: customer_id.into(),
        }
    }
}

/// Normalize one header: trim, lowercase, spaces to underscores
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Normalize a sequence of headers, preserving order
pub fn normalize_columns<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    headers
        .iter()
        .map(|header| normalize_column_name(header.as_ref()))
        .collect()
}

/// Rename the columns of `frame` in place using [`normalize_columns`]
pub fn normalize_frame(frame: &mut DataFrame) -> crate::Result<()> {
    let raw: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let normalized = normalize_columns(&raw);

    if raw != normalized {
        debug!("Normalized columns {:?} -> {:?}", raw, normalized);
    }

    frame
        .set_column_names(normalized.iter().map(String::as_str))
        .context("Column names collide after normalization")?;
    Ok(())
}

/// Sales table with a validated schema
///
/// Guarantees `date: Date`, `price: Float64` with no negative values, and
/// string `item`/`state` columns. Any extra input columns are kept.
#[derive(Debug, Clone)]
pub struct SalesTable {
    frame: DataFrame,
}

impl SalesTable {
    /// Read a delimited sales file and validate it
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> crate::Result<Self> {
        let path = path.as_ref();
        let frame = read_delimited(path, options)?;
        let table = Self::from_frame(frame, options)
            .with_context(|| format!("Invalid sales data in {}", path.display()))?;

        debug!("Loaded {} sales rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Normalize headers, check required columns and coerce column types
    pub fn from_frame(mut frame: DataFrame, options: &LoadOptions) -> crate::Result<Self> {
        normalize_frame(&mut frame)?;
        require_columns(&frame, "sales", &SALES_COLUMNS)?;

        let date = if frame.column("date")?.dtype() == &DataType::Date {
            col("date")
        } else {
            let strptime = StrptimeOptions {
                format: options.date_format.clone().map(Into::into),
                ..Default::default()
            };
            col("date").cast(DataType::String).str().to_date(strptime)
        };

        let frame = frame
            .lazy()
            .with_columns([
                date,
                col("price").strict_cast(DataType::Float64),
                col("item").cast(DataType::String),
                col("state").cast(DataType::String),
            ])
            .collect()
            .context("Failed to parse date/price columns")?;

        check_prices(&frame)?;
        Ok(Self { frame })
    }

    /// Build a table from in-memory records
    pub fn from_records(records: &[SalesRecord]) -> crate::Result<Self> {
        let frame = df!(
            "date" => records.iter().map(|r| r.date.format("%Y-%m-%d").to_string()).collect::<Vec<_>>(),
            "item" => records.iter().map(|r| r.item.clone()).collect::<Vec<_>>(),
            "price" => records.iter().map(|r| r.price).collect::<Vec<_>>(),
            "state" => records.iter().map(|r| r.state.clone()).collect::<Vec<_>>(),
            "customer_id" => records.iter().map(|r| r.customer_id.clone()).collect::<Vec<_>>()
        )?;

        let options = LoadOptions {
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        };
        Self::from_frame(frame, &options)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Reviews table with a string `review_text` column
#[derive(Debug, Clone)]
pub struct ReviewTable {
    frame: DataFrame,
}

impl ReviewTable {
    /// Read a delimited reviews file and validate it
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> crate::Result<Self> {
        let path = path.as_ref();
        let frame = read_delimited(path, options)?;
        let table = Self::from_frame(frame)
            .with_context(|| format!("Invalid review data in {}", path.display()))?;

        debug!("Loaded {} reviews from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_frame(mut frame: DataFrame) -> crate::Result<Self> {
        normalize_frame(&mut frame)?;
        require_columns(&frame, "reviews", &[REVIEW_TEXT])?;

        let frame = frame
            .lazy()
            .with_column(col(REVIEW_TEXT).cast(DataType::String))
            .collect()?;
        Ok(Self { frame })
    }

    /// Build a table from raw texts; `None` stands for a missing cell
    pub fn from_texts(texts: &[Option<&str>]) -> crate::Result<Self> {
        let frame = df!(REVIEW_TEXT => texts.to_vec())?;
        Self::from_frame(frame)
    }

    pub fn review_texts(&self) -> crate::Result<&StringChunked> {
        Ok(self.frame.column(REVIEW_TEXT)?.as_materialized_series().str()?)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub(crate) fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Print head rows, missing values and a schema listing for a table
pub fn print_overview(title: &str, frame: &DataFrame) {
    println!("\n=== {} ===", title);
    println!("{}", frame.head(Some(5)));

    println!("\nMissing values:");
    for column in frame.get_columns() {
        println!("  {:<16} {}", column.name().as_str(), column.null_count());
    }

    println!("\nSchema ({} rows, {} columns):", frame.height(), frame.width());
    println!("  {:>2} | {:<16} | {:>14} | Dtype", "#", "Column", "Non-Null Count");
    for (index, column) in frame.get_columns().iter().enumerate() {
        println!(
            "  {:>2} | {:<16} | {:>14} | {}",
            index,
            column.name().as_str(),
            column.len() - column.null_count(),
            column.dtype()
        );
    }
}

/// Convert a Polars `Date` physical value (days since 1970-01-01) into a `NaiveDate`
pub(crate) fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Inverse of [`date_from_days`]
#[cfg(test)]
pub(crate) fn days_from_date(date: NaiveDate) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn read_delimited(path: &Path, options: &LoadOptions) -> crate::Result<DataFrame> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|parse| parse.with_separator(options.delimiter))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(frame)
}

fn require_columns(
    frame: &DataFrame,
    table: &'static str,
    required: &[&'static str],
) -> crate::Result<()> {
    for &column in required {
        if frame.get_column_index(column).is_none() {
            return Err(AnalysisError::MissingColumn { table, column }.into());
        }
    }
    Ok(())
}

fn check_prices(frame: &DataFrame) -> crate::Result<()> {
    let prices = frame.column("price")?.as_materialized_series().f64()?;
    let negative = prices
        .into_iter()
        .enumerate()
        .find_map(|(row, price)| price.filter(|p| *p < 0.0).map(|p| (row, p)));

    match negative {
        Some((row, price)) => Err(AnalysisError::NegativePrice { row, price }.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Customer ID "), "customer_id");
        assert_eq!(normalize_column_name("Review Text"), "review_text");
        assert_eq!(normalize_column_name("PRICE"), "price");
        assert_eq!(normalize_column_name(""), "");
    }

    #[test]
    fn test_normalize_columns_is_idempotent() {
        let raw = [" Date", "Item Name ", "PRICE", "customer id", "already_ok"];
        let once = normalize_columns(&raw);
        let twice = normalize_columns(&once);
        assert_eq!(once, twice);
        assert_eq!(once, vec!["date", "item_name", "price", "customer_id", "already_ok"]);
    }

    #[test]
    fn test_load_sales_with_messy_headers() {
        let file = write_csv(&[
            " Date ,Item,Price, State ,Customer ID",
            "2024-01-01,Apple Juice,500,Lagos,1",
            "2024-01-02,Mango Juice,250.5,Kano,2",
        ]);

        let sales = SalesTable::load(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(sales.len(), 2);

        let frame = sales.frame();
        assert_eq!(frame.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(frame.column("price").unwrap().dtype(), &DataType::Float64);
        assert!(frame.get_column_index("customer_id").is_some());
    }

    #[test]
    fn test_load_sales_with_custom_delimiter_and_format() {
        let file = write_csv(&[
            "date;item;price;state;customer_id",
            "01/02/2024;Apple Juice;100;Lagos;7",
        ]);
        let options = LoadOptions {
            delimiter: b';',
            date_format: Some("%d/%m/%Y".to_string()),
        };

        let sales = SalesTable::load(file.path(), &options).unwrap();
        let days = sales
            .frame()
            .column("date")
            .unwrap()
            .cast(&DataType::Int32)
            .unwrap();
        let first = days.as_materialized_series().i32().unwrap().get(0).unwrap();
        assert_eq!(
            date_from_days(first),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }

    #[test]
    fn test_malformed_date_fails() {
        let file = write_csv(&[
            "date,item,price,state,customer_id",
            "2024-01-01,Apple Juice,500,Lagos,1",
            "not a date,Apple Juice,300,Lagos,2",
        ]);
        let options = LoadOptions {
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        };

        assert!(SalesTable::load(file.path(), &options).is_err());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file = write_csv(&["date,item,price,state", "2024-01-01,Apple Juice,500,Lagos"]);

        let err = SalesTable::load(file.path(), &LoadOptions::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::MissingColumn {
                table: "sales",
                column: "customer_id"
            })
        );
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let file = write_csv(&[
            "date,item,price,state,customer_id",
            "2024-01-01,Apple Juice,500,Lagos,1",
            "2024-01-02,Apple Juice,-3,Lagos,2",
        ]);

        let err = SalesTable::load(file.path(), &LoadOptions::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::NegativePrice { row: 1, price: -3.0 })
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let result = SalesTable::load("does/not/exist.csv", &LoadOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_reviews_keep_missing_text_as_null() {
        let file = write_csv(&["Review Text,rating", "great product,5", ",3"]);

        let reviews = ReviewTable::load(file.path(), &LoadOptions::default()).unwrap();
        let texts: Vec<Option<&str>> = reviews.review_texts().unwrap().into_iter().collect();
        assert_eq!(texts, vec![Some("great product"), None]);
    }

    #[test]
    fn test_from_records_round_trips_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let sales =
            SalesTable::from_records(&[SalesRecord::new(date, "Apple Juice", 10.0, "Oyo", "c1")])
                .unwrap();

        let days = sales
            .frame()
            .column("date")
            .unwrap()
            .cast(&DataType::Int32)
            .unwrap();
        let value = days.as_materialized_series().i32().unwrap().get(0).unwrap();
        assert_eq!(value, days_from_date(date));
        assert_eq!(date_from_days(value), Some(date));
    }
}
