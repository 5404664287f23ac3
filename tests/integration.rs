//! Integration tests for Salescope

use salescope::sentiment::{count_sentiments, Sentiment};
use salescope::{
    label_reviews, load_regions, merge_sales, summarize, LoadOptions, ReviewTable, SalesTable,
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Create a sales CSV with untidy headers
fn create_sales_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, " Date , Item ,Price,State,Customer ID").unwrap();

    // Lagos - two customers, one item
    writeln!(file, "2024-01-01,Apple Juice,500,Lagos,1").unwrap();
    writeln!(file, "2024-01-02,Apple Juice,300,Lagos,2").unwrap();

    // Kano - one customer buying twice
    writeln!(file, "2024-01-02,Zobo,150,Kano,3").unwrap();
    writeln!(file, "2024-01-03,Mango Juice,250,Kano,3").unwrap();

    // Oyo - no matching region in the boundary file
    writeln!(file, "2024-01-03,Zobo,100,Oyo,4").unwrap();

    file
}

fn create_reviews_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Review Text").unwrap();
    writeln!(file, "great product").unwrap();
    writeln!(file, "terrible").unwrap();
    writeln!(file, "\"\"").unwrap();
    writeln!(file, "ok item").unwrap();
    writeln!(file, "the delivery was not good").unwrap();
    file
}

fn create_boundary_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
        "type": "FeatureCollection",
        "features": [
            {{"type": "Feature", "properties": {{"name": "Lagos"}},
              "geometry": {{"type": "Polygon",
                "coordinates": [[[3.0, 6.4], [4.0, 6.4], [4.0, 6.8], [3.0, 6.8], [3.0, 6.4]]]}}}},
            {{"type": "Feature", "properties": {{"name": "Kano"}},
              "geometry": {{"type": "MultiPolygon",
                "coordinates": [[[[8.0, 11.0], [9.0, 11.0], [9.0, 12.0], [8.0, 12.0], [8.0, 11.0]]]]}}}},
            {{"type": "Feature", "properties": {{"name": "Borno"}},
              "geometry": {{"type": "Polygon",
                "coordinates": [[[12.0, 11.0], [14.0, 11.0], [14.0, 13.0], [12.0, 13.0], [12.0, 11.0]]]}}}}
        ]
    }}"#
    )
    .unwrap();
    file
}

#[test]
fn test_end_to_end_sales_pipeline() {
    let sales_file = create_sales_csv();
    let sales = SalesTable::load(sales_file.path(), &LoadOptions::default()).unwrap();

    let summary = summarize(&sales).unwrap();

    assert_eq!(summary.total_sales, 1300.0);
    assert_eq!(summary.item_total("Apple Juice"), Some(800.0));
    assert_eq!(summary.customers_in("Lagos"), Some(2));
    assert_eq!(summary.customers_in("Kano"), Some(1));

    // Zobo (250) and Mango Juice (250) tie: Zobo appears first
    let items: Vec<&str> = summary
        .sales_by_item
        .iter()
        .map(|(item, _)| item.as_str())
        .collect();
    assert_eq!(items, vec!["Apple Juice", "Zobo", "Mango Juice"]);

    let item_sum: f64 = summary.sales_by_item.iter().map(|(_, v)| v).sum();
    assert!((item_sum - summary.total_sales).abs() < 1e-9);

    let days: Vec<String> = summary
        .daily_sales
        .iter()
        .map(|(date, _)| date.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(days, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
}

#[test]
fn test_reviews_are_labeled() {
    let reviews_file = create_reviews_csv();
    let mut reviews = ReviewTable::load(reviews_file.path(), &LoadOptions::default()).unwrap();

    let records = label_reviews(&mut reviews).unwrap();
    let labels: Vec<Sentiment> = records.iter().map(|r| r.sentiment).collect();
    assert_eq!(
        labels,
        vec![
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Positive,
            Sentiment::Negative,
        ]
    );

    assert_eq!(
        count_sentiments(&records),
        vec![
            (Sentiment::Positive, 2),
            (Sentiment::Negative, 2),
            (Sentiment::Neutral, 1),
        ]
    );
}

#[test]
fn test_geo_merge_with_sales() {
    let sales_file = create_sales_csv();
    let boundary_file = create_boundary_file();

    let sales = SalesTable::load(sales_file.path(), &LoadOptions::default()).unwrap();
    let summary = summarize(&sales).unwrap();
    let regions = load_regions(boundary_file.path()).unwrap();

    let merged = merge_sales(&regions, &summary.sales_by_state);
    assert_eq!(merged.len(), 3);

    let lagos = merged.iter().find(|r| r.name == "Lagos").unwrap();
    assert_eq!(lagos.price, Some(800.0));

    let kano = merged.iter().find(|r| r.name == "Kano").unwrap();
    assert_eq!(kano.price, Some(400.0));
    let centroid = kano.centroid.unwrap();
    assert!((centroid.x() - 8.5).abs() < 1e-9);
    assert!((centroid.y() - 11.5).abs() < 1e-9);

    // present on the base map, absent from the colored layer
    let borno = merged.iter().find(|r| r.name == "Borno").unwrap();
    assert_eq!(borno.price, None);
    assert!(!borno.is_colored());
    assert_eq!(merged.iter().filter(|r| r.is_colored()).count(), 2);
}

#[test]
fn test_rerun_gives_identical_aggregates() {
    let sales_file = create_sales_csv();

    let first = summarize(&SalesTable::load(sales_file.path(), &LoadOptions::default()).unwrap())
        .unwrap();
    let second = summarize(&SalesTable::load(sales_file.path(), &LoadOptions::default()).unwrap())
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_error_handling_missing_files() {
    assert!(SalesTable::load("missing/sales.csv", &LoadOptions::default()).is_err());
    assert!(ReviewTable::load("missing/reviews.csv", &LoadOptions::default()).is_err());
    assert!(load_regions("missing/geo.json").is_err());
}
