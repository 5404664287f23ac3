//! Chart and choropleth rendering using Plotters

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use geo::{Area, Rect};
use log::{info, warn};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::geomap::{self, MergedRegion};
use crate::sales::SalesSummary;
use crate::sentiment::Sentiment;

pub const SALES_BY_ITEM_FILE: &str = "sales_by_item.png";
pub const SALES_DISTRIBUTION_FILE: &str = "sales_distribution.png";
pub const DAILY_SALES_FILE: &str = "daily_sales.png";
pub const REVIEW_SENTIMENT_FILE: &str = "review_sentiment.png";
pub const CUSTOMERS_BY_STATE_FILE: &str = "customers_by_state.png";
pub const SALES_MAP_FILE: &str = "sales_map.png";

/// Slice colors for the pie chart
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Sequential orange-red scheme, light to dark
const OR_RD: [RGBColor; 9] = [
    RGBColor(255, 247, 236),
    RGBColor(254, 232, 200),
    RGBColor(253, 212, 158),
    RGBColor(253, 187, 132),
    RGBColor(252, 141, 89),
    RGBColor(239, 101, 72),
    RGBColor(215, 48, 31),
    RGBColor(179, 0, 0),
    RGBColor(127, 0, 0),
];

const BASE_MAP_FILL: RGBColor = RGBColor(211, 211, 211);
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Everything the report charts are drawn from
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub summary: &'a SalesSummary,
    pub sentiments: &'a [(Sentiment, usize)],
    pub regions: &'a [MergedRegion],
    pub map_title: &'a str,
    pub currency: &'a str,
}

/// Position on the OrRd scheme for `t` in [0, 1]
pub fn or_rd(t: f64) -> RGBColor {
    let last = OR_RD.len() - 1;
    let scaled = t.clamp(0.0, 1.0) * last as f64;
    let index = scaled.floor() as usize;
    if index >= last {
        return OR_RD[last];
    }

    let fraction = scaled - index as f64;
    let (RGBColor(r0, g0, b0), RGBColor(r1, g1, b1)) = (OR_RD[index], OR_RD[index + 1]);
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * fraction).round() as u8;
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Linear mapping of values onto the OrRd scheme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Scale spanning `values`; `None` when there are none
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |scale, value| match scale {
            None => Some(Self {
                min: value,
                max: value,
            }),
            Some(Self { min, max }) => Some(Self {
                min: min.min(value),
                max: max.max(value),
            }),
        })
    }

    /// Position of `value` in [0, 1]; every value maps to 0 when min == max
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn color(&self, value: f64) -> RGBColor {
        or_rd(self.normalize(value))
    }

    fn axis_range(&self) -> Range<f64> {
        if self.max > self.min {
            self.min..self.max
        } else {
            (self.min - 0.5)..(self.max + 0.5)
        }
    }
}

/// Expand `rect` so one x unit and one y unit cover the same number of pixels
pub fn fit_aspect(rect: Rect<f64>, (width, height): (u32, u32)) -> (Range<f64>, Range<f64>) {
    let (min, max) = (rect.min(), rect.max());
    let mut data_w = (max.x - min.x).max(1e-9);
    let mut data_h = (max.y - min.y).max(1e-9);
    let pixel_ratio = width.max(1) as f64 / height.max(1) as f64;

    if data_w / data_h > pixel_ratio {
        data_h = data_w / pixel_ratio;
    } else {
        data_w = data_h * pixel_ratio;
    }

    let center_x = (min.x + max.x) / 2.0;
    let center_y = (min.y + max.y) / 2.0;
    (
        (center_x - data_w / 2.0)..(center_x + data_w / 2.0),
        (center_y - data_h / 2.0)..(center_y + data_h / 2.0),
    )
}

/// Vertical bar chart with one labeled bar per category
///
/// # Arguments
/// * `output_path` - Path to save the PNG plot
/// * `title` - Chart caption
/// * `y_desc` - Y axis description
/// * `labels` - Category names, drawn in the given order
/// * `values` - Bar heights, one per label
pub fn create_bar_chart(
    output_path: &Path,
    title: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
) -> crate::Result<()> {
    if labels.is_empty() || labels.len() != values.len() {
        anyhow::bail!("No data to plot for '{}'", title);
    }

    let max_value = values.iter().copied().fold(0.0, f64::max);
    let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|value: &SegmentValue<usize>| match value {
            SegmentValue::CenterOf(index) => labels.get(*index).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(10)
            .data(values.iter().enumerate().map(|(index, value)| (index, *value))),
    )?;

    root.present()?;
    info!("Saved {}", output_path.display());
    Ok(())
}

/// Pie chart of each item's share of total sales, first slice at the top
pub fn create_pie_chart(output_path: &Path, sales_by_item: &[(String, f64)]) -> crate::Result<()> {
    let total: f64 = sales_by_item.iter().map(|(_, value)| value).sum();
    if total <= 0.0 {
        anyhow::bail!("No sales to plot in pie chart");
    }

    let root = BitMapBackend::new(output_path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Sales Distribution by Item", ("sans-serif", 30))?;

    let (width, height) = root.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = width.min(height) as f64 * 0.35;

    let sizes: Vec<f64> = sales_by_item.iter().map(|(_, value)| *value).collect();
    let labels: Vec<String> = sales_by_item.iter().map(|(item, _)| item.clone()).collect();
    let colors: Vec<RGBColor> = (0..sizes.len())
        .map(|index| PALETTE[index % PALETTE.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));
    root.draw(&pie)?;

    root.present()?;
    info!("Saved {}", output_path.display());
    Ok(())
}

/// Line chart of daily totals with a marker per day
pub fn create_daily_sales_chart(
    output_path: &Path,
    daily_sales: &[(NaiveDate, f64)],
    currency: &str,
) -> crate::Result<()> {
    let (first, last) = match (daily_sales.first(), daily_sales.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => anyhow::bail!("No daily sales to plot"),
    };

    let max_value = daily_sales.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };
    let x_range = first.pred_opt().unwrap_or(first)..last.succ_opt().unwrap_or(last);

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Daily Sales Trend", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m-%d").to_string())
        .x_desc("Date")
        .y_desc(format!("Total Sales ({})", currency))
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(LineSeries::new(daily_sales.iter().copied(), &BAR_COLOR))?;
    chart.draw_series(
        daily_sales
            .iter()
            .map(|&(date, total)| Circle::new((date, total), 4, BAR_COLOR.filled())),
    )?;

    root.present()?;
    info!("Saved {}", output_path.display());
    Ok(())
}

/// Filled rings of every polygon in paint order
///
/// Matched regions take their scale color and the rest the base map grey.
/// Polygons are ordered by exterior area, largest first, and each one is
/// followed by its holes in white, so a region lying inside another
/// region's hole is painted on top of it.
fn fill_layers(
    regions: &[MergedRegion],
    scale: Option<&ColorScale>,
) -> Vec<(Vec<(f64, f64)>, RGBColor)> {
    let mut polygons: Vec<(f64, &geo::Polygon<f64>, RGBColor)> = regions
        .iter()
        .flat_map(|region| {
            let fill = match (scale, region.price) {
                (Some(scale), Some(price)) => scale.color(price),
                _ => BASE_MAP_FILL,
            };
            region.boundary.0.iter().map(move |polygon| {
                let outline = geo::Polygon::new(polygon.exterior().clone(), vec![]);
                (outline.unsigned_area(), polygon, fill)
            })
        })
        .collect();
    polygons.sort_by(|a, b| b.0.total_cmp(&a.0));

    polygons
        .into_iter()
        .flat_map(|(_, polygon, fill)| {
            std::iter::once((ring_points(polygon.exterior()), fill))
                .chain(polygon.interiors().iter().map(|hole| (ring_points(hole), WHITE)))
        })
        .collect()
}

fn ring_points(ring: &geo::LineString<f64>) -> Vec<(f64, f64)> {
    ring.coords().map(|c| (c.x, c.y)).collect()
}

/// Choropleth of state totals over a grey base map, labeled at centroids
pub fn create_sales_map(
    output_path: &Path,
    regions: &[MergedRegion],
    title: &str,
) -> crate::Result<()> {
    let rect = geomap::bounds(regions.iter().map(|region| &region.boundary))
        .context("No region boundaries to draw")?;
    let scale = ColorScale::from_values(regions.iter().filter_map(|region| region.price));

    let root = BitMapBackend::new(output_path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 28))?;
    let (map_area, legend_area) = root.split_horizontally(860);

    let (x_range, y_range) = fit_aspect(rect, map_area.dim_in_pixel());
    let mut chart = ChartBuilder::on(&map_area)
        .margin(10)
        .build_cartesian_2d(x_range, y_range)?;

    chart.draw_series(
        fill_layers(regions, scale.as_ref())
            .into_iter()
            .map(|(ring, fill)| Polygon::new(ring, fill.filled())),
    )?;

    chart.draw_series(regions.iter().flat_map(|region| {
        region.boundary.0.iter().flat_map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| PathElement::new(ring_points(ring), BLACK))
        })
    }))?;

    let label_style =
        TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(regions.iter().filter_map(|region| {
        let centroid = region.centroid?;
        Some(Text::new(
            region.name.clone(),
            (centroid.x(), centroid.y()),
            label_style.clone(),
        ))
    }))?;

    match scale {
        Some(scale) => draw_color_bar(&legend_area, &scale)?,
        None => warn!("No region matched a state with sales; map has no color layer"),
    }

    root.present()?;
    info!("Saved {}", output_path.display());
    Ok(())
}

fn draw_color_bar(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    scale: &ColorScale,
) -> crate::Result<()> {
    let y_range = scale.axis_range();
    let (low, high) = (y_range.start, y_range.end);

    let mut chart = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(60)
        .margin_right(10)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..1f64, y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(6)
        .draw()?;

    let steps = 64;
    chart.draw_series((0..steps).map(|step| {
        let y0 = low + (high - low) * step as f64 / steps as f64;
        let y1 = low + (high - low) * (step + 1) as f64 / steps as f64;
        Rectangle::new([(0.0, y0), (1.0, y1)], scale.color((y0 + y1) / 2.0).filled())
    }))?;

    Ok(())
}

/// Print the sales aggregates to the console
pub fn print_sales_summary(summary: &SalesSummary, currency: &str) {
    println!("\n=== Sales Summary ===");
    println!("Total Sales: {}{:.2}", currency, summary.total_sales);

    println!("\nSales by item:");
    for (item, total) in &summary.sales_by_item {
        println!("  {:<24} {:>14.2}", item, total);
    }

    println!("\nDaily sales:");
    for (date, total) in &summary.daily_sales {
        println!("  {}  {:>14.2}", date.format("%Y-%m-%d"), total);
    }

    println!("\nCustomers by state:");
    for (state, customers) in &summary.customers_by_state {
        println!("  {:<24} {:>6}", state, customers);
    }
}

/// Print review label counts to the console
pub fn print_sentiment_summary(counts: &[(Sentiment, usize)]) {
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    println!("\n=== Review Sentiment ===");
    for (sentiment, count) in counts {
        let percentage = if total > 0 {
            *count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        println!("  {:<9} {:>6} ({:.1}%)", sentiment, count, percentage);
    }
}

/// Render every chart that has data into `output_dir`
///
/// Returns the paths written; charts without data are skipped.
pub fn generate_report(inputs: &ReportInputs<'_>, output_dir: &Path) -> crate::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let summary = inputs.summary;
    let mut written = Vec::new();
    let y_sales = format!("Total Sales ({})", inputs.currency);

    if summary.sales_by_item.is_empty() {
        warn!("Skipping item charts: no sales");
    } else {
        let (items, totals) = unzip_labels(&summary.sales_by_item, |v| *v);
        let path = output_dir.join(SALES_BY_ITEM_FILE);
        create_bar_chart(&path, "Sales by Item", &y_sales, &items, &totals)?;
        written.push(path);

        if summary.total_sales > 0.0 {
            let path = output_dir.join(SALES_DISTRIBUTION_FILE);
            create_pie_chart(&path, &summary.sales_by_item)?;
            written.push(path);
        }
    }

    if summary.daily_sales.is_empty() {
        warn!("Skipping daily trend: no dated sales");
    } else {
        let path = output_dir.join(DAILY_SALES_FILE);
        create_daily_sales_chart(&path, &summary.daily_sales, inputs.currency)?;
        written.push(path);
    }

    if inputs.sentiments.is_empty() {
        warn!("Skipping sentiment chart: no reviews");
    } else {
        let labels: Vec<String> = inputs.sentiments.iter().map(|(s, _)| s.to_string()).collect();
        let counts: Vec<f64> = inputs.sentiments.iter().map(|(_, c)| *c as f64).collect();
        let path = output_dir.join(REVIEW_SENTIMENT_FILE);
        create_bar_chart(&path, "Customer Reviews", "Reviews", &labels, &counts)?;
        written.push(path);
    }

    if summary.customers_by_state.is_empty() {
        warn!("Skipping customer chart: no states");
    } else {
        let (states, customers) = unzip_labels(&summary.customers_by_state, |c| *c as f64);
        let path = output_dir.join(CUSTOMERS_BY_STATE_FILE);
        create_bar_chart(&path, "Customers by Location", "Customers", &states, &customers)?;
        written.push(path);
    }

    if inputs.regions.is_empty() {
        warn!("Skipping map: no regions");
    } else {
        let path = output_dir.join(SALES_MAP_FILE);
        create_sales_map(&path, inputs.regions, inputs.map_title)?;
        written.push(path);
    }

    Ok(written)
}

fn unzip_labels<V>(pairs: &[(String, V)], value: impl Fn(&V) -> f64) -> (Vec<String>, Vec<f64>) {
    pairs
        .iter()
        .map(|(label, v)| (label.clone(), value(v)))
        .unzip()
}
