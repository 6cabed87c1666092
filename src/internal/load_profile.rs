#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

//! Records how both maps grow as random keys are inserted and plots load factor, capacity and
//! empty buckets per insert.

use log::{LevelFilter, info};
use plotters::prelude::*;
use primehash::{ChainedHashMap, OpenAddressingMap, SipKeyHasher};
use rand::{Rng, distr::Alphanumeric};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const INSERTS: usize = 5_000;
const INITIAL_CAPACITY: usize = 11;
const KEY_LENGTH: usize = 12;

const METHODS: [&str; 2] = ["Open Addressing", "Separate Chaining"];

/// One sample per insert
#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    load: f64,
    capacity: usize,
    empty_buckets: usize,
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| (&mut rng).sample_iter(&Alphanumeric).take(KEY_LENGTH).map(char::from).collect())
        .collect()
}

fn profile_open_addressing(keys: &[String]) -> Vec<Sample> {
    let mut map = OpenAddressingMap::new(INITIAL_CAPACITY, SipKeyHasher);
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            map.put(key.as_str(), i);
            Sample { load: map.table_load(), capacity: map.capacity(), empty_buckets: map.empty_buckets() }
        })
        .collect()
}

fn profile_chaining(keys: &[String]) -> Vec<Sample> {
    let mut map = ChainedHashMap::new(INITIAL_CAPACITY, SipKeyHasher);
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            map.put(key.as_str(), i);
            Sample { load: map.table_load(), capacity: map.capacity(), empty_buckets: map.empty_buckets() }
        })
        .collect()
}

fn draw_chart(
    path: &str,
    caption: &str,
    y_desc: &str,
    series: &[Vec<f64>],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series.iter().flat_map(|s| s.iter()).fold(0.0, |max: f64, &y| max.max(y)) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..INSERTS, 0.0..max_y.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (method_idx, &method) in METHODS.iter().enumerate() {
        let line_style = ShapeStyle::from(&colors[method_idx % colors.len()]).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                series[method_idx].iter().enumerate().map(|(i, &y)| (i + 1, y)),
                line_style,
            ))?
            .label(method)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    info!("wrote {path}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let keys = random_keys(INSERTS);
    let profiles = [profile_open_addressing(&keys), profile_chaining(&keys)];

    for (method, profile) in METHODS.iter().zip(&profiles) {
        if let Some(last) = profile.last() {
            info!(
                "{method}: capacity {}, load {:.3}, empty buckets {}",
                last.capacity, last.load, last.empty_buckets
            );
        }
    }

    let pick = |f: fn(&Sample) -> f64| -> Vec<Vec<f64>> {
        profiles.iter().map(|profile| profile.iter().map(f).collect()).collect()
    };

    draw_chart("load_factor.png", "Load Factor After Each Insert", "Load factor", &pick(|s| s.load))?;
    draw_chart("capacity.png", "Capacity Growth", "Buckets", &pick(|s| s.capacity as f64))?;
    draw_chart(
        "empty_buckets.png",
        "Empty Buckets After Each Insert",
        "Empty buckets",
        &pick(|s| s.empty_buckets as f64),
    )?;

    Ok(())
}
