// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart demos for `tandem_charts`.
//!
//! Renders a small dashboard of linked charts into SVG files plus an `index.html` that embeds
//! them. The first argument is the output directory (default `out`).

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use kurbo::Point;
use peniko::color::palette::css;
use tandem_charts::{
    AxisSide, BarChart, ChartStyle, PieChart, RadarChart, Series, Size, SyncBus, Threshold,
    XyChart,
};
use tandem_core::IdSource;
use tracing_subscriber::EnvFilter;

/// 2023-11-14 22:13:20 UTC.
const START: f64 = 1_700_000_000.0;
const STEP: f64 = 1800.0;

#[derive(Clone, Debug)]
struct Sample {
    t: f64,
    cpu: Option<f64>,
    load: f64,
    web: f64,
    api: f64,
    batch: f64,
}

fn samples() -> Vec<Sample> {
    (0..48_u32)
        .map(|i| {
            let f = f64::from(i);
            // Two readings went missing; they render as gaps.
            let cpu = (!matches!(i, 17 | 18)).then(|| 45.0 + 30.0 * (f / 7.0).sin());
            Sample {
                t: START + f * STEP,
                cpu,
                load: 1.5 + (f / 5.0).cos(),
                web: 20.0 + 8.0 * (f / 6.0).sin().abs(),
                api: 12.0 + 4.0 * (f / 9.0).cos().abs(),
                batch: if i % 12 < 4 { 10.0 } else { 2.0 },
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
struct Sale {
    quarter: &'static str,
    region: &'static str,
    units: f64,
}

fn sales() -> Vec<Sale> {
    let mut out = Vec::new();
    for (q, quarter) in (0_u32..).zip(["Q1", "Q2", "Q3", "Q4"]) {
        for (r, region) in (0_u32..).zip(["north", "south", "west"]) {
            let units = 10.0 + 3.0 * f64::from(q) + 5.0 * f64::from(r);
            out.push(Sale {
                quarter,
                region,
                units,
            });
        }
    }
    out
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let out_dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("out"), PathBuf::from);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut ids = IdSource::new();
    let bus = SyncBus::new();
    let data: Rc<[Sample]> = samples().into();

    let mut cpu = XyChart::new(ids.next_base(), Size::new(640.0, 260.0), Rc::clone(&data), |s: &Sample| s.t)
        .time()
        .with_right_axis(true)
        .with_series(Series::new("cpu", |s: &Sample| s.cpu).with_label("CPU"))
        .with_series(
            Series::new("load", |s: &Sample| s.load)
                .with_label("Load")
                .with_axis(AxisSide::Right),
        )
        .with_y_label("CPU")
        .with_y_unit_left_label("%")
        .with_y_unit_right_label("load avg")
        .with_thresholds(vec![
            Threshold::new(START + 30.0 * STEP)
                .with_y(70.0)
                .with_label("deploy"),
        ])
        .with_link(&bus);

    let mut traffic = XyChart::new(ids.next_base(), Size::new(640.0, 260.0), data, |s: &Sample| s.t)
        .time()
        .stacked(true)
        .with_series(Series::new("web", |s: &Sample| s.web).area())
        .with_series(Series::new("api", |s: &Sample| s.api).area())
        .with_series(Series::new("batch", |s: &Sample| s.batch).area())
        .with_y_label("Requests")
        .with_y_unit_left_label("k/s")
        .with_link(&bus);

    let mut bars = BarChart::new(
        ids.next_base(),
        Size::new(480.0, 260.0),
        sales(),
        |s: &Sale| s.quarter,
        |s: &Sale| s.units,
    )
    .with_group(|s: &Sale| s.region)
    .with_y_label("Units")
    .on_click(|index, sale: &Sale| {
        tracing::info!(index, quarter = sale.quarter, region = sale.region, "bar clicked");
    });

    let shares: Vec<(&'static str, f64)> =
        vec![("desktop", 54.0), ("mobile", 38.0), ("tablet", 6.0), ("other", 0.0)];
    let mut pie = PieChart::new(
        ids.next_base(),
        Size::new(320.0, 260.0),
        shares,
        |s: &(&'static str, f64)| s.0,
        |s: &(&'static str, f64)| s.1,
    )
    .with_inner_radius(40.0)
    .on_change(|key| tracing::info!(key, "wedge selected"));

    type Skill = (&'static str, f64, f64);
    let skills: Vec<Skill> = vec![
        ("speed", 8.0, 4.0),
        ("range", 5.0, 7.0),
        ("armor", 3.0, 9.0),
        ("stealth", 9.0, 2.0),
        ("cost", 4.0, 6.0),
    ];
    let mut radar = RadarChart::new(ids.next_base(), Size::new(360.0, 300.0), skills, |s: &Skill| s.0)
        .with_series(Series::new("scout", |s: &Skill| s.1))
        .with_series(Series::new("tank", |s: &Skill| s.2))
        .with_style(ChartStyle::default().with_plot_background(css::WHITE_SMOKE));

    cpu.render()?;
    traffic.render()?;

    // Hovering one chart moves the crosshair in the other.
    let plot = cpu.plot();
    let hover = cpu.pointer_move(plot.x0 + 0.6 * plot.width())?;
    tracing::info!(?hover, "pointer moved over cpu chart");
    let cpu_diffs = cpu.render()?;
    let traffic_diffs = traffic.render()?;
    tracing::info!(cpu = cpu_diffs.len(), traffic = traffic_diffs.len(), "hover diffs");

    bars.render()?;
    let band = bars.band_scale().context("bar layout")?;
    bars.pointer_move(band.center(2))?;
    bars.click(Point::new(band.center(1), bars.plot().y1 - 2.0))?;
    bars.render()?;

    let pie_plot = pie.plot();
    pie.click(Point::new(pie_plot.center().x + 60.0, pie_plot.center().y))?;
    pie.render()?;
    radar.render()?;

    let files = [
        ("cpu.svg", "CPU and load (linked)", cpu.to_svg()),
        ("traffic.svg", "Stacked traffic (linked)", traffic.to_svg()),
        ("sales.svg", "Grouped sales", bars.to_svg()),
        ("devices.svg", "Device share", pie.to_svg()),
        ("loadouts.svg", "Loadouts", radar.to_svg()),
    ];
    for (name, _, svg) in &files {
        write_file(&out_dir, name, svg)?;
    }
    write_file(&out_dir, "index.html", &report(&files))?;
    Ok(())
}

fn report(files: &[(&str, &str, String)]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>tandem charts</title></head>\n<body>\n",
    );
    for (name, title, _) in files {
        let _ = writeln!(html, "<h2>{title}</h2>\n<img src=\"{name}\" alt=\"{title}\">");
    }
    html.push_str("</body></html>\n");
    html
}

fn write_file(dir: &Path, name: &str, contents: &str) -> anyhow::Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
