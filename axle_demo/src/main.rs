// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis demos for `axle`.
//!
//! Writes `axle_demo.html`, one SVG per section. Set `RUST_LOG=axle=debug` to see layout
//! and transition logging.
mod html;
mod svg;

use axle::{
    AnimationManager, Axis, AxisError, AxisKind, AxisLayout, AxisOrient, AxisSpec,
    AxisTransition, CrossLine, GridStyle, SkipAnimation, StrokeStyle,
};
use axle_text::{
    FontFamily, FontWeight, HeuristicTextMeasurer, TextMeasurer, TextStyle, WrapStrategy,
};
use kurbo::Rect;
use peniko::Brush;
use peniko::color::palette::css;
use tracing_subscriber::EnvFilter;

/// Logs every transition instead of tweening it.
#[derive(Debug, Default)]
struct LoggingAnimation {
    frames: usize,
}

impl AnimationManager for LoggingAnimation {
    fn is_skipped(&self) -> bool {
        false
    }

    fn animate(&mut self, transition: AxisTransition) {
        self.frames += 1;
        tracing::info!(
            frame = self.frames,
            added = transition.diff.added.len(),
            removed = transition.diff.removed.len(),
            nodes = transition.nodes.len(),
            "axis transition"
        );
        for node in &transition.nodes {
            tracing::debug!(
                id = %node.id,
                phase = ?node.phase,
                from = node.from.translation,
                to = node.to.translation,
                "tick"
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let measurer = HeuristicTextMeasurer;
    let sections = vec![
        numeric_demo(&measurer)?,
        log_time_demo(&measurer)?,
        crowded_categories_demo(&measurer)?,
        wrapped_categories_demo(&measurer)?,
        grouped_categories_demo(&measurer)?,
        zoom_demo(&measurer)?,
    ];

    let html = html::render_report("Axle axes demo", &sections);
    std::fs::write("axle_demo.html", html)?;
    println!("wrote axle_demo.html");
    Ok(())
}

fn plot_rect() -> Rect {
    Rect::new(80.0, 40.0, 520.0, 280.0)
}

fn light_grid() -> GridStyle {
    GridStyle {
        stroke: StrokeStyle::solid(css::BLACK.with_alpha(30.0 / 255.0), 1.0),
    }
}

/// Draws the plot background and every axis into one SVG.
fn draw(plot: Rect, axes: &[(&Axis, AxisLayout)]) -> String {
    let mut scene = svg::SvgScene::default();
    scene.add_rect(
        axle::GRID_LINES - 10,
        plot,
        &Brush::Solid(css::WHITE_SMOKE),
    );
    for (axis, layout) in axes {
        scene.include(layout.bbox);
        scene.add_axis(axis.records());
    }
    scene.to_svg_string()
}

fn numeric_demo(measurer: &dyn TextMeasurer) -> Result<html::HtmlSection, AxisError> {
    let plot = plot_rect();

    let mut bottom = Axis::new("x", AxisOrient::Bottom, AxisKind::Number { nice: true });
    bottom.set_plot(plot);
    bottom.set_domain(-3.2, 97.5);
    bottom.set_spec(AxisSpec::default().with_title("temperature (°C)").with_grid(light_grid()))?;

    let mut left = Axis::new("y", AxisOrient::Left, AxisKind::Number { nice: true });
    left.set_plot(plot);
    left.set_domain(0.0, 2400.0);
    left.set_spec(
        AxisSpec::default()
            .with_title("load (W)")
            .with_label_format(",")
            .with_grid(light_grid()),
    )?;

    // Fahrenheit on the right, aligned to the left axis ticks.
    let mut right = Axis::new("y2", AxisOrient::Right, AxisKind::Number { nice: false });
    right.set_plot(plot);
    right.set_domain(32.0, 207.5);
    right.set_spec(AxisSpec::default().with_title("temperature (°F)").with_label_format(".1f"))?;

    let bottom_layout = bottom.calculate_layout(measurer, None)?;
    let left_layout = left.calculate_layout(measurer, None)?;
    let right_layout = right.calculate_layout(measurer, left_layout.primary_tick_count)?;
    for axis in [&mut bottom, &mut left, &mut right] {
        axis.update(&mut SkipAnimation);
    }

    Ok(html::HtmlSection {
        title: "Number axes",
        description: "Nice linear axes with grids and titles. The right axis aligns its ticks to the left one.",
        svg: draw(
            plot,
            &[
                (&bottom, bottom_layout),
                (&left, left_layout),
                (&right, right_layout),
            ],
        ),
    })
}

fn log_time_demo(measurer: &dyn TextMeasurer) -> Result<html::HtmlSection, AxisError> {
    let plot = plot_rect();

    let mut top = Axis::new("time", AxisOrient::Top, AxisKind::Time);
    top.set_plot(plot);
    top.set_domain(0.0, 6.0 * 3600.0);
    top.set_spec(
        AxisSpec::default()
            .with_label_format("%H:%M")
            .with_label_style(TextStyle::new(11.0).with_family(FontFamily::Monospace))
            .with_title("time of day"),
    )?;

    let mut left = Axis::new("log", AxisOrient::Left, AxisKind::Log { base: 10.0 });
    left.set_plot(plot);
    left.set_domain(1.0, 100_000.0);
    left.set_spec(AxisSpec::default().with_label_format("~s").with_grid(light_grid()))?;

    let top_layout = top.calculate_layout(measurer, None)?;
    let left_layout = left.calculate_layout(measurer, None)?;
    top.update(&mut SkipAnimation);
    left.update(&mut SkipAnimation);

    Ok(html::HtmlSection {
        title: "Time and log axes",
        description: "A time axis on top with an explicit time format, and a base-10 log axis with SI labels.",
        svg: draw(plot, &[(&top, top_layout), (&left, left_layout)]),
    })
}

fn crowded_categories_demo(measurer: &dyn TextMeasurer) -> Result<html::HtmlSection, AxisError> {
    let plot = plot_rect();
    let names = [
        "Amsterdam", "Barcelona", "Copenhagen", "Dubrovnik", "Edinburgh", "Florence",
        "Gothenburg", "Helsinki", "Innsbruck", "Jerusalem", "Kraków", "Lisbon", "Marseille",
        "Naples", "Oslo", "Prague", "Quimper", "Reykjavík", "Stockholm", "Tallinn",
    ];

    let mut bottom = Axis::new("city", AxisOrient::Bottom, AxisKind::Category { padding: 0.2 });
    bottom.set_plot(plot);
    bottom.set_categories(names);

    let mut left = Axis::new("count", AxisOrient::Left, AxisKind::Number { nice: true });
    left.set_plot(plot);
    left.set_domain(0.0, 42.0);
    left.set_spec(AxisSpec::default().with_grid(light_grid()))?;

    let bottom_layout = bottom.calculate_layout(measurer, None)?;
    let left_layout = left.calculate_layout(measurer, None)?;
    bottom.update(&mut SkipAnimation);
    left.update(&mut SkipAnimation);

    Ok(html::HtmlSection {
        title: "Crowded categories",
        description: "Labels that do not fit side by side are rotated to the auto-rotate angle.",
        svg: draw(plot, &[(&bottom, bottom_layout), (&left, left_layout)]),
    })
}

fn wrapped_categories_demo(measurer: &dyn TextMeasurer) -> Result<html::HtmlSection, AxisError> {
    let plot = plot_rect();
    let names = [
        "Renewable electricity generation",
        "Residential heating and cooling",
        "Commercial road freight transport",
        "Industrial process emissions",
        "Agriculture and land use change",
    ];

    let mut bottom = Axis::new("sector", AxisOrient::Bottom, AxisKind::Category { padding: 0.1 });
    bottom.set_plot(plot);
    bottom.set_categories(names);
    bottom.set_spec(
        AxisSpec::default()
            .with_auto_wrap(WrapStrategy::OnSpace)
            .with_label_max_size(None, Some(48.0)),
    )?;

    let layout = bottom.calculate_layout(measurer, None)?;
    bottom.update(&mut SkipAnimation);

    Ok(html::HtmlSection {
        title: "Wrapped categories",
        description: "Long labels wrap onto several lines within the band width.",
        svg: draw(plot, &[(&bottom, layout)]),
    })
}

fn grouped_categories_demo(measurer: &dyn TextMeasurer) -> Result<html::HtmlSection, AxisError> {
    let plot = plot_rect();
    let paths: Vec<[&str; 3]> = ["2024", "2025"]
        .into_iter()
        .flat_map(|year| {
            [("H1", ["Q1", "Q2"]), ("H2", ["Q3", "Q4"])]
                .into_iter()
                .flat_map(move |(half, quarters)| quarters.map(|q| [year, half, q]))
        })
        .collect();

    let mut bottom = Axis::new("quarter", AxisOrient::Bottom, AxisKind::GroupedCategory);
    bottom.set_plot(plot);
    bottom.set_category_paths(&paths);
    bottom.set_spec(
        AxisSpec::default().with_label_style(TextStyle::default().with_weight(FontWeight::BOLD)),
    )?;
    bottom.add_cross_line(CrossLine::range("focus", 4.0, 5.0).with_label("focus"));

    let mut left = Axis::new("revenue", AxisOrient::Left, AxisKind::Number { nice: true });
    left.set_plot(plot);
    left.set_domain(0.0, 1.3);
    left.set_spec(AxisSpec::default().with_label_format(".0%").with_grid(light_grid()))?;
    left.add_cross_line(CrossLine::line("target", 1.0).with_label("target"));

    let bottom_layout = bottom.calculate_layout(measurer, None)?;
    let left_layout = left.calculate_layout(measurer, None)?;
    bottom.update(&mut SkipAnimation);
    left.update(&mut SkipAnimation);

    Ok(html::HtmlSection {
        title: "Grouped categories and cross-lines",
        description: "Quarter, half and year rows with separators, a highlighted range and a target line.",
        svg: draw(plot, &[(&bottom, bottom_layout), (&left, left_layout)]),
    })
}

fn zoom_demo(measurer: &dyn TextMeasurer) -> Result<html::HtmlSection, AxisError> {
    let plot = plot_rect();
    let mut animation = LoggingAnimation::default();

    let mut bottom = Axis::new("x", AxisOrient::Bottom, AxisKind::Number { nice: true });
    bottom.set_plot(plot);
    bottom.set_domain(0.0, 100.0);
    bottom.set_spec(AxisSpec::default().with_grid(light_grid()))?;
    bottom.calculate_layout(measurer, None)?;
    bottom.update(&mut animation);

    // Zoom into the middle half; ticks outside it are removed, finer ones are added.
    let spec = bottom.spec().clone().with_visible_range(0.25, 0.75);
    bottom.set_spec(spec)?;
    let layout = bottom.calculate_layout(measurer, None)?;
    let diff = bottom.update(&mut animation);
    tracing::info!(added = ?diff.added, removed = ?diff.removed, "zoomed");

    Ok(html::HtmlSection {
        title: "Zoom",
        description: "The same axis after zooming into the middle half of its range.",
        svg: draw(plot, &[(&bottom, layout)]),
    })
}
