// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of axis records for `axle_demo`.

use axle::{
    AxisRecords, CrossLineNode, CrossLineShape, StrokeStyle, TextAlign, TextBaseline,
};
use axle_text::TextStyle;
use kurbo::{Affine, Point, Rect};
use peniko::Brush;

#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    elements: Vec<(i32, String)>,
    view_box: Option<Rect>,
}

impl SvgScene {
    /// Grows the view box to contain `rect`.
    pub(crate) fn include(&mut self, rect: Rect) {
        self.view_box = Some(self.view_box.map_or(rect, |v| v.union(rect)));
    }

    pub(crate) fn add_rect(&mut self, z_index: i32, rect: Rect, fill: &Brush) {
        let mut out = format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        );
        write_paint_attr(&mut out, "fill", fill);
        out.push_str("/>");
        self.elements.push((z_index, out));
        self.include(rect);
    }

    pub(crate) fn add_axis(&mut self, records: &AxisRecords) {
        let group = Group(records.transform);
        if let Some(line) = &records.line {
            self.push(line.z_index, group.wrap(&stroke_line(line.p0, line.p1, &line.stroke)));
        }
        for tick in records.ticks.iter().filter(|t| t.visible) {
            let (p0, p1) = (Point::new(tick.x0, tick.offset), Point::new(tick.x1, tick.offset));
            self.push(tick.z_index, group.wrap(&stroke_line(p0, p1, &tick.stroke)));
        }
        for grid in &records.grid {
            let (p0, p1) = (Point::new(grid.x0, grid.offset), Point::new(grid.x1, grid.offset));
            self.push(grid.z_index, group.wrap(&stroke_line(p0, p1, &grid.stroke)));
        }
        for label in records.labels.iter().filter(|l| l.visible) {
            let text = Text {
                text: &label.text,
                point: label.point,
                rotation: label.rotation,
                align: label.text_align,
                baseline: label.text_baseline,
                style: &label.style,
                fill: &label.fill,
                opacity: label.opacity,
            };
            self.push(label.z_index, group.wrap(&text.to_svg()));
        }
        if let Some(title) = &records.title {
            let text = Text {
                text: &title.text,
                point: title.point,
                rotation: title.rotation,
                align: TextAlign::Center,
                baseline: title.text_baseline,
                style: &title.style,
                fill: &title.fill,
                opacity: 1.0,
            };
            self.push(title.z_index, group.wrap(&text.to_svg()));
        }
        for label in &records.group_labels {
            let text = Text {
                text: &label.text,
                point: label.point,
                rotation: label.rotation,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
                style: &label.style,
                fill: &label.fill,
                opacity: 1.0,
            };
            self.push(label.z_index, group.wrap(&text.to_svg()));
        }
        for sep in &records.separators {
            self.push(sep.z_index, group.wrap(&stroke_line(sep.p0, sep.p1, &sep.stroke)));
        }
        for cross_line in records.cross_lines.iter().filter(|c| c.visible) {
            self.add_cross_line(group, cross_line);
        }
    }

    fn add_cross_line(&mut self, group: Group, node: &CrossLineNode) {
        match node.shape {
            CrossLineShape::Line { offset } => {
                if let Some(stroke) = &node.stroke {
                    let (p0, p1) = (Point::new(node.x0, offset), Point::new(node.x1, offset));
                    self.push(node.z_index, group.wrap(&stroke_line(p0, p1, stroke)));
                }
            }
            CrossLineShape::Range { start, end } => {
                let rect = Rect::new(node.x0, start, node.x1, end).abs();
                let mut out = format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                    rect.x0,
                    rect.y0,
                    rect.width(),
                    rect.height()
                );
                match &node.fill {
                    Some(fill) => write_paint_attr(&mut out, "fill", fill),
                    None => out.push_str(r#" fill="none""#),
                }
                if let Some(stroke) = &node.stroke {
                    write_stroke_attrs(&mut out, stroke);
                }
                out.push_str("/>");
                self.push(node.z_index, group.wrap(&out));
            }
        }
        if let Some(label) = &node.label {
            let text = Text {
                text: &label.text,
                point: label.point,
                rotation: label.rotation,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
                style: &label.style,
                fill: &Brush::Solid(peniko::color::palette::css::DIM_GRAY),
                opacity: 1.0,
            };
            self.push(label.z_index, group.wrap(&text.to_svg()));
        }
    }

    fn push(&mut self, z_index: i32, element: String) {
        self.elements.push((z_index, element));
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let view_box = self
            .view_box
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0))
            .inflate(10.0, 10.0);
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="xMinYMin meet">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        ));
        out.push('\n');

        let mut elements: Vec<_> = self.elements.iter().collect();
        elements.sort_by_key(|(z, _)| *z);
        for (_, element) in elements {
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

/// Places axis-local elements in the chart.
#[derive(Clone, Copy, Debug)]
struct Group(Affine);

impl Group {
    fn wrap(self, element: &str) -> String {
        let [a, b, c, d, e, f] = self.0.as_coeffs();
        format!(r#"<g transform="matrix({a} {b} {c} {d} {e} {f})">{element}</g>"#)
    }
}

/// A text element in the axis-local frame.
struct Text<'a> {
    text: &'a str,
    point: Point,
    rotation: f64,
    align: TextAlign,
    baseline: TextBaseline,
    style: &'a TextStyle,
    fill: &'a Brush,
    opacity: f64,
}

impl Text<'_> {
    fn to_svg(&self) -> String {
        let Point { x, y } = self.point;
        let lines: Vec<&str> = self.text.split('\n').collect();
        let line_height = self.style.font_size;
        // Multi-line text starts above the anchor so the block keeps its baseline.
        let block = line_height * (lines.len() - 1) as f64;
        let (baseline, first_dy) = match self.baseline {
            TextBaseline::Top => ("hanging", 0.0),
            TextBaseline::Middle => ("middle", -block / 2.0),
            TextBaseline::Bottom => ("text-after-edge", -block),
        };
        let anchor = match self.align {
            TextAlign::Start => "start",
            TextAlign::Center => "middle",
            TextAlign::End => "end",
        };
        let mut out = format!(
            r#"<text x="{x}" y="{y}" font-size="{}" font-family="{}" font-weight="{}" dominant-baseline="{baseline}" text-anchor="{anchor}""#,
            self.style.font_size,
            self.style.font_family.as_css_family(),
            self.style.font_weight.0,
        );
        if self.rotation != 0.0 {
            out.push_str(&format!(
                r#" transform="rotate({} {x} {y})""#,
                self.rotation.to_degrees()
            ));
        }
        if self.opacity < 1.0 {
            out.push_str(&format!(r#" opacity="{}""#, self.opacity));
        }
        write_paint_attr(&mut out, "fill", self.fill);
        out.push('>');
        if let [line] = lines.as_slice() {
            out.push_str(&escape_xml(line));
        } else {
            for (i, line) in lines.iter().enumerate() {
                let dy = if i == 0 { first_dy } else { line_height };
                out.push_str(&format!(
                    r#"<tspan x="{x}" dy="{dy}">{}</tspan>"#,
                    escape_xml(line)
                ));
            }
        }
        out.push_str("</text>");
        out
    }
}

fn stroke_line(p0: Point, p1: Point, stroke: &StrokeStyle) -> String {
    let mut out = format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
        p0.x, p0.y, p1.x, p1.y
    );
    write_stroke_attrs(&mut out, stroke);
    out.push_str("/>");
    out
}

fn write_stroke_attrs(out: &mut String, stroke: &StrokeStyle) {
    write_paint_attr(out, "stroke", &stroke.brush);
    out.push_str(&format!(r#" stroke-width="{}""#, stroke.stroke_width));
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
