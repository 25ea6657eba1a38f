//! Static Chart Renderer
//! Renders the bar charts and age distributions to PNG with plotters.
//!
//! Layout of a bar chart:
//! 1. Title centered at the top
//! 2. Categories on the y axis, first row at the bottom
//! 3. Bars with their count printed to the right

use super::color::{gender_color, Rgb, BAR_COLOR, OVERALL_COLOR};
use crate::stats::AgeDistribution;
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Pixel buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb_color(hex: &str) -> RGBColor {
    let Rgb(r, g, b) = Rgb::from_hex(hex).unwrap_or(Rgb(0, 0, 0));
    RGBColor(r, g, b)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a horizontal bar chart. Rows are drawn bottom-up, so pass them
    /// in ascending order to get the largest bar on top.
    pub fn render_bar_chart_png(
        title: &str,
        labels: &[String],
        values: &[usize],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        Self::draw_bar_chart(&mut buffer, title, labels, values, width, height)?;
        Self::encode_png(buffer, width, height)
    }

    /// Render an age distribution: both density curves plus vertical markers.
    pub fn render_distribution_png(
        dist: &AgeDistribution,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        Self::draw_distribution(&mut buffer, dist, width, height)?;
        Self::encode_png(buffer, width, height)
    }

    fn draw_bar_chart(
        buffer: &mut [u8],
        title: &str,
        labels: &[String],
        values: &[usize],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let n = values.len().max(1) as i32;
        let max = values.iter().copied().max().unwrap_or(0).max(1) as f64;
        let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(4) as u32;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size((longest * 8).clamp(40, 220))
            .build_cartesian_2d(0f64..max * 1.15, (0..n).into_segmented())
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n as usize)
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc("Deaths")
            .axis_desc_style(("sans-serif", 14))
            .draw()
            .map_err(draw_err)?;

        let fill = rgb_color(BAR_COLOR);
        chart
            .draw_series(values.iter().enumerate().map(|(i, &v)| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(i)),
                        (v as f64, SegmentValue::Exact(i + 1)),
                    ],
                    fill.filled(),
                );
                bar.set_margin(6, 6, 0, 0);
                bar
            }))
            .map_err(draw_err)?;

        // Count labels to the right of each bar
        chart
            .draw_series(values.iter().enumerate().map(|(i, &v)| {
                Text::new(
                    v.to_string(),
                    (v as f64 + max * 0.01, SegmentValue::CenterOf(i as i32)),
                    ("sans-serif", 14).into_font(),
                )
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_distribution(
        buffer: &mut [u8],
        dist: &AgeDistribution,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let curves = [&dist.gender_curve, &dist.overall_curve];
        let x_min = curves
            .iter()
            .flat_map(|c| c.x.iter().copied())
            .fold(f64::INFINITY, f64::min);
        let x_max = curves
            .iter()
            .flat_map(|c| c.x.iter().copied())
            .fold(f64::NEG_INFINITY, f64::max);
        let y_max = curves
            .iter()
            .flat_map(|c| c.y.iter().copied())
            .fold(0.0, f64::max);
        let (x_min, x_max) = if x_min.is_finite() && x_max > x_min {
            (x_min, x_max)
        } else {
            (0.0, 100.0)
        };
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        let title = format!("Distribution of {} Victims", dist.gender);
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Age")
            .y_desc("Percentages")
            .axis_desc_style(("sans-serif", 14))
            .draw()
            .map_err(draw_err)?;

        let gender = rgb_color(gender_color(&dist.gender));
        let overall = rgb_color(OVERALL_COLOR);

        chart
            .draw_series(LineSeries::new(
                dist.gender_curve.points().map(|[x, y]| (x, y)),
                gender.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label(dist.gender.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], gender.stroke_width(2))
            });

        chart
            .draw_series(LineSeries::new(
                dist.overall_curve.points().map(|[x, y]| (x, y)),
                overall.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label("All Victims")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], overall.stroke_width(2))
            });

        let markers = [
            (dist.overall_marker, overall),
            (dist.gender_marker, gender),
        ];
        for (marker, color) in markers {
            if let Some(x) = marker {
                chart
                    .draw_series(LineSeries::new(
                        vec![(x, 0.0), (x, y_max)],
                        color.stroke_width(1),
                    ))
                    .map_err(draw_err)?;
            }
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}
