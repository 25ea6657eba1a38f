//! Chart Plotter Module
//! Draws the dashboard views with egui_plot and the egui painter.

use super::color::{gender_color, Rgb, BAR_COLOR, OVERALL_COLOR};
use super::geo::BoundaryMap;
use super::options::MapOptions;
use crate::stats::{AgeDistribution, CategoryCount};
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Polygon, Text,
    VLine,
};
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Fill for regions without incidents.
pub const NO_DATA_COLOR: Color32 = Color32::from_gray(225);

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

pub fn hex_color(hex: &str) -> Color32 {
    Rgb::from_hex(hex).map(to_color32).unwrap_or(Color32::GRAY)
}

/// Draws dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal bar chart; the first row is drawn at the bottom.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        labels: &[String],
        values: &[usize],
        height: f32,
    ) {
        if values.is_empty() {
            ui.label(RichText::new("No incidents for this selection").italics());
            return;
        }

        let fill = hex_color(BAR_COLOR);
        let max = values.iter().copied().max().unwrap_or(1) as f64;
        let n = values.len();

        let bars: Vec<Bar> = values
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (&v, label))| Bar::new(i as f64, v as f64).name(label).fill(fill))
            .collect();

        let axis_labels = labels.to_vec();

        Plot::new(id)
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_grid([true, false])
            .include_x(0.0)
            .include_x(max * 1.15)
            .y_grid_spacer(move |_input| {
                (0..n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    axis_labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.6).name("Deaths"));

                // Count labels to the right of each bar
                for (i, &v) in values.iter().enumerate() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(v as f64 + max * 0.01, i as f64),
                            RichText::new(v.to_string()).size(11.0),
                        )
                        .anchor(egui::Align2::LEFT_CENTER),
                    );
                }
            });
    }

    /// Choropleth of incidents per state.
    pub fn draw_state_map(
        ui: &mut egui::Ui,
        boundaries: &BoundaryMap,
        options: &MapOptions,
        height: f32,
    ) {
        let values: HashMap<&str, usize> = options.series[0]
            .data
            .iter()
            .map(|d| (d.name.as_str(), d.value))
            .collect();
        let scale = options.color_scale();
        let border = Stroke::new(0.6, Color32::from_gray(90));

        Plot::new("state_map")
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for region in &boundaries.regions {
                    let value = values.get(region.name.as_str()).copied();
                    let fill = match value {
                        Some(v) if v > 0 => to_color32(scale.color_for(v as f64)),
                        _ => NO_DATA_COLOR,
                    };
                    let name = format!("{}: {}", region.name, value.unwrap_or(0));
                    for ring in &region.rings {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(ring.clone()))
                                .fill_color(fill)
                                .stroke(border)
                                .name(&name),
                        );
                    }
                }
            });

        Self::draw_color_legend(ui, options);
    }

    /// Horizontal gradient strip labelled Low..High.
    fn draw_color_legend(ui: &mut egui::Ui, options: &MapOptions) {
        let scale = options.color_scale();
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Low ({})", scale.min)).size(11.0));
            let (rect, _) = ui.allocate_exact_size(egui::vec2(160.0, 12.0), egui::Sense::hover());
            let steps = 32;
            let step_w = rect.width() / steps as f32;
            for i in 0..steps {
                let t = i as f64 / (steps - 1) as f64;
                let color = to_color32(scale.color_for(scale.min + t * (scale.max - scale.min)));
                let x = rect.left() + i as f32 * step_w;
                let cell = egui::Rect::from_min_size(
                    egui::pos2(x, rect.top()),
                    egui::vec2(step_w + 0.5, rect.height()),
                );
                ui.painter().rect_filled(cell, 0.0, color);
            }
            ui.label(RichText::new(format!("High ({}+)", scale.max)).size(11.0));
        });
    }

    /// Pie of Male/Female counts with a legend of shares.
    pub fn draw_gender_pie(ui: &mut egui::Ui, counts: &[CategoryCount], diameter: f32) {
        let total: usize = counts.iter().map(|c| c.count).sum();
        if total == 0 {
            ui.label(RichText::new("No incidents for this selection").italics());
            return;
        }

        let (rect, _) = ui.allocate_exact_size(egui::vec2(diameter, diameter), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = diameter / 2.0 - 4.0;
        let background = ui.visuals().panel_fill;

        let mut start = -TAU / 4.0;
        for c in counts {
            let share = c.count as f32 / total as f32;
            let sweep = share * TAU;
            let color = hex_color(gender_color(&c.label));

            // Fan of thin triangles; each stays convex
            let segments = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
            for s in 0..segments {
                let a0 = start + sweep * s as f32 / segments as f32;
                let a1 = start + sweep * (s + 1) as f32 / segments as f32;
                let p0 = center + radius * egui::vec2(a0.cos(), a0.sin());
                let p1 = center + radius * egui::vec2(a1.cos(), a1.sin());
                painter.add(egui::Shape::convex_polygon(
                    vec![center, p0, p1],
                    color,
                    Stroke::NONE,
                ));
            }

            let mid = start + sweep / 2.0;
            let label_pos = center + radius * 0.6 * egui::vec2(mid.cos(), mid.sin());
            painter.text(
                label_pos,
                egui::Align2::CENTER_CENTER,
                format!("{:.1}%", share * 100.0),
                egui::FontId::proportional(13.0),
                Color32::WHITE,
            );
            start += sweep;
        }
        painter.circle_stroke(center, radius, Stroke::new(1.0, background));

        ui.horizontal(|ui| {
            for c in counts {
                let (swatch, _) =
                    ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter()
                    .rect_filled(swatch, 2.0, hex_color(gender_color(&c.label)));
                ui.label(RichText::new(format!("{} ({})", c.label, c.count)).size(12.0));
                ui.add_space(8.0);
            }
        });
    }

    /// Density of one gender's ages against all victims, with dashed
    /// markers at the chosen statistic.
    pub fn draw_age_distribution(ui: &mut egui::Ui, dist: &AgeDistribution, height: f32) {
        let gender = hex_color(gender_color(&dist.gender));
        let overall = hex_color(OVERALL_COLOR);

        Plot::new(format!("age_distribution_{}", dist.gender))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Age")
            .y_axis_label("Percentages")
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(dist.gender_curve.points()))
                        .color(gender)
                        .width(2.0)
                        .name(&dist.gender),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(dist.overall_curve.points()))
                        .color(overall)
                        .width(2.0)
                        .name("All Victims"),
                );

                let label = dist.statistic.label();
                if let Some(x) = dist.overall_marker {
                    plot_ui.vline(
                        VLine::new(x)
                            .color(overall)
                            .style(LineStyle::dashed_loose())
                            .name(format!("All Victims {}: {:.1}", label, x)),
                    );
                }
                if let Some(x) = dist.gender_marker {
                    plot_ui.vline(
                        VLine::new(x)
                            .color(gender)
                            .style(LineStyle::dashed_loose())
                            .name(format!("{} {}: {:.1}", dist.gender, label, x)),
                    );
                }
            });
    }

    /// Striped table with a header row.
    pub fn draw_table(ui: &mut egui::Ui, id: &str, headers: &[&str], rows: &[Vec<String>]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in headers {
                            ui.label(RichText::new(*header).strong().size(11.0));
                        }
                        ui.end_row();

                        for row in rows {
                            for cell in row {
                                ui.label(RichText::new(cell).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_convert() {
        assert_eq!(hex_color("#1f77b4"), Color32::from_rgb(0x1f, 0x77, 0xb4));
        assert_eq!(hex_color("bogus"), Color32::GRAY);
    }
}
