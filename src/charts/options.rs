//! Chart Options Module
//! Declarative chart configurations for browser charting libraries.
//!
//! The bar charts and the state map are ECharts option documents; the gender
//! pie and the age distribution are Plotly figures. Builders are pure: they
//! only reshape aggregate tables.

use super::color::{gender_color, ColorScale, BAR_COLOR, D3_PALETTE, MAP_PALETTE, OVERALL_COLOR};
use crate::data::YearSelection;
use crate::stats::{mean_state_value, AgeDistribution, CategoryCount, CityCount, StateCount};
use serde::Serialize;
use serde_json::{json, Value};

/// Name the boundary map is registered under.
pub const MAP_NAME: &str = "USA";

/// Tooltip formatter for the map; groups thousands with commas.
pub const MAP_TOOLTIP_FORMATTER: &str = "function (params) {\
var value = (params.value + '').split('.');\
value = value[0].replace(/(\\d{1,3})(?=(?:\\d{3})+(?!\\d))/g, '$1,');\
return params.seriesName + '<br/>' + params.name + ': ' + value;}";

/// Horizontal bar chart options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarOptions {
    pub grid: GridOptions,
    pub legend: Toggle,
    pub tooltip: Value,
    pub x_axis: AxisOptions,
    pub y_axis: AxisOptions,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridOptions {
    pub left: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisOptions {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Vec<usize>,
    pub label: LabelOptions,
    pub item_style: ItemStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelOptions {
    pub show: bool,
    pub position: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    pub border_radius: u32,
    pub color: String,
}

fn bar_options(labels: Vec<String>, values: Vec<usize>, grid: GridOptions) -> BarOptions {
    BarOptions {
        grid,
        legend: Toggle { show: false },
        tooltip: json!({ "trigger": "axis", "axisPointer": { "type": "shadow" } }),
        // Reversed axes: values run along x, categories along y
        x_axis: AxisOptions {
            kind: "value",
            data: None,
        },
        y_axis: AxisOptions {
            kind: "category",
            data: Some(labels),
        },
        series: vec![BarSeries {
            name: "Deaths".to_string(),
            kind: "bar",
            data: values,
            label: LabelOptions {
                show: true,
                position: "right",
            },
            item_style: ItemStyle {
                border_radius: 5,
                color: BAR_COLOR.to_string(),
            },
        }],
    }
}

/// Race bar chart; `counts` should be in ascending order.
pub fn race_bar_options(counts: &[CategoryCount]) -> BarOptions {
    bar_options(
        counts.iter().map(|c| c.label.clone()).collect(),
        counts.iter().map(|c| c.count).collect(),
        GridOptions {
            left: "22%".to_string(),
            right: None,
        },
    )
}

/// Cities bar chart; `counts` should be in ascending order.
pub fn cities_bar_options(counts: &[CityCount]) -> BarOptions {
    bar_options(
        counts.iter().map(|c| c.city.clone()).collect(),
        counts.iter().map(|c| c.count).collect(),
        GridOptions {
            left: "15%".to_string(),
            right: Some("15%".to_string()),
        },
    )
}

/// Position override for a region drawn away from its true location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpecialArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

/// Regions re-positioned on the USA map.
pub const SPECIAL_AREAS: [(&str, SpecialArea); 1] = [(
    "Hawaii",
    SpecialArea {
        left: -110.0,
        top: 25.0,
        width: 5.0,
    },
)];

/// State map options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub title: Value,
    pub tooltip: Value,
    pub visual_map: VisualMap,
    pub toolbox: Value,
    pub series: Vec<MapSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualMap {
    pub left: &'static str,
    pub min: i64,
    pub max: i64,
    pub in_range: InRange,
    pub text: [&'static str; 2],
    pub calculable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InRange {
    pub color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub roam: bool,
    pub map: &'static str,
    pub emphasis: Value,
    pub text_fixed: Value,
    pub data: Vec<StateCount>,
}

impl MapOptions {
    /// The color scale the visual map describes.
    pub fn color_scale(&self) -> ColorScale {
        ColorScale::map_scale(self.visual_map.max as f64)
    }
}

/// Upper bound of the map's color range: the integer part of the mean
/// state count.
pub fn map_scale_max(counts: &[StateCount]) -> i64 {
    mean_state_value(counts).trunc() as i64
}

/// State map options for the USA boundary map.
pub fn state_map_options(counts: &[StateCount]) -> MapOptions {
    MapOptions {
        title: json!({
            "subtext": "Color scale based on average national deaths.",
            "left": "right",
        }),
        tooltip: json!({
            "trigger": "item",
            "showDelay": 0,
            "transitionDuration": 0.2,
            "formatter": MAP_TOOLTIP_FORMATTER,
        }),
        visual_map: VisualMap {
            left: "right",
            min: 0,
            max: map_scale_max(counts),
            in_range: InRange {
                color: MAP_PALETTE.iter().map(|c| c.to_string()).collect(),
            },
            text: ["High", "Low"],
            calculable: true,
        },
        toolbox: json!({
            "show": true,
            "left": "left",
            "top": "top",
            "feature": {
                "dataView": { "readOnly": false },
                "restore": {},
                "saveAsImage": {},
            },
        }),
        series: vec![MapSeries {
            name: "<b>Deaths</b>".to_string(),
            kind: "map",
            roam: true,
            map: MAP_NAME,
            emphasis: json!({ "label": { "show": true } }),
            text_fixed: json!({ "Alaska": [20, -20] }),
            data: counts.to_vec(),
        }],
    }
}

fn transparent_layout(title: String) -> Value {
    json!({
        "title": { "text": title, "font": { "size": 17 }, "x": 0.5 },
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
    })
}

/// Gender pie figure.
pub fn gender_pie_figure(counts: &[CategoryCount], year: YearSelection) -> Value {
    let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
    let values: Vec<usize> = counts.iter().map(|c| c.count).collect();

    json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
            "hovertemplate": "<extra></extra><br><b>%{label}</b><br>Shootings: %{value}",
            "marker": { "colors": D3_PALETTE },
        }],
        "layout": transparent_layout(format!(
            "<b>Fatal Force Gender Disparity {}</b><br><sub>Percentage of victims by their gender</sub></br>",
            year
        )),
    })
}

/// Age distribution figure: gender curve, all-victims curve and dashed
/// markers at the chosen statistic.
pub fn age_distribution_figure(dist: &AgeDistribution) -> Value {
    let color = gender_color(&dist.gender);

    let mut layout = transparent_layout(format!(
        "<b>Distribution of {} Victims</b><br><sub>Vertical lines represent the {} of their ages</sub></br>",
        dist.gender,
        dist.statistic.label().to_lowercase()
    ));
    layout["xaxis"] = json!({ "title": "Age" });
    layout["yaxis"] = json!({ "title": "Percentages" });
    layout["hovermode"] = json!("x unified");

    let vline = |x: f64, color: &str| {
        json!({
            "type": "line",
            "xref": "x",
            "yref": "paper",
            "x0": x,
            "x1": x,
            "y0": 0,
            "y1": 1,
            "line": { "color": color, "dash": "dash" },
        })
    };
    let shapes: Vec<Value> = [
        dist.overall_marker.map(|x| vline(x, OVERALL_COLOR)),
        dist.gender_marker.map(|x| vline(x, color)),
    ]
    .into_iter()
    .flatten()
    .collect();
    layout["shapes"] = Value::Array(shapes);

    json!({
        "data": [
            {
                "type": "scatter",
                "mode": "lines",
                "name": dist.gender,
                "x": dist.gender_curve.x,
                "y": dist.gender_curve.y,
                "line": { "color": color },
            },
            {
                "type": "scatter",
                "mode": "lines",
                "name": "All Victims",
                "x": dist.overall_curve.x,
                "y": dist.overall_curve.y,
                "line": { "color": OVERALL_COLOR },
            },
        ],
        "layout": layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{AgeStatistic, DensityCurve};

    fn state(name: &str, value: usize) -> StateCount {
        StateCount {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn race_bar_keeps_ascending_rows() {
        let counts = vec![
            CategoryCount {
                label: "Asian".into(),
                count: 2,
            },
            CategoryCount {
                label: "White".into(),
                count: 9,
            },
        ];
        let opts = race_bar_options(&counts);
        assert_eq!(opts.y_axis.data, Some(vec!["Asian".into(), "White".into()]));
        assert_eq!(opts.series[0].data, vec![2, 9]);
        assert_eq!(opts.grid.left, "22%");

        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["yAxis"]["type"], "category");
        assert_eq!(value["series"][0]["itemStyle"]["borderRadius"], 5);
        assert_eq!(value["series"][0]["label"]["position"], "right");
        assert_eq!(value["legend"]["show"], false);
        assert!(value["grid"].get("right").is_none());
    }

    #[test]
    fn cities_bar_uses_city_labels_and_both_margins() {
        let counts = vec![CityCount {
            city: "Houston".into(),
            state: "Texas".into(),
            count: 3,
        }];
        let value = serde_json::to_value(cities_bar_options(&counts)).unwrap();
        assert_eq!(value["yAxis"]["data"][0], "Houston");
        assert_eq!(value["grid"]["left"], "15%");
        assert_eq!(value["grid"]["right"], "15%");
    }

    #[test]
    fn map_max_is_truncated_mean() {
        let counts = vec![state("Texas", 10), state("Ohio", 5), state("Utah", 2)];
        let opts = state_map_options(&counts);
        assert_eq!(opts.visual_map.max, 5);
        assert_eq!(opts.visual_map.min, 0);
        assert_eq!(opts.visual_map.in_range.color.len(), 11);

        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["visualMap"]["text"][0], "High");
        assert_eq!(value["series"][0]["data"][0]["name"], "Texas");
        assert_eq!(value["series"][0]["data"][0]["value"], 10);
        assert_eq!(value["series"][0]["map"], "USA");
        assert_eq!(value["series"][0]["textFixed"]["Alaska"][0], 20);
    }

    #[test]
    fn empty_map_has_zero_range() {
        assert_eq!(state_map_options(&[]).visual_map.max, 0);
    }

    #[test]
    fn special_areas_include_hawaii() {
        let (name, area) = SPECIAL_AREAS[0];
        assert_eq!(name, "Hawaii");
        assert_eq!(area.left, -110.0);
        assert_eq!(area.width, 5.0);
    }

    #[test]
    fn pie_title_names_the_year() {
        let counts = vec![CategoryCount {
            label: "Male".into(),
            count: 5,
        }];
        let fig = gender_pie_figure(&counts, YearSelection::Year(2017));
        assert_eq!(fig["data"][0]["labels"][0], "Male");
        assert_eq!(fig["data"][0]["values"][0], 5);
        let title = fig["layout"]["title"]["text"].as_str().unwrap();
        assert!(title.contains("Gender Disparity 2017"));
    }

    #[test]
    fn distribution_figure_has_two_curves_and_markers() {
        let dist = AgeDistribution {
            gender: "Female".into(),
            statistic: AgeStatistic::Mode,
            gender_curve: DensityCurve {
                x: vec![1.0, 2.0],
                y: vec![0.1, 0.2],
            },
            overall_curve: DensityCurve::default(),
            gender_marker: Some(30.0),
            overall_marker: None,
            gender_count: 2,
            overall_count: 0,
        };
        let fig = age_distribution_figure(&dist);
        assert_eq!(fig["data"].as_array().unwrap().len(), 2);
        assert_eq!(fig["data"][0]["line"]["color"], "#ff7f0e");
        assert_eq!(fig["layout"]["shapes"].as_array().unwrap().len(), 1);
        assert_eq!(fig["layout"]["shapes"][0]["x0"], 30.0);
        let title = fig["layout"]["title"]["text"].as_str().unwrap();
        assert!(title.contains("the mode of their ages"));
    }
}
