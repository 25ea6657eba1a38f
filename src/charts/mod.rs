//! Charts module - Chart option builders and rendering

pub mod color;
pub mod geo;
pub mod options;
mod plotter;
mod renderer;

pub use color::{ColorScale, Rgb};
pub use geo::{BoundaryMap, GeoError, Region};
pub use options::{
    age_distribution_figure, cities_bar_options, gender_pie_figure, race_bar_options,
    state_map_options, BarOptions, MapOptions, SpecialArea, MAP_NAME, SPECIAL_AREAS,
};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
