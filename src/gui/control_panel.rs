//! Control Panel Widget
//! Left side panel with the data source, the year and state selectors and
//! the status line.

use crate::data::{SelectionError, StateSelection, YearSelection, ALL_STATES, ALL_YEARS};
use crate::stats::AgeStatistic;
use egui::{Color32, ComboBox, RichText, ScrollArea};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const OK_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

/// Left side control panel.
pub struct ControlPanel {
    pub source: String,
    pub years: Vec<i64>,
    pub states: Vec<String>,
    pub year: YearSelection,
    /// Multiselect choices in list order; may hold the `All states` sentinel.
    pub state_choices: Vec<String>,
    pub age_statistic: AgeStatistic,
    pub status: String,
    pub selection_error: Option<String>,
    pub busy: bool,
}

impl ControlPanel {
    pub fn new(age_statistic: AgeStatistic) -> Self {
        Self {
            source: "No data loaded".to_string(),
            years: Vec::new(),
            states: Vec::new(),
            year: YearSelection::All,
            state_choices: vec![ALL_STATES.to_string()],
            age_statistic,
            status: "Ready".to_string(),
            selection_error: None,
            busy: false,
        }
    }

    /// Replace the selector options after a load. Resets the selection.
    pub fn set_options(&mut self, source: String, years: Vec<i64>, states: Vec<String>) {
        self.source = source;
        self.years = years;
        self.states = states;
        self.year = YearSelection::All;
        self.state_choices = vec![ALL_STATES.to_string()];
        self.selection_error = None;
    }

    /// Current selectors.
    pub fn selection(&self) -> Result<(YearSelection, StateSelection), SelectionError> {
        Ok((self.year, StateSelection::from_choices(&self.state_choices)?))
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn set_selection_error(&mut self, error: Option<String>) {
        self.selection_error = error;
    }

    fn is_chosen(&self, name: &str) -> bool {
        self.state_choices.iter().any(|c| c == name)
    }

    /// Toggle one multiselect entry, keeping list order.
    pub fn toggle_state(&mut self, name: &str) {
        if self.is_chosen(name) {
            self.state_choices.retain(|c| c != name);
            return;
        }
        let order = |c: &str| {
            if c == ALL_STATES {
                0
            } else {
                self.states.iter().position(|s| s == c).map_or(usize::MAX, |i| i + 1)
            }
        };
        let rank = order(name);
        let at = self
            .state_choices
            .iter()
            .position(|c| order(c) > rank)
            .unwrap_or(self.state_choices.len());
        self.state_choices.insert(at, name.to_string());
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("U.S. Fatal Force")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Data Selection").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.source).size(11.0).color(Color32::GRAY));
                ui.add_space(4.0);
                ui.add_enabled_ui(!self.busy, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("📂 Open CSV").clicked() {
                            action = ControlPanelAction::OpenCsv;
                        }
                        if ui.button("⟳ Reload").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Section =====
        ui.label(RichText::new("Choose a year to view").size(14.0).strong());
        ui.add_space(5.0);

        let mut year = self.year;
        ComboBox::from_id_salt("year")
            .width(200.0)
            .selected_text(year.to_string())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut year, YearSelection::All, ALL_YEARS);
                for y in &self.years {
                    ui.selectable_value(&mut year, YearSelection::Year(*y), y.to_string());
                }
            });
        if year != self.year {
            self.year = year;
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(15.0);

        // ===== State Section =====
        ui.label(RichText::new("Choose a state").size(14.0).strong());
        ui.add_space(5.0);

        let mut toggled: Option<String> = None;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                    let names = std::iter::once(ALL_STATES).chain(self.states.iter().map(String::as_str));
                    for name in names {
                        let mut checked = self.is_chosen(name);
                        if ui.checkbox(&mut checked, name).changed() {
                            toggled = Some(name.to_string());
                        }
                    }
                });
            });
        if let Some(name) = toggled {
            self.toggle_state(&name);
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button(ALL_STATES).clicked() {
                self.state_choices = vec![ALL_STATES.to_string()];
                action = ControlPanelAction::SelectionChanged;
            }
            if ui.small_button("Clear").clicked() {
                self.state_choices.clear();
                action = ControlPanelAction::SelectionChanged;
            }
        });

        if let Some(error) = &self.selection_error {
            ui.add_space(5.0);
            ui.label(RichText::new(error).color(ERROR_COLOR));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Age Marker Section =====
        ui.label(RichText::new("Age marker").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            for statistic in AgeStatistic::ALL {
                if ui
                    .radio_value(&mut self.age_statistic, statistic, statistic.label())
                    .changed()
                {
                    action = ControlPanelAction::SelectionChanged;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!self.busy && !self.years.is_empty(), |ui| {
                let button = egui::Button::new(RichText::new("📄 Export charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Export;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        if self.busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));
            });
        } else {
            let status_color = if self.status.starts_with("Error") {
                ERROR_COLOR
            } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
                OK_COLOR
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenCsv,
    Reload,
    SelectionChanged,
    Export,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ControlPanel {
        let mut panel = ControlPanel::new(AgeStatistic::Mean);
        panel.set_options(
            "test".into(),
            vec![2015, 2016],
            vec!["California".into(), "Ohio".into(), "Texas".into()],
        );
        panel
    }

    #[test]
    fn starts_with_everything_selected() {
        let panel = panel();
        assert_eq!(
            panel.selection().unwrap(),
            (YearSelection::All, StateSelection::All)
        );
    }

    #[test]
    fn toggling_keeps_list_order() {
        let mut panel = panel();
        panel.toggle_state(ALL_STATES);
        panel.toggle_state("Texas");
        panel.toggle_state("California");
        assert_eq!(panel.state_choices, vec!["California", "Texas"]);
        assert_eq!(
            panel.selection().unwrap().1,
            StateSelection::States(vec!["California".into(), "Texas".into()])
        );
    }

    #[test]
    fn cleared_selection_is_invalid() {
        let mut panel = panel();
        panel.toggle_state(ALL_STATES);
        let err = panel.selection().unwrap_err();
        assert_eq!(err.to_string(), "Please select a valid state.");
    }
}
