//! Desktop front-end: entry form, history list and progress chart.

use eframe::{App, Frame, NativeOptions, egui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};
use rfd::FileDialog;
use std::io;
use std::path::{Path, PathBuf};

use workout_tracker::colors::PR_COLOR;
use workout_tracker::export::{
    EXPORT_FILE_NAME, load_records_json, save_records_csv, save_records_json,
};
use workout_tracker::plotting::{chart_points, date_from_x, pr_points};
use workout_tracker::{
    Color, FileStore, KeyValueStore, MemoryStore, RecordId, Settings, StoreError, Tracker,
    TrackerError, TrackerView, WeightUnit, WorkoutForm,
};

/// Where workouts are kept for this run.
enum Storage {
    File(FileStore),
    /// Used when the saved file cannot be read; nothing survives a restart.
    Memory(MemoryStore),
}

impl KeyValueStore for Storage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match self {
            Storage::File(s) => s.load(key),
            Storage::Memory(s) => s.load(key),
        }
    }

    fn save(&mut self, key: &str, text: &str) -> io::Result<()> {
        match self {
            Storage::File(s) => s.save(key, text),
            Storage::Memory(s) => s.save(key, text),
        }
    }
}

enum RowAction {
    Edit(RecordId),
    Delete(RecordId),
}

fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

struct TrackerApp {
    tracker: Tracker<Storage>,
    settings: Settings,
    settings_dirty: bool,
    form: WorkoutForm,
    editing: Option<RecordId>,
    view: TrackerView,
    status: Option<String>,
}

impl TrackerApp {
    fn new() -> Result<Self, StoreError> {
        let mut settings = Settings::load();
        let dir = settings.data_dir().unwrap_or_else(|| PathBuf::from("."));
        let mut status = None;
        let mut tracker = match Tracker::open(Storage::File(FileStore::new(&dir))) {
            Ok(t) => t,
            Err(e) => {
                log::error!("Failed to open workouts in {}: {e}", dir.display());
                status = Some(format!("{e}. Changes will not be saved."));
                Tracker::open(Storage::Memory(MemoryStore::new()))?
            }
        };
        tracker.set_filter(settings.active_filter.clone());
        let settings_dirty = tracker.filter() != settings.active_filter.as_deref();
        if settings_dirty {
            log::info!("Dropping saved filter for an exercise with no workouts");
            settings.active_filter = None;
        }
        let view = tracker.view();
        Ok(Self {
            tracker,
            settings,
            settings_dirty,
            form: WorkoutForm::default(),
            editing: None,
            view,
            status,
        })
    }

    fn refresh(&mut self) {
        self.view = self.tracker.view();
        let filter = self.tracker.filter().map(str::to_string);
        if filter != self.settings.active_filter {
            self.settings.active_filter = filter;
            self.settings_dirty = true;
        }
    }

    fn report(&mut self, context: &str, err: impl std::fmt::Display) {
        log::error!("{context}: {err}");
        self.status = Some(format!("{context}: {err}"));
    }

    fn submit(&mut self) {
        let input = match self.form.validate() {
            Ok(input) => input,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };
        let result = match self.editing {
            Some(id) => self.tracker.edit_workout(id, &input),
            None => self.tracker.log_workout(&input).map(|(_, r)| r),
        };
        match result {
            Ok(rec) => {
                self.status = Some(if rec.is_pr {
                    format!("New PR! {} @ {}", rec.exercise, rec.weight)
                } else {
                    format!("Saved {}", rec.exercise)
                });
                self.form.clear();
                self.editing = None;
                self.refresh();
            }
            Err(e) => self.report("Failed to save workout", e),
        }
    }

    fn apply(&mut self, action: RowAction) {
        match action {
            RowAction::Edit(id) => {
                if let Some(rec) = self.tracker.store().get(id) {
                    self.form = WorkoutForm::from_record(rec);
                    self.editing = Some(id);
                }
            }
            RowAction::Delete(id) => {
                if let Err(e) = self.tracker.delete_workout(id) {
                    self.report("Failed to delete workout", e);
                    return;
                }
                if self.editing == Some(id) {
                    self.editing = None;
                    self.form.clear();
                }
                self.refresh();
            }
        }
    }

    fn remember_dir(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.settings.last_export_dir = Some(parent.display().to_string());
            self.settings_dirty = true;
        }
    }

    fn dialog(&self) -> FileDialog {
        let dialog = FileDialog::new();
        match &self.settings.last_export_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn export_json(&mut self) {
        let Some(path) = self
            .dialog()
            .add_filter("JSON", &["json"])
            .set_file_name(EXPORT_FILE_NAME)
            .save_file()
        else {
            return;
        };
        match save_records_json(&path, &self.tracker.store().records()) {
            Ok(()) => {
                self.status = Some(format!("Exported to {}", path.display()));
                self.remember_dir(&path);
            }
            Err(e) => self.report("Failed to export workouts", e),
        }
    }

    fn export_csv(&mut self) {
        let Some(path) = self
            .dialog()
            .add_filter("CSV", &["csv"])
            .set_file_name("workouts.csv")
            .save_file()
        else {
            return;
        };
        match save_records_csv(&path, &self.tracker.store().records()) {
            Ok(()) => {
                self.status = Some(format!("Exported to {}", path.display()));
                self.remember_dir(&path);
            }
            Err(e) => self.report("Failed to export workouts", e),
        }
    }

    fn import_json(&mut self) {
        let Some(path) = self.dialog().add_filter("JSON", &["json"]).pick_file() else {
            return;
        };
        let imported = load_records_json(&path)
            .map_err(TrackerError::Import)
            .and_then(|records| self.tracker.import_records(records));
        match imported {
            Ok(count) => {
                self.status = Some(format!("Imported {count} workouts from {}", path.display()));
                self.editing = None;
                self.form.clear();
                self.remember_dir(&path);
                self.refresh();
            }
            Err(e) => self.report("Failed to import workouts", e),
        }
    }

    fn form_ui(&mut self, ui: &mut egui::Ui) {
        let unit = self.settings.weight_unit;
        ui.heading(if self.editing.is_some() {
            "Edit workout"
        } else {
            "Log workout"
        });
        egui::Grid::new("entry_form").num_columns(2).show(ui, |ui| {
            ui.label("Exercise");
            ui.text_edit_singleline(&mut self.form.exercise);
            ui.end_row();
            ui.label("Sets");
            ui.text_edit_singleline(&mut self.form.sets);
            ui.end_row();
            ui.label("Reps");
            ui.text_edit_singleline(&mut self.form.reps);
            ui.end_row();
            ui.label(format!("Weight ({})", unit.label()));
            ui.text_edit_singleline(&mut self.form.weight);
            ui.end_row();
        });
        let mut submit = false;
        ui.horizontal(|ui| {
            let label = if self.editing.is_some() { "Save" } else { "Add" };
            if ui.button(label).clicked() {
                submit = true;
            }
            if self.editing.is_some() && ui.button("Cancel").clicked() {
                self.editing = None;
                self.form.clear();
            }
        });
        if submit {
            self.submit();
        }

        ui.separator();
        ui.heading("Personal records");
        for best in &self.view.bests {
            ui.label(format!(
                "{}: {} {} ({})",
                best.exercise,
                best.best_weight,
                unit.label(),
                best.date
            ));
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Unit");
            let lbs = ui.radio_value(&mut self.settings.weight_unit, WeightUnit::Lbs, "lbs");
            let kg = ui.radio_value(&mut self.settings.weight_unit, WeightUnit::Kg, "kg");
            if lbs.changed() || kg.changed() {
                self.settings_dirty = true;
            }
        });
        if ui
            .checkbox(&mut self.settings.show_pr_markers, "Highlight PRs on chart")
            .changed()
        {
            self.settings_dirty = true;
        }
    }

    fn chart_ui(&self, ui: &mut egui::Ui) {
        let unit = self.settings.weight_unit;
        let show_prs = self.settings.show_pr_markers;
        Plot::new("progress_chart")
            .height(280.0)
            .legend(Legend::default())
            .x_axis_formatter(|mark, _chars, _| {
                date_from_x(mark.value)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .label_formatter(move |name, value| {
                let date = date_from_x(value.x)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                if name.is_empty() {
                    format!("{date}\n{:.1} {}", value.y, unit.label())
                } else {
                    format!("{name}\n{date}\n{:.1} {}", value.y, unit.label())
                }
            })
            .show(ui, |plot_ui| {
                for series in &self.view.series {
                    let color = color32(series.color);
                    let points = chart_points(&series.points);
                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .name(&series.exercise)
                            .color(color),
                    );
                    plot_ui.points(
                        Points::new(points)
                            .radius(3.0)
                            .color(color)
                            .name(&series.exercise),
                    );
                    let prs = pr_points(&series.points);
                    if show_prs && !prs.is_empty() {
                        plot_ui.points(
                            Points::new(prs)
                                .shape(MarkerShape::Circle)
                                .filled(true)
                                .radius(6.0)
                                .color(color32(PR_COLOR))
                                .name(format!("{} PR", series.exercise)),
                        );
                    }
                }
            });
    }

    fn history_ui(&mut self, ui: &mut egui::Ui) {
        let unit = self.settings.weight_unit;
        let mut selected = self.tracker.filter().map(str::to_string);
        egui::ComboBox::from_label("Exercise")
            .selected_text(selected.clone().unwrap_or_else(|| "All".into()))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, None, "All");
                for ex in &self.view.exercises {
                    ui.selectable_value(&mut selected, Some(ex.clone()), ex.as_str());
                }
            });
        if selected.as_deref() != self.tracker.filter() {
            self.tracker.set_filter(selected);
            self.refresh();
        }

        let mut action = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for item in &self.view.visible {
                let r = &item.record;
                ui.horizontal(|ui| {
                    if let Some(c) = self.tracker.colors().peek(&r.exercise) {
                        ui.colored_label(color32(c), "●");
                    }
                    ui.label(format!(
                        "{}  {}: {} x {} @ {} {}",
                        r.date,
                        r.exercise,
                        r.sets,
                        r.reps,
                        r.weight,
                        unit.label()
                    ));
                    if r.is_pr {
                        ui.colored_label(color32(PR_COLOR), "New PR!");
                    }
                    if ui.button("Edit").clicked() {
                        action = Some(RowAction::Edit(item.id));
                    }
                    if ui.button("Delete").clicked() {
                        action = Some(RowAction::Delete(item.id));
                    }
                });
            }
        });
        if let Some(action) = action {
            self.apply(action);
        }
    }
}

impl App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Import JSON").clicked() {
                        ui.close_menu();
                        self.import_json();
                    }
                    if ui.button("Export JSON").clicked() {
                        ui.close_menu();
                        self.export_json();
                    }
                    if ui.button("Export CSV").clicked() {
                        ui.close_menu();
                        self.export_csv();
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.status.as_deref().unwrap_or(""));
        });

        egui::SidePanel::left("entry_panel")
            .resizable(true)
            .show(ctx, |ui| self.form_ui(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_ui(ui);
            ui.separator();
            self.history_ui(ui);
        });

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let app = match TrackerApp::new() {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to start: {e}");
            std::process::exit(1);
        }
    };
    let options = NativeOptions::default();
    eframe::run_native(
        "Workout Tracker",
        options,
        Box::new(|_cc| Box::new(app)),
    )
}
