#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod dialogs;

use clap::Parser;
use eframe::{egui, App, NativeOptions};
use log::{error, info};
use std::path::{Path, PathBuf};

use track_labeler_gui::clipboard::copy_image_to_clipboard;
use track_labeler_gui::config::{self, Config, DEFAULT_CONFIG_FILE};
use track_labeler_gui::imaging::load_track_images;
use track_labeler_gui::layout::grid::layout_grid;
use track_labeler_gui::layout::progress::{self, layout_segments};
use track_labeler_gui::validation::is_numeric_input;
use track_labeler_gui::{Advance, Gender, LabelError, LabelingSession, TrackKey};

const HELP_TEXT: &str = "Keyboard Shortcuts:\n\n\
    m = male\n\
    f = female\n\
    a = focus age\n\
    n = save & next\n\
    p = previous\n\
    i = skip\n\
    ctrl+d = remove whole track\n\
    delete = delete selected images\n\
    h = help";

const PROGRESS_BAR_HEIGHT: f32 = 30.0;
const GOTO_AREA_WIDTH: f32 = 220.0;
const SELECTED_BORDER: f32 = 5.0;

#[derive(Parser, Debug)]
#[command(name = "track-labeler", about = "Label person image tracks with gender and age")]
struct Cli {
    /// Data directory laid out as <camera_id>/<track_id>/<images>
    root: Option<PathBuf>,

    /// Labels CSV (default: labels.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: labeler.toml, optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    min_cell_width: Option<f32>,

    /// Print the label distribution as JSON and exit
    #[arg(long)]
    summary: bool,
}

struct Thumbnail {
    path: PathBuf,
    display_size: (u32, u32),
    texture: egui::TextureHandle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shortcut {
    Male,
    Female,
    FocusAge,
    SaveNext,
    Previous,
    Skip,
    Help,
    RemoveTrack,
    DeleteImages,
}

struct TrackLabelerApp {
    session: LabelingSession,
    config: Config,
    thumbnails: Vec<Thumbnail>,
    // Track the textures were built for
    thumbnails_for: Option<TrackKey>,
    goto_text: String,
    show_distribution: bool,
}

impl TrackLabelerApp {
    fn new(_cc: &eframe::CreationContext<'_>, session: LabelingSession, config: Config) -> Self {
        Self {
            session,
            config,
            thumbnails: Vec::new(),
            thumbnails_for: None,
            goto_text: "1".to_string(),
            show_distribution: false,
        }
    }

    fn age_field_id() -> egui::Id {
        egui::Id::new("age_field")
    }

    /// Rebuilds textures when the current track changed since the last frame.
    fn sync_thumbnails(&mut self, ctx: &egui::Context) {
        let wanted = self.session.current_track().map(|t| t.key.clone());
        if wanted == self.thumbnails_for {
            return;
        }
        self.thumbnails.clear();
        if let Some(track) = self.session.current_track() {
            for img in load_track_images(&track.image_paths, self.config.max_texture_side) {
                let color = egui::ColorImage::from_rgba_unmultiplied(
                    [img.pixel_size.0 as usize, img.pixel_size.1 as usize],
                    &img.rgba,
                );
                let texture = ctx.load_texture(img.path.to_string_lossy(), color, egui::TextureOptions::LINEAR);
                self.thumbnails.push(Thumbnail { path: img.path, display_size: img.display_size, texture });
            }
        }
        self.thumbnails_for = wanted;
    }

    // --- actions ---

    fn report_advance(&self, result: Result<Advance, LabelError>) {
        match result {
            Ok(Advance::Moved) => {}
            Ok(Advance::ReachedEnd) => dialogs::info("Info", "This was the last track."),
            Err(e) => dialogs::error("Error", &e.to_string()),
        }
    }

    fn save_and_next(&mut self) {
        let result = self.session.save_and_next();
        self.report_advance(result);
    }

    fn skip_track(&mut self) {
        let result = self.session.skip_track();
        self.report_advance(result);
    }

    fn previous_track(&mut self) {
        if let Err(e) = self.session.previous() {
            dialogs::info("Info", &e.to_string());
        }
    }

    fn goto_track(&mut self) {
        // Anything that is not a positive number is reported as index 0.
        let index = self.goto_text.trim().parse::<usize>().unwrap_or(0);
        if let Err(e) = self.session.go_to(index) {
            dialogs::warning("Invalid", &e.to_string());
        }
    }

    fn jump_to(&mut self, index: usize) {
        if let Err(e) = self.session.jump_to(index) {
            dialogs::warning("Invalid", &e.to_string());
        }
    }

    fn remove_current_track(&mut self) {
        match self.session.remove_current_track() {
            Ok(key) => info!("Removed track {}", key),
            Err(LabelError::NoCurrentTrack) => {}
            Err(e) => dialogs::error("Error", &e.to_string()),
        }
    }

    fn delete_selected_images(&mut self) {
        let deleted = self.session.delete_selected_images();
        if !deleted.is_empty() {
            self.thumbnails.retain(|t| !deleted.contains(&t.path));
        }
    }

    fn on_image_click(&mut self, path: &Path) {
        let selected = self.session.toggle_selection(path);
        if selected && self.config.copy_on_select {
            if let Err(e) = copy_image_to_clipboard(&self.config.clipboard_command, path) {
                dialogs::error("Clipboard Error", &e.to_string());
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let typing = ctx.wants_keyboard_input();
        let pressed: Vec<Shortcut> = ctx.input(|i| {
            let mut keys = Vec::new();
            if i.modifiers.ctrl && i.key_pressed(egui::Key::D) {
                keys.push(Shortcut::RemoveTrack);
            }
            if typing || i.modifiers.ctrl || i.modifiers.alt {
                return keys;
            }
            let bindings = [
                (egui::Key::M, Shortcut::Male),
                (egui::Key::F, Shortcut::Female),
                (egui::Key::A, Shortcut::FocusAge),
                (egui::Key::N, Shortcut::SaveNext),
                (egui::Key::P, Shortcut::Previous),
                (egui::Key::I, Shortcut::Skip),
                (egui::Key::H, Shortcut::Help),
                (egui::Key::Delete, Shortcut::DeleteImages),
            ];
            keys.extend(bindings.iter().filter(|(k, _)| i.key_pressed(*k)).map(|(_, s)| *s));
            keys
        });

        for shortcut in pressed {
            match shortcut {
                Shortcut::Male => self.session.set_gender(Gender::Male),
                Shortcut::Female => self.session.set_gender(Gender::Female),
                Shortcut::FocusAge => ctx.memory_mut(|m| m.request_focus(Self::age_field_id())),
                Shortcut::SaveNext => {
                    if self.session.save_gate().is_enabled() {
                        self.save_and_next();
                    }
                }
                Shortcut::Previous => self.previous_track(),
                Shortcut::Skip => self.skip_track(),
                Shortcut::Help => dialogs::info("Shortcuts", HELP_TEXT),
                Shortcut::RemoveTrack => self.remove_current_track(),
                Shortcut::DeleteImages => self.delete_selected_images(),
            }
        }
    }

    // --- panels ---

    fn show_progress_bar(&mut self, ui: &mut egui::Ui, width: f32) {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, PROGRESS_BAR_HEIGHT), egui::Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::WHITE);

        let segments = layout_segments(
            rect.width(),
            rect.height(),
            &self.session.statuses(),
            self.session.current_index(),
        );
        for seg in &segments {
            let seg_rect = egui::Rect::from_min_max(
                rect.min + egui::vec2(seg.x1, seg.y1),
                rect.min + egui::vec2(seg.x2, seg.y2),
            );
            let [r, g, b] = seg.status.rgb();
            painter.rect_filled(seg_rect, 0.0, egui::Color32::from_rgb(r, g, b));
            if seg.is_current {
                painter.rect_stroke(seg_rect, 0.0, egui::Stroke::new(2.0, egui::Color32::RED));
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - rect.min;
                if let Some(index) = progress::hit_test(&segments, local.x, local.y) {
                    self.jump_to(index);
                }
            }
        }
    }

    fn show_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.label(egui::RichText::new(self.session.title()).size(30.0).strong());
            ui.horizontal(|ui| {
                let bar_width = (ui.available_width() - GOTO_AREA_WIDTH).max(50.0);
                self.show_progress_bar(ui, bar_width);
                ui.add_space(10.0);
                ui.label("Go to track:");
                ui.add(egui::TextEdit::singleline(&mut self.goto_text).desired_width(50.0));
                if ui.button("Go").clicked() {
                    self.goto_track();
                }
            });
        });
    }

    fn show_bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Gender:");
                let mut gender = self.session.form().gender;
                ui.radio_value(&mut gender, Gender::Male, "Male");
                ui.radio_value(&mut gender, Gender::Female, "Female");
                if gender != self.session.form().gender {
                    self.session.set_gender(gender);
                }

                ui.add_space(10.0);
                ui.label("Age:");
                let mut age_text = self.session.form().age_text.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut age_text)
                        .id(Self::age_field_id())
                        .desired_width(60.0),
                );
                // Rejected keystrokes simply never reach the session.
                if response.changed() && is_numeric_input(&age_text) {
                    self.session.set_age_text(age_text);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Remove Track").clicked() {
                        self.remove_current_track();
                    }
                    if ui.button("Show Distribution").clicked() {
                        self.show_distribution = true;
                    }
                    if ui.button("Previous").clicked() {
                        self.previous_track();
                    }
                    if ui.button("Skip").clicked() {
                        self.skip_track();
                    }
                    let enabled = self.session.save_gate().is_enabled();
                    let color = if enabled { egui::Color32::from_rgb(0, 160, 0) } else { egui::Color32::RED };
                    let save = egui::Button::new(egui::RichText::new("Save & Next").color(color));
                    if ui.add_enabled(enabled, save).clicked() {
                        self.save_and_next();
                    }
                });
            });
            ui.add_space(5.0);
        });
    }

    fn show_image_grid(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        let sizes: Vec<(u32, u32)> = self.thumbnails.iter().map(|t| t.display_size).collect();
        let grid = layout_grid(width, self.config.min_cell_width, &sizes);

        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, grid.total_height), egui::Sense::click());
        let painter = ui.painter_at(rect);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        for cell in &grid.cells {
            let thumb = &self.thumbnails[cell.index];
            let cell_rect = egui::Rect::from_min_size(
                rect.min + egui::vec2(cell.rect.x, cell.rect.y),
                egui::vec2(cell.rect.width, cell.rect.height),
            );
            painter.image(thumb.texture.id(), cell_rect, uv, egui::Color32::WHITE);
            if self.session.is_selected(&thumb.path) {
                painter.rect_stroke(
                    cell_rect.shrink(SELECTED_BORDER / 2.0),
                    0.0,
                    egui::Stroke::new(SELECTED_BORDER, egui::Color32::from_rgb(30, 144, 255)),
                );
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - rect.min;
                if let Some(index) = grid.hit_test(local.x, local.y) {
                    let path = self.thumbnails[index].path.clone();
                    self.on_image_click(&path);
                }
            }
        }
    }

    fn show_distribution_window(&mut self, ctx: &egui::Context) {
        let summary = self.session.distribution();
        egui::Window::new("Distribution")
            .open(&mut self.show_distribution)
            .resizable(true)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Tracks: {}   Labeled: {}   Skipped: {}   Unlabeled: {}",
                    summary.total_tracks, summary.labeled, summary.skipped, summary.unlabeled
                ));
                ui.separator();
                if !summary.has_ages() {
                    ui.label("No labeled data available.");
                    return;
                }
                ui.columns(2, |columns| {
                    columns[0].heading("Gender Distribution");
                    egui::Grid::new("gender_grid").striped(true).show(&mut columns[0], |ui| {
                        ui.label("male");
                        ui.label(summary.genders.male.to_string());
                        ui.end_row();
                        ui.label("female");
                        ui.label(summary.genders.female.to_string());
                        ui.end_row();
                    });

                    columns[1].heading("Age Distribution");
                    if let Some(mean) = summary.mean_age {
                        columns[1].label(format!("Mean age: {:.1}", mean));
                    }
                    egui::ScrollArea::vertical().id_source("age_bins_scroll").max_height(300.0).show(&mut columns[1], |ui| {
                        egui::Grid::new("age_grid").striped(true).show(ui, |ui| {
                            for (age, count) in &summary.age_histogram {
                                ui.label(age.to_string());
                                ui.label(count.to_string());
                                ui.end_row();
                            }
                        });
                    });
                });
            });
    }
}

impl App for TrackLabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_thumbnails(ctx);
        self.handle_shortcuts(ctx);

        self.show_top_panel(ctx);
        self.show_bottom_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_source("image_grid_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if self.session.is_empty() {
                        ui.label("No tracks to label.");
                    } else {
                        self.show_image_grid(ui);
                    }
                });
        });

        if self.show_distribution {
            self.show_distribution_window(ctx);
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, LabelError> {
    match &cli.config {
        Some(path) => config::load_config_from_file(path),
        None => config::load_config_or_default(&PathBuf::from(DEFAULT_CONFIG_FILE)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;
    if let Some(output) = &cli.output {
        config.output_csv = output.clone();
    }
    if let Some(width) = cli.min_cell_width {
        config.min_cell_width = width;
    }

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let root = match cli.root.clone().or_else(|| config.data_root.clone()) {
        Some(root) => root,
        None => match rfd::FileDialog::new().set_title("Select the data directory").pick_folder() {
            Some(root) => root,
            None => {
                info!("No data directory selected, exiting.");
                return Ok(());
            }
        },
    };

    let session = match LabelingSession::open(&root, &config.output_csv) {
        Ok(session) => session,
        Err(e) => {
            error!("Could not open {:?}: {}", root, e);
            return Err(e.into());
        }
    };

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&session.distribution())?);
        return Ok(());
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "Person Track Labeling Tool",
        options,
        Box::new(move |cc| Box::new(TrackLabelerApp::new(cc, session, config))),
    )
    .map_err(|e| e.to_string())?;
    Ok(())
}
