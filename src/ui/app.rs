use eframe::egui;
use std::time::{Duration, Instant};

use crate::engine::engine::Engine;
use crate::engine::game::GameMode;
use crate::engine::half_it::HalfItConfig;
use crate::engine::progressive::ProgressiveConfig;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::storage::FileStore;
use crate::engine::timing::Countdown;
use crate::engine::warmup::WarmupConfig;
use crate::engine::x01::X01Config;
use crate::model::event_result::Outcome;
use crate::model::player::PlayerId;
use crate::ui::settings::{AppSettings, Theme, COLOR_KEYS};
use crate::ui::settings_io::{load_settings, save_settings};

use super::center_panel::draw_center_panel;
use super::left_panel::draw_left_panel;
use super::right_panel::draw_right_panel;

const LOG_LEN: usize = 12;

/* =========================
   Screens
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Players,
    Setup(GameMode),
    Game,
    Settings,
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Home
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputTab {
    #[default]
    Keypad,
    Board,
    Voice,
}

/* =========================
   UI State
   ========================= */

/// Choices on the setup screen, kept between games.
pub struct SetupState {
    pub selected: Vec<PlayerId>,
    pub shuffle: bool,
    pub x01: X01Config,
    pub half_it: HalfItConfig,
    pub progressive: ProgressiveConfig,
    pub warmup: WarmupConfig,
}

impl SetupState {
    fn new(settings: &AppSettings) -> Self {
        Self {
            selected: Vec::new(),
            shuffle: false,
            x01: X01Config {
                start_score: settings.default_start_score,
                double_out: settings.default_double_out,
                ..Default::default()
            },
            half_it: HalfItConfig::default(),
            progressive: ProgressiveConfig::default(),
            warmup: WarmupConfig::default(),
        }
    }
}

pub struct UiState {
    pub screen: Screen,
    pub last_mode: GameMode,
    pub input_tab: InputTab,

    pub new_player_name: String,
    pub renaming: Option<(PlayerId, String)>,
    pub setup: SetupState,

    pub keypad: String,
    pub keypad_darts: u8,
    pub multiplier: u8,

    pub voice_text: String,
    pub voice_pending: Option<String>,
    pub voice_countdown: Countdown,

    pub board_error: Option<String>,
    pub log: Vec<String>,
    pub status: Option<String>,
    pub show_theme_window: bool,
}

impl UiState {
    fn new(settings: &AppSettings, screen: Screen) -> Self {
        Self {
            screen,
            last_mode: GameMode::X01,
            input_tab: InputTab::default(),
            new_player_name: String::new(),
            renaming: None,
            setup: SetupState::new(settings),
            keypad: String::new(),
            keypad_darts: 3,
            multiplier: 1,
            voice_text: String::new(),
            voice_pending: None,
            voice_countdown: Countdown::default(),
            board_error: None,
            log: Vec::new(),
            status: None,
            show_theme_window: false,
        }
    }

    pub fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > LOG_LEN {
            self.log.remove(0);
        }
    }
}

/* =========================
   App
   ========================= */

pub struct WeDartApp {
    pub ui: UiState,
    pub settings: AppSettings,
    pub engine: Engine,

    store: FileStore,
    saved_settings: AppSettings,
}

impl WeDartApp {
    pub fn new(store: FileStore) -> Self {
        let settings = load_settings(&store);
        let mut engine = Engine::load(Box::new(store.clone()));

        let now = Instant::now();
        engine.handle(EngineCommand::SetDebounce(settings.debounce_ms), now);
        engine.handle(EngineCommand::SetLanguage(settings.voice_language), now);

        let screen = if engine.game().is_some() {
            Screen::Game
        } else {
            Screen::Home
        };

        Self {
            ui: UiState::new(&settings, screen),
            saved_settings: settings.clone(),
            settings,
            engine,
            store,
        }
    }

    /// Runs one command through the engine and reflects the response in the UI.
    pub fn send(&mut self, cmd: EngineCommand) -> EngineResponse {
        let resp = self.engine.handle(cmd, Instant::now());

        match &resp {
            EngineResponse::Applied { outcomes } => {
                self.ui.status = None;
                for o in outcomes {
                    self.ui.push_log(describe(o));
                }
            }
            EngineResponse::GameStarted => {
                self.ui.status = None;
                self.ui.log.clear();
                self.ui.keypad.clear();
                self.ui.screen = Screen::Game;
            }
            EngineResponse::Undone => self.ui.push_log("↶ Undone".into()),
            EngineResponse::GameEnded => {
                self.ui.voice_countdown.cancel();
                self.ui.voice_pending = None;
                self.ui.screen = Screen::Home;
            }
            EngineResponse::Rejected { reason } => self.ui.status = Some(reason.clone()),
            EngineResponse::RosterUpdated
            | EngineResponse::SettingsChanged
            | EngineResponse::Debounced => {}
        }

        resp
    }

    /// Queues a voice phrase for auto-submit.
    pub fn queue_voice(&mut self, text: String) {
        let after = Duration::from_millis(self.settings.voice_autosubmit_ms);
        self.ui.voice_pending = Some(text);
        self.ui.voice_countdown.start(Instant::now(), after);
    }

    pub fn cancel_voice(&mut self) {
        self.ui.voice_countdown.cancel();
        self.ui.voice_pending = None;
    }

    fn poll_voice(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        if self.ui.voice_countdown.fire(now) {
            if let Some(text) = self.ui.voice_pending.take() {
                self.send(EngineCommand::Voice(text));
            }
        }
        if let Some(left) = self.ui.voice_countdown.remaining(now) {
            ctx.request_repaint_after(left);
        }
    }

    fn sync_settings(&mut self) {
        if self.settings == self.saved_settings {
            return;
        }
        if self.settings.debounce_ms != self.saved_settings.debounce_ms {
            self.send(EngineCommand::SetDebounce(self.settings.debounce_ms));
        }
        if self.settings.voice_language != self.saved_settings.voice_language {
            self.send(EngineCommand::SetLanguage(self.settings.voice_language));
        }
        save_settings(&self.store, &self.settings);
        self.saved_settings = self.settings.clone();
    }

    fn apply_visuals(&self, ctx: &egui::Context) {
        let s = &self.settings;
        let mut visuals = if s.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        visuals.panel_fill = s.color("Background");
        visuals.window_fill = s.color("Panel");
        visuals.faint_bg_color = s.color("Panel");
        visuals.override_text_color = Some(s.color("Text"));
        visuals.selection.bg_fill = s.color("Accent");
        ctx.set_visuals(visuals);
    }
}

pub fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Recorded => "Dart recorded".into(),
        Outcome::NextPlayer => "Next player".into(),
        Outcome::Bust => "Bust!".into(),
        Outcome::LegWon { player } => format!("{player} wins the leg"),
        Outcome::LevelCleared { level, target } => {
            format!("Level {level} cleared, next target {target}")
        }
        Outcome::LevelFailed { failures, target } => {
            format!("Missed, {failures} failed so far, target {target}")
        }
        Outcome::GameOver { winners } => format!("🏆 {} wins!", winners.join(" & ")),
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for WeDartApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);
        self.apply_visuals(ctx);
        self.poll_voice(ctx);

        if self.ui.screen == Screen::Game && self.engine.game().is_none() {
            log::warn!("ui: no active game, back to setup");
            self.ui.screen = Screen::Setup(self.ui.last_mode);
        }

        /* LEFT PANEL */
        draw_left_panel(ctx, self);

        /* RIGHT PANEL */
        if self.ui.screen == Screen::Game {
            draw_right_panel(ctx, self);
        }

        /* CENTER */
        draw_center_panel(ctx, self);

        draw_theme_window(ctx, &mut self.ui, &mut self.settings);

        self.sync_settings();
    }
}

/* =========================
   Theme window
   ========================= */

fn draw_theme_window(ctx: &egui::Context, ui_state: &mut UiState, settings: &mut AppSettings) {
    let mut open = ui_state.show_theme_window;

    egui::Window::new("Theme")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for theme in Theme::ALL {
                    if ui.button(theme.label()).clicked() {
                        settings.apply_theme(theme);
                    }
                }
            });

            ui.separator();

            egui::Grid::new("theme_colors").num_columns(2).show(ui, |ui| {
                for key in COLOR_KEYS {
                    ui.label(key);
                    let mut color = settings.color(key);
                    if ui.color_edit_button_srgba(&mut color).changed() {
                        settings.set_color(key, color);
                    }
                    ui.end_row();
                }
            });

            ui.checkbox(&mut settings.dark_mode, "Dark widgets");
        });

    ui_state.show_theme_window = open;
}

/* =========================
   UI Helpers
   ========================= */

pub fn card(ui: &mut egui::Ui, fill: egui::Color32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(8)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, add_contents);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_lines() {
        assert_eq!(describe(&Outcome::Bust), "Bust!");
        assert_eq!(
            describe(&Outcome::GameOver {
                winners: vec!["Ann".into(), "Bob".into()]
            }),
            "🏆 Ann & Bob wins!"
        );
        assert_eq!(
            describe(&Outcome::LevelCleared { level: 1, target: 50 }),
            "Level 1 cleared, next target 50"
        );
    }

    #[test]
    fn log_is_bounded() {
        let mut ui = UiState::new(&AppSettings::default(), Screen::Home);
        for i in 0..20 {
            ui.push_log(i.to_string());
        }
        assert_eq!(ui.log.len(), LOG_LEN);
        assert_eq!(ui.log[0], "8");
        assert_eq!(ui.setup.x01.start_score, 501);
        assert_eq!(ui.keypad_darts, 3);
    }
}
