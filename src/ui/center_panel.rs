use eframe::egui;

use crate::engine::game::{GameConfig, GameMode};
use crate::engine::protocol::EngineCommand;
use crate::engine::voice::Language;
use crate::engine::x01::START_PRESETS;
use crate::ui::app::{card, Screen, WeDartApp};
use crate::ui::settings::Theme;

use super::left_panel::draw_players;
use super::scoreboard::draw_game;

pub fn draw_center_panel(ctx: &egui::Context, app: &mut WeDartApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| match app.ui.screen {
            Screen::Home => draw_home(ui, app),
            Screen::Players => draw_players(ui, app),
            Screen::Setup(mode) => draw_setup(ui, app, mode),
            Screen::Game => draw_game(ui, app),
            Screen::Settings => draw_settings(ui, app),
        });
    });
}

/* =========================
   Home
   ========================= */

fn draw_home(ui: &mut egui::Ui, app: &mut WeDartApp) {
    ui.heading("Pick a game");
    ui.add_space(6.0);

    if let Some(game) = app.engine.game() {
        let mode = game.mode();
        if ui.button(format!("▶ Resume {mode}")).clicked() {
            app.ui.screen = Screen::Game;
        }
        ui.add_space(6.0);
    }

    let fill = app.settings.color("Panel");
    for mode in GameMode::ALL {
        card(ui, fill, |ui| {
            ui.horizontal(|ui| {
                if ui.button(mode.to_string()).clicked() {
                    app.ui.screen = Screen::Setup(mode);
                }
                ui.label(mode.description());
            });
        });
        ui.add_space(4.0);
    }
}

/* =========================
   Setup
   ========================= */

fn draw_setup(ui: &mut egui::Ui, app: &mut WeDartApp, mode: GameMode) {
    ui.horizontal(|ui| {
        for m in GameMode::ALL {
            if ui.selectable_label(m == mode, m.to_string()).clicked() {
                app.ui.screen = Screen::Setup(m);
            }
        }
    });
    ui.separator();

    ui.heading(mode.to_string());
    ui.label(mode.description());
    ui.add_space(6.0);

    /* -------- Players -------- */

    let roster = app.engine.roster();
    let setup = &mut app.ui.setup;
    setup.selected.retain(|id| roster.get(*id).is_some());

    ui.strong("Players (in throwing order)");
    if roster.players().is_empty() {
        ui.label("No players yet, add some on the Players screen.");
    }
    for p in roster.players() {
        let pos = setup.selected.iter().position(|id| *id == p.id);
        let mut checked = pos.is_some();
        let label = match pos {
            Some(i) => format!("{}. {}", i + 1, p.name),
            None => p.name.clone(),
        };
        if ui.checkbox(&mut checked, label).changed() {
            match pos {
                Some(i) => {
                    setup.selected.remove(i);
                }
                None => setup.selected.push(p.id),
            }
        }
    }
    ui.checkbox(&mut setup.shuffle, "Shuffle order");

    ui.separator();

    /* -------- Options -------- */

    let config = match mode {
        GameMode::X01 => {
            let c = &mut setup.x01;
            egui::ComboBox::from_label("Start score")
                .selected_text(c.start_score.to_string())
                .show_ui(ui, |ui| {
                    for s in START_PRESETS {
                        ui.selectable_value(&mut c.start_score, s, s.to_string());
                    }
                });
            ui.add(egui::DragValue::new(&mut c.start_score).range(101..=1001).prefix("custom "));
            ui.checkbox(&mut c.double_out, "Double out");
            ui.add(egui::DragValue::new(&mut c.legs_to_win).range(1..=9).prefix("legs to win "));
            GameConfig::X01(c.clone())
        }
        GameMode::HalfIt => {
            let c = &mut setup.half_it;
            ui.add(egui::DragValue::new(&mut c.start_score).range(0..=501).prefix("start "));
            GameConfig::HalfIt(c.clone())
        }
        GameMode::ProgressiveFinish => {
            let c = &mut setup.progressive;
            ui.add(egui::DragValue::new(&mut c.start_target).range(2..=170).prefix("first target "));
            ui.add(egui::DragValue::new(&mut c.increment).range(1..=50).prefix("step "));
            ui.add(egui::DragValue::new(&mut c.darts_per_level).range(3..=30).prefix("darts per level "));
            ui.add(egui::DragValue::new(&mut c.max_failures).range(1..=10).prefix("lives "));
            ui.checkbox(&mut c.double_out, "Double out");
            GameConfig::Progressive(c.clone())
        }
        GameMode::Warmup => {
            let c = &mut setup.warmup;
            ui.checkbox(&mut c.multiplier_skips, "Doubles and trebles skip ahead");
            GameConfig::Warmup(c.clone())
        }
        GameMode::Cricket | GameMode::HiddenCricket => mode.default_config(),
    };

    ui.add_space(8.0);

    let can_start = !setup.selected.is_empty();
    let players = setup.selected.clone();
    let shuffle = setup.shuffle;

    if ui.add_enabled(can_start, egui::Button::new("🎯 Start game")).clicked() {
        app.ui.last_mode = mode;
        app.send(EngineCommand::StartGame {
            config,
            players,
            shuffle,
        });
    }

    if let Some(msg) = &app.ui.status {
        ui.colored_label(app.settings.color("Accent"), msg);
    }
}

/* =========================
   Settings
   ========================= */

fn draw_settings(ui: &mut egui::Ui, app: &mut WeDartApp) {
    let s = &mut app.settings;

    ui.heading("Settings");
    ui.separator();

    ui.collapsing("Look", |ui| {
        ui.label("UI Scale");
        ui.add(egui::Slider::new(&mut s.ui_scale, 0.75..=2.0));

        ui.horizontal(|ui| {
            for theme in Theme::ALL {
                if ui.button(theme.label()).clicked() {
                    s.apply_theme(theme);
                }
            }
        });
        if ui.button("Edit colours…").clicked() {
            app.ui.show_theme_window = true;
        }
    });

    ui.collapsing("Input", |ui| {
        ui.add(
            egui::DragValue::new(&mut s.debounce_ms)
                .range(0..=2000)
                .suffix(" ms")
                .prefix("ignore repeats within "),
        );

        egui::ComboBox::from_label("Voice language")
            .selected_text(language_label(s.voice_language))
            .show_ui(ui, |ui| {
                for lang in [Language::English, Language::Swedish] {
                    ui.selectable_value(&mut s.voice_language, lang, language_label(lang));
                }
            });

        ui.add(
            egui::DragValue::new(&mut s.voice_autosubmit_ms)
                .range(500..=10_000)
                .suffix(" ms")
                .prefix("voice auto-submit after "),
        );
    });

    ui.collapsing("X01 defaults", |ui| {
        egui::ComboBox::from_label("Start score")
            .selected_text(s.default_start_score.to_string())
            .show_ui(ui, |ui| {
                for p in START_PRESETS {
                    ui.selectable_value(&mut s.default_start_score, p, p.to_string());
                }
            });
        ui.checkbox(&mut s.default_double_out, "Double out");
    });

    ui.separator();
    if ui.button("Reset to defaults").clicked() {
        *s = Default::default();
    }
}

pub fn language_label(lang: Language) -> &'static str {
    match lang {
        Language::English => "English",
        Language::Swedish => "Svenska",
    }
}
