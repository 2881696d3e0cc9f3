use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Vec2};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::engine::board::{
    segment_at, segment_span, DOUBLE_INNER, DOUBLE_OUTER, INNER_BULL, OUTER_BULL, SEGMENT_ORDER,
    TREBLE_INNER, TREBLE_OUTER,
};
use crate::engine::game::GameMode;
use crate::engine::protocol::{EngineCommand, EngineResponse, ScoreInput};
use crate::engine::voice::Language;
use crate::model::dart::{Dart, BULL};
use crate::ui::app::{InputTab, WeDartApp};

use super::center_panel::language_label;

const BOARD_BLACK: Color32 = Color32::from_rgb(25, 25, 25);
const BOARD_CREAM: Color32 = Color32::from_rgb(235, 220, 180);
const BOARD_RED: Color32 = Color32::from_rgb(200, 40, 40);
const BOARD_GREEN: Color32 = Color32::from_rgb(20, 130, 60);

/// Wedge slices per segment; each slice is a convex quad.
const ARC_STEPS: usize = 4;

fn takes_totals(mode: GameMode) -> bool {
    matches!(
        mode,
        GameMode::X01 | GameMode::HalfIt | GameMode::ProgressiveFinish
    )
}

fn takes_darts(mode: GameMode) -> bool {
    mode != GameMode::ProgressiveFinish
}

pub fn draw_right_panel(ctx: &egui::Context, app: &mut WeDartApp) {
    let Some(mode) = app.engine.game().map(|g| g.mode()) else {
        return;
    };

    egui::SidePanel::right("right")
        .resizable(true)
        .default_width(380.0)
        .min_width(280.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let tab = &mut app.ui.input_tab;
                ui.selectable_value(tab, InputTab::Keypad, "Keypad");
                if takes_darts(mode) {
                    ui.selectable_value(tab, InputTab::Board, "Board");
                }
                ui.selectable_value(tab, InputTab::Voice, "Voice");
            });

            if app.ui.input_tab == InputTab::Board && !takes_darts(mode) {
                app.ui.input_tab = InputTab::Keypad;
            }

            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| match app.ui.input_tab {
                InputTab::Keypad if takes_totals(mode) => draw_keypad(ui, app, mode),
                InputTab::Keypad => draw_segment_pad(ui, app),
                InputTab::Board => draw_board_guarded(ui, app),
                InputTab::Voice => draw_voice(ui, app),
            });

            if takes_darts(mode) {
                ui.separator();
                if ui.button("⏭ End turn").clicked() {
                    app.send(EngineCommand::Score(ScoreInput::EndTurn));
                }
            }
        });
}

/* =========================
   Keypad
   ========================= */

fn draw_keypad(ui: &mut egui::Ui, app: &mut WeDartApp, mode: GameMode) {
    ui.label(
        egui::RichText::new(if app.ui.keypad.is_empty() {
            "0"
        } else {
            app.ui.keypad.as_str()
        })
        .size(36.0),
    );

    let mut submit = false;
    let size = Vec2::new(64.0, 48.0);

    egui::Grid::new("keypad").spacing([6.0, 6.0]).show(ui, |ui| {
        for row in [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"]] {
            for key in row {
                if ui.add_sized(size, egui::Button::new(key)).clicked() {
                    push_digit(&mut app.ui.keypad, key);
                }
            }
            ui.end_row();
        }
        if ui.add_sized(size, egui::Button::new("⌫")).clicked() {
            app.ui.keypad.pop();
        }
        if ui.add_sized(size, egui::Button::new("0")).clicked() {
            push_digit(&mut app.ui.keypad, "0");
        }
        if ui.add_sized(size, egui::Button::new("✔")).clicked() {
            submit = true;
        }
        ui.end_row();
    });

    // typed digits work too
    ui.input(|i| {
        for e in &i.events {
            if let egui::Event::Text(t) = e {
                if t.chars().all(|c| c.is_ascii_digit()) {
                    push_digit(&mut app.ui.keypad, t);
                }
            }
        }
        if i.key_pressed(egui::Key::Backspace) {
            app.ui.keypad.pop();
        }
        if i.key_pressed(egui::Key::Enter) {
            submit = true;
        }
    });

    if mode != GameMode::HalfIt {
        ui.horizontal(|ui| {
            ui.label("Darts used");
            for n in 1..=3u8 {
                ui.selectable_value(&mut app.ui.keypad_darts, n, n.to_string());
            }
        });
    }

    if submit {
        let score = app.ui.keypad.parse::<u16>().unwrap_or(0);
        let darts = app.ui.keypad_darts;
        let resp = app.send(EngineCommand::Score(ScoreInput::Total { score, darts }));
        if matches!(resp, EngineResponse::Applied { .. }) {
            app.ui.keypad.clear();
            app.ui.keypad_darts = 3;
        }
    }
}

/// Appends digits while the entry stays at most three characters.
fn push_digit(entry: &mut String, digits: &str) {
    for c in digits.chars() {
        if entry.len() >= 3 {
            break;
        }
        if entry == "0" {
            entry.clear();
        }
        entry.push(c);
    }
}

/* =========================
   Segment pad
   ========================= */

fn draw_segment_pad(ui: &mut egui::Ui, app: &mut WeDartApp) {
    let mut thrown: Option<Dart> = None;

    ui.horizontal(|ui| {
        let m = &mut app.ui.multiplier;
        ui.selectable_value(m, 1, "Single");
        ui.selectable_value(m, 2, "Double");
        ui.selectable_value(m, 3, "Treble");
    });
    let multiplier = app.ui.multiplier;

    let size = Vec2::new(48.0, 40.0);
    egui::Grid::new("segments").spacing([4.0, 4.0]).show(ui, |ui| {
        for n in 1..=20u8 {
            if ui.add_sized(size, egui::Button::new(n.to_string())).clicked() {
                thrown = Dart::new(n, multiplier).ok();
            }
            if n % 5 == 0 {
                ui.end_row();
            }
        }
        if ui.add_sized(size, egui::Button::new("25")).clicked() {
            thrown = Some(Dart::Single(BULL));
        }
        if ui.add_sized(size, egui::Button::new("Bull")).clicked() {
            thrown = Some(Dart::Double(BULL));
        }
        if ui.add_sized(size, egui::Button::new("Miss")).clicked() {
            thrown = Some(Dart::Miss);
        }
        ui.end_row();
    });

    if let Some(dart) = thrown {
        app.send(EngineCommand::Score(ScoreInput::Dart(dart)));
        app.ui.multiplier = 1;
    }
}

/* =========================
   Dartboard
   ========================= */

fn draw_board_guarded(ui: &mut egui::Ui, app: &mut WeDartApp) {
    if let Some(err) = &app.ui.board_error {
        ui.colored_label(app.settings.color("Accent"), err);
        if ui.button("Retry").clicked() {
            app.ui.board_error = None;
        }
        return;
    }

    let background = app.settings.color("Board");
    let text = app.settings.color("Text");

    match panic::catch_unwind(AssertUnwindSafe(|| draw_board(ui, background, text))) {
        Ok(Some(dart)) => {
            app.send(EngineCommand::Score(ScoreInput::Dart(dart)));
        }
        Ok(None) => {}
        Err(_) => {
            log::error!("dartboard widget panicked");
            app.ui.board_error = Some("The dartboard could not be drawn.".into());
        }
    }
}

fn polar(center: Pos2, r: f32, angle: f32) -> Pos2 {
    // angle is clockwise from 12 o'clock
    center + Vec2::new(r * angle.sin(), -r * angle.cos())
}

fn ring_slice(painter: &egui::Painter, center: Pos2, r0: f32, r1: f32, a0: f32, a1: f32, fill: Color32) {
    let step = (a1 - a0) / ARC_STEPS as f32;
    for k in 0..ARC_STEPS {
        let s = a0 + step * k as f32;
        let e = s + step;
        painter.add(Shape::convex_polygon(
            vec![
                polar(center, r0, s),
                polar(center, r1, s),
                polar(center, r1, e),
                polar(center, r0, e),
            ],
            fill,
            Stroke::NONE,
        ));
    }
}

/// Paints the board and returns the dart under a click, if any.
fn draw_board(ui: &mut egui::Ui, background: Color32, text: Color32) -> Option<Dart> {
    let size = ui.available_width().clamp(200.0, 420.0);
    let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::click());
    let center = response.rect.center();
    let radius = size / 2.0 * 0.85;

    painter.circle_filled(center, size / 2.0, background);

    for (i, number) in SEGMENT_ORDER.iter().enumerate() {
        let (a0, a1) = segment_span(i);
        let (single, ring) = if i % 2 == 0 {
            (BOARD_BLACK, BOARD_RED)
        } else {
            (BOARD_CREAM, BOARD_GREEN)
        };

        ring_slice(&painter, center, radius * OUTER_BULL, radius * TREBLE_INNER, a0, a1, single);
        ring_slice(&painter, center, radius * TREBLE_INNER, radius * TREBLE_OUTER, a0, a1, ring);
        ring_slice(&painter, center, radius * TREBLE_OUTER, radius * DOUBLE_INNER, a0, a1, single);
        ring_slice(&painter, center, radius * DOUBLE_INNER, radius * DOUBLE_OUTER, a0, a1, ring);

        painter.text(
            polar(center, radius * 1.09, (a0 + a1) / 2.0),
            Align2::CENTER_CENTER,
            number.to_string(),
            FontId::proportional(size * 0.045),
            text,
        );
    }

    painter.circle_filled(center, radius * OUTER_BULL, BOARD_GREEN);
    painter.circle_filled(center, radius * INNER_BULL, BOARD_RED);

    if let Some(pos) = response.hover_pos() {
        let d = pos - center;
        painter.text(
            response.rect.left_top(),
            Align2::LEFT_TOP,
            segment_at(d.x, d.y, radius).to_string(),
            FontId::proportional(16.0),
            text,
        );
    }

    if response.clicked() {
        let pos = response.interact_pointer_pos()?;
        let d = pos - center;
        return Some(segment_at(d.x, d.y, radius));
    }
    None
}

/* =========================
   Voice
   ========================= */

fn voice_hint(lang: Language) -> &'static str {
    match lang {
        Language::English => "e.g. \"triple twenty, single five\", \"sixty\", \"undo\"",
        Language::Swedish => "t.ex. \"trippel tjugo, enkel fem\", \"sextio\", \"ångra\"",
    }
}

fn draw_voice(ui: &mut egui::Ui, app: &mut WeDartApp) {
    let lang = app.engine.language();
    ui.label(format!("Language: {}", language_label(lang)));

    let response = ui.add(
        egui::TextEdit::singleline(&mut app.ui.voice_text)
            .hint_text(voice_hint(lang))
            .desired_width(f32::INFINITY),
    );
    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    if (ui.button("🎤 Submit").clicked() || enter) && !app.ui.voice_text.trim().is_empty() {
        let text = std::mem::take(&mut app.ui.voice_text);
        app.queue_voice(text);
    }

    let Some(pending) = app.ui.voice_pending.clone() else {
        return;
    };

    ui.separator();
    let left = app
        .ui
        .voice_countdown
        .remaining(Instant::now())
        .map(|d| d.as_secs_f32())
        .unwrap_or(0.0);
    ui.label(format!("Heard \"{pending}\", sending in {left:.1}s"));

    ui.horizontal(|ui| {
        if ui.button("Send now").clicked() {
            app.cancel_voice();
            app.send(EngineCommand::Voice(pending));
        }
        if ui.button("Cancel").clicked() {
            app.cancel_voice();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypad_entry_is_capped() {
        let mut e = String::new();
        push_digit(&mut e, "1");
        push_digit(&mut e, "80");
        push_digit(&mut e, "5");
        assert_eq!(e, "180");
    }

    #[test]
    fn leading_zero_is_replaced() {
        let mut e = String::new();
        push_digit(&mut e, "0");
        push_digit(&mut e, "7");
        assert_eq!(e, "7");
    }

    #[test]
    fn polar_points_clockwise_from_top() {
        let c = Pos2::new(100.0, 100.0);
        let top = polar(c, 10.0, 0.0);
        assert!((top.y - 90.0).abs() < 1e-4);
        let right = polar(c, 10.0, std::f32::consts::FRAC_PI_2);
        assert!((right.x - 110.0).abs() < 1e-4);
    }

    #[test]
    fn input_kinds_per_mode() {
        assert!(takes_totals(GameMode::X01) && takes_darts(GameMode::X01));
        assert!(!takes_darts(GameMode::ProgressiveFinish));
        assert!(!takes_totals(GameMode::Cricket));
    }
}
