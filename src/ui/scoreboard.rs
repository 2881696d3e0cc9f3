use eframe::egui;
use egui::{Color32, RichText};

use crate::engine::cricket::CricketState;
use crate::engine::game::Game;
use crate::engine::half_it::{HalfItState, ROUNDS};
use crate::engine::progressive::ProgressiveState;
use crate::engine::protocol::EngineCommand;
use crate::engine::warmup::{WarmupState, SEQUENCE_LEN};
use crate::engine::x01::X01State;
use crate::model::dart::{Dart, BULL};
use crate::ui::app::WeDartApp;
use crate::ui::settings::AppSettings;

/// Row colours for the scoreboards.
struct Palette {
    current: Color32,
    winner: Color32,
    accent: Color32,
}

impl Palette {
    fn new(settings: &AppSettings) -> Self {
        Self {
            current: settings.color("Current"),
            winner: settings.color("Winner"),
            accent: settings.color("Accent"),
        }
    }

    fn name(&self, name: &str, current: bool, winner: bool) -> RichText {
        let text = RichText::new(name);
        if winner {
            text.strong().color(self.winner)
        } else if current {
            text.strong().background_color(self.current)
        } else {
            text
        }
    }
}

pub fn draw_game(ui: &mut egui::Ui, app: &mut WeDartApp) {
    let Some(game) = app.engine.game() else {
        ui.label("No game running.");
        return;
    };
    let palette = Palette::new(&app.settings);

    ui.horizontal(|ui| {
        ui.heading(game.mode().to_string());
        if game.keeper().is_finished() {
            ui.label(RichText::new("finished").color(palette.winner));
        }
    });

    if let Some(msg) = &app.ui.status {
        ui.colored_label(palette.accent, msg);
    }
    ui.separator();

    match game {
        Game::X01(g) => x01_board(ui, g.state(), &palette),
        Game::Cricket(g) => cricket_board(ui, g.state(), &palette),
        Game::HalfIt(g) => half_it_board(ui, g.state(), &palette),
        Game::Progressive(g) => progressive_board(ui, g.state(), &palette),
        Game::Warmup(g) => warmup_board(ui, g.state(), &palette),
    }

    ui.separator();
    for line in app.ui.log.iter().rev() {
        ui.small(line);
    }

    ui.separator();
    let can_undo = game.can_undo();
    let mut command = None;
    ui.horizontal(|ui| {
        if ui.add_enabled(can_undo, egui::Button::new("↶ Undo")).clicked() {
            command = Some(EngineCommand::Undo);
        }
        if ui.button("End game").clicked() {
            command = Some(EngineCommand::EndGame);
        }
    });
    if let Some(cmd) = command {
        app.send(cmd);
    }
}

pub fn darts_text(darts: &[Dart]) -> String {
    darts.iter().map(Dart::to_string).collect::<Vec<_>>().join(" ")
}

/* =========================
   X01
   ========================= */

fn x01_board(ui: &mut egui::Ui, s: &X01State, p: &Palette) {
    ui.label(format!(
        "{} · {} · leg {} · first to {}",
        s.config.start_score,
        if s.config.double_out { "double out" } else { "straight out" },
        s.leg,
        s.config.legs_to_win
    ));

    egui::Grid::new("x01").striped(true).num_columns(6).show(ui, |ui| {
        for h in ["Player", "Left", "Legs", "Avg", "Best", "Checkout"] {
            ui.strong(h);
        }
        ui.end_row();

        for (i, pl) in s.players.iter().enumerate() {
            let current = i == s.current && !s.finished;
            ui.label(p.name(&pl.seat.name, current, pl.is_winner));
            let left = if current { s.live_remaining() } else { pl.remaining };
            ui.label(RichText::new(left.to_string()).heading());
            ui.label(pl.legs_won.to_string());
            ui.label(format!("{:.1}", pl.average()));
            ui.label(pl.highest_turn.to_string());
            ui.label(pl.highest_checkout.to_string());
            ui.end_row();
        }
    });

    if !s.pending.is_empty() {
        ui.label(format!("This turn: {}", darts_text(&s.pending)));
    }
    if let Some(hint) = s.checkout_hint() {
        ui.label(RichText::new(format!("Checkout: {}", darts_text(&hint))).color(p.accent));
    }

    ui.collapsing("Turns", |ui| {
        for t in s.turns.iter().rev().take(15) {
            let who = &s.players[t.player].seat.name;
            let what = if t.bust {
                "bust".to_string()
            } else {
                t.scored.to_string()
            };
            ui.label(format!("{who}: {what} → {}", t.remaining_after));
        }
    });
}

/* =========================
   Cricket
   ========================= */

pub fn marks_symbol(hits: u8) -> &'static str {
    match hits {
        0 => "",
        1 => "/",
        2 => "X",
        _ => "Ⓧ",
    }
}

fn target_label(number: u8) -> String {
    if number == BULL {
        "Bull".into()
    } else {
        number.to_string()
    }
}

fn cricket_board(ui: &mut egui::Ui, s: &CricketState, p: &Palette) {
    ui.label(format!("Round {} · dart {} of 3", s.round, s.darts_in_turn + 1));

    egui::Grid::new("cricket")
        .striped(true)
        .num_columns(s.players.len() + 1)
        .show(ui, |ui| {
            ui.strong("Target");
            for (i, pl) in s.players.iter().enumerate() {
                ui.label(p.name(&pl.seat.name, i == s.current && !s.finished, pl.is_winner));
            }
            ui.end_row();

            for (t, &number) in s.numbers.iter().enumerate() {
                if s.is_revealed(t) {
                    ui.strong(target_label(number));
                } else {
                    ui.strong("?");
                }
                for pl in &s.players {
                    ui.label(RichText::new(marks_symbol(pl.targets[t].hits)).heading());
                }
                ui.end_row();
            }

            ui.strong("Points");
            for pl in &s.players {
                ui.label(RichText::new(pl.points().to_string()).heading());
            }
            ui.end_row();

            ui.strong("MPR");
            for pl in &s.players {
                ui.label(format!("{:.2}", pl.marks_per_round()));
            }
            ui.end_row();
        });
}

/* =========================
   Half-It
   ========================= */

fn half_it_board(ui: &mut egui::Ui, s: &HalfItState, p: &Palette) {
    ui.horizontal_wrapped(|ui| {
        for (i, target) in ROUNDS.iter().enumerate() {
            let text = RichText::new(target.to_string());
            if i == s.round && !s.finished {
                ui.label(text.strong().color(p.accent));
            } else {
                ui.label(text);
            }
        }
    });
    if !s.finished {
        ui.label(format!("Aim for {} (max {})", s.target(), s.target().max_score()));
    }

    egui::Grid::new("half_it").striped(true).num_columns(3).show(ui, |ui| {
        for h in ["Player", "Score", "Halved"] {
            ui.strong(h);
        }
        ui.end_row();

        for (i, pl) in s.players.iter().enumerate() {
            ui.label(p.name(&pl.seat.name, i == s.current && !s.finished, pl.is_winner));
            ui.label(RichText::new(pl.total.to_string()).heading());
            ui.label(pl.halvings.to_string());
            ui.end_row();
        }
    });

    if !s.pending.is_empty() {
        ui.label(format!("This turn: {}", darts_text(&s.pending)));
    }
}

/* =========================
   Progressive Finish
   ========================= */

fn progressive_board(ui: &mut egui::Ui, s: &ProgressiveState, p: &Palette) {
    egui::Grid::new("progressive").num_columns(2).show(ui, |ui| {
        ui.label("Level");
        ui.label(RichText::new(s.level.to_string()).heading());
        ui.end_row();
        ui.label("Target");
        ui.label(RichText::new(s.target.to_string()).heading().color(p.accent));
        ui.end_row();
        ui.label("Remaining");
        ui.label(s.remaining.to_string());
        ui.end_row();
        ui.label("Darts left");
        ui.label(s.darts_left.to_string());
        ui.end_row();
        ui.label("Lives");
        ui.label(format!("{} / {}", s.config.max_failures - s.failures.min(s.config.max_failures), s.config.max_failures));
        ui.end_row();
        ui.label("Best");
        ui.label(s.best_target.to_string());
        ui.end_row();
    });

    ui.separator();
    for (i, pl) in s.players.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(p.name(&pl.seat.name, i == s.current && !s.finished, pl.is_winner));
            ui.label(format!("{} finishes, {} darts", pl.finishes, pl.darts));
        });
    }
}

/* =========================
   Warmup
   ========================= */

fn warmup_board(ui: &mut egui::Ui, s: &WarmupState, p: &Palette) {
    for (i, pl) in s.players.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(p.name(&pl.seat.name, i == s.current && !s.finished, pl.is_winner));
            if pl.step < SEQUENCE_LEN {
                ui.label(format!("aim {}", target_label(pl.target())));
            } else {
                ui.label("done");
            }
            ui.add(
                egui::ProgressBar::new(pl.step as f32 / SEQUENCE_LEN as f32)
                    .desired_width(160.0)
                    .text(format!("{}/{SEQUENCE_LEN}", pl.step.min(SEQUENCE_LEN))),
            );
            ui.label(format!("{:.0}% hits", pl.hit_rate() * 100.0));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_symbols() {
        assert_eq!(marks_symbol(0), "");
        assert_eq!(marks_symbol(2), "X");
        assert_eq!(marks_symbol(3), "Ⓧ");
    }

    #[test]
    fn dart_lists() {
        assert_eq!(darts_text(&[Dart::Triple(20), Dart::Double(BULL), Dart::Miss]), "T20 Bull Miss");
        assert_eq!(target_label(BULL), "Bull");
    }
}
