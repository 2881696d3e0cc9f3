use anyhow::{bail, Context};
use eframe::egui;
use std::fs;
use std::path::Path;

use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::storage::DATA_DIR_ENV;
use crate::model::game_save::Envelope;
use crate::model::player::{Player, PlayerId};
use crate::ui::app::{Screen, WeDartApp};

const EXPORT_VERSION: u32 = 1;

pub fn draw_left_panel(ctx: &egui::Context, app: &mut WeDartApp) {
    egui::SidePanel::left("left")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("🎯 WeDart");
            ui.separator();

            let has_game = app.engine.game().is_some();
            let screen = &mut app.ui.screen;

            ui.selectable_value(screen, Screen::Home, "Home");
            ui.selectable_value(screen, Screen::Players, "Players");
            if has_game {
                ui.selectable_value(screen, Screen::Game, "Game");
            }
            ui.selectable_value(screen, Screen::Settings, "Settings");

            ui.separator();

            ui.label("UI Scale");
            ui.add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0));

            if ui.button("🎨 Theme").clicked() {
                app.ui.show_theme_window = !app.ui.show_theme_window;
            }

            ui.separator();

            ui.label(format!("{} players", app.engine.roster().players().len()));
            egui::ScrollArea::vertical().show(ui, |ui| {
                for p in app.engine.roster().players() {
                    ui.label(format!("• {}", p.name));
                }
            });
        });
}

/* =========================
   Players screen
   ========================= */

pub fn draw_players(ui: &mut egui::Ui, app: &mut WeDartApp) {
    ui.heading("Players");

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.ui.new_player_name).hint_text("New player name"),
        );
        let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("➕ Add").clicked() || enter {
            let name = app.ui.new_player_name.trim().to_string();
            if !name.is_empty() {
                let resp = app.send(EngineCommand::AddPlayer(name));
                if resp == EngineResponse::RosterUpdated {
                    app.ui.new_player_name.clear();
                    app.ui.status = None;
                }
            }
        }
    });

    if let Some(msg) = &app.ui.status {
        ui.colored_label(app.settings.color("Accent"), msg);
    }

    ui.separator();

    let mut command: Option<EngineCommand> = None;
    let mut start_rename: Option<(PlayerId, String)> = None;
    let mut cancel_rename = false;

    egui::Grid::new("roster")
        .striped(true)
        .num_columns(7)
        .show(ui, |ui| {
            for h in ["Name", "Games", "Won", "Win %", "Avg", "MPR", ""] {
                ui.strong(h);
            }
            ui.end_row();

            for p in app.engine.roster().players() {
                match &mut app.ui.renaming {
                    Some((id, text)) if *id == p.id => {
                        ui.text_edit_singleline(text);
                    }
                    _ => {
                        ui.label(&p.name);
                    }
                }

                let s = &p.stats;
                ui.label(s.games_played.to_string());
                ui.label(s.games_won.to_string());
                ui.label(format!("{:.0}", s.win_rate() * 100.0));
                ui.label(format!("{:.1}", s.average()));
                ui.label(format!("{:.2}", s.marks_per_round()));

                ui.horizontal(|ui| match &app.ui.renaming {
                    Some((id, text)) if *id == p.id => {
                        if ui.small_button("✔").clicked() {
                            command = Some(EngineCommand::RenamePlayer {
                                id: p.id,
                                name: text.clone(),
                            });
                        }
                        if ui.small_button("✖").clicked() {
                            cancel_rename = true;
                        }
                    }
                    _ => {
                        if ui.small_button("✏").on_hover_text("Rename").clicked() {
                            start_rename = Some((p.id, p.name.clone()));
                        }
                        if ui.small_button("❌").on_hover_text("Remove").clicked() {
                            command = Some(EngineCommand::RemovePlayer(p.id));
                        }
                    }
                });
                ui.end_row();
            }
        });

    if start_rename.is_some() {
        app.ui.renaming = start_rename;
    }
    if cancel_rename {
        app.ui.renaming = None;
    }
    if let Some(cmd) = command {
        let renaming = matches!(cmd, EngineCommand::RenamePlayer { .. });
        let resp = app.send(cmd);
        if renaming && resp == EngineResponse::RosterUpdated {
            app.ui.renaming = None;
        }
    }

    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("💾 Export…").clicked() {
            export_roster(app);
        }
        if ui.button("📂 Import…").clicked() {
            import_roster(app);
        }
    });
    ui.small(format!("Data is kept in the platform data folder, or ${DATA_DIR_ENV}."));
}

/* =========================
   Backup
   ========================= */

fn export_roster(app: &mut WeDartApp) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .set_file_name("wedart-players.json")
        .save_file()
    else {
        return;
    };

    match write_roster(&path, app.engine.roster().players()) {
        Ok(()) => {
            log::info!("roster exported to {}", path.display());
            app.ui.status = Some(format!("Exported to {}", path.display()));
        }
        Err(e) => {
            log::error!("roster export failed: {e:#}");
            app.ui.status = Some(format!("{e:#}"));
        }
    }
}

fn import_roster(app: &mut WeDartApp) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .pick_file()
    else {
        return;
    };

    match read_roster(&path) {
        Ok(players) => {
            app.send(EngineCommand::ImportPlayers(players));
        }
        Err(e) => {
            log::error!("roster import failed: {e:#}");
            app.ui.status = Some(format!("{e:#}"));
        }
    }
}

fn write_roster(path: &Path, players: &[Player]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&Envelope {
        version: EXPORT_VERSION,
        data: players,
    })
    .context("serialising players")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn read_roster(path: &Path) -> anyhow::Result<Vec<Player>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let env: Envelope<Vec<Player>> =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a player backup", path.display()))?;
    if env.version != EXPORT_VERSION {
        bail!("unsupported backup version {}", env.version);
    }
    Ok(env.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("wedart-backup-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn backup_round_trip() {
        let path = temp_file();
        let mut ann = Player::new("Ann");
        ann.stats.games_played = 4;
        let players = vec![ann, Player::new("Bob")];

        write_roster(&path, &players).unwrap();
        assert_eq!(read_roster(&path).unwrap(), players);
        fs::remove_file(path).ok();
    }

    #[test]
    fn foreign_file_is_rejected() {
        let path = temp_file();
        fs::write(&path, r#"{"version":7,"data":[]}"#).unwrap();
        let err = read_roster(&path).unwrap_err();
        assert!(err.to_string().contains("version 7"));

        fs::write(&path, "[1, 2").unwrap();
        assert!(read_roster(&path).is_err());
        fs::remove_file(path).ok();
    }
}
