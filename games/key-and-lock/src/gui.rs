//! Contains the egui helpers: the lobby screen, the in-game signal buttons
//! and the full screen overlays for the terminal states.

use channel_lib::identity::generate_room_code;
use channel_lib::session::SessionPhase;
use egui_macroquad::egui;

/// Defines the global style for the GUI, mostly sets font sizes.
pub fn gui_setup() {
    egui_macroquad::ui(|egui_ctx| {
        let mut style = (*egui_ctx.style()).clone();

        style.text_styles = [
            (egui::TextStyle::Body, egui::FontId::proportional(18.0)),
            (egui::TextStyle::Button, egui::FontId::proportional(18.0)),
            (egui::TextStyle::Heading, egui::FontId::proportional(24.0)),
            (egui::TextStyle::Monospace, egui::FontId::monospace(16.0)),
            (egui::TextStyle::Small, egui::FontId::proportional(14.0)),
        ]
        .into();

        style.visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_style(style);
    });
}

/// The internal state of the lobby gui contains the typed room code.
#[derive(Default)]
pub struct StartupGui {
    room_code: String,
}

/// The result that returns of the start-up process.
pub enum StartupResult {
    /// The player has not decided yet.
    Pending,
    /// The player wants to enter the room with this code, freshly generated
    /// or typed. The room comes into being with the first member.
    EnterRoom { code: String },
}

impl StartupGui {
    /// Run handler for the immediate mode egui. The error is an optional string that can be set,
    /// if we return to this screen from a network error.
    pub fn handle_start_up(&mut self, error: &Option<String>) -> StartupResult {
        let mut result = StartupResult::Pending;

        egui_macroquad::ui(|egui_ctx| {
            egui::CentralPanel::default().show(egui_ctx, |ui| {
                ui.vertical(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Key & Lock");
                    });
                    ui.label("A cooperative game of trust and communication. Two players, asymmetric information, one goal.");
                    ui.add_space(30.0);

                    ui.horizontal(|ui| {
                        ui.label("Room code:");
                        ui.add_space(10.0);
                        ui.text_edit_singleline(&mut self.room_code);
                    });
                    ui.add_space(20.0);

                    ui.horizontal(|ui| {
                        ui.add_space(75.0);
                        if ui.button("Create Room").clicked() {
                            result = StartupResult::EnterRoom {
                                code: generate_room_code(),
                            };
                        }
                        ui.add_space(20.0);
                        if ui.button("Join Room").clicked() && !self.room_code.trim().is_empty() {
                            result = StartupResult::EnterRoom {
                                code: self.room_code.clone(),
                            };
                        }
                    });

                    ui.add_space(50.0);
                    if let Some(error_str) = error {
                        ui.label(egui::RichText::new(error_str).color(egui::Color32::RED));
                    }
                });
            });
        });
        egui_macroquad::draw();
        result
    }
}

/// What the in-session gui asked for this frame.
pub enum SessionAction {
    None,
    /// One of the coordination calls was clicked.
    Signal(&'static str),
    /// The overlay button was clicked; tear the session down.
    BackToLobby,
}

/// The in-session panels: signal buttons while playing, a full screen
/// overlay once the session hit a terminal phase.
pub fn session_panels(phase: SessionPhase, banner: Option<&str>) -> SessionAction {
    let mut result = SessionAction::None;

    egui_macroquad::ui(|egui_ctx| {
        if phase == SessionPhase::Playing {
            egui::TopBottomPanel::bottom("signals").show(egui_ctx, |ui| {
                ui.horizontal(|ui| {
                    for signal in ["STOP", "GO", "CARRY"] {
                        if ui.button(signal).clicked() {
                            result = SessionAction::Signal(signal);
                        }
                    }
                    if let Some(text) = banner {
                        ui.add_space(20.0);
                        ui.label(egui::RichText::new(text).color(egui::Color32::YELLOW));
                    }
                });
            });
        }

        let overlay = match phase {
            SessionPhase::Won => Some(("MISSION COMPLETE!", "Play Again")),
            SessionPhase::Lost => Some(("MISSION FAILED", "Try Again")),
            SessionPhase::Disconnected => Some(("CONNECTION LOST", "Back to Lobby")),
            _ => None,
        };
        if let Some((title, button)) = overlay {
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(egui_ctx, |ui| {
                    if phase == SessionPhase::Lost {
                        ui.label("You ran out of time or hit a trap.");
                    }
                    if ui.button(button).clicked() {
                        result = SessionAction::BackToLobby;
                    }
                });
        }
    });
    egui_macroquad::draw();
    result
}
