//! Contains the egui helpers: the gated lobby screen and the full screen
//! overlays for the terminal states.

use crate::arena_logic::access::is_allowed;
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

/// The internal state of the lobby gui: the tester handle for the entry
/// gate and the typed room code.
#[derive(Default)]
pub struct StartupGui {
    handle: String,
    room_code: String,
    access_denied: bool,
}

/// The result that returns of the start-up process.
pub enum StartupResult {
    /// The player has not decided yet (or was turned away at the gate).
    Pending,
    /// The gate passed; enter the room with this code.
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
                        ui.heading("Shared Control");
                    });
                    ui.label("One avatar, two pilots. You steer one axis, your copilot the other.");
                    ui.label("Closed beta: enter your tester handle.");
                    ui.add_space(30.0);

                    ui.horizontal(|ui| {
                        ui.label("Handle:");
                        ui.add_space(10.0);
                        ui.text_edit_singleline(&mut self.handle);
                    });
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        ui.label("Room code:");
                        ui.add_space(10.0);
                        ui.text_edit_singleline(&mut self.room_code);
                    });
                    ui.add_space(20.0);

                    ui.horizontal(|ui| {
                        ui.add_space(75.0);
                        if ui.button("Create Room").clicked() {
                            result = self.gated_entry(generate_room_code());
                        }
                        ui.add_space(20.0);
                        if ui.button("Join Room").clicked() && !self.room_code.trim().is_empty() {
                            result = self.gated_entry(self.room_code.clone());
                        }
                    });

                    ui.add_space(50.0);
                    if self.access_denied {
                        ui.label(
                            egui::RichText::new(
                                "Access Denied: This game is for specific testers only.",
                            )
                            .color(egui::Color32::RED),
                        );
                    }
                    if let Some(error_str) = error {
                        ui.label(egui::RichText::new(error_str).color(egui::Color32::RED));
                    }
                });
            });
        });
        egui_macroquad::draw();
        result
    }

    /// The entry gate sits here, before any channel is opened.
    fn gated_entry(&mut self, code: String) -> StartupResult {
        if is_allowed(&self.handle) {
            self.access_denied = false;
            StartupResult::EnterRoom { code }
        } else {
            self.access_denied = true;
            StartupResult::Pending
        }
    }
}

/// What the in-session gui asked for this frame.
pub enum SessionAction {
    None,
    /// The overlay button was clicked; tear the session down.
    BackToLobby,
}

/// The overlay once the session hit a terminal phase.
pub fn session_panels(phase: SessionPhase, seconds_left: u32) -> SessionAction {
    let mut result = SessionAction::None;

    egui_macroquad::ui(|egui_ctx| {
        let overlay = match phase {
            SessionPhase::Won => Some(("VICTORY!", "Play Again")),
            SessionPhase::Lost => Some(("TIME UP!", "Try Again")),
            SessionPhase::Disconnected => Some(("CONNECTION LOST", "Back to Lobby")),
            _ => None,
        };
        if let Some((title, button)) = overlay {
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(egui_ctx, |ui| {
                    if phase == SessionPhase::Won {
                        ui.label(format!("Time Remaining: {}s", seconds_left));
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
