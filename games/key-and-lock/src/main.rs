#![windows_subsystem = "windows"]

/// Desired window width.
pub const ALL_WIDTH: u32 = 640;
/// Desired window height.
pub const ALL_HEIGHT: u32 = 580;

mod graphics;
mod gui;
mod maze_logic;

use crate::gui::{SessionAction, StartupGui, StartupResult, gui_setup};
use crate::maze_logic::flow::MazeFlow;
use crate::maze_logic::messages::MazeMessage;
use crate::maze_logic::simulation::Direction;
use channel_lib::game_channel::{ChannelState, GameChannel};
use channel_lib::session::SessionPhase;
use macroquad::prelude::{Conf, KeyCode, clear_background, get_frame_time, is_key_pressed, next_frame};

/// Configures window title and size.
fn window_conf() -> Conf {
    Conf {
        window_title: "Key & Lock".to_owned(),
        window_width: ALL_WIDTH as i32,
        window_height: ALL_HEIGHT as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    //! Does the system setup and then runs the core loop, where actions are
    //! decided upon the channel state and the session phase.

    let mut channel: GameChannel<MazeMessage> = GameChannel::generate_channel(
        "ws://127.0.0.1:8080/ws".to_string(),
        "key-and-lock".to_string(),
    );

    let mut flow: Option<MazeFlow> = None;
    let mut room_code = String::new();

    let mut start_up_gui = StartupGui::default();
    gui_setup();
    loop {
        let delta_time = get_frame_time();
        channel.update();

        clear_background(graphics::BACKGROUND);

        match channel.channel_state().clone() {
            ChannelState::Disconnected { error_string } => {
                if let Some(active) = flow.as_mut() {
                    // A transport drop mid-session is terminal; the overlay
                    // shows until the player returns to the lobby.
                    active.mark_disconnected();
                    if update_session(active, &mut channel, &room_code, delta_time) {
                        flow = None;
                    }
                } else if let StartupResult::EnterRoom { code } =
                    start_up_gui.handle_start_up(&error_string)
                {
                    room_code = channel_lib::identity::normalize_room_code(&code);
                    channel.join_room(&code);
                }
            }
            ChannelState::AwaitingSocket | ChannelState::Joining => {
                graphics::print_centered("Connecting to secure frequency...", 280.0, 28.0);
            }
            ChannelState::Subscribed => {
                let active = flow
                    .get_or_insert_with(|| MazeFlow::new(channel.local_id().to_string()));
                let back_to_lobby = update_session(active, &mut channel, &room_code, delta_time);
                if back_to_lobby {
                    // Restart always re-establishes a fresh room and session.
                    channel.leave();
                    flow = None;
                }
            }
        }

        next_frame().await
    }
}

/// The core update for one session frame. Feeds channel events and key
/// presses into the flow, flushes the outbox, then renders according to the
/// session phase. Returns true when the player asked to leave.
fn update_session(
    flow: &mut MazeFlow,
    channel: &mut GameChannel<MazeMessage>,
    room_code: &str,
    delta_time: f32,
) -> bool {
    while let Some(event) = channel.next_event() {
        flow.handle_channel_event(event);
    }

    if flow.phase() == SessionPhase::Playing {
        for (key, direction) in [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
        ] {
            if is_key_pressed(key) {
                flow.handle_direction(direction);
            }
        }
    }

    flow.update(delta_time);

    for message in flow.drain_outbox() {
        channel.broadcast(&message);
    }

    match flow.phase() {
        SessionPhase::Connecting => {
            graphics::print_centered("Connecting to secure frequency...", 280.0, 28.0);
            false
        }
        SessionPhase::Waiting => {
            graphics::print_centered("Waiting for Partner", 240.0, 36.0);
            graphics::print_centered(
                &format!("Share this room code with your teammate: {}", room_code),
                290.0,
                24.0,
            );
            graphics::print_centered(
                "The game will start automatically when they join.",
                330.0,
                20.0,
            );
            false
        }
        phase => {
            if let Some(role) = flow.role() {
                graphics::draw_header(
                    &flow.countdown().formatted(),
                    flow.countdown().remaining() < 60,
                    role,
                );
                graphics::draw_maze(flow.simulation(), role, flow.partner_pos());
            }

            let action = gui::session_panels(phase, flow.banner().map(|b| b.text.as_str()));
            match action {
                SessionAction::Signal(text) => {
                    flow.send_signal(text);
                    false
                }
                SessionAction::BackToLobby => true,
                SessionAction::None => false,
            }
        }
    }
}
