#![windows_subsystem = "windows"]

/// Desired window width.
pub const ALL_WIDTH: u32 = 840;
/// Desired window height.
pub const ALL_HEIGHT: u32 = 620;

mod arena_logic;
mod graphics;
mod gui;

use crate::arena_logic::flow::ArenaFlow;
use crate::arena_logic::messages::ArenaMessage;
use crate::arena_logic::role::ArrowKey;
use crate::gui::{SessionAction, StartupGui, StartupResult, gui_setup};
use channel_lib::game_channel::{ChannelState, GameChannel};
use channel_lib::session::SessionPhase;
use macroquad::prelude::{
    Conf, KeyCode, clear_background, get_frame_time, is_key_pressed, is_key_released, next_frame,
};

/// Configures window title and size.
fn window_conf() -> Conf {
    Conf {
        window_title: "Shared Control".to_owned(),
        window_width: ALL_WIDTH as i32,
        window_height: ALL_HEIGHT as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    //! Does the system setup and then runs the core loop, where actions are
    //! decided upon the channel state and the session phase.

    let mut channel: GameChannel<ArenaMessage> = GameChannel::generate_channel(
        "ws://127.0.0.1:8080/ws".to_string(),
        "shared-control".to_string(),
    );

    let mut flow: Option<ArenaFlow> = None;
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
                graphics::print_centered("Connecting...", 300.0, 28.0);
            }
            ChannelState::Subscribed => {
                let active =
                    flow.get_or_insert_with(|| ArenaFlow::new(channel.local_id().to_string()));
                if update_session(active, &mut channel, &room_code, delta_time) {
                    // Restart always re-establishes a fresh room and session.
                    channel.leave();
                    flow = None;
                }
            }
        }

        next_frame().await
    }
}

/// Feeds the key edges of this frame into the flow. Both the down and the
/// up transition matter: the repurposed action arrows hold their shared
/// flag exactly as long as the key.
fn collect_input(flow: &mut ArenaFlow) {
    for (key, arrow) in [
        (KeyCode::Up, ArrowKey::Up),
        (KeyCode::Down, ArrowKey::Down),
        (KeyCode::Left, ArrowKey::Left),
        (KeyCode::Right, ArrowKey::Right),
    ] {
        if is_key_pressed(key) {
            flow.handle_arrow_edge(arrow, true);
        }
        if is_key_released(key) {
            flow.handle_arrow_edge(arrow, false);
        }
    }

    // The universal action keys, independent of the role mapping.
    if is_key_pressed(KeyCode::Space) {
        flow.handle_jump_edge(true);
    }
    if is_key_released(KeyCode::Space) {
        flow.handle_jump_edge(false);
    }
    for shift in [KeyCode::LeftShift, KeyCode::RightShift] {
        if is_key_pressed(shift) {
            flow.handle_crouch_edge(true);
        }
        if is_key_released(shift) {
            flow.handle_crouch_edge(false);
        }
    }
}

/// The core update for one session frame. Returns true when the player
/// asked to leave.
fn update_session(
    flow: &mut ArenaFlow,
    channel: &mut GameChannel<ArenaMessage>,
    room_code: &str,
    delta_time: f32,
) -> bool {
    while let Some(event) = channel.next_event() {
        flow.handle_channel_event(event);
    }

    collect_input(flow);
    flow.update(delta_time);

    for message in flow.drain_outbox() {
        channel.broadcast(&message);
    }

    match flow.phase() {
        SessionPhase::Connecting => {
            graphics::print_centered("Connecting...", 300.0, 28.0);
            false
        }
        SessionPhase::Waiting => {
            graphics::print_centered("Waiting for Copilot", 260.0, 36.0);
            graphics::print_centered(&format!("Share Room Code: {}", room_code), 310.0, 26.0);
            graphics::print_centered(
                &format!("Players connected: {} / 2", flow.player_count()),
                350.0,
                22.0,
            );
            false
        }
        phase => {
            if let Some(role) = flow.role() {
                graphics::draw_header(flow.countdown().remaining(), role);
                graphics::draw_arena(
                    flow.simulation().position(),
                    flow.jumping(),
                    flow.crouching(),
                    flow.simulation().has_won(),
                );
            }

            match gui::session_panels(phase, flow.countdown().remaining()) {
                SessionAction::BackToLobby => true,
                SessionAction::None => false,
            }
        }
    }
}
