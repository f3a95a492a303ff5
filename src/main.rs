/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::thread_rng;

use config::GameConfig;
use domain::entity::FrameInput;
use sim::bossname::BossNameFetcher;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(8);

fn main() {
    let config = GameConfig::load();

    let mut world = WorldState::new(config, BossNameFetcher::new(None));

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Neon Claw!");
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&world.cfg.gamepad);
    let mut rng = thread_rng();
    let mut last_frame = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();

        match world.phase {
            Phase::Title => {
                if kb.was_pressed(KeyCode::Enter) || gp.confirm_pressed() {
                    world.start_run(&mut rng);
                }
                if kb.was_pressed(KeyCode::Esc) || kb.was_pressed(KeyCode::Char('q')) {
                    break;
                }
            }
            Phase::Playing => {
                if kb.was_pressed(KeyCode::Char('p')) || gp.pause_pressed() {
                    world.paused = !world.paused;
                }
                if kb.was_pressed(KeyCode::Esc) {
                    if world.paused {
                        world.phase = Phase::Title;
                        world.paused = false;
                    } else {
                        world.paused = true;
                    }
                }

                let frame_input = merge_inputs(kb.frame_input(), gp.frame_input());
                let events = step::step(world, &frame_input, dt, &mut rng);
                process_sound_events(sound, &events);
            }
            Phase::GameOver => {
                if kb.was_pressed(KeyCode::Enter) || gp.confirm_pressed() {
                    world.start_run(&mut rng);
                }
                if kb.was_pressed(KeyCode::Esc) {
                    world.phase = Phase::Title;
                }
            }
        }

        renderer.render(&world.snapshot())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// OR the keyboard's and pad's contributions together.
fn merge_inputs(kb: FrameInput, gp: FrameInput) -> FrameInput {
    FrameInput {
        move_left: kb.move_left || gp.move_left,
        move_right: kb.move_right || gp.move_right,
        jump: kb.jump || gp.jump,
        dodge: kb.dodge || gp.dodge,
        attack: kb.attack || gp.attack,
        ultimate: kb.ultimate || gp.ultimate,
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Jumped => sfx.play_jump(),
            GameEvent::DoubleJumped => sfx.play_double_jump(),
            GameEvent::NoStamina => sfx.play_no_stamina(),
            GameEvent::Dodged => sfx.play_dodge(),
            GameEvent::AttackSwung => sfx.play_slash(),
            GameEvent::PlayerHit { .. } => sfx.play_hit(),
            GameEvent::ShieldBroken => sfx.play_shield_break(),
            GameEvent::SpringBounced => sfx.play_spring(),
            GameEvent::SpikeHit => sfx.play_hit(),
            GameEvent::FellOut => sfx.play_hit(),
            GameEvent::ItemCollected { .. } => sfx.play_collect(),
            GameEvent::UltimateFired => sfx.play_shoot(),
            GameEvent::UltimateExploded { .. } => sfx.play_explosion(),
            GameEvent::EnemyFired => sfx.play_shoot(),
            GameEvent::EnemyDied { .. } => sfx.play_enemy_die(),
            GameEvent::BossSpawned { .. } => sfx.play_boss_alarm(),
            GameEvent::BossDied => sfx.play_boss_die(),
            GameEvent::RunEnded => sfx.play_game_over(),
            _ => {}
        }
    }
}
