/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound/flash cues;
/// nothing in the simulation reads them back.

use crate::domain::entity::{EnemyKind, ItemKind};

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    Jumped,
    DoubleJumped,
    /// A stamina-gated action was refused.
    NoStamina,
    Dodged,
    AttackSwung,
    MeleeHit { x: f32, y: f32 },
    PlayerHit { amount: f32 },
    ShieldBroken,
    SpringBounced,
    SpikeHit,
    /// Fell out of the world and respawned at the top.
    FellOut,
    ItemCollected { kind: ItemKind },
    UltimateFired,
    UltimateExploded { x: f32, y: f32 },
    EnemyFired,
    EnemyDied { kind: EnemyKind, x: f32, y: f32 },
    BossSpawned { name: String },
    BossDied,
    DifficultyRaised { level: u32 },
    RunEnded,
}
