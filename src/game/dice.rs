use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// Launch state of one die
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Die {
    pub position: Vector3,
    pub quaternion: Quaternion,
    pub velocity: Vector3,
    pub angular_velocity: Vector3,
}

/// Outcome of a throw: the scene the client animates and the faces the dice settle on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceThrow {
    pub gravity: Vector3,
    pub ground_position: Vector3,
    pub dice: Vec<Die>,
    pub values: Vec<u8>,
}

impl DiceThrow {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub const GRAVITY: Vector3 = Vector3::new(0.0, -9.82, 0.0);
pub const GROUND_POSITION: Vector3 = Vector3::new(0.0, 0.0, 0.0);

/// Source of dice throws. Throws are stateless, so implementations are shared across games.
pub trait DiceProvider: Send + Sync {
    fn throw(&self, number_of_dice: u8) -> DiceThrow;
}

/// Throws with uniformly random faces and randomised launch vectors
#[derive(Debug, Default)]
pub struct RandomDiceProvider;

impl RandomDiceProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DiceProvider for RandomDiceProvider {
    fn throw(&self, number_of_dice: u8) -> DiceThrow {
        let mut rng = rand::rng();

        let values: Vec<u8> = (0..number_of_dice)
            .map(|_| rng.random_range(1..=6))
            .collect();
        let dice = (0..number_of_dice)
            .map(|i| launch_state(&mut rng, i))
            .collect();

        DiceThrow {
            gravity: GRAVITY,
            ground_position: GROUND_POSITION,
            dice,
            values,
        }
    }
}

/// Dice are launched from a row above the table with some spin
fn launch_state<R: Rng>(rng: &mut R, index: u8) -> Die {
    let (x, y, z, w) = (
        spread(rng, 1.0),
        spread(rng, 1.0),
        spread(rng, 1.0),
        spread(rng, 1.0),
    );
    let norm = (x * x + y * y + z * z + w * w).sqrt().max(f32::EPSILON);

    Die {
        position: Vector3::new(index as f32 * 1.5 - 3.75, 4.0 + spread(rng, 0.5), 6.0),
        quaternion: Quaternion {
            x: x / norm,
            y: y / norm,
            z: z / norm,
            w: w / norm,
        },
        velocity: Vector3::new(spread(rng, 1.0), 2.0, -8.0 + spread(rng, 2.0)),
        angular_velocity: Vector3::new(spread(rng, 10.0), spread(rng, 10.0), spread(rng, 10.0)),
    }
}

fn spread<R: Rng>(rng: &mut R, range: f32) -> f32 {
    rng.random_range(-range..=range)
}

/// Replays scripted faces in order, for tests and deterministic replays.
///
/// Each throw takes the next script entry and uses its first `number_of_dice`
/// faces, padding with ones when the entry is short. Once the script runs out
/// every die lands on one.
#[derive(Debug, Default)]
pub struct FixedDiceProvider {
    script: Mutex<std::collections::VecDeque<Vec<u8>>>,
}

impl FixedDiceProvider {
    pub fn new(script: Vec<Vec<u8>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    pub fn push(&self, faces: Vec<u8>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(faces);
        }
    }
}

impl DiceProvider for FixedDiceProvider {
    fn throw(&self, number_of_dice: u8) -> DiceThrow {
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_default();

        let values: Vec<u8> = (0..number_of_dice as usize)
            .map(|i| next.get(i).copied().unwrap_or(1))
            .collect();

        DiceThrow {
            gravity: GRAVITY,
            ground_position: GROUND_POSITION,
            dice: vec![Die::default(); number_of_dice as usize],
            values,
        }
    }
}
