use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use clash_conquer_core::{Armament, Command, Damage, Health, Side, WorldPoint};
use clash_conquer_world::Config;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;

/// Scenario used when the caller does not provide one.
const BUILTIN_SCENARIO: &str = include_str!("../scenarios/skirmish.toml");

const DEFAULT_TICK_MILLIS: u64 = 100;

/// Errors raised while loading or validating a scenario file.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario {}", path.display())]
    Read {
        /// Location that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The scenario is not valid TOML or does not match the expected layout.
    #[error("failed to parse scenario")]
    Parse(#[from] toml::de::Error),
    /// Ticks must advance time.
    #[error("tick_millis must be positive")]
    ZeroTickLength,
    /// A deployed target has a NaN or infinite coordinate.
    #[error("{entity} #{index} must have a finite position")]
    InvalidPosition {
        /// Table the entry belongs to.
        entity: &'static str,
        /// Zero-based position within the table.
        index: usize,
    },
    /// A deployed target starts without health.
    #[error("{entity} #{index} must start with positive health")]
    NoHealth {
        /// Table the entry belongs to.
        entity: &'static str,
        /// Zero-based position within the table.
        index: usize,
    },
    /// An armament cannot produce a valid shot.
    #[error("{entity} #{index} has an invalid armament: {reason}")]
    InvalidArmament {
        /// Table the entry belongs to.
        entity: &'static str,
        /// Zero-based position within the table.
        index: usize,
        /// Offending setting.
        reason: &'static str,
    },
    /// Wave bounds are inverted or not finite.
    #[error("wave {field} bounds are invalid")]
    InvalidWave {
        /// Name of the offending bound pair.
        field: &'static str,
    },
}

/// Opening layout of a skirmish.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default = "default_tick_millis")]
    tick_millis: u64,
    #[serde(default)]
    fortifications: Vec<TargetConfig>,
    #[serde(default)]
    troops: Vec<TargetConfig>,
    #[serde(default)]
    wave: Option<WaveConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct TargetConfig {
    side: Side,
    position: [f32; 2],
    health: u32,
    #[serde(default)]
    armament: Option<ArmamentConfig>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ArmamentConfig {
    range: f32,
    cooldown_millis: u64,
    damage: u32,
    projectile_speed: f32,
}

impl ArmamentConfig {
    fn validate(&self, entity: &'static str, index: usize) -> Result<(), ScenarioError> {
        let reason = if !(self.range.is_finite() && self.range > 0.0) {
            Some("range must be positive")
        } else if !(self.projectile_speed.is_finite() && self.projectile_speed > 0.0) {
            Some("projectile_speed must be positive")
        } else if self.projectile_speed > Config::default().max_reliable_speed() {
            Some("projectile_speed would step over targets")
        } else if self.damage == 0 {
            Some("damage must be positive")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ScenarioError::InvalidArmament {
                entity,
                index,
                reason,
            }),
            None => Ok(()),
        }
    }

    fn armament(&self) -> Armament {
        Armament::new(
            self.range,
            Duration::from_millis(self.cooldown_millis),
            Damage::new(self.damage),
            self.projectile_speed,
        )
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct WaveConfig {
    #[serde(default = "default_wave_side")]
    side: Side,
    count: u32,
    x: f32,
    y_min: f32,
    y_max: f32,
    health_min: u32,
    health_max: u32,
    #[serde(default)]
    armament: Option<ArmamentConfig>,
}

fn default_tick_millis() -> u64 {
    DEFAULT_TICK_MILLIS
}

fn default_wave_side() -> Side {
    Side::Enemy
}

impl Scenario {
    /// Reads and validates a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Scenario bundled with the binary.
    pub(crate) fn builtin() -> Result<Self, ScenarioError> {
        Self::from_toml_str(BUILTIN_SCENARIO)
    }

    /// Parses and validates a scenario from TOML text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.tick_millis == 0 {
            return Err(ScenarioError::ZeroTickLength);
        }

        for (entity, entries) in [
            ("fortification", &self.fortifications),
            ("troop", &self.troops),
        ] {
            for (index, entry) in entries.iter().enumerate() {
                if !entry.position.iter().all(|coordinate| coordinate.is_finite()) {
                    return Err(ScenarioError::InvalidPosition { entity, index });
                }
                if entry.health == 0 {
                    return Err(ScenarioError::NoHealth { entity, index });
                }
                if let Some(armament) = &entry.armament {
                    armament.validate(entity, index)?;
                }
            }
        }

        if let Some(wave) = &self.wave {
            if !(wave.x.is_finite()
                && wave.y_min.is_finite()
                && wave.y_max.is_finite()
                && wave.y_min <= wave.y_max)
            {
                return Err(ScenarioError::InvalidWave { field: "position" });
            }
            if wave.health_min == 0 || wave.health_min > wave.health_max {
                return Err(ScenarioError::InvalidWave { field: "health" });
            }
            if let Some(armament) = &wave.armament {
                armament.validate("wave", 0)?;
            }
        }

        Ok(())
    }

    /// Simulated time covered by a single tick.
    pub(crate) fn tick_length(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Commands that deploy the scenario onto an empty world.
    ///
    /// Fortifications come first, then troops, then the generated wave, so
    /// target identifiers follow the file order.
    pub(crate) fn deployment(&self, seed: u64) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.fortifications.len() + self.troops.len());

        commands.extend(
            self.fortifications
                .iter()
                .map(|entry| Command::RaiseFortification {
                    side: entry.side,
                    position: WorldPoint::new(entry.position[0], entry.position[1]),
                    health: Health::new(entry.health),
                    armament: entry.armament.as_ref().map(ArmamentConfig::armament),
                }),
        );
        commands.extend(self.troops.iter().map(|entry| Command::DeployTroop {
            side: entry.side,
            position: WorldPoint::new(entry.position[0], entry.position[1]),
            health: Health::new(entry.health),
            armament: entry.armament.as_ref().map(ArmamentConfig::armament),
        }));

        if let Some(wave) = &self.wave {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let armament = wave.armament.as_ref().map(ArmamentConfig::armament);
            for _ in 0..wave.count {
                let y = rng.gen_range(wave.y_min..=wave.y_max);
                let health = rng.gen_range(wave.health_min..=wave.health_max);
                commands.push(Command::DeployTroop {
                    side: wave.side,
                    position: WorldPoint::new(wave.x, y),
                    health: Health::new(health),
                    armament,
                });
            }
        }

        commands
    }
}
