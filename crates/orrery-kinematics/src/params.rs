//! User-tunable simulation parameters with validated mutation and change
//! notification.
//!
//! [`ParameterStore`] is the only mutation path. The kinematics pipeline reads a
//! [`SimulationParameters`] snapshot once per frame.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KinematicsError;
use crate::orientation::REFERENCE_ROTATION_SPEED;

/// Allowed range for the rotation speed multiplier.
pub const ROTATION_SPEED_RANGE: RangeInclusive<f64> = 0.0..=200.0;
/// Allowed range for the atmosphere glow intensity.
pub const ATMOSPHERE_INTENSITY_RANGE: RangeInclusive<f64> = 0.0..=3.0;
/// Allowed range for the Moon's orbital inclination in degrees.
pub const MOON_INCLINATION_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// Scene overlays that can be toggled and recolored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Perihelion,
    Aphelion,
    WinterSolstice,
    SummerSolstice,
    EarthOrbit,
    MoonOrbit,
    /// Line between the Moon and Earth.
    MoonLink,
    EarthAxis,
}

impl Marker {
    pub const ALL: [Marker; 8] = [
        Marker::Perihelion,
        Marker::Aphelion,
        Marker::WinterSolstice,
        Marker::SummerSolstice,
        Marker::EarthOrbit,
        Marker::MoonOrbit,
        Marker::MoonLink,
        Marker::EarthAxis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Marker::Perihelion => "perihelion",
            Marker::Aphelion => "aphelion",
            Marker::WinterSolstice => "winter_solstice",
            Marker::SummerSolstice => "summer_solstice",
            Marker::EarthOrbit => "earth_orbit",
            Marker::MoonOrbit => "moon_orbit",
            Marker::MoonLink => "moon_link",
            Marker::EarthAxis => "earth_axis",
        }
    }

    fn default_color(self) -> [f32; 3] {
        match self {
            Marker::Perihelion => [1.0, 0.35, 0.2],
            Marker::Aphelion => [0.2, 0.5, 1.0],
            Marker::WinterSolstice => [0.7, 0.9, 1.0],
            Marker::SummerSolstice => [1.0, 0.85, 0.3],
            Marker::EarthOrbit => [0.5, 0.5, 0.5],
            Marker::MoonOrbit => [0.4, 0.4, 0.4],
            Marker::MoonLink => [1.0, 1.0, 1.0],
            Marker::EarthAxis => [1.0, 0.0, 0.0],
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Marker {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Marker::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| KinematicsError::invalid(s, "unknown marker"))
    }
}

/// Snapshot of every user-tunable value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Earth spin multiplier; also drives revolution and the Sun's spin.
    pub rotation_speed: f64,
    pub paused: bool,
    /// Passed through to the renderer's atmosphere shader.
    pub atmosphere_intensity: f64,
    pub moon_orbit_inclination_deg: f64,
    pub visibility: BTreeMap<Marker, bool>,
    /// Linear RGB overrides per marker.
    pub colors: BTreeMap<Marker, [f32; 3]>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            rotation_speed: 1.0,
            paused: false,
            atmosphere_intensity: 1.0,
            moon_orbit_inclination_deg: 5.1,
            visibility: Marker::ALL.into_iter().map(|m| (m, true)).collect(),
            colors: Marker::ALL
                .into_iter()
                .map(|m| (m, m.default_color()))
                .collect(),
        }
    }
}

impl SimulationParameters {
    /// Moon inclination in radians.
    pub fn moon_orbit_inclination(&self) -> f64 {
        self.moon_orbit_inclination_deg.to_radians()
    }

    pub fn is_visible(&self, marker: Marker) -> bool {
        self.visibility.get(&marker).copied().unwrap_or(true)
    }

    pub fn color(&self, marker: Marker) -> [f32; 3] {
        self.colors
            .get(&marker)
            .copied()
            .unwrap_or_else(|| marker.default_color())
    }

    /// How much faster than the reference speed the animation runs.
    pub fn speed_factor(&self) -> f64 {
        self.rotation_speed / REFERENCE_ROTATION_SPEED
    }

    /// GUI readout, e.g. `"rotation sped up by 5.0 times"`.
    pub fn speed_label(&self) -> String {
        format!("rotation sped up by {:.1} times", self.speed_factor())
    }

    /// Reads one field.
    pub fn get(&self, key: ParamKey) -> ParamValue {
        match key {
            ParamKey::RotationSpeed => ParamValue::Scalar(self.rotation_speed),
            ParamKey::Paused => ParamValue::Flag(self.paused),
            ParamKey::AtmosphereIntensity => ParamValue::Scalar(self.atmosphere_intensity),
            ParamKey::MoonOrbitInclination => ParamValue::Scalar(self.moon_orbit_inclination_deg),
            ParamKey::Visibility(m) => ParamValue::Flag(self.is_visible(m)),
            ParamKey::Color(m) => ParamValue::Color(self.color(m)),
        }
    }

    /// Checks every field against its declared range.
    pub fn validate(&self) -> Result<(), KinematicsError> {
        for key in ParamKey::all() {
            key.validate(&self.get(key))?;
        }
        Ok(())
    }

    fn write(&mut self, key: ParamKey, value: ParamValue) {
        match (key, value) {
            (ParamKey::RotationSpeed, ParamValue::Scalar(v)) => self.rotation_speed = v,
            (ParamKey::Paused, ParamValue::Flag(v)) => self.paused = v,
            (ParamKey::AtmosphereIntensity, ParamValue::Scalar(v)) => {
                self.atmosphere_intensity = v;
            }
            (ParamKey::MoonOrbitInclination, ParamValue::Scalar(v)) => {
                self.moon_orbit_inclination_deg = v;
            }
            (ParamKey::Visibility(m), ParamValue::Flag(v)) => {
                self.visibility.insert(m, v);
            }
            (ParamKey::Color(m), ParamValue::Color(c)) => {
                self.colors.insert(m, c);
            }
            // Rejected by `ParamKey::validate` before we get here.
            _ => {}
        }
    }
}

/// Addresses a single parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    RotationSpeed,
    Paused,
    AtmosphereIntensity,
    MoonOrbitInclination,
    Visibility(Marker),
    Color(Marker),
}

impl ParamKey {
    /// Every addressable key, scalars first.
    pub fn all() -> impl Iterator<Item = ParamKey> {
        [
            ParamKey::RotationSpeed,
            ParamKey::Paused,
            ParamKey::AtmosphereIntensity,
            ParamKey::MoonOrbitInclination,
        ]
        .into_iter()
        .chain(Marker::ALL.into_iter().map(ParamKey::Visibility))
        .chain(Marker::ALL.into_iter().map(ParamKey::Color))
    }

    fn validate(&self, value: &ParamValue) -> Result<(), KinematicsError> {
        let in_range = |range: RangeInclusive<f64>| match value {
            ParamValue::Scalar(v) if range.contains(v) => Ok(()),
            ParamValue::Scalar(v) => Err(KinematicsError::invalid(
                self.to_string(),
                format!(
                    "{v} is outside [{}, {}]",
                    range.start(),
                    range.end()
                ),
            )),
            other => Err(KinematicsError::invalid(
                self.to_string(),
                format!("expected a number, got {other:?}"),
            )),
        };

        match self {
            ParamKey::RotationSpeed => in_range(ROTATION_SPEED_RANGE),
            ParamKey::AtmosphereIntensity => in_range(ATMOSPHERE_INTENSITY_RANGE),
            ParamKey::MoonOrbitInclination => in_range(MOON_INCLINATION_RANGE),
            ParamKey::Paused | ParamKey::Visibility(_) => match value {
                ParamValue::Flag(_) => Ok(()),
                other => Err(KinematicsError::invalid(
                    self.to_string(),
                    format!("expected a flag, got {other:?}"),
                )),
            },
            ParamKey::Color(_) => match value {
                ParamValue::Color(rgb) if rgb.iter().all(|c| (0.0..=1.0).contains(c)) => Ok(()),
                ParamValue::Color(rgb) => Err(KinematicsError::invalid(
                    self.to_string(),
                    format!("color components must be in [0, 1], got {rgb:?}"),
                )),
                other => Err(KinematicsError::invalid(
                    self.to_string(),
                    format!("expected a color, got {other:?}"),
                )),
            },
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::RotationSpeed => f.write_str("rotation_speed"),
            ParamKey::Paused => f.write_str("paused"),
            ParamKey::AtmosphereIntensity => f.write_str("atmosphere_intensity"),
            ParamKey::MoonOrbitInclination => f.write_str("moon_orbit_inclination_deg"),
            ParamKey::Visibility(m) => write!(f, "visibility.{m}"),
            ParamKey::Color(m) => write!(f, "color.{m}"),
        }
    }
}

impl FromStr for ParamKey {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rotation_speed" => Ok(ParamKey::RotationSpeed),
            "paused" => Ok(ParamKey::Paused),
            "atmosphere_intensity" => Ok(ParamKey::AtmosphereIntensity),
            "moon_orbit_inclination_deg" => Ok(ParamKey::MoonOrbitInclination),
            _ => {
                if let Some(name) = s.strip_prefix("visibility.") {
                    Ok(ParamKey::Visibility(name.parse()?))
                } else if let Some(name) = s.strip_prefix("color.") {
                    Ok(ParamKey::Color(name.parse()?))
                } else {
                    Err(KinematicsError::invalid(s, "unknown parameter"))
                }
            }
        }
    }
}

/// A parameter value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Scalar(f64),
    Flag(bool),
    Color([f32; 3]),
}

/// Delivered to observers after a successful change.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamChange {
    pub key: ParamKey,
    pub old: ParamValue,
    pub new: ParamValue,
}

/// Handle returned by [`ParameterStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&ParamChange)>;

/// Owns the live [`SimulationParameters`] and notifies observers on change.
///
/// Observers run synchronously inside [`set`](Self::set) and
/// [`reset`](Self::reset), in subscription order.
pub struct ParameterStore {
    current: SimulationParameters,
    defaults: SimulationParameters,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl ParameterStore {
    /// Creates a store holding the documented defaults.
    pub fn new() -> Self {
        Self {
            current: SimulationParameters::default(),
            defaults: SimulationParameters::default(),
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Starts from `initial` instead of the defaults. [`reset`](Self::reset)
    /// still restores the documented defaults.
    pub fn with_initial(initial: SimulationParameters) -> Result<Self, KinematicsError> {
        initial.validate()?;
        Ok(Self {
            current: initial,
            ..Self::new()
        })
    }

    /// Read-only view for the current frame.
    pub fn parameters(&self) -> &SimulationParameters {
        &self.current
    }

    pub fn get(&self, key: ParamKey) -> ParamValue {
        self.current.get(key)
    }

    /// Validates and applies `value`.
    ///
    /// Returns `Ok(true)` if the value changed and observers were notified,
    /// `Ok(false)` if it already held that value. On error nothing changes.
    pub fn set(&mut self, key: ParamKey, value: ParamValue) -> Result<bool, KinematicsError> {
        key.validate(&value)?;

        let old = self.current.get(key);
        if old == value {
            return Ok(false);
        }

        self.current.write(key, value);
        debug!(%key, ?old, new = ?value, "Parameter changed");
        self.notify(&ParamChange {
            key,
            old,
            new: value,
        });
        Ok(true)
    }

    /// Parses `key` by name, then behaves like [`set`](Self::set).
    pub fn set_named(&mut self, key: &str, value: ParamValue) -> Result<bool, KinematicsError> {
        self.set(key.parse()?, value)
    }

    pub fn set_rotation_speed(&mut self, speed: f64) -> Result<bool, KinematicsError> {
        self.set(ParamKey::RotationSpeed, ParamValue::Scalar(speed))
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<bool, KinematicsError> {
        self.set(ParamKey::Paused, ParamValue::Flag(paused))
    }

    pub fn set_moon_inclination_deg(&mut self, degrees: f64) -> Result<bool, KinematicsError> {
        self.set(ParamKey::MoonOrbitInclination, ParamValue::Scalar(degrees))
    }

    /// Restores the documented defaults, notifying once per changed key.
    pub fn reset(&mut self) {
        let changes: Vec<ParamChange> = ParamKey::all()
            .filter_map(|key| {
                let old = self.current.get(key);
                let new = self.defaults.get(key);
                (old != new).then_some(ParamChange { key, old, new })
            })
            .collect();

        self.current = self.defaults.clone();
        debug!(changed = changes.len(), "Parameters reset to defaults");
        for change in &changes {
            self.notify(change);
        }
    }

    /// Registers a callback invoked after every successful change.
    pub fn subscribe(&mut self, observer: impl FnMut(&ParamChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes a callback. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: &ParamChange) {
        for (_, observer) in &mut self.observers {
            observer(change);
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
