//! House reveal driven by the actor standing on the spot.
//!
//! The trigger is a two-state machine keyed on [`House::visible`]: entering
//! the zone while the house is hidden reveals it, leaving while it is shown
//! hides it. Staying on either side does nothing, so walking around inside
//! the zone fires exactly one transition.
use bevy::prelude::*;
use glam::Vec3;
use serde::Deserialize;

use crate::tween::{Easing, Tween, Tweens};
use crate::{
    CAMERA_FAR_Y, CAMERA_NEAR_Y, CAMERA_SHIFT_SECONDS, HOUSE_LOWERED_Y, HOUSE_RAISED_Y,
    HOUSE_RISE_SECONDS, HOUSE_SINK_SECONDS, SPOT_CENTER_X, SPOT_CENTER_Z, SPOT_HALF_EXTENT,
};

/// Axis-aligned square on the floor.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ProximityZone {
    /// Centre, X axis.
    pub center_x: f32,
    /// Centre, Z axis.
    pub center_z: f32,
    /// Half the side length.
    pub half_extent: f32,
}

impl Default for ProximityZone {
    fn default() -> Self {
        Self {
            center_x: SPOT_CENTER_X,
            center_z: SPOT_CENTER_Z,
            half_extent: SPOT_HALF_EXTENT,
        }
    }
}

impl ProximityZone {
    /// Whether `position` lies strictly inside the zone. Height is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy::math::Vec3;
    /// use stroll::ProximityZone;
    ///
    /// let zone = ProximityZone::default();
    /// assert!(zone.contains(Vec3::new(5.0, 0.3, 6.4)));
    /// assert!(!zone.contains(Vec3::new(5.0, 0.3, 6.5)));
    /// ```
    #[must_use]
    pub const fn contains(&self, position: Vec3) -> bool {
        (self.center_x - position.x).abs() < self.half_extent
            && (self.center_z - position.z).abs() < self.half_extent
    }
}

/// One tweened height change.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HeightShift {
    /// Target translation Y.
    pub y: f32,
    /// Seconds to get there.
    pub duration: f32,
    /// Progress curve.
    #[serde(default)]
    pub easing: Easing,
}

impl HeightShift {
    /// Translation-Y tween performing this shift.
    #[must_use]
    pub const fn tween(self) -> Tween {
        Tween::translation_y(self.y, self.duration, self.easing)
    }
}

/// Zone and transition tunables.
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ProximitySettings {
    /// Trigger area in front of the house.
    pub zone: ProximityZone,
    /// House motion on entering.
    pub house_rise: HeightShift,
    /// House motion on leaving.
    pub house_sink: HeightShift,
    /// Camera motion on entering.
    pub camera_lower: HeightShift,
    /// Camera motion on leaving.
    pub camera_raise: HeightShift,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            zone: ProximityZone::default(),
            house_rise: HeightShift {
                y: HOUSE_RAISED_Y,
                duration: HOUSE_RISE_SECONDS,
                easing: Easing::BounceOut,
            },
            house_sink: HeightShift {
                y: HOUSE_LOWERED_Y,
                duration: HOUSE_SINK_SECONDS,
                easing: Easing::QuadOut,
            },
            camera_lower: HeightShift {
                y: CAMERA_NEAR_Y,
                duration: CAMERA_SHIFT_SECONDS,
                easing: Easing::QuadOut,
            },
            camera_raise: HeightShift {
                y: CAMERA_FAR_Y,
                duration: CAMERA_SHIFT_SECONDS,
                easing: Easing::QuadOut,
            },
        }
    }
}

impl ProximitySettings {
    /// House and camera shifts for a transition, in that order.
    #[must_use]
    pub const fn shifts(&self, transition: ProximityTransition) -> (HeightShift, HeightShift) {
        match transition {
            ProximityTransition::Entered => (self.house_rise, self.camera_lower),
            ProximityTransition::Exited => (self.house_sink, self.camera_raise),
        }
    }
}

/// The house model that rises out of the floor.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component, Default)]
#[require(Tweens)]
pub struct House {
    /// Whether the house is (or is becoming) shown.
    pub visible: bool,
}

/// The square marking the trigger zone on the floor.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct SpotMarker {
    /// Whether the actor is standing on it.
    pub occupied: bool,
}

/// A change of the house's visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityTransition {
    /// The actor stepped onto the spot.
    Entered,
    /// The actor left the spot.
    Exited,
}

/// Announces a proximity transition once its effects have been started.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityChanged(pub ProximityTransition);

/// Decides whether the actor's position changes the house state.
///
/// Returns `None` when the actor is on the side of the zone boundary that
/// already matches `house_visible`.
#[must_use]
pub const fn evaluate(
    zone: &ProximityZone,
    position: Vec3,
    house_visible: bool,
) -> Option<ProximityTransition> {
    match (zone.contains(position), house_visible) {
        (true, false) => Some(ProximityTransition::Entered),
        (false, true) => Some(ProximityTransition::Exited),
        _ => None,
    }
}

impl ProximityTransition {
    /// House visibility after this transition.
    #[must_use]
    pub const fn house_visible(self) -> bool {
        matches!(self, Self::Entered)
    }
}
