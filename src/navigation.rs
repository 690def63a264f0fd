//! Per-frame walking toward the picked destination.
//!
//! Movement is a fixed displacement per rendered frame along the heading
//! from the actor to its destination. The step is deliberately not scaled by
//! frame time, so the walking speed depends on the refresh rate; the arrival
//! test compares each horizontal axis independently rather than the radial
//! distance.
use bevy::prelude::*;
use glam::{Vec2, Vec3};
use serde::Deserialize;

use crate::actor::Actor;
use crate::tween::Tweens;
use crate::{ACTOR_REST_HEIGHT, ARRIVAL_TOLERANCE, CAMERA_BASE_OFFSET, WALK_STEP};

/// Horizontal point the actor walks toward.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Default)]
pub struct Destination {
    /// World X coordinate.
    pub x: f32,
    /// World Z coordinate.
    pub z: f32,
}

impl Destination {
    /// Creates a destination from its horizontal coordinates.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// World-space point at the given height.
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy::math::Vec3;
    /// use stroll::Destination;
    ///
    /// let point = Destination::new(2.0, 3.0).at_height(0.3);
    /// assert_eq!(point, Vec3::new(2.0, 0.3, 3.0));
    /// ```
    #[must_use]
    pub const fn at_height(self, y: f32) -> Vec3 {
        Vec3::new(self.x, y, self.z)
    }
}

impl From<Vec3> for Destination {
    fn from(point: Vec3) -> Self {
        Self::new(point.x, point.z)
    }
}

/// Tunables for [`advance`].
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct NavigationSettings {
    /// World units moved per frame.
    pub step: f32,
    /// Per-axis distance under which the destination counts as reached.
    pub arrival_tolerance: f32,
    /// Height of the actor above the floor; picked destinations use it.
    pub rest_height: f32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            step: WALK_STEP,
            arrival_tolerance: ARRIVAL_TOLERANCE,
            rest_height: ACTOR_REST_HEIGHT,
        }
    }
}

/// Result of a single [`advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The actor was not moving; nothing changed.
    Idle,
    /// The actor stepped and still has ground to cover.
    Walking,
    /// The actor stepped and is now within tolerance on both axes.
    Arrived,
}

/// Heading in the XZ plane from `position` to `destination`, in radians.
#[must_use]
pub fn heading(position: Vec3, destination: Destination) -> f32 {
    (destination.z - position.z).atan2(destination.x - position.x)
}

/// Whether `position` is within `tolerance` of `destination` on both axes.
///
/// This is a bounding-box test: a point at the corner of the box is farther
/// than `tolerance` away yet still counts as arrived.
#[must_use]
pub fn has_arrived(position: Vec3, destination: Destination, tolerance: f32) -> bool {
    (destination.x - position.x).abs() < tolerance && (destination.z - position.z).abs() < tolerance
}

/// Moves the actor one step toward its destination.
///
/// Only X and Z change. When both axes fall within tolerance after the step,
/// `actor.moving` is cleared; it stays cleared until [`Actor::walk_to`] is
/// called again.
///
/// # Examples
///
/// ```
/// use bevy::math::Vec3;
/// use stroll::navigation::{advance, NavigationSettings, StepOutcome};
/// use stroll::{Actor, Destination};
///
/// let mut position = Vec3::ZERO;
/// let mut actor = Actor::default();
/// actor.walk_to(position, Destination::new(1.0, 0.0));
///
/// let outcome = advance(&mut position, &mut actor, &NavigationSettings::default());
/// assert_eq!(outcome, StepOutcome::Walking);
/// assert!((position.x - 0.05).abs() < 1e-6);
/// ```
pub fn advance(position: &mut Vec3, actor: &mut Actor, settings: &NavigationSettings) -> StepOutcome {
    if !actor.moving {
        return StepOutcome::Idle;
    }
    let Some(destination) = actor.destination else {
        actor.moving = false;
        return StepOutcome::Idle;
    };

    let angle = heading(*position, destination);
    position.x += angle.cos() * settings.step;
    position.z += angle.sin() * settings.step;

    if has_arrived(*position, destination, settings.arrival_tolerance) {
        actor.moving = false;
        log::debug!("actor arrived at {destination:?}");
        StepOutcome::Arrived
    } else {
        StepOutcome::Walking
    }
}

/// Camera that keeps a fixed horizontal offset from the actor.
///
/// The camera's height is not touched here; it belongs to the tweens started
/// by the proximity trigger.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[require(Tweens)]
pub struct FollowCamera {
    /// Offset from the actor; only X and Z are applied every frame.
    pub base_offset: Vec3,
}

impl Default for FollowCamera {
    fn default() -> Self {
        let [x, y, z] = CAMERA_BASE_OFFSET;
        Self {
            base_offset: Vec3::new(x, y, z),
        }
    }
}

impl FollowCamera {
    /// Horizontal camera position for an actor at `actor`.
    #[must_use]
    pub fn follow_xz(&self, actor: Vec3) -> Vec2 {
        Vec2::new(actor.x + self.base_offset.x, actor.z + self.base_offset.z)
    }
}
