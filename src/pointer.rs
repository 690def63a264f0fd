//! Mapping pointer positions to floor destinations.
//!
//! The pipeline is screen pixels → normalised device coordinates (to reject
//! positions outside the camera viewport) → a world ray through the camera →
//! the first surface the ray hits. Only a first hit on the floor yields a
//! destination; a first hit on anything else (the actor itself, for
//! instance) yields nothing.
use bevy::prelude::*;
use glam::{Vec2, Vec3};

use crate::navigation::Destination;

/// Pointer state shared between input handling and the frame loop.
///
/// Input handlers only write here; the frame loop reads it once per tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Mouse button or touch is held down.
    pub pressed: bool,
    /// Last known pointer position in logical window pixels, origin top-left.
    pub screen_position: Option<Vec2>,
}

impl PointerState {
    /// Records a press at `position`.
    pub const fn press(&mut self, position: Option<Vec2>) {
        self.pressed = true;
        if position.is_some() {
            self.screen_position = position;
        }
    }

    /// Records pointer movement; ignored while released.
    pub const fn move_to(&mut self, position: Vec2) {
        if self.pressed {
            self.screen_position = Some(position);
        }
    }

    /// Records a release. The last position is kept.
    pub const fn release(&mut self) {
        self.pressed = false;
    }
}

/// Marker for entities the pointer ray is tested against.
///
/// The floor and the actor model carry it. Hits on descendants of a tagged
/// entity count as hits on the tagged entity.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct RaySurface;

/// Marker placed on the floor at the last picked destination.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct DestinationMarker;

/// One ray intersection, as reported by the ray-cast provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit<'a> {
    /// Name of the surface that was hit.
    pub surface: &'a str,
    /// World-space intersection point.
    pub point: Vec3,
}

/// Converts a window position into normalised device coordinates.
///
/// Both axes map to `[-1, 1]`; the Y axis is flipped so that screen-down is
/// device-down. Returns `None` for a zero-sized viewport.
///
/// # Examples
///
/// ```
/// use bevy::math::Vec2;
/// use stroll::pointer::screen_to_ndc;
///
/// let ndc = screen_to_ndc(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0));
/// assert_eq!(ndc, Some(Vec2::ZERO));
/// ```
#[must_use]
pub fn screen_to_ndc(screen: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        screen.x / viewport.x * 2.0 - 1.0,
        -(screen.y / viewport.y * 2.0 - 1.0),
    ))
}

/// Picks a destination from ray hits.
///
/// Hits are taken in the order given; only the first is inspected, and it
/// produces a destination only when it lies on `floor_name`.
///
/// # Examples
///
/// ```
/// use bevy::math::Vec3;
/// use stroll::pointer::{resolve_destination, SurfaceHit};
/// use stroll::Destination;
///
/// let hits = [SurfaceHit { surface: "floor", point: Vec3::new(2.0, 0.0, 3.0) }];
/// assert_eq!(resolve_destination(hits, "floor"), Some(Destination::new(2.0, 3.0)));
/// ```
pub fn resolve_destination<'a>(
    hits: impl IntoIterator<Item = SurfaceHit<'a>>,
    floor_name: &str,
) -> Option<Destination> {
    let first = hits.into_iter().next()?;
    (first.surface == floor_name).then(|| Destination::from(first.point))
}
