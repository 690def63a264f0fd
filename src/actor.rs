//! The walking character and its lifecycle.
//!
//! The actor model loads asynchronously, so the scene starts without one.
//! [`ActorLifecycle`] makes that explicit: every per-frame system that touches
//! the actor runs only once the lifecycle is [`ActorLifecycle::Ready`].
use bevy::prelude::*;
use glam::Vec3;

use crate::navigation::Destination;

/// Animation the actor model is playing.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[reflect(Default)]
pub enum AnimationState {
    /// Standing still.
    #[default]
    Idle,
    /// Walking toward a destination.
    Walking,
}

impl AnimationState {
    /// Returns the animation matching the given moving flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use stroll::AnimationState;
    ///
    /// assert_eq!(AnimationState::for_motion(true), AnimationState::Walking);
    /// assert_eq!(AnimationState::for_motion(false), AnimationState::Idle);
    /// ```
    #[must_use]
    pub const fn for_motion(moving: bool) -> Self {
        if moving {
            Self::Walking
        } else {
            Self::Idle
        }
    }
}

/// Navigation state of the user-controlled character.
///
/// Position lives in the entity's `Transform`; this component only tracks
/// where the actor is headed and how it should look while getting there.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component, Default)]
pub struct Actor {
    /// Rotation about +Y in radians; zero faces +Z.
    pub facing: f32,
    /// Whether the actor is walking toward [`Actor::destination`].
    pub moving: bool,
    /// Animation currently applied to the model.
    pub animation: AnimationState,
    /// Last destination picked by the pointer, kept after arrival until the
    /// next pick overwrites it.
    pub destination: Option<Destination>,
}

impl Actor {
    /// Starts walking from `position` toward `destination`.
    ///
    /// The actor turns to face the destination immediately, before the first
    /// step is taken. Any earlier destination is discarded.
    pub fn walk_to(&mut self, position: Vec3, destination: Destination) {
        self.facing = facing_toward(position, destination);
        self.destination = Some(destination);
        self.moving = true;
    }

    /// Rotation matching [`Actor::facing`].
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.facing)
    }

    /// Animation the actor should be playing given its moving flag.
    #[must_use]
    pub const fn desired_animation(&self) -> AnimationState {
        AnimationState::for_motion(self.moving)
    }
}

/// Yaw that turns a model's +Z axis toward `destination`.
#[must_use]
pub fn facing_toward(position: Vec3, destination: Destination) -> f32 {
    (destination.x - position.x).atan2(destination.z - position.z)
}

/// Whether the actor model has finished loading.
///
/// Replaces per-frame "is the mesh there yet" checks with a single explicit
/// state that systems gate on via [`actor_ready`].
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActorLifecycle {
    /// The model has not loaded (or failed to load); the scene stays static.
    #[default]
    Uninitialized,
    /// The actor entity exists and carries an [`Actor`] component.
    Ready(Entity),
}

impl ActorLifecycle {
    /// Returns the actor entity once ready.
    #[must_use]
    pub const fn entity(&self) -> Option<Entity> {
        match self {
            Self::Uninitialized => None,
            Self::Ready(entity) => Some(*entity),
        }
    }

    /// Returns `true` once the actor entity exists.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Run condition for systems that need the actor.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy run conditions take `Res<T>` by value."
)]
#[must_use]
pub fn actor_ready(lifecycle: Res<ActorLifecycle>) -> bool {
    lifecycle.is_ready()
}

/// Components every actor entity starts with.
#[must_use]
pub fn actor_bundle(position: Vec3) -> impl Bundle {
    (
        Name::new(crate::ACTOR_NAME),
        Actor::default(),
        Transform::from_translation(position),
    )
}

/// Spawns an actor entity at `position` and marks the lifecycle ready.
///
/// The model loader does the same through `Commands` once the glTF asset is
/// available; this form serves tests that need an actor without assets.
pub fn spawn_actor(world: &mut World, position: Vec3) -> Entity {
    let entity = world.spawn(actor_bundle(position)).id();
    world.insert_resource(ActorLifecycle::Ready(entity));
    log::info!("actor ready at {position:?}");
    entity
}
