//! Utility helpers for tests.
//!
//! Builds headless apps running the stroll frame loop and spawns the scene
//! entities the loop expects, without any rendering or assets.
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use stroll::actor::spawn_actor;
use stroll::{
    Destination, DestinationChosen, DestinationMarker, FollowCamera, House, SpotMarker,
    StrollPlugin, ACTOR_REST_HEIGHT, HOUSE_LOWERED_Y, HOUSE_X, HOUSE_Z,
};

/// Simulated frame length used by [`headless_app`].
pub const FRAME: Duration = Duration::from_micros(16_667);

/// Creates an app with `MinimalPlugins`, a fixed frame time and
/// [`StrollPlugin`].
///
/// Settings resources inserted afterwards replace the defaults.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .add_plugins(StrollPlugin);
    app
}

/// Handles to the entities spawned by [`spawn_scene`].
#[derive(Debug, Clone, Copy)]
pub struct SceneEntities {
    /// The walking character.
    pub actor: Entity,
    /// The house, starting below the floor.
    pub house: Entity,
    /// The follow camera.
    pub camera: Entity,
    /// The spot in front of the house.
    pub spot: Entity,
    /// The destination marker.
    pub marker: Entity,
}

/// Spawns an actor at the origin (already `Ready`) plus the house, camera,
/// spot and destination marker.
pub fn spawn_scene(app: &mut App) -> SceneEntities {
    let world = app.world_mut();
    let actor = spawn_actor(world, Vec3::new(0.0, ACTOR_REST_HEIGHT, 0.0));
    let house = world
        .spawn((
            House::default(),
            Transform::from_xyz(HOUSE_X, HOUSE_LOWERED_Y, HOUSE_Z),
        ))
        .id();
    let follow = FollowCamera::default();
    let camera = world
        .spawn((follow, Transform::from_translation(follow.base_offset)))
        .id();
    let spot = world.spawn(SpotMarker::default()).id();
    let marker = world
        .spawn((DestinationMarker, Transform::from_xyz(0.0, 0.01, 0.0)))
        .id();
    SceneEntities {
        actor,
        house,
        camera,
        spot,
        marker,
    }
}

/// Picks `destination` as if the floor had been clicked there.
pub fn click(app: &mut App, destination: Destination) {
    app.world_mut().trigger(DestinationChosen(destination));
}

/// Runs `frames` updates.
pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Current translation of `entity`.
///
/// # Panics
///
/// Panics if the entity has no `Transform`.
pub fn translation(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .map(|transform| transform.translation)
        .unwrap_or_else(|| panic!("{entity:?} has no Transform"))
}

/// Copy of component `C` on `entity`.
///
/// # Panics
///
/// Panics if the component is missing.
pub fn component<C: Component + Copy>(app: &App, entity: Entity) -> C {
    app.world()
        .get::<C>(entity)
        .copied()
        .unwrap_or_else(|| panic!("{entity:?} lacks {}", std::any::type_name::<C>()))
}
