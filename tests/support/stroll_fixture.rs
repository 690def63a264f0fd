//! Shared fixture for behavioural tests of the stroll frame loop.
//!
//! Wraps a headless app with a spawned scene. [`StrollFixture::reset`] puts
//! every scene entity back to its starting state so each rspec example can
//! begin from the same frame regardless of what ran before it.

use std::sync::MutexGuard;

use bevy::prelude::*;
use stroll::{
    Actor, Destination, FollowCamera, House, SpotMarker, Tweens, ACTOR_REST_HEIGHT,
    HOUSE_LOWERED_Y,
};
use test_utils::{click, headless_app, spawn_scene, SceneEntities};

use crate::thread_safe_app::{lock_app, share, SharedApp, ThreadSafeApp};

/// Headless app plus handles to its scene entities.
#[derive(Debug, Clone)]
pub struct StrollFixture {
    app: SharedApp,
    /// Entities spawned at bootstrap.
    pub scene: SceneEntities,
}

impl StrollFixture {
    /// Builds the app and spawns the scene with a ready actor.
    pub fn bootstrap() -> Self {
        let mut app = headless_app();
        let scene = spawn_scene(&mut app);
        app.finish();
        app.cleanup();
        Self {
            app: share(app),
            scene,
        }
    }

    /// Locks the underlying `App` for direct inspection or mutation.
    pub fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        lock_app(&self.app)
    }

    /// Returns actor, house, camera and spot to their initial state.
    pub fn reset(&self) {
        let mut app = self.app_guard();
        let world = app.world_mut();
        let scene = self.scene;

        if let Some(mut actor) = world.get_mut::<Actor>(scene.actor) {
            *actor = Actor::default();
        }
        set_translation(world, scene.actor, Vec3::new(0.0, ACTOR_REST_HEIGHT, 0.0));

        if let Some(mut house) = world.get_mut::<House>(scene.house) {
            house.visible = false;
        }
        set_y(world, scene.house, HOUSE_LOWERED_Y);

        let base = world
            .get::<FollowCamera>(scene.camera)
            .map_or(Vec3::ZERO, |camera| camera.base_offset);
        set_translation(world, scene.camera, base);

        for entity in [scene.house, scene.camera] {
            if let Some(mut tweens) = world.get_mut::<Tweens>(entity) {
                *tweens = Tweens::default();
            }
        }
        if let Some(mut spot) = world.get_mut::<SpotMarker>(scene.spot) {
            spot.occupied = false;
        }
    }

    /// Clicks `destination` and runs `frames` updates.
    pub fn walk(&self, destination: Destination, frames: usize) {
        let mut app = self.app_guard();
        click(&mut app, destination);
        for _ in 0..frames {
            app.update();
        }
    }

    /// Copy of component `C` on `entity`.
    pub fn get<C: Component + Copy>(&self, entity: Entity) -> Option<C> {
        self.app_guard().world().get::<C>(entity).copied()
    }

    /// Translation of `entity`.
    pub fn translation(&self, entity: Entity) -> Option<Vec3> {
        self.app_guard()
            .world()
            .get::<Transform>(entity)
            .map(|transform| transform.translation)
    }
}

fn set_translation(world: &mut World, entity: Entity, translation: Vec3) {
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.translation = translation;
    }
}

fn set_y(world: &mut World, entity: Entity, y: f32) {
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.translation.y = y;
    }
}
