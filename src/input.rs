//! Mouse and touch input feeding the pointer mapper.
//!
//! Input handlers only record press state and position in
//! [`PointerState`]. While the pointer is held, a ray is cast from the follow
//! camera every frame and the first surface it meets decides whether a new
//! destination is picked, so dragging across the floor steers the actor.
//! Presses outside the camera's viewport are ignored.

use bevy::ecs::system::SystemParam;
use bevy::input::touch::Touches;
use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::actor::actor_ready;
use crate::navigation::{Destination, FollowCamera};
use crate::plugin::{DestinationChosen, StrollSet};
use crate::pointer::{resolve_destination, screen_to_ndc, PointerState, RaySurface, SurfaceHit};
use crate::FLOOR_NAME;

/// Records left-button and touch presses, drags and releases.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn track_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Option<Res<Touches>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut pointer: ResMut<PointerState>,
) {
    let cursor = windows.single().ok().and_then(Window::cursor_position);
    let touch = touches.as_deref().and_then(Touches::first_pressed_position);
    let touch_started = touches
        .as_deref()
        .is_some_and(|t| t.iter_just_pressed().next().is_some());
    let touch_ended = touches.as_deref().is_some_and(Touches::any_just_released);

    if mouse.just_pressed(MouseButton::Left) {
        pointer.press(cursor);
    }
    if touch_started {
        pointer.press(touch);
    }
    if let Some(position) = touch.or(cursor) {
        pointer.move_to(position);
    }
    if mouse.just_released(MouseButton::Left) || touch_ended {
        pointer.release();
    }
}

/// World ray under `screen`, or `None` outside the camera's viewport.
fn pointer_ray(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    screen: Vec2,
) -> Option<Ray3d> {
    let viewport = camera.logical_viewport_rect()?;
    let ndc = screen_to_ndc(screen - viewport.min, viewport.size())?;
    if ndc.abs().max_element() > 1.0 {
        return None;
    }
    camera.viewport_to_world(camera_transform, screen).ok()
}

/// Ray-cast access to the entities tagged [`RaySurface`].
#[derive(SystemParam)]
struct SurfacePicker<'w, 's> {
    ray_cast: MeshRayCast<'w, 's>,
    surfaces: Query<'w, 's, (), With<RaySurface>>,
    parents: Query<'w, 's, &'static ChildOf>,
    names: Query<'w, 's, &'static Name>,
}

impl SurfacePicker<'_, '_> {
    /// Casts `ray` and turns the first surface hit into a destination.
    fn pick(&mut self, ray: Ray3d) -> Option<Destination> {
        let surfaces = &self.surfaces;
        let parents = &self.parents;
        let names = &self.names;

        // A hit on a child mesh counts as a hit on the tagged surface above it.
        let surface_of = |entity: Entity| {
            std::iter::once(entity)
                .chain(parents.iter_ancestors(entity))
                .find(|candidate| surfaces.contains(*candidate))
        };
        let filter = |entity: Entity| surface_of(entity).is_some();
        // Surfaces are never hidden, so visibility is not consulted.
        let settings = MeshRayCastSettings::default()
            .with_visibility(RayCastVisibility::Any)
            .with_filter(&filter)
            .never_early_exit();
        let hits = self.ray_cast.cast_ray(ray, &settings);

        resolve_destination(
            hits.iter().map(|(entity, hit)| SurfaceHit {
                surface: surface_of(*entity)
                    .and_then(|surface| names.get(surface).ok())
                    .map_or("", Name::as_str),
                point: hit.point,
            }),
            FLOOR_NAME,
        )
    }
}

/// Casts the pointer ray while pressed and announces floor picks.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn cast_pointer_ray(
    mut commands: Commands,
    pointer: Res<PointerState>,
    cameras: Query<(&Camera, &GlobalTransform), With<FollowCamera>>,
    mut picker: SurfacePicker,
) {
    if !pointer.pressed {
        return;
    }
    let Some(screen) = pointer.screen_position else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Some(ray) = pointer_ray(camera, camera_transform, screen) else {
        return;
    };
    if let Some(destination) = picker.pick(ray) {
        commands.trigger(DestinationChosen(destination));
    }
}

/// Plugin turning mouse and touch input into [`DestinationChosen`] events.
#[derive(Debug)]
pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>();
        app.add_systems(
            Update,
            (track_pointer, cast_pointer_ray.run_if(actor_ready))
                .chain()
                .in_set(StrollSet::Input),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::asset::AssetPlugin;
    use bevy::camera::primitives::Aabb;
    use bevy::ecs::system::RunSystemOnce;
    use rstest::rstest;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<MouseButton>>();
        app.init_resource::<PointerState>();
        app.add_systems(Update, track_pointer);
        app
    }

    #[test]
    fn mouse_press_and_release_toggle_pressed() {
        let mut app = app();

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        assert!(app.world().resource::<PointerState>().pressed);

        {
            let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            mouse.clear();
            mouse.release(MouseButton::Left);
        }
        app.update();
        assert!(!app.world().resource::<PointerState>().pressed);
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Right);
        app.update();
        assert_eq!(
            *app.world().resource::<PointerState>(),
            PointerState::default()
        );
    }

    fn spawn_mesh(world: &mut World, mesh: Mesh, at: Vec3, half_extents: Vec3) -> Entity {
        let handle = world.resource_mut::<Assets<Mesh>>().add(mesh);
        world
            .spawn((
                Mesh3d(handle),
                Transform::from_translation(at),
                GlobalTransform::from_translation(at),
                Aabb::from_min_max(-half_extents, half_extents),
            ))
            .id()
    }

    /// Floor, an actor whose mesh is a child of the tagged root, and an
    /// untagged crate standing on the floor.
    fn picking_world() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()));
        app.init_asset::<Mesh>();
        let world = app.world_mut();

        let floor = spawn_mesh(
            world,
            Mesh::from(Plane3d::default().mesh().size(20.0, 20.0)),
            Vec3::ZERO,
            Vec3::new(10.0, 0.01, 10.0),
        );
        world
            .entity_mut(floor)
            .insert((Name::new(FLOOR_NAME), RaySurface));

        let actor_at = Vec3::new(3.0, 0.0, 3.0);
        let actor = world
            .spawn((
                Name::new("kiki"),
                RaySurface,
                Transform::from_translation(actor_at),
                GlobalTransform::from_translation(actor_at),
            ))
            .id();
        let body = spawn_mesh(
            world,
            Mesh::from(Cuboid::new(1.0, 1.0, 1.0)),
            actor_at + Vec3::new(0.0, 0.5, 0.0),
            Vec3::splat(0.5),
        );
        world.entity_mut(body).insert(ChildOf(actor));

        spawn_mesh(
            world,
            Mesh::from(Cuboid::new(1.0, 2.0, 1.0)),
            Vec3::new(-2.0, 1.0, 4.0),
            Vec3::new(0.5, 1.0, 0.5),
        );
        app
    }

    fn pick_below(In(ray): In<Ray3d>, mut picker: SurfacePicker) -> Option<Destination> {
        picker.pick(ray)
    }

    #[rstest]
    #[case::open_floor(Vec2::new(-4.0, -5.0), Some(Vec2::new(-4.0, -5.0)))]
    #[case::actor_body_blocks(Vec2::new(3.0, 3.0), None)]
    #[case::untagged_mesh_is_transparent(Vec2::new(-2.0, 4.0), Some(Vec2::new(-2.0, 4.0)))]
    #[case::beyond_the_floor(Vec2::new(50.0, 50.0), None)]
    fn ray_picks_first_tagged_surface(#[case] xz: Vec2, #[case] expected: Option<Vec2>) {
        let mut app = picking_world();
        let ray = Ray3d::new(Vec3::new(xz.x, 10.0, xz.y), Dir3::NEG_Y);

        let picked = app
            .world_mut()
            .run_system_once_with(pick_below, ray)
            .unwrap_or_else(|e| panic!("pick failed: {e}"));

        match (picked, expected) {
            (Some(destination), Some(wanted)) => {
                assert_relative_eq!(destination.x, wanted.x, epsilon = 1e-4);
                assert_relative_eq!(destination.z, wanted.y, epsilon = 1e-4);
            }
            (None, None) => {}
            (got, wanted) => panic!("picked {got:?}, expected {wanted:?}"),
        }
    }
}
