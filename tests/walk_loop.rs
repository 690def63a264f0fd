//! Frame-loop tests: clicking, walking, the house trigger and the camera.
//!
//! Each test drives a headless app through whole frames, so the systems run
//! in their scheduled order with a fixed frame time.
use approx::assert_relative_eq;
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use stroll::{
    Actor, ActorLifecycle, AnimationState, Destination, House, OverwriteMode, ProximityChanged,
    ProximityTransition, SpotMarker, TweenSettings, Tweens,
};
use test_utils::{click, component, headless_app, run_frames, spawn_scene, translation};

#[derive(Resource, Default)]
struct Transitions(Vec<ProximityTransition>);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record(event: On<ProximityChanged>, mut seen: ResMut<Transitions>) {
    seen.0.push(event.event().0);
}

fn recording_app() -> App {
    let mut app = headless_app();
    app.init_resource::<Transitions>();
    app.add_observer(record);
    app
}

#[test]
fn actor_walks_to_clicked_point_and_stops() {
    let mut app = recording_app();
    let scene = spawn_scene(&mut app);

    click(&mut app, Destination::new(2.0, 0.0));
    app.update();
    let actor: Actor = component(&app, scene.actor);
    assert!(actor.moving);
    assert_eq!(actor.animation, AnimationState::Walking);

    run_frames(&mut app, 50);

    let actor: Actor = component(&app, scene.actor);
    assert!(!actor.moving);
    assert_eq!(actor.animation, AnimationState::Idle);
    let position = translation(&app, scene.actor);
    assert!((position.x - 2.0).abs() < 0.03 && position.z.abs() < 0.03);
    assert_relative_eq!(position.y, 0.3);

    assert_eq!(translation(&app, scene.marker), Vec3::new(2.0, 0.01, 0.0));
    assert!(app.world().resource::<Transitions>().0.is_empty());
}

#[test]
fn camera_keeps_offset_and_looks_at_actor() {
    let mut app = recording_app();
    let scene = spawn_scene(&mut app);

    click(&mut app, Destination::new(-3.0, 2.0));
    run_frames(&mut app, 100);

    let actor_at = translation(&app, scene.actor);
    let camera_at = translation(&app, scene.camera);
    assert_relative_eq!(camera_at.x, actor_at.x + 1.0, epsilon = 1e-5);
    assert_relative_eq!(camera_at.z, actor_at.z + 5.0, epsilon = 1e-5);
    assert_relative_eq!(camera_at.y, 5.0);

    let forward = app
        .world()
        .get::<Transform>(scene.camera)
        .map(Transform::forward)
        .unwrap_or_else(|| panic!("camera transform missing"));
    let wanted = (actor_at - camera_at).normalize();
    assert!((*forward - wanted).length() < 1e-4);
}

#[test]
fn house_rises_on_the_spot_and_sinks_after_leaving() {
    let mut app = recording_app();
    let scene = spawn_scene(&mut app);

    click(&mut app, Destination::new(5.0, 5.0));
    run_frames(&mut app, 240);

    assert!(component::<House>(&app, scene.house).visible);
    assert!(component::<SpotMarker>(&app, scene.spot).occupied);
    assert_relative_eq!(translation(&app, scene.house).y, 1.0, epsilon = 1e-4);
    assert_relative_eq!(translation(&app, scene.camera).y, 3.0, epsilon = 1e-4);

    click(&mut app, Destination::new(0.0, 0.0));
    run_frames(&mut app, 240);

    assert!(!component::<House>(&app, scene.house).visible);
    assert!(!component::<SpotMarker>(&app, scene.spot).occupied);
    assert_relative_eq!(translation(&app, scene.house).y, -3.3, epsilon = 1e-4);
    assert_relative_eq!(translation(&app, scene.camera).y, 5.0, epsilon = 1e-4);

    assert_eq!(
        app.world().resource::<Transitions>().0,
        vec![ProximityTransition::Entered, ProximityTransition::Exited]
    );
}

#[test]
fn wandering_inside_the_zone_triggers_once() {
    let mut app = recording_app();
    let scene = spawn_scene(&mut app);

    click(&mut app, Destination::new(5.0, 5.0));
    run_frames(&mut app, 200);
    click(&mut app, Destination::new(6.0, 4.0));
    run_frames(&mut app, 60);
    click(&mut app, Destination::new(4.2, 5.8));
    run_frames(&mut app, 60);

    assert!(component::<House>(&app, scene.house).visible);
    assert_eq!(
        app.world().resource::<Transitions>().0,
        vec![ProximityTransition::Entered]
    );
}

fn leave_while_rising(mode: OverwriteMode) -> usize {
    let mut app = recording_app();
    app.insert_resource(TweenSettings { overwrite: mode });
    let scene = spawn_scene(&mut app);

    set_actor_position(&mut app, scene.actor, Vec3::new(5.0, 0.3, 5.0));
    click(&mut app, Destination::new(5.5, 5.0));
    run_frames(&mut app, 2);

    set_actor_position(&mut app, scene.actor, Vec3::new(0.0, 0.3, 0.0));
    click(&mut app, Destination::new(0.5, 0.0));
    app.update();

    assert_eq!(
        app.world().resource::<Transitions>().0,
        vec![ProximityTransition::Entered, ProximityTransition::Exited]
    );
    component_len(&app, scene.house)
}

fn set_actor_position(app: &mut App, actor: Entity, position: Vec3) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(actor) {
        transform.translation = position;
    }
}

fn component_len(app: &App, entity: Entity) -> usize {
    app.world()
        .get::<Tweens>(entity)
        .map_or(0, |tweens| tweens.active().len())
}

#[test]
fn supersede_cancels_the_rise_when_leaving_early() {
    assert_eq!(leave_while_rising(OverwriteMode::Supersede), 1);
}

#[test]
fn overlap_keeps_the_rise_running_beside_the_sink() {
    assert_eq!(leave_while_rising(OverwriteMode::Overlap), 2);
}

#[test]
fn clicks_before_the_actor_loads_are_ignored() {
    let mut app = recording_app();
    let marker = app
        .world_mut()
        .spawn((stroll::DestinationMarker, Transform::default()))
        .id();

    click(&mut app, Destination::new(4.0, 4.0));
    run_frames(&mut app, 5);

    assert_eq!(
        *app.world().resource::<ActorLifecycle>(),
        ActorLifecycle::Uninitialized
    );
    assert_eq!(translation(&app, marker), Vec3::ZERO);
}
