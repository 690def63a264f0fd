//! Frame loop wiring for the walking actor, house trigger and camera.
//!
//! `StrollPlugin` owns no rendering. It schedules the per-frame systems in a
//! fixed order (pointer input, navigation, animation, proximity, tweens,
//! camera) and gates every actor system on [`ActorLifecycle::Ready`]. The
//! render feature adds plugins that feed pointer hits in and spawn the
//! visible scene; without them the loop runs headless.
use bevy::ecs::prelude::On;
use bevy::prelude::*;

use crate::actor::{actor_ready, Actor, ActorLifecycle, AnimationState};
use crate::navigation::{advance, Destination, FollowCamera, NavigationSettings, StepOutcome};
use crate::pointer::{DestinationMarker, PointerState, RaySurface};
use crate::proximity::{evaluate, House, ProximityChanged, ProximitySettings, SpotMarker};
use crate::tween::{tick_tweens, TweenSettings, Tweens};

/// A floor point was picked for the actor to walk to.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DestinationChosen(pub Destination);

/// Ordered stages of the frame loop.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrollSet {
    /// Pointer state is turned into destinations.
    Input,
    /// The actor steps toward its destination.
    Navigate,
    /// The animation state follows the moving flag.
    Animate,
    /// The house trigger is evaluated.
    Proximity,
    /// Tweens advance.
    Tween,
    /// The follow camera tracks the actor.
    Camera,
}

/// Outcome of this frame's navigation step.
///
/// The proximity trigger runs on every frame the actor stepped, including
/// the frame it arrived.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastStep(pub StepOutcome);

impl Default for LastStep {
    fn default() -> Self {
        Self(StepOutcome::Idle)
    }
}

/// Core plugin: resources, frame-loop systems and destination handling.
///
/// # Examples
///
/// ```no_run
/// use bevy::prelude::*;
/// use stroll::StrollPlugin;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(StrollPlugin)
///     .run();
/// ```
#[derive(Debug, Default)]
pub struct StrollPlugin;

impl Plugin for StrollPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Actor>()
            .register_type::<AnimationState>()
            .register_type::<FollowCamera>()
            .register_type::<House>()
            .register_type::<SpotMarker>()
            .register_type::<RaySurface>()
            .register_type::<DestinationMarker>()
            .register_type::<Tweens>();

        app.init_resource::<NavigationSettings>()
            .init_resource::<ProximitySettings>()
            .init_resource::<TweenSettings>()
            .init_resource::<PointerState>()
            .init_resource::<ActorLifecycle>()
            .init_resource::<LastStep>();

        app.configure_sets(
            Update,
            (
                StrollSet::Input,
                StrollSet::Navigate,
                StrollSet::Animate,
                StrollSet::Proximity,
                StrollSet::Tween,
                StrollSet::Camera,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                advance_actor.in_set(StrollSet::Navigate),
                update_animation_state.in_set(StrollSet::Animate),
                update_proximity.in_set(StrollSet::Proximity),
                follow_actor_with_camera.in_set(StrollSet::Camera),
            )
                .run_if(actor_ready),
        );
        app.add_systems(Update, tick_tweens.in_set(StrollSet::Tween));

        app.add_observer(walk_to_destination);
        app.add_observer(log_proximity_change);
    }
}

/// Points the actor at a freshly picked destination.
///
/// Ignored until the actor is ready. The actor turns immediately; the
/// destination marker jumps to the picked point.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> and Res<T> by value."
)]
fn walk_to_destination(
    event: On<DestinationChosen>,
    lifecycle: Res<ActorLifecycle>,
    mut actors: Query<(&mut Transform, &mut Actor)>,
    mut markers: Query<&mut Transform, (With<DestinationMarker>, Without<Actor>)>,
) {
    let DestinationChosen(destination) = *event.event();
    let Some(entity) = lifecycle.entity() else {
        log::debug!("ignoring destination {destination:?}: actor not ready");
        return;
    };
    let Ok((mut transform, mut actor)) = actors.get_mut(entity) else {
        log::warn!("actor entity {entity:?} has no Actor component");
        return;
    };

    actor.walk_to(transform.translation, destination);
    transform.rotation = actor.rotation();
    log::debug!("walking to {destination:?}");

    for mut marker in &mut markers {
        marker.translation.x = destination.x;
        marker.translation.z = destination.z;
    }
}

/// Steps the actor and records the outcome in [`LastStep`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn advance_actor(
    settings: Res<NavigationSettings>,
    lifecycle: Res<ActorLifecycle>,
    mut last_step: ResMut<LastStep>,
    mut actors: Query<(&mut Transform, &mut Actor)>,
) {
    let outcome = lifecycle
        .entity()
        .and_then(|entity| actors.get_mut(entity).ok())
        .filter(|(_, actor)| actor.moving)
        .map_or(StepOutcome::Idle, |(mut transform, mut actor)| {
            advance(&mut transform.translation, &mut actor, &settings)
        });
    last_step.set_if_neq(LastStep(outcome));
}

fn update_animation_state(mut actors: Query<&mut Actor>) {
    for mut actor in &mut actors {
        let desired = actor.desired_animation();
        if actor.animation != desired {
            log::debug!("actor animation {:?} -> {desired:?}", actor.animation);
            actor.animation = desired;
        }
    }
}

/// Runs the house trigger after a step and starts the transition tweens.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
#[expect(
    clippy::too_many_arguments,
    reason = "Each query targets a different scene entity."
)]
fn update_proximity(
    mut commands: Commands,
    last_step: Res<LastStep>,
    lifecycle: Res<ActorLifecycle>,
    settings: Res<ProximitySettings>,
    tween_settings: Res<TweenSettings>,
    actors: Query<&Transform, With<Actor>>,
    mut houses: Query<(&mut House, &mut Tweens)>,
    mut cameras: Query<&mut Tweens, (With<FollowCamera>, Without<House>)>,
    mut spots: Query<&mut SpotMarker>,
) {
    if last_step.0 == StepOutcome::Idle {
        return;
    }
    let Some(position) = lifecycle
        .entity()
        .and_then(|entity| actors.get(entity).ok())
        .map(|transform| transform.translation)
    else {
        return;
    };
    let Ok((mut house, mut house_tweens)) = houses.single_mut() else {
        return;
    };
    let Some(transition) = evaluate(&settings.zone, position, house.visible) else {
        return;
    };

    house.visible = transition.house_visible();
    for mut spot in &mut spots {
        spot.occupied = house.visible;
    }

    let mode = tween_settings.overwrite;
    let (house_shift, camera_shift) = settings.shifts(transition);
    house_tweens.start(house_shift.tween(), mode);
    for mut tweens in &mut cameras {
        tweens.start(camera_shift.tween(), mode);
    }

    commands.trigger(ProximityChanged(transition));
}

/// Keeps the camera's horizontal offset from the actor and aims it at the
/// actor. The camera height is left to its tweens.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn follow_actor_with_camera(
    lifecycle: Res<ActorLifecycle>,
    actors: Query<&Transform, (With<Actor>, Without<FollowCamera>)>,
    mut cameras: Query<(&mut Transform, &FollowCamera)>,
) {
    let Some(target) = lifecycle
        .entity()
        .and_then(|entity| actors.get(entity).ok())
        .map(|transform| transform.translation)
    else {
        return;
    };
    for (mut transform, camera) in &mut cameras {
        let xz = camera.follow_xz(target);
        transform.translation.x = xz.x;
        transform.translation.z = xz.y;
        transform.look_at(target, Vec3::Y);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn log_proximity_change(event: On<ProximityChanged>) {
    let ProximityChanged(transition) = *event.event();
    log::info!("house trigger: {transition:?}");
}
