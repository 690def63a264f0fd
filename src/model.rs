//! glTF model loading for the actor and the house.
//!
//! `ModelPlugin` requests both models at startup and watches their load
//! state. The house entity exists from the start, parked below the floor,
//! and picks up its scene whenever the asset arrives. The actor entity is
//! only spawned once its model has loaded and both required clips resolve;
//! that is also the point where [`ActorLifecycle`] becomes `Ready`.
//!
//! Failures never abort the app. They are triggered as [`ModelError`] events
//! and logged; a missing actor simply leaves the scene static.

use bevy::animation::graph::{AnimationGraph, AnimationGraphHandle, AnimationNodeIndex};
use bevy::animation::AnimationPlayer;
use bevy::asset::RecursiveDependencyLoadState;
use bevy::ecs::prelude::On;
use bevy::ecs::system::SystemParam;
use bevy::gltf::{Gltf, GltfAssetLabel};
use bevy::prelude::*;
use log::error;
use serde::Deserialize;
use thiserror::Error;

use crate::actor::{actor_bundle, actor_ready, Actor, ActorLifecycle};
use crate::animation::{sync_animation, ActorClips, ClipKey, ClipLookupError, ClipPlayback};
use crate::navigation::NavigationSettings;
use crate::plugin::StrollSet;
use crate::pointer::RaySurface;
use crate::proximity::{House, ProximitySettings};
use crate::{HOUSE_X, HOUSE_Z};

/// Default asset path of the walking character.
pub const ACTOR_MODEL_PATH: &str = "models/kiki.glb";
/// Default asset path of the house.
pub const HOUSE_MODEL_PATH: &str = "models/kiki_house.glb";

/// Errors emitted while loading the scene models.
#[derive(Event, Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The configured path cannot be served by the asset server.
    #[error("invalid model asset path {path:?}")]
    InvalidAssetPath {
        /// Asset-server path as configured.
        path: String,
    },
    /// The asset or one of its dependencies failed to load.
    #[error("failed to load model {path}: {detail}")]
    LoadFailed {
        /// Asset-server path of the model.
        path: String,
        /// Human-readable detail describing why the load failed.
        detail: String,
    },
    /// The glTF file contains no scene to spawn.
    #[error("model {path} has no scenes")]
    MissingScene {
        /// Asset-server path of the model.
        path: String,
    },
    /// A required animation clip is absent.
    #[error("model {path}: {source}")]
    MissingClip {
        /// Asset-server path of the model.
        path: String,
        /// Which clip could not be found.
        source: ClipLookupError,
    },
}

/// glTF model location, relative to the asset root.
///
/// Deserialised as a plain string. Empty, absolute and `..` paths are
/// rejected when the models are requested.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct ModelAssetPath(String);

impl ModelAssetPath {
    /// The path as handed to the asset server.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn checked(&self) -> Result<String, ModelError> {
        let path = self.0.as_str();
        if path.is_empty() || path.starts_with('/') || path.contains("..") {
            return Err(ModelError::InvalidAssetPath {
                path: path.to_owned(),
            });
        }
        Ok(path.to_owned())
    }
}

impl From<&str> for ModelAssetPath {
    fn from(path: &str) -> Self {
        Self(path.to_owned())
    }
}

/// Which models to load and how to find the actor's clips.
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ModelSettings {
    /// glTF file of the walking character.
    pub actor: ModelAssetPath,
    /// glTF file of the house.
    pub house: ModelAssetPath,
    /// Idle and walking clip keys within the actor model.
    pub actor_clips: ActorClips<ClipKey>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            actor: ACTOR_MODEL_PATH.into(),
            house: HOUSE_MODEL_PATH.into(),
            actor_clips: ActorClips::default(),
        }
    }
}

/// Animation graph built for the actor and its node per role.
#[derive(Resource, Debug, Clone)]
pub struct ActorAnimation {
    /// Graph holding the idle and walking clips.
    pub graph: Handle<AnimationGraph>,
    /// Graph node of each clip.
    pub clips: ActorClips<AnimationNodeIndex>,
}

/// Marks the animation player inside the actor's scene once it is bound to
/// the actor graph.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ActorAnimationPlayer;

#[derive(Debug)]
struct TrackedLoad<A: Asset> {
    path: String,
    handle: Handle<A>,
    has_finalised: bool,
}

impl<A: Asset> TrackedLoad<A> {
    const fn new(path: String, handle: Handle<A>) -> Self {
        Self {
            path,
            handle,
            has_finalised: false,
        }
    }
}

#[derive(Resource, Debug, Default)]
struct ModelTracking {
    actor: Option<TrackedLoad<Gltf>>,
    house: Option<TrackedLoad<Scene>>,
}

#[derive(SystemParam)]
struct ActorSpawnContext<'w> {
    gltfs: Res<'w, Assets<Gltf>>,
    graphs: ResMut<'w, Assets<AnimationGraph>>,
    settings: Res<'w, ModelSettings>,
    navigation: Res<'w, NavigationSettings>,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn request_models(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<ModelSettings>,
    proximity: Res<ProximitySettings>,
    mut tracking: ResMut<ModelTracking>,
) {
    match settings.house.checked() {
        Ok(house_path) => {
            let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(house_path.clone()));
            commands.spawn((
                Name::new("house"),
                House::default(),
                Transform::from_xyz(HOUSE_X, proximity.house_sink.y, HOUSE_Z),
                SceneRoot(scene.clone()),
            ));
            tracking.house = Some(TrackedLoad::new(house_path, scene));
        }
        Err(err) => commands.trigger(err),
    }

    match settings.actor.checked() {
        Ok(actor_path) => {
            let handle = asset_server.load(actor_path.clone());
            tracking.actor = Some(TrackedLoad::new(actor_path, handle));
        }
        Err(err) => commands.trigger(err),
    }
}

/// Reports whether a tracked load has settled, triggering an error if it
/// failed.
fn poll_load<A: Asset>(
    commands: &mut Commands,
    asset_server: &AssetServer,
    tracked: &mut TrackedLoad<A>,
) -> bool {
    if tracked.has_finalised {
        return false;
    }
    match asset_server.recursive_dependency_load_state(tracked.handle.id()) {
        RecursiveDependencyLoadState::Loaded => {
            tracked.has_finalised = true;
            log::info!("model loaded: {}", tracked.path);
            true
        }
        RecursiveDependencyLoadState::Failed(error) => {
            commands.trigger(ModelError::LoadFailed {
                path: tracked.path.clone(),
                detail: error.to_string(),
            });
            tracked.has_finalised = true;
            false
        }
        RecursiveDependencyLoadState::NotLoaded | RecursiveDependencyLoadState::Loading => false,
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn monitor_model_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut tracking: ResMut<ModelTracking>,
    mut context: ActorSpawnContext,
) {
    if let Some(house) = tracking.house.as_mut() {
        poll_load(&mut commands, &asset_server, house);
    }

    let Some(actor) = tracking.actor.as_mut() else {
        return;
    };
    if !poll_load(&mut commands, &asset_server, actor) {
        return;
    }
    if let Err(err) = spawn_loaded_actor(&mut commands, &mut context, actor) {
        commands.trigger(err);
    }
}

fn spawn_loaded_actor(
    commands: &mut Commands,
    context: &mut ActorSpawnContext,
    tracked: &TrackedLoad<Gltf>,
) -> Result<Entity, ModelError> {
    let path = &tracked.path;
    let gltf = context
        .gltfs
        .get(&tracked.handle)
        .ok_or_else(|| ModelError::LoadFailed {
            path: path.clone(),
            detail: "asset reported loaded but is not in storage".to_owned(),
        })?;
    let scene = gltf
        .scenes
        .first()
        .cloned()
        .ok_or_else(|| ModelError::MissingScene { path: path.clone() })?;
    let clips = ActorClips::resolve(&context.settings.actor_clips, &gltf.animations, |name| {
        gltf.named_animations.get(name).cloned()
    })
    .map_err(|source| ModelError::MissingClip {
        path: path.clone(),
        source,
    })?;

    let mut graph = AnimationGraph::new();
    let root = graph.root;
    let nodes = clips.map(|clip| graph.add_clip(clip, 1.0, root));
    let graph_handle = context.graphs.add(graph);

    let start = Vec3::new(0.0, context.navigation.rest_height, 0.0);
    let entity = commands
        .spawn((actor_bundle(start), SceneRoot(scene), RaySurface))
        .id();
    commands.insert_resource(ActorAnimation {
        graph: graph_handle,
        clips: nodes,
    });
    commands.insert_resource(ActorLifecycle::Ready(entity));
    log::info!("actor ready at {start:?}");
    Ok(entity)
}

/// Binds the actor graph to the animation player spawned with the actor's
/// scene, which appears some frames after the actor entity itself.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn attach_animation_graph(
    mut commands: Commands,
    lifecycle: Res<ActorLifecycle>,
    animation: Option<Res<ActorAnimation>>,
    players: Query<Entity, (With<AnimationPlayer>, Without<ActorAnimationPlayer>)>,
    parents: Query<&ChildOf>,
) {
    let (Some(actor), Some(animation)) = (lifecycle.entity(), animation) else {
        return;
    };
    for player in &players {
        if parents.iter_ancestors(player).any(|ancestor| ancestor == actor) {
            commands.entity(player).insert((
                AnimationGraphHandle(animation.graph.clone()),
                ActorAnimationPlayer,
            ));
        }
    }
}

impl ClipPlayback for AnimationPlayer {
    type Clip = AnimationNodeIndex;

    fn is_clip_playing(&self, clip: AnimationNodeIndex) -> bool {
        self.is_playing_animation(clip)
    }

    fn play_clip(&mut self, clip: AnimationNodeIndex) {
        self.play(clip).repeat();
    }

    fn stop_clip(&mut self, clip: AnimationNodeIndex) {
        self.stop(clip);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn drive_actor_animation(
    lifecycle: Res<ActorLifecycle>,
    animation: Option<Res<ActorAnimation>>,
    actors: Query<&Actor>,
    mut players: Query<&mut AnimationPlayer, With<ActorAnimationPlayer>>,
) {
    let Some(animation) = animation else {
        return;
    };
    let Some(actor) = lifecycle.entity().and_then(|e| actors.get(e).ok()) else {
        return;
    };
    for mut player in &mut players {
        sync_animation(actor.moving, &mut *player, &animation.clips);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_model_error(event: On<ModelError>) {
    error!("model error: {}", event.event());
}

/// Bevy plugin loading the actor and house models.
///
/// Pair it with [`crate::StrollPlugin`], which owns the frame loop the
/// spawned actor takes part in.
#[derive(Debug)]
pub struct ModelPlugin;

impl Plugin for ModelPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_model_error);
        app.init_resource::<ModelSettings>()
            .init_resource::<ProximitySettings>()
            .init_resource::<NavigationSettings>()
            .init_resource::<ActorLifecycle>()
            .init_resource::<ModelTracking>();
        app.add_systems(Startup, request_models);
        app.add_systems(
            Update,
            (
                monitor_model_loads,
                attach_animation_graph,
                drive_actor_animation
                    .in_set(StrollSet::Animate)
                    .run_if(actor_ready),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Resource, Default)]
    struct CapturedModelErrors(Vec<ModelError>);

    #[expect(
        clippy::needless_pass_by_value,
        reason = "Observer systems must accept On<T> by value."
    )]
    fn capture(event: On<ModelError>, mut errors: ResMut<CapturedModelErrors>) {
        errors.0.push(event.event().clone());
    }

    #[rstest]
    #[case::empty("", false)]
    #[case::absolute("/models/kiki.glb", false)]
    #[case::parent("../kiki.glb", false)]
    #[case::relative("models/kiki.glb", true)]
    fn asset_paths_must_stay_under_root(#[case] path: &str, #[case] valid: bool) {
        assert_eq!(ModelAssetPath::from(path).checked().is_ok(), valid);
    }

    #[test]
    fn settings_parse_clip_names() {
        let settings: ModelSettings = serde_json::from_str(
            r#"{ "actor": "chars/a.glb", "actor_clips": { "idle": { "index": 1 }, "walking": { "name": "Walk" } } }"#,
        )
        .unwrap_or_else(|e| panic!("parse: {e}"));
        assert_eq!(settings.actor.as_str(), "chars/a.glb");
        assert_eq!(settings.house.as_str(), HOUSE_MODEL_PATH);
        assert_eq!(settings.actor_clips.idle, ClipKey::Index(1));
        assert_eq!(settings.actor_clips.walking, ClipKey::Name("Walk".to_owned()));
    }

    #[test]
    fn missing_clip_error_names_model_and_role() {
        let err = ModelError::MissingClip {
            path: ACTOR_MODEL_PATH.to_owned(),
            source: ClipLookupError {
                role: crate::AnimationState::Walking,
                key: ClipKey::Index(3),
                available: 2,
            },
        };
        assert_eq!(
            err.to_string(),
            "model models/kiki.glb: model has no walking clip #3 (2 clips available)"
        );
    }

    #[test]
    fn animation_player_plays_and_stops_clips() {
        let mut player = AnimationPlayer::default();
        let clips = ActorClips {
            idle: AnimationNodeIndex::new(1),
            walking: AnimationNodeIndex::new(2),
        };

        sync_animation(false, &mut player, &clips);
        assert!(player.is_clip_playing(clips.idle));
        assert!(!player.is_clip_playing(clips.walking));

        sync_animation(true, &mut player, &clips);
        assert!(player.is_clip_playing(clips.walking));
        assert!(!player.is_clip_playing(clips.idle));
    }

    #[test]
    fn invalid_paths_are_reported_and_actor_stays_uninitialised() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::asset::AssetPlugin::default()));
        app.init_asset::<Gltf>()
            .init_asset::<Scene>()
            .init_asset::<AnimationGraph>();
        app.insert_resource(ModelSettings {
            actor: "".into(),
            house: "../house.glb".into(),
            ..ModelSettings::default()
        });
        app.init_resource::<CapturedModelErrors>();
        app.add_observer(capture);
        app.add_plugins(ModelPlugin);

        app.update();

        let errors = &app.world().resource::<CapturedModelErrors>().0;
        assert_eq!(
            errors,
            &vec![
                ModelError::InvalidAssetPath {
                    path: "../house.glb".to_owned()
                },
                ModelError::InvalidAssetPath {
                    path: String::new()
                },
            ]
        );
        assert_eq!(
            *app.world().resource::<ActorLifecycle>(),
            ActorLifecycle::Uninitialized
        );
        let mut houses = app.world_mut().query::<&House>();
        assert_eq!(houses.iter(app.world()).count(), 0);
    }
}
