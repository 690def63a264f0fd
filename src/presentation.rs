//! Presentation layer plugin owning the camera, lights and floor markers.
//!
//! `PresentationPlugin` builds the static part of the scene: an orthographic
//! follow camera, the lights, the floor the pointer ray lands on, the
//! destination marker and the spot in front of the house. It only reflects
//! simulation state (the spot colour follows [`SpotMarker::occupied`]) and
//! never writes it.

use bevy::camera::ScalingMode;
use bevy::color::palettes::css::{CRIMSON, SEA_GREEN, YELLOW};
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;

use crate::navigation::FollowCamera;
use crate::pointer::{DestinationMarker, RaySurface};
use crate::proximity::{ProximitySettings, SpotMarker};
use crate::FLOOR_NAME;

/// Side length of the square floor.
const FLOOR_SIZE: f32 = 100.0;
/// Grid texture repetitions across the floor.
const FLOOR_TILES: f32 = 10.0;
/// Grid texture applied to the floor.
const FLOOR_TEXTURE_PATH: &str = "images/grid.png";
/// Visible world height of the camera before zoom.
const VIEWPORT_HEIGHT: f32 = 2.0;
/// Orthographic zoom-out factor.
const CAMERA_SCALE: f32 = 4.0;
/// Opacity of the flat floor markers.
const MARKER_ALPHA: f32 = 0.5;

/// Colour of the spot for the given occupancy.
///
/// # Examples
///
/// ```
/// use bevy::color::palettes::css::{SEA_GREEN, YELLOW};
/// use bevy::prelude::*;
/// use stroll::presentation::spot_color;
///
/// assert_eq!(spot_color(false), Color::from(YELLOW.with_alpha(0.5)));
/// assert_eq!(spot_color(true), Color::from(SEA_GREEN.with_alpha(0.5)));
/// ```
#[must_use]
pub fn spot_color(occupied: bool) -> Color {
    let base = if occupied { SEA_GREEN } else { YELLOW };
    Color::from(base.with_alpha(MARKER_ALPHA))
}

/// Orthographic projection of the follow camera.
///
/// The vertical span is fixed and the horizontal span follows the window's
/// aspect ratio, so resizing never distorts the scene. Near and far planes
/// sit on both sides of the camera so the floor is never clipped.
#[must_use]
pub fn follow_camera_projection() -> Projection {
    Projection::from(OrthographicProjection {
        scaling_mode: ScalingMode::FixedVertical {
            viewport_height: VIEWPORT_HEIGHT,
        },
        scale: CAMERA_SCALE,
        near: -1000.0,
        far: 1000.0,
        ..OrthographicProjection::default_3d()
    })
}

fn marker_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    }
}

/// Spawns camera, lights, floor and markers.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    proximity: Res<ProximitySettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let camera = FollowCamera::default();
    commands.spawn((
        Name::new("FollowCamera"),
        Camera3d::default(),
        follow_camera_projection(),
        Tonemapping::AcesFitted,
        Transform::from_translation(camera.base_offset).looking_at(Vec3::ZERO, Vec3::Y),
        camera,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 700.0,
        ..default()
    });
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: light_consts::lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(1.0, 1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let grid = asset_server.load_with_settings(
        FLOOR_TEXTURE_PATH,
        |settings: &mut ImageLoaderSettings| {
            settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
                address_mode_u: ImageAddressMode::Repeat,
                address_mode_v: ImageAddressMode::Repeat,
                ..default()
            });
        },
    );
    commands.spawn((
        Name::new(FLOOR_NAME),
        RaySurface,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(FLOOR_SIZE, FLOOR_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(grid),
            uv_transform: Affine2::from_scale(Vec2::splat(FLOOR_TILES)),
            ..default()
        })),
        Transform::default(),
    ));

    commands.spawn((
        Name::new("DestinationMarker"),
        DestinationMarker,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(1.0, 1.0))),
        MeshMaterial3d(materials.add(marker_material(Color::from(
            CRIMSON.with_alpha(MARKER_ALPHA),
        )))),
        Transform::from_xyz(0.0, 0.01, 0.0),
    ));

    let zone = proximity.zone;
    let side = zone.half_extent * 2.0;
    commands.spawn((
        Name::new("Spot"),
        SpotMarker::default(),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(side, side))),
        MeshMaterial3d(materials.add(marker_material(spot_color(false)))),
        Transform::from_xyz(zone.center_x, 0.005, zone.center_z),
    ));
}

/// Repaints the spot when its occupancy changes.
fn recolour_spot(
    spots: Query<(&SpotMarker, &MeshMaterial3d<StandardMaterial>), Changed<SpotMarker>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (spot, material) in &spots {
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = spot_color(spot.occupied);
        }
    }
}

/// Plugin owning camera setup and presentation layer systems.
///
/// # Examples
///
/// ```ignore
/// use bevy::prelude::*;
/// use stroll::{PresentationPlugin, StrollPlugin};
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins((StrollPlugin, PresentationPlugin))
///     .run();
/// ```
#[derive(Debug)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProximitySettings>();
        app.add_systems(Startup, setup_scene);
        app.add_systems(Update, recolour_spot);
    }
}
