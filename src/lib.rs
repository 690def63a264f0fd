#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the core logic of the stroll scene.
//!
//! The actor walks toward clicked floor points, and a house rises out of the
//! ground while the actor stands on the marked spot. Everything that needs a
//! window, a GPU or glTF assets lives behind the `render` feature; the rest
//! runs headless under `MinimalPlugins`.
pub mod actor;
pub mod animation;
pub mod config;
pub mod constants;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod input;
pub mod logging;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod model;
pub mod navigation;
pub mod plugin;
pub mod pointer;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod proximity;
pub mod tween;
pub use constants::*;

// Re-export commonly used items
pub use actor::{Actor, ActorLifecycle, AnimationState};
pub use animation::{sync_animation, ActorClips, ClipKey, ClipLookupError, ClipPlayback};
pub use config::{ConfigError, StrollConfig};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use input::PointerInputPlugin;
pub use logging::init as init_logging;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use model::{ModelError, ModelPlugin, ModelSettings};
pub use navigation::{advance, Destination, FollowCamera, NavigationSettings, StepOutcome};
pub use plugin::{DestinationChosen, StrollPlugin, StrollSet};
pub use pointer::{resolve_destination, DestinationMarker, PointerState, RaySurface, SurfaceHit};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use proximity::{
    House, ProximityChanged, ProximitySettings, ProximityTransition, ProximityZone, SpotMarker,
};
pub use tween::{Easing, OverwriteMode, Tween, TweenProperty, TweenSettings, Tweens};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use stroll::prelude::*;
    //! ```

    pub use crate::Actor;
    pub use crate::ActorLifecycle;
    pub use crate::Destination;
    pub use crate::DestinationChosen;
    pub use crate::FollowCamera;
    pub use crate::House;
    pub use crate::SpotMarker;
    pub use crate::StrollPlugin;
    pub use crate::Tweens;
}
