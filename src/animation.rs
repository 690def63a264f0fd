//! Idle/walking clip selection for the actor model.
//!
//! Clips are looked up by role ([`ActorClips::idle`], [`ActorClips::walking`])
//! from a [`ClipKey`], and a missing clip is an error rather than a silent
//! `None`. Playback goes through [`ClipPlayback`] so the synchroniser can be
//! driven by Bevy's animation player or by a test double.
use serde::Deserialize;
use thiserror::Error;

use crate::actor::AnimationState;

/// How a required clip is found in the model's animation list.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClipKey {
    /// Position in the model's clip list.
    Index(usize),
    /// Clip name as authored in the model file.
    Name(String),
}

impl std::fmt::Display for ClipKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => write!(f, "\"{name}\""),
        }
    }
}

/// A clip the actor needs is missing from the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model has no {role} clip {key} ({available} clips available)")]
pub struct ClipLookupError {
    /// Role the clip was meant to fill.
    pub role: AnimationState,
    /// Key that failed to resolve.
    pub key: ClipKey,
    /// Number of clips the model provides.
    pub available: usize,
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Walking => f.write_str("walking"),
        }
    }
}

/// Resolves one clip.
///
/// `clips` is the model's ordered clip list; `named` looks a clip up by its
/// authored name.
///
/// # Errors
///
/// Returns [`ClipLookupError`] when the key matches nothing.
pub fn resolve_clip<T: Clone>(
    role: AnimationState,
    key: &ClipKey,
    clips: &[T],
    named: impl Fn(&str) -> Option<T>,
) -> Result<T, ClipLookupError> {
    let found = match key {
        ClipKey::Index(index) => clips.get(*index).cloned(),
        ClipKey::Name(name) => named(name),
    };
    found.ok_or_else(|| ClipLookupError {
        role,
        key: key.clone(),
        available: clips.len(),
    })
}

/// One clip handle per animation role.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorClips<C> {
    /// Played while standing.
    pub idle: C,
    /// Played while moving.
    pub walking: C,
}

impl<C: Copy> ActorClips<C> {
    /// Clip for the given role.
    #[must_use]
    pub const fn clip_for(&self, state: AnimationState) -> C {
        match state {
            AnimationState::Idle => self.idle,
            AnimationState::Walking => self.walking,
        }
    }
}

impl<C> ActorClips<C> {
    /// Applies `f` to both clips, idle first.
    #[must_use]
    pub fn map<D>(self, mut f: impl FnMut(C) -> D) -> ActorClips<D> {
        ActorClips {
            idle: f(self.idle),
            walking: f(self.walking),
        }
    }
}

impl<T: Clone> ActorClips<T> {
    /// Resolves both roles.
    ///
    /// # Errors
    ///
    /// Returns the first role that could not be found.
    pub fn resolve(
        keys: &ActorClips<ClipKey>,
        clips: &[T],
        named: impl Fn(&str) -> Option<T>,
    ) -> Result<Self, ClipLookupError> {
        Ok(Self {
            idle: resolve_clip(AnimationState::Idle, &keys.idle, clips, &named)?,
            walking: resolve_clip(AnimationState::Walking, &keys.walking, clips, &named)?,
        })
    }
}

impl Default for ActorClips<ClipKey> {
    /// The actor model ships its idle clip first and its walk cycle fourth.
    fn default() -> Self {
        Self {
            idle: ClipKey::Index(0),
            walking: ClipKey::Index(3),
        }
    }
}

/// Something that can start, stop and report clips.
#[cfg_attr(test, mockall::automock(type Clip = u8;))]
pub trait ClipPlayback {
    /// Handle identifying a clip.
    type Clip: Copy;

    /// Whether `clip` is currently playing.
    fn is_clip_playing(&self, clip: Self::Clip) -> bool;

    /// Starts `clip`, looping.
    fn play_clip(&mut self, clip: Self::Clip);

    /// Stops `clip`.
    fn stop_clip(&mut self, clip: Self::Clip);
}

/// Brings playback in line with the moving flag.
///
/// The walking clip plays iff `moving`; the idle clip plays otherwise. Clips
/// already in the wanted state are left alone, so calling this every frame
/// issues play/stop calls only on an actual change.
pub fn sync_animation<P: ClipPlayback>(
    moving: bool,
    playback: &mut P,
    clips: &ActorClips<P::Clip>,
) -> AnimationState {
    let wanted = AnimationState::for_motion(moving);
    let other = match wanted {
        AnimationState::Idle => AnimationState::Walking,
        AnimationState::Walking => AnimationState::Idle,
    };

    let stale = clips.clip_for(other);
    if playback.is_clip_playing(stale) {
        playback.stop_clip(stale);
    }
    let active = clips.clip_for(wanted);
    if !playback.is_clip_playing(active) {
        playback.play_clip(active);
    }
    wanted
}
