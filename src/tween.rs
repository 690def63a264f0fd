//! Time-based property animation.
//!
//! A [`Tween`] moves one property of an entity from its value at the first
//! tick to a target over a fixed duration, shaped by an [`Easing`] curve.
//! Tweens live in the entity's [`Tweens`] component and advance by real
//! frame time, unlike actor movement which steps once per frame.
//!
//! Starting a tween on a property that already has one in flight is governed
//! by [`OverwriteMode`].
use bevy::prelude::*;
use bevy_math::curve::{Curve, EaseFunction};
use glam::Vec3;
use serde::Deserialize;

/// Easing curve applied to a tween's normalised progress.
#[derive(Reflect, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Default)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Decelerating quadratic.
    #[default]
    QuadOut,
    /// Overshoots the target with decaying bounces, like a dropped ball.
    BounceOut,
}

impl Easing {
    /// Maps progress `t` in `[0, 1]` to eased progress.
    ///
    /// `t` is clamped first, so every curve starts at 0 and ends at 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use stroll::Easing;
    ///
    /// assert_eq!(Easing::QuadOut.apply(0.5), 0.75);
    /// assert!((Easing::BounceOut.apply(1.0) - 1.0).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        self.curve().sample_clamped(t)
    }

    const fn curve(self) -> EaseFunction {
        match self {
            Self::Linear => EaseFunction::Linear,
            Self::QuadOut => EaseFunction::QuadraticOut,
            Self::BounceOut => EaseFunction::BounceOut,
        }
    }
}

/// Property a tween drives.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenProperty {
    /// `Transform::translation.y`.
    TranslationY,
}

impl TweenProperty {
    const fn read(self, translation: Vec3) -> f32 {
        match self {
            Self::TranslationY => translation.y,
        }
    }

    const fn write(self, translation: &mut Vec3, value: f32) {
        match self {
            Self::TranslationY => translation.y = value,
        }
    }
}

/// One in-flight interpolation.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Property being animated.
    pub property: TweenProperty,
    /// Value reached at the end.
    pub to: f32,
    /// Total length in seconds.
    pub duration: f32,
    /// Seconds advanced so far.
    pub elapsed: f32,
    /// Progress curve.
    pub easing: Easing,
    /// Starting value, captured from the live property on the first tick.
    pub from: Option<f32>,
}

impl Tween {
    /// Tween of the translation's Y component.
    #[must_use]
    pub const fn translation_y(to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            property: TweenProperty::TranslationY,
            to,
            duration,
            elapsed: 0.0,
            easing,
            from: None,
        }
    }

    /// Whether the full duration has elapsed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances by `dt` seconds and returns the new property value.
    ///
    /// `current` is the live value; it becomes the start value if this is
    /// the first tick.
    pub fn step(&mut self, current: f32, dt: f32) -> f32 {
        let from = *self.from.get_or_insert(current);
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration.max(0.0));
        let progress = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        from + (self.to - from) * self.easing.apply(progress)
    }
}

/// What happens to in-flight tweens when a new one targets the same property.
#[derive(Reflect, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Default)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteMode {
    /// The new tween replaces any in-flight tween on the same property.
    #[default]
    Supersede,
    /// In-flight tweens keep running. Each frame they are applied in start
    /// order, so the newest one writes last while it runs; an older, longer
    /// tween resumes control once the newer one finishes.
    Overlap,
}

/// Global tween behaviour.
#[derive(Resource, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TweenSettings {
    /// Policy for tweens started on an already animated property.
    pub overwrite: OverwriteMode,
}

/// Active tweens on an entity, in start order.
#[derive(Component, Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(Component, Default)]
pub struct Tweens {
    active: Vec<Tween>,
}

impl Tweens {
    /// Adds `tween`, dropping superseded ones according to `mode`.
    pub fn start(&mut self, tween: Tween, mode: OverwriteMode) {
        if mode == OverwriteMode::Supersede {
            self.active.retain(|t| t.property != tween.property);
        }
        self.active.push(tween);
    }

    /// Tweens still running.
    #[must_use]
    pub const fn active(&self) -> &[Tween] {
        self.active.as_slice()
    }

    /// Returns `true` when nothing is animating.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advances every tween by `dt` and writes the results to `translation`.
    ///
    /// Finished tweens write their final value and are then removed.
    pub fn advance(&mut self, translation: &mut Vec3, dt: f32) {
        for tween in &mut self.active {
            let current = tween.property.read(*translation);
            let value = tween.step(current, dt);
            tween.property.write(translation, value);
        }
        self.active.retain(|t| !t.is_finished());
    }
}

/// Advances all tweens by the frame's delta time.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn tick_tweens(time: Res<Time>, mut query: Query<(&mut Transform, &mut Tweens)>) {
    let dt = time.delta_secs();
    for (mut transform, mut tweens) in &mut query {
        if tweens.is_empty() {
            continue;
        }
        tweens.advance(&mut transform.translation, dt);
    }
}
