#![warn(missing_docs)]

//! # Sprig
//!
//! ![MIT](https://img.shields.io/badge/license-MIT-blue.svg)
//!
//! ## What is Sprig?
//!
//! Sprig is the scene graph core of a 2D game engine. Drawing, assets and audio are left to the
//! host; Sprig keeps the game objects moving:
//! - A tree of game objects with deferred deletion and cached world scale
//! - Automatisms, drift-free periodic method calls registered by id
//! - Components: fade, scale, move, shake, focus, timers and custom behaviors
//! - Tweens with 31 easing curves, chainable
//! - Cameras with focus, fade, shake, limits and pseudo-depth perspective
//!
//! An [Engine] runs a frame in a fixed order: the [Time] clock, the [TweenEngine], every root of
//! the [Scene], then each enabled [Camera] around the render pass.

pub use crate::app::Application;
pub use crate::app::ApplicationState;
pub use crate::app::Event;
pub use crate::automatism::Arguments;
pub use crate::automatism::Automatism;
pub use crate::automatism::AutomatismOptions;
pub use crate::automatism::Method;
pub use crate::camera::Camera;
pub use crate::camera::CameraEvent;
pub use crate::camera::CameraLimits;
pub use crate::components::Behavior;
pub use crate::components::Callback;
pub use crate::components::Component;
pub use crate::components::ComponentId;
pub use crate::components::ComponentKind;
pub use crate::components::ComponentTag;
pub use crate::components::EffectOptions;
pub use crate::components::Fade;
pub use crate::components::Focus;
pub use crate::components::FocusOptions;
pub use crate::components::Hook;
pub use crate::components::MoveTo;
pub use crate::components::Ramp;
pub use crate::components::ScaleTo;
pub use crate::components::Shake;
pub use crate::components::ShakeState;
pub use crate::components::TimerCallback;
pub use crate::components::TimerId;
pub use crate::components::Timers;
pub use crate::config::Config;
pub use crate::config::ConfigError;
pub use crate::engine::Engine;
pub use crate::error::RunError;
pub use crate::error::SceneError;
pub use crate::event::EventKind;
pub use crate::event::Listener;
pub use crate::event::ListenerId;
pub use crate::event::NodeEvent;
pub use crate::game_object::GameObject;
pub use crate::game_object::KillOptions;
pub use crate::game_object::Property;
pub use crate::game_object::DELETE_FLAG;
pub use crate::renderable::DebugAxis;
pub use crate::renderable::Renderable;
pub use crate::scene::Node;
pub use crate::scene::Scene;
pub use crate::time::Time;
pub use crate::time::DEFAULT_FRAME_DELAY;
pub use crate::transform::LocalTransform;
pub use crate::transform::WorldTransform;
pub use crate::tween::ChainedTween;
pub use crate::tween::CompleteCallback;
pub use crate::tween::Easing;
pub use crate::tween::Tween;
pub use crate::tween::TweenEngine;
pub use crate::tween::TweenId;
pub use crate::tween::TweenTarget;
pub use crate::tween::UpdateCallback;

mod app;
mod automatism;
mod camera;
mod components;
mod config;
mod engine;
mod error;
mod event;
mod game_object;
mod renderable;
mod scene;
pub mod systems;
mod time;
mod transform;
mod tween;
