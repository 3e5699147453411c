use std::collections::VecDeque;

use crate::tween::Tween;
use crate::Scene;

/// # Chained Tween
///
/// Runs tweens one after another. The head is started when it becomes the head, so every link
/// captures its start value where the previous one left off.
#[derive(Default)]
pub struct ChainedTween {
    tweens: VecDeque<Tween>,
    on_complete: Option<Box<dyn FnOnce(&mut Scene)>>,
    done: bool,
}

impl ChainedTween {
    /// Returns an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chain with the tween appended.
    pub fn then(mut self, tween: Tween) -> Self {
        self.push(tween);
        self
    }

    /// Returns the chain with a completion callback, called once when the last tween completes.
    pub fn on_complete(mut self, callback: impl FnOnce(&mut Scene) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Appends a tween.
    pub fn push(&mut self, mut tween: Tween) {
        tween.stop();
        self.tweens.push_back(tween);
    }

    /// Returns the number of tweens left.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Returns true if no tween is left.
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advances the head tween. Returns true once, when the chain runs out.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) -> bool {
        if self.done {
            return false;
        }

        if let Some(head) = self.tweens.front_mut() {
            if !head.is_active() {
                head.start();
            }
            if head.update(scene, dt) {
                self.tweens.pop_front();
            }
        }

        if !self.tweens.is_empty() {
            return false;
        }

        self.done = true;
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(scene);
        }

        true
    }
}
