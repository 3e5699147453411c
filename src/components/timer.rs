use std::collections::BTreeMap;
use std::rc::Rc;

use crate::components::ComponentKind;
use crate::components::ComponentTag;
use crate::components::Outcome;
use crate::components::TimerCallback;
use crate::Node;
use crate::Scene;
use crate::SceneError;

/// # Timer Id
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TimerId(usize);

struct Timer {
    delay: f32,
    elapsed: f32,
    repeat: bool,
    callback: TimerCallback,
}

/// # Timers
///
/// Delayed and repeated callbacks of a node. A timer fires once its elapsed time exceeds the
/// delay, like an automatism, and repeating timers keep the time they overshoot so they don't
/// drift.
#[derive(Default)]
pub struct Timers {
    timers: BTreeMap<TimerId, Timer>,
}

impl Timers {
    /// Returns the number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns true if no timer is pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub(crate) fn update(&mut self, dt: f32) -> Outcome {
        let mut fired = Vec::new();

        self.timers.retain(|_, timer| {
            timer.elapsed += dt;
            if timer.elapsed <= timer.delay {
                return true;
            }

            fired.push(timer.callback.clone());
            if timer.repeat && timer.delay > 0.0 {
                timer.elapsed -= timer.delay;
                true
            } else {
                timer.elapsed = 0.0;
                timer.repeat
            }
        });

        if fired.is_empty() {
            Outcome::Running
        } else {
            Outcome::Fired(fired)
        }
    }
}

impl Scene {
    /// Calls the callback once after `delay` milliseconds of node updates.
    pub fn set_timeout(
        &mut self,
        node: Node,
        delay: f32,
        callback: impl Fn(&mut Scene, Node) + 'static,
    ) -> Result<TimerId, SceneError> {
        self.add_timer(node, delay, false, Rc::new(callback))
    }

    /// Calls the callback every `interval` milliseconds of node updates.
    pub fn set_interval(
        &mut self,
        node: Node,
        interval: f32,
        callback: impl Fn(&mut Scene, Node) + 'static,
    ) -> Result<TimerId, SceneError> {
        self.add_timer(node, interval, true, Rc::new(callback))
    }

    /// Cancels the timer. Returns false if it doesn't exist.
    pub fn clear_timer(&mut self, node: Node, id: TimerId) -> bool {
        let removed = self
            .find_component(node, ComponentTag::Timer)
            .and_then(|component| self.component_mut(node, component))
            .map(|component| match component.kind_mut() {
                ComponentKind::Timer(timers) => timers.timers.remove(&id).is_some(),
                _ => false,
            })
            .unwrap_or(false);

        if !removed {
            log::warn!("{node:?} has no timer {id:?} to clear");
        }

        removed
    }

    fn add_timer(
        &mut self,
        node: Node,
        delay: f32,
        repeat: bool,
        callback: TimerCallback,
    ) -> Result<TimerId, SceneError> {
        if !self.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }

        let id = TimerId(self.next_handle());
        let component = match self.find_component(node, ComponentTag::Timer) {
            Some(component) => component,
            None => self.add_component(node, ComponentKind::Timer(Timers::default()))?,
        };

        let timer = Timer {
            delay: delay.max(0.0),
            elapsed: 0.0,
            repeat,
            callback,
        };
        match self
            .component_mut(node, component)
            .map(|component| component.kind_mut())
        {
            Some(ComponentKind::Timer(timers)) => {
                timers.timers.insert(id, timer);
            }
            _ => {
                let mut timers = Timers::default();
                timers.timers.insert(id, timer);
                self.add_component(node, ComponentKind::Timer(timers))?;
            }
        }

        Ok(id)
    }
}
