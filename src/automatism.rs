use std::rc::Rc;

use crate::Node;
use crate::Scene;

/// Named method an automatism can invoke.
pub type Method = Rc<dyn Fn(&mut Scene, Node, &Arguments)>;

/// # Arguments
///
/// Values handed to a method by an automatism.
#[derive(Clone, Debug, PartialEq)]
pub enum Arguments {
    /// Spread argument list.
    Spread(Vec<f32>),
    /// The `value1` and `value2` pair.
    Pair(Option<f32>, Option<f32>),
}

impl Arguments {
    /// Returns the argument at the given position.
    pub fn get(&self, index: usize) -> Option<f32> {
        match self {
            Arguments::Spread(args) => args.get(index).copied(),
            Arguments::Pair(value1, value2) => match index {
                0 => *value1,
                1 => *value2,
                _ => None,
            },
        }
    }
}

/// # Automatism
///
/// Periodic (or one-shot) invocation of a named method on a game object.
#[derive(Clone, Debug, PartialEq)]
pub struct Automatism {
    pub(crate) method: String,
    pub(crate) interval: f32,
    pub(crate) time_since_last_call: f32,
    pub(crate) value1: Option<f32>,
    pub(crate) value2: Option<f32>,
    pub(crate) args: Option<Vec<f32>>,
    pub(crate) persistent: bool,
}

impl Automatism {
    pub(crate) fn new(method: String, options: AutomatismOptions) -> Self {
        Self {
            method,
            interval: options.interval.max(0.0),
            time_since_last_call: 0.0,
            value1: options.value1,
            value2: options.value2,
            args: options.args,
            persistent: options.persistent,
        }
    }

    /// Returns the name of the invoked method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the interval between calls in milliseconds.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Returns the time accumulated since the last call in milliseconds.
    pub fn time_since_last_call(&self) -> f32 {
        self.time_since_last_call
    }

    /// Returns the first value.
    pub fn value1(&self) -> Option<f32> {
        self.value1
    }

    /// Returns the second value.
    pub fn value2(&self) -> Option<f32> {
        self.value2
    }

    /// Returns the spread arguments.
    pub fn args(&self) -> Option<&[f32]> {
        self.args.as_deref()
    }

    /// Returns false for one-shot automatisms.
    pub fn persistent(&self) -> bool {
        self.persistent
    }

    pub(crate) fn arguments(&self) -> Arguments {
        match &self.args {
            Some(args) => Arguments::Spread(args.clone()),
            None => Arguments::Pair(self.value1, self.value2),
        }
    }

    pub(crate) fn inverse(&mut self) {
        match &mut self.args {
            Some(args) => args.iter_mut().for_each(|arg| *arg = -*arg),
            None => {
                self.value1 = self.value1.map(|value| -value);
                self.value2 = self.value2.map(|value| -value);
            }
        }
    }

    // Returns true if the method is due, keeping the overshoot for the next period.
    pub(crate) fn tick(&mut self, dt: f32) -> bool {
        self.time_since_last_call += dt;
        if self.time_since_last_call > self.interval {
            self.time_since_last_call -= self.interval;
            true
        } else {
            false
        }
    }
}

// Automatisms of one object keyed by id, in registration order. Replacing an id keeps its place.
#[derive(Clone, Debug, Default)]
pub(crate) struct Automatisms {
    items: Vec<(String, Automatism)>,
}

impl Automatisms {
    fn index(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|(key, _)| key == id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Automatism> {
        self.index(id).map(|index| &self.items[index].1)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Automatism> {
        let index = self.index(id)?;
        Some(&mut self.items[index].1)
    }

    pub(crate) fn contains_key(&self, id: &str) -> bool {
        self.index(id).is_some()
    }

    // Returns the replaced automatism.
    pub(crate) fn insert(&mut self, id: String, automatism: Automatism) -> Option<Automatism> {
        match self.index(&id) {
            Some(index) => Some(std::mem::replace(&mut self.items[index].1, automatism)),
            None => {
                self.items.push((id, automatism));
                None
            }
        }
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Automatism> {
        let index = self.index(id)?;
        Some(self.items.remove(index).1)
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(id, _)| id.as_str())
    }
}

/// # Automatism Options
#[derive(Clone, Debug, PartialEq)]
pub struct AutomatismOptions {
    /// Milliseconds between calls. 0 calls every frame.
    pub interval: f32,
    /// First value passed when there are no spread arguments.
    pub value1: Option<f32>,
    /// Second value passed when there are no spread arguments.
    pub value2: Option<f32>,
    /// Spread arguments.
    pub args: Option<Vec<f32>>,
    /// Whether the automatism survives its first call.
    pub persistent: bool,
}

impl AutomatismOptions {
    /// Returns the options with the given interval.
    pub fn interval(mut self, interval: f32) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the options with the given value pair.
    pub fn values(mut self, value1: f32, value2: f32) -> Self {
        self.value1 = Some(value1);
        self.value2 = Some(value2);
        self
    }

    /// Returns the options with the given first value.
    pub fn value1(mut self, value1: f32) -> Self {
        self.value1 = Some(value1);
        self
    }

    /// Returns the options with the given spread arguments.
    pub fn args(mut self, args: impl Into<Vec<f32>>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Returns one-shot options.
    pub fn once(mut self) -> Self {
        self.persistent = false;
        self
    }
}

impl Default for AutomatismOptions {
    fn default() -> Self {
        Self {
            interval: 0.0,
            value1: None,
            value2: None,
            args: None,
            persistent: true,
        }
    }
}
