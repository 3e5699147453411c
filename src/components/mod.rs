//! # Components
//!
//! Behaviors attached to game objects. A component belongs to exactly one node for its whole
//! life and is updated after the node's children, while it is enabled.

use std::rc::Rc;

use crate::EventKind;
use crate::ListenerId;
use crate::Node;
use crate::Scene;
use crate::SceneError;

pub use self::fade::Fade;
pub use self::focus::Focus;
pub use self::focus::FocusOptions;
pub use self::movement::MoveTo;
pub use self::ramp::Ramp;
pub use self::scale::ScaleTo;
pub use self::shake::Shake;
pub use self::shake::ShakeState;
pub use self::timer::TimerId;
pub use self::timer::Timers;

mod fade;
mod focus;
mod movement;
mod ramp;
mod scale;
mod shake;
mod timer;

/// Called once when an effect completes.
pub type Callback = Box<dyn FnOnce(&mut Scene, Node)>;

/// Called each time a timer fires.
pub type TimerCallback = Rc<dyn Fn(&mut Scene, Node)>;

/// Lifecycle hook of a component.
pub type Hook = Box<dyn FnMut(&mut Scene, Node)>;

/// # Behavior
///
/// Custom per-frame logic attached to a node through [ComponentKind::Custom].
pub trait Behavior {
    /// Advances the behavior by `dt` milliseconds. `node` is the owner.
    fn update(&mut self, scene: &mut Scene, node: Node, dt: f32);
}

/// # Component Id
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ComponentId(pub(crate) usize);

/// # Component Kind
pub enum ComponentKind {
    /// Alpha interpolation.
    Fade(Fade),
    /// Scale interpolation.
    Scale(ScaleTo),
    /// Position interpolation.
    Move(MoveTo),
    /// Random position jitter.
    Shake(Shake),
    /// Follows another node.
    Focus(Focus),
    /// Delayed and repeated callbacks.
    Timer(Timers),
    /// Application behavior.
    Custom(Box<dyn Behavior>),
}

impl ComponentKind {
    /// Returns the tag of the kind.
    pub fn tag(&self) -> ComponentTag {
        match self {
            ComponentKind::Fade(_) => ComponentTag::Fade,
            ComponentKind::Scale(_) => ComponentTag::Scale,
            ComponentKind::Move(_) => ComponentTag::Move,
            ComponentKind::Shake(_) => ComponentTag::Shake,
            ComponentKind::Focus(_) => ComponentTag::Focus,
            ComponentKind::Timer(_) => ComponentTag::Timer,
            ComponentKind::Custom(_) => ComponentTag::Custom,
        }
    }

    fn update(&mut self, scene: &mut Scene, node: Node, dt: f32) -> Outcome {
        match self {
            ComponentKind::Fade(fade) => fade.update(scene, node, dt),
            ComponentKind::Scale(scale) => scale.update(scene, node, dt),
            ComponentKind::Move(movement) => movement.update(scene, node, dt),
            ComponentKind::Shake(shake) => shake.update(scene, node, dt),
            ComponentKind::Focus(focus) => focus.update(scene, node),
            ComponentKind::Timer(timers) => timers.update(dt),
            ComponentKind::Custom(behavior) => {
                behavior.update(scene, node, dt);
                Outcome::Running
            }
        }
    }
}

/// # Component Tag
///
/// Discriminant of a [ComponentKind].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ComponentTag {
    /// [ComponentKind::Fade].
    Fade,
    /// [ComponentKind::Scale].
    Scale,
    /// [ComponentKind::Move].
    Move,
    /// [ComponentKind::Shake].
    Shake,
    /// [ComponentKind::Focus].
    Focus,
    /// [ComponentKind::Timer].
    Timer,
    /// [ComponentKind::Custom].
    Custom,
}

/// # Effect Options
///
/// What happens when a fade, scale, move, or shake completes.
#[derive(Default)]
pub struct EffectOptions {
    callback: Option<Callback>,
    destroy_on_end: bool,
}

impl EffectOptions {
    /// Returns options with no callback that keep the component.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the options with a completion callback.
    pub fn then(mut self, callback: impl FnOnce(&mut Scene, Node) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Returns the options destroying the component on completion.
    pub fn destroy_on_end(mut self) -> Self {
        self.destroy_on_end = true;
        self
    }

    fn finish(&mut self, event: EventKind) -> Outcome {
        Outcome::Finished {
            event,
            callback: self.callback.take(),
            destroy: self.destroy_on_end,
        }
    }
}

// Result of one component tick. Events and callbacks run once the component is back in its node.
pub(crate) enum Outcome {
    Running,
    Finished {
        event: EventKind,
        callback: Option<Callback>,
        destroy: bool,
    },
    Fired(Vec<TimerCallback>),
}

/// # Component
pub struct Component {
    name: String,
    enabled: bool,
    parent: Node,
    kind: ComponentKind,
    on_enable: Option<Hook>,
    on_disable: Option<Hook>,
    on_destroy: Option<Hook>,
    listeners: Vec<(Node, ListenerId)>,
}

impl Component {
    fn new(parent: Node, kind: ComponentKind) -> Self {
        Self {
            name: String::new(),
            enabled: true,
            parent,
            kind,
            on_enable: None,
            on_disable: None,
            on_destroy: None,
            listeners: Vec::new(),
        }
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns true if the component is updated.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the owner.
    pub fn parent(&self) -> Node {
        self.parent
    }

    /// Returns the behavior.
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Returns the behavior.
    pub fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    /// Sets the hook called when the component gets enabled.
    pub fn on_enable(&mut self, hook: impl FnMut(&mut Scene, Node) + 'static) {
        self.on_enable = Some(Box::new(hook));
    }

    /// Sets the hook called when the component gets disabled.
    pub fn on_disable(&mut self, hook: impl FnMut(&mut Scene, Node) + 'static) {
        self.on_disable = Some(Box::new(hook));
    }

    /// Sets the hook called when the component is destroyed.
    pub fn on_destroy(&mut self, hook: impl FnMut(&mut Scene, Node) + 'static) {
        self.on_destroy = Some(Box::new(hook));
    }
}

pub(crate) struct ComponentSlot {
    id: ComponentId,
    tag: ComponentTag,
    // None while the component is being updated.
    pub(crate) component: Option<Component>,
}

impl Scene {
    /// Attaches a new component to the node.
    pub fn add_component(
        &mut self,
        node: Node,
        kind: ComponentKind,
    ) -> Result<ComponentId, SceneError> {
        if !self.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }

        let id = ComponentId(self.next_handle());
        let slot = ComponentSlot {
            id,
            tag: kind.tag(),
            component: Some(Component::new(node, kind)),
        };
        if let Some(object) = self.get_mut(node) {
            object.components.push(slot);
        }

        Ok(id)
    }

    /// Attaches a custom behavior to the node.
    pub fn add_behavior(
        &mut self,
        node: Node,
        behavior: impl Behavior + 'static,
    ) -> Result<ComponentId, SceneError> {
        self.add_component(node, ComponentKind::Custom(Box::new(behavior)))
    }

    /// Returns the ids of the node's components in update order.
    pub fn component_ids(&self, node: Node) -> Vec<ComponentId> {
        self.get(node)
            .map(|object| object.components.iter().map(|slot| slot.id).collect())
            .unwrap_or_default()
    }

    /// Returns the first component of the node with the given tag.
    pub fn find_component(&self, node: Node, tag: ComponentTag) -> Option<ComponentId> {
        self.get(node)?
            .components
            .iter()
            .find(|slot| slot.tag == tag)
            .map(|slot| slot.id)
    }

    /// Returns the component.
    pub fn component(&self, node: Node, id: ComponentId) -> Option<&Component> {
        self.get(node)?
            .components
            .iter()
            .find(|slot| slot.id == id)?
            .component
            .as_ref()
    }

    /// Returns the component.
    pub fn component_mut(&mut self, node: Node, id: ComponentId) -> Option<&mut Component> {
        self.component_slot(node, id)?.component.as_mut()
    }

    fn component_slot(&mut self, node: Node, id: ComponentId) -> Option<&mut ComponentSlot> {
        self.get_mut(node)?
            .components
            .iter_mut()
            .find(|slot| slot.id == id)
    }

    /// Enables or disables the component, calling its enable or disable hook on change.
    pub fn set_component_enabled(
        &mut self,
        node: Node,
        id: ComponentId,
        enabled: bool,
    ) -> Result<(), SceneError> {
        let mut component = self
            .component_slot(node, id)
            .and_then(|slot| slot.component.take())
            .ok_or(SceneError::UnknownComponent { node, component: id })?;

        if component.enabled != enabled {
            component.enabled = enabled;
            let hook = if enabled {
                &mut component.on_enable
            } else {
                &mut component.on_disable
            };
            if let Some(hook) = hook {
                hook(self, node);
            }
        }

        self.restore_component(node, id, component);

        Ok(())
    }

    /// Subscribes a listener owned by the component. It is removed when the component is
    /// destroyed.
    pub fn listen_for_component(
        &mut self,
        node: Node,
        id: ComponentId,
        target: Node,
        kind: EventKind,
        listener: impl FnMut(&mut Scene, Node) + 'static,
    ) -> Result<ListenerId, SceneError> {
        if self.component(node, id).is_none() {
            return Err(SceneError::UnknownComponent { node, component: id });
        }

        let listener = self.listen(target, kind, listener)?;
        if let Some(component) = self.component_mut(node, id) {
            component.listeners.push((target, listener));
        }

        Ok(listener)
    }

    /// Detaches and destroys the component. Returns false if the node doesn't own it.
    pub fn destroy_component(&mut self, node: Node, id: ComponentId) -> bool {
        let Some(object) = self.get_mut(node) else {
            return false;
        };
        let Some(index) = object.components.iter().position(|slot| slot.id == id) else {
            return false;
        };

        // A component destroyed while it updates is finished once its update returns.
        if let Some(component) = object.components.remove(index).component {
            self.finish_destroy(component);
        }

        true
    }

    pub(crate) fn finish_destroy(&mut self, mut component: Component) {
        for (target, listener) in component.listeners.drain(..) {
            self.unlisten(target, listener);
        }
        if let Some(mut hook) = component.on_destroy.take() {
            hook(self, component.parent);
        }
        log::trace!("component of {:?} destroyed", component.parent);
    }

    fn restore_component(&mut self, node: Node, id: ComponentId, component: Component) {
        match self.component_slot(node, id) {
            Some(slot) => slot.component = Some(component),
            None => self.finish_destroy(component),
        }
    }

    // Replaces the behavior of the node's first component with the same tag, or attaches a new
    // component.
    pub(crate) fn upsert_component(
        &mut self,
        node: Node,
        kind: ComponentKind,
    ) -> Result<ComponentId, SceneError> {
        if !self.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }

        if let Some(id) = self.find_component(node, kind.tag()) {
            if let Some(component) = self.component_mut(node, id) {
                component.kind = kind;
                return Ok(id);
            }
        }

        self.add_component(node, kind)
    }

    pub(crate) fn update_components(&mut self, node: Node, dt: f32) {
        for id in self.component_ids(node) {
            let Some(mut component) = self
                .component_slot(node, id)
                .and_then(|slot| slot.component.take())
            else {
                continue;
            };

            let outcome = if component.enabled {
                component.kind.update(self, node, dt)
            } else {
                Outcome::Running
            };

            let destroy = matches!(outcome, Outcome::Finished { destroy: true, .. });
            let destroyed = if destroy {
                if let Some(object) = self.get_mut(node) {
                    object.components.retain(|slot| slot.id != id);
                }
                Some(component)
            } else {
                self.restore_component(node, id, component);
                None
            };

            match outcome {
                Outcome::Running => {}
                Outcome::Finished {
                    event, callback, ..
                } => {
                    self.emit(node, event);
                    if let Some(callback) = callback {
                        callback(self, node);
                    }
                }
                Outcome::Fired(callbacks) => {
                    for callback in callbacks {
                        callback(self, node);
                    }
                }
            }

            if let Some(component) = destroyed {
                self.finish_destroy(component);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::GameObject;
    use crate::KillOptions;

    struct Counter(Rc<Cell<u32>>);

    impl Behavior for Counter {
        fn update(&mut self, _scene: &mut Scene, _node: Node, _dt: f32) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct SelfDestruct;

    impl Behavior for SelfDestruct {
        fn update(&mut self, scene: &mut Scene, node: Node, _dt: f32) {
            let ids = scene.component_ids(node);
            for id in ids {
                scene.destroy_component(node, id);
            }
        }
    }

    #[test]
    fn add_component_parent_returns_owner() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());

        let id = scene.add_behavior(node, SelfDestruct).unwrap();

        assert_eq!(scene.component(node, id).unwrap().parent(), node);
        assert_eq!(scene.component_ids(node), [id]);
    }

    #[test]
    fn add_component_unknown_node_returns_error() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        scene.kill_me_please(node, KillOptions::default());

        assert!(scene.add_behavior(node, SelfDestruct).is_err());
    }

    #[test]
    fn update_enabled_component_updates_behavior() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let ticks = Rc::new(Cell::new(0));
        scene.add_behavior(node, Counter(ticks.clone())).unwrap();

        scene.update(node, 16.0);

        assert_eq!(ticks.get(), 1);
    }

    #[test]
    fn update_disabled_component_skips_behavior() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let ticks = Rc::new(Cell::new(0));
        let id = scene.add_behavior(node, Counter(ticks.clone())).unwrap();

        scene.set_component_enabled(node, id, false).unwrap();
        scene.update(node, 16.0);

        assert_eq!(ticks.get(), 0);
    }

    #[test]
    fn set_component_enabled_calls_hooks_on_change() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let id = scene.add_behavior(node, SelfDestruct).unwrap();
        let enables = Rc::new(Cell::new(0));
        let disables = Rc::new(Cell::new(0));
        let (on, off) = (enables.clone(), disables.clone());
        let component = scene.component_mut(node, id).unwrap();
        component.on_enable(move |_, _| on.set(on.get() + 1));
        component.on_disable(move |_, _| off.set(off.get() + 1));

        scene.set_component_enabled(node, id, false).unwrap();
        scene.set_component_enabled(node, id, false).unwrap();
        scene.set_component_enabled(node, id, true).unwrap();

        assert_eq!(disables.get(), 1);
        assert_eq!(enables.get(), 1);
    }

    #[test]
    fn destroy_component_calls_on_destroy_and_detaches() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let id = scene.add_behavior(node, SelfDestruct).unwrap();
        let destroyed = Rc::new(Cell::new(0));
        let counter = destroyed.clone();
        scene
            .component_mut(node, id)
            .unwrap()
            .on_destroy(move |_, _| counter.set(counter.get() + 1));

        assert!(scene.destroy_component(node, id));
        assert!(!scene.destroy_component(node, id));

        assert_eq!(destroyed.get(), 1);
        assert!(scene.component_ids(node).is_empty());
    }

    #[test]
    fn destroy_component_during_its_update_finishes_destroy_once() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let id = scene.add_behavior(node, SelfDestruct).unwrap();
        let destroyed = Rc::new(Cell::new(0));
        let counter = destroyed.clone();
        scene
            .component_mut(node, id)
            .unwrap()
            .on_destroy(move |_, _| counter.set(counter.get() + 1));

        scene.update(node, 16.0);
        scene.update(node, 16.0);

        assert_eq!(destroyed.get(), 1);
        assert!(scene.component_ids(node).is_empty());
    }

    #[test]
    fn destroy_component_removes_owned_listeners() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let other = scene.spawn(GameObject::new());
        let id = scene.add_behavior(node, SelfDestruct).unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        scene
            .listen_for_component(node, id, other, EventKind::MoveEnd, move |_, _| {
                counter.set(counter.get() + 1)
            })
            .unwrap();

        scene.emit(other, EventKind::MoveEnd);
        scene.destroy_component(node, id);
        scene.emit(other, EventKind::MoveEnd);

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn kill_me_please_destroys_components() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let id = scene.add_behavior(node, SelfDestruct).unwrap();
        let destroyed = Rc::new(Cell::new(0));
        let counter = destroyed.clone();
        scene
            .component_mut(node, id)
            .unwrap()
            .on_destroy(move |_, _| counter.set(counter.get() + 1));

        scene.kill_me_please(node, KillOptions::default());

        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn find_component_returns_first_with_tag() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let first = scene.add_behavior(node, SelfDestruct).unwrap();
        scene.add_behavior(node, SelfDestruct).unwrap();

        assert_eq!(scene.find_component(node, ComponentTag::Custom), Some(first));
        assert_eq!(scene.find_component(node, ComponentTag::Fade), None);
    }
}
