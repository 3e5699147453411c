use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use glam::Vec2;
use nohash::IntMap;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::automatism::Automatism;
use crate::automatism::Method;
use crate::event::Listener;
use crate::event::ListenerSlot;
use crate::game_object::KillOptions;
use crate::game_object::DELETE_FLAG;
use crate::renderable::DebugAxis;
use crate::Arguments;
use crate::AutomatismOptions;
use crate::Config;
use crate::EventKind;
use crate::GameObject;
use crate::ListenerId;
use crate::NodeEvent;
use crate::Renderable;
use crate::SceneError;
use crate::WorldTransform;

static ALLOCATOR: AtomicUsize = AtomicUsize::new(1);

/// # Node
///
/// Handle of a game object. Ids are unique across every scene of the process.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Node {
    id: usize,
}

impl Node {
    fn new() -> Self {
        Self {
            id: ALLOCATOR.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Returns the unique id of the node.
    pub fn id(self) -> usize {
        self.id
    }
}

impl nohash::IsEnabled for Node {}

/// # Scene
///
/// Arena owning every game object and the tree linking them.
///
/// Objects are updated by calling [Scene::update] on each root once per frame. Updating a node
/// takes back its shake offset, then runs its automatisms, then its children in order, then its
/// renderables and components.
/// Children flagged for deletion are destroyed when their parent reaches them, never while a
/// sibling is being updated.
pub struct Scene {
    config: Config,
    objects: IntMap<Node, GameObject>,
    roots: Vec<Node>,
    methods: BTreeMap<String, Method>,
    events: Vec<NodeEvent>,
    rng: SmallRng,
    next_handle: usize,
}

impl Scene {
    /// Returns an empty scene with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Returns an empty scene with the given configuration.
    pub fn with_config(config: Config) -> Self {
        let mut scene = Self {
            config,
            objects: IntMap::default(),
            roots: Vec::new(),
            methods: BTreeMap::new(),
            events: Vec::new(),
            rng: SmallRng::from_entropy(),
            next_handle: 1,
        };
        scene.define_builtin_methods();
        scene
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reseeds the random generator used by shakes.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub(crate) fn next_handle(&mut self) -> usize {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    pub(crate) fn object_and_rng(&mut self, node: Node) -> Option<(&mut GameObject, &mut SmallRng)> {
        let object = self.objects.get_mut(&node)?;
        Some((object, &mut self.rng))
    }

    pub(crate) fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Returns true if the scene contains the given node.
    pub fn contains(&self, node: Node) -> bool {
        self.objects.contains_key(&node)
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the object for the given node.
    pub fn get(&self, node: Node) -> Option<&GameObject> {
        self.objects.get(&node)
    }

    /// Returns the object for the given node.
    pub fn get_mut(&mut self, node: Node) -> Option<&mut GameObject> {
        self.objects.get_mut(&node)
    }

    /// Adds the object to the scene as a root.
    pub fn spawn(&mut self, mut object: GameObject) -> Node {
        let node = Node::new();

        if object.sortable_children().is_none() {
            object.set_sortable_children(self.config.default_sortable_children);
        }
        if self.config.debug {
            object.debug_axis = Some(DebugAxis::DEFAULT);
        }

        self.objects.insert(node, object);
        self.roots.push(node);
        log::trace!("spawned {node:?}");

        node
    }

    /// Returns the roots in update order.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Registers a detached node as a root.
    pub fn add_root(&mut self, node: Node) -> Result<(), SceneError> {
        if !self.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }

        self.detach(node);
        self.roots.push(node);
        self.update_world_scale(node);

        Ok(())
    }

    /// Returns the parent node for the given node.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.objects.get(&node).and_then(|object| object.parent)
    }

    /// Returns the children for the given node.
    pub fn children(&self, node: Node) -> Option<&[Node]> {
        self.objects.get(&node).map(|object| object.children.as_slice())
    }

    /// Returns the first child with the given name.
    pub fn child_by_name(&self, node: Node, name: &str) -> Option<Node> {
        self.children(node)?
            .iter()
            .copied()
            .find(|child| self.get(*child).is_some_and(|object| object.name() == name))
    }

    /// Adds the child to the parent, removing it from its previous parent first. Fails if either
    /// node doesn't exist or if the child is the parent or one of its ancestors.
    pub fn add(&mut self, parent: Node, child: Node) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownNode(child));
        }

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(SceneError::Cycle { parent, child });
            }
            ancestor = self.parent(current);
        }

        self.detach(child);

        let mut sortable = false;
        if let Some(object) = self.objects.get_mut(&parent) {
            object.children.push(child);
            sortable = object.sortable_children() == Some(true);
        }
        if let Some(object) = self.objects.get_mut(&child) {
            object.parent = Some(parent);
        }

        if sortable {
            self.sort_children(parent);
        }
        self.update_world_scale(child);

        Ok(())
    }

    /// Adds every child to the parent in order. Stops at the first failure.
    pub fn add_all(&mut self, parent: Node, children: &[Node]) -> Result<(), SceneError> {
        for child in children {
            self.add(parent, *child)?;
        }

        Ok(())
    }

    /// Detaches the child from the parent. The child stays alive but is no longer updated until
    /// it is added somewhere again. Returns false if the child doesn't belong to the parent.
    pub fn remove(&mut self, parent: Node, child: Node) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }

        self.detach(child);
        self.update_world_scale(child);

        true
    }

    fn detach(&mut self, node: Node) {
        let parent = self
            .objects
            .get_mut(&node)
            .and_then(|object| object.parent.take());

        match parent {
            Some(parent) => {
                if let Some(object) = self.objects.get_mut(&parent) {
                    object.children.retain(|child| *child != node);
                }
            }
            None => self.roots.retain(|root| *root != node),
        }
    }

    /// Stable-sorts the children of the node by z-index.
    pub fn sort_children(&mut self, node: Node) {
        let Some(children) = self.children(node) else {
            return;
        };

        let mut keyed: Vec<(f32, Node)> = children
            .iter()
            .map(|child| (self.get(*child).map_or(0.0, GameObject::z_index), *child))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        if let Some(object) = self.objects.get_mut(&node) {
            object.children = keyed.into_iter().map(|(_, child)| child).collect();
        }
    }

    /// Recomputes the cached world scale of the node and its descendants.
    pub fn update_world_scale(&mut self, node: Node) {
        let parent_scale = self
            .parent(node)
            .and_then(|parent| self.get(parent))
            .map(GameObject::world_scale);

        let Some(object) = self.objects.get_mut(&node) else {
            return;
        };

        let world_scale = match parent_scale {
            Some(parent_scale) => object.scale() * parent_scale,
            None => object.scale(),
        };
        object.set_world_scale(world_scale);

        for child in object.children.clone() {
            self.update_world_scale(child);
        }
    }

    /// Returns the world transform of the node.
    pub fn world_transform(&self, node: Node) -> Option<WorldTransform> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(node) = current {
            let object = self.get(node)?;
            chain.push(object.transform());
            current = object.parent;
        }

        Some(
            chain
                .into_iter()
                .rev()
                .fold(WorldTransform::IDENTITY, |world, local| world.then(local)),
        )
    }

    /// Returns the world position of the node.
    pub fn world_position(&self, node: Node) -> Option<Vec2> {
        self.world_transform(node).map(|world| world.position())
    }

    /// Returns the world rotation of the node.
    pub fn world_rotation(&self, node: Node) -> Option<f32> {
        self.world_transform(node).map(|world| world.rotation)
    }

    /// Enables or disables the node. Disabled nodes are neither updated nor visible.
    pub fn set_enabled(&mut self, node: Node, enabled: bool) {
        if let Some(object) = self.objects.get_mut(&node) {
            object.set_updatable(enabled);
            object.set_visible(enabled);
        }
    }

    /// Attaches a renderable to the node.
    pub fn attach_renderable(
        &mut self,
        node: Node,
        renderable: impl Renderable + 'static,
    ) -> Result<(), SceneError> {
        let object = self
            .objects
            .get_mut(&node)
            .ok_or(SceneError::UnknownNode(node))?;
        object.renderables.push(Box::new(renderable));

        Ok(())
    }

    /// Asks the node to die. The node is flagged and its parent deletes it on its next update.
    /// Roots and children of disabled parents are killed right away since nothing would ever
    /// update them again.
    pub fn ask_to_kill(&mut self, node: Node, options: KillOptions) {
        let Some(object) = self.objects.get(&node) else {
            return;
        };

        let immediate = match object.parent {
            Some(parent) => !self.get(parent).is_some_and(GameObject::updatable),
            None => true,
        };
        if immediate {
            self.kill_me_please(node, options);
            return;
        }

        if let Some(object) = self.objects.get_mut(&node) {
            object.set_flag(DELETE_FLAG);
            object.kill_options = options;
        }
        self.set_enabled(node, false);
        log::debug!("{node:?} pending delete");

        if options.kill_event {
            self.emit(node, EventKind::Kill);
        }
    }

    /// Destroys the node and its whole subtree now.
    pub fn kill_me_please(&mut self, node: Node, options: KillOptions) {
        if !self.contains(node) {
            return;
        }

        if options.killed_event {
            self.emit(node, EventKind::Killed);
        }
        self.set_enabled(node, false);

        loop {
            let child = match self.objects.get_mut(&node) {
                Some(object) if !object.children.is_empty() => object.children.remove(0),
                _ => break,
            };
            if let Some(object) = self.objects.get_mut(&child) {
                object.parent = None;
            }
            let child_options = self.get(child).map_or_else(KillOptions::default, |c| c.kill_options);
            self.kill_me_please(child, child_options);
        }

        self.detach(node);

        let slots = self
            .objects
            .get_mut(&node)
            .map(|object| std::mem::take(&mut object.components))
            .unwrap_or_default();
        for component in slots.into_iter().filter_map(|slot| slot.component) {
            self.finish_destroy(component);
        }

        if let Some(mut object) = self.objects.remove(&node) {
            for renderable in &mut object.renderables {
                renderable.destroy();
            }
        }
        log::debug!("{node:?} destroyed");
    }

    /// Removes the node from its parent and destroys it.
    pub fn delete(&mut self, node: Node) {
        let options = self
            .get(node)
            .map_or_else(KillOptions::default, |object| object.kill_options);
        self.detach(node);
        self.kill_me_please(node, options);
    }

    /// Deletes every child of the node now.
    pub fn delete_all(&mut self, node: Node) {
        while let Some(child) = self.children(node).and_then(|children| children.first().copied()) {
            self.delete(child);
        }
    }

    /// Updates the node and its subtree by `dt` milliseconds. Does nothing for disabled nodes.
    pub fn update(&mut self, node: Node, dt: f32) {
        let Some(object) = self.objects.get_mut(&node).filter(|object| object.updatable()) else {
            return;
        };
        object.undo_shake();

        self.update_automatisms(node, dt);

        let mut index = 0;
        loop {
            let Some(child) = self
                .children(node)
                .and_then(|children| children.get(index).copied())
            else {
                break;
            };

            match self.get(child).map(GameObject::is_pending_delete) {
                Some(false) => {
                    self.update(child, dt);
                    index += 1;
                }
                // The child leaves the list, so the next one moves into this index.
                Some(true) => self.delete(child),
                None => {
                    if let Some(object) = self.objects.get_mut(&node) {
                        object.children.remove(index);
                    }
                }
            }
        }

        if let Some(object) = self.objects.get_mut(&node) {
            if object.visible() {
                for renderable in &mut object.renderables {
                    renderable.update(dt);
                }
            }
        }

        self.update_components(node, dt);

        if let Some(object) = self.objects.get_mut(&node) {
            object.refresh_has_moved();
        }
    }

    /// Moves every shaking object back to its resting position. The shake offset is applied again
    /// when the object's shake component next updates.
    pub fn undo_shakes(&mut self) {
        for object in self.objects.values_mut() {
            object.undo_shake();
        }
    }

    /// Registers a method callable by automatisms of every object.
    pub fn define_method(
        &mut self,
        name: impl Into<String>,
        method: impl Fn(&mut Scene, Node, &Arguments) + 'static,
    ) {
        self.methods.insert(name.into(), Rc::new(method));
    }

    /// Registers a method callable by automatisms of the node only. Shadows scene methods.
    pub fn define_object_method(
        &mut self,
        node: Node,
        name: impl Into<String>,
        method: impl Fn(&mut Scene, Node, &Arguments) + 'static,
    ) -> Result<(), SceneError> {
        let object = self
            .objects
            .get_mut(&node)
            .ok_or(SceneError::UnknownNode(node))?;
        object.methods.insert(name.into(), Rc::new(method));

        Ok(())
    }

    fn resolve_method(&self, node: Node, name: &str) -> Option<Method> {
        self.get(node)
            .and_then(|object| object.methods.get(name))
            .or_else(|| self.methods.get(name))
            .cloned()
    }

    /// Calls the named method on the node right away. Returns false if the method doesn't
    /// resolve.
    pub fn call_method(&mut self, node: Node, name: &str, arguments: &Arguments) -> bool {
        match self.resolve_method(node, name) {
            Some(method) => {
                method(self, node, arguments);
                true
            }
            None => {
                log::warn!("{node:?} has no method `{name}`");
                false
            }
        }
    }

    /// Registers an automatism under `id`, replacing any automatism with the same id. The method
    /// defaults to `id`. Returns false, leaving the automatisms untouched, if the method doesn't
    /// resolve.
    pub fn add_automatism(
        &mut self,
        node: Node,
        id: &str,
        method: Option<&str>,
        options: AutomatismOptions,
    ) -> Result<bool, SceneError> {
        if !self.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }

        let method = method.unwrap_or(id);
        if self.resolve_method(node, method).is_none() {
            log::warn!("automatism `{id}` of {node:?}: no method `{method}`");
            return Ok(false);
        }

        if let Some(object) = self.objects.get_mut(&node) {
            let automatism = Automatism::new(method.to_string(), options);
            if object.automatisms.insert(id.to_string(), automatism).is_some() {
                log::debug!("automatism `{id}` of {node:?} replaced");
            }
        }

        Ok(true)
    }

    /// Returns true if the node has an automatism registered under `id`.
    pub fn has_automatism(&self, node: Node, id: &str) -> bool {
        self.get(node)
            .is_some_and(|object| object.automatisms.contains_key(id))
    }

    /// Removes the automatism. Returns false if there was none.
    pub fn remove_automatism(&mut self, node: Node, id: &str) -> bool {
        let removed = self
            .objects
            .get_mut(&node)
            .and_then(|object| object.automatisms.remove(id))
            .is_some();
        if !removed {
            log::warn!("{node:?} has no automatism `{id}` to remove");
        }

        removed
    }

    /// Removes every automatism of the node.
    pub fn remove_automatisms(&mut self, node: Node) {
        if let Some(object) = self.objects.get_mut(&node) {
            object.automatisms.clear();
        }
    }

    /// Negates the arguments of the automatism, or its value pair if it has no arguments.
    pub fn inverse_automatism(&mut self, node: Node, id: &str) -> Result<(), SceneError> {
        let automatism = self
            .objects
            .get_mut(&node)
            .ok_or(SceneError::UnknownNode(node))?
            .automatisms
            .get_mut(id)
            .ok_or_else(|| SceneError::UnknownAutomatism {
                node,
                id: id.to_string(),
            })?;
        automatism.inverse();

        Ok(())
    }

    fn update_automatisms(&mut self, node: Node, dt: f32) {
        let Some(ids) = self
            .get(node)
            .map(|object| object.automatisms.ids().map(str::to_string).collect::<Vec<_>>())
        else {
            return;
        };

        for id in ids {
            let Some(object) = self.objects.get_mut(&node) else {
                return;
            };
            let Some(automatism) = object.automatisms.get_mut(&id) else {
                continue;
            };
            if !automatism.tick(dt) {
                continue;
            }

            let method = automatism.method.clone();
            let arguments = automatism.arguments();
            if !automatism.persistent {
                object.automatisms.remove(&id);
            }

            self.call_method(node, &method, &arguments);
        }
    }

    /// Emits the event on the node: logs it and calls the node's listeners for it.
    pub fn emit(&mut self, node: Node, kind: EventKind) {
        if !self.contains(node) {
            return;
        }

        self.events.push(NodeEvent {
            node,
            kind: kind.clone(),
        });

        if kind == EventKind::ChangeDebug {
            let debug = self.config.debug;
            if let Some(object) = self.objects.get_mut(&node) {
                object.debug_axis = debug.then_some(DebugAxis::DEFAULT);
            }
        }

        let ids: Vec<ListenerId> = match self.get(node) {
            Some(object) => object
                .listeners
                .iter()
                .filter(|slot| slot.kind == kind)
                .map(|slot| slot.id)
                .collect(),
            None => return,
        };

        for id in ids {
            let Some(mut listener) = self
                .listener_slot(node, id)
                .and_then(|slot| slot.listener.take())
            else {
                continue;
            };

            listener(self, node);

            if let Some(slot) = self.listener_slot(node, id) {
                slot.listener = Some(listener);
            }
        }
    }

    fn listener_slot(&mut self, node: Node, id: ListenerId) -> Option<&mut ListenerSlot> {
        self.objects
            .get_mut(&node)?
            .listeners
            .iter_mut()
            .find(|slot| slot.id == id)
    }

    /// Subscribes to an event emitted on the node.
    pub fn listen(
        &mut self,
        node: Node,
        kind: EventKind,
        listener: impl FnMut(&mut Scene, Node) + 'static,
    ) -> Result<ListenerId, SceneError> {
        self.listen_boxed(node, kind, Box::new(listener))
    }

    pub(crate) fn listen_boxed(
        &mut self,
        node: Node,
        kind: EventKind,
        listener: Listener,
    ) -> Result<ListenerId, SceneError> {
        if !self.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }

        let id = ListenerId(self.next_handle());
        if let Some(object) = self.objects.get_mut(&node) {
            object.listeners.push(ListenerSlot {
                id,
                kind,
                listener: Some(listener),
            });
        }

        Ok(id)
    }

    /// Unsubscribes the listener. Returns false if it wasn't subscribed.
    pub fn unlisten(&mut self, node: Node, id: ListenerId) -> bool {
        let Some(object) = self.objects.get_mut(&node) else {
            return false;
        };

        let count = object.listeners.len();
        object.listeners.retain(|slot| slot.id != id);
        object.listeners.len() != count
    }

    /// Returns the events emitted since the last [Scene::clear_events].
    pub fn events(&self) -> &[NodeEvent] {
        &self.events
    }

    /// Clears the event log.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Turns the debug overlay on or off and notifies every object with a `change-debug` event.
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;

        let nodes: Vec<Node> = self.objects.keys().copied().collect();
        for node in nodes {
            self.emit(node, EventKind::ChangeDebug);
        }
    }

    fn define_builtin_methods(&mut self) {
        self.define_method("translate", |scene, node, args| {
            if let Some(object) = scene.get_mut(node) {
                object.translate(Vec2::new(
                    args.get(0).unwrap_or(0.0),
                    args.get(1).unwrap_or(0.0),
                ));
            }
        });
        self.define_method("translate_x", |scene, node, args| {
            if let Some(object) = scene.get_mut(node) {
                object.translate(Vec2::new(args.get(0).unwrap_or(0.0), 0.0));
            }
        });
        self.define_method("translate_y", |scene, node, args| {
            if let Some(object) = scene.get_mut(node) {
                object.translate(Vec2::new(0.0, args.get(0).unwrap_or(0.0)));
            }
        });
        self.define_method("rotate", |scene, node, args| {
            if let Some(object) = scene.get_mut(node) {
                object.set_rotation(object.rotation() + args.get(0).unwrap_or(0.0));
            }
        });
        self.define_method("set_alpha", |scene, node, args| {
            if let Some(object) = scene.get_mut(node) {
                object.set_alpha(args.get(0).unwrap_or(1.0));
            }
        });
        self.define_method("scale_by", |scene, node, args| {
            let Some(object) = scene.get_mut(node) else {
                return;
            };
            let x = args.get(0).unwrap_or(1.0);
            let y = args.get(1).unwrap_or(x);
            object.set_scale(object.scale() * Vec2::new(x, y));
            scene.update_world_scale(node);
        });
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::cell::RefCell;

    use approx::assert_relative_eq;

    use super::*;

    fn counting_scene() -> Scene {
        let mut scene = Scene::new();
        scene.define_method("count", |scene, node, _| {
            if let Some(object) = scene.get_mut(node) {
                let count = object.extra("count").unwrap_or(0.0);
                object.set_extra("count", count + 1.0);
            }
        });
        scene
    }

    fn count(scene: &Scene, node: Node) -> f32 {
        scene.get(node).and_then(|o| o.extra("count")).unwrap_or(0.0)
    }

    #[test]
    fn spawn_contains_returns_true() {
        let mut scene = Scene::new();

        let node = scene.spawn(GameObject::new());

        assert!(scene.contains(node));
        assert_eq!(scene.roots(), &[node]);
    }

    #[test]
    fn spawn_get_parent_returns_none() {
        let mut scene = Scene::new();

        let node = scene.spawn(GameObject::new());

        assert_eq!(scene.parent(node), None);
    }

    #[test]
    fn add_get_children_returns_child() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());

        scene.add(parent, child).unwrap();

        assert_eq!(scene.children(parent), Some([child].as_slice()));
        assert_eq!(scene.parent(child), Some(parent));
        assert_eq!(scene.roots(), &[parent]);
    }

    #[test]
    fn add_reparent_removes_from_previous_parent() {
        let mut scene = Scene::new();
        let first = scene.spawn(GameObject::new());
        let second = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());
        scene.add(first, child).unwrap();

        scene.add(second, child).unwrap();

        assert_eq!(scene.children(first), Some([].as_slice()));
        assert_eq!(scene.children(second), Some([child].as_slice()));
    }

    #[test]
    fn add_self_returns_cycle_error() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());

        assert_eq!(
            scene.add(node, node),
            Err(SceneError::Cycle {
                parent: node,
                child: node
            })
        );
    }

    #[test]
    fn add_ancestor_returns_cycle_error() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());
        scene.add(parent, child).unwrap();

        assert!(scene.add(child, parent).is_err());
        assert_eq!(scene.parent(parent), None);
    }

    #[test]
    fn add_destroyed_node_returns_unknown_node() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());
        scene.kill_me_please(child, KillOptions::default());

        assert_eq!(scene.add(parent, child), Err(SceneError::UnknownNode(child)));
    }

    #[test]
    fn add_composes_world_scale() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new().with_scale(Vec2::splat(0.5)));
        let child = scene.spawn(GameObject::new().with_scale(Vec2::splat(0.5)));

        scene.add(parent, child).unwrap();

        assert_eq!(scene.get(child).unwrap().world_scale(), Vec2::splat(0.25));
    }

    #[test]
    fn set_scale_does_not_refresh_world_scale_until_asked() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new().with_scale(Vec2::splat(0.5)));
        scene.add(parent, child).unwrap();

        scene.get_mut(parent).unwrap().set_scale(Vec2::splat(2.0));
        assert_eq!(scene.get(child).unwrap().world_scale(), Vec2::splat(0.5));

        scene.update_world_scale(parent);
        assert_eq!(scene.get(child).unwrap().world_scale(), Vec2::ONE);
    }

    #[test]
    fn remove_detaches_and_resets_world_scale() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new().with_scale(Vec2::splat(2.0)));
        let child = scene.spawn(GameObject::new());
        scene.add(parent, child).unwrap();

        assert!(scene.remove(parent, child));

        assert_eq!(scene.parent(child), None);
        assert!(!scene.roots().contains(&child));
        assert_eq!(scene.get(child).unwrap().world_scale(), Vec2::ONE);
    }

    #[test]
    fn remove_other_parent_returns_false() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());

        assert!(!scene.remove(parent, child));
    }

    #[test]
    fn add_sortable_parent_orders_by_z_index() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new().with_sortable_children(true));
        let back = scene.spawn(GameObject::new().with_z_index(-1.0));
        let front = scene.spawn(GameObject::new().with_z_index(5.0));
        let middle = scene.spawn(GameObject::new());

        scene.add_all(parent, &[front, middle, back]).unwrap();

        assert_eq!(scene.children(parent), Some([back, middle, front].as_slice()));
    }

    #[test]
    fn spawn_default_sortable_children_from_config() {
        let mut scene = Scene::with_config(Config {
            default_sortable_children: true,
            debug: false,
        });
        let parent = scene.spawn(GameObject::new());
        let high = scene.spawn(GameObject::new().with_z_index(1.0));
        let low = scene.spawn(GameObject::new());

        scene.add_all(parent, &[high, low]).unwrap();

        assert_eq!(scene.children(parent), Some([low, high].as_slice()));
    }

    #[test]
    fn child_by_name_returns_child() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new().with_name("hero"));
        scene.add(parent, child).unwrap();

        assert_eq!(scene.child_by_name(parent, "hero"), Some(child));
        assert_eq!(scene.child_by_name(parent, "villain"), None);
    }

    #[test]
    fn world_position_applies_parent_transform() {
        let mut scene = Scene::new();
        let parent = scene.spawn(
            GameObject::new()
                .with_position(Vec2::new(100.0, 50.0))
                .with_scale(Vec2::splat(2.0)),
        );
        let child = scene.spawn(GameObject::new().with_position(Vec2::new(10.0, 10.0)));
        scene.add(parent, child).unwrap();

        assert_eq!(scene.world_position(child), Some(Vec2::new(120.0, 70.0)));
    }

    #[test]
    fn ask_to_kill_root_destroys_now() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());

        scene.ask_to_kill(node, KillOptions::default());

        assert!(!scene.contains(node));
        assert!(scene.roots().is_empty());
    }

    #[test]
    fn ask_to_kill_child_defers_to_parent_update() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());
        scene.add(parent, child).unwrap();

        scene.ask_to_kill(child, KillOptions::default());

        assert!(scene.contains(child));
        assert!(scene.get(child).unwrap().is_pending_delete());
        assert!(!scene.get(child).unwrap().updatable());
        assert_eq!(
            scene.events(),
            &[NodeEvent {
                node: child,
                kind: EventKind::Kill
            }]
        );

        scene.update(parent, 16.0);

        assert!(!scene.contains(child));
        assert_eq!(scene.children(parent), Some([].as_slice()));
    }

    #[test]
    fn ask_to_kill_child_of_disabled_parent_destroys_now() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());
        scene.add(parent, child).unwrap();
        scene.set_enabled(parent, false);

        scene.ask_to_kill(child, KillOptions::default());

        assert!(!scene.contains(child));
        assert_eq!(scene.children(parent), Some([].as_slice()));
    }

    #[test]
    fn ask_to_kill_silent_emits_no_events() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());
        scene.add(parent, child).unwrap();

        scene.ask_to_kill(child, KillOptions::SILENT);
        scene.update(parent, 16.0);

        assert!(scene.events().is_empty());
    }

    #[test]
    fn kill_me_please_destroys_subtree() {
        let mut scene = Scene::new();
        let root = scene.spawn(GameObject::new());
        let child = scene.spawn(GameObject::new());
        let grandchild = scene.spawn(GameObject::new());
        scene.add(root, child).unwrap();
        scene.add(child, grandchild).unwrap();

        scene.kill_me_please(root, KillOptions::default());

        assert!(scene.is_empty());
        let killed: Vec<Node> = scene
            .events()
            .iter()
            .filter(|event| event.kind == EventKind::Killed)
            .map(|event| event.node)
            .collect();
        assert_eq!(killed, [root, child, grandchild]);
    }

    #[test]
    fn kill_me_please_destroys_renderables() {
        struct Probe(Rc<Cell<u32>>);
        impl Renderable for Probe {
            fn size(&self) -> Vec2 {
                Vec2::ONE
            }
            fn destroy(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut scene = Scene::new();
        let destroyed = Rc::new(Cell::new(0));
        let node = scene.spawn(GameObject::new().with_renderable(Probe(destroyed.clone())));

        scene.kill_me_please(node, KillOptions::default());

        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn update_kill_during_scan_updates_every_other_sibling_once() {
        let mut scene = counting_scene();
        let parent = scene.spawn(GameObject::new());
        let children: Vec<Node> = (0..5).map(|_| scene.spawn(GameObject::new())).collect();
        scene.add_all(parent, &children).unwrap();
        for child in &children {
            scene
                .add_automatism(*child, "count", None, AutomatismOptions::default())
                .unwrap();
        }
        let victim = children[2];
        scene
            .define_object_method(children[0], "kill_victim", move |scene, _, _| {
                scene.ask_to_kill(victim, KillOptions::default());
            })
            .unwrap();
        scene
            .add_automatism(
                children[0],
                "kill_victim",
                None,
                AutomatismOptions::default().once(),
            )
            .unwrap();

        scene.update(parent, 16.0);

        assert!(!scene.contains(victim));
        for child in [children[0], children[1], children[3], children[4]] {
            assert_eq!(count(&scene, child), 1.0);
        }
    }

    #[test]
    fn update_self_kill_is_removed_next_frame() {
        let mut scene = counting_scene();
        let parent = scene.spawn(GameObject::new());
        let children: Vec<Node> = (0..4).map(|_| scene.spawn(GameObject::new())).collect();
        scene.add_all(parent, &children).unwrap();
        for child in &children {
            scene
                .add_automatism(*child, "count", None, AutomatismOptions::default())
                .unwrap();
        }
        scene
            .define_object_method(children[1], "die", |scene, node, _| {
                scene.ask_to_kill(node, KillOptions::default());
            })
            .unwrap();
        scene
            .add_automatism(children[1], "die", None, AutomatismOptions::default())
            .unwrap();

        scene.update(parent, 16.0);

        assert!(scene.contains(children[1]));
        for child in &children {
            assert_eq!(count(&scene, *child), 1.0);
        }

        scene.update(parent, 16.0);

        assert!(!scene.contains(children[1]));
        assert_eq!(
            scene.children(parent),
            Some([children[0], children[2], children[3]].as_slice())
        );
        for child in [children[0], children[2], children[3]] {
            assert_eq!(count(&scene, child), 2.0);
        }
    }

    #[test]
    fn update_disabled_does_nothing() {
        let mut scene = counting_scene();
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "count", None, AutomatismOptions::default())
            .unwrap();
        scene.set_enabled(node, false);

        scene.update(node, 16.0);

        assert_eq!(count(&scene, node), 0.0);
    }

    #[test]
    fn delete_all_destroys_children() {
        let mut scene = Scene::new();
        let parent = scene.spawn(GameObject::new());
        let children: Vec<Node> = (0..3).map(|_| scene.spawn(GameObject::new())).collect();
        scene.add_all(parent, &children).unwrap();

        scene.delete_all(parent);

        assert_eq!(scene.len(), 1);
        assert_eq!(scene.children(parent), Some([].as_slice()));
    }

    #[test]
    fn automatism_fires_without_drift() {
        let mut scene = counting_scene();
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "tick", Some("count"), AutomatismOptions::default().interval(100.0))
            .unwrap();

        for _ in 0..10 {
            scene.update(node, 30.0);
        }
        scene.update(node, 10.0);

        assert_eq!(count(&scene, node), 3.0);
        let automatism = scene.get(node).unwrap().automatism("tick").unwrap();
        assert_relative_eq!(automatism.time_since_last_call(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn automatism_passes_values() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "translate", None, AutomatismOptions::default().values(2.0, 3.0))
            .unwrap();

        scene.update(node, 16.0);
        scene.update(node, 16.0);

        assert_eq!(scene.get(node).unwrap().position(), Vec2::new(4.0, 6.0));
    }

    #[test]
    fn automatism_spreads_args() {
        let mut scene = Scene::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        scene.define_method("record", move |_, _, args| {
            sink.borrow_mut().push(args.clone());
        });
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "record", None, AutomatismOptions::default().args([1.0, 2.0, 3.0]))
            .unwrap();

        scene.update(node, 16.0);

        assert_eq!(*received.borrow(), [Arguments::Spread(vec![1.0, 2.0, 3.0])]);
    }

    #[test]
    fn automatisms_fire_in_registration_order() {
        let mut scene = Scene::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        scene.define_method("record", move |_, _, args| {
            sink.borrow_mut().push(args.get(0));
        });
        let node = scene.spawn(GameObject::new());
        for (id, value) in [("zeta", 1.0), ("alpha", 2.0), ("mid", 3.0)] {
            scene
                .add_automatism(node, id, Some("record"), AutomatismOptions::default().value1(value))
                .unwrap();
        }
        scene
            .add_automatism(node, "zeta", Some("record"), AutomatismOptions::default().value1(4.0))
            .unwrap();

        scene.update(node, 16.0);

        assert_eq!(*received.borrow(), [Some(4.0), Some(2.0), Some(3.0)]);
        let ids: Vec<&str> = scene.get(node).unwrap().automatism_ids().collect();
        assert_eq!(ids, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn automatism_not_persistent_fires_once() {
        let mut scene = counting_scene();
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "count", None, AutomatismOptions::default().once())
            .unwrap();

        for _ in 0..5 {
            scene.update(node, 16.0);
        }

        assert_eq!(count(&scene, node), 1.0);
        assert!(!scene.has_automatism(node, "count"));
    }

    #[test]
    fn add_automatism_unknown_method_returns_false() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());

        let added = scene
            .add_automatism(node, "fly", None, AutomatismOptions::default())
            .unwrap();

        assert!(!added);
        assert!(!scene.has_automatism(node, "fly"));
    }

    #[test]
    fn add_automatism_same_id_replaces() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "move", Some("translate_x"), AutomatismOptions::default().value1(1.0))
            .unwrap();

        scene
            .add_automatism(node, "move", Some("translate_y"), AutomatismOptions::default().value1(1.0))
            .unwrap();
        scene.update(node, 16.0);

        assert_eq!(scene.get(node).unwrap().position(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn object_method_shadows_scene_method() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        scene
            .define_object_method(node, "rotate", |scene, node, _| {
                scene.get_mut(node).unwrap().set_extra("custom", 1.0);
            })
            .unwrap();

        assert!(scene.call_method(node, "rotate", &Arguments::Pair(Some(1.0), None)));

        assert_eq!(scene.get(node).unwrap().rotation(), 0.0);
        assert_eq!(scene.get(node).unwrap().extra("custom"), Some(1.0));
    }

    #[test]
    fn remove_automatism_missing_returns_false() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());

        assert!(!scene.remove_automatism(node, "nothing"));
    }

    #[test]
    fn remove_automatisms_clears_all() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "rotate", None, AutomatismOptions::default())
            .unwrap();
        scene
            .add_automatism(node, "translate", None, AutomatismOptions::default())
            .unwrap();

        scene.remove_automatisms(node);

        assert_eq!(scene.get(node).unwrap().automatism_ids().count(), 0);
    }

    #[test]
    fn inverse_automatism_reverses_direction() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "translate_x", None, AutomatismOptions::default().value1(5.0))
            .unwrap();
        scene.update(node, 16.0);

        scene.inverse_automatism(node, "translate_x").unwrap();
        scene.update(node, 16.0);
        scene.update(node, 16.0);

        assert_eq!(scene.get(node).unwrap().position(), Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn inverse_automatism_missing_returns_error() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());

        assert_eq!(
            scene.inverse_automatism(node, "ghost"),
            Err(SceneError::UnknownAutomatism {
                node,
                id: "ghost".to_string()
            })
        );
    }

    #[test]
    fn update_tracks_has_moved() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        scene
            .add_automatism(node, "move", Some("translate_x"), AutomatismOptions::default().value1(1.0).once())
            .unwrap();

        scene.update(node, 16.0);
        assert!(scene.get(node).unwrap().has_moved());

        scene.update(node, 16.0);
        assert!(!scene.get(node).unwrap().has_moved());
    }

    #[test]
    fn update_visible_updates_renderables() {
        struct Probe(Rc<Cell<f32>>);
        impl Renderable for Probe {
            fn size(&self) -> Vec2 {
                Vec2::new(10.0, 4.0)
            }
            fn update(&mut self, dt: f32) {
                self.0.set(self.0.get() + dt);
            }
        }

        let mut scene = Scene::new();
        let elapsed = Rc::new(Cell::new(0.0));
        let node = scene.spawn(GameObject::new().with_scale(Vec2::splat(2.0)));
        scene.attach_renderable(node, Probe(elapsed.clone())).unwrap();

        scene.update(node, 16.0);
        scene.get_mut(node).unwrap().set_visible(false);
        scene.update(node, 16.0);

        assert_eq!(elapsed.get(), 16.0);
        assert_eq!(scene.get(node).unwrap().size(), Vec2::new(20.0, 8.0));
    }

    #[test]
    fn listen_emit_calls_listener() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        scene
            .listen(node, EventKind::Custom("jump".to_string()), move |_, _| {
                counter.set(counter.get() + 1);
            })
            .unwrap();

        scene.emit(node, EventKind::Custom("jump".to_string()));
        scene.emit(node, EventKind::Custom("land".to_string()));

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn unlisten_stops_calls() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let id = scene
            .listen(node, EventKind::FadeEnd, move |_, _| counter.set(counter.get() + 1))
            .unwrap();

        assert!(scene.unlisten(node, id));
        scene.emit(node, EventKind::FadeEnd);

        assert_eq!(calls.get(), 0);
        assert!(!scene.unlisten(node, id));
    }

    #[test]
    fn listener_unlistening_itself_is_not_called_again() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let id = Rc::new(Cell::new(None));
        let own_id = id.clone();
        let listener = scene
            .listen(node, EventKind::Kill, move |scene, node| {
                counter.set(counter.get() + 1);
                if let Some(id) = own_id.get() {
                    scene.unlisten(node, id);
                }
            })
            .unwrap();
        id.set(Some(listener));

        scene.emit(node, EventKind::Kill);
        scene.emit(node, EventKind::Kill);

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn clear_events_events_returns_empty() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        scene.emit(node, EventKind::MoveEnd);

        scene.clear_events();

        assert!(scene.events().is_empty());
    }

    #[test]
    fn set_debug_toggles_debug_axis() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());

        scene.set_debug(true);
        assert!(scene.get(node).unwrap().debug_axis().is_some());
        let late = scene.spawn(GameObject::new());
        assert!(scene.get(late).unwrap().debug_axis().is_some());

        scene.set_debug(false);
        assert!(scene.get(node).unwrap().debug_axis().is_none());
        assert!(scene.get(late).unwrap().debug_axis().is_none());
    }
}
