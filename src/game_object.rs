use std::collections::BTreeMap;

use glam::Vec2;

use crate::automatism::Automatism;
use crate::automatism::Automatisms;
use crate::automatism::Method;
use crate::components::ComponentSlot;
use crate::event::ListenerSlot;
use crate::renderable::DebugAxis;
use crate::renderable::Renderable;
use crate::LocalTransform;
use crate::Node;
use crate::SceneError;

/// Flag value marking an object as pending deletion.
pub const DELETE_FLAG: &str = "delete";

/// # Kill Options
///
/// Which lifecycle events a kill emits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KillOptions {
    /// Emit `kill` when the object is flagged for deletion.
    pub kill_event: bool,
    /// Emit `killed` when the object is destroyed.
    pub killed_event: bool,
}

impl KillOptions {
    /// Emits no event.
    pub const SILENT: Self = Self {
        kill_event: false,
        killed_event: false,
    };
}

impl Default for KillOptions {
    fn default() -> Self {
        Self {
            kill_event: true,
            killed_event: true,
        }
    }
}

/// # Property
///
/// Numeric property of a game object, addressed by a dotted path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Property {
    /// `x` or `position.x`.
    X,
    /// `y` or `position.y`.
    Y,
    /// `scale.x`.
    ScaleX,
    /// `scale.y`.
    ScaleY,
    /// `rotation`.
    Rotation,
    /// `alpha`.
    Alpha,
    /// `z_scale`.
    ZScale,
    /// `extras.<key>`.
    Extra(String),
}

impl Property {
    /// Resolves a dotted path to a property.
    pub fn parse(path: &str) -> Result<Self, SceneError> {
        let property = match path {
            "x" | "position.x" => Property::X,
            "y" | "position.y" => Property::Y,
            "scale.x" => Property::ScaleX,
            "scale.y" => Property::ScaleY,
            "rotation" => Property::Rotation,
            "alpha" => Property::Alpha,
            "z_scale" => Property::ZScale,
            path => match path.strip_prefix("extras.") {
                Some(key) if !key.is_empty() => Property::Extra(key.to_string()),
                _ => return Err(SceneError::UnknownProperty(path.to_string())),
            },
        };

        Ok(property)
    }
}

/// # Game Object
///
/// Node of the scene tree. Build one with the `with_*` methods and hand it to
/// [crate::Scene::spawn].
pub struct GameObject {
    name: String,
    tag: String,
    flag: String,
    updatable: bool,
    visible: bool,
    transform: LocalTransform,
    alpha: f32,
    z_scale: f32,
    z_index: f32,
    world_scale: Vec2,
    sortable_children: Option<bool>,
    extras: BTreeMap<String, f32>,
    version: u64,
    seen_version: u64,
    has_moved: bool,
    pub(crate) kill_options: KillOptions,
    pub(crate) parent: Option<Node>,
    pub(crate) children: Vec<Node>,
    pub(crate) automatisms: Automatisms,
    pub(crate) methods: BTreeMap<String, Method>,
    pub(crate) renderables: Vec<Box<dyn Renderable>>,
    pub(crate) components: Vec<ComponentSlot>,
    pub(crate) listeners: Vec<ListenerSlot>,
    pub(crate) debug_axis: Option<DebugAxis>,
}

impl GameObject {
    /// Returns an enabled, visible object at the origin.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            tag: String::new(),
            flag: String::new(),
            updatable: true,
            visible: true,
            transform: LocalTransform::IDENTITY,
            alpha: 1.0,
            z_scale: 1.0,
            z_index: 0.0,
            world_scale: Vec2::ONE,
            sortable_children: None,
            extras: BTreeMap::new(),
            version: 0,
            seen_version: 0,
            has_moved: false,
            kill_options: KillOptions::default(),
            parent: None,
            children: Vec::new(),
            automatisms: Automatisms::default(),
            methods: BTreeMap::new(),
            renderables: Vec::new(),
            components: Vec::new(),
            listeners: Vec::new(),
            debug_axis: None,
        }
    }

    /// Returns the object with the given name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the object with the given tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Returns the object at the given position.
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    /// Returns the object with the given scale.
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.transform.scale = scale;
        self.world_scale = scale;
        self
    }

    /// Returns the object with the given rotation.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Returns the object with the given alpha.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Returns the object with the given depth factor used by camera perspective.
    pub fn with_z_scale(mut self, z_scale: f32) -> Self {
        self.z_scale = z_scale;
        self
    }

    /// Returns the object with the given z-index.
    pub fn with_z_index(mut self, z_index: f32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Returns the object with sortable children, overriding the scene default.
    pub fn with_sortable_children(mut self, sortable: bool) -> Self {
        self.sortable_children = Some(sortable);
        self
    }

    /// Returns the object with the renderable attached.
    pub fn with_renderable(mut self, renderable: impl Renderable + 'static) -> Self {
        self.renderables.push(Box::new(renderable));
        self
    }

    /// Returns the object with an extra value.
    pub fn with_extra(mut self, key: impl Into<String>, value: f32) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Sets the tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Returns the free-form flag.
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Sets the free-form flag. Setting [DELETE_FLAG] marks the object for deletion on the next
    /// update of its parent.
    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.flag = flag.into();
    }

    /// Returns true if the object waits for its parent to delete it.
    pub fn is_pending_delete(&self) -> bool {
        self.flag == DELETE_FLAG
    }

    /// Returns true if the object is updated.
    pub fn updatable(&self) -> bool {
        self.updatable
    }

    /// Returns true if the object is updated and visible.
    pub fn enabled(&self) -> bool {
        self.updatable && self.visible
    }

    pub(crate) fn set_updatable(&mut self, updatable: bool) {
        self.updatable = updatable;
    }

    /// Returns true if the object is visible.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Sets the visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns the local transform.
    pub fn transform(&self) -> &LocalTransform {
        &self.transform
    }

    /// Returns the position relative to the parent.
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Sets the position relative to the parent.
    pub fn set_position(&mut self, position: Vec2) {
        if self.transform.position != position {
            self.transform.position = position;
            self.version += 1;
        }
    }

    /// Moves the object by the given offset.
    pub fn translate(&mut self, offset: Vec2) {
        self.set_position(self.transform.position + offset);
    }

    // Moves the object without touching the transform version.
    pub(crate) fn place(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    /// Returns the local scale.
    pub fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    /// Sets the local scale. Call [crate::Scene::update_world_scale] afterwards if the world scale
    /// of the subtree is read.
    pub fn set_scale(&mut self, scale: Vec2) {
        if self.transform.scale != scale {
            self.transform.scale = scale;
            self.version += 1;
        }
    }

    /// Returns the rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    /// Sets the rotation in radians.
    pub fn set_rotation(&mut self, rotation: f32) {
        if self.transform.rotation != rotation {
            self.transform.rotation = rotation;
            self.version += 1;
        }
    }

    /// Returns the opacity.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Sets the opacity.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    /// Returns the depth factor used by camera perspective. 1 means no displacement.
    pub fn z_scale(&self) -> f32 {
        self.z_scale
    }

    /// Sets the depth factor used by camera perspective.
    pub fn set_z_scale(&mut self, z_scale: f32) {
        self.z_scale = z_scale;
    }

    /// Returns the z-index used to sort siblings.
    pub fn z_index(&self) -> f32 {
        self.z_index
    }

    /// Sets the z-index. Takes effect on the next [crate::Scene::sort_children].
    pub fn set_z_index(&mut self, z_index: f32) {
        self.z_index = z_index;
    }

    /// Returns the cached world scale.
    pub fn world_scale(&self) -> Vec2 {
        self.world_scale
    }

    pub(crate) fn set_world_scale(&mut self, world_scale: Vec2) {
        self.world_scale = world_scale;
    }

    pub(crate) fn sortable_children(&self) -> Option<bool> {
        self.sortable_children
    }

    pub(crate) fn set_sortable_children(&mut self, sortable: bool) {
        self.sortable_children = Some(sortable);
    }

    /// Returns true if the transform changed during the last update.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub(crate) fn refresh_has_moved(&mut self) {
        self.has_moved = self.version != self.seen_version;
        self.seen_version = self.version;
    }

    /// Returns the parent.
    pub fn parent(&self) -> Option<Node> {
        self.parent
    }

    /// Returns the children in update order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the extra value stored under the key.
    pub fn extra(&self, key: &str) -> Option<f32> {
        self.extras.get(key).copied()
    }

    /// Stores an extra value.
    pub fn set_extra(&mut self, key: impl Into<String>, value: f32) {
        self.extras.insert(key.into(), value);
    }

    /// Returns the automatism registered under the id.
    pub fn automatism(&self, id: &str) -> Option<&Automatism> {
        self.automatisms.get(id)
    }

    /// Returns the ids of the registered automatisms in registration order.
    pub fn automatism_ids(&self) -> impl Iterator<Item = &str> {
        self.automatisms.ids()
    }

    /// Returns the attached renderables.
    pub fn renderables(&self) -> &[Box<dyn Renderable>] {
        &self.renderables
    }

    /// Returns the size of the first renderable scaled by the local scale, or zero.
    pub fn size(&self) -> Vec2 {
        self.renderables
            .first()
            .map(|renderable| renderable.size() * self.transform.scale)
            .unwrap_or(Vec2::ZERO)
    }

    /// Returns the debug overlay, present while debug mode is on.
    pub fn debug_axis(&self) -> Option<&DebugAxis> {
        self.debug_axis.as_ref()
    }

    /// Returns the property value.
    pub fn property(&self, property: &Property) -> Option<f32> {
        let value = match property {
            Property::X => self.transform.position.x,
            Property::Y => self.transform.position.y,
            Property::ScaleX => self.transform.scale.x,
            Property::ScaleY => self.transform.scale.y,
            Property::Rotation => self.transform.rotation,
            Property::Alpha => self.alpha,
            Property::ZScale => self.z_scale,
            Property::Extra(key) => return self.extra(key),
        };

        Some(value)
    }

    /// Sets the property value.
    pub fn set_property(&mut self, property: &Property, value: f32) {
        match property {
            Property::X => self.set_position(Vec2::new(value, self.transform.position.y)),
            Property::Y => self.set_position(Vec2::new(self.transform.position.x, value)),
            Property::ScaleX => self.set_scale(Vec2::new(value, self.transform.scale.y)),
            Property::ScaleY => self.set_scale(Vec2::new(self.transform.scale.x, value)),
            Property::Rotation => self.set_rotation(value),
            Property::Alpha => self.set_alpha(value),
            Property::ZScale => self.set_z_scale(value),
            Property::Extra(key) => self.set_extra(key.clone(), value),
        }
    }
}

impl Default for GameObject {
    fn default() -> Self {
        Self::new()
    }
}
