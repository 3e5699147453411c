use glam::Vec2;

use crate::components::ComponentId;
use crate::components::ComponentKind;
use crate::components::ComponentTag;
use crate::components::Outcome;
use crate::Node;
use crate::Scene;
use crate::SceneError;
use crate::WorldTransform;

/// # Focus Options
///
/// Axes tracked by a focus and the offset added to the followed position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FocusOptions {
    /// Offset added to the followed position.
    pub offset: Vec2,
    /// Track the x axis.
    pub x: bool,
    /// Track the y axis.
    pub y: bool,
    /// Track the rotation.
    pub rotation: bool,
}

impl FocusOptions {
    /// Returns the options with the given offset.
    pub fn offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the options with the tracked axes.
    pub fn axes(mut self, x: bool, y: bool, rotation: bool) -> Self {
        self.x = x;
        self.y = y;
        self.rotation = rotation;
        self
    }
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            x: true,
            y: true,
            rotation: true,
        }
    }
}

/// # Focus
///
/// Makes its node follow a target node every frame.
///
/// When the target is a descendant of the node, following it directly would move the target
/// along. The node then moves opposite to the target's offset inside it instead, which keeps the
/// target pinned at the node's parent-space origin plus the offset. Whether the target is a
/// descendant is decided once, when the focus starts.
pub struct Focus {
    target: Option<Node>,
    options: FocusOptions,
    target_is_child: bool,
}

impl Focus {
    /// Returns the followed node.
    pub fn target(&self) -> Option<Node> {
        self.target
    }

    /// Returns true if the target was a descendant when the focus started.
    pub fn target_is_child(&self) -> bool {
        self.target_is_child
    }

    pub(crate) fn update(&mut self, scene: &mut Scene, node: Node) -> Outcome {
        let Some(target) = self.target else {
            return Outcome::Running;
        };
        if !scene.contains(target) {
            log::debug!("focus target {target:?} of {node:?} is gone");
            self.target = None;
            return Outcome::Running;
        }

        let followed = if self.target_is_child {
            relative_transform(scene, target, node).map(|relative| {
                (-relative.position(), -relative.rotation)
            })
        } else {
            let parent = scene
                .parent(node)
                .and_then(|parent| scene.world_transform(parent))
                .unwrap_or(WorldTransform::IDENTITY);
            // A parent scaled to zero has no local space to follow in.
            scene.world_transform(target).and_then(|world| {
                parent
                    .to_local(world.position())
                    .map(|position| (position, world.rotation - parent.rotation))
            })
        };

        let (Some((position, rotation)), Some(object)) = (followed, scene.get_mut(node)) else {
            return Outcome::Running;
        };

        let position = position + self.options.offset;
        let current = object.position();
        object.set_position(Vec2::new(
            if self.options.x { position.x } else { current.x },
            if self.options.y { position.y } else { current.y },
        ));
        if self.options.rotation {
            object.set_rotation(rotation);
        }

        Outcome::Running
    }
}

// Transform of `node` in the space of its ancestor `ancestor`.
fn relative_transform(scene: &Scene, node: Node, ancestor: Node) -> Option<WorldTransform> {
    let mut chain = Vec::new();
    let mut current = node;
    while current != ancestor {
        let object = scene.get(current)?;
        chain.push(object.transform());
        current = object.parent()?;
    }

    Some(
        chain
            .into_iter()
            .rev()
            .fold(WorldTransform::IDENTITY, |world, local| world.then(local)),
    )
}

impl Scene {
    /// Makes the node follow the target, replacing any previous focus.
    pub fn focus(
        &mut self,
        node: Node,
        target: Node,
        options: FocusOptions,
    ) -> Result<ComponentId, SceneError> {
        if !self.contains(target) {
            return Err(SceneError::UnknownNode(target));
        }

        let mut target_is_child = false;
        let mut ancestor = self.parent(target);
        while let Some(current) = ancestor {
            if current == node {
                target_is_child = true;
                break;
            }
            ancestor = self.parent(current);
        }

        self.upsert_component(
            node,
            ComponentKind::Focus(Focus {
                target: Some(target),
                options,
                target_is_child,
            }),
        )
    }

    /// Stops following. Returns false if the node has no focus.
    pub fn stop_focus(&mut self, node: Node) -> bool {
        let Some(id) = self.find_component(node, ComponentTag::Focus) else {
            return false;
        };

        match self.component_mut(node, id).map(|component| component.kind_mut()) {
            Some(ComponentKind::Focus(focus)) => {
                focus.target = None;
                true
            }
            _ => false,
        }
    }
}
