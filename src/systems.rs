//! # Systems

use nohash::IntMap;

use crate::Node;
use crate::Scene;
use crate::WorldTransform;

/// # Drawable
///
/// A visible node as the render pass sees it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Drawable {
    /// Drawn node.
    pub node: Node,
    /// World transform of the node.
    pub transform: WorldTransform,
    /// Opacity multiplied down from the root.
    pub alpha: f32,
}

/// Updates every root of the scene by `dt` milliseconds. Roots removed while updating don't make
/// the scan skip the next one.
pub fn update_roots(scene: &mut Scene, dt: f32) {
    let mut index = 0;
    while let Some(root) = scene.roots().get(index).copied() {
        scene.update(root, dt);

        if scene.roots().get(index) == Some(&root) {
            index += 1;
        }
    }
}

/// Computes the world transform of every node reachable from the roots.
pub fn compute_world_transforms(scene: &Scene) -> IntMap<Node, WorldTransform> {
    let mut transforms = IntMap::default();
    for root in scene.roots() {
        compute_world_transform_internal(scene, *root, WorldTransform::IDENTITY, &mut transforms);
    }

    transforms
}

fn compute_world_transform_internal(
    scene: &Scene,
    node: Node,
    parent_transform: WorldTransform,
    transforms: &mut IntMap<Node, WorldTransform>,
) {
    let Some(object) = scene.get(node) else {
        return;
    };

    let transform = parent_transform.then(object.transform());
    transforms.insert(node, transform);

    for child in object.children() {
        compute_world_transform_internal(scene, *child, transform, transforms);
    }
}

/// Collects the visible nodes under `root` in draw order. Hidden nodes hide their subtree.
pub fn collect_drawables(scene: &Scene, root: Node) -> Vec<Drawable> {
    let mut drawables = Vec::new();
    let parent_transform = scene
        .parent(root)
        .and_then(|parent| scene.world_transform(parent))
        .unwrap_or(WorldTransform::IDENTITY);
    collect_drawables_internal(scene, root, parent_transform, 1.0, &mut drawables);

    drawables
}

fn collect_drawables_internal(
    scene: &Scene,
    node: Node,
    parent_transform: WorldTransform,
    parent_alpha: f32,
    drawables: &mut Vec<Drawable>,
) {
    let Some(object) = scene.get(node).filter(|object| object.visible()) else {
        return;
    };

    let transform = parent_transform.then(object.transform());
    let alpha = parent_alpha * object.alpha();
    drawables.push(Drawable {
        node,
        transform,
        alpha,
    });

    for child in object.children() {
        collect_drawables_internal(scene, *child, transform, alpha, drawables);
    }
}
