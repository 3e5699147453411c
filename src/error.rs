use crate::ComponentId;
use crate::Node;

/// # Scene Error
///
/// Errors returned by operations that construct or restructure the scene. Per-frame updates never
/// return these, they degrade to no-ops instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The node doesn't exist in the scene (never spawned or already destroyed).
    #[error("unknown node {0:?}")]
    UnknownNode(Node),

    /// Adding the child would make a node its own ancestor.
    #[error("adding {child:?} to {parent:?} would create a cycle")]
    Cycle {
        /// Node that would become the parent.
        parent: Node,
        /// Node that would become the child.
        child: Node,
    },

    /// No automatism is registered under the id.
    #[error("node {node:?} has no automatism `{id}`")]
    UnknownAutomatism {
        /// Node that was queried.
        node: Node,
        /// Automatism id.
        id: String,
    },

    /// The component doesn't belong to the node.
    #[error("node {node:?} has no component {component:?}")]
    UnknownComponent {
        /// Node that was queried.
        node: Node,
        /// Component id.
        component: ComponentId,
    },

    /// The property path can't be resolved to a tweenable property.
    #[error("unknown property path `{0}`")]
    UnknownProperty(String),
}

/// # Run Error
///
/// Errors stopping [crate::Application::run] before or while the window runs.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    /// The event loop couldn't be created or failed while running.
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window couldn't be created.
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}
