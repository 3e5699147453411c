use crate::Node;
use crate::Scene;

/// Callback invoked when a subscribed event is emitted on a node.
pub type Listener = Box<dyn FnMut(&mut Scene, Node)>;

/// # Event Kind
///
/// Named events emitted on nodes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// A fade finished.
    FadeEnd,
    /// A scale animation finished.
    ScaleEnd,
    /// A move finished.
    MoveEnd,
    /// A shake finished.
    ShakeEnd,
    /// The node was asked to die and is pending deletion.
    Kill,
    /// The node is being destroyed.
    Killed,
    /// The debug overlay setting changed.
    ChangeDebug,
    /// Application defined event.
    Custom(String),
}

impl EventKind {
    /// Returns the wire name of the event.
    pub fn name(&self) -> &str {
        match self {
            EventKind::FadeEnd => "fadeEnd",
            EventKind::ScaleEnd => "scale-end",
            EventKind::MoveEnd => "moveEnd",
            EventKind::ShakeEnd => "shakeEnd",
            EventKind::Kill => "kill",
            EventKind::Killed => "killed",
            EventKind::ChangeDebug => "change-debug",
            EventKind::Custom(name) => name,
        }
    }

    /// Returns the event for the given name, falling back to [EventKind::Custom].
    pub fn from_name(name: &str) -> Self {
        match name {
            "fadeEnd" => EventKind::FadeEnd,
            "scale-end" => EventKind::ScaleEnd,
            "moveEnd" => EventKind::MoveEnd,
            "shakeEnd" => EventKind::ShakeEnd,
            "kill" => EventKind::Kill,
            "killed" => EventKind::Killed,
            "change-debug" => EventKind::ChangeDebug,
            name => EventKind::Custom(name.to_string()),
        }
    }
}

/// # Node Event
///
/// Entry of the scene event log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeEvent {
    /// Node the event was emitted on.
    pub node: Node,
    /// Event that was emitted.
    pub kind: EventKind,
}

/// # Listener Id
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ListenerId(pub(crate) usize);

pub(crate) struct ListenerSlot {
    pub(crate) id: ListenerId,
    pub(crate) kind: EventKind,
    // None while the listener is running.
    pub(crate) listener: Option<Listener>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_name_returns_same_name() {
        for name in [
            "fadeEnd",
            "scale-end",
            "moveEnd",
            "shakeEnd",
            "kill",
            "killed",
            "change-debug",
            "landed",
        ] {
            assert_eq!(EventKind::from_name(name).name(), name);
        }
    }

    #[test]
    fn from_name_unknown_returns_custom() {
        assert_eq!(
            EventKind::from_name("landed"),
            EventKind::Custom("landed".to_string())
        );
    }
}
