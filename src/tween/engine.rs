use crate::tween::ChainedTween;
use crate::tween::Tween;
use crate::Scene;

/// # Tween Id
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TweenId(usize);

enum Entry {
    Single(Tween),
    Chain(ChainedTween),
}

impl Entry {
    fn update(&mut self, scene: &mut Scene, dt: f32) -> bool {
        match self {
            Entry::Single(tween) => tween.update(scene, dt),
            Entry::Chain(chain) => chain.update(scene, dt),
        }
    }
}

/// # Tween Engine
///
/// Registry of running tweens, advanced once per frame before the scene. Finished tweens leave
/// the registry on the frame they complete.
#[derive(Default)]
pub struct TweenEngine {
    entries: Vec<(TweenId, Entry)>,
    next_id: usize,
}

impl TweenEngine {
    /// Returns an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tween.
    pub fn add(&mut self, tween: Tween) -> TweenId {
        self.register(Entry::Single(tween))
    }

    /// Registers a chain of tweens.
    pub fn add_chain(&mut self, chain: ChainedTween) -> TweenId {
        self.register(Entry::Chain(chain))
    }

    fn register(&mut self, entry: Entry) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, entry));
        id
    }

    /// Returns the registered tween.
    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.entries.iter().find_map(|(entry_id, entry)| match entry {
            Entry::Single(tween) if *entry_id == id => Some(tween),
            _ => None,
        })
    }

    fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.entries
            .iter_mut()
            .find_map(|(entry_id, entry)| match entry {
                Entry::Single(tween) if *entry_id == id => Some(tween),
                _ => None,
            })
    }

    /// Restarts a registered tween. Returns false if it is no longer registered.
    pub fn start(&mut self, id: TweenId) -> bool {
        match self.get_mut(id) {
            Some(tween) => {
                tween.start();
                true
            }
            None => false,
        }
    }

    /// Pauses a registered tween. Returns false if it is no longer registered.
    pub fn stop(&mut self, id: TweenId) -> bool {
        match self.get_mut(id) {
            Some(tween) => {
                tween.stop();
                true
            }
            None => false,
        }
    }

    /// Removes a tween or chain without completing it.
    pub fn remove(&mut self, id: TweenId) -> bool {
        let len = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != len
    }

    /// Returns true if the tween is registered and running. Chains are always running.
    pub fn is_active(&self, id: TweenId) -> bool {
        self.entries.iter().any(|(entry_id, entry)| {
            *entry_id == id
                && match entry {
                    Entry::Single(tween) => tween.is_active(),
                    Entry::Chain(_) => true,
                }
        })
    }

    /// Returns the number of registered tweens and chains.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every registered tween.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Advances every registered tween by `dt` milliseconds.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) {
        let mut index = 0;
        while index < self.entries.len() {
            let (id, entry) = &mut self.entries[index];
            if entry.update(scene, dt) {
                log::trace!("tween {id:?} completed");
                self.entries.swap_remove(index);
            } else {
                index += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::GameObject;

    #[test]
    fn update_removes_completed_without_skipping() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let mut engine = TweenEngine::new();
        engine.add(Tween::new(node, "x", 10.0, 10.0).unwrap());
        engine.add(Tween::new(node, "y", 10.0, 20.0).unwrap());
        engine.add(Tween::new(node, "rotation", 1.0, 10.0).unwrap());

        engine.update(&mut scene, 10.0);

        let object = scene.get(node).unwrap();
        assert_eq!(object.position(), Vec2::new(10.0, 5.0));
        assert_eq!(object.rotation(), 1.0);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn start_resumes_paused_tween() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let mut engine = TweenEngine::new();
        let id = engine.add(Tween::new(node, "alpha", 0.0, 10.0).unwrap().paused());

        engine.update(&mut scene, 10.0);
        assert!(!engine.is_active(id));
        assert_eq!(scene.get(node).unwrap().alpha(), 1.0);

        assert!(engine.start(id));
        engine.update(&mut scene, 10.0);

        assert_eq!(scene.get(node).unwrap().alpha(), 0.0);
        assert!(engine.is_empty());
        assert!(!engine.start(id));
    }

    #[test]
    fn stop_keeps_tween_registered() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let mut engine = TweenEngine::new();
        let id = engine.add(Tween::new(node, "x", 100.0, 100.0).unwrap());

        engine.update(&mut scene, 50.0);
        assert!(engine.stop(id));
        engine.update(&mut scene, 50.0);

        assert_eq!(scene.get(node).unwrap().position().x, 50.0);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn add_chain_runs_until_done() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let mut engine = TweenEngine::new();
        engine.add_chain(
            ChainedTween::new()
                .then(Tween::new(node, "x", 5.0, 10.0).unwrap())
                .then(Tween::wait(10.0))
                .then(Tween::new(node, "x", 0.0, 10.0).unwrap()),
        );

        for _ in 0..2 {
            engine.update(&mut scene, 10.0);
        }
        assert_eq!(scene.get(node).unwrap().position().x, 5.0);

        engine.update(&mut scene, 10.0);
        assert_eq!(scene.get(node).unwrap().position().x, 0.0);
        assert!(engine.is_empty());
    }

    #[test]
    fn remove_and_clear_drop_tweens() {
        let mut scene = Scene::new();
        let node = scene.spawn(GameObject::new());
        let mut engine = TweenEngine::new();
        let first = engine.add(Tween::wait(10.0));
        engine.add(Tween::new(node, "x", 5.0, 10.0).unwrap());

        assert!(engine.remove(first));
        assert!(!engine.remove(first));
        assert!(engine.get(first).is_none());
        engine.clear();

        assert!(engine.is_empty());
    }
}
