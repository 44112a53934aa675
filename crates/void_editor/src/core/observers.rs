//! Change notification for editor state.
//!
//! Commands and session loads report what they touched here; panels and
//! tools subscribe instead of polling the scene.

use void_scene::NodeId;

/// Handler for a single object or script change.
pub type ChangeHandler = Box<dyn Fn(&NodeId) + Send + Sync>;

/// Handler for structural scene changes (add, remove, reparent, reload).
pub type GraphHandler = Box<dyn Fn() + Send + Sync>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

#[derive(Default)]
pub struct ChangeObservers {
    object_changed: Vec<(SubscriberId, ChangeHandler)>,
    scene_graph_changed: Vec<(SubscriberId, GraphHandler)>,
    script_changed: Vec<(SubscriberId, ChangeHandler)>,
    next_subscriber_id: u64,
}

impl ChangeObservers {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;
        id
    }

    pub fn on_object_changed<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&NodeId) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.object_changed.push((id, Box::new(handler)));
        id
    }

    pub fn on_scene_graph_changed<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.scene_graph_changed.push((id, Box::new(handler)));
        id
    }

    pub fn on_script_changed<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&NodeId) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.script_changed.push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription of any kind.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.object_changed.retain(|(sub, _)| *sub != id);
        self.scene_graph_changed.retain(|(sub, _)| *sub != id);
        self.script_changed.retain(|(sub, _)| *sub != id);
    }

    pub fn notify_object_changed(&self, id: &NodeId) {
        for (_, handler) in &self.object_changed {
            handler(id);
        }
    }

    pub fn notify_scene_graph_changed(&self) {
        for (_, handler) in &self.scene_graph_changed {
            handler();
        }
    }

    pub fn notify_script_changed(&self, id: &NodeId) {
        for (_, handler) in &self.script_changed {
            handler(id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.object_changed.len() + self.scene_graph_changed.len() + self.script_changed.len()
    }
}

impl std::fmt::Debug for ChangeObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeObservers")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
