//! In-memory cell store.
//!
//! Backs headless clients and tests. Objects are keyed by [`ObjectKey`], so
//! repeating a mutation with the same payload leaves the cell unchanged.

use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::world::cell::{CellHandle, CellId, CellStore};
use crate::world::event::{ActorDescriptor, ContainerItem, EventAction, ObjectKey, WorldObject};

#[derive(Debug, Clone, Default)]
pub struct MemoryCell {
    id: CellId,
    pub objects: BTreeMap<ObjectKey, WorldObject>,
    pub actors: Vec<ActorDescriptor>,
    pub local_shorts: HashMap<(ObjectKey, i32), i32>,
    pub local_floats: HashMap<(ObjectKey, i32), f32>,
    /// Whether this client simulates the cell's actors
    pub local_authority: bool,
}

impl MemoryCell {
    pub fn new(id: CellId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn object(&self, key: ObjectKey) -> Option<&WorldObject> {
        self.objects.get(&key)
    }

    fn update_each<F>(&mut self, objects: &[WorldObject], mut f: F)
    where
        F: FnMut(&mut WorldObject, &WorldObject),
    {
        for incoming in objects {
            match self.objects.get_mut(&incoming.key) {
                Some(existing) => f(existing, incoming),
                None => debug!(cell = %self.id, refid = %incoming.refid, "Object not in cell"),
            }
        }
    }
}

fn merge_items(items: &mut Vec<ContainerItem>, action: EventAction, incoming: &[ContainerItem]) {
    match action {
        EventAction::Set => *items = incoming.to_vec(),
        EventAction::Add => {
            for item in incoming {
                match items
                    .iter_mut()
                    .find(|i| i.refid == item.refid && i.charge == item.charge)
                {
                    Some(existing) => existing.count = existing.count.saturating_add(item.count),
                    None => items.push(item.clone()),
                }
            }
        }
        EventAction::Remove => {
            for item in incoming {
                if let Some(existing) = items
                    .iter_mut()
                    .find(|i| i.refid == item.refid && i.charge == item.charge)
                {
                    let taken = item.action_count.max(item.count);
                    existing.count = existing.count.saturating_sub(taken);
                }
            }
            items.retain(|i| i.count > 0);
        }
        EventAction::Request => {}
    }
}

impl CellHandle for MemoryCell {
    fn id(&self) -> &CellId {
        &self.id
    }

    fn actors(&self) -> Vec<ActorDescriptor> {
        self.actors.clone()
    }

    fn containers(&self, requested: &[WorldObject]) -> Vec<WorldObject> {
        if requested.is_empty() {
            return self
                .objects
                .values()
                .filter(|o| !o.container_items.is_empty())
                .cloned()
                .collect();
        }
        requested
            .iter()
            .filter_map(|r| self.objects.get(&r.key).cloned())
            .collect()
    }

    fn edit_containers(&mut self, action: EventAction, objects: &[WorldObject]) {
        self.update_each(objects, |existing, incoming| {
            merge_items(&mut existing.container_items, action, &incoming.container_items);
        });
    }

    fn place_objects(&mut self, objects: &[WorldObject]) {
        for object in objects {
            self.objects.insert(object.key, object.clone());
        }
    }

    fn delete_objects(&mut self, objects: &[WorldObject]) {
        for object in objects {
            self.objects.remove(&object.key);
        }
    }

    fn lock_objects(&mut self, objects: &[WorldObject]) {
        self.update_each(objects, |existing, incoming| {
            existing.lock_level = incoming.lock_level;
        });
    }

    fn unlock_objects(&mut self, objects: &[WorldObject]) {
        self.update_each(objects, |existing, _| existing.lock_level = 0);
    }

    fn scale_objects(&mut self, objects: &[WorldObject]) {
        self.update_each(objects, |existing, incoming| existing.scale = incoming.scale);
    }

    fn move_objects(&mut self, objects: &[WorldObject]) {
        self.update_each(objects, |existing, incoming| {
            existing.position.pos = incoming.position.pos;
        });
    }

    fn rotate_objects(&mut self, objects: &[WorldObject]) {
        self.update_each(objects, |existing, incoming| {
            existing.position.rot = incoming.position.rot;
        });
    }

    fn animate_objects(&mut self, objects: &[WorldObject]) {
        self.update_each(objects, |existing, incoming| {
            existing.anim_group = incoming.anim_group.clone();
            existing.anim_mode = incoming.anim_mode;
        });
    }

    fn activate_doors(&mut self, objects: &[WorldObject]) {
        self.update_each(objects, |existing, incoming| {
            existing.door_state = incoming.door_state;
        });
    }

    fn set_local_shorts(&mut self, objects: &[WorldObject]) {
        for object in objects {
            self.local_shorts
                .insert((object.key, object.index), object.short_value);
        }
    }

    fn set_local_floats(&mut self, objects: &[WorldObject]) {
        for object in objects {
            self.local_floats
                .insert((object.key, object.index), object.float_value);
        }
    }
}

/// Loaded cells by id.
#[derive(Debug, Default)]
pub struct MemoryCellStore {
    cells: HashMap<CellId, MemoryCell>,
}

impl MemoryCellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a cell as loaded, returning it for seeding
    pub fn load(&mut self, id: CellId) -> &mut MemoryCell {
        self.cells
            .entry(id.clone())
            .or_insert_with(|| MemoryCell::new(id))
    }

    pub fn unload(&mut self, id: &CellId) -> Option<MemoryCell> {
        self.cells.remove(id)
    }

    pub fn cell(&self, id: &CellId) -> Option<&MemoryCell> {
        self.cells.get(id)
    }

    pub fn is_loaded(&self, id: &CellId) -> bool {
        self.cells.contains_key(id)
    }
}

impl CellStore for MemoryCellStore {
    fn get_cell(&mut self, id: &CellId) -> Option<&mut dyn CellHandle> {
        self.cells
            .get_mut(id)
            .map(|cell| cell as &mut dyn CellHandle)
    }

    fn initialize_local_actors(&mut self, id: &CellId) -> bool {
        match self.cells.get_mut(id) {
            Some(cell) => {
                cell.local_authority = true;
                true
            }
            None => false,
        }
    }
}
