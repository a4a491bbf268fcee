use std::collections::HashMap;
use tracing::debug;

use crate::core::packet::Guid;
use crate::entity::player::PlayerState;

/// Remote players known to this session, keyed by originator.
///
/// Holds at most one entry per guid. The local player is never stored here.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    players: HashMap<Guid, PlayerState>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, guid: Guid) -> Option<&PlayerState> {
        self.players.get(&guid)
    }

    pub fn get_mut(&mut self, guid: Guid) -> Option<&mut PlayerState> {
        self.players.get_mut(&guid)
    }

    pub fn contains(&self, guid: Guid) -> bool {
        self.players.contains_key(&guid)
    }

    /// Look up a remote player, creating it on first sight.
    ///
    /// The flag is `true` when the entry was created by this call.
    pub fn get_or_insert(&mut self, guid: Guid) -> (&mut PlayerState, bool) {
        let mut created = false;
        let player = self.players.entry(guid).or_insert_with(|| {
            created = true;
            debug!(%guid, "Registering remote player");
            PlayerState::new(guid)
        });
        (player, created)
    }

    pub fn remove(&mut self, guid: Guid) -> Option<PlayerState> {
        self.players.remove(&guid)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Guid, &PlayerState)> {
        self.players.iter()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_insert_creates_once() {
        let mut dir = PlayerDirectory::new();
        let (player, created) = dir.get_or_insert(Guid(42));
        assert!(created);
        player.chat_message = "hello".into();

        let (player, created) = dir.get_or_insert(Guid(42));
        assert!(!created);
        assert_eq!(player.chat_message, "hello");
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn remove_drops_entry() {
        let mut dir = PlayerDirectory::new();
        dir.get_or_insert(Guid(1));
        assert!(dir.remove(Guid(1)).is_some());
        assert!(dir.is_empty());
        assert!(dir.remove(Guid(1)).is_none());
    }
}
