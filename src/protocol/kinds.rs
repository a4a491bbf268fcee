//! Message kind ids.
//!
//! The three domains own disjoint id ranges. Ids below 134 belong to the
//! transport's own control messages.

/// Content manifest exchange, handled by the session before registry lookup
pub const GAME_PREINIT: u8 = 134;

wire_enum! {
    pub enum PlayerKind {
        Handshake = 135,
        BaseInfo = 136,
        Position = 137,
        UserMyId = 138,
        UserDisconnected = 139,
        Equipment = 140,
        Inventory = 141,
        Spellbook = 142,
        Journal = 143,
        Attack = 144,
        DynamicStats = 145,
        Death = 146,
        Resurrect = 147,
        CellChange = 148,
        CellState = 149,
        DrawState = 150,
        ChatMessage = 151,
        CharGen = 152,
        Attribute = 153,
        Skill = 154,
        Level = 155,
        GuiMessageBox = 156,
        CharClass = 157,
        GameTime = 158,
        GameConsole = 159,
    }
}

wire_enum! {
    pub enum ActorKind {
        ActorList = 170,
        ActorAuthority = 171,
    }
}

wire_enum! {
    pub enum WorldKind {
        Container = 180,
        ObjectPlace = 181,
        ObjectDelete = 182,
        ObjectLock = 183,
        ObjectUnlock = 184,
        ObjectScale = 185,
        ObjectMove = 186,
        ObjectRotate = 187,
        ObjectAnimPlay = 188,
        DoorState = 189,
        ScriptLocalShort = 190,
        ScriptLocalFloat = 191,
        ScriptMemberShort = 192,
        ScriptGlobalShort = 193,
        MusicPlay = 194,
        VideoPlay = 195,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Player,
    Actor,
    World,
}

impl Domain {
    pub fn name(self) -> &'static str {
        match self {
            Domain::Player => "player",
            Domain::Actor => "actor",
            Domain::World => "world",
        }
    }
}

/// What a packet about the local player means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalPolicy {
    /// Header-sized packet asks for our state; anything longer is an update
    RequestOrUpdate,
    /// Always answer with our current state
    ReplyOnly,
    /// Decode and apply; there is no pull form
    ApplyOnly,
    Ignore,
}

/// What a packet about a remote player means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemotePolicy {
    /// Look up or create the remote player, then apply
    Spawn,
    /// Apply when the remote player is known, otherwise skip
    Apply,
    Ignore,
}

impl PlayerKind {
    pub fn local_policy(self) -> LocalPolicy {
        use PlayerKind::*;
        match self {
            BaseInfo | Position | Equipment | Inventory | Spellbook | Journal | DynamicStats
            | CellChange | Attribute | Skill | Level | CharClass | CellState => {
                LocalPolicy::RequestOrUpdate
            }
            Handshake | DrawState => LocalPolicy::ReplyOnly,
            UserMyId | UserDisconnected | Death | Resurrect | ChatMessage | CharGen
            | GuiMessageBox | GameTime | GameConsole => LocalPolicy::ApplyOnly,
            Attack => LocalPolicy::Ignore,
        }
    }

    pub fn remote_policy(self) -> RemotePolicy {
        use PlayerKind::*;
        match self {
            BaseInfo => RemotePolicy::Spawn,
            Position | UserDisconnected | Equipment | Attack | DynamicStats | Death
            | Resurrect | CellChange | DrawState | ChatMessage | Attribute | Skill | Level => {
                RemotePolicy::Apply
            }
            Handshake | UserMyId | Inventory | Spellbook | Journal | CellState | CharGen
            | GuiMessageBox | CharClass | GameTime | GameConsole => RemotePolicy::Ignore,
        }
    }
}

impl WorldKind {
    /// Kinds addressed to a cell; the rest act on global state.
    pub fn is_cell_scoped(self) -> bool {
        !matches!(
            self,
            WorldKind::ScriptMemberShort
                | WorldKind::ScriptGlobalShort
                | WorldKind::MusicPlay
                | WorldKind::VideoPlay
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_spaces_are_disjoint() {
        for p in PlayerKind::ALL {
            assert!(ActorKind::from_u8(p.as_u8()).is_none());
            assert!(WorldKind::from_u8(p.as_u8()).is_none());
            assert_ne!(p.as_u8(), GAME_PREINIT);
        }
        for a in ActorKind::ALL {
            assert!(WorldKind::from_u8(a.as_u8()).is_none());
            assert_ne!(a.as_u8(), GAME_PREINIT);
        }
    }

    #[test]
    fn policy_examples() {
        assert_eq!(
            PlayerKind::Position.local_policy(),
            LocalPolicy::RequestOrUpdate
        );
        assert_eq!(PlayerKind::Death.local_policy(), LocalPolicy::ApplyOnly);
        assert_eq!(
            PlayerKind::CellState.local_policy(),
            LocalPolicy::RequestOrUpdate
        );
        assert_eq!(PlayerKind::DrawState.local_policy(), LocalPolicy::ReplyOnly);
        assert_eq!(PlayerKind::BaseInfo.remote_policy(), RemotePolicy::Spawn);
        assert_eq!(PlayerKind::Inventory.remote_policy(), RemotePolicy::Ignore);
        assert!(!WorldKind::MusicPlay.is_cell_scoped());
        assert!(WorldKind::DoorState.is_cell_scoped());
    }
}
