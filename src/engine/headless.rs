//! Engine that keeps everything in memory.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::core::packet::Guid;
use crate::engine::{GameEngine, Hit, Subject, TimeUnit};
use crate::entity::player::{ChangeAction, GuiMessageBox, Item, JournalItem, PlayerState};
use crate::protocol::kinds::PlayerKind;

/// A call made on the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Applied { who: Subject, kind: PlayerKind },
    Spawned(Guid),
    Despawned(Guid),
    ItemsAdded(Vec<Item>),
    ItemsRemoved(Vec<Item>),
    ItemsSet(Vec<Item>),
    Spellbook { action: ChangeAction, spells: Vec<String> },
    Journal(Vec<JournalItem>),
    GameTime(TimeUnit),
    Console(bool),
    SpellSelected { who: Subject, spell: String },
    Hit { victim: Subject, hit: Hit },
    MemberShort { refid: String, index: i32, value: i32 },
    GlobalShort { name: String, value: i32 },
    Music(String),
    Video { file: String, allow_skipping: bool },
    Chat(String),
    MessageBox(GuiMessageBox),
    Error(String),
    Warning(String),
    Quit,
}

/// In-memory [`GameEngine`].
///
/// `local` is the source of every capture. Remote players handed to the
/// engine are mirrored in `remotes`.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    pub local: PlayerState,
    pub remotes: HashMap<Guid, PlayerState>,
    pub paralyzed: HashSet<Subject>,
    pub knocked_down: HashSet<Subject>,
    /// Victims that block every melee hit
    pub blocking: HashSet<Subject>,
    pub events: Vec<EngineEvent>,
    pub quit_requested: bool,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Kinds applied to `who`, in call order
    pub fn applied_to(&self, who: Subject) -> Vec<PlayerKind> {
        self.events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Applied { who: w, kind } if *w == who => Some(*kind),
                _ => None,
            })
            .collect()
    }

    fn applied(&mut self, who: Subject, kind: PlayerKind, player: &PlayerState) {
        debug!(?who, ?kind, "Engine apply");
        if let Subject::Remote(guid) = who {
            self.remotes.insert(guid, player.clone());
        }
        self.events.push(EngineEvent::Applied { who, kind });
    }
}

impl GameEngine for HeadlessEngine {
    fn capture(&mut self, kind: PlayerKind, player: &mut PlayerState) {
        let local = &self.local;
        match kind {
            // Credentials come from configuration, not from the game
            PlayerKind::Handshake => {}
            PlayerKind::BaseInfo => player.base = local.base.clone(),
            PlayerKind::Position => player.position = local.position,
            PlayerKind::Equipment => player.equipment = local.equipment.clone(),
            PlayerKind::Inventory => player.inventory = local.inventory.clone(),
            PlayerKind::Spellbook => player.spellbook = local.spellbook.clone(),
            PlayerKind::Journal => player.journal = local.journal.clone(),
            PlayerKind::Attack => player.attack = local.attack.clone(),
            PlayerKind::DynamicStats => player.dynamic = local.dynamic,
            PlayerKind::Death | PlayerKind::Resurrect => player.dead = local.dead,
            PlayerKind::CellChange => player.cell = local.cell.clone(),
            PlayerKind::CellState => player.cell_states = local.cell_states.clone(),
            PlayerKind::DrawState => player.stance = local.stance,
            PlayerKind::ChatMessage => player.chat_message = local.chat_message.clone(),
            PlayerKind::CharGen => player.chargen = local.chargen,
            PlayerKind::Attribute => player.attributes = local.attributes,
            PlayerKind::Skill => player.skills = local.skills,
            PlayerKind::Level => player.level = local.level,
            PlayerKind::GuiMessageBox => player.message_box = local.message_box.clone(),
            PlayerKind::CharClass => player.class = local.class.clone(),
            PlayerKind::GameTime => player.game_time = local.game_time,
            PlayerKind::GameConsole => player.console_allowed = local.console_allowed,
            PlayerKind::UserMyId | PlayerKind::UserDisconnected => {}
        }
    }

    fn spawn_player(&mut self, player: &PlayerState) {
        self.remotes.insert(player.guid, player.clone());
        self.events.push(EngineEvent::Spawned(player.guid));
    }

    fn despawn_player(&mut self, guid: Guid) {
        self.remotes.remove(&guid);
        self.events.push(EngineEvent::Despawned(guid));
    }

    fn apply_base_info(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::BaseInfo, player);
    }

    fn apply_position(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::Position, player);
    }

    fn apply_equipment(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::Equipment, player);
    }

    fn apply_dynamic_stats(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::DynamicStats, player);
    }

    fn apply_death(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::Death, player);
    }

    fn apply_resurrection(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::Resurrect, player);
    }

    fn apply_cell(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::CellChange, player);
    }

    fn apply_draw_state(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::DrawState, player);
    }

    fn apply_attributes(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::Attribute, player);
    }

    fn apply_skills(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::Skill, player);
    }

    fn apply_level(&mut self, who: Subject, player: &PlayerState) {
        self.applied(who, PlayerKind::Level, player);
    }

    fn add_items(&mut self, items: &[Item]) {
        self.events.push(EngineEvent::ItemsAdded(items.to_vec()));
    }

    fn remove_items(&mut self, items: &[Item]) {
        self.events.push(EngineEvent::ItemsRemoved(items.to_vec()));
    }

    fn set_items(&mut self, items: &[Item]) {
        self.local.inventory.items = items.to_vec();
        self.events.push(EngineEvent::ItemsSet(items.to_vec()));
    }

    fn edit_spellbook(&mut self, action: ChangeAction, spells: &[String]) {
        self.events.push(EngineEvent::Spellbook {
            action,
            spells: spells.to_vec(),
        });
    }

    fn add_journal_items(&mut self, items: &[JournalItem]) {
        self.local.journal.extend_from_slice(items);
        self.events.push(EngineEvent::Journal(items.to_vec()));
    }

    fn apply_chargen(&mut self, player: &PlayerState) {
        self.applied(Subject::Local, PlayerKind::CharGen, player);
    }

    fn apply_class(&mut self, player: &PlayerState) {
        self.applied(Subject::Local, PlayerKind::CharClass, player);
    }

    fn apply_game_time(&mut self, unit: TimeUnit) {
        self.events.push(EngineEvent::GameTime(unit));
    }

    fn set_console_allowed(&mut self, allowed: bool) {
        self.local.console_allowed = allowed;
        self.events.push(EngineEvent::Console(allowed));
    }

    fn is_paralyzed(&self, who: Subject) -> bool {
        self.paralyzed.contains(&who)
    }

    fn is_knocked_down(&self, who: Subject) -> bool {
        self.knocked_down.contains(&who)
    }

    fn blocks_melee(&mut self, victim: Subject, _attacker: &PlayerState) -> bool {
        self.blocking.contains(&victim)
    }

    fn select_spell(&mut self, who: Subject, spell: &str) {
        self.events.push(EngineEvent::SpellSelected {
            who,
            spell: spell.to_string(),
        });
    }

    fn apply_hit(&mut self, victim: Subject, hit: &Hit) {
        self.events.push(EngineEvent::Hit {
            victim,
            hit: hit.clone(),
        });
    }

    fn set_member_short(&mut self, refid: &str, index: i32, value: i32) {
        self.events.push(EngineEvent::MemberShort {
            refid: refid.to_string(),
            index,
            value,
        });
    }

    fn set_global_short(&mut self, name: &str, value: i32) {
        self.events.push(EngineEvent::GlobalShort {
            name: name.to_string(),
            value,
        });
    }

    fn play_music(&mut self, file: &str) {
        self.events.push(EngineEvent::Music(file.to_string()));
    }

    fn play_video(&mut self, file: &str, allow_skipping: bool) {
        self.events.push(EngineEvent::Video {
            file: file.to_string(),
            allow_skipping,
        });
    }

    fn show_chat(&mut self, message: &str) {
        self.events.push(EngineEvent::Chat(message.to_string()));
    }

    fn show_message_box(&mut self, message_box: &GuiMessageBox) {
        self.events.push(EngineEvent::MessageBox(message_box.clone()));
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(EngineEvent::Error(message.to_string()));
    }

    fn show_warning(&mut self, message: &str) {
        self.events.push(EngineEvent::Warning(message.to_string()));
    }

    fn request_quit(&mut self) {
        self.quit_requested = true;
        self.events.push(EngineEvent::Quit);
    }
}
