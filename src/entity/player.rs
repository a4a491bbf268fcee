//! Player state carried across the wire.
//!
//! The same struct backs the local player and every remote player in the
//! directory; each packet kind reads or writes a subset of its fields.

use crate::core::packet::Guid;
use crate::world::CellId;

pub const EQUIPMENT_SLOTS: usize = 19;
/// Equipment slot holding the weapon used for melee attacks
pub const SLOT_CARRIED_RIGHT: usize = 16;
pub const ATTRIBUTE_COUNT: usize = 8;
pub const SKILL_COUNT: usize = 27;
pub const DYNAMIC_STAT_COUNT: usize = 3;
/// Index of health in the dynamic stats
pub const HEALTH: usize = 0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BaseInfo {
    pub name: String,
    pub race: String,
    pub head: String,
    pub hair: String,
    pub female: bool,
    pub birthsign: String,
    pub creature_model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub pos: [f32; 3],
    pub rot: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    pub refid: String,
    pub count: i32,
    pub charge: i32,
}

impl Item {
    pub fn is_empty(&self) -> bool {
        self.refid.is_empty()
    }
}

wire_enum! {
    /// How a list of changes relates to the current contents
    #[derive(Default)]
    pub enum ChangeAction {
        #[default]
        Set = 0,
        Add = 1,
        Remove = 2,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventoryChanges {
    pub action: ChangeAction,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpellbookChanges {
    pub action: ChangeAction,
    pub spells: Vec<String>,
}

wire_enum! {
    #[derive(Default)]
    pub enum JournalItemKind {
        #[default]
        Entry = 0,
        Index = 1,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JournalItem {
    pub kind: JournalItemKind,
    pub quest: String,
    pub index: i32,
    pub actor_refid: String,
}

wire_enum! {
    #[derive(Default)]
    pub enum AttackKind {
        #[default]
        Melee = 0,
        Magic = 1,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attack {
    pub target: Guid,
    /// Spell id for magic attacks
    pub refid: String,
    pub kind: AttackKind,
    pub success: bool,
    pub pressed: bool,
    pub damage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DynamicStat {
    pub base: f32,
    pub current: f32,
    pub modifier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatValue {
    pub base: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkillValue {
    pub base: i32,
    pub modifier: i32,
    pub progress: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Level {
    pub level: i32,
    pub progress: i32,
}

wire_enum! {
    #[derive(Default)]
    pub enum DrawState {
        #[default]
        Nothing = 0,
        Weapon = 1,
        Spell = 2,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stance {
    pub draw_state: DrawState,
    pub movement_flags: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharGenStage {
    pub current: i32,
    pub end: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomClass {
    pub name: String,
    pub description: String,
    pub specialization: i32,
    pub major_attributes: [i32; 2],
    pub major_skills: [i32; 5],
    pub minor_skills: [i32; 5],
}

#[derive(Debug, Clone, PartialEq)]
pub enum CharClass {
    /// One of the content-defined classes, by id
    Default(String),
    Custom(CustomClass),
}

impl Default for CharClass {
    fn default() -> Self {
        CharClass::Default(String::new())
    }
}

/// Server-driven clock change. Only the first present unit is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameTime {
    pub hour: Option<f64>,
    pub day: Option<i32>,
    pub month: Option<i32>,
}

wire_enum! {
    #[derive(Default)]
    pub enum MessageBoxKind {
        #[default]
        MessageBox = 0,
        CustomMessageBox = 1,
        InputDialog = 2,
        ListBox = 3,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GuiMessageBox {
    pub id: i32,
    pub kind: MessageBoxKind,
    pub label: String,
    pub note: String,
    pub buttons: String,
}

wire_enum! {
    #[derive(Default)]
    pub enum CellStateAction {
        #[default]
        Load = 0,
        Unload = 1,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellState {
    pub action: CellStateAction,
    pub cell: CellId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub guid: Guid,
    pub credentials: Credentials,
    pub base: BaseInfo,
    pub position: Position,
    pub cell: CellId,
    pub equipment: Vec<Item>,
    pub inventory: InventoryChanges,
    pub spellbook: SpellbookChanges,
    pub journal: Vec<JournalItem>,
    pub attack: Attack,
    pub dynamic: [DynamicStat; DYNAMIC_STAT_COUNT],
    pub attributes: [StatValue; ATTRIBUTE_COUNT],
    pub skills: [SkillValue; SKILL_COUNT],
    pub level: Level,
    pub dead: bool,
    pub stance: Stance,
    pub chat_message: String,
    pub chargen: CharGenStage,
    pub class: CharClass,
    pub game_time: GameTime,
    pub message_box: GuiMessageBox,
    pub console_allowed: bool,
    pub cell_states: Vec<CellState>,
}

impl PlayerState {
    pub fn new(guid: Guid) -> Self {
        Self {
            guid,
            credentials: Credentials::default(),
            base: BaseInfo::default(),
            position: Position::default(),
            cell: CellId::default(),
            equipment: vec![Item::default(); EQUIPMENT_SLOTS],
            inventory: InventoryChanges::default(),
            spellbook: SpellbookChanges::default(),
            journal: Vec::new(),
            attack: Attack::default(),
            dynamic: [DynamicStat::default(); DYNAMIC_STAT_COUNT],
            attributes: [StatValue::default(); ATTRIBUTE_COUNT],
            skills: [SkillValue::default(); SKILL_COUNT],
            level: Level::default(),
            dead: false,
            stance: Stance::default(),
            chat_message: String::new(),
            chargen: CharGenStage::default(),
            class: CharClass::default(),
            game_time: GameTime::default(),
            message_box: GuiMessageBox::default(),
            console_allowed: true,
            cell_states: Vec::new(),
        }
    }

    pub fn health(&self) -> &DynamicStat {
        &self.dynamic[HEALTH]
    }

    pub fn health_mut(&mut self) -> &mut DynamicStat {
        &mut self.dynamic[HEALTH]
    }

    /// Weapon in the carried-right slot, if any
    pub fn carried_weapon(&self) -> Option<&Item> {
        self.equipment
            .get(SLOT_CARRIED_RIGHT)
            .filter(|item| !item.is_empty())
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(Guid::default())
    }
}
