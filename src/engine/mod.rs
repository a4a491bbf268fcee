//! # Local Engine Boundary
//!
//! Synchronization handlers never touch rendering, physics or GUI code
//! directly. Everything the local game must do in response to a packet goes
//! through [`GameEngine`]: one apply routine per synchronized field, local
//! state capture for replies, combat queries and user-facing dialogs.
//!
//! [`headless::HeadlessEngine`] records every call and serves captures from an
//! in-memory player, for tests and tools without a game attached.

use crate::core::packet::Guid;
use crate::entity::player::{ChangeAction, GameTime, GuiMessageBox, Item, JournalItem, PlayerState};
use crate::protocol::kinds::PlayerKind;

pub mod headless;

/// Which player an engine call is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Local,
    Remote(Guid),
}

/// One game clock unit, as applied by a `GameTime` packet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeUnit {
    Hour(f64),
    Day(i32),
    Month(i32),
}

impl TimeUnit {
    /// First unit present, in hour, day, month order
    pub fn first_of(time: &GameTime) -> Option<Self> {
        time.hour
            .map(TimeUnit::Hour)
            .or(time.day.map(TimeUnit::Day))
            .or(time.month.map(TimeUnit::Month))
    }
}

/// A resolved melee hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub attacker: Guid,
    pub success: bool,
    pub damage: f32,
    /// Damage goes to health rather than fatigue
    pub health_damage: bool,
    pub blocked: bool,
    pub weapon: Option<Item>,
}

/// The local game as seen by the synchronization layer.
pub trait GameEngine {
    /// Copy the engine's current value of `kind`'s fields into `player`.
    fn capture(&mut self, kind: PlayerKind, player: &mut PlayerState);

    fn spawn_player(&mut self, player: &PlayerState);
    fn despawn_player(&mut self, guid: Guid);

    fn apply_base_info(&mut self, who: Subject, player: &PlayerState);
    fn apply_position(&mut self, who: Subject, player: &PlayerState);
    fn apply_equipment(&mut self, who: Subject, player: &PlayerState);
    fn apply_dynamic_stats(&mut self, who: Subject, player: &PlayerState);
    fn apply_death(&mut self, who: Subject, player: &PlayerState);
    fn apply_resurrection(&mut self, who: Subject, player: &PlayerState);
    fn apply_cell(&mut self, who: Subject, player: &PlayerState);
    fn apply_draw_state(&mut self, who: Subject, player: &PlayerState);
    fn apply_attributes(&mut self, who: Subject, player: &PlayerState);
    fn apply_skills(&mut self, who: Subject, player: &PlayerState);
    fn apply_level(&mut self, who: Subject, player: &PlayerState);

    fn add_items(&mut self, items: &[Item]);
    fn remove_items(&mut self, items: &[Item]);
    fn set_items(&mut self, items: &[Item]);
    fn edit_spellbook(&mut self, action: ChangeAction, spells: &[String]);
    fn add_journal_items(&mut self, items: &[JournalItem]);
    fn apply_chargen(&mut self, player: &PlayerState);
    fn apply_class(&mut self, player: &PlayerState);
    fn apply_game_time(&mut self, unit: TimeUnit);
    fn set_console_allowed(&mut self, allowed: bool);

    fn is_paralyzed(&self, who: Subject) -> bool;
    fn is_knocked_down(&self, who: Subject) -> bool;
    /// Whether `victim` blocks a melee hit from `attacker`
    fn blocks_melee(&mut self, victim: Subject, attacker: &PlayerState) -> bool;
    fn select_spell(&mut self, who: Subject, spell: &str);
    fn apply_hit(&mut self, victim: Subject, hit: &Hit);

    fn set_member_short(&mut self, refid: &str, index: i32, value: i32);
    fn set_global_short(&mut self, name: &str, value: i32);
    fn play_music(&mut self, file: &str);
    fn play_video(&mut self, file: &str, allow_skipping: bool);

    fn show_chat(&mut self, message: &str);
    fn show_message_box(&mut self, message_box: &GuiMessageBox);
    /// Blocking error dialog
    fn show_error(&mut self, message: &str);
    fn show_warning(&mut self, message: &str);
    fn request_quit(&mut self);
}
