//! Resolution of attacks made by remote players.

use tracing::debug;

use crate::core::packet::Guid;
use crate::engine::{GameEngine, Hit, Subject};
use crate::entity::player::DrawState;
use crate::sync::{Outcome, SessionContext};

/// Resolve the victim of an attack: the local player or a known remote.
pub fn resolve_victim(ctx: &SessionContext, target: Guid) -> Option<Subject> {
    if ctx.is_local(target) {
        Some(Subject::Local)
    } else if ctx.players.contains(target) {
        Some(Subject::Remote(target))
    } else {
        None
    }
}

/// Act on the attack state just decoded onto `attacker`'s entry.
///
/// The attacker's spell selection always follows the packet. With a weapon
/// drawn the hit lands on the victim through the engine; otherwise the attack
/// is a spell cast and is only logged.
pub fn resolve_attack(ctx: &SessionContext, attacker: Guid, engine: &mut dyn GameEngine) -> Outcome {
    let Some(player) = ctx.players.get(attacker) else {
        return Outcome::Skipped;
    };
    let attack = &player.attack;

    if !attack.pressed {
        debug!(%attacker, success = attack.success, damage = attack.damage, "Attack released");
    }

    engine.select_spell(Subject::Remote(attacker), &attack.refid);
    let victim = resolve_victim(ctx, attack.target);

    if player.stance.draw_state != DrawState::Weapon {
        debug!(%attacker, spell = %attack.refid, success = attack.success, "Spell attack");
        return Outcome::Applied;
    }

    let Some(victim) = victim else {
        debug!(%attacker, target = %attack.target, "Attack target unknown");
        return Outcome::Skipped;
    };

    // Hand-to-hand when nothing is carried in the right hand
    let weapon = player.carried_weapon().cloned();
    let health_damage =
        weapon.is_some() || engine.is_paralyzed(victim) || engine.is_knocked_down(victim);
    let blocked = weapon.is_some() && engine.blocks_melee(victim, player);

    let hit = Hit {
        attacker,
        success: attack.success,
        damage: attack.damage,
        health_damage,
        blocked,
        weapon,
    };
    engine.apply_hit(victim, &hit);
    Outcome::Applied
}
