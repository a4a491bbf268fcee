//! Player packets routed through the dispatcher.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use worldsync::core::packet::{Guid, Packet};
use worldsync::engine::headless::{EngineEvent, HeadlessEngine};
use worldsync::engine::Subject;
use worldsync::entity::player::{DrawState, Item, SLOT_CARRIED_RIGHT};
use worldsync::entity::PlayerState;
use worldsync::protocol::kinds::PlayerKind;
use worldsync::protocol::{Dispatcher, PacketHandler};
use worldsync::world::MemoryCellStore;
use worldsync::{Outcome, SessionContext};

struct Harness {
    dispatcher: Dispatcher,
    ctx: SessionContext,
    engine: HeadlessEngine,
    cells: MemoryCellStore,
}

impl Harness {
    fn new(local: u64) -> Self {
        Self {
            dispatcher: Dispatcher::new().unwrap(),
            ctx: SessionContext::new(Guid(local)),
            engine: HeadlessEngine::new(),
            cells: MemoryCellStore::new(),
        }
    }

    fn route(&mut self, packet: &Packet) -> Outcome {
        self.dispatcher
            .route(
                packet.to_bytes(),
                &mut self.ctx,
                &mut self.engine,
                &mut self.cells,
            )
            .unwrap()
    }

    fn encode(&self, kind: PlayerKind, state: &PlayerState) -> Packet {
        self.dispatcher
            .players()
            .lookup(kind.as_u8())
            .unwrap()
            .encode(state.guid, state)
    }

    fn decode(&self, packet: &Packet) -> PlayerState {
        let mut state = PlayerState::default();
        self.dispatcher
            .players()
            .lookup(packet.kind())
            .unwrap()
            .decode(packet, &mut state)
            .unwrap();
        state
    }
}

#[test]
fn bare_local_packet_is_a_request() {
    let mut h = Harness::new(7);
    h.engine.local.base.name = "Fargoth".into();
    h.engine.local.base.race = "Wood Elf".into();

    let outcome = h.route(&Packet::bare(PlayerKind::BaseInfo.as_u8(), Guid(7)));
    assert_eq!(outcome, Outcome::Replied);

    let replies = h.ctx.drain_outbox();
    assert_eq!(replies.len(), 1);
    let (reply, _) = &replies[0];
    assert_eq!(reply.kind(), PlayerKind::BaseInfo.as_u8());
    assert_eq!(reply.originator(), Guid(7));
    assert_eq!(h.decode(reply).base.name, "Fargoth");
    assert!(h.engine.applied_to(Subject::Local).is_empty());
}

#[test]
fn local_packet_with_body_is_an_update() {
    let mut h = Harness::new(7);
    let mut update = PlayerState::new(Guid(7));
    update.level.level = 12;

    let outcome = h.route(&h.encode(PlayerKind::Level, &update));
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(h.ctx.local.level.level, 12);
    assert_eq!(h.engine.applied_to(Subject::Local), vec![PlayerKind::Level]);
    assert_eq!(h.ctx.pending_replies(), 0);
}

#[test]
fn position_update_is_idempotent() {
    let mut h = Harness::new(7);
    let mut update = PlayerState::new(Guid(7));
    update.position.pos = [5.0, 6.0, 7.0];
    update.position.rot = [0.1, 0.2, 0.3];
    let packet = h.encode(PlayerKind::Position, &update);

    h.route(&packet);
    let once = h.ctx.local.clone();
    h.route(&packet);
    assert_eq!(h.ctx.local, once);
    assert_eq!(h.ctx.local.position, update.position);
}

#[test]
fn remote_base_info_creates_then_reuses() {
    let mut h = Harness::new(7);
    let mut remote = PlayerState::new(Guid(42));
    remote.base.name = "Caius".into();

    assert_eq!(h.route(&h.encode(PlayerKind::BaseInfo, &remote)), Outcome::Applied);
    assert_eq!(h.ctx.players.len(), 1);
    assert_eq!(h.ctx.players.get(Guid(42)).unwrap().base.name, "Caius");

    remote.base.name = "Caius Cosades".into();
    assert_eq!(h.route(&h.encode(PlayerKind::BaseInfo, &remote)), Outcome::Applied);
    assert_eq!(h.ctx.players.len(), 1);
    assert_eq!(h.ctx.players.get(Guid(42)).unwrap().base.name, "Caius Cosades");

    assert_eq!(
        h.engine.events,
        vec![
            EngineEvent::Spawned(Guid(42)),
            EngineEvent::Applied {
                who: Subject::Remote(Guid(42)),
                kind: PlayerKind::BaseInfo
            },
        ]
    );
}

#[test]
fn unknown_remote_is_skipped() {
    let mut h = Harness::new(7);
    let remote = PlayerState::new(Guid(42));

    let outcome = h.route(&h.encode(PlayerKind::Position, &remote));
    assert_eq!(outcome, Outcome::Skipped);
    assert!(h.ctx.players.is_empty());
    assert!(h.engine.events.is_empty());
}

#[test]
fn remote_disconnect_leaves_equipment_alone() {
    let mut h = Harness::new(7);
    let remote = PlayerState::new(Guid(42));
    h.route(&h.encode(PlayerKind::BaseInfo, &remote));
    h.engine.take_events();

    let outcome = h.route(&Packet::bare(PlayerKind::UserDisconnected.as_u8(), Guid(42)));
    assert_eq!(outcome, Outcome::Applied);
    assert!(!h.ctx.players.contains(Guid(42)));
    assert_eq!(h.engine.events, vec![EngineEvent::Despawned(Guid(42))]);
}

#[test]
fn local_disconnect_requests_quit() {
    let mut h = Harness::new(7);
    h.route(&Packet::bare(PlayerKind::UserDisconnected.as_u8(), Guid(7)));
    assert!(h.engine.quit_requested);
}

#[test]
fn remote_death_zeroes_health() {
    let mut h = Harness::new(7);
    let mut remote = PlayerState::new(Guid(42));
    remote.health_mut().base = 80.0;
    remote.health_mut().current = 80.0;
    h.route(&h.encode(PlayerKind::BaseInfo, &remote));
    h.route(&h.encode(PlayerKind::DynamicStats, &remote));

    h.route(&Packet::bare(PlayerKind::Death.as_u8(), Guid(42)));
    let stored = h.ctx.players.get(Guid(42)).unwrap();
    assert_eq!(stored.health().current, 0.0);

    h.route(&Packet::bare(PlayerKind::Resurrect.as_u8(), Guid(42)));
    let stored = h.ctx.players.get(Guid(42)).unwrap();
    assert_eq!(stored.health().current, 80.0);
    assert!(!stored.dead);
}

#[test]
fn identity_reassigned_only_once() {
    let mut h = Harness::new(7);
    assert_eq!(
        h.route(&Packet::bare(PlayerKind::UserMyId.as_u8(), Guid(11))),
        Outcome::Applied
    );
    assert_eq!(
        h.route(&Packet::bare(PlayerKind::UserMyId.as_u8(), Guid(12))),
        Outcome::Ignored
    );
    assert_eq!(h.ctx.local_guid(), Guid(11));

    // packets from the old identity now count as remote
    let outcome = h.route(&Packet::bare(PlayerKind::Position.as_u8(), Guid(7)));
    assert_eq!(outcome, Outcome::Skipped);
}

#[test]
fn draw_state_request_replies_with_stance() {
    let mut h = Harness::new(7);
    h.engine.local.stance.draw_state = DrawState::Spell;

    let outcome = h.route(&Packet::bare(PlayerKind::DrawState.as_u8(), Guid(7)));
    assert_eq!(outcome, Outcome::Replied);

    let (reply, _) = h.ctx.drain_outbox().remove(0);
    assert_eq!(reply.kind(), PlayerKind::DrawState.as_u8());
    assert_eq!(reply.originator(), Guid(7));
    assert_eq!(h.decode(&reply).stance.draw_state, DrawState::Spell);
}

#[test]
fn routed_weapon_attack_hits_local_player() {
    let mut h = Harness::new(7);
    let mut attacker = PlayerState::new(Guid(42));
    attacker.base.name = "Orvas Dren".into();
    h.route(&h.encode(PlayerKind::BaseInfo, &attacker));

    attacker.stance.draw_state = DrawState::Weapon;
    attacker.equipment[SLOT_CARRIED_RIGHT] = Item {
        refid: "daedric_dagger".into(),
        count: 1,
        charge: -1,
    };
    h.route(&h.encode(PlayerKind::DrawState, &attacker));
    h.route(&h.encode(PlayerKind::Equipment, &attacker));
    h.engine.take_events();

    attacker.attack.target = Guid(7);
    attacker.attack.refid = String::new();
    attacker.attack.success = true;
    attacker.attack.damage = 9.0;
    let outcome = h.route(&h.encode(PlayerKind::Attack, &attacker));
    assert_eq!(outcome, Outcome::Applied);

    let hits: Vec<_> = h
        .engine
        .events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::Hit { victim, hit } => Some((*victim, hit.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(hits.len(), 1);
    let (victim, hit) = &hits[0];
    assert_eq!(*victim, Subject::Local);
    assert_eq!(hit.attacker, Guid(42));
    assert_eq!(hit.damage, 9.0);
    assert!(hit.success);
    assert!(hit.health_damage);
    assert_eq!(hit.weapon.as_ref().unwrap().refid, "daedric_dagger");
    assert!(h.engine.events.contains(&EngineEvent::SpellSelected {
        who: Subject::Remote(Guid(42)),
        spell: String::new()
    }));
}

#[test]
fn local_attack_packet_is_ignored() {
    let mut h = Harness::new(7);
    let mut local = PlayerState::new(Guid(7));
    local.attack.target = Guid(42);
    let outcome = h.route(&h.encode(PlayerKind::Attack, &local));
    assert_eq!(outcome, Outcome::Ignored);
    assert!(h.engine.events.is_empty());
}
