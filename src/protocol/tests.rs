// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashSet;

use crate::core::packet::{Guid, Packet, PACKET_HEADER_LEN};
use crate::entity::player::{
    Attack, AttackKind, CellState, CellStateAction, ChangeAction, CharClass, CustomClass,
    DrawState, GameTime, GuiMessageBox, Item, JournalItem, JournalItemKind, MessageBoxKind,
    PlayerState,
};
use crate::protocol::kinds::{ActorKind, PlayerKind, WorldKind, GAME_PREINIT};
use crate::protocol::packets::{actor_registry, player_registry, world_registry};
use crate::protocol::registry::PacketHandler;
use crate::world::{
    ActorDescriptor, ActorList, CellId, ContainerItem, EventAction, ObjectKey, WorldEvent,
    WorldObject,
};

fn sample_player() -> PlayerState {
    let mut p = PlayerState::new(Guid(0x0102_0304_0506_0708));
    p.credentials.name = "Nerevar".into();
    p.credentials.password = "moon-and-star".into();
    p.base.name = "Nerevar".into();
    p.base.race = "Dark Elf".into();
    p.base.head = "b_n_dark elf_m_head_01".into();
    p.base.hair = "b_n_dark elf_m_hair_02".into();
    p.base.birthsign = "Lover".into();
    p.position.pos = [-11_584.0, 2_048.5, 512.25];
    p.position.rot = [0.0, 0.0, 1.57];
    p.cell = CellId::exterior(-2, -9);
    p.equipment[0] = Item {
        refid: "iron_cuirass".into(),
        count: 1,
        charge: 300,
    };
    p.inventory.action = ChangeAction::Add;
    p.inventory.items.push(Item {
        refid: "potion_cheap_healing".into(),
        count: 3,
        charge: -1,
    });
    p.spellbook.action = ChangeAction::Remove;
    p.spellbook.spells.push("fireball".into());
    p.journal.push(JournalItem {
        kind: JournalItemKind::Entry,
        quest: "A1_1_FindSpymaster".into(),
        index: 10,
        actor_refid: "caius cosades".into(),
    });
    p.attack = Attack {
        target: Guid(42),
        refid: "fireball".into(),
        kind: AttackKind::Magic,
        success: true,
        pressed: false,
        damage: 12.5,
    };
    p.dynamic[0].base = 70.0;
    p.dynamic[0].current = 55.0;
    p.attributes[2].base = 40;
    p.skills[5].progress = 0.5;
    p.level.level = 3;
    p.stance.draw_state = DrawState::Weapon;
    p.stance.movement_flags = 0b101;
    p.chat_message = "Wealth beyond measure, outlander.".into();
    p.chargen.current = 2;
    p.chargen.end = 4;
    p.class = CharClass::Custom(CustomClass {
        name: "Spellsword".into(),
        description: "Blade and spell".into(),
        specialization: 1,
        major_attributes: [0, 2],
        major_skills: [1, 2, 3, 4, 5],
        minor_skills: [6, 7, 8, 9, 10],
    });
    p.game_time = GameTime {
        hour: Some(13.5),
        day: None,
        month: None,
    };
    p.message_box = GuiMessageBox {
        id: 9,
        kind: MessageBoxKind::CustomMessageBox,
        label: "Continue?".into(),
        note: String::new(),
        buttons: "Yes;No".into(),
    };
    p.console_allowed = false;
    p.cell_states.push(CellState {
        action: CellStateAction::Unload,
        cell: CellId::interior("Vivec, Arena"),
    });
    p
}

fn sample_object(ref_num: u32) -> WorldObject {
    WorldObject {
        refid: "com_chest_02".into(),
        key: ObjectKey { ref_num, mp_num: 4 },
        count: 1,
        charge: -1,
        gold_value: 150,
        scale: 1.25,
        lock_level: 30,
        door_state: 1,
        anim_group: "idle2".into(),
        anim_mode: 2,
        index: 3,
        short_value: 77,
        float_value: 0.75,
        var_name: "mainquest".into(),
        filename: "mw_intro.bik".into(),
        allow_skipping: true,
        container_items: vec![ContainerItem {
            refid: "gold_001".into(),
            count: 50,
            charge: -1,
            action_count: 0,
        }],
        ..WorldObject::default()
    }
}

#[test]
fn id_spaces_are_disjoint() {
    let players = player_registry().unwrap();
    let actors = actor_registry().unwrap();
    let world = world_registry().unwrap();

    let mut seen = HashSet::new();
    for kind in players.kinds().chain(actors.kinds()).chain(world.kinds()) {
        assert!(seen.insert(kind), "kind {kind} claimed twice");
    }
    assert!(!seen.contains(&GAME_PREINIT));
    assert_eq!(players.len(), PlayerKind::ALL.len());
    assert_eq!(actors.len(), ActorKind::ALL.len());
    assert_eq!(world.len(), WorldKind::ALL.len());
}

#[test]
fn header_length_decides_request() {
    let players = player_registry().unwrap();
    let handler = players.lookup(PlayerKind::Position.as_u8()).unwrap();

    let bare = Packet::bare(PlayerKind::Position.as_u8(), Guid(7));
    assert_eq!(bare.len(), PACKET_HEADER_LEN);
    assert!(handler.is_request(&bare));

    let one_more = Packet::new(
        PlayerKind::Position.as_u8(),
        Guid(7),
        bytes::Bytes::from_static(&[0]),
    );
    assert_eq!(one_more.len(), PACKET_HEADER_LEN + 1);
    assert!(!handler.is_request(&one_more));
}

#[test]
fn every_player_kind_round_trips() {
    let players = player_registry().unwrap();
    let source = sample_player();

    for kind in PlayerKind::ALL {
        let handler = players.lookup(kind.as_u8()).unwrap();
        let packet = handler.encode(source.guid, &source);
        assert_eq!(packet.kind(), kind.as_u8());

        let wire = Packet::from_bytes(packet.to_bytes()).unwrap();
        let mut decoded = PlayerState::new(source.guid);
        handler.decode(&wire, &mut decoded).unwrap();

        let again = handler.encode(source.guid, &decoded);
        assert_eq!(again.body, packet.body, "{kind:?} body changed on round trip");
    }
}

#[test]
fn every_actor_kind_round_trips() {
    let actors = actor_registry().unwrap();
    let source = ActorList {
        cell: CellId::interior("Caldera, Ghorak Manor"),
        action: EventAction::Set,
        actors: vec![ActorDescriptor {
            refid: "ghorak gro-malog".into(),
            key: ObjectKey {
                ref_num: 11,
                mp_num: 0,
            },
            ..ActorDescriptor::default()
        }],
    };

    for kind in ActorKind::ALL {
        let handler = actors.lookup(kind.as_u8()).unwrap();
        let packet = handler.encode(Guid(1), &source);
        let mut decoded = ActorList::default();
        handler.decode(&packet, &mut decoded).unwrap();

        assert_eq!(decoded.cell, source.cell);
        assert_eq!(decoded.action, source.action);
        let again = handler.encode(Guid(1), &decoded);
        assert_eq!(again.body, packet.body, "{kind:?} body changed on round trip");
    }
}

#[test]
fn every_world_kind_round_trips() {
    let world = world_registry().unwrap();
    let source = WorldEvent {
        cell: CellId::exterior(3, -1),
        action: EventAction::Add,
        objects: vec![sample_object(1), sample_object(2)],
    };

    for kind in WorldKind::ALL {
        let handler = world.lookup(kind.as_u8()).unwrap();
        let packet = handler.encode(Guid(1), &source);
        let mut decoded = WorldEvent::default();
        handler.decode(&packet, &mut decoded).unwrap();

        assert_eq!(decoded.objects.len(), 2, "{kind:?}");
        let again = handler.encode(Guid(1), &decoded);
        assert_eq!(again.body, packet.body, "{kind:?} body changed on round trip");
    }
}

#[test]
fn scratch_buffer_is_overwritten() {
    let world = world_registry().unwrap();
    let handler = world.lookup(WorldKind::ObjectDelete.as_u8()).unwrap();

    let mut scratch = WorldEvent {
        cell: CellId::interior("stale"),
        action: EventAction::Remove,
        objects: vec![sample_object(9), sample_object(10), sample_object(11)],
    };
    let fresh = WorldEvent {
        cell: CellId::exterior(0, 0),
        action: EventAction::Set,
        objects: vec![sample_object(1)],
    };
    handler
        .decode(&handler.encode(Guid(1), &fresh), &mut scratch)
        .unwrap();
    assert_eq!(scratch.cell, CellId::exterior(0, 0));
    assert_eq!(scratch.objects.len(), 1);
}

#[test]
fn truncated_body_is_rejected() {
    let players = player_registry().unwrap();
    let handler = players.lookup(PlayerKind::BaseInfo.as_u8()).unwrap();
    let packet = handler.encode(Guid(1), &sample_player());

    let cut = Packet::new(
        packet.kind(),
        packet.originator(),
        packet.body.slice(..packet.body.len() - 3),
    );
    let mut target = PlayerState::default();
    assert!(handler.decode(&cut, &mut target).is_err());
}
