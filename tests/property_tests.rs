//! Property-based tests using proptest
//!
//! These tests validate dispatch invariants across randomly generated
//! datagrams: no input may panic the router, and request/update inference
//! depends on nothing but length.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bytes::Bytes;
use proptest::prelude::*;
use worldsync::content::{ContentManifest, ManifestEntry};
use worldsync::core::packet::{Guid, Packet, PACKET_HEADER_LEN};
use worldsync::engine::headless::HeadlessEngine;
use worldsync::protocol::kinds::PlayerKind;
use worldsync::protocol::packets::player_registry;
use worldsync::protocol::Dispatcher;
use worldsync::transport::{classify, Inbound};
use worldsync::world::{CellId, MemoryCellStore};
use worldsync::SessionContext;

// Property: arbitrary datagrams are either handled or rejected, never a panic
proptest! {
    #[test]
    fn prop_router_survives_garbage(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut dispatcher = Dispatcher::new().unwrap();
        let mut ctx = SessionContext::new(Guid(7));
        let mut engine = HeadlessEngine::new();
        let mut cells = MemoryCellStore::new();
        cells.load(CellId::exterior(0, 0));

        let _ = dispatcher.route(Bytes::from(data), &mut ctx, &mut engine, &mut cells);
    }
}

// Property: datagrams shorter than the header never reach a handler
proptest! {
    #[test]
    fn prop_short_datagrams_are_truncated(data in prop::collection::vec(any::<u8>(), 0..PACKET_HEADER_LEN)) {
        let mut dispatcher = Dispatcher::new().unwrap();
        let mut ctx = SessionContext::new(Guid(7));
        let mut engine = HeadlessEngine::new();
        let mut cells = MemoryCellStore::new();

        let result = dispatcher.route(Bytes::from(data), &mut ctx, &mut engine, &mut cells);
        prop_assert!(result.is_err());
        prop_assert!(result.unwrap_err().is_decode_local());
        prop_assert!(engine.events.is_empty());
    }
}

// Property: a packet is a request exactly when it is header-sized
proptest! {
    #[test]
    fn prop_request_iff_header_sized(
        index in 0..PlayerKind::ALL.len(),
        body in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let registry = player_registry().unwrap();
        let kind = PlayerKind::ALL[index];
        let handler = registry.lookup(kind.as_u8()).unwrap();

        let packet = Packet::new(kind.as_u8(), Guid(1), Bytes::from(body.clone()));
        prop_assert_eq!(handler.is_request(&packet), body.is_empty());
    }
}

// Property: one-byte datagrams are control notifications, longer ones messages
proptest! {
    #[test]
    fn prop_classify_by_length(data in prop::collection::vec(any::<u8>(), 1..64)) {
        let single = data.len() == 1;
        match classify(Bytes::from(data)) {
            Inbound::Control(_) | Inbound::UnknownControl(_) => prop_assert!(single),
            Inbound::Message(_) => prop_assert!(!single),
        }
    }
}

// Property: manifest diffs list every expected file once
proptest! {
    #[test]
    fn prop_diff_has_row_per_expected_file(
        ours in prop::collection::vec(("[a-z]{1,12}\\.esp", any::<u32>()), 0..8),
        theirs in prop::collection::vec(("[a-z]{1,12}\\.esp", any::<u32>()), 1..8),
    ) {
        let to_manifest = |rows: Vec<(String, u32)>| {
            ContentManifest::new(
                rows.into_iter()
                    .map(|(file, checksum)| ManifestEntry { file, checksum })
                    .collect(),
            )
        };
        let expected_rows = theirs.len();
        let ours = to_manifest(ours);
        let theirs = to_manifest(theirs);

        let decoded = ContentManifest::decode(theirs.encode(Guid(0)).body).unwrap();
        prop_assert_eq!(&decoded, &theirs);

        let diff = ours.render_diff(&theirs);
        prop_assert_eq!(diff.lines().count(), expected_rows + 1);
    }
}
