use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use worldsync::core::packet::{Guid, Packet};
use worldsync::engine::headless::HeadlessEngine;
use worldsync::entity::PlayerState;
use worldsync::protocol::kinds::{PlayerKind, WorldKind};
use worldsync::protocol::{Dispatcher, PacketHandler};
use worldsync::world::{CellId, EventAction, MemoryCellStore, ObjectKey, WorldEvent, WorldObject};
use worldsync::SessionContext;

#[allow(clippy::unwrap_used)]
fn bench_player_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("player_dispatch");
    let mut dispatcher = Dispatcher::new().unwrap();
    let mut cells = MemoryCellStore::new();

    let mut remote = PlayerState::new(Guid(42));
    remote.position.pos = [1.0, 2.0, 3.0];
    let position = dispatcher
        .players()
        .lookup(PlayerKind::Position.as_u8())
        .unwrap()
        .encode(Guid(42), &remote)
        .to_bytes();
    let base_info = dispatcher
        .players()
        .lookup(PlayerKind::BaseInfo.as_u8())
        .unwrap()
        .encode(Guid(42), &remote)
        .to_bytes();
    let request = Packet::bare(PlayerKind::DynamicStats.as_u8(), Guid(7)).to_bytes();

    let mut ctx = SessionContext::new(Guid(7));
    let mut engine = HeadlessEngine::new();
    dispatcher
        .route(base_info, &mut ctx, &mut engine, &mut cells)
        .unwrap();

    group.throughput(Throughput::Bytes(position.len() as u64));
    group.bench_function("remote_position", |b| {
        b.iter(|| {
            engine.events.clear();
            dispatcher
                .route(black_box(position.clone()), &mut ctx, &mut engine, &mut cells)
                .unwrap()
        })
    });

    group.bench_function("local_request", |b| {
        b.iter(|| {
            let outcome = dispatcher
                .route(black_box(request.clone()), &mut ctx, &mut engine, &mut cells)
                .unwrap();
            ctx.drain_outbox();
            outcome
        })
    });
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_world_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_dispatch");
    let object_counts = [1usize, 16, 256];

    for &count in &object_counts {
        let cell = CellId::exterior(0, 0);
        let event = WorldEvent {
            cell: cell.clone(),
            action: EventAction::Set,
            objects: (0..count as u32)
                .map(|ref_num| WorldObject {
                    refid: "misc_com_bucket_01".into(),
                    key: ObjectKey { ref_num, mp_num: 0 },
                    ..WorldObject::default()
                })
                .collect(),
        };
        let dispatcher = Dispatcher::new().unwrap();
        let datagram: Bytes = dispatcher
            .world()
            .lookup(WorldKind::ObjectPlace.as_u8())
            .unwrap()
            .encode(Guid(0), &event)
            .to_bytes();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("object_place_{count}"), |b| {
            b.iter_batched(
                || {
                    let mut cells = MemoryCellStore::new();
                    cells.load(cell.clone());
                    (Dispatcher::new().unwrap(), cells)
                },
                |(mut dispatcher, mut cells)| {
                    let mut ctx = SessionContext::new(Guid(7));
                    let mut engine = HeadlessEngine::new();
                    dispatcher
                        .route(datagram.clone(), &mut ctx, &mut engine, &mut cells)
                        .unwrap()
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_player_dispatch, bench_world_dispatch);
criterion_main!(benches);
