use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wireroute::geometry::{Cardinal, Point};
use wireroute::prelude::*;
use wireroute::router::cleanup::clean_sequence;
use wireroute::schema::Terminal;

fn node_part() -> PartDefinition {
    PartDefinition {
        key: "node".to_string(),
        name: "Node".to_string(),
        width: 64.0,
        height: 64.0,
        terminals: vec![
            Terminal {
                id: "e".to_string(),
                label: "E".to_string(),
                terminal_type: TerminalType::Ethernet,
                x: 64.0,
                y: 32.0,
                exit: Some(Cardinal::E),
            },
            Terminal {
                id: "w".to_string(),
                label: "W".to_string(),
                terminal_type: TerminalType::Ethernet,
                x: 0.0,
                y: 32.0,
                exit: Some(Cardinal::W),
            },
        ],
    }
}

/// Two endpoints with a column of blockers between them.
fn fixture() -> (Vec<PlacedComponent>, PartLibrary) {
    let mut parts = vec![node_part()];
    parts.push(PartDefinition {
        key: "blocker".to_string(),
        name: "Blocker".to_string(),
        width: 48.0,
        height: 48.0,
        terminals: vec![],
    });
    let mut components = vec![
        PlacedComponent {
            id: "a".to_string(),
            part_key: "node".to_string(),
            name: "a".to_string(),
            x: 0.0,
            y: 0.0,
            rotation: Default::default(),
        },
        PlacedComponent {
            id: "b".to_string(),
            part_key: "node".to_string(),
            name: "b".to_string(),
            x: 512.0,
            y: 0.0,
            rotation: Default::default(),
        },
    ];
    for i in 0..4 {
        components.push(PlacedComponent {
            id: format!("blk{i}"),
            part_key: "blocker".to_string(),
            name: format!("blk{i}"),
            x: 160.0 + 64.0 * i as f64,
            y: -48.0 + 32.0 * i as f64,
            rotation: Default::default(),
        });
    }
    (components, PartLibrary::from_parts(parts))
}

fn bench_route_new_wire(c: &mut Criterion) {
    let (components, library) = fixture();
    let wires: Vec<Wire> = vec![];
    let from = TerminalRef {
        component_id: "a".to_string(),
        terminal_id: "e".to_string(),
    };
    let to = TerminalRef {
        component_id: "b".to_string(),
        terminal_id: "w".to_string(),
    };
    let config = RouterConfig::default();

    c.bench_function("route_new_wire_with_detour", |b| {
        b.iter(|| {
            let snapshot = DiagramSnapshot {
                components: &components,
                wires: &wires,
                library: &library,
            };
            RoutingCore::route_new_wire(
                black_box(&from),
                black_box(&to),
                &[],
                snapshot,
                NewWireOptions::default(),
                black_box(&config),
            )
        });
    });
}

fn bench_clean_sequence(c: &mut Criterion) {
    // A long noisy polyline with off-grid points, spikes, and loops.
    let mut sequence = Vec::new();
    for i in 0..200 {
        let x = 7.0 * i as f64;
        let y = if i % 17 == 0 { 130.0 } else { 3.0 * (i % 5) as f64 };
        sequence.push(Point::new(x, y));
        if i % 23 == 0 && i > 0 {
            sequence.push(Point::new(x - 16.0, y));
            sequence.push(Point::new(x, y));
        }
    }

    c.bench_function("clean_sequence_200", |b| {
        b.iter(|| clean_sequence(black_box(&sequence), black_box(16.0)));
    });
}

criterion_group!(benches, bench_route_new_wire, bench_clean_sequence);
criterion_main!(benches);
