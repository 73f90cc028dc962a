//! Core routing operations shared by the editor and the CLI.
//! Pure functions over immutable layout snapshots; no app state
//! dependencies.

use crate::geometry::{hv_segments_of_polyline, snap, Point};
use crate::pairs;
use crate::router::cleanup::clean_sequence;
use crate::router::{route_between, RouteContext, RouteEndpoint, RouteQuality};
use crate::schema::anchors::{AnchorResolver, ResolvedTerminal};
use crate::schema::{Gauge, PartLibrary, PlacedComponent, TerminalRef, Wire};
use crate::validation::can_connect;

#[derive(Debug, thiserror::Error)]
pub enum WireRouteError {
    /// Normal negative result of the connection validator, surfaced so the
    /// caller can block the action; no state may be mutated.
    #[error("terminals are not connectable: {from} -> {to}")]
    IncompatibleTerminals { from: String, to: String },
    /// A route request referenced a component that does not exist. This is a
    /// caller bug, not a routing failure.
    #[error("unknown component: {0}")]
    UnknownComponent(String),
    /// A route request referenced a terminal its part does not define.
    #[error("unknown terminal {terminal} on component {component}")]
    UnknownTerminal { component: String, terminal: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Grid and router tuning, supplied by the surrounding settings panel.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Grid cell size in pixels; all persisted geometry snaps to it.
    pub grid_size: f64,
    /// Clearance kept between routed wires and component bodies.
    pub clearance: f64,
    /// Length of the axis-aligned lead-out stub at each terminal.
    pub escape_length: f64,
    /// Flat cost added when the path changes direction.
    pub bend_penalty: f64,
    /// Small cost for cells within one cell of an obstacle.
    pub near_obstacle_penalty: f64,
    /// Cost for running parallel atop an existing wire segment.
    pub same_direction_penalty: f64,
    /// Pathfinder expansion budget before degrading to the fallback.
    pub max_iterations: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            grid_size: 16.0,
            clearance: 16.0,
            escape_length: 32.0,
            bend_penalty: 0.8,
            near_obstacle_penalty: 0.05,
            same_direction_penalty: 4.0,
            max_iterations: 2000,
        }
    }
}

/// An immutable snapshot of the layout a core operation runs against.
#[derive(Debug, Clone, Copy)]
pub struct DiagramSnapshot<'a> {
    pub components: &'a [PlacedComponent],
    pub wires: &'a [Wire],
    pub library: &'a PartLibrary,
}

/// Gauge and net assignment for a newly routed wire.
#[derive(Debug, Clone, Default)]
pub struct NewWireOptions {
    pub gauge: Gauge,
    pub net_id: Option<String>,
}

/// Result of routing a new wire.
#[derive(Debug, Clone)]
pub struct RoutedWire {
    pub wire: Wire,
    pub quality: RouteQuality,
    /// Geometry update for an existing pair member, when the new wire
    /// completes a pair.
    pub partner_update: Option<PartnerUpdate>,
}

#[derive(Debug, Clone)]
pub struct PartnerUpdate {
    pub wire_id: String,
    pub control_points: Vec<Point>,
}

/// Result of rerouting after a component move.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// The moved component with its snapped position applied.
    pub component: PlacedComponent,
    /// The full wire list with rerouted geometry and pairs re-synced.
    pub wires: Vec<Wire>,
}

/// Core routing API. Every operation takes an explicit snapshot and returns
/// new geometry; shared state is replaced wholesale by the caller, keeping
/// undo snapshots stable.
pub struct RoutingCore;

impl RoutingCore {
    /// Route a new wire between two terminals.
    ///
    /// The validator gates the request first; incompatible terminal types
    /// are a normal rejection. If `user_waypoints` is non-empty the wire
    /// follows them (cleaned); otherwise the escape/fast-path/A* pipeline
    /// runs. The new wire's geometry is mirrored from an existing canonical
    /// pair member when one exists, and `partner_update` carries the mirror
    /// in the opposite case.
    pub fn route_new_wire(
        from: &TerminalRef,
        to: &TerminalRef,
        user_waypoints: &[Point],
        snapshot: DiagramSnapshot<'_>,
        options: NewWireOptions,
        config: &RouterConfig,
    ) -> Result<RoutedWire, WireRouteError> {
        let a = resolve_required(from, &snapshot)?;
        let b = resolve_required(to, &snapshot)?;
        if !can_connect(a.terminal_type, b.terminal_type) {
            return Err(WireRouteError::IncompatibleTerminals {
                from: a.terminal_type.tag().to_string(),
                to: b.terminal_type.tag().to_string(),
            });
        }

        let (sequence, quality) = if user_waypoints.is_empty() {
            let context = route_context(&snapshot, None);
            route_between(
                &RouteEndpoint {
                    position: a.position,
                    exit: a.exit,
                },
                &RouteEndpoint {
                    position: b.position,
                    exit: b.exit,
                },
                &context,
                config,
            )
        } else {
            let mut seq = Vec::with_capacity(user_waypoints.len() + 2);
            seq.push(a.position);
            seq.extend(user_waypoints.iter().map(|p| p.snapped(config.grid_size)));
            seq.push(b.position);
            (seq, RouteQuality::Routed)
        };
        let cleaned = clean_sequence(&sequence, config.grid_size);
        let control_points = interior(&cleaned);

        let mut wire = Wire {
            id: uuid::Uuid::new_v4().to_string(),
            from: from.clone(),
            to: to.clone(),
            wire_type: a.terminal_type,
            gauge: options.gauge,
            net_id: options.net_id,
            control_points,
        };

        let partner_update = Self::reconcile_pair(&mut wire, snapshot.wires);
        Ok(RoutedWire {
            wire,
            quality,
            partner_update,
        })
    }

    /// Mirror geometry between the new wire and an existing pair member.
    /// If the new wire is the partner and a canonical exists, the new wire
    /// adopts the canonical's geometry; if the new wire is canonical and a
    /// partner exists, the partner receives the mirror.
    fn reconcile_pair(wire: &mut Wire, existing: &[Wire]) -> Option<PartnerUpdate> {
        let key = pairs::pair_key(wire)?;
        let complement = pairs::complement(wire.wire_type)?;
        let counterpart = existing
            .iter()
            .find(|w| w.wire_type == complement && pairs::pair_key(w).as_ref() == Some(&key))?;
        let same_dir = wire.from.component_id == counterpart.from.component_id
            && wire.to.component_id == counterpart.to.component_id;
        if pairs::is_canonical(wire.wire_type) {
            Some(PartnerUpdate {
                wire_id: counterpart.id.clone(),
                control_points: pairs::mirror_points(&wire.control_points, same_dir),
            })
        } else {
            wire.control_points = pairs::mirror_points(&counterpart.control_points, same_dir);
            None
        }
    }

    /// Reroute after a component move.
    ///
    /// The new position is snapped to the grid. Wires attached to the moved
    /// component are rerouted through the full pipeline against the updated
    /// layout; unattached wires keep their geometry. Pairs are re-synced and
    /// every control point re-snapped before returning.
    pub fn reroute_for_move(
        component_id: &str,
        new_x: f64,
        new_y: f64,
        snapshot: DiagramSnapshot<'_>,
        config: &RouterConfig,
    ) -> Result<MoveResult, WireRouteError> {
        let original = snapshot
            .components
            .iter()
            .find(|c| c.id == component_id)
            .ok_or_else(|| WireRouteError::UnknownComponent(component_id.to_string()))?;
        let mut moved = original.clone();
        moved.x = snap(new_x, config.grid_size);
        moved.y = snap(new_y, config.grid_size);

        let components: Vec<PlacedComponent> = snapshot
            .components
            .iter()
            .map(|c| if c.id == component_id { moved.clone() } else { c.clone() })
            .collect();
        let updated = DiagramSnapshot {
            components: &components,
            wires: snapshot.wires,
            library: snapshot.library,
        };
        let context = route_context(&updated, Some(component_id));

        let mut wires: Vec<Wire> = snapshot
            .wires
            .iter()
            .map(|w| {
                if !w.touches_component(component_id) {
                    return w.clone();
                }
                let (Some(a), Some(b)) = (
                    AnchorResolver::resolve(&w.from, &components, snapshot.library),
                    AnchorResolver::resolve(&w.to, &components, snapshot.library),
                ) else {
                    tracing::debug!(wire = %w.id, "stale terminal reference, wire left unchanged");
                    return w.clone();
                };
                let (sequence, _quality) = route_between(
                    &RouteEndpoint {
                        position: a.position,
                        exit: a.exit,
                    },
                    &RouteEndpoint {
                        position: b.position,
                        exit: b.exit,
                    },
                    &context,
                    config,
                );
                let cleaned = clean_sequence(&sequence, config.grid_size);
                let mut next = w.clone();
                next.control_points = interior(&cleaned);
                next
            })
            .collect();

        wires = pairs::sync_pairs(&wires);
        for w in &mut wires {
            for p in &mut w.control_points {
                *p = p.snapped(config.grid_size);
            }
        }
        Ok(MoveResult {
            component: moved,
            wires,
        })
    }

    /// Run the cleaning pipeline over one wire's full vertex sequence.
    /// Wires with dangling references pass through unchanged.
    pub fn clean_wire(wire: &Wire, snapshot: DiagramSnapshot<'_>, config: &RouterConfig) -> Wire {
        let (Some(a), Some(b)) = (
            AnchorResolver::resolve(&wire.from, snapshot.components, snapshot.library),
            AnchorResolver::resolve(&wire.to, snapshot.components, snapshot.library),
        ) else {
            tracing::debug!(wire = %wire.id, "stale terminal reference, wire left unchanged");
            return wire.clone();
        };
        let mut sequence = Vec::with_capacity(wire.control_points.len() + 2);
        sequence.push(a.position);
        sequence.extend(
            wire.control_points
                .iter()
                .map(|p| p.snapped(config.grid_size)),
        );
        sequence.push(b.position);
        let cleaned = clean_sequence(&sequence, config.grid_size);
        let mut next = wire.clone();
        next.control_points = interior(&cleaned);
        next
    }

    /// Clean every wire and re-sync pairs (the bulk "clean all" action).
    pub fn clean_all_wires(snapshot: DiagramSnapshot<'_>, config: &RouterConfig) -> Vec<Wire> {
        let cleaned: Vec<Wire> = snapshot
            .wires
            .iter()
            .map(|w| Self::clean_wire(w, snapshot, config))
            .collect();
        pairs::sync_pairs(&cleaned)
    }

    /// Mirror canonical geometry onto pair partners.
    pub fn sync_pairs(wires: &[Wire]) -> Vec<Wire> {
        pairs::sync_pairs(wires)
    }
}

fn resolve_required(
    reference: &TerminalRef,
    snapshot: &DiagramSnapshot<'_>,
) -> Result<ResolvedTerminal, WireRouteError> {
    let component = snapshot
        .components
        .iter()
        .find(|c| c.id == reference.component_id)
        .ok_or_else(|| WireRouteError::UnknownComponent(reference.component_id.clone()))?;
    AnchorResolver::resolve(reference, snapshot.components, snapshot.library).ok_or_else(|| {
        WireRouteError::UnknownTerminal {
            component: component.id.clone(),
            terminal: reference.terminal_id.clone(),
        }
    })
}

/// Build the obstacle and occupancy context for a route. Wires touching
/// `exclude_component` (the one being moved) are left out of the occupancy
/// set, since their geometry is about to be replaced.
fn route_context(snapshot: &DiagramSnapshot<'_>, exclude_component: Option<&str>) -> RouteContext {
    let obstacles = AnchorResolver::all_bounds(snapshot.components, snapshot.library);
    let mut existing = Vec::new();
    for wire in snapshot.wires {
        if exclude_component.is_some_and(|id| wire.touches_component(id)) {
            continue;
        }
        let (Some(a), Some(b)) = (
            AnchorResolver::resolve(&wire.from, snapshot.components, snapshot.library),
            AnchorResolver::resolve(&wire.to, snapshot.components, snapshot.library),
        ) else {
            continue;
        };
        let mut polyline = Vec::with_capacity(wire.control_points.len() + 2);
        polyline.push(a.position);
        polyline.extend(wire.control_points.iter().copied());
        polyline.push(b.position);
        existing.extend(hv_segments_of_polyline(&polyline));
    }
    RouteContext {
        obstacles,
        existing,
    }
}

/// Interior points of a cleaned sequence: the persisted control points.
fn interior(sequence: &[Point]) -> Vec<Point> {
    if sequence.len() <= 2 {
        return Vec::new();
    }
    sequence[1..sequence.len() - 1].to_vec()
}
