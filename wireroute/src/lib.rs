//! WireRoute - wire routing and path-repair engine for wiring diagrams
//!
//! This library routes wires between component terminals on a grid-snapped
//! 2D canvas: orthogonal/45-degree paths that avoid component bodies and
//! existing wires, stay valid as components move, and keep logically paired
//! wires (power+/power-, CAN H/L) sharing a single centerline.
//!
//! # Quick Start
//!
//! ```no_run
//! use wireroute::{DiagramSnapshot, NewWireOptions, RouterConfig, RoutingCore};
//! use wireroute::schema::{PartLibrary, TerminalRef};
//!
//! let library = PartLibrary::new();
//! let components = vec![];
//! let wires = vec![];
//! let snapshot = DiagramSnapshot {
//!     components: &components,
//!     wires: &wires,
//!     library: &library,
//! };
//! let routed = RoutingCore::route_new_wire(
//!     &TerminalRef { component_id: "pdp".into(), terminal_id: "ch0".into() },
//!     &TerminalRef { component_id: "motor".into(), terminal_id: "in".into() },
//!     &[],
//!     snapshot,
//!     NewWireOptions::default(),
//!     &RouterConfig::default(),
//! ).unwrap();
//! println!("{} bends", routed.wire.control_points.len());
//! ```
//!
//! # Features
//!
//! - **Constrained A***: grid pathfinding with bend, proximity, and
//!   overlap penalties
//! - **Escape/stub routing**: axis-aligned lead-outs honoring terminal
//!   exit faces, with a straight-line fast path
//! - **Path repair**: loop collapsing, spike removal, collinear
//!   simplification, strict orthogonal/45 rebuild
//! - **Pair synchronization**: canonical/partner centerline mirroring

pub mod core;
pub mod geometry;
pub mod pairs;
pub mod router;
pub mod schema;
pub mod validation;

// Re-export main types
pub use crate::core::{
    DiagramSnapshot, MoveResult, NewWireOptions, PartnerUpdate, RoutedWire, RouterConfig,
    RoutingCore, WireRouteError,
};
pub use crate::router::RouteQuality;
pub use crate::schema::DiagramDto;
pub use crate::validation::can_connect;

use std::path::Path;

/// Load a persisted diagram document (convenience wrapper).
pub fn load_diagram(path: &Path) -> Result<DiagramDto, WireRouteError> {
    let text = std::fs::read_to_string(path)?;
    diagram_from_json(&text)
}

/// Save a diagram document as pretty-printed JSON (convenience wrapper).
pub fn save_diagram(path: &Path, diagram: &DiagramDto) -> Result<(), WireRouteError> {
    let text = serde_json::to_string_pretty(diagram)
        .map_err(|e| WireRouteError::Parse(e.to_string()))?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Parse a diagram document from a JSON string.
pub fn diagram_from_json(text: &str) -> Result<DiagramDto, WireRouteError> {
    serde_json::from_str(text).map_err(|e| WireRouteError::Parse(e.to_string()))
}

/// Parse a part-definition list from a JSON string into a library.
pub fn library_from_json(text: &str) -> Result<schema::PartLibrary, WireRouteError> {
    let parts: Vec<schema::PartDefinition> =
        serde_json::from_str(text).map_err(|e| WireRouteError::Parse(e.to_string()))?;
    Ok(schema::PartLibrary::from_parts(parts))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        DiagramSnapshot, MoveResult, NewWireOptions, RoutedWire, RouterConfig, RoutingCore,
        WireRouteError,
    };
    pub use crate::router::RouteQuality;
    pub use crate::schema::{
        DiagramDto, Gauge, PartDefinition, PartLibrary, PlacedComponent, Terminal, TerminalRef,
        TerminalType, Wire,
    };
    pub use crate::validation::can_connect;
}
