//! Persisted diagram data model.
//!
//! These types mirror the JSON document produced by the surrounding editor:
//! a `DiagramDto` holds the placed components, the wires between their
//! terminals, and optional wire labels. Part definitions (the component
//! library) travel separately and are never embedded in the document.
//!
//! The core must accept any well-formed instance of this schema; optional
//! fields such as `controlPoints` or `netId` default rather than fail.

pub mod anchors;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{snap, Cardinal, Point};

/// The eight recognized terminal types. Connectability and pair grouping are
/// both decided from this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalType {
    #[serde(rename = "power+")]
    PowerPlus,
    #[serde(rename = "power-")]
    PowerMinus,
    #[serde(rename = "canH")]
    CanHigh,
    #[serde(rename = "canL")]
    CanLow,
    #[serde(rename = "signal+")]
    SignalPlus,
    #[serde(rename = "signal-")]
    SignalMinus,
    #[serde(rename = "ethernet")]
    Ethernet,
    #[serde(rename = "usb")]
    Usb,
}

impl TerminalType {
    pub const ALL: [TerminalType; 8] = [
        TerminalType::PowerPlus,
        TerminalType::PowerMinus,
        TerminalType::CanHigh,
        TerminalType::CanLow,
        TerminalType::SignalPlus,
        TerminalType::SignalMinus,
        TerminalType::Ethernet,
        TerminalType::Usb,
    ];

    /// The wire-schema tag for this type, as persisted.
    pub fn tag(&self) -> &'static str {
        match self {
            TerminalType::PowerPlus => "power+",
            TerminalType::PowerMinus => "power-",
            TerminalType::CanHigh => "canH",
            TerminalType::CanLow => "canL",
            TerminalType::SignalPlus => "signal+",
            TerminalType::SignalMinus => "signal-",
            TerminalType::Ethernet => "ethernet",
            TerminalType::Usb => "usb",
        }
    }
}

/// Wire gauge (AWG). Persisted as the bare AWG number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gauge {
    Awg10,
    Awg12,
    Awg14,
    Awg16,
    Awg18,
    Awg20,
    Awg22,
}

impl Default for Gauge {
    fn default() -> Self {
        Gauge::Awg18
    }
}

impl TryFrom<u8> for Gauge {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(Gauge::Awg10),
            12 => Ok(Gauge::Awg12),
            14 => Ok(Gauge::Awg14),
            16 => Ok(Gauge::Awg16),
            18 => Ok(Gauge::Awg18),
            20 => Ok(Gauge::Awg20),
            22 => Ok(Gauge::Awg22),
            other => Err(format!("unsupported wire gauge: {other} AWG")),
        }
    }
}

impl From<Gauge> for u8 {
    fn from(g: Gauge) -> u8 {
        match g {
            Gauge::Awg10 => 10,
            Gauge::Awg12 => 12,
            Gauge::Awg14 => 14,
            Gauge::Awg16 => 16,
            Gauge::Awg18 => 18,
            Gauge::Awg20 => 20,
            Gauge::Awg22 => 22,
        }
    }
}

impl Gauge {
    /// Approximate rendered stroke width in pixels for this gauge. Consumed
    /// by the render layer; kept here as presentation metadata of the model.
    pub fn stroke_width(&self) -> f64 {
        match self {
            Gauge::Awg10 => 5.0,
            Gauge::Awg12 => 4.5,
            Gauge::Awg14 => 4.0,
            Gauge::Awg16 => 3.2,
            Gauge::Awg18 => 2.6,
            Gauge::Awg20 => 2.2,
            Gauge::Awg22 => 1.8,
        }
    }
}

/// Perpendicular offset, in pixels, between the two rendered strokes of a
/// paired wire. The core only ever produces a single centerline; applying
/// this offset is entirely a rendering concern.
pub fn render_offset_for_type(t: TerminalType) -> f64 {
    match t {
        TerminalType::CanHigh | TerminalType::CanLow => 4.0,
        TerminalType::PowerPlus | TerminalType::PowerMinus => 5.0,
        TerminalType::SignalPlus | TerminalType::SignalMinus => 3.5,
        TerminalType::Ethernet | TerminalType::Usb => 0.0,
    }
}

/// Component rotation in 90-degree steps, persisted as degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::R0
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            other => Err(format!("rotation must be a multiple of 90: {other}")),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        match r {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }
}

impl Rotation {
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }
}

/// A named connection point on a part, in part-local coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub terminal_type: TerminalType,
    pub x: f64,
    pub y: f64,
    /// Face the wire must leave from, if the part declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<Cardinal>,
}

/// A part in the component library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDefinition {
    pub key: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub terminals: Vec<Terminal>,
}

impl PartDefinition {
    pub fn terminal(&self, id: &str) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.id == id)
    }
}

/// The component library, keyed by part key.
#[derive(Debug, Clone, Default)]
pub struct PartLibrary {
    parts: HashMap<String, PartDefinition>,
}

impl PartLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from part definitions, skipping any with a blank key.
    pub fn from_parts(parts: impl IntoIterator<Item = PartDefinition>) -> Self {
        let mut map = HashMap::new();
        for part in parts {
            if part.key.trim().is_empty() {
                tracing::warn!(part = %part.name, "part definition missing key, skipped");
                continue;
            }
            map.insert(part.key.clone(), part);
        }
        Self { parts: map }
    }

    pub fn insert(&mut self, part: PartDefinition) {
        self.parts.insert(part.key.clone(), part);
    }

    pub fn get(&self, key: &str) -> Option<&PartDefinition> {
        self.parts.get(key)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// A component instance placed on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedComponent {
    pub id: String,
    pub part_key: String,
    /// User label, defaults to the part name at placement time.
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: Rotation,
}

/// Reference to one terminal of one placed component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalRef {
    pub component_id: String,
    pub terminal_id: String,
}

/// A routed wire between two terminals.
///
/// `control_points` holds only the interior bend vertices; the two endpoints
/// are always derived from the current terminal positions and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    pub from: TerminalRef,
    pub to: TerminalRef,
    #[serde(rename = "type")]
    pub wire_type: TerminalType,
    #[serde(default)]
    pub gauge: Gauge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_id: Option<String>,
    #[serde(default)]
    pub control_points: Vec<Point>,
}

impl Wire {
    /// True if either endpoint references the given component.
    pub fn touches_component(&self, component_id: &str) -> bool {
        self.from.component_id == component_id || self.to.component_id == component_id
    }
}

/// A free-text label attached to a wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLabel {
    pub id: String,
    pub wire_id: String,
    pub text: String,
}

/// The persisted diagram document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDto {
    #[serde(default)]
    pub components: Vec<PlacedComponent>,
    #[serde(default)]
    pub wires: Vec<Wire>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<WireLabel>,
}

impl DiagramDto {
    /// Remove a component and cascade: every wire referencing it, and every
    /// label on such a wire, is removed too.
    pub fn remove_component(&mut self, component_id: &str) {
        self.components.retain(|c| c.id != component_id);
        let removed: Vec<String> = self
            .wires
            .iter()
            .filter(|w| w.touches_component(component_id))
            .map(|w| w.id.clone())
            .collect();
        self.wires.retain(|w| !w.touches_component(component_id));
        self.labels.retain(|l| !removed.contains(&l.wire_id));
    }

    /// Snap every component position and every wire control point to the
    /// grid.
    pub fn snap_all(&mut self, grid: f64) {
        for c in &mut self.components {
            c.x = snap(c.x, grid);
            c.y = snap(c.y, grid);
        }
        for w in &mut self.wires {
            for p in &mut w.control_points {
                *p = p.snapped(grid);
            }
        }
    }
}
