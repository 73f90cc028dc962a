//! Terminal anchor resolution.
//!
//! A `TerminalRef` names a component and a terminal; resolving it yields the
//! terminal's absolute world position and its exit face, with the
//! component's rotation applied to both. Resolution is defensive: a
//! reference to a component or part that no longer exists yields `None`
//! rather than panicking, since components may be deleted out from under
//! stale wire references within the same edit batch.

use crate::geometry::{Cardinal, Point};
use crate::geometry::obstacles::Obstacle;

use super::{PartDefinition, PartLibrary, PlacedComponent, Rotation, TerminalRef, TerminalType};

/// A terminal reference resolved against the current layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTerminal {
    pub position: Point,
    pub exit: Option<Cardinal>,
    pub terminal_type: TerminalType,
}

/// Resolves terminal references and component bounds against a layout
/// snapshot.
pub struct AnchorResolver;

impl AnchorResolver {
    /// Resolve a terminal reference to its world position, rotated exit
    /// face, and type. Returns `None` if the component, its part, or the
    /// terminal cannot be found.
    pub fn resolve(
        reference: &TerminalRef,
        components: &[PlacedComponent],
        library: &PartLibrary,
    ) -> Option<ResolvedTerminal> {
        let component = components.iter().find(|c| c.id == reference.component_id)?;
        let part = library.get(&component.part_key)?;
        let terminal = part.terminal(&reference.terminal_id)?;

        let (lx, ly) = rotate_local(
            terminal.x,
            terminal.y,
            part.width,
            part.height,
            component.rotation,
        );
        Some(ResolvedTerminal {
            position: Point::new(component.x + lx, component.y + ly),
            exit: terminal
                .exit
                .map(|c| c.rotated(component.rotation.quarter_turns())),
            terminal_type: terminal.terminal_type,
        })
    }

    /// World-space bounding box of a placed component. Width and height swap
    /// under quarter-turn rotations.
    pub fn component_bounds(component: &PlacedComponent, part: &PartDefinition) -> Obstacle {
        let (w, h) = match component.rotation {
            Rotation::R0 | Rotation::R180 => (part.width, part.height),
            Rotation::R90 | Rotation::R270 => (part.height, part.width),
        };
        Obstacle::new(component.x, component.y, w, h)
    }

    /// Bounding boxes of every placed component whose part is known.
    pub fn all_bounds(components: &[PlacedComponent], library: &PartLibrary) -> Vec<Obstacle> {
        components
            .iter()
            .filter_map(|c| library.get(&c.part_key).map(|p| Self::component_bounds(c, p)))
            .collect()
    }
}

/// Rotate part-local coordinates clockwise about the component origin,
/// keeping the rotated bounding box in the positive quadrant.
fn rotate_local(x: f64, y: f64, width: f64, height: f64, rotation: Rotation) -> (f64, f64) {
    match rotation {
        Rotation::R0 => (x, y),
        Rotation::R90 => (height - y, x),
        Rotation::R180 => (width - x, height - y),
        Rotation::R270 => (y, width - x),
    }
}
