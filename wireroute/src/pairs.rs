//! Pair synchronization.
//!
//! Complementary wires (power+/power-, signal+/signal-, canH/canL) between
//! the same two components on the same net share a single centerline and are
//! rendered as two offset strokes. The pair relationship is derived, not
//! stored: wires group by `PairKey`, the `+`/H member is canonical, and the
//! partner's control points always mirror the canonical's. A partner whose
//! canonical does not exist yet behaves as an ordinary independent wire.

use std::collections::HashMap;

use crate::geometry::Point;
use crate::schema::{TerminalType, Wire};

/// Logical pairing family of a terminal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairGroup {
    Power,
    Signal,
    Can,
}

/// The pairing family a type belongs to, if any. Ethernet and USB wires are
/// always single.
pub fn pair_group(t: TerminalType) -> Option<PairGroup> {
    match t {
        TerminalType::PowerPlus | TerminalType::PowerMinus => Some(PairGroup::Power),
        TerminalType::SignalPlus | TerminalType::SignalMinus => Some(PairGroup::Signal),
        TerminalType::CanHigh | TerminalType::CanLow => Some(PairGroup::Can),
        TerminalType::Ethernet | TerminalType::Usb => None,
    }
}

/// The complementary type within a pair, if the type is paired.
pub fn complement(t: TerminalType) -> Option<TerminalType> {
    match t {
        TerminalType::PowerPlus => Some(TerminalType::PowerMinus),
        TerminalType::PowerMinus => Some(TerminalType::PowerPlus),
        TerminalType::SignalPlus => Some(TerminalType::SignalMinus),
        TerminalType::SignalMinus => Some(TerminalType::SignalPlus),
        TerminalType::CanHigh => Some(TerminalType::CanLow),
        TerminalType::CanLow => Some(TerminalType::CanHigh),
        TerminalType::Ethernet | TerminalType::Usb => None,
    }
}

/// True for the member of a pair whose geometry is authoritative.
pub fn is_canonical(t: TerminalType) -> bool {
    matches!(
        t,
        TerminalType::PowerPlus | TerminalType::SignalPlus | TerminalType::CanHigh
    )
}

/// Derived grouping key for paired wires: family, the two component ids in
/// sorted order, and the net id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    group: PairGroup,
    low: String,
    high: String,
    net: String,
}

/// The pair key of a wire, or `None` for unpaired types.
pub fn pair_key(wire: &Wire) -> Option<PairKey> {
    let group = pair_group(wire.wire_type)?;
    let (a, b) = (&wire.from.component_id, &wire.to.component_id);
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    Some(PairKey {
        group,
        low: low.clone(),
        high: high.clone(),
        net: wire.net_id.clone().unwrap_or_default(),
    })
}

fn same_points(a: &[Point], b: &[Point]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(p, q)| p == q)
}

/// Mirror every canonical wire's control points onto its partner.
///
/// Wires keep their list order; only partner geometry changes, and only when
/// it differs. When the partner's endpoints run in the opposite component
/// order, the mirrored points are reversed.
pub fn sync_pairs(wires: &[Wire]) -> Vec<Wire> {
    #[derive(Default)]
    struct Slots {
        canonical: Option<usize>,
        partner: Option<usize>,
    }

    let mut groups: HashMap<PairKey, Slots> = HashMap::new();
    for (idx, wire) in wires.iter().enumerate() {
        let Some(key) = pair_key(wire) else { continue };
        let slots = groups.entry(key).or_default();
        if is_canonical(wire.wire_type) && slots.canonical.is_none() {
            slots.canonical = Some(idx);
        } else if slots.partner.is_none() {
            slots.partner = Some(idx);
        }
    }

    let mut out: Vec<Wire> = wires.to_vec();
    for slots in groups.values() {
        let (Some(c_idx), Some(p_idx)) = (slots.canonical, slots.partner) else {
            continue;
        };
        let canonical = &wires[c_idx];
        let partner = &wires[p_idx];
        let same_dir = canonical.from.component_id == partner.from.component_id
            && canonical.to.component_id == partner.to.component_id;
        let mirrored: Vec<Point> = if same_dir {
            canonical.control_points.clone()
        } else {
            canonical.control_points.iter().rev().copied().collect()
        };
        if !same_points(&partner.control_points, &mirrored) {
            out[p_idx].control_points = mirrored;
        }
    }
    out
}

/// Mirror a canonical control-point list for a partner wire, given whether
/// the partner runs in the same component order.
pub fn mirror_points(canonical: &[Point], same_dir: bool) -> Vec<Point> {
    if same_dir {
        canonical.to_vec()
    } else {
        canonical.iter().rev().copied().collect()
    }
}
