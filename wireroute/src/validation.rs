//! Terminal connection compatibility.
//!
//! Two terminals may be joined only when their types match exactly.
//! Complementary types such as `power+`/`power-` deliberately do not
//! validate against each other: pairing is a topology concept applied after
//! two identical-type wires exist between the same two components, not a
//! connection rule.

use crate::schema::TerminalType;

/// True if a wire may be created between terminals of these two types.
///
/// Pure and total over the closed type enum; a rejection is a normal
/// negative result, never an error.
pub fn can_connect(a: TerminalType, b: TerminalType) -> bool {
    a == b
}
