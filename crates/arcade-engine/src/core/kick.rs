use serde::{Deserialize, Serialize};

use super::piece::{PieceKind, PieceRotation};

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Wall-kick table used to rescue rotations that would collide.
///
/// Offsets are `(dx, dy)` in board coordinates (y grows downward) and are
/// tried in order. The first entry is always `(0, 0)`, the unmodified rotation.
///
/// - [`KickTable::Simplified`]: the same six offsets for every piece and every
///   rotation. It does not follow the Super Rotation System and may reject
///   rotations a player would expect to succeed near walls.
/// - [`KickTable::Srs`]: the standard SRS tables (JLSTZ, I, no kicks for O).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum KickTable {
    #[default]
    #[display("simplified")]
    Simplified,
    #[display("srs")]
    Srs,
}

const SIMPLIFIED_KICKS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-1, -1), (1, -1)];

const NO_KICKS: [(i32, i32); 1] = [(0, 0)];

// SRS tables, indexed by the source rotation. Each row is the clockwise
// transition `from -> from + 1`; counterclockwise transitions reuse the row
// of the reverse transition with negated offsets.
//
// Values are the SRS offsets with y flipped for a downward-growing board.
const SRS_JLSTZ_CW: [[(i32, i32); 5]; 4] = [
    // 0 -> R
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // R -> 2
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 2 -> L
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // L -> 0
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

const SRS_I_CW: [[(i32, i32); 5]; 4] = [
    // 0 -> R
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // R -> 2
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 2 -> L
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // L -> 0
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

const fn negated(table: [[(i32, i32); 5]; 4]) -> [[(i32, i32); 5]; 4] {
    let mut out = table;
    let mut i = 0;
    while i < 4 {
        let mut j = 0;
        while j < 5 {
            out[i][j] = (-table[i][j].0, -table[i][j].1);
            j += 1;
        }
        i += 1;
    }
    out
}

// Indexed by the destination rotation of a counterclockwise turn, i.e. the
// source of the clockwise transition being reversed.
const SRS_JLSTZ_CCW: [[(i32, i32); 5]; 4] = negated(SRS_JLSTZ_CW);
const SRS_I_CCW: [[(i32, i32); 5]; 4] = negated(SRS_I_CW);

impl KickTable {
    /// Returns the kick offsets for rotating `kind` from `from` to `to`.
    ///
    /// `to` must be one step away from `from`; other pairs get no kicks.
    #[must_use]
    pub fn offsets(
        self,
        kind: PieceKind,
        from: PieceRotation,
        to: PieceRotation,
    ) -> &'static [(i32, i32)] {
        match self {
            KickTable::Simplified => &SIMPLIFIED_KICKS,
            KickTable::Srs => {
                let (cw, ccw) = match kind {
                    PieceKind::O => return &NO_KICKS,
                    PieceKind::I => (&SRS_I_CW, &SRS_I_CCW),
                    _ => (&SRS_JLSTZ_CW, &SRS_JLSTZ_CCW),
                };
                if from.rotated_right() == to {
                    &cw[from.index()]
                } else if from.rotated_left() == to {
                    &ccw[to.index()]
                } else {
                    &NO_KICKS
                }
            }
        }
    }
}
