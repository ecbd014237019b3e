use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::PathNode;

/// Direction to take at a path vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    Forward,
    Left,
    Right,
    Reverse,
}

impl Instruction {
    /// Buckets an angle in degrees, 180 is straight ahead, 90 is a left
    /// turn and 270 a right turn
    pub fn from_angle(angle: f64) -> Self {
        if (135.0..=225.0).contains(&angle) {
            Instruction::Forward
        } else if (45.0..=225.0).contains(&angle) {
            Instruction::Left
        } else if (225.0..=315.0).contains(&angle) {
            Instruction::Right
        } else {
            Instruction::Reverse
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Instruction::Forward => "Forward",
            Instruction::Left => "Left",
            Instruction::Right => "Right",
            Instruction::Reverse => "Reverse",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Angle at `via` between the leg back to `from` and the leg on to `to`,
/// in degrees within `[0, 360)`.
///
/// Coordinates are projected onto a local plane around `via`. Returns
/// `None` when either leg has zero length, as with a pure level change.
pub fn turn_angle(from: &PathNode, via: &PathNode, to: &PathNode) -> Option<f64> {
    let scale = via.lat.to_radians().cos();
    let project = |node: &PathNode| ((node.lon - via.lon) * scale, node.lat - via.lat);

    let (ax, ay) = project(from);
    let (bx, by) = project(to);
    let norm = ax.hypot(ay) * bx.hypot(by);
    if norm == 0.0 {
        return None;
    }

    let cos = ((ax * bx + ay * by) / norm).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    // Positive cross product: `to` lies right of the walking direction
    if ax * by - ay * bx > 0.0 {
        Some(360.0 - angle)
    } else {
        Some(angle)
    }
}

/// Turn directions for a path.
///
/// The first entry is always [`Instruction::Forward`], followed by one
/// entry for each consecutive, non-overlapping triple of nodes. A trailing
/// pair or single node produces nothing.
pub fn generate_instructions(path: &[PathNode]) -> Vec<Instruction> {
    let mut instructions = vec![Instruction::Forward];
    instructions.extend(path.iter().tuples().map(|(from, via, to)| {
        turn_angle(from, via, to).map_or(Instruction::Forward, Instruction::from_angle)
    }));
    instructions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tags;

    fn node(id: usize, lat: f64, lon: f64) -> PathNode {
        PathNode::new(id, "test", 0.0, lat, lon, Tags::default())
    }

    #[test]
    fn buckets() {
        assert_eq!(Instruction::from_angle(180.0), Instruction::Forward);
        assert_eq!(Instruction::from_angle(135.0), Instruction::Forward);
        assert_eq!(Instruction::from_angle(225.0), Instruction::Forward);
        assert_eq!(Instruction::from_angle(90.0), Instruction::Left);
        assert_eq!(Instruction::from_angle(45.0), Instruction::Left);
        assert_eq!(Instruction::from_angle(270.0), Instruction::Right);
        assert_eq!(Instruction::from_angle(315.0), Instruction::Right);
        assert_eq!(Instruction::from_angle(10.0), Instruction::Reverse);
        assert_eq!(Instruction::from_angle(350.0), Instruction::Reverse);
    }

    #[test]
    fn straight_left_and_right() {
        // Walking north along the meridian
        let south = node(0, 0.0, 0.0);
        let center = node(1, 0.001, 0.0);
        let north = node(2, 0.002, 0.0);
        let west = node(3, 0.001, -0.001);
        let east = node(4, 0.001, 0.001);

        let straight = turn_angle(&south, &center, &north).unwrap();
        assert!((straight - 180.0).abs() < 1e-6);

        let left = turn_angle(&south, &center, &west).unwrap();
        assert!((left - 90.0).abs() < 1e-6);

        let right = turn_angle(&south, &center, &east).unwrap();
        assert!((right - 270.0).abs() < 1e-6);

        let back = turn_angle(&south, &center, &south).unwrap();
        assert!(back.abs() < 1e-6);
    }

    #[test]
    fn triples_do_not_overlap() {
        let path = vec![
            node(0, 0.0, 0.0),
            node(1, 0.001, 0.0),
            node(2, 0.002, 0.0),
            node(3, 0.002, 0.001),
            node(4, 0.002, 0.002),
            node(5, 0.001, 0.002),
            node(6, 0.0, 0.002),
        ];
        // (0,1,2) straight, (3,4,5) turn right, trailing 6 ignored
        assert_eq!(
            generate_instructions(&path),
            vec![Instruction::Forward, Instruction::Forward, Instruction::Right]
        );
    }

    #[test]
    fn short_paths_and_level_changes() {
        assert_eq!(generate_instructions(&[]), vec![Instruction::Forward]);
        assert_eq!(
            generate_instructions(&[node(0, 0.0, 0.0), node(1, 0.0, 0.001)]),
            vec![Instruction::Forward]
        );

        let mut upstairs = node(2, 0.001, 0.0);
        upstairs.level = 1.0;
        let path = [node(0, 0.0, 0.0), node(1, 0.001, 0.0), upstairs];
        assert_eq!(
            generate_instructions(&path),
            vec![Instruction::Forward, Instruction::Forward]
        );
    }

    #[test]
    fn serializes_by_name() {
        assert_eq!(serde_json::to_string(&Instruction::Left).unwrap(), "\"Left\"");
        assert_eq!(Instruction::Reverse.to_string(), "Reverse");
    }
}
