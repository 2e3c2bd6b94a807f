//! Target selection: which face, salient point or region is attended
//!
//! Selection is positional (indices into the current snapshot) unless a face
//! id is pinned, in which case the pin wins on every perception update.

use serde::{Deserialize, Serialize};

use crate::core::region::RegionProvider;
use crate::types::{AttentionRegion, AttentionResult, LookAt, PerceptionState, Point3};

/// Indices into the current perception snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionCursor {
    pub face: Option<usize>,
    pub salient: Option<usize>,
}

fn round_robin(current: Option<usize>, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    match current {
        Some(i) if i + 1 < count => Some(i + 1),
        // Past the end, or stale after the list shrank: restart
        _ => Some(0),
    }
}

fn needs_reselect(current: Option<usize>, count: usize) -> bool {
    current.map_or(true, |i| i >= count)
}

/// Next face to attend under `policy`
///
/// NearestFace picks the face closest to the vertical axis through the robot
/// (first one on ties); every other policy advances round-robin.
pub fn select_next_face(state: &PerceptionState, current: Option<usize>, policy: LookAt) -> Option<usize> {
    if state.faces.is_empty() {
        return None;
    }
    match policy {
        LookAt::NearestFace => {
            let mut best: Option<(usize, f64)> = None;
            for (i, face) in state.faces.iter().enumerate() {
                let d = face.position.planar_norm_sq();
                if best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((i, d));
                }
            }
            best.map(|(i, _)| i)
        }
        _ => round_robin(current, state.faces.len()),
    }
}

/// Next salient point, always round-robin
pub fn select_next_salient_point(state: &PerceptionState, current: Option<usize>) -> Option<usize> {
    round_robin(current, state.salient_points.len())
}

/// Bring the cursor in line with a freshly replaced snapshot
///
/// A pinned face id (non-zero) overrides positional selection: the cursor
/// snaps to the face carrying that id, or to none if it is absent.
pub fn reconcile(state: &PerceptionState, cursor: &mut SelectionCursor, wanted_face_id: u32, policy: LookAt) {
    if wanted_face_id != 0 {
        cursor.face = state.face_index(wanted_face_id);
    } else if needs_reselect(cursor.face, state.faces.len()) {
        cursor.face = select_next_face(state, cursor.face, policy);
    }

    if needs_reselect(cursor.salient, state.salient_points.len()) {
        cursor.salient = select_next_salient_point(state, cursor.salient);
    }
}

/// Target point in the selected attention region (output frame)
pub fn select_region_target(provider: &mut dyn RegionProvider, region: AttentionRegion) -> AttentionResult<Point3> {
    provider.region_point(region.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Face;

    fn faces(points: &[(f64, f64)]) -> PerceptionState {
        PerceptionState::with_faces(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Face::new(i as u32 + 1, Point3::new(x, y, 0.0)))
                .collect(),
        )
    }

    #[test]
    fn test_nearest_face() {
        let state = faces(&[(1.0, 0.0), (0.5, 0.5), (3.0, 3.0)]);
        assert_eq!(select_next_face(&state, None, LookAt::NearestFace), Some(1));
        assert_eq!(select_next_face(&state, Some(2), LookAt::NearestFace), Some(1));
    }

    #[test]
    fn test_nearest_face_tie_keeps_first() {
        let state = faces(&[(2.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(select_next_face(&state, None, LookAt::NearestFace), Some(1));
    }

    #[test]
    fn test_round_robin_wraps() {
        let state = faces(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let mut cur = None;
        let mut seen = Vec::new();
        for _ in 0..6 {
            cur = select_next_face(&state, cur, LookAt::AllFaces);
            seen.push(cur.unwrap());
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_no_faces_selects_none() {
        let state = PerceptionState::empty();
        assert_eq!(select_next_face(&state, Some(3), LookAt::AllFaces), None);
        assert_eq!(select_next_salient_point(&state, Some(0)), None);
    }

    #[test]
    fn test_reconcile_keeps_valid_cursor() {
        let state = faces(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let mut cursor = SelectionCursor {
            face: Some(2),
            salient: None,
        };
        reconcile(&state, &mut cursor, 0, LookAt::AllFaces);
        assert_eq!(cursor.face, Some(2));
    }

    #[test]
    fn test_reconcile_reselects_out_of_range() {
        let state = faces(&[(1.0, 0.0), (2.0, 0.0)]);
        let mut cursor = SelectionCursor {
            face: Some(5),
            salient: Some(1),
        };
        reconcile(&state, &mut cursor, 0, LookAt::OneFace);
        assert_eq!(cursor.face, Some(0));
        assert_eq!(cursor.salient, None);
    }

    #[test]
    fn test_reconcile_restarts_when_list_shrinks() {
        let mut state = faces(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        state.salient_points = PerceptionState::with_salient_points(vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ])
        .salient_points;
        // Cursors left over from a snapshot with five faces and points
        let mut cursor = SelectionCursor {
            face: Some(3),
            salient: Some(4),
        };
        reconcile(&state, &mut cursor, 0, LookAt::AllFaces);
        assert_eq!(cursor.face, Some(0));
        assert_eq!(cursor.salient, Some(0));
    }

    #[test]
    fn test_reconcile_pinned_face() {
        let mut state = faces(&[(1.0, 0.0), (2.0, 0.0)]);
        let mut cursor = SelectionCursor::default();
        reconcile(&state, &mut cursor, 7, LookAt::OneFace);
        assert_eq!(cursor.face, None);

        state.faces.push(Face::new(7, Point3::new(0.8, 0.1, 0.0)));
        cursor.face = Some(0);
        reconcile(&state, &mut cursor, 7, LookAt::OneFace);
        assert_eq!(cursor.face, Some(2));
    }

    #[test]
    fn test_reconcile_selects_first_salient_point() {
        let state = PerceptionState::with_salient_points(vec![Point3::new(1.0, 0.0, 0.0)]);
        let mut cursor = SelectionCursor::default();
        reconcile(&state, &mut cursor, 0, LookAt::Saliency);
        assert_eq!(cursor.salient, Some(0));
    }
}
