//! Expression mirroring: copies the attended face's brows, eyelids and mouth
//! onto the robot's facial parameters.

use crate::types::{FacialFeatures, FacialParameters, Mirroring};

/// Facial parameters mirroring `features` under `mode`
///
/// Returns `None` for Idle, which leaves the face to the renderer.
pub fn mirror_features(mode: Mirroring, features: &FacialFeatures) -> Option<FacialParameters> {
    if mode == Mirroring::Idle {
        return None;
    }
    let mut params = FacialParameters::default();

    if mode.mirrors_eyebrows() {
        let (l, r) = (features.left_brow, features.right_brow);
        params.push("brow_outer_UP.L", l);
        params.push("brow_inner_UP.L", l * 0.8);
        params.push("brow_outer_DN.L", 1.0 - l);
        params.push("brow_outer_UP.R", r);
        params.push("brow_inner_UP.R", r * 0.8);
        params.push("brow_outer_DN.R", 1.0 - r);
    }

    if mode.mirrors_eyelids() {
        let closed = ((1.0 - features.left_eyelid) + (1.0 - features.right_eyelid)) / 2.0;
        for channel in ["eye-blink.UP.R", "eye-blink.UP.L", "eye-blink.LO.R", "eye-blink.LO.L"] {
            params.push(channel, closed);
        }
    }

    if mode.mirrors_mouth() {
        params.push("lip-JAW.DN", features.mouth_open);
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> FacialFeatures {
        FacialFeatures {
            left_brow: 0.5,
            right_brow: 1.0,
            left_eyelid: 1.0,
            right_eyelid: 0.0,
            mouth_open: 0.3,
        }
    }

    #[test]
    fn test_idle_mirrors_nothing() {
        assert!(mirror_features(Mirroring::Idle, &features()).is_none());
    }

    #[test]
    fn test_eyebrows_only() {
        let p = mirror_features(Mirroring::Eyebrows, &features()).unwrap();
        assert_eq!(p.len(), 6);
        assert_eq!(p.get("brow_inner_UP.L"), Some(0.4));
        assert_eq!(p.get("brow_outer_DN.R"), Some(0.0));
        assert_eq!(p.get("lip-JAW.DN"), None);
    }

    #[test]
    fn test_eyelids_average_closure() {
        let p = mirror_features(Mirroring::Eyelids, &features()).unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p.get("eye-blink.UP.L"), Some(0.5));
    }

    #[test]
    fn test_all_channels() {
        let p = mirror_features(Mirroring::All, &features()).unwrap();
        assert_eq!(p.len(), 11);
        assert_eq!(p.get("lip-JAW.DN"), Some(0.3));
    }
}
