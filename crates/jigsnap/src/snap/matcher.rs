use super::cfg::{SNAP_ANGLE_DEG, SNAP_LOCK_AFTER, SNAP_POS_PX};
use super::types::{CandidateCheck, Pose, SnapCandidate, SnapResult};

/// Map any angle into (-180, 180].
#[inline]
pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Snap tolerances and lock policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapCfg {
    pub pos_tolerance_px: f64,
    pub angle_tolerance_deg: f64,
    /// Snapped pieces come back with `locked = true` when set.
    pub lock_after_snap: bool,
}

impl Default for SnapCfg {
    fn default() -> Self {
        Self {
            pos_tolerance_px: SNAP_POS_PX,
            angle_tolerance_deg: SNAP_ANGLE_DEG,
            lock_after_snap: SNAP_LOCK_AFTER,
        }
    }
}

impl SnapCfg {
    fn tolerances_finite(&self) -> bool {
        self.pos_tolerance_px.is_finite() && self.angle_tolerance_deg.is_finite()
    }
}

/// Stateless matcher over a fixed `SnapCfg`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapMatcher {
    cfg: SnapCfg,
}

impl SnapMatcher {
    pub fn new(cfg: SnapCfg) -> Self {
        Self { cfg }
    }

    #[inline]
    pub fn cfg(&self) -> &SnapCfg {
        &self.cfg
    }

    fn check_one(&self, current: &Pose, angle_deg: f64, c: &SnapCandidate) -> CandidateCheck {
        let distance = (current.position() - c.target).norm();
        let finite = distance.is_finite() && angle_deg.is_finite() && self.cfg.tolerances_finite();
        let qualifies = finite
            && distance <= self.cfg.pos_tolerance_px
            && angle_deg.abs() <= self.cfg.angle_tolerance_deg;
        CandidateCheck {
            label: c.label,
            distance,
            angle_deg,
            qualifies,
        }
    }

    /// Diagnostics for every candidate, in input order.
    pub fn check(&self, current: &Pose, candidates: &[SnapCandidate]) -> Vec<CandidateCheck> {
        let angle = normalize_deg(current.rotation_deg);
        candidates
            .iter()
            .map(|c| self.check_one(current, angle, c))
            .collect()
    }

    /// Pick the closest qualifying candidate (earliest on ties) and snap to it.
    pub fn evaluate(&self, current: &Pose, candidates: &[SnapCandidate]) -> SnapResult {
        if !current.is_finite() || !self.cfg.tolerances_finite() {
            tracing::debug!(
                x = current.x,
                y = current.y,
                rotation = current.rotation_deg,
                pos_tol = self.cfg.pos_tolerance_px,
                angle_tol = self.cfg.angle_tolerance_deg,
                "snap skipped: non-finite input"
            );
            return SnapResult::unchanged(current);
        }

        let angle = normalize_deg(current.rotation_deg);
        let mut best: Option<(f64, &SnapCandidate)> = None;
        for c in candidates {
            let chk = self.check_one(current, angle, c);
            tracing::trace!(
                label = %chk.label,
                distance = chk.distance,
                angle = chk.angle_deg,
                qualifies = chk.qualifies,
                "snap candidate"
            );
            if !c.target.x.is_finite() || !c.target.y.is_finite() {
                tracing::debug!(label = %c.label, "snap candidate ignored: non-finite target");
                continue;
            }
            if !chk.qualifies {
                continue;
            }
            if best.map_or(true, |(d, _)| chk.distance < d) {
                best = Some((chk.distance, c));
            }
        }

        match best {
            Some((distance, c)) => {
                tracing::debug!(label = %c.label, distance, "snapped");
                SnapResult {
                    matched: true,
                    position: c.target,
                    rotation_deg: 0.0,
                    locked: self.cfg.lock_after_snap,
                    label: Some(c.label),
                }
            }
            None => {
                tracing::debug!(candidates = candidates.len(), "no snap");
                SnapResult::unchanged(current)
            }
        }
    }
}

/// Evaluate with explicit tolerances and the default lock policy.
pub fn evaluate(
    current: &Pose,
    candidates: &[SnapCandidate],
    pos_tolerance_px: f64,
    angle_tolerance_deg: f64,
) -> SnapResult {
    SnapMatcher::new(SnapCfg {
        pos_tolerance_px,
        angle_tolerance_deg,
        ..SnapCfg::default()
    })
    .evaluate(current, candidates)
}
