//! Stitching of curve fragments into connected chains.
//!
//! Surface intersection and boundary queries hand back curves in arbitrary
//! order and orientation. `connect_curves` greedily chains fragments whose
//! endpoints lie within a tolerance of each other, reversing fragments as
//! needed, and marks a chain closed when its own ends meet.

use vessel_types::{Point3d, Polyline};

/// Stitch fragments into maximal chains. Fragments are consumed in input
/// order; each chain is grown from both ends until no fragment attaches
/// within `tolerance`. Empty fragments are dropped.
pub fn connect_curves(fragments: &[Polyline], tolerance: f64) -> Vec<Polyline> {
    let mut pool: Vec<&Polyline> = fragments.iter().filter(|f| !f.is_empty()).collect();
    let mut chains = Vec::new();

    // Seed from the front so chains inherit the first fragment's
    // orientation; attachments may still reverse later fragments.
    while !pool.is_empty() {
        let seed = pool.remove(0);
        if seed.closed {
            chains.push(seed.clone());
            continue;
        }
        let mut points = seed.points.clone();
        let mut grew = true;
        while grew {
            grew = false;
            let (head, tail) = match (points.first(), points.last()) {
                (Some(h), Some(t)) => (*h, *t),
                _ => break,
            };
            let mut attach: Option<(usize, Attachment)> = None;
            for (i, frag) in pool.iter().enumerate() {
                let (fs, fe) = (frag.start_point(), frag.end_point());
                let kind = if near(tail, fs, tolerance) {
                    Attachment::TailForward
                } else if near(tail, fe, tolerance) {
                    Attachment::TailReversed
                } else if near(head, fe, tolerance) {
                    Attachment::HeadForward
                } else if near(head, fs, tolerance) {
                    Attachment::HeadReversed
                } else {
                    continue;
                };
                attach = Some((i, kind));
                break;
            }
            if let Some((i, kind)) = attach {
                let frag = pool.swap_remove(i);
                match kind {
                    Attachment::TailForward => {
                        points.extend(frag.points.iter().skip(1).copied());
                    }
                    Attachment::TailReversed => {
                        points.extend(frag.points.iter().rev().skip(1).copied());
                    }
                    Attachment::HeadForward => {
                        let mut prefix = frag.points.clone();
                        prefix.pop();
                        prefix.extend(points.iter().copied());
                        points = prefix;
                    }
                    Attachment::HeadReversed => {
                        let mut prefix: Vec<Point3d> =
                            frag.points.iter().rev().copied().collect();
                        prefix.pop();
                        prefix.extend(points.iter().copied());
                        points = prefix;
                    }
                }
                grew = true;
            }
        }

        let closed = points.len() > 2
            && match (points.first(), points.last()) {
                (Some(h), Some(t)) => near(*h, *t, tolerance),
                _ => false,
            };
        if closed {
            points.pop();
        }
        chains.push(Polyline { points, closed });
    }

    chains
}

enum Attachment {
    TailForward,
    TailReversed,
    HeadForward,
    HeadReversed,
}

fn near(a: Point3d, b: Point3d, tolerance: f64) -> bool {
    a.distance_to(&b) <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_types::MERGE_TOLERANCE;

    fn p(x: f64, y: f64) -> Point3d {
        Point3d::new(x, y, 0.0)
    }

    #[test]
    fn chains_two_fragments_end_to_end() {
        let a = Polyline::open(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let b = Polyline::open(vec![p(1.0, 0.0), p(2.0, 0.0)]);
        let chains = connect_curves(&[a, b], MERGE_TOLERANCE);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].points.len(), 3);
        assert!(!chains[0].closed);
    }

    #[test]
    fn reverses_fragment_when_needed() {
        let a = Polyline::open(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        // end-to-end but backwards
        let b = Polyline::open(vec![p(2.0, 0.0), p(1.0, 0.0)]);
        let chains = connect_curves(&[a, b], MERGE_TOLERANCE);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].points.last().map(|q| q.x), Some(2.0));
    }

    #[test]
    fn closes_a_loop_of_four_fragments() {
        let frags = vec![
            Polyline::open(vec![p(0.0, 0.0), p(1.0, 0.0)]),
            Polyline::open(vec![p(1.0, 0.0), p(1.0, 1.0)]),
            Polyline::open(vec![p(1.0, 1.0), p(0.0, 1.0)]),
            Polyline::open(vec![p(0.0, 1.0), p(0.0, 0.0)]),
        ];
        let chains = connect_curves(&frags, MERGE_TOLERANCE);
        assert_eq!(chains.len(), 1);
        assert!(chains[0].closed);
        assert_eq!(chains[0].points.len(), 4);
    }

    #[test]
    fn distant_fragments_stay_separate() {
        let a = Polyline::open(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let b = Polyline::open(vec![p(5.0, 0.0), p(6.0, 0.0)]);
        let chains = connect_curves(&[a, b], MERGE_TOLERANCE);
        assert_eq!(chains.len(), 2);
        assert!(chains.iter().all(|c| !c.closed));
    }

    #[test]
    fn loose_tolerance_bridges_small_gaps() {
        let a = Polyline::open(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let b = Polyline::open(vec![p(1.05, 0.0), p(2.0, 0.0)]);
        assert_eq!(connect_curves(&[a.clone(), b.clone()], MERGE_TOLERANCE).len(), 2);
        assert_eq!(connect_curves(&[a, b], 0.1).len(), 1);
    }

    #[test]
    fn already_closed_fragment_passes_through() {
        let sq = Polyline::closed_loop(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]);
        let chains = connect_curves(&[sq], MERGE_TOLERANCE);
        assert_eq!(chains.len(), 1);
        assert!(chains[0].closed);
    }
}
