//! Bubble layout engine.
//!
//! Pure geometry over circle summaries: no dependency on the orchestrators,
//! no state, no randomness. Produces final canvas coordinates for two
//! presentations: a tangent radial packing, and a relaxed layout where
//! bubbles sharing members are pulled toward each other. Transitions between
//! the two are the caller's concern.

use std::collections::HashSet;

/// Fixed canvas height; callers supply only the width.
pub const CANVAS_HEIGHT: f64 = 400.0;

/// Radius of the largest selected bubble before canvas fitting.
pub const MAX_RADIUS: f64 = 80.0;

/// Floor below which no bubble shrinks, before or after fitting.
pub const MIN_RADIUS: f64 = 30.0;

/// At most this many circles are rendered, largest first.
pub const MAX_BUBBLES: usize = 6;

/// Gap between tangent bubbles in the packed layout.
const RING_GAP: f64 = 12.0;

/// Padding kept between the bubble bounding box and the canvas edge.
const CANVAS_PADDING: f64 = 16.0;

/// Fixed iteration budget for the overlap relaxation.
const RELAX_ITERATIONS: usize = 300;

/// Per-iteration fraction of the distance error applied to each bubble.
const RELAX_DAMPING: f64 = 0.15;

/// Per-iteration pull toward the canvas center, bounding drift.
const CENTER_DECAY: f64 = 0.995;

/// A circle summary to lay out.
#[derive(Debug, Clone)]
pub struct BubbleSpec {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub count: usize,
    /// Member identity sets enable the overlap layout; without them the
    /// shared fraction is zero and bubbles simply keep their packing.
    pub member_ids: Option<HashSet<String>>,
}

/// A laid-out bubble in canvas coordinates, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBubble {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub count: usize,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// Lay out circles in the requested mode.
///
/// Convenience entry point for callers that switch modes on a flag; see
/// [`pack`] and [`pack_with_overlap`].
#[must_use]
pub fn layout_bubbles(
    circles: &[BubbleSpec],
    canvas_width: f64,
    overlap_mode: bool,
) -> Vec<PlacedBubble> {
    if overlap_mode {
        pack_with_overlap(circles, canvas_width)
    } else {
        pack(circles, canvas_width)
    }
}

/// Tangent radial packing fitted to the canvas.
///
/// The largest circle becomes the primary bubble at the layout origin;
/// every other selected circle sits on a ring around it, tangent and
/// non-overlapping. The whole arrangement is then uniformly scaled and
/// centered into `canvas_width x CANVAS_HEIGHT` minus padding.
#[must_use]
pub fn pack(circles: &[BubbleSpec], canvas_width: f64) -> Vec<PlacedBubble> {
    let selected = select(circles);
    let mut bubbles = radial_placement(&selected);
    fit_to_canvas(&mut bubbles, canvas_width, f64::INFINITY);
    bubbles
}

/// Overlap-relaxed layout.
///
/// Starts from the fitted packing, then for a fixed iteration budget pulls
/// each pair of bubbles toward a target distance that shrinks as their
/// shared-membership fraction grows, with a small global centering decay to
/// bound drift. A final fit pass re-centers without enlarging anything.
#[must_use]
pub fn pack_with_overlap(circles: &[BubbleSpec], canvas_width: f64) -> Vec<PlacedBubble> {
    let selected = select(circles);
    let mut bubbles = radial_placement(&selected);
    fit_to_canvas(&mut bubbles, canvas_width, f64::INFINITY);

    let n = bubbles.len();
    if n >= 2 {
        let fractions = pair_fractions(&selected);
        let center_x = canvas_width / 2.0;
        let center_y = CANVAS_HEIGHT / 2.0;

        for _ in 0..RELAX_ITERATIONS {
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = bubbles[j].x - bubbles[i].x;
                    let dy = bubbles[j].y - bubbles[i].y;
                    let dist = dx.hypot(dy).max(1e-6);

                    let fraction = fractions[i * n + j];
                    let target = (bubbles[i].r + bubbles[j].r) * (1.4 - 1.2 * fraction).max(0.2);

                    let step = (dist - target) * 0.5 * RELAX_DAMPING;
                    let ux = dx / dist;
                    let uy = dy / dist;
                    bubbles[i].x += ux * step;
                    bubbles[i].y += uy * step;
                    bubbles[j].x -= ux * step;
                    bubbles[j].y -= uy * step;
                }
            }

            for bubble in &mut bubbles {
                bubble.x = center_x + (bubble.x - center_x) * CENTER_DECAY;
                bubble.y = center_y + (bubble.y - center_y) * CENTER_DECAY;
            }
        }

        // Relaxation may have pushed the box outward; shrink-fit only.
        fit_to_canvas(&mut bubbles, canvas_width, 1.0);
    }

    bubbles
}

/// Sort by count descending (stable) and keep at most [`MAX_BUBBLES`].
fn select(circles: &[BubbleSpec]) -> Vec<&BubbleSpec> {
    let mut selected: Vec<&BubbleSpec> = circles.iter().collect();
    selected.sort_by(|a, b| b.count.cmp(&a.count));
    selected.truncate(MAX_BUBBLES);
    selected
}

/// Linear radius interpolation: the largest selected circle renders at
/// [`MAX_RADIUS`], smaller ones scale proportionally, never below
/// [`MIN_RADIUS`].
fn radius_for(count: usize, max_count: usize) -> f64 {
    let max_count = max_count.max(1);
    MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * (count as f64 / max_count as f64)
}

/// Primary bubble at the origin, the rest on a ring around it at equal
/// angular spacing starting straight up, each tangent to the primary.
fn radial_placement(selected: &[&BubbleSpec]) -> Vec<PlacedBubble> {
    let Some(primary) = selected.first() else {
        return Vec::new();
    };
    let max_count = primary.count;
    let primary_radius = radius_for(primary.count, max_count);

    let mut bubbles = Vec::with_capacity(selected.len());
    bubbles.push(placed(primary, 0.0, 0.0, primary_radius));

    let ring = &selected[1..];
    let spacing = if ring.len() > 1 {
        std::f64::consts::TAU / ring.len() as f64
    } else {
        0.0
    };

    for (i, spec) in ring.iter().enumerate() {
        let radius = radius_for(spec.count, max_count);
        let angle = -std::f64::consts::FRAC_PI_2 + spacing * i as f64;
        let distance = primary_radius + radius + RING_GAP;
        bubbles.push(placed(
            spec,
            distance * angle.cos(),
            distance * angle.sin(),
            radius,
        ));
    }

    bubbles
}

fn placed(spec: &BubbleSpec, x: f64, y: f64, r: f64) -> PlacedBubble {
    PlacedBubble {
        id: spec.id.clone(),
        name: spec.name.clone(),
        short_name: spec.short_name.clone(),
        count: spec.count,
        x,
        y,
        r,
    }
}

/// Uniformly scale and translate so the bounding box (including radii) fits
/// within the padded canvas, centered. Radii scale too, floored at
/// [`MIN_RADIUS`]. `max_scale` caps enlargement (`1.0` = shrink only).
fn fit_to_canvas(bubbles: &mut [PlacedBubble], canvas_width: f64, max_scale: f64) {
    if bubbles.is_empty() {
        return;
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for b in bubbles.iter() {
        min_x = min_x.min(b.x - b.r);
        max_x = max_x.max(b.x + b.r);
        min_y = min_y.min(b.y - b.r);
        max_y = max_y.max(b.y + b.r);
    }

    let box_w = (max_x - min_x).max(1e-6);
    let box_h = (max_y - min_y).max(1e-6);
    let avail_w = canvas_width - 2.0 * CANVAS_PADDING;
    let avail_h = CANVAS_HEIGHT - 2.0 * CANVAS_PADDING;
    let scale = (avail_w / box_w).min(avail_h / box_h).min(max_scale);

    let box_cx = (min_x + max_x) / 2.0;
    let box_cy = (min_y + max_y) / 2.0;
    let canvas_cx = canvas_width / 2.0;
    let canvas_cy = CANVAS_HEIGHT / 2.0;

    for b in bubbles {
        b.x = canvas_cx + (b.x - box_cx) * scale;
        b.y = canvas_cy + (b.y - box_cy) * scale;
        b.r = (b.r * scale).max(MIN_RADIUS);
    }
}

/// Shared-membership fraction per unordered pair, as a flat `n x n` matrix.
///
/// `|intersection| / min(count_a, count_b)`; zero when either circle lacks a
/// member-id set or declares an empty count.
fn pair_fractions(selected: &[&BubbleSpec]) -> Vec<f64> {
    let n = selected.len();
    let mut fractions = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let fraction = match (&selected[i].member_ids, &selected[j].member_ids) {
                (Some(a), Some(b)) => {
                    let denom = selected[i].count.min(selected[j].count);
                    if denom == 0 {
                        0.0
                    } else {
                        a.intersection(b).count() as f64 / denom as f64
                    }
                }
                _ => 0.0,
            };
            fractions[i * n + j] = fraction;
            fractions[j * n + i] = fraction;
        }
    }
    fractions
}
