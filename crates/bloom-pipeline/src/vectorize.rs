//! Vectorization of the bloom mask into connected regions.
//!
//! Pixels are grouped with 4-connectivity (edge adjacency); diagonal
//! contact alone does not join regions. Each region's outline is traced
//! along pixel edges with the interior kept on the left, so after a
//! north-up transform exteriors come out counter-clockwise and holes
//! clockwise. The area centroid of a union of equal-area pixels is the
//! mean of the member pixel centers, which commutes with the affine
//! transform.

use std::collections::{HashMap, VecDeque};

use ndarray::Array2;
use tracing::debug;

use bloom_common::{BloomMask, GeoTransform, PeakGrid};

/// A connected group of bloom pixels in world coordinates.
#[derive(Debug, Clone)]
pub struct Region {
    /// Number of member pixels.
    pub pixel_count: usize,
    /// Boundary rings; the exterior ring comes first, holes after.
    /// Rings are not closed (first vertex is not repeated).
    pub rings: Vec<Vec<(f64, f64)>>,
    /// Area centroid.
    pub centroid: (f64, f64),
    /// Actual maximum of the peak grid over member pixels.
    pub peak: f32,
}

/// Extract connected regions from the mask.
pub fn vectorize(mask: &BloomMask, peak: &PeakGrid, transform: &GeoTransform) -> Vec<Region> {
    let (height, width) = mask.dim();
    let mut labels = Array2::<u32>::zeros((height, width));
    let mut regions = Vec::new();
    let mut next_label = 1u32;

    for row in 0..height {
        for col in 0..width {
            if !mask[[row, col]] || labels[[row, col]] != 0 {
                continue;
            }

            let pixels = flood_fill(mask, &mut labels, next_label, row, col);
            regions.push(build_region(&pixels, &labels, next_label, peak, transform));
            next_label += 1;
        }
    }

    debug!(regions = regions.len(), "Vectorized bloom mask");
    regions
}

/// Collect one 4-connected component starting at (row, col).
fn flood_fill(
    mask: &BloomMask,
    labels: &mut Array2<u32>,
    label: u32,
    row: usize,
    col: usize,
) -> Vec<(usize, usize)> {
    let (height, width) = mask.dim();
    let mut pixels = Vec::new();
    let mut queue = VecDeque::new();

    labels[[row, col]] = label;
    queue.push_back((row, col));

    while let Some((r, c)) = queue.pop_front() {
        pixels.push((r, c));

        let mut visit = |nr: usize, nc: usize, labels: &mut Array2<u32>| {
            if mask[[nr, nc]] && labels[[nr, nc]] == 0 {
                labels[[nr, nc]] = label;
                queue.push_back((nr, nc));
            }
        };

        if r > 0 {
            visit(r - 1, c, labels);
        }
        if r + 1 < height {
            visit(r + 1, c, labels);
        }
        if c > 0 {
            visit(r, c - 1, labels);
        }
        if c + 1 < width {
            visit(r, c + 1, labels);
        }
    }

    pixels
}

fn build_region(
    pixels: &[(usize, usize)],
    labels: &Array2<u32>,
    label: u32,
    peak: &PeakGrid,
    transform: &GeoTransform,
) -> Region {
    let mut sum_col = 0.0;
    let mut sum_row = 0.0;
    let mut region_peak = f32::NEG_INFINITY;

    for &(row, col) in pixels {
        sum_col += col as f64 + 0.5;
        sum_row += row as f64 + 0.5;
        let value = peak[[row, col]];
        if value > region_peak {
            region_peak = value;
        }
    }

    let count = pixels.len() as f64;
    let centroid = transform.apply(sum_col / count, sum_row / count);

    let mut rings = trace_rings(pixels, labels, label);
    // Exterior ring first: it always encloses the largest pixel-space area.
    rings.sort_by(|a, b| {
        shoelace_area(b)
            .abs()
            .partial_cmp(&shoelace_area(a).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let world_rings = rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|(x, y)| transform.apply(x as f64, y as f64))
                .collect()
        })
        .collect();

    Region {
        pixel_count: pixels.len(),
        rings: world_rings,
        centroid,
        peak: region_peak,
    }
}

/// Trace the boundary rings of one labeled component in pixel space.
///
/// Vertices are integer lattice points (col, row) on the pixel grid.
fn trace_rings(pixels: &[(usize, usize)], labels: &Array2<u32>, label: u32) -> Vec<Vec<(i64, i64)>> {
    let (height, width) = labels.dim();
    let inside = |r: isize, c: isize| {
        r >= 0
            && c >= 0
            && (r as usize) < height
            && (c as usize) < width
            && labels[[r as usize, c as usize]] == label
    };

    // Directed boundary edges, interior on the left. For pixel (r, c):
    // top edge runs +x, right edge +y, bottom edge -x, left edge -y.
    let mut edges: Vec<((i64, i64), (i64, i64))> = Vec::new();
    for &(row, col) in pixels {
        let (r, c) = (row as isize, col as isize);
        let (x, y) = (col as i64, row as i64);

        if !inside(r - 1, c) {
            edges.push(((x, y), (x + 1, y)));
        }
        if !inside(r, c + 1) {
            edges.push(((x + 1, y), (x + 1, y + 1)));
        }
        if !inside(r + 1, c) {
            edges.push(((x + 1, y + 1), (x, y + 1)));
        }
        if !inside(r, c - 1) {
            edges.push(((x, y + 1), (x, y)));
        }
    }

    let mut outgoing: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (idx, (start, _)) in edges.iter().enumerate() {
        outgoing.entry(*start).or_default().push(idx);
    }

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();

    for first in 0..edges.len() {
        if used[first] {
            continue;
        }

        let origin = edges[first].0;
        let mut ring = vec![origin];
        let mut current = first;

        loop {
            used[current] = true;
            let (start, end) = edges[current];
            if end == origin {
                break;
            }
            ring.push(end);

            let dir = (end.0 - start.0, end.1 - start.1);
            current = next_edge(&edges, &outgoing, &used, end, dir);
        }

        rings.push(compress_collinear(ring));
    }

    rings
}

/// Pick the next unused edge out of `vertex`.
///
/// Where two corners of the same region pinch at one vertex there are
/// two candidates; preferring the sharpest right turn keeps each ring
/// tight around its own corner instead of crossing over.
fn next_edge(
    edges: &[((i64, i64), (i64, i64))],
    outgoing: &HashMap<(i64, i64), Vec<usize>>,
    used: &[bool],
    vertex: (i64, i64),
    dir: (i64, i64),
) -> usize {
    let candidates = outgoing
        .get(&vertex)
        .expect("boundary edge chain broke: no outgoing edge");

    // Right turn, then straight, then left turn (y grows downward in
    // pixel space, so clockwise rotation is (-dy, dx)).
    let preference = [(-dir.1, dir.0), dir, (dir.1, -dir.0)];

    for wanted in preference {
        for &idx in candidates {
            if used[idx] {
                continue;
            }
            let (start, end) = edges[idx];
            if (end.0 - start.0, end.1 - start.1) == wanted {
                return idx;
            }
        }
    }

    // A directed boundary never reverses onto itself; reaching this
    // point means the edge set was inconsistent.
    unreachable!("boundary edge chain broke at {:?}", vertex)
}

/// Drop vertices interior to straight runs.
fn compress_collinear(ring: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    let n = ring.len();
    if n < 3 {
        return ring;
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let here = ring[i];
        let next = ring[(i + 1) % n];

        let a = (here.0 - prev.0, here.1 - prev.1);
        let b = (next.0 - here.0, next.1 - here.1);
        if a.0 * b.1 - a.1 * b.0 != 0 {
            out.push(here);
        }
    }
    out
}

/// Twice the signed area of a ring (shoelace formula).
fn shoelace_area(ring: &[(i64, i64)]) -> f64 {
    let n = ring.len();
    let mut doubled = 0i64;
    for i in 0..n {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % n];
        doubled += x0 * y1 - x1 * y0;
    }
    doubled as f64 / 2.0
}
