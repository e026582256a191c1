// File: crates/choropleth-core/src/simplify.rs
// Summary: Topology-preserving simplification of a polygon coverage (adjacent regions stay gap-free).
// Notes:
// - Rings are cut into arcs at junction vertices. An arc shared by two
//   regions is simplified once, in a canonical direction, so both neighbours
//   receive the same vertices.
// - geo's Douglas-Peucker runs per arc, so arc endpoints stay pinned.
// - Arcs of a ring that would collapse, cross another arc or lose a hole
//   outside its shell keep their original vertices; they are frozen for every
//   region that shares them and the coverage is reassembled.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, BoundingRect, Coord, Intersects, Line, LineString, MultiPolygon, Polygon, Rect, Simplify};
use log::{debug, info};

type VKey = (u64, u64);

#[inline]
fn norm_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

#[inline]
fn vkey(c: Coord<f64>) -> VKey {
    (norm_zero(c.x).to_bits(), norm_zero(c.y).to_bits())
}

#[inline]
fn cmp_coord(a: &Coord<f64>, b: &Coord<f64>) -> Ordering {
    norm_zero(a.x)
        .total_cmp(&norm_zero(b.x))
        .then(norm_zero(a.y).total_cmp(&norm_zero(b.y)))
}

#[inline]
fn edge_key(a: Coord<f64>, b: Coord<f64>) -> (VKey, VKey) {
    let (ka, kb) = (vkey(a), vkey(b));
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

/// Ring coordinates without the closing point or repeated neighbours.
fn open_ring(ls: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(ls.0.len());
    for &c in &ls.0 {
        if out.last().map(|l| vkey(*l) != vkey(c)).unwrap_or(true) {
            out.push(c);
        }
    }
    while out.len() > 1 && vkey(out[0]) == vkey(out[out.len() - 1]) {
        out.pop();
    }
    out
}

/// A run of ring vertices between two junctions, stored canonically.
struct TopoArc {
    key: Vec<VKey>,
    coords: Vec<Coord<f64>>,
    reversed: bool,
}

impl TopoArc {
    fn new(mut coords: Vec<Coord<f64>>) -> Self {
        let forward_first = coords
            .iter()
            .zip(coords.iter().rev())
            .map(|(f, r)| cmp_coord(f, r))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal);
        let reversed = forward_first == Ordering::Greater;
        if reversed {
            coords.reverse();
        }
        let key = coords.iter().copied().map(vkey).collect();
        Self { key, coords, reversed }
    }
}

/// Vertex index farthest from `origin`; ties go to the smallest coordinate so
/// identical rings pick the same vertex whatever their start or winding.
fn farthest_from(ring: &[Coord<f64>], origin: Coord<f64>) -> usize {
    let d2 = |c: &Coord<f64>| (c.x - origin.x).powi(2) + (c.y - origin.y).powi(2);
    (0..ring.len())
        .max_by(|&a, &b| {
            d2(&ring[a])
                .total_cmp(&d2(&ring[b]))
                .then_with(|| cmp_coord(&ring[b], &ring[a]))
        })
        .unwrap_or(0)
}

struct Topology {
    edges: HashMap<(VKey, VKey), Vec<usize>>,
    occurrences: HashMap<VKey, usize>,
}

impl Topology {
    fn build(rings: &[Vec<Coord<f64>>]) -> Self {
        let mut edges: HashMap<(VKey, VKey), Vec<usize>> = HashMap::new();
        let mut occurrences: HashMap<VKey, usize> = HashMap::new();
        for (rid, ring) in rings.iter().enumerate() {
            let n = ring.len();
            for i in 0..n {
                *occurrences.entry(vkey(ring[i])).or_default() += 1;
                if n < 2 {
                    continue;
                }
                let owners = edges.entry(edge_key(ring[i], ring[(i + 1) % n])).or_default();
                if !owners.contains(&rid) {
                    owners.push(rid);
                }
            }
        }
        for owners in edges.values_mut() {
            owners.sort_unstable();
        }
        Self { edges, occurrences }
    }

    fn owners(&self, a: Coord<f64>, b: Coord<f64>) -> &[usize] {
        self.edges.get(&edge_key(a, b)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Junctions: the set of rings sharing the boundary changes here, or
    /// the vertex is touched more often than its edges explain.
    fn junctions(&self, ring: &[Coord<f64>]) -> Vec<usize> {
        let n = ring.len();
        (0..n)
            .filter(|&i| {
                let prev = ring[(i + n - 1) % n];
                let next = ring[(i + 1) % n];
                let incoming = self.owners(prev, ring[i]);
                let outgoing = self.owners(ring[i], next);
                let touches = self.occurrences.get(&vkey(ring[i])).copied().unwrap_or(0);
                incoming != outgoing || touches > incoming.len()
            })
            .collect()
    }
}

fn split_arcs(ring: &[Coord<f64>], mut pins: Vec<usize>) -> Vec<TopoArc> {
    let n = ring.len();
    if pins.is_empty() {
        let start = (0..n).min_by(|&a, &b| cmp_coord(&ring[a], &ring[b])).unwrap_or(0);
        pins.push(start);
    }
    if pins.len() == 1 {
        let far = farthest_from(ring, ring[pins[0]]);
        if far != pins[0] {
            pins.push(far);
        }
    }
    pins.sort_unstable();
    pins.dedup();

    let mut arcs = Vec::with_capacity(pins.len());
    for (k, &start) in pins.iter().enumerate() {
        let end = if k + 1 < pins.len() { pins[k + 1] } else { pins[0] + n };
        let coords = (start..=end).map(|i| ring[i % n]).collect();
        arcs.push(TopoArc::new(coords));
    }
    arcs
}

/// Unique arcs of the coverage; a border shared by two regions is stored once.
#[derive(Default)]
struct ArcTable {
    index: HashMap<Vec<VKey>, usize>,
    original: Vec<LineString<f64>>,
}

impl ArcTable {
    fn intern(&mut self, arc: TopoArc) -> ArcRef {
        let id = match self.index.get(&arc.key) {
            Some(&id) => id,
            None => {
                let id = self.original.len();
                self.index.insert(arc.key, id);
                self.original.push(LineString::from(arc.coords));
                id
            }
        };
        ArcRef { id, reversed: arc.reversed }
    }
}

#[derive(Clone, Copy)]
struct ArcRef {
    id: usize,
    reversed: bool,
}

fn assemble(refs: &[ArcRef], current: &[&LineString<f64>]) -> Vec<Coord<f64>> {
    let mut ring = Vec::new();
    for r in refs {
        let mut pts = current[r.id].0.clone();
        if r.reversed {
            pts.reverse();
        }
        pts.pop();
        ring.extend(pts);
    }
    ring
}

fn collapsed(ring: &[Coord<f64>]) -> bool {
    ring.len() < 3 || Polygon::new(LineString::from(ring.to_vec()), Vec::new()).signed_area() == 0.0
}

/// True when two segments cross, or overlap along a stretch. Touching at an
/// endpoint is how neighbouring arcs meet and does not count.
fn segments_cross(a: Line<f64>, b: Line<f64>) -> bool {
    match line_intersection(a, b) {
        Some(LineIntersection::SinglePoint { is_proper, .. }) => is_proper,
        Some(LineIntersection::Collinear { .. }) => true,
        None => false,
    }
}

fn self_crossing(arc: &LineString<f64>) -> bool {
    let lines = arc.lines().collect::<Vec<_>>();
    (0..lines.len()).any(|i| {
        ((i + 2)..lines.len()).any(|j| {
            matches!(
                line_intersection(lines[i], lines[j]),
                Some(LineIntersection::SinglePoint { is_proper: true, .. })
            )
        })
    })
}

fn arcs_cross(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    a.lines().any(|la| {
        let ra = Rect::new(la.start, la.end);
        b.lines()
            .filter(|lb| ra.intersects(&Rect::new(lb.start, lb.end)))
            .any(|lb| segments_cross(la, lb))
    })
}

/// Ids of arcs that cross themselves or another arc, found with a sweep over
/// bounding boxes sorted by their left edge.
fn crossing_arcs(current: &[&LineString<f64>]) -> HashSet<usize> {
    let rects = current.iter().map(|arc| arc.bounding_rect()).collect::<Vec<_>>();
    let mut order = (0..current.len()).filter(|&i| rects[i].is_some()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (rects[a].map(|r| r.min().x), rects[b].map(|r| r.min().x));
        ra.unwrap_or(f64::NAN).total_cmp(&rb.unwrap_or(f64::NAN))
    });

    let mut hits = HashSet::new();
    for (k, &a) in order.iter().enumerate() {
        let Some(ra) = rects[a] else { continue };
        if self_crossing(current[a]) {
            hits.insert(a);
        }
        for &b in &order[k + 1..] {
            let Some(rb) = rects[b] else { continue };
            if rb.min().x > ra.max().x {
                break;
            }
            if ra.intersects(&rb) && arcs_cross(current[a], current[b]) {
                hits.insert(a);
                hits.insert(b);
            }
        }
    }
    hits
}

/// A hole is still nested when none of its vertices left the shell.
fn holes_nested(exterior: &[Coord<f64>], holes: &[&[Coord<f64>]]) -> bool {
    let shell = Polygon::new(LineString::from(exterior.to_vec()), Vec::new());
    holes.iter().all(|hole| hole.iter().all(|c| shell.intersects(c)))
}

/// Simplify every region with a linear `tolerance` (in CRS units) while
/// keeping shared boundaries identical between neighbours and every
/// polygon valid.
pub fn simplify_coverage(geometries: &[MultiPolygon<f64>], tolerance: f64) -> Vec<MultiPolygon<f64>> {
    // layout[region][polygon] = ring ids (exterior first)
    let mut rings: Vec<Vec<Coord<f64>>> = Vec::new();
    let mut layout: Vec<Vec<Vec<usize>>> = Vec::with_capacity(geometries.len());
    for mp in geometries {
        let mut polys = Vec::with_capacity(mp.0.len());
        for poly in &mp.0 {
            let mut ids = Vec::with_capacity(1 + poly.interiors().len());
            for ls in std::iter::once(poly.exterior()).chain(poly.interiors()) {
                ids.push(rings.len());
                rings.push(open_ring(ls));
            }
            polys.push(ids);
        }
        layout.push(polys);
    }

    let topology = Topology::build(&rings);
    let mut table = ArcTable::default();
    let plans: Vec<Option<Vec<ArcRef>>> = rings
        .iter()
        .map(|ring| {
            (ring.len() >= 3).then(|| {
                split_arcs(ring, topology.junctions(ring))
                    .into_iter()
                    .map(|arc| table.intern(arc))
                    .collect()
            })
        })
        .collect();
    debug!("simplify: {} rings cut into {} arcs", rings.len(), table.original.len());

    let simplified = table
        .original
        .iter()
        .map(|arc| if tolerance > 0.0 { arc.simplify(&tolerance) } else { arc.clone() })
        .collect::<Vec<_>>();

    // An arc is frozen (kept at full detail) when simplifying it collapses a
    // ring, makes it cross another arc or pushes a hole out of its shell.
    let mut frozen = vec![false; table.original.len()];
    let output = loop {
        let current = frozen
            .iter()
            .zip(table.original.iter().zip(&simplified))
            .map(|(&f, (orig, simp))| if f { orig } else { simp })
            .collect::<Vec<_>>();

        let out = rings
            .iter()
            .zip(&plans)
            .map(|(ring, plan)| match plan {
                Some(refs) => assemble(refs, &current),
                None => ring.clone(),
            })
            .collect::<Vec<_>>();

        let mut suspects: HashSet<usize> = crossing_arcs(&current);
        let ring_arcs = |rid: usize| plans[rid].iter().flatten().map(|r| r.id);
        for (rid, ring) in out.iter().enumerate() {
            if plans[rid].is_some() && collapsed(ring) {
                suspects.extend(ring_arcs(rid));
            }
        }
        for ids in layout.iter().flatten() {
            let Some((&shell, holes)) = ids.split_first() else { continue };
            if holes.is_empty() || out[shell].len() < 3 {
                continue;
            }
            let hole_rings = holes.iter().map(|&h| out[h].as_slice()).collect::<Vec<_>>();
            if !holes_nested(&out[shell], &hole_rings) {
                suspects.extend(ids.iter().flat_map(|&rid| ring_arcs(rid)));
            }
        }

        let mut newly_frozen = 0usize;
        for id in suspects {
            if !frozen[id] {
                frozen[id] = true;
                newly_frozen += 1;
            }
        }
        if newly_frozen == 0 {
            break out;
        }
        debug!("simplify: froze {newly_frozen} arcs of invalid rings; reassembling");
    };

    let before: usize = rings.iter().map(Vec::len).sum();
    let after: usize = output.iter().map(Vec::len).sum();
    info!(
        "simplified {} regions at tolerance {tolerance}: {before} -> {after} vertices ({} arcs kept whole)",
        geometries.len(),
        frozen.iter().filter(|f| **f).count()
    );

    layout
        .into_iter()
        .map(|polys| {
            let polygons = polys
                .into_iter()
                .filter_map(|ids| {
                    let mut ids = ids.into_iter();
                    let exterior = output[ids.next()?].clone();
                    if exterior.is_empty() {
                        return None;
                    }
                    let interiors = ids
                        .map(|id| LineString::from(output[id].clone()))
                        .filter(|ls| !ls.0.is_empty())
                        .collect();
                    Some(Polygon::new(LineString::from(exterior), interiors))
                })
                .collect();
            MultiPolygon::new(polygons)
        })
        .collect()
}
