//! 2D coordinate generation and SVG depiction.
//!
//! Layout strategy: ring systems are drawn as regular polygons (fused rings
//! reflected across their shared edge), acyclic chains as 120-degree zigzags,
//! and substituents radiate into the least crowded direction around their
//! anchor atom. Carbons are drawn as bare vertices; heteroatoms get a
//! CPK-coloured label with their implicit hydrogen count.

use std::collections::VecDeque;
use std::f64::consts::PI;
use std::fmt::Write as _;

use molcompass_common::error::{CompassError, Result};
use tracing::debug;

use crate::element::Element;
use crate::molecule::{BondOrder, Molecule};

const TAU: f64 = 2.0 * PI;

#[derive(Debug, Clone)]
pub struct DepictionConfig {
    pub width: u32,
    pub height: u32,
    /// Bond length in layout units before fitting to the canvas.
    pub bond_length: f64,
    pub margin: f64,
}

impl Default for DepictionConfig {
    fn default() -> Self {
        Self { width: 400, height: 400, bond_length: 46.0, margin: 30.0 }
    }
}

/// 2D depiction renderer.
pub struct Depictor {
    config: DepictionConfig,
}

impl Depictor {
    pub fn new(config: DepictionConfig) -> Self {
        Self { config }
    }

    /// Render a molecule as a standalone SVG document.
    pub fn depict(&self, mol: &Molecule) -> Result<String> {
        if mol.atom_count() == 0 {
            return Err(CompassError::Depiction("cannot depict an empty molecule".into()));
        }
        let coords = self.assign_coords(mol);
        debug!(atoms = mol.atom_count(), "assigned 2D coordinates");
        Ok(self.render_svg(mol, &coords))
    }

    /// Assign 2D coordinates to every atom.
    fn assign_coords(&self, mol: &Molecule) -> Vec<(f64, f64)> {
        let n = mol.atom_count();
        let l = self.config.bond_length;
        let mut pos: Vec<Option<(f64, f64)>> = vec![None; n];

        let rings = mol.rings();
        let mut ring_placed = vec![false; rings.len()];
        let mut atom_rings: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (ri, ring) in rings.iter().enumerate() {
            for &a in ring {
                atom_rings[a].push(ri);
            }
        }

        // Seed: the first atom's ring as a polygon around the origin, or the
        // first atom itself.
        let mut queue: VecDeque<usize> = VecDeque::new();
        if let Some(&ri) = atom_rings[0].first() {
            place_ring_fresh(&rings[ri], l, &mut pos);
            ring_placed[ri] = true;
            queue.extend(rings[ri].iter().copied());
        } else {
            pos[0] = Some((0.0, 0.0));
            queue.push_back(0);
        }

        while let Some(u) = queue.pop_front() {
            // Any ring through this atom gets laid out as a whole before
            // individual neighbours are considered.
            for &ri in &atom_rings[u] {
                if !ring_placed[ri] {
                    place_ring_attached(&rings[ri], u, mol, l, &mut pos);
                    ring_placed[ri] = true;
                    queue.extend(rings[ri].iter().copied());
                }
            }
            for v in mol.neighbors(u) {
                if pos[v].is_some() {
                    continue;
                }
                let angle = free_angle(u, mol, &pos);
                let (ux, uy) = pos[u].unwrap();
                pos[v] = Some((ux + l * angle.cos(), uy + l * angle.sin()));
                queue.push_back(v);
            }
        }

        // Parser output is always connected, so this only guards direct
        // Molecule construction.
        for (i, p) in pos.iter_mut().enumerate() {
            if p.is_none() {
                *p = Some((i as f64 * l, -2.0 * l));
            }
        }
        pos.into_iter().map(|p| p.unwrap()).collect()
    }

    fn render_svg(&self, mol: &Molecule, coords: &[(f64, f64)]) -> String {
        let w = self.config.width as f64;
        let h = self.config.height as f64;
        let m = self.config.margin;

        // Fit layout coordinates onto the canvas, preserving aspect ratio.
        let min_x = coords.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let max_x = coords.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = coords.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let max_y = coords.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);
        let bw = (max_x - min_x).max(1e-6);
        let bh = (max_y - min_y).max(1e-6);
        let scale = ((w - 2.0 * m) / bw).min((h - 2.0 * m) / bh).min(1.2);
        let ox = (w - bw * scale) / 2.0;
        let oy = (h - bh * scale) / 2.0;
        let tx = |x: f64| ox + (x - min_x) * scale;
        // SVG y axis points down.
        let ty = |y: f64| oy + (max_y - y) * scale;

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.config.width,
            h = self.config.height
        );
        let _ = write!(
            svg,
            r##"<rect width="100%" height="100%" fill="#ffffff"/>"##
        );

        // Bond strokes.
        for bond in &mol.bonds {
            let (x1, y1) = coords[bond.atom1];
            let (x2, y2) = coords[bond.atom2];
            let (x1, y1, x2, y2) = (tx(x1), ty(y1), tx(x2), ty(y2));
            let len = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt().max(1e-6);
            let (px, py) = ((y1 - y2) / len, (x2 - x1) / len);

            let offsets: &[f64] = match bond.order {
                BondOrder::Single | BondOrder::Aromatic => &[0.0],
                BondOrder::Double => &[-2.2, 2.2],
                BondOrder::Triple => &[-3.2, 0.0, 3.2],
            };
            for &o in offsets {
                let _ = write!(
                    svg,
                    r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#202020" stroke-width="1.6"/>"##,
                    x1 + px * o,
                    y1 + py * o,
                    x2 + px * o,
                    y2 + py * o
                );
            }
        }

        // Dashed inner circle for each fully aromatic ring.
        for ring in mol.rings() {
            let aromatic = ring.iter().enumerate().all(|(i, &a)| {
                let b = ring[(i + 1) % ring.len()];
                mol.get_bond(a, b)
                    .map(|bond| bond.order == BondOrder::Aromatic)
                    .unwrap_or(false)
            });
            if !aromatic {
                continue;
            }
            let cx: f64 = ring.iter().map(|&a| tx(coords[a].0)).sum::<f64>() / ring.len() as f64;
            let cy: f64 = ring.iter().map(|&a| ty(coords[a].1)).sum::<f64>() / ring.len() as f64;
            let r: f64 = ring
                .iter()
                .map(|&a| ((tx(coords[a].0) - cx).powi(2) + (ty(coords[a].1) - cy).powi(2)).sqrt())
                .sum::<f64>()
                / ring.len() as f64;
            let _ = write!(
                svg,
                r##"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="none" stroke="#202020" stroke-width="1.1" stroke-dasharray="4 3"/>"##,
                cx,
                cy,
                r * 0.58
            );
        }

        // Atom labels: heteroatoms, charged/isotopic atoms, and lone carbons.
        for (i, atom) in mol.atoms.iter().enumerate() {
            let labelled = atom.element != Element::C
                || atom.formal_charge != 0
                || atom.isotope.is_some()
                || mol.degree(i) == 0;
            if !labelled {
                continue;
            }
            let (x, y) = (tx(coords[i].0), ty(coords[i].1));
            let mut label = String::new();
            if let Some(iso) = atom.isotope {
                let _ = write!(label, "{}", iso);
            }
            label.push_str(atom.element.symbol());
            match atom.implicit_hydrogens {
                0 => {}
                1 => label.push('H'),
                k => {
                    let _ = write!(label, "H{}", k);
                }
            }
            match atom.formal_charge {
                0 => {}
                1 => label.push('+'),
                -1 => label.push('-'),
                c if c > 1 => {
                    let _ = write!(label, "{}+", c);
                }
                c => {
                    let _ = write!(label, "{}-", -c);
                }
            }
            let _ = write!(
                svg,
                r##"<circle cx="{:.1}" cy="{:.1}" r="10" fill="#ffffff"/><text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="central" font-family="Helvetica, Arial, sans-serif" font-size="13" fill="{}">{}</text>"##,
                x,
                y,
                x,
                y,
                atom.element.cpk_color(),
                label
            );
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Place a ring as a regular polygon around the origin.
fn place_ring_fresh(ring: &[usize], bond_length: f64, pos: &mut [Option<(f64, f64)>]) {
    let k = ring.len() as f64;
    let radius = bond_length / (2.0 * (PI / k).sin());
    for (i, &a) in ring.iter().enumerate() {
        let angle = -TAU / 4.0 + i as f64 * TAU / k;
        pos[a] = Some((radius * angle.cos(), radius * angle.sin()));
    }
}

/// Place a ring that touches already-placed geometry: across a shared edge
/// when two adjacent ring atoms are placed (fused rings), otherwise radiating
/// away from the anchor atom's placed neighbours.
fn place_ring_attached(
    ring: &[usize],
    anchor: usize,
    mol: &Molecule,
    bond_length: f64,
    pos: &mut [Option<(f64, f64)>],
) {
    let k = ring.len();
    let start = ring.iter().position(|&a| a == anchor).unwrap_or(0);
    let mut ordered: Vec<usize> = ring[start..].iter().chain(ring[..start].iter()).copied().collect();

    // Prefer an orientation whose second atom is already placed (shared edge).
    if pos[ordered[1]].is_none() && pos[ordered[k - 1]].is_some() {
        ordered[1..].reverse();
    }

    let p1 = pos[ordered[0]].unwrap();
    if let Some(p2) = pos[ordered[1]] {
        place_polygon_from_edge(&ordered, p1, p2, mol, pos);
    } else {
        place_polygon_from_vertex(&ordered, p1, anchor, mol, bond_length, pos);
    }
}

fn place_polygon_from_edge(
    ordered: &[usize],
    p1: (f64, f64),
    p2: (f64, f64),
    mol: &Molecule,
    pos: &mut [Option<(f64, f64)>],
) {
    let k = ordered.len() as f64;
    let (ex, ey) = (p2.0 - p1.0, p2.1 - p1.1);
    let edge_len = (ex * ex + ey * ey).sqrt().max(1e-6);
    let (mx, my) = ((p1.0 + p2.0) / 2.0, (p1.1 + p2.1) / 2.0);
    let apothem = edge_len / (2.0 * (PI / k).tan());
    let (nx, ny) = (-ey / edge_len, ex / edge_len);

    // Pick the side away from the neighbourhood already drawn.
    let mut crowd = (0.0, 0.0);
    let mut crowd_n = 0usize;
    for &a in &[ordered[0], ordered[1]] {
        for w in mol.neighbors(a) {
            if let Some(p) = pos[w] {
                if !ordered.contains(&w) {
                    crowd = (crowd.0 + p.0, crowd.1 + p.1);
                    crowd_n += 1;
                }
            }
        }
    }
    let side = if crowd_n > 0 {
        let (cx, cy) = (crowd.0 / crowd_n as f64 - mx, crowd.1 / crowd_n as f64 - my);
        if cx * nx + cy * ny > 0.0 { -1.0 } else { 1.0 }
    } else {
        1.0
    };
    let center = (mx + nx * apothem * side, my + ny * apothem * side);

    let radius = (edge_len / 2.0).hypot(apothem);
    let ang1 = (p1.1 - center.1).atan2(p1.0 - center.0);
    let ang2 = (p2.1 - center.1).atan2(p2.0 - center.0);
    let mut delta = ang2 - ang1;
    while delta > PI {
        delta -= TAU;
    }
    while delta < -PI {
        delta += TAU;
    }
    let step = delta.signum() * TAU / k;

    for (i, &a) in ordered.iter().enumerate() {
        if pos[a].is_some() {
            continue;
        }
        let angle = ang1 + step * i as f64;
        pos[a] = Some((center.0 + radius * angle.cos(), center.1 + radius * angle.sin()));
    }
}

fn place_polygon_from_vertex(
    ordered: &[usize],
    p1: (f64, f64),
    anchor: usize,
    mol: &Molecule,
    bond_length: f64,
    pos: &mut [Option<(f64, f64)>],
) {
    let k = ordered.len() as f64;
    let radius = bond_length / (2.0 * (PI / k).sin());

    // Ring centre points away from whatever is already attached to the anchor.
    let mut dir = (0.0, 0.0);
    let mut n = 0usize;
    for w in mol.neighbors(anchor) {
        if let Some(p) = pos[w] {
            dir = (dir.0 + p.0 - p1.0, dir.1 + p.1 - p1.1);
            n += 1;
        }
    }
    let (dx, dy) = if n == 0 {
        (1.0, 0.0)
    } else {
        let len = (dir.0 * dir.0 + dir.1 * dir.1).sqrt();
        if len < 1e-6 { (1.0, 0.0) } else { (-dir.0 / len, -dir.1 / len) }
    };
    let center = (p1.0 + dx * radius, p1.1 + dy * radius);
    let ang1 = (p1.1 - center.1).atan2(p1.0 - center.0);

    for (i, &a) in ordered.iter().enumerate() {
        if pos[a].is_some() {
            continue;
        }
        let angle = ang1 + i as f64 * TAU / k;
        pos[a] = Some((center.0 + radius * angle.cos(), center.1 + radius * angle.sin()));
    }
}

/// Pick the bond angle for a new neighbour of `u`: zigzag continuation when
/// `u` has a single placed neighbour, otherwise the least crowded direction.
fn free_angle(u: usize, mol: &Molecule, pos: &[Option<(f64, f64)>]) -> f64 {
    let (ux, uy) = pos[u].unwrap();
    let occupied: Vec<f64> = mol
        .neighbors(u)
        .into_iter()
        .filter_map(|w| pos[w].map(|(wx, wy)| (wy - uy).atan2(wx - ux)))
        .collect();

    if occupied.is_empty() {
        return -TAU / 12.0;
    }

    let candidates = (0..12).map(|i| -PI + i as f64 * TAU / 12.0);
    if occupied.len() == 1 {
        // 120-degree separation from the existing bond gives the zigzag.
        candidates
            .min_by(|&a, &b| {
                let da = (angular_distance(a, occupied[0]) - TAU / 3.0).abs();
                let db = (angular_distance(b, occupied[0]) - TAU / 3.0).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(0.0)
    } else {
        candidates
            .max_by(|&a, &b| {
                let da = occupied
                    .iter()
                    .map(|&o| angular_distance(a, o))
                    .fold(f64::INFINITY, f64::min);
                let db = occupied
                    .iter()
                    .map(|&o| angular_distance(b, o))
                    .fold(f64::INFINITY, f64::min);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(0.0)
    }
}

fn angular_distance(a: f64, b: f64) -> f64 {
    let mut d = (a - b).abs() % TAU;
    if d > PI {
        d = TAU - d;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::{Atom, Bond};
    use crate::smiles::parse_smiles;

    fn depict(smiles: &str) -> String {
        let mol = parse_smiles(smiles).unwrap();
        Depictor::new(DepictionConfig::default()).depict(&mol).unwrap()
    }

    #[test]
    fn benzene_gets_aromatic_circle() {
        let svg = depict("c1ccccc1");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"width="400""#));
        assert_eq!(svg.matches("<line").count(), 6);
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn double_bond_draws_two_strokes() {
        let svg = depict("C=O");
        assert_eq!(svg.matches("<line").count(), 2);
        assert!(svg.contains(">O</text>"));
    }

    #[test]
    fn phenol_labels_hydroxyl() {
        let svg = depict("C1=CC=C(C=C1)O");
        assert!(svg.contains(">OH</text>"));
        // Kekulé structure: no aromatic circle.
        assert!(!svg.contains("stroke-dasharray"));
    }

    #[test]
    fn lone_atom_is_labelled() {
        let svg = depict("C");
        assert!(svg.contains(">CH4</text>"));
    }

    #[test]
    fn charge_appears_in_label() {
        let svg = depict("C[NH3+]");
        assert!(svg.contains(">NH3+</text>"));
    }

    #[test]
    fn fused_rings_share_geometry() {
        // Every candidate fragment must come out as a well-formed SVG.
        for smiles in [
            "C1CC1",
            "C1=CC=C(C=C1)O",
            "CNC(=O)c1cn(C)c2ccccc12",
            "CC(C)CC(C)N",
            "c1ccccc1-c1ccccc1",
        ] {
            let svg = depict(smiles);
            assert!(svg.starts_with("<svg"), "bad SVG for {}", smiles);
            assert!(!svg.contains("NaN"), "layout produced NaN for {}", smiles);
        }
    }

    #[test]
    fn empty_molecule_is_an_error() {
        let mol = Molecule::new(String::new(), Vec::<Atom>::new(), Vec::<Bond>::new());
        let res = Depictor::new(DepictionConfig::default()).depict(&mol);
        assert!(res.is_err());
    }
}
