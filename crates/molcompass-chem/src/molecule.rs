//! Molecular graph representation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::element::Element;

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric bond order for valence calculations.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

/// An atom in a molecular graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            isotope: None,
            is_aromatic: false,
            implicit_hydrogens: 0,
        }
    }
}

/// A bond between two atoms, referenced by index into `Molecule::atoms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

/// A molecular graph with atoms, bonds, and adjacency information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    /// The SMILES string this molecule was parsed from.
    pub smiles: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom_idx] = Vec<(neighbor_atom_idx, bond_idx)>
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Create a new molecule, building the adjacency list from atoms and bonds.
    pub fn new(smiles: String, atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        Molecule { smiles, atoms, bonds, adjacency }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Number of non-hydrogen atoms.
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.element != Element::H).count()
    }

    /// Neighbor atom indices for a given atom.
    pub fn neighbors(&self, atom_idx: usize) -> Vec<usize> {
        self.adjacency[atom_idx].iter().map(|&(n, _)| n).collect()
    }

    /// Graph degree of an atom (number of explicit bonds).
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Find the bond between two atoms, if any.
    pub fn get_bond(&self, a1: usize, a2: usize) -> Option<&Bond> {
        self.adjacency[a1]
            .iter()
            .find(|&&(n, _)| n == a2)
            .map(|&(_, bi)| &self.bonds[bi])
    }

    /// Ring perception: one ring per DFS back-edge, each taken as the
    /// shortest cycle through that edge. Good enough for depiction; this is
    /// not a strict SSSR implementation.
    pub fn rings(&self) -> Vec<Vec<usize>> {
        let n = self.atoms.len();
        if n == 0 {
            return Vec::new();
        }

        // DFS spanning forest, collecting back edges.
        let mut visited = vec![false; n];
        let mut back_edges: Vec<(usize, usize)> = Vec::new();

        for root in 0..n {
            if visited[root] {
                continue;
            }
            let mut stack = vec![(root, usize::MAX)];
            while let Some((u, from)) = stack.pop() {
                if visited[u] {
                    continue;
                }
                visited[u] = true;
                for &(v, _) in &self.adjacency[u] {
                    if v == from {
                        continue;
                    }
                    if visited[v] {
                        let key = (u.min(v), u.max(v));
                        if !back_edges.contains(&key) {
                            back_edges.push(key);
                        }
                    } else {
                        stack.push((v, u));
                    }
                }
            }
        }

        // Shortest cycle through each back edge via BFS avoiding the edge itself.
        let mut rings = Vec::new();
        for &(u, v) in &back_edges {
            if let Some(path) = self.shortest_path_avoiding(u, v, (u, v)) {
                rings.push(path);
            }
        }
        rings.sort_by_key(|r| r.len());
        rings
    }

    /// BFS shortest path from `start` to `goal` that never traverses
    /// `skip_edge`. Returns the cycle atom list (path, which closes via the
    /// skipped edge).
    fn shortest_path_avoiding(
        &self,
        start: usize,
        goal: usize,
        skip_edge: (usize, usize),
    ) -> Option<Vec<usize>> {
        let n = self.atoms.len();
        let mut prev = vec![usize::MAX; n];
        let mut seen = vec![false; n];
        let mut queue = std::collections::VecDeque::new();
        seen[start] = true;
        queue.push_back(start);

        while let Some(u) = queue.pop_front() {
            if u == goal {
                let mut path = vec![goal];
                let mut cur = goal;
                while cur != start {
                    cur = prev[cur];
                    path.push(cur);
                }
                path.reverse();
                return Some(path);
            }
            for &(v, _) in &self.adjacency[u] {
                let edge = (u.min(v), u.max(v));
                if edge == skip_edge || seen[v] {
                    continue;
                }
                seen[v] = true;
                prev[v] = u;
                queue.push_back(v);
            }
        }
        None
    }

    /// Molecular formula in Hill order (C, H, then alphabetical), counting
    /// implicit hydrogens.
    pub fn molecular_formula(&self) -> String {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.symbol()).or_insert(0) += 1;
            *counts.entry("H").or_insert(0) += atom.implicit_hydrogens as usize;
        }
        counts.retain(|_, c| *c > 0);

        let mut out = String::new();
        let mut push = |sym: &str, count: usize| {
            out.push_str(sym);
            if count > 1 {
                out.push_str(&count.to_string());
            }
        };

        if let Some(&c) = counts.get("C") {
            push("C", c);
            counts.remove("C");
        }
        if let Some(&h) = counts.get("H") {
            push("H", h);
            counts.remove("H");
        }
        let mut rest: Vec<_> = counts.into_iter().collect();
        rest.sort_by_key(|&(sym, _)| sym);
        for (sym, count) in rest {
            push(sym, count);
        }
        out
    }

    /// Molecular weight including implicit hydrogens (g/mol).
    pub fn molecular_weight(&self) -> f64 {
        self.atoms
            .iter()
            .map(|a| {
                a.element.atomic_mass() + a.implicit_hydrogens as f64 * Element::H.atomic_mass()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cyclopropane() -> Molecule {
        let atoms = vec![
            {
                let mut a = Atom::new(Element::C);
                a.implicit_hydrogens = 2;
                a
            };
            3
        ];
        let bonds = vec![
            Bond { atom1: 0, atom2: 1, order: BondOrder::Single },
            Bond { atom1: 1, atom2: 2, order: BondOrder::Single },
            Bond { atom1: 2, atom2: 0, order: BondOrder::Single },
        ];
        Molecule::new("C1CC1".into(), atoms, bonds)
    }

    #[test]
    fn adjacency_and_degree() {
        let mol = make_cyclopropane();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.heavy_atom_count(), 3);
        for i in 0..3 {
            assert_eq!(mol.degree(i), 2);
        }
        assert!(mol.get_bond(0, 2).is_some());
        assert!(mol.get_bond(0, 0).is_none());
    }

    #[test]
    fn ring_perception_finds_triangle() {
        let mol = make_cyclopropane();
        let rings = mol.rings();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 3);
    }

    #[test]
    fn acyclic_molecule_has_no_rings() {
        let atoms = vec![Atom::new(Element::C), Atom::new(Element::O)];
        let bonds = vec![Bond { atom1: 0, atom2: 1, order: BondOrder::Single }];
        let mol = Molecule::new("CO".into(), atoms, bonds);
        assert!(mol.rings().is_empty());
    }

    #[test]
    fn formula_and_weight() {
        let mol = make_cyclopropane();
        assert_eq!(mol.molecular_formula(), "C3H6");
        assert!((mol.molecular_weight() - 42.081).abs() < 0.01);
    }
}
