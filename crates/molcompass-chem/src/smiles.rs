//! SMILES line-notation parser.
//!
//! Supports the organic subset (bare `B C N O P S F Cl Br I`), aromatic
//! lowercase forms, bracket atoms with isotope / explicit hydrogens / formal
//! charge, explicit bond symbols, branches, and ring closures (including
//! `%nn`). Stereo markers are accepted and ignored. Disconnected components
//! (`.`) are rejected: the depicter draws a single connected molecule.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use molcompass_common::error::{CompassError, Result};
use tracing::debug;

use crate::element::Element;
use crate::molecule::{Atom, Bond, BondOrder, Molecule};

/// Parse a SMILES string into a molecular graph.
pub fn parse_smiles(smiles: &str) -> Result<Molecule> {
    let input = smiles.trim();
    if input.is_empty() {
        return Err(CompassError::InvalidSmiles("empty SMILES string".into()));
    }

    let mut atoms: Vec<Atom> = Vec::new();
    let mut bonds: Vec<Bond> = Vec::new();
    // Bracket atoms state their hydrogen count explicitly; organic-subset
    // atoms get theirs from default valences after parsing.
    let mut from_bracket: Vec<bool> = Vec::new();

    let mut current: Option<usize> = None;
    let mut last_bond: Option<BondOrder> = None;
    // Stack saves the current atom index at each branch open.
    let mut branch_stack: Vec<Option<usize>> = Vec::new();
    // ring number -> (atom index, explicit bond order at open, if any)
    let mut ring_map: HashMap<u32, (usize, Option<BondOrder>)> = HashMap::new();

    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            // Explicit bond symbols
            '-' => {
                last_bond = Some(BondOrder::Single);
                chars.next();
            }
            '=' => {
                last_bond = Some(BondOrder::Double);
                chars.next();
            }
            '#' => {
                last_bond = Some(BondOrder::Triple);
                chars.next();
            }
            ':' => {
                last_bond = Some(BondOrder::Aromatic);
                chars.next();
            }
            // Stereo bond markers: connectivity only
            '/' | '\\' => {
                last_bond = Some(BondOrder::Single);
                chars.next();
            }

            '(' => {
                branch_stack.push(current);
                chars.next();
            }
            ')' => {
                current = branch_stack
                    .pop()
                    .ok_or_else(|| CompassError::InvalidSmiles("unmatched ')'".into()))?;
                last_bond = None;
                chars.next();
            }

            '.' => {
                return Err(CompassError::InvalidSmiles(
                    "disconnected components are not supported".into(),
                ));
            }

            '%' => {
                chars.next();
                let d1 = consume_digit(&mut chars)?;
                let d2 = consume_digit(&mut chars)?;
                close_or_open_ring(
                    d1 * 10 + d2,
                    current,
                    last_bond.take(),
                    &mut ring_map,
                    &mut bonds,
                    &atoms,
                )?;
            }
            '0'..='9' => {
                let d = ch as u32 - '0' as u32;
                chars.next();
                close_or_open_ring(d, current, last_bond.take(), &mut ring_map, &mut bonds, &atoms)?;
            }

            '[' => {
                let atom = parse_bracket_atom(&mut chars)?;
                let idx = push_atom(atom, current, last_bond.take(), &mut atoms, &mut bonds);
                from_bracket.push(true);
                current = Some(idx);
            }

            _ => {
                let atom = parse_organic_atom(&mut chars)?;
                let idx = push_atom(atom, current, last_bond.take(), &mut atoms, &mut bonds);
                from_bracket.push(false);
                current = Some(idx);
            }
        }
    }

    if !ring_map.is_empty() {
        return Err(CompassError::InvalidSmiles("unclosed ring closure".into()));
    }
    if !branch_stack.is_empty() {
        return Err(CompassError::InvalidSmiles("unclosed branch".into()));
    }
    if atoms.is_empty() {
        return Err(CompassError::InvalidSmiles("no atoms in SMILES string".into()));
    }

    assign_implicit_hydrogens(&mut atoms, &bonds, &from_bracket);

    debug!(
        atoms = atoms.len(),
        bonds = bonds.len(),
        "parsed SMILES {}",
        input
    );
    Ok(Molecule::new(input.to_string(), atoms, bonds))
}

/// Append an atom and, if there is a preceding atom, the connecting bond.
/// An unspecified bond between two aromatic atoms is aromatic, otherwise single.
fn push_atom(
    atom: Atom,
    current: Option<usize>,
    explicit_bond: Option<BondOrder>,
    atoms: &mut Vec<Atom>,
    bonds: &mut Vec<Bond>,
) -> usize {
    let idx = atoms.len();
    if let Some(prev) = current {
        let order = explicit_bond.unwrap_or({
            if atoms[prev].is_aromatic && atom.is_aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            }
        });
        bonds.push(Bond { atom1: prev, atom2: idx, order });
    }
    atoms.push(atom);
    idx
}

/// Ring-closure bookkeeping: first sighting of a number opens it, second
/// sighting bonds back to the opening atom. An explicit bond order given at
/// either end wins; otherwise aromatic endpoints get an aromatic bond.
fn close_or_open_ring(
    number: u32,
    current: Option<usize>,
    explicit_bond: Option<BondOrder>,
    ring_map: &mut HashMap<u32, (usize, Option<BondOrder>)>,
    bonds: &mut Vec<Bond>,
    atoms: &[Atom],
) -> Result<()> {
    let here = current
        .ok_or_else(|| CompassError::InvalidSmiles("ring closure before any atom".into()))?;

    match ring_map.remove(&number) {
        None => {
            ring_map.insert(number, (here, explicit_bond));
            Ok(())
        }
        Some((there, open_bond)) => {
            if there == here {
                return Err(CompassError::InvalidSmiles(format!(
                    "ring closure {} bonds an atom to itself",
                    number
                )));
            }
            let order = explicit_bond.or(open_bond).unwrap_or({
                if atoms[there].is_aromatic && atoms[here].is_aromatic {
                    BondOrder::Aromatic
                } else {
                    BondOrder::Single
                }
            });
            bonds.push(Bond { atom1: there, atom2: here, order });
            Ok(())
        }
    }
}

fn consume_digit(chars: &mut Peekable<Chars>) -> Result<u32> {
    match chars.next() {
        Some(c) if c.is_ascii_digit() => Ok(c as u32 - '0' as u32),
        other => Err(CompassError::InvalidSmiles(format!(
            "expected ring-closure digit, found {:?}",
            other
        ))),
    }
}

/// Parse a bare (organic-subset) atom, including the two-letter halogens.
fn parse_organic_atom(chars: &mut Peekable<Chars>) -> Result<Atom> {
    let first = chars
        .next()
        .ok_or_else(|| CompassError::InvalidSmiles("unexpected end of input".into()))?;

    // Two-letter symbols first: Cl, Br.
    if first == 'C' && chars.peek() == Some(&'l') {
        chars.next();
        return Ok(Atom::new(Element::Cl));
    }
    if first == 'B' && chars.peek() == Some(&'r') {
        chars.next();
        return Ok(Atom::new(Element::Br));
    }

    if first.is_ascii_uppercase() {
        let element = Element::from_symbol(&first.to_string()).ok_or_else(|| {
            CompassError::InvalidSmiles(format!("unknown element symbol '{}'", first))
        })?;
        return Ok(Atom::new(element));
    }

    // Lowercase: aromatic organic-subset atom.
    let element = Element::from_symbol(&first.to_ascii_uppercase().to_string())
        .filter(|el| el.supports_aromatic())
        .ok_or_else(|| {
            CompassError::InvalidSmiles(format!("unrecognized SMILES character '{}'", first))
        })?;
    let mut atom = Atom::new(element);
    atom.is_aromatic = true;
    Ok(atom)
}

/// Parse a bracket atom: `[` isotope? symbol chirality? Hcount? charge? map? `]`.
/// The leading `[` has not yet been consumed.
fn parse_bracket_atom(chars: &mut Peekable<Chars>) -> Result<Atom> {
    chars.next(); // consume '['

    // Isotope
    let mut isotope: Option<u16> = None;
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let digit = c as u16 - '0' as u16;
            isotope = Some(isotope.unwrap_or(0) * 10 + digit);
            chars.next();
        } else {
            break;
        }
    }

    // Element symbol, possibly lowercase aromatic, possibly two letters.
    let first = chars
        .next()
        .ok_or_else(|| CompassError::InvalidSmiles("unterminated bracket atom".into()))?;
    let mut symbol = String::from(first);
    if let Some(&c) = chars.peek() {
        if c.is_ascii_lowercase() && Element::from_symbol(&format!("{}{}", symbol, c)).is_some() {
            symbol.push(c);
            chars.next();
        }
    }

    let (element, aromatic) = if first.is_ascii_lowercase() {
        let el = Element::from_symbol(&symbol.to_ascii_uppercase())
            .filter(|el| el.supports_aromatic())
            .ok_or_else(|| {
                CompassError::InvalidSmiles(format!("unknown aromatic symbol '{}'", symbol))
            })?;
        (el, true)
    } else {
        let el = Element::from_symbol(&symbol).ok_or_else(|| {
            CompassError::InvalidSmiles(format!("unknown element symbol '{}'", symbol))
        })?;
        (el, false)
    };

    let mut atom = Atom::new(element);
    atom.is_aromatic = aromatic;
    atom.isotope = isotope;

    // Chirality markers: accepted, ignored.
    while chars.peek() == Some(&'@') {
        chars.next();
    }

    // Explicit hydrogen count
    if chars.peek() == Some(&'H') {
        chars.next();
        let mut count: u8 = 1;
        if let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                count = c as u8 - b'0';
                chars.next();
            }
        }
        atom.implicit_hydrogens = count;
    }

    // Formal charge: +, -, ++, --, +2, -3
    if let Some(&sign) = chars.peek() {
        if sign == '+' || sign == '-' {
            chars.next();
            let unit: i8 = if sign == '+' { 1 } else { -1 };
            let mut charge = unit;
            if let Some(&c) = chars.peek() {
                if c == sign {
                    chars.next();
                    charge += unit;
                } else if c.is_ascii_digit() {
                    charge = unit * (c as i8 - b'0' as i8);
                    chars.next();
                }
            }
            atom.formal_charge = charge;
        }
    }

    // Atom-map number: accepted, ignored.
    if chars.peek() == Some(&':') {
        chars.next();
        while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            chars.next();
        }
    }

    match chars.next() {
        Some(']') => Ok(atom),
        _ => Err(CompassError::InvalidSmiles("unterminated bracket atom".into())),
    }
}

/// Fill in implicit hydrogens on organic-subset atoms from default valences.
/// Bracket atoms state their hydrogen count explicitly and are left alone
/// (a zero count from the bracket stays zero).
fn assign_implicit_hydrogens(atoms: &mut [Atom], bonds: &[Bond], from_bracket: &[bool]) {
    let mut order_sum = vec![0.0f64; atoms.len()];
    for bond in bonds {
        order_sum[bond.atom1] += bond.order.as_f64();
        order_sum[bond.atom2] += bond.order.as_f64();
    }

    for (i, atom) in atoms.iter_mut().enumerate() {
        if from_bracket[i] {
            continue;
        }
        let valence = atom.element.default_valence() as f64;
        let free = valence - order_sum[i];
        atom.implicit_hydrogens = if free > 0.0 { free.floor() as u8 } else { 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cyclopropane() {
        let mol = parse_smiles("C1CC1").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.rings().len(), 1);
        assert_eq!(mol.molecular_formula(), "C3H6");
    }

    #[test]
    fn parses_phenol_kekule() {
        let mol = parse_smiles("C1=CC=C(C=C1)O").unwrap();
        assert_eq!(mol.atom_count(), 7);
        assert_eq!(mol.bond_count(), 7);
        let doubles = mol
            .bonds
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 3);
        assert_eq!(mol.molecular_formula(), "C6H6O");
    }

    #[test]
    fn parses_aromatic_benzene() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert!(mol.atoms.iter().all(|a| a.is_aromatic));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        // Each aromatic carbon carries one implicit hydrogen.
        assert!(mol.atoms.iter().all(|a| a.implicit_hydrogens == 1));
    }

    #[test]
    fn parses_biphenyl_with_explicit_single_bond() {
        let mol = parse_smiles("c1ccccc1-c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 12);
        assert_eq!(mol.rings().len(), 2);
        let bridge = mol.get_bond(5, 6).expect("bridge bond");
        assert_eq!(bridge.order, BondOrder::Single);
    }

    #[test]
    fn parses_fused_indole_scaffold() {
        // N-methyl indole-3-carboxamide fragment from the candidate list.
        let mol = parse_smiles("CNC(=O)c1cn(C)c2ccccc12").unwrap();
        assert_eq!(mol.rings().len(), 2);
        // The pyrrole nitrogen is substituted, so no H on it.
        let n_aromatic = mol
            .atoms
            .iter()
            .find(|a| a.element == Element::N && a.is_aromatic)
            .unwrap();
        assert_eq!(n_aromatic.implicit_hydrogens, 0);
    }

    #[test]
    fn parses_branched_amine() {
        let mol = parse_smiles("CC(C)CC(C)N").unwrap();
        assert_eq!(mol.molecular_formula(), "C6H15N");
        let n = mol.atoms.iter().find(|a| a.element == Element::N).unwrap();
        assert_eq!(n.implicit_hydrogens, 2);
    }

    #[test]
    fn parses_bracket_atoms() {
        let mol = parse_smiles("[13CH3][NH3+]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(13));
        assert_eq!(mol.atoms[0].implicit_hydrogens, 3);
        assert_eq!(mol.atoms[1].formal_charge, 1);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 3);
    }

    #[test]
    fn parses_nitro_and_carboxyl_modifiers() {
        for smiles in ["C1CC1C(=O)O", "c1ccccc1N(=O)O", "CC(C)CC(C)NF", "C1CC1Cl"] {
            assert!(parse_smiles(smiles).is_ok(), "failed to parse {}", smiles);
        }
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_smiles("").is_err());
        assert!(parse_smiles("   ").is_err());
        assert!(parse_smiles("C1CC").is_err()); // unclosed ring
        assert!(parse_smiles("C(C").is_err()); // unclosed branch
        assert!(parse_smiles("CC)").is_err()); // unmatched close
        assert!(parse_smiles("not_a_smiles!").is_err());
        assert!(parse_smiles("[Xx]").is_err());
        assert!(parse_smiles("[CH3").is_err());
        assert!(parse_smiles("C.C").is_err()); // disconnected components
    }

    #[test]
    fn triple_bond_valence() {
        let mol = parse_smiles("C#N").unwrap();
        assert_eq!(mol.atoms[0].implicit_hydrogens, 1);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 0);
    }
}
