//! The slice of the periodic table that SMILES organic chemistry needs.

use serde::{Deserialize, Serialize};

/// Elements accepted by the parser. Covers the SMILES organic subset plus
/// hydrogen for explicit bracket atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    P,
    S,
    Cl,
    Br,
    I,
}

impl Element {
    /// Look up an element by its (case-sensitive) symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "H" => Some(Element::H),
            "B" => Some(Element::B),
            "C" => Some(Element::C),
            "N" => Some(Element::N),
            "O" => Some(Element::O),
            "F" => Some(Element::F),
            "P" => Some(Element::P),
            "S" => Some(Element::S),
            "Cl" => Some(Element::Cl),
            "Br" => Some(Element::Br),
            "I" => Some(Element::I),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    pub fn atomic_number(&self) -> u8 {
        match self {
            Element::H => 1,
            Element::B => 5,
            Element::C => 6,
            Element::N => 7,
            Element::O => 8,
            Element::F => 9,
            Element::P => 15,
            Element::S => 16,
            Element::Cl => 17,
            Element::Br => 35,
            Element::I => 53,
        }
    }

    /// Standard atomic weight (g/mol), enough precision for a demo descriptor.
    pub fn atomic_mass(&self) -> f64 {
        match self {
            Element::H => 1.008,
            Element::B => 10.811,
            Element::C => 12.011,
            Element::N => 14.007,
            Element::O => 15.999,
            Element::F => 18.998,
            Element::P => 30.974,
            Element::S => 32.06,
            Element::Cl => 35.45,
            Element::Br => 79.904,
            Element::I => 126.904,
        }
    }

    /// Default valence used for implicit hydrogen assignment on
    /// organic-subset atoms. Lowest standard valence per the SMILES rules.
    pub fn default_valence(&self) -> u8 {
        match self {
            Element::H => 1,
            Element::B => 3,
            Element::C => 4,
            Element::N => 3,
            Element::O => 2,
            Element::F => 1,
            Element::P => 3,
            Element::S => 2,
            Element::Cl => 1,
            Element::Br => 1,
            Element::I => 1,
        }
    }

    /// Whether the element may be written lowercase (aromatic) in SMILES.
    pub fn supports_aromatic(&self) -> bool {
        matches!(
            self,
            Element::B | Element::C | Element::N | Element::O | Element::P | Element::S
        )
    }

    /// CPK-style colour for depiction labels.
    pub fn cpk_color(&self) -> &'static str {
        match self {
            Element::H => "#707070",
            Element::B => "#ffb5b5",
            Element::C => "#202020",
            Element::N => "#3050f8",
            Element::O => "#ff0d0d",
            Element::F => "#90e050",
            Element::P => "#ff8000",
            Element::S => "#c8a000",
            Element::Cl => "#1fa01f",
            Element::Br => "#a62929",
            Element::I => "#940094",
        }
    }
}
