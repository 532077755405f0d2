//! molcompass-chem — The cheminformatics layer of Molecular Compass:
//! 1. Parsing SMILES line notation into a molecular graph
//! 2. Ring perception and basic descriptors (formula, molecular weight)
//! 3. 2D coordinate generation and SVG depiction

pub mod depict;
pub mod element;
pub mod molecule;
pub mod smiles;

pub use depict::{DepictionConfig, Depictor};
pub use element::Element;
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use smiles::parse_smiles;
