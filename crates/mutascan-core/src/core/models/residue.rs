use super::ids::ChainId;
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The 20 canonical amino acids.
///
/// This is the legal alphabet for manual substitution lists and activation
/// sets; anything outside it is rejected before any variant work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // ALA / A
    Glycine,    // GLY / G
    Isoleucine, // ILE / I
    Leucine,    // LEU / L
    Proline,    // PRO / P
    Valine,     // VAL / V

    // --- Aromatic ---
    Phenylalanine, // PHE / F
    Tryptophan,    // TRP / W
    Tyrosine,      // TYR / Y

    // --- Polar, Uncharged ---
    Asparagine, // ASN / N
    Cysteine,   // CYS / C
    Glutamine,  // GLN / Q
    Serine,     // SER / S
    Threonine,  // THR / T
    Methionine, // MET / M

    // --- Positively Charged (Basic) ---
    Arginine,  // ARG / R
    Lysine,    // LYS / K
    Histidine, // HIS / H

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // ASP / D
    GlutamicAcid, // GLU / E
}

static THREE_LETTER_CODES: Map<&'static str, AminoAcid> = phf_map! {
    "ALA" => AminoAcid::Alanine,
    "GLY" => AminoAcid::Glycine,
    "ILE" => AminoAcid::Isoleucine,
    "LEU" => AminoAcid::Leucine,
    "PRO" => AminoAcid::Proline,
    "VAL" => AminoAcid::Valine,
    "PHE" => AminoAcid::Phenylalanine,
    "TRP" => AminoAcid::Tryptophan,
    "TYR" => AminoAcid::Tyrosine,
    "ASN" => AminoAcid::Asparagine,
    "CYS" => AminoAcid::Cysteine,
    "GLN" => AminoAcid::Glutamine,
    "SER" => AminoAcid::Serine,
    "THR" => AminoAcid::Threonine,
    "MET" => AminoAcid::Methionine,
    "ARG" => AminoAcid::Arginine,
    "LYS" => AminoAcid::Lysine,
    "HIS" => AminoAcid::Histidine,
    "ASP" => AminoAcid::AsparticAcid,
    "GLU" => AminoAcid::GlutamicAcid,
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("'{0}' is not a recognized amino acid code")]
pub struct ParseAminoAcidError(pub String);

impl AminoAcid {
    /// Looks up an amino acid by its one-letter code (case-insensitive).
    pub fn from_one_letter(code: char) -> Result<Self, ParseAminoAcidError> {
        match code.to_ascii_uppercase() {
            'A' => Ok(AminoAcid::Alanine),
            'G' => Ok(AminoAcid::Glycine),
            'I' => Ok(AminoAcid::Isoleucine),
            'L' => Ok(AminoAcid::Leucine),
            'P' => Ok(AminoAcid::Proline),
            'V' => Ok(AminoAcid::Valine),
            'F' => Ok(AminoAcid::Phenylalanine),
            'W' => Ok(AminoAcid::Tryptophan),
            'Y' => Ok(AminoAcid::Tyrosine),
            'N' => Ok(AminoAcid::Asparagine),
            'C' => Ok(AminoAcid::Cysteine),
            'Q' => Ok(AminoAcid::Glutamine),
            'S' => Ok(AminoAcid::Serine),
            'T' => Ok(AminoAcid::Threonine),
            'M' => Ok(AminoAcid::Methionine),
            'R' => Ok(AminoAcid::Arginine),
            'K' => Ok(AminoAcid::Lysine),
            'H' => Ok(AminoAcid::Histidine),
            'D' => Ok(AminoAcid::AsparticAcid),
            'E' => Ok(AminoAcid::GlutamicAcid),
            other => Err(ParseAminoAcidError(other.to_string())),
        }
    }

    /// Looks up an amino acid by its three-letter PDB residue name.
    pub fn from_three_letter(name: &str) -> Option<Self> {
        THREE_LETTER_CODES
            .get(name.trim().to_ascii_uppercase().as_str())
            .copied()
    }

    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::Alanine => 'A',
            AminoAcid::Glycine => 'G',
            AminoAcid::Isoleucine => 'I',
            AminoAcid::Leucine => 'L',
            AminoAcid::Proline => 'P',
            AminoAcid::Valine => 'V',
            AminoAcid::Phenylalanine => 'F',
            AminoAcid::Tryptophan => 'W',
            AminoAcid::Tyrosine => 'Y',
            AminoAcid::Asparagine => 'N',
            AminoAcid::Cysteine => 'C',
            AminoAcid::Glutamine => 'Q',
            AminoAcid::Serine => 'S',
            AminoAcid::Threonine => 'T',
            AminoAcid::Methionine => 'M',
            AminoAcid::Arginine => 'R',
            AminoAcid::Lysine => 'K',
            AminoAcid::Histidine => 'H',
            AminoAcid::AsparticAcid => 'D',
            AminoAcid::GlutamicAcid => 'E',
        }
    }

    pub fn three_letter(&self) -> &'static str {
        match self {
            AminoAcid::Alanine => "ALA",
            AminoAcid::Glycine => "GLY",
            AminoAcid::Isoleucine => "ILE",
            AminoAcid::Leucine => "LEU",
            AminoAcid::Proline => "PRO",
            AminoAcid::Valine => "VAL",
            AminoAcid::Phenylalanine => "PHE",
            AminoAcid::Tryptophan => "TRP",
            AminoAcid::Tyrosine => "TYR",
            AminoAcid::Asparagine => "ASN",
            AminoAcid::Cysteine => "CYS",
            AminoAcid::Glutamine => "GLN",
            AminoAcid::Serine => "SER",
            AminoAcid::Threonine => "THR",
            AminoAcid::Methionine => "MET",
            AminoAcid::Arginine => "ARG",
            AminoAcid::Lysine => "LYS",
            AminoAcid::Histidine => "HIS",
            AminoAcid::AsparticAcid => "ASP",
            AminoAcid::GlutamicAcid => "GLU",
        }
    }
}

impl FromStr for AminoAcid {
    type Err = ParseAminoAcidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => AminoAcid::from_one_letter(c),
            _ => AminoAcid::from_three_letter(trimmed)
                .ok_or_else(|| ParseAminoAcidError(trimmed.to_string())),
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.one_letter())
    }
}

/// One atom of a residue, as read from the input structure.
///
/// Coordinates and formatting fields are carried through verbatim so a mutant
/// stub can be written back in the same register the file arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub serial: i32,
    pub name: String,
    pub alt_loc: char,
    pub position: [f64; 3],
    pub occupancy: f64,
    pub b_factor: f64,
    pub element: String,
}

/// A single residue with its ordered atom records.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub number: isize,        // Residue sequence number from the source file
    pub insertion_code: char, // PDB insertion code, ' ' when absent
    pub name: String,         // Residue name as read (e.g., "ALA", "HOH")
    pub chain_id: ChainId,    // ID of the parent chain
    pub(crate) atoms: Vec<AtomRecord>,
}

impl Residue {
    pub(crate) fn new(number: isize, insertion_code: char, name: &str, chain_id: ChainId) -> Self {
        Self {
            number,
            insertion_code,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom: AtomRecord) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    /// The canonical amino acid identity, if this residue is one of the 20.
    pub fn amino_acid(&self) -> Option<AminoAcid> {
        AminoAcid::from_three_letter(&self.name)
    }
}
