use crate::core::models::residue::{AminoAcid, AtomRecord};
use crate::core::models::system::StructuralModel;
use phf::{Set, phf_set};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Backbone atom names retained when a residue is reduced to a mutant stub.
///
/// CB is deliberately excluded: the placement tool rebuilds the side chain
/// from the backbone frame, and a stale CB from the original identity would
/// be carried into the mutant.
static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "CA", "C", "O", "OXT",
};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Requested model {requested} but the file contains {available} model(s)")]
    ModelOutOfRange { requested: usize, available: usize },
    #[error("No ATOM records found in input")]
    Empty,
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("ATOM/HETATM record is too short")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_int(line: &str, line_no: usize, start: usize, end: usize) -> Result<i64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_no,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

fn parse_float(line: &str, line_no: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_no,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

/// Reader/writer for the PDB topology subset used by the scan pipeline.
pub struct PdbFile;

impl PdbFile {
    /// Reads one model of a PDB file into a [`StructuralModel`].
    ///
    /// Multi-model files are handled by selecting a single model up front
    /// (`model_index`, zero-based); coordinates from other models are
    /// skipped. Single-model files must be read with `model_index == 0`.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed ATOM/HETATM records, when the requested
    /// model does not exist, or when the file contains no atoms at all.
    pub fn read_model_from(
        reader: &mut impl BufRead,
        model_index: usize,
    ) -> Result<StructuralModel, PdbError> {
        let mut model = StructuralModel::new();
        let mut models_seen = 0usize;
        let mut in_selected_model = model_index == 0;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let record = slice_and_trim(&line, 0, 6);

            match record {
                "MODEL" => {
                    in_selected_model = models_seen == model_index;
                    models_seen += 1;
                }
                "ENDMDL" => {
                    in_selected_model = false;
                }
                "ATOM" | "HETATM" if in_selected_model => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_no,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }
                    Self::parse_atom_line(&line, line_no, &mut model)?;
                }
                _ => {}
            }
        }

        let available = models_seen.max(1);
        if model_index >= available {
            return Err(PdbError::ModelOutOfRange {
                requested: model_index,
                available,
            });
        }
        if model.residue_count() == 0 {
            return Err(PdbError::Empty);
        }
        model.set_model_count(available);
        Ok(model)
    }

    pub fn read_model_from_path<P: AsRef<Path>>(
        path: P,
        model_index: usize,
    ) -> Result<StructuralModel, PdbError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_model_from(&mut reader, model_index)
    }

    fn parse_atom_line(
        line: &str,
        line_no: usize,
        model: &mut StructuralModel,
    ) -> Result<(), PdbError> {
        let serial = parse_int(line, line_no, 6, 11)? as i32;
        let name = slice_and_trim(line, 12, 16).to_string();
        let alt_loc = line.chars().nth(16).unwrap_or(' ');
        let res_name = slice_and_trim(line, 17, 20);
        let chain_char = line.chars().nth(21).unwrap_or(' ');
        let res_number = parse_int(line, line_no, 22, 26)? as isize;
        let insertion_code = line.chars().nth(26).unwrap_or(' ');
        let x = parse_float(line, line_no, 30, 38)?;
        let y = parse_float(line, line_no, 38, 46)?;
        let z = parse_float(line, line_no, 46, 54)?;
        let occupancy = parse_float(line, line_no, 54, 60).unwrap_or(1.0);
        let b_factor = parse_float(line, line_no, 60, 66).unwrap_or(0.0);
        let element = slice_and_trim(line, 76, 78).to_string();

        let chain = model.ensure_chain(chain_char);
        let needs_new_residue = match model
            .chain(chain)
            .and_then(|c| c.residues().last().copied())
            .and_then(|rid| model.residue(rid))
        {
            Some(last) => last.number != res_number || last.insertion_code != insertion_code,
            None => true,
        };
        let residue_id = if needs_new_residue {
            model.add_residue(chain, res_number, insertion_code, res_name)
        } else {
            model
                .chain(chain)
                .and_then(|c| c.residues().last().copied())
                .ok_or_else(|| PdbError::Parse {
                    line: line_no,
                    kind: PdbParseErrorKind::LineTooShort,
                })?
        };

        model.add_atom(
            residue_id,
            AtomRecord {
                serial,
                name,
                alt_loc,
                position: [x, y, z],
                occupancy,
                b_factor,
                element,
            },
        );
        Ok(())
    }

    /// Writes the full model as ATOM records with TER separators.
    pub fn write_model_to(
        model: &StructuralModel,
        writer: &mut impl Write,
    ) -> Result<(), PdbError> {
        Self::write_internal(model, writer, None)
    }

    pub fn write_model_to_path<P: AsRef<Path>>(
        model: &StructuralModel,
        path: P,
    ) -> Result<(), PdbError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_model_to(model, &mut writer)
    }

    /// Writes a mutant stub: the model with one residue renamed to the target
    /// identity and stripped of its side-chain atoms.
    ///
    /// The external placement tool rebuilds the new side chain from the
    /// backbone frame, so the stub carries only N/CA/C/O (and OXT) for the
    /// mutated residue.
    pub fn write_mutant_to(
        model: &StructuralModel,
        chain_id: char,
        residue_number: isize,
        insertion_code: char,
        target: AminoAcid,
        writer: &mut impl Write,
    ) -> Result<(), PdbError> {
        Self::write_internal(
            model,
            writer,
            Some((chain_id, residue_number, insertion_code, target)),
        )
    }

    pub fn write_mutant_to_path<P: AsRef<Path>>(
        model: &StructuralModel,
        chain_id: char,
        residue_number: isize,
        insertion_code: char,
        target: AminoAcid,
        path: P,
    ) -> Result<(), PdbError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_mutant_to(model, chain_id, residue_number, insertion_code, target, &mut writer)
    }

    fn write_internal(
        model: &StructuralModel,
        writer: &mut impl Write,
        mutation: Option<(char, isize, char, AminoAcid)>,
    ) -> Result<(), PdbError> {
        let mut serial = 0i32;
        for (chain_slot, chain) in model.chains_iter() {
            for residue in model.chain_residues(chain_slot) {
                let mutated = matches!(
                    mutation,
                    Some((c, n, i, _))
                        if c == chain.id && n == residue.number && i == residue.insertion_code
                );
                let res_name = match (mutated, mutation) {
                    (true, Some((_, _, _, target))) => target.three_letter(),
                    _ => residue.name.as_str(),
                };
                for atom in residue.atoms() {
                    if mutated && !BACKBONE_ATOM_NAMES.contains(atom.name.as_str()) {
                        continue;
                    }
                    serial += 1;
                    writeln!(
                        writer,
                        "ATOM  {:>5} {:<4}{}{:<3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                        serial,
                        format_atom_name(&atom.name),
                        atom.alt_loc,
                        res_name,
                        chain.id,
                        residue.number,
                        residue.insertion_code,
                        atom.position[0],
                        atom.position[1],
                        atom.position[2],
                        atom.occupancy,
                        atom.b_factor,
                        atom.element,
                    )?;
                }
            }
            serial += 1;
            writeln!(writer, "TER   {:>5}", serial)?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

/// Pads an atom name into PDB columns 13-16: names with a one-character
/// element symbol start at column 14.
fn format_atom_name(name: &str) -> String {
    if name.len() >= 4 {
        name.to_string()
    } else {
        format!(" {:<3}", name)
    }
}
