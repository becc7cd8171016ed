use super::error::{FileError, Format};
use super::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::bond::{Bond, BondType};
use crate::core::models::element::Element;
use crate::core::models::fragment::Species;
use crate::core::models::ids::AtomId;
use crate::core::models::supermolecule::Supermolecule;
use nalgebra::Point3;
use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const DEFAULT_RESIDUE: &str = "UNK";
const DEFAULT_CHAIN: char = 'A';
const PARTNERS_PER_CONECT: usize = 4;
/// Largest serial that fits the five serial columns of `ATOM` and `CONECT`.
const MAX_SERIAL: usize = 99_999;
/// Largest residue number that fits columns 23-26.
const MAX_RESIDUE_NUMBER: usize = 9_999;
const CHARGE_TOLERANCE: f64 = 1e-6;

/// Per-atom fields of an `ATOM`/`HETATM` record that the species model does not
/// carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbAtomRecord {
    pub serial: usize,
    pub name: String,
    pub residue_name: String,
    pub chain_id: char,
    pub residue_number: i32,
    pub hetero: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Records other than coordinates and connectivity, in file order.
    pub header_lines: Vec<String>,
    pub atom_records: HashMap<AtomId, PdbAtomRecord>,
}

/// Protein Data Bank reader and writer.
///
/// Only the first model is read. Elements come from columns 77-78, falling back
/// to the atom name; formal charges (columns 79-80) become atom charges and a
/// blank charge field leaves the charge unknown. Bond order is encoded by
/// repetition in `CONECT` records, capped at a triple bond.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = FileError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Supermolecule, Self::Metadata), Self::Error> {
        let mut metadata = PdbMetadata::default();
        let mut atoms = Vec::new();
        let mut by_serial: HashMap<usize, Atom> = HashMap::new();
        let mut conect = ConectTally::default();

        for (idx, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = idx + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" => {
                    let (atom, record) = parse_atom_record(&line, line_num)?;
                    if by_serial.insert(record.serial, atom.clone()).is_some() {
                        return Err(FileError::parse(
                            Format::Pdb,
                            line_num,
                            format!("duplicate atom serial {}", record.serial),
                        ));
                    }
                    metadata.atom_records.insert(atom.id(), record);
                    atoms.push(atom);
                }
                "CONECT" => conect.record(&line, line_num)?,
                "ENDMDL" | "END" => break,
                "TER" | "MODEL" | "MASTER" | "" => {}
                _ => metadata.header_lines.push(line),
            }
        }

        if atoms.is_empty() {
            return Err(FileError::missing(Format::Pdb, "ATOM/HETATM"));
        }

        let bonds = conect.into_bonds(&by_serial)?;
        debug!(atoms = atoms.len(), bonds = bonds.len(), "Read PDB records");
        let system = Supermolecule::from_parts(atoms, bonds)?;
        Ok((system, metadata))
    }

    fn write_to(
        system: &Supermolecule,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        if system.atom_count() > MAX_SERIAL {
            return Err(FileError::Unrepresentable {
                format: Format::Pdb,
                details: format!(
                    "{} atoms exceed the {} serials of the five-column serial field",
                    system.atom_count(),
                    MAX_SERIAL
                ),
            });
        }
        let fractional = system
            .atoms()
            .iter()
            .filter(|atom| atom.charge().is_some_and(|c| integral_charge(c).is_none()))
            .count();
        if fractional > 0 {
            warn!(
                atoms = fractional,
                "Partial charges do not fit the PDB formal charge field; leaving it blank"
            );
        }

        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }

        let mut serials: HashMap<AtomId, usize> = HashMap::with_capacity(system.atom_count());
        let mut next_serial = 1;

        for (n, island) in system.subspecies().iter().enumerate() {
            for atom in island.atoms() {
                let serial = next_serial;
                next_serial += 1;
                serials.insert(atom.id(), serial);

                let record = metadata.atom_records.get(&atom.id());
                let line = format_atom_record(atom, serial, n, record);
                writeln!(writer, "{}", line)?;
            }
            if island.is_molecule() {
                writeln!(writer, "TER")?;
            }
        }

        write_conect(system, &serials, writer)?;
        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_system_to(system: &Supermolecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        let default_metadata = PdbMetadata {
            header_lines: vec!["REMARK   1 GENERATED BY CHEMSPECIES".to_string()],
            ..Default::default()
        };
        Self::write_to(system, &default_metadata, writer)
    }
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_atom_record(line: &str, line_num: usize) -> Result<(Atom, PdbAtomRecord), FileError> {
    if line.len() < 54 {
        return Err(FileError::parse(
            Format::Pdb,
            line_num,
            "ATOM/HETATM record is too short to hold coordinates",
        ));
    }

    let serial_str = slice_and_trim(line, 6, 11);
    let serial: usize = serial_str.parse().map_err(|_| {
        FileError::parse(Format::Pdb, line_num, format!("invalid serial '{}' in columns 7-11", serial_str))
    })?;
    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(FileError::parse(Format::Pdb, line_num, "atom name in columns 13-16 is empty"));
    }
    let residue_name = slice_and_trim(line, 17, 20);
    let chain_id = slice_and_trim(line, 21, 22).chars().next().unwrap_or(DEFAULT_CHAIN);
    let residue_str = slice_and_trim(line, 22, 26);
    let residue_number: i32 = if residue_str.is_empty() {
        0
    } else {
        residue_str.parse().map_err(|_| {
            FileError::parse(
                Format::Pdb,
                line_num,
                format!("invalid residue number '{}' in columns 23-26", residue_str),
            )
        })?
    };

    let coordinate = |start: usize, end: usize, axis: &str| -> Result<f64, FileError> {
        let value = slice_and_trim(line, start, end);
        value.parse().map_err(|_| {
            FileError::parse(
                Format::Pdb,
                line_num,
                format!("invalid {} coordinate '{}' in columns {}-{}", axis, value, start + 1, end),
            )
        })
    };
    let position = Point3::new(
        coordinate(30, 38, "x")?,
        coordinate(38, 46, "y")?,
        coordinate(46, 54, "z")?,
    );

    let element_str = slice_and_trim(line, 76, 78);
    let element = if element_str.is_empty() {
        element_from_name_field(line, name)
    } else {
        element_str.parse().ok()
    }
    .ok_or_else(|| {
        FileError::parse(
            Format::Pdb,
            line_num,
            format!("unable to infer element from '{}' or atom name '{}'", element_str, name),
        )
    })?;

    let mut builder = Atom::builder(element, position);
    if let Some(charge) = parse_formal_charge(slice_and_trim(line, 78, 80), line_num)? {
        builder = builder.charge(charge as f64);
    }

    let record = PdbAtomRecord {
        serial,
        name: name.to_string(),
        residue_name: if residue_name.is_empty() {
            DEFAULT_RESIDUE.to_string()
        } else {
            residue_name.to_string()
        },
        chain_id,
        residue_number,
        hetero: line.starts_with("HETATM"),
    };
    Ok((builder.build(), record))
}

/// Infers the element from the atom name when columns 77-78 are blank.
///
/// Two-letter symbols are left-justified in column 13 while one-letter symbols
/// start in column 14, so a short name occupying column 13 is tried as a
/// two-letter symbol first (`NA  ` is sodium, ` NA ` would be nitrogen).
fn element_from_name_field(line: &str, name: &str) -> Option<Element> {
    let starts_in_column_13 = line.get(12..13).is_some_and(|c| c != " ");
    if starts_in_column_13 && name.len() < 4 {
        if let Some(element) = name.get(0..2).and_then(|symbol| symbol.parse::<Element>().ok()) {
            return Some(element);
        }
    }
    Element::from_label(name)
}

/// Parses a formal charge such as `2-`, `1+` or `-1`. Blank means unknown.
fn parse_formal_charge(field: &str, line_num: usize) -> Result<Option<i32>, FileError> {
    if field.is_empty() {
        return Ok(None);
    }
    let invalid = || FileError::parse(Format::Pdb, line_num, format!("invalid formal charge '{}'", field));

    let (digits, sign) = match (field.strip_suffix('+'), field.strip_suffix('-')) {
        (Some(digits), _) => (digits, 1),
        (_, Some(digits)) => (digits, -1),
        _ => match (field.strip_prefix('+'), field.strip_prefix('-')) {
            (Some(digits), _) => (digits, 1),
            (_, Some(digits)) => (digits, -1),
            _ => (field, 1),
        },
    };
    let magnitude: i32 = if digits.is_empty() {
        1
    } else {
        digits.parse().map_err(|_| invalid())?
    };
    Ok(Some(sign * magnitude))
}

/// The charge as a formal charge, if it is integral and fits one digit.
fn integral_charge(charge: f64) -> Option<i32> {
    let rounded = charge.round();
    ((charge - rounded).abs() < CHARGE_TOLERANCE && rounded.abs() < 10.0).then_some(rounded as i32)
}

/// Zero is written explicitly so that it reads back as a known charge.
fn format_formal_charge(charge: Option<f64>) -> String {
    match charge.and_then(integral_charge) {
        Some(0) => "0".to_string(),
        Some(c) if c > 0 => format!("{}+", c),
        Some(c) => format!("{}-", -c),
        None => String::new(),
    }
}

/// A name for atoms without a record: the symbol followed by as many trailing
/// serial digits as fit the four name columns.
fn generated_name(symbol: &str, serial: usize) -> String {
    let modulus = 10usize.pow(4u32.saturating_sub(symbol.len() as u32));
    format!("{}{}", symbol.to_uppercase(), serial % modulus)
}

fn format_atom_record(atom: &Atom, serial: usize, island_index: usize, record: Option<&PdbAtomRecord>) -> String {
    let symbol = atom.element().symbol();
    let (record_type, name, residue_name, chain_id, residue_number) = match record {
        Some(r) => (
            if r.hetero { "HETATM" } else { "ATOM" },
            r.name.chars().take(4).collect::<String>(),
            r.residue_name.get(..3).unwrap_or(r.residue_name.as_str()),
            r.chain_id,
            r.residue_number,
        ),
        None => (
            "HETATM",
            generated_name(symbol, serial),
            DEFAULT_RESIDUE,
            DEFAULT_CHAIN,
            (island_index % MAX_RESIDUE_NUMBER) as i32 + 1,
        ),
    };
    // Names of one-letter elements start in column 14.
    let padded_name = if name.len() < 4 && symbol.len() == 1 {
        format!(" {:<3}", name)
    } else {
        format!("{:<4}", name)
    };
    let position = atom.position();

    format!(
        "{:<6}{:>5} {:4} {:>3} {:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}{:>2}",
        record_type,
        serial,
        padded_name,
        residue_name,
        chain_id,
        residue_number,
        position.x,
        position.y,
        position.z,
        1.0,
        0.0,
        symbol.to_uppercase(),
        format_formal_charge(atom.charge())
    )
}

fn write_conect(
    system: &Supermolecule,
    serials: &HashMap<AtomId, usize>,
    writer: &mut impl Write,
) -> Result<(), FileError> {
    let mut partners: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for bond in system.bonds() {
        let (Some(&first), Some(&second)) = (serials.get(&bond.atom1().id()), serials.get(&bond.atom2().id()))
        else {
            continue;
        };
        for _ in 0..bond.bond_type().multiplicity() {
            partners.entry(first).or_default().push(second);
            partners.entry(second).or_default().push(first);
        }
    }

    for (serial, bonded) in &partners {
        for chunk in bonded.chunks(PARTNERS_PER_CONECT) {
            write!(writer, "CONECT{:>5}", serial)?;
            for partner in chunk {
                write!(writer, "{:>5}", partner)?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Counts how often each atom lists each partner across `CONECT` records.
#[derive(Debug, Default)]
struct ConectTally {
    /// Unordered serial pairs with the line of their first mention.
    order: Vec<((usize, usize), usize)>,
    /// Listings from the lower and from the higher serial of each pair.
    counts: HashMap<(usize, usize), [usize; 2]>,
}

impl ConectTally {
    fn record(&mut self, line: &str, line_num: usize) -> Result<(), FileError> {
        let parse = |start: usize| -> Result<Option<usize>, FileError> {
            let field = slice_and_trim(line, start, start + 5);
            if field.is_empty() {
                return Ok(None);
            }
            field.parse().map(Some).map_err(|_| {
                FileError::parse(Format::Pdb, line_num, format!("invalid CONECT serial '{}'", field))
            })
        };

        let Some(origin) = parse(6)? else {
            return Err(FileError::parse(Format::Pdb, line_num, "CONECT record without an atom serial"));
        };
        for start in [11, 16, 21, 26] {
            if let Some(partner) = parse(start)? {
                let key = (origin.min(partner), origin.max(partner));
                let direction = usize::from(origin > partner);
                if !self.counts.contains_key(&key) {
                    self.order.push((key, line_num));
                }
                self.counts.entry(key).or_insert([0, 0])[direction] += 1;
            }
        }
        Ok(())
    }

    fn into_bonds(self, by_serial: &HashMap<usize, Atom>) -> Result<Vec<Bond>, FileError> {
        let mut bonds = Vec::with_capacity(self.order.len());
        for (key, line_num) in self.order {
            let lookup = |serial: usize| {
                by_serial.get(&serial).cloned().ok_or_else(|| {
                    FileError::parse(
                        Format::Pdb,
                        line_num,
                        format!("CONECT references unknown atom serial {}", serial),
                    )
                })
            };
            let (first, second) = (lookup(key.0)?, lookup(key.1)?);
            let listings = self.counts.get(&key).map_or(1, |c| c[0].max(c[1]));
            if listings > 3 {
                warn!(
                    first = key.0,
                    second = key.1,
                    listings,
                    "CONECT pair listed more than three times; treating as triple bond"
                );
            }
            bonds.push(Bond::new(first, second, BondType::from_multiplicity(listings))?);
        }
        Ok(bonds)
    }
}
