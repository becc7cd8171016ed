use super::error::{FileError, Format};
use super::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::bond::{Bond, BondType, ParseBondTypeError};
use crate::core::models::element::Element;
use crate::core::models::fragment::Species;
use crate::core::models::ids::AtomId;
use crate::core::models::island::Island;
use crate::core::models::supermolecule::Supermolecule;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tracing::debug;

const MOLECULE_SECTION: &str = "@<TRIPOS>MOLECULE";
const ATOM_SECTION: &str = "@<TRIPOS>ATOM";
const BOND_SECTION: &str = "@<TRIPOS>BOND";
const NO_CHARGES: &str = "NO_CHARGES";
const DEFAULT_SUBSTRUCTURE: &str = "UNK";

/// Per-atom fields of a Tripos `ATOM` record that the species model does not
/// carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mol2AtomRecord {
    pub name: String,
    pub substructure_id: usize,
    pub substructure_name: String,
    /// Name of the `MOLECULE` block the atom was read from.
    pub molecule_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mol2Metadata {
    /// Block names in file order.
    pub molecule_names: Vec<String>,
    pub atom_records: HashMap<AtomId, Mol2AtomRecord>,
}

/// Tripos Mol2 reader and writer.
///
/// Every `@<TRIPOS>MOLECULE` block of the input is read; atom serials are
/// local to their block. The Tripos atom type is kept as the atom tag and the
/// element is inferred from it, falling back to the atom name. Partial charges
/// are left unknown when a block declares `NO_CHARGES`.
///
/// The writer emits one `MOLECULE` block per island.
pub struct Mol2File;

impl MolecularFile for Mol2File {
    type Metadata = Mol2Metadata;
    type Error = FileError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Supermolecule, Self::Metadata), Self::Error> {
        let lines = collect_lines(reader)?;
        let block_starts: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, (_, line))| is_section(line, MOLECULE_SECTION))
            .map(|(idx, _)| idx)
            .collect();
        if block_starts.is_empty() {
            return Err(FileError::missing(Format::Mol2, MOLECULE_SECTION));
        }

        let mut metadata = Mol2Metadata::default();
        let mut atoms = Vec::new();
        let mut bonds = Vec::new();

        for (n, &start) in block_starts.iter().enumerate() {
            let end = block_starts.get(n + 1).copied().unwrap_or(lines.len());
            let block = &lines[start..end];
            let header = parse_header(block)?;
            debug!(
                molecule = %header.name,
                atoms = header.atom_count,
                bonds = header.bond_count,
                "Reading MOL2 block"
            );

            let atom_section = find_section(block, ATOM_SECTION)
                .ok_or_else(|| FileError::missing(Format::Mol2, ATOM_SECTION))?;
            let serials = parse_atoms(block, atom_section + 1, &header, &mut atoms, &mut metadata)?;

            if header.bond_count > 0 {
                let bond_section = find_section(block, BOND_SECTION)
                    .ok_or_else(|| FileError::missing(Format::Mol2, BOND_SECTION))?;
                parse_bonds(block, bond_section + 1, header.bond_count, &serials, &mut bonds)?;
            }

            metadata.molecule_names.push(header.name);
        }

        let system = Supermolecule::from_parts(atoms, bonds)?;
        Ok((system, metadata))
    }

    fn write_to(
        system: &Supermolecule,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for (n, island) in system.subspecies().iter().enumerate() {
            write_island(island, n, metadata, writer)?;
        }
        Ok(())
    }

    fn write_system_to(system: &Supermolecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_to(system, &Mol2Metadata::default(), writer)
    }
}

struct BlockHeader {
    name: String,
    atom_count: usize,
    bond_count: usize,
    has_charges: bool,
}

type Line = (usize, String);

fn collect_lines(reader: &mut impl BufRead) -> Result<Vec<Line>, FileError> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        lines.push((idx + 1, line?));
    }
    Ok(lines)
}

fn is_section(line: &str, name: &str) -> bool {
    line.trim().eq_ignore_ascii_case(name)
}

fn find_section(lines: &[Line], name: &str) -> Option<usize> {
    lines.iter().position(|(_, line)| is_section(line, name))
}

/// Returns the next line that is neither blank nor a comment.
fn next_data_line<'a>(lines: &'a [Line], cursor: &mut usize) -> Option<&'a Line> {
    while let Some(entry) = lines.get(*cursor) {
        *cursor += 1;
        let trimmed = entry.1.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Some(entry);
    }
    None
}

fn parse_header(block: &[Line]) -> Result<BlockHeader, FileError> {
    let block_line = block.first().map_or(0, |(ln, _)| *ln);
    // Name, counts, molecule type and charge type are positional; the name
    // line may be blank.
    let name = block
        .get(1)
        .map(|(_, line)| line.trim().to_string())
        .unwrap_or_default();
    let mut cursor = 2;

    let (counts_ln, counts) = next_data_line(block, &mut cursor)
        .ok_or_else(|| FileError::parse(Format::Mol2, block_line, "missing counts line"))?;
    let parts: Vec<&str> = counts.split_whitespace().collect();
    let atom_count = parts
        .first()
        .and_then(|v| v.parse::<usize>().ok())
        .ok_or_else(|| FileError::parse(Format::Mol2, *counts_ln, "invalid atom count"))?;
    let bond_count = match parts.get(1) {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| FileError::parse(Format::Mol2, *counts_ln, "invalid bond count"))?,
        None => 0,
    };

    let _molecule_type = next_data_line(block, &mut cursor);
    let has_charges = next_data_line(block, &mut cursor)
        .map(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.starts_with("@<") && !trimmed.eq_ignore_ascii_case(NO_CHARGES)
        })
        .unwrap_or(false);

    Ok(BlockHeader {
        name,
        atom_count,
        bond_count,
        has_charges,
    })
}

/// Parses `header.atom_count` atom records, returning the block-local serial
/// to atom map.
fn parse_atoms(
    block: &[Line],
    start: usize,
    header: &BlockHeader,
    atoms: &mut Vec<Atom>,
    metadata: &mut Mol2Metadata,
) -> Result<HashMap<usize, Atom>, FileError> {
    let mut serials = HashMap::with_capacity(header.atom_count);
    let mut cursor = start;

    for _ in 0..header.atom_count {
        let (ln, raw) = next_data_line(block, &mut cursor)
            .filter(|(_, line)| !line.trim_start().starts_with('@'))
            .ok_or_else(|| {
                FileError::parse(
                    Format::Mol2,
                    block.last().map_or(0, |(ln, _)| *ln),
                    "ATOM section ended before expected atom count",
                )
            })?;
        let ln = *ln;
        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(FileError::parse(Format::Mol2, ln, "ATOM record needs at least 6 fields"));
        }

        let serial = parse_field::<usize>(parts[0], ln, "atom id")?;
        let x = parse_field::<f64>(parts[2], ln, "x coordinate")?;
        let y = parse_field::<f64>(parts[3], ln, "y coordinate")?;
        let z = parse_field::<f64>(parts[4], ln, "z coordinate")?;
        let atom_type = parts[5];
        let element = Element::from_label(atom_type)
            .or_else(|| Element::from_label(parts[1]))
            .ok_or_else(|| {
                FileError::parse(
                    Format::Mol2,
                    ln,
                    format!("unable to infer element from '{}' or '{}'", atom_type, parts[1]),
                )
            })?;
        let substructure_id = match parts.get(6) {
            Some(value) => parse_field::<usize>(value, ln, "substructure id")?,
            None => 1,
        };
        let substructure_name = parts.get(7).copied().unwrap_or(DEFAULT_SUBSTRUCTURE);

        let mut builder = Atom::builder(element, Point3::new(x, y, z)).tag(atom_type);
        if header.has_charges {
            if let Some(value) = parts.get(8) {
                builder = builder.charge(parse_field::<f64>(value, ln, "partial charge")?);
            }
        }
        let atom = builder.build();

        if serials.insert(serial, atom.clone()).is_some() {
            return Err(FileError::parse(Format::Mol2, ln, format!("duplicate atom id {}", serial)));
        }
        metadata.atom_records.insert(
            atom.id(),
            Mol2AtomRecord {
                name: parts[1].to_string(),
                substructure_id,
                substructure_name: substructure_name.to_string(),
                molecule_name: header.name.clone(),
            },
        );
        atoms.push(atom);
    }

    Ok(serials)
}

fn parse_bonds(
    block: &[Line],
    start: usize,
    expected: usize,
    serials: &HashMap<usize, Atom>,
    bonds: &mut Vec<Bond>,
) -> Result<(), FileError> {
    let mut cursor = start;

    for _ in 0..expected {
        let (ln, raw) = next_data_line(block, &mut cursor)
            .filter(|(_, line)| !line.trim_start().starts_with('@'))
            .ok_or_else(|| {
                FileError::parse(
                    Format::Mol2,
                    block.last().map_or(0, |(ln, _)| *ln),
                    "BOND section ended before expected bond count",
                )
            })?;
        let ln = *ln;
        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FileError::parse(Format::Mol2, ln, "BOND record needs at least 4 fields"));
        }

        let lookup = |field: &str, what: &str| -> Result<Atom, FileError> {
            let serial = parse_field::<usize>(field, ln, what)?;
            serials.get(&serial).cloned().ok_or_else(|| {
                FileError::parse(Format::Mol2, ln, format!("bond references unknown atom id {}", serial))
            })
        };
        let origin = lookup(parts[1], "origin atom id")?;
        let target = lookup(parts[2], "target atom id")?;
        let bond_type: BondType = parts[3]
            .parse()
            .map_err(|e: ParseBondTypeError| {
                FileError::parse(Format::Mol2, ln, e.to_string())
            })?;

        bonds.push(Bond::new(origin, target, bond_type)?);
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(value: &str, line: usize, what: &str) -> Result<T, FileError> {
    value
        .parse::<T>()
        .map_err(|_| FileError::parse(Format::Mol2, line, format!("invalid {} '{}'", what, value)))
}

fn write_island(
    island: &Island,
    index: usize,
    metadata: &Mol2Metadata,
    writer: &mut impl Write,
) -> Result<(), FileError> {
    let atoms = island.atoms();
    let bonds = island.bonds();
    let has_charges = atoms.iter().all(|atom| atom.charge().is_some());
    let name = atoms
        .first()
        .and_then(|atom| metadata.atom_records.get(&atom.id()))
        .map(|record| record.molecule_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("ISLAND_{}", index + 1));

    writeln!(writer, "{}", MOLECULE_SECTION)?;
    writeln!(writer, "{}", name)?;
    writeln!(writer, "{:>5} {:>5} {:>5} 0 0", atoms.len(), bonds.len(), 1)?;
    writeln!(writer, "SMALL")?;
    writeln!(writer, "{}", if has_charges { "USER_CHARGES" } else { NO_CHARGES })?;
    writeln!(writer)?;

    writeln!(writer, "{}", ATOM_SECTION)?;
    let mut serials: HashMap<AtomId, usize> = HashMap::with_capacity(atoms.len());
    for (i, atom) in atoms.iter().enumerate() {
        let serial = i + 1;
        serials.insert(atom.id(), serial);

        let record = metadata.atom_records.get(&atom.id());
        let atom_name = record.map_or_else(
            || format!("{}{}", atom.element().symbol(), serial),
            |r| r.name.clone(),
        );
        let atom_type = atom.tag().unwrap_or_else(|| atom.element().symbol());
        let (substructure_id, substructure_name) = record.map_or((1, DEFAULT_SUBSTRUCTURE), |r| {
            (r.substructure_id, r.substructure_name.as_str())
        });
        let position = atom.position();
        writeln!(
            writer,
            "{:>7} {:<8} {:>10.4} {:>10.4} {:>10.4} {:<6} {:>3} {:<8} {:>8.4}",
            serial,
            atom_name,
            position.x,
            position.y,
            position.z,
            atom_type,
            substructure_id,
            substructure_name,
            atom.charge().unwrap_or(0.0)
        )?;
    }

    if !bonds.is_empty() {
        writeln!(writer, "{}", BOND_SECTION)?;
        for (i, bond) in bonds.iter().enumerate() {
            let (origin, target) = bond.to_atom_pair();
            writeln!(
                writer,
                "{:>6} {:>5} {:>5} {}",
                i + 1,
                serials[&origin.id()],
                serials[&target.id()],
                bond.bond_type()
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::error::SpeciesError;
    use std::io::Cursor;

    const WATER_AND_SODIUM: &str = "\
@<TRIPOS>MOLECULE
WAT
 3 2 1 0 0
SMALL
USER_CHARGES

@<TRIPOS>ATOM
      1 O1          0.0000     0.0000     0.0000 O.3     1  HOH1     -0.8340
      2 H1          0.9572     0.0000     0.0000 H       1  HOH1      0.4170
      3 H2         -0.2400     0.9270     0.0000 H       1  HOH1      0.4170
@<TRIPOS>BOND
     1     1     2 1
     2     1     3 1
@<TRIPOS>MOLECULE
NA
 1 0 1 0 0
SMALL
USER_CHARGES

@<TRIPOS>ATOM
      1 NA          5.0000     0.0000     0.0000 Na      1  NA1       1.0000
";

    fn read(text: &str) -> Result<(Supermolecule, Mol2Metadata), FileError> {
        Mol2File::read_from(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn reads_every_molecule_block() {
        let (system, metadata) = read(WATER_AND_SODIUM).unwrap();

        assert_eq!(system.island_count(), 2);
        assert_eq!(system.atom_count(), 4);
        assert_eq!(system.bond_count(), 2);
        assert_eq!(system.molecules().count(), 1);
        assert_eq!(system.charge(), Some(1));
        assert_eq!(metadata.molecule_names, vec!["WAT", "NA"]);

        let oxygen = &system.atoms()[0];
        assert_eq!(oxygen.element(), Element::O);
        assert_eq!(oxygen.tag(), Some("O.3"));
        assert_eq!(oxygen.charge(), Some(-0.834));
        assert_eq!(metadata.atom_records[&oxygen.id()].name, "O1");
        assert_eq!(system.atoms()[3].element(), Element::Na);
    }

    #[test]
    fn no_charges_leaves_charges_unknown() {
        let text = WATER_AND_SODIUM.replace("USER_CHARGES", "NO_CHARGES");
        let (system, _) = read(&text).unwrap();
        assert!(system.atoms().iter().all(|atom| atom.charge().is_none()));
        assert_eq!(system.charge(), None);
    }

    #[test]
    fn indented_section_after_missing_charge_type_is_not_a_charge_type() {
        let text = WATER_AND_SODIUM.replace("USER_CHARGES\n\n@<TRIPOS>ATOM", "  @<TRIPOS>ATOM");
        let (system, _) = read(&text).unwrap();
        assert_eq!(system.atom_count(), 4);
        assert!(system.atoms().iter().all(|atom| atom.charge().is_none()));
    }

    #[test]
    fn disconnected_block_yields_several_islands() {
        let text = "\
@<TRIPOS>MOLECULE
DIMER
4 2
SMALL
NO_CHARGES
@<TRIPOS>ATOM
1 C1 0 0 0 C.3
2 C2 1.5 0 0 C.3
3 N1 10 0 0 N.3
4 N2 11 0 0 N.3
@<TRIPOS>BOND
1 1 2 1
2 3 4 2
";
        let (system, _) = read(text).unwrap();
        assert_eq!(system.island_count(), 2);
        assert_eq!(system.molecules().count(), 2);
        let second = system.molecules().nth(1).unwrap();
        assert_eq!(second.bonds()[0].bond_type(), &BondType::Double);
    }

    #[test]
    fn writes_one_block_per_island_and_reads_back() {
        let (system, metadata) = read(WATER_AND_SODIUM).unwrap();

        let mut buffer = Vec::new();
        Mol2File::write_to(&system, &metadata, &mut buffer).unwrap();
        let written = String::from_utf8(buffer).unwrap();

        assert_eq!(written.matches(MOLECULE_SECTION).count(), 2);
        assert!(written.contains("O1"));
        assert!(written.contains("USER_CHARGES"));

        let (reread, reread_meta) = read(&written).unwrap();
        assert_eq!(reread.island_count(), 2);
        assert_eq!(reread.bond_count(), 2);
        assert_eq!(reread.charge(), Some(1));
        assert_eq!(reread_meta.molecule_names, vec!["WAT", "NA"]);
    }

    #[test]
    fn write_system_uses_generated_labels() {
        let (system, _) = read(WATER_AND_SODIUM).unwrap();
        let mut buffer = Vec::new();
        Mol2File::write_system_to(&system, &mut buffer).unwrap();
        let written = String::from_utf8(buffer).unwrap();
        assert!(written.contains("ISLAND_1"));
        assert!(written.contains("ISLAND_2"));
        assert!(written.contains("O1 "));
    }

    #[test]
    fn missing_molecule_section_is_reported() {
        let err = read("# empty\n").unwrap_err();
        assert!(matches!(err, FileError::MissingRecord { format: Format::Mol2, .. }));
    }

    #[test]
    fn bond_to_unknown_atom_is_a_parse_error() {
        let text = WATER_AND_SODIUM.replace("     2     1     3 1", "     2     1     9 1");
        let err = read(&text).unwrap_err();
        assert!(matches!(err, FileError::Parse { line: 13, .. }));
    }

    #[test]
    fn repeated_atom_pair_is_a_species_error() {
        let text = WATER_AND_SODIUM.replace("     2     1     3 1", "     2     2     1 2");
        let err = read(&text).unwrap_err();
        assert!(matches!(
            err,
            FileError::Species(SpeciesError::ConflictingBondPair { .. })
        ));
    }

    #[test]
    fn truncated_atom_section_is_reported() {
        let text = WATER_AND_SODIUM.replace(" 3 2 1 0 0", " 5 2 1 0 0");
        assert!(matches!(read(&text).unwrap_err(), FileError::Parse { .. }));
    }
}
