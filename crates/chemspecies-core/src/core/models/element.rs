use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

/// A chemical element, numbered by atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    Rb,
    Sr,
    Y,
    Zr,
    Nb,
    Mo,
    Tc,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    In,
    Sn,
    Sb,
    Te,
    I,
    Xe,
    Cs,
    Ba,
    La,
    Ce,
    Pr,
    Nd,
    Pm,
    Sm,
    Eu,
    Gd,
    Tb,
    Dy,
    Ho,
    Er,
    Tm,
    Yb,
    Lu,
    Hf,
    Ta,
    W,
    Re,
    Os,
    Ir,
    Pt,
    Au,
    Hg,
    Tl,
    Pb,
    Bi,
    Po,
    At,
    Rn,
    Fr,
    Ra,
    Ac,
    Th,
    Pa,
    U,
    Np,
    Pu,
    Am,
    Cm,
    Bk,
    Cf,
    Es,
    Fm,
    Md,
    No,
    Lr,
    Rf,
    Db,
    Sg,
    Bh,
    Hs,
    Mt,
    Ds,
    Rg,
    Cn,
    Nh,
    Fl,
    Mc,
    Lv,
    Ts,
    Og = 118,
}

const ALL_ELEMENTS: [Element; 118] = [
    Element::H, Element::He, Element::Li, Element::Be, Element::B, Element::C, Element::N,
    Element::O, Element::F, Element::Ne, Element::Na, Element::Mg, Element::Al, Element::Si,
    Element::P, Element::S, Element::Cl, Element::Ar, Element::K, Element::Ca, Element::Sc,
    Element::Ti, Element::V, Element::Cr, Element::Mn, Element::Fe, Element::Co, Element::Ni,
    Element::Cu, Element::Zn, Element::Ga, Element::Ge, Element::As, Element::Se, Element::Br,
    Element::Kr, Element::Rb, Element::Sr, Element::Y, Element::Zr, Element::Nb, Element::Mo,
    Element::Tc, Element::Ru, Element::Rh, Element::Pd, Element::Ag, Element::Cd, Element::In,
    Element::Sn, Element::Sb, Element::Te, Element::I, Element::Xe, Element::Cs, Element::Ba,
    Element::La, Element::Ce, Element::Pr, Element::Nd, Element::Pm, Element::Sm, Element::Eu,
    Element::Gd, Element::Tb, Element::Dy, Element::Ho, Element::Er, Element::Tm, Element::Yb,
    Element::Lu, Element::Hf, Element::Ta, Element::W, Element::Re, Element::Os, Element::Ir,
    Element::Pt, Element::Au, Element::Hg, Element::Tl, Element::Pb, Element::Bi, Element::Po,
    Element::At, Element::Rn, Element::Fr, Element::Ra, Element::Ac, Element::Th, Element::Pa,
    Element::U, Element::Np, Element::Pu, Element::Am, Element::Cm, Element::Bk, Element::Cf,
    Element::Es, Element::Fm, Element::Md, Element::No, Element::Lr, Element::Rf, Element::Db,
    Element::Sg, Element::Bh, Element::Hs, Element::Mt, Element::Ds, Element::Rg, Element::Cn,
    Element::Nh, Element::Fl, Element::Mc, Element::Lv, Element::Ts, Element::Og,
];

static SYMBOL_TABLE: Map<&'static str, Element> = phf_map! {
    "H" => Element::H, "He" => Element::He, "Li" => Element::Li, "Be" => Element::Be,
    "B" => Element::B, "C" => Element::C, "N" => Element::N, "O" => Element::O,
    "F" => Element::F, "Ne" => Element::Ne, "Na" => Element::Na, "Mg" => Element::Mg,
    "Al" => Element::Al, "Si" => Element::Si, "P" => Element::P, "S" => Element::S,
    "Cl" => Element::Cl, "Ar" => Element::Ar, "K" => Element::K, "Ca" => Element::Ca,
    "Sc" => Element::Sc, "Ti" => Element::Ti, "V" => Element::V, "Cr" => Element::Cr,
    "Mn" => Element::Mn, "Fe" => Element::Fe, "Co" => Element::Co, "Ni" => Element::Ni,
    "Cu" => Element::Cu, "Zn" => Element::Zn, "Ga" => Element::Ga, "Ge" => Element::Ge,
    "As" => Element::As, "Se" => Element::Se, "Br" => Element::Br, "Kr" => Element::Kr,
    "Rb" => Element::Rb, "Sr" => Element::Sr, "Y" => Element::Y, "Zr" => Element::Zr,
    "Nb" => Element::Nb, "Mo" => Element::Mo, "Tc" => Element::Tc, "Ru" => Element::Ru,
    "Rh" => Element::Rh, "Pd" => Element::Pd, "Ag" => Element::Ag, "Cd" => Element::Cd,
    "In" => Element::In, "Sn" => Element::Sn, "Sb" => Element::Sb, "Te" => Element::Te,
    "I" => Element::I, "Xe" => Element::Xe, "Cs" => Element::Cs, "Ba" => Element::Ba,
    "La" => Element::La, "Ce" => Element::Ce, "Pr" => Element::Pr, "Nd" => Element::Nd,
    "Pm" => Element::Pm, "Sm" => Element::Sm, "Eu" => Element::Eu, "Gd" => Element::Gd,
    "Tb" => Element::Tb, "Dy" => Element::Dy, "Ho" => Element::Ho, "Er" => Element::Er,
    "Tm" => Element::Tm, "Yb" => Element::Yb, "Lu" => Element::Lu, "Hf" => Element::Hf,
    "Ta" => Element::Ta, "W" => Element::W, "Re" => Element::Re, "Os" => Element::Os,
    "Ir" => Element::Ir, "Pt" => Element::Pt, "Au" => Element::Au, "Hg" => Element::Hg,
    "Tl" => Element::Tl, "Pb" => Element::Pb, "Bi" => Element::Bi, "Po" => Element::Po,
    "At" => Element::At, "Rn" => Element::Rn, "Fr" => Element::Fr, "Ra" => Element::Ra,
    "Ac" => Element::Ac, "Th" => Element::Th, "Pa" => Element::Pa, "U" => Element::U,
    "Np" => Element::Np, "Pu" => Element::Pu, "Am" => Element::Am, "Cm" => Element::Cm,
    "Bk" => Element::Bk, "Cf" => Element::Cf, "Es" => Element::Es, "Fm" => Element::Fm,
    "Md" => Element::Md, "No" => Element::No, "Lr" => Element::Lr, "Rf" => Element::Rf,
    "Db" => Element::Db, "Sg" => Element::Sg, "Bh" => Element::Bh, "Hs" => Element::Hs,
    "Mt" => Element::Mt, "Ds" => Element::Ds, "Rg" => Element::Rg, "Cn" => Element::Cn,
    "Nh" => Element::Nh, "Fl" => Element::Fl, "Mc" => Element::Mc, "Lv" => Element::Lv,
    "Ts" => Element::Ts, "Og" => Element::Og,
};

impl Element {
    /// Looks up an element by atomic number (1-118).
    pub fn from_atomic_number(number: u8) -> Option<Self> {
        match number {
            1..=118 => Some(ALL_ELEMENTS[usize::from(number) - 1]),
            _ => None,
        }
    }

    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::He => "He",
            Element::Li => "Li",
            Element::Be => "Be",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Ne => "Ne",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Al => "Al",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Ar => "Ar",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Sc => "Sc",
            Element::Ti => "Ti",
            Element::V => "V",
            Element::Cr => "Cr",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Ga => "Ga",
            Element::Ge => "Ge",
            Element::As => "As",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::Kr => "Kr",
            Element::Rb => "Rb",
            Element::Sr => "Sr",
            Element::Y => "Y",
            Element::Zr => "Zr",
            Element::Nb => "Nb",
            Element::Mo => "Mo",
            Element::Tc => "Tc",
            Element::Ru => "Ru",
            Element::Rh => "Rh",
            Element::Pd => "Pd",
            Element::Ag => "Ag",
            Element::Cd => "Cd",
            Element::In => "In",
            Element::Sn => "Sn",
            Element::Sb => "Sb",
            Element::Te => "Te",
            Element::I => "I",
            Element::Xe => "Xe",
            Element::Cs => "Cs",
            Element::Ba => "Ba",
            Element::La => "La",
            Element::Ce => "Ce",
            Element::Pr => "Pr",
            Element::Nd => "Nd",
            Element::Pm => "Pm",
            Element::Sm => "Sm",
            Element::Eu => "Eu",
            Element::Gd => "Gd",
            Element::Tb => "Tb",
            Element::Dy => "Dy",
            Element::Ho => "Ho",
            Element::Er => "Er",
            Element::Tm => "Tm",
            Element::Yb => "Yb",
            Element::Lu => "Lu",
            Element::Hf => "Hf",
            Element::Ta => "Ta",
            Element::W => "W",
            Element::Re => "Re",
            Element::Os => "Os",
            Element::Ir => "Ir",
            Element::Pt => "Pt",
            Element::Au => "Au",
            Element::Hg => "Hg",
            Element::Tl => "Tl",
            Element::Pb => "Pb",
            Element::Bi => "Bi",
            Element::Po => "Po",
            Element::At => "At",
            Element::Rn => "Rn",
            Element::Fr => "Fr",
            Element::Ra => "Ra",
            Element::Ac => "Ac",
            Element::Th => "Th",
            Element::Pa => "Pa",
            Element::U => "U",
            Element::Np => "Np",
            Element::Pu => "Pu",
            Element::Am => "Am",
            Element::Cm => "Cm",
            Element::Bk => "Bk",
            Element::Cf => "Cf",
            Element::Es => "Es",
            Element::Fm => "Fm",
            Element::Md => "Md",
            Element::No => "No",
            Element::Lr => "Lr",
            Element::Rf => "Rf",
            Element::Db => "Db",
            Element::Sg => "Sg",
            Element::Bh => "Bh",
            Element::Hs => "Hs",
            Element::Mt => "Mt",
            Element::Ds => "Ds",
            Element::Rg => "Rg",
            Element::Cn => "Cn",
            Element::Nh => "Nh",
            Element::Fl => "Fl",
            Element::Mc => "Mc",
            Element::Lv => "Lv",
            Element::Ts => "Ts",
            Element::Og => "Og",
        }
    }

    /// Infers an element from a free-form atom label such as a Tripos atom
    /// type (`C.ar`), a PDB atom name (`CA`, `1HB`) or a bare symbol.
    ///
    /// Leading digits are skipped. A two-letter symbol is preferred only when
    /// the second letter is lowercase in the label, so that `CA` is carbon
    /// while `Ca` is calcium. By the same rule `NA` is nitrogen; formats that
    /// encode two-letter symbols by column position must resolve that before
    /// falling back to this function.
    pub fn from_label(label: &str) -> Option<Self> {
        let head = label
            .trim()
            .split(['.', '_'])
            .next()
            .unwrap_or("")
            .trim_start_matches(|c: char| c.is_ascii_digit());
        let mut letters = head.chars().take_while(|c| c.is_ascii_alphabetic());
        let first = letters.next()?;
        if let Some(second) = letters.next() {
            if second.is_ascii_lowercase() {
                let pair: String = [first.to_ascii_uppercase(), second].iter().collect();
                if let Some(element) = SYMBOL_TABLE.get(pair.as_str()) {
                    return Some(*element);
                }
            }
        }
        SYMBOL_TABLE
            .get(first.to_ascii_uppercase().to_string().as_str())
            .copied()
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses an element symbol, ignoring case (`cl`, `CL` and `Cl` are all chlorine).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let normalized: String = match chars.next() {
            Some(first) => std::iter::once(first.to_ascii_uppercase())
                .chain(chars.map(|c| c.to_ascii_lowercase()))
                .collect(),
            None => return Err(ParseElementError(s.to_string())),
        };
        SYMBOL_TABLE
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_and_atomic_numbers_agree() {
        for number in 1..=118u8 {
            let element = Element::from_atomic_number(number).unwrap();
            assert_eq!(element.atomic_number(), number);
            assert_eq!(element.symbol().parse::<Element>(), Ok(element));
        }
        assert_eq!(Element::from_atomic_number(0), None);
        assert_eq!(Element::from_atomic_number(119), None);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("cl".parse::<Element>(), Ok(Element::Cl));
        assert_eq!("CL".parse::<Element>(), Ok(Element::Cl));
        assert_eq!(" Na ".parse::<Element>(), Ok(Element::Na));
        assert_eq!("og".parse::<Element>(), Ok(Element::Og));
    }

    #[test]
    fn from_str_rejects_unknown_symbols() {
        assert!("".parse::<Element>().is_err());
        assert!("Xx".parse::<Element>().is_err());
        assert!("Carbon".parse::<Element>().is_err());
    }

    #[test]
    fn from_label_understands_tripos_types_and_atom_names() {
        assert_eq!(Element::from_label("C.ar"), Some(Element::C));
        assert_eq!(Element::from_label("N.am"), Some(Element::N));
        assert_eq!(Element::from_label("Cl"), Some(Element::Cl));
        assert_eq!(Element::from_label("CA"), Some(Element::C));
        assert_eq!(Element::from_label("NA"), Some(Element::N));
        assert_eq!(Element::from_label("Ca"), Some(Element::Ca));
        assert_eq!(Element::from_label("1HB"), Some(Element::H));
        assert_eq!(Element::from_label("O1"), Some(Element::O));
        assert_eq!(Element::from_label("Du"), None);
        assert_eq!(Element::from_label(""), None);
    }

    #[test]
    fn display_writes_symbol() {
        assert_eq!(Element::Fe.to_string(), "Fe");
        assert_eq!(format!("{}", Element::H), "H");
    }
}
