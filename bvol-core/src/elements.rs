use phf::{Map, Set, phf_map, phf_set};

/// Symbols eligible for automatic center-atom selection.
static METALLIC_ELEMENTS: Set<&'static str> = phf_set! {
    "Ac", "Al", "Sb", "Ag", "Ba", "Bi", "Bh", "B", "Cd", "Ca", "Cf", "Cr", "Co", "Cm",
    "Ds", "Db", "Dy", "Fr", "Gd", "Ga", "Au", "Hf", "Hs", "Ho", "Ir", "Fe", "Kr", "La",
    "Li", "Mc", "Nh", "Nb", "N", "Os", "Pd", "P", "Pt", "Pu", "Po", "K", "Pa", "Ra",
    "Rn", "Re", "Rh", "Rb", "Sm", "Sc", "Si", "Na", "Sr", "Ta", "Tl", "Th", "Tm",
    "Sn", "Ti", "U", "V", "Y", "Zn", "Zr",
};

/// Bondi van der Waals radii in Angstroms (H from Rowland & Taylor).
static BONDI_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 1.09, "He" => 1.40,
    "Li" => 1.82, "Be" => 1.53, "B" => 1.92, "C" => 1.70, "N" => 1.55, "O" => 1.52, "F" => 1.47, "Ne" => 1.54,
    "Na" => 2.27, "Mg" => 1.73, "Al" => 1.84, "Si" => 2.10, "P" => 1.80, "S" => 1.80, "Cl" => 1.75, "Ar" => 1.88,
    "K" => 2.75, "Ca" => 2.31, "Ni" => 1.63, "Cu" => 1.40, "Zn" => 1.39, "Ga" => 1.87, "Ge" => 2.11,
    "As" => 1.85, "Se" => 1.90, "Br" => 1.85, "Kr" => 2.02,
    "Rb" => 3.03, "Sr" => 2.49, "Pd" => 1.63, "Ag" => 1.72, "Cd" => 1.58, "In" => 1.93, "Sn" => 2.17,
    "Sb" => 2.06, "Te" => 2.06, "I" => 1.98, "Xe" => 2.16,
    "Cs" => 3.43, "Ba" => 2.68, "Pt" => 1.75, "Au" => 1.66, "Hg" => 1.55, "Tl" => 1.96, "Pb" => 2.02,
    "Bi" => 2.07, "Po" => 1.97, "At" => 2.02, "Rn" => 2.20,
    "Fr" => 3.48, "Ra" => 2.83, "U" => 1.86,
};

/// Radius used for elements without a tabulated Bondi value.
pub const DEFAULT_RADIUS: f64 = 2.0;

static SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

pub fn is_metallic(symbol: &str) -> bool {
    METALLIC_ELEMENTS.contains(symbol)
}

pub fn bondi_radius(symbol: &str) -> f64 {
    BONDI_RADII.get(symbol).copied().unwrap_or(DEFAULT_RADIUS)
}

pub fn is_hydrogen(symbol: &str) -> bool {
    matches!(symbol, "H" | "D" | "T")
}

/// Looks up the symbol for a 1-based atomic number.
pub fn symbol_for_number(z: usize) -> Option<&'static str> {
    z.checked_sub(1).and_then(|i| SYMBOLS.get(i)).copied()
}

/// Normalizes capitalization: "FE" and "fe" both become "Fe".
pub fn normalize_symbol(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(raw.len());
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
            out
        }
        None => String::new(),
    }
}
