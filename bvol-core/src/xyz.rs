use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

use crate::elements::{normalize_symbol, symbol_for_number};

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("missing atom count line")]
    MissingCount,
    #[error("invalid atom count '{0}'")]
    InvalidCount(String),
    #[error("missing title line")]
    MissingTitle,
    #[error("expected {expected} atoms, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("expected '<element> <x> <y> <z>'")]
    TooFewFields,
    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("unknown atomic number {0}")]
    UnknownAtomicNumber(usize),
}

/// A parsed structure: the title line plus element symbols and coordinates
/// in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub name: String,
    pub elements: Vec<String>,
    pub coordinates: Vec<Point3<f64>>,
}

impl Structure {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Reads a single-frame XYZ file. Lines after the declared atom count are ignored.
pub fn read_xyz(reader: &mut impl BufRead) -> Result<Structure, XyzError> {
    let mut lines = reader.lines();

    let count_line = lines.next().ok_or(XyzError::MissingCount)??;
    let count_str = count_line.trim();
    let count: usize = count_str
        .parse()
        .map_err(|_| XyzError::InvalidCount(count_str.to_string()))?;

    let name = lines.next().ok_or(XyzError::MissingTitle)??.trim().to_string();

    let mut elements = Vec::with_capacity(count);
    let mut coordinates = Vec::with_capacity(count);

    for (offset, line_res) in lines.take(count).enumerate() {
        let line = line_res?;
        let line_num = offset + 3;
        let (symbol, pos) = parse_atom_line(&line).map_err(|kind| XyzError::Parse {
            line: line_num,
            kind,
        })?;
        elements.push(symbol);
        coordinates.push(pos);
    }

    if elements.len() != count {
        return Err(XyzError::Truncated {
            expected: count,
            found: elements.len(),
        });
    }

    Ok(Structure {
        name,
        elements,
        coordinates,
    })
}

fn parse_atom_line(line: &str) -> Result<(String, Point3<f64>), XyzParseErrorKind> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(XyzParseErrorKind::TooFewFields);
    }

    let symbol = match fields[0].parse::<usize>() {
        Ok(z) => symbol_for_number(z)
            .ok_or(XyzParseErrorKind::UnknownAtomicNumber(z))?
            .to_string(),
        Err(_) => normalize_symbol(fields[0]),
    };

    let mut xyz = [0.0f64; 3];
    for (slot, raw) in xyz.iter_mut().zip(&fields[1..4]) {
        *slot = raw
            .parse()
            .map_err(|_| XyzParseErrorKind::InvalidCoordinate(raw.to_string()))?;
    }

    Ok((symbol, Point3::new(xyz[0], xyz[1], xyz[2])))
}
