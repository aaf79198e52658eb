//! Loadable maze layouts expressed as grids of 4-bit exit masks.
//!
//! A layout file starts with a `maze-chase:v1:<columns>x<rows>` header and is
//! followed by one line of hexadecimal digits per tile row. Each digit holds
//! the exit mask of one tile using the bit order up, down, left, right.
//! Blank lines and lines starting with `#` are ignored.

use maze_chase_core::{ExitMask, TileCoord, BOARD_COLUMNS, BOARD_ROWS};
use thiserror::Error;

const LAYOUT_DOMAIN: &str = "maze-chase";
const LAYOUT_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';
const COMMENT_PREFIX: char = '#';

const ROWS: usize = BOARD_ROWS as usize;
const COLUMNS: usize = BOARD_COLUMNS as usize;

/// Reference maze: tunnel on row 14, ghost corridor around rows 11 to 17.
const CLASSIC_ROWS: [&[u8; COLUMNS]; ROWS] = [
    b"0000000000000000000000000000",
    b"0ACCCCECCCCC600ACCCCCECCCC60",
    b"0300003000003003000003000030",
    b"0300003000003003000003000030",
    b"0300003000003003000003000030",
    b"0BCCCCFCCECCDCCDCCECCFCCCC70",
    b"0300003003000000003003000030",
    b"0300003003000000003003000030",
    b"09CCCC7009CC600ACC500BCCCC50",
    b"0000003000003003000003000000",
    b"0000003000003003000003000000",
    b"000000300ACCDCCDCC6003000000",
    b"0000003003000000003003000000",
    b"0000003003000000003003000000",
    b"CCCCCCFCC700000000BCCFCCCCCC",
    b"0000003003000000003003000000",
    b"0000003003000000003003000000",
    b"000000300BCCCCCCCC7003000000",
    b"0000003003000000003003000000",
    b"0000003003000000003003000000",
    b"0ACCCCFCCDCC600ACCDCCFCCCC60",
    b"0300003000003003000003000030",
    b"0300003000003003000003000030",
    b"09C600BCCECCDCCDCCECC700AC50",
    b"0003003003000000003003003000",
    b"0003003003000000003003003000",
    b"0ACDCC5009CC600ACC5009CCDC60",
    b"0300000000003003000000000030",
    b"0300000000003003000000000030",
    b"09CCCCCCCCCCDCCDCCCCCCCCCC50",
    b"0000000000000000000000000000",
];

/// Errors that can occur while decoding a layout file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The provided text was empty or contained only comments.
    #[error("layout text was empty")]
    Empty,
    /// The header line lacked one of its fields.
    #[error("layout header is missing the {0}")]
    MissingHeader(&'static str),
    /// The header used an unexpected domain prefix.
    #[error("layout domain '{0}' is not supported")]
    InvalidDomain(String),
    /// The header used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The header dimensions were malformed or differ from the fixed maze size.
    #[error("layout dimensions '{0}' are invalid; expected 28x31")]
    InvalidDimensions(String),
    /// The number of tile rows differs from the maze height.
    #[error("layout has {found} rows; expected {expected}")]
    RowCount {
        /// Rows required by the maze.
        expected: usize,
        /// Rows present in the text.
        found: usize,
    },
    /// A tile row has the wrong number of digits.
    #[error("layout row {row} has {found} tiles; expected {expected}")]
    RowLength {
        /// Zero-based row index.
        row: usize,
        /// Tiles required per row.
        expected: usize,
        /// Tiles present in the row.
        found: usize,
    },
    /// A tile digit is not hexadecimal.
    #[error("layout row {row}, column {column}: '{found}' is not a hex digit")]
    InvalidDigit {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// Offending character.
        found: char,
    },
}

/// Fixed-size grid of tile exit masks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    cells: Vec<ExitMask>,
}

impl Layout {
    /// Reference maze layout shipped with the game.
    #[must_use]
    pub fn classic() -> Self {
        let cells = CLASSIC_ROWS
            .iter()
            .flat_map(|row| row.iter())
            .map(|&digit| ExitMask::from_bits(hex_nibble(digit)))
            .collect();
        Self { cells }
    }

    /// Decodes a layout from its textual representation.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX));

        let header = lines.next().ok_or(LayoutError::Empty)?;
        parse_header(header)?;

        let rows: Vec<&str> = lines.collect();
        if rows.len() != ROWS {
            return Err(LayoutError::RowCount {
                expected: ROWS,
                found: rows.len(),
            });
        }

        let mut cells = Vec::with_capacity(ROWS * COLUMNS);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != COLUMNS {
                return Err(LayoutError::RowLength {
                    row,
                    expected: COLUMNS,
                    found,
                });
            }
            for (column, digit) in line.chars().enumerate() {
                let bits = digit
                    .to_digit(16)
                    .ok_or(LayoutError::InvalidDigit {
                        row,
                        column,
                        found: digit,
                    })?;
                cells.push(ExitMask::from_bits(bits as u8));
            }
        }

        Ok(Self { cells })
    }

    /// Encodes the layout into the text format accepted by [`Layout::parse`].
    #[must_use]
    pub fn encode(&self) -> String {
        let mut text = format!("{LAYOUT_DOMAIN}:{LAYOUT_VERSION}:{BOARD_COLUMNS}x{BOARD_ROWS}\n");
        for row in self.cells.chunks(COLUMNS) {
            for mask in row {
                text.push_str(&format!("{:X}", mask.bits()));
            }
            text.push('\n');
        }
        text
    }

    /// Exit mask of the tile at `cell`, if it lies within the layout.
    #[must_use]
    pub fn exits(&self, cell: TileCoord) -> Option<ExitMask> {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        if row >= ROWS || column >= COLUMNS {
            return None;
        }
        self.cells.get(row * COLUMNS + column).copied()
    }

    /// Exit masks in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[ExitMask] {
        &self.cells
    }
}

fn parse_header(header: &str) -> Result<(), LayoutError> {
    let mut parts = header.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutError::MissingHeader("domain"))?;
    let version = parts.next().ok_or(LayoutError::MissingHeader("version"))?;
    let dimensions = parts
        .next()
        .ok_or(LayoutError::MissingHeader("dimensions"))?;

    if domain != LAYOUT_DOMAIN {
        return Err(LayoutError::InvalidDomain(domain.to_owned()));
    }
    if version != LAYOUT_VERSION {
        return Err(LayoutError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LayoutError::InvalidDimensions(dimensions.to_owned()))?;
    let columns = columns.trim().parse::<u32>().ok();
    let rows = rows.trim().parse::<u32>().ok();
    if columns != Some(BOARD_COLUMNS) || rows != Some(BOARD_ROWS) {
        return Err(LayoutError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok(())
}

const fn hex_nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'A'..=b'F' => digit - b'A' + 10,
        b'a'..=b'f' => digit - b'a' + 10,
        _ => 0,
    }
}
