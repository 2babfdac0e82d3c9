//! Level loading
//!
//! Levels are plain text: a run of `R` records, each holding four quad
//! corners, a separator, the face normal, a separator and a material id.
//!
//! ```text
//! R 0 0 0  10 0 0  10 10 0  0 10 0  N 0 0 1  T 2
//! ```
//!
//! Tokens are read the way a C++ stream would: the record marker and the
//! separators are single non-whitespace characters (they may touch the
//! number that follows), numbers are maximal runs of numeric characters.
//! Parsing stops at end of input or at any marker other than `R`.

use std::fs;
use std::path::Path;
use crate::geometry::Vec3;

const RECORD_MARKER: char = 'R';

/// One quad from the level file
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRecord {
    pub vertices: [Vec3; 4],
    pub normal: Vec3,
    pub material: i32,
}

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    /// Record number (0-based) and what went wrong
    ParseError { record: usize, message: String },
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError { record, message } => {
                write!(f, "Parse error in record {}: {}", record, message)
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Character-level reader over the level text
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// Next non-whitespace character, or None at end of input
    fn next_char(&mut self) -> Option<char> {
        self.skip_whitespace();
        let c = self.rest.chars().next()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    /// Next run of numeric characters, or None at end of input
    fn next_number_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

fn parse_error(record: usize, message: impl Into<String>) -> LevelError {
    LevelError::ParseError { record, message: message.into() }
}

fn read_f32(tokens: &mut Tokens, record: usize, what: &str) -> Result<f32, LevelError> {
    let token = tokens
        .next_number_token()
        .ok_or_else(|| parse_error(record, format!("unexpected end of input reading {}", what)))?;
    let value: f32 = token
        .parse()
        .map_err(|_| parse_error(record, format!("invalid number {:?} for {}", token, what)))?;
    if !value.is_finite() {
        return Err(parse_error(record, format!("non-finite {}", what)));
    }
    Ok(value)
}

fn read_vec3(tokens: &mut Tokens, record: usize, what: &str) -> Result<Vec3, LevelError> {
    Ok(Vec3::new(
        read_f32(tokens, record, what)?,
        read_f32(tokens, record, what)?,
        read_f32(tokens, record, what)?,
    ))
}

fn read_separator(tokens: &mut Tokens, record: usize, before: &str) -> Result<(), LevelError> {
    tokens
        .next_char()
        .map(|_| ())
        .ok_or_else(|| parse_error(record, format!("missing separator before {}", before)))
}

/// Parse level text into records
pub fn parse_level(text: &str) -> Result<Vec<LevelRecord>, LevelError> {
    let mut tokens = Tokens::new(text);
    let mut records = Vec::new();

    while let Some(marker) = tokens.next_char() {
        if marker != RECORD_MARKER {
            break;
        }
        let n = records.len();

        let vertices = [
            read_vec3(&mut tokens, n, "vertex 0")?,
            read_vec3(&mut tokens, n, "vertex 1")?,
            read_vec3(&mut tokens, n, "vertex 2")?,
            read_vec3(&mut tokens, n, "vertex 3")?,
        ];
        read_separator(&mut tokens, n, "normal")?;
        let normal = read_vec3(&mut tokens, n, "normal")?;
        read_separator(&mut tokens, n, "material")?;

        let token = tokens
            .next_number_token()
            .ok_or_else(|| parse_error(n, "unexpected end of input reading material"))?;
        let material: i32 = token
            .parse()
            .map_err(|_| parse_error(n, format!("invalid material id {:?}", token)))?;

        records.push(LevelRecord { vertices, normal, material });
    }

    Ok(records)
}

/// Load and parse a level file
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<Vec<LevelRecord>, LevelError> {
    let contents = fs::read_to_string(path)?;
    parse_level(&contents)
}
