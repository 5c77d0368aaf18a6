//! Terminal input collaborator.
//!
//! Collects the product triple, re-prompting until a line parses. Generic
//! over the reader and writer so it can be driven from tests.

use std::io::{BufRead, Write};

use log::{debug, warn};

use crate::domain::ProductInput;
use crate::error::{AdLoopError, Result};

pub const FORMAT_HINT: &str = "Enter product information in the format: Product Name, Product Description, Target Audience";

pub const EXAMPLE: &str = "Example: Neon, Energy drink, Gen-Z Gamers";

pub const INVALID_FORMAT: &str = "Invalid format. Please try again.";

/// Prompt on `writer` and read lines from `reader` until one parses.
///
/// Reaching end of input before a valid line is an `InputValidation` error.
pub fn prompt_product<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<ProductInput> {
    loop {
        writeln!(writer, "{}", FORMAT_HINT)?;
        writeln!(writer, "{}", EXAMPLE)?;
        write!(writer, "> ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(AdLoopError::InputValidation(
                "input closed before a valid product was entered".to_string(),
            ));
        }

        match ProductInput::parse_triple(&line) {
            Ok(product) => {
                debug!("product input: {}", product);
                return Ok(product);
            }
            Err(e) => {
                warn!("Rejected product input {:?}: {}", line.trim_end(), e);
                writeln!(writer, "{}", INVALID_FORMAT)?;
            }
        }
    }
}

/// Use `line` when it parses; otherwise fall back to prompting.
pub fn resolve_product<R: BufRead, W: Write>(
    line: Option<&str>,
    reader: &mut R,
    writer: &mut W,
) -> Result<ProductInput> {
    if let Some(line) = line {
        match ProductInput::parse_triple(line) {
            Ok(product) => return Ok(product),
            Err(e) => {
                warn!("Rejected --product value {:?}: {}", line, e);
                writeln!(writer, "{}", INVALID_FORMAT)?;
            }
        }
    }
    prompt_product(reader, writer)
}
