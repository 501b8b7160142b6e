//! Terminal side of the request-set builder.

use anyhow::{Context, Result};
use fga_core::builder::extract_photo_id;
use fga_core::selection::{parse_command, Phase, Selection};
use std::io::{BufRead, Write};

/// `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

pub fn ask_photo_id<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String> {
    write!(out, "\nEnter picture's URL on Flickr: ")?;
    out.flush()?;
    let url = read_line(input)?.context("no photo URL given")?;
    let photo_id = extract_photo_id(url.trim())?;
    writeln!(out, "Parsed picture ID {photo_id}")?;
    Ok(photo_id)
}

pub fn render_menu<W: Write>(selection: &Selection, photo_id: &str, out: &mut W) -> Result<()> {
    writeln!(out, "\n\nPicture ID: {photo_id}")?;
    writeln!(out, "\nSelected Groups:\n")?;
    for entry in selection.selected() {
        writeln!(out, "\t{}", entry.display())?;
    }
    writeln!(out, "\n\nUnselected Groups:\n")?;
    for entry in selection.unselected() {
        writeln!(out, "\t{}", entry.display())?;
    }
    Ok(())
}

/// Runs the menu until a blank line (or end of input). Bad entries are
/// reported and the menu is shown again.
pub fn choose_groups<R: BufRead, W: Write>(
    selection: &mut Selection,
    photo_id: &str,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    while selection.phase() == Phase::Choosing {
        render_menu(selection, photo_id, out)?;
        write!(out, "\n\nGroup ID (Enter to exit): ")?;
        out.flush()?;
        let line = read_line(input)?.unwrap_or_default();
        if let Err(err) = parse_command(&line).and_then(|cmd| selection.apply(cmd)) {
            writeln!(out, "WARNING: {err}")?;
        }
    }
    Ok(())
}
