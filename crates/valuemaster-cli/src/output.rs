use std::io::Write;

use crate::error::CliError;
use crate::metadata::Envelope;

/// Write the envelope as a single JSON document followed by a newline.
pub fn render<W: Write>(writer: &mut W, envelope: &Envelope, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, envelope)?;
    } else {
        serde_json::to_writer(&mut *writer, envelope)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
