use std::io::Write;
use crate::utils::Result;

pub const COMPLETION_MESSAGE: &str = "contract upgraded";

/// Emit the single confirmation line
pub fn report_completion<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", COMPLETION_MESSAGE)?;
    out.flush()?;
    Ok(())
}
