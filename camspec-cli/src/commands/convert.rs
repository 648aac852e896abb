use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::delimiter_byte;
use crate::CliError;

/// Convert a delimited export into a normalized JSON array.
pub(crate) fn run_convert(input: &Path, output: &Path, delimiter: char) -> Result<(), CliError> {
    let count = camspec_import::csv_to_json(input, output, delimiter_byte(delimiter)?)
        .map_err(|e| CliError::import(e.to_string()))?;

    log::info!(
        "  {} Wrote {} row(s) to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        count,
        output.display(),
    );
    Ok(())
}
