//! Header extraction through the `ncdump` command-line tool.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

/// Run `ncdump -h` on a granule and return the CDL header text.
pub fn dump_header(program: &str, path: &Path) -> NetCdfResult<String> {
    debug!(program = %program, path = %path.display(), "Running ncdump");

    let output = Command::new(program)
        .arg("-h")
        .arg(path)
        .output()
        .map_err(|e| NetCdfError::CommandError(format!("Failed to run {}: {}", program, e)))?;

    if !output.status.success() {
        return Err(NetCdfError::CommandError(format!(
            "{} failed: {}",
            program,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| NetCdfError::InvalidFormat(format!("ncdump output is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_command_error() {
        let err = dump_header("ncdump-definitely-not-installed", Path::new("x.nc")).unwrap_err();
        assert!(matches!(err, NetCdfError::CommandError(_)));
    }
}
