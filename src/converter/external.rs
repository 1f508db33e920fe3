//! 外部変換コマンド（xlsx2csv 互換: `<command> [args..] <input> <output>`）

use super::ConversionError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// 外部コマンドで .xlsx を CSV に変換する
pub fn run_converter(
    command: &str,
    args: &[String],
    input: &Path,
    output: &Path,
) -> Result<(), ConversionError> {
    debug!("{} {:?} {} {}", command, args, input.display(), output.display());

    let result = Command::new(command)
        .args(args)
        .arg(input)
        .arg(output)
        .output()
        .map_err(|e| ConversionError::ToolSpawn(format!("{}: {}", command, e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
        return Err(ConversionError::ToolFailed {
            code: result.status.code(),
            stderr,
        });
    }

    if !output.exists() {
        return Err(ConversionError::ToolFailed {
            code: result.status.code(),
            stderr: "converter produced no output file".into(),
        });
    }

    Ok(())
}
