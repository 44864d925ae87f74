use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::error::{ThumbnailError, ThumbnailResult};

// 外部ツールを出力を捨てて実行（終了コード 0 以外は失敗）
pub fn run_silent(mut command: Command) -> ThumbnailResult<()> {
    let program = program_name(&command);
    trace!(command = ?command, "外部ツール実行");

    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| ThumbnailError::Tool {
            program: program.clone(),
            detail: e.to_string(),
        })?;

    if !status.success() {
        debug!(%program, %status, "外部ツールが失敗");
        return Err(ThumbnailError::Tool {
            program,
            detail: status.to_string(),
        });
    }
    Ok(())
}

// 外部ツールを実行し、失敗時は標準エラー出力を詳細として返す
pub fn run_capturing_stderr(mut command: Command) -> ThumbnailResult<()> {
    let program = program_name(&command);
    trace!(command = ?command, "外部ツール実行");

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ThumbnailError::Tool {
            program: program.clone(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            output.status.to_string()
        } else {
            stderr
        };
        return Err(ThumbnailError::Tool { program, detail });
    }
    Ok(())
}

// PATH 上に見つからないツール名を列挙
pub fn missing_tools(programs: &[&str]) -> Vec<String> {
    programs
        .iter()
        .filter(|program| which::which(program).is_err())
        .map(|program| program.to_string())
        .collect()
}

fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().to_string()
}
