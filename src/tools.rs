//! Invocation of external tools.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Stdio;

use crate::error::{Error, Result};

/// Remove a file, ignoring it if it does not exist.
///
/// Returns whether a file was removed.
pub async fn remove_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

fn command_line(tool: &str, args: &[OsString]) -> String {
    let mut line = tool.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Run `tool` with `args` and wait for it to finish.
///
/// When `output_path` is given, any existing file at that path is removed
/// before the tool starts and the tool's standard output is written there
/// once it succeeds. Standard error is always logged. A tool that cannot be
/// started or exits unsuccessfully is an error.
pub async fn exec_tool_to_file<I, S>(tool: &str, args: I, output_path: Option<&Path>) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .collect();

    if let Some(output_path) = output_path {
        remove_if_exists(output_path).await?;
        log::info!(
            "Execute {} => {}",
            command_line(tool, &args),
            output_path.display()
        );
    } else {
        log::info!("Execute {}", command_line(tool, &args));
    }

    let output = tokio::process::Command::new(tool)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::ToolSpawn {
            tool: tool.to_string(),
            source: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.is_empty() {
        if output_path.is_some() {
            log::debug!("{}", stdout.trim_end());
        } else {
            log::info!("{}", stdout.trim_end());
        }
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        log::warn!("{}: {}", tool, line);
    }

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            status: output.status,
        });
    }

    if let Some(output_path) = output_path {
        tokio::fs::write(output_path, &output.stdout)
            .await
            .map_err(|e| Error::io(output_path, e))?;
    }

    Ok(())
}
