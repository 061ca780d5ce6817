use std::ffi::OsStr;
use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run the `sqlvolley` binary with stdin closed and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_sqlvolley<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = sqlvolley_bin()?;
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .stdin(Stdio::null())
        .output()
        .map_err(|err| format!("run sqlvolley failed: {}", err))
}

/// Run the `sqlvolley` binary with extra environment variables.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_sqlvolley_with_env<I, S>(args: I, envs: &[(&str, &str)]) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = sqlvolley_bin()?;
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .envs(envs.iter().copied())
        .stdin(Stdio::null())
        .output()
        .map_err(|err| format!("run sqlvolley failed: {}", err))
}

/// Run the `sqlvolley` binary feeding `input` on stdin.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed or stdin cannot be written.
pub fn run_sqlvolley_with_stdin<I, S>(args: I, input: &str) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = sqlvolley_bin()?;
    let mut child = Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("spawn sqlvolley failed: {}", err))?;
    {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| "child stdin missing".to_owned())?;
        stdin
            .write_all(input.as_bytes())
            .map_err(|err| format!("write stdin failed: {}", err))?;
    }
    child
        .wait_with_output()
        .map_err(|err| format!("wait sqlvolley failed: {}", err))
}

/// Turn a failed run into an error carrying both streams.
///
/// # Errors
///
/// Returns an error when the process exited unsuccessfully.
pub fn ensure_success(output: &Output) -> Result<(), String> {
    if output.status.success() {
        return Ok(());
    }
    Err(format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    ))
}

fn sqlvolley_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_sqlvolley").map_or_else(
        || Err("CARGO_BIN_EXE_sqlvolley missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
