use std::io::Write;

use serde::Serialize;

pub(crate) fn take_value(args: &[String], index: usize, flag: &str) -> Result<String, String> {
    args.get(index + 1)
        .cloned()
        .ok_or_else(|| format!("error: missing value for {flag}"))
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    stdout: &mut dyn Write,
    value: &T,
) -> Result<(), String> {
    serde_json::to_writer_pretty(&mut *stdout, value).map_err(|err| err.to_string())?;
    writeln!(stdout).map_err(|err| err.to_string())
}

pub(crate) fn line(stdout: &mut dyn Write, text: impl std::fmt::Display) -> Result<(), String> {
    writeln!(stdout, "{text}").map_err(|err| err.to_string())
}
