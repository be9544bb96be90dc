//! # Commands
//!
//! The `sort`, `add` and `top` operations, written against injected readers
//! and writers so they can be driven from tests as well as from `main`.

use crate::error::{PcmdError, Result};
use crate::usage::{decode_line, sort_by_weight, FrequencyStore, WeightSource};
use std::io::{BufRead, Read, Write};
use tracing::debug;

/// Argument to `add` that means "read the command from stdin"
pub const STDIN_ARG: &str = "-";

/// Number of entries `top` prints when no limit is given
pub const DEFAULT_TOP_LIMIT: usize = 10;

const STDIN_LABEL: &str = "<stdin>";
const STDOUT_LABEL: &str = "<stdout>";

/// Read newline-delimited lines until end of input, dropping empty ones.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the read.
pub fn read_lines<R: BufRead>(input: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut lossy = 0usize;
    for raw in input.split(b'\n') {
        let raw = raw.map_err(|e| PcmdError::io("read", STDIN_LABEL, e))?;
        let (line, valid) = decode_line(raw);
        if !valid {
            lossy += 1;
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }

    if lossy > 0 {
        debug!(lines = lossy, "input lines were not valid UTF-8 and were decoded lossily");
    }
    Ok(lines)
}

/// Write `lines` ordered by weight, one per line.
pub fn run_sort<S, W>(source: &S, lines: Vec<String>, mut output: W) -> Result<()>
where
    S: WeightSource + ?Sized,
    W: Write,
{
    let count = lines.len();
    for line in sort_by_weight(lines, source) {
        writeln!(output, "{line}").map_err(|e| PcmdError::io("write", STDOUT_LABEL, e))?;
    }
    output
        .flush()
        .map_err(|e| PcmdError::io("write", STDOUT_LABEL, e))?;

    debug!(lines = count, "sorted input");
    Ok(())
}

/// Turn the arguments of `add` into the command text.
///
/// Exactly one argument is accepted. [`STDIN_ARG`] reads the whole of `stdin`
/// instead, which may span several lines.
pub fn resolve_command<R: Read>(args: &[String], mut stdin: R) -> Result<String> {
    let arg = match args {
        [] => return Err(PcmdError::Argument("missing argument".to_string())),
        [arg] => arg,
        _ => return Err(PcmdError::Argument("multiple arguments".to_string())),
    };

    if arg != STDIN_ARG {
        return Ok(arg.clone());
    }

    let mut command = String::new();
    stdin
        .read_to_string(&mut command)
        .map_err(|e| PcmdError::io("read", STDIN_LABEL, e))?;
    Ok(command)
}

/// Count one use of `command`, persist the store and echo the command.
///
/// Returns the command's new weight.
pub fn run_add<W: Write>(store: &mut FrequencyStore, command: &str, mut output: W) -> Result<u64> {
    let weight = store.increment(command);
    store.save()?;
    debug!(path = %store.path().display(), weight, "recorded command");

    writeln!(output, "{command}").map_err(|e| PcmdError::io("write", STDOUT_LABEL, e))?;
    Ok(weight)
}

/// Print up to `limit` of the most used commands as `<weight>\t<command>`.
pub fn run_top<W: Write>(store: &FrequencyStore, limit: usize, mut output: W) -> Result<()> {
    for (command, weight) in store.entries_by_weight().into_iter().take(limit) {
        writeln!(output, "{weight}\t{command}")
            .map_err(|e| PcmdError::io("write", STDOUT_LABEL, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_read_lines_drops_empty_lines() {
        let lines = read_lines("git\n\nls -la\n\n".as_bytes()).unwrap();
        assert_eq!(lines, args(&["git", "ls -la"]));
    }

    #[test]
    fn test_read_lines_handles_crlf_and_missing_newline() {
        let lines = read_lines("a\r\nb".as_bytes()).unwrap();
        assert_eq!(lines, args(&["a", "b"]));
    }

    #[test]
    fn test_read_lines_decodes_invalid_utf8_lossily() {
        let input: &[u8] = b"git status\nls \xff\npwd\n";
        let lines = read_lines(input).unwrap();
        assert_eq!(lines, args(&["git status", "ls \u{FFFD}", "pwd"]));
    }

    #[test]
    fn test_run_sort_writes_one_line_each() {
        let mut weights = HashMap::new();
        weights.insert("ls".to_string(), 1);

        let mut out = Vec::new();
        run_sort(&weights, args(&["pwd", "ls"]), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ls\npwd\n");
    }

    #[test]
    fn test_resolve_command_missing_argument() {
        let err = resolve_command(&[], io::empty()).unwrap_err();
        assert!(matches!(err, PcmdError::Argument(ref m) if m == "missing argument"));
    }

    #[test]
    fn test_resolve_command_multiple_arguments() {
        let err = resolve_command(&args(&["ls", "-la"]), io::empty()).unwrap_err();
        assert!(matches!(err, PcmdError::Argument(ref m) if m == "multiple arguments"));
    }

    #[test]
    fn test_resolve_command_literal() {
        let command = resolve_command(&args(&["git status"]), io::empty()).unwrap();
        assert_eq!(command, "git status");
    }

    #[test]
    fn test_resolve_command_reads_all_of_stdin() {
        let stdin = "first line\nsecond line\n".as_bytes();
        let command = resolve_command(&args(&["-"]), stdin).unwrap();
        assert_eq!(command, "first line\nsecond line\n");
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stdin closed"))
        }
    }

    #[test]
    fn test_resolve_command_stdin_failure() {
        let err = resolve_command(&args(&["-"]), FailingReader).unwrap_err();
        assert!(matches!(err, PcmdError::Io { .. }));
    }

    #[test]
    fn test_read_lines_reports_read_failure() {
        let input = io::BufReader::new(FailingReader);
        assert!(matches!(read_lines(input), Err(PcmdError::Io { .. })));
    }
}
