//! Pure text helpers for TF command output.

/// Marker the native client echoes back when it repeats the command line
const ECHO_MARKER: &str = "-noprompt";

/// Split tool output into lines.
///
/// `\r\n` is normalized to `\n`. With `skip_warnings`, leading lines that
/// start with `WARN` are dropped (only the contiguous prefix). With
/// `filter_empty_lines`, blank and whitespace-only lines are removed.
pub fn split_into_lines(stdout: &str, skip_warnings: bool, filter_empty_lines: bool) -> Vec<String> {
    if stdout.is_empty() {
        return Vec::new();
    }

    let normalized = stdout.replace("\r\n", "\n");
    let mut lines = normalized.split('\n').map(str::to_string).collect::<Vec<_>>();

    if skip_warnings {
        let warnings = lines.iter().take_while(|l| l.starts_with("WARN")).count();
        lines.drain(..warnings);
    }
    if filter_empty_lines {
        lines.retain(|l| !l.trim().is_empty());
    }
    lines
}

/// [`split_into_lines`] with the usual options: skip warnings, keep empty lines
pub fn split_lines(stdout: &str) -> Vec<String> {
    split_into_lines(stdout, true, false)
}

/// Cut everything before `<?xml` and after the last `>`.
///
/// Returns the input unchanged when no XML document is found.
pub fn trim_to_xml(text: &str) -> &str {
    match (text.find("<?xml"), text.rfind('>')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Remove the command line the native client echoes before its real output.
///
/// The echoed line is found by the `-noprompt` switch every command carries;
/// everything up to and including that line is discarded.
pub fn strip_echoed_command_line(stdout: &str) -> &str {
    let Some(start) = stdout.find(ECHO_MARKER) else {
        return stdout;
    };
    match stdout[start..].find('\n') {
        Some(offset) => &stdout[start + offset + 1..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_into_lines_defaults() {
        let lines = split_lines("WARN 1\nWARN 2\nwarning\none\ntwo\r\n\n");
        assert_eq!(lines, vec!["warning", "one", "two", "", ""]);
    }

    #[test]
    fn test_split_into_lines_only_skips_leading_warnings() {
        let lines = split_into_lines("one\nWARN late\ntwo", true, false);
        assert_eq!(lines, vec!["one", "WARN late", "two"]);

        let lines = split_into_lines("WARN a\nx", false, false);
        assert_eq!(lines, vec!["WARN a", "x"]);
    }

    #[test]
    fn test_split_into_lines_filters_blank_lines() {
        let lines = split_into_lines("a\r\n  \n\t\nb\n", true, true);
        assert_eq!(lines, vec!["a", "b"]);
        assert!(lines.iter().all(|l| !l.trim().is_empty()));
    }

    #[test]
    fn test_split_into_lines_is_idempotent_on_normalized_input() {
        let input = "a\nb\n\nc";
        let once = split_into_lines(input, true, false);
        let twice = split_into_lines(&once.join("\n"), true, false);
        assert_eq!(once, twice);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_trim_to_xml() {
        let text = "Banner line\r\n<?xml version=\"1.0\"?><status></status>\r\ntrailing";
        assert_eq!(
            trim_to_xml(text),
            "<?xml version=\"1.0\"?><status></status>"
        );
        assert_eq!(trim_to_xml("no xml here"), "no xml here");
    }

    #[test]
    fn test_strip_echoed_command_line() {
        let stdout = "c:\\ws>tf status -noprompt -format:xml\r\n<?xml ?><status/>\r\n";
        assert_eq!(strip_echoed_command_line(stdout), "<?xml ?><status/>\r\n");
        assert_eq!(strip_echoed_command_line("plain output\n"), "plain output\n");
        assert_eq!(strip_echoed_command_line("tf add -noprompt"), "");
    }
}
