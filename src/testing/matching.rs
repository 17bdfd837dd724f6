//! Expect-style matching of command output

/// What an `expect` call requires of a command's output
#[derive(Debug, Clone, Default)]
pub struct Expectation {
    /// Assertion message used on mismatch
    pub msg: Option<String>,
    /// Output must begin with this
    pub start: Option<String>,
    /// Output must contain each of these, checked in order
    pub substrs: Vec<String>,
    /// Echo the matching steps to stderr
    pub trace: bool,
}

impl Expectation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn starts_with(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn contains<I, S>(mut self, substrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.substrs.extend(substrs.into_iter().map(Into::into));
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Result of matching output against an [`Expectation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMatch {
    Matched,
    /// Output did not begin with the required prefix; substrings were not tried
    MissingStart(String),
    /// First substring not found; later ones were not tried
    MissingSubstr(String),
}

impl OutputMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, OutputMatch::Matched)
    }
}

/// Match `output` against a prefix and ordered substrings
///
/// `on_check` sees each pattern as it is tried, with whether it matched.
pub fn match_output<F>(
    output: &str,
    start: Option<&str>,
    substrs: &[String],
    mut on_check: F,
) -> OutputMatch
where
    F: FnMut(&str, bool),
{
    if let Some(start) = start {
        let matched = output.starts_with(start);
        on_check(start, matched);
        if !matched {
            return OutputMatch::MissingStart(start.to_string());
        }
    }

    for substr in substrs {
        let matched = output.contains(substr.as_str());
        on_check(substr, matched);
        if !matched {
            return OutputMatch::MissingSubstr(substr.clone());
        }
    }

    OutputMatch::Matched
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "Breakpoint created: 1: file ='main.c', line = 42, locations = 1";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_patterns_match() {
        assert_eq!(match_output("", None, &[], |_, _| {}), OutputMatch::Matched);
    }

    #[test]
    fn test_start_and_substrs_match() {
        let result = match_output(
            OUTPUT,
            Some("Breakpoint created"),
            &strings(&["main.c", "line = 42"]),
            |_, _| {},
        );
        assert!(result.is_match());
    }

    #[test]
    fn test_substr_at_offset_zero_matches() {
        let result = match_output(OUTPUT, None, &strings(&["Breakpoint"]), |_, _| {});
        assert!(result.is_match());
    }

    #[test]
    fn test_missing_start_skips_substrs() {
        let mut tried = Vec::new();
        let result = match_output(
            OUTPUT,
            Some("error:"),
            &strings(&["main.c"]),
            |pattern, _| tried.push(pattern.to_string()),
        );

        assert_eq!(result, OutputMatch::MissingStart("error:".to_string()));
        assert_eq!(tried, vec!["error:"]);
    }

    #[test]
    fn test_stops_at_first_missing_substr() {
        let mut tried = Vec::new();
        let result = match_output(
            OUTPUT,
            None,
            &strings(&["main.c", "line = 7", "locations"]),
            |pattern, matched| tried.push((pattern.to_string(), matched)),
        );

        assert_eq!(result, OutputMatch::MissingSubstr("line = 7".to_string()));
        assert_eq!(
            tried,
            vec![("main.c".to_string(), true), ("line = 7".to_string(), false)]
        );
    }

    #[test]
    fn test_builder() {
        let exp = Expectation::new()
            .starts_with("(int)")
            .contains(["x", "= 42"])
            .msg("x is 42");
        assert_eq!(exp.start.as_deref(), Some("(int)"));
        assert_eq!(exp.substrs, vec!["x", "= 42"]);
        assert_eq!(exp.msg.as_deref(), Some("x is 42"));
        assert!(!exp.trace);
    }
}
