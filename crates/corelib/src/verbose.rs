//! Verbose trace of a run: upstreams, generated points and key matches.
//!
//! Callers test [`VerboseSink::enabled`] before formatting a line, so a
//! disabled sink costs nothing.

/// Destination for verbose lines.
pub trait VerboseSink {
    /// Whether lines should be produced at all.
    fn enabled(&self) -> bool;

    /// Emits one line.
    fn log_line(&self, line: &str);

    /// Emits lines in order.
    fn log_lines(&self, lines: &[String]) {
        for line in lines {
            self.log_line(line);
        }
    }
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl VerboseSink for Silent {
    fn enabled(&self) -> bool {
        false
    }

    fn log_line(&self, _line: &str) {}
}


#[cfg(test)]
mod tests {
    use super::testing::Recorder;
    use super::*;

    #[test]
    fn test_log_lines_keeps_order() {
        let rec = Recorder::default();
        rec.log_lines(&["one".to_owned(), "two".to_owned()]);
        rec.log_line("three");
        assert_eq!(*rec.lines.borrow(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_silent_is_disabled() {
        assert!(!Silent.enabled());
        Silent.log_lines(&["ignored".to_owned()]);
    }
}
