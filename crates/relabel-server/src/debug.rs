// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Per-request diagnostics. Every line goes to `tracing`; when capture is on
/// the lines are also kept for the response's `debugMessages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugLog {
    capture: bool,
    lines: Vec<String>,
}

impl DebugLog {
    pub fn new(capture: bool) -> Self {
        Self {
            capture,
            lines: Vec::new(),
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "relabel", "{message}");
        self.keep("DEBUG", message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "relabel", "{message}");
        self.keep("INFO", message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "relabel", "{message}");
        self.keep("WARN", message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(target: "relabel", "{message}");
        self.keep("ERROR", message);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    fn keep(&mut self, level: &str, message: String) {
        if self.capture {
            self.lines.push(format!("[{level}] {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugLog;

    #[test]
    fn lines_are_prefixed_with_level() {
        let mut log = DebugLog::new(true);
        log.info("resolved 2 tables");
        log.warn("dangling parent");
        assert_eq!(
            log.lines(),
            &["[INFO] resolved 2 tables", "[WARN] dangling parent"]
        );
    }

    #[test]
    fn capture_off_keeps_nothing() {
        let mut log = DebugLog::new(false);
        log.error("boom");
        assert!(log.into_lines().is_empty());
    }
}
