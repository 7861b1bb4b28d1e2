//! Core types for the rewriting library.

use serde::Serialize;
use std::path::PathBuf;

/// Default name of the logging helper the target script must define.
pub const DEFAULT_HELPER: &str = "print_request";

/// Default shell variable that holds an extracted request body.
pub const DEFAULT_BODY_VAR: &str = "REQUEST_DATA";

/// Default label echoed before a pretty-printed response body.
pub const DEFAULT_RESPONSE_LABEL: &str = "[响应]";

/// One of the four rewrite passes, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// POST/PUT/DELETE calls carrying a JSON body.
    BodyRequests,
    /// Calls without a body, logged as GET.
    BodilessRequests,
    /// `PASSED` lines gaining the HTTP status code.
    SuccessMessages,
    /// Label inserted before the response body is printed.
    ResponseLabels,
}

impl Pass {
    /// All passes in execution order.
    pub const ALL: [Pass; 4] = [
        Pass::BodyRequests,
        Pass::BodilessRequests,
        Pass::SuccessMessages,
        Pass::ResponseLabels,
    ];

    /// Get the label for this pass.
    pub fn label(&self) -> &'static str {
        match self {
            Pass::BodyRequests => "body requests",
            Pass::BodilessRequests => "bodiless requests",
            Pass::SuccessMessages => "success messages",
            Pass::ResponseLabels => "response labels",
        }
    }
}

/// Names spliced into the inserted shell code.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Logging helper function name, called as `<helper> "METHOD" "URL" ["BODY"]`.
    pub helper: String,
    /// Variable the request body is moved into.
    pub body_var: String,
    /// Text echoed before the response body.
    pub response_label: String,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            helper: DEFAULT_HELPER.to_string(),
            body_var: DEFAULT_BODY_VAR.to_string(),
            response_label: DEFAULT_RESPONSE_LABEL.to_string(),
        }
    }
}

impl RewriteOptions {
    /// The literal the input must contain before any rewriting happens.
    pub fn helper_definition(&self) -> String {
        format!("{}()", self.helper)
    }
}

/// Number of matches each pass rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub body_requests: usize,
    pub bodiless_requests: usize,
    pub success_messages: usize,
    pub response_labels: usize,
}

impl RewriteReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count recorded for a single pass.
    pub fn count(&self, pass: Pass) -> usize {
        match pass {
            Pass::BodyRequests => self.body_requests,
            Pass::BodilessRequests => self.bodiless_requests,
            Pass::SuccessMessages => self.success_messages,
            Pass::ResponseLabels => self.response_labels,
        }
    }

    pub(crate) fn record(&mut self, pass: Pass, count: usize) {
        match pass {
            Pass::BodyRequests => self.body_requests = count,
            Pass::BodilessRequests => self.bodiless_requests = count,
            Pass::SuccessMessages => self.success_messages = count,
            Pass::ResponseLabels => self.response_labels = count,
        }
    }

    /// Total rewrites across all passes.
    pub fn total(&self) -> usize {
        Pass::ALL.iter().map(|p| self.count(*p)).sum()
    }

    /// Check if no pass matched anything.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A rewritten document together with what changed.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub text: String,
    pub report: RewriteReport,
}

/// Errors that abort a rewrite before any output is produced.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("logging helper `{0}` is not defined in the script")]
    MissingHelper(String),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
