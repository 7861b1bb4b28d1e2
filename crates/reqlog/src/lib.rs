//! Request-logging annotator for shell API test scripts.
//!
//! Test scripts drive an API with `curl` calls grouped into numbered test
//! cases (`# TC-USER-001: ...`). This library rewrites such a script so every
//! request is logged through a helper the script already defines, success
//! messages show the HTTP status, and response bodies get a label. It can be
//! used as a library or through the `reqlog` CLI binary.
//!
//! # Example
//!
//! ```no_run
//! use reqlog::{rewrite_file, RewriteOptions};
//! use std::path::Path;
//!
//! let result = rewrite_file(Path::new("test-all-apis.sh"), &RewriteOptions::default());
//!
//! match result {
//!     Ok(rewrite) => println!("{}", rewrite.text),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

mod rewriter;
mod types;

use std::path::Path;

// Re-export public types
pub use types::{
    Pass, Rewrite, RewriteError, RewriteOptions, RewriteReport, DEFAULT_BODY_VAR,
    DEFAULT_HELPER, DEFAULT_RESPONSE_LABEL,
};

// Re-export individual passes for advanced usage
pub use rewriter::{
    annotate_bodiless_requests, annotate_body_requests, apply_pass, augment_success_messages,
    label_response_output, rewrite,
};

/// Default script name used when no path is given.
pub const DEFAULT_SCRIPT: &str = "test-all-apis.sh";

/// Read a script from disk and rewrite it.
///
/// The file itself is never modified.
pub fn rewrite_file(path: &Path, options: &RewriteOptions) -> Result<Rewrite, RewriteError> {
    let content = std::fs::read_to_string(path).map_err(|source| RewriteError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "read script");
    rewrite(&content, options)
}
