//! The four regex passes that annotate a test script.
//!
//! Every pass takes the whole document and returns a new one plus the number
//! of matches it rewrote. Text that does not match is copied through verbatim,
//! so a malformed test case is skipped rather than half-rewritten.
//!
//! The patterns do not exclude their own output. Feeding a rewritten script
//! back in is not guaranteed to be a no-op.

use crate::types::{Pass, Rewrite, RewriteError, RewriteOptions, RewriteReport};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::{debug, warn};

lazy_static! {
    /// Test case header followed by a POST/PUT/DELETE call with an inline JSON body.
    static ref BODY_REQUEST: Regex = Regex::new(
        r#"(?ms)(?P<header># TC-[A-Z]+-\d+:.*?\necho ">>> TC-[A-Z]+-\d+:.*?"\n)(?P<call>RESPONSE=\$\(curl -s -w "\\n%\{http_code\}" -X (?P<method>POST|PUT|DELETE) (?P<url>\$BASE_URL_[A-Z]+/[^\s\\]+)[^)]+\n-H "Content-Type: application/json" \\\n-d '(?P<body>[^']+)')"#
    )
    .unwrap();

    /// Test case header followed by a call without a body.
    static ref BODILESS_REQUEST: Regex = Regex::new(
        r#"(?m)(?P<header># TC-[A-Z]+-\d+:.*?\necho ">>> TC-[A-Z]+-\d+:.*?"\n)(?P<call>RESPONSE=\$\(curl -s -w "\\n%\{http_code\}" (?:-X GET )?(?P<url>\$BASE_URL_[A-Z]+/[^\s)]+))"#
    )
    .unwrap();

    static ref SUCCESS_MESSAGE: Regex = Regex::new(
        r#"echo -e "\$\{GREEN\}✓ (?P<id>TC-[A-Z]+-\d+) PASSED\$\{NC\}""#
    )
    .unwrap();

    /// Rewritten success message, counter bump, then the `jq` pretty-print.
    static ref RESPONSE_OUTPUT: Regex = Regex::new(
        r#"(?m)(?P<lead>echo -e "\$\{GREEN\}✓ TC-[A-Z]+-\d+ PASSED \(HTTP: \$HTTP_CODE\)\$\{NC\}"\n\s+PASSED=\$\(\(PASSED\+1\)\)\n)(?P<jq>\s+echo "\$RESPONSE_BODY" \| jq)"#
    )
    .unwrap();
}

/// Run all passes in order.
///
/// Fails without touching the text when the script does not define the
/// logging helper, since every inserted call would reference it.
pub fn rewrite(text: &str, options: &RewriteOptions) -> Result<Rewrite, RewriteError> {
    if !text.contains(&options.helper_definition()) {
        warn!(helper = %options.helper, "helper definition not found");
        return Err(RewriteError::MissingHelper(options.helper.clone()));
    }

    let mut report = RewriteReport::new();
    let mut document = text.to_string();

    for pass in Pass::ALL {
        let (next, count) = apply_pass(pass, &document, options);
        debug!(pass = pass.label(), count, "pass complete");
        report.record(pass, count);
        document = next;
    }

    Ok(Rewrite {
        text: document,
        report,
    })
}

/// Run a single pass over `text`.
pub fn apply_pass(pass: Pass, text: &str, options: &RewriteOptions) -> (String, usize) {
    match pass {
        Pass::BodyRequests => annotate_body_requests(text, options),
        Pass::BodilessRequests => annotate_bodiless_requests(text, options),
        Pass::SuccessMessages => augment_success_messages(text),
        Pass::ResponseLabels => label_response_output(text, options),
    }
}

/// Move each inline request body into a variable and log the request.
pub fn annotate_body_requests(text: &str, options: &RewriteOptions) -> (String, usize) {
    let mut count = 0;
    let var = &options.body_var;
    let helper = &options.helper;

    let out = BODY_REQUEST.replace_all(text, |caps: &Captures| {
        count += 1;
        let header = &caps["header"];
        let method = &caps["method"];
        let url = &caps["url"];
        let body = &caps["body"];
        let call = caps["call"].replace(&format!("'{body}'"), &format!("\"${var}\""));

        format!("{header}{var}='{body}'\n{helper} \"{method}\" \"{url}\" \"${var}\"\n{call}")
    });

    (out.into_owned(), count)
}

/// Log bodiless calls as GET, leaving the call untouched.
pub fn annotate_bodiless_requests(text: &str, options: &RewriteOptions) -> (String, usize) {
    let mut count = 0;
    let helper = &options.helper;

    let out = BODILESS_REQUEST.replace_all(text, |caps: &Captures| {
        count += 1;
        let header = &caps["header"];
        let url = &caps["url"];
        let call = &caps["call"];

        format!("{header}{helper} \"GET\" \"{url}\"\n{call}")
    });

    (out.into_owned(), count)
}

/// Append the captured status code to every `PASSED` message.
pub fn augment_success_messages(text: &str) -> (String, usize) {
    let mut count = 0;

    let out = SUCCESS_MESSAGE.replace_all(text, |caps: &Captures| {
        count += 1;
        let id = &caps["id"];
        format!(r#"echo -e "${{GREEN}}✓ {id} PASSED (HTTP: $HTTP_CODE)${{NC}}""#)
    });

    (out.into_owned(), count)
}

/// Echo a label right before the response body is pretty-printed.
pub fn label_response_output(text: &str, options: &RewriteOptions) -> (String, usize) {
    let mut count = 0;
    let label = &options.response_label;

    let out = RESPONSE_OUTPUT.replace_all(text, |caps: &Captures| {
        count += 1;
        let lead = &caps["lead"];
        let jq = &caps["jq"];
        format!("{lead}    echo -e \"${{GREEN}}{label}${{NC}}\"\n{jq}")
    });

    (out.into_owned(), count)
}
