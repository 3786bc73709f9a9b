//! Decoding of the compact, comma-delimited option encoding.
//!
//! A single command-line token like `join=a,,b` carries a short positional
//! argument list without nested quoting: segments between commas become
//! literal arguments and empty segments become absent ones.

use crate::engine::CallArg;

/// Decode an option string into positional call arguments.
///
/// `None` and `""` both produce an empty list. Otherwise every comma
/// delimits a segment, so an input with `k` commas yields exactly `k + 1`
/// arguments, each either the literal segment text or [`CallArg::Absent`]
/// for an empty segment.
pub fn decode(raw: Option<&str>) -> Vec<CallArg> {
    let mut args = Vec::new();
    let Some(raw) = raw else {
        return args;
    };
    if raw.is_empty() {
        return args;
    }

    let mut rest = raw;
    while let Some(pos) = rest.find(',') {
        if pos == 0 {
            args.push(CallArg::Absent);
        } else {
            args.push(CallArg::text(&rest[..pos]));
        }
        rest = &rest[pos + 1..];
    }
    if rest.is_empty() {
        args.push(CallArg::Absent);
    } else {
        args.push(CallArg::text(rest));
    }
    args
}
