//! Text trace reader.
//!
//! One access per line: `<core> <kind> <address>`, where `kind` is `I`
//! (instruction fetch), `L` (load) or `S` (store) and the address is decimal
//! or `0x`-prefixed hex. `R` and `W` are accepted as aliases for `L` and `S`,
//! and kinds are case-insensitive. Blank lines and everything after `#` are
//! ignored.

use std::io::BufRead;

use anyhow::{Context, Result, anyhow, bail};
use memsys_core::AccessType;

/// One access read from a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    /// 1-based line number in the trace.
    pub line: usize,
    /// Issuing core.
    pub core_id: usize,
    /// Access classification.
    pub access: AccessType,
    /// Virtual byte address.
    pub addr: u64,
}

/// Parses an access kind letter.
fn parse_kind(token: &str) -> Result<AccessType> {
    match token {
        "I" | "i" => Ok(AccessType::Ifetch),
        "L" | "l" | "R" | "r" => Ok(AccessType::Load),
        "S" | "s" | "W" | "w" => Ok(AccessType::Store),
        other => bail!("unknown access kind {other:?} (expected I, L, S, R or W)"),
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_addr(token: &str) -> Result<u64> {
    let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse(),
    };
    parsed.with_context(|| format!("invalid address {token:?}"))
}

/// Parses one trace line; `Ok(None)` for blank and comment lines.
pub fn parse_line(line: usize, text: &str) -> Result<Option<TraceRecord>> {
    let body = text.split('#').next().unwrap_or_default().trim();
    if body.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = body.split_whitespace().collect();
    let [core, kind, addr] = fields.as_slice() else {
        bail!("line {line}: expected `<core> <I|L|S> <address>`, found {body:?}");
    };

    let core_id = core
        .parse()
        .map_err(|e| anyhow!("line {line}: invalid core id {core:?}: {e}"))?;
    let access = parse_kind(kind).with_context(|| format!("line {line}"))?;
    let addr = parse_addr(addr).with_context(|| format!("line {line}"))?;

    Ok(Some(TraceRecord {
        line,
        core_id,
        access,
        addr,
    }))
}

/// Iterates over the records of a trace, stopping at the first error.
pub fn records<R: BufRead>(reader: R) -> impl Iterator<Item = Result<TraceRecord>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, text)| {
            let line = index + 1;
            match text.with_context(|| format!("line {line}: read failed")) {
                Ok(text) => parse_line(line, &text).transpose(),
                Err(e) => Some(Err(e)),
            }
        })
}
