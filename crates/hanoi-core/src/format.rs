#![forbid(unsafe_code)]

//! Progress display values.
//!
//! Completed counts are grouped by thousands. Totals above
//! [`COMPACT_THRESHOLD`] switch to a three-significant-digit scientific form
//! (`1.05×10^6`), and an unbounded total renders as `∞`.

use std::fmt;

use crate::count::MoveCount;

/// Totals strictly above this value render in compact form.
pub const COMPACT_THRESHOLD: u128 = 10_000;

/// `1234567` → `"1,234,567"`.
#[must_use]
pub fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Mantissa with two decimals and a base-ten exponent.
fn compact(n: u128) -> String {
    let exponent = n.to_string().len() as i64 - 1;
    scientific(n as f64 / 10f64.powi(exponent as i32), exponent)
}

/// Same form for a count known only by its logarithm.
fn compact_log10(log10: f64) -> String {
    let exponent = log10.floor();
    scientific(10f64.powf(log10 - exponent), exponent as i64)
}

fn scientific(mantissa: f64, mut exponent: i64) -> String {
    let mut mantissa = (mantissa * 100.0).round() / 100.0;
    if mantissa >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    format!("{mantissa:.2}×10^{exponent}")
}

/// Display wrapper for a plan total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTotal(pub MoveCount);

impl fmt::Display for MoveTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            MoveCount::Unbounded => f.write_str("∞"),
            MoveCount::Huge(magnitude) => f.write_str(&compact_log10(magnitude.log10())),
            MoveCount::Finite(n) if n > COMPACT_THRESHOLD => f.write_str(&compact(n)),
            MoveCount::Finite(n) => f.write_str(&group_thousands(n)),
        }
    }
}

impl fmt::Display for MoveCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        MoveTotal(*self).fmt(f)
    }
}

/// Running "completed of total" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u64,
    pub total: MoveCount,
}

impl Progress {
    #[must_use]
    pub const fn new(completed: u64, total: MoveCount) -> Self {
        Self { completed, total }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {}",
            group_thousands(u128::from(self.completed)),
            MoveTotal(self.total)
        )
    }
}
