//! Position keys for sibling ordering using fractional indexing.
//!
//! A [`PositionKey`] is a variable-length string over the 62-symbol alphabet
//! `0-9A-Za-z`, compared byte-wise. Keys sort lexicographically to determine
//! display order, which allows inserting between existing items without
//! renumbering siblings. Every key has an integer part (whose length is
//! encoded in its first byte) and an optional fraction part; midpoints nest
//! into the fraction, so repeated same-spot insertions grow keys slowly until
//! a rebalance pass resets them.

use crate::error::{KanbanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ordered key alphabet: digits, then uppercase, then lowercase.
const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Keys longer than this mark their container as due for a rebalance pass.
///
/// Purely a heuristic: a key only gets this long after sustained insertion
/// at the same spot, which is exactly when evenly respacing the container
/// pays off.
pub const REBALANCE_THRESHOLD: usize = 50;

/// Order-preserving key placing an item among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionKey(String);

impl PositionKey {
    /// The canonical key for the first item of an empty container.
    pub fn first() -> Self {
        Self("a0".to_string())
    }

    /// A key strictly between two optional bounds.
    ///
    /// `None` means unconstrained on that side. `lower >= upper` is a caller
    /// contract violation and errors rather than silently misordering.
    pub fn between(lower: Option<&PositionKey>, upper: Option<&PositionKey>) -> Result<Self> {
        let bytes = key_between(
            lower.map(|k| k.0.as_bytes()),
            upper.map(|k| k.0.as_bytes()),
        )?;
        Ok(Self(into_key_string(bytes)))
    }

    /// `n` strictly increasing keys between the bounds, evenly distributed
    /// in the key space.
    ///
    /// Used for bulk insertion (board seeding, rebalancing) where `n`
    /// sequential [`PositionKey::between`] calls would nest ever deeper and
    /// produce needlessly long keys.
    pub fn spread(
        lower: Option<&PositionKey>,
        upper: Option<&PositionKey>,
        n: usize,
    ) -> Result<Vec<Self>> {
        let keys = n_keys_between(
            lower.map(|k| k.0.as_bytes()),
            upper.map(|k| k.0.as_bytes()),
            n,
        )?;
        Ok(keys.into_iter().map(|k| Self(into_key_string(k))).collect())
    }

    /// Whether this key has grown long enough to warrant rebalancing its
    /// container. Checked after a key has just been allocated, never
    /// proactively.
    pub fn needs_rebalance(&self) -> bool {
        self.exceeds(REBALANCE_THRESHOLD)
    }

    /// Length check against an explicit threshold.
    pub fn exceeds(&self, threshold: usize) -> bool {
        self.0.len() > threshold
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a stored key string without validation (trusted input from the
    /// store; keys are validated when allocated).
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Internal helpers operate on byte slices; every byte is ASCII from DIGITS,
// so the final String conversion cannot fail.
fn into_key_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_default()
}

fn digit_index(d: u8) -> Option<usize> {
    match d {
        b'0'..=b'9' => Some((d - b'0') as usize),
        b'A'..=b'Z' => Some((d - b'A') as usize + 10),
        b'a'..=b'z' => Some((d - b'a') as usize + 36),
        _ => None,
    }
}

fn invalid_key(key: &[u8]) -> KanbanError {
    KanbanError::InvalidPositionKey {
        key: String::from_utf8_lossy(key).into_owned(),
    }
}

/// Integer-part length encoded in the head byte: `a`..`z` are non-negative
/// integers of length 2..27, `Z`..`A` are negative integers of length 2..27.
fn integer_length(key: &[u8]) -> Result<usize> {
    match key.first() {
        Some(head @ b'a'..=b'z') => Ok((head - b'a') as usize + 2),
        Some(head @ b'A'..=b'Z') => Ok((b'Z' - head) as usize + 2),
        _ => Err(invalid_key(key)),
    }
}

/// The floor of the key space: `A` followed by 26 zeros. Not itself a valid
/// key; keys below every integer nest into its fraction space.
fn smallest_integer() -> Vec<u8> {
    let mut floor = vec![b'A'];
    floor.extend(std::iter::repeat(b'0').take(26));
    floor
}

fn integer_part(key: &[u8]) -> Result<&[u8]> {
    let len = integer_length(key)?;
    if len > key.len() {
        return Err(invalid_key(key));
    }
    Ok(&key[..len])
}

fn validate(key: &[u8]) -> Result<()> {
    if key.iter().any(|&b| digit_index(b).is_none()) {
        return Err(invalid_key(key));
    }
    if key == smallest_integer().as_slice() {
        return Err(invalid_key(key));
    }
    let int = integer_part(key)?;
    let frac = &key[int.len()..];
    // A trailing zero in the fraction would make midpoints ambiguous.
    if frac.last() == Some(&b'0') {
        return Err(invalid_key(key));
    }
    Ok(())
}

/// Increment an integer key by one. Returns `None` at the top of the key
/// space (`z` followed by all `z`s).
fn increment_integer(x: &[u8]) -> Option<Vec<u8>> {
    let head = x[0];
    let mut digs = x[1..].to_vec();
    for i in (0..digs.len()).rev() {
        match digit_index(digs[i]) {
            Some(d) if d + 1 < DIGITS.len() => {
                digs[i] = DIGITS[d + 1];
                let mut out = vec![head];
                out.extend(digs);
                return Some(out);
            }
            _ => digs[i] = DIGITS[0],
        }
    }
    // Carry past every digit: move to the next head, adjusting length.
    let new_head = match head {
        b'Z' => return Some(vec![b'a', DIGITS[0]]),
        b'z' => return None,
        h => h + 1,
    };
    if new_head > b'a' {
        digs.push(DIGITS[0]);
    } else {
        digs.pop();
    }
    let mut out = vec![new_head];
    out.extend(digs);
    Some(out)
}

/// Decrement an integer key by one. Returns `None` at the floor of the key
/// space.
fn decrement_integer(x: &[u8]) -> Option<Vec<u8>> {
    let head = x[0];
    let mut digs = x[1..].to_vec();
    for i in (0..digs.len()).rev() {
        match digit_index(digs[i]) {
            Some(d) if d > 0 => {
                digs[i] = DIGITS[d - 1];
                let mut out = vec![head];
                out.extend(digs);
                return Some(out);
            }
            _ => digs[i] = DIGITS[61],
        }
    }
    // Borrow past every digit: move to the previous head, adjusting length.
    let new_head = match head {
        b'a' => return Some(vec![b'Z', DIGITS[61]]),
        b'A' => return None,
        h => h - 1,
    };
    if new_head < b'Z' {
        digs.push(DIGITS[61]);
    } else {
        digs.pop();
    }
    let mut out = vec![new_head];
    out.extend(digs);
    Some(out)
}

/// Midpoint of two fraction strings, `a < b` byte-wise. An empty `a` is the
/// low end; `b == None` is the high end of the fraction space.
fn midpoint(a: &[u8], b: Option<&[u8]>) -> Result<Vec<u8>> {
    if let Some(b) = b {
        // Shared prefix passes through unchanged.
        let mut n = 0;
        while n < b.len() && a.get(n).copied().unwrap_or(b'0') == b[n] {
            n += 1;
        }
        if n > 0 {
            let mut out = b[..n].to_vec();
            let rest_a = if n <= a.len() { &a[n..] } else { &[][..] };
            out.extend(midpoint(rest_a, Some(&b[n..]))?);
            return Ok(out);
        }
    }
    let digit_a = match a.first() {
        Some(&d) => digit_index(d).ok_or_else(|| invalid_key(a))?,
        None => 0,
    };
    let digit_b = match b {
        Some(b) => match b.first() {
            Some(&d) => digit_index(d).ok_or_else(|| invalid_key(b))?,
            None => DIGITS.len(),
        },
        None => DIGITS.len(),
    };
    if digit_b - digit_a > 1 {
        // Round-half-up keeps the midpoint centered for the common
        // append/prepend cases.
        let mid = (digit_a + digit_b + 1) / 2;
        return Ok(vec![DIGITS[mid]]);
    }
    // Consecutive digits: take b's first digit if it has room behind it,
    // otherwise recurse below a's remainder.
    match b {
        Some(b) if b.len() > 1 => Ok(vec![b[0]]),
        _ => {
            let mut out = vec![DIGITS[digit_a]];
            let rest_a = if a.is_empty() { &[][..] } else { &a[1..] };
            out.extend(midpoint(rest_a, None)?);
            Ok(out)
        }
    }
}

fn key_between(a: Option<&[u8]>, b: Option<&[u8]>) -> Result<Vec<u8>> {
    if let Some(a) = a {
        validate(a)?;
    }
    if let Some(b) = b {
        validate(b)?;
    }
    if let (Some(a), Some(b)) = (a, b) {
        if a >= b {
            return Err(KanbanError::InvalidPositionBounds {
                lower: String::from_utf8_lossy(a).into_owned(),
                upper: String::from_utf8_lossy(b).into_owned(),
            });
        }
    }
    match (a, b) {
        (None, None) => Ok(b"a0".to_vec()),
        (None, Some(b)) => {
            let int_b = integer_part(b)?;
            let frac_b = &b[int_b.len()..];
            if int_b == smallest_integer().as_slice() {
                let mut out = int_b.to_vec();
                out.extend(midpoint(&[], Some(frac_b))?);
                return Ok(out);
            }
            if int_b.len() < b.len() {
                // b has a fraction, so its bare integer part sits below it.
                return Ok(int_b.to_vec());
            }
            decrement_integer(int_b).ok_or(KanbanError::PositionSpaceExhausted)
        }
        (Some(a), None) => {
            let int_a = integer_part(a)?;
            let frac_a = &a[int_a.len()..];
            match increment_integer(int_a) {
                Some(next) => Ok(next),
                None => {
                    let mut out = int_a.to_vec();
                    out.extend(midpoint(frac_a, None)?);
                    Ok(out)
                }
            }
        }
        (Some(a), Some(b)) => {
            let int_a = integer_part(a)?;
            let frac_a = &a[int_a.len()..];
            let int_b = integer_part(b)?;
            let frac_b = &b[int_b.len()..];
            if int_a == int_b {
                let mut out = int_a.to_vec();
                out.extend(midpoint(frac_a, Some(frac_b))?);
                return Ok(out);
            }
            let next = increment_integer(int_a).ok_or(KanbanError::PositionSpaceExhausted)?;
            if next.as_slice() < b {
                Ok(next)
            } else {
                let mut out = int_a.to_vec();
                out.extend(midpoint(frac_a, None)?);
                Ok(out)
            }
        }
    }
}

fn n_keys_between(a: Option<&[u8]>, b: Option<&[u8]>, n: usize) -> Result<Vec<Vec<u8>>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![key_between(a, b)?]);
    }
    if b.is_none() {
        // Walk upward from a.
        let mut current = key_between(a, None)?;
        let mut out = Vec::with_capacity(n);
        out.push(current.clone());
        for _ in 0..n - 1 {
            current = key_between(Some(&current), None)?;
            out.push(current.clone());
        }
        return Ok(out);
    }
    if a.is_none() {
        // Walk downward from b, then reverse.
        let mut current = key_between(None, b)?;
        let mut out = Vec::with_capacity(n);
        out.push(current.clone());
        for _ in 0..n - 1 {
            current = key_between(None, Some(&current))?;
            out.push(current.clone());
        }
        out.reverse();
        return Ok(out);
    }
    // Both bounds present: recurse around the midpoint for even spacing.
    let mid_count = n / 2;
    let center = key_between(a, b)?;
    let mut out = n_keys_between(a, Some(&center), mid_count)?;
    out.push(center.clone());
    out.extend(n_keys_between(Some(&center), b, n - mid_count - 1)?);
    Ok(out)
}
