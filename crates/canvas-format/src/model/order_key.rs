//! Fractional order keys.
//!
//! Sibling order is stored as base-62 strings that sort lexicographically
//! in render order. A key is an integer part (head character encodes its
//! length) followed by an optional fraction, so a new key can always be
//! generated between two existing ones without renumbering.
//!
//! ```rust
//! use canvas_format::model::order_key::{key_between, n_keys_between};
//!
//! let first = key_between(None, None).unwrap();
//! assert_eq!(first, "a0");
//!
//! let next = key_between(Some(&first), None).unwrap();
//! let middle = key_between(Some(&first), Some(&next)).unwrap();
//! assert!(first < middle && middle < next);
//!
//! let keys = n_keys_between(None, None, 3).unwrap();
//! assert_eq!(keys, ["a0", "a1", "a2"]);
//! ```

use crate::error::OrderKeyError;
use crate::limits::MAX_ORDER_KEY_LEN;

/// Base-62 digits in ascending byte order.
pub const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const ZERO: u8 = DIGITS[0];
const LAST: u8 = DIGITS[61];

/// The smallest integer part; reserved so there is always room below.
const SMALLEST_INTEGER: &str = "A00000000000000000000000000";

fn digit_index(c: u8) -> Option<usize> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as usize),
        b'A'..=b'Z' => Some((c - b'A') as usize + 10),
        b'a'..=b'z' => Some((c - b'a') as usize + 36),
        _ => None,
    }
}

fn integer_len(head: u8) -> Option<usize> {
    match head {
        b'a'..=b'z' => Some((head - b'a') as usize + 2),
        b'A'..=b'Z' => Some((b'Z' - head) as usize + 2),
        _ => None,
    }
}

fn invalid(key: &[u8], reason: &'static str) -> OrderKeyError {
    OrderKeyError::InvalidKey {
        key: key_string(key),
        reason,
    }
}

fn key_string(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

fn integer_part(key: &[u8]) -> Result<&[u8], OrderKeyError> {
    let head = *key.first().ok_or_else(|| invalid(key, "empty key"))?;
    let len = integer_len(head).ok_or_else(|| invalid(key, "invalid integer head"))?;
    if len > key.len() {
        return Err(invalid(key, "integer part is truncated"));
    }
    Ok(&key[..len])
}

/// Checks that `key` is a well-formed order key.
pub fn validate_order_key(key: &str) -> Result<(), OrderKeyError> {
    let bytes = key.as_bytes();
    if bytes.len() > MAX_ORDER_KEY_LEN {
        return Err(invalid(bytes, "key exceeds maximum length"));
    }
    if bytes.iter().any(|b| digit_index(*b).is_none()) {
        return Err(invalid(bytes, "key contains a non base-62 character"));
    }
    if key == SMALLEST_INTEGER {
        return Err(invalid(bytes, "key is the reserved smallest integer"));
    }
    let integer = integer_part(bytes)?;
    if bytes.len() > integer.len() && bytes.last() == Some(&ZERO) {
        return Err(invalid(bytes, "fraction has a trailing zero"));
    }
    Ok(())
}

fn validate_integer(int: &[u8]) -> Result<(), OrderKeyError> {
    match int.first().and_then(|h| integer_len(*h)) {
        Some(len) if len == int.len() => Ok(()),
        _ => Err(invalid(int, "invalid integer part")),
    }
}

/// Returns a fraction strictly between `a` and `b` (`None` = 1).
fn midpoint(a: &[u8], b: Option<&[u8]>) -> Result<Vec<u8>, OrderKeyError> {
    if let Some(b) = b {
        if a >= b {
            return Err(OrderKeyError::BoundsOutOfOrder {
                lower: key_string(a),
                upper: key_string(b),
            });
        }
    }
    if a.last() == Some(&ZERO) || b.and_then(|b| b.last()) == Some(&ZERO) {
        return Err(invalid(a, "fraction has a trailing zero"));
    }

    if let Some(b) = b {
        // Shared prefix, treating a missing digit of `a` as zero.
        let mut n = 0;
        while n < b.len() && a.get(n).copied().unwrap_or(ZERO) == b[n] {
            n += 1;
        }
        if n > 0 {
            let mut out = b[..n].to_vec();
            out.extend(midpoint(a.get(n..).unwrap_or(&[]), Some(&b[n..]))?);
            return Ok(out);
        }
    }

    let digit_a = match a.first() {
        Some(c) => digit_index(*c).ok_or_else(|| invalid(a, "invalid digit"))?,
        None => 0,
    };
    let digit_b = match b {
        Some(b) => {
            let first = *b.first().ok_or_else(|| invalid(b, "empty fraction"))?;
            digit_index(first).ok_or_else(|| invalid(b, "invalid digit"))?
        }
        None => DIGITS.len(),
    };

    if digit_b > digit_a + 1 {
        let mid = (digit_a + digit_b + 1) / 2;
        Ok(vec![DIGITS[mid]])
    } else if let Some(b) = b.filter(|b| b.len() > 1) {
        Ok(b[..1].to_vec())
    } else {
        let mut out = vec![DIGITS[digit_a]];
        out.extend(midpoint(a.get(1..).unwrap_or(&[]), None)?);
        Ok(out)
    }
}

fn increment_integer(x: &[u8]) -> Result<Option<Vec<u8>>, OrderKeyError> {
    validate_integer(x)?;
    let head = x[0];
    let mut digits = x[1..].to_vec();
    let mut carry = true;
    for d in digits.iter_mut().rev() {
        let next = digit_index(*d).map_or(DIGITS.len(), |i| i + 1);
        if next == DIGITS.len() {
            *d = ZERO;
        } else {
            *d = DIGITS[next];
            carry = false;
            break;
        }
    }
    if !carry {
        let mut out = vec![head];
        out.extend(digits);
        return Ok(Some(out));
    }
    match head {
        b'Z' => Ok(Some(vec![b'a', ZERO])),
        b'z' => Ok(None),
        _ => {
            let h = head + 1;
            if h > b'a' {
                digits.push(ZERO);
            } else {
                digits.pop();
            }
            let mut out = vec![h];
            out.extend(digits);
            Ok(Some(out))
        }
    }
}

fn decrement_integer(x: &[u8]) -> Result<Option<Vec<u8>>, OrderKeyError> {
    validate_integer(x)?;
    let head = x[0];
    let mut digits = x[1..].to_vec();
    let mut borrow = true;
    for d in digits.iter_mut().rev() {
        match digit_index(*d) {
            Some(0) | None => *d = LAST,
            Some(i) => {
                *d = DIGITS[i - 1];
                borrow = false;
                break;
            }
        }
    }
    if !borrow {
        let mut out = vec![head];
        out.extend(digits);
        return Ok(Some(out));
    }
    match head {
        b'a' => Ok(Some(vec![b'Z', LAST])),
        b'A' => Ok(None),
        _ => {
            let h = head - 1;
            if h < b'Z' {
                digits.push(LAST);
            } else {
                digits.pop();
            }
            let mut out = vec![h];
            out.extend(digits);
            Ok(Some(out))
        }
    }
}

fn concat(prefix: &[u8], suffix: Vec<u8>) -> String {
    let mut out = prefix.to_vec();
    out.extend(suffix);
    key_string(&out)
}

/// Generates a key strictly between `a` and `b`.
///
/// `None` bounds stand for the start and end of the key space. Both
/// bounds must be valid keys and `a < b` must hold.
pub fn key_between(a: Option<&str>, b: Option<&str>) -> Result<String, OrderKeyError> {
    if let Some(a) = a {
        validate_order_key(a)?;
    }
    if let Some(b) = b {
        validate_order_key(b)?;
    }
    if let (Some(a), Some(b)) = (a, b) {
        if a >= b {
            return Err(OrderKeyError::BoundsOutOfOrder {
                lower: a.to_owned(),
                upper: b.to_owned(),
            });
        }
    }

    match (a.map(str::as_bytes), b.map(str::as_bytes)) {
        (None, None) => Ok(concat(b"a", vec![ZERO])),
        (None, Some(b)) => {
            let ib = integer_part(b)?;
            let fb = &b[ib.len()..];
            if ib == SMALLEST_INTEGER.as_bytes() {
                return Ok(concat(ib, midpoint(&[], Some(fb))?));
            }
            if ib.len() < b.len() {
                return Ok(key_string(ib));
            }
            let prev = decrement_integer(ib)?.ok_or(OrderKeyError::Exhausted)?;
            Ok(key_string(&prev))
        }
        (Some(a), None) => {
            let ia = integer_part(a)?;
            let fa = &a[ia.len()..];
            match increment_integer(ia)? {
                Some(next) => Ok(key_string(&next)),
                None => Ok(concat(ia, midpoint(fa, None)?)),
            }
        }
        (Some(a), Some(b)) => {
            let ia = integer_part(a)?;
            let fa = &a[ia.len()..];
            let ib = integer_part(b)?;
            let fb = &b[ib.len()..];
            if ia == ib {
                return Ok(concat(ia, midpoint(fa, Some(fb))?));
            }
            let next = increment_integer(ia)?.ok_or(OrderKeyError::Exhausted)?;
            if next.as_slice() < b {
                return Ok(key_string(&next));
            }
            Ok(concat(ia, midpoint(fa, None)?))
        }
    }
}

/// Generates `n` ascending keys strictly between `a` and `b`.
///
/// With both bounds open the keys are consecutive integers starting at
/// `"a0"`. With both bounds set the range is bisected recursively so the
/// keys stay short.
pub fn n_keys_between(
    a: Option<&str>,
    b: Option<&str>,
    n: usize,
) -> Result<Vec<String>, OrderKeyError> {
    match n {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![key_between(a, b)?]),
        _ => {}
    }

    match (a, b) {
        (_, None) => {
            let mut keys = Vec::with_capacity(n);
            let mut current = key_between(a, None)?;
            for _ in 1..n {
                let next = key_between(Some(&current), None)?;
                keys.push(std::mem::replace(&mut current, next));
            }
            keys.push(current);
            Ok(keys)
        }
        (None, Some(_)) => {
            let mut keys = Vec::with_capacity(n);
            let mut current = key_between(None, b)?;
            for _ in 1..n {
                let prev = key_between(None, Some(&current))?;
                keys.push(std::mem::replace(&mut current, prev));
            }
            keys.push(current);
            keys.reverse();
            Ok(keys)
        }
        (Some(_), Some(_)) => {
            let mid = n / 2;
            let c = key_between(a, b)?;
            let mut keys = n_keys_between(a, Some(&c), mid)?;
            keys.push(c.clone());
            keys.extend(n_keys_between(Some(&c), b, n - mid - 1)?);
            Ok(keys)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn between(a: Option<&str>, b: Option<&str>) -> String {
        key_between(a, b).unwrap()
    }

    #[test]
    fn test_known_keys() {
        assert_eq!(between(None, None), "a0");
        assert_eq!(between(Some("a0"), None), "a1");
        assert_eq!(between(None, Some("a0")), "Zz");
        assert_eq!(between(Some("a0"), Some("a1")), "a0V");
        assert_eq!(between(Some("a0V"), Some("a1")), "a0l");
        assert_eq!(between(Some("Zz"), Some("a0")), "ZzV");
        assert_eq!(between(Some("a1"), Some("a2")), "a1V");
        assert_eq!(between(Some("az"), None), "b00");
    }

    #[test]
    fn test_rejects_out_of_order_bounds() {
        let k1 = between(None, None);
        let k2 = between(Some(&k1), None);
        assert!(matches!(
            key_between(Some(&k2), Some(&k1)),
            Err(OrderKeyError::BoundsOutOfOrder { .. })
        ));
        assert!(key_between(Some(&k1), Some(&k1)).is_err());
    }

    #[test]
    fn test_rejects_invalid_keys() {
        assert!(validate_order_key("").is_err());
        assert!(validate_order_key("a").is_err());
        assert!(validate_order_key("a0-").is_err());
        assert!(validate_order_key("a00").is_err());
        assert!(validate_order_key(SMALLEST_INTEGER).is_err());
        assert!(validate_order_key("a0V").is_ok());
        assert!(validate_order_key("Zz").is_ok());
    }

    #[test]
    fn test_many_insertions_at_start() {
        let mut prev: Option<String> = None;
        for _ in 0..100 {
            let key = between(None, prev.as_deref());
            if let Some(p) = &prev {
                assert!(key < *p);
            }
            prev = Some(key);
        }
    }

    #[test]
    fn test_many_insertions_at_end() {
        let mut prev: Option<String> = None;
        for _ in 0..100 {
            let key = between(prev.as_deref(), None);
            if let Some(p) = &prev {
                assert!(key > *p);
            }
            prev = Some(key);
        }
    }

    #[test]
    fn test_repeated_subdivision() {
        let k1 = between(None, None);
        let k2 = between(Some(&k1), None);
        let mut current = k1.clone();
        for _ in 0..40 {
            let next = between(Some(&current), Some(&k2));
            assert!(next > current && next < k2);
            current = next;
        }
    }

    #[test]
    fn test_n_keys() {
        assert!(n_keys_between(None, None, 0).unwrap().is_empty());
        assert_eq!(n_keys_between(None, None, 1).unwrap(), ["a0"]);

        let keys = n_keys_between(None, None, 100).unwrap();
        assert_eq!(keys.len(), 100);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));

        let before = n_keys_between(None, Some("a0"), 5).unwrap();
        assert!(before.windows(2).all(|w| w[0] < w[1]));
        assert!(before.iter().all(|k| k.as_str() < "a0"));

        let inside = n_keys_between(Some("a0"), Some("a1"), 10).unwrap();
        assert_eq!(inside.len(), 10);
        assert!(inside.windows(2).all(|w| w[0] < w[1]));
        assert!(inside.iter().all(|k| k.as_str() > "a0" && k.as_str() < "a1"));
    }
}
