//! Prime number helpers for hash table sizing.
//!
//! Double hashing only visits every slot when the probe step is coprime with
//! the table size, so the hash index keeps its capacity prime.

/// Check whether `n` is prime.
///
/// # Examples
///
/// ```
/// use sentilex::util::prime::is_prime;
///
/// assert!(is_prime(30011));
/// assert!(!is_prime(30012));
/// ```
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    // 6k ± 1 trial division
    let mut i = 5usize;
    while let Some(square) = i.checked_mul(i) {
        if square > n {
            break;
        }
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }

    true
}

/// Smallest prime greater than or equal to `n`, or `None` on overflow.
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}
