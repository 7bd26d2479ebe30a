//! Per-axis arithmetic: gray code ordering and wrap-around intervals.
//!
//! A Karnaugh axis of length `2^k` is cyclic. Intervals on it are stored as
//! `start..=end` walking forward from `start`, wrapping past the last index.
//! All helpers expect indices already inside `0..len`.

/// Bit pattern represented by position `index` along an axis
pub fn gray(index: usize) -> usize {
    index ^ (index >> 1)
}

/// Position along an axis of the bit pattern `code`
pub fn gray_inverse(code: usize) -> usize {
    let mut index = code;
    let mut shift = code >> 1;
    while shift != 0 {
        index ^= shift;
        shift >>= 1;
    }
    index
}

/// Gray-code header label for `index`, `bits` digits wide
pub fn gray_label(index: usize, bits: usize) -> String {
    if bits == 0 {
        return String::new();
    }
    format!("{:0width$b}", gray(index), width = bits)
}

/// Forward distance from `from` to `to` on a cyclic axis
pub fn forward_distance(from: usize, to: usize, len: usize) -> usize {
    (to + len - from) % len
}

/// Number of cells in the interval `start..=end`
pub fn span(start: usize, end: usize, len: usize) -> usize {
    forward_distance(start, end, len) + 1
}

/// Whether `index` is reached stepping forward from `start` to `end`
pub fn arc_contains(start: usize, end: usize, index: usize, len: usize) -> bool {
    forward_distance(start, index, len) <= forward_distance(start, end, len)
}

/// Whether two intervals share at least one index
pub fn arcs_intersect(a: (usize, usize), b: (usize, usize), len: usize) -> bool {
    arc_contains(a.0, a.1, b.0, len) || arc_contains(b.0, b.1, a.0, len)
}

/// Split an interval into at most two non-wrapping `(first, last)` runs
pub fn unwrap_arc(start: usize, end: usize, len: usize) -> Vec<(usize, usize)> {
    if start + forward_distance(start, end, len) < len {
        vec![(start, start + forward_distance(start, end, len))]
    } else {
        vec![(start, len - 1), (0, end)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_sequence() {
        let codes: Vec<usize> = (0..8).map(gray).collect();
        assert_eq!(codes, vec![0, 1, 3, 2, 6, 7, 5, 4]);
    }

    #[test]
    fn test_neighbours_differ_by_one_bit_including_wrap() {
        for bits in 1..=3 {
            let len = 1usize << bits;
            for i in 0..len {
                let next = (i + 1) % len;
                assert_eq!((gray(i) ^ gray(next)).count_ones(), 1, "len={len} i={i}");
            }
        }
    }

    #[test]
    fn test_gray_inverse_round_trip() {
        for i in 0..64 {
            assert_eq!(gray_inverse(gray(i)), i);
        }
    }

    #[test]
    fn test_gray_label() {
        assert_eq!(gray_label(2, 2), "11");
        assert_eq!(gray_label(3, 2), "10");
        assert_eq!(gray_label(1, 1), "1");
        assert_eq!(gray_label(0, 0), "");
    }

    #[test]
    fn test_span_wraps() {
        assert_eq!(span(0, 0, 4), 1);
        assert_eq!(span(0, 1, 4), 2);
        assert_eq!(span(3, 1, 4), 3);
        assert_eq!(span(3, 0, 4), 2);
        assert_eq!(span(1, 0, 4), 4);
        assert_eq!(span(0, 0, 1), 1);
    }

    #[test]
    fn test_arc_contains_wrapping_interval() {
        assert!(arc_contains(3, 0, 3, 4));
        assert!(arc_contains(3, 0, 0, 4));
        assert!(!arc_contains(3, 0, 1, 4));
        assert!(!arc_contains(3, 0, 2, 4));
    }

    #[test]
    fn test_arc_contains_plain_interval() {
        assert!(arc_contains(1, 2, 1, 4));
        assert!(arc_contains(1, 2, 2, 4));
        assert!(!arc_contains(1, 2, 0, 4));
        assert!(!arc_contains(1, 2, 3, 4));
    }

    #[test]
    fn test_arcs_intersect() {
        assert!(arcs_intersect((3, 0), (0, 1), 4));
        assert!(arcs_intersect((0, 3), (2, 2), 4));
        assert!(!arcs_intersect((3, 0), (1, 2), 4));
        assert!(!arcs_intersect((0, 0), (1, 1), 2));
    }

    #[test]
    fn test_unwrap_arc() {
        assert_eq!(unwrap_arc(1, 2, 4), vec![(1, 2)]);
        assert_eq!(unwrap_arc(3, 0, 4), vec![(3, 3), (0, 0)]);
        assert_eq!(unwrap_arc(2, 1, 4), vec![(2, 3), (0, 1)]);
        assert_eq!(unwrap_arc(0, 3, 4), vec![(0, 3)]);
    }
}
