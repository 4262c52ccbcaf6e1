/// Compute the log-base-two of the next power of two: 8 -> 3, 9 -> 4.
///
pub fn ceil_log2(x: usize) -> usize {
    let mut n = 0;
    while 1 << n < x {
        n += 1
    }
    n
}

/// Return the rank that forwards a binomial-tree broadcast to `rank`: the
/// rank with the lowest set bit of `rank` cleared. Not meaningful for rank 0.
///
pub fn binomial_parent(rank: usize) -> usize {
    rank & rank.wrapping_sub(1)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{binomial_parent, ceil_log2};

    #[test]
    fn ceil_log2_rounds_up() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(8), 3);
        assert_eq!(ceil_log2(9), 4);
    }

    #[test]
    fn binomial_parent_clears_lowest_bit() {
        assert_eq!(binomial_parent(1), 0);
        assert_eq!(binomial_parent(6), 4);
        assert_eq!(binomial_parent(7), 6);
        assert_eq!(binomial_parent(8), 0);
    }
}
