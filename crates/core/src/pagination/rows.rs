/// Splits items into rows of `width` for grid layouts; the last row may be shorter.
pub fn chunk_rows<T: Clone>(items: &[T], width: usize) -> Vec<Vec<T>> {
    items.chunks(width.max(1)).map(<[T]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_rows_of_three() {
        let rows = chunk_rows(&[1, 2, 3, 4, 5, 6, 7], 3);
        assert_eq!(rows, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn test_chunk_rows_empty() {
        let rows: Vec<Vec<u8>> = chunk_rows(&[], 3);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_chunk_rows_zero_width_is_one() {
        assert_eq!(chunk_rows(&[1, 2], 0), vec![vec![1], vec![2]]);
    }
}
