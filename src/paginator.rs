/// Split an ordered slice into fixed-size pages for display.
///
/// The final page may be shorter; a zero page size yields no pages.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    if page_size == 0 {
        return Vec::new();
    }
    items.chunks(page_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_full_and_partial_pages() {
        let items = [1, 2, 3, 4, 5];
        let pages = paginate(&items, 2);
        assert_eq!(pages, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
    }

    #[test]
    fn page_larger_than_input_is_single_page() {
        let items = [1, 2, 3];
        let pages = paginate(&items, 10);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0], &items[..]);
    }

    #[test]
    fn empty_input_has_no_pages() {
        let items: [i32; 0] = [];
        assert!(paginate(&items, 3).is_empty());
    }

    #[test]
    fn zero_page_size_has_no_pages() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 0).is_empty());
    }
}
