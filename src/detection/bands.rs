use crate::models::Outline;

/// Horizontal pixel span of an outline, shrunk by half a pixel at each end.
fn inner_extent(outline: &Outline) -> (f64, f64) {
    let bbox = outline.bounding_box();
    (bbox.x as f64 + 0.5, (bbox.x + bbox.width) as f64 - 0.5)
}

/// Horizontal pixel span of an outline, widened by half a pixel at each end.
fn outer_extent(outline: &Outline) -> (f64, f64) {
    let bbox = outline.bounding_box();
    (bbox.x as f64 - 0.5, (bbox.x + bbox.width) as f64 + 0.5)
}

fn overlaps(candidate: &Outline, accepted: &Outline) -> bool {
    let (start, end) = inner_extent(candidate);
    let (lo, hi) = outer_extent(accepted);
    (lo..=hi).contains(&start) || (lo..=hi).contains(&end)
}

/// Drop outlines whose horizontal extent overlaps one already accepted.
///
/// The first outline seen wins and input order is preserved.
pub fn dedup_bands(outlines: Vec<Outline>) -> Vec<Outline> {
    let mut accepted: Vec<Outline> = Vec::with_capacity(outlines.len());

    for outline in outlines {
        if !accepted.iter().any(|kept| overlaps(&outline, kept)) {
            accepted.push(outline);
        }
    }

    accepted
}

/// Top-down merge sort keyed by `key`, evaluated afresh at every comparison.
///
/// On equal keys the element from the left half goes first, so the sort is
/// stable.
pub fn merge_sort_by_key<T, K, F>(mut items: Vec<T>, key: &F) -> Vec<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by_key(items, key);
    let right = merge_sort_by_key(right, key);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => key(l) <= key(r),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }

    merged
}

/// Order bands left to right by centroid x.
pub fn order_bands(outlines: Vec<Outline>) -> Vec<Outline> {
    merge_sort_by_key(outlines, &Outline::centroid_x)
}
