use std::borrow::Cow;

/// Deterministic stride subsample down to at most `max_count` items.
///
/// Inputs that already fit are returned borrowed and untouched. Otherwise item
/// `i` of the output is `items[floor(i * len / max_count)]`, clamped to the last index.
pub fn sample<T: Clone>(items: &[T], max_count: usize) -> Cow<'_, [T]> {
    if items.len() <= max_count {
        return Cow::Borrowed(items);
    }
    let last = items.len() - 1;
    let step = items.len() as f64 / max_count as f64;
    Cow::Owned(
        (0..max_count)
            .map(|i| items[((i as f64 * step) as usize).min(last)].clone())
            .collect(),
    )
}
