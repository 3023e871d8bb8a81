//! Merging of the two configuration sources.

use crate::WorkItem;

/// Concatenates command-line items and descriptor items, in that order.
///
/// No deduplication or conflict detection is done: two items targeting the
/// same directory are both kept and run independently.
///
/// # Examples
///
/// ```
/// use unjar_core::WorkItem;
/// use unjar_core::merge;
///
/// let cli = vec![WorkItem::new("/data", "a", "http://example.com/a.jar")];
/// let descriptor = vec![WorkItem::new("/srv/app/node_modules", "b", "http://example.com/b.jar")];
///
/// let merged = merge(cli.clone(), descriptor.clone());
/// assert_eq!(merged, [cli, descriptor].concat());
/// ```
#[must_use]
pub fn merge(cli: Vec<WorkItem>, descriptor: Vec<WorkItem>) -> Vec<WorkItem> {
    let mut merged = cli;
    merged.extend(descriptor);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_duplicates() {
        let item = WorkItem::new("/data", "app", "http://example.com/x.jar");
        let merged = merge(vec![item.clone()], vec![item.clone()]);
        assert_eq!(merged, vec![item.clone(), item]);
    }

    #[test]
    fn test_merge_empty_sources() {
        assert!(merge(Vec::new(), Vec::new()).is_empty());

        let item = WorkItem::new("/data", "app", "http://example.com/x.jar");
        assert_eq!(merge(Vec::new(), vec![item.clone()]), vec![item]);
    }
}
