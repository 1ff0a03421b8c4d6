//! Offset mapping between linear plain-text positions and text-node positions.
//!
//! The algorithms here are generic over the node handle type so the same walk
//! drives the browser DOM (`web_sys::Node`) and the in-memory trees used in
//! tests. Callers supply text nodes in depth-first document order together with
//! their UTF-16 length. Nothing is retained between calls; every mapping
//! restarts the walk from the first node.

/// A position inside a specific text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePoint<N> {
    pub node: N,
    /// UTF-16 offset within the node's character data.
    pub offset: usize,
}

impl<N> NodePoint<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A located range, ready to be installed as a native selection.
///
/// `end` is `None` for collapsed requests: only the start node is searched
/// and the range stays collapsed at `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePoints<N> {
    pub start: NodePoint<N>,
    pub end: Option<NodePoint<N>>,
}

/// Resolve an anchor/focus pair of node positions into `[start, end]` offsets.
///
/// The anchor and focus are resolved independently, so they can complete in
/// either order. Returns `[0, 0]` when either side is missing or neither is
/// found among `nodes`.
pub fn resolve_offsets<N, I>(
    nodes: I,
    anchor: Option<(&N, usize)>,
    focus: Option<(&N, usize)>,
) -> crate::Offsets
where
    N: PartialEq,
    I: IntoIterator<Item = (N, usize)>,
{
    let (Some((anchor_node, anchor_offset)), Some((focus_node, focus_offset))) = (anchor, focus)
    else {
        return crate::Offsets::default();
    };

    let mut start = 0;
    let mut end = 0;
    let mut resolved_start: Option<usize> = None;
    let mut resolved_end: Option<usize> = None;

    for (node, len) in nodes {
        if resolved_start.is_none() {
            if &node == anchor_node {
                resolved_start = Some(start + anchor_offset);
            } else {
                start += len;
            }
        }

        if resolved_end.is_none() {
            if &node == focus_node {
                resolved_end = Some(end + focus_offset);
            } else {
                end += len;
            }
        }

        if let (Some(start), Some(end)) = (resolved_start, resolved_end) {
            return crate::Offsets::new(start, end);
        }
    }

    tracing::trace!(
        target: "highlightable::selection",
        "selection endpoints not found among text nodes"
    );
    crate::Offsets::default()
}

/// Locate the text-node points for a pair of plain-text offsets.
///
/// Reversed pairs are swapped before the walk; the caller restores the
/// logical direction by collapsing afterwards. Returns `None` when the
/// offsets run past the available text.
pub fn locate_range<N, I>(nodes: I, offsets: crate::Offsets) -> Option<RangePoints<N>>
where
    N: Clone,
    I: IntoIterator<Item = (N, usize)>,
{
    let collapsed = offsets.is_collapsed();
    let ordered = offsets.normalize();
    let mut remaining_start = ordered.start;
    let mut remaining_end = ordered.end;
    let mut start_node: Option<N> = None;
    let mut end_node: Option<N> = None;

    for (node, len) in nodes {
        if start_node.is_none() {
            if remaining_start > len {
                remaining_start -= len;
            } else {
                start_node = Some(node.clone());
            }
        }

        if end_node.is_none() && !collapsed {
            if remaining_end > len {
                remaining_end -= len;
            } else {
                end_node = Some(node);
            }
        }

        if start_node.is_some() && (end_node.is_some() || collapsed) {
            break;
        }
    }

    let start = NodePoint::new(start_node?, remaining_start);
    if collapsed {
        return Some(RangePoints { start, end: None });
    }
    Some(RangePoints {
        start,
        end: Some(NodePoint::new(end_node?, remaining_end)),
    })
}

/// The points spanning all text: offset 0 of the first node to the end of the last.
///
/// Returns `None` when there are no text nodes; callers then fall back to
/// selecting the root element's contents.
pub fn span_all<N, I>(nodes: I) -> Option<RangePoints<N>>
where
    N: Clone,
    I: IntoIterator<Item = (N, usize)>,
{
    let mut first: Option<N> = None;
    let mut last: Option<(N, usize)> = None;

    for (node, len) in nodes {
        if first.is_none() {
            first = Some(node.clone());
        }
        last = Some((node, len));
    }

    let first = first?;
    let (last, len) = last?;
    Some(RangePoints {
        start: NodePoint::new(first, 0),
        end: Some(NodePoint::new(last, len)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Offsets;
    use crate::text::utf16_len;

    /// Text nodes of a fake tree as `(node id, utf16 length)`.
    fn nodes(parts: &[&str]) -> Vec<(usize, usize)> {
        parts
            .iter()
            .enumerate()
            .map(|(id, text)| (id, utf16_len(text)))
            .collect()
    }

    /// Install `offsets` the way the browser mapper does and read them back.
    fn round_trip(parts: &[&str], offsets: Offsets) -> Offsets {
        let tree = nodes(parts);
        let points = locate_range(tree.clone(), offsets).expect("offsets in range");
        let start = (points.start.node, points.start.offset);
        let end = points
            .end
            .map(|p| (p.node, p.offset))
            .unwrap_or(start);
        resolve_offsets(tree, Some((&start.0, start.1)), Some((&end.0, end.1)))
    }

    #[test]
    fn test_resolve_offsets_across_nodes() {
        // "hello " + <mark>"@world"</mark>
        let tree = nodes(&["hello ", "@world"]);
        let offsets = resolve_offsets(tree, Some((&0, 2)), Some((&1, 6)));
        assert_eq!(offsets, Offsets::new(2, 12));
    }

    #[test]
    fn test_resolve_offsets_focus_before_anchor() {
        let tree = nodes(&["ab", "cd", "ef"]);
        let offsets = resolve_offsets(tree, Some((&2, 1)), Some((&0, 1)));
        assert_eq!(offsets, Offsets::new(5, 1));
    }

    #[test]
    fn test_resolve_offsets_without_selection() {
        let tree = nodes(&["abc"]);
        assert_eq!(resolve_offsets(tree, None, Some((&0, 1))), Offsets::new(0, 0));
    }

    #[test]
    fn test_resolve_offsets_on_empty_root() {
        let tree: Vec<(usize, usize)> = Vec::new();
        assert_eq!(
            resolve_offsets(tree, Some((&0, 0)), Some((&0, 0))),
            Offsets::new(0, 0)
        );
    }

    #[test]
    fn test_locate_collapsed_skips_end_search() {
        let points = locate_range(nodes(&["abc", "def"]), Offsets::caret(4)).unwrap();
        assert_eq!(points.start, NodePoint::new(1, 1));
        assert!(points.end.is_none());
    }

    #[test]
    fn test_locate_prefers_earlier_node_at_boundary() {
        let points = locate_range(nodes(&["abc", "def"]), Offsets::caret(3)).unwrap();
        assert_eq!(points.start, NodePoint::new(0, 3));
    }

    #[test]
    fn test_locate_reversed_swaps_endpoints() {
        let points = locate_range(nodes(&["abc", "def"]), Offsets::new(5, 1)).unwrap();
        assert_eq!(points.start, NodePoint::new(0, 1));
        assert_eq!(points.end, Some(NodePoint::new(1, 2)));
    }

    #[test]
    fn test_locate_out_of_range_is_none() {
        assert!(locate_range(nodes(&["abc"]), Offsets::new(1, 9)).is_none());
        assert!(locate_range(nodes(&["abc"]), Offsets::caret(4)).is_none());
        assert!(locate_range(Vec::<(usize, usize)>::new(), Offsets::caret(0)).is_none());
    }

    #[test]
    fn test_offset_round_trip() {
        let layouts: &[&[&str]] = &[
            &["hello world"],
            &["hello ", "@world"],
            &["a", "", "bc", "d"],
            &["😀x", "y"],
        ];

        for parts in layouts {
            let total: usize = parts.iter().map(|p| utf16_len(p)).sum();
            for start in 0..=total {
                for end in start..=total {
                    let offsets = Offsets::new(start, end);
                    assert_eq!(
                        round_trip(parts, offsets),
                        offsets,
                        "layout {parts:?} offsets {offsets:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_span_all() {
        let points = span_all(nodes(&["ab", "cde"])).unwrap();
        assert_eq!(points.start, NodePoint::new(0, 0));
        assert_eq!(points.end, Some(NodePoint::new(1, 3)));
        assert!(span_all(Vec::<(usize, usize)>::new()).is_none());
    }
}
