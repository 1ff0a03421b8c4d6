//! DOM implementation of the selection mapper.
//!
//! Walks the text-node descendants of the editable root with a `TreeWalker`
//! and feeds them to the offset algorithms in `highlightable_core::selection`.

use highlightable_core::{
    Collapse, NodePoint, Offsets, PlatformError, RangePoints, SelectOffsets, SelectOptions,
    SelectionPlatform, locate_range, resolve_offsets, span_all, utf16_len,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Node, TreeWalker};

/// `NodeFilter.SHOW_TEXT`.
const SHOW_TEXT: u32 = 0x4;

/// Text nodes under a root in document order, with their UTF-16 lengths.
///
/// Each instance starts a fresh walk from the root.
pub struct TextNodes {
    walker: TreeWalker,
}

impl TextNodes {
    pub fn new(root: &Node) -> Result<Self, PlatformError> {
        let document = owner_document(root)?;
        let walker = document
            .create_tree_walker_with_what_to_show(root, SHOW_TEXT)
            .map_err(|e| format!("create_tree_walker failed: {:?}", e))?;
        Ok(Self { walker })
    }
}

impl Iterator for TextNodes {
    type Item = (Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.walker.next_node().ok().flatten()?;
        let len = node.text_content().map(|t| utf16_len(&t)).unwrap_or(0);
        Some((node, len))
    }
}

/// Selection mapper bound to one editable root.
#[derive(Clone, Debug)]
pub struct DomSelection {
    root: HtmlElement,
}

impl DomSelection {
    pub fn new(root: HtmlElement) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }
}

impl SelectionPlatform for DomSelection {
    fn selection(&self) -> Offsets {
        get_selection(&self.root)
    }

    fn select(&self, offsets: SelectOffsets, options: SelectOptions) {
        set_selection(&self.root, offsets, options)
    }
}

/// Read the current selection of `root` as `[anchor, focus]` plain-text offsets.
///
/// Returns `[0, 0]` when there is no selection, the selection lies outside
/// `root`, or `root` holds no text.
pub fn get_selection(root: &HtmlElement) -> Offsets {
    match try_get_selection(root) {
        Ok(offsets) => offsets,
        Err(e) => {
            tracing::warn!(target: "highlightable::cursor", "get_selection failed: {e}");
            Offsets::default()
        }
    }
}

fn try_get_selection(root: &HtmlElement) -> Result<Offsets, PlatformError> {
    let window = web_sys::window().ok_or("no window")?;
    let Some(selection) = window
        .get_selection()
        .map_err(|e| format!("get_selection failed: {:?}", e))?
    else {
        return Ok(Offsets::default());
    };

    let root: &Node = root.as_ref();
    let anchor = text_point(root, selection.anchor_node(), selection.anchor_offset())?;
    let focus = text_point(root, selection.focus_node(), selection.focus_offset())?;

    let offsets = resolve_offsets(
        TextNodes::new(root)?,
        anchor.as_ref().map(|p| (&p.node, p.offset)),
        focus.as_ref().map(|p| (&p.node, p.offset)),
    );

    tracing::trace!(
        target: "highlightable::cursor",
        start = offsets.start,
        end = offsets.end,
        "read selection"
    );
    Ok(offsets)
}

/// Normalize a selection boundary to a position inside a text node.
///
/// Browsers anchor selections on elements when the caret sits between
/// children (after `select_node_contents`, or in an empty line). Such a
/// boundary maps to the start of the first text node after it, or the end of
/// the last text node when none follows.
fn text_point(
    root: &Node,
    node: Option<Node>,
    offset: u32,
) -> Result<Option<NodePoint<Node>>, PlatformError> {
    let Some(node) = node else {
        return Ok(None);
    };
    if node.node_type() == Node::TEXT_NODE {
        return Ok(Some(NodePoint::new(node, offset as usize)));
    }
    if !root.contains(Some(&node)) {
        return Ok(None);
    }

    let boundary = owner_document(root)?
        .create_range()
        .map_err(|e| format!("create_range failed: {:?}", e))?;
    boundary
        .set_start(&node, offset)
        .map_err(|e| format!("set_start failed: {:?}", e))?;

    let mut last = None;
    for (text, len) in TextNodes::new(root)? {
        let position = boundary
            .compare_point(&text, 0)
            .map_err(|e| format!("compare_point failed: {:?}", e))?;
        if position >= 0 {
            return Ok(Some(NodePoint::new(text, 0)));
        }
        last = Some(NodePoint::new(text, len));
    }
    Ok(last)
}

/// Install a selection inside `root`.
///
/// Does nothing unless `root` is the active element or `options.force` is
/// set. Offsets past the end of the text are ignored.
pub fn set_selection(root: &HtmlElement, offsets: SelectOffsets, options: SelectOptions) {
    if let Err(e) = try_set_selection(root, offsets, options) {
        tracing::warn!(target: "highlightable::cursor", "set_selection failed: {e}");
    }
}

fn try_set_selection(
    root: &HtmlElement,
    offsets: SelectOffsets,
    options: SelectOptions,
) -> Result<(), PlatformError> {
    let node: &Node = root.as_ref();
    let document = owner_document(node)?;
    if !options.force && !is_active(root, &document) {
        return Ok(());
    }

    let range = document
        .create_range()
        .map_err(|e| format!("create_range failed: {:?}", e))?;

    match offsets {
        SelectOffsets::All => match span_all(TextNodes::new(node)?) {
            Some(points) => apply_points(&range, &points)?,
            None => range
                .select_node_contents(node)
                .map_err(|e| format!("select_node_contents failed: {:?}", e))?,
        },
        SelectOffsets::Offsets(offsets) => {
            let Some(points) = locate_range(TextNodes::new(node)?, offsets) else {
                tracing::trace!(
                    target: "highlightable::cursor",
                    ?offsets,
                    "offsets beyond text, selection unchanged"
                );
                return Ok(());
            };
            apply_points(&range, &points)?;
        }
    }

    let window = web_sys::window().ok_or("no window")?;
    let selection = window
        .get_selection()
        .map_err(|e| format!("get_selection failed: {:?}", e))?
        .ok_or("no selection object")?;
    selection
        .remove_all_ranges()
        .map_err(|e| format!("remove_all_ranges failed: {:?}", e))?;
    selection
        .add_range(&range)
        .map_err(|e| format!("add_range failed: {:?}", e))?;

    match options.collapse {
        Some(Collapse::Start) => selection
            .collapse_to_start()
            .map_err(|e| format!("collapse_to_start failed: {:?}", e))?,
        Some(Collapse::End) => selection
            .collapse_to_end()
            .map_err(|e| format!("collapse_to_end failed: {:?}", e))?,
        None => {}
    }

    Ok(())
}

fn apply_points(range: &web_sys::Range, points: &RangePoints<Node>) -> Result<(), PlatformError> {
    range
        .set_start(&points.start.node, points.start.offset as u32)
        .map_err(|e| format!("set_start failed: {:?}", e))?;
    match &points.end {
        Some(end) => range
            .set_end(&end.node, end.offset as u32)
            .map_err(|e| format!("set_end failed: {:?}", e))?,
        None => range.collapse_with_to_start(true),
    }
    Ok(())
}

/// Whether `el` currently holds focus in `document`.
pub fn is_active(el: &HtmlElement, document: &Document) -> bool {
    let node: &Node = el.as_ref();
    document
        .active_element()
        .is_some_and(|active| active.is_same_node(Some(node)))
}

fn owner_document(node: &Node) -> Result<Document, PlatformError> {
    match node.owner_document() {
        Some(document) => Ok(document),
        None => node
            .dyn_ref::<Document>()
            .cloned()
            .ok_or_else(|| PlatformError::from("node has no owner document")),
    }
}
