//! Types exposed to JavaScript via wasm-bindgen.

use highlightable_core::{Collapse, InputNotice, Offsets, SelectOffsets, SelectOptions};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// `[start, end]` UTF-16 offsets into the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct OffsetsJs(pub u32, pub u32);

impl From<Offsets> for OffsetsJs {
    fn from(offsets: Offsets) -> Self {
        Self(to_u32(offsets.start), to_u32(offsets.end))
    }
}

/// What `setSelection` selects: `true` for everything, a caret position, or
/// an `[anchor, focus]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(untagged)]
pub enum SelectOffsetsJs {
    All(bool),
    Caret(u32),
    Range(u32, u32),
}

impl SelectOffsetsJs {
    /// `false` selects nothing.
    pub fn into_offsets(self) -> Option<SelectOffsets> {
        match self {
            Self::All(true) => Some(SelectOffsets::All),
            Self::All(false) => None,
            Self::Caret(offset) => Some(SelectOffsets::from(offset as usize)),
            Self::Range(start, end) => Some(Offsets::new(start as usize, end as usize).into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "lowercase")]
pub enum CollapseEdge {
    Start,
    End,
}

/// `'start' | 'end' | false`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(untagged)]
pub enum CollapseJs {
    Edge(CollapseEdge),
    Off(bool),
}

/// Options for `setSelection`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptionsJs {
    #[tsify(optional)]
    #[serde(default)]
    pub force: Option<bool>,
    #[tsify(optional)]
    #[serde(default)]
    pub collapse: Option<CollapseJs>,
}

impl From<SelectOptionsJs> for SelectOptions {
    fn from(options: SelectOptionsJs) -> Self {
        let collapse = match options.collapse {
            Some(CollapseJs::Edge(CollapseEdge::Start)) => Some(Collapse::Start),
            Some(CollapseJs::Edge(CollapseEdge::End)) => Some(Collapse::End),
            Some(CollapseJs::Off(_)) | None => None,
        };
        SelectOptions {
            force: options.force.unwrap_or(false),
            collapse,
        }
    }
}

/// Payload passed to the `onInput` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct InputNoticeJs {
    pub value: String,
    pub position: u32,
}

impl From<&InputNotice> for InputNoticeJs {
    fn from(notice: &InputNotice) -> Self {
        Self {
            value: notice.value.clone(),
            position: to_u32(notice.position),
        }
    }
}

fn to_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}
