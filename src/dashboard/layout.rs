//! Widget instances and their positions on the grid.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dashboard::catalog::{INITIAL_WIDGET_IDS, find_widget};

/// The number of columns in the dashboard grid.
pub const GRID_COLUMNS: u32 = 12;

/// The position and size of one widget, as reported by the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridItem {
    /// The instance id of the widget this item positions.
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Grid flags such as `moved` or `static`, kept as reported.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GridItem {
    pub fn new(i: &str, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            i: i.to_owned(),
            x,
            y,
            w,
            h,
            extra: Map::new(),
        }
    }

    /// The first row below this item, saturating at the last row the grid
    /// can address.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Whether the position or size differs from `other`.
    pub fn differs_from(&self, other: &GridItem) -> bool {
        (self.x, self.y, self.w, self.h) != (other.x, other.y, other.w, other.h)
    }
}

/// A catalog widget placed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetInstance {
    /// Unique across the dashboard and stable across reorders.
    pub instance_id: String,
    /// The catalog key.
    pub id: String,
    pub layout: GridItem,
}

/// The widgets of a fresh dashboard, four to a row.
pub fn default_layout() -> Vec<WidgetInstance> {
    INITIAL_WIDGET_IDS
        .iter()
        .enumerate()
        .filter_map(|(index, id)| {
            let Some(widget) = find_widget(id) else {
                tracing::warn!("default widget \"{id}\" is not in the catalog");
                return None;
            };

            let index = index as u32;
            let instance_id = format!("{id}-{index}");

            Some(WidgetInstance {
                layout: GridItem::new(
                    &instance_id,
                    (index % 4) * 3,
                    (index / 4) * 3,
                    widget.size.w,
                    widget.size.h,
                ),
                instance_id,
                id: (*id).to_owned(),
            })
        })
        .collect()
}
