//! The dashboard shell state and the actions that change it.

use crate::{
    Error,
    dashboard::{
        catalog::find_widget,
        layout::{GRID_COLUMNS, GridItem, WidgetInstance},
    },
};

/// The widget context menu, opened by right-clicking a widget in edit mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextMenu {
    pub visible: bool,
    pub x: i32,
    pub y: i32,
    /// The widget the menu acts on.
    pub instance_id: Option<String>,
}

/// A state transition of the dashboard shell.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    /// Place a new instance of a catalog widget at the bottom of the grid.
    AddWidget {
        widget_id: String,
        /// Milliseconds since the Unix epoch, used to build the instance id.
        timestamp_millis: i64,
    },
    RemoveWidget { instance_id: String },
    /// The grid reports the layout of every widget after a drag.
    UpdateLayout(Vec<GridItem>),
    /// The grid reports the final size of one widget.
    ResizeWidget(GridItem),
    OpenMenu { instance_id: String, x: i32, y: i32 },
    CloseMenu,
    ToggleEditMode,
    OpenLibrary,
    CloseLibrary,
}

/// The single owner of the dashboard shell state.
///
/// Every change goes through [DashboardStore::apply], which reports whether
/// the widget list changed so the caller knows to persist it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStore {
    widgets: Vec<WidgetInstance>,
    edit_mode: bool,
    library_open: bool,
    context_menu: ContextMenu,
}

impl DashboardStore {
    /// Create a store showing `widgets`, with editing and menus closed.
    pub fn new(widgets: Vec<WidgetInstance>) -> Self {
        Self {
            widgets,
            edit_mode: false,
            library_open: false,
            context_menu: ContextMenu::default(),
        }
    }

    pub fn widgets(&self) -> &[WidgetInstance] {
        &self.widgets
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn library_open(&self) -> bool {
        self.library_open
    }

    pub fn context_menu(&self) -> &ContextMenu {
        &self.context_menu
    }

    /// Apply `action` and return whether the widget list changed.
    ///
    /// # Errors
    /// Returns [Error::UnknownWidget] when adding a widget that is not in the
    /// catalog, or [Error::UnknownWidgetInstance] when removing an instance
    /// that is not on the dashboard.
    pub fn apply(&mut self, action: DashboardAction) -> Result<bool, Error> {
        match action {
            DashboardAction::AddWidget {
                widget_id,
                timestamp_millis,
            } => {
                self.add_widget(&widget_id, timestamp_millis)?;
                Ok(true)
            }
            DashboardAction::RemoveWidget { instance_id } => {
                let count = self.widgets.len();
                self.widgets
                    .retain(|widget| widget.instance_id != instance_id);

                if self.widgets.len() == count {
                    return Err(Error::UnknownWidgetInstance(instance_id));
                }

                Ok(true)
            }
            DashboardAction::UpdateLayout(layout) => Ok(self.update_layout(&layout)),
            DashboardAction::ResizeWidget(item) => Ok(self.update_layout(&[item])),
            DashboardAction::OpenMenu { instance_id, x, y } => {
                if !self.edit_mode {
                    tracing::debug!("ignoring context menu for {instance_id} outside edit mode");
                    return Ok(false);
                }

                self.context_menu = ContextMenu {
                    visible: true,
                    x,
                    y,
                    instance_id: Some(instance_id),
                };
                Ok(false)
            }
            DashboardAction::CloseMenu => {
                self.context_menu.visible = false;
                Ok(false)
            }
            DashboardAction::ToggleEditMode => {
                self.edit_mode = !self.edit_mode;
                if !self.edit_mode {
                    self.context_menu.visible = false;
                }
                Ok(false)
            }
            DashboardAction::OpenLibrary => {
                self.library_open = true;
                Ok(false)
            }
            DashboardAction::CloseLibrary => {
                self.library_open = false;
                Ok(false)
            }
        }
    }

    fn add_widget(&mut self, widget_id: &str, timestamp_millis: i64) -> Result<(), Error> {
        let widget =
            find_widget(widget_id).ok_or_else(|| Error::UnknownWidget(widget_id.to_owned()))?;

        let base_id = format!("{widget_id}-{timestamp_millis}");
        let mut instance_id = base_id.clone();
        let mut suffix = 1;
        while self.has_instance(&instance_id) {
            instance_id = format!("{base_id}-{suffix}");
            suffix += 1;
        }

        let x = ((self.widgets.len() * 3) % GRID_COLUMNS as usize) as u32;
        let y = self
            .widgets
            .iter()
            .map(|widget| widget.layout.bottom())
            .max()
            .unwrap_or(0);

        tracing::debug!("adding widget {instance_id} at ({x}, {y})");

        self.widgets.push(WidgetInstance {
            layout: GridItem::new(&instance_id, x, y, widget.size.w, widget.size.h),
            instance_id,
            id: widget_id.to_owned(),
        });
        self.library_open = false;

        Ok(())
    }

    fn has_instance(&self, instance_id: &str) -> bool {
        self.widgets
            .iter()
            .any(|widget| widget.instance_id == instance_id)
    }

    /// Replace the layout of every instance named in `layout`.
    fn update_layout(&mut self, layout: &[GridItem]) -> bool {
        let mut changed = false;

        for widget in &mut self.widgets {
            if let Some(item) = layout.iter().find(|item| item.i == widget.instance_id)
                && item.differs_from(&widget.layout)
            {
                widget.layout = item.clone();
                changed = true;
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        dashboard::layout::{GridItem, WidgetInstance, default_layout},
    };

    use super::{DashboardAction, DashboardStore};

    fn add(widget_id: &str, timestamp_millis: i64) -> DashboardAction {
        DashboardAction::AddWidget {
            widget_id: widget_id.to_owned(),
            timestamp_millis,
        }
    }

    fn instance(instance_id: &str, x: u32, y: u32, w: u32, h: u32) -> WidgetInstance {
        WidgetInstance {
            instance_id: instance_id.to_owned(),
            id: "kpi1".to_owned(),
            layout: GridItem::new(instance_id, x, y, w, h),
        }
    }

    #[test]
    fn add_widget_below_a_widget_at_the_last_row() {
        let mut store = DashboardStore::new(vec![instance("a", 0, u32::MAX, 3, 3)]);
        store.apply(DashboardAction::OpenLibrary).unwrap();

        store.apply(add("kpi1", 1)).unwrap();

        let added = store.widgets().last().unwrap();
        assert_eq!(added.layout.y, u32::MAX);
        assert_eq!(added.layout.x, 3);
    }

    #[test]
    fn add_widget_places_new_instance_at_the_bottom() {
        let mut store = DashboardStore::new(vec![
            instance("a", 0, 0, 3, 3),
            instance("b", 3, 0, 6, 8),
        ]);
        store.apply(DashboardAction::OpenLibrary).unwrap();

        let changed = store.apply(add("chart2", 1_700_000_000_000)).unwrap();

        assert!(changed);
        let added = store.widgets().last().unwrap();
        assert_eq!(added.instance_id, "chart2-1700000000000");
        assert_eq!(added.id, "chart2");
        assert_eq!(
            added.layout,
            GridItem::new("chart2-1700000000000", 6, 8, 6, 8)
        );
        assert!(!store.library_open());
    }

    #[test]
    fn add_widget_to_empty_dashboard_starts_at_origin() {
        let mut store = DashboardStore::new(Vec::new());

        store.apply(add("kpi1", 5)).unwrap();

        assert_eq!(store.widgets()[0].layout, GridItem::new("kpi1-5", 0, 0, 3, 3));
    }

    #[test]
    fn add_widget_wraps_columns() {
        let mut store = DashboardStore::new(Vec::new());

        for timestamp in 0..5 {
            store.apply(add("kpi1", timestamp)).unwrap();
        }

        let columns: Vec<_> = store.widgets().iter().map(|w| w.layout.x).collect();
        assert_eq!(columns, vec![0, 3, 6, 9, 0]);
    }

    #[test]
    fn add_widget_makes_instance_ids_unique() {
        let mut store = DashboardStore::new(Vec::new());

        store.apply(add("kpi1", 42)).unwrap();
        store.apply(add("kpi1", 42)).unwrap();
        store.apply(add("kpi1", 42)).unwrap();

        let ids: Vec<_> = store
            .widgets()
            .iter()
            .map(|widget| widget.instance_id.as_str())
            .collect();
        assert_eq!(ids, vec!["kpi1-42", "kpi1-42-1", "kpi1-42-2"]);
    }

    #[test]
    fn add_unknown_widget_fails() {
        let mut store = DashboardStore::new(Vec::new());

        let result = store.apply(add("chart99", 1));

        assert_eq!(result, Err(Error::UnknownWidget("chart99".to_owned())));
        assert!(store.widgets().is_empty());
    }

    #[test]
    fn remove_widget_drops_only_that_instance() {
        let mut store = DashboardStore::new(default_layout());

        let changed = store
            .apply(DashboardAction::RemoveWidget {
                instance_id: "kpi2-2".to_owned(),
            })
            .unwrap();

        assert!(changed);
        assert_eq!(store.widgets().len(), 8);
        assert!(store.widgets().iter().all(|w| w.instance_id != "kpi2-2"));
    }

    #[test]
    fn remove_unknown_instance_fails() {
        let mut store = DashboardStore::new(default_layout());

        let result = store.apply(DashboardAction::RemoveWidget {
            instance_id: "nope".to_owned(),
        });

        assert_eq!(result, Err(Error::UnknownWidgetInstance("nope".to_owned())));
        assert_eq!(store.widgets().len(), 9);
    }

    #[test]
    fn update_layout_replaces_matching_items() {
        let mut store = DashboardStore::new(vec![
            instance("a", 0, 0, 3, 3),
            instance("b", 3, 0, 3, 3),
        ]);

        let changed = store
            .apply(DashboardAction::UpdateLayout(vec![
                GridItem::new("b", 0, 3, 3, 3),
                GridItem::new("unknown", 0, 0, 1, 1),
            ]))
            .unwrap();

        assert!(changed);
        assert_eq!(store.widgets()[0].layout, GridItem::new("a", 0, 0, 3, 3));
        assert_eq!(store.widgets()[1].layout, GridItem::new("b", 0, 3, 3, 3));
    }

    #[test]
    fn identical_layout_is_not_a_change() {
        let mut store = DashboardStore::new(vec![instance("a", 0, 0, 3, 3)]);
        let before = store.clone();

        let changed = store
            .apply(DashboardAction::UpdateLayout(vec![GridItem::new(
                "a", 0, 0, 3, 3,
            )]))
            .unwrap();

        assert!(!changed);
        assert_eq!(store, before);
    }

    #[test]
    fn resize_updates_one_widget() {
        let mut store = DashboardStore::new(vec![instance("a", 0, 0, 3, 3)]);

        let changed = store
            .apply(DashboardAction::ResizeWidget(GridItem::new("a", 0, 0, 6, 4)))
            .unwrap();

        assert!(changed);
        assert_eq!(store.widgets()[0].layout.w, 6);
        assert_eq!(store.widgets()[0].layout.h, 4);
    }

    #[test]
    fn context_menu_only_opens_in_edit_mode() {
        let mut store = DashboardStore::new(default_layout());
        let open = DashboardAction::OpenMenu {
            instance_id: "kpi1-1".to_owned(),
            x: 10,
            y: 20,
        };

        store.apply(open.clone()).unwrap();
        assert!(!store.context_menu().visible);

        store.apply(DashboardAction::ToggleEditMode).unwrap();
        let changed = store.apply(open).unwrap();

        assert!(!changed);
        let menu = store.context_menu();
        assert!(menu.visible);
        assert_eq!((menu.x, menu.y), (10, 20));
        assert_eq!(menu.instance_id.as_deref(), Some("kpi1-1"));

        store.apply(DashboardAction::CloseMenu).unwrap();
        assert!(!store.context_menu().visible);
    }

    #[test]
    fn leaving_edit_mode_closes_the_menu() {
        let mut store = DashboardStore::new(default_layout());
        store.apply(DashboardAction::ToggleEditMode).unwrap();
        store
            .apply(DashboardAction::OpenMenu {
                instance_id: "kpi1-1".to_owned(),
                x: 0,
                y: 0,
            })
            .unwrap();

        store.apply(DashboardAction::ToggleEditMode).unwrap();

        assert!(!store.edit_mode());
        assert!(!store.context_menu().visible);
    }

    #[test]
    fn library_opens_and_closes() {
        let mut store = DashboardStore::new(Vec::new());

        assert!(!store.apply(DashboardAction::OpenLibrary).unwrap());
        assert!(store.library_open());

        store.apply(DashboardAction::CloseLibrary).unwrap();
        assert!(!store.library_open());
    }
}
