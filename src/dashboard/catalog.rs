//! The widgets that can be placed on the dashboard.

use crate::chart::ChartKind;

/// The embedding service dashboard that holds every embedded widget.
pub const DASHBOARD_OID: &str = "684ae8c995906e3edc558210";

/// The widgets placed on a fresh dashboard, in layout order.
pub const INITIAL_WIDGET_IDS: [&str; 9] = [
    "kpi0", "kpi1", "kpi2", "kpi3", "kpi4", "kpi5", "chart1", "chart6", "chart7",
];

/// The identifiers the embedding host uses to fetch a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedTarget {
    pub widget_oid: &'static str,
    pub dashboard_oid: &'static str,
}

/// Default size of a widget in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSize {
    pub w: u32,
    pub h: u32,
}

/// An entry in the widget library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// The catalog key stored in widget instances.
    pub id: &'static str,
    pub title: &'static str,
    pub size: WidgetSize,
    /// `None` for widgets rendered by the dashboard itself.
    pub embed: Option<EmbedTarget>,
    /// The transform applied by the render hook, if any.
    pub chart: Option<ChartKind>,
}

impl CatalogEntry {
    /// KPI tiles are drawn without the widget header.
    pub fn hides_header(&self) -> bool {
        self.id.starts_with("kpi")
    }
}

const KPI_SIZE: WidgetSize = WidgetSize { w: 3, h: 3 };
const CHART_SIZE: WidgetSize = WidgetSize { w: 6, h: 8 };
const WIDE_SIZE: WidgetSize = WidgetSize { w: 12, h: 8 };

const fn embedded(widget_oid: &'static str) -> Option<EmbedTarget> {
    Some(EmbedTarget {
        widget_oid,
        dashboard_oid: DASHBOARD_OID,
    })
}

/// Every widget that can be added to the dashboard.
pub static WIDGET_CATALOG: [CatalogEntry; 14] = [
    CatalogEntry {
        id: "kpi0",
        title: "LTD Expensed (Custom)",
        size: KPI_SIZE,
        embed: None,
        chart: None,
    },
    CatalogEntry {
        id: "kpi1",
        title: "LTD Reconciled",
        size: KPI_SIZE,
        embed: embedded("684ae8c995906e3edc558213"),
        chart: None,
    },
    CatalogEntry {
        id: "kpi2",
        title: "Trial budget",
        size: KPI_SIZE,
        embed: embedded("684ae8c995906e3edc558214"),
        chart: None,
    },
    CatalogEntry {
        id: "kpi3",
        title: "Remaining budget",
        size: KPI_SIZE,
        embed: embedded("684ae8c995906e3edc558219"),
        chart: None,
    },
    CatalogEntry {
        id: "kpi4",
        title: "% Recognized",
        size: KPI_SIZE,
        embed: embedded("684ae8c995906e3edc558216"),
        chart: None,
    },
    CatalogEntry {
        id: "kpi5",
        title: "Enrolled Patients % (Custom)",
        size: KPI_SIZE,
        embed: None,
        chart: None,
    },
    CatalogEntry {
        id: "chart1",
        title: "LTD trial spend",
        size: CHART_SIZE,
        embed: embedded("684ae8c995906e3edc558211"),
        chart: Some(ChartKind::LtdSpend),
    },
    CatalogEntry {
        id: "chart2",
        title: "Actual + forecast",
        size: CHART_SIZE,
        embed: embedded("684ae8c995906e3edc558212"),
        chart: Some(ChartKind::ActualVsForecast),
    },
    CatalogEntry {
        id: "chart3",
        title: "Cumulative total spend",
        size: CHART_SIZE,
        embed: embedded("684c1e2f95906e3edc558321"),
        chart: Some(ChartKind::CumulativeSpend),
    },
    CatalogEntry {
        id: "chart4",
        title: "Budget vs forecast by cost category",
        size: CHART_SIZE,
        embed: embedded("684ae8c995906e3edc558217"),
        chart: Some(ChartKind::BudgetByCategory),
    },
    CatalogEntry {
        id: "chart5",
        title: "Vendor progress",
        size: CHART_SIZE,
        embed: embedded("684c118b95906e3edc55830c"),
        chart: Some(ChartKind::VendorProgress),
    },
    CatalogEntry {
        id: "table1",
        title: "Financial Summary",
        size: WIDE_SIZE,
        embed: embedded("684ae8c995906e3edc55821a"),
        chart: None,
    },
    CatalogEntry {
        id: "chart6",
        title: "Quarterly expenses",
        size: WIDE_SIZE,
        embed: embedded("6851e57ef8d1a53383881e98"),
        chart: Some(ChartKind::QuarterlyExpenses),
    },
    CatalogEntry {
        id: "chart7",
        title: "Budget vs. Forecast (Custom)",
        size: CHART_SIZE,
        embed: embedded("6865dfcbf8d1a5338388236e"),
        chart: Some(ChartKind::BudgetVsForecast),
    },
];

/// Look up a catalog entry by its key.
pub fn find_widget(id: &str) -> Option<&'static CatalogEntry> {
    WIDGET_CATALOG.iter().find(|entry| entry.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::chart::ChartKind;

    use super::{INITIAL_WIDGET_IDS, WIDGET_CATALOG, find_widget};

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<_> = WIDGET_CATALOG.iter().map(|entry| entry.id).collect();

        assert_eq!(ids.len(), WIDGET_CATALOG.len());
    }

    #[test]
    fn initial_widgets_are_in_the_catalog() {
        for id in INITIAL_WIDGET_IDS {
            assert!(find_widget(id).is_some(), "{id} is missing from the catalog");
        }
    }

    #[test]
    fn custom_kpis_have_no_embed_target() {
        assert_eq!(find_widget("kpi0").unwrap().embed, None);
        assert_eq!(find_widget("kpi5").unwrap().embed, None);
        assert_eq!(
            find_widget("chart3").unwrap().embed.unwrap().widget_oid,
            "684c1e2f95906e3edc558321"
        );
    }

    #[test]
    fn only_kpis_hide_the_header() {
        assert!(find_widget("kpi2").unwrap().hides_header());
        assert!(!find_widget("chart2").unwrap().hides_header());
        assert!(!find_widget("table1").unwrap().hides_header());
    }

    #[test]
    fn charts_map_to_their_transforms() {
        assert_eq!(find_widget("chart1").unwrap().chart, Some(ChartKind::LtdSpend));
        assert_eq!(
            find_widget("chart7").unwrap().chart,
            Some(ChartKind::BudgetVsForecast)
        );
        assert_eq!(find_widget("table1").unwrap().chart, None);
        assert!(find_widget("chart8").is_none());
    }
}
