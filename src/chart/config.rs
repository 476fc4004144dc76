//! The chart configuration exchanged with the embedding host.
//!
//! Field names follow the host's camelCase option names. Options this crate
//! does not interpret are kept in each struct's `extra` map so they come back
//! out of a transform untouched. Values outside the typed set (an unknown
//! series type, a gradient colour, a null title) are carried as they are
//! rather than rejected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::chart::{
    classify::{Classification, SeriesRole, classify},
    tooltip::TooltipFormatter,
};

/// Options passed through without interpretation.
pub type Extra = Map<String, Value>;

/// The full set of options for one chart, as produced by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfiguration {
    /// The plotted series, in host order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub series: Vec<Series>,
    /// Category axes; index 0 is the primary axis.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub x_axis: Vec<Axis>,
    /// Value axes; index 0 is the primary (monetary) axis and index 1 the
    /// secondary (count) axis.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub y_axis: Vec<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_options: Option<PlotOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartOptions>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ChartConfiguration {
    /// Find a series by its exact name.
    pub fn find_series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|series| series.name() == name)
    }

    /// The category labels of the primary category axis.
    pub fn categories(&self) -> Vec<String> {
        self.x_axis
            .first()
            .map(|axis| axis.categories.iter().map(category_label).collect())
            .unwrap_or_default()
    }

    /// The label of category `index` on the primary category axis.
    pub fn category(&self, index: usize) -> Option<String> {
        self.x_axis
            .first()
            .and_then(|axis| axis.categories.get(index))
            .map(category_label)
    }
}

/// Categories are usually strings, but numbers are shown as written.
fn category_label(category: &Value) -> String {
    match category {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Read `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept either a single axis object or a list of axes.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Axis>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<Axis>),
        One(Box<Axis>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(axes)) => axes,
        Some(OneOrMany::One(axis)) => vec![*axis],
        None => Vec::new(),
    })
}

/// A colour option: a CSS colour, or anything else the host accepts as a
/// colour, such as a gradient object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Css(String),
    Other(Value),
}

impl Color {
    /// The colour as CSS, if it is one.
    pub fn as_css(&self) -> Option<&str> {
        match self {
            Color::Css(color) => Some(color),
            Color::Other(_) => None,
        }
    }
}

impl From<&str> for Color {
    fn from(color: &str) -> Self {
        Color::Css(color.to_owned())
    }
}

/// A named sequence of values plotted against the shared categories.
///
/// The series' [Classification] is computed from its name when the series is
/// constructed or deserialised and does not change afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SeriesOptions")]
pub struct Series {
    classification: Classification,
    /// The host options for this series.
    pub options: SeriesOptions,
}

impl Series {
    /// Create a series classified by `name`.
    pub fn new(name: &str) -> Self {
        Self::from(SeriesOptions {
            name: name.to_owned(),
            ..Default::default()
        })
    }

    /// Create a series with an explicitly assigned role.
    pub fn with_role(name: &str, role: SeriesRole) -> Self {
        Self {
            classification: Classification::with_role(name, role),
            options: SeriesOptions {
                name: name.to_owned(),
                ..Default::default()
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn role(&self) -> &SeriesRole {
        &self.classification.role
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// The numeric value of every point, `None` for null or non-numeric points.
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.options.data.iter().map(DataPoint::value)
    }
}

impl From<SeriesOptions> for Series {
    fn from(options: SeriesOptions) -> Self {
        Self {
            classification: classify(&options.name),
            options,
        }
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.options.serialize(serializer)
    }
}

/// The host's options for one series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOptions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SeriesType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_legend: Option<bool>,
    /// The value axis this series is plotted against, by index or id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_symbol: Option<LegendSymbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// How a series is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Line,
    Spline,
    Column,
    Bar,
    Area,
    AreaSpline,
    Scatter,
    Pie,
    /// A type this crate does not draw itself, such as `waterfall`.
    #[serde(untagged)]
    Other(String),
}

/// The symbol drawn next to a series in the legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendSymbol {
    Line,
    Square,
    Rectangle,
    #[serde(untagged)]
    Other(String),
}

/// One entry of a series' data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPoint {
    /// A bare number or null.
    Value(Option<f64>),
    /// A point object such as `{"y": 10, "color": "red"}`.
    Record(PointRecord),
    /// Anything else the host sent; treated as absent.
    Other(Value),
}

impl DataPoint {
    /// The numeric value of this point, if it has one.
    pub fn value(&self) -> Option<f64> {
        match self {
            DataPoint::Value(value) => *value,
            DataPoint::Record(record) => record.y,
            DataPoint::Other(_) => None,
        }
        .filter(|value| value.is_finite())
    }
}

impl From<f64> for DataPoint {
    fn from(value: f64) -> Self {
        DataPoint::Value(Some(value))
    }
}

/// A data point given as an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A category or value axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<AxisType>,
    /// Category labels, usually strings.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub categories: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plot_lines: Vec<PlotLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<AxisLabels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_on_tick: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_on_tick: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_line_width: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Linear,
    Logarithmic,
    Datetime,
    Category,
    Treegrid,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    /// `None` hides the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An annotation line drawn across the plot at a fixed axis value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<PlotLineLabel>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotLineLabel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyle>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// A keyword such as `bold` or a numeric weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisLabels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<LabelFormatter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A named axis label formatter the host calls back into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelFormatter {
    /// Show the category name as is.
    CategoryName,
    /// Abbreviate a dollar value with a K, M or B suffix.
    AbbreviatedCurrency,
    /// A formatter set by the host; ticks are shown as written.
    #[serde(untagged)]
    Other(Value),
}

impl LabelFormatter {
    /// Format one axis tick value.
    pub fn format(&self, value: &Value) -> String {
        match (self, value) {
            (LabelFormatter::CategoryName | LabelFormatter::Other(_), Value::String(text)) => {
                text.clone()
            }
            (LabelFormatter::CategoryName | LabelFormatter::Other(_), other) => other.to_string(),
            (LabelFormatter::AbbreviatedCurrency, value) => match value.as_f64() {
                Some(number) => abbreviate_currency(number),
                None => value.to_string(),
            },
        }
    }
}

fn abbreviate_currency(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${}K", value / 1_000.0)
    } else {
        format!("${value}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_width: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Tooltip options, including the formatter the host should call on hover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
    #[serde(rename = "useHTML", default, skip_serializing_if = "Option::is_none")]
    pub use_html: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<TooltipFormatter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    /// `true`, `false` or a shadow options object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<SeriesPlotOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar: Option<SeriesPlotOptions>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Plot options shared by every series of one type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPlotOptions {
    /// Pixels, a percentage string or a radius options object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crisp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<bool>,
    /// A data labels object, or a list of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_labels: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SeriesPlotOptions {
    /// Overwrite the fields set in `overrides`, keeping everything else.
    pub fn merge(&mut self, overrides: &SeriesPlotOptions) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if overrides.$field.is_some() {
                    self.$field = overrides.$field.clone();
                })*
            };
        }

        take!(
            border_radius,
            border_width,
            crisp,
            group_padding,
            grouping,
            data_labels
        );

        for (key, value) in &overrides.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Chart-level options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SeriesType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_ticks: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}
