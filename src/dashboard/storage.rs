//! Durable storage for the dashboard layout.
//!
//! The layout is kept as a JSON array in a small key/value table so that it
//! survives restarts. Invalid entries are dropped on load and an empty or
//! unreadable layout falls back to [default_layout].

use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

use crate::{
    Error,
    dashboard::layout::{WidgetInstance, default_layout},
};

/// The key the widget list is stored under.
pub const WIDGETS_STORAGE_KEY: &str = "dashboard-widgets";

/// Create the key/value table used for persisted dashboard state.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_local_storage_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn get_item(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    let value = connection
        .query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;

    Ok(value)
}

fn set_item(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key, value),
    )?;

    Ok(())
}

/// Save the widget list, replacing any previously saved list.
///
/// # Errors
/// Returns an error if the list cannot be serialised or written.
pub fn save_widgets(widgets: &[WidgetInstance], connection: &Connection) -> Result<(), Error> {
    let json = serde_json::to_string(widgets)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    set_item(WIDGETS_STORAGE_KEY, &json, connection)
}

/// Load the saved widget list.
///
/// Entries without an object `layout`, or that otherwise do not describe a
/// widget instance, are discarded. The default layout is returned when
/// nothing valid remains.
///
/// # Errors
/// Returns an error only if the database cannot be queried.
pub fn load_widgets(connection: &Connection) -> Result<Vec<WidgetInstance>, Error> {
    let Some(json) = get_item(WIDGETS_STORAGE_KEY, connection)? else {
        return Ok(default_layout());
    };

    let widgets = parse_widgets(&json);

    if widgets.is_empty() {
        tracing::info!("no saved widgets, using the default layout");
        Ok(default_layout())
    } else {
        Ok(widgets)
    }
}

fn parse_widgets(json: &str) -> Vec<WidgetInstance> {
    let entries = match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            tracing::warn!("saved widgets are not a list");
            return Vec::new();
        }
        Err(error) => {
            tracing::warn!("could not parse saved widgets: {error}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter(|entry| entry.get("layout").is_some_and(Value::is_object))
        .filter_map(|entry| {
            serde_json::from_value(entry)
                .inspect_err(|error| tracing::warn!("dropping invalid saved widget: {error}"))
                .ok()
        })
        .collect()
}
