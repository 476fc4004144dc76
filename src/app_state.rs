//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    config::EmbedSettings,
    dashboard::{DashboardStore, load_widgets},
    db::initialize,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The dashboard shell state, restored from the database on start up.
    pub store: Arc<Mutex<DashboardStore>>,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Where embedded widgets are fetched from.
    pub embed: EmbedSettings,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database and load the saved
    /// dashboard layout, or the default layout if none is saved.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or queried.
    pub fn new(db_connection: Connection, embed: EmbedSettings) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let widgets = load_widgets(&db_connection)?;
        tracing::info!("loaded {} dashboard widgets", widgets.len());

        Ok(Self {
            store: Arc::new(Mutex::new(DashboardStore::new(widgets))),
            db_connection: Arc::new(Mutex::new(db_connection)),
            embed,
        })
    }
}
