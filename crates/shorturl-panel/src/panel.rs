use crate::listeners::{Listener, Listeners};
use crate::session::SessionConfig;
use crate::view::{TableRow, View};
use parking_lot::Mutex;
use shorturl_core::{AdminApi, CoreError, Mapping, Result, ShortCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Alert shown when the backend refuses the session's API key.
pub const UNAUTHORIZED_ALERT: &str = "Invalid API key: the backend refused this session.";

/// How [`AdminPanel::initialize`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Listeners are wired and the table has been populated.
    Active,
    /// A keyed variant has no key; nothing was sent and nothing wired.
    MissingApiKey,
    /// The probe was refused; the operator was alerted and nothing wired.
    Unauthorized,
}

/// An operator action delivered to the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// The create form was submitted with these field values.
    Submit { long_url: String, short_code: String },
    /// A row's delete control was activated.
    Delete(ShortCode),
}

/// What happened to a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The backend accepted the action and the table was refreshed.
    Applied,
    /// The backend call failed; the operator was told and the table refreshed.
    Failed(CoreError),
    /// No listener was registered for the action.
    Ignored,
}

#[derive(Debug, Default)]
struct Table {
    /// Sequence number of the refresh that produced `mappings`.
    seq: u64,
    mappings: Vec<Mapping>,
}

/// The admin panel: a table mirroring the backend's mappings, a create form
/// and one delete control per row.
///
/// The panel is inactive until [`initialize`](Self::initialize) succeeds and
/// after [`teardown`](Self::teardown); while inactive every event is ignored.
/// All operations take `&self`, so actions may run concurrently. Each one
/// refreshes after its own request completes, and a refresh only renders if
/// no later-issued refresh has rendered already.
pub struct AdminPanel<A, V> {
    session: SessionConfig,
    api: Arc<A>,
    view: Arc<V>,
    listeners: Mutex<Listeners>,
    table: Mutex<Table>,
    /// Serializes view updates so they land in table order.
    render_order: Mutex<()>,
    refresh_seq: AtomicU64,
}

impl<A: AdminApi, V: View> AdminPanel<A, V> {
    pub fn new(session: SessionConfig, api: A, view: V) -> Self {
        Self {
            session,
            api: Arc::new(api),
            view: Arc::new(view),
            listeners: Mutex::new(Listeners::new()),
            table: Mutex::new(Table::default()),
            render_order: Mutex::new(()),
            refresh_seq: AtomicU64::new(0),
        }
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Whether the submit handler is wired.
    pub fn is_active(&self) -> bool {
        self.listeners.lock().is_armed()
    }

    /// The mappings currently displayed.
    pub fn mappings(&self) -> Vec<Mapping> {
        self.table.lock().mappings.clone()
    }

    fn is_registered(&self, listener: &Listener) -> bool {
        self.listeners.lock().contains(listener)
    }

    /// Authenticates the session, wires the create form and loads the table.
    ///
    /// A keyed variant without a key aborts silently before any request. A
    /// refused probe alerts the operator and aborts. Probe transport failures
    /// are returned as errors.
    pub async fn initialize(&self) -> Result<InitOutcome> {
        let outcome = self.authenticate().await?;
        if outcome != InitOutcome::Active {
            return Ok(outcome);
        }

        self.listeners.lock().register(Listener::Submit);
        info!(variant = %self.session.variant, host = %self.session.host, "admin panel active");

        self.refresh().await?;
        Ok(InitOutcome::Active)
    }

    /// Runs the key checks of [`initialize`](Self::initialize) without wiring
    /// anything. `Active` means the session may talk to the backend.
    pub async fn authenticate(&self) -> Result<InitOutcome> {
        if !self.session.has_credentials() {
            debug!(variant = %self.session.variant, "no api key configured, panel stays inactive");
            return Ok(InitOutcome::MissingApiKey);
        }

        if !self.api.authorize().await? {
            warn!(variant = %self.session.variant, "authentication probe refused the session");
            self.view.alert(UNAUTHORIZED_ALERT);
            return Ok(InitOutcome::Unauthorized);
        }
        Ok(InitOutcome::Active)
    }

    /// Fetches the mapping list and renders it.
    ///
    /// On failure the table keeps its last rendered content.
    pub async fn refresh(&self) -> Result<()> {
        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(seq, "refreshing mappings");

        let mappings = self.api.list().await?;
        self.render_fetched(seq, mappings);
        Ok(())
    }

    fn render_fetched(&self, seq: u64, mappings: Vec<Mapping>) {
        let _order = self.render_order.lock();
        let rows = {
            let mut table = self.table.lock();
            if seq < table.seq {
                debug!(seq, rendered = table.seq, "discarding stale mapping list");
                return;
            }
            table.seq = seq;
            self.swap_table(&mut table, mappings)
        };
        self.draw(&rows);
    }

    /// Replaces the table with `mappings`, in order.
    pub fn render(&self, mappings: Vec<Mapping>) {
        let _order = self.render_order.lock();
        let rows = self.swap_table(&mut self.table.lock(), mappings);
        self.draw(&rows);
    }

    fn swap_table(&self, table: &mut Table, mappings: Vec<Mapping>) -> Vec<TableRow> {
        let rows: Vec<TableRow> = mappings
            .iter()
            .map(|mapping| TableRow::for_mapping(mapping, &self.session.host))
            .collect();

        self.listeners
            .lock()
            .replace_rows(rows.iter().map(|row| row.short_code.clone()));
        table.mappings = mappings;
        rows
    }

    // the table lock is released here, so views may read the panel back
    fn draw(&self, rows: &[TableRow]) {
        self.view.render_rows(rows);
        debug!(rows = rows.len(), "rendered mapping table");
    }

    /// Creates a mapping from the form values, then refreshes.
    ///
    /// The form is cleared only when the backend accepts the mapping.
    pub async fn on_submit(&self, long_url: &str, short_code: &str) -> Result<Dispatch> {
        if !self.is_registered(&Listener::Submit) {
            trace!("submit ignored, panel inactive");
            return Ok(Dispatch::Ignored);
        }

        let mapping = Mapping::new(short_code, long_url);
        let outcome = match self.api.create(&mapping).await {
            Ok(()) => {
                self.view.clear_form();
                Dispatch::Applied
            }
            Err(err) => {
                warn!(code = %mapping.short_code, error = %err, "create failed");
                self.view.report_error(&err);
                Dispatch::Failed(err)
            }
        };

        self.refresh().await?;
        Ok(outcome)
    }

    /// Deletes the mapping behind a rendered row, then refreshes.
    pub async fn on_delete(&self, code: &ShortCode) -> Result<Dispatch> {
        if !self.is_registered(&Listener::Delete(code.clone())) {
            trace!(code = %code, "delete ignored, no row listener");
            return Ok(Dispatch::Ignored);
        }

        let outcome = match self.api.delete(code).await {
            Ok(()) => Dispatch::Applied,
            Err(err) => {
                warn!(code = %code, error = %err, "delete failed");
                self.view.report_error(&err);
                Dispatch::Failed(err)
            }
        };

        self.refresh().await?;
        Ok(outcome)
    }

    /// Routes an operator event to its handler.
    pub async fn dispatch(&self, event: PanelEvent) -> Result<Dispatch> {
        match event {
            PanelEvent::Submit {
                long_url,
                short_code,
            } => self.on_submit(&long_url, &short_code).await,
            PanelEvent::Delete(code) => self.on_delete(&code).await,
        }
    }

    /// Unregisters every listener. Later events are ignored.
    pub fn teardown(&self) {
        self.listeners.lock().clear();
        info!("admin panel torn down");
    }
}
