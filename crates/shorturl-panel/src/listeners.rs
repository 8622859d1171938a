use shorturl_core::ShortCode;
use std::collections::HashSet;

/// An event handler a panel instance has wired up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Listener {
    /// The create form's submit handler.
    Submit,
    /// The delete control of the row for this code.
    Delete(ShortCode),
}

/// Registry of the listeners owned by one panel instance.
///
/// Row listeners only live while the submit listener does: a torn down
/// panel never re-arms delete controls, even if a late refresh renders.
#[derive(Debug, Default)]
pub struct Listeners {
    registered: HashSet<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`. Returns `false` if it was already registered.
    pub fn register(&mut self, listener: Listener) -> bool {
        self.registered.insert(listener)
    }

    pub fn contains(&self, listener: &Listener) -> bool {
        self.registered.contains(listener)
    }

    /// Whether the submit listener is wired.
    pub fn is_armed(&self) -> bool {
        self.contains(&Listener::Submit)
    }

    /// Swaps every row listener for one per code in `codes`.
    ///
    /// Does nothing while the panel is not armed.
    pub fn replace_rows(&mut self, codes: impl IntoIterator<Item = ShortCode>) {
        if !self.is_armed() {
            return;
        }
        self.registered
            .retain(|listener| matches!(listener, Listener::Submit));
        self.registered
            .extend(codes.into_iter().map(Listener::Delete));
    }

    /// Drops every listener.
    pub fn clear(&mut self) {
        self.registered.clear();
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
