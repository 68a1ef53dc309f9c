//! Table engine: one schema + dataset pair and the operations that mutate it.
//!
//! The transitions themselves are pure functions on [`TableState`] (see
//! [`TableState::apply`]). [`TableEngine`] owns a state, applies actions in the
//! order they arrive and tells an optional listener about every change.

mod action;
mod reducer;

pub use action::{Anchor, ColumnChange, Side, TableAction};
pub use reducer::{Rejection, Transition};

use tracing::{debug, warn};

use crate::ids::{IdSource, UniqueIds};
use crate::models::TableState;

type Listener = Box<dyn FnMut(&TableState)>;

/// Owner of one mounted table's columns and rows.
pub struct TableEngine {
    state: TableState,
    ids: Box<dyn IdSource>,
    listener: Option<Listener>,
}

impl TableEngine {
    pub fn new(state: TableState) -> Self {
        Self::with_ids(state, Box::new(UniqueIds::new()))
    }

    pub fn with_ids(state: TableState, ids: Box<dyn IdSource>) -> Self {
        Self {
            state,
            ids,
            listener: None,
        }
    }

    /// Registers the change listener, replacing any previous one.
    pub fn on_change(&mut self, listener: impl FnMut(&TableState) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Applies one action. Returns whether the table changed; the listener
    /// only hears about actual changes.
    pub fn dispatch(&mut self, action: TableAction) -> bool {
        let transition = self.state.apply(&action, self.ids.as_mut());
        if let Some(reason) = &transition.rejected {
            warn!(action = action.name(), %reason, "table action rejected");
            return false;
        }
        if !transition.changed {
            debug!(action = action.name(), "table action had no effect");
            return false;
        }

        debug!(
            action = action.name(),
            columns = transition.state.columns.len(),
            rows = transition.state.rows.len(),
            "table action applied"
        );
        self.state = transition.state;
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.state);
        }
        true
    }

    /// Swaps in a whole new state without notifying the listener.
    pub fn replace(&mut self, state: TableState) {
        self.state = state;
    }

    pub fn into_state(self) -> TableState {
        self.state
    }
}

impl std::fmt::Debug for TableEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableEngine")
            .field("state", &self.state)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::models::{Column, ColumnKind, Row};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> TableEngine {
        TableEngine::with_ids(
            TableState::new(
                vec![
                    Column::new("label", "Parameter", ColumnKind::FixedLabel),
                    Column::new("value", "Value", ColumnKind::PlainText),
                ],
                vec![Row::new("r1").with_cell("label", "Preheat")],
            ),
            Box::new(SequentialIds::new()),
        )
    }

    #[test]
    fn test_listener_sees_full_pair_on_each_change() {
        let seen: Rc<RefCell<Vec<TableState>>> = Rc::default();
        let mut engine = engine();
        let sink = Rc::clone(&seen);
        engine.on_change(move |state| sink.borrow_mut().push(state.clone()));

        assert!(engine.dispatch(TableAction::add_column("Observations")));
        assert!(engine.dispatch(TableAction::add_row(None)));
        assert!(engine.dispatch(TableAction::delete_column("observations_1")));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        // Never a row key without its column across an update boundary.
        for state in seen.iter() {
            assert!(state.orphan_keys().is_empty());
        }
        assert_eq!(seen.last().unwrap(), engine.state());
    }

    #[test]
    fn test_noops_and_rejections_are_silent() {
        let calls = Rc::new(RefCell::new(0));
        let mut engine = engine();
        let counter = Rc::clone(&calls);
        engine.on_change(move |_| *counter.borrow_mut() += 1);

        assert!(!engine.dispatch(TableAction::delete_row("missing")));
        assert!(!engine.dispatch(TableAction::delete_column("label")));
        assert!(!engine.dispatch(TableAction::edit_cell("r1", "nope", "x")));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_replace_does_not_notify() {
        let calls = Rc::new(RefCell::new(0));
        let mut engine = engine();
        let counter = Rc::clone(&calls);
        engine.on_change(move |_| *counter.borrow_mut() += 1);

        engine.replace(TableState::default());
        assert!(engine.state().is_empty());
        assert_eq!(*calls.borrow(), 0);
    }
}
