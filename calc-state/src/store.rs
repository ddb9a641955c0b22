//! Per-calculator input state and its session with the shared URL.
//!
//! Every edit runs the same three steps in one call: the store changes, the
//! address bar is rewritten, the kernel runs again. Nobody sees a store that
//! disagrees with the URL.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use calc_core::{CalculatorSpec, FieldRule, FieldValues, ResultRecord};
use tracing::{debug, warn};

use crate::{ListenerId, Navigator, QueryString, SharedAddressBar, StateError, UrlCodec};

/// Field values of one calculator plus its last result.
///
/// Keys are always exactly the calculator's declared fields.
#[derive(Debug, Clone, PartialEq)]
pub struct InputStateStore {
    spec: &'static CalculatorSpec,
    fields: FieldValues,
    last_result: Option<ResultRecord>,
}

impl InputStateStore {
    /// A store holding the declared defaults and their result.
    pub fn new(spec: &'static CalculatorSpec) -> Self {
        let mut store = Self {
            spec,
            fields: spec.defaults(),
            last_result: None,
        };
        store.recompute();
        store
    }

    pub fn spec(&self) -> &'static CalculatorSpec {
        self.spec
    }

    pub fn namespace(&self) -> &'static str {
        self.spec.namespace
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn last_result(&self) -> Option<&ResultRecord> {
        self.last_result.as_ref()
    }

    /// What `raw` would be stored as, or why it cannot be.
    pub fn sanitize(
        &self,
        name: &str,
        raw: &str,
    ) -> Result<String, StateError> {
        let field = self
            .spec
            .field(name)
            .ok_or_else(|| StateError::UnknownField {
                calculator: self.spec.id.to_string(),
                field: name.to_string(),
            })?;

        field.rule.sanitize(raw).ok_or_else(|| {
            let options = match field.rule {
                FieldRule::Choice(options) => options.join(", "),
                _ => String::new(),
            };
            StateError::InvalidChoice {
                field: name.to_string(),
                value: raw.to_string(),
                options,
            }
        })
    }

    /// Sanitizes `raw` by the field's rule and stores it. Returns the value
    /// as stored. Does not recompute.
    pub fn set_field(
        &mut self,
        name: &str,
        raw: &str,
    ) -> Result<&str, StateError> {
        let value = self.sanitize(name, raw)?;
        let slot = self.fields.entry(name.to_string()).or_default();
        *slot = value;
        Ok(slot.as_str())
    }

    /// Replaces every field. Undeclared names in `values` are dropped and
    /// missing ones take their defaults.
    pub fn replace_all(
        &mut self,
        values: &FieldValues,
    ) {
        self.fields = self
            .spec
            .fields
            .iter()
            .map(|field| {
                let value = values
                    .get(field.name)
                    .cloned()
                    .unwrap_or_else(|| field.default.to_string());
                (field.name.to_string(), value)
            })
            .collect();
    }

    pub fn restore_defaults(&mut self) {
        self.fields = self.spec.defaults();
    }

    /// Runs the calculator's formula over the current fields, replacing the
    /// previous result wholesale.
    pub fn recompute(&mut self) -> Option<&ResultRecord> {
        self.last_result = self.spec.compute(&self.fields);
        self.last_result.as_ref()
    }
}

/// A mounted calculator: its store bound to the shared address bar.
pub struct CalculatorSession {
    store: InputStateStore,
    codec: UrlCodec,
    address_bar: SharedAddressBar,
    listener: Option<ListenerId>,
}

impl CalculatorSession {
    /// Reads the calculator's fields from the current URL, falling back to
    /// defaults, and computes. The URL is not rewritten.
    pub fn mount(
        spec: &'static CalculatorSpec,
        address_bar: SharedAddressBar,
    ) -> Self {
        let codec = UrlCodec::new(spec);
        let mut store = InputStateStore::new(spec);
        let query = address_bar.borrow().query();
        store.replace_all(&codec.decode(&query));
        store.recompute();
        debug!(calculator = spec.id, computed = store.last_result().is_some(), "mounted");

        Self {
            store,
            codec,
            address_bar,
            listener: None,
        }
    }

    pub fn spec(&self) -> &'static CalculatorSpec {
        self.store.spec()
    }

    pub fn store(&self) -> &InputStateStore {
        &self.store
    }

    pub fn result(&self) -> Option<&ResultRecord> {
        self.store.last_result()
    }

    /// An owned copy of the current fields, for publishers.
    pub fn snapshot(&self) -> FieldValues {
        self.store.fields().clone()
    }

    /// Stores one edit, rewrites this calculator's parameters in place
    /// (no history entry) and recomputes.
    pub fn update_field(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<Option<&ResultRecord>, StateError> {
        self.store.set_field(name, value)?;
        self.write_url();
        Ok(self.store.recompute())
    }

    /// Restores defaults and clears this calculator's parameters. Other
    /// parameters are untouched.
    pub fn reset(&mut self) -> Option<&ResultRecord> {
        self.store.restore_defaults();
        self.write_url();
        self.store.recompute()
    }

    /// Re-reads the fields from `query` after a back/forward and recomputes.
    pub fn apply_navigation(
        &mut self,
        query: &QueryString,
    ) -> Option<&ResultRecord> {
        self.store.replace_all(&self.codec.decode(query));
        debug!(calculator = self.spec().id, "re-hydrated from history");
        self.store.recompute()
    }

    /// Adds a history entry for the current URL, so that back returns to
    /// the state as it is now.
    pub fn checkpoint(&self) {
        let mut address_bar = self.address_bar.borrow_mut();
        let query = address_bar.query();
        address_bar.push_state(&query);
    }

    fn write_url(&self) {
        let mut address_bar = self.address_bar.borrow_mut();
        let mut query = address_bar.query();
        self.codec.encode_into(&mut query, self.store.fields());
        address_bar.replace_state(&query);
    }

    /// Subscribes `session` to the navigator's back/forward events.
    ///
    /// The navigator holds only a weak reference. A session dropped without
    /// [`CalculatorSession::detach`] is unsubscribed at the next navigation.
    pub fn attach(
        session: &Rc<RefCell<Self>>,
        navigator: &mut Navigator,
    ) -> ListenerId {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(session);
        let id = navigator.subscribe(move |event| {
            let Some(session) = weak.upgrade() else {
                return false;
            };
            let Ok(mut session) = session.try_borrow_mut() else {
                warn!(href = %event.href, "session busy; skipping history navigation");
                return true;
            };
            session.apply_navigation(&event.query);
            true
        });
        session.borrow_mut().listener = Some(id);
        id
    }

    /// Removes the subscription made by [`CalculatorSession::attach`].
    pub fn detach(
        session: &Rc<RefCell<Self>>,
        navigator: &mut Navigator,
    ) -> bool {
        match session.borrow_mut().listener.take() {
            Some(id) => navigator.remove_listener(id),
            None => false,
        }
    }
}
