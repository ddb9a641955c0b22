//! Command logic for `fincalc`: one in-memory page per invocation.
//!
//! A [`Page`] owns a [`MemoryAddressBar`] loaded with the URL given on the
//! command line, a [`Navigator`] for back/forward, and a mounted session for
//! whichever calculator `in` names.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use calc_core::publish::{ComparisonTray, Summary};
use calc_core::{CALCULATORS, CalculatorSpec};
use calc_state::{
    AddressBar, CalculatorSession, MemoryAddressBar, Navigator, StateError, activate,
    active_calculator, build_share_link,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq)]
pub enum AppError {
    #[error("no calculator selected in '{0}' (add in=<id> to the query)")]
    NoActiveCalculator(String),

    #[error("expected name=value, got '{0}'")]
    InvalidEdit(String),

    #[error(transparent)]
    State(#[from] StateError),
}

/// One `name=value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub name: String,
    pub value: String,
}

impl FromStr for Edit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => Ok(Self {
                name: name.trim().to_string(),
                value: value.to_string(),
            }),
            _ => Err(AppError::InvalidEdit(s.to_string())),
        }
    }
}

pub struct Page {
    address_bar: Rc<RefCell<MemoryAddressBar>>,
    navigator: Navigator,
    session: Rc<RefCell<CalculatorSession>>,
}

impl Page {
    /// Loads `url` and mounts the calculator named by its `in` parameter.
    pub fn open(url: &str) -> Result<Self, AppError> {
        let address_bar = MemoryAddressBar::shared(url);
        let spec = active_calculator(&address_bar.borrow().query())
            .ok_or_else(|| AppError::NoActiveCalculator(url.to_string()))?;

        let mut navigator = Navigator::new(address_bar.clone());
        let session = mount(spec, &mut navigator);
        info!(calculator = spec.id, "opened page");

        Ok(Self {
            address_bar,
            navigator,
            session,
        })
    }

    pub fn spec(&self) -> &'static CalculatorSpec {
        self.session.borrow().spec()
    }

    pub fn href(&self) -> String {
        self.address_bar.borrow().href()
    }

    pub fn summary(&self) -> Summary {
        let session = self.session.borrow();
        Summary::new(session.spec(), session.store().fields(), session.result())
    }

    pub fn report(&self) -> Report {
        Report {
            href: self.href(),
            summary: self.summary(),
        }
    }

    /// Applies each edit in place; the page keeps a single history entry.
    pub fn apply(
        &mut self,
        edits: &[Edit],
    ) -> Result<(), AppError> {
        let mut session = self.session.borrow_mut();
        for edit in edits {
            session.update_field(&edit.name, &edit.value)?;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.session.borrow_mut().reset();
    }

    /// Applies each edit as its own history entry, then goes back `steps`
    /// entries. Returns how many steps were actually taken. A rejected edit
    /// adds no entry.
    pub fn replay(
        &mut self,
        edits: &[Edit],
        steps: usize,
    ) -> Result<usize, AppError> {
        for edit in edits {
            let mut session = self.session.borrow_mut();
            session.store().sanitize(&edit.name, &edit.value)?;
            session.checkpoint();
            session.update_field(&edit.name, &edit.value)?;
        }

        let mut taken = 0;
        while taken < steps && self.navigator.back() {
            taken += 1;
        }
        debug!(requested = steps, taken, "replayed history");
        Ok(taken)
    }

    /// Switches to calculator `id` with a new history entry and mounts it.
    pub fn switch(
        &mut self,
        id: &str,
    ) -> Result<(), AppError> {
        let spec = activate(&self.navigator.address_bar(), id)?;
        if spec.id == self.spec().id {
            return Ok(());
        }

        CalculatorSession::detach(&self.session, &mut self.navigator);
        self.session = mount(spec, &mut self.navigator);
        Ok(())
    }

    pub fn share_link(
        &self,
        base_url: &str,
    ) -> String {
        let session = self.session.borrow();
        build_share_link(base_url, session.spec(), session.store().fields())
    }

    /// Saves the current calculation to `tray`. Nothing is saved while the
    /// inputs do not produce a result.
    pub fn add_to(
        &self,
        tray: &mut ComparisonTray,
    ) -> bool {
        let session = self.session.borrow();
        match session.result() {
            Some(result) => {
                tray.add(session.spec(), session.store().fields(), result);
                true
            }
            None => false,
        }
    }
}

/// What a page command prints: the resulting URL and the calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub href: String,
    pub summary: Summary,
}

impl fmt::Display for Report {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", self.href)?;
        writeln!(f)?;
        write!(f, "{}", self.summary)
    }
}

fn mount(
    spec: &'static CalculatorSpec,
    navigator: &mut Navigator,
) -> Rc<RefCell<CalculatorSession>> {
    let session = Rc::new(RefCell::new(CalculatorSession::mount(
        spec,
        navigator.address_bar(),
    )));
    CalculatorSession::attach(&session, navigator);
    session
}

/// Row of the `list` command.
pub struct CatalogLine(&'static CalculatorSpec);

impl fmt::Display for CatalogLine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let fields: Vec<_> = self.0.fields.iter().map(|field| field.name).collect();
        write!(
            f,
            "{:<16} {:<26} {:<8} {}",
            self.0.id,
            self.0.title,
            self.0.namespace,
            fields.join(", ")
        )
    }
}

pub fn catalog() -> impl Iterator<Item = CatalogLine> {
    CALCULATORS.iter().map(CatalogLine)
}
