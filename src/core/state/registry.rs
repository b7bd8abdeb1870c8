//=========================================================================
// State Registry
//=========================================================================
//
// Named state factories.
//
// Lets callers push "any registered state type" by name without runtime
// type activation: each entry is a plain closure producing a fresh state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{State, StateStackError};

//=== Factory Type ========================================================

type Factory = Box<dyn Fn() -> Box<dyn State> + Send>;

//=== StateRegistry =======================================================

/// Table of state factories keyed by name.
///
/// # Example
///
/// ```rust
/// # use aetheric_states::prelude::*;
/// # struct Options;
/// # impl State for Options {}
/// let mut registry = StateRegistry::new();
/// registry.register("options", || Options);
///
/// let mut stack = StateStack::new();
/// let options = registry.create("options").unwrap();
/// stack.overlay_named("options", options).unwrap();
/// ```
#[derive(Default)]
pub struct StateRegistry {
    factories: HashMap<String, Factory>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Registers a factory under `name`, replacing any previous one.
    pub fn register<S, F>(&mut self, name: &str, factory: F)
    where
        S: State + 'static,
        F: Fn() -> S + Send + 'static,
    {
        let boxed: Factory = Box::new(move || Box::new(factory()) as Box<dyn State>);

        if self.factories.insert(name.to_owned(), boxed).is_some() {
            warn!("State factory `{}` was already registered and has been replaced", name);
        } else {
            debug!("Registered state factory `{}`", name);
        }
    }

    //--- Construction -----------------------------------------------------

    /// Builds a fresh state from the factory registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn State>, StateStackError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| StateStackError::UnregisteredFactory(name.to_owned()))
    }

    //--- Query API --------------------------------------------------------

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

//=== Tests ===============================================================
