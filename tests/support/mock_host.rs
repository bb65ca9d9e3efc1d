use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use vim_core::traits::{HostUi, SettingsStore};

#[derive(Default, Debug)]
pub struct HostLog {
    pub messages: Vec<String>,
    pub beeps: usize,
    pub output: Vec<String>,
    pub actions: Vec<String>,
}

/// Host UI recording everything the session sends it.
#[derive(Default, Debug, Clone)]
pub struct MockHost {
    log: Rc<RefCell<HostLog>>,
    known_actions: Vec<String>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(actions: &[&str]) -> Self {
        MockHost {
            log: Rc::default(),
            known_actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.log.borrow().messages.clone()
    }

    pub fn beeps(&self) -> usize {
        self.log.borrow().beeps
    }

    pub fn output(&self) -> Vec<String> {
        self.log.borrow().output.clone()
    }

    pub fn last_output(&self) -> Option<String> {
        self.log.borrow().output.last().cloned()
    }

    pub fn actions(&self) -> Vec<String> {
        self.log.borrow().actions.clone()
    }
}

impl HostUi for MockHost {
    fn show_message(&mut self, message: &str) {
        self.log.borrow_mut().messages.push(message.to_string());
    }

    fn beep(&mut self) {
        self.log.borrow_mut().beeps += 1;
    }

    fn output(&mut self, text: &str) {
        self.log.borrow_mut().output.push(text.to_string());
    }

    fn execute_action(&mut self, name: &str) -> bool {
        if !self.known_actions.iter().any(|a| a == name) {
            return false;
        }
        self.log.borrow_mut().actions.push(name.to_string());
        true
    }
}

/// In-memory settings store.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    strings: HashMap<String, String>,
    bools: HashMap<String, bool>,
}

impl SettingsStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(v) => {
                self.strings.insert(key.to_string(), v.to_string());
            }
            None => {
                self.strings.remove(key);
            }
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.bools.get(key).copied()
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.bools.insert(key.to_string(), value);
    }
}
