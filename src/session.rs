use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{ExError, ExResult};
use crate::ex::alias::CommandAlias;
use crate::options::Options;
use crate::register::{Register, RegisterGroup, RegisterOp};
use crate::search::SearchState;
use crate::traits::{Clipboard, HostUi, NoClipboard, NoHostUi, SettingsStore};
use crate::types::SelectionType;

const DEFAULT_BELL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_MAX_ALIAS_DEPTH: usize = 1000;

/// State shared by every editor of one Vim session.
///
/// Registers, search history, user commands and the `:global` guard live
/// here instead of in process globals, so independent sessions never see
/// each other.
pub struct Session {
    options: Options,
    registers: RegisterGroup,
    search: SearchState,
    last_substitute_flags: String,
    aliases: BTreeMap<String, CommandAlias>,
    global_busy: bool,
    interrupted: bool,
    clipboard: Box<dyn Clipboard>,
    host: Box<dyn HostUi>,
    bell_interval: Duration,
    last_bell: Option<Instant>,
    max_alias_depth: usize,
    last_error: Option<ExError>,
}

/// Observable session state, for hosts and tests.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub options: Options,
    pub search: SearchState,
    pub global_busy: bool,
    pub aliases: Vec<String>,
    pub last_error: Option<ExError>,
}

pub struct SessionBuilder {
    options: Options,
    search: SearchState,
    clipboard: Box<dyn Clipboard>,
    host: Box<dyn HostUi>,
    bell_interval: Duration,
    max_alias_depth: usize,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            options: Options::default(),
            search: SearchState::default(),
            clipboard: Box::new(NoClipboard),
            host: Box::new(NoHostUi),
            bell_interval: DEFAULT_BELL_INTERVAL,
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
        }
    }
}

impl SessionBuilder {
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn host(mut self, host: impl HostUi + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Minimum time between two audible bells.
    pub fn bell_interval(mut self, interval: Duration) -> Self {
        self.bell_interval = interval;
        self
    }

    pub fn max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }

    /// Restores search history persisted by [`Session::shutdown`].
    pub fn load_state(mut self, store: &dyn SettingsStore) -> Self {
        self.search = SearchState::load(store);
        self
    }

    pub fn build(self) -> Session {
        debug!(options = ?self.options, "session started");
        Session {
            options: self.options,
            registers: RegisterGroup::new(),
            search: self.search,
            last_substitute_flags: String::new(),
            aliases: BTreeMap::new(),
            global_busy: false,
            interrupted: false,
            clipboard: self.clipboard,
            host: self.host,
            bell_interval: self.bell_interval,
            last_bell: None,
            max_alias_depth: self.max_alias_depth,
            last_error: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        SessionBuilder::default().build()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            options: self.options.clone(),
            search: self.search.clone(),
            global_busy: self.global_busy,
            aliases: self.aliases.keys().cloned().collect(),
            last_error: self.last_error.clone(),
        }
    }

    /// Persists search history and ends the session.
    pub fn shutdown(self, store: &mut dyn SettingsStore) {
        self.search.save(store);
        debug!("session shut down");
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn registers(&self) -> &RegisterGroup {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterGroup {
        &mut self.registers
    }

    /// Routes yanked or deleted text into the registers.
    pub fn store_text(
        &mut self,
        register: Option<char>,
        text: &str,
        kind: SelectionType,
        op: RegisterOp,
    ) -> ExResult {
        self.registers
            .store_text(self.clipboard.as_mut(), &self.options, register, text, kind, op)
    }

    /// Reads a register; `None` picks the default one.
    pub fn register(&mut self, name: Option<char>) -> Option<Register> {
        let name = name.unwrap_or_else(|| RegisterGroup::default_register(&self.options));
        self.registers.get(self.clipboard.as_mut(), name)
    }

    pub fn list_registers(&mut self) -> Vec<Register> {
        self.registers.list(self.clipboard.as_mut())
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchState {
        &mut self.search
    }

    pub(crate) fn last_substitute_flags(&self) -> &str {
        &self.last_substitute_flags
    }

    pub(crate) fn set_last_substitute_flags(&mut self, flags: &str) {
        self.last_substitute_flags = flags.to_string();
    }

    pub fn alias(&self, name: &str) -> Option<&CommandAlias> {
        self.aliases.get(name)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &CommandAlias> {
        self.aliases.values()
    }

    pub(crate) fn add_alias(&mut self, alias: CommandAlias) {
        self.aliases.insert(alias.name().to_string(), alias);
    }

    pub(crate) fn remove_alias(&mut self, name: &str) -> Option<CommandAlias> {
        self.aliases.remove(name)
    }

    pub(crate) fn clear_aliases(&mut self) {
        self.aliases.clear();
    }

    pub fn max_alias_depth(&self) -> usize {
        self.max_alias_depth
    }

    pub fn is_global_busy(&self) -> bool {
        self.global_busy
    }

    pub(crate) fn set_global_busy(&mut self, busy: bool) {
        self.global_busy = busy;
    }

    /// Asks a running `:global` to stop before its next line.
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    /// Reads and clears the interrupt request.
    pub(crate) fn take_interrupted(&mut self) -> bool {
        std::mem::take(&mut self.interrupted)
    }

    pub fn host_mut(&mut self) -> &mut dyn HostUi {
        self.host.as_mut()
    }

    pub fn show_message(&mut self, message: &str) {
        self.host.show_message(message);
    }

    pub fn output(&mut self, text: &str) {
        self.host.output(text);
    }

    /// Rings the bell unless it already rang within the throttle interval.
    pub fn bell(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_bell
            && now.duration_since(last) < self.bell_interval
        {
            trace!("bell throttled");
            return;
        }
        self.last_bell = Some(now);
        self.host.beep();
    }

    /// Shows `error` once, rings the bell and keeps it for [`Self::last_error`].
    pub fn report_error(&mut self, error: &ExError) {
        if let Some(message) = error.message() {
            self.host.show_message(&message);
        }
        self.bell();
        self.last_error = Some(error.clone());
    }

    pub fn last_error(&self) -> Option<&ExError> {
        self.last_error.as_ref()
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }
}
