//! Simulated training labs.
//!
//! Every lab is a small state machine over fixed string literals. Nothing a
//! user types is ever executed; inputs are pattern-matched and scripted
//! output is appended to the lab log.
//!
//! A [`LabSession`] drives one [`Lab`] through the shared lifecycle:
//! `start`, any number of `input`/`submit_flag` calls, and `reset`.

mod command_injection;
mod directory_traversal;
mod guided;
mod incident_response;
mod network_security;
mod sql_injection;
mod xss;

use serde::Serialize;

pub use command_injection::CommandInjectionLab;
pub use directory_traversal::DirectoryTraversalLab;
pub use guided::{Finding, GuidedLab, GuidedStep};
pub use incident_response::IncidentResponseLab;
pub use network_security::NetworkSecurityLab;
pub use sql_injection::SqlInjectionLab;
pub use xss::XssLab;

/// Score awarded when a flag is accepted.
pub const FLAG_SCORE: u32 = 100;

/// Score awarded per completed phase or checklist item in terminal labs.
pub const CHECKLIST_ITEM_SCORE: u32 = 25;

/// Checkpoint key set on `start` by labs that track it.
pub const OPENED_LAB: &str = "opened_lab";

/// Checkpoint key set when a flag is accepted.
pub const SUBMITTED: &str = "submitted";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LabError {
    #[error("Unknown lab '{0}'")]
    UnknownLab(String),

    #[error("Lab '{0}' has not been started")]
    NotStarted(&'static str),

    #[error("Lab '{0}' does not accept flag submissions")]
    FlagNotSupported(&'static str),

    #[error("Input must not be empty")]
    EmptyInput,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabCategory {
    Attack,
    Defense,
}

impl LabCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            LabCategory::Attack => "attack",
            LabCategory::Defense => "defense",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabKind {
    SqlInjection,
    Xss,
    CommandInjection,
    DirectoryTraversal,
    SystemHardening,
    NetworkSecurity,
    IncidentResponse,
    WebAppTesting,
}

impl LabKind {
    pub const ALL: [LabKind; 8] = [
        LabKind::SqlInjection,
        LabKind::Xss,
        LabKind::CommandInjection,
        LabKind::DirectoryTraversal,
        LabKind::SystemHardening,
        LabKind::NetworkSecurity,
        LabKind::IncidentResponse,
        LabKind::WebAppTesting,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            LabKind::SqlInjection => "sql-injection",
            LabKind::Xss => "xss",
            LabKind::CommandInjection => "command-injection",
            LabKind::DirectoryTraversal => "directory-traversal",
            LabKind::SystemHardening => "system-hardening",
            LabKind::NetworkSecurity => "network-security",
            LabKind::IncidentResponse => "incident-response",
            LabKind::WebAppTesting => "web-app-testing",
        }
    }

    pub fn from_slug(slug: &str) -> Result<Self, LabError> {
        Self::ALL
            .into_iter()
            .find(|k| k.slug() == slug)
            .ok_or_else(|| LabError::UnknownLab(slug.to_string()))
    }

    pub fn title(self) -> &'static str {
        match self {
            LabKind::SqlInjection => "SQL Injection",
            LabKind::Xss => "Cross-Site Scripting (XSS)",
            LabKind::CommandInjection => "Command Injection",
            LabKind::DirectoryTraversal => "Directory Traversal",
            LabKind::SystemHardening => "System Hardening",
            LabKind::NetworkSecurity => "Network Security Configuration",
            LabKind::IncidentResponse => "Incident Response",
            LabKind::WebAppTesting => "Web Application Security Testing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LabKind::SqlInjection => {
                "Bypass a vulnerable login form and dump the users table with UNION-based injection."
            }
            LabKind::Xss => "Inject a script into a reflected search field and steal the session cookie.",
            LabKind::CommandInjection => {
                "Chain shell commands onto a vulnerable ping utility to read a secret file."
            }
            LabKind::DirectoryTraversal => {
                "Escape the web root of a file viewer to read files in parent directories."
            }
            LabKind::SystemHardening => {
                "Secure a Linux host: patch packages, enable the firewall and tighten password policy."
            }
            LabKind::NetworkSecurity => {
                "Configure firewall rules, an IDS, monitoring, VPN and secure DNS, then scan the network."
            }
            LabKind::IncidentResponse => {
                "Walk a data breach through the six-phase incident response lifecycle."
            }
            LabKind::WebAppTesting => {
                "Assess a web application from reconnaissance through SQL injection and XSS testing."
            }
        }
    }

    pub fn category(self) -> LabCategory {
        match self {
            LabKind::SqlInjection
            | LabKind::Xss
            | LabKind::CommandInjection
            | LabKind::DirectoryTraversal => LabCategory::Attack,
            LabKind::SystemHardening
            | LabKind::NetworkSecurity
            | LabKind::IncidentResponse
            | LabKind::WebAppTesting => LabCategory::Defense,
        }
    }

    /// The flag that completes the lab, for attack labs.
    pub fn flag(self) -> Option<&'static str> {
        match self {
            LabKind::SqlInjection => Some(sql_injection::FLAG),
            LabKind::Xss => Some(xss::FLAG),
            LabKind::CommandInjection => Some(command_injection::FLAG),
            LabKind::DirectoryTraversal => Some(directory_traversal::FLAG),
            _ => None,
        }
    }

    pub fn max_score(self) -> u32 {
        match self {
            LabKind::SqlInjection
            | LabKind::Xss
            | LabKind::CommandInjection
            | LabKind::DirectoryTraversal => FLAG_SCORE,
            LabKind::NetworkSecurity | LabKind::IncidentResponse => CHECKLIST_ITEM_SCORE * 6,
            LabKind::SystemHardening => guided::system_hardening_max_score(),
            LabKind::WebAppTesting => guided::web_app_testing_max_score(),
        }
    }

    /// Build a fresh, unstarted lab of this kind.
    pub fn create(self) -> Box<dyn Lab> {
        match self {
            LabKind::SqlInjection => Box::new(SqlInjectionLab::new()),
            LabKind::Xss => Box::new(XssLab::new()),
            LabKind::CommandInjection => Box::new(CommandInjectionLab::new()),
            LabKind::DirectoryTraversal => Box::new(DirectoryTraversalLab::new()),
            LabKind::SystemHardening => Box::new(GuidedLab::system_hardening()),
            LabKind::NetworkSecurity => Box::new(NetworkSecurityLab::new()),
            LabKind::IncidentResponse => Box::new(IncidentResponseLab::new()),
            LabKind::WebAppTesting => Box::new(GuidedLab::web_app_testing()),
        }
    }

    pub fn info(self) -> LabInfo {
        LabInfo {
            slug: self.slug(),
            title: self.title(),
            category: self.category(),
            description: self.description(),
            max_score: self.max_score(),
            has_flag: self.flag().is_some(),
        }
    }
}

/// Catalog entry returned by the lab listing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct LabInfo {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: LabCategory,
    pub description: &'static str,
    pub max_score: u32,
    pub has_flag: bool,
}

/// Full lab catalog in display order.
pub fn catalog() -> Vec<LabInfo> {
    LabKind::ALL.into_iter().map(LabKind::info).collect()
}

/// Catalog entries for one category.
pub fn catalog_for(category: LabCategory) -> Vec<LabInfo> {
    LabKind::ALL
        .into_iter()
        .filter(|k| k.category() == category)
        .map(LabKind::info)
        .collect()
}

// ---------------------------------------------------------------------------
// Shared lab state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabMessage {
    pub kind: MessageKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub key: &'static str,
    pub label: &'static str,
    pub done: bool,
}

/// State common to every lab.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabCore {
    pub started: bool,
    pub checkpoints: Vec<Checkpoint>,
    pub log: Vec<String>,
    pub message: Option<LabMessage>,
    pub score: u32,
    pub completed: bool,
}

impl LabCore {
    pub fn new(checkpoints: &[(&'static str, &'static str)]) -> Self {
        Self {
            checkpoints: checkpoints
                .iter()
                .map(|&(key, label)| Checkpoint {
                    key,
                    label,
                    done: false,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Mark a checkpoint as done. Returns `true` if it was not done before.
    pub fn check(&mut self, key: &str) -> bool {
        match self.checkpoints.iter_mut().find(|c| c.key == key) {
            Some(c) if !c.done => {
                c.done = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.checkpoints.iter().any(|c| c.key == key && c.done)
    }

    pub fn checked_count(&self) -> usize {
        self.checkpoints.iter().filter(|c| c.done).count()
    }

    pub fn all_checked(&self) -> bool {
        self.checkpoints.iter().all(|c| c.done)
    }

    pub fn append_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set_message(MessageKind::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.set_message(MessageKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set_message(MessageKind::Error, text);
    }

    fn set_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(LabMessage {
            kind,
            text: text.into(),
        });
    }
}

/// Current wall-clock time formatted for log lines.
pub(crate) fn clock() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// Lab trait + session driver
// ---------------------------------------------------------------------------

/// One simulated lab.
///
/// Implementors only handle input for a started lab. Lifecycle checks, flag
/// comparison and completion bookkeeping live in [`LabSession`].
pub trait Lab: Send + Sync {
    fn kind(&self) -> LabKind;

    fn core(&self) -> &LabCore;

    fn core_mut(&mut self) -> &mut LabCore;

    /// Extra log lines written after the start banner.
    fn boot_lines(&self) -> Vec<String> {
        Vec::new()
    }

    /// Handle one non-empty input. Returns the output lines for this input.
    fn handle(&mut self, input: &str) -> Vec<String>;

    /// Lab-specific data for snapshots.
    fn details(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// Result of feeding input to a lab.
#[derive(Debug, Clone, Serialize)]
pub struct InputOutcome {
    pub output: Vec<String>,
    /// `true` only for the input that completed the lab.
    pub just_completed: bool,
}

/// Result of a flag submission.
#[derive(Debug, Clone, Serialize)]
pub struct FlagOutcome {
    pub accepted: bool,
    pub just_completed: bool,
}

/// Serializable view of a lab session.
#[derive(Debug, Clone, Serialize)]
pub struct LabSnapshot {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: LabCategory,
    #[serde(flatten)]
    pub core: LabCore,
    pub max_score: u32,
    pub details: serde_json::Value,
}

pub struct LabSession {
    lab: Box<dyn Lab>,
    /// Set once the caller has persisted this session's completion.
    completion_recorded: bool,
}

impl std::fmt::Debug for LabSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabSession")
            .field("kind", &self.lab.kind())
            .field("core", self.lab.core())
            .field("completion_recorded", &self.completion_recorded)
            .finish()
    }
}

impl LabSession {
    pub fn new(kind: LabKind) -> Self {
        Self {
            lab: kind.create(),
            completion_recorded: false,
        }
    }

    pub fn kind(&self) -> LabKind {
        self.lab.kind()
    }

    pub fn core(&self) -> &LabCore {
        self.lab.core()
    }

    /// Start the lab. Starting an already-started lab leaves it untouched.
    pub fn start(&mut self) {
        if self.lab.core().started {
            return;
        }
        let kind = self.lab.kind();
        let boot = self.lab.boot_lines();
        let core = self.lab.core_mut();
        core.started = true;
        core.check(OPENED_LAB);
        core.log
            .push(format!("{} Lab started at {}", kind.title(), clock()));
        core.log.extend(boot);
        core.message = None;
    }

    pub fn input(&mut self, input: &str) -> Result<InputOutcome, LabError> {
        self.ensure_started()?;
        if input.trim().is_empty() {
            return Err(LabError::EmptyInput);
        }

        let was_completed = self.lab.core().completed;
        let output = self.lab.handle(input);
        let just_completed = !was_completed && self.lab.core().completed;

        Ok(InputOutcome {
            output,
            just_completed,
        })
    }

    /// Compare `submitted` with the lab's flag. Only an exact match is
    /// accepted; surrounding whitespace makes it a different string.
    pub fn submit_flag(&mut self, submitted: &str) -> Result<FlagOutcome, LabError> {
        let kind = self.lab.kind();
        let flag = kind.flag().ok_or(LabError::FlagNotSupported(kind.slug()))?;
        self.ensure_started()?;

        let core = self.lab.core_mut();
        let was_completed = core.completed;
        let accepted = submitted == flag;

        if accepted {
            core.check(SUBMITTED);
            core.append_log(format!("Flag submitted: {submitted}"));
            core.success(format!("Correct! {} lab completed!", kind.title()));
            core.score = FLAG_SCORE;
            core.completed = true;
        } else {
            core.append_log(format!("Flag submission attempt: {submitted}"));
            core.error(format!(
                "Incorrect flag. Extract it using {}.",
                kind.title().to_lowercase()
            ));
        }

        Ok(FlagOutcome {
            accepted,
            just_completed: !was_completed && core.completed,
        })
    }

    /// Discard all progress and return to the unstarted state.
    pub fn reset(&mut self) {
        self.lab = self.lab.kind().create();
        self.completion_recorded = false;
    }

    /// Score of a completion that has not been persisted yet.
    ///
    /// Stays `Some` until [`mark_completion_recorded`](Self::mark_completion_recorded)
    /// is called, so a failed save is retried on the next request.
    pub fn unrecorded_completion(&self) -> Option<u32> {
        let core = self.lab.core();
        (core.completed && !self.completion_recorded).then_some(core.score)
    }

    pub fn mark_completion_recorded(&mut self) {
        if self.lab.core().completed {
            self.completion_recorded = true;
        }
    }

    pub fn snapshot(&self) -> LabSnapshot {
        let kind = self.lab.kind();
        LabSnapshot {
            slug: kind.slug(),
            title: kind.title(),
            category: kind.category(),
            core: self.lab.core().clone(),
            max_score: kind.max_score(),
            details: self.lab.details(),
        }
    }

    fn ensure_started(&self) -> Result<(), LabError> {
        if self.lab.core().started {
            Ok(())
        } else {
            Err(LabError::NotStarted(self.lab.kind().slug()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
