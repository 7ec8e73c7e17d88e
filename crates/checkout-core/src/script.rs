//! Script Emission
//!
//! Phase-partitioned, insertion-ordered buffer of script fragments and
//! external script files for one page render.
//!
//! ```text
//! <head>   Head   external SDK files, head scripts
//! <body>   Begin  SDK initialization (key, client instance)
//!          ...    rendered markup (registers DOM ids)
//!          End    end-of-body files and scripts
//! </body>  Ready  DOM-dependent mounting and event binding
//! ```
//!
//! Statements within a phase keep emission order; flushing a phase checks
//! that every DOM id its fragments depend on was registered by a renderer.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WidgetError};
use crate::js::Statement;

/// Page-load position a fragment executes at, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Head,
    Begin,
    End,
    Ready,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Head, Phase::Begin, Phase::End, Phase::Ready];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Head => "head",
            Phase::Begin => "begin",
            Phase::End => "end",
            Phase::Ready => "ready",
        }
    }

    /// Whether rendered markup exists by the time this phase runs
    pub fn sees_dom(&self) -> bool {
        *self >= Phase::End
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered statements scheduled at one phase
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptFragment {
    phase: Phase,
    statements: Vec<Statement>,
    depends_on: Vec<String>,
}

impl ScriptFragment {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            statements: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    #[must_use]
    pub fn statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Record a DOM id this fragment selects or mounts into
    #[must_use]
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }

    pub fn render(&self) -> String {
        self.statements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// How an external script file is fetched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    /// Blocking load, executed before following markup
    #[default]
    Sync,
    Async,
    /// Fetched in parallel, executed after parsing in document order
    Defer,
}

impl Loading {
    /// Earliest phase code calling into a head file loaded this way can run.
    ///
    /// A deferred file executes before the ready event fires; an async file
    /// has no ordering guarantee against any phase.
    pub fn init_phase(&self) -> Result<Phase> {
        match self {
            Loading::Sync => Ok(Phase::Begin),
            Loading::Defer => Ok(Phase::Ready),
            Loading::Async => Err(WidgetError::Config(
                "SDK initialization cannot follow an async script; load it with defer".into(),
            )),
        }
    }
}

/// External script file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptFile {
    pub src: String,
    pub phase: Phase,
    pub loading: Loading,
}

impl ScriptFile {
    pub fn new(src: impl Into<String>, phase: Phase) -> Self {
        Self {
            src: src.into(),
            phase,
            loading: Loading::Sync,
        }
    }

    #[must_use]
    pub fn loading(mut self, loading: Loading) -> Self {
        self.loading = loading;
        self
    }
}

/// One-shot flag guarding page-global initialization
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandlerLatch {
    set: bool,
}

impl HandlerLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    /// Set the latch; `true` only for the first caller
    pub fn acquire(&mut self) -> bool {
        !std::mem::replace(&mut self.set, true)
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// Phase-partitioned script buffer for one page render
#[derive(Debug, Default)]
pub struct ScriptEmitter {
    fragments: Vec<ScriptFragment>,
    files: Vec<ScriptFile>,
    known_ids: HashSet<String>,
    latches: HashMap<String, HandlerLatch>,
}

impl ScriptEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment to its phase.
    ///
    /// Fragments bound to DOM ids must run no earlier than [`Phase::End`].
    pub fn emit(&mut self, fragment: ScriptFragment) -> Result<()> {
        if !fragment.phase.sees_dom() {
            if let Some(id) = fragment.depends_on.first() {
                return Err(WidgetError::PhaseOrder {
                    id: id.clone(),
                    phase: fragment.phase,
                });
            }
        }

        tracing::debug!(
            phase = %fragment.phase,
            statements = fragment.statements.len(),
            depends_on = ?fragment.depends_on,
            "Emitted script fragment"
        );
        self.fragments.push(fragment);
        Ok(())
    }

    /// Emit page-global initialization at most once per latch name.
    ///
    /// Returns whether the fragments were emitted.
    pub fn emit_once<I>(&mut self, latch: &str, fragments: I) -> Result<bool>
    where
        I: IntoIterator<Item = ScriptFragment>,
    {
        if !self.latches.entry(latch.to_string()).or_default().acquire() {
            tracing::debug!(latch = %latch, "Initialization already emitted for this page");
            return Ok(false);
        }

        for fragment in fragments {
            self.emit(fragment)?;
        }
        Ok(true)
    }

    pub fn is_latched(&self, latch: &str) -> bool {
        self.latches.get(latch).is_some_and(HandlerLatch::is_set)
    }

    /// Register an external file; repeated sources are ignored
    pub fn register_file(&mut self, file: ScriptFile) {
        if self.files.iter().any(|f| f.src == file.src) {
            return;
        }
        self.files.push(file);
    }

    pub fn files(&self, phase: Phase) -> impl Iterator<Item = &ScriptFile> {
        self.files.iter().filter(move |f| f.phase == phase)
    }

    /// Record a DOM id a renderer put on the page; each id may be rendered
    /// once
    pub fn register_id(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if self.known_ids.contains(&id) {
            tracing::warn!(id = %id, "DOM id rendered twice on one page");
            return Err(WidgetError::DuplicateId { id });
        }
        self.known_ids.insert(id);
        Ok(())
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.known_ids.contains(id)
    }

    /// Fragments pending in a phase, in emission order
    pub fn fragments(&self, phase: Phase) -> impl Iterator<Item = &ScriptFragment> {
        self.fragments.iter().filter(move |f| f.phase == phase)
    }

    /// Number of fragments pending in a phase
    pub fn pending(&self, phase: Phase) -> usize {
        self.fragments.iter().filter(|f| f.phase == phase).count()
    }

    /// First dependency of a pending fragment that no renderer registered
    pub fn dangling(&self, phase: Phase) -> Option<&str> {
        self.fragments
            .iter()
            .filter(|f| f.phase == phase)
            .flat_map(|f| f.depends_on.iter())
            .find(|id| !self.known_ids.contains(*id))
            .map(String::as_str)
    }

    /// Drain a phase and return its statements in emission order
    pub fn flush(&mut self, phase: Phase) -> Result<String> {
        if let Some(id) = self.dangling(phase) {
            tracing::warn!(id = %id, phase = %phase, "Script references unrendered DOM id");
            return Err(WidgetError::DanglingReference {
                id: id.to_string(),
                phase,
            });
        }

        let (flushed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.fragments)
            .into_iter()
            .partition(|f| f.phase == phase);
        self.fragments = kept;

        Ok(flushed
            .iter()
            .map(ScriptFragment::render)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
