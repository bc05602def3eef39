//! Traced, failure-aware computations over a shared read-only state.
//!
//! A [`Flow`] is a deferred step run against a state `S` (the [`Graph`] in
//! practice) and a per-run [`Trace`]. Composition is strictly left to right
//! and fail-fast: once a step fails, nothing to its right is constructed or
//! run, so diagnostics are reproducible.
//!
//! [`Graph`]: crate::graph::Graph

use serde::Serialize;
use thiserror::Error;

use crate::name::Name;

/// Frame limit applied by [`Trace::default`].
pub const DEFAULT_MAX_TRACE_DEPTH: usize = 200;

// Innermost frames shown when a failure is rendered.
const RENDERED_FRAMES: usize = 8;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error, Serialize)]
pub enum ErrorKind {
    #[error("unresolved reference `{0}`")]
    UnresolvedReference(Name),
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("trace depth exceeded the limit of {0} frames")]
    DepthExceeded(usize),
    #[error("{0}")]
    Failed(String),
}

impl ErrorKind {
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ErrorKind::Failed(message.into())
    }
}

/// A terminal failure together with the trace frames active when it occurred.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("{kind}{}", render_stack(.stack))]
pub struct FlowError {
    pub kind: ErrorKind,
    /// Outermost frame first.
    pub stack: Vec<String>,
}

impl FlowError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            stack: Vec::new(),
        }
    }
}

fn render_stack(stack: &[String]) -> String {
    if stack.is_empty() {
        return String::new();
    }
    let skipped = stack.len().saturating_sub(RENDERED_FRAMES);
    let shown = stack[skipped..].join(" > ");
    if skipped > 0 {
        format!(" (in ... > {shown}, {skipped} outer frames elided)")
    } else {
        format!(" (in {shown})")
    }
}

/// Diagnostic state owned by a single run: the active frame stack, every
/// message appended so far, and the frame limit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trace {
    stack: Vec<String>,
    messages: Vec<String>,
    max_depth: usize,
}

impl Default for Trace {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_TRACE_DEPTH)
    }
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            messages: Vec::new(),
            max_depth,
        }
    }

    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.messages.push(format!("Warning: {}", message.as_ref()));
    }

    /// Run `body` with `label` pushed as the innermost frame. The frame is
    /// popped again whether `body` succeeds or fails.
    pub fn scoped<X>(
        &mut self,
        label: impl Into<String>,
        body: impl FnOnce(&mut Trace) -> Result<X, FlowError>,
    ) -> Result<X, FlowError> {
        if self.stack.len() >= self.max_depth {
            return Err(self.failure(ErrorKind::DepthExceeded(self.max_depth)));
        }
        self.stack.push(label.into());
        let result = body(self);
        self.stack.pop();
        result
    }

    /// Record a failure: snapshot the stack and append an `Error:` message.
    pub fn failure(&mut self, kind: ErrorKind) -> FlowError {
        log::debug!("flow failed: {kind}");
        self.messages.push(format!("Error: {kind}"));
        FlowError {
            kind,
            stack: self.stack.clone(),
        }
    }
}

/// Outcome of running a flow: its value or failure, plus the final trace.
#[derive(Debug)]
pub struct FlowState<X> {
    pub value: Result<X, FlowError>,
    pub trace: Trace,
}

impl<X> FlowState<X> {
    pub fn is_success(&self) -> bool {
        self.value.is_ok()
    }

    pub fn into_result(self) -> Result<X, FlowError> {
        self.value
    }
}

type Step<'a, S, X> = Box<dyn FnOnce(&S, &mut Trace) -> Result<X, FlowError> + 'a>;

/// A deferred computation reading state `S` and yielding `X` or a failure.
pub struct Flow<'a, S, X> {
    step: Step<'a, S, X>,
}

impl<'a, S: 'a, X: 'a> Flow<'a, S, X> {
    pub fn new(step: impl FnOnce(&S, &mut Trace) -> Result<X, FlowError> + 'a) -> Self {
        Self {
            step: Box::new(step),
        }
    }

    pub fn pure(value: X) -> Self {
        Self::new(move |_, _| Ok(value))
    }

    pub fn fail(kind: ErrorKind) -> Self {
        Self::new(move |_, trace| Err(trace.failure(kind)))
    }

    pub fn from_result(result: Result<X, ErrorKind>) -> Self {
        Self::new(move |_, trace| result.map_err(|kind| trace.failure(kind)))
    }

    pub fn with_state(read: impl FnOnce(&S) -> Result<X, ErrorKind> + 'a) -> Self {
        Self::new(move |state, trace| read(state).map_err(|kind| trace.failure(kind)))
    }

    /// Run this flow inside another flow's step.
    pub fn execute(self, state: &S, trace: &mut Trace) -> Result<X, FlowError> {
        (self.step)(state, trace)
    }

    pub fn bind<Y: 'a>(self, next: impl FnOnce(X) -> Flow<'a, S, Y> + 'a) -> Flow<'a, S, Y> {
        Flow::new(move |state, trace| {
            let value = self.execute(state, trace)?;
            next(value).execute(state, trace)
        })
    }

    pub fn map<Y: 'a>(self, f: impl FnOnce(X) -> Y + 'a) -> Flow<'a, S, Y> {
        Flow::new(move |state, trace| self.execute(state, trace).map(f))
    }

    /// Like [`Flow::map`] for a fallible conversion.
    pub fn and_then<Y: 'a>(
        self,
        f: impl FnOnce(X) -> Result<Y, ErrorKind> + 'a,
    ) -> Flow<'a, S, Y> {
        Flow::new(move |state, trace| {
            let value = self.execute(state, trace)?;
            f(value).map_err(|kind| trace.failure(kind))
        })
    }

    pub fn map2<Y: 'a, Z: 'a>(
        self,
        other: Flow<'a, S, Y>,
        combine: impl FnOnce(X, Y) -> Z + 'a,
    ) -> Flow<'a, S, Z> {
        Flow::new(move |state, trace| {
            let left = self.execute(state, trace)?;
            let right = other.execute(state, trace)?;
            Ok(combine(left, right))
        })
    }

    pub fn map3<Y: 'a, Z: 'a, R: 'a>(
        self,
        second: Flow<'a, S, Y>,
        third: Flow<'a, S, Z>,
        combine: impl FnOnce(X, Y, Z) -> R + 'a,
    ) -> Flow<'a, S, R> {
        Flow::new(move |state, trace| {
            let a = self.execute(state, trace)?;
            let b = second.execute(state, trace)?;
            let c = third.execute(state, trace)?;
            Ok(combine(a, b, c))
        })
    }

    pub fn with_trace(self, label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(move |state, trace| trace.scoped(label, |trace| self.execute(state, trace)))
    }

    /// Append a `Warning:` message once this flow has succeeded.
    pub fn warn(self, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |state, trace| {
            let value = self.execute(state, trace)?;
            trace.warn(message);
            Ok(value)
        })
    }

    pub fn run(self, state: &S) -> FlowState<X> {
        self.run_with(state, Trace::default())
    }

    pub fn run_with(self, state: &S, mut trace: Trace) -> FlowState<X> {
        let value = self.execute(state, &mut trace);
        FlowState { value, trace }
    }
}

/// Run `flows` left to right, stopping at the first failure.
pub fn sequence<'a, S: 'a, X: 'a>(flows: Vec<Flow<'a, S, X>>) -> Flow<'a, S, Vec<X>> {
    Flow::new(move |state, trace| {
        flows
            .into_iter()
            .map(|flow| flow.execute(state, trace))
            .collect()
    })
}

/// Build and run one flow per item, in order. Items after a failure are
/// never handed to `f`.
pub fn traverse<'a, S, T, X, I, F>(items: I, f: F) -> Flow<'a, S, Vec<X>>
where
    S: 'a,
    X: 'a,
    I: IntoIterator<Item = T> + 'a,
    F: FnMut(T) -> Flow<'a, S, X> + 'a,
{
    Flow::new(move |state, trace| {
        let mut f = f;
        items
            .into_iter()
            .map(|item| f(item).execute(state, trace))
            .collect()
    })
}
