//! Application render loop
//!
//! An [`App`] owns the state, a view function and named reducers. Commands
//! either go straight through [`App::dispatch`] or are queued by event
//! handlers through an [`Emitter`] and drained with [`App::flush`]. Every
//! handled command reduces the state and re-renders by patching the
//! committed tree.
//!
//! # Example
//!
//! ```
//! use tola_reconcile::app::{App, Emitter};
//! use tola_reconcile::event::Handler;
//! use tola_reconcile::host::MemoryHost;
//! use tola_reconcile::node::h;
//!
//! let mut host = MemoryHost::new();
//! let root = host.create_root("body");
//!
//! let mut app: App<i32, i32, MemoryHost> = App::new(
//!     0i32,
//!     |count: &i32, emit: &Emitter<i32>| {
//!         let emit = emit.clone();
//!         h("button")
//!             .on("click", Handler::new(move |_| emit.emit("add", 1)))
//!             .text(count.to_string())
//!             .into()
//!     },
//!     host,
//!     root,
//! )
//! .with_reducer("add", |count: &i32, step: &i32| count + step);
//!
//! app.mount().unwrap();
//! let button = app.vdom().and_then(|n| n.host_id()).unwrap();
//! app.host().fire(button, "click");
//! app.flush().unwrap();
//! assert_eq!(app.host().text_content(root), "1");
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::{ReconcileError, ReconcileResult};
use crate::host::{HostId, HostTree};
use crate::node::Node;
use crate::patch::{PatchConfig, Reconciler};

type View<S, P> = Box<dyn Fn(&S, &Emitter<P>) -> Node>;
type Reducer<S, P> = Box<dyn Fn(&S, &P) -> S>;

// =============================================================================
// Commands
// =============================================================================

/// Named command with its payload
#[derive(Debug, Clone, PartialEq)]
pub struct Command<P> {
    pub name: CompactString,
    pub payload: P,
}

/// Cloneable handle that queues commands for an [`App`].
///
/// Safe to capture in event handlers: emitting only locks the queue.
pub struct Emitter<P> {
    queue: Arc<Mutex<VecDeque<Command<P>>>>,
}

impl<P> Emitter<P> {
    fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queue a command
    pub fn emit(&self, name: impl Into<CompactString>, payload: P) {
        self.queue.lock().push_back(Command {
            name: name.into(),
            payload,
        });
    }

    /// Number of queued commands
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    fn pop(&self) -> Option<Command<P>> {
        self.queue.lock().pop_front()
    }
}

impl<P> Clone for Emitter<P> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<P> fmt::Debug for Emitter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter").field("pending", &self.pending()).finish()
    }
}

// =============================================================================
// App
// =============================================================================

/// State container bound to a host tree
pub struct App<S, P, H: HostTree> {
    state: S,
    view: View<S, P>,
    reducers: FxHashMap<CompactString, Reducer<S, P>>,
    emitter: Emitter<P>,
    config: PatchConfig,
    host: H,
    root: HostId,
    vdom: Option<Node>,
}

impl<S, P, H: HostTree> App<S, P, H> {
    /// Create an app rendering into `root`. Nothing is rendered until
    /// [`App::mount`].
    pub fn new<V>(state: S, view: V, host: H, root: HostId) -> Self
    where
        V: Fn(&S, &Emitter<P>) -> Node + 'static,
    {
        Self {
            state,
            view: Box::new(view),
            reducers: FxHashMap::default(),
            emitter: Emitter::new(),
            config: PatchConfig::default(),
            host,
            root,
            vdom: None,
        }
    }

    /// Register a reducer for command `name`, replacing any previous one
    pub fn with_reducer<R>(mut self, name: impl Into<CompactString>, reducer: R) -> Self
    where
        R: Fn(&S, &P) -> S + 'static,
    {
        self.reducers.insert(name.into(), Box::new(reducer));
        self
    }

    /// Set the reconciliation config used for every render
    pub fn with_config(mut self, config: PatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Render the current state and mount it under the root.
    ///
    /// On failure nothing is left under the root and the app stays unmounted.
    pub fn mount(&mut self) -> ReconcileResult<()> {
        if let Some(vdom) = &self.vdom {
            return Err(ReconcileError::already_mounted(vdom.kind()));
        }

        let mut vdom = (self.view)(&self.state, &self.emitter);
        Reconciler::with_config(&mut self.host, self.config.clone()).mount(&mut vdom, self.root, None)?;
        self.vdom = Some(vdom);
        Ok(())
    }

    /// Run the reducer registered for `name` and re-render.
    ///
    /// Returns `false` without touching the state if no reducer is
    /// registered. While unmounted, the state is updated but nothing renders.
    /// If the re-render fails the state change is kept, the app is unmounted
    /// and can be mounted again.
    pub fn dispatch(&mut self, name: &str, payload: P) -> ReconcileResult<bool> {
        let Some(reducer) = self.reducers.get(name) else {
            warn!(command = name, "no reducer registered for command");
            return Ok(false);
        };

        self.state = reducer(&self.state, &payload);
        self.render()?;
        Ok(true)
    }

    /// Dispatch queued commands in order, including those queued while
    /// flushing. Returns the number of commands handled.
    pub fn flush(&mut self) -> ReconcileResult<usize> {
        let mut handled = 0;
        while let Some(command) = self.emitter.pop() {
            if self.dispatch(&command.name, command.payload)? {
                handled += 1;
            }
        }
        Ok(handled)
    }

    /// Destroy the mounted tree
    pub fn unmount(&mut self) -> ReconcileResult<()> {
        if let Some(mut vdom) = self.vdom.take() {
            Reconciler::with_config(&mut self.host, self.config.clone()).destroy(&mut vdom)?;
        }
        Ok(())
    }

    /// Patch the committed tree to the current state.
    ///
    /// A failed patch releases both trees, so the app ends up unmounted with
    /// nothing left under the root.
    fn render(&mut self) -> ReconcileResult<()> {
        let Some(old) = self.vdom.take() else {
            return Ok(());
        };

        let new = (self.view)(&self.state, &self.emitter);
        let mut reconciler = Reconciler::with_config(&mut self.host, self.config.clone());
        match reconciler.patch(old, new, self.root) {
            Ok(committed) => {
                self.vdom = Some(committed);
                debug!(stats = ?reconciler.stats(), "re-rendered");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "render failed, app unmounted");
                Err(err)
            }
        }
    }

    /// Current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Committed tree, if mounted
    pub fn vdom(&self) -> Option<&Node> {
        self.vdom.as_ref()
    }

    /// Emitter feeding this app's command queue
    pub fn emitter(&self) -> &Emitter<P> {
        &self.emitter
    }

    /// Host tree
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host tree
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Root host node
    pub fn root(&self) -> HostId {
        self.root
    }
}
