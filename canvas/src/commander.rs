//! Typed publish/subscribe over the closed command set.
//!
//! Each command tag is a zero-sized type implementing [`Tag`], which fixes the
//! payload a handler receives. Handlers for one tag run in registration order.
//! Dispatching a tag with no handlers is a silent no-op.
//!
//! The registry is single-context: one `Commander` lives inside one execution
//! context and is never shared across threads.

#[cfg(test)]
#[path = "commander_test.rs"]
mod commander_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::geom::Point;
use crate::message::{Command, CommandKind, InitParams};

/// A command tag with its fixed payload type.
pub trait Tag: 'static {
    const KIND: CommandKind;
    type Payload;

    /// Borrow the payload when `cmd` carries this tag.
    fn payload(cmd: &Command) -> Option<&Self::Payload>;
}

pub struct Init;
pub struct Terminate;
pub struct Click;
pub struct PointerDown;
pub struct PointerUp;

impl Tag for Init {
    const KIND: CommandKind = CommandKind::Init;
    type Payload = InitParams;

    fn payload(cmd: &Command) -> Option<&InitParams> {
        match cmd {
            Command::Init(params) => Some(params),
            _ => None,
        }
    }
}

impl Tag for Terminate {
    const KIND: CommandKind = CommandKind::Terminate;
    type Payload = ();

    fn payload(cmd: &Command) -> Option<&()> {
        match cmd {
            Command::Terminate => Some(&()),
            _ => None,
        }
    }
}

impl Tag for Click {
    const KIND: CommandKind = CommandKind::Click;
    type Payload = Point;

    fn payload(cmd: &Command) -> Option<&Point> {
        match cmd {
            Command::Click(pt) => Some(pt),
            _ => None,
        }
    }
}

impl Tag for PointerDown {
    const KIND: CommandKind = CommandKind::PointerDown;
    type Payload = Point;

    fn payload(cmd: &Command) -> Option<&Point> {
        match cmd {
            Command::PointerDown(pt) => Some(pt),
            _ => None,
        }
    }
}

impl Tag for PointerUp {
    const KIND: CommandKind = CommandKind::PointerUp;
    type Payload = Point;

    fn payload(cmd: &Command) -> Option<&Point> {
        match cmd {
            Command::PointerUp(pt) => Some(pt),
            _ => None,
        }
    }
}

type Handler = Rc<dyn Fn(&Command)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<CommandKind, Vec<(u64, Handler)>>,
}

/// Handler registry for one execution context.
#[derive(Clone, Default)]
pub struct Commander {
    registry: Rc<RefCell<Registry>>,
}

impl Commander {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for tag `T`.
    ///
    /// The returned handle removes the handler when [`Unsubscribe::unsubscribe`]
    /// is called. Dropping the handle leaves the handler registered.
    pub fn subscribe<T, F>(&self, handler: F) -> Unsubscribe
    where
        T: Tag,
        F: Fn(&T::Payload) + 'static,
    {
        let wrapped: Handler = Rc::new(move |cmd: &Command| {
            if let Some(payload) = T::payload(cmd) {
                handler(payload);
            }
        });

        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.entry(T::KIND).or_default().push((id, wrapped));

        Unsubscribe { registry: Rc::downgrade(&self.registry), kind: T::KIND, id }
    }

    /// Invoke every handler registered for the command's tag, in order.
    ///
    /// The handler list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while running; changes apply to the next dispatch.
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, cmd: &Command) -> usize {
        let snapshot: Vec<Handler> = {
            let registry = self.registry.borrow();
            match registry.handlers.get(&cmd.kind()) {
                Some(list) => list.iter().map(|(_, h)| Rc::clone(h)).collect(),
                None => Vec::new(),
            }
        };
        for handler in &snapshot {
            handler(cmd);
        }
        snapshot.len()
    }

    /// Number of handlers currently registered for `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: CommandKind) -> usize {
        self.registry.borrow().handlers.get(&kind).map_or(0, Vec::len)
    }
}

/// Handle returned by [`Commander::subscribe`].
#[derive(Debug)]
pub struct Unsubscribe {
    registry: Weak<RefCell<Registry>>,
    kind: CommandKind,
    id: u64,
}

impl Unsubscribe {
    /// Remove the handler. Returns `false` if it was already gone or the
    /// registry has been dropped.
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry.borrow_mut();
        let Some(list) = registry.handlers.get_mut(&self.kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != self.id);
        list.len() != before
    }
}
