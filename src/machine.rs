//! Finite-state-machine helper

use std::any::{TypeId, type_name};
use std::collections::HashMap;

use tracing::warn;

use crate::errors::{PoolError, PoolResult};

/// Behavior of one state in a [`StateMachine`].
///
/// Every hook defaults to doing nothing, and every hook receives the
/// machine's host mutably. `on_update` reports where the machine should go
/// next; requesting a transition from inside a hook keeps the dispatch
/// loop free of reentrant machine calls.
pub trait State<H> {
    /// Runs once each time the machine enters this state.
    fn on_start(&mut self, _host: &mut H) {}

    /// Runs on every machine update while this state is current.
    fn on_update(&mut self, _host: &mut H) -> Transition {
        Transition::stay()
    }

    /// Runs when the machine leaves this state, unless the transition was
    /// forced.
    fn on_finish(&mut self, _host: &mut H) {}

    /// Runs once when the machine is disposed.
    fn on_dispose(&mut self, _host: &mut H) {}
}

/// Where a state machine should go after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    kind: TransitionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionKind {
    Stay,
    To(TypeId, &'static str),
    Force(TypeId, &'static str),
}

impl Transition {
    /// Remain in the current state.
    pub fn stay() -> Self {
        Self {
            kind: TransitionKind::Stay,
        }
    }

    /// Switch to state `S`, running the current state's finish hook first.
    pub fn to<S: 'static>() -> Self {
        Self {
            kind: TransitionKind::To(TypeId::of::<S>(), type_name::<S>()),
        }
    }

    /// Re-enter state `S` without running the current state's finish hook.
    /// May target the current state.
    pub fn force<S: 'static>() -> Self {
        Self {
            kind: TransitionKind::Force(TypeId::of::<S>(), type_name::<S>()),
        }
    }
}

/// State-table dispatcher driving a host value through registered states.
///
/// States are keyed by their concrete type; the first state added is the
/// entry state. The machine owns its host and hands it mutably to whichever
/// hooks run.
///
/// # Examples
///
/// ```
/// use esox_poolkit::{State, StateMachine, Transition};
///
/// struct Door {
///     open: bool,
/// }
///
/// struct Closed;
/// impl State<Door> for Closed {
///     fn on_update(&mut self, door: &mut Door) -> Transition {
///         if door.open {
///             Transition::to::<Open>()
///         } else {
///             Transition::stay()
///         }
///     }
/// }
///
/// struct Open;
/// impl State<Door> for Open {}
///
/// let mut machine = StateMachine::new(Door { open: false });
/// machine.add_state(Closed).add_state(Open);
/// machine.start().unwrap();
///
/// machine.update().unwrap();
/// assert!(machine.is_in::<Closed>());
///
/// machine.host_mut().open = true;
/// machine.update().unwrap();
/// assert!(machine.is_in::<Open>());
/// ```
pub struct StateMachine<H> {
    host: H,
    states: HashMap<TypeId, Box<dyn State<H>>>,
    entry: Option<TypeId>,
    current: Option<TypeId>,
    any_start: Vec<Box<dyn FnMut(&mut H)>>,
    any_update: Vec<Box<dyn FnMut(&mut H)>>,
    any_finish: Vec<Box<dyn FnMut(&mut H)>>,
    started: bool,
    disposed: bool,
}

impl<H> StateMachine<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            states: HashMap::new(),
            entry: None,
            current: None,
            any_start: Vec::new(),
            any_update: Vec::new(),
            any_finish: Vec::new(),
            started: false,
            disposed: false,
        }
    }

    /// Register a state. The first state added becomes the entry state.
    /// Re-adding an already-registered state type is ignored with a
    /// warning, as is adding to a disposed machine.
    pub fn add_state<S: State<H> + 'static>(&mut self, state: S) -> &mut Self {
        if self.disposed {
            warn!(state = type_name::<S>(), "ignoring state added to a disposed machine");
            return self;
        }

        let id = TypeId::of::<S>();
        if self.states.contains_key(&id) {
            warn!(state = type_name::<S>(), "state type already registered");
            return self;
        }

        if self.entry.is_none() {
            self.entry = Some(id);
            self.current = Some(id);
        }
        self.states.insert(id, Box::new(state));
        self
    }

    /// Observer invoked before any state's start hook.
    pub fn on_any_start(&mut self, hook: impl FnMut(&mut H) + 'static) -> &mut Self {
        self.any_start.push(Box::new(hook));
        self
    }

    /// Observer invoked before any state's update hook.
    pub fn on_any_update(&mut self, hook: impl FnMut(&mut H) + 'static) -> &mut Self {
        self.any_update.push(Box::new(hook));
        self
    }

    /// Observer invoked before any state's finish hook.
    pub fn on_any_finish(&mut self, hook: impl FnMut(&mut H) + 'static) -> &mut Self {
        self.any_finish.push(Box::new(hook));
        self
    }

    /// Enter the entry state and begin accepting updates.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidArgument`] if no states were added, or
    /// [`PoolError::Disposed`] on a disposed machine.
    pub fn start(&mut self) -> PoolResult<()> {
        self.check_disposed()?;
        let entry = self.entry.ok_or_else(|| {
            PoolError::InvalidArgument("cannot start a state machine with no states".to_string())
        })?;

        self.enter(entry);
        self.started = true;
        Ok(())
    }

    /// Run one update: any-state observers first, then the current state's
    /// update hook, then whatever transition that hook requested. Does
    /// nothing before [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// [`PoolError::StateNotFound`] if the requested transition names an
    /// unregistered state, or [`PoolError::Disposed`] on a disposed machine.
    pub fn update(&mut self) -> PoolResult<()> {
        self.check_disposed()?;
        if !self.started {
            return Ok(());
        }

        let transition = {
            let Self {
                host,
                states,
                any_update,
                current,
                ..
            } = self;

            for hook in any_update.iter_mut() {
                hook(host);
            }
            match current.and_then(|id| states.get_mut(&id)) {
                Some(state) => state.on_update(host),
                None => Transition::stay(),
            }
        };

        match transition.kind {
            TransitionKind::Stay => Ok(()),
            TransitionKind::To(id, name) => self.transition(id, name, false),
            TransitionKind::Force(id, name) => self.transition(id, name, true),
        }
    }

    /// Switch to state `S`, running the current state's finish hook first.
    ///
    /// Switching to the state the machine is already in is ignored with a
    /// warning; use [`force_change_to`](Self::force_change_to) to re-enter.
    ///
    /// # Errors
    ///
    /// [`PoolError::StateNotFound`] if `S` was never added, or
    /// [`PoolError::Disposed`] on a disposed machine.
    pub fn change_to<S: State<H> + 'static>(&mut self) -> PoolResult<()> {
        self.transition(TypeId::of::<S>(), type_name::<S>(), false)
    }

    /// Switch to state `S` without running the current state's finish hook.
    ///
    /// # Errors
    ///
    /// Same conditions as [`change_to`](Self::change_to).
    pub fn force_change_to<S: State<H> + 'static>(&mut self) -> PoolResult<()> {
        self.transition(TypeId::of::<S>(), type_name::<S>(), true)
    }

    /// Whether the machine currently sits in state `S`.
    pub fn is_in<S: State<H> + 'static>(&self) -> bool {
        self.current == Some(TypeId::of::<S>())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Run every state's dispose hook and clear the table. Later calls on
    /// the machine surface [`PoolError::Disposed`]; `dispose` itself is
    /// idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        self.any_start.clear();
        self.any_update.clear();
        self.any_finish.clear();

        let Self { host, states, .. } = self;
        for state in states.values_mut() {
            state.on_dispose(host);
        }
        states.clear();

        self.current = None;
        self.disposed = true;
    }

    fn transition(&mut self, target: TypeId, name: &'static str, force: bool) -> PoolResult<()> {
        self.check_disposed()?;
        if !self.states.contains_key(&target) {
            return Err(PoolError::StateNotFound(name));
        }
        if self.current == Some(target) && !force {
            warn!(state = name, "ignoring transition to the current state; use force to re-enter");
            return Ok(());
        }

        if !force {
            let Self {
                host,
                states,
                any_finish,
                current,
                ..
            } = self;

            for hook in any_finish.iter_mut() {
                hook(host);
            }
            if let Some(state) = current.and_then(|id| states.get_mut(&id)) {
                state.on_finish(host);
            }
        }

        self.enter(target);
        Ok(())
    }

    fn enter(&mut self, target: TypeId) {
        self.current = Some(target);

        let Self {
            host,
            states,
            any_start,
            ..
        } = self;

        for hook in any_start.iter_mut() {
            hook(host);
        }
        if let Some(state) = states.get_mut(&target) {
            state.on_start(host);
        }
    }

    fn check_disposed(&self) -> PoolResult<()> {
        if self.disposed {
            Err(PoolError::Disposed("StateMachine"))
        } else {
            Ok(())
        }
    }
}
