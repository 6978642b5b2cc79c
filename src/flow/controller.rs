//! Flow controller: owns one interpreter, routes events to the innermost
//! active flow and reports every event upstream.

use crate::breadcrumbs::BreadcrumbItem;
use crate::core::{Event, FlowHistory, State};
use crate::flow::context::TrailView;
use crate::flow::navigation::{NavigationPayload, BREADCRUMB_NAVIGATE};
use crate::machine::{FlowError, Interpreter, MachineDefinition, SendOutcome, Step};
use crate::options::FlowOptions;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, debug_span};
use uuid::Uuid;

/// Caller-supplied upstream sink receiving `(event type, payload)`.
pub struct EventSink<P>(Arc<dyn Fn(&str, Option<&P>) + Send + Sync>);

impl<P> EventSink<P> {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(&str, Option<&P>) + Send + Sync + 'static,
    {
        Self(Arc::new(sink))
    }

    /// A sink that drops every event.
    pub fn noop() -> Self {
        Self(Arc::new(|_: &str, _: Option<&P>| {}))
    }

    pub fn emit(&self, kind: &str, payload: Option<&P>) {
        (self.0)(kind, payload)
    }
}

impl<P> Clone for EventSink<P> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<P> std::fmt::Debug for EventSink<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EventSink")
    }
}

/// Where a dispatched event ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The flow `flow` moved between the named states.
    Transitioned {
        flow: Uuid,
        from: String,
        to: String,
    },

    /// The flow `flow` received the event and ignored it.
    Ignored { flow: Uuid },
}

impl Delivery {
    /// Id of the flow whose interpreter received the event.
    pub fn flow(&self) -> Uuid {
        match self {
            Delivery::Transitioned { flow, .. } | Delivery::Ignored { flow } => *flow,
        }
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, Delivery::Transitioned { .. })
    }
}

/// A flow that can be nested inside another one.
///
/// Erases a controller's state and context types so parents of any flow
/// type can hold it.
pub trait FlowNode<P>: Any {
    fn id(&self) -> Uuid;

    fn name(&self) -> &str;

    /// Name of the current state.
    fn state_name(&self) -> &str;

    /// Whether the flow sits in a final state.
    fn is_complete(&self) -> bool;

    /// Breadcrumb items of the flow's current step.
    fn current_trail(&self) -> &[BreadcrumbItem];

    /// The flow's context, for callers that know its concrete type.
    fn context_any(&self) -> &dyn Any;

    /// Route `event` to the innermost active interpreter of this flow,
    /// without reporting it to any sink.
    fn deliver(&mut self, event: &Event<P>) -> Result<Delivery, FlowError>;

    fn active_child(&self) -> Option<&dyn FlowNode<P>>;

    fn as_any(&self) -> &dyn Any;
}

/// Builds a child flow from the parent's context on entering a state.
pub type ChildFactory<C, P> =
    Box<dyn Fn(&C) -> Result<Box<dyn FlowNode<P>>, FlowError> + Send + Sync>;

/// Orchestration shell around one interpreter.
///
/// `dispatch` routes each event to the innermost active flow (a mounted
/// child first, otherwise this controller's own interpreter) and then
/// reports it to the upstream sink exactly once, whether or not a
/// transition fired.
pub struct FlowController<S: State, C, P> {
    id: Uuid,
    name: String,
    interpreter: Interpreter<S, C, P>,
    on_event: EventSink<P>,
    child: Option<Box<dyn FlowNode<P>>>,
    delegates: HashMap<S, ChildFactory<C, P>>,
    options: FlowOptions,
}

impl<S, C, P> FlowController<S, C, P>
where
    S: State + 'static,
    C: Clone + TrailView + 'static,
    P: 'static,
{
    /// Mount a flow in `initial`, with context produced by `init`.
    pub fn new(
        name: impl Into<String>,
        definition: Arc<MachineDefinition<S, C, P>>,
        initial: S,
        init: impl FnOnce() -> C,
        on_event: EventSink<P>,
    ) -> Result<Self, FlowError> {
        let options = FlowOptions::default();
        Self::with_options(name, definition, initial, init, on_event, options)
    }

    pub fn with_options(
        name: impl Into<String>,
        definition: Arc<MachineDefinition<S, C, P>>,
        initial: S,
        init: impl FnOnce() -> C,
        on_event: EventSink<P>,
        options: FlowOptions,
    ) -> Result<Self, FlowError> {
        let interpreter = Interpreter::with_options(definition, initial, init(), options.clone())?;
        let controller = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            interpreter,
            on_event,
            child: None,
            delegates: HashMap::new(),
            options,
        };
        debug!(
            flow = %controller.id,
            name = %controller.name,
            state = controller.interpreter.current().name(),
            "flow mounted"
        );
        Ok(controller)
    }

    /// A controller meant to run nested inside a parent; it has no sink of
    /// its own since the parent reports every event.
    pub fn nested(
        name: impl Into<String>,
        definition: Arc<MachineDefinition<S, C, P>>,
        initial: S,
        init: impl FnOnce() -> C,
    ) -> Result<Self, FlowError> {
        Self::new(name, definition, initial, init, EventSink::noop())
    }

    /// Mount the child built by `factory` whenever this flow enters `state`.
    pub fn delegate<F>(mut self, state: S, factory: F) -> Self
    where
        F: Fn(&C) -> Result<Box<dyn FlowNode<P>>, FlowError> + Send + Sync + 'static,
    {
        self.delegates.insert(state, Box::new(factory));
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current(&self) -> &S {
        self.interpreter.current()
    }

    /// Context of this controller's own interpreter.
    pub fn context(&self) -> &C {
        self.interpreter.context()
    }

    pub fn history(&self) -> &FlowHistory<S> {
        self.interpreter.history()
    }

    pub fn interpreter(&self) -> &Interpreter<S, C, P> {
        &self.interpreter
    }

    pub fn sink(&self) -> &EventSink<P> {
        &self.on_event
    }

    /// Build an event from `kind` and `payload` and dispatch it.
    pub fn dispatch(
        &mut self,
        kind: impl Into<String>,
        payload: Option<P>,
    ) -> Result<Delivery, FlowError> {
        self.dispatch_event(Event {
            kind: kind.into(),
            payload,
        })
    }

    /// Dispatch a prepared event.
    ///
    /// A failing guard or reducer is returned before the sink runs and
    /// leaves every flow in its previous state.
    pub fn dispatch_event(&mut self, event: Event<P>) -> Result<Delivery, FlowError> {
        let span = debug_span!("dispatch", flow = %self.id, name = %self.name, event = %event.kind);
        let _entered = span.enter();

        let delivery = self.deliver(&event)?;
        self.on_event.emit(&event.kind, event.payload.as_ref());
        Ok(delivery)
    }

    /// Dispatch a breadcrumb navigation to `key`.
    pub fn navigate(&mut self, key: &str) -> Result<Delivery, FlowError>
    where
        P: NavigationPayload,
    {
        self.dispatch(BREADCRUMB_NAVIGATE, Some(P::for_navigation(key)))
    }

    /// Mount `child`, replacing and returning any previous one.
    pub fn mount_child(&mut self, child: Box<dyn FlowNode<P>>) -> Option<Box<dyn FlowNode<P>>> {
        debug!(
            flow = %self.id,
            child = %child.id(),
            child_name = child.name(),
            "nested flow mounted"
        );
        self.child.replace(child)
    }

    pub fn unmount_child(&mut self) -> Option<Box<dyn FlowNode<P>>> {
        let child = self.child.take();
        if let Some(child) = &child {
            debug!(flow = %self.id, child = %child.id(), "nested flow unmounted");
        }
        child
    }

    pub fn child(&self) -> Option<&dyn FlowNode<P>> {
        self.child.as_deref()
    }

    /// The mounted child, downcast to its concrete flow type.
    pub fn child_as<T: 'static>(&self) -> Option<&T> {
        self.child
            .as_deref()
            .and_then(|child| child.as_any().downcast_ref::<T>())
    }

    /// The flow currently receiving events.
    pub fn innermost(&self) -> &dyn FlowNode<P> {
        let mut node: &dyn FlowNode<P> = self;
        while let Some(child) = node.active_child() {
            node = child;
        }
        node
    }

    fn deliver_own(&mut self, event: &Event<P>) -> Result<Delivery, FlowError> {
        let span = debug_span!("deliver", flow = %self.id, name = %self.name);
        let _entered = span.enter();

        let step = self.interpreter.step(event)?;

        let child = match &step {
            Step::Transition { to, context, .. } => match self.delegates.get(to) {
                Some(factory) => Some(factory(context)?),
                None => None,
            },
            Step::Ignored => None,
        };

        let delivery = match self.interpreter.apply(step, event) {
            SendOutcome::Transitioned { from, to } => Delivery::Transitioned {
                flow: self.id,
                from: from.name().to_string(),
                to: to.name().to_string(),
            },
            SendOutcome::Ignored => Delivery::Ignored { flow: self.id },
        };

        if let Some(child) = child {
            self.mount_child(child);
        }
        Ok(delivery)
    }
}

impl<S, C, P> FlowNode<P> for FlowController<S, C, P>
where
    S: State + 'static,
    C: Clone + TrailView + 'static,
    P: 'static,
{
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn state_name(&self) -> &str {
        self.interpreter.current().name()
    }

    fn is_complete(&self) -> bool {
        self.interpreter.current().is_final()
    }

    fn current_trail(&self) -> &[BreadcrumbItem] {
        self.interpreter.context().trail()
    }

    fn context_any(&self) -> &dyn Any {
        self.interpreter.context()
    }

    fn deliver(&mut self, event: &Event<P>) -> Result<Delivery, FlowError> {
        let Some(child) = self.child.as_mut() else {
            return self.deliver_own(event);
        };

        let delivery = child.deliver(event)?;
        if self.options.auto_unmount_children && child.is_complete() {
            debug!(
                flow = %self.id,
                child = %child.id(),
                state = child.state_name(),
                "nested flow complete"
            );
            self.unmount_child();
        }
        Ok(delivery)
    }

    fn active_child(&self) -> Option<&dyn FlowNode<P>> {
        self.child.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<S: State, C: Clone, P: 'static> std::fmt::Debug for FlowController<S, C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let child = self.child.as_ref().map(|child| child.name());
        f.debug_struct("FlowController")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.interpreter.current().name())
            .field("child", &child)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{transition, MachineBuilder};
    use crate::core::BoxError;
    use crate::state_enum;
    use std::io;
    use std::sync::Mutex;

    state_enum! {
        enum Parent {
            Index => "index",
            Delegating => "delegating",
        }
    }

    state_enum! {
        enum Child {
            First => "first",
            Second => "second",
            Done => "done",
        }
        final: [Done]
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Ctx {
        count: u32,
    }

    impl TrailView for Ctx {}

    type Log = Arc<Mutex<Vec<(String, Option<u32>)>>>;

    fn recording_sink() -> (EventSink<u32>, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let writer = Arc::clone(&log);
        let sink = EventSink::new(move |kind: &str, payload: Option<&u32>| {
            writer
                .lock()
                .unwrap()
                .push((kind.to_string(), payload.copied()));
        });
        (sink, log)
    }

    fn start() -> Ctx {
        Ctx { count: 0 }
    }

    fn bump(ctx: &Ctx, _: &Event<u32>) -> Ctx {
        Ctx {
            count: ctx.count + 1,
        }
    }

    fn parent_machine() -> Arc<MachineDefinition<Parent, Ctx, u32>> {
        Arc::new(
            MachineBuilder::<Parent, Ctx, u32>::new()
                .state(
                    Parent::Index,
                    vec![transition("DELEGATE", Parent::Delegating).reduce(bump)],
                )
                .state(Parent::Delegating, vec![transition("BACK", Parent::Index)])
                .build()
                .unwrap(),
        )
    }

    fn child_machine() -> Arc<MachineDefinition<Child, Ctx, u32>> {
        Arc::new(
            MachineBuilder::<Child, Ctx, u32>::new()
                .state(Child::First, vec![transition("CHILD_EVENT", Child::Second)])
                .state(
                    Child::Second,
                    vec![
                        transition("CHILD_EVENT", Child::Done),
                        transition("BACK", Child::First),
                    ],
                )
                .terminal(Child::Done)
                .build()
                .unwrap(),
        )
    }

    fn fail(_: &Ctx, _: &Event<u32>) -> Result<Ctx, BoxError> {
        Err("bad payload".into())
    }

    fn child_flow() -> Box<dyn FlowNode<u32>> {
        let child = FlowController::nested("child", child_machine(), Child::First, start);
        Box::new(child.unwrap())
    }

    fn child_factory(_: &Ctx) -> Result<Box<dyn FlowNode<u32>>, FlowError> {
        Ok(child_flow())
    }

    fn failing_factory(_: &Ctx) -> Result<Box<dyn FlowNode<u32>>, FlowError> {
        Err(FlowError::MissingContext { what: "payroll" })
    }

    fn parent_flow(sink: EventSink<u32>) -> FlowController<Parent, Ctx, u32> {
        let flow = FlowController::new("parent", parent_machine(), Parent::Index, start, sink);
        flow.unwrap()
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn dispatch_transitions_and_reports() {
        let (sink, log) = recording_sink();
        let mut flow = parent_flow(sink);

        let delivery = flow.dispatch("DELEGATE", Some(7)).unwrap();

        assert!(delivery.is_transition());
        assert_eq!(delivery.flow(), flow.id());
        assert_eq!(flow.current(), &Parent::Delegating);
        assert_eq!(flow.context().count, 1);
        assert_eq!(*log.lock().unwrap(), [("DELEGATE".to_string(), Some(7))]);
    }

    #[test]
    fn ignored_events_still_reach_the_sink() {
        let (sink, log) = recording_sink();
        let mut flow = parent_flow(sink);

        let delivery = flow.dispatch("UNKNOWN", None).unwrap();

        assert_eq!(delivery, Delivery::Ignored { flow: flow.id() });
        assert_eq!(flow.current(), &Parent::Index);
        assert_eq!(*log.lock().unwrap(), [("UNKNOWN".to_string(), None)]);
    }

    #[test]
    fn child_receives_events_before_parent() {
        let (sink, log) = recording_sink();
        let mut flow = parent_flow(sink);
        flow.dispatch("DELEGATE", None).unwrap();
        flow.mount_child(child_flow());

        let delivery = flow.dispatch("CHILD_EVENT", Some(1)).unwrap();
        // BACK is declared on both; the child consumes it.
        flow.dispatch("BACK", None).unwrap();

        assert_ne!(delivery.flow(), flow.id());
        assert_eq!(flow.current(), &Parent::Delegating);
        assert_eq!(flow.innermost().state_name(), "first");
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn delegate_mounts_child_on_entry() {
        let mut flow = parent_flow(EventSink::noop()).delegate(Parent::Delegating, child_factory);

        assert!(flow.child().is_none());
        flow.dispatch("DELEGATE", None).unwrap();

        let child = flow.child_as::<FlowController<Child, Ctx, u32>>();
        assert_eq!(child.unwrap().current(), &Child::First);
    }

    #[test]
    fn innermost_exposes_the_child_context() {
        let mut flow = parent_flow(EventSink::noop()).delegate(Parent::Delegating, child_factory);
        flow.dispatch("DELEGATE", None).unwrap();

        let innermost = flow.innermost();
        let child_context = innermost.context_any().downcast_ref::<Ctx>();

        assert_eq!(flow.context().count, 1);
        assert_eq!(child_context, Some(&start()));
        assert!(innermost.current_trail().is_empty());
    }

    #[test]
    fn completed_child_is_unmounted() {
        let mut flow = parent_flow(EventSink::noop()).delegate(Parent::Delegating, child_factory);

        flow.dispatch("DELEGATE", None).unwrap();
        flow.dispatch("CHILD_EVENT", None).unwrap();
        flow.dispatch("CHILD_EVENT", None).unwrap();

        assert!(flow.child().is_none());
        flow.dispatch("BACK", None).unwrap();
        assert_eq!(flow.current(), &Parent::Index);
    }

    #[test]
    fn completed_child_stays_when_auto_unmount_is_off() {
        let options = FlowOptions {
            auto_unmount_children: false,
            ..FlowOptions::default()
        };
        let mut flow = FlowController::with_options(
            "parent",
            parent_machine(),
            Parent::Index,
            start,
            EventSink::noop(),
            options,
        )
        .unwrap();
        flow.mount_child(child_flow());

        flow.dispatch("CHILD_EVENT", None).unwrap();
        flow.dispatch("CHILD_EVENT", None).unwrap();

        assert!(flow.child().is_some());
        assert!(flow.innermost().is_complete());
        assert!(flow.unmount_child().is_some());
        assert_eq!(flow.innermost().id(), flow.id());
    }

    #[test]
    fn failing_factory_keeps_parent_in_place() {
        let mut flow = parent_flow(EventSink::noop()).delegate(Parent::Delegating, failing_factory);

        assert!(flow.dispatch("DELEGATE", None).is_err());
        assert_eq!(flow.current(), &Parent::Index);
        assert_eq!(flow.context().count, 0);
    }

    #[test]
    fn reducer_failure_skips_sink() {
        let (sink, log) = recording_sink();
        let definition = Arc::new(
            MachineBuilder::<Parent, Ctx, u32>::new()
                .state(
                    Parent::Index,
                    vec![transition("DELEGATE", Parent::Delegating).try_reduce(fail)],
                )
                .terminal(Parent::Delegating)
                .build()
                .unwrap(),
        );
        let result = FlowController::new("parent", definition, Parent::Index, start, sink);
        let mut flow = result.unwrap();

        let err = flow.dispatch("DELEGATE", Some(3)).unwrap_err();

        assert!(matches!(err, FlowError::Transition { .. }));
        assert_eq!(flow.current(), &Parent::Index);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn child_transitions_are_logged_under_the_child_id() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let mut flow = parent_flow(EventSink::noop());
        flow.mount_child(child_flow());
        let child_id = flow.innermost().id();

        tracing::subscriber::with_default(subscriber, || {
            flow.dispatch("CHILD_EVENT", None).unwrap();
        });

        let bytes = capture.0.lock().unwrap().clone();
        let output = String::from_utf8(bytes).unwrap();
        let applied = output
            .lines()
            .find(|line| line.contains("transition applied"))
            .unwrap();
        assert!(applied.contains(&format!("deliver{{flow={child_id}")));
        assert!(!applied.contains(&format!("deliver{{flow={}", flow.id())));
    }

    #[test]
    fn debug_names_state_and_child() {
        let mut flow = parent_flow(EventSink::noop());
        flow.mount_child(child_flow());

        let rendered = format!("{flow:?}");

        assert!(rendered.contains("state: \"index\""));
        assert!(rendered.contains("child: Some(\"child\")"));
    }
}
