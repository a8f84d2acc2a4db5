use serde::Serialize;
use serde_json::{Map, Value};

use crate::action::action_model::PipelineStep;
use crate::action::pipeline::{
    ActionPipeline, StepExecutor, build_open_url, resolve_params, resolve_set_value,
};
use crate::api::api_model::{
    ApiErrorPayload, Assignment, CaseInfo, CreateCaseRequest, CreatedCase, ValidationMessage,
};
use crate::api::client::CaseApi;
use crate::api::error::CaseError;
use crate::container::events::{ContainerEvent, ListActionKind, TitleInfo, Toast};
use crate::container::host::UiHost;
use crate::container::lifecycle::ContainerState;
use crate::container::view_session::ViewSession;
use crate::graph::propagation::PropagationReport;
use crate::registry::widget::FieldWidget;
use crate::store::path::{blank_row_like, expand_relative_path, repeat_target};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceKind;
use crate::view::view_model::{FieldDescriptor, FieldKind, RepeatKind, SetValuePair, ViewTree};

pub const GENERIC_ERROR: &str = "An error occured, please contact your system administrator";
pub const REFRESH_ACTION: &str = "Refresh";
pub const CONFIRM_ACTION: &str = "Confirm";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    pub value: String,
}

impl MenuItem {
    fn new(label: &str, value: &str) -> Self {
        MenuItem {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validity failed; nothing was sent.
    Invalid,
    NextAssignment(String),
    /// The flow ended on this confirmation page.
    Confirmation(String),
}

/// Result of running one field's handler chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineRun {
    pub steps: Vec<&'static str>,
    pub propagation: Option<PropagationReport>,
    /// The view was replaced before the propagation step, which was skipped.
    pub stale: bool,
}

/// Hosts one assignment: loads its view, runs field handlers, talks to the
/// case engine and raises events for the surrounding UI.
pub struct CaseContainer<A: CaseApi, H: UiHost> {
    api: A,
    host: H,
    tracer: TraceLogger,
    validate_on_submit: bool,

    state: ContainerState,
    assignment_id: Option<String>,
    case_id: Option<String>,
    assignment: Option<Assignment>,
    case: Option<CaseInfo>,
    current_action: Option<String>,
    flow_action: Option<String>,

    generation: u64,
    session: ViewSession,

    stages: Vec<MenuItem>,
    actions: Vec<MenuItem>,
    validation_errors: Vec<ValidationMessage>,
    events: Vec<ContainerEvent>,
}

impl<A: CaseApi, H: UiHost> CaseContainer<A, H> {
    pub fn new(api: A, host: H) -> Self {
        CaseContainer {
            api,
            host,
            tracer: TraceLogger::disabled(),
            validate_on_submit: true,
            state: ContainerState::Empty,
            assignment_id: None,
            case_id: None,
            assignment: None,
            case: None,
            current_action: None,
            flow_action: None,
            generation: 0,
            session: ViewSession::empty(0),
            stages: Vec::new(),
            actions: vec![MenuItem::new(REFRESH_ACTION, REFRESH_ACTION)],
            validation_errors: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_validate_on_submit(mut self, enabled: bool) -> Self {
        self.validate_on_submit = enabled;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn session(&self) -> &ViewSession {
        &self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn assignment_id(&self) -> Option<&str> {
        self.assignment_id.as_deref()
    }

    pub fn case_id(&self) -> Option<&str> {
        self.case_id.as_deref()
    }

    pub fn case_info(&self) -> Option<&CaseInfo> {
        self.case.as_ref()
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn current_action(&self) -> Option<&str> {
        self.current_action.as_deref()
    }

    pub fn stages(&self) -> &[MenuItem] {
        &self.stages
    }

    pub fn actions(&self) -> &[MenuItem] {
        &self.actions
    }

    pub fn validation_errors(&self) -> &[ValidationMessage] {
        &self.validation_errors
    }

    pub fn events(&self) -> &[ContainerEvent] {
        &self.events
    }

    /// Drain the events raised so far.
    pub fn take_events(&mut self) -> Vec<ContainerEvent> {
        std::mem::take(&mut self.events)
    }

    /// First field currently registered at `reference`.
    pub fn field_for_reference(&self, reference: &str) -> Option<FieldDescriptor> {
        self.session
            .registry
            .registrations_for(reference)
            .next()
            .map(|r| r.field.clone())
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Open an assignment of a case under its default flow action.
    pub fn open(&mut self, assignment_id: &str, case_id: &str) -> Result<(), CaseError> {
        self.assignment_id = Some(assignment_id.to_string());
        self.case_id = Some(case_id.to_string());
        self.emit(ContainerEvent::WorkItemSelected {
            assignment_id: assignment_id.to_string(),
            case_id: case_id.to_string(),
        });
        self.load_assignment(None)
    }

    /// Fetch the assignment, its case and the view for `action` (the flow
    /// action when None), then install the view.
    pub fn load_assignment(&mut self, action: Option<&str>) -> Result<(), CaseError> {
        self.set_state(ContainerState::Refreshing, "load assignment")?;
        self.current_action = None;

        match self.fetch_assignment_view(action) {
            Ok(view) => {
                self.install_view(view);
                self.set_state(ContainerState::Loaded, "load assignment")
            }
            Err(e) => {
                self.generation += 1;
                self.session = ViewSession::empty(self.generation);
                self.restore_state(ContainerState::Empty);
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    fn fetch_assignment_view(&mut self, action: Option<&str>) -> Result<ViewTree, CaseError> {
        let assignment_id = self.require_assignment("load assignment")?;
        let case_id = self.require_case("load assignment")?;

        let assignment = self.api.fetch_assignment(&assignment_id)?;
        let flow_action = assignment
            .actions
            .first()
            .map(|a| a.id.clone())
            .ok_or_else(|| CaseError::InvalidResponse(format!("Assignment {} has no actions", assignment_id)))?;

        self.current_action = Some(action.map(str::to_string).unwrap_or_else(|| flow_action.clone()));
        self.flow_action = Some(flow_action);
        self.assignment = Some(assignment);
        self.fire_change_title();

        let case = self.api.fetch_case(&case_id)?;
        self.stages = case
            .stages
            .iter()
            .map(|stage| MenuItem::new(&stage.name, &stage.id))
            .collect();
        self.case = Some(case);
        self.set_actions();

        let current = self.current_action.clone().unwrap_or_default();
        let response = self.api.fetch_view_for_action(&assignment_id, &current)?;
        Ok(response.view)
    }

    /// Replace the current view. Anything computed against the previous one
    /// is stale from here on.
    fn install_view(&mut self, view: ViewTree) {
        self.generation += 1;
        let case_content = self.case.as_ref().map(|c| &c.content);
        self.session = ViewSession::build(view, self.generation, &mut self.host, &self.api, case_content);
        self.log(
            TraceKind::ViewLoaded,
            None,
            format!(
                "generation {}, {} fields, {} edges",
                self.generation,
                self.session.registry.len(),
                self.session.graph.edge_count()
            ),
        );
    }

    /// Install a view for creating a new case.
    pub fn start_new(&mut self, view: ViewTree) -> Result<(), CaseError> {
        self.set_state(ContainerState::Refreshing, "start new case")?;
        self.install_view(view);
        self.set_state(ContainerState::Loaded, "start new case")
    }

    /// Bind a re-rendered widget, replacing the previous registration of
    /// the same field.
    pub fn register_widget(&mut self, field: FieldDescriptor, widget: Box<dyn FieldWidget>) -> Result<(), CaseError> {
        let replaced = self.session.register(field, widget)?;
        if !replaced.is_empty() {
            self.log(TraceKind::Action, None, format!("replaced {} registrations", replaced.len()));
        }
        Ok(())
    }

    pub fn reset_assignment(&mut self) {
        self.generation += 1;
        self.session = ViewSession::empty(self.generation);
        self.current_action = None;
        self.restore_state(ContainerState::Empty);
    }

    // ------------------------------------------------------------------
    // Field events
    // ------------------------------------------------------------------

    /// An operator edit: update the store and every widget showing the
    /// reference, raise `fieldchanged`, then run the field's handler chain.
    pub fn field_changed(&mut self, field: &FieldDescriptor, value: Value) -> Result<PipelineRun, CaseError> {
        if field.reference.is_empty() {
            return Ok(PipelineRun::default());
        }
        self.require_editable("edit field")?;
        self.set_state(ContainerState::Editing, "edit field")?;

        let value = normalize_input(field, value);
        let reference = expand_relative_path(&field.reference).to_string();
        self.session.registry.set_widget_value(field.node(), &value);
        self.session.store.set(&reference, value.clone());
        self.session.registry.set_reference_value(&reference, &value);

        self.log(TraceKind::FieldChanged, Some(&reference), &value);
        self.emit(ContainerEvent::FieldChanged {
            reference,
            value: value.clone(),
        });

        self.run_pipeline(field, value)
    }

    /// Blur only records the value; no handlers run.
    pub fn field_blurred(&mut self, reference: &str, value: Value) {
        if reference.is_empty() {
            return;
        }
        self.session.store.set(reference, value);
    }

    /// A click runs the field's handler chain with its current value.
    pub fn field_clicked(&mut self, field: &FieldDescriptor) -> Result<PipelineRun, CaseError> {
        self.require_editable("click field")?;
        let value = self
            .session
            .store
            .get(&field.reference)
            .cloned()
            .unwrap_or_else(|| field.value.clone());
        self.run_pipeline(field, value)
    }

    /// Build and run `field`'s handler chain. Failures are surfaced to the
    /// operator by the failing step before being returned.
    pub fn run_pipeline(&mut self, field: &FieldDescriptor, value: Value) -> Result<PipelineRun, CaseError> {
        let pipeline = ActionPipeline::for_field(field);
        let generation = self.generation;

        let mut runner = StepRunner {
            container: self,
            field: field.clone(),
            value,
            generation,
            run: PipelineRun::default(),
        };
        pipeline.run(&mut runner)?;
        Ok(runner.run)
    }

    fn apply_set_value(&mut self, pair: &SetValuePair) {
        let (path, value) = resolve_set_value(&self.session.store, pair);
        self.session.store.set(&path, value.clone());
        let updated = self.session.registry.set_reference_value(&path, &value);
        self.log(
            TraceKind::Action,
            Some(&path),
            format!("set value {} ({} widgets)", value, updated),
        );
    }

    // ------------------------------------------------------------------
    // Server round trips
    // ------------------------------------------------------------------

    /// Post the current content and install the view the server answers
    /// with.
    pub fn refresh(&mut self, refresh_for: Option<&str>) -> Result<(), CaseError> {
        let content = self.session.post_content();
        self.refresh_with(content, refresh_for)
    }

    fn refresh_with(&mut self, content: Value, refresh_for: Option<&str>) -> Result<(), CaseError> {
        let assignment_id = self.require_assignment("refresh")?;
        let action = self.current_action.clone().ok_or_else(|| CaseError::InvalidState {
            operation: "refresh".into(),
            state: "no current action".into(),
        })?;

        let previous = self.state;
        self.set_state(ContainerState::Refreshing, "refresh")?;

        match self
            .api
            .refresh_assignment(&assignment_id, &action, &content, refresh_for)
        {
            Ok(response) => {
                self.install_view(response.view);
                self.set_state(ContainerState::Loaded, "refresh")
            }
            Err(e) => {
                self.restore_state(previous);
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    /// Validate every editable widget, then perform the current action.
    pub fn submit(&mut self) -> Result<SubmitOutcome, CaseError> {
        self.require_editable("submit")?;
        self.validation_errors.clear();

        if self.validate_on_submit && !self.session.registry.validate_all() {
            if self.validation_errors.is_empty() {
                self.validation_errors.push(ValidationMessage {
                    path: Some("Validation errors".into()),
                    message: "invalid form data".into(),
                });
            }
            self.log(TraceKind::Validation, None, "client-side validation failed");
            return Ok(SubmitOutcome::Invalid);
        }

        self.perform_action()
    }

    /// Submit the current action without client-side validation.
    pub fn perform_action(&mut self) -> Result<SubmitOutcome, CaseError> {
        let assignment_id = self.require_assignment("perform action")?;
        let case_id = self.require_case("perform action")?;
        let action = self.current_action.clone().unwrap_or_default();
        let content = self.session.post_content();

        let previous = self.state;
        self.set_state(ContainerState::Refreshing, "perform action")?;

        let result = match self.api.perform_action(&assignment_id, &action, &content) {
            Ok(result) => result,
            Err(e) => {
                self.restore_state(previous);
                self.handle_error(&e);
                return Err(e);
            }
        };

        if result.next_assignment_id.is_some() || result.next_page_id.is_some() {
            self.assignment_id = result.next_assignment_id.clone();
        }

        match self.api.fetch_case(&case_id) {
            Ok(case) => self.case = Some(case),
            Err(e) => {
                self.restore_state(previous);
                self.handle_error(&e);
                return Err(e);
            }
        }

        if let Some(next) = result.next_assignment_id {
            self.load_assignment(None)?;
            return Ok(SubmitOutcome::NextAssignment(next));
        }
        if let Some(page_id) = result.next_page_id {
            self.show_confirmation(&case_id, &page_id)?;
            return Ok(SubmitOutcome::Confirmation(page_id));
        }

        let e = CaseError::InvalidResponse("Invalid server response, please contact your administrator".into());
        self.restore_state(previous);
        self.handle_error(&e);
        Err(e)
    }

    fn show_confirmation(&mut self, case_id: &str, page_id: &str) -> Result<(), CaseError> {
        let mut page = match self.api.fetch_page(case_id, page_id) {
            Ok(page) => page,
            Err(e) => {
                self.generation += 1;
                self.session = ViewSession::empty(self.generation);
                self.restore_state(ContainerState::Empty);
                self.handle_error(&e);
                return Err(e);
            }
        };
        page.visible = true;
        self.install_view(page);
        self.current_action = Some(CONFIRM_ACTION.to_string());
        self.set_state(ContainerState::Confirming, "show confirmation")?;
        self.fire_change_title();
        Ok(())
    }

    /// Save the content on the case without advancing the flow.
    pub fn save(&mut self) -> Result<(), CaseError> {
        let case_id = self.require_case("save")?;
        self.validation_errors.clear();

        let content = self.session.post_content();
        let etag = self.case.as_ref().and_then(|c| c.etag.clone());
        if let Err(e) = self.api.update_case(&case_id, &content, etag.as_deref()) {
            self.handle_error(&e);
            return Err(e);
        }

        match self.api.fetch_case(&case_id) {
            Ok(case) => self.case = Some(case),
            Err(e) => {
                self.handle_error(&e);
                return Err(e);
            }
        }

        self.emit(ContainerEvent::Toast(Toast::success(
            "Success",
            format!("Work object {} successfully saved", short_case_id(&case_id)),
        )));
        Ok(())
    }

    /// Create a case from the current content and open its first
    /// assignment. Returns the new case id.
    pub fn create_case(&mut self, case_type_id: &str, process_id: &str) -> Result<Option<String>, CaseError> {
        let request = CreateCaseRequest {
            case_type_id: case_type_id.to_string(),
            process_id: process_id.to_string(),
            content: self.session.post_content(),
        };

        match self.api.create_case(&request) {
            Ok(CreatedCase {
                id: Some(id),
                next_assignment_id,
            }) => {
                self.case_id = Some(id.clone());
                self.assignment_id = next_assignment_id;
                self.emit(ContainerEvent::WorkObjectCreated { case_id: id.clone() });
                if self.assignment_id.is_some() {
                    self.load_assignment(None)?;
                }
                Ok(Some(id))
            }
            Ok(_) => {
                self.emit(ContainerEvent::Toast(Toast::error("Error", "Could not create a new case")));
                self.cancel();
                Ok(None)
            }
            Err(e) => {
                self.handle_error(&e);
                self.cancel();
                Err(e)
            }
        }
    }

    /// Pick an entry of the case actions menu.
    pub fn select_case_action(&mut self, value: &str) -> Result<(), CaseError> {
        if value == REFRESH_ACTION {
            self.refresh(None)
        } else {
            self.load_assignment(Some(value))
        }
    }

    /// Add or delete a row of a repeating layout, then refresh. Returns
    /// false when nothing was done.
    pub fn handle_list_action(
        &mut self,
        reference_type: RepeatKind,
        reference: &str,
        action: ListActionKind,
    ) -> Result<bool, CaseError> {
        self.emit(ContainerEvent::ListAction {
            reference_type,
            reference: reference.to_string(),
            action,
        });

        let mut content = self.session.post_content();
        let Some(target) = repeat_target(&mut content, reference, reference_type) else {
            return Ok(false);
        };

        match reference_type {
            RepeatKind::List => {
                if let Some(rows) = target.as_array_mut() {
                    match action {
                        ListActionKind::Add => {
                            let row = blank_row_like(rows);
                            rows.push(row);
                        }
                        ListActionKind::Delete => {
                            if rows.len() > 1 {
                                rows.pop();
                            }
                        }
                    }
                }
            }
            RepeatKind::Group => {
                let message = match action {
                    ListActionKind::Add => "Enter a name for the group.",
                    ListActionKind::Delete => "Enter the name of the group to be deleted.",
                };
                let Some(name) = self.host.prompt(message).filter(|n| !n.is_empty()) else {
                    return Ok(false);
                };
                if let Some(group) = target.as_object_mut() {
                    match action {
                        ListActionKind::Add => {
                            group.insert(name, Value::Object(Map::new()));
                        }
                        ListActionKind::Delete => {
                            group.remove(&name);
                        }
                    }
                }
            }
        }

        self.refresh_with(content, None)?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Closing
    // ------------------------------------------------------------------

    pub fn cancel(&mut self) {
        self.emit(ContainerEvent::WorkObjectClosed {
            assignment_id: self.assignment_id.clone(),
            case_id: self.case_id.clone(),
        });
        self.restore_state(ContainerState::Closed);
    }

    pub fn confirm(&mut self) {
        self.emit(ContainerEvent::WorkObjectClosed {
            assignment_id: self.assignment_id.clone(),
            case_id: self.case_id.clone(),
        });
        self.emit(ContainerEvent::RefreshAssignments);
        self.restore_state(ContainerState::Closed);
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    /// Surface a failed call: validation messages go to their fields,
    /// everything else becomes a toast.
    pub fn handle_error(&mut self, error: &CaseError) {
        self.log(TraceKind::Error, None, error);

        let toast = match error {
            CaseError::Server(payload) if payload.is_validation() => {
                self.route_validation(payload);
                return;
            }
            CaseError::Server(payload) => match payload.errors.first() {
                Some(first) => Toast::error(format!("Error, ID: {}", first.id), &first.message),
                None => Toast::error("Error", GENERIC_ERROR),
            },
            CaseError::InvalidResponse(message) => Toast::error("Error", message),
            _ => Toast::error("Error", GENERIC_ERROR),
        };
        self.emit(ContainerEvent::Toast(toast));
    }

    fn route_validation(&mut self, payload: &ApiErrorPayload) {
        self.validation_errors.clear();
        let mut shown = false;

        for error in &payload.errors {
            let Some(messages) = &error.validation_messages else {
                continue;
            };
            for message in messages {
                match message.path.as_deref().filter(|p| !p.is_empty()) {
                    Some(path) => {
                        self.validation_errors.push(message.clone());
                        let reference = expand_relative_path(path);
                        let reported = self
                            .session
                            .registry
                            .report_validity(reference, &message.message);
                        self.log(
                            TraceKind::Validation,
                            Some(reference),
                            format!("{} ({} widgets)", message.message, reported),
                        );
                        shown = true;
                    }
                    None if !shown && messages.len() == 1 => {
                        self.emit(ContainerEvent::Toast(Toast::error("Error", &message.message)));
                        shown = true;
                    }
                    None => {}
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn set_actions(&mut self) {
        let Some(assignment) = &self.assignment else {
            return;
        };
        let mut actions = vec![MenuItem::new(REFRESH_ACTION, REFRESH_ACTION)];
        actions.extend(
            assignment
                .actions
                .iter()
                .skip(1)
                .map(|a| MenuItem::new(&a.name, &a.id)),
        );
        if let Some(first) = assignment.actions.first() {
            let flow = self.flow_action.as_deref().unwrap_or(&first.id);
            actions.push(MenuItem::new(&first.name, flow));
        }
        self.actions = actions;
    }

    fn fire_change_title(&mut self) {
        let Some(assignment) = &self.assignment else {
            return;
        };
        let action = assignment
            .actions
            .first()
            .map(|a| a.name.clone())
            .or_else(|| self.current_action.clone())
            .unwrap_or_default();
        let case_key = self.case_id.clone().unwrap_or_default();
        let title = TitleInfo {
            case_name: assignment.name.clone(),
            case_id: short_case_id(&case_key),
            case_key,
            assignment_id: self.assignment_id.clone().unwrap_or_default(),
            action,
        };
        self.emit(ContainerEvent::ChangeTitle(title));
    }

    fn emit(&mut self, event: ContainerEvent) {
        self.events.push(event);
    }

    fn set_state(&mut self, to: ContainerState, operation: &str) -> Result<(), CaseError> {
        let from = self.state;
        self.state = from.transition(to, operation)?;
        if from != to {
            self.log(TraceKind::Transition, None, format!("{} -> {} ({})", from, to, operation));
        }
        Ok(())
    }

    /// Move to `to` unconditionally, for error recovery and closing.
    fn restore_state(&mut self, to: ContainerState) {
        let from = self.state;
        self.state = to;
        if from != to {
            self.log(TraceKind::Transition, None, format!("{} -> {}", from, to));
        }
    }

    fn require_editable(&self, operation: &str) -> Result<(), CaseError> {
        if self.state.accepts_edits() {
            Ok(())
        } else {
            Err(CaseError::InvalidState {
                operation: operation.to_string(),
                state: self.state.to_string(),
            })
        }
    }

    fn require_assignment(&self, operation: &str) -> Result<String, CaseError> {
        self.assignment_id.clone().ok_or_else(|| CaseError::InvalidState {
            operation: operation.to_string(),
            state: "no assignment is open".into(),
        })
    }

    fn require_case(&self, operation: &str) -> Result<String, CaseError> {
        self.case_id.clone().ok_or_else(|| CaseError::InvalidState {
            operation: operation.to_string(),
            state: "no case is open".into(),
        })
    }

    fn log(&self, kind: TraceKind, reference: Option<&str>, detail: impl ToString) {
        let mut event = self
            .tracer
            .event(self.state, kind)
            .with_detail(detail)
            .with_fingerprint(self.session.fingerprint.as_deref());
        if let Some(reference) = reference {
            event = event.with_reference(reference);
        }
        self.tracer.log(&event);
    }
}

// ============================================================================
// Pipeline step dispatch
// ============================================================================

struct StepRunner<'c, A: CaseApi, H: UiHost> {
    container: &'c mut CaseContainer<A, H>,
    field: FieldDescriptor,
    value: Value,
    /// View generation the pipeline started on.
    generation: u64,
    run: PipelineRun,
}

impl<A: CaseApi, H: UiHost> StepExecutor for StepRunner<'_, A, H> {
    fn execute(&mut self, step: &PipelineStep) -> Result<(), CaseError> {
        let container = &mut *self.container;
        container.log(TraceKind::Action, Some(&self.field.reference), step.name());
        self.run.steps.push(step.name());

        match step {
            PipelineStep::SetValue { pairs } => {
                for pair in pairs {
                    container.apply_set_value(pair);
                }
                Ok(())
            }
            PipelineStep::Refresh { refresh_for } => container.refresh(refresh_for.as_deref()),
            PipelineStep::PerformAction { action_name } => container.load_assignment(Some(action_name.as_str())),
            PipelineStep::RunScript {
                function_name,
                parameters,
            } => {
                let params = resolve_params(&container.session.store, parameters);
                container.host.run_script(function_name, &params);
                Ok(())
            }
            PipelineStep::OpenUrl(target) => {
                match build_open_url(&container.session.store, target) {
                    Some(url) => container.host.open_url(
                        &url,
                        target.window_name.as_deref(),
                        target.window_options.as_deref(),
                    ),
                    None => container.log(TraceKind::Action, Some(&self.field.reference), "open url without address"),
                }
                Ok(())
            }
            PipelineStep::Propagate => {
                if container.generation != self.generation {
                    self.run.stale = true;
                    container.log(
                        TraceKind::StaleResult,
                        Some(&self.field.reference),
                        format!("view generation {} replaced by {}", self.generation, container.generation),
                    );
                    return Ok(());
                }
                let case_content = container.case.as_ref().map(|c| &c.content);
                let report = container.session.propagate(
                    &self.field,
                    self.value.clone(),
                    &container.api,
                    case_content,
                    &container.tracer,
                );
                self.run.propagation = Some(report);
                Ok(())
            }
        }
    }
}

/// Checkbox inputs report their checked state as text.
fn normalize_input(field: &FieldDescriptor, value: Value) -> Value {
    match (field.kind(), value) {
        (FieldKind::Checkbox, Value::String(text)) => Value::Bool(text.eq_ignore_ascii_case("true")),
        (_, value) => value,
    }
}

/// `"ORG-APP-WORK W-12"` becomes `"W-12"`.
pub fn short_case_id(case_key: &str) -> String {
    case_key
        .split(' ')
        .nth(1)
        .unwrap_or(case_key)
        .to_string()
}
