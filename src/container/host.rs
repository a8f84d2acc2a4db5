use std::collections::VecDeque;

use crate::registry::widget::{FieldWidget, HeadlessWidget};
use crate::view::view_model::FieldDescriptor;

/// The surrounding UI as seen by the container: it renders widgets, opens
/// windows, asks the operator for input and runs page scripts.
pub trait UiHost {
    /// Render `field` and hand back the widget bound to it.
    fn bind_widget(&mut self, field: &FieldDescriptor) -> Box<dyn FieldWidget>;

    fn open_url(&mut self, url: &str, window_name: Option<&str>, window_options: Option<&str>);

    /// None when the operator cancels.
    fn prompt(&mut self, message: &str) -> Option<String>;

    fn run_script(&mut self, function_name: &str, params: &[(String, String)]);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedUrl {
    pub url: String,
    pub window_name: Option<String>,
    pub window_options: Option<String>,
}

/// Host without a screen: widgets live in memory, prompts are answered
/// from a queue, side effects are recorded.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    pub opened: Vec<OpenedUrl>,
    pub prompts_asked: Vec<String>,
    pub scripts: Vec<(String, Vec<(String, String)>)>,
    answers: VecDeque<Option<String>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next prompt. `None` cancels it.
    pub fn with_answer(mut self, answer: Option<&str>) -> Self {
        self.answers.push_back(answer.map(str::to_string));
        self
    }
}

impl UiHost for HeadlessHost {
    fn bind_widget(&mut self, field: &FieldDescriptor) -> Box<dyn FieldWidget> {
        Box::new(HeadlessWidget::for_field(field))
    }

    fn open_url(&mut self, url: &str, window_name: Option<&str>, window_options: Option<&str>) {
        self.opened.push(OpenedUrl {
            url: url.to_string(),
            window_name: window_name.map(str::to_string),
            window_options: window_options.map(str::to_string),
        });
    }

    fn prompt(&mut self, message: &str) -> Option<String> {
        self.prompts_asked.push(message.to_string());
        self.answers.pop_front().flatten()
    }

    fn run_script(&mut self, function_name: &str, params: &[(String, String)]) {
        self.scripts.push((function_name.to_string(), params.to_vec()));
    }
}
