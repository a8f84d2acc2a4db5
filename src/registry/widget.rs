use serde_json::Value;

use crate::options::resolver::OptionItem;
use crate::store::reference_store::is_blank;
use crate::view::view_model::FieldDescriptor;

const REQUIRED_MESSAGE: &str = "Complete this field.";

/// The rendered input a field is bound to.
///
/// The engine never renders anything itself: it pushes values, option
/// lists and validity messages through this trait and reads back whatever
/// the widget currently shows.
pub trait FieldWidget {
    fn value(&self) -> Value;

    fn set_value(&mut self, value: &Value);

    fn options(&self) -> &[OptionItem];

    fn set_options(&mut self, options: Vec<OptionItem>);

    /// An empty message clears a previous custom error.
    fn set_custom_validity(&mut self, message: &str);

    fn validity_message(&self) -> Option<&str>;

    fn check_validity(&self) -> bool;

    /// Surface the current validity state to the user. Returns validity.
    fn report_validity(&mut self) -> bool;
}

/// In-memory widget used by the command line front end and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessWidget {
    value: Value,
    options: Vec<OptionItem>,
    required: bool,
    custom_validity: String,
    reports: Vec<String>,
}

impl HeadlessWidget {
    pub fn for_field(field: &FieldDescriptor) -> Self {
        HeadlessWidget {
            value: field.value.clone(),
            required: field.required && !field.read_only,
            ..Default::default()
        }
    }

    /// Messages surfaced through `report_validity`, oldest first.
    pub fn reports(&self) -> &[String] {
        &self.reports
    }
}

impl FieldWidget for HeadlessWidget {
    fn value(&self) -> Value {
        self.value.clone()
    }

    fn set_value(&mut self, value: &Value) {
        self.value = value.clone();
    }

    fn options(&self) -> &[OptionItem] {
        &self.options
    }

    fn set_options(&mut self, options: Vec<OptionItem>) {
        self.options = options;
    }

    fn set_custom_validity(&mut self, message: &str) {
        self.custom_validity = message.to_string();
    }

    fn validity_message(&self) -> Option<&str> {
        if !self.custom_validity.is_empty() {
            Some(&self.custom_validity)
        } else if self.required && is_blank(&self.value) {
            Some(REQUIRED_MESSAGE)
        } else {
            None
        }
    }

    fn check_validity(&self) -> bool {
        self.validity_message().is_none()
    }

    fn report_validity(&mut self) -> bool {
        match self.validity_message().map(str::to_string) {
            Some(message) => {
                self.reports.push(message);
                false
            }
            None => true,
        }
    }
}
