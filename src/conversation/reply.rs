use crate::core::messages;

/// What the router sends back for one inbound message
///
/// `options` render as quick-reply buttons; an empty list clears any
/// keyboard shown before.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub text: String,
    pub options: Vec<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    /// Generic failure reply; never carries error details
    pub fn server_error() -> Self {
        Self::text(messages::UNEXPECTED_SERVER_ERROR)
    }

    /// Fixed reply of the sheet-required gate
    pub fn not_connected() -> Self {
        Self::text(messages::NOT_CONNECTED_TO_SHEET).with_options(&["/createSheet", "/connectSheet"])
    }
}
