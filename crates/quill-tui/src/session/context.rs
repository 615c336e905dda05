/// Values captured during setup.  Each field can be set exactly once.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    job_description: Option<String>,
    reference_document: Option<String>,
}

impl SessionContext {
    pub fn job_description(&self) -> Option<&str> {
        self.job_description.as_deref()
    }

    pub fn reference_document(&self) -> Option<&str> {
        self.reference_document.as_deref()
    }

    /// Store the description trimmed of surrounding whitespace.  Returns
    /// `false` and leaves the context untouched if it was already set.
    #[must_use]
    pub fn set_job_description(&mut self, text: &str) -> bool {
        set_once(&mut self.job_description, text.trim())
    }

    #[must_use]
    pub fn set_reference_document(&mut self, text: &str) -> bool {
        set_once(&mut self.reference_document, text)
    }
}

fn set_once(slot: &mut Option<String>, value: &str) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value.to_string());
    true
}
