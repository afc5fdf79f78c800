//! Per-request context passed to every interceptor and handler.

use voxskill_types::envelope::{Request, RequestEnvelope};
use voxskill_types::error::SkillError;

use crate::attributes::AttributesManager;
use crate::locale::{PromptCatalog, VariantPicker};
use crate::persistence::DynPersistenceAdapter;
use crate::response::ResponseBuilder;

/// Everything a handler may read or mutate while serving one event.
pub struct HandlerInput {
    envelope: RequestEnvelope,
    attributes: AttributesManager,
    picker: Box<dyn VariantPicker>,
}

impl HandlerInput {
    pub fn new(
        envelope: RequestEnvelope,
        persistence: DynPersistenceAdapter,
        picker: Box<dyn VariantPicker>,
    ) -> Self {
        let attributes = AttributesManager::new(&envelope, persistence);
        Self {
            envelope,
            attributes,
            picker,
        }
    }

    pub fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }

    pub fn request(&self) -> &Request {
        &self.envelope.request
    }

    pub fn is_request_type(&self, request_type: &str) -> bool {
        self.request().request_type() == request_type
    }

    pub fn is_intent_name(&self, intent_name: &str) -> bool {
        self.request().intent_name() == Some(intent_name)
    }

    /// Value of a slot on the current intent.
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        match self.request() {
            Request::IntentRequest(r) => r.intent.slot_value(slot),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &AttributesManager {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributesManager {
        &mut self.attributes
    }

    /// The catalog the localization interceptor stored for this request.
    pub fn prompts(&self) -> Result<&PromptCatalog, SkillError> {
        self.attributes
            .request_attributes()
            .prompts
            .as_ref()
            .ok_or(SkillError::PromptsUnavailable)
    }

    /// One variant of `key`, chosen by the request's picker.
    pub fn pick_prompt(&mut self, key: &str) -> Result<String, SkillError> {
        let prompts = self
            .attributes
            .request_attributes()
            .prompts
            .as_ref()
            .ok_or(SkillError::PromptsUnavailable)?;
        prompts
            .pick(key, self.picker.as_mut())
            .map(str::to_string)
    }

    pub fn response_builder(&self) -> ResponseBuilder {
        ResponseBuilder::new()
    }

    pub fn into_session_attributes(self) -> serde_json::Map<String, serde_json::Value> {
        self.attributes.into_session_attributes()
    }
}

impl std::fmt::Debug for HandlerInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerInput")
            .field("request_type", &self.request().request_type())
            .field("intent", &self.request().intent_name())
            .field("attributes", &self.attributes)
            .finish()
    }
}
