//! Fluent builder for a turn's [`Response`].

use voxskill_types::response::{Card, OutputSpeech, Reprompt, Response};

#[derive(Debug, Default)]
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spoken text.
    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.response.output_speech = Some(OutputSpeech::plain(text));
        self
    }

    /// Set the reprompt and keep the session open for the user's answer.
    pub fn ask(mut self, reprompt: impl Into<String>) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::plain(reprompt),
        });
        self.response.should_end_session = Some(false);
        self
    }

    /// Attach a simple title + body card.
    pub fn simple_card(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.response.card = Some(Card::simple(title, content));
        self
    }

    pub fn should_end_session(mut self, end: bool) -> Self {
        self.response.should_end_session = Some(end);
        self
    }

    pub fn build(self) -> Response {
        self.response
    }
}
