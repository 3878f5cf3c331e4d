//! Contact form validation and simulated submission.
//!
//! Nothing is sent over the network: a valid submission shows a success
//! banner and clears the form. Banners share one slot on the form, so a new
//! banner replaces the visible one, and each banner removes itself after
//! [`MESSAGE_LIFETIME`].

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use crate::dom::{self, DomNode};
use crate::error::SetupError;
use crate::scheduler::SharedScheduler;

pub const FORM_SELECTOR: &str = ".contact-form form";
pub const MESSAGE_LIFETIME: Duration = Duration::from_secs(5);
pub const SUCCESS_TEXT: &str = "Message sent successfully! I'll get back to you soon.";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    EmptyFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate(submission: &ContactSubmission) -> Result<(), ValidationError> {
    let fields = [&submission.name, &submission.email, &submission.message];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ValidationError::EmptyFields);
    }
    if !is_valid_email(&submission.email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn class_name(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }

    /// Inline banner styling; the page stylesheet has no rules for it.
    pub fn css_text(self) -> &'static str {
        match self {
            MessageKind::Success => {
                "padding: 1rem; margin-top: 1rem; border-radius: 0.5rem; font-size: 1.4rem; \
                 text-align: center; background-color: rgba(34, 197, 94, 0.2); color: #22c55e; \
                 border: 1px solid #22c55e;"
            }
            MessageKind::Error => {
                "padding: 1rem; margin-top: 1rem; border-radius: 0.5rem; font-size: 1.4rem; \
                 text-align: center; background-color: rgba(239, 68, 68, 0.2); color: #ef4444; \
                 border: 1px solid #ef4444;"
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormMessage {
    pub text: String,
    pub kind: MessageKind,
}

impl FormMessage {
    pub fn success() -> Self {
        Self {
            text: SUCCESS_TEXT.to_string(),
            kind: MessageKind::Success,
        }
    }

    pub fn error(error: ValidationError) -> Self {
        Self {
            text: error.to_string(),
            kind: MessageKind::Error,
        }
    }
}

/// The form as the validator sees it.
pub trait FormView {
    type Banner: DomNode;

    fn submission(&self) -> ContactSubmission;
    fn reset(&self);
    /// Render `message` as a banner at the end of the form.
    fn append_banner(&self, message: &FormMessage) -> Option<Self::Banner>;
}

/// At most one visible banner. The generation tells a dismissal timer
/// whether its banner is still the one on screen.
struct MessageSlot<B> {
    current: Option<(u64, B)>,
    generation: u64,
}

impl<B: DomNode> MessageSlot<B> {
    fn new() -> Self {
        Self {
            current: None,
            generation: 0,
        }
    }

    fn clear(&mut self) {
        if let Some((_, banner)) = self.current.take() {
            banner.detach();
        }
    }

    fn occupy(&mut self, banner: B) -> u64 {
        self.clear();
        self.generation += 1;
        self.current = Some((self.generation, banner));
        self.generation
    }

    fn expire(&mut self, generation: u64) {
        if matches!(self.current, Some((g, _)) if g == generation) {
            self.clear();
        }
    }
}

pub struct ContactForm<V: FormView> {
    view: V,
    slot: Rc<RefCell<MessageSlot<V::Banner>>>,
    scheduler: SharedScheduler,
}

impl<V: FormView> ContactForm<V> {
    pub fn new(view: V, scheduler: SharedScheduler) -> Self {
        Self {
            view,
            slot: Rc::new(RefCell::new(MessageSlot::new())),
            scheduler,
        }
    }

    /// Validate and "send" the form. The outcome is also shown as a banner.
    pub fn submit(&self) -> Result<(), ValidationError> {
        let outcome = validate(&self.view.submission());
        match outcome {
            Ok(()) => {
                self.show(FormMessage::success());
                self.view.reset();
                log::info!("contact form accepted");
            }
            Err(error) => {
                self.show(FormMessage::error(error));
                log::debug!("contact form rejected: {error}");
            }
        }
        outcome
    }

    pub fn has_message(&self) -> bool {
        self.slot.borrow().current.is_some()
    }

    fn show(&self, message: FormMessage) {
        self.slot.borrow_mut().clear();
        let Some(banner) = self.view.append_banner(&message) else {
            return;
        };
        let generation = self.slot.borrow_mut().occupy(banner);

        let slot = self.slot.clone();
        self.scheduler.set_timeout(
            MESSAGE_LIFETIME,
            Box::new(move || slot.borrow_mut().expire(generation)),
        );
    }
}

/// The page's contact form, located by the field types it contains.
pub struct HtmlContactForm {
    document: Document,
    form: HtmlFormElement,
    name: HtmlInputElement,
    email: HtmlInputElement,
    message: HtmlTextAreaElement,
}

impl HtmlContactForm {
    pub fn find(document: &Document) -> Result<Self, SetupError> {
        let form = dom::query::<HtmlFormElement>(document, FORM_SELECTOR, "HTMLFormElement")?;
        let field = |selector: &'static str| -> Result<web_sys::Element, SetupError> {
            form.query_selector(selector)?
                .ok_or(SetupError::MissingElement { selector })
        };
        let name = field("input[type=\"text\"]")?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| SetupError::WrongElementType {
                selector: "input[type=\"text\"]",
                expected: "HTMLInputElement",
            })?;
        let email = field("input[type=\"email\"]")?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| SetupError::WrongElementType {
                selector: "input[type=\"email\"]",
                expected: "HTMLInputElement",
            })?;
        let message = field("textarea")?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| SetupError::WrongElementType {
                selector: "textarea",
                expected: "HTMLTextAreaElement",
            })?;

        Ok(Self {
            document: document.clone(),
            form,
            name,
            email,
            message,
        })
    }
}

impl FormView for HtmlContactForm {
    type Banner = HtmlElement;

    fn submission(&self) -> ContactSubmission {
        ContactSubmission {
            name: self.name.value(),
            email: self.email.value(),
            message: self.message.value(),
        }
    }

    fn reset(&self) {
        self.form.reset();
    }

    fn append_banner(&self, message: &FormMessage) -> Option<HtmlElement> {
        let banner = dom::create::<HtmlElement>(&self.document, "div").ok()?;
        banner.set_class_name(&format!("form-message {}", message.kind.class_name()));
        banner.set_text_content(Some(&message.text));
        banner.style().set_css_text(message.kind.css_text());
        self.form.append_child(&banner).ok()?;
        Some(banner)
    }
}

pub fn install(document: &Document, scheduler: SharedScheduler) -> Result<(), SetupError> {
    let view = HtmlContactForm::find(document)?;
    let form_element = view.form.clone();
    let form = ContactForm::new(view, scheduler);

    let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        form.submit().ok();
    });
    form_element.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
