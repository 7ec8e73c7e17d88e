//! Managed Elements (Stripe.js v3)
//!
//! The SDK renders and owns the card inputs; the page only provides empty
//! mount containers. Each element gets one `create` + `mount` pair and one
//! `addEventListener` per caller-supplied handler.
//!
//! ```text
//! Begin   var stripe = Stripe(key); var elements = stripe.elements();   (once)
//! Ready   var el = elements.create(kind, options); el.mount("#id");     (per element)
//!         el.addEventListener(event, handler);                         (per handler)
//!         form submit -> stripe.createToken(first) -> hidden input -> submit
//! ```

use checkout_core::form::FormRenderer;
use checkout_core::js::{self, JsExpr, JsFunction, JsValue, Statement};
use checkout_core::{html, AttributeMap, Loading, PageContext, Phase, ScriptFile, ScriptFragment};
use serde::{Deserialize, Serialize};

use crate::config::StripeKeys;
use crate::error::{Result, StripeError};
use crate::fields::ROLE_ATTRIBUTE;
use crate::tokenize;

/// Stripe.js v3
pub const STRIPE_V3_JS: &str = "https://js.stripe.com/v3/";

/// Latch guarding the page-global `stripe` and `elements` variables
pub const ELEMENTS_LATCH: &str = "stripe-elements";

const RENDERER: FormRenderer = FormRenderer::new(ROLE_ATTRIBUTE);

/// Element types understood by `elements.create`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Card,
    CardNumber,
    CardExpiry,
    CardCvc,
    PostalCode,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Card => "card",
            ElementKind::CardNumber => "cardNumber",
            ElementKind::CardExpiry => "cardExpiry",
            ElementKind::CardCvc => "cardCvc",
            ElementKind::PostalCode => "postalCode",
        }
    }

    pub fn default_container_id(&self) -> &'static str {
        match self {
            ElementKind::Card => "card-element",
            ElementKind::CardNumber => "card-number-element",
            ElementKind::CardExpiry => "card-expiry-element",
            ElementKind::CardCvc => "card-cvc-element",
            ElementKind::PostalCode => "postal-code-element",
        }
    }
}

/// Event callback bound on an element
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementEvent {
    /// `change`, `ready`, `focus`, `blur`, ...
    pub event: String,
    pub handler: JsExpr,
}

impl ElementEvent {
    pub fn new(event: impl Into<String>, handler: impl Into<JsExpr>) -> Self {
        Self {
            event: event.into(),
            handler: handler.into(),
        }
    }
}

/// One managed element and its mount point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub kind: ElementKind,

    /// Mount container id; defaults per kind
    #[serde(default)]
    pub container_id: Option<String>,

    /// Options passed to `elements.create`
    #[serde(default)]
    pub options: Option<serde_json::Value>,

    #[serde(default)]
    pub container_attributes: AttributeMap,

    #[serde(default)]
    pub events: Vec<ElementEvent>,
}

impl ElementSpec {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            container_id: None,
            options: None,
            container_attributes: AttributeMap::new(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn on(mut self, event: impl Into<String>, handler: impl Into<JsExpr>) -> Self {
        self.events.push(ElementEvent::new(event, handler));
        self
    }

    pub fn resolved_container_id(&self) -> &str {
        self.container_id
            .as_deref()
            .unwrap_or_else(|| self.kind.default_container_id())
    }

    fn variable(&self) -> String {
        tokenize::identifier(self.kind.as_str(), self.resolved_container_id())
    }
}

/// Options of a managed-elements form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementsFormOptions {
    /// Form id; defaults to the next widget id
    pub id: Option<String>,

    pub action: String,

    pub attributes: AttributeMap,

    pub stripe_js: String,

    /// With `Defer`, `Stripe(key)` runs in the ready block; `Async` is
    /// rejected
    pub sdk_loading: Loading,

    /// Options passed to `stripe.elements` (fonts, locale)
    pub elements_options: Option<serde_json::Value>,

    /// Mounted in order; the first one is tokenized on submit
    pub elements: Vec<ElementSpec>,

    pub token_input_name: String,

    pub error_container_id: String,

    pub submit_label: String,
}

impl Default for ElementsFormOptions {
    fn default() -> Self {
        Self {
            id: None,
            action: "/".into(),
            attributes: AttributeMap::new(),
            stripe_js: STRIPE_V3_JS.into(),
            sdk_loading: Loading::Sync,
            elements_options: None,
            elements: vec![ElementSpec::new(ElementKind::Card)],
            token_input_name: "stripeToken".into(),
            error_container_id: "card-errors".into(),
            submit_label: "Submit Payment".into(),
        }
    }
}

/// Managed-elements form widget
#[derive(Clone, Debug)]
pub struct ElementsForm {
    publishable_key: String,
    pub options: ElementsFormOptions,
}

impl ElementsForm {
    pub fn new(keys: &StripeKeys, options: ElementsFormOptions) -> Self {
        Self {
            publishable_key: keys.publishable_key().to_string(),
            options,
        }
    }

    /// Render the form with one container per element and schedule its
    /// scripts
    pub fn render(&self, page: &mut PageContext) -> Result<String> {
        let Some(first) = self.options.elements.first() else {
            return Err(StripeError::Config("managed-elements form needs at least one element".into()));
        };
        let init_phase = self.options.sdk_loading.init_phase()?;
        let form_id = self
            .options
            .id
            .clone()
            .unwrap_or_else(|| page.next_widget_id());

        let mut body = String::new();
        for element in &self.options.elements {
            body.push_str(&RENDERER.render_container(
                page,
                element.resolved_container_id(),
                &element.container_attributes,
            )?);
        }
        body.push_str(&RENDERER.render_message(page, &self.options.error_container_id, "card-errors")?);
        body.push_str(&html::button(
            &self.options.submit_label,
            &AttributeMap::new().with("type", "submit").with("class", "btn btn-primary"),
            true,
        ));

        let mut attributes = self.options.attributes.clone();
        attributes.set("id", form_id.as_str());
        let markup = RENDERER.render_form(page, &self.options.action, &attributes, &body)?;

        let scripts = page.scripts_mut();
        scripts.register_file(
            ScriptFile::new(self.options.stripe_js.as_str(), Phase::Head).loading(self.options.sdk_loading),
        );
        scripts.emit_once(ELEMENTS_LATCH, [self.init_fragment(init_phase)])?;
        for element in &self.options.elements {
            scripts.emit(mount_fragment(element))?;
        }
        scripts.emit(self.submit_fragment(&form_id, first))?;

        tracing::debug!(
            form_id = %form_id,
            elements = self.options.elements.len(),
            "Rendered managed-elements form"
        );
        Ok(markup)
    }

    fn init_fragment(&self, phase: Phase) -> ScriptFragment {
        let elements_args: Vec<JsValue> = self
            .options
            .elements_options
            .clone()
            .map(JsValue::from)
            .into_iter()
            .collect();

        ScriptFragment::new(phase)
            .statement(Statement::var(
                "stripe",
                JsValue::expr(format!("Stripe({})", js::string_literal(&self.publishable_key))),
            ))
            .statement(Statement::var(
                "elements",
                JsValue::expr(js::call_expr("stripe.elements", &elements_args)),
            ))
    }

    fn submit_fragment(&self, form_id: &str, first: &ElementSpec) -> ScriptFragment {
        let on_result = JsFunction::new(["result"]).statement(tokenize::handle_result(
            &self.options.error_container_id,
            &self.options.token_input_name,
            "result.error",
            "result.token.id",
        ));

        let mut on_submit = JsFunction::new(["e"]);
        for statement in tokenize::begin_request() {
            on_submit = on_submit.statement(statement);
        }
        let on_submit = on_submit.statement(Statement::call(
            format!("stripe.createToken({}).then", first.variable()),
            vec![on_result.into()],
        ));

        ScriptFragment::new(Phase::Ready)
            .statement(Statement::call(
                format!("{}.on", js::jquery_id(form_id)),
                vec![JsValue::string("submit"), on_submit.into()],
            ))
            .depends_on(form_id)
            .depends_on(self.options.error_container_id.as_str())
    }
}

fn mount_fragment(element: &ElementSpec) -> ScriptFragment {
    let variable = element.variable();
    let container_id = element.resolved_container_id();

    let mut create_args = vec![JsValue::string(element.kind.as_str())];
    if let Some(options) = &element.options {
        create_args.push(options.clone().into());
    }

    let mut fragment = ScriptFragment::new(Phase::Ready)
        .statement(Statement::var(
            variable.as_str(),
            JsValue::expr(js::call_expr("elements.create", &create_args)),
        ))
        .statement(Statement::call(
            format!("{variable}.mount"),
            vec![JsValue::string(format!("#{container_id}"))],
        ));

    for event in &element.events {
        fragment = fragment.statement(Statement::call(
            format!("{variable}.addEventListener"),
            vec![JsValue::string(event.event.as_str()), event.handler.clone().into()],
        ));
    }
    fragment.depends_on(container_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::WidgetError;
    use serde_json::json;

    fn keys() -> StripeKeys {
        StripeKeys::new("pk_test_123", "sk_test_123").unwrap()
    }

    fn calls<'a>(page: &'a PageContext, suffix: &'a str) -> impl Iterator<Item = &'a Statement> + 'a {
        page.scripts()
            .fragments(Phase::Ready)
            .flat_map(|f| f.statements())
            .filter(move |s| s.callee().is_some_and(|c| c.ends_with(suffix)))
    }

    #[test]
    fn test_two_elements_one_handler_each() {
        let mut page = PageContext::new();
        let options = ElementsFormOptions {
            elements: vec![
                ElementSpec::new(ElementKind::CardNumber).on("change", "function(event) { }"),
                ElementSpec::new(ElementKind::CardCvc).on("change", "function(event) { }"),
            ],
            ..Default::default()
        };

        ElementsForm::new(&keys(), options).render(&mut page).unwrap();

        let mounts: Vec<String> = calls(&page, ".mount").map(ToString::to_string).collect();
        assert_eq!(
            mounts,
            vec![
                "cardNumber_card_number_element.mount(\"#card-number-element\");",
                "cardCvc_card_cvc_element.mount(\"#card-cvc-element\");",
            ]
        );

        let listeners: Vec<String> = calls(&page, ".addEventListener").map(ToString::to_string).collect();
        assert_eq!(listeners.len(), 2);
        assert!(listeners[0].starts_with("cardNumber_card_number_element.addEventListener(\"change\""));
        assert!(listeners[1].starts_with("cardCvc_card_cvc_element.addEventListener(\"change\""));

        let deps: Vec<&str> = page
            .scripts()
            .fragments(Phase::Ready)
            .flat_map(|f| f.dependencies())
            .map(String::as_str)
            .collect();
        assert_eq!(deps, vec!["card-number-element", "card-cvc-element", "w0", "card-errors"]);
    }

    #[test]
    fn test_sdk_initialized_once_per_page() {
        let mut page = PageContext::new();
        let form = ElementsForm::new(&keys(), ElementsFormOptions::default());
        form.render(&mut page).unwrap();
        let second = ElementsForm::new(
            &keys(),
            ElementsFormOptions {
                elements: vec![ElementSpec::new(ElementKind::Card).container_id("card-2")],
                error_container_id: "card-errors-2".into(),
                ..Default::default()
            },
        );
        second.render(&mut page).unwrap();

        let begin = page.scripts_mut().flush(Phase::Begin).unwrap();
        assert_eq!(begin, "var stripe = Stripe(\"pk_test_123\");\nvar elements = stripe.elements();");
        assert_eq!(page.scripts().files(Phase::Head).count(), 1);
    }

    #[test]
    fn test_create_with_options() {
        let mut page = PageContext::new();
        let options = ElementsFormOptions {
            id: Some("payment-form".into()),
            elements_options: Some(json!({"locale": "auto"})),
            elements: vec![ElementSpec::new(ElementKind::Card).options(json!({"hidePostalCode": true}))],
            ..Default::default()
        };

        ElementsForm::new(&keys(), options).render(&mut page).unwrap();

        let begin = page.scripts_mut().flush(Phase::Begin).unwrap();
        assert!(begin.ends_with("var elements = stripe.elements({\"locale\":\"auto\"});"));
        let ready = page.scripts_mut().flush(Phase::Ready).unwrap();
        assert!(ready.starts_with(
            "var card_card_element = elements.create(\"card\", {\"hidePostalCode\":true});"
        ));
    }

    #[test]
    fn test_submit_tokenizes_first_element() {
        let mut page = PageContext::new();
        let options = ElementsFormOptions {
            id: Some("payment-form".into()),
            ..Default::default()
        };

        let html = ElementsForm::new(&keys(), options).render(&mut page).unwrap();
        assert!(html.contains("<div id=\"card-element\"></div>"));
        assert!(html.contains("<span id=\"card-errors\" class=\"card-errors\"></span>"));

        let submit = calls(&page, "\"#payment-form\").on").next().unwrap().to_string();
        assert!(submit.contains("if ($form.data(\"stripe-pending\")) { return false; }"));
        assert!(submit.contains("stripe.createToken(card_card_element).then(function(result) {"));
        assert!(submit.contains("if (result.error) {"));
        assert!(submit.contains(".val(result.token.id)"));
    }

    #[test]
    fn test_empty_element_list_rejected() {
        let mut page = PageContext::new();
        let options = ElementsFormOptions {
            elements: Vec::new(),
            ..Default::default()
        };

        let err = ElementsForm::new(&keys(), options).render(&mut page).unwrap_err();
        assert!(matches!(err, StripeError::Config(_)));
        assert_eq!(page.scripts().pending(Phase::Ready), 0);
    }

    #[test]
    fn test_document_mounts_after_containers() {
        let mut page = PageContext::new();
        let body = ElementsForm::new(&keys(), ElementsFormOptions::default())
            .render(&mut page)
            .unwrap();
        let doc = page.render_document("Pay", &body).unwrap();

        let container = doc.find("<div id=\"card-element\">").unwrap();
        let mount = doc.find("card_card_element.mount(\"#card-element\");").unwrap();
        assert!(container < mount);
        assert!(doc.contains(&html::encode(STRIPE_V3_JS)));
    }

    #[test]
    fn test_deferred_sdk_initializes_when_ready() {
        let mut page = PageContext::new();
        let options = ElementsFormOptions {
            sdk_loading: Loading::Defer,
            ..Default::default()
        };
        let body = ElementsForm::new(&keys(), options).render(&mut page).unwrap();

        assert_eq!(page.scripts().pending(Phase::Begin), 0);
        let doc = page.render_document("Pay", &body).unwrap();
        let ready = doc.find("jQuery(function ($) {").unwrap();
        let init = doc.find("var stripe = Stripe(\"pk_test_123\");").unwrap();
        let mount = doc.find("card_card_element.mount(").unwrap();
        assert!(ready < init);
        assert!(init < mount);
    }

    #[test]
    fn test_async_sdk_rejected() {
        let mut page = PageContext::new();
        let options = ElementsFormOptions {
            sdk_loading: Loading::Async,
            ..Default::default()
        };

        let err = ElementsForm::new(&keys(), options).render(&mut page).unwrap_err();
        assert!(matches!(err, StripeError::Widget(WidgetError::Config(_))));
        assert!(!page.scripts().is_registered("card-element"));
    }

    #[test]
    fn test_two_default_forms_collide_on_container() {
        let mut page = PageContext::new();
        let form = ElementsForm::new(&keys(), ElementsFormOptions::default());
        form.render(&mut page).unwrap();

        let err = form.render(&mut page).unwrap_err();
        assert!(matches!(err, StripeError::Widget(WidgetError::DuplicateId { ref id }) if id == "card-element"));
        assert_eq!(calls(&page, ".mount").count(), 1);
    }

    #[test]
    fn test_shared_error_container_rejected() {
        let mut page = PageContext::new();
        ElementsForm::new(&keys(), ElementsFormOptions::default())
            .render(&mut page)
            .unwrap();
        let second = ElementsForm::new(
            &keys(),
            ElementsFormOptions {
                elements: vec![ElementSpec::new(ElementKind::Card).container_id("card-2")],
                ..Default::default()
            },
        );

        let err = second.render(&mut page).unwrap_err();
        assert!(matches!(err, StripeError::Widget(WidgetError::DuplicateId { ref id }) if id == "card-errors"));
    }
}
