//! Card Field Tokenization Form
//!
//! Raw card inputs tokenized with Stripe.js v2: the inputs carry
//! `data-stripe` roles but no `name`, so card data never reaches the
//! origin server. On submit the form requests a token, appends it as a
//! hidden input and submits. Optional jquery.payment formatting and
//! client-side validation are wired per rendered field.
//!
//! Client-side validation is advisory; Stripe still validates the card when
//! creating the token.

use checkout_core::asset::JQUERY_PAYMENT;
use checkout_core::form::FormRenderer;
use checkout_core::js::{self, JsExpr, JsFunction, JsValue, Statement};
use checkout_core::{html, AttributeMap, Loading, PageContext, Phase, ScriptFile, ScriptFragment};
use serde::{Deserialize, Serialize};

use crate::config::StripeKeys;
use crate::error::Result;
use crate::expiry::EXPIRY_SEPARATOR;
use crate::fields::{field_spec, CardField, FieldOptions, ROLE_ATTRIBUTE};
use crate::tokenize;

/// Stripe.js v2
pub const STRIPE_V2_JS: &str = "https://js.stripe.com/v2/";

/// Latch guarding `Stripe.setPublishableKey`
pub const PUBLISHABLE_KEY_LATCH: &str = "stripe-publishable-key";

const RENDERER: FormRenderer = FormRenderer::new(ROLE_ATTRIBUTE);

/// Options of a tokenization form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenFormOptions {
    /// Form id; defaults to the next widget id
    pub id: Option<String>,

    pub action: String,

    /// Extra attributes for the opening form tag
    pub attributes: AttributeMap,

    pub stripe_js: String,

    /// How the SDK file is loaded in `<head>`. With `Defer` the key is set
    /// in the ready block; `Async` is rejected
    pub sdk_loading: Loading,

    /// Name and id of the hidden token input
    pub token_input_name: String,

    /// Receives the SDK's error message (default response handler only)
    pub error_container_id: String,

    /// Receives the detected card brand (default brand handler only)
    pub brand_container_id: String,

    /// Class toggled on `.form-group` when validation fails
    pub error_class: String,

    /// Apply jquery.payment input formatting
    pub apply_format: bool,

    /// Validate with jquery.payment before submitting
    pub apply_validation: bool,

    /// Replaces the default `function(status, response)` response handler
    pub response_handler: Option<JsExpr>,

    /// Replaces the default submit handler; called as
    /// `handler.call(form, event, responseHandler)`
    pub request_handler: Option<JsExpr>,

    /// `function(cardType)` called during validation
    pub brand_handler: Option<JsExpr>,

    /// Default layout: one combined expiry input instead of month + year
    pub combined_expiry: bool,

    /// Default layout: submit button label
    pub submit_label: String,
}

impl Default for TokenFormOptions {
    fn default() -> Self {
        Self {
            id: None,
            action: "/".into(),
            attributes: AttributeMap::new(),
            stripe_js: STRIPE_V2_JS.into(),
            sdk_loading: Loading::Sync,
            token_input_name: "stripeToken".into(),
            error_container_id: "payment-errors".into(),
            brand_container_id: "cc-brand".into(),
            error_class: "has-error".into(),
            apply_format: true,
            apply_validation: true,
            response_handler: None,
            request_handler: None,
            brand_handler: None,
            combined_expiry: true,
            submit_label: "Submit Payment".into(),
        }
    }
}

/// A tokenization form being rendered.
///
/// Render the opening tag with [`TokenForm::begin`], the inputs with the
/// `*_input` methods, and close with [`TokenForm::end`], which schedules the
/// scripts for the fields actually rendered.
#[derive(Debug)]
pub struct TokenForm {
    publishable_key: String,
    id: String,
    options: TokenFormOptions,
    rendered: Vec<CardField>,
}

impl TokenForm {
    pub fn new(keys: &StripeKeys, options: TokenFormOptions, page: &mut PageContext) -> Self {
        let id = options.id.clone().unwrap_or_else(|| page.next_widget_id());

        Self {
            publishable_key: keys.publishable_key().to_string(),
            id,
            options,
            rendered: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &TokenFormOptions {
        &self.options
    }

    pub fn rendered_fields(&self) -> &[CardField] {
        &self.rendered
    }

    /// Opening form tag
    pub fn begin(&self, page: &mut PageContext) -> Result<String> {
        let attributes = html_attributes(&self.options.attributes, &self.id);
        page.scripts_mut().register_id(self.id.as_str())?;
        Ok(html::begin_form(&self.options.action, "POST", &attributes))
    }

    /// Render a card input of any kind
    pub fn field(&mut self, page: &mut PageContext, kind: CardField, options: FieldOptions) -> Result<String> {
        let spec = field_spec(kind, options)?;
        let html = RENDERER.render_field(page, &spec)?;
        if !self.rendered.contains(&kind) {
            self.rendered.push(kind);
        }
        Ok(html)
    }

    pub fn number_input(&mut self, page: &mut PageContext, options: FieldOptions) -> Result<String> {
        self.field(page, CardField::Number, options)
    }

    pub fn cvc_input(&mut self, page: &mut PageContext, options: FieldOptions) -> Result<String> {
        self.field(page, CardField::Cvc, options)
    }

    pub fn month_input(&mut self, page: &mut PageContext, options: FieldOptions) -> Result<String> {
        self.field(page, CardField::Month, options)
    }

    pub fn year_input(&mut self, page: &mut PageContext, options: FieldOptions) -> Result<String> {
        self.field(page, CardField::Year, options)
    }

    /// Combined expiry input followed by the hidden month and year inputs
    /// it is split into before tokenization
    pub fn month_and_year_input(&mut self, page: &mut PageContext, options: FieldOptions) -> Result<String> {
        let combined = self.field(page, CardField::MonthYear, options)?;
        let month = self.field(page, CardField::Month, FieldOptions::hidden())?;
        let year = self.field(page, CardField::Year, FieldOptions::hidden())?;
        Ok(format!("{combined}{month}{year}"))
    }

    /// Container the default response handler writes errors into
    pub fn error_container(&self, page: &mut PageContext) -> Result<String> {
        Ok(RENDERER.render_message(page, &self.options.error_container_id, "payment-errors")?)
    }

    /// Container the default brand handler writes the card brand into
    pub fn brand_container(&self, page: &mut PageContext) -> Result<String> {
        Ok(RENDERER.render_message(page, &self.options.brand_container_id, "cc-brand")?)
    }

    pub fn submit_button(&self, label: &str, attributes: &AttributeMap) -> String {
        let mut attrs = AttributeMap::new().with("type", "submit");
        for (key, value) in attributes.iter() {
            attrs.set(key, value.clone());
        }
        html::button(label, &attrs, true)
    }

    /// Close the form and schedule its scripts
    pub fn end(self, page: &mut PageContext) -> Result<String> {
        let init_phase = self.options.sdk_loading.init_phase()?;
        if self.options.apply_format || self.options.apply_validation {
            page.register_asset(&JQUERY_PAYMENT);
        }

        let scripts = page.scripts_mut();
        scripts.register_file(
            ScriptFile::new(self.options.stripe_js.as_str(), Phase::Head).loading(self.options.sdk_loading),
        );
        scripts.emit_once(
            PUBLISHABLE_KEY_LATCH,
            [ScriptFragment::new(init_phase).statement(Statement::call(
                "Stripe.setPublishableKey",
                vec![JsValue::string(self.publishable_key.as_str())],
            ))],
        )?;
        scripts.emit(self.response_fragment())?;
        scripts.emit(self.request_fragment())?;
        if self.options.apply_format && !self.rendered.is_empty() {
            scripts.emit(self.format_fragment())?;
        }
        if self.options.apply_validation {
            scripts.emit(self.validation_fragment())?;
        }

        tracing::debug!(form_id = %self.id, fields = ?self.rendered, "Rendered tokenization form");
        Ok(html::end_form().to_string())
    }

    /// Default layout: number, expiry, cvc, brand and error containers and
    /// a submit button
    pub fn render(keys: &StripeKeys, options: TokenFormOptions, page: &mut PageContext) -> Result<String> {
        let mut form = TokenForm::new(keys, options, page);
        let mut out = form.begin(page)?;

        let number = form.number_input(page, FieldOptions::default())?;
        let brand = form.brand_container(page)?;
        out.push_str(&form_group("Card number", &format!("{number}{brand}")));

        if form.options.combined_expiry {
            let expiry = form.month_and_year_input(page, FieldOptions::default())?;
            out.push_str(&form_group("Expiration (MM / YYYY)", &expiry));
        } else {
            let month = form.month_input(page, FieldOptions::default())?;
            out.push_str(&form_group("Expiration month (MM)", &month));
            let year = form.year_input(page, FieldOptions::default())?;
            out.push_str(&form_group("Expiration year (YYYY)", &year));
        }

        let cvc = form.cvc_input(page, FieldOptions::default())?;
        out.push_str(&form_group("CVC", &cvc));
        out.push_str(&form.error_container(page)?);

        let label = form.options.submit_label.clone();
        out.push_str(&form.submit_button(&label, &AttributeMap::new().with("class", "btn btn-primary")));
        out.push_str(&form.end(page)?);
        Ok(out)
    }

    // ------------------------------------------------------------------------
    // Scripts
    // ------------------------------------------------------------------------

    fn response_handler_name(&self) -> String {
        tokenize::identifier("stripeResponseHandler", &self.id)
    }

    fn input_selector(&self, kind: CardField) -> String {
        format!("input[{ROLE_ATTRIBUTE}={}]", kind.data_stripe())
    }

    fn response_fragment(&self) -> ScriptFragment {
        let handler = match &self.options.response_handler {
            Some(custom) => JsValue::Expr(custom.clone()),
            None => JsFunction::new(["status", "response"])
                .statement(Statement::var("$form", JsValue::expr(js::jquery_id(&self.id))))
                .statement(tokenize::handle_result(
                    &self.options.error_container_id,
                    &self.options.token_input_name,
                    "response.error",
                    "response.id",
                ))
                .into(),
        };

        let fragment = ScriptFragment::new(Phase::Ready)
            .statement(Statement::var(self.response_handler_name(), handler))
            .depends_on(self.id.as_str());
        if self.options.response_handler.is_some() {
            fragment
        } else {
            fragment.depends_on(self.options.error_container_id.as_str())
        }
    }

    fn request_fragment(&self) -> ScriptFragment {
        let on_submit = match &self.options.request_handler {
            Some(custom) => JsFunction::new(["e"]).statement(Statement::raw(format!(
                "return ({custom}).call(this, e, {});",
                self.response_handler_name()
            ))),
            None => {
                let mut function = JsFunction::new(["e"]);
                for statement in tokenize::begin_request() {
                    function = function.statement(statement);
                }
                function
                    .statement(Statement::call(
                        "Stripe.card.createToken",
                        vec![JsValue::expr("$form"), JsValue::expr(self.response_handler_name())],
                    ))
                    .statement(Statement::Return(JsValue::expr("false")))
            }
        };

        ScriptFragment::new(Phase::Ready)
            .statement(Statement::call(
                format!("{}.on", js::jquery_id(&self.id)),
                vec![JsValue::string("submit"), on_submit.into()],
            ))
            .depends_on(self.id.as_str())
    }

    fn format_fragment(&self) -> ScriptFragment {
        let mut fragment = ScriptFragment::new(Phase::Ready).depends_on(self.id.as_str());
        for kind in &self.rendered {
            let selector = js::jquery(&format!("#{} {}", self.id, self.input_selector(*kind)));
            fragment = fragment.statement(Statement::call(
                format!("{selector}.payment"),
                vec![JsValue::string(kind.formatter())],
            ));
        }
        fragment
    }

    fn brand_handler(&self) -> JsExpr {
        match &self.options.brand_handler {
            Some(custom) => custom.clone(),
            None => JsExpr::new(
                JsFunction::new(["cardType"])
                    .statement(Statement::call(
                        format!("{}.text", js::jquery_id(&self.options.brand_container_id)),
                        vec![JsValue::expr("cardType")],
                    ))
                    .to_string(),
            ),
        }
    }

    fn validation_fragment(&self) -> ScriptFragment {
        let find = |kind: CardField| {
            JsValue::expr(format!("$form.find({})", js::string_literal(&self.input_selector(kind))))
        };
        let error_class = js::string_literal(&self.options.error_class);
        let separator = js::string_literal(EXPIRY_SEPARATOR);

        let on_click = JsFunction::new(["e"])
            .statement(Statement::var("$form", JsValue::expr(js::jquery_id(&self.id))))
            .statement(Statement::var("$number", find(CardField::Number)))
            .statement(Statement::var("$cvc", find(CardField::Cvc)))
            .statement(Statement::var("$exp", find(CardField::MonthYear)))
            .statement(Statement::var("$month", find(CardField::Month)))
            .statement(Statement::var("$year", find(CardField::Year)))
            .statement(Statement::var(
                "toggleInputError",
                JsValue::expr(format!(
                    "function($input, erred) {{ $input.closest(\".form-group\").toggleClass({error_class}, erred); }}"
                )),
            ))
            .statement(Statement::var("cardType", JsValue::expr("$.payment.cardType($number.val())")))
            .statement(Statement::call(format!("({})", self.brand_handler()), vec![JsValue::expr("cardType")]))
            .statement(Statement::var("validCard", JsValue::expr("$.payment.validateCardNumber($number.val())")))
            .statement(Statement::call("toggleInputError", vec![JsValue::expr("$number"), JsValue::expr("!validCard")]))
            .statement(Statement::var("validCVC", JsValue::expr("$.payment.validateCardCVC($cvc.val(), cardType)")))
            .statement(Statement::call("toggleInputError", vec![JsValue::expr("$cvc"), JsValue::expr("!validCVC")]))
            .statement(Statement::var("validExpiry", JsValue::expr("false")))
            .statement(Statement::raw(format!(
                "if ($exp.length) {{\n    \
                 validExpiry = $.payment.validateCardExpiry($exp.payment(\"cardExpiryVal\"));\n    \
                 toggleInputError($exp, !validExpiry);\n    \
                 var parts = $exp.val().split({separator}, 2);\n    \
                 $month.val(parts[0]);\n    \
                 $year.val(parts[1]);\n\
                 }} else {{\n    \
                 validExpiry = $.payment.validateCardExpiry($month.val(), $year.val());\n    \
                 toggleInputError($month, !validExpiry);\n    \
                 toggleInputError($year, !validExpiry);\n\
                 }}"
            )))
            .statement(Statement::raw(
                "if (!validCard || !validCVC || !validExpiry) {\n    e.preventDefault();\n    return false;\n}",
            ))
            .statement(Statement::Return(JsValue::expr("true")));

        let fragment = ScriptFragment::new(Phase::Ready)
            .statement(Statement::call(
                format!("{}.on", js::jquery(&format!("#{} :submit", self.id))),
                vec![JsValue::string("click"), on_click.into()],
            ))
            .depends_on(self.id.as_str());
        if self.options.brand_handler.is_some() {
            fragment
        } else {
            fragment.depends_on(self.options.brand_container_id.as_str())
        }
    }
}

fn html_attributes(attributes: &AttributeMap, id: &str) -> AttributeMap {
    let mut attrs = attributes.clone();
    attrs.set("id", id);
    attrs
}

fn form_group(label: &str, inner: &str) -> String {
    let label = html::Tag::new("label").text(label).render();
    html::Tag::new("div")
        .attr("class", "form-group")
        .html(format!("{label}{inner}"))
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StripeError;
    use checkout_core::WidgetError;

    fn keys() -> StripeKeys {
        StripeKeys::new("pk_test_123", "sk_test_123").unwrap()
    }

    fn ready_calls(page: &PageContext, callee: &str) -> Vec<String> {
        page.scripts()
            .fragments(Phase::Ready)
            .flat_map(|f| f.statements())
            .filter(|s| s.callee() == Some(callee))
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_number_input_defaults() {
        let mut page = PageContext::new();
        let mut form = TokenForm::new(&keys(), TokenFormOptions::default(), &mut page);

        let html = form.number_input(&mut page, FieldOptions::default()).unwrap();

        assert!(html.starts_with("<input "));
        assert!(html.contains("data-stripe=\"number\""));
        assert!(html.contains("type=\"tel\""));
        assert!(html.contains("placeholder=\"•••• •••• •••• ••••\""));
        assert!(!html.contains("name="));
        assert!(page.scripts().is_registered("number"));
    }

    #[test]
    fn test_name_override_rejected() {
        let mut page = PageContext::new();
        let mut form = TokenForm::new(&keys(), TokenFormOptions::default(), &mut page);
        let options = FieldOptions {
            extra: AttributeMap::new().with("name", "card_number"),
            ..Default::default()
        };

        let err = form.number_input(&mut page, options).unwrap_err();
        assert!(matches!(err, StripeError::Widget(WidgetError::ForbiddenAttribute { .. })));
        assert!(form.rendered_fields().is_empty());
    }

    #[test]
    fn test_month_and_year_renders_hidden_inputs() {
        let mut page = PageContext::new();
        let mut form = TokenForm::new(&keys(), TokenFormOptions::default(), &mut page);

        let html = form.month_and_year_input(&mut page, FieldOptions::default()).unwrap();

        assert!(html.contains("data-stripe=\"exp-month-year\""));
        assert!(html.contains("<input type=\"hidden\" id=\"exp-month\""));
        assert!(html.contains("<input type=\"hidden\" id=\"exp-year\""));
        assert_eq!(
            form.rendered_fields(),
            &[CardField::MonthYear, CardField::Month, CardField::Year]
        );
    }

    #[test]
    fn test_end_schedules_scripts_by_phase() {
        let mut page = PageContext::new();
        let options = TokenFormOptions {
            id: Some("payment-form".into()),
            ..Default::default()
        };
        TokenForm::render(&keys(), options, &mut page).unwrap();

        let scripts = page.scripts();
        assert_eq!(scripts.files(Phase::Head).next().map(|f| f.src.as_str()), Some(STRIPE_V2_JS));
        assert_eq!(scripts.pending(Phase::Begin), 1);
        assert_eq!(scripts.pending(Phase::Ready), 4);
        assert!(page.has_asset("jquery.payment"));
        assert_eq!(ready_calls(&page, "jQuery(\"#payment-form\").on").len(), 1);
    }

    #[test]
    fn test_publishable_key_set_once_per_page() {
        let mut page = PageContext::new();
        TokenForm::render(&keys(), TokenFormOptions::default(), &mut page).unwrap();

        let options = TokenFormOptions {
            apply_validation: false,
            ..Default::default()
        };
        let mut second = TokenForm::new(&keys(), options, &mut page);
        second.begin(&mut page).unwrap();
        let number = FieldOptions {
            id: Some("number-2".into()),
            ..Default::default()
        };
        second.number_input(&mut page, number).unwrap();
        second.end(&mut page).unwrap();

        let begin = page.scripts_mut().flush(Phase::Begin).unwrap();
        assert_eq!(begin, "Stripe.setPublishableKey(\"pk_test_123\");");
        assert_eq!(ready_calls(&page, "jQuery(\"#w0\").on").len(), 1);
        assert_eq!(ready_calls(&page, "jQuery(\"#w1\").on").len(), 1);
    }

    #[test]
    fn test_request_handler_guards_duplicate_submit() {
        let mut page = PageContext::new();
        TokenForm::render(&keys(), TokenFormOptions::default(), &mut page).unwrap();

        let submit = ready_calls(&page, "jQuery(\"#w0\").on").remove(0);
        let guard = submit.find("if ($form.data(\"stripe-pending\"))").unwrap();
        let disable = submit.find("prop(\"disabled\", true)").unwrap();
        let request = submit.find("Stripe.card.createToken($form, stripeResponseHandler_w0);").unwrap();

        assert!(guard < disable);
        assert!(disable < request);
    }

    #[test]
    fn test_failed_validation_blocks_without_disabling() {
        let mut page = PageContext::new();
        TokenForm::render(&keys(), TokenFormOptions::default(), &mut page).unwrap();

        let click = ready_calls(&page, "jQuery(\"#w0 :submit\").on").remove(0);

        assert!(click.starts_with("jQuery(\"#w0 :submit\").on(\"click\", function(e) {"));
        assert!(click.contains("var validCard = $.payment.validateCardNumber($number.val());"));
        assert!(click.contains("toggleInputError($number, !validCard);"));
        assert!(click.contains("toggleClass(\"has-error\", erred)"));
        assert!(click.contains("if (!validCard || !validCVC || !validExpiry) {"));
        assert!(click.contains("e.preventDefault();\n        return false;"));
        assert!(!click.contains("\"disabled\", true"));
        assert!(!click.contains("createToken"));
    }

    #[test]
    fn test_validation_splits_combined_expiry() {
        let mut page = PageContext::new();
        TokenForm::render(&keys(), TokenFormOptions::default(), &mut page).unwrap();

        let click = ready_calls(&page, "jQuery(\"#w0 :submit\").on").remove(0);
        assert!(click.contains("var parts = $exp.val().split(\" / \", 2);"));
        assert!(click.contains("$month.val(parts[0]);"));
        assert!(click.contains("$year.val(parts[1]);"));
    }

    #[test]
    fn test_format_only_rendered_fields() {
        let mut page = PageContext::new();
        let options = TokenFormOptions {
            apply_validation: false,
            ..Default::default()
        };
        let mut form = TokenForm::new(&keys(), options, &mut page);
        form.begin(&mut page).unwrap();
        form.number_input(&mut page, FieldOptions::default()).unwrap();
        form.end(&mut page).unwrap();

        let calls = ready_calls(&page, "jQuery(\"#w0 input[data-stripe=number]\").payment");
        assert_eq!(calls, vec!["jQuery(\"#w0 input[data-stripe=number]\").payment(\"formatCardNumber\");"]);
        assert!(ready_calls(&page, "jQuery(\"#w0 input[data-stripe=cvc]\").payment").is_empty());
    }

    #[test]
    fn test_custom_handlers() {
        let mut page = PageContext::new();
        let options = TokenFormOptions {
            response_handler: Some(JsExpr::new("function(status, response) { console.log(response); }")),
            request_handler: Some(JsExpr::new("function(e, done) { Stripe.card.createToken(this, done); return false; }")),
            apply_format: false,
            apply_validation: false,
            ..Default::default()
        };
        TokenForm::render(&keys(), options, &mut page).unwrap();

        let ready = page.scripts_mut().flush(Phase::Ready).unwrap();
        assert!(ready.contains("var stripeResponseHandler_w0 = function(status, response) { console.log(response); };"));
        assert!(ready.contains(".call(this, e, stripeResponseHandler_w0);"));
        assert!(!page.has_asset("jquery.payment"));
    }

    #[test]
    fn test_document_renders_without_dangling_ids() {
        let mut page = PageContext::new();
        let body = TokenForm::render(&keys(), TokenFormOptions::default(), &mut page).unwrap();
        let doc = page.render_document("Pay", &body).unwrap();

        let begin = doc.find("Stripe.setPublishableKey").unwrap();
        let ready = doc.find("jQuery(function ($) {").unwrap();
        assert!(begin < ready);
    }

    #[test]
    fn test_deferred_sdk_sets_key_when_ready() {
        let mut page = PageContext::new();
        let options = TokenFormOptions {
            sdk_loading: Loading::Defer,
            ..Default::default()
        };
        let body = TokenForm::render(&keys(), options, &mut page).unwrap();

        assert_eq!(page.scripts().pending(Phase::Begin), 0);
        assert_eq!(ready_calls(&page, "Stripe.setPublishableKey").len(), 1);

        let doc = page.render_document("Pay", &body).unwrap();
        let file = doc.find("v2&#x2f;\" defer></script>").unwrap();
        let ready = doc.find("jQuery(function ($) {").unwrap();
        let key = doc.find("Stripe.setPublishableKey").unwrap();
        assert!(file < ready);
        assert!(ready < key);
    }

    #[test]
    fn test_async_sdk_rejected() {
        let mut page = PageContext::new();
        let options = TokenFormOptions {
            sdk_loading: Loading::Async,
            ..Default::default()
        };

        let err = TokenForm::render(&keys(), options, &mut page).unwrap_err();
        assert!(matches!(err, StripeError::Widget(WidgetError::Config(_))));
    }

    #[test]
    fn test_missing_error_container_is_dangling() {
        let mut page = PageContext::new();
        let options = TokenFormOptions {
            apply_validation: false,
            ..Default::default()
        };
        let mut form = TokenForm::new(&keys(), options, &mut page);
        let mut body = form.begin(&mut page).unwrap();
        body.push_str(&form.number_input(&mut page, FieldOptions::default()).unwrap());
        body.push_str(&form.end(&mut page).unwrap());

        let err = page.render_document("Pay", &body).unwrap_err();
        assert!(matches!(err, WidgetError::DanglingReference { ref id, .. } if id == "payment-errors"));
    }

    #[test]
    fn test_missing_brand_container_is_dangling() {
        let mut page = PageContext::new();
        let mut form = TokenForm::new(&keys(), TokenFormOptions::default(), &mut page);
        let mut body = form.begin(&mut page).unwrap();
        body.push_str(&form.number_input(&mut page, FieldOptions::default()).unwrap());
        body.push_str(&form.error_container(&mut page).unwrap());
        body.push_str(&form.end(&mut page).unwrap());

        let err = page.render_document("Pay", &body).unwrap_err();
        assert!(matches!(err, WidgetError::DanglingReference { ref id, .. } if id == "cc-brand"));
    }

    #[test]
    fn test_custom_handlers_need_no_containers() {
        let mut page = PageContext::new();
        let options = TokenFormOptions {
            response_handler: Some(JsExpr::new("function(status, response) {}")),
            brand_handler: Some(JsExpr::new("function(cardType) {}")),
            ..Default::default()
        };
        let mut form = TokenForm::new(&keys(), options, &mut page);
        let mut body = form.begin(&mut page).unwrap();
        body.push_str(&form.number_input(&mut page, FieldOptions::default()).unwrap());
        body.push_str(&form.end(&mut page).unwrap());

        assert!(page.render_document("Pay", &body).is_ok());
    }

    #[test]
    fn test_two_default_forms_collide_on_ids() {
        let mut page = PageContext::new();
        TokenForm::render(&keys(), TokenFormOptions::default(), &mut page).unwrap();

        let err = TokenForm::render(&keys(), TokenFormOptions::default(), &mut page).unwrap_err();
        assert!(matches!(err, StripeError::Widget(WidgetError::DuplicateId { ref id }) if id == "number"));
    }
}
