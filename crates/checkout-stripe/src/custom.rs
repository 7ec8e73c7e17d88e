//! Hosted Checkout (custom button)
//!
//! Renders a page-owned button that opens the hosted modal through one
//! page-global `StripeCheckout` handler. Any number of buttons may share a
//! page; the handler and its `popstate` listener are configured once.

use checkout_core::js::{self, JsFunction, JsObject, JsValue, Statement};
use checkout_core::{html, AttributeMap, PageContext, Phase, ScriptFile, ScriptFragment};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::checkout::CHECKOUT_JS;
use crate::config::{CheckoutDisplay, CheckoutHooks, StripeKeys};
use crate::error::Result;

/// Latch guarding the page-global `handler` variable
pub const HANDLER_LATCH: &str = "stripe-checkout-handler";

/// Options of the trigger button
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupOptions {
    /// Button attributes; the id defaults to the next widget id
    pub button: AttributeMap,

    /// HTML-encode the button label
    pub encode_label: bool,

    pub hooks: CheckoutHooks,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            button: AttributeMap::new().with("class", "btn btn-lg btn-success"),
            encode_label: true,
            hooks: CheckoutHooks::default(),
        }
    }
}

/// Hosted-popup checkout widget
#[derive(Clone, Debug)]
pub struct PopupCheckout {
    publishable_key: String,
    pub stripe_js: String,
    pub display: CheckoutDisplay,
    pub options: PopupOptions,
}

impl PopupCheckout {
    pub fn new(keys: &StripeKeys) -> Self {
        Self {
            publishable_key: keys.publishable_key().to_string(),
            stripe_js: CHECKOUT_JS.into(),
            display: CheckoutDisplay::default(),
            options: PopupOptions::default(),
        }
    }

    #[must_use]
    pub fn display(mut self, display: CheckoutDisplay) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn options(mut self, options: PopupOptions) -> Self {
        self.options = options;
        self
    }

    /// Options passed to `handler.open` on each click
    pub fn open_options(&self) -> JsObject {
        let display = &self.display;
        let hooks = &self.options.hooks;

        JsObject::new()
            .member("name", JsValue::string(display.name.as_str()))
            .member("description", JsValue::string(display.description.as_str()))
            .member_opt("amount", display.amount.map(|a| json!(a)))
            .member("image", JsValue::string(display.image.as_str()))
            .member_opt("currency", display.currency.as_deref().map(JsValue::string))
            .member_opt("panelLabel", display.panel_label.as_deref().map(JsValue::string))
            .member_opt("zipCode", display.validate_zip_code.map(|b| json!(b)))
            .member_opt("email", display.user_email.as_deref().map(JsValue::string))
            .member_opt("allowRememberMe", display.allow_remember.map(|b| json!(b)))
            .member_opt("billingAddress", display.collect_billing_address.map(|b| json!(b)))
            .member("token", hooks.token.clone())
            .member("opened", hooks.opened.clone())
            .member("closed", hooks.closed.clone())
    }

    fn handler_fragment(&self) -> ScriptFragment {
        let configure = JsObject::new().member("key", JsValue::string(self.publishable_key.as_str()));
        let close_on_popstate = JsFunction::new(["e"]).statement(Statement::call("handler.close", vec![]));

        ScriptFragment::new(Phase::Ready)
            .statement(Statement::var(
                "handler",
                JsValue::expr(format!("StripeCheckout.configure({configure})")),
            ))
            .statement(Statement::call(
                "jQuery(window).on",
                vec![JsValue::string("popstate"), close_on_popstate.into()],
            ))
    }

    fn click_fragment(&self, button_id: &str) -> ScriptFragment {
        let on_click = JsFunction::new(["e"])
            .statement(Statement::call("handler.open", vec![self.open_options().into()]))
            .statement(Statement::call("e.preventDefault", vec![]));

        ScriptFragment::new(Phase::Ready)
            .statement(Statement::call(
                format!("{}.on", js::jquery_id(button_id)),
                vec![JsValue::string("click"), on_click.into()],
            ))
            .depends_on(button_id)
    }

    /// Render the trigger button and schedule its scripts
    pub fn render(&self, page: &mut PageContext) -> Result<String> {
        let mut button = self.options.button.clone();
        let button_id = match button.get_text("id") {
            Some(id) => id,
            None => {
                let id = page.next_widget_id();
                button.set("id", id.as_str());
                id
            }
        };

        let scripts = page.scripts_mut();
        scripts.register_id(button_id.as_str())?;
        scripts.register_file(ScriptFile::new(self.stripe_js.as_str(), Phase::End));
        scripts.emit_once(HANDLER_LATCH, [self.handler_fragment()])?;
        scripts.emit(self.click_fragment(&button_id))?;

        tracing::debug!(button_id = %button_id, "Rendered checkout button");
        Ok(html::button(&self.display.label, &button, self.options.encode_label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout() -> PopupCheckout {
        let keys = StripeKeys::new("pk_test_123", "sk_test_123").unwrap();
        PopupCheckout::new(&keys)
    }

    fn count_calls(page: &PageContext, callee: &str) -> usize {
        page.scripts()
            .fragments(Phase::Ready)
            .flat_map(|f| f.statements())
            .filter(|s| s.callee() == Some(callee))
            .count()
    }

    fn count_handler_vars(page: &PageContext) -> usize {
        page.scripts()
            .fragments(Phase::Ready)
            .flat_map(|f| f.statements())
            .filter(|s| matches!(s, Statement::Var { name, .. } if name == "handler"))
            .count()
    }

    #[test]
    fn test_button_gets_widget_id() {
        let mut page = PageContext::new();
        let html = checkout().render(&mut page).unwrap();

        assert_eq!(html, "<button class=\"btn btn-lg btn-success\" id=\"w0\">Pay</button>");
        assert!(page.scripts().is_registered("w0"));
    }

    #[test]
    fn test_handler_configured_once_per_page() {
        let mut page = PageContext::new();
        checkout().render(&mut page).unwrap();
        checkout().render(&mut page).unwrap();

        assert_eq!(count_handler_vars(&page), 1);
        assert_eq!(count_calls(&page, "jQuery(window).on"), 1);
        assert_eq!(count_calls(&page, "jQuery(\"#w0\").on"), 1);
        assert_eq!(count_calls(&page, "jQuery(\"#w1\").on"), 1);
        assert_eq!(page.scripts().files(Phase::End).count(), 1);
    }

    #[test]
    fn test_fresh_page_configures_again() {
        let mut first = PageContext::new();
        checkout().render(&mut first).unwrap();
        let mut second = PageContext::new();
        checkout().render(&mut second).unwrap();

        assert_eq!(count_handler_vars(&first), 1);
        assert_eq!(count_handler_vars(&second), 1);
    }

    #[test]
    fn test_click_opens_with_display_options() {
        let mut page = PageContext::new();
        let popup = checkout().display(CheckoutDisplay {
            amount: Some(999),
            name: "Shop \"X\"".into(),
            ..Default::default()
        });
        popup.render(&mut page).unwrap();

        let ready = page.scripts_mut().flush(Phase::Ready).unwrap();
        assert!(ready.contains("StripeCheckout.configure({ key: \"pk_test_123\" })"));
        assert!(ready.contains("handler.open({ name: \"Shop \\\"X\\\"\""));
        assert!(ready.contains("amount: 999"));
        assert!(ready.contains("token: function(token) { alert(\"Define your token handler\"); }"));
        assert!(ready.contains("e.preventDefault();"));
    }

    #[test]
    fn test_explicit_button_id_kept() {
        let mut page = PageContext::new();
        let popup = checkout().options(PopupOptions {
            button: AttributeMap::new().with("id", "buy"),
            encode_label: false,
            ..Default::default()
        });

        let html = popup.render(&mut page).unwrap();
        assert_eq!(html, "<button id=\"buy\">Pay</button>");
        assert_eq!(page.next_widget_id(), "w0");
    }

    #[test]
    fn test_explicit_button_id_rendered_once() {
        let mut page = PageContext::new();
        let popup = checkout().options(PopupOptions {
            button: AttributeMap::new().with("id", "buy"),
            ..Default::default()
        });
        popup.render(&mut page).unwrap();

        let err = popup.render(&mut page).unwrap_err();
        assert!(matches!(
            err,
            crate::StripeError::Widget(checkout_core::WidgetError::DuplicateId { ref id }) if id == "buy"
        ));
        assert_eq!(count_calls(&page, "jQuery(\"#buy\").on"), 1);
    }
}
