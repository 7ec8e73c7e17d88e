//! Submit and tokenization-result statements shared by the field and
//! element forms.
//!
//! A form carries a `stripe-pending` data flag while a token request is in
//! flight. Submits during that window are ignored; an error response clears
//! the flag and re-enables the submit control, a token response appends the
//! hidden token input and submits natively (bypassing the jQuery handler).

use checkout_core::js::{self, JsObject, JsValue, Statement};

const PENDING_FLAG: &str = "stripe-pending";

fn pending() -> String {
    js::string_literal(PENDING_FLAG)
}

/// Opening statements of a submit handler bound on the form itself
pub(crate) fn begin_request() -> Vec<Statement> {
    vec![
        Statement::var("$form", JsValue::expr("jQuery(this)")),
        Statement::call("e.preventDefault", vec![]),
        Statement::raw(format!("if ($form.data({})) {{ return false; }}", pending())),
        Statement::call("$form.data", vec![JsValue::string(PENDING_FLAG), JsValue::expr("true")]),
        Statement::call(
            "$form.find(\":submit\").prop",
            vec![JsValue::string("disabled"), JsValue::expr("true")],
        ),
    ]
}

/// Branch on a tokenization result held in `$form` scope.
///
/// `error` and `token` are JS expressions for the error object and the
/// token id of the SDK's response.
pub(crate) fn handle_result(error_container_id: &str, token_input_name: &str, error: &str, token: &str) -> Statement {
    let input = JsObject::new()
        .member("name", JsValue::string(token_input_name))
        .member("id", JsValue::string(token_input_name));
    let hidden = js::string_literal("<input type=\"hidden\">");
    let errors = js::string_literal(&format!("#{error_container_id}"));

    Statement::raw(format!(
        "if ({error}) {{\n    \
         $form.find({errors}).text({error}.message);\n    \
         $form.find(\":submit\").prop(\"disabled\", false);\n    \
         $form.data({pending}, false);\n\
         }} else {{\n    \
         $form.append(jQuery({hidden}).attr({input}).val({token}));\n    \
         $form.get(0).submit();\n\
         }}",
        pending = pending(),
    ))
}

/// JS identifier derived from a DOM id
pub(crate) fn identifier(prefix: &str, dom_id: &str) -> String {
    let suffix: String = dom_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{prefix}_{suffix}")
}
