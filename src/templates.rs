use handlebars::{handlebars_helper, Handlebars, RenderError, TemplateError};
use serde::Serialize;
use serde_json::json;

handlebars_helper!(pluralize: |count: i64| if count == 1 { String::new() } else { "s".to_string() });

/**
 * Build the handlebars registry with every template compiled into the binary
 */
pub fn registry() -> Result<Handlebars<'static>, TemplateError> {
    let mut hb = Handlebars::new();
    hb.register_helper("pluralize", Box::new(pluralize));
    hb.register_template_string("layout", include_str!("../templates/layout.hbs"))?;
    hb.register_template_string("index", include_str!("../templates/index.hbs"))?;
    hb.register_template_string("detail", include_str!("../templates/detail.hbs"))?;
    hb.register_template_string("results", include_str!("../templates/results.hbs"))?;
    Ok(hb)
}

/**
 * Render `name` with `data` and wrap it in the page layout
 */
pub fn render_page<T: Serialize>(
    hb: &Handlebars<'_>,
    name: &str,
    title: &str,
    data: &T,
) -> Result<String, RenderError> {
    let body = hb.render(name, data)?;
    hb.render("layout", &json!({ "title": title, "body": body }))
}
