//! HTML form extraction for the login/authorization pages.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Error, Result};

lazy_static! {
    static ref FORM: Selector = Selector::parse("form").unwrap();
    static ref FIELD: Selector = Selector::parse("input[name], textarea[name], button[name]").unwrap();
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref BODY: Selector = Selector::parse("body").unwrap();
}

/// A `<form>` lifted out of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlForm {
    /// `id` attribute.
    pub id: Option<String>,
    /// `action` attribute, unresolved.
    pub action: Option<String>,
    /// Upper-cased method, `GET` when absent.
    pub method: String,
    /// Successful controls in document order, submit buttons excluded.
    pub fields: Vec<(String, String)>,
    /// Named submit buttons. A browser sends only the one that was clicked.
    pub submits: Vec<(String, String)>,
}

impl HtmlForm {
    fn from_element(form: ElementRef<'_>) -> Self {
        let attr = |name: &str| form.value().attr(name).map(str::to_owned);

        let mut fields = Vec::new();
        let mut submits = Vec::new();
        for control in form.select(&FIELD) {
            let el = control.value();
            let Some(name) = el.attr("name") else { continue };

            let value = match el.name() {
                "textarea" => control.text().collect::<String>(),
                "button" => {
                    // A button without a type is a submit button.
                    if el.attr("type").map_or(true, |t| t.eq_ignore_ascii_case("submit")) {
                        let value = el.attr("value").unwrap_or_default().to_owned();
                        submits.push((name.to_owned(), value));
                    }
                    continue;
                }
                _ => {
                    let kind = el.attr("type").unwrap_or("text").to_ascii_lowercase();
                    if (kind == "checkbox" || kind == "radio") && el.attr("checked").is_none() {
                        continue;
                    }
                    match kind.as_str() {
                        "submit" => {
                            let value = el.attr("value").unwrap_or_default().to_owned();
                            submits.push((name.to_owned(), value));
                            continue;
                        }
                        "image" | "reset" => continue,
                        _ => el.attr("value").unwrap_or_default().to_owned(),
                    }
                }
            };
            fields.push((name.to_owned(), value));
        }

        HtmlForm {
            id: attr("id"),
            action: attr("action").filter(|a| !a.is_empty()),
            method: attr("method")
                .map(|m| m.to_ascii_uppercase())
                .unwrap_or_else(|| "GET".to_owned()),
            fields,
            submits,
        }
    }

    /// The form as submitted by clicking one of its submit buttons.
    ///
    /// With no name the first submit button is used. Unknown names, and
    /// forms without named buttons, leave the fields unchanged.
    pub fn with_submit(&self, name: Option<&str>) -> HtmlForm {
        let mut form = self.clone();
        let button = match name {
            Some(name) => self.submits.iter().find(|(k, _)| k == name),
            None => self.submits.first(),
        };
        if let Some((k, v)) = button {
            form.fields.push((k.clone(), v.clone()));
        }
        form
    }

    /// First value of a field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the form has a control with this name.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Set a field, replacing an existing value or appending a new one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name.to_owned(), value)),
        }
    }

    /// Resolve the submission URL against the page URL.
    pub fn action_url(&self, page: &Url) -> Result<Url> {
        match &self.action {
            Some(action) => page.join(action).map_err(Error::Url),
            None => Ok(page.clone()),
        }
    }

    /// Whether the form submits with POST.
    pub fn is_post(&self) -> bool {
        self.method == "POST"
    }
}

/// The parts of an HTML page the OAuth flow needs.
///
/// The parsed DOM is dropped after extraction so the page can be held
/// across await points.
#[derive(Debug, Clone, Default)]
pub struct HtmlPage {
    /// Document title.
    pub title: Option<String>,
    /// Every form on the page.
    pub forms: Vec<HtmlForm>,
    /// Body text with whitespace collapsed.
    pub text: String,
    /// The raw markup.
    pub raw: String,
}

impl HtmlPage {
    /// Parse a page.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_owned())
            .filter(|t| !t.is_empty());

        let forms = document.select(&FORM).map(HtmlForm::from_element).collect();

        let text = document
            .select(&BODY)
            .next()
            .map(|body| body.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" "))
            .unwrap_or_default();

        HtmlPage {
            title,
            forms,
            text,
            raw: html.to_owned(),
        }
    }

    /// Body text, e.g. to look for an error message after a rejected login.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First `<form>` matched by a CSS selector.
    pub fn find_form(&self, selector: &str) -> Result<Option<HtmlForm>> {
        let selector = Selector::parse(selector)
            .map_err(|e| Error::parse(format!("invalid selector `{}`: {:?}", selector, e)))?;

        let document = Html::parse_document(&self.raw);
        let form = document
            .select(&selector)
            .find(|el| el.value().name() == "form")
            .map(HtmlForm::from_element);
        Ok(form)
    }

    /// First form containing a control with this name.
    pub fn form_with_field(&self, name: &str) -> Option<&HtmlForm> {
        self.forms.iter().find(|f| f.has_field(name))
    }

    /// First form whose action contains the given fragment.
    pub fn form_with_action(&self, fragment: &str) -> Option<&HtmlForm> {
        self.forms
            .iter()
            .find(|f| f.action.as_deref().map_or(false, |a| a.contains(fragment)))
    }
}
