//! HTML rendering.

use chrono::NaiveDate;
use minijinja::{Environment, UndefinedBehavior, context};
use serde::Serialize;

use vendor_core::types::{DATE_FORMAT, DEFAULT_YEARS_IN_BUSINESS, MAX_YEARS_IN_BUSINESS};
use vendor_core::{BusinessType, FormSubmission, Product};

const TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    ("notice.html", include_str!("../templates/notice.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("portal.html", include_str!("../templates/portal.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// How a notice is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Green
    Success,
    /// Yellow
    Warning,
    /// Red
    Error,
}

/// A one-line message shown above or below a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Styling
    pub level: NoticeLevel,
    /// Text
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// A warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Values pre-filled in the vendor form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValues {
    /// Company name
    pub company_name: String,
    /// Selected business type label
    pub business_type: Option<String>,
    /// Selected product labels
    pub products: Vec<String>,
    /// Slider position
    pub years_in_business: u8,
    /// `YYYY-MM-DD`
    pub onboarding_date: String,
    /// Notes
    pub additional_info: String,
}

impl FormValues {
    /// A fresh form.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            company_name: String::new(),
            business_type: None,
            products: Vec::new(),
            years_in_business: DEFAULT_YEARS_IN_BUSINESS,
            onboarding_date: today.format(DATE_FORMAT).to_string(),
            additional_info: String::new(),
        }
    }
}

impl From<&FormSubmission> for FormValues {
    fn from(s: &FormSubmission) -> Self {
        Self {
            company_name: s.company_name.clone(),
            business_type: s.business_type.map(|b| b.label().to_string()),
            products: s.products.iter().map(|p| p.label().to_string()).collect(),
            years_in_business: s.years_in_business,
            onboarding_date: s.onboarding_date.format(DATE_FORMAT).to_string(),
            additional_info: s.additional_info.clone(),
        }
    }
}

/// What the login page shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginView {
    /// Message under the login form
    pub notice: Option<Notice>,
    /// Show the registration form
    pub registration_enabled: bool,
}

/// What the vendor page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PortalView {
    /// Display name of the logged-in user
    pub name: String,
    /// Message under the vendor form
    pub notice: Option<Notice>,
    /// Message under the reset-password form
    pub reset_notice: Option<Notice>,
    /// Rows currently stored
    pub vendor_count: usize,
    /// Pre-filled form values
    pub form: FormValues,
}

/// Compiled page templates.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    /// Compile the templates, titling every page with `title`.
    pub fn new(title: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        let title: String = title.into();
        env.add_global("title", title);
        let business_types: Vec<_> = BusinessType::ALL.iter().map(|b| b.label()).collect();
        let products: Vec<_> = Product::ALL.iter().map(|p| p.label()).collect();
        env.add_global("business_types", business_types);
        env.add_global("products", products);
        env.add_global("max_years", MAX_YEARS_IN_BUSINESS);
        Ok(Self { env })
    }

    /// The login page.
    pub fn login(&self, view: &LoginView) -> Result<String, minijinja::Error> {
        self.env.get_template("login.html")?.render(view)
    }

    /// The vendor page.
    pub fn portal(&self, view: &PortalView) -> Result<String, minijinja::Error> {
        self.env.get_template("portal.html")?.render(view)
    }

    /// A page carrying only an error message.
    pub fn error(&self, message: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("error.html")?
            .render(context! { message })
    }
}
