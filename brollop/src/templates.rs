//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary and loaded into one [`minijinja::Environment`] at
//! startup. Names ending in `.html` are auto-escaped.

use std::sync::Arc;

use minijinja::Environment;
use serde::Serialize;

use crate::errors::Error;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("admin_login.html", include_str!("../templates/admin_login.html")),
    ("admin_dashboard.html", include_str!("../templates/admin_dashboard.html")),
];

#[derive(Clone)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates").finish_non_exhaustive()
    }
}

impl Templates {
    /// Compile every embedded template. Fails on a syntax error.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env: Arc::new(env) })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, Error> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(context))
            .map_err(|e| Error::Internal {
                operation: format!("render template {name}: {e:#}"),
            })
    }
}
