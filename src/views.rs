// src/views.rs

use std::{path::Path, sync::Arc};

use serde_json::Value;
use tera::{Context, Tera};

use crate::error::AppError;

/// Turns a view name (e.g. `admin/dashboard`) and a JSON object into HTML.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, data: Value) -> Result<String, AppError>;
}

pub type SharedViews = Arc<dyn ViewRenderer>;

/// Tera-backed renderer. View `a/b` maps to template `a/b.html` under the views directory.
pub struct TeraViews {
    tera: Tera,
}

impl TeraViews {
    pub fn from_dir(dir: &Path) -> Result<Self, tera::Error> {
        let pattern = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&pattern)?;
        tracing::debug!(
            "Loaded {} view templates from {}",
            tera.get_template_names().count(),
            dir.display()
        );
        Ok(Self { tera })
    }
}

impl ViewRenderer for TeraViews {
    fn render(&self, view: &str, data: Value) -> Result<String, AppError> {
        let context = Context::from_value(data).map_err(|e| {
            AppError::InternalServerError(format!("Invalid data for view '{}': {}", view, e))
        })?;

        self.tera
            .render(&format!("{}.html", view), &context)
            .map_err(|e| AppError::InternalServerError(format!("Failed to render view '{}': {:?}", view, e)))
    }
}
