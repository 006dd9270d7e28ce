// HTML rendering of the results view using Tera

use super::ResultsView;
use anyhow::{anyhow, Result};
use tera::{Context, Tera};

/// Template name; the `.html` suffix turns on Tera's autoescaping
pub const RESULTS_TEMPLATE_NAME: &str = "results.html";

/// Built-in markup for the results area
pub const RESULTS_TEMPLATE: &str = r#"{% for block in blocks -%}
{% if block.kind == "notice" -%}
<div class="no-results">{{ block.message }}</div>
{% elif block.kind == "summary" -%}
<div class="search-summary">
    <h3>🎯 Search Complete!</h3>
    <div class="summary-stats">
        <div class="stat-item">
            <span class="stat-number">{{ block.total_searched }}</span>
            <span class="stat-label">Websites Searched</span>
        </div>
        <div class="stat-item">
            <span class="stat-number">{{ block.found_count }}</span>
            <span class="stat-label">Results Found</span>
        </div>
    </div>
</div>
{% elif block.kind == "result" -%}
<div class="result-item {{ block.status_class }}">
    <div class="result-header">
        <div class="website-name">{{ block.icon }} {{ block.website }}</div>
        <div class="status-badge {{ block.status_class }}">{{ block.label }}</div>
    </div>
    <div class="result-details">
        {% for line in block.details -%}
        {% if line.kind == "part_used" -%}
        <strong>Part Number Used:</strong> {{ line.part }}<br>
        {% elif line.kind == "socket_info" -%}
        <strong>Socket/Adapter Info:</strong> {{ line.info }}<br>
        {% elif line.kind == "modified" -%}
        <span class="warning-text">⚠️ Original part number modified (removed {{ line.chars_removed }} characters)</span>
        {% elif line.kind == "error" -%}
        <span class="error-text">Error: {{ line.message }}</span>
        {% else -%}
        <span class="error-text">No matching device found</span>
        {% endif -%}
        {% endfor -%}
    </div>
</div>
{% elif block.kind == "no_results" -%}
<div class="result-item not-found">
    <div class="result-header">
        <div class="website-name">😞 Final Result</div>
        <div class="status-badge not-found">No Results</div>
    </div>
    <div class="result-details">
        {{ block.message }}
    </div>
</div>
{% elif block.kind == "error" -%}
<div class="result-item error">
    <div class="result-header">
        <div class="website-name">⚠️ Error</div>
        <div class="status-badge error">Error</div>
    </div>
    <div class="result-details">
        <span class="error-text">{{ block.message }}</span>
    </div>
</div>
{% endif -%}
{% endfor -%}
"#;

/// Renders [`ResultsView`]s to HTML fragments
pub struct HtmlRenderer {
    tera: Tera,
}

impl HtmlRenderer {
    /// Create a renderer using the built-in template
    pub fn new() -> Result<Self> {
        Self::with_template(RESULTS_TEMPLATE)
    }

    /// Create a renderer from custom template source.
    ///
    /// The template receives the view as `blocks`, each carrying a `kind`.
    pub fn with_template(source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(RESULTS_TEMPLATE_NAME, source)
            .map_err(|e| anyhow!("Failed to add template '{}': {}", RESULTS_TEMPLATE_NAME, e))?;
        Ok(Self { tera })
    }

    /// Render a view to an HTML fragment
    pub fn render(&self, view: &ResultsView) -> Result<String> {
        let context = Context::from_serialize(view)
            .map_err(|e| anyhow!("Failed to build template context: {}", e))?;

        self.tera
            .render(RESULTS_TEMPLATE_NAME, &context)
            .map_err(|e| anyhow!("Failed to render template '{}': {}", RESULTS_TEMPLATE_NAME, e))
    }
}
