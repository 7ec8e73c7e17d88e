//! Page Render Context
//!
//! One [`PageContext`] per request: it owns the script emitter, the
//! page-global latches, registered asset bundles and the widget id counter.
//! Nothing in it outlives the response.

use crate::asset::{AssetBundle, JQUERY};
use crate::attributes::AttributeMap;
use crate::error::{Result, WidgetError};
use crate::html;
use crate::script::{Loading, Phase, ScriptEmitter, ScriptFile};

/// Per-request render state shared by every widget on a page
#[derive(Debug, Default)]
pub struct PageContext {
    scripts: ScriptEmitter,
    assets: Vec<&'static str>,
    widget_counter: usize,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> &ScriptEmitter {
        &self.scripts
    }

    pub fn scripts_mut(&mut self) -> &mut ScriptEmitter {
        &mut self.scripts
    }

    /// Auto-generated widget id (`w0`, `w1`, ...)
    pub fn next_widget_id(&mut self) -> String {
        let id = format!("w{}", self.widget_counter);
        self.widget_counter += 1;
        id
    }

    /// Register a bundle and its dependencies as end-of-body files
    pub fn register_asset(&mut self, bundle: &'static AssetBundle) {
        for bundle in bundle.resolve() {
            if self.assets.contains(&bundle.name) {
                continue;
            }
            tracing::debug!(bundle = bundle.name, "Registered asset bundle");
            self.assets.push(bundle.name);
            for src in bundle.js {
                self.scripts.register_file(ScriptFile::new(*src, Phase::End));
            }
        }
    }

    pub fn has_asset(&self, name: &str) -> bool {
        self.assets.iter().any(|registered| *registered == name)
    }

    /// Markup for the end of `<head>`
    pub fn render_head(&mut self) -> Result<String> {
        let mut out = render_files(&self.scripts, Phase::Head);
        let js = self.scripts.flush(Phase::Head)?;
        if !js.is_empty() {
            out.push_str(&html::inline_script(&js));
        }
        Ok(out)
    }

    /// Markup right after `<body>`
    pub fn render_body_begin(&mut self) -> Result<String> {
        let mut out = render_files(&self.scripts, Phase::Begin);
        let js = self.scripts.flush(Phase::Begin)?;
        if !js.is_empty() {
            out.push_str(&html::inline_script(&js));
        }
        Ok(out)
    }

    /// Markup right before `</body>`; ready scripts run inside one
    /// `jQuery(function ($) { ... })` block after the end-phase scripts.
    pub fn render_body_end(&mut self) -> Result<String> {
        if self.scripts.pending(Phase::Ready) > 0 {
            self.register_asset(&JQUERY);
        }

        let mut out = render_files(&self.scripts, Phase::End);
        let mut js = self.scripts.flush(Phase::End)?;
        let ready = self.scripts.flush(Phase::Ready)?;
        if !ready.is_empty() {
            if !js.is_empty() {
                js.push('\n');
            }
            js.push_str(&format!("jQuery(function ($) {{\n{ready}\n}});"));
        }
        if !js.is_empty() {
            out.push_str(&html::inline_script(&js));
        }
        Ok(out)
    }

    /// Assemble a complete document around already-rendered body markup.
    ///
    /// All phases are checked for dangling references before any output is
    /// produced.
    pub fn render_document(mut self, title: &str, body: &str) -> Result<String> {
        for phase in Phase::ALL {
            if let Some(id) = self.scripts.dangling(phase) {
                return Err(WidgetError::DanglingReference {
                    id: id.to_string(),
                    phase,
                });
            }
        }

        let head = self.render_head()?;
        let begin = self.render_body_begin()?;
        let end = self.render_body_end()?;

        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{head}\n</head>\n<body>\n{begin}\n{body}\n{end}\n</body>\n</html>\n",
            html::encode(title)
        ))
    }
}

fn render_files(scripts: &ScriptEmitter, phase: Phase) -> String {
    scripts
        .files(phase)
        .map(|file| {
            let attributes = match file.loading {
                Loading::Sync => AttributeMap::new(),
                Loading::Async => AttributeMap::new().with("async", true),
                Loading::Defer => AttributeMap::new().with("defer", true),
            };
            html::script_file(&file.src, &attributes)
        })
        .collect()
}
