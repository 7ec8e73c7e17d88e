//! # checkout-core
//!
//! Provider-agnostic building blocks for server-rendered payment widgets:
//! attribute merging, tag building and phase-ordered script emission.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        PageContext                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌─────────────────────┐  │
//! │  │  attributes  │  │     html     │  │   ScriptEmitter     │  │
//! │  │ merge/verify │──│  tags + ids  │──│ Head/Begin/End/Ready│  │
//! │  └──────────────┘  └──────────────┘  └─────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! A widget merges caller options onto per-field defaults, renders its
//! markup (registering every DOM id it creates), and emits script fragments
//! at the phase where their dependencies exist. Page-global initialization
//! goes through [`ScriptEmitter::emit_once`] so it appears once per page no
//! matter how many widgets share the page.

pub mod asset;
pub mod attributes;
pub mod error;
pub mod form;
pub mod html;
pub mod js;
pub mod page;
pub mod script;

pub use attributes::{AttrValue, AttributeMap};
pub use error::{Result, WidgetError};
pub use form::{FieldSpec, FormRenderer};
pub use js::{JsExpr, JsFunction, JsObject, JsValue, Statement};
pub use page::PageContext;
pub use script::{HandlerLatch, Loading, Phase, ScriptEmitter, ScriptFile, ScriptFragment};
