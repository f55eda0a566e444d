//! particle-field: Interactive canvas particle background.
//!
//! This crate provides a WASM-based particle field component: glowing dots
//! that drift, react to the pointer, link up with their neighbours and burst
//! out of clicks.

use getrandom as _;
use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;

pub use components::particle_field::{FieldConfig, ParticleField, ParticleFieldCanvas};
pub use error::ConfigError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-field: logging initialized");
}

/// Parse and validate a JSON configuration document.
///
/// A document may name a preset (`{"preset": "ambient"}`); every other field
/// is overlaid on that preset, or on the default preset when none is named.
pub fn parse_config(json: &str) -> error::Result<FieldConfig> {
	let mut value: serde_json::Value = serde_json::from_str(json)?;
	let preset = value.as_object_mut().and_then(|doc| doc.remove("preset"));
	let base = match preset.as_ref().and_then(|p| p.as_str()) {
		Some(name) => FieldConfig::preset(name).unwrap_or_else(|| {
			warn!("particle-field: unknown preset {:?}, using default", name);
			FieldConfig::default()
		}),
		None => FieldConfig::default(),
	};
	let config = base.with_overrides(value)?;
	config.validate()?;
	Ok(config)
}

/// Load the field configuration from a script element with id="particle-config".
fn load_field_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particle-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match parse_config(&json_text) {
		Ok(config) => {
			info!(
				"particle-field: loaded config with {} particles",
				config.count
			);
			Some(config)
		}
		Err(e) => {
			warn!("particle-field: rejected config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the field configuration from the DOM and renders the background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_field_config().unwrap_or_default();
	let config_signal = Signal::derive(move || config.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Particle Field" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="particle-background">
			<ParticleFieldCanvas config=config_signal fullscreen=true />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::BoundaryPolicy;

	#[test]
	fn preset_by_name() {
		let config = parse_config(r#"{"preset": "ambient"}"#).unwrap();
		assert_eq!(config, FieldConfig::ambient());
	}

	#[test]
	fn unknown_preset_falls_back() {
		let config = parse_config(r#"{"preset": "nebula"}"#).unwrap();
		assert_eq!(config, FieldConfig::default());
	}

	#[test]
	fn field_overrides() {
		let config =
			parse_config(r#"{"count": 40, "boundary": {"policy": "wrap", "margin": 10}}"#).unwrap();
		assert_eq!(config.count, 40);
		assert_eq!(config.boundary, BoundaryPolicy::Wrap { margin: 10.0 });
	}

	#[test]
	fn preset_keeps_its_settings_under_overrides() {
		let config = parse_config(r#"{"preset": "ambient", "count": 40}"#).unwrap();
		assert_eq!(config.count, 40);
		assert_eq!(config.boundary, FieldConfig::ambient().boundary);
		assert_eq!(config.pointer, FieldConfig::ambient().pointer);
		assert!(config.fade_on_scroll);

		let config = parse_config(
			r#"{"preset": "ambient", "boundary": {"policy": "bounce", "restitution": 0.9}}"#,
		)
		.unwrap();
		assert_eq!(config.boundary, BoundaryPolicy::Bounce { restitution: 0.9 });
		assert_eq!(config.count, 80);
	}

	#[test]
	fn overrides_on_a_preset_are_validated() {
		assert!(matches!(
			parse_config(r#"{"preset": "constellation", "pointer": {"alpha_cap": 3}}"#),
			Err(ConfigError::OutOfRange { field: "pointer.alpha_cap", .. })
		));
	}

	#[test]
	fn invalid_documents_are_rejected() {
		assert!(matches!(parse_config("{"), Err(ConfigError::Json(_))));
		assert!(matches!(
			parse_config(r#"{"damping": 2.0}"#),
			Err(ConfigError::OutOfRange { field: "damping", .. })
		));
	}
}
