//! The inverse context, used during compaction to pick the best term for an
//! IRI given a container and a type or language.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::Context;
use crate::keyword::ANY;

/// Orders strings shortest first, then lexicographically. This is the
/// ordering used for every term-selection collision.
pub(crate) fn shortest_then_lexical(a: &str, b: &str) -> Ordering {
	a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// The kind of value a term selection matches against.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum TypeLanguage {
	Language,
	Type,
	Any,
}

#[derive(Debug, Default)]
pub(crate) struct TypeLanguageMaps {
	pub language: HashMap<String, String>,
	pub typ: HashMap<String, String>,
	pub any: HashMap<String, String>,
}

/// Maps `target IRI → container key → {language, type, any} → term`.
#[derive(Debug, Default)]
pub(crate) struct InverseContext {
	map: HashMap<String, HashMap<String, TypeLanguageMaps>>,
}

impl InverseContext {
	pub fn contains_iri(&self, iri: &str) -> bool {
		self.map.contains_key(iri)
	}

	/// Walks the `container × preferred value` product and returns the
	/// first matching term.
	pub fn select(
		&self,
		iri: &str,
		containers: &[String],
		type_language: TypeLanguage,
		preferred_values: &[String],
	) -> Option<&str> {
		let container_map = self.map.get(iri)?;

		for container in containers {
			let Some(maps) = container_map.get(container) else {
				continue;
			};

			let value_map = match type_language {
				TypeLanguage::Language => &maps.language,
				TypeLanguage::Type => &maps.typ,
				TypeLanguage::Any => &maps.any,
			};

			for preferred in preferred_values {
				if let Some(term) = value_map.get(preferred) {
					return Some(term.as_str());
				}
			}
		}

		None
	}

	/// Builds the inverse of the given context.
	pub fn new(context: &Context) -> Self {
		let mut result = InverseContext::default();

		let default_language = context
			.default_language
			.as_deref()
			.map(str::to_lowercase)
			.unwrap_or_else(|| "@none".to_string());

		let mut terms: Vec<&str> = context.terms.keys().map(String::as_str).collect();
		terms.sort_by(|a, b| shortest_then_lexical(a, b));

		for key in terms {
			let def = &context.terms[key];
			if def.is_zero() {
				continue;
			}

			let iri = def.iri.clone().unwrap_or_default();
			let container = def.container.inverse_key();

			let container_map = result.map.entry(iri).or_default();
			let maps = container_map.entry(container).or_insert_with(|| {
				let mut maps = TypeLanguageMaps::default();
				maps.any.insert(ANY.to_string(), key.to_string());
				maps
			});

			if def.reverse {
				maps.typ
					.entry("@reverse".to_string())
					.or_insert_with(|| key.to_string());
			} else if def.typ.as_deref() == Some("@none") {
				maps.language
					.entry(ANY.to_string())
					.or_insert_with(|| key.to_string());
				maps.typ
					.entry(ANY.to_string())
					.or_insert_with(|| key.to_string());
			} else if let Some(typ) = &def.typ {
				maps.typ
					.entry(typ.clone())
					.or_insert_with(|| key.to_string());
			} else if def.language.is_some() && def.direction.is_some() {
				let language = def.language.as_ref().unwrap().as_ref().some();
				let direction = def.direction.as_ref().unwrap().as_ref().some();

				let lang_dir = match (language, direction) {
					(Some(language), Some(direction)) => {
						format!("{}_{}", language.to_lowercase(), direction)
					}
					(Some(language), None) => language.to_lowercase(),
					(None, Some(direction)) => format!("_{direction}"),
					(None, None) => "@none".to_string(),
				};

				maps.language
					.entry(lang_dir)
					.or_insert_with(|| key.to_string());
			} else if let Some(language) = &def.language {
				let language = match language.as_ref().some() {
					Some(language) => language.to_lowercase(),
					None => "@null".to_string(),
				};

				maps.language
					.entry(language)
					.or_insert_with(|| key.to_string());
			} else if let Some(direction) = &def.direction {
				let direction = match direction.as_ref().some() {
					Some(direction) => format!("_{direction}"),
					None => "@none".to_string(),
				};

				maps.language
					.entry(direction)
					.or_insert_with(|| key.to_string());
			} else if let Some(direction) = context.default_direction {
				let lang_dir = format!("{}_{}", default_language.to_lowercase(), direction);
				maps.language
					.entry(lang_dir)
					.or_insert_with(|| key.to_string());
				maps.language
					.entry("@none".to_string())
					.or_insert_with(|| key.to_string());
				maps.typ
					.entry("@none".to_string())
					.or_insert_with(|| key.to_string());
			} else {
				maps.language
					.entry(default_language.clone())
					.or_insert_with(|| key.to_string());
				maps.language
					.entry("@none".to_string())
					.or_insert_with(|| key.to_string());
				maps.typ
					.entry("@none".to_string())
					.or_insert_with(|| key.to_string());
			}
		}

		result
	}
}
