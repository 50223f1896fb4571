//! Raw, unprocessed `@context` syntax.
//!
//! A local context is decoded into these structures in a single pass before
//! term creation runs, so that forward references between terms resolve
//! against the complete set of pending definitions.

use indexmap::IndexMap;
use json_syntax::Value;

use crate::{Error, Nullable};

/// A decoded context definition, before term processing.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContextDefinition {
	pub import: Option<String>,
	pub base: Option<Nullable<String>>,
	pub vocab: Option<Nullable<String>>,
	pub language: Option<Nullable<String>>,
	pub direction: Option<Nullable<String>>,
	pub propagate: Option<bool>,
	pub protected: Option<bool>,
	pub terms: IndexMap<String, TermEntry>,
}

/// A decoded term definition entry.
#[derive(Clone, Debug, Default)]
pub(crate) struct TermEntry {
	/// The whole definition was the literal `null`.
	pub null: bool,

	/// The definition was a plain string.
	pub simple: bool,

	pub id: Option<Nullable<String>>,
	pub typ: Option<String>,
	pub reverse: Option<String>,
	pub container: Option<Nullable<Vec<String>>>,
	pub index: Option<String>,
	pub context: Option<Value>,
	pub language: Option<Nullable<String>>,
	pub direction: Option<Nullable<String>>,
	pub nest: Option<String>,
	pub prefix: Option<bool>,
	pub protected: Option<bool>,
	pub has_unknown_entries: bool,
}

fn as_str(value: &Value) -> Option<&str> {
	match value {
		Value::String(s) => Some(s.as_str()),
		_ => None,
	}
}

fn nullable_string(value: &Value, err: Error) -> Result<Nullable<String>, Error> {
	match value {
		Value::Null => Ok(Nullable::Null),
		Value::String(s) => Ok(Nullable::Some(s.as_str().to_string())),
		_ => Err(err),
	}
}

impl ContextDefinition {
	/// Decodes a context definition map.
	pub fn parse(
		object: &json_syntax::Object,
		mode_ld10: bool,
	) -> Result<Self, Error> {
		let mut def = ContextDefinition::default();

		for entry in object.entries() {
			let key = entry.key.as_str();
			let value = &entry.value;

			match key {
				"@version" => {
					if mode_ld10 {
						return Err(Error::ProcessingModeConflict);
					}

					match value {
						Value::Number(n) if n.as_str() == "1.1" => (),
						_ => return Err(Error::InvalidVersionValue),
					}
				}
				"@import" => match value {
					Value::Null => (),
					Value::String(s) => def.import = Some(s.as_str().to_string()),
					_ => return Err(Error::InvalidImportValue),
				},
				"@base" => {
					def.base = Some(nullable_string(value, Error::InvalidBaseIri)?);
				}
				"@vocab" => {
					def.vocab = Some(nullable_string(value, Error::InvalidVocabMapping)?);
				}
				"@language" => {
					def.language =
						Some(nullable_string(value, Error::InvalidDefaultLanguage)?);
				}
				"@direction" => {
					if mode_ld10 {
						return Err(Error::InvalidContextEntry);
					}

					def.direction =
						Some(nullable_string(value, Error::InvalidBaseDirection)?);
				}
				"@propagate" => {
					if mode_ld10 {
						return Err(Error::InvalidContextEntry);
					}

					match value {
						Value::Boolean(b) => def.propagate = Some(*b),
						_ => return Err(Error::InvalidPropagateValue),
					}
				}
				"@protected" => match value {
					Value::Boolean(b) => def.protected = Some(*b),
					_ => return Err(Error::InvalidProtectedValue),
				},
				_ => {
					let term = TermEntry::parse(value, mode_ld10)?;
					def.terms.insert(key.to_string(), term);
				}
			}
		}

		Ok(def)
	}

	/// Decodes the term entries of an `@import`-ed remote context.
	///
	/// Non-term keywords are skipped; a nested `@import` is rejected.
	pub fn parse_imported_terms(
		object: &json_syntax::Object,
		mode_ld10: bool,
	) -> Result<IndexMap<String, TermEntry>, Error> {
		let mut terms = IndexMap::new();

		for entry in object.entries() {
			let key = entry.key.as_str();

			match key {
				"@import" => return Err(Error::InvalidContextEntry),
				"@version" | "@base" | "@vocab" | "@language" | "@direction"
				| "@propagate" | "@protected" => (),
				_ => {
					let term = TermEntry::parse(&entry.value, mode_ld10)?;
					terms.insert(key.to_string(), term);
				}
			}
		}

		Ok(terms)
	}
}

impl TermEntry {
	/// Decodes a single term definition value.
	pub fn parse(value: &Value, mode_ld10: bool) -> Result<Self, Error> {
		match value {
			Value::Null => Ok(TermEntry {
				null: true,
				id: Some(Nullable::Null),
				..Default::default()
			}),
			Value::String(s) => Ok(TermEntry {
				simple: true,
				id: Some(Nullable::Some(s.as_str().to_string())),
				..Default::default()
			}),
			Value::Object(object) => Self::parse_expanded(object, mode_ld10),
			_ => Err(Error::InvalidTermDefinition),
		}
	}

	fn parse_expanded(
		object: &json_syntax::Object,
		mode_ld10: bool,
	) -> Result<Self, Error> {
		let mut entry = TermEntry::default();

		for e in object.entries() {
			let key = e.key.as_str();
			let value = &e.value;

			match key {
				"@id" => match value {
					Value::Null => entry.id = Some(Nullable::Null),
					Value::String(s) => {
						entry.id = Some(Nullable::Some(s.as_str().to_string()))
					}
					_ => return Err(Error::InvalidIriMapping),
				},
				"@type" => match value {
					Value::Null => (),
					Value::String(s) => entry.typ = Some(s.as_str().to_string()),
					_ => return Err(Error::InvalidTypeMapping),
				},
				"@reverse" => match value {
					Value::Null => (),
					Value::String(s) => entry.reverse = Some(s.as_str().to_string()),
					_ => return Err(Error::InvalidIriMapping),
				},
				"@container" => {
					entry.container = Some(Self::parse_container(value, mode_ld10)?)
				}
				"@index" => match value {
					Value::Null => (),
					Value::String(s) => entry.index = Some(s.as_str().to_string()),
					_ => return Err(Error::InvalidTermDefinition),
				},
				"@context" => entry.context = Some(value.clone()),
				"@language" => {
					entry.language =
						Some(nullable_string(value, Error::InvalidLanguageMapping)?);
				}
				"@direction" => {
					entry.direction =
						Some(nullable_string(value, Error::InvalidBaseDirection)?);
				}
				"@nest" => match value {
					Value::Null => (),
					Value::String(s) => entry.nest = Some(s.as_str().to_string()),
					_ => return Err(Error::InvalidNestValue),
				},
				"@prefix" => match value {
					Value::Null => (),
					Value::Boolean(b) => entry.prefix = Some(*b),
					_ => return Err(Error::InvalidPrefixValue),
				},
				"@protected" => match value {
					Value::Null => (),
					Value::Boolean(b) => entry.protected = Some(*b),
					_ => return Err(Error::InvalidProtectedValue),
				},
				_ => entry.has_unknown_entries = true,
			}
		}

		Ok(entry)
	}

	fn parse_container(
		value: &Value,
		mode_ld10: bool,
	) -> Result<Nullable<Vec<String>>, Error> {
		if mode_ld10 {
			// JSON-LD 1.0 only allows a single container keyword.
			return match as_str(value) {
				Some(s) => Ok(Nullable::Some(vec![s.to_string()])),
				None => Err(Error::InvalidContainerMapping),
			};
		}

		match value {
			Value::Null => Ok(Nullable::Null),
			Value::String(s) => Ok(Nullable::Some(vec![s.as_str().to_string()])),
			Value::Array(items) => {
				let mut values = Vec::with_capacity(items.len());
				for item in items {
					match as_str(item) {
						Some(s) => values.push(s.to_string()),
						None => return Err(Error::InvalidContainerMapping),
					}
				}
				Ok(Nullable::Some(values))
			}
			_ => Err(Error::InvalidContainerMapping),
		}
	}
}
