//! The context processing algorithm.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#context-processing-algorithm>.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use iref::{Iri, IriBuf};
use json_syntax::Value;

use super::define::{DefineOptions, TermState};
use super::{Context, REMOTE_CONTEXT_LIMIT};
use crate::loader::{Loader, RemoteContext};
use crate::syntax::{ContextDefinition, TermEntry};
use crate::{iri, Direction, Error, Nullable, Processor};

/// Options of a single context-processing call.
#[derive(Clone, Debug)]
pub(crate) struct ContextOptions {
	pub remotes: Vec<IriBuf>,
	pub override_protected: bool,
	pub propagate: bool,
	pub validate: bool,
}

impl Default for ContextOptions {
	fn default() -> Self {
		Self {
			remotes: Vec::new(),
			override_protected: false,
			propagate: true,
			validate: true,
		}
	}
}

impl<L: Loader> Processor<L> {
	/// Processes a context value (null, string, map, or array of the
	/// preceding) into a [`Context`].
	///
	/// Returns `None` for the empty array, which defines nothing.
	pub async fn context(
		&self,
		value: &Value,
		base_url: Option<&Iri>,
	) -> Result<Option<Context>, Error> {
		self.process_context_value(None, value, base_url, ContextOptions::default())
			.await
	}

	pub(crate) async fn load_remote(&self, url: &Iri) -> Result<RemoteContext, Error> {
		self.loader
			.load(url)
			.await
			.map_err(Error::LoadingRemoteContextFailed)
	}

	pub(crate) async fn process_context_value(
		&self,
		active_context: Option<&Context>,
		value: &Value,
		base_url: Option<&Iri>,
		opts: ContextOptions,
	) -> Result<Option<Context>, Error> {
		let blank;
		let active = match active_context {
			Some(context) => context,
			None => {
				blank = Context::new(base_url.map(ToOwned::to_owned));
				&blank
			}
		};

		// 1) The result starts as a copy of the active context. The
		// caller's context is never mutated.
		let mut result = active.clone();
		if let Some(base) = &self.base_iri {
			result.current_base_iri = Some(base.clone());
		}

		// Snapshot used whenever the pre-processing state must be
		// remembered as a previous context.
		let original = Arc::new(result.clone());

		let elements: &[Value] = match value {
			Value::Array(elements) => elements.as_slice(),
			other => std::slice::from_ref(other),
		};

		if elements.is_empty() {
			return Ok(None);
		}

		let mut propagate = opts.propagate;
		let mut remotes = opts.remotes;

		// 5) Order is significant.
		for (index, element) in elements.iter().enumerate() {
			match element {
				// 5.1) null: reset, unless protected terms forbid it.
				Value::Null => {
					if !opts.override_protected && !result.protected.is_empty() {
						return Err(Error::InvalidContextNullification);
					}

					let original_base = result.original_base_iri.clone();
					let previous =
						std::mem::replace(&mut result, Context::new(original_base));
					if !propagate {
						result.previous_context = Some(Arc::new(previous));
					}
				}

				// 5.2) string: remote context reference.
				Value::String(reference) => {
					let reference = reference.as_str();
					let resolved = match base_url {
						Some(base) => iri::resolve(base, reference)
							.ok_or(Error::LoadingDocumentFailed)?,
						None => IriBuf::new(reference.to_string())
							.map_err(|_| Error::LoadingDocumentFailed)?,
					};

					// 5.2.2) During scoped-context validation a repeated
					// remote is a no-op, not an error.
					if !opts.validate && remotes.contains(&resolved) {
						return Ok(None);
					}

					// 5.2.3)
					if remotes.len() >= REMOTE_CONTEXT_LIMIT {
						if self.mode_1_0() {
							return Err(Error::RecursiveContextInclusion);
						}
						return Err(Error::ContextOverflow);
					}
					remotes.push(resolved.clone());

					let mut cached = false;
					if result.is_blank() {
						if let Some(processed) = self.processed_contexts.get(&resolved) {
							let current = result.current_base_iri.clone();
							let original_base = result.original_base_iri.clone();

							result = processed.clone();
							result.current_base_iri = current;
							result.original_base_iri = original_base;

							cached = true;
						}
					}

					if !cached {
						// 5.2.4) 5.2.5) The loader is expected to cache.
						let document = self.load_remote(&resolved).await?;

						// 5.2.6)
						let new_opts = ContextOptions {
							remotes: remotes.clone(),
							validate: opts.validate,
							..ContextOptions::default()
						};

						if let Some(processed) = Box::pin(self.process_context_value(
							Some(&result),
							&document.context,
							Some(document.url.as_iri()),
							new_opts,
						))
						.await?
						{
							result = processed;
						}
					}
				}

				// 5.4) map: local context definition.
				Value::Object(object) => {
					let mut definition =
						ContextDefinition::parse(object, self.mode_1_0())?;

					// 2) `@propagate` is only honoured on the first
					// element of the sequence.
					if index == 0 {
						if let Some(value) = definition.propagate {
							propagate = value;
						}
					}

					// 3)
					if !propagate && result.previous_context.is_none() {
						result.previous_context = Some(original.clone());
					}

					// 5.6)
					if let Some(import) = definition.import.take() {
						if !import.is_empty() {
							definition.terms = self
								.handle_import(base_url, &import, definition.terms)
								.await?;
						}
					}

					// 5.7) A remote-fetched context's `@base` is ignored.
					if remotes.is_empty() {
						if let Some(base) = &definition.base {
							handle_base(&mut result, base)?;
						}
					}

					// 5.8)
					if let Some(vocab) = &definition.vocab {
						self.handle_vocab(&mut result, vocab)?;
					}

					// 5.9)
					if let Some(language) = &definition.language {
						handle_language(&mut result, language);
					}

					// 5.10)
					if let Some(direction) = &definition.direction {
						handle_direction(&mut result, direction)?;
					}

					let protected = definition.protected.unwrap_or(false);

					// 5.12)
					let mut defined: HashMap<String, TermState> = HashMap::new();

					// 5.13)
					let mut term_keys: Vec<String> =
						definition.terms.keys().cloned().collect();
					if self.ordered {
						term_keys.sort();
					}

					for key in &term_keys {
						self.create_term(
							&mut result,
							&definition.terms,
							key,
							&mut defined,
							DefineOptions {
								base_url: base_url.map(ToOwned::to_owned),
								protected,
								override_protected: opts.override_protected,
								remotes: remotes.clone(),
							},
						)
						.await?;
					}
				}

				_ => return Err(Error::InvalidLocalContext),
			}
		}

		if let Some(validate) = &self.validate_context {
			if !validate(&result) {
				return Err(Error::InvalidContext);
			}
		}

		Ok(Some(result))
	}

	/// Handles `@import`: reads a remote context map and merges its term
	/// entries behind the caller's entries.
	async fn handle_import(
		&self,
		base_url: Option<&Iri>,
		import: &str,
		terms: IndexMap<String, TermEntry>,
	) -> Result<IndexMap<String, TermEntry>, Error> {
		// 5.6.1)
		if self.mode_1_0() {
			return Err(Error::InvalidContextEntry);
		}

		// 5.6.3)
		let resolved = match base_url {
			Some(base) => {
				iri::resolve(base, import).ok_or(Error::InvalidRemoteContext)?
			}
			None => IriBuf::new(import.to_string())
				.map_err(|_| Error::InvalidRemoteContext)?,
		};

		// 5.6.4) 5.6.5)
		let document = self.load_remote(&resolved).await?;

		let object = document
			.context
			.as_object()
			.ok_or(Error::InvalidRemoteContext)?;

		let mut imported =
			ContextDefinition::parse_imported_terms(object, self.mode_1_0())?;

		for (key, value) in terms {
			imported.insert(key, value);
		}

		Ok(imported)
	}

	fn handle_vocab(
		&self,
		result: &mut Context,
		vocab: &Nullable<String>,
	) -> Result<(), Error> {
		match vocab {
			// 5.8.2)
			Nullable::Null => {
				result.vocab_mapping = None;
				Ok(())
			}
			Nullable::Some(value) => {
				// 5.8.3)
				if !(iri::is_absolute(value)
					|| iri::is_relative(value)
					|| value.starts_with("_:"))
				{
					return Err(Error::InvalidVocabMapping);
				}

				let expanded = self.expand_iri(&*result, value, true, true)?;
				result.vocab_mapping = expanded;
				Ok(())
			}
		}
	}
}

fn handle_base(result: &mut Context, base: &Nullable<String>) -> Result<(), Error> {
	match base {
		// 5.7.2)
		Nullable::Null => {
			result.current_base_iri = None;
			Ok(())
		}
		Nullable::Some(value) => {
			// 5.7.3)
			if let Ok(iri) = IriBuf::new(value.clone()) {
				result.current_base_iri = Some(iri);
				return Ok(());
			}

			// 5.7.4)
			if iri::is_relative(value) {
				if let Some(current) = &result.current_base_iri {
					let resolved =
						iri::resolve(current, value).ok_or(Error::InvalidBaseIri)?;
					result.current_base_iri = Some(resolved);
					return Ok(());
				}
			}

			// 5.7.5)
			Err(Error::InvalidBaseIri)
		}
	}
}

fn handle_language(result: &mut Context, language: &Nullable<String>) {
	match language {
		Nullable::Null => result.default_language = None,
		Nullable::Some(language) => {
			result.default_language = Some(language.to_lowercase())
		}
	}
}

fn handle_direction(
	result: &mut Context,
	direction: &Nullable<String>,
) -> Result<(), Error> {
	match direction {
		Nullable::Null => {
			result.default_direction = None;
			Ok(())
		}
		Nullable::Some(direction) => {
			let direction = Direction::try_from(direction.as_str())
				.map_err(|_| Error::InvalidBaseDirection)?;
			result.default_direction = Some(direction);
			Ok(())
		}
	}
}
