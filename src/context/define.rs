//! The create-term-definition algorithm.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#create-term-definition>.

use std::collections::HashMap;

use indexmap::IndexMap;
use iref::IriBuf;

use super::processing::ContextOptions;
use super::{Context, TermDefinition};
use crate::keyword::{is_keyword, is_keyword_like};
use crate::loader::Loader;
use crate::syntax::TermEntry;
use crate::warning::Warning;
use crate::{iri, Container, ContainerKind, Direction, Error, Nullable, Processor};

/// Definition state of a term during context processing. A term that is
/// re-entered while `Defining` closes a cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum TermState {
	Defining,
	Defined,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct DefineOptions {
	pub base_url: Option<IriBuf>,
	pub protected: bool,
	pub override_protected: bool,
	pub remotes: Vec<IriBuf>,
}

fn is_absolute_or_blank(value: &str) -> bool {
	iri::is_absolute(value) || value.starts_with("_:")
}

impl<L: Loader> Processor<L> {
	pub(crate) async fn create_term(
		&self,
		active: &mut Context,
		local: &IndexMap<String, TermEntry>,
		term: &str,
		defined: &mut HashMap<String, TermState>,
		opts: DefineOptions,
	) -> Result<(), Error> {
		// 1)
		match defined.get(term) {
			Some(TermState::Defined) => return Ok(()),
			Some(TermState::Defining) => return Err(Error::CyclicIriMapping),
			None => (),
		}

		// 2)
		if term.is_empty() {
			return Err(Error::InvalidTermDefinition);
		}
		defined.insert(term.to_string(), TermState::Defining);

		// 3)
		let input = local.get(term).cloned().unwrap_or_default();

		// 4) `@type` is the only keyword that may carry a definition, and
		// only in 1.1 mode, and only with `@container: @set` and
		// `@protected`.
		if term == "@type" {
			if self.mode_1_0() {
				return Err(Error::KeywordRedefinition);
			}

			if let Some(old) = active.terms.get(term) {
				if old.protected && !opts.override_protected {
					return Err(Error::ProtectedTermRedefinition);
				}
			}

			if input.id.is_some()
				|| input.typ.is_some()
				|| input.reverse.is_some()
				|| input.index.is_some()
				|| input.context.is_some()
				|| input.language.is_some()
				|| input.direction.is_some()
				|| input.nest.is_some()
				|| input.prefix.is_some()
				|| input.has_unknown_entries
			{
				return Err(Error::KeywordRedefinition);
			}

			match &input.container {
				Some(Nullable::Some(values)) => {
					if values.len() != 1 || values[0] != "@set" {
						return Err(Error::KeywordRedefinition);
					}
				}
				_ => {
					if !input.simple && !input.null {
						return Err(Error::KeywordRedefinition);
					}
				}
			}
		} else {
			// 5)
			if is_keyword(term) {
				return Err(Error::KeywordRedefinition);
			}

			if is_keyword_like(term) {
				self.warn(Warning::KeywordLikeTerm(term.to_string()));
				return Ok(());
			}
		}

		// 6) Remove any previous definition, also catching an alias whose
		// IRI mapping equals the term.
		let mut previous = active.terms.remove(term);
		if previous.is_none() {
			previous = active
				.terms
				.values()
				.find(|def| def.iri.as_deref() == Some(term))
				.cloned();
		}

		// 10)
		let mut def = TermDefinition {
			protected: opts.protected,
			..Default::default()
		};

		// 11)
		if let Some(protected) = input.protected {
			if self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}
			def.protected = protected;
		}

		// The protection of this term is now final; record it on the
		// context so nullification can be policed.
		if def.protected {
			active.protected.insert(term.to_string());
		}

		// 12)
		if let Some(typ) = &input.typ {
			let expanded = self
				.expand_iri_with(active, typ, false, true, local, defined)
				.await
				.map_err(|_| Error::InvalidTypeMapping)?;

			let expanded = expanded.ok_or(Error::InvalidTypeMapping)?;

			// 12.3)
			if self.mode_1_0() && (expanded == "@none" || expanded == "@json") {
				return Err(Error::InvalidTypeMapping);
			}

			// 12.4)
			match expanded.as_str() {
				"@id" | "@json" | "@none" | "@vocab" => (),
				other => {
					if !iri::is_absolute(other) {
						return Err(Error::InvalidTypeMapping);
					}
				}
			}

			// 12.5)
			def.typ = Some(expanded);
		}

		// 13) Reverse property.
		if let Some(reverse) = &input.reverse {
			// 13.1)
			if input.id.is_some() || input.nest.is_some() {
				return Err(Error::InvalidReverseProperty);
			}

			// 13.3)
			if is_keyword_like(reverse) {
				self.warn(Warning::KeywordLikeValue(reverse.clone()));
				return Ok(());
			}

			// 13.4)
			let expanded = self
				.expand_iri_with(active, reverse, false, true, local, defined)
				.await
				.map_err(|_| Error::InvalidIriMapping)?
				.ok_or(Error::InvalidIriMapping)?;

			if !is_absolute_or_blank(&expanded) {
				return Err(Error::InvalidIriMapping);
			}

			def.iri = Some(expanded);

			// 13.5)
			if let Some(container) = &input.container {
				match container {
					Nullable::Some(values) => {
						match values.first().map(String::as_str) {
							Some("@set") | Some("@index") => (),
							_ => return Err(Error::InvalidReverseProperty),
						}

						let mut kinds = Vec::with_capacity(values.len());
						for value in values {
							kinds.push(
								ContainerKind::try_from(value.as_str())
									.map_err(|_| Error::InvalidReverseProperty)?,
							);
						}
						def.container = Container::from_kinds(kinds);
					}
					Nullable::Null => def.container = Container::new(),
				}
			}

			// 13.6)
			def.reverse = true;

			// An `@index` on a reverse term with an `@index` container is
			// outside the W3C algorithm but required by the test corpus.
			if def.container.contains(ContainerKind::Index) {
				if let Some(index) = &input.index {
					def.index = Some(index.clone());
				}
			}

			// 13.7)
			active.terms.insert(term.to_string(), def);
			defined.insert(term.to_string(), TermState::Defined);
			return Ok(());
		}

		let explicit_null_id = matches!(input.id, Some(Nullable::Null));
		let id_value = match &input.id {
			Some(Nullable::Some(id)) if id.as_str() != term => Some(id.clone()),
			_ => None,
		};

		if let Some(id) = id_value {
			// 14.2.2)
			if !is_keyword(&id) && is_keyword_like(&id) {
				self.warn(Warning::KeywordLikeValue(id));
				return Ok(());
			}

			// 14.2.3)
			let expanded = self
				.expand_iri_with(active, &id, false, true, local, defined)
				.await?
				.ok_or(Error::InvalidIriMapping)?;

			if !is_keyword(&expanded) && !is_absolute_or_blank(&expanded) {
				return Err(Error::InvalidIriMapping);
			}

			if expanded == "@context" {
				return Err(Error::InvalidKeywordAlias);
			}

			def.iri = Some(expanded.clone());

			// 14.2.4) A term that is itself a compact IRI or contains a
			// slash must expand back to the same IRI.
			let interior_colon = !term.starts_with(':')
				&& !term.ends_with(':')
				&& term.contains(':');
			if term.contains('/') || interior_colon {
				// 14.2.4.1)
				defined.insert(term.to_string(), TermState::Defined);

				// 14.2.4.2)
				let check = self
					.expand_iri_with(active, term, false, true, local, defined)
					.await
					.map_err(|_| Error::InvalidIriMapping)?;

				if check.as_deref() != Some(expanded.as_str()) {
					return Err(Error::InvalidIriMapping);
				}
			} else if (input.simple && iri::ends_in_gen_delim(&expanded))
				|| expanded == "_:"
			{
				// 14.2.5)
				if let Some(remapped) = self.remap_prefix_iris.get(&expanded) {
					def.iri = Some(remapped.clone());
				}
				def.prefix = true;
			}
		} else if explicit_null_id {
			// 14.1) The term maps to nothing but still registers.
		} else if term.bytes().skip(1).any(|b| b == b':') {
			// 15) The term itself is a compact IRI.
			let i = term.find(':').unwrap();
			let (prefix, rest) = term.split_at(i);
			let suffix = &rest[1..];

			// 15.1)
			if !suffix.starts_with("//") && local.contains_key(prefix) {
				Box::pin(self.create_term(
					active,
					local,
					prefix,
					defined,
					DefineOptions::default(),
				))
				.await?;
			}

			// 15.2)
			if let Some(prefix_def) = active.terms.get(prefix) {
				let mapping = prefix_def.iri.clone().unwrap_or_default();
				def.iri = Some(format!("{mapping}{suffix}"));
			} else {
				// 15.3)
				def.iri = Some(term.to_string());
			}
		} else if term.contains('/') {
			// 16)
			let expanded = self
				.expand_iri(&*active, term, false, true)
				.map_err(|_| Error::InvalidIriMapping)?
				.ok_or(Error::InvalidIriMapping)?;

			if !iri::is_absolute(&expanded) {
				return Err(Error::InvalidIriMapping);
			}
			def.iri = Some(expanded);
		} else if term == "@type" {
			// 17)
			def.iri = Some("@type".to_string());
		} else if let Some(vocab) = &active.vocab_mapping {
			// 18)
			def.iri = Some(format!("{vocab}{term}"));
		} else {
			return Err(Error::InvalidIriMapping);
		}

		// 19) Container mapping.
		if let Some(container) = &input.container {
			let values = match container {
				Nullable::Null => return Err(Error::InvalidContainerMapping),
				Nullable::Some(values) => values,
			};

			// 19.1)
			let mut kinds = Vec::with_capacity(values.len());
			for value in values {
				kinds.push(
					ContainerKind::try_from(value.as_str())
						.map_err(|_| Error::InvalidContainerMapping)?,
				);
			}

			let has = |kind: ContainerKind| kinds.contains(&kind);

			if has(ContainerKind::Graph)
				&& (has(ContainerKind::Id) || has(ContainerKind::Index))
			{
				let rest: Vec<ContainerKind> = kinds
					.iter()
					.copied()
					.filter(|k| {
						!matches!(
							k,
							ContainerKind::Graph
								| ContainerKind::Id | ContainerKind::Index
						)
					})
					.collect();
				if rest.contains(&ContainerKind::Set) && rest.len() != 1 {
					return Err(Error::InvalidIriMapping);
				}
			} else if has(ContainerKind::Set) && has(ContainerKind::List) {
				return Err(Error::InvalidContainerMapping);
			}

			// 19.2)
			if self.mode_1_0() {
				match kinds[0] {
					ContainerKind::Id | ContainerKind::Graph | ContainerKind::Type => {
						return Err(Error::InvalidContainerMapping)
					}
					_ => (),
				}
			}

			// 19.3)
			def.container = Container::from_kinds(kinds);

			// 19.4)
			if def.container.contains(ContainerKind::Type) {
				// 19.4.1)
				if def.typ.is_none() {
					def.typ = Some("@id".to_string());
				}

				// 19.4.2)
				match def.typ.as_deref() {
					Some("@id") | Some("@vocab") | None => (),
					_ => return Err(Error::InvalidTypeMapping),
				}
			}
		}

		// 20) `@index` requires an `@index` container.
		if let Some(index) = &input.index {
			// 20.1)
			if self.mode_1_0() || !def.container.contains(ContainerKind::Index) {
				return Err(Error::InvalidTermDefinition);
			}

			// 20.2)
			let expanded = self
				.expand_iri_with(active, index, false, true, local, defined)
				.await
				.map_err(|_| Error::InvalidTermDefinition)?
				.ok_or(Error::InvalidTermDefinition)?;

			if !iri::is_absolute(&expanded) {
				return Err(Error::InvalidTermDefinition);
			}

			// 20.3)
			def.index = Some(index.clone());
		}

		// 21) Scoped context: must parse in a validation-off recursive
		// call, stored verbatim for lazy use.
		if let Some(context) = &input.context {
			// 21.1)
			if self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}

			// 21.3)
			let mut validation = ContextOptions::default();
			validation.override_protected = true;
			validation.remotes = opts.remotes.clone();
			validation.validate = false;

			Box::pin(self.process_context_value(
				Some(&*active),
				context,
				opts.base_url.as_deref(),
				validation,
			))
			.await
			.map_err(|_| Error::InvalidScopedContext)?;

			// 21.4)
			def.context = Some(context.clone());
			def.base_iri = opts.base_url.clone();
		}

		// 22)
		if input.typ.is_none() {
			if let Some(language) = &input.language {
				def.language = Some(match language {
					Nullable::Null => Nullable::Null,
					Nullable::Some(language) => Nullable::Some(language.to_lowercase()),
				});
			}

			// 23)
			if let Some(direction) = &input.direction {
				def.direction = Some(match direction {
					Nullable::Null => Nullable::Null,
					Nullable::Some(direction) => Nullable::Some(
						Direction::try_from(direction.as_str())
							.map_err(|_| Error::InvalidBaseDirection)?,
					),
				});
			}
		}

		// 24)
		if let Some(nest) = &input.nest {
			// 24.1)
			if self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}

			if is_keyword(nest) && nest != "@nest" {
				return Err(Error::InvalidNestValue);
			}
			def.nest = Some(nest.clone());
		}

		// 25)
		if let Some(prefix) = input.prefix {
			// 25.1)
			if self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}

			if term.contains(':') || term.contains('/') {
				return Err(Error::InvalidTermDefinition);
			}

			// 25.3)
			if prefix && def.iri.as_deref().map(is_keyword).unwrap_or(false) {
				return Err(Error::InvalidTermDefinition);
			}

			def.prefix = prefix;
		}

		// 26)
		if input.has_unknown_entries {
			return Err(Error::InvalidTermDefinition);
		}

		// 27) A protected previous definition may only be replaced by an
		// equal definition, unless override is requested.
		if let Some(previous) = previous {
			if previous.protected && !opts.override_protected {
				// 27.1)
				if !previous.eq_modulo_protected(&def) {
					return Err(Error::ProtectedTermRedefinition);
				}
				// 27.2)
				def = previous;
			}
		}

		// 28)
		active.terms.insert(term.to_string(), def);
		defined.insert(term.to_string(), TermState::Defined);
		Ok(())
	}
}
