//! Value compaction.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#value-compaction>.

use json_syntax::Value;

use super::iri::IriCompactionValue;
use crate::{ContainerKind, Context, Error, Node, Nullable, Processor};

/// The language or direction effectively applying to a property.
enum Effective<'a> {
	Unset,
	Null,
	Value(&'a str),
}

impl<L> Processor<L> {
	/// Compacts a value node (or bare reference) to its shortest form,
	/// returning `None` when the node cannot shed its envelope.
	pub(crate) fn compact_value(
		&self,
		active: &Context,
		property: Option<&str>,
		value: &Node,
	) -> Result<Option<Value>, Error> {
		let def = property.and_then(|p| active.terms.get(p));
		let def_type = def.and_then(|d| d.typ.as_deref());
		let container = def.map(|d| d.container.clone()).unwrap_or_default();

		// 4)
		let language = match def.and_then(|d| d.language.as_ref()) {
			Some(Nullable::Null) => Effective::Null,
			Some(Nullable::Some(language)) => Effective::Value(language),
			None => match &active.default_language {
				Some(language) => Effective::Value(language),
				None => Effective::Unset,
			},
		};

		// 5)
		let direction = match def.and_then(|d| d.direction.as_ref()) {
			Some(Nullable::Null) => Effective::Null,
			Some(Nullable::Some(direction)) => Effective::Value(direction.as_str()),
			None => match active.default_direction {
				Some(direction) => Effective::Value(direction.as_str()),
				None => Effective::Unset,
			},
		};

		let props = value.len();

		// 6) A bare reference compacts as an IRI when the term coerces
		// ids.
		if (value.id.is_some() && props == 1)
			|| (value.id.is_some() && value.index.is_some() && props == 2)
		{
			let id = value.id.as_deref().unwrap();
			return match def_type {
				Some("@id") => Ok(Some(Value::String(
					self.compact_iri(active, id, IriCompactionValue::None, false, false)?
						.into(),
				))),
				Some("@vocab") => Ok(Some(Value::String(
					self.compact_iri(active, id, IriCompactionValue::None, true, false)?
						.into(),
				))),
				_ => Ok(None),
			};
		}

		// 7) A type matching the term's coercion drops the envelope.
		if let Some(t) = def_type {
			if value.value.is_some() && value.types.iter().any(|vt| vt == t) {
				return Ok(Some(value.value.clone().unwrap_or(Value::Null)));
			}
		}

		// 8)
		if def_type == Some("@none")
			|| (!value.types.is_empty()
				&& !value.types.iter().any(|vt| Some(vt.as_str()) == def_type))
		{
			return Ok(None);
		}

		// 9) Non-string scalars only need their envelope for a foreign
		// `@index`.
		if value.is_value() && !matches!(value.value, Some(Value::String(_))) {
			if value.index.is_none() || container.contains(ContainerKind::Index) {
				return Ok(Some(value.value.clone().unwrap_or(Value::Null)));
			}

			return Ok(None);
		}

		// 10) Strings shed the envelope when language and direction match
		// the effective ones.
		if value.is_value() && matches!(value.value, Some(Value::String(_))) {
			let language_matches = match (&value.language, &language) {
				(Some(value_language), Effective::Value(language)) => {
					value_language.eq_ignore_ascii_case(language)
				}
				(None, Effective::Null) | (None, Effective::Unset) => true,
				_ => false,
			};

			let direction_matches = match (value.direction, &direction) {
				(Some(value_direction), Effective::Value(direction)) => {
					value_direction.as_str().eq_ignore_ascii_case(direction)
				}
				(None, Effective::Null) | (None, Effective::Unset) => true,
				_ => false,
			};

			if language_matches && direction_matches {
				// 10.1)
				if value.index.is_none() || container.contains(ContainerKind::Index) {
					return Ok(Some(value.value.clone().unwrap_or(Value::Null)));
				}
			}
		}

		Ok(None)
	}
}
