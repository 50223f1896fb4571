//! Value expansion: scalar coercion against the active property's term
//! definition.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#value-expansion>.

use json_syntax::Value;

use crate::{Context, Error, Node, Nullable, Processor};

impl<L> Processor<L> {
	pub(crate) fn expand_value(
		&self,
		active: &Context,
		property: &str,
		value: &Value,
	) -> Result<Node, Error> {
		let def = active.terms.get(property);
		let typ = def.and_then(|d| d.typ.as_deref());
		let mut result = Node::default();

		match typ {
			// 1) 2)
			Some("@id") | Some("@vocab") => {
				if let Value::String(s) = value {
					if !s.as_str().is_empty() {
						result.id = self.expand_iri(
							active,
							s.as_str(),
							true,
							typ == Some("@vocab"),
						)?;
						return Ok(result);
					}
				}
				// Values of some other shape are not coerced.
			}
			// 4)
			Some("@none") | None => (),
			Some(other) => result.types = vec![other.to_string()],
		}

		// 3)
		result.value = Some(value.clone());

		// 5) Plain strings pick up the term or context language and
		// direction.
		if matches!(value, Value::String(_)) {
			result.language = match def.and_then(|d| d.language.as_ref()) {
				Some(Nullable::Null) => None,
				Some(Nullable::Some(language)) => Some(language.clone()),
				None => active.default_language.clone(),
			};

			result.direction = match def.and_then(|d| d.direction.as_ref()) {
				Some(Nullable::Null) => None,
				Some(Nullable::Some(direction)) => Some(*direction),
				None => active.default_direction,
			};
		}

		Ok(result)
	}
}
