use iref::IriBuf;
use json_syntax::Value;

use crate::{Container, Direction, Nullable};

/// A processed term definition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermDefinition {
	/// The expanded IRI this term maps to.
	///
	/// `None` means the term maps to nothing: the definition still blocks
	/// the term from being used as a compact IRI prefix or alias.
	pub iri: Option<String>,

	/// The term may be used as the left half of a compact IRI.
	pub prefix: bool,

	/// The definition may not be redefined except by an equal definition
	/// or from a property-scoped context.
	pub protected: bool,

	/// The term denotes a reverse property.
	pub reverse: bool,

	/// Base URL active when the definition was created, used to resolve
	/// the scoped context.
	pub base_iri: Option<IriBuf>,

	/// Raw scoped context, processed lazily every time the term becomes
	/// active.
	pub context: Option<Value>,

	/// Container mapping.
	pub container: Container,

	/// Direction override for values of this term. `Nullable::Null` means
	/// explicitly unset.
	pub direction: Option<Nullable<Direction>>,

	/// Language override for values of this term. `Nullable::Null` means
	/// explicitly unset.
	pub language: Option<Nullable<String>>,

	/// Alternate index key for property-valued index containers.
	pub index: Option<String>,

	/// The nesting parent term, or `@nest`.
	pub nest: Option<String>,

	/// Type coercion: `@id`, `@vocab`, `@json`, `@none`, or an absolute
	/// IRI.
	pub typ: Option<String>,
}

impl TermDefinition {
	/// Compares two definitions ignoring the `protected` flag.
	pub fn eq_modulo_protected(&self, other: &Self) -> bool {
		self.iri == other.iri
			&& self.prefix == other.prefix
			&& self.reverse == other.reverse
			&& self.base_iri == other.base_iri
			&& self.context == other.context
			&& self.container == other.container
			&& self.direction == other.direction
			&& self.language == other.language
			&& self.index == other.index
			&& self.nest == other.nest
			&& self.typ == other.typ
	}

	/// Checks if this is the all-defaults definition, i.e. a term that
	/// carries no information besides blocking its name.
	pub(crate) fn is_zero(&self) -> bool {
		*self == TermDefinition::default()
	}
}
