/// A value that may be the explicit JSON `null`.
///
/// Context entries distinguish an absent entry (`Option::None`) from an
/// entry explicitly set to `null` (`Nullable::Null`), which clears or
/// unsets whatever the entry controls.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Nullable<T> {
	Null,
	Some(T),
}

impl<T> Nullable<T> {
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_ref(&self) -> Nullable<&T> {
		match self {
			Self::Null => Nullable::Null,
			Self::Some(t) => Nullable::Some(t),
		}
	}

	pub fn some(self) -> Option<T> {
		match self {
			Self::Null => None,
			Self::Some(t) => Some(t),
		}
	}

	pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Nullable<U> {
		match self {
			Self::Null => Nullable::Null,
			Self::Some(t) => Nullable::Some(f(t)),
		}
	}
}
