//! Warnings raised during processing.
//!
//! Some malformed input is skipped instead of failing the document:
//! keyword-lookalike terms and values, and node keys that expand to an
//! unhandled keyword. Those skips are surfaced through an injected
//! [`WarningHandler`].

use std::fmt;

/// A recoverable processing anomaly.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Warning {
	/// A term that looks like a keyword was dropped.
	KeywordLikeTerm(String),

	/// A value that looks like a keyword was dropped.
	KeywordLikeValue(String),

	/// A node key expanded to a keyword no expansion branch handles.
	UnhandledKeyword(String),
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::KeywordLikeTerm(s) => write!(f, "keyword-like term `{s}`"),
			Self::KeywordLikeValue(s) => write!(f, "keyword-like value `{s}`"),
			Self::UnhandledKeyword(s) => write!(f, "unhandled keyword `{s}`"),
		}
	}
}

/// Warning handler.
pub trait WarningHandler: Send + Sync {
	fn handle(&self, warning: Warning);
}

/// Discards all warnings. This is the default handler.
pub struct Discard;

impl WarningHandler for Discard {
	fn handle(&self, _warning: Warning) {}
}

/// Emits warnings through [`tracing`].
pub struct Log;

impl WarningHandler for Log {
	fn handle(&self, warning: Warning) {
		tracing::warn!(%warning, "json-ld processing warning");
	}
}
